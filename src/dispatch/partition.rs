//! Work partitioning
//!
//! Splits the total visit count into per-worker quotas that are as even as
//! possible: the remainder goes to the first workers, so no two quotas ever
//! differ by more than one.

/// A worker's share of the total visit count
///
/// Immutable once computed; quotas always sum to the requested total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerQuota {
    /// Index of the worker this quota belongs to
    pub worker_index: usize,

    /// Number of visits assigned to the worker
    pub assigned_count: u64,
}

/// Splits `total` visits across `workers` quotas
///
/// `base = total / workers`; the first `total % workers` workers receive one
/// extra visit. Deterministic and sum-preserving. Workers with a zero quota
/// are still listed; the dispatcher skips spawning them.
///
/// # Arguments
///
/// * `total` - Total number of visits to distribute
/// * `workers` - Number of workers to distribute across
///
/// # Returns
///
/// One quota per worker, in worker-index order; empty when `workers` is 0.
pub fn partition(total: u64, workers: u32) -> Vec<WorkerQuota> {
    if workers == 0 {
        return Vec::new();
    }

    let workers = workers as u64;
    let base = total / workers;
    let remainder = total % workers;

    (0..workers)
        .map(|index| WorkerQuota {
            worker_index: index as usize,
            assigned_count: base + u64::from(index < remainder),
        })
        .collect()
}
