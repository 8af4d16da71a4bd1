//! CPU utilization sampling
//!
//! The monitor consumes samples through the `CpuSampler` trait so tests can
//! script load patterns without touching the host.

use std::sync::Mutex;
use sysinfo::System;

/// Source of CPU utilization samples
///
/// Implementations return the current host CPU utilization in percent, or
/// `None` when a sample could not be taken. The monitor treats a failed
/// sample as "no pressure" rather than stalling the pool.
pub trait CpuSampler: Send + Sync {
    fn sample_cpu_percent(&self) -> Option<f32>;
}

/// Production sampler backed by `sysinfo`
///
/// CPU utilization is computed from the delta between consecutive refreshes,
/// so the first sample after startup reads as idle. The monitor's fixed
/// cadence gives every later sample a full interval as its measurement
/// window.
pub struct SysinfoSampler {
    system: Mutex<System>,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSampler for SysinfoSampler {
    fn sample_cpu_percent(&self) -> Option<f32> {
        let mut sys = self.system.lock().ok()?;
        sys.refresh_cpu();
        Some(sys.global_cpu_info().cpu_usage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sysinfo_sampler_returns_plausible_value() {
        let sampler = SysinfoSampler::new();

        // Two samples so the second has a real measurement window
        let _ = sampler.sample_cpu_percent();
        std::thread::sleep(std::time::Duration::from_millis(100));
        let cpu = sampler.sample_cpu_percent().unwrap();

        assert!(cpu >= 0.0);
        assert!(cpu.is_finite());
    }
}
