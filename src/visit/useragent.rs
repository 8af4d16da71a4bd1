//! User agent rotation
//!
//! Each visit carries a user agent drawn from a shared pool, either the
//! operator-supplied list or a small built-in set of common browser strings.

use rand::seq::SliceRandom;

/// Built-in user agents used when the configuration supplies none
const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Pool of user agent strings shared by all workers
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Creates a pool from the configured list, falling back to the
    /// built-in set when the list is empty
    pub fn new(configured: &[String]) -> Self {
        let agents = if configured.is_empty() {
            DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
        } else {
            configured.to_vec()
        };

        Self { agents }
    }

    /// Picks a user agent at random
    pub fn next(&self) -> &str {
        self.agents
            .choose(&mut rand::thread_rng())
            .expect("pool is never empty")
    }

    /// Number of distinct user agents in the pool
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
