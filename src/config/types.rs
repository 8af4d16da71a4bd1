use serde::Deserialize;

/// Main configuration structure for Revisit
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub visit: VisitConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Visit plan configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VisitConfig {
    /// The URL every visit is issued against
    #[serde(rename = "target-url")]
    pub target_url: String,

    /// Total number of visits to perform
    #[serde(rename = "total-visits")]
    pub total_visits: u64,

    /// Number of concurrent workers the visits are split across
    pub workers: u32,

    /// Maximum attempts per visit (first try included)
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

/// Resource throttling configuration
///
/// Workers pause cooperatively while host CPU utilization stays above the
/// threshold. The published flag is stale by at most one sampling cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct ThrottleConfig {
    /// CPU utilization (percent) above which workers pause
    #[serde(rename = "cpu-threshold-percent", default = "default_cpu_threshold")]
    pub cpu_threshold_percent: f32,

    /// Time between CPU samples (milliseconds)
    #[serde(rename = "sample-interval-ms", default = "default_sample_interval")]
    pub sample_interval_ms: u64,

    /// How often a paused worker re-checks the pause flag (milliseconds)
    #[serde(rename = "pause-poll-ms", default = "default_pause_poll")]
    pub pause_poll_ms: u64,
}

/// HTTP visit configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Overall request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// User agent strings rotated across visits; built-in list when empty
    #[serde(rename = "user-agents", default)]
    pub user_agents: Vec<String>,
}

fn default_cpu_threshold() -> f32 {
    70.0
}

fn default_sample_interval() -> u64 {
    2000
}

fn default_pause_poll() -> u64 {
    1000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            cpu_threshold_percent: default_cpu_threshold(),
            sample_interval_ms: default_sample_interval(),
            pause_poll_ms: default_pause_poll(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agents: Vec::new(),
        }
    }
}
