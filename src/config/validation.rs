use crate::config::types::{Config, HttpConfig, ThrottleConfig, VisitConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_visit_config(&config.visit)?;
    validate_throttle_config(&config.throttle)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates the visit plan
fn validate_visit_config(config: &VisitConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.target_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid target_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "target_url must use http or https scheme, got '{}'",
            url.scheme()
        )));
    }

    if config.total_visits < 1 {
        return Err(ConfigError::Validation(format!(
            "total_visits must be >= 1, got {}",
            config.total_visits
        )));
    }

    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

/// Validates throttling parameters
fn validate_throttle_config(config: &ThrottleConfig) -> Result<(), ConfigError> {
    if config.cpu_threshold_percent <= 0.0 || config.cpu_threshold_percent > 100.0 {
        return Err(ConfigError::Validation(format!(
            "cpu_threshold_percent must be in (0, 100], got {}",
            config.cpu_threshold_percent
        )));
    }

    if config.sample_interval_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "sample_interval_ms must be >= 100ms, got {}ms",
            config.sample_interval_ms
        )));
    }

    if config.pause_poll_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "pause_poll_ms must be >= 100ms, got {}ms",
            config.pause_poll_ms
        )));
    }

    Ok(())
}

/// Validates HTTP parameters
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    for agent in &config.user_agents {
        if agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user_agents entries cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config {
            visit: VisitConfig {
                target_url: "https://example.com/".to_string(),
                total_visits: 100,
                workers: 5,
                max_retries: 3,
            },
            throttle: ThrottleConfig::default(),
            http: HttpConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = create_test_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_target_url() {
        let mut config = create_test_config();
        config.visit.target_url = "not a url".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = create_test_config();
        config.visit.target_url = "ftp://example.com/".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_zero_total_visits() {
        let mut config = create_test_config();
        config.visit.total_visits = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_worker_bounds() {
        let mut config = create_test_config();
        config.visit.workers = 0;
        assert!(validate(&config).is_err());

        config.visit.workers = 101;
        assert!(validate(&config).is_err());

        config.visit.workers = 100;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_max_retries() {
        let mut config = create_test_config();
        config.visit.max_retries = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_threshold_bounds() {
        let mut config = create_test_config();
        config.throttle.cpu_threshold_percent = 0.0;
        assert!(validate(&config).is_err());

        config.throttle.cpu_threshold_percent = 100.5;
        assert!(validate(&config).is_err());

        config.throttle.cpu_threshold_percent = 100.0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_sampling_cadence_minimum() {
        let mut config = create_test_config();
        config.throttle.sample_interval_ms = 50;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent_entry() {
        let mut config = create_test_config();
        config.http.user_agents = vec!["Mozilla/5.0".to_string(), "  ".to_string()];
        assert!(validate(&config).is_err());
    }
}
