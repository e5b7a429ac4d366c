//! Configuration for fetching and the per-run fetch budget.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Browser identification strings rotated across requests.
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.2478.67",
];

/// Configuration for the fetch layer and run limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Per-request timeout in milliseconds.
    ///
    /// Default: 10000.
    pub timeout_ms: u64,

    /// Attempts per page fetch, including the first one.
    ///
    /// Default: 2.
    pub max_attempts: u32,

    /// Fixed part of the delay before a retry (milliseconds).
    ///
    /// Default: 1000.
    pub backoff_base_ms: u64,

    /// Upper bound of the random part added to the retry delay (milliseconds).
    ///
    /// Default: 1000.
    pub backoff_jitter_ms: u64,

    /// Upper bound of the random sleep before each page fetch (milliseconds).
    ///
    /// Default: 1000.
    pub pre_request_jitter_ms: u64,

    /// Skip TLS certificate verification.
    ///
    /// Default: true. Known weakness, kept so sites with broken chains
    /// still load; turn it off wherever that matters.
    pub accept_invalid_certs: bool,

    /// Maximum logical fetches per run (article, contributors, link titles).
    ///
    /// `None` means unbounded. Default: 64.
    pub max_fetches: Option<usize>,

    /// Wall-clock budget for a whole run in milliseconds.
    ///
    /// `None` means unbounded. Default: 300000.
    pub max_run_ms: Option<u64>,

    /// User-agent strings to pick from at random. Empty uses the client default.
    pub user_agents: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_attempts: 2,
            backoff_base_ms: 1_000,
            backoff_jitter_ms: 1_000,
            pre_request_jitter_ms: 1_000,
            accept_invalid_certs: true,
            max_fetches: Some(64),
            max_run_ms: Some(300_000),
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PipelineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with every delay set to zero. Used by tests and batch tooling.
    pub fn without_delays() -> Self {
        Self::default()
            .with_backoff(0, 0)
            .with_pre_request_jitter_ms(0)
    }

    /// Set the per-request timeout.
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Set the number of attempts per page fetch.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the retry backoff (fixed part and random part).
    pub fn with_backoff(mut self, base_ms: u64, jitter_ms: u64) -> Self {
        self.backoff_base_ms = base_ms;
        self.backoff_jitter_ms = jitter_ms;
        self
    }

    /// Set the pre-request jitter bound.
    pub fn with_pre_request_jitter_ms(mut self, ms: u64) -> Self {
        self.pre_request_jitter_ms = ms;
        self
    }

    /// Enable or disable TLS certificate verification bypass.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set the per-run fetch count limit.
    pub fn with_max_fetches(mut self, max: Option<usize>) -> Self {
        self.max_fetches = max;
        self
    }

    /// Set the per-run wall-clock limit.
    pub fn with_max_run_ms(mut self, ms: Option<u64>) -> Self {
        self.max_run_ms = ms;
        self
    }

    /// Replace the user-agent pool.
    pub fn with_user_agents(mut self, agents: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.user_agents = agents.into_iter().map(|a| a.into()).collect();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Pick a user agent at random, if the pool is non-empty.
    pub fn random_user_agent(&self) -> Option<&str> {
        if self.user_agents.is_empty() {
            return None;
        }
        let idx = fastrand::usize(..self.user_agents.len());
        Some(self.user_agents[idx].as_str())
    }

    /// Delay before the next retry: base plus uniform jitter.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms + random_up_to(self.backoff_jitter_ms))
    }

    /// Random delay before a page fetch.
    pub fn pre_request_delay(&self) -> Duration {
        Duration::from_millis(random_up_to(self.pre_request_jitter_ms))
    }
}

fn random_up_to(max_ms: u64) -> u64 {
    if max_ms == 0 {
        0
    } else {
        fastrand::u64(0..=max_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_two_attempt_policy() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.accept_invalid_certs);
        assert!(!config.user_agents.is_empty());
    }

    #[test]
    fn test_retry_delay_within_bounds() {
        let config = PipelineConfig::default().with_backoff(1_000, 1_000);
        for _ in 0..50 {
            let delay = config.retry_delay();
            assert!(delay >= Duration::from_millis(1_000));
            assert!(delay <= Duration::from_millis(2_000));
        }
    }

    #[test]
    fn test_without_delays() {
        let config = PipelineConfig::without_delays();
        assert_eq!(config.retry_delay(), Duration::ZERO);
        assert_eq!(config.pre_request_delay(), Duration::ZERO);
    }

    #[test]
    fn test_random_user_agent_from_pool() {
        let config = PipelineConfig::default().with_user_agents(["a", "b"]);
        let ua = config.random_user_agent().unwrap();
        assert!(ua == "a" || ua == "b");

        let empty = PipelineConfig::default().with_user_agents(Vec::<String>::new());
        assert_eq!(empty.random_user_agent(), None);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"timeout_ms": 500, "max_fetches": null}"#).unwrap();
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.max_fetches, None);
        assert_eq!(config.max_attempts, 2);
    }

    #[test]
    fn test_max_attempts_floor() {
        assert_eq!(PipelineConfig::default().with_max_attempts(0).max_attempts, 1);
    }
}
