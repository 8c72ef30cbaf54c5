use std::time::Duration;

use url::Url;

#[derive(Debug, Clone)]
pub struct NodeClientConfig {
    /// Base URL of the node, without the API version segment.
    pub endpoint: Url,
    pub api_version: String,
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
}

impl NodeClientConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            api_version: "v1".to_string(),
            auth_token: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// How often and how long to poll a node for a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub frequency: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, frequency: Duration) -> Self {
        Self {
            max_attempts,
            frequency,
        }
    }

    /// Upper bound on time spent polling.
    pub fn budget(&self) -> Duration {
        self.frequency.saturating_mul(self.max_attempts)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(300, Duration::from_secs(2))
    }
}
