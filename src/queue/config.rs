use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// What happens to a registration batch whose transaction failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RegistrationFailurePolicy {
    /// Discard the batch; the next cycle starts empty.
    #[default]
    Drop,
    /// Put the batch back in front of the results that arrived meanwhile.
    Requeue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct QueueConfig {
    /// Node-publish cycle period.
    pub stage_a_interval_ms: u64,
    /// Ledger-registration cycle period; must be longer than the publish period.
    pub stage_b_interval_ms: u64,
    #[serde(default)]
    pub registration_failure_policy: RegistrationFailurePolicy,
}

impl QueueConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.stage_a_interval_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "queue.stage_a_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.stage_b_interval_ms <= self.stage_a_interval_ms {
            return Err(ConfigError::InvalidConfig(format!(
                "queue.stage_b_interval_ms ({}) must be greater than queue.stage_a_interval_ms ({})",
                self.stage_b_interval_ms, self.stage_a_interval_ms
            )));
        }
        Ok(())
    }

    pub(crate) fn stage_a_interval(&self) -> Duration {
        Duration::from_millis(self.stage_a_interval_ms)
    }

    pub(crate) fn stage_b_interval(&self) -> Duration {
        Duration::from_millis(self.stage_b_interval_ms)
    }
}
