use serde::{Deserialize, Serialize};

/// Expired-paste reaper configuration.
///
/// Mirrors the shape of a retention-worker config: a loop interval plus a
/// per-run batch cap so a single sweep can't monopolize the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct ReaperConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// How often the reaper sweeps for expired pastes, in seconds.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Maximum number of expired pastes drained per sweep.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval_secs(),
            batch_size: default_batch_size(),
        }
    }
}

impl ReaperConfig {
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_secs)
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    300
}

fn default_batch_size() -> u32 {
    100
}
