use serde::{Deserialize, Serialize};

/// Key Generation Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct KgsConfig {
    /// Length in characters of generated short IDs.
    #[serde(default = "default_key_length")]
    pub key_length: u8,

    /// Replenish the key pool when unused keys fall below this count.
    #[serde(default = "default_low_water_mark")]
    pub low_water_mark: u64,

    /// Number of keys to generate per replenishment batch.
    #[serde(default = "default_replenish_batch")]
    pub replenish_batch: u64,

    /// How often the replenisher checks the pool level, in seconds.
    #[serde(default = "default_replenish_interval_secs")]
    pub replenish_interval_secs: u64,
}

impl Default for KgsConfig {
    fn default() -> Self {
        Self {
            key_length: default_key_length(),
            low_water_mark: default_low_water_mark(),
            replenish_batch: default_replenish_batch(),
            replenish_interval_secs: default_replenish_interval_secs(),
        }
    }
}

impl KgsConfig {
    pub fn replenish_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.replenish_interval_secs)
    }
}

fn default_key_length() -> u8 {
    6
}

fn default_low_water_mark() -> u64 {
    100
}

fn default_replenish_batch() -> u64 {
    1000
}

fn default_replenish_interval_secs() -> u64 {
    60
}
