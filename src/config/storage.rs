use serde::{Deserialize, Serialize};

/// Compressed blob store backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    Filesystem(FilesystemStorageConfig),
    #[cfg(feature = "s3-storage")]
    S3(S3StorageConfig),
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Filesystem(FilesystemStorageConfig::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct FilesystemStorageConfig {
    /// Root directory under which blobs are written, sharded by key prefix.
    #[serde(default = "default_root_dir")]
    pub root_dir: String,

    /// Gzip compression level, 0-9.
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

impl Default for FilesystemStorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            compression_level: default_compression_level(),
        }
    }
}

#[cfg(feature = "s3-storage")]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct S3StorageConfig {
    pub bucket: String,

    #[serde(default)]
    pub region: Option<String>,

    /// Override for S3-compatible endpoints (e.g. MinIO).
    #[serde(default)]
    pub endpoint_url: Option<String>,

    #[serde(default)]
    pub force_path_style: bool,

    /// Key prefix under which blobs are written within the bucket.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

fn default_root_dir() -> String {
    "./data/blobs".to_string()
}

fn default_compression_level() -> u32 {
    6
}

#[cfg_attr(not(feature = "s3-storage"), allow(dead_code))]
fn default_key_prefix() -> String {
    "pastes".to_string()
}
