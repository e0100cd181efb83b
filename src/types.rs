use serde::{Deserialize, Serialize};

/// One manifest entry describing a regular file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub key: String,
    pub directory: String,
    /// The filename on disk after any cache-busting rename.
    pub filename: String,
    pub extension: String,
    #[serde(
        rename = "base64",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub base64_payload: Option<String>,
    #[serde(rename = "md5")]
    pub content_hash: String,
}

/// Counters reported once a catalogue run completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub files: usize,
    pub encoded: usize,
    /// Files renamed on disk for cache-busting.
    pub renamed: usize,
}
