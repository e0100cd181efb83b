use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which implementation computes content hashes and base64 payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolBackend {
    #[default]
    Native,
    /// `md5sum` and `base64 --wrap=0` invoked as child processes.
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraversalConfig {
    pub cachebust: bool,
    /// Largest file size, in bytes, that gets a base64 payload. `0` disables
    /// encoding entirely.
    pub base64_threshold: u64,
}

impl TraversalConfig {
    /// Whether a file of `size` bytes carries a base64 payload.
    pub fn encodes(&self, size: u64) -> bool {
        self.base64_threshold > 0 && size <= self.base64_threshold
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsOptions {
    pub root: PathBuf,
    /// Manifest file. `None` writes to standard output.
    pub output: Option<PathBuf>,
    pub traversal: TraversalConfig,
    pub ignore: Vec<String>,
    pub tools: ToolBackend,
}

impl Default for AssetsOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output: None,
            traversal: TraversalConfig::default(),
            ignore: Vec::new(),
            tools: ToolBackend::Native,
        }
    }
}

#[derive(Debug, Default)]
pub struct AssetsBuilder {
    options: AssetsOptions,
}

impl AssetsBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: AssetsOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }

    pub fn output(mut self, path: Option<PathBuf>) -> Self {
        self.options.output = path;
        self
    }

    pub fn cachebust(mut self, yes: bool) -> Self {
        self.options.traversal.cachebust = yes;
        self
    }

    pub fn base64_threshold(mut self, bytes: u64) -> Self {
        self.options.traversal.base64_threshold = bytes;
        self
    }

    pub fn ignore(mut self, lists: Vec<String>) -> Self {
        self.options.ignore = lists;
        self
    }

    pub fn tools(mut self, backend: ToolBackend) -> Self {
        self.options.tools = backend;
        self
    }

    pub fn build(self) -> AssetsOptions {
        self.options
    }
}
