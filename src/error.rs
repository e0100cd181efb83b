use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while cataloguing a tree.
///
/// The `Display` output of the fatal variants is the two-line diagnostic the
/// command-line tool prints before exiting: a fixed message followed by the
/// offending path.
#[derive(Debug, Error)]
pub enum AssetsError {
    #[error("Could not open the following path:\n{}", path.display())]
    DirectoryOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not get any information on this file:\n{}", path.display())]
    Metadata {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not rename this file:\n{filename}")]
    Rename {
        filename: String,
        from: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not write to this file:\n{destination}")]
    Output {
        destination: String,
        source: std::io::Error,
    },
    #[error("Could not serialize asset record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{tool} failed for {}: {reason}", path.display())]
    Tool {
        tool: &'static str,
        path: PathBuf,
        reason: String,
    },
}

impl AssetsError {
    pub(crate) fn directory_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssetsError::DirectoryOpen {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn metadata(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssetsError::Metadata {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn tool(tool: &'static str, path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        AssetsError::Tool {
            tool,
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error must abort the whole run.
    ///
    /// Only a failed hash or base64 collaborator is recoverable; the record is
    /// still emitted with the corresponding field left empty.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AssetsError::Tool { .. })
    }
}
