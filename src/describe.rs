use crate::digest::{ContentEncoder, ContentHasher};
use crate::error::AssetsError;
use crate::naming;
use crate::options::TraversalConfig;
use crate::types::AssetRecord;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

/// Turns a regular file into an [`AssetRecord`].
///
/// With cache-busting enabled the file is renamed on disk before the record
/// is returned, so a record never names a file that does not exist.
pub struct FileDescriber<'a> {
    config: TraversalConfig,
    hasher: &'a dyn ContentHasher,
    encoder: &'a dyn ContentEncoder,
}

impl<'a> FileDescriber<'a> {
    pub fn new(
        config: TraversalConfig,
        hasher: &'a dyn ContentHasher,
        encoder: &'a dyn ContentEncoder,
    ) -> Self {
        Self {
            config,
            hasher,
            encoder,
        }
    }

    /// # Errors
    ///
    /// Fails only when a cache-busting rename fails. Hash and base64 failures
    /// leave the corresponding field empty.
    pub fn describe(&self, path: &Path, size: u64) -> Result<AssetRecord, AssetsError> {
        let full_path = path.to_string_lossy();
        let filename = naming::file_name(&full_path);
        let extension = naming::extension(filename);
        let key = naming::key(filename);
        let directory = naming::directory_of(&full_path);

        let content_hash = self.hasher.digest(path).unwrap_or_else(|_e| {
            #[cfg(feature = "logging")]
            tracing::warn!("content hash unavailable: {}", _e);
            String::new()
        });

        let base64_payload = if self.config.encodes(size) {
            Some(self.encoder.encode(path).unwrap_or_else(|_e| {
                #[cfg(feature = "logging")]
                tracing::warn!("base64 payload unavailable: {}", _e);
                String::new()
            }))
        } else {
            None
        };

        let filename = if self.config.cachebust {
            self.cachebust(path, filename, key, &content_hash, extension)?
        } else {
            filename.to_string()
        };

        Ok(AssetRecord {
            key: key.to_string(),
            directory: directory.to_string(),
            filename,
            extension: extension.to_string(),
            base64_payload,
            content_hash,
        })
    }

    fn cachebust(
        &self,
        path: &Path,
        filename: &str,
        key: &str,
        hash: &str,
        extension: &str,
    ) -> Result<String, AssetsError> {
        if hash.is_empty() {
            #[cfg(feature = "logging")]
            tracing::warn!("not renaming {} without a content hash", path.display());
            return Ok(filename.to_string());
        }
        // The target is built from the raw stem and extension so names that
        // are not valid UTF-8 keep their bytes on disk.
        let busted = match (path.file_stem(), path.extension()) {
            (Some(stem), ext) => {
                let mut name = OsString::from(stem);
                name.push(".");
                name.push(hash);
                if let Some(ext) = ext.filter(|ext| !ext.is_empty()) {
                    name.push(".");
                    name.push(ext);
                }
                name
            }
            (None, _) => OsString::from(naming::cachebust_filename(key, hash, extension)),
        };
        #[cfg(feature = "logging")]
        if busted.to_str().is_none() {
            tracing::warn!(
                "{} is not valid UTF-8; its manifest entry uses a lossy name",
                path.display()
            );
        }
        let target = path.with_file_name(&busted);
        fs::rename(path, &target).map_err(|source| AssetsError::Rename {
            filename: filename.to_string(),
            from: path.to_path_buf(),
            source,
        })?;
        #[cfg(feature = "logging")]
        tracing::debug!("renamed {} -> {}", path.display(), target.display());
        Ok(busted.to_string_lossy().into_owned())
    }
}
