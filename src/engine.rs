use crate::blacklist::Blacklist;
use crate::describe::FileDescriber;
use crate::digest::{ContentEncoder, ContentHasher, tools_for};
use crate::error::AssetsError;
use crate::options::AssetsOptions;
use crate::output::{FileSink, ManifestEmitter, ManifestSink, StdoutSink};
use crate::types::CatalogSummary;
use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Depth-first walk over a tree, yielding every entry below the root that
/// survives the blacklist.
///
/// Each directory is listed in full and sorted by name before its entries are
/// yielded, so renaming a file while the walk is inside its directory cannot
/// make it show up twice.
struct Walker {
    inner: ignore::Walk,
    blacklist: Blacklist,
}

impl Walker {
    fn new(root: &Path, blacklist: &Blacklist) -> Self {
        let filter = blacklist.clone();
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| !filter.matches(entry.file_name()));
        Self {
            inner: builder.build(),
            blacklist: blacklist.clone(),
        }
    }

    // Errors are yielded before `filter_entry` sees the entry, so a
    // blacklisted name that cannot be stat'ed has to be dropped here.
    fn walk_error(&self, err: ignore::Error) -> Result<Visit, AssetsError> {
        let message = err.to_string();
        let path = error_path(&err).map(Path::to_path_buf);
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other(message));
        let Some(path) = path else {
            return Err(AssetsError::metadata(PathBuf::new(), source));
        };
        if path
            .file_name()
            .is_some_and(|name| self.blacklist.matches(name))
        {
            #[cfg(feature = "logging")]
            tracing::debug!("skipping ignored entry {}", path.display());
            return Ok(Visit::Skip);
        }
        let link = fs::symlink_metadata(&path);
        if source.kind() == io::ErrorKind::NotFound
            && link.as_ref().is_ok_and(|m| m.file_type().is_symlink())
        {
            #[cfg(feature = "logging")]
            tracing::debug!("skipping dangling symlink {}", path.display());
            return Ok(Visit::Skip);
        }
        if link.is_ok_and(|m| m.is_dir()) {
            Err(AssetsError::directory_open(path, source))
        } else {
            Err(AssetsError::metadata(path, source))
        }
    }
}

enum Visit {
    File { path: PathBuf, size: u64 },
    Skip,
}

impl Iterator for Walker {
    type Item = Result<Visit, AssetsError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        Some(match result {
            Ok(entry) if entry.depth() == 0 => Ok(Visit::Skip),
            Ok(entry) => classify(entry),
            Err(err) => self.walk_error(err),
        })
    }
}

fn classify(entry: ignore::DirEntry) -> Result<Visit, AssetsError> {
    let metadata = entry.metadata().map_err(|e| {
        let source = e
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("metadata unavailable"));
        AssetsError::metadata(entry.path(), source)
    })?;
    if metadata.is_file() {
        return Ok(Visit::File {
            path: entry.into_path(),
            size: metadata.len(),
        });
    }
    #[cfg(feature = "logging")]
    if !metadata.is_dir() {
        tracing::debug!("skipping non-regular entry {}", entry.path().display());
    }
    Ok(Visit::Skip)
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::Loop { child, .. } => Some(child),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}

/// Catalogues `options.root`, writing the manifest to `options.output` or to
/// standard output.
pub fn catalog(options: AssetsOptions) -> Result<CatalogSummary, AssetsError> {
    match options.output.clone() {
        Some(path) => catalog_to(&options, FileSink::new(path)).map(|(summary, _)| summary),
        None => catalog_to(&options, StdoutSink).map(|(summary, _)| summary),
    }
}

/// The sink is returned once the closing bracket has been written.
pub fn catalog_to<S: ManifestSink>(
    options: &AssetsOptions,
    sink: S,
) -> Result<(CatalogSummary, S), AssetsError> {
    let (hasher, encoder) = tools_for(options.tools);
    catalog_with(options, sink, hasher.as_ref(), encoder.as_ref())
}

pub fn catalog_with<S: ManifestSink>(
    options: &AssetsOptions,
    sink: S,
    hasher: &dyn ContentHasher,
    encoder: &dyn ContentEncoder,
) -> Result<(CatalogSummary, S), AssetsError> {
    let root = resolve_root(&options.root)?;
    let blacklist = Blacklist::from_tokens(&options.ignore);
    let manifest_path = options.output.as_deref().and_then(absolute_output);
    #[cfg(feature = "logging")]
    tracing::debug!(
        "cataloguing {} (cachebust: {}, base64 threshold: {}, ignoring: {:?})",
        root.display(),
        options.traversal.cachebust,
        options.traversal.base64_threshold,
        blacklist.iter().collect::<Vec<_>>()
    );

    let describer = FileDescriber::new(options.traversal, hasher, encoder);
    let mut emitter = ManifestEmitter::open(sink)?;
    let mut summary = CatalogSummary::default();

    for visit in Walker::new(&root, &blacklist) {
        let (path, size) = match visit? {
            Visit::File { path, size } => (path, size),
            Visit::Skip => continue,
        };
        if manifest_path.as_deref() == Some(path.as_path()) {
            #[cfg(feature = "logging")]
            tracing::debug!("skipping manifest output {}", path.display());
            continue;
        }
        let record = describer.describe(&path, size)?;
        emitter.emit(&record)?;
        summary.files += 1;
        if record.base64_payload.is_some() {
            summary.encoded += 1;
        }
        if options.traversal.cachebust && !record.content_hash.is_empty() {
            summary.renamed += 1;
        }
    }

    let sink = emitter.close()?;
    #[cfg(feature = "logging")]
    tracing::info!(
        "catalogued {} files ({} base64-encoded, {} renamed)",
        summary.files,
        summary.encoded,
        summary.renamed
    );
    Ok((summary, sink))
}

fn resolve_root(root: &Path) -> Result<PathBuf, AssetsError> {
    let resolved = fs::canonicalize(root).map_err(|e| AssetsError::directory_open(root, e))?;
    let metadata = fs::metadata(&resolved).map_err(|e| AssetsError::directory_open(&resolved, e))?;
    if !metadata.is_dir() {
        return Err(AssetsError::directory_open(
            resolved,
            io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        ));
    }
    Ok(resolved)
}

/// Absolute form of the manifest path, with its parent resolved the same way
/// the root is, so it compares equal to the walker's path for that file.
fn absolute_output(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    let name = absolute.file_name()?;
    let parent = fs::canonicalize(absolute.parent()?).ok()?;
    Some(parent.join(name))
}
