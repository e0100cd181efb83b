//! # Assets
//!
//! `assets` walks a directory tree and writes a JSON array describing every
//! regular file it finds: key, directory, filename, extension and content
//! hash, plus an optional base64 copy of small files. With cache-busting
//! enabled each file is first renamed to embed its hash in the name.
//!
//! Records are streamed to the output as they are discovered, so the manifest
//! is never held in memory.
//!
//! # Features
//!
//! - `logging` (default): emits diagnostics through the `tracing` crate.
//!
//! # Example
//!
//! ```no_run
//! use assets::{AssetsBuilder, catalog};
//!
//! let options = AssetsBuilder::new("public")
//!     .output(Some("assets.json".into()))
//!     .base64_threshold(4 * 1024)
//!     .ignore(vec![".git,node_modules".into()])
//!     .build();
//!
//! let summary = catalog(options).expect("Failed to catalogue assets");
//! println!("{} files", summary.files);
//! ```

mod blacklist;
mod describe;
pub mod digest;
mod engine;
mod error;
pub mod naming;
mod options;
pub mod output;
mod types;

pub use blacklist::Blacklist;
pub use describe::FileDescriber;
pub use digest::{ContentEncoder, ContentHasher};
pub use engine::{catalog, catalog_to, catalog_with};
pub use error::AssetsError;
pub use options::{AssetsBuilder, AssetsOptions, ToolBackend, TraversalConfig};
pub use output::{ManifestEmitter, ManifestSink};
pub use types::{AssetRecord, CatalogSummary};
