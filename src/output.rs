//! Streaming manifest output.
//!
//! [`ManifestEmitter`] writes a JSON array one record at a time: `[` when
//! opened, a `,` before every record but the first, `]` when closed. Nothing
//! is buffered between records, so memory use does not grow with the tree.

use crate::error::AssetsError;
use crate::types::AssetRecord;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Destination for manifest text.
pub trait ManifestSink {
    /// Discards anything previously written. Called once before `[`.
    fn reset(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn append(&mut self, chunk: &str) -> io::Result<()>;

    fn describe(&self) -> String;
}

#[derive(Debug, Default)]
pub struct StdoutSink;

impl ManifestSink for StdoutSink {
    fn append(&mut self, chunk: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(chunk.as_bytes())?;
        handle.flush()
    }

    fn describe(&self) -> String {
        "<stdout>".to_string()
    }
}

/// Writes to a file, opening and closing it around every chunk so an aborted
/// run leaves a readable prefix behind.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ManifestSink for FileSink {
    fn reset(&mut self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn append(&mut self, chunk: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(chunk.as_bytes())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl ManifestSink for Vec<u8> {
    fn reset(&mut self) -> io::Result<()> {
        self.clear();
        Ok(())
    }

    fn append(&mut self, chunk: &str) -> io::Result<()> {
        self.extend_from_slice(chunk.as_bytes());
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

pub struct ManifestEmitter<S: ManifestSink> {
    sink: S,
    has_emitted_first: bool,
}

impl<S: ManifestSink> ManifestEmitter<S> {
    /// Resets `sink` and writes the opening bracket.
    pub fn open(mut sink: S) -> Result<Self, AssetsError> {
        sink.reset().map_err(|e| output_error(&sink, e))?;
        let mut emitter = Self {
            sink,
            has_emitted_first: false,
        };
        emitter.write("[")?;
        Ok(emitter)
    }

    pub fn emit(&mut self, record: &AssetRecord) -> Result<(), AssetsError> {
        let json = serde_json::to_string(record)?;
        let chunk = if self.has_emitted_first {
            format!(",{}", json)
        } else {
            json
        };
        self.write(&chunk)?;
        self.has_emitted_first = true;
        Ok(())
    }

    /// Writes the closing bracket and hands the sink back.
    pub fn close(mut self) -> Result<S, AssetsError> {
        self.write("]")?;
        Ok(self.sink)
    }

    fn write(&mut self, chunk: &str) -> Result<(), AssetsError> {
        self.sink
            .append(chunk)
            .map_err(|e| output_error(&self.sink, e))
    }
}

fn output_error<S: ManifestSink>(sink: &S, source: io::Error) -> AssetsError {
    AssetsError::Output {
        destination: sink.describe(),
        source,
    }
}
