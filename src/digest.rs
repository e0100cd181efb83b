//! Content hash and base64 collaborators.
//!
//! The describer only sees the [`ContentHasher`] and [`ContentEncoder`]
//! traits. The native implementations compute everything in-process; the
//! external ones run `md5sum` and `base64` as child processes.

use crate::error::AssetsError;
use crate::options::ToolBackend;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use md5::{Digest, Md5};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::process::Command;

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Computes a hex digest of the bytes stored at a path.
pub trait ContentHasher {
    fn digest(&self, path: &Path) -> Result<String, AssetsError>;
}

/// Computes the unwrapped base64 encoding of the bytes stored at a path.
pub trait ContentEncoder {
    fn encode(&self, path: &Path) -> Result<String, AssetsError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeMd5;

impl ContentHasher for NativeMd5 {
    fn digest(&self, path: &Path) -> Result<String, AssetsError> {
        let file = File::open(path).map_err(|e| AssetsError::tool("md5", path, e))?;
        let mut reader = BufReader::with_capacity(READ_CHUNK_SIZE, file);
        let mut hasher = Md5::new();
        let mut buffer = vec![0u8; READ_CHUNK_SIZE];
        loop {
            let n = reader
                .read(&mut buffer)
                .map_err(|e| AssetsError::tool("md5", path, e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBase64;

impl ContentEncoder for NativeBase64 {
    fn encode(&self, path: &Path) -> Result<String, AssetsError> {
        let bytes = std::fs::read(path).map_err(|e| AssetsError::tool("base64", path, e))?;
        Ok(STANDARD.encode(bytes))
    }
}

/// Runs `md5sum <path>` and keeps the first whitespace-separated token.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalMd5;

impl ContentHasher for ExternalMd5 {
    fn digest(&self, path: &Path) -> Result<String, AssetsError> {
        let stdout = run_tool("md5sum", &[], path)?;
        stdout
            .split_whitespace()
            .next()
            .map(String::from)
            .ok_or_else(|| AssetsError::tool("md5sum", path, "no digest in output"))
    }
}

/// Runs `base64 --wrap=0 <path>` and strips trailing whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalBase64;

impl ContentEncoder for ExternalBase64 {
    fn encode(&self, path: &Path) -> Result<String, AssetsError> {
        let stdout = run_tool("base64", &["--wrap=0"], path)?;
        Ok(stdout.trim_end().to_string())
    }
}

fn run_tool(program: &'static str, args: &[&str], path: &Path) -> Result<String, AssetsError> {
    let output = Command::new(program)
        .args(args)
        .arg(path)
        .output()
        .map_err(|e| AssetsError::tool(program, path, e))?;
    if !output.status.success() {
        return Err(AssetsError::tool(
            program,
            path,
            format!("exited with {}", output.status),
        ));
    }
    String::from_utf8(output.stdout).map_err(|e| AssetsError::tool(program, path, e))
}

/// Returns the hasher and encoder pair for `backend`.
pub fn tools_for(backend: ToolBackend) -> (Box<dyn ContentHasher>, Box<dyn ContentEncoder>) {
    match backend {
        ToolBackend::Native => (Box::new(NativeMd5), Box::new(NativeBase64)),
        ToolBackend::External => (Box::new(ExternalMd5), Box::new(ExternalBase64)),
    }
}
