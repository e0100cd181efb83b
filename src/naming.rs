//! Filename and path helpers used to build asset records.
//!
//! These work on plain strings so the rules are easy to reason about: the
//! extension is whatever follows the last `.` of the file name, unless that
//! dot is the first character (dotfiles have no extension).

use std::path::is_separator;

/// Returns the last segment of `path`, or the whole input when it contains
/// no separator.
pub fn file_name(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(index) => &path[index + 1..],
        None => path,
    }
}

/// Returns the extension of `filename` without its dot.
///
/// ```
/// use assets::naming::extension;
///
/// assert_eq!(extension("archive.tar.gz"), "gz");
/// assert_eq!(extension("README"), "");
/// assert_eq!(extension(".gitignore"), "");
/// ```
pub fn extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(0) | None => "",
        Some(index) => &filename[index + 1..],
    }
}

pub fn key(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(0) | None => filename,
        Some(index) => &filename[..index],
    }
}

/// Returns the prefix of `path` up to and including its last separator.
///
/// A path without any separator is returned unchanged.
pub fn directory_of(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(index) => &path[..=index],
        None => path,
    }
}

pub fn cachebust_filename(key: &str, hash: &str, extension: &str) -> String {
    let mut name = String::with_capacity(key.len() + hash.len() + extension.len() + 2);
    name.push_str(key);
    name.push('.');
    name.push_str(hash);
    if !extension.is_empty() {
        name.push('.');
        name.push_str(extension);
    }
    name
}
