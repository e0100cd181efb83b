use std::collections::BTreeSet;
use std::ffi::OsStr;

/// Entry names that are skipped during traversal, together with their
/// subtrees when they name a directory.
///
/// `.` and `..` are always present. Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blacklist {
    names: BTreeSet<String>,
}

impl Default for Blacklist {
    fn default() -> Self {
        Self {
            names: [".", ".."].into_iter().map(String::from).collect(),
        }
    }
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from comma-separated tokens such as `"node_modules,.git"`.
    pub fn from_tokens<I, S>(lists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut blacklist = Self::default();
        for list in lists {
            blacklist.add_tokens(list.as_ref());
        }
        blacklist
    }

    /// Adds every non-empty, trimmed token of a comma-separated list.
    pub fn add_tokens(&mut self, list: &str) {
        self.names.extend(
            list.split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(String::from),
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Tests a directory entry name. Names that are not valid UTF-8 are
    /// compared in their lossy form.
    pub fn matches(&self, name: &OsStr) -> bool {
        match name.to_str() {
            Some(name) => self.contains(name),
            None => self.contains(&name.to_string_lossy()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
