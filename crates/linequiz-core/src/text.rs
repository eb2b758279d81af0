// Reading files as numbered lines
use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// A file's contents plus its line count
///
/// Lines are counted like `wc -l` does: one per newline. A trailing fragment
/// with no newline after it doesn't count, and a file with zero newlines has
/// nothing to quiz on.
#[derive(Debug, Clone)]
pub struct FileText {
    content: String,
    total_lines: usize,
}

impl FileText {
    /// Read a file fresh from disk. Invalid UTF-8 gets replaced, not rejected.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_content(String::from_utf8_lossy(&bytes).into_owned()))
    }

    pub fn from_content(content: impl Into<String>) -> Self {
        let content = content.into();
        let total_lines = count_lines(&content);
        Self {
            content,
            total_lines,
        }
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// 1-based line lookup, `None` outside `[1, total_lines]`
    pub fn line(&self, number: usize) -> Option<&str> {
        if number == 0 || number > self.total_lines {
            return None;
        }
        self.content.lines().nth(number - 1)
    }

    /// Lines `from..=to` (1-based), paired with their numbers
    pub fn range(&self, from: usize, to: usize) -> impl Iterator<Item = (usize, &str)> {
        let from = from.max(1);
        let to = to.min(self.total_lines);
        self.content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .skip(from - 1)
            .take((to + 1).saturating_sub(from))
    }
}

/// Count newline characters - the same number `wc -l` reports
pub fn count_lines(content: &str) -> usize {
    content.bytes().filter(|&b| b == b'\n').count()
}
