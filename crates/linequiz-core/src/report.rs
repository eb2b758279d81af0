use crate::{enumerate::EligibleFiles, text::FileText};
use std::fmt;
use tracing::debug;

/// Totals for `--linecount` mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCount {
    pub files: usize,
    pub lines: usize,
}

impl LineCount {
    /// Sum lines over every eligible file. Files we can't read count as zero lines.
    pub fn tally(files: &EligibleFiles) -> Self {
        let lines = files
            .iter()
            .map(|path| match FileText::read(path) {
                Ok(text) => text.total_lines(),
                Err(e) => {
                    debug!("Counting {} as empty: {}", path.display(), e);
                    0
                }
            })
            .sum();

        Self {
            files: files.len(),
            lines,
        }
    }
}

impl fmt::Display for LineCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Eligible files: {}\nEligible lines: {}",
            self.files, self.lines
        )
    }
}
