// Numbered line rendering with optional color
use crate::{text::FileText, Result};
use crossterm::style::{Color, Stylize};
use std::path::Path;

/// Which phase a highlighted block belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// The pre-reveal snippet the player has to place
    Hint,
    /// The "path:line" header shown on reveal
    Reveal,
}

impl Highlight {
    pub fn color(&self) -> Color {
        match self {
            Highlight::Hint => Color::Yellow,
            Highlight::Reveal => Color::Green,
        }
    }

    /// Wrap `text` in this highlight's color start/reset pair
    pub fn paint(&self, text: &str) -> String {
        text.with(self.color()).to_string()
    }
}

/// A slice of a file around a target line
///
/// Purely a view: `from` and `to` are 1-based, inclusive and already clamped to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    pub from: usize,
    pub to: usize,
    /// Number printed next to the `from` line
    pub offset: usize,
    pub highlight: Option<Highlight>,
}

impl ContextWindow {
    /// `radius` lines either side of `target`, clamped to `[1, total_lines]`
    pub fn around(target: usize, radius: usize, total_lines: usize) -> Self {
        let from = target.saturating_sub(radius).max(1);
        let to = target.saturating_add(radius).min(total_lines);
        Self {
            from,
            to,
            offset: from,
            highlight: None,
        }
    }

    pub fn with_highlight(mut self, highlight: Option<Highlight>) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn len(&self) -> usize {
        (self.to + 1).saturating_sub(self.from)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Render `window` from text we already have in memory
///
/// One `"<n>: <line>"` entry per line, each wrapped in color codes when highlighted.
pub fn render_text(text: &FileText, window: &ContextWindow) -> Vec<String> {
    text.range(window.from, window.to)
        .map(|(number, line)| {
            let shown = window.offset + (number - window.from);
            let rendered = format!("{}: {}", shown, line);
            match window.highlight {
                Some(highlight) => highlight.paint(&rendered),
                None => rendered,
            }
        })
        .collect()
}

/// Render `window` straight from disk
///
/// Reads the file every call - the pre-reveal and reveal renders are separate passes.
pub fn render_file(path: &Path, window: &ContextWindow) -> Result<Vec<String>> {
    let text = FileText::read(path)?;
    Ok(render_text(&text, window))
}
