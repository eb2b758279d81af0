use std::path::PathBuf;

/// Everything a quiz session needs to know, decided once at startup
///
/// Built from CLI args and never touched again. No config file, no env vars -
/// if you want different settings, run it again with different flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    /// Directory to scan for files
    pub root: PathBuf,

    /// Lines shown above and below the target before the reveal
    pub context_radius: usize,

    /// Lines shown above and below the target after the reveal
    pub reveal_radius: usize,

    /// Just count eligible files and lines, no quiz
    pub line_count_only: bool,

    /// Play a single round and exit instead of looping forever
    pub run_once: bool,

    /// Wrap highlighted output in terminal color codes
    pub color: bool,

    /// Fixed base seed for reproducible sessions
    pub seed: Option<u64>,
}

pub fn default_root() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_context_radius() -> usize {
    1 // one line either side is already a decent hint
}

pub fn default_reveal_radius() -> usize {
    10
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            context_radius: default_context_radius(),
            reveal_radius: default_reveal_radius(),
            line_count_only: false,
            run_once: false,
            color: true,
            seed: None,
        }
    }
}
