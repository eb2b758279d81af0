// Core quiz logic - everything except talking to the terminal
pub mod config;
pub mod enumerate;
pub mod error;
pub mod render;
pub mod report;
pub mod sample;
pub mod text;

pub use config::QuizConfig;
pub use enumerate::{enumerate, EligibleFiles};
pub use error::Error;
pub use render::{render_file, render_text, ContextWindow, Highlight};
pub use report::LineCount;
pub use sample::{ClockSeed, FixedSeed, QuizRound, Sampler, SeedSource, MAX_LINE_ATTEMPTS};
pub use text::FileText;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
