// Picking a file and a line for each round
use crate::{enumerate::EligibleFiles, text::FileText, Error, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// How many line draws we make before settling for a blank line
pub const MAX_LINE_ATTEMPTS: u32 = 15;

/// Hands out a fresh seed for every round
///
/// Trait so tests (and `--seed`) can swap the clock for something predictable.
#[cfg_attr(test, mockall::automock)]
pub trait SeedSource {
    fn next_seed(&mut self) -> u64;
}

/// Seeds from the process id and the wall clock
#[derive(Debug)]
pub struct ClockSeed {
    pid: u32,
    rounds: u64,
}

impl ClockSeed {
    pub fn new() -> Self {
        Self {
            pid: std::process::id(),
            rounds: 0,
        }
    }
}

impl Default for ClockSeed {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedSource for ClockSeed {
    fn next_seed(&mut self) -> u64 {
        // Nanoseconds when the clock has them, whole seconds when it doesn't
        let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) if elapsed.subsec_nanos() != 0 => elapsed.as_nanos() as u64,
            Ok(elapsed) => elapsed.as_secs(),
            Err(_) => 0,
        };
        self.rounds += 1;

        // The round counter keeps two rounds inside one clock tick apart
        stamp ^ (u64::from(self.pid) << 32) ^ self.rounds.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

/// Deterministic seeds: base, base + 1, base + 2, ...
#[derive(Debug, Clone)]
pub struct FixedSeed {
    base: u64,
    rounds: u64,
}

impl FixedSeed {
    pub fn new(base: u64) -> Self {
        Self { base, rounds: 0 }
    }
}

impl SeedSource for FixedSeed {
    fn next_seed(&mut self) -> u64 {
        let seed = self.base.wrapping_add(self.rounds);
        self.rounds += 1;
        seed
    }
}

/// One question: where does this line live?
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRound {
    pub path: PathBuf,
    pub total_lines: usize,
    /// 1-based, always within `[1, total_lines]`
    pub line_number: usize,
    pub line: String,
    /// Line draws it took, at most `MAX_LINE_ATTEMPTS`
    pub attempts: u32,
}

/// Result of drawing a line from a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePick {
    pub number: usize,
    pub text: String,
    pub attempts: u32,
}

/// Draw a line uniformly from `text`, redrawing blanks
///
/// Every attempt reseeds from `seed` and the attempt number so a blank line doesn't
/// just come back.
/// If all attempts land on blanks we keep the last one - good enough.
/// `None` only when the file has no lines at all.
pub fn pick_line(text: &FileText, seed: u64) -> Option<LinePick> {
    let total = text.total_lines();
    if total == 0 {
        return None;
    }

    let mut pick = None;
    for attempt in 1..=MAX_LINE_ATTEMPTS {
        let mut rng = StdRng::seed_from_u64(attempt_seed(seed, attempt));
        let number = rng.gen_range(1..=total);
        let line = text.line(number).unwrap_or_default();
        let blank = line.trim().is_empty();

        pick = Some(LinePick {
            number,
            text: line.to_string(),
            attempts: attempt,
        });

        if !blank {
            break;
        }
        debug!("Line {} is blank, redrawing (attempt {})", number, attempt);
    }

    pick
}

// Mixed rather than added, so with `FixedSeed` attempt k never replays round r+k's seed
fn attempt_seed(seed: u64, attempt: u32) -> u64 {
    seed ^ u64::from(attempt).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// The per-round random picker
///
/// Uniform over files first, then uniform over lines in that file. Short files
/// come up as often as long ones, on purpose.
pub struct Sampler<S: SeedSource> {
    seeds: S,
}

impl<S: SeedSource> Sampler<S> {
    pub fn new(seeds: S) -> Self {
        Self { seeds }
    }

    /// Draw a fresh round. Read errors and empty files come back as round failures.
    pub fn draw(&mut self, files: &EligibleFiles) -> Result<QuizRound> {
        let seed = self.seeds.next_seed();
        let mut rng = StdRng::seed_from_u64(seed);
        let path = files.pick(&mut rng).to_path_buf();
        debug!("Round seed {} picked {}", seed, path.display());

        let text = FileText::read(&path)?;
        let pick = match pick_line(&text, seed) {
            Some(pick) => pick,
            None => return Err(Error::EmptyFile { path }),
        };

        Ok(QuizRound {
            path,
            total_lines: text.total_lines(),
            line_number: pick.number,
            line: pick.text,
            attempts: pick.attempts,
        })
    }
}
