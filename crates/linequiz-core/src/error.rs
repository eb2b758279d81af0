use std::path::{Path, PathBuf};
use thiserror::Error;

/// All the ways a quiz can go wrong
///
/// Same deal as everywhere else: thiserror writes the Display impls so we don't have to.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No eligible files found under {}", .root.display())]
    NoEligibleFiles { root: PathBuf },

    #[error("{} has no lines to quiz on", .path.display())]
    EmptyFile { path: PathBuf },

    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("None of the {files} eligible files has a line to quiz on")]
    NothingToQuiz { files: usize },
}

impl Error {
    /// Errors that only spoil the current round.
    ///
    /// The looping session shrugs these off and draws again; anything else ends the session.
    pub fn is_round_failure(&self) -> bool {
        matches!(self, Error::EmptyFile { .. } | Error::Read { .. })
    }

    /// The file a round failure is about
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::EmptyFile { path } | Error::Read { path, .. } => Some(path),
            Error::NoEligibleFiles { .. } | Error::NothingToQuiz { .. } => None,
        }
    }
}
