// The quiz loop: prompt, wait, reveal, wait, repeat
use linequiz_core::{
    render_file, ContextWindow, EligibleFiles, Highlight, QuizConfig, QuizRound, Sampler,
    SeedSource,
};
use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const BANNER: &str = "Which file is this line from?";
const REVEAL_GATE: &str = "(press enter to reveal)";
const NEXT_GATE: &str = "(press enter for another one)";
const QUIT_GATE: &str = "(press enter to quit)";

/// What the player did at a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    /// stdin is gone - nobody's left to play
    Quit,
}

/// One interactive session over a fixed set of files
///
/// Generic over the streams so tests can script the player.
pub struct Session<'a, S, R, W, E>
where
    S: SeedSource,
    R: BufRead,
    W: Write,
    E: Write,
{
    config: &'a QuizConfig,
    files: &'a EligibleFiles,
    sampler: Sampler<S>,
    input: R,
    out: W,
    err: E,
    /// Files that failed since the last round that got played
    failed: HashSet<PathBuf>,
}

impl<'a, S, R, W, E> Session<'a, S, R, W, E>
where
    S: SeedSource,
    R: BufRead,
    W: Write,
    E: Write,
{
    pub fn new(
        config: &'a QuizConfig,
        files: &'a EligibleFiles,
        sampler: Sampler<S>,
        input: R,
        out: W,
        err: E,
    ) -> Self {
        Self {
            config,
            files,
            sampler,
            input,
            out,
            err,
            failed: HashSet::new(),
        }
    }

    /// Play until interrupted (or once, with `--once`)
    ///
    /// In loop mode a file that can't be read or has no lines just costs us a
    /// redraw, until every file has failed in a row. In single-shot mode it's
    /// fatal, since there's nothing else to show.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match self.play_round() {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Next) if self.config.run_once => return Ok(()),
                Ok(Flow::Next) => self.failed.clear(),
                Err(e) if !self.config.run_once && is_round_failure(&e) => {
                    warn!("Round abandoned: {}", e);
                    writeln!(self.err, "Skipping round: {}", e)?;
                    self.record_failure(&e)?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Give up once every eligible file has failed without a good round in between
    fn record_failure(&mut self, err: &anyhow::Error) -> anyhow::Result<()> {
        if let Some(path) = err
            .downcast_ref::<linequiz_core::Error>()
            .and_then(linequiz_core::Error::path)
        {
            self.failed.insert(path.to_path_buf());
        }

        if self.failed.len() >= self.files.len() {
            return Err(linequiz_core::Error::NothingToQuiz {
                files: self.files.len(),
            }
            .into());
        }
        Ok(())
    }

    fn play_round(&mut self) -> anyhow::Result<Flow> {
        let round = self.sampler.draw(self.files)?;
        debug!(
            "Round: {}:{} ({} draws)",
            round.path.display(),
            round.line_number,
            round.attempts
        );

        if self.prompt(&round)? == Flow::Quit {
            return Ok(Flow::Quit);
        }
        self.reveal(&round)
    }

    fn prompt(&mut self, round: &QuizRound) -> anyhow::Result<Flow> {
        let window = ContextWindow::around(
            round.line_number,
            self.config.context_radius,
            round.total_lines,
        )
        .with_highlight(self.highlight(Highlight::Hint));

        // Render before printing anything so a failed read leaves no half-shown round
        let lines = render_file(&round.path, &window)?;

        writeln!(self.out)?;
        writeln!(self.out, "{}", BANNER)?;
        writeln!(self.out)?;
        for line in &lines {
            writeln!(self.out, "{}", line)?;
        }
        writeln!(self.out)?;
        self.wait_for_enter(REVEAL_GATE)
    }

    fn reveal(&mut self, round: &QuizRound) -> anyhow::Result<Flow> {
        let window = ContextWindow::around(
            round.line_number,
            self.config.reveal_radius,
            round.total_lines,
        );
        let lines = render_file(&round.path, &window)?;

        let header = format!("{}:{}", round.path.display(), round.line_number);
        let header = match self.highlight(Highlight::Reveal) {
            Some(highlight) => highlight.paint(&header),
            None => header,
        };

        writeln!(self.out, "{}", header)?;
        writeln!(self.out)?;
        for line in &lines {
            writeln!(self.out, "{}", line)?;
        }
        writeln!(self.out)?;

        let gate = if self.config.run_once {
            QUIT_GATE
        } else {
            NEXT_GATE
        };
        self.wait_for_enter(gate)
    }

    /// Block until the player hits enter. Whatever they typed is ignored.
    fn wait_for_enter(&mut self, message: &str) -> anyhow::Result<Flow> {
        writeln!(self.out, "{}", message)?;
        self.out.flush()?;

        let mut discard = String::new();
        let read = self.input.read_line(&mut discard)?;
        if read == 0 {
            debug!("Input closed, ending session");
            return Ok(Flow::Quit);
        }
        Ok(Flow::Next)
    }

    fn highlight(&self, highlight: Highlight) -> Option<Highlight> {
        self.config.color.then_some(highlight)
    }
}

fn is_round_failure(err: &anyhow::Error) -> bool {
    err.downcast_ref::<linequiz_core::Error>()
        .is_some_and(linequiz_core::Error::is_round_failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use linequiz_core::FixedSeed;
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Played {
        result: anyhow::Result<()>,
        out: String,
        err: String,
    }

    fn play(config: &QuizConfig, paths: Vec<PathBuf>, input: &str) -> Played {
        play_with(config, paths, Cursor::new(input.as_bytes().to_vec()))
    }

    fn play_with<R: BufRead>(config: &QuizConfig, paths: Vec<PathBuf>, input: R) -> Played {
        let files = EligibleFiles::new(paths).unwrap();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = Session::new(
            config,
            &files,
            Sampler::new(FixedSeed::new(5)),
            input,
            &mut out,
            &mut err,
        )
        .run();

        Played {
            result,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        }
    }

    fn plain_config() -> QuizConfig {
        QuizConfig {
            color: false,
            ..QuizConfig::default()
        }
    }

    #[test]
    fn test_zero_radius_single_line_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("one.txt");
        fs::write(&path, "the only line\n").unwrap();

        let config = QuizConfig {
            context_radius: 0,
            reveal_radius: 0,
            run_once: true,
            ..plain_config()
        };
        let played = play(&config, vec![path.clone()], "\n\n");
        assert!(played.result.is_ok());

        let expected = format!(
            "\n{}\n\n1: the only line\n\n{}\n{}:1\n\n1: the only line\n\n{}\n",
            BANNER,
            REVEAL_GATE,
            path.display(),
            QUIT_GATE
        );
        assert_eq!(played.out, expected);
        assert!(played.err.is_empty());
    }

    #[test]
    fn test_context_and_reveal_windows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ten.txt");
        let content: String = (1..=10).map(|i| format!("row {}\n", i)).collect();
        fs::write(&path, content).unwrap();

        let config = QuizConfig {
            context_radius: 1,
            reveal_radius: 100,
            run_once: true,
            ..plain_config()
        };
        let played = play(&config, vec![path], "\n\n");
        assert!(played.result.is_ok());

        let (before, after) = played.out.split_once(REVEAL_GATE).unwrap();
        let hint_lines = before.lines().filter(|l| l.contains(": row ")).count();
        assert!((2..=3).contains(&hint_lines));

        // Reveal radius bigger than the file shows the whole thing
        let reveal_lines = after.lines().filter(|l| l.contains(": row ")).count();
        assert_eq!(reveal_lines, 10);
    }

    #[test]
    fn test_color_wraps_hint_and_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.txt");
        fs::write(&path, "colorful\n").unwrap();

        let config = QuizConfig {
            run_once: true,
            ..QuizConfig::default()
        };
        let played = play(&config, vec![path.clone()], "\n\n");
        assert!(played.result.is_ok());

        let hint = Highlight::Hint.paint("1: colorful");
        let header = Highlight::Reveal.paint(&format!("{}:1", path.display()));
        assert!(played.out.contains(&hint));
        assert!(played.out.contains(&header));
        // Body of the reveal stays plain
        assert!(played.out.contains("\n1: colorful\n"));
    }

    #[test]
    fn test_loop_runs_until_input_closes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loop.txt");
        fs::write(&path, "a\nb\nc\n").unwrap();

        // Two full rounds, then stdin dies at the third prompt
        let played = play(&plain_config(), vec![path], "\n\n\n\n");
        assert!(played.result.is_ok());
        assert_eq!(played.out.matches(BANNER).count(), 3);
        assert_eq!(played.out.matches(NEXT_GATE).count(), 2);
    }

    #[test]
    fn test_loop_skips_unreadable_files() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.txt");
        fs::write(&good, "still here\n").unwrap();
        let gone = dir.path().join("gone.txt");

        let input = "\n".repeat(40);
        let played = play(&plain_config(), vec![gone, good.clone()], &input);
        assert!(played.result.is_ok());
        assert!(played.err.contains("Skipping round"));
        assert!(played.out.contains(&format!("{}:1", good.display())));
    }

    #[test]
    fn test_loop_gives_up_when_no_file_is_playable() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("__init__.py");
        fs::write(&empty, "").unwrap();
        let unterminated = dir.path().join("b.txt");
        fs::write(&unterminated, "no newline").unwrap();

        let played = play(&plain_config(), vec![empty, unterminated], "");
        let err = played.result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<linequiz_core::Error>(),
            Some(linequiz_core::Error::NothingToQuiz { files: 2 })
        ));
        assert!(played.out.is_empty());
        assert!(played.err.contains("Skipping round"));
    }

    /// Input that deletes a file the first time the session waits on it
    struct DeletesOnRead {
        inner: Cursor<Vec<u8>>,
        doomed: Option<PathBuf>,
    }

    impl std::io::Read for DeletesOnRead {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.fill_buf()?;
            std::io::Read::read(&mut self.inner, buf)
        }
    }

    impl BufRead for DeletesOnRead {
        fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
            if let Some(path) = self.doomed.take() {
                fs::remove_file(path)?;
            }
            self.inner.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            self.inner.consume(amt)
        }
    }

    #[test]
    fn test_file_deleted_before_reveal_skips_round() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fleeting.txt");
        fs::write(&path, "now you see me
").unwrap();

        let input = DeletesOnRead {
            inner: Cursor::new(b"\n\n\n".to_vec()),
            doomed: Some(path.clone()),
        };
        let played = play_with(&plain_config(), vec![path.clone()], input);

        // The prompt made it out, the reveal didn't
        assert_eq!(played.out.matches(BANNER).count(), 1);
        assert!(played.out.contains("1: now you see me"));
        assert!(!played.out.contains(&format!("{}:1", path.display())));
        assert!(played
            .err
            .contains(&format!("Skipping round: Could not read {}", path.display())));

        // Only file is gone now, so the session ends
        let err = played.result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<linequiz_core::Error>(),
            Some(linequiz_core::Error::NothingToQuiz { files: 1 })
        ));
    }

    #[test]
    fn test_single_shot_read_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty.txt");
        fs::write(&empty, "").unwrap();

        let config = QuizConfig {
            run_once: true,
            ..plain_config()
        };
        let played = play(&config, vec![empty], "\n\n");
        let err = played.result.unwrap_err();
        assert!(is_round_failure(&err));
        assert!(played.out.is_empty());
    }

    #[test]
    fn test_round_failure_detection() {
        let io = anyhow::Error::from(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert!(!is_round_failure(&io));

        let fatal = anyhow::Error::from(linequiz_core::Error::NoEligibleFiles {
            root: PathBuf::from("."),
        });
        assert!(!is_round_failure(&fatal));
    }
}
