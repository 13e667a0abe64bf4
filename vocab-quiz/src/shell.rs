use std::io::{self, BufRead, Write};

use quiz_scheduler::{Progress, Scheduler};
use rand::Rng;

use crate::grading::{Grader, GradingChain, VerdictSource};

/// Line-oriented terminal I/O.
pub struct Console<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, clear_screen: bool) -> Self {
        Self {
            input,
            output,
            clear_screen,
        }
    }

    pub fn clear(&mut self) -> io::Result<()> {
        if self.clear_screen {
            // Erase the screen and move the cursor home
            write!(self.output, "\x1B[2J\x1B[H")?;
        }
        Ok(())
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Prompt and read one line. `None` once input is exhausted.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn ask_yes_no(&mut self, prompt: &str) -> io::Result<Option<bool>> {
        Ok(self
            .read_line(prompt)?
            .map(|reply| matches!(reply.to_lowercase().as_str(), "y" | "yes")))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub progress: Progress,
    pub rounds: u64,
    pub completed: bool,
}

fn stopped_early<Rg>(scheduler: &Scheduler<Rg>, rounds: u64) -> SessionSummary {
    SessionSummary {
        progress: scheduler.progress(),
        rounds,
        completed: false,
    }
}

/// Ask words until every word is mastered or input runs out.
pub async fn run_session<Rg, G, R, W>(
    scheduler: &mut Scheduler<Rg>,
    grading: &GradingChain<G>,
    console: &mut Console<R, W>,
) -> anyhow::Result<SessionSummary>
where
    Rg: Rng,
    G: Grader,
    R: BufRead,
    W: Write,
{
    let mut rounds = 0;

    while !scheduler.is_complete() {
        console.clear()?;

        let progress = scheduler.progress();
        let entity = scheduler.select_next()?;
        let word = entity.word().to_string();
        let reference = entity.reference_answer().to_string();

        console.say(&format!("Progress: {progress} words mastered\n"))?;
        console.say(&format!("Arabic: {word}"))?;
        console.say("---")?;

        let Some(answer) = console.read_line("Your translation: ")? else {
            return Ok(stopped_early(&*scheduler, rounds));
        };

        let Some(verdict) = grading
            .verdict(&word, &reference, &answer, console)
            .await?
        else {
            return Ok(stopped_early(&*scheduler, rounds));
        };
        rounds += 1;

        if verdict.source == VerdictSource::Model {
            let judgement = if verdict.correct {
                "Correct"
            } else {
                "Incorrect"
            };
            console.say(&format!("AI tutor says: {judgement}"))?;
        }

        let outcome = scheduler.record_verdict(&word, verdict.correct)?;
        if verdict.correct {
            console.say(&format!(
                "Great! '{word}' answered correctly {} times.",
                outcome.snapshot.correct_streak
            ))?;
        } else {
            console.say(&format!(
                "Don't give up, the reference answer is '{reference}'. Keep practicing!"
            ))?;
        }
        if outcome.newly_mastered {
            console.say(&format!("Congratulations! '{word}' is mastered!"))?;
        }

        if !outcome.session_complete
            && console
                .read_line("\n--- Press Enter for the next word ---")?
                .is_none()
        {
            return Ok(stopped_early(&*scheduler, rounds));
        }
    }

    console.say("\n🎉 Congratulations! You have mastered every word in this session! 🎉")?;
    Ok(SessionSummary {
        progress: scheduler.progress(),
        rounds,
        completed: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_line_trims_and_detects_eof() {
        let mut console = Console::new("  book \n".as_bytes(), Vec::new(), false);
        assert_eq!(console.read_line("> ").unwrap(), Some("book".to_string()));
        assert_eq!(console.read_line("> ").unwrap(), None);
        assert_eq!(String::from_utf8(console.into_output()).unwrap(), "> > ");
    }

    #[test]
    fn test_ask_yes_no() {
        let mut console = Console::new("Y\nyes\nn\nwhatever\n".as_bytes(), Vec::new(), false);
        assert_eq!(console.ask_yes_no("?").unwrap(), Some(true));
        assert_eq!(console.ask_yes_no("?").unwrap(), Some(true));
        assert_eq!(console.ask_yes_no("?").unwrap(), Some(false));
        assert_eq!(console.ask_yes_no("?").unwrap(), Some(false));
        assert_eq!(console.ask_yes_no("?").unwrap(), None);
    }

    #[test]
    fn test_clear_screen_is_optional() {
        let mut console = Console::new("".as_bytes(), Vec::new(), true);
        console.clear().unwrap();
        assert_eq!(console.into_output(), b"\x1B[2J\x1B[H");

        let mut console = Console::new("".as_bytes(), Vec::new(), false);
        console.clear().unwrap();
        assert!(console.into_output().is_empty());
    }
}
