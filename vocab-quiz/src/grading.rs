use std::future::Future;
use std::io::{BufRead, Write};
use std::time::Duration;

use language_utils::Language;
use language_utils::text_cleanup::matches_reference;

use crate::shell::Console;

#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    #[error("Grading request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Grading service response has no verdict")]
    MalformedResponse,
    #[error("Unrecognized verdict from grading service: {0:?}")]
    UnrecognizedVerdict(String),
}

const MANUAL_PROMPT: &str = "Please judge manually whether the answer is correct (y/n): ";

/// Decides whether a free-text answer is an acceptable translation.
pub trait Grader {
    fn grade(
        &self,
        word: &str,
        reference: &str,
        answer: &str,
    ) -> impl Future<Output = Result<bool, GradeError>> + Send;
}

/// Where a verdict came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerdictSource {
    ExactMatch,
    Model,
    Manual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    pub source: VerdictSource,
}

#[derive(serde::Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(serde::Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Grades answers with a model served by a local Ollama instance.
pub struct OllamaGrader {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaGrader {
    pub const DEFAULT_ENDPOINT: &'static str = "http://localhost:11434/api/generate";
    pub const DEFAULT_MODEL: &'static str = "gemma:2b";

    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GradeError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
        })
    }
}

pub fn grading_prompt(word: &str, reference: &str, answer: &str) -> String {
    format!(
        "You are a strict but fair language tutor.\n\
         A user was shown the Arabic word \"{word}\".\n\
         The correct translation is \"{reference}\".\n\
         The user answered with \"{answer}\".\n\
         Is the user's answer a correct translation, a valid synonym, or semantically close enough to be considered correct?\n\
         Please respond with only a single word: \"Correct\" or \"Incorrect\".\n"
    )
}

/// Read the verdict from the first word of a model reply.
pub fn parse_verdict(reply: &str) -> Result<bool, GradeError> {
    let first_word = reply
        .split_whitespace()
        .next()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .map(str::to_lowercase)
        .unwrap_or_default();

    match first_word.as_str() {
        "correct" => Ok(true),
        "incorrect" => Ok(false),
        _ => Err(GradeError::UnrecognizedVerdict(reply.trim().to_string())),
    }
}

impl Grader for OllamaGrader {
    async fn grade(&self, word: &str, reference: &str, answer: &str) -> Result<bool, GradeError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: grading_prompt(word, reference, answer),
            stream: false,
        };

        let response: GenerateResponse = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let reply = response.response.ok_or(GradeError::MalformedResponse)?;
        log::debug!("Model reply for '{word}': {reply:?}");
        parse_verdict(&reply)
    }
}

/// Exact match first, then the model if there is one, then the learner.
pub struct GradingChain<G> {
    model: Option<G>,
    language: Language,
}

impl<G: Grader> GradingChain<G> {
    pub fn new(model: Option<G>, language: Language) -> Self {
        Self { model, language }
    }

    /// Returns `None` if input ended while asking for manual confirmation.
    pub async fn verdict<R: BufRead, W: Write>(
        &self,
        word: &str,
        reference: &str,
        answer: &str,
        console: &mut Console<R, W>,
    ) -> std::io::Result<Option<Verdict>> {
        if matches_reference(answer, reference, self.language) {
            return Ok(Some(Verdict {
                correct: true,
                source: VerdictSource::ExactMatch,
            }));
        }

        if let Some(model) = &self.model {
            match model.grade(word, reference, answer).await {
                Ok(correct) => {
                    return Ok(Some(Verdict {
                        correct,
                        source: VerdictSource::Model,
                    }));
                }
                Err(e) => {
                    log::warn!("Falling back to manual grading: {e}");
                    console.say(&format!("\nCould not get a verdict from the AI tutor: {e}"))?;
                }
            }
        }

        console.say(&format!("Reference answer: {reference}"))?;
        let correct = console.ask_yes_no(MANUAL_PROMPT)?;
        Ok(correct.map(|correct| Verdict {
            correct,
            source: VerdictSource::Manual,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verdict() {
        assert!(parse_verdict("Correct").unwrap());
        assert!(parse_verdict("  **Correct.**\n").unwrap());
        assert!(!parse_verdict("Incorrect").unwrap());
        assert!(!parse_verdict("incorrect, the answer means pen").unwrap());
        assert!(matches!(
            parse_verdict("Maybe"),
            Err(GradeError::UnrecognizedVerdict(_))
        ));
        assert!(parse_verdict("").is_err());
    }

    #[test]
    fn test_grading_prompt_mentions_everything() {
        let prompt = grading_prompt("كتاب", "book", "volume");
        assert!(prompt.contains("\"كتاب\""));
        assert!(prompt.contains("\"book\""));
        assert!(prompt.contains("\"volume\""));
        assert!(prompt.contains("\"Correct\" or \"Incorrect\""));
    }
}
