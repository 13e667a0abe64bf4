//! Adaptive weighted-sampling scheduler for vocabulary quizzes.
//!
//! The scheduler owns a fixed set of words. Each round it draws one word that
//! has not been mastered yet, with probability proportional to the word's
//! current weight. The caller obtains a verdict for the user's answer however
//! it likes and feeds it back through [`Scheduler::record_verdict`]:
//!
//! - a correct answer divides the weight (never below the floor) and counts
//!   towards mastery,
//! - an incorrect answer multiplies the weight so the word comes back soon.
//!
//! Once a word has collected enough correct answers it is mastered and leaves
//! the pool for good. The session is complete when every word is mastered.
//!
//! # Example
//!
//! ```
//! use quiz_scheduler::{QuizEntity, Scheduler, SchedulerConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let entities = vec![
//!     QuizEntity::new("كتاب", "book").with_base_frequency(120.0),
//!     QuizEntity::new("قلم", "pen"),
//! ];
//! let config = SchedulerConfig::default().with_win_condition(1);
//! let mut scheduler =
//!     Scheduler::with_rng(entities, config, ChaCha8Rng::seed_from_u64(7)).unwrap();
//!
//! while !scheduler.is_complete() {
//!     let word = scheduler.select_next().unwrap().word().to_string();
//!     scheduler.record_verdict(&word, true).unwrap();
//! }
//! assert_eq!(scheduler.progress().mastered, 2);
//! ```

mod config;

pub use config::SchedulerConfig;

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SchedulerError {
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),
    #[error("Invalid scheduler config: {0}")]
    InvalidConfig(String),
    #[error("No unmastered words left to select")]
    EmptyPool,
    #[error("Unknown word: {0}")]
    UnknownWord(String),
}

/// One vocabulary item as handed over by the dataset provider.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuizEntity {
    pub word: String,
    pub reference_answer: String,
    /// Corpus frequency. Missing or non-positive values start at the floor.
    pub base_frequency: Option<f64>,
}

impl QuizEntity {
    pub fn new(word: impl Into<String>, reference_answer: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            reference_answer: reference_answer.into(),
            base_frequency: None,
        }
    }

    pub fn with_base_frequency(mut self, base_frequency: f64) -> Self {
        self.base_frequency = Some(base_frequency);
        self
    }
}

/// Live state of a word inside a session.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EntityState {
    word: String,
    reference_answer: String,
    base_frequency: f64,
    current_weight: f64,
    correct_streak: u32,
    is_mastered: bool,
}

impl EntityState {
    fn new(entity: QuizEntity, config: &SchedulerConfig) -> Self {
        let base_frequency = entity
            .base_frequency
            .filter(|frequency| frequency.is_finite() && *frequency > 0.0)
            .unwrap_or(1.0);
        Self {
            word: entity.word,
            reference_answer: entity.reference_answer,
            base_frequency,
            current_weight: base_frequency.max(config.weight_floor),
            correct_streak: 0,
            is_mastered: false,
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn reference_answer(&self) -> &str {
        &self.reference_answer
    }

    pub fn base_frequency(&self) -> f64 {
        self.base_frequency
    }

    pub fn current_weight(&self) -> f64 {
        self.current_weight
    }

    /// Total correct verdicts so far. Incorrect verdicts do not reset it.
    pub fn correct_streak(&self) -> u32 {
        self.correct_streak
    }

    pub fn is_mastered(&self) -> bool {
        self.is_mastered
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            current_weight: self.current_weight,
            correct_streak: self.correct_streak,
            is_mastered: self.is_mastered,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct EntitySnapshot {
    pub current_weight: f64,
    pub correct_streak: u32,
    pub is_mastered: bool,
}

/// What changed after a verdict was recorded.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct VerdictOutcome {
    pub snapshot: EntitySnapshot,
    /// This verdict is the one that mastered the word.
    pub newly_mastered: bool,
    /// Every word in the session is now mastered.
    pub session_complete: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Progress {
    pub mastered: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.mastered == self.total
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.mastered, self.total)
    }
}

pub struct Scheduler<R = ChaCha8Rng> {
    config: SchedulerConfig,
    entities: Vec<EntityState>,
    index: HashMap<String, usize>,
    mastered: usize,
    rng: R,
}

impl Scheduler<ChaCha8Rng> {
    /// Create a scheduler seeded from the thread-local RNG.
    pub fn new(
        entities: impl IntoIterator<Item = QuizEntity>,
        config: SchedulerConfig,
    ) -> Result<Self, SchedulerError> {
        Self::with_rng(entities, config, ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    /// Create a scheduler whose selection order is fully determined by `seed`.
    pub fn seeded(
        entities: impl IntoIterator<Item = QuizEntity>,
        config: SchedulerConfig,
        seed: u64,
    ) -> Result<Self, SchedulerError> {
        Self::with_rng(entities, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Scheduler<R> {
    pub fn with_rng(
        entities: impl IntoIterator<Item = QuizEntity>,
        config: SchedulerConfig,
        rng: R,
    ) -> Result<Self, SchedulerError> {
        config.validate()?;

        let mut states = Vec::new();
        let mut index = HashMap::new();
        for entity in entities {
            if index.contains_key(&entity.word) {
                return Err(SchedulerError::InvalidDataset(format!(
                    "duplicate word '{}'",
                    entity.word
                )));
            }
            index.insert(entity.word.clone(), states.len());
            states.push(EntityState::new(entity, &config));
        }

        if states.is_empty() {
            return Err(SchedulerError::InvalidDataset(
                "at least one word is required".to_string(),
            ));
        }

        log::debug!("Scheduler initialised with {} words", states.len());

        Ok(Self {
            config,
            entities: states,
            index,
            mastered: 0,
            rng,
        })
    }

    /// Draw the next word to ask, weighted by current weight, among words
    /// that are not mastered yet. Does not modify any word.
    pub fn select_next(&mut self) -> Result<&EntityState, SchedulerError> {
        let pool: Vec<usize> = self
            .entities
            .iter()
            .enumerate()
            .filter(|(_, entity)| !entity.is_mastered)
            .map(|(i, _)| i)
            .collect();

        let Some(&last) = pool.last() else {
            return Err(SchedulerError::EmptyPool);
        };

        // Weights have no upper bound, so the running sum can overflow.
        // Rescaling by the largest weight keeps the ratios intact.
        let raw_total: f64 = pool.iter().map(|&i| self.entities[i].current_weight).sum();
        let divisor = if raw_total.is_finite() {
            1.0
        } else {
            pool.iter()
                .map(|&i| self.entities[i].current_weight)
                .fold(1.0, f64::max)
        };

        let cumulative: Vec<f64> = pool
            .iter()
            .scan(0.0, |acc, &i| {
                *acc += self.entities[i].current_weight / divisor;
                Some(*acc)
            })
            .collect();
        let total = cumulative[cumulative.len() - 1];

        let draw = self.rng.random::<f64>() * total;
        let slot = cumulative.partition_point(|&c| c <= draw);
        // Rounding can push the draw onto the very end of the range
        let chosen = pool.get(slot).copied().unwrap_or(last);

        Ok(&self.entities[chosen])
    }

    /// Apply a verdict for `word` and report its new state.
    pub fn record_verdict(
        &mut self,
        word: &str,
        verdict: bool,
    ) -> Result<VerdictOutcome, SchedulerError> {
        let &i = self
            .index
            .get(word)
            .ok_or_else(|| SchedulerError::UnknownWord(word.to_string()))?;
        let config = self.config;
        let entity = &mut self.entities[i];
        let was_mastered = entity.is_mastered;

        if verdict {
            entity.correct_streak = entity.correct_streak.saturating_add(1);
            entity.current_weight =
                (entity.current_weight / config.decay_divisor).max(config.weight_floor);
            if entity.correct_streak >= config.win_condition {
                entity.is_mastered = true;
            }
        } else {
            entity.current_weight =
                (entity.current_weight * config.growth_multiplier).min(f64::MAX);
        }

        log::debug!(
            "'{}' answered {}: weight={} correct={}",
            entity.word,
            if verdict { "correctly" } else { "incorrectly" },
            entity.current_weight,
            entity.correct_streak
        );

        let snapshot = entity.snapshot();
        let newly_mastered = !was_mastered && entity.is_mastered;
        if newly_mastered {
            self.mastered += 1;
            log::info!(
                "'{word}' mastered ({} / {})",
                self.mastered,
                self.entities.len()
            );
        }

        let session_complete = self.is_complete();
        if newly_mastered && session_complete {
            log::info!("All {} words mastered", self.entities.len());
        }

        Ok(VerdictOutcome {
            snapshot,
            newly_mastered,
            session_complete,
        })
    }
}

impl<R> Scheduler<R> {
    pub fn progress(&self) -> Progress {
        Progress {
            mastered: self.mastered,
            total: self.entities.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.mastered == self.entities.len()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn entity(&self, word: &str) -> Option<&EntityState> {
        self.index.get(word).map(|&i| &self.entities[i])
    }

    /// All words in the order the dataset provider supplied them.
    pub fn entities(&self) -> impl Iterator<Item = &EntityState> {
        self.entities.iter()
    }
}
