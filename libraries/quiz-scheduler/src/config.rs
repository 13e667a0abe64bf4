use crate::SchedulerError;

/// Tuning knobs for a quiz session.
///
/// These only change how quickly a session converges. Any valid
/// configuration still ends with every word mastered.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SchedulerConfig {
    /// Number of correct verdicts needed before a word is mastered.
    pub win_condition: u32,
    /// A correct verdict divides the word's weight by this.
    pub decay_divisor: f64,
    /// An incorrect verdict multiplies the word's weight by this.
    pub growth_multiplier: f64,
    /// No weight ever drops below this.
    pub weight_floor: f64,
}

impl SchedulerConfig {
    pub const DEFAULT_WIN_CONDITION: u32 = 5;
    pub const DEFAULT_DECAY_DIVISOR: f64 = 5.0;
    pub const DEFAULT_GROWTH_MULTIPLIER: f64 = 2.0;
    pub const DEFAULT_WEIGHT_FLOOR: f64 = 1.0;

    pub fn with_win_condition(mut self, win_condition: u32) -> Self {
        self.win_condition = win_condition;
        self
    }

    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.win_condition < 1 {
            return Err(SchedulerError::InvalidConfig(
                "win_condition must be at least 1".to_string(),
            ));
        }
        if !self.decay_divisor.is_finite() || self.decay_divisor < 1.0 {
            return Err(SchedulerError::InvalidConfig(format!(
                "decay_divisor must be a finite number >= 1, got {}",
                self.decay_divisor
            )));
        }
        if !self.growth_multiplier.is_finite() || self.growth_multiplier < 1.0 {
            return Err(SchedulerError::InvalidConfig(format!(
                "growth_multiplier must be a finite number >= 1, got {}",
                self.growth_multiplier
            )));
        }
        if !self.weight_floor.is_finite() || self.weight_floor <= 0.0 {
            return Err(SchedulerError::InvalidConfig(format!(
                "weight_floor must be a finite positive number, got {}",
                self.weight_floor
            )));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            win_condition: Self::DEFAULT_WIN_CONDITION,
            decay_divisor: Self::DEFAULT_DECAY_DIVISOR,
            growth_multiplier: Self::DEFAULT_GROWTH_MULTIPLIER,
            weight_floor: Self::DEFAULT_WEIGHT_FLOOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SchedulerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_win_condition_rejected() {
        let config = SchedulerConfig::default().with_win_condition(0);
        assert!(matches!(
            config.validate(),
            Err(SchedulerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_shrinking_multiplier_rejected() {
        let config = SchedulerConfig {
            growth_multiplier: 0.5,
            ..SchedulerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SchedulerConfig {
            decay_divisor: f64::NAN,
            ..SchedulerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SchedulerConfig {
            weight_floor: 0.0,
            ..SchedulerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
