use serde::Serialize;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("starting hearts must be > 0")]
    InvalidStartingHearts,

    #[error("starting hearts must be at most {max}")]
    TooManyHearts { max: u32 },

    #[error("xp per correct answer must be > 0")]
    InvalidXpPerCorrect,

    #[error("hint floor must be between 0 and starting hearts ({starting})")]
    InvalidHintFloor { starting: u32 },
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Heart and XP economy for a lesson session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSettings {
    starting_hearts: u32,
    xp_per_correct: u32,
    hint_cost: u32,
    hint_floor: u32,
}

impl SessionSettings {
    pub const DEFAULT_STARTING_HEARTS: u32 = 5;
    pub const DEFAULT_XP_PER_CORRECT: u32 = 10;
    pub const MAX_STARTING_HEARTS: u32 = 100;

    /// Creates custom session settings.
    ///
    /// `hint_floor` is the heart count below which a hint never charges.
    ///
    /// # Errors
    ///
    /// Returns error if hearts or xp are zero, hearts exceed
    /// `MAX_STARTING_HEARTS`, or the floor exceeds the starting hearts.
    pub fn new(
        starting_hearts: u32,
        xp_per_correct: u32,
        hint_cost: u32,
        hint_floor: u32,
    ) -> Result<Self, SettingsError> {
        if starting_hearts == 0 {
            return Err(SettingsError::InvalidStartingHearts);
        }
        if starting_hearts > Self::MAX_STARTING_HEARTS {
            return Err(SettingsError::TooManyHearts {
                max: Self::MAX_STARTING_HEARTS,
            });
        }
        if xp_per_correct == 0 {
            return Err(SettingsError::InvalidXpPerCorrect);
        }
        if hint_floor > starting_hearts {
            return Err(SettingsError::InvalidHintFloor {
                starting: starting_hearts,
            });
        }

        Ok(Self {
            starting_hearts,
            xp_per_correct,
            hint_cost,
            hint_floor,
        })
    }

    /// Default settings with a different heart budget.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidStartingHearts` for zero and
    /// `SettingsError::TooManyHearts` past the cap.
    pub fn with_starting_hearts(starting_hearts: u32) -> Result<Self, SettingsError> {
        let d = Self::default();
        Self::new(
            starting_hearts,
            d.xp_per_correct,
            d.hint_cost,
            d.hint_floor.min(starting_hearts),
        )
    }

    #[must_use]
    pub fn starting_hearts(&self) -> u32 {
        self.starting_hearts
    }

    #[must_use]
    pub fn xp_per_correct(&self) -> u32 {
        self.xp_per_correct
    }

    #[must_use]
    pub fn hint_cost(&self) -> u32 {
        self.hint_cost
    }

    #[must_use]
    pub fn hint_floor(&self) -> u32 {
        self.hint_floor
    }
}

impl Default for SessionSettings {
    /// Five hearts, 10 XP per correct answer, hints cost one heart but never
    /// take the last one.
    fn default() -> Self {
        Self {
            starting_hearts: Self::DEFAULT_STARTING_HEARTS,
            xp_per_correct: Self::DEFAULT_XP_PER_CORRECT,
            hint_cost: 1,
            hint_floor: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_lesson_economy() {
        let s = SessionSettings::default();
        assert_eq!(s.starting_hearts(), 5);
        assert_eq!(s.xp_per_correct(), 10);
        assert_eq!(s.hint_cost(), 1);
        assert_eq!(s.hint_floor(), 1);
    }

    #[test]
    fn zero_values_are_rejected() {
        assert_eq!(
            SessionSettings::new(0, 10, 1, 0).unwrap_err(),
            SettingsError::InvalidStartingHearts
        );
        assert_eq!(
            SessionSettings::new(5, 0, 1, 1).unwrap_err(),
            SettingsError::InvalidXpPerCorrect
        );
        assert_eq!(
            SessionSettings::new(2, 10, 1, 3).unwrap_err(),
            SettingsError::InvalidHintFloor { starting: 2 }
        );
    }

    #[test]
    fn custom_heart_budget_keeps_floor() {
        let s = SessionSettings::with_starting_hearts(1).unwrap();
        assert_eq!(s.starting_hearts(), 1);
        assert_eq!(s.hint_floor(), 1);
        assert!(SessionSettings::with_starting_hearts(0).is_err());
    }

    #[test]
    fn heart_budget_is_capped() {
        let max = SessionSettings::MAX_STARTING_HEARTS;
        assert_eq!(
            SessionSettings::with_starting_hearts(max).unwrap().starting_hearts(),
            max
        );
        assert_eq!(
            SessionSettings::with_starting_hearts(3_000_000_000).unwrap_err(),
            SettingsError::TooManyHearts { max }
        );
        assert_eq!(
            SessionSettings::new(max + 1, 10, 1, 1).unwrap_err(),
            SettingsError::TooManyHearts { max }
        );
    }
}
