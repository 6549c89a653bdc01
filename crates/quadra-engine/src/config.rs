//! Board configuration.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Dimensions and win condition for a game.
///
/// The classic setup is a 7-wide, 6-tall grid where four contiguous
/// same-symbol cells win.
///
/// The fields are public for struct-literal construction, but a
/// playable configuration must satisfy [`BoardConfig::validate`]:
/// both dimensions nonzero, `win_length` at least 2, and `win_length`
/// no longer than the board's longest axis. [`BoardConfig::new`]
/// enforces this up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of columns. Must be nonzero.
    pub width: usize,

    /// Number of rows. Row 0 is the bottom; gravity fills upward.
    /// Must be nonzero.
    pub height: usize,

    /// How many contiguous tokens make a winning alignment. Must be
    /// at least 2 and fit on the board.
    pub win_length: usize,
}

impl BoardConfig {
    /// Builds a configuration, rejecting dimensions that cannot
    /// produce a playable game.
    pub fn new(width: usize, height: usize, win_length: usize) -> Result<Self, EngineError> {
        let config = Self {
            width,
            height,
            win_length,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the playability invariants.
    ///
    /// A `win_length` of 0 or 1 would make the first insert an
    /// instant win, and an alignment longer than both axes could
    /// never be completed.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 {
            return Err(EngineError::InvalidConfig("width must be nonzero".into()));
        }
        if self.height == 0 {
            return Err(EngineError::InvalidConfig("height must be nonzero".into()));
        }
        if self.win_length < 2 {
            return Err(EngineError::InvalidConfig(
                "win length must be at least 2".into(),
            ));
        }
        if self.win_length > self.width.max(self.height) {
            return Err(EngineError::InvalidConfig(
                "win length does not fit on the board".into(),
            ));
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 7,
            height: 6,
            win_length: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_config_default_is_classic_seven_by_six() {
        let config = BoardConfig::default();
        assert_eq!(config.width, 7);
        assert_eq!(config.height, 6);
        assert_eq!(config.win_length, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_accepts_playable_dimensions() {
        let config = BoardConfig::new(9, 7, 5).unwrap();
        assert_eq!(config.width, 9);
        assert_eq!(config.height, 7);
        assert_eq!(config.win_length, 5);
    }

    #[test]
    fn test_new_rejects_zero_width() {
        let err = BoardConfig::new(0, 6, 4).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_new_rejects_zero_height() {
        let err = BoardConfig::new(7, 0, 4).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_new_rejects_trivial_win_length() {
        // A single token must never count as an alignment.
        for win_length in [0, 1] {
            let err = BoardConfig::new(7, 6, win_length).unwrap_err();
            assert!(matches!(err, EngineError::InvalidConfig(_)));
        }
    }

    #[test]
    fn test_new_rejects_win_length_longer_than_both_axes() {
        assert!(matches!(
            BoardConfig::new(7, 6, 8),
            Err(EngineError::InvalidConfig(_))
        ));
        // Fits along the taller axis, so it is fine.
        assert!(BoardConfig::new(3, 8, 7).is_ok());
    }
}
