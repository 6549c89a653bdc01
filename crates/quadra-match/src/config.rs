//! Match configuration.

use quadra_engine::BoardConfig;

/// Configuration for a match instance.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Board dimensions and win length for the game inside the match.
    pub board: BoardConfig,

    /// Size of the actor's command mailbox. When full, senders wait.
    pub mailbox_size: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            mailbox_size: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_config_default() {
        let config = MatchConfig::default();
        assert_eq!(config.board.width, 7);
        assert_eq!(config.board.height, 6);
        assert_eq!(config.board.win_length, 4);
        assert_eq!(config.mailbox_size, 64);
    }
}
