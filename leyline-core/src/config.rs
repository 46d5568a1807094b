//! Game setup: board size, first player and who controls each side

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::BoardSize;
use crate::error::GameError;
use crate::game::{GameState, Player};
use crate::strategy::StrategyKind;

/// Who makes the moves for one side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    Human,
    Recursive,
    Iterative,
    Greedy,
    Random,
}

impl Controller {
    /// AI strategy behind this controller, `None` for a human
    pub fn strategy(self) -> Option<StrategyKind> {
        match self {
            Controller::Human => None,
            Controller::Recursive => Some(StrategyKind::Recursive),
            Controller::Iterative => Some(StrategyKind::Iterative),
            Controller::Greedy => Some(StrategyKind::Greedy),
            Controller::Random => Some(StrategyKind::Random),
        }
    }
}

/// Game parameters, loadable from JSON.
///
/// Missing fields take their defaults: a size 2 board, player one first,
/// human against the iterative search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub size: u8,
    pub first_player: Player,
    pub player_one: Controller,
    pub player_two: Controller,
    /// Seed for random players (None = fixed default seed)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: 2,
            first_player: Player::One,
            player_one: Controller::Human,
            player_two: Controller::Iterative,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn board_size(&self) -> Result<BoardSize, GameError> {
        BoardSize::new(self.size)
    }

    /// Fresh game for these parameters
    pub fn initial_state(&self) -> Result<GameState, GameError> {
        Ok(GameState::new(self.board_size()?, self.first_player))
    }

    pub fn controller(&self, player: Player) -> Controller {
        match player {
            Player::One => self.player_one,
            Player::Two => self.player_two,
        }
    }

    /// Load from a JSON file and check the board size
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.board_size()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        let state = config.initial_state().unwrap();
        assert_eq!(state.size().get(), 2);
        assert_eq!(state.current_player(), Player::One);
        assert_eq!(config.controller(Player::One), Controller::Human);
        assert_eq!(config.controller(Player::Two).strategy(), Some(StrategyKind::Iterative));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"size": 3, "first_player": "p2", "player_one": "greedy"}"#)
                .unwrap();
        assert_eq!(config.size, 3);
        assert_eq!(config.first_player, Player::Two);
        assert_eq!(config.player_one, Controller::Greedy);
        assert_eq!(config.player_two, Controller::Iterative);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_bad_size_rejected() {
        let config = GameConfig {
            size: 7,
            ..Default::default()
        };
        assert_eq!(config.initial_state(), Err(GameError::UnsupportedSize(7)));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("leyline-config-{}.json", std::process::id()));
        let config = GameConfig {
            size: 4,
            first_player: Player::Two,
            player_one: Controller::Random,
            player_two: Controller::Greedy,
            seed: Some(11),
        };
        config.save(&path).unwrap();
        let loaded = GameConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_bad_size() {
        let path = std::env::temp_dir().join(format!("leyline-bad-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"size": 0}"#).unwrap();
        let result = GameConfig::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
