//! Value parsers shared by the command argument structs

use leyline_core::{BoardSize, Cell, Controller, Player, StrategyKind};

pub fn parse_size(s: &str) -> Result<BoardSize, String> {
    let side: u8 = s
        .trim()
        .parse()
        .map_err(|_| format!("not a board size: {s:?}"))?;
    BoardSize::new(side).map_err(|e| e.to_string())
}

pub fn parse_player(s: &str) -> Result<Player, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "p1" | "1" | "one" => Ok(Player::One),
        "p2" | "2" | "two" => Ok(Player::Two),
        _ => Err(format!("not a player: {s:?} (expected p1 or p2)")),
    }
}

pub fn parse_controller(s: &str) -> Result<Controller, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "human" => Ok(Controller::Human),
        "recursive" => Ok(Controller::Recursive),
        "iterative" => Ok(Controller::Iterative),
        "greedy" => Ok(Controller::Greedy),
        "random" => Ok(Controller::Random),
        _ => Err(format!(
            "unknown player type {s:?} (expected human, recursive, iterative, greedy or random)"
        )),
    }
}

/// Like [`parse_controller`] but only AI players
pub fn parse_strategy(s: &str) -> Result<StrategyKind, String> {
    parse_controller(s)?
        .strategy()
        .ok_or_else(|| "a human cannot take part in a match".to_string())
}

pub fn parse_cell(s: &str) -> Result<Cell, String> {
    s.parse::<Cell>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("3").unwrap().get(), 3);
        assert!(parse_size("0").is_err());
        assert!(parse_size("six").is_err());
    }

    #[test]
    fn test_parse_player() {
        assert_eq!(parse_player("P2"), Ok(Player::Two));
        assert_eq!(parse_player("one"), Ok(Player::One));
        assert!(parse_player("p3").is_err());
    }

    #[test]
    fn test_parse_strategy_rejects_human() {
        assert_eq!(parse_strategy("Greedy"), Ok(StrategyKind::Greedy));
        assert!(parse_strategy("human").is_err());
        assert_eq!(parse_controller("human"), Ok(Controller::Human));
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(" c"), Ok(Cell::new(2)));
        assert!(parse_cell("BC").is_err());
        assert!(parse_cell("").is_err());
    }
}
