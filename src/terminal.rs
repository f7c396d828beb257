//! Line-oriented terminal front end: input parsing and text rendering.
//!
//! Kept free of I/O so the binary only has to move lines in and out.

use crate::orchestrator::{Command, GameEvent};
use derive_more::Display;
use std::str::FromStr;
use strictly_nim::{GameState, HistoryLog, Move, Participant};

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Forward a command to the orchestrator.
    Command(Command),
    /// Print the help text.
    Help,
    /// Leave the program.
    Quit,
}

/// Why a line of input was not understood.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum InputError {
    /// Blank line.
    #[display("Enter a move as: <pile> <count>")]
    Empty,
    /// A number could not be parsed.
    #[display("Not a number: {}", _0)]
    NotANumber(String),
    /// `new` was followed by something other than a participant.
    #[display("Unknown participant: {} (use human or ai)", _0)]
    UnknownParticipant(String),
    /// Anything else.
    #[display("Unrecognized input: {}", _0)]
    Unrecognized(String),
}

impl std::error::Error for InputError {}

/// Help text listing the accepted input.
pub const HELP: &str = "\
Commands:
  <pile> <count>   take <count> objects from pile <pile> (0-based)
  new human|ai     start a new game with the given first mover
  restart          replay the same layout, last winner first
  help             show this text
  quit             leave";

impl FromStr for Input {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => Err(InputError::Empty),
            ["quit" | "exit" | "q"] => Ok(Input::Quit),
            ["help" | "?"] => Ok(Input::Help),
            ["restart"] => Ok(Input::Command(Command::Restart)),
            ["new"] => Ok(Input::Command(Command::NewGame {
                piles: None,
                first_mover: Participant::Human,
            })),
            ["new", who] => {
                let first_mover = Participant::from_str(who)
                    .map_err(|_| InputError::UnknownParticipant(who.to_string()))?;
                Ok(Input::Command(Command::NewGame {
                    piles: None,
                    first_mover,
                }))
            }
            [pile, count] => {
                let pile = pile
                    .parse::<usize>()
                    .map_err(|_| InputError::NotANumber(pile.to_string()))?;
                let count = count
                    .parse::<u32>()
                    .map_err(|_| InputError::NotANumber(count.to_string()))?;
                Ok(Input::Command(Command::SubmitMove(Move::new(pile, count))))
            }
            _ => Err(InputError::Unrecognized(line.trim().to_string())),
        }
    }
}

/// Formats the piles as rows of tally marks.
pub fn render_state(state: &GameState) -> String {
    let mut result = String::new();
    for (index, count) in state.piles().iter().enumerate() {
        let marks = "|".repeat(count as usize);
        result.push_str(&format!("Pile {}: {:<8} ({})\n", index, marks, count));
    }
    if !state.is_terminal() {
        result.push_str(&format!("{} to move", state.active_player()));
    } else {
        result.push_str("All piles empty");
    }
    result
}

/// Formats the move log, oldest first.
pub fn render_history(history: &HistoryLog) -> String {
    history
        .entries()
        .map(|entry| format!("{:>3}. {}", entry.sequence, entry))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Human-readable text for an orchestrator event.
pub fn render_event(event: &GameEvent) -> String {
    match event {
        GameEvent::NewGame {
            state, first_mover, ..
        } => format!("New game, {} moves first\n{}", first_mover, render_state(state)),
        GameEvent::AutomatedThinking { .. } => "AI is thinking...".to_string(),
        GameEvent::MoveMade { entry, state } => format!("{}\n{}", entry, render_state(state)),
        GameEvent::MoveRejected { reason } => format!("Rejected: {}", reason),
        GameEvent::GameOver { winner, .. } => {
            format!("GAME OVER\nWinner is {}", winner)
        }
        GameEvent::PolicyFault { reason } => format!("AI failed: {}", reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_nim::Piles;

    #[test]
    fn test_parse_move() {
        assert_eq!(
            "2 3".parse::<Input>(),
            Ok(Input::Command(Command::SubmitMove(Move::new(2, 3))))
        );
        // Zero is parsed; the game rejects it.
        assert_eq!(
            " 0   0 ".parse::<Input>(),
            Ok(Input::Command(Command::SubmitMove(Move::new(0, 0))))
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("quit".parse::<Input>(), Ok(Input::Quit));
        assert_eq!("help".parse::<Input>(), Ok(Input::Help));
        assert_eq!(
            "restart".parse::<Input>(),
            Ok(Input::Command(Command::Restart))
        );
        assert_eq!(
            "new AI".parse::<Input>(),
            Ok(Input::Command(Command::NewGame {
                piles: None,
                first_mover: Participant::Automated
            }))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Input>(), Err(InputError::Empty));
        assert_eq!(
            "a 1".parse::<Input>(),
            Err(InputError::NotANumber("a".to_string()))
        );
        assert_eq!(
            "1 -1".parse::<Input>(),
            Err(InputError::NotANumber("-1".to_string()))
        );
        assert_eq!(
            "new robot".parse::<Input>(),
            Err(InputError::UnknownParticipant("robot".to_string()))
        );
        assert!(matches!(
            "take it all".parse::<Input>(),
            Err(InputError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_render_state() {
        let state = GameState::new(Piles::from(vec![1, 0, 3]), Participant::Human);
        let text = render_state(&state);
        assert!(text.contains("Pile 0: |"));
        assert!(text.contains("Pile 2: |||"));
        assert!(text.contains("(0)"));
        assert!(text.ends_with("Human to move"));
    }

    #[test]
    fn test_render_history_uses_move_log_lines() {
        let mut history = HistoryLog::new();
        history.append(Participant::Human, Move::new(1, 2));
        history.append(Participant::Automated, Move::new(0, 1));

        let text = render_history(&history);
        assert_eq!(text, "  1. Human took 2 from pile 1\n  2. AI took 1 from pile 0");
    }
}
