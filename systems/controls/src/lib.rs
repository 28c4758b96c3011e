#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Keyboard bindings translating raw key presses into player requests.

use dungeon_crawl_core::{Command, Direction, LevelSkip, PlayerCondition};

/// Character reported by adapters for the escape key.
pub const ESCAPE: char = '\u{1b}';

/// Requests a player can make from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// Step one cell.
    Move(Direction),
    /// Drink a carried potion.
    DrinkPotion,
    /// Write the session to the save file.
    Save,
    /// Replace the session with the one stored in the save file.
    Load,
    /// Debug jump between campaign levels.
    SkipLevel(LevelSkip),
    /// Leave the game.
    Quit,
}

impl Request {
    /// World command carrying out the request, if the world handles it.
    ///
    /// Saving and loading act on the session as a whole and are left to the host.
    #[must_use]
    pub const fn command(self) -> Option<Command> {
        match self {
            Self::Move(direction) => Some(Command::MovePlayer { direction }),
            Self::DrinkPotion => Some(Command::DrinkPotion),
            Self::SkipLevel(skip) => Some(Command::SkipLevel { skip }),
            Self::Quit => Some(Command::Quit),
            Self::Save | Self::Load => None,
        }
    }
}

/// Default key bindings: WASD to move, `e` drink, `p` save, `o` load,
/// `m`/`n` skip levels and `q` or Escape to quit.
#[derive(Clone, Copy, Debug, Default)]
pub struct Controls;

impl Controls {
    /// Maps a key press to a request.
    ///
    /// Poison scrambles the senses: every movement key walks the opposite way.
    #[must_use]
    pub fn translate(key: char, condition: PlayerCondition) -> Option<Request> {
        let request = match key.to_ascii_lowercase() {
            'w' => Request::Move(Direction::North),
            'a' => Request::Move(Direction::West),
            's' => Request::Move(Direction::South),
            'd' => Request::Move(Direction::East),
            'e' => Request::DrinkPotion,
            'p' => Request::Save,
            'o' => Request::Load,
            'm' => Request::SkipLevel(LevelSkip::Forward),
            'n' => Request::SkipLevel(LevelSkip::Backward),
            'q' | ESCAPE => Request::Quit,
            _ => return None,
        };

        Some(match (request, condition) {
            (Request::Move(direction), PlayerCondition::Poisoned) => {
                Request::Move(direction.reverse())
            }
            (request, _) => request,
        })
    }
}
