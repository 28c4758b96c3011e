#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation context shared by the audio, message and screen collaborators.
//!
//! The context owns everything the host shows around the simulation: which
//! screen is up, whether background music plays, and the transient message
//! banner. It never touches session state; it only reacts to world events and
//! host requests.

use dungeon_crawl_core::{Event, GameStatus};

/// Number of frames a posted message stays visible.
pub const MESSAGE_LIFETIME_FRAMES: u32 = 100;

/// Key that opens the instructions from the title screen.
pub const INSTRUCTIONS_KEY: char = 'l';

/// Screen currently presented to the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    /// Title card shown before the session starts.
    #[default]
    Title,
    /// Key binding reference reachable from the title screen.
    Instructions,
    /// The running game.
    Playing,
    /// Shown once the player ran out of health.
    GameOver,
    /// Shown once the last stairway was taken.
    Victory,
}

/// Background music state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Music {
    /// Nothing plays.
    #[default]
    Stopped,
    /// The background theme loops.
    Playing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Message {
    text: String,
    frames_left: u32,
}

/// Screen, music and message state for one run of the game.
#[derive(Clone, Debug, Default)]
pub struct PresentationContext {
    screen: Screen,
    music: Music,
    message: Option<Message>,
}

impl PresentationContext {
    /// Creates a context showing the title screen in silence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that skips straight to the running game.
    #[must_use]
    pub fn playing() -> Self {
        let mut context = Self::new();
        context.start();
        context
    }

    /// Reacts to a key pressed while a pre-game screen is shown.
    ///
    /// Returns whether the session should start.
    pub fn press(&mut self, key: char) -> bool {
        match self.screen {
            Screen::Title if key.eq_ignore_ascii_case(&INSTRUCTIONS_KEY) => {
                self.screen = Screen::Instructions;
                false
            }
            Screen::Title | Screen::Instructions => {
                self.start();
                true
            }
            Screen::Playing | Screen::GameOver | Screen::Victory => false,
        }
    }

    /// Reacts to world events, switching screens and music on session boundaries.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::StatusChanged { status } => match status {
                    GameStatus::GameOver => self.finish(Screen::GameOver),
                    GameStatus::Finished => self.finish(Screen::Victory),
                    GameStatus::Exited => self.music = Music::Stopped,
                    GameStatus::Running => {}
                },
                Event::MusicStopped => self.music = Music::Stopped,
                _ => {}
            }
        }
    }

    /// Shows `text` for the next [`MESSAGE_LIFETIME_FRAMES`] frames, replacing
    /// any message still on screen.
    pub fn post_message(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            frames_left: MESSAGE_LIFETIME_FRAMES,
        });
    }

    /// Ages the message by one frame.
    pub fn advance_frame(&mut self) {
        if let Some(message) = &mut self.message {
            message.frames_left = message.frames_left.saturating_sub(1);
            if message.frames_left == 0 {
                self.message = None;
            }
        }
    }

    /// Message currently on screen.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|message| message.text.as_str())
    }

    /// Background music state.
    #[must_use]
    pub const fn music(&self) -> Music {
        self.music
    }

    /// Screen currently presented.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    fn start(&mut self) {
        self.screen = Screen::Playing;
        self.music = Music::Playing;
    }

    fn finish(&mut self, screen: Screen) {
        self.screen = screen;
        self.music = Music::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_expires_after_its_lifetime() {
        let mut context = PresentationContext::playing();
        context.post_message("Game Saved");
        for _ in 0..MESSAGE_LIFETIME_FRAMES - 1 {
            context.advance_frame();
        }
        assert_eq!(context.message(), Some("Game Saved"));
        context.advance_frame();
        assert_eq!(context.message(), None);
    }

    #[test]
    fn new_message_restarts_the_timer() {
        let mut context = PresentationContext::playing();
        context.post_message("Game Saved");
        for _ in 0..50 {
            context.advance_frame();
        }
        context.post_message("Game Loaded");
        for _ in 0..60 {
            context.advance_frame();
        }
        assert_eq!(context.message(), Some("Game Loaded"));
    }

    #[test]
    fn title_leads_to_instructions_then_game() {
        let mut context = PresentationContext::new();
        assert_eq!(context.music(), Music::Stopped);
        assert!(!context.press('l'));
        assert_eq!(context.screen(), Screen::Instructions);
        assert!(context.press('x'));
        assert_eq!(context.screen(), Screen::Playing);
        assert_eq!(context.music(), Music::Playing);
    }

    #[test]
    fn any_other_key_starts_from_the_title() {
        let mut context = PresentationContext::new();
        assert!(context.press(' '));
        assert_eq!(context.screen(), Screen::Playing);
        assert!(!context.press(' '));
    }
}
