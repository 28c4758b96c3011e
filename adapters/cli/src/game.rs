use std::path::PathBuf;

use dungeon_crawl_core::{Command, Event, GameStatus, TILE_SIZE};
use dungeon_crawl_rendering::{FrameControl, FrameInput, Scene};
use dungeon_crawl_system_animation::MoveTracker;
use dungeon_crawl_system_controls::{Controls, Request};
use dungeon_crawl_system_presentation::{PresentationContext, Screen};
use dungeon_crawl_system_wandering::Wandering;
use dungeon_crawl_world::{self as world, query, GameSession};
use tracing::warn;

use crate::{savegame::SaveGame, scene};

/// Host loop state: the session plus every system that drives it.
#[derive(Debug)]
pub(crate) struct Game {
    session: GameSession,
    tracker: MoveTracker,
    wandering: Wandering,
    context: PresentationContext,
    save_path: PathBuf,
}

impl Game {
    pub(crate) fn new(
        session: GameSession,
        seed: u64,
        save_path: PathBuf,
        context: PresentationContext,
    ) -> Self {
        Self {
            session,
            tracker: MoveTracker::new(),
            wandering: Wandering::new(seed),
            context,
            save_path,
        }
    }

    /// Runs one frame and redraws `scene`.
    pub(crate) fn frame(&mut self, input: FrameInput, scene: &mut Scene) -> FrameControl {
        let control = match self.context.screen() {
            Screen::Title | Screen::Instructions => {
                if input.escape {
                    return FrameControl::Exit;
                }
                if let Some(key) = input.key {
                    let _ = self.context.press(key);
                }
                FrameControl::Continue
            }
            Screen::Playing => self.play(&input),
            Screen::GameOver | Screen::Victory => {
                if input.key.is_some() || input.escape {
                    return FrameControl::Exit;
                }
                FrameControl::Continue
            }
        };

        scene::populate(scene, &self.session, &self.tracker, &self.context);
        control
    }

    fn play(&mut self, input: &FrameInput) -> FrameControl {
        let condition = query::player(&self.session).condition();
        let request = if input.escape {
            Some(Request::Quit)
        } else {
            input
                .key
                .and_then(|key| Controls::translate(key, condition))
        };

        if request == Some(Request::Load) {
            self.load();
            self.context.advance_frame();
            return FrameControl::Continue;
        }

        // A step that lands this frame frees the player for the next one.
        let mut completions = Vec::new();
        self.tracker.advance_frame(TILE_SIZE, &mut completions);

        let mut requested = None;
        match request {
            Some(Request::Save) => self.save(),
            Some(Request::Move(_)) if self.tracker.is_player_moving() => {}
            Some(request) => requested = request.command(),
            None => {}
        }

        let mut commands = Vec::new();
        self.wandering
            .handle(&query::settled_monsters(&self.session), &mut commands);
        commands.push(Command::Tick);
        commands.extend(completions);
        commands.extend(requested);

        let mut events = Vec::new();
        for command in commands {
            self.dispatch(command, &mut events);
        }

        self.context.handle(&events);
        self.tracker.absorb(world::drain_moves(&mut self.session));
        self.context.advance_frame();

        if query::status(&self.session) == GameStatus::Exited {
            FrameControl::Exit
        } else {
            FrameControl::Continue
        }
    }

    /// Applies `command`, then lets the tracker react to what it caused.
    fn dispatch(&mut self, command: Command, events: &mut Vec<Event>) {
        let start = events.len();
        world::apply(&mut self.session, command, events);
        let mut follow_up = Vec::new();
        self.tracker.handle(&events[start..], &mut follow_up);
        for command in follow_up {
            world::apply(&mut self.session, command, events);
        }
    }

    fn save(&mut self) {
        match SaveGame::new(self.session.clone()).save_to_path(&self.save_path) {
            Ok(()) => self.context.post_message("Game Saved"),
            Err(error) => {
                warn!(%error, "save failed");
                self.context.post_message("Save Failed");
            }
        }
    }

    /// Swaps in the stored session. A failed load leaves the running one untouched.
    fn load(&mut self) {
        match SaveGame::load_from_path(&self.save_path) {
            Ok(save) => {
                self.session = save.into_session();
                self.tracker.clear();
                self.context.post_message("Game Loaded");
            }
            Err(error) => {
                warn!(%error, "load failed");
                self.context.post_message("Load Failed");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &GameSession {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn context(&self) -> &PresentationContext {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_crawl_core::CellCoord;
    use dungeon_crawl_rendering::Overlay;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dungeon-crawl-game-{}-{name}.json", std::process::id()))
    }

    fn game(save_path: PathBuf) -> Game {
        let session = GameSession::campaign().expect("campaign");
        Game::new(session, 7, save_path, PresentationContext::new())
    }

    fn key(key: char) -> FrameInput {
        FrameInput {
            key: Some(key),
            escape: false,
        }
    }

    fn idle(game: &mut Game, scene: &mut Scene, frames: usize) {
        for _ in 0..frames {
            assert_eq!(
                game.frame(FrameInput::default(), scene),
                FrameControl::Continue
            );
        }
    }

    fn scene() -> Scene {
        Scene::new(10, 10, TILE_SIZE as f32).expect("valid scene")
    }

    #[test]
    fn title_key_starts_the_game_without_moving() {
        let mut game = game(temp_path("title"));
        let mut scene = scene();
        let spawn = query::player(game.session()).position();

        let _ = game.frame(key('d'), &mut scene);

        assert_eq!(game.context().screen(), Screen::Playing);
        assert_eq!(scene.overlay, None);
        assert_eq!(query::player(game.session()).position(), spawn);
    }

    #[test]
    fn movement_keys_walk_the_player() {
        let mut game = game(temp_path("walk"));
        let mut scene = scene();
        let _ = game.frame(key(' '), &mut scene);

        let _ = game.frame(key('d'), &mut scene);
        assert_eq!(query::player(game.session()).position(), CellCoord::new(2, 1));

        // Input is ignored until the step animation lands.
        let _ = game.frame(key('d'), &mut scene);
        assert_eq!(query::player(game.session()).position(), CellCoord::new(2, 1));

        idle(&mut game, &mut scene, 5);
        let _ = game.frame(key('d'), &mut scene);
        assert_eq!(query::player(game.session()).position(), CellCoord::new(3, 1));
    }

    #[test]
    fn next_step_is_accepted_on_the_frame_the_previous_one_lands() {
        let mut game = game(temp_path("chain"));
        let mut scene = scene();
        let _ = game.frame(key(' '), &mut scene);

        // Five frames of 15 pixels cover a 64 pixel tile.
        let _ = game.frame(key('d'), &mut scene);
        idle(&mut game, &mut scene, 3);
        let _ = game.frame(key('d'), &mut scene);
        assert_eq!(query::player(game.session()).position(), CellCoord::new(2, 1));

        let _ = game.frame(key('d'), &mut scene);
        assert_eq!(query::player(game.session()).position(), CellCoord::new(3, 1));
    }

    #[test]
    fn escape_quits_from_play() {
        let mut game = game(temp_path("quit"));
        let mut scene = scene();
        let _ = game.frame(key(' '), &mut scene);
        let input = FrameInput {
            key: None,
            escape: true,
        };
        assert_eq!(game.frame(input, &mut scene), FrameControl::Exit);
        assert_eq!(query::status(game.session()), GameStatus::Exited);
    }

    #[test]
    fn save_then_load_restores_the_position() {
        let path = temp_path("save-load");
        let mut game = game(path.clone());
        let mut scene = scene();
        let _ = game.frame(key(' '), &mut scene);

        let _ = game.frame(key('p'), &mut scene);
        assert_eq!(scene.message.as_deref(), Some("Game Saved"));
        let _ = game.frame(key('d'), &mut scene);
        idle(&mut game, &mut scene, 5);
        assert_eq!(query::player(game.session()).position(), CellCoord::new(2, 1));

        let _ = game.frame(key('o'), &mut scene);
        let _ = std::fs::remove_file(&path);
        assert_eq!(query::player(game.session()).position(), CellCoord::new(1, 1));
        assert_eq!(scene.message.as_deref(), Some("Game Loaded"));
    }

    #[test]
    fn failed_load_keeps_the_running_session() {
        let mut game = game(temp_path("never-written"));
        let mut scene = scene();
        let _ = game.frame(key(' '), &mut scene);
        let _ = game.frame(key('d'), &mut scene);
        let before = game.session().clone();

        let _ = game.frame(key('o'), &mut scene);

        assert_eq!(game.session(), &before);
        assert_eq!(scene.message.as_deref(), Some("Load Failed"));
    }

    #[test]
    fn instructions_are_reachable_from_the_title() {
        let mut game = game(temp_path("instructions"));
        let mut scene = scene();
        let _ = game.frame(key('l'), &mut scene);
        assert_eq!(scene.overlay, Some(Overlay::Instructions));
        let _ = game.frame(key('x'), &mut scene);
        assert_eq!(scene.overlay, None);
    }
}
