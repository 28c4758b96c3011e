#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Animation tracker that advances in-flight moves and reports their arrival.

use dungeon_crawl_core::{Command, Event, Move};

/// Pure system owning every move the session handed over for animation.
///
/// Each frame every move gains one step of progress. A move whose travelled
/// distance reaches the tile size is reported back to the world exactly once
/// as [`Command::CompleteMove`] and then forgotten.
#[derive(Clone, Debug, Default)]
pub struct MoveTracker {
    active: Vec<Move>,
}

impl MoveTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of moves drained from the session.
    pub fn absorb(&mut self, moves: impl IntoIterator<Item = Move>) {
        self.active.extend(moves);
    }

    /// Advances every move by one frame and emits completions for arrivals.
    pub fn advance_frame(&mut self, tile_size: u32, out: &mut Vec<Command>) {
        for movement in &mut self.active {
            movement.advance();
            if movement.has_arrived(tile_size) && movement.mark_complete() {
                out.push(Command::CompleteMove {
                    id: movement.id(),
                    effect: movement.effect(),
                });
            }
        }
        self.active.retain(|movement| !movement.is_complete());
    }

    /// Reacts to world events.
    ///
    /// Entering a level abandons the animations of the level left behind; their
    /// completions are emitted immediately so no entity stays in flight.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::LevelEntered { .. }))
        {
            return;
        }

        for mut movement in self.active.drain(..) {
            if movement.mark_complete() {
                out.push(Command::CompleteMove {
                    id: movement.id(),
                    effect: movement.effect(),
                });
            }
        }
    }

    /// Whether a player move is still animating.
    #[must_use]
    pub fn is_player_moving(&self) -> bool {
        self.active
            .iter()
            .any(|movement| movement.sprite().is_player())
    }

    /// Moves currently animating, in the order they were absorbed.
    #[must_use]
    pub fn active(&self) -> &[Move] {
        &self.active
    }

    /// Drops every move without reporting completion.
    ///
    /// Used when the session is replaced wholesale, since the new session has
    /// no entity waiting on these moves.
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_crawl_core::{
        CellCoord, Direction, MoveEffect, MoveId, MoveSprite, PLAYER_SPEED, TILE_SIZE,
    };

    fn player_move(id: u64) -> Move {
        Move::toward(
            MoveId::new(id),
            MoveSprite::Player,
            CellCoord::new(1, 1),
            Direction::East,
            PLAYER_SPEED,
        )
        .with_effect(MoveEffect::Damage)
    }

    #[test]
    fn completion_is_reported_exactly_once() {
        let mut tracker = MoveTracker::new();
        tracker.absorb([player_move(3)]);
        let mut commands = Vec::new();

        for _ in 0..10 {
            tracker.advance_frame(TILE_SIZE, &mut commands);
        }

        assert_eq!(
            commands,
            vec![Command::CompleteMove {
                id: MoveId::new(3),
                effect: MoveEffect::Damage,
            }]
        );
        assert!(tracker.active().is_empty());
        assert!(!tracker.is_player_moving());
    }

    #[test]
    fn player_is_moving_until_arrival() {
        let mut tracker = MoveTracker::new();
        tracker.absorb([player_move(0)]);
        let mut commands = Vec::new();

        for _ in 0..4 {
            tracker.advance_frame(TILE_SIZE, &mut commands);
            assert!(tracker.is_player_moving());
        }
        tracker.advance_frame(TILE_SIZE, &mut commands);

        assert!(!tracker.is_player_moving());
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn clear_forgets_without_reporting() {
        let mut tracker = MoveTracker::new();
        tracker.absorb([player_move(0), player_move(1)]);
        tracker.clear();
        let mut commands = Vec::new();
        tracker.advance_frame(TILE_SIZE, &mut commands);
        assert!(commands.is_empty());
    }
}
