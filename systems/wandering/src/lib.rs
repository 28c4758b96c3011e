#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded random walk for monsters.
//!
//! Monsters keep no memory of where they were heading: every settled monster
//! receives a freshly drawn cardinal direction before each simulation tick.

use dungeon_crawl_core::{Command, Direction, MonsterId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pure system that steers settled monsters in uniformly random directions.
#[derive(Clone, Debug)]
pub struct Wandering {
    rng: ChaCha8Rng,
}

impl Wandering {
    /// Creates a wandering system whose choices are fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Emits one steering command per settled monster.
    pub fn handle(&mut self, settled: &[MonsterId], out: &mut Vec<Command>) {
        for &monster in settled {
            let direction = self.pick_direction();
            out.push(Command::SteerMonster { monster, direction });
        }
    }

    fn pick_direction(&mut self) -> Direction {
        Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())]
    }
}
