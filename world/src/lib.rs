#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game session state for the dungeon crawler.
//!
//! The session is mutated exclusively through [`apply`], one [`Command`] at a
//! time, and reports what happened as [`Event`] values. Read access goes
//! through the [`query`] module.

mod autonomous;
mod campaign;
mod combat;
mod intent;
mod level;

use dungeon_crawl_core::{
    CellCoord, Command, Event, GameStatus, Item, LevelSkip, LevelSlot, Move, MoveEffect, MoveId,
    PlayerCondition, ARMOR_CAPACITY, MAX_HEALTH,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use level::{Chest, Fireball, Level, LevelError, Monster, Switch, Teleporter};

/// Statistics and position of the player character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    position: CellCoord,
    health: u8,
    coins: u32,
    armor_worn: bool,
    armor_health: u8,
    inventory: Vec<Item>,
    condition: PlayerCondition,
    hurt_cooldown: u32,
}

impl Player {
    fn spawned_at(position: CellCoord) -> Self {
        Self {
            position,
            health: MAX_HEALTH,
            coins: 0,
            armor_worn: false,
            armor_health: ARMOR_CAPACITY,
            inventory: Vec::new(),
            condition: PlayerCondition::Normal,
            hurt_cooldown: 0,
        }
    }

    /// Cell the player occupies.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Remaining health in `0..=MAX_HEALTH`.
    #[must_use]
    pub const fn health(&self) -> u8 {
        self.health
    }

    /// Coins collected so far.
    #[must_use]
    pub const fn coins(&self) -> u32 {
        self.coins
    }

    /// Whether armor is currently worn.
    #[must_use]
    pub const fn armor_worn(&self) -> bool {
        self.armor_worn
    }

    /// Armor points in `0..=ARMOR_CAPACITY`.
    #[must_use]
    pub const fn armor_health(&self) -> u8 {
        self.armor_health
    }

    /// Carried items in pickup order.
    #[must_use]
    pub fn inventory(&self) -> &[Item] {
        &self.inventory
    }

    /// Whether at least one `item` is carried.
    #[must_use]
    pub fn carries(&self, item: Item) -> bool {
        self.inventory.contains(&item)
    }

    /// Lingering condition.
    #[must_use]
    pub const fn condition(&self) -> PlayerCondition {
        self.condition
    }

    /// Ticks left before damage can land again.
    #[must_use]
    pub const fn hurt_cooldown(&self) -> u32 {
        self.hurt_cooldown
    }

    /// Removes one `item` from the inventory, returning whether one was found.
    fn take(&mut self, item: Item) -> bool {
        match self.inventory.iter().position(|carried| *carried == item) {
            Some(index) => {
                let _ = self.inventory.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Moves created by the session that no consumer has drained yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct MoveLedger {
    pending: Vec<Move>,
    next_id: u64,
}

impl MoveLedger {
    fn allocate(&mut self) -> MoveId {
        let id = MoveId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn enqueue(&mut self, movement: Move) {
        self.pending.push(movement);
    }
}

/// Aggregate root holding every piece of mutable game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    status: GameStatus,
    player: Player,
    levels: Vec<Level>,
    secret_levels: Vec<Level>,
    active: LevelSlot,
    level_index: usize,
    secret_level_index: usize,
    #[serde(skip)]
    moves: MoveLedger,
}

impl GameSession {
    /// Starts a session on the first of `levels`.
    pub fn new(levels: Vec<Level>, secret_levels: Vec<Level>) -> Result<Self, LevelError> {
        let spawn = levels.first().ok_or(LevelError::NoLevels)?.spawn();
        Ok(Self {
            status: GameStatus::Running,
            player: Player::spawned_at(spawn),
            levels,
            secret_levels,
            active: LevelSlot::Main(0),
            level_index: 0,
            secret_level_index: 0,
            moves: MoveLedger::default(),
        })
    }

    /// Starts a session on the built-in campaign.
    pub fn campaign() -> Result<Self, LevelError> {
        let (levels, secret_levels) = campaign::build()?;
        let session = Self::new(levels, secret_levels)?;
        info!(
            levels = session.levels.len(),
            secret_levels = session.secret_levels.len(),
            "campaign loaded"
        );
        Ok(session)
    }

    /// Checks the invariants of a session restored from storage.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.levels.is_empty() {
            return Err(LevelError::NoLevels);
        }
        for level in self.levels.iter().chain(&self.secret_levels) {
            level.validate()?;
        }
        let in_range = match self.active {
            LevelSlot::Main(index) => index < self.levels.len(),
            LevelSlot::Secret(index) => index < self.secret_levels.len(),
        };
        if !in_range {
            return Err(LevelError::MissingSlot {
                slot: format!("{:?}", self.active),
            });
        }
        if !self.active_level().contains(self.player.position) {
            return Err(LevelError::InvalidPlayer {
                reason: "position lies outside the active level".to_owned(),
            });
        }
        if self.player.health > MAX_HEALTH {
            return Err(LevelError::InvalidPlayer {
                reason: format!("health {} exceeds {MAX_HEALTH}", self.player.health),
            });
        }
        if self.player.armor_health > ARMOR_CAPACITY {
            return Err(LevelError::InvalidPlayer {
                reason: format!(
                    "armor {} exceeds {ARMOR_CAPACITY}",
                    self.player.armor_health
                ),
            });
        }
        if self.player.health == 0 && self.status == GameStatus::Running {
            return Err(LevelError::InvalidPlayer {
                reason: "running session with a dead player".to_owned(),
            });
        }
        if self.player.armor_worn && self.player.armor_health == 0 {
            return Err(LevelError::InvalidPlayer {
                reason: "worn armor has no points left".to_owned(),
            });
        }
        Ok(())
    }

    fn active_level(&self) -> &Level {
        match self.active {
            LevelSlot::Main(index) => &self.levels[index],
            LevelSlot::Secret(index) => &self.secret_levels[index],
        }
    }

    fn active_level_mut(&mut self) -> &mut Level {
        match self.active {
            LevelSlot::Main(index) => &mut self.levels[index],
            LevelSlot::Secret(index) => &mut self.secret_levels[index],
        }
    }

    /// Splits the borrow between the active level and the move ledger.
    fn level_and_ledger(&mut self) -> (&mut Level, &mut MoveLedger) {
        let level = match self.active {
            LevelSlot::Main(index) => &mut self.levels[index],
            LevelSlot::Secret(index) => &mut self.secret_levels[index],
        };
        (level, &mut self.moves)
    }

    /// Moves the player to the spawn point of the level in `slot`.
    ///
    /// Moves queued on the level left behind are dropped and their entities
    /// settled, since nothing will animate them there.
    fn enter_level(&mut self, slot: LevelSlot, out_events: &mut Vec<Event>) {
        let abandoned = std::mem::take(&mut self.moves.pending);
        if !abandoned.is_empty() {
            debug!(count = abandoned.len(), "dropping queued moves");
            let left = self.active_level_mut();
            for movement in &abandoned {
                left.settle(movement.id());
            }
        }
        self.active = slot;
        let level = self.active_level();
        let spawn = level.spawn();
        info!(title = level.title(), ?slot, "entering level");
        self.player.position = spawn;
        out_events.push(Event::LevelEntered { slot });
    }

    /// Transitions out of `Running`. Terminal statuses never change again.
    fn transition(&mut self, status: GameStatus, out_events: &mut Vec<Event>) -> bool {
        if self.status.is_terminal() || status == self.status {
            return false;
        }
        info!(from = ?self.status, to = ?status, "session status changed");
        self.status = status;
        out_events.push(Event::StatusChanged { status });
        true
    }

    fn complete_move(&mut self, id: MoveId, effect: MoveEffect, out_events: &mut Vec<Event>) {
        for level in self.levels.iter_mut().chain(self.secret_levels.iter_mut()) {
            level.settle(id);
        }
        match effect {
            MoveEffect::None => {}
            MoveEffect::Damage => self.take_damage(out_events),
            MoveEffect::Heal => self.heal(out_events),
        }
        debug!(
            move_id = id.get(),
            column = self.player.position.column(),
            row = self.player.position.row(),
            "move completed"
        );
    }

    fn drink_potion(&mut self, out_events: &mut Vec<Event>) {
        if !self.player.take(Item::Potion) {
            debug!("no potion to drink");
            return;
        }
        self.restore(out_events);
        if self.player.condition == PlayerCondition::Poisoned {
            self.player.condition = PlayerCondition::Normal;
            out_events.push(Event::ConditionChanged {
                condition: PlayerCondition::Normal,
            });
        }
    }

    fn skip_level(&mut self, skip: LevelSkip, out_events: &mut Vec<Event>) {
        let last = self.levels.len().saturating_sub(1);
        let target = match skip {
            LevelSkip::Forward => (self.level_index + 1).min(last),
            LevelSkip::Backward => self.level_index.saturating_sub(1).min(last),
        };
        if self.active == LevelSlot::Main(target) {
            return;
        }
        self.level_index = target;
        self.enter_level(LevelSlot::Main(target), out_events);
    }
}

/// Applies the provided command to the session, mutating state deterministically.
///
/// Commands arriving after the session reached a terminal status are ignored.
pub fn apply(session: &mut GameSession, command: Command, out_events: &mut Vec<Event>) {
    if session.status.is_terminal() {
        return;
    }

    match command {
        Command::MovePlayer { direction } => {
            intent::apply_player_intent(session, direction, out_events);
        }
        Command::SteerMonster { monster, direction } => {
            let level = session.active_level_mut();
            match level
                .monsters_mut()
                .iter_mut()
                .find(|candidate| candidate.id() == monster)
            {
                Some(monster) => monster.face(direction),
                None => debug!(monster = monster.get(), "steering unknown monster"),
            }
        }
        Command::Tick => autonomous::advance(session, out_events),
        Command::CompleteMove { id, effect } => session.complete_move(id, effect, out_events),
        Command::DrinkPotion => session.drink_potion(out_events),
        Command::SkipLevel { skip } => session.skip_level(skip, out_events),
        Command::Quit => {
            let _ = session.transition(GameStatus::Exited, out_events);
        }
    }
}

/// Hands every move created since the last drain to the caller.
pub fn drain_moves(session: &mut GameSession) -> Vec<Move> {
    std::mem::take(&mut session.moves.pending)
}

/// Query functions that provide read-only access to the session.
pub mod query {
    use dungeon_crawl_core::{GameStatus, LevelSlot, MonsterId, Move};

    use super::{GameSession, Level, Player};

    /// Overall session status.
    #[must_use]
    pub fn status(session: &GameSession) -> GameStatus {
        session.status
    }

    /// Player statistics and position.
    #[must_use]
    pub fn player(session: &GameSession) -> &Player {
        &session.player
    }

    /// Level the player is currently exploring.
    #[must_use]
    pub fn active_level(session: &GameSession) -> &Level {
        session.active_level()
    }

    /// Slot of the level the player is currently exploring.
    #[must_use]
    pub fn active_slot(session: &GameSession) -> LevelSlot {
        session.active
    }

    /// Progress through the main level sequence.
    ///
    /// Equals the number of main levels once the campaign is finished.
    #[must_use]
    pub fn level_index(session: &GameSession) -> usize {
        session.level_index
    }

    /// Number of secret levels entered so far.
    #[must_use]
    pub fn secret_level_index(session: &GameSession) -> usize {
        session.secret_level_index
    }

    /// Number of main levels in the campaign.
    #[must_use]
    pub fn level_count(session: &GameSession) -> usize {
        session.levels.len()
    }

    /// Moves created but not yet drained.
    #[must_use]
    pub fn pending_moves(session: &GameSession) -> &[Move] {
        &session.moves.pending
    }

    /// Monsters on the active level that have arrived and are ready to move.
    #[must_use]
    pub fn settled_monsters(session: &GameSession) -> Vec<MonsterId> {
        session
            .active_level()
            .monsters()
            .iter()
            .filter(|monster| monster.is_settled())
            .map(|monster| monster.id())
            .collect()
    }
}
