//! Level grids and the entities placed on them.

use dungeon_crawl_core::{CellCoord, Direction, Item, MonsterId, MonsterKind, MoveId, Tile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling or validating level data.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The blueprint contained no rows or an empty row.
    #[error("level `{title}` has an empty grid")]
    EmptyGrid {
        /// Title of the offending level.
        title: String,
    },
    /// Rows of the blueprint differ in length.
    #[error("level `{title}` row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Title of the offending level.
        title: String,
        /// Zero-based row index.
        row: u32,
        /// Width of the first row.
        expected: u32,
        /// Width of the offending row.
        found: u32,
    },
    /// A symbol outside the tile vocabulary appeared in the blueprint.
    #[error("level `{title}` contains unknown symbol {symbol:?} at ({column}, {row})")]
    UnknownSymbol {
        /// Title of the offending level.
        title: String,
        /// Symbol that could not be resolved.
        symbol: char,
        /// Column of the symbol.
        column: u32,
        /// Row of the symbol.
        row: u32,
    },
    /// A spawn point or entity lies outside the grid.
    #[error("level `{title}` places {what} outside the grid at ({column}, {row})")]
    OutOfBounds {
        /// Title of the offending level.
        title: String,
        /// What was being placed.
        what: &'static str,
        /// Column of the placement.
        column: u32,
        /// Row of the placement.
        row: u32,
    },
    /// A session requires at least one main level.
    #[error("a game session needs at least one level")]
    NoLevels,
    /// A stored session refers to a level slot that does not exist.
    #[error("active level slot {slot} is out of range")]
    MissingSlot {
        /// Human-readable description of the slot.
        slot: String,
    },
    /// A stored session carries player statistics outside their bounds.
    #[error("player state is invalid: {reason}")]
    InvalidPlayer {
        /// Description of the violated bound.
        reason: String,
    },
}

/// A grid of tiles plus the entities living on it.
///
/// The grid is the level's single runtime copy: opened doors, cleared coins
/// and revealed stairways persist for the lifetime of the level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    title: String,
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
    spawn: CellCoord,
    teleporters: Vec<Teleporter>,
    switches: Vec<Switch>,
    fireballs: Vec<Fireball>,
    monsters: Vec<Monster>,
    chests: Vec<Chest>,
}

impl Level {
    /// Parses an ASCII blueprint into a level with the given spawn point.
    pub fn parse(
        title: impl Into<String>,
        blueprint: &[&str],
        spawn: CellCoord,
    ) -> Result<Self, LevelError> {
        let title = title.into();
        let first = blueprint.first().map(|row| row.chars().count()).unwrap_or(0);
        if first == 0 {
            return Err(LevelError::EmptyGrid { title });
        }
        let columns = u32::try_from(first).unwrap_or(u32::MAX);
        let rows = u32::try_from(blueprint.len()).unwrap_or(u32::MAX);

        let mut tiles = Vec::with_capacity(first * blueprint.len());
        for (row, line) in (0..rows).zip(blueprint) {
            let found = u32::try_from(line.chars().count()).unwrap_or(u32::MAX);
            if found != columns {
                return Err(LevelError::RaggedRow {
                    title,
                    row,
                    expected: columns,
                    found,
                });
            }
            for (column, symbol) in (0..columns).zip(line.chars()) {
                let Some(tile) = Tile::from_symbol(symbol) else {
                    return Err(LevelError::UnknownSymbol {
                        title,
                        symbol,
                        column,
                        row,
                    });
                };
                tiles.push(tile);
            }
        }

        let level = Self {
            title,
            columns,
            rows,
            tiles,
            spawn,
            teleporters: Vec::new(),
            switches: Vec::new(),
            fireballs: Vec::new(),
            monsters: Vec::new(),
            chests: Vec::new(),
        };
        level.ensure_inside("spawn", spawn)?;
        Ok(level)
    }

    /// Adds a monster that starts at `position` heading `facing`.
    pub fn with_monster(
        mut self,
        kind: MonsterKind,
        position: CellCoord,
        facing: Direction,
        speed: i32,
    ) -> Result<Self, LevelError> {
        self.ensure_inside("a monster", position)?;
        let id = MonsterId::new(u32::try_from(self.monsters.len()).unwrap_or(u32::MAX));
        self.monsters.push(Monster {
            id,
            kind,
            position,
            facing,
            speed,
            in_flight: None,
        });
        Ok(self)
    }

    /// Adds a fireball that starts at `position` flying `facing`.
    pub fn with_fireball(
        mut self,
        position: CellCoord,
        facing: Direction,
        speed: i32,
    ) -> Result<Self, LevelError> {
        self.ensure_inside("a fireball", position)?;
        self.fireballs.push(Fireball {
            position,
            facing,
            speed,
            in_flight: None,
        });
        Ok(self)
    }

    /// Adds a closed chest holding `contents`.
    pub fn with_chest(mut self, position: CellCoord, contents: Item) -> Result<Self, LevelError> {
        self.ensure_inside("a chest", position)?;
        self.chests.push(Chest {
            position,
            contents,
            opened: false,
        });
        Ok(self)
    }

    /// Adds a switch that opens the wall at `door`.
    pub fn with_switch(mut self, position: CellCoord, door: CellCoord) -> Result<Self, LevelError> {
        self.ensure_inside("a switch", position)?;
        self.ensure_inside("a switch door", door)?;
        self.switches.push(Switch { position, door });
        Ok(self)
    }

    /// Adds a teleporter that relocates the player to `target`.
    pub fn with_teleporter(
        mut self,
        position: CellCoord,
        target: CellCoord,
    ) -> Result<Self, LevelError> {
        self.ensure_inside("a teleporter", position)?;
        self.ensure_inside("a teleporter target", target)?;
        self.teleporters.push(Teleporter { position, target });
        Ok(self)
    }

    /// Title shown in the HUD.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cell the player appears on when entering the level.
    #[must_use]
    pub const fn spawn(&self) -> CellCoord {
        self.spawn
    }

    /// Whether the cell lies within the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Tile currently stored at `cell`.
    ///
    /// # Panics
    ///
    /// Panics when `cell` lies outside the grid. Callers validate coordinates
    /// first; an out-of-bounds lookup means the level definition is corrupt.
    #[must_use]
    pub fn tile_at(&self, cell: CellCoord) -> Tile {
        self.tiles[self.index(cell)]
    }

    /// Replaces the tile stored at `cell`.
    ///
    /// # Panics
    ///
    /// Panics when `cell` lies outside the grid.
    pub fn set_tile(&mut self, cell: CellCoord, tile: Tile) {
        let index = self.index(cell);
        self.tiles[index] = tile;
    }

    /// Iterates over every cell together with its tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let columns = self.columns.max(1);
        (0u32..).zip(self.tiles.iter()).map(move |(index, tile)| {
            (CellCoord::new(index % columns, index / columns), *tile)
        })
    }

    /// Teleporters placed on the level.
    #[must_use]
    pub fn teleporters(&self) -> &[Teleporter] {
        &self.teleporters
    }

    /// Switches placed on the level.
    #[must_use]
    pub fn switches(&self) -> &[Switch] {
        &self.switches
    }

    /// Fireballs bouncing around the level.
    #[must_use]
    pub fn fireballs(&self) -> &[Fireball] {
        &self.fireballs
    }

    /// Monsters roaming the level.
    #[must_use]
    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    /// Chests placed on the level.
    #[must_use]
    pub fn chests(&self) -> &[Chest] {
        &self.chests
    }

    pub(crate) fn fireballs_mut(&mut self) -> &mut [Fireball] {
        &mut self.fireballs
    }

    pub(crate) fn monsters_mut(&mut self) -> &mut [Monster] {
        &mut self.monsters
    }

    pub(crate) fn chests_mut(&mut self) -> &mut [Chest] {
        &mut self.chests
    }

    /// Drops every in-flight move reference with the given identifier.
    pub(crate) fn settle(&mut self, id: MoveId) {
        for fireball in &mut self.fireballs {
            if fireball.in_flight == Some(id) {
                fireball.in_flight = None;
            }
        }
        for monster in &mut self.monsters {
            if monster.in_flight == Some(id) {
                monster.in_flight = None;
            }
        }
    }

    /// Re-checks the placement invariants of a level restored from storage.
    pub(crate) fn validate(&self) -> Result<(), LevelError> {
        let expected = u64::from(self.columns) * u64::from(self.rows);
        if self.columns == 0 || self.rows == 0 || self.tiles.len() as u64 != expected {
            return Err(LevelError::EmptyGrid {
                title: self.title.clone(),
            });
        }
        self.ensure_inside("spawn", self.spawn)?;
        for teleporter in &self.teleporters {
            self.ensure_inside("a teleporter", teleporter.position)?;
            self.ensure_inside("a teleporter target", teleporter.target)?;
        }
        for switch in &self.switches {
            self.ensure_inside("a switch", switch.position)?;
            self.ensure_inside("a switch door", switch.door)?;
        }
        for fireball in &self.fireballs {
            self.ensure_inside("a fireball", fireball.position)?;
        }
        for monster in &self.monsters {
            self.ensure_inside("a monster", monster.position)?;
        }
        for chest in &self.chests {
            self.ensure_inside("a chest", chest.position)?;
        }
        Ok(())
    }

    fn ensure_inside(&self, what: &'static str, cell: CellCoord) -> Result<(), LevelError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(LevelError::OutOfBounds {
                title: self.title.clone(),
                what,
                column: cell.column(),
                row: cell.row(),
            })
        }
    }

    fn index(&self, cell: CellCoord) -> usize {
        assert!(
            self.contains(cell),
            "tile lookup at ({}, {}) outside level `{}` ({}x{})",
            cell.column(),
            cell.row(),
            self.title,
            self.columns,
            self.rows
        );
        cell.row() as usize * self.columns as usize + cell.column() as usize
    }
}

/// A monster wandering the level at random.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    id: MonsterId,
    kind: MonsterKind,
    position: CellCoord,
    facing: Direction,
    speed: i32,
    #[serde(skip)]
    in_flight: Option<MoveId>,
}

impl Monster {
    /// Identifier within the level.
    #[must_use]
    pub const fn id(&self) -> MonsterId {
        self.id
    }

    /// Species of the monster.
    #[must_use]
    pub const fn kind(&self) -> MonsterKind {
        self.kind
    }

    /// Cell the monster occupies or is moving into.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Current heading.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Pixels per frame travelled while moving.
    #[must_use]
    pub const fn speed(&self) -> i32 {
        self.speed
    }

    /// Move currently animating the monster, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<MoveId> {
        self.in_flight
    }

    /// Whether the monster has arrived and may move or collide.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.in_flight.is_none()
    }

    pub(crate) fn face(&mut self, direction: Direction) {
        self.facing = direction;
    }

    pub(crate) fn launch(&mut self, destination: CellCoord, id: MoveId) {
        self.position = destination;
        self.in_flight = Some(id);
    }
}

/// A fireball bouncing back and forth along a line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fireball {
    position: CellCoord,
    facing: Direction,
    speed: i32,
    #[serde(skip)]
    in_flight: Option<MoveId>,
}

impl Fireball {
    /// Cell the fireball occupies or is flying into.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Current heading.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Pixels per frame travelled while flying.
    #[must_use]
    pub const fn speed(&self) -> i32 {
        self.speed
    }

    /// Move currently animating the fireball, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<MoveId> {
        self.in_flight
    }

    /// Whether the fireball has arrived and may move or collide.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.in_flight.is_none()
    }

    pub(crate) fn bounce(&mut self) {
        self.facing = self.facing.reverse();
    }

    pub(crate) fn launch(&mut self, destination: CellCoord, id: MoveId) {
        self.position = destination;
        self.in_flight = Some(id);
    }
}

/// A chest that opens exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chest {
    position: CellCoord,
    contents: Item,
    opened: bool,
}

impl Chest {
    /// Cell of the chest.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Item stored inside.
    #[must_use]
    pub const fn contents(&self) -> Item {
        self.contents
    }

    /// Whether the chest has been opened.
    #[must_use]
    pub const fn is_opened(&self) -> bool {
        self.opened
    }

    /// Opens the chest, returning its contents the first time only.
    pub(crate) fn open(&mut self) -> Option<Item> {
        if self.opened {
            return None;
        }
        self.opened = true;
        Some(self.contents)
    }
}

/// A floor switch linked to a wall hiding a secret stairway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    position: CellCoord,
    door: CellCoord,
}

impl Switch {
    /// Cell of the switch.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Cell of the linked wall.
    #[must_use]
    pub const fn door(&self) -> CellCoord {
        self.door
    }
}

/// A pad that instantly relocates the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teleporter {
    position: CellCoord,
    target: CellCoord,
}

impl Teleporter {
    /// Cell of the teleporter.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Destination cell.
    #[must_use]
    pub const fn target(&self) -> CellCoord {
        self.target
    }
}
