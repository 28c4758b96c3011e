#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the dungeon crawler.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative game session, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation layers to react to. Systems consume event streams, query
//! immutable views, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner shown on the title screen.
pub const WELCOME_BANNER: &str = "Dan's Dungeon";

/// Title of the game window.
pub const GAME_TITLE: &str = "Dungeon Explorer";

/// Edge length of a square tile measured in screen pixels.
pub const TILE_SIZE: u32 = 64;

/// Pixels per frame travelled by the player sprite along the move axis.
pub const PLAYER_SPEED: i32 = 15;

/// Upper bound for the player's health.
pub const MAX_HEALTH: u8 = 5;

/// Armor points granted whenever armor is equipped or repaired.
pub const ARMOR_CAPACITY: u8 = 3;

/// Health floor applied by a restoring pickup.
pub const RESTORE_HEALTH: u8 = 3;

/// Number of ticks during which further damage is suppressed after a hit.
pub const HURT_COOLDOWN_TICKS: u32 = 100;

/// Pixels per frame travelled by a wall sliding away from a secret stairway.
pub const FALLING_WALL_SPEED: i32 = 2;

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player step one cell in the given direction.
    MovePlayer {
        /// Direction of the attempted step.
        direction: Direction,
    },
    /// Overwrites the heading of a monster on the active level before the next tick.
    SteerMonster {
        /// Identifier of the monster within the active level.
        monster: MonsterId,
        /// Heading the monster should follow on its next step.
        direction: Direction,
    },
    /// Advances autonomous entities by a single simulation tick.
    Tick,
    /// Reports that the animation of a move finished travelling one tile.
    CompleteMove {
        /// Identifier of the finished move.
        id: MoveId,
        /// Effect that fires now that the move has arrived.
        effect: MoveEffect,
    },
    /// Drinks a potion carried in the inventory.
    DrinkPotion,
    /// Debug shortcut that jumps between campaign levels.
    SkipLevel {
        /// Direction of the jump.
        skip: LevelSkip,
    },
    /// External quit signal.
    Quit,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player occupies a new cell.
    PlayerMoved {
        /// Cell the player occupied before the step.
        from: CellCoord,
        /// Cell the player occupies after the step.
        to: CellCoord,
    },
    /// A coin was picked up and the tile cleared.
    CoinCollected {
        /// Cell that held the coin.
        cell: CellCoord,
        /// Coin total after the pickup.
        total: u32,
    },
    /// A key lying on the floor was added to the inventory.
    KeyCollected {
        /// Cell that held the key.
        cell: CellCoord,
    },
    /// A closed door was unlocked using a key.
    DoorUnlocked {
        /// Cell of the door.
        cell: CellCoord,
    },
    /// A trap was sprung and cleared.
    TrapSprung {
        /// Cell of the trap.
        cell: CellCoord,
    },
    /// A healing potion lying on the floor was consumed.
    PotionConsumed {
        /// Cell that held the potion.
        cell: CellCoord,
    },
    /// A chest was opened for the first and only time.
    ChestOpened {
        /// Cell of the chest.
        cell: CellCoord,
        /// Item found inside.
        contents: Item,
    },
    /// Armor was put on or repaired to full capacity.
    ArmorEquipped {
        /// Armor points after equipping.
        armor: u8,
    },
    /// Armor lost its last point and was dropped.
    ArmorBroken,
    /// The player stepped on a teleporter and was relocated.
    Teleported {
        /// Teleporter cell.
        from: CellCoord,
        /// Destination cell.
        to: CellCoord,
    },
    /// The session switched to another level.
    LevelEntered {
        /// Slot of the level that became active.
        slot: LevelSlot,
    },
    /// A switch opened the wall hiding a secret stairway.
    SecretPassageOpened {
        /// Cell of the former wall.
        cell: CellCoord,
    },
    /// The player took damage, either to armor or to health.
    PlayerHurt {
        /// Health after the hit.
        health: u8,
        /// Armor points after the hit, if armor is still worn.
        armor: Option<u8>,
    },
    /// A rat stole a coin instead of biting.
    CoinStolen {
        /// Coin total after the theft.
        remaining: u32,
    },
    /// The player regained health.
    PlayerHealed {
        /// Health after healing.
        health: u8,
    },
    /// The player's condition changed.
    ConditionChanged {
        /// Condition after the change.
        condition: PlayerCondition,
    },
    /// The session moved to a new status.
    StatusChanged {
        /// Status after the transition.
        status: GameStatus,
    },
    /// Background music should stop.
    MusicStopped,
}

/// Cardinal movement directions available to every entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Returns the opposite heading.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Unit offset expressed as `(column, row)` deltas.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Neighbouring cell in the given direction, or `None` when it would leave
    /// the non-negative quadrant.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(Self::new(column, row))
    }
}

/// Closed vocabulary of tile symbols a level grid may contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// `.` plain floor.
    Floor,
    /// `#` solid wall.
    Wall,
    /// `f` decorative fountain, blocks movement.
    Fountain,
    /// `x` stairs leading to the next campaign level.
    StairsDown,
    /// `y` stairs leading to a secret level.
    StairsUp,
    /// `$` a coin lying on the floor.
    Coin,
    /// `t` a hidden trap.
    Trap,
    /// `w` water the player can wade through.
    Water,
    /// `s` shallow water.
    ShallowWater,
    /// `k` a key lying on the floor.
    Key,
    /// `D` an unlocked door.
    OpenDoor,
    /// `d` a locked door.
    ClosedDoor,
    /// `h` a healing potion lying on the floor.
    Potion,
}

impl Tile {
    /// Resolves a raw level symbol into a tile.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        let tile = match symbol {
            '.' => Self::Floor,
            '#' => Self::Wall,
            'f' => Self::Fountain,
            'x' => Self::StairsDown,
            'y' => Self::StairsUp,
            '$' => Self::Coin,
            't' => Self::Trap,
            'w' => Self::Water,
            's' => Self::ShallowWater,
            'k' => Self::Key,
            'D' => Self::OpenDoor,
            'd' => Self::ClosedDoor,
            'h' => Self::Potion,
            _ => return None,
        };
        Some(tile)
    }

    /// Raw level symbol representing the tile.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Floor => '.',
            Self::Wall => '#',
            Self::Fountain => 'f',
            Self::StairsDown => 'x',
            Self::StairsUp => 'y',
            Self::Coin => '$',
            Self::Trap => 't',
            Self::Water => 'w',
            Self::ShallowWater => 's',
            Self::Key => 'k',
            Self::OpenDoor => 'D',
            Self::ClosedDoor => 'd',
            Self::Potion => 'h',
        }
    }

    /// Whether stepping toward this tile starts an animated player move.
    #[must_use]
    pub const fn starts_player_move(self) -> bool {
        matches!(
            self,
            Self::Trap
                | Self::Coin
                | Self::Water
                | Self::ShallowWater
                | Self::Key
                | Self::Potion
                | Self::Floor
                | Self::OpenDoor
        )
    }

    /// Whether the player may occupy this tile after a step.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(
            self,
            Self::Floor | Self::OpenDoor | Self::Water | Self::ShallowWater
        )
    }

    /// Whether fireballs and monsters may travel across this tile.
    #[must_use]
    pub const fn is_fly_over(self) -> bool {
        matches!(
            self,
            Self::Water | Self::Floor | Self::Coin | Self::Key | Self::ShallowWater
        )
    }
}

/// Monster species, each with its own bite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonsterKind {
    /// Chips one point off armor or health.
    Skeleton,
    /// Shatters armor or kills outright.
    Giant,
    /// Steals a coin from unarmored players.
    Rat,
    /// Bites for one health and poisons.
    Spider,
}

/// Items that can be carried in the inventory or found in chests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Item {
    /// Unlocks a single closed door.
    Key,
    /// Drinkable potion that restores health.
    Potion,
    /// Wearable armor; equipped immediately instead of stored.
    Armor,
}

/// Overall state of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// The session accepts input and advances.
    Running,
    /// Health reached zero.
    GameOver,
    /// The last level was completed.
    Finished,
    /// The player quit.
    Exited,
}

impl GameStatus {
    /// Terminal statuses never transition again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Lingering condition affecting the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerCondition {
    /// No lingering effect.
    #[default]
    Normal,
    /// Controls are inverted until healed.
    Poisoned,
}

/// Identifies which level of the campaign is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelSlot {
    /// Index into the main level sequence.
    Main(usize),
    /// Index into the secret level sequence.
    Secret(usize),
}

/// Direction of a debug level jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelSkip {
    /// Jump to the next main level.
    Forward,
    /// Jump to the previous main level.
    Backward,
}

/// Identifier of a monster within its level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to every move by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoveId(u64);

impl MoveId {
    /// Creates a new move identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Effect resolved once a move arrives at its destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveEffect {
    /// Nothing happens on arrival.
    #[default]
    None,
    /// The player takes trap damage.
    Damage,
    /// The player heals one point.
    Heal,
}

/// Sprite drawn while a move is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveSprite {
    /// Player without armor.
    Player,
    /// Player wearing armor.
    ArmoredPlayer,
    /// A fireball.
    Fireball,
    /// A monster of the given kind.
    Monster(MonsterKind),
    /// A wall sliding away from a secret stairway.
    FallingWall,
}

impl MoveSprite {
    /// Whether the sprite belongs to the player.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Player | Self::ArmoredPlayer)
    }
}

/// An in-progress, one-tile transition with linear progress.
///
/// The record is independent of the entity it animates: it only knows where it
/// started, how many pixels it travels per frame along each axis, and how many
/// frames have elapsed. Consumers compare [`Move::distance`] against the tile
/// size to decide when the move is done.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    id: MoveId,
    sprite: MoveSprite,
    origin: CellCoord,
    speed_x: i32,
    speed_y: i32,
    progress: u32,
    complete: bool,
    effect: MoveEffect,
}

impl Move {
    /// Creates a move starting at `origin` with the provided per-axis speeds.
    #[must_use]
    pub const fn new(
        id: MoveId,
        sprite: MoveSprite,
        origin: CellCoord,
        speed_x: i32,
        speed_y: i32,
    ) -> Self {
        Self {
            id,
            sprite,
            origin,
            speed_x,
            speed_y,
            progress: 0,
            complete: false,
            effect: MoveEffect::None,
        }
    }

    /// Creates a move heading one cell in `direction` at `speed` pixels per frame.
    #[must_use]
    pub const fn toward(
        id: MoveId,
        sprite: MoveSprite,
        origin: CellCoord,
        direction: Direction,
        speed: i32,
    ) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(id, sprite, origin, dx * speed, dy * speed)
    }

    /// Returns the move with the arrival effect replaced.
    #[must_use]
    pub const fn with_effect(mut self, effect: MoveEffect) -> Self {
        self.effect = effect;
        self
    }

    /// Identifier assigned by the session.
    #[must_use]
    pub const fn id(&self) -> MoveId {
        self.id
    }

    /// Sprite drawn while the move is in flight.
    #[must_use]
    pub const fn sprite(&self) -> MoveSprite {
        self.sprite
    }

    /// Cell the move started from.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Per-axis speed in pixels per frame.
    #[must_use]
    pub const fn speed(&self) -> (i32, i32) {
        (self.speed_x, self.speed_y)
    }

    /// Number of frames elapsed since the move started.
    #[must_use]
    pub const fn progress(&self) -> u32 {
        self.progress
    }

    /// Whether the move has been marked complete.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Effect resolved on arrival.
    #[must_use]
    pub const fn effect(&self) -> MoveEffect {
        self.effect
    }

    /// Advances the move by one frame.
    pub fn advance(&mut self) {
        self.progress = self.progress.saturating_add(1);
    }

    /// Pixel offset from the origin cell after the elapsed frames.
    #[must_use]
    pub fn offset(&self) -> (i64, i64) {
        let progress = i64::from(self.progress);
        (
            progress * i64::from(self.speed_x),
            progress * i64::from(self.speed_y),
        )
    }

    /// Distance travelled along the dominant axis, in pixels.
    #[must_use]
    pub fn distance(&self) -> u64 {
        let step = self.speed_x.unsigned_abs().max(self.speed_y.unsigned_abs());
        u64::from(self.progress) * u64::from(step)
    }

    /// Whether the move has travelled at least one tile of `tile_size` pixels.
    ///
    /// A move without speed can never travel, so it counts as arrived as soon
    /// as it has been drawn once.
    #[must_use]
    pub fn has_arrived(&self, tile_size: u32) -> bool {
        if self.speed_x == 0 && self.speed_y == 0 {
            return self.progress > 0;
        }
        self.distance() >= u64::from(tile_size)
    }

    /// Marks the move complete. Returns `true` only on the first call.
    pub fn mark_complete(&mut self) -> bool {
        let was_complete = self.complete;
        self.complete = true;
        !was_complete
    }
}
