#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for dungeon crawler adapters.

use anyhow::Result as AnyResult;
use dungeon_crawl_core::{
    CellCoord, Item, MonsterKind, MoveSprite, Tile, GAME_TITLE, WELCOME_BANNER,
};
use glam::Vec2;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Identifies every image the renderer may draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Plain floor.
    Floor,
    /// Solid wall.
    Wall,
    /// Decorative fountain.
    Fountain,
    /// Stairway leading to the next level.
    StairsDown,
    /// Stairway leading to a secret level.
    StairsUp,
    /// Coin lying on the floor, also used as the HUD coin icon.
    Coin,
    /// Armed trap.
    Trap,
    /// Deep water.
    Water,
    /// Shallow, slimy water.
    ShallowWater,
    /// Key lying on the floor or carried.
    Key,
    /// Unlocked door.
    OpenDoor,
    /// Locked door.
    ClosedDoor,
    /// Healing potion lying on the floor or carried.
    Potion,
    /// Unopened chest.
    Chest,
    /// Teleporter pad.
    Teleporter,
    /// Armor carried in the inventory.
    Armor,
    /// HUD health icon.
    Heart,
    /// Player without armor.
    Player,
    /// Player wearing armor.
    ArmoredPlayer,
    /// Fireball.
    Fireball,
    /// Skeleton monster.
    Skeleton,
    /// Giant monster.
    Giant,
    /// Rat monster.
    Rat,
    /// Spider monster.
    Spider,
}

impl SpriteKey {
    /// Every sprite key in manifest order.
    pub const ALL: [SpriteKey; 24] = [
        SpriteKey::Floor,
        SpriteKey::Wall,
        SpriteKey::Fountain,
        SpriteKey::StairsDown,
        SpriteKey::StairsUp,
        SpriteKey::Coin,
        SpriteKey::Trap,
        SpriteKey::Water,
        SpriteKey::ShallowWater,
        SpriteKey::Key,
        SpriteKey::OpenDoor,
        SpriteKey::ClosedDoor,
        SpriteKey::Potion,
        SpriteKey::Chest,
        SpriteKey::Teleporter,
        SpriteKey::Armor,
        SpriteKey::Heart,
        SpriteKey::Player,
        SpriteKey::ArmoredPlayer,
        SpriteKey::Fireball,
        SpriteKey::Skeleton,
        SpriteKey::Giant,
        SpriteKey::Rat,
        SpriteKey::Spider,
    ];

    /// Name used for the sprite in the manifest.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Wall => "wall",
            Self::Fountain => "fountain",
            Self::StairsDown => "stairs_down",
            Self::StairsUp => "stairs_up",
            Self::Coin => "coin",
            Self::Trap => "trap",
            Self::Water => "water",
            Self::ShallowWater => "shallow_water",
            Self::Key => "key",
            Self::OpenDoor => "open_door",
            Self::ClosedDoor => "closed_door",
            Self::Potion => "potion",
            Self::Chest => "chest",
            Self::Teleporter => "teleporter",
            Self::Armor => "armor",
            Self::Heart => "heart",
            Self::Player => "player",
            Self::ArmoredPlayer => "armored_player",
            Self::Fireball => "fireball",
            Self::Skeleton => "skeleton",
            Self::Giant => "giant",
            Self::Rat => "rat",
            Self::Spider => "spider",
        }
    }

    /// Resolves a manifest name back into a key.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Sprite drawn for a grid tile.
    #[must_use]
    pub const fn for_tile(tile: Tile) -> Self {
        match tile {
            Tile::Floor => Self::Floor,
            Tile::Wall => Self::Wall,
            Tile::Fountain => Self::Fountain,
            Tile::StairsDown => Self::StairsDown,
            Tile::StairsUp => Self::StairsUp,
            Tile::Coin => Self::Coin,
            Tile::Trap => Self::Trap,
            Tile::Water => Self::Water,
            Tile::ShallowWater => Self::ShallowWater,
            Tile::Key => Self::Key,
            Tile::OpenDoor => Self::OpenDoor,
            Tile::ClosedDoor => Self::ClosedDoor,
            Tile::Potion => Self::Potion,
        }
    }

    /// Sprite drawn for an inventory item.
    #[must_use]
    pub const fn for_item(item: Item) -> Self {
        match item {
            Item::Key => Self::Key,
            Item::Potion => Self::Potion,
            Item::Armor => Self::Armor,
        }
    }

    /// Sprite drawn for a settled monster.
    #[must_use]
    pub const fn for_monster(kind: MonsterKind) -> Self {
        match kind {
            MonsterKind::Skeleton => Self::Skeleton,
            MonsterKind::Giant => Self::Giant,
            MonsterKind::Rat => Self::Rat,
            MonsterKind::Spider => Self::Spider,
        }
    }

    /// Sprite drawn for an in-flight move.
    #[must_use]
    pub const fn for_move(sprite: MoveSprite) -> Self {
        match sprite {
            MoveSprite::Player => Self::Player,
            MoveSprite::ArmoredPlayer => Self::ArmoredPlayer,
            MoveSprite::Fireball => Self::Fireball,
            MoveSprite::Monster(kind) => Self::for_monster(kind),
            MoveSprite::FallingWall => Self::Wall,
        }
    }

    /// Flat color drawn when no sprite atlas is loaded.
    #[must_use]
    pub const fn fallback_color(self) -> Color {
        match self {
            Self::Floor => Color::from_rgb_u8(0x4a, 0x3f, 0x35),
            Self::Wall => Color::from_rgb_u8(0x80, 0x80, 0x88),
            Self::Fountain => Color::from_rgb_u8(0x6f, 0xb7, 0xd6),
            Self::StairsDown => Color::from_rgb_u8(0xe0, 0xd0, 0x90),
            Self::StairsUp => Color::from_rgb_u8(0xf0, 0xa0, 0xf0),
            Self::Coin => Color::from_rgb_u8(0xff, 0xc1, 0x07),
            Self::Trap => Color::from_rgb_u8(0x5a, 0x2a, 0x20),
            Self::Water => Color::from_rgb_u8(0x1e, 0x4f, 0x9c),
            Self::ShallowWater => Color::from_rgb_u8(0x3c, 0x8f, 0x5a),
            Self::Key => Color::from_rgb_u8(0xd4, 0xaf, 0x37),
            Self::OpenDoor => Color::from_rgb_u8(0x8b, 0x5a, 0x2b),
            Self::ClosedDoor => Color::from_rgb_u8(0x5c, 0x33, 0x17),
            Self::Potion => Color::from_rgb_u8(0xc8, 0x2a, 0x36),
            Self::Chest => Color::from_rgb_u8(0xa0, 0x6a, 0x30),
            Self::Teleporter => Color::from_rgb_u8(0x8a, 0x2b, 0xe2),
            Self::Armor => Color::from_rgb_u8(0xb0, 0xc4, 0xde),
            Self::Heart => Color::from_rgb_u8(0xe0, 0x30, 0x40),
            Self::Player => Color::from_rgb_u8(0xf5, 0xf5, 0xf5),
            Self::ArmoredPlayer => Color::from_rgb_u8(0x9e, 0xb8, 0xd8),
            Self::Fireball => Color::from_rgb_u8(0xff, 0x70, 0x10),
            Self::Skeleton => Color::from_rgb_u8(0xe8, 0xe4, 0xc9),
            Self::Giant => Color::from_rgb_u8(0x6b, 0x8e, 0x23),
            Self::Rat => Color::from_rgb_u8(0x7a, 0x6a, 0x5a),
            Self::Spider => Color::from_rgb_u8(0x20, 0x20, 0x20),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Character key pressed during this frame, if any.
    pub key: Option<char>,
    /// Whether the escape key was pressed during this frame.
    pub escape: bool,
}

/// Decision returned by the scene update closure after each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Keep presenting frames.
    Continue,
    /// Close the window and return from [`RenderingBackend::run`].
    Exit,
}

/// A sprite placed on the grid, in tile units.
///
/// Positions are fractional while an entity animates between two cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSprite {
    /// Image to draw.
    pub key: SpriteKey,
    /// Top-left corner expressed in tiles.
    pub position: Vec2,
}

impl SceneSprite {
    /// Creates a sprite resting on `cell`.
    #[must_use]
    pub fn at_cell(key: SpriteKey, cell: CellCoord) -> Self {
        Self {
            key,
            position: Vec2::new(cell.column() as f32, cell.row() as f32),
        }
    }

    /// Creates a sprite displaced from `origin` by a pixel offset.
    #[must_use]
    pub fn in_flight(key: SpriteKey, origin: CellCoord, offset: (i64, i64), tile_size: u32) -> Self {
        let tile_size = tile_size.max(1) as f32;
        let displacement = Vec2::new(offset.0 as f32, offset.1 as f32) / tile_size;
        let mut sprite = Self::at_cell(key, origin);
        sprite.position += displacement;
        sprite
    }
}

/// Player statistics shown beside the grid.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Hud {
    /// Title of the level being explored.
    pub level_title: String,
    /// Remaining health.
    pub health: u8,
    /// Coins collected.
    pub coins: u32,
    /// Armor points while armor is worn.
    pub armor: Option<u8>,
    /// Whether the player is poisoned.
    pub poisoned: bool,
    /// Carried items in pickup order.
    pub inventory: Vec<SpriteKey>,
}

/// Full-window screens drawn instead of the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    /// Title card.
    Title,
    /// How to play.
    Instructions,
    /// The player died.
    GameOver,
    /// The last stairway was taken.
    Victory,
}

impl Overlay {
    /// Lines of text shown on the overlay, top to bottom.
    #[must_use]
    pub const fn lines(self) -> &'static [&'static str] {
        match self {
            Self::Title => &[
                WELCOME_BANNER,
                "Press Any Key to Begin",
                "Press 'L' Key for Tutorial",
            ],
            Self::Instructions => &[
                "Find the stairs to complete each level.",
                "Search the levels to find useful items.",
                "Avoid enemies during your adventure!",
                "Use WASD to move and E to drink a potion.",
                "Press 'P' to save and 'O' to load.",
                "Press any key to begin",
            ],
            Self::GameOver => &["Game Over!", "Press Any Key to Close"],
            Self::Victory => &["Game Complete!", "Press Any Key to Close"],
        }
    }
}

/// Everything drawn in a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of tile columns of the level.
    pub columns: u32,
    /// Number of tile rows of the level.
    pub rows: u32,
    /// Side length of a tile in pixels.
    pub tile_length: f32,
    /// Grid tiles in row-major order.
    pub tiles: Vec<SceneSprite>,
    /// Stationary objects drawn above tiles: chests and teleporters.
    pub props: Vec<SceneSprite>,
    /// Moving or movable entities drawn last.
    pub actors: Vec<SceneSprite>,
    /// Side panel contents.
    pub hud: Hud,
    /// Transient message drawn in the side panel.
    pub message: Option<String>,
    /// Full-window screen replacing the level, if any.
    pub overlay: Option<Overlay>,
}

impl Scene {
    /// Width of the side panel in tiles.
    pub const HUD_COLUMNS: u32 = 2;

    /// Creates an empty scene for a grid of the given size.
    pub fn new(columns: u32, rows: u32, tile_length: f32) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyGrid { columns, rows });
        }
        if tile_length.is_nan() || tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            tiles: Vec::new(),
            props: Vec::new(),
            actors: Vec::new(),
            hud: Hud::default(),
            message: None,
            overlay: None,
        })
    }

    /// Window width in pixels, side panel included.
    #[must_use]
    pub fn total_width(&self) -> f32 {
        (self.columns + Self::HUD_COLUMNS) as f32 * self.tile_length
    }

    /// Window height in pixels.
    #[must_use]
    pub fn total_height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Drops all per-frame content while keeping the grid dimensions.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.props.clear();
        self.actors.clear();
        self.message = None;
        self.overlay = None;
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }

    /// Presentation titled after the game on a black background.
    #[must_use]
    pub fn for_game(scene: Scene) -> Self {
        Self::new(GAME_TITLE, Color::from_rgb_u8(0, 0, 0), scene)
    }
}

/// Rendering backend capable of presenting dungeon scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the input captured by the
    /// adapter during the frame and rebuilds the scene before it is drawn.
    /// Returning [`FrameControl::Exit`] closes the window.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> FrameControl + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq)]
pub enum RenderingError {
    /// The grid must have at least one row and one column.
    #[error("scene grid must not be empty (received {columns}x{rows})")]
    EmptyGrid {
        /// Provided column count.
        columns: u32,
        /// Provided row count.
        rows: u32,
    },
    /// Tiles must have a positive size.
    #[error("tile_length must be positive (received {tile_length})")]
    InvalidTileLength {
        /// Provided tile length that failed validation.
        tile_length: f32,
    },
}
