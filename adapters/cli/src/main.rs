#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the dungeon crawler.

mod game;
mod savegame;
mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_crawl_core::{TILE_SIZE, WELCOME_BANNER};
use dungeon_crawl_rendering::{Presentation, RenderingBackend, Scene};
use dungeon_crawl_rendering_macroquad::MacroquadBackend;
use dungeon_crawl_system_presentation::PresentationContext;
use dungeon_crawl_world::{query, GameSession};
use tracing::info;

use crate::game::Game;

#[derive(Debug, Parser)]
#[command(name = "dungeon-crawl", about = WELCOME_BANNER)]
struct CliArgs {
    /// Seed for the monster wandering RNG.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
    /// Save game written on `p` and read on `o`.
    #[arg(long, default_value = "savegame.json")]
    save_file: PathBuf,
    /// Draw sprites from `assets/manifest.toml` instead of flat colored tiles.
    ///
    /// The manifest path is relative to the working directory, so run from
    /// the workspace root or pass `--manifest`.
    #[arg(long)]
    sprites: bool,
    /// Sprite manifest to load; implies `--sprites`.
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// Synchronise frames with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
    /// Start playing immediately instead of showing the title screen.
    #[arg(long)]
    skip_title: bool,
}

/// Entry point for the dungeon crawler command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let session = GameSession::campaign().context("built-in campaign is malformed")?;
    let level = query::active_level(&session);
    let scene = Scene::new(level.columns(), level.rows(), TILE_SIZE as f32)
        .context("failed to size the game window")?;

    let context = if args.skip_title {
        PresentationContext::playing()
    } else {
        PresentationContext::new()
    };
    let mut game = Game::new(session, args.seed, args.save_file, context);

    let mut backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps);
    if args.sprites || args.manifest.is_some() {
        backend = backend.with_sprites(args.manifest);
    }

    info!(seed = args.seed, "starting game");
    backend.run(Presentation::for_game(scene), move |input, scene| {
        game.frame(input, scene)
    })
}
