#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the dungeon crawler.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the crate depends on macroquad without its default `audio` feature.

mod sprites;

use std::{path::PathBuf, sync::mpsc, time::Duration};

use anyhow::{Context, Result};
use dungeon_crawl_rendering::{
    Color, FrameControl, FrameInput, Hud, Overlay, Presentation, RenderingBackend, Scene,
    SceneSprite, SpriteKey,
};
use glam::Vec2;
use macroquad::input::{get_char_pressed, is_key_pressed, KeyCode};
use tracing::{info, warn};

use self::sprites::{DrawParams, SpriteAtlas};

const TEXT_COLOR: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const POISON_TINT: Color = Color::new(0.55, 1.0, 0.55, 1.0);

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    manifest_path: Option<PathBuf>,
}

impl MacroquadBackend {
    /// Returns a backend drawing flat colored tiles at the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.swap_interval = Some(i32::from(enabled));
        self
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Draws sprites listed in the manifest at `path` instead of flat colors.
    ///
    /// `None` selects `assets/manifest.toml`.
    #[must_use]
    pub fn with_sprites(mut self, path: Option<PathBuf>) -> Self {
        self.manifest_path = Some(path.unwrap_or_else(SpriteAtlas::default_manifest_path));
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a frame and returns the average rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> FrameControl + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            manifest_path,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.total_width().round() as i32,
            window_height: scene.total_height().round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (atlas_init_sender, atlas_init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let sprite_atlas = match manifest_path {
                Some(path) => match SpriteAtlas::from_manifest_path(&path)
                    .context("failed to initialise sprite atlas")
                {
                    Ok(atlas) => Some(atlas),
                    Err(error) => {
                        let _ = atlas_init_sender.send(Err(error));
                        return;
                    }
                },
                None => None,
            };
            let _ = atlas_init_sender.send(Ok(()));

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let input = poll_frame_input();
                if update_scene(input, &mut scene) == FrameControl::Exit {
                    break;
                }

                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );

                if let Some(overlay) = scene.overlay {
                    draw_overlay(overlay, &metrics);
                } else {
                    let painter = Painter {
                        metrics: &metrics,
                        atlas: sprite_atlas.as_ref(),
                    };
                    for sprite in scene.tiles.iter().chain(&scene.props) {
                        painter.sprite(sprite, None);
                    }
                    let player_tint = scene.hud.poisoned.then_some(POISON_TINT);
                    for sprite in &scene.actors {
                        let tint = match sprite.key {
                            SpriteKey::Player | SpriteKey::ArmoredPlayer => player_tint,
                            _ => None,
                        };
                        painter.sprite(sprite, tint);
                    }
                    draw_side_panel(&scene, clear_color, &painter);
                }

                let frame = Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                if let Some(per_second) = fps_counter.record_frame(frame) {
                    if show_fps {
                        info!(fps = per_second, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        atlas_init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

/// Reads at most one printable key and the escape key for this frame.
fn poll_frame_input() -> FrameInput {
    let escape = is_key_pressed(KeyCode::Escape);
    let mut key = None;
    while let Some(character) = get_char_pressed() {
        if key.is_none() && !character.is_control() {
            key = Some(character);
        }
    }
    FrameInput { key, escape }
}

/// Maps scene tile units to screen pixels, letterboxing the scene to keep tiles square.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    offset: Vec2,
    tile_step: f32,
    columns: u32,
    rows: u32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let world_width = scene.total_width();
        let world_height = scene.total_height();
        let scale = (screen_width / world_width)
            .min(screen_height / world_height)
            .max(0.0);
        let offset = Vec2::new(
            (screen_width - world_width * scale) / 2.0,
            (screen_height - world_height * scale) / 2.0,
        );

        Self {
            offset,
            tile_step: scene.tile_length * scale,
            columns: scene.columns,
            rows: scene.rows,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        self.offset + position * self.tile_step
    }

    fn panel_left(&self) -> f32 {
        self.to_screen(Vec2::new(self.columns as f32, 0.0)).x
    }

    fn total_size(&self) -> Vec2 {
        Vec2::new(
            (self.columns + Scene::HUD_COLUMNS) as f32,
            self.rows as f32,
        ) * self.tile_step
    }
}

struct Painter<'a> {
    metrics: &'a SceneMetrics,
    atlas: Option<&'a SpriteAtlas>,
}

impl Painter<'_> {
    fn sprite(&self, sprite: &SceneSprite, tint: Option<Color>) {
        self.icon(sprite.key, self.metrics.to_screen(sprite.position), 1.0, tint);
    }

    /// Draws `key` at a screen position, `scale` tiles wide.
    fn icon(&self, key: SpriteKey, position: Vec2, scale: f32, tint: Option<Color>) {
        let size = Vec2::splat(self.metrics.tile_step * scale);
        if let Some(atlas) = self.atlas {
            let mut params = DrawParams::new(position, size);
            if let Some(tint) = tint {
                params = params.with_tint(tint);
            }
            match atlas.draw(key, params) {
                Ok(()) => return,
                Err(error) => warn!(?key, %error, "falling back to flat color"),
            }
        }

        let mut color = key.fallback_color();
        if let Some(tint) = tint {
            color = Color::new(
                color.red * tint.red,
                color.green * tint.green,
                color.blue * tint.blue,
                color.alpha,
            );
        }
        macroquad::shapes::draw_rectangle(
            position.x,
            position.y,
            size.x,
            size.y,
            to_macroquad_color(color),
        );
    }
}

/// Lines of the side panel, top to bottom: an optional icon and a label.
fn side_panel_rows(hud: &Hud) -> Vec<(Option<SpriteKey>, String)> {
    let mut rows = vec![
        (None, hud.level_title.clone()),
        (Some(SpriteKey::Heart), hud.health.to_string()),
        (Some(SpriteKey::Coin), hud.coins.to_string()),
    ];
    if let Some(armor) = hud.armor {
        rows.push((Some(SpriteKey::Armor), armor.to_string()));
    }
    if hud.poisoned {
        rows.push((None, String::from("Poisoned")));
    }
    rows.extend(
        hud.inventory
            .iter()
            .map(|item| (Some(*item), String::new())),
    );
    rows
}

fn draw_side_panel(scene: &Scene, clear_color: Color, painter: &Painter<'_>) {
    let metrics = painter.metrics;
    let left = metrics.panel_left();
    let top = metrics.offset.y;
    let step = metrics.tile_step;
    let width = Scene::HUD_COLUMNS as f32 * step;
    macroquad::shapes::draw_rectangle(
        left,
        top,
        width,
        metrics.total_size().y,
        to_macroquad_color(clear_color.lighten(0.15)),
    );

    let font_size = (step * 0.4).max(8.0);
    let row_height = step * 0.6;
    let mut y = top + step * 0.2;
    for (icon, label) in side_panel_rows(&scene.hud) {
        let mut text_left = left + step * 0.1;
        if let Some(icon) = icon {
            painter.icon(icon, Vec2::new(text_left, y), 0.5, None);
            text_left += step * 0.6;
        }
        macroquad::text::draw_text(
            &label,
            text_left,
            y + row_height * 0.7,
            font_size,
            to_macroquad_color(TEXT_COLOR),
        );
        y += row_height;
    }

    if let Some(message) = &scene.message {
        let message_top = top + metrics.total_size().y - step;
        for (index, line) in wrap_words(message, 14).iter().enumerate() {
            macroquad::text::draw_text(
                line,
                left + step * 0.1,
                message_top + font_size * index as f32,
                font_size * 0.8,
                to_macroquad_color(TEXT_COLOR),
            );
        }
    }
}

fn draw_overlay(overlay: Overlay, metrics: &SceneMetrics) {
    let size = metrics.total_size();
    let lines = overlay.lines();
    let font_size = (metrics.tile_step * 0.5).max(12.0);
    let line_height = font_size * 1.6;
    let block_height = line_height * lines.len() as f32;
    let mut y = metrics.offset.y + (size.y - block_height) / 2.0 + font_size;

    for (index, line) in lines.iter().enumerate() {
        let line_size = if index == 0 { font_size * 1.5 } else { font_size };
        let dimensions = macroquad::text::measure_text(line, None, line_size as u16, 1.0);
        let x = metrics.offset.x + (size.x - dimensions.width) / 2.0;
        macroquad::text::draw_text(line, x, y, line_size, to_macroquad_color(TEXT_COLOR));
        y += line_height;
    }
}

/// Greedy word wrap to at most `width` characters per line.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        match lines.last_mut() {
            Some(line) if line.len() + 1 + word.len() <= width => {
                line.push(' ');
                line.push_str(word);
            }
            _ => lines.push(word.to_owned()),
        }
    }
    lines
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
