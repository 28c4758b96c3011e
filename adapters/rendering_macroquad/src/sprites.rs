use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use dungeon_crawl_rendering::{Color, SpriteKey};
use glam::Vec2;
use macroquad::{
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};

use crate::to_macroquad_color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Where and how large a sprite lands on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawParams {
    position: Vec2,
    size: Vec2,
    tint: Color,
}

impl DrawParams {
    pub(crate) fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            tint: Color::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    pub(crate) fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

/// Textures loaded from the sprite manifest, one per [`SpriteKey`].
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    pub(crate) fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    pub(crate) fn draw(&self, key: SpriteKey, params: DrawParams) -> Result<()> {
        let texture = *self
            .textures
            .get(&key)
            .with_context(|| format!("sprite {key:?} missing from atlas"))?;

        let draw_params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(params.size.x, params.size.y)),
            ..DrawTextureParams::default()
        };

        texture::draw_texture_ex(
            texture,
            params.position.x,
            params.position.y,
            to_macroquad_color(params.tint),
            draw_params,
        );

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Self::from_entries(entries, &mut loader)
    }

    fn from_entries(
        entries: Vec<(SpriteKey, PathBuf)>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            let texture = loader(key, &path).with_context(|| {
                format!("failed to load sprite {key:?} from {}", path.display())
            })?;
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for {key:?}");
            }
        }
        Ok(Self { textures })
    }
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
}

/// Resolves manifest entries against `base_path`, ordered like [`SpriteKey::ALL`].
fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let Some(key) = SpriteKey::from_name(&name) else {
            bail!("unknown sprite key `{name}` in manifest");
        };
        if resolved.insert(key, base_path.join(relative_path)).is_some() {
            bail!("sprite manifest contains duplicate entry for {key:?}");
        }
    }

    let mut ordered = Vec::with_capacity(SpriteKey::ALL.len());
    for key in SpriteKey::ALL {
        let Some(path) = resolved.remove(&key) else {
            bail!("sprite manifest missing entry for `{}`", key.name());
        };
        ordered.push((key, path));
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, fmt::Write as _};

    fn full_manifest(skip: Option<SpriteKey>, extra: &str) -> String {
        let mut manifest = String::from("version = 1\n\n[sprites]\n");
        for key in SpriteKey::ALL.into_iter().rev() {
            if Some(key) == skip {
                continue;
            }
            writeln!(manifest, "{} = \"tiles/{}.png\"", key.name(), key.name())
                .expect("writing to a string cannot fail");
        }
        manifest.push_str(extra);
        manifest
    }

    #[test]
    fn parse_manifest_requires_all_known_keys() {
        let manifest = full_manifest(Some(SpriteKey::Spider), "");
        let error = parse_manifest(&manifest, Path::new("assets"))
            .expect_err("manifest missing spider should fail");
        assert!(error.to_string().contains("spider"));
    }

    #[test]
    fn bundled_manifest_points_at_shipped_images() {
        let manifest_path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../..")
            .join(SpriteAtlas::default_manifest_path());
        let contents = fs::read_to_string(&manifest_path).expect("bundled manifest");
        let base = manifest_path.parent().expect("manifest directory");
        let entries = parse_manifest(&contents, base).expect("bundled manifest parses");

        assert_eq!(entries.len(), SpriteKey::ALL.len());
        for (key, path) in entries {
            let bytes = fs::read(&path).expect("sprite image present");
            assert!(bytes.starts_with(b"\x89PNG"), "{key:?} is not a png");
        }
    }

    #[test]
    fn manifest_rejects_unknown_keys() {
        let manifest = full_manifest(None, "snake = \"tiles/snake.png\"\n");
        assert!(parse_manifest(&manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_rejects_other_versions() {
        let manifest = full_manifest(None, "").replace("version = 1", "version = 2");
        assert!(parse_manifest(&manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory() {
        let parsed = parse_manifest(&full_manifest(None, ""), Path::new("root"))
            .expect("manifest should parse");

        assert_eq!(parsed.len(), SpriteKey::ALL.len());
        assert_eq!(
            parsed[0],
            (SpriteKey::Floor, PathBuf::from("root/tiles/floor.png"))
        );
        assert_eq!(
            parsed.last(),
            Some(&(SpriteKey::Spider, PathBuf::from("root/tiles/spider.png")))
        );
    }

    #[test]
    fn atlas_loads_textures_using_deterministic_order() {
        let entries = parse_manifest(&full_manifest(None, ""), Path::new("assets"))
            .expect("manifest should parse into canonical order");
        let load_order = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_entries(entries, &mut |key, _| {
            load_order.borrow_mut().push(key);
            Ok(Texture2D::empty())
        })
        .expect("atlas should load using provided loader");

        assert_eq!(load_order.borrow().as_slice(), &SpriteKey::ALL);
        assert_eq!(atlas.texture_count(), SpriteKey::ALL.len());
    }

    #[test]
    fn atlas_rejects_duplicate_entries() {
        let entries = vec![
            (SpriteKey::Rat, PathBuf::from("rat.png")),
            (SpriteKey::Rat, PathBuf::from("other_rat.png")),
        ];
        let result = SpriteAtlas::from_entries(entries, &mut |_, _| Ok(Texture2D::empty()));
        assert!(result.is_err());
    }

    #[test]
    fn loader_failures_name_the_sprite() {
        let entries = vec![(SpriteKey::Chest, PathBuf::from("chest.png"))];
        let error = SpriteAtlas::from_entries(entries, &mut |_, _| bail!("disk on fire"))
            .expect_err("loader failure must propagate");
        assert!(format!("{error:#}").contains("Chest"));
    }
}
