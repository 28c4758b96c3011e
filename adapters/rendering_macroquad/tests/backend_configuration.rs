use dungeon_crawl_rendering_macroquad::MacroquadBackend;

#[test]
fn sprites_default_to_the_bundled_manifest() {
    let backend = MacroquadBackend::new().with_sprites(None);
    let debug = format!("{backend:?}");
    assert!(debug.contains("assets/manifest.toml"), "{debug}");
}

#[test]
fn flat_colors_are_the_default() {
    let backend = MacroquadBackend::new().with_vsync(false).with_show_fps(true);
    let debug = format!("{backend:?}");
    assert!(debug.contains("manifest_path: None"), "{debug}");
    assert!(debug.contains("swap_interval: Some(0)"), "{debug}");
}
