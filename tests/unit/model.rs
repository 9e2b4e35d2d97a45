use super::*;

#[test]
fn builtin_catalog_is_valid_and_ordered() {
    let catalog = BackgroundCatalog::builtin();
    catalog.validate().unwrap();
    assert_eq!(catalog.len(), 13);
    let first = catalog.first().unwrap();
    assert_eq!(first.name, "4 blocks");
    assert_eq!(first.path, "backgrounds/one.jpg");
    assert!(catalog.iter().all(|bg| bg.kind == BackgroundKind::Image));
    assert_eq!(catalog.find_by_id("9").unwrap().name, "Flux WP BG");
    assert!(catalog.find_by_id("14").is_none());
}

#[test]
fn editor_selects_first_background_and_tracks_kind() {
    let catalog = BackgroundCatalog::new(vec![
        BackgroundOption::image("1", "Still", "backgrounds/one.jpg"),
        BackgroundOption {
            id: "14".to_string(),
            name: "Video BG 1".to_string(),
            path: "backgrounds/video1.mp4".to_string(),
            kind: BackgroundKind::Video,
        },
    ])
    .unwrap();

    let mut editor = EditorState::new(&catalog);
    assert_eq!(editor.selected_background(), "backgrounds/one.jpg");
    assert!(!editor.is_video_background(&catalog));

    editor.select("backgrounds/video1.mp4");
    assert!(editor.is_video_background(&catalog));
    assert_eq!(editor.current_background(&catalog).unwrap().id, "14");

    editor.select("somewhere/else.png");
    assert!(editor.current_background(&catalog).is_none());
    assert!(!editor.is_video_background(&catalog));
}

#[test]
fn catalog_rejects_duplicates_and_traversal() {
    let dup = BackgroundCatalog::new(vec![
        BackgroundOption::image("1", "a", "a.jpg"),
        BackgroundOption::image("1", "b", "b.jpg"),
    ]);
    assert!(dup.is_err());

    let escape = BackgroundCatalog::new(vec![BackgroundOption::image("1", "a", "../a.jpg")]);
    assert!(escape.is_err());

    assert!(BackgroundCatalog::new(Vec::new()).is_err());
}

#[test]
fn catalog_json_uses_type_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"[{"id":"v","name":"Loop","path":"/backgrounds/loop.webm","type":"video"}]"#,
    )
    .unwrap();
    let catalog = BackgroundCatalog::from_json_file(&path).unwrap();
    let bg = catalog.find_by_id("v").unwrap();
    assert_eq!(bg.kind, BackgroundKind::Video);
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(
        normalize_rel_path("/backgrounds/./one.jpg").unwrap(),
        "backgrounds/one.jpg"
    );
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("/").is_err());
}

#[test]
fn resolve_joins_under_root() {
    let p = resolve_asset_path(Path::new("/srv/assets"), "/flux-logo.svg").unwrap();
    assert_eq!(p, PathBuf::from("/srv/assets/flux-logo.svg"));
}

#[test]
fn blank_subtext_has_no_lines() {
    assert!(!BannerContent::new("h", "   ").has_subtext());
    assert!(BannerContent::default().has_subtext());
}
