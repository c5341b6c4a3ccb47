use std::fs;

use flow_currents::core::config::{GameConfig, LineDirectionMode};

#[test]
fn bundled_config_parses_and_validates() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/config/game.ron");
    let cfg = GameConfig::load_from_file(path).expect("bundled game.ron parses");
    assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
    assert_eq!(cfg.default_level_id, "test_currents");
}

#[test]
fn local_layer_overrides_only_named_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path().join("game.ron");
    let local = dir.path().join("game.local.ron");
    fs::write(
        &base,
        r#"(
            window: (width: 800.0, height: 600.0, title: "Base"),
            flow: (max_force: 100.0, force_multiplier: 2.0),
        )"#,
    )
    .expect("write base");
    fs::write(&local, r#"(flow: (force_multiplier: 0.5, line_direction: "geometric"))"#).expect("write local");

    let (cfg, used, errors) = GameConfig::load_layered([&base, &local]);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(used.len(), 2);
    assert_eq!(cfg.window.title, "Base");
    assert_eq!(cfg.flow.max_force, 100.0);
    assert_eq!(cfg.flow.force_multiplier, 0.5);
    assert_eq!(cfg.flow.force_scale(), 50.0);
    assert_eq!(cfg.flow.line_mode(), LineDirectionMode::Geometric);
}

#[test]
fn missing_layer_is_reported_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path().join("game.ron");
    fs::write(&base, "(default_level_id: \"reef\")").expect("write base");
    let (cfg, used, errors) = GameConfig::load_layered([base.clone(), dir.path().join("nope.ron")]);
    assert_eq!(cfg.default_level_id, "reef");
    assert_eq!(used.len(), 1);
    assert_eq!(errors.len(), 1);
}
