use bevy::prelude::{App, MinimalPlugins};
use flow_currents::core::config::GameConfig;
use flow_currents::core::level::{AmbientDirectives, LevelLoaderPlugin, LevelSelection};
use flow_currents::FlowField;

#[test]
fn level_loader_smoke() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(GameConfig::default());
    app.add_plugins(LevelLoaderPlugin);
    // First update runs Startup schedule
    app.update();

    let sel = app.world().get_resource::<LevelSelection>().expect("LevelSelection resource missing");
    assert_eq!(sel.id, "test_currents");

    let field = app.world().get_resource::<FlowField>().expect("FlowField resource missing");
    assert!(!field.is_empty(), "Expected regions from test_currents flows");
    assert_eq!(field.polygons().len(), 1);

    let ambient = app.world().get_resource::<AmbientDirectives>().expect("AmbientDirectives missing");
    assert_eq!(ambient.0.len(), 1);
}

#[test]
fn unknown_config_default_falls_back_to_bundled_level() {
    let mut cfg = GameConfig::default();
    cfg.default_level_id = "missing_level_id".into();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(cfg);
    app.add_plugins(LevelLoaderPlugin);
    app.update();

    let sel = app.world().get_resource::<LevelSelection>().unwrap();
    assert_eq!(sel.id, "test_currents", "Expected fallback to registry default level id");
    assert!(app.world().get_resource::<FlowField>().is_some());
}
