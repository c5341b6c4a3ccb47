use bevy::prelude::*;

use flow_currents::{GameConfig, GamePlugin};

fn main() {
    // Base config plus optional untracked local overrides; defaults when neither parses.
    let (cfg, used, errors) =
        GameConfig::load_layered(["assets/config/game.ron", "assets/config/game.local.ron"]);

    let window = cfg.window.clone();
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: window.title.clone(),
                resolution: (window.width, window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(cfg.clone())
        .add_systems(Startup, move || {
            for path in &used {
                info!(target: "config", "Loaded config layer {path}");
            }
            for e in &errors {
                warn!(target: "config", "{e}");
            }
            for w in cfg.validate() {
                warn!(target: "config", "Config warning: {w}");
            }
        })
        .add_plugins(GamePlugin)
        .run();
}
