use bevy::prelude::*;

use crate::core::config::{FlowConfig, GameConfig};
use crate::physics::flow::FlowField;

use super::ambient::{AmbientDirective, AmbientDirectives};
use super::annotations::FlowFile;
use super::ingest::{ingest, IngestDiagnostic, IngestSettings};
use super::registry::{flow_file_path, levels_dir, resolve_requested_level_id, select_level_id};

/// Resource: final chosen level id
#[derive(Debug, Resource, Clone)]
pub struct LevelSelection {
    pub id: String,
}

/// Everything one flow file turns into.
#[derive(Debug, Clone)]
pub struct BuiltLevel {
    pub field: FlowField,
    pub ambient: Vec<AmbientDirective>,
    pub diagnostics: Vec<IngestDiagnostic>,
    pub backfilled: usize,
}

/// Ingests a parsed flow file with the configured settings and freezes the field.
pub fn build_flow_level(file: &FlowFile, cfg: &FlowConfig) -> BuiltLevel {
    let outcome = ingest(&file.annotations, &IngestSettings::from_config(cfg));
    BuiltLevel {
        field: FlowField::from_config(outcome.regions, cfg),
        ambient: outcome.ambient,
        diagnostics: outcome.diagnostics,
        backfilled: outcome.backfilled,
    }
}

/// Plugin performing data-driven flow loading at startup.
pub struct LevelLoaderPlugin;

impl Plugin for LevelLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_level_flows);
    }
}

pub fn load_level_flows(mut commands: Commands, game_cfg: Res<GameConfig>) {
    let base = levels_dir();
    let requested = resolve_requested_level_id();
    let (chosen_id, fell_back) = select_level_id(
        requested.as_deref(),
        &game_cfg.default_level_id,
        |id| flow_file_path(&base, id).is_some(),
    );
    if fell_back {
        warn!(
            target: "level",
            "LevelLoader: requested level {:?} (config default '{}') has no flow file; falling back to '{}'",
            requested,
            game_cfg.default_level_id,
            chosen_id
        );
    }
    info!(
        target: "level",
        "LevelLoader: requested='{:?}' selected level id='{}'", requested, chosen_id
    );
    commands.insert_resource(LevelSelection {
        id: chosen_id.clone(),
    });

    // A level without currents is playable; insert an empty field on any failure.
    let Some(path) = flow_file_path(&base, &chosen_id) else {
        error!(
            "LevelLoader: no flow file for level '{}' under {}",
            chosen_id,
            base.display()
        );
        commands.insert_resource(FlowField::empty(&game_cfg.flow));
        commands.insert_resource(AmbientDirectives::default());
        return;
    };
    let file = match FlowFile::load_from_file(&path) {
        Ok(f) => f,
        Err(e) => {
            error!("LevelLoader: FAILED to load flows: {e}");
            commands.insert_resource(FlowField::empty(&game_cfg.flow));
            commands.insert_resource(AmbientDirectives::default());
            return;
        }
    };
    debug!(
        target: "level",
        "LevelLoader: flow file {} loaded ({} annotations)",
        path.display(),
        file.annotations.len()
    );

    let built = build_flow_level(&file, &game_cfg.flow);
    for d in &built.diagnostics {
        warn!(target: "level", "LevelLoader: {d}");
    }
    info!(
        target: "level",
        "LevelLoader: completed (segments={}, polygons={}, ambient={}, defaulted_directions={}, diagnostics={})",
        built.field.segments().len(),
        built.field.polygons().len(),
        built.ambient.len(),
        built.backfilled,
        built.diagnostics.len()
    );
    commands.insert_resource(built.field);
    commands.insert_resource(AmbientDirectives(built.ambient));
}
