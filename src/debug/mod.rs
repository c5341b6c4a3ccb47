//! Debug module: feature gated flow-field visualization & periodic logging.
//! Built only when compiled with `--features debug`. Strictly read-only on the field.

#[cfg(feature = "debug")]
mod logging;
#[cfg(feature = "debug")]
pub mod overlay;

#[cfg(feature = "debug")]
use bevy::prelude::*;
#[cfg(feature = "debug")]
use crate::core::system::system_order::PostPhysicsAdjustSet;

/// Toggle + cadence for the flow debug observer.
#[cfg(feature = "debug")]
#[derive(Resource, Debug, Clone)]
pub struct FlowDebugState {
    pub draw_regions: bool,
    pub log_interval: f32,
    pub time_accum: f32,
    pub frame_counter: u64,
}

#[cfg(feature = "debug")]
impl Default for FlowDebugState {
    fn default() -> Self {
        Self {
            draw_regions: true,
            log_interval: 1.0,
            time_accum: 0.0,
            frame_counter: 0,
        }
    }
}

#[cfg(feature = "debug")]
pub struct FlowDebugPlugin;

#[cfg(feature = "debug")]
impl Plugin for FlowDebugPlugin {
    fn build(&self, app: &mut App) {
        use logging::flow_logging_system;
        use overlay::{draw_flow_regions, draw_flow_samples};

        fn toggle_region_gizmos(
            keys: Option<Res<ButtonInput<KeyCode>>>,
            mut state: ResMut<FlowDebugState>,
        ) {
            let Some(keys) = keys else {
                return;
            };
            if keys.just_pressed(KeyCode::F1) {
                state.draw_regions = !state.draw_regions;
                info!("flow debug gizmos: {}", if state.draw_regions { "on" } else { "off" });
            }
        }

        app.init_resource::<FlowDebugState>().add_systems(
            Update,
            (
                toggle_region_gizmos,
                draw_flow_regions,
                draw_flow_samples,
                flow_logging_system,
            )
                .chain()
                .in_set(PostPhysicsAdjustSet),
        );
    }
}

// Stub plugin when debug feature disabled so callers can still add it unconditionally.
#[cfg(not(feature = "debug"))]
pub struct FlowDebugPlugin;
#[cfg(not(feature = "debug"))]
impl bevy::prelude::Plugin for FlowDebugPlugin {
    fn build(&self, _app: &mut bevy::prelude::App) {}
}
