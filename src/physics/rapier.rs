use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::config::GameConfig;

/// Pixels per Rapier meter; level coordinates are authored in pixels.
pub const PIXELS_PER_METER: f32 = 50.0;

pub struct PhysicsSetupPlugin; // our wrapper to configure Rapier

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(
            PIXELS_PER_METER,
        ));
        let debug_render = app
            .world()
            .get_resource::<GameConfig>()
            .is_some_and(|c| c.rapier_debug);
        if debug_render {
            app.add_plugins(RapierDebugRenderPlugin::default());
        }
    }
}
