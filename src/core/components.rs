use bevy::prelude::*;

use crate::physics::flow::{FlowAffinity, FlowSample};

/// Marker component identifying the player body (holds physics body & collider).
#[derive(Component)]
pub struct Player;

/// Bodies pushed around by flow currents. The last field sample is kept alongside.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[require(FlowSample)]
pub struct FlowBody {
    pub affinity: FlowAffinity,
}

impl FlowBody {
    pub fn harpoon() -> Self {
        Self {
            affinity: FlowAffinity::Harpoon,
        }
    }
}
