// This file is part of Flow Currents.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::core::level::LevelLoaderPlugin;
use crate::core::system::system_order::{PostPhysicsAdjustSet, PrePhysicsSet};
use crate::debug::FlowDebugPlugin;
use crate::gameplay::player::PlayerPlugin;
use crate::physics::flow::FlowIntegratorPlugin;
use crate::physics::rapier::PhysicsSetupPlugin;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (PrePhysicsSet, PostPhysicsAdjustSet.after(PrePhysicsSet)),
        )
        .add_plugins((
            PhysicsSetupPlugin,
            LevelLoaderPlugin,
            FlowIntegratorPlugin,
            PlayerPlugin,
            FlowDebugPlugin,
        ));
    }
}
