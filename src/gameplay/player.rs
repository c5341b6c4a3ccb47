use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::components::{FlowBody, Player};
use crate::core::config::GameConfig;
use crate::core::system::system_order::PrePhysicsSet;
use crate::physics::flow::integrator::apply_flow_currents;

const PLAYER_Z: f32 = 10.0;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, spawn_player)).add_systems(
            Update,
            steer_player
                .in_set(PrePhysicsSet)
                .before(apply_flow_currents),
        );
    }
}

fn setup_camera(mut commands: Commands) {
    // Bevy 0.16+: spawn Camera2d component directly; Required Components supply defaults.
    commands.spawn(Camera2d);
}

fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    cfg: Res<GameConfig>,
) {
    let p = &cfg.player;
    let mesh = meshes.add(Mesh::from(Circle { radius: p.radius }));
    let material = materials.add(Color::srgb(0.95, 0.8, 0.3));
    commands.spawn((
        Name::new("Player"),
        Player,
        FlowBody::default(),
        RigidBody::Dynamic,
        Collider::ball(p.radius),
        Velocity::zero(),
        // Underwater: no global gravity on the swimmer, currents do the pushing.
        GravityScale(0.0),
        Damping {
            linear_damping: p.linear_damping,
            angular_damping: 1.0,
        },
        LockedAxes::ROTATION_LOCKED,
        Mesh2d(mesh),
        MeshMaterial2d(material),
        Transform::from_xyz(p.spawn_x, p.spawn_y, PLAYER_Z),
    ));
    info!(target: "flow", "Spawned player at ({}, {})", p.spawn_x, p.spawn_y);
}

/// Keyboard steering (WASD / arrows) with a speed cap.
fn steer_player(
    time: Res<Time>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    cfg: Res<GameConfig>,
    mut q: Query<&mut Velocity, With<Player>>,
) {
    let Some(keys) = keys else {
        return;
    };
    let mut dir = Vec2::ZERO;
    if keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        dir.x -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        dir.x += 1.0;
    }
    if keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        dir.y += 1.0;
    }
    if keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        dir.y -= 1.0;
    }
    if dir == Vec2::ZERO {
        return;
    }
    let dt = time.delta_secs();
    let p = &cfg.player;
    for mut vel in q.iter_mut() {
        vel.linvel += dir.normalize() * p.move_accel * dt;
        vel.linvel = vel.linvel.clamp_length_max(p.max_speed);
    }
}
