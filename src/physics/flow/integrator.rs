use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;

use super::field::{FlowField, FlowSample};
use crate::core::components::FlowBody;
use crate::core::config::{FlowConfig, GameConfig};
use crate::core::system::system_order::PrePhysicsSet;

/// Integrator tunables pulled out of `FlowConfig` once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorTuning {
    pub floor_threshold: f32,
    pub floor_cap: f32,
    pub nudge_factor: f32,
}

impl From<&FlowConfig> for IntegratorTuning {
    fn from(c: &FlowConfig) -> Self {
        Self {
            floor_threshold: c.velocity_floor_threshold,
            floor_cap: c.velocity_floor_cap,
            nudge_factor: c.nudge_factor,
        }
    }
}

impl Default for IntegratorTuning {
    fn default() -> Self {
        Self::from(&FlowConfig::default())
    }
}

/// Applies one flow sample to a body's velocity and position.
///
/// Returns `false` (and leaves both untouched) when the sample is unaffected or `dt` is unusable.
pub fn integrate(
    velocity: &mut Vec2,
    position: &mut Vec2,
    sample: FlowSample,
    dt: f32,
    tuning: &IntegratorTuning,
) -> bool {
    if !sample.affected || !dt.is_finite() || dt <= 0.0 {
        return false;
    }
    let force = sample.force;
    let before = *velocity;
    let mut v = before + force * dt;
    v.x = floor_axis(v.x, before.x, force.x, tuning);
    v.y = floor_axis(v.y, before.y, force.y, tuning);
    *velocity = Vec2::new(finite_or_zero(v.x), finite_or_zero(v.y));

    let nudged = *position + force * dt * tuning.nudge_factor;
    if nudged.is_finite() {
        *position = nudged;
    }
    true
}

/// Velocity floor: a body that was already drifting with a strong enough current before
/// this tick moves at least `min(|force|, cap)` along that axis. The sign test uses the
/// pre-step velocity `before`; bodies at rest or pushing against the current keep the Euler value.
#[inline]
fn floor_axis(v: f32, before: f32, f: f32, t: &IntegratorTuning) -> f32 {
    if f.abs() <= t.floor_threshold || before == 0.0 || before.signum() != f.signum() {
        return v;
    }
    let min_speed = f.abs().min(t.floor_cap);
    if v.abs() < min_speed {
        min_speed * f.signum()
    } else {
        v
    }
}

#[inline]
fn finite_or_zero(c: f32) -> f32 {
    if c.is_finite() {
        c
    } else {
        0.0
    }
}

/// Samples the field for every flow body and feeds the result into its Rapier velocity.
pub fn apply_flow_currents(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    field: Option<Res<FlowField>>,
    mut bodies: Query<(
        Entity,
        &FlowBody,
        &mut Transform,
        Option<&mut Velocity>,
        &mut FlowSample,
    )>,
) {
    let Some(field) = field else {
        return;
    };
    let dt = time.delta_secs();
    let tuning = IntegratorTuning::from(&cfg.flow);
    for (entity, body, mut transform, velocity, mut last) in bodies.iter_mut() {
        let pos = transform.translation.truncate();
        let sample = field.compute_force_for(pos, body.affinity);
        *last = sample;
        if !sample.affected {
            continue;
        }
        let Some(mut velocity) = velocity else {
            debug!(target: "flow", "apply_flow_currents: {entity:?} has no Velocity; skipped");
            continue;
        };
        let mut linvel = velocity.linvel;
        let mut new_pos = pos;
        if integrate(&mut linvel, &mut new_pos, sample, dt, &tuning) {
            velocity.linvel = linvel;
            transform.translation.x = new_pos.x;
            transform.translation.y = new_pos.y;
        }
    }
}

pub struct FlowIntegratorPlugin;

impl Plugin for FlowIntegratorPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<FlowSample>()
            .add_systems(Update, apply_flow_currents.in_set(PrePhysicsSet));
    }
}
