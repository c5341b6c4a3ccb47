use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::core::level::properties::CompassDirection;

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Flow Currents".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub radius: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// Acceleration applied by keyboard input (pixels/sec^2).
    pub move_accel: f32,
    pub max_speed: f32,
    pub linear_damping: f32,
}
impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 16.0,
            spawn_x: 0.0,
            spawn_y: 0.0,
            move_accel: 900.0,
            max_speed: 600.0,
            linear_damping: 1.5,
        }
    }
}

/// How line-chain segments pick their push direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineDirectionMode {
    /// Use the `direction` tag; untagged chains get the default direction at finalize.
    #[default]
    Tagged,
    /// Always push along the segment's left-hand normal; the tag is kept for display only.
    Geometric,
}

impl LineDirectionMode {
    /// Case-insensitive `"tagged"` / `"geometric"`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "tagged" => Some(Self::Tagged),
            "geometric" => Some(Self::Geometric),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FlowConfig {
    pub max_force: f32,
    pub force_multiplier: f32,
    /// Per-axis bound on the summed field force.
    pub axis_clamp: f32,
    pub velocity_floor_threshold: f32,
    pub velocity_floor_cap: f32,
    pub nudge_factor: f32,
    /// Compass token assigned to every region left without a direction tag.
    pub default_direction: String,
    /// `"tagged"` or `"geometric"`; kept as a token so layered RON merges survive.
    pub line_direction: String,
    pub default_width: f32,
    pub default_strength: f32,
    /// Flip authored y coordinates (y-down editors) into the y-up world.
    pub flip_y: bool,
}
impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            max_force: 120.0,
            force_multiplier: 1.0,
            axis_clamp: 5000.0,
            velocity_floor_threshold: 10.0,
            velocity_floor_cap: 250.0,
            nudge_factor: 0.2,
            default_direction: "right".into(),
            line_direction: "tagged".into(),
            default_width: 80.0,
            default_strength: 1.5,
            flip_y: false,
        }
    }
}
impl FlowConfig {
    pub fn force_scale(&self) -> f32 {
        self.max_force * self.force_multiplier
    }

    /// Parsed line direction mode; unknown tokens fall back to `Tagged`.
    pub fn line_mode(&self) -> LineDirectionMode {
        LineDirectionMode::parse(&self.line_direction).unwrap_or_default()
    }

    /// Parsed default direction; unknown tokens fall back to `Right`.
    pub fn default_compass(&self) -> CompassDirection {
        CompassDirection::parse(&self.default_direction).unwrap_or(CompassDirection::Right)
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub default_level_id: String,
    pub rapier_debug: bool,
    pub player: PlayerConfig,
    pub flow: FlowConfig,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            default_level_id: String::new(),
            rapier_debug: false,
            player: Default::default(),
            flow: Default::default(),
        }
    }
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Merge several RON files (later files override earlier keys) into one config.
    /// Returns the config, the paths actually used, and any read/parse errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let existing = bm.iter_mut().find(|(ek, _)| **ek == k).map(|(_, ev)| ev);
                        match existing {
                            Some(ev) => merge_value(ev, v),
                            None => {
                                bm.insert(k, v);
                            }
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match &mut merged {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        match merged {
            Some(val) => match val.into_rust::<GameConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => {
                    errors.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    (GameConfig::default(), used, errors)
                }
            },
            None => (GameConfig::default(), used, errors),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.player.radius <= 0.0 {
            w.push("player.radius must be > 0".into());
        }
        if self.player.max_speed <= 0.0 {
            w.push("player.max_speed must be > 0".into());
        }
        let f = &self.flow;
        if !f.force_scale().is_finite() || f.force_scale() <= 0.0 {
            w.push(format!(
                "flow.max_force * flow.force_multiplier = {} -> currents push nothing (or backwards)",
                f.force_scale()
            ));
        }
        if !(f.axis_clamp > 0.0) {
            w.push(format!(
                "flow.axis_clamp {} must be > 0 (default bound used instead)",
                f.axis_clamp
            ));
        }
        if f.velocity_floor_threshold < 0.0 {
            w.push("flow.velocity_floor_threshold negative -> floor applies to any force".into());
        }
        if f.velocity_floor_cap < 0.0 {
            w.push("flow.velocity_floor_cap negative".into());
        }
        if f.velocity_floor_cap > 0.0 && f.velocity_floor_cap < f.velocity_floor_threshold {
            w.push(format!(
                "flow.velocity_floor_cap {} below threshold {} -> floor never raises speed meaningfully",
                f.velocity_floor_cap, f.velocity_floor_threshold
            ));
        }
        if !(0.0..=1.0).contains(&f.nudge_factor) {
            w.push(format!("flow.nudge_factor {} outside 0..1", f.nudge_factor));
        }
        if CompassDirection::parse(&f.default_direction).is_none() {
            w.push(format!(
                "flow.default_direction '{}' unknown; using 'right'",
                f.default_direction
            ));
        }
        if LineDirectionMode::parse(&f.line_direction).is_none() {
            w.push(format!(
                "flow.line_direction '{}' unknown; using 'tagged'",
                f.line_direction
            ));
        }
        if f.default_width <= 0.0 {
            w.push(format!("flow.default_width {} must be > 0", f.default_width));
        }
        if !(1.0..=10.0).contains(&f.default_strength) {
            w.push(format!(
                "flow.default_strength {} outside 1..10 (clamped at ingest)",
                f.default_strength
            ));
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_clean() {
        let cfg = GameConfig::default();
        assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
        assert_eq!(cfg.flow.force_scale(), 120.0);
        assert_eq!(cfg.flow.default_compass(), CompassDirection::Right);
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let cfg: GameConfig = ron::from_str(
            "(flow: (max_force: 50.0, force_multiplier: 2.0, line_direction: \"Geometric\"))",
        )
        .unwrap();
        assert_eq!(cfg.flow.force_scale(), 100.0);
        assert_eq!(cfg.flow.line_mode(), LineDirectionMode::Geometric);
        assert_eq!(cfg.flow.velocity_floor_cap, 250.0);
        assert_eq!(cfg.window.title, "Flow Currents");
    }

    #[test]
    fn validate_flags_bad_flow_values() {
        let mut cfg = GameConfig::default();
        cfg.flow.nudge_factor = 3.0;
        cfg.flow.default_direction = "sideways".into();
        cfg.flow.axis_clamp = 0.0;
        let joined = cfg.validate().join("\n");
        assert!(joined.contains("nudge_factor"));
        assert!(joined.contains("sideways"));
        assert!(joined.contains("axis_clamp"));
        assert_eq!(cfg.flow.default_compass(), CompassDirection::Right);
    }
}
