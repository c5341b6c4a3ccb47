//! Property bags attached to flow annotations.
//!
//! Editors emit tags either as an ordered list of `{ name, value }` pairs or as a plain
//! key -> value map, with inconsistent key casing and value types. Everything is
//! normalized here into `FlowProperties` so nothing downstream sees the raw encoding.
use bevy::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::f32::consts::FRAC_1_SQRT_2;

use crate::physics::flow::geometry::clamp_strength;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
    #[default]
    Null,
}

impl PropertyValue {
    pub fn as_f32(&self) -> Option<f32> {
        let v = match self {
            Self::Number(n) => *n as f32,
            Self::Text(s) => s.trim().parse::<f32>().ok()?,
            _ => return None,
        };
        v.is_finite().then_some(v)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(n) => Some(*n != 0.0),
            Self::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            Self::Null => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropertyPair {
    pub name: String,
    #[serde(default)]
    pub value: PropertyValue,
    /// Editor type hint ("float", "bool", ...); values are coerced regardless.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PropertyBag {
    Pairs(Vec<PropertyPair>),
    Map(BTreeMap<String, PropertyValue>),
}

impl PropertyBag {
    /// Entries in encounter order (pairs) or key order (map).
    pub fn entries(&self) -> Box<dyn Iterator<Item = (&str, &PropertyValue)> + '_> {
        match self {
            Self::Pairs(p) => Box::new(p.iter().map(|e| (e.name.as_str(), &e.value))),
            Self::Map(m) => Box::new(m.iter().map(|(k, v)| (k.as_str(), v))),
        }
    }
}

/// The eight compass tokens a `direction` tag may carry, in world (y-up) terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum CompassDirection {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl CompassDirection {
    /// Case-insensitive; `-`, `_` and spaces between the two halves of a diagonal are ignored.
    pub fn parse(token: &str) -> Option<Self> {
        let key: String = token
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "upleft" => Some(Self::UpLeft),
            "upright" => Some(Self::UpRight),
            "downleft" => Some(Self::DownLeft),
            "downright" => Some(Self::DownRight),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::UpLeft => "up-left",
            Self::UpRight => "up-right",
            Self::DownLeft => "down-left",
            Self::DownRight => "down-right",
        }
    }

    /// Unit vector in world space (Bevy, y-up): `Down` is `(0, -1)`.
    ///
    /// Data authored in a y-down editor names directions as seen on the page, where
    /// "down" is `(0, 1)`. Ingest with `flip_y` mirrors those vertices into the world, and
    /// the token then points the same way relative to the mirrored geometry.
    pub fn to_vec(self) -> Vec2 {
        const D: f32 = FRAC_1_SQRT_2;
        match self {
            Self::Up => Vec2::Y,
            Self::Down => Vec2::NEG_Y,
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
            Self::UpLeft => Vec2::new(-D, D),
            Self::UpRight => Vec2::new(D, D),
            Self::DownLeft => Vec2::new(-D, -D),
            Self::DownRight => Vec2::new(D, -D),
        }
    }
}

/// Defaults substituted for missing or unparseable tags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDefaults {
    pub strength: f32,
    pub width: f32,
}

impl Default for PropertyDefaults {
    fn default() -> Self {
        Self {
            strength: 1.5,
            width: 80.0,
        }
    }
}

pub const DEFAULT_AMBIENT_INTERVAL: f32 = 1.5;
pub const DEFAULT_AMBIENT_BURST: u32 = 3;

/// Normalized tags of one annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowProperties {
    pub strength: f32,
    pub width: f32,
    /// `None` until the finalize pass backfills the default.
    pub direction: Option<CompassDirection>,
    pub harpoon_only: bool,
    pub ambient: bool,
    pub interval: f32,
    pub burst: u32,
}

impl FlowProperties {
    pub fn defaults(d: &PropertyDefaults) -> Self {
        Self {
            strength: clamp_strength(d.strength),
            width: d.width,
            direction: None,
            harpoon_only: false,
            ambient: false,
            interval: DEFAULT_AMBIENT_INTERVAL,
            burst: DEFAULT_AMBIENT_BURST,
        }
    }
}

/// Folds a property bag into typed tags. Missing or unparseable values keep their default;
/// later entries win over earlier ones.
pub fn extract_properties(bag: Option<&PropertyBag>, defaults: &PropertyDefaults) -> FlowProperties {
    let mut out = FlowProperties::defaults(defaults);
    let Some(bag) = bag else {
        return out;
    };
    for (name, value) in bag.entries() {
        match name.trim().to_ascii_lowercase().as_str() {
            "strength" => {
                if let Some(s) = value.as_f32() {
                    out.strength = clamp_strength(s);
                }
            }
            "width" => {
                if let Some(w) = value.as_f32().filter(|w| *w > 0.0) {
                    out.width = w;
                }
            }
            "direction" => {
                if let Some(d) = value.as_text().and_then(CompassDirection::parse) {
                    out.direction = Some(d);
                }
            }
            "harpoon_only" | "harpoononly" => {
                if let Some(b) = value.as_bool() {
                    out.harpoon_only = b;
                }
            }
            "ambient" => {
                if let Some(b) = value.as_bool() {
                    out.ambient = b;
                }
            }
            "interval" => {
                if let Some(i) = value.as_f32().filter(|i| *i > 0.0) {
                    out.interval = i;
                }
            }
            "burst" => {
                if let Some(b) = value.as_f32().filter(|b| *b >= 1.0) {
                    out.burst = b as u32;
                }
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs_json(txt: &str) -> PropertyBag {
        serde_json::from_str(txt).unwrap()
    }

    #[test]
    fn pairs_and_map_encodings_agree() {
        let pairs = pairs_json(
            r#"[{"name":"Strength","type":"float","value":4},
                {"name":"WIDTH","value":"120"},
                {"name":"direction","value":"Up-Left"},
                {"name":"HarpoonOnly","type":"bool","value":true}]"#,
        );
        let map = pairs_json(
            r#"{"strength":4.0,"width":120,"Direction":"up_left","harpoon_only":"true"}"#,
        );
        let d = PropertyDefaults::default();
        let a = extract_properties(Some(&pairs), &d);
        let b = extract_properties(Some(&map), &d);
        assert_eq!(a, b);
        assert_eq!(a.strength, 4.0);
        assert_eq!(a.width, 120.0);
        assert_eq!(a.direction, Some(CompassDirection::UpLeft));
        assert!(a.harpoon_only);
    }

    #[test]
    fn missing_bag_yields_defaults() {
        let p = extract_properties(None, &PropertyDefaults::default());
        assert_eq!(p.strength, 1.5);
        assert_eq!(p.width, 80.0);
        assert_eq!(p.direction, None);
        assert!(!p.harpoon_only);
    }

    #[test]
    fn garbage_values_fall_back_silently() {
        let bag = pairs_json(
            r#"{"strength":"strong","width":-4,"direction":"sideways","harpoon_only":"maybe"}"#,
        );
        let p = extract_properties(Some(&bag), &PropertyDefaults::default());
        assert_eq!(p.strength, 1.5);
        assert_eq!(p.width, 80.0);
        assert_eq!(p.direction, None);
        assert!(!p.harpoon_only);
    }

    #[test]
    fn strength_is_clamped() {
        let hi = pairs_json(r#"{"strength":99}"#);
        let lo = pairs_json(r#"[{"name":"strength","value":0.1}]"#);
        let d = PropertyDefaults::default();
        assert_eq!(extract_properties(Some(&hi), &d).strength, 10.0);
        assert_eq!(extract_properties(Some(&lo), &d).strength, 1.0);
    }

    #[test]
    fn ron_map_bag_parses() {
        let bag: PropertyBag =
            ron::from_str(r#"{"strength": 3.0, "direction": "down", "harpoon_only": false}"#)
                .unwrap();
        let p = extract_properties(Some(&bag), &PropertyDefaults::default());
        assert_eq!(p.strength, 3.0);
        assert_eq!(p.direction, Some(CompassDirection::Down));
    }

    #[test]
    fn compass_vectors_are_unit() {
        for token in ["up", "down", "left", "right", "upleft", "up-right", "Down_Left", "down right"] {
            let d = CompassDirection::parse(token).unwrap();
            assert!((d.to_vec().length() - 1.0).abs() < 1e-6, "{token}");
        }
        assert_eq!(CompassDirection::parse("north"), None);
        assert_eq!(CompassDirection::Down.to_vec(), Vec2::NEG_Y);
    }
}
