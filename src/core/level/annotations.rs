use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;

use super::properties::PropertyBag;

pub const FLOW_FILE_VERSION: u32 = 1;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Vec2Def {
    pub x: f32,
    pub y: f32,
}
impl From<Vec2Def> for Vec2 {
    fn from(v: Vec2Def) -> Self {
        Vec2::new(v.x, v.y)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    #[serde(alias = "line", alias = "Polyline", alias = "polyline")]
    Line,
    #[serde(alias = "polygon")]
    Polygon,
    /// Effect-only marker: produces an ambient directive, never a force region.
    #[serde(alias = "ambient")]
    Ambient,
}

/// One authored annotation. Vertices are relative to the optional origin (`x`, `y`).
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RawAnnotation {
    #[serde(default)]
    pub name: String,
    pub kind: AnnotationKind,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub points: Vec<Vec2Def>,
    #[serde(default)]
    pub properties: Option<PropertyBag>,
}

impl RawAnnotation {
    /// Absolute vertices, optionally mirrored from a y-down authoring space.
    pub fn world_points(&self, flip_y: bool) -> Vec<Vec2> {
        let origin = Vec2::new(self.x, self.y);
        self.points
            .iter()
            .map(|p| {
                let v = origin + Vec2::from(*p);
                if flip_y {
                    Vec2::new(v.x, -v.y)
                } else {
                    v
                }
            })
            .collect()
    }

    /// Name used in diagnostics.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            "<unnamed>"
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("read flow file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse flow file {path}: {message}")]
    Parse { path: String, message: String },
    #[error("flow file version {0} unsupported (expected {FLOW_FILE_VERSION})")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FlowFile {
    pub version: u32,
    #[serde(default)]
    pub annotations: Vec<RawAnnotation>,
}

impl FlowFile {
    /// `.json` files are read as JSON, everything else as RON.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LevelLoadError> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|source| LevelLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            serde_json::from_str::<FlowFile>(&txt).map_err(|e| e.to_string())
        } else {
            ron::from_str::<FlowFile>(&txt).map_err(|e| e.to_string())
        };
        let file = parsed.map_err(|message| LevelLoadError::Parse {
            path: path.display().to_string(),
            message,
        })?;
        file.check_version()
    }

    pub fn from_ron_str(txt: &str) -> Result<Self, LevelLoadError> {
        let file: FlowFile = ron::from_str(txt).map_err(|e| LevelLoadError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })?;
        file.check_version()
    }

    pub fn from_json_str(txt: &str) -> Result<Self, LevelLoadError> {
        let file: FlowFile = serde_json::from_str(txt).map_err(|e| LevelLoadError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })?;
        file.check_version()
    }

    fn check_version(self) -> Result<Self, LevelLoadError> {
        if self.version != FLOW_FILE_VERSION {
            return Err(LevelLoadError::UnsupportedVersion(self.version));
        }
        Ok(self)
    }
}
