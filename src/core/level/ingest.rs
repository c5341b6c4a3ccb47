//! Two-phase ingest of flow annotations into field regions.
//!
//! 1. `parse_annotations` validates geometry and normalizes tags; regions without a
//!    `direction` tag keep `None`.
//! 2. `finalize` assigns the single default direction to every such region, after which
//!    every region has a unit direction and nothing is mutated again.
use bevy::prelude::*;
use thiserror::Error;

use super::ambient::{directive_for, AmbientDirective};
use super::annotations::{AnnotationKind, RawAnnotation};
use super::properties::{extract_properties, CompassDirection, PropertyDefaults};
use crate::core::config::{FlowConfig, LineDirectionMode};
use crate::physics::flow::field::FieldRegions;
use crate::physics::flow::geometry::{
    FlowGeometryError, PolygonArea, PolygonShape, RegionTags, Segment, SegmentOrigin, SegmentShape,
};

#[derive(Debug, Clone, PartialEq)]
pub struct IngestSettings {
    pub defaults: PropertyDefaults,
    pub default_direction: CompassDirection,
    pub line_direction: LineDirectionMode,
    pub flip_y: bool,
}

impl IngestSettings {
    pub fn from_config(cfg: &FlowConfig) -> Self {
        Self {
            defaults: PropertyDefaults {
                strength: cfg.default_strength,
                width: if cfg.default_width > 0.0 {
                    cfg.default_width
                } else {
                    PropertyDefaults::default().width
                },
            },
            default_direction: cfg.default_compass(),
            line_direction: cfg.line_mode(),
            flip_y: cfg.flip_y,
        }
    }
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self::from_config(&FlowConfig::default())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IngestDiagnostic {
    #[error("annotation '{name}': line-chain needs at least 2 vertices, got {count}; skipped")]
    TooFewLineVertices { name: String, count: usize },
    #[error("annotation '{name}': polygon needs at least 3 vertices, got {count}; skipped")]
    TooFewPolygonVertices { name: String, count: usize },
    #[error("annotation '{name}': edge {index} has zero length; discarded")]
    ZeroLengthEdge { name: String, index: usize },
    #[error("annotation '{name}': non-finite vertex; skipped")]
    NonFiniteVertex { name: String },
    #[error("annotation '{name}': ambient marker has no vertices; skipped")]
    EmptyAmbient { name: String },
    #[error("annotation '{name}': {source}; skipped")]
    Geometry {
        name: String,
        #[source]
        source: FlowGeometryError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingSegment {
    pub name: String,
    pub shape: SegmentShape,
    pub tags: RegionTags,
    pub direction: Option<Vec2>,
    pub origin: SegmentOrigin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingPolygon {
    pub name: String,
    pub shape: PolygonShape,
    pub tags: RegionTags,
    pub direction: Option<Vec2>,
}

/// Phase-one output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRegions {
    pub segments: Vec<PendingSegment>,
    pub polygons: Vec<PendingPolygon>,
    pub ambient: Vec<AmbientDirective>,
    pub diagnostics: Vec<IngestDiagnostic>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestOutcome {
    pub regions: FieldRegions,
    pub ambient: Vec<AmbientDirective>,
    pub diagnostics: Vec<IngestDiagnostic>,
    /// Regions that received the default direction in the finalize pass.
    pub backfilled: usize,
}

pub fn ingest(annotations: &[RawAnnotation], settings: &IngestSettings) -> IngestOutcome {
    finalize(parse_annotations(annotations, settings), settings.default_direction)
}

pub fn parse_annotations(annotations: &[RawAnnotation], settings: &IngestSettings) -> ParsedRegions {
    let mut out = ParsedRegions::default();
    for ann in annotations {
        let name = ann.label();
        let props = extract_properties(ann.properties.as_ref(), &settings.defaults);
        let points = ann.world_points(settings.flip_y);
        if points.iter().any(|p| !p.is_finite()) {
            out.diagnostics.push(IngestDiagnostic::NonFiniteVertex { name: name.into() });
            continue;
        }

        if ann.kind == AnnotationKind::Ambient || props.ambient {
            match directive_for(name, &points, &props, settings.default_direction) {
                Some(d) => out.ambient.push(d),
                None => out.diagnostics.push(IngestDiagnostic::EmptyAmbient { name: name.into() }),
            }
        }

        let tags = RegionTags::new(props.strength, props.width, props.harpoon_only);
        let tagged = props.direction.map(CompassDirection::to_vec);
        match ann.kind {
            AnnotationKind::Ambient => {}
            AnnotationKind::Line => {
                if points.len() < 2 {
                    out.diagnostics.push(IngestDiagnostic::TooFewLineVertices {
                        name: name.into(),
                        count: points.len(),
                    });
                    continue;
                }
                for (index, pair) in points.windows(2).enumerate() {
                    let Some(shape) = edge_shape(name, index, pair[0], pair[1], &mut out.diagnostics)
                    else {
                        continue;
                    };
                    let direction = match settings.line_direction {
                        LineDirectionMode::Tagged => tagged,
                        // Mirroring flips the winding; negate so the pushed side is the
                        // author's left-hand side, not the mirrored one.
                        LineDirectionMode::Geometric if settings.flip_y => Some(-shape.perpendicular()),
                        LineDirectionMode::Geometric => Some(shape.perpendicular()),
                    };
                    out.segments.push(PendingSegment {
                        name: name.into(),
                        shape,
                        tags,
                        direction,
                        origin: SegmentOrigin::LineChain,
                    });
                }
            }
            AnnotationKind::Polygon => {
                if points.len() < 3 {
                    out.diagnostics.push(IngestDiagnostic::TooFewPolygonVertices {
                        name: name.into(),
                        count: points.len(),
                    });
                    continue;
                }
                let shape = match PolygonShape::new(&points) {
                    Ok(s) => s,
                    Err(source) => {
                        out.diagnostics.push(IngestDiagnostic::Geometry {
                            name: name.into(),
                            source,
                        });
                        continue;
                    }
                };
                let n = points.len();
                for index in 0..n {
                    let (a, b) = (points[index], points[(index + 1) % n]);
                    if let Some(edge) = edge_shape(name, index, a, b, &mut out.diagnostics) {
                        out.segments.push(PendingSegment {
                            name: name.into(),
                            shape: edge,
                            tags,
                            direction: tagged,
                            origin: SegmentOrigin::PolygonBoundary,
                        });
                    }
                }
                out.polygons.push(PendingPolygon {
                    name: name.into(),
                    shape,
                    tags,
                    direction: tagged,
                });
            }
        }
    }
    out
}

fn edge_shape(
    name: &str,
    index: usize,
    a: Vec2,
    b: Vec2,
    diagnostics: &mut Vec<IngestDiagnostic>,
) -> Option<SegmentShape> {
    match SegmentShape::new(a, b) {
        Ok(s) => Some(s),
        Err(FlowGeometryError::ZeroLength { .. }) => {
            diagnostics.push(IngestDiagnostic::ZeroLengthEdge {
                name: name.into(),
                index,
            });
            None
        }
        Err(source) => {
            diagnostics.push(IngestDiagnostic::Geometry {
                name: name.into(),
                source,
            });
            None
        }
    }
}

/// Backfills the default direction and freezes pending regions.
///
/// A missing or degenerate (zero / non-finite) direction both receive the default.
pub fn finalize(parsed: ParsedRegions, default_direction: CompassDirection) -> IngestOutcome {
    let fallback = default_direction.to_vec();
    let mut backfilled = 0usize;
    let mut diagnostics = parsed.diagnostics;
    let mut resolve = |d: Option<Vec2>| {
        d.and_then(Vec2::try_normalize).unwrap_or_else(|| {
            backfilled += 1;
            fallback
        })
    };

    let mut segments = Vec::with_capacity(parsed.segments.len());
    for p in parsed.segments {
        match Segment::new(p.shape, p.tags, resolve(p.direction), p.origin) {
            Ok(s) => segments.push(s),
            Err(source) => diagnostics.push(IngestDiagnostic::Geometry { name: p.name, source }),
        }
    }
    let mut polygons = Vec::with_capacity(parsed.polygons.len());
    for p in parsed.polygons {
        match PolygonArea::new(p.shape, p.tags, resolve(p.direction)) {
            Ok(a) => polygons.push(a),
            Err(source) => diagnostics.push(IngestDiagnostic::Geometry { name: p.name, source }),
        }
    }
    IngestOutcome {
        regions: FieldRegions { segments, polygons },
        ambient: parsed.ambient,
        diagnostics,
        backfilled,
    }
}
