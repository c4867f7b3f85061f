//! Diagram export records

use serde::{Deserialize, Serialize};

use super::ProjectionPlane;
use crate::foundation::math::Vec2;
use crate::scene::{EntityId, EntityKind, SceneId};

/// Axis-aligned rectangle in diagram coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect2 {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl Rect2 {
    /// Smallest rectangle holding every point; `None` for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self { min: first, max: first }, |rect, p| Self {
            min: rect.min.inf(&p),
            max: rect.max.sup(&p),
        }))
    }

    /// Width and height
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// One entity drawn on the diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramEntity {
    /// Entity id
    pub id: EntityId,
    /// Display label, empty when the entity has no name
    pub label: String,
    /// Object, camera or light
    pub kind: EntityKind,
    /// Projected world position
    pub position: Vec2,
    /// Unit aim direction in the plane, for cameras and directional lights
    pub orientation: Option<Vec2>,
    /// Projected world bounds, for objects and area lights
    pub footprint: Option<Rect2>,
    /// Angular width in radians: horizontal field of view for cameras,
    /// beam angle for spot lights
    pub field_of_view: Option<f32>,
}

/// Non-fatal findings while projecting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiagramDiagnostic {
    /// The aim direction is (nearly) parallel to the plane normal, so it has
    /// no in-plane orientation
    DegenerateOrientation {
        /// Affected entity
        entity: EntityId,
    },
}

/// 2D rendition of a scene snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramExport {
    /// Source scene
    pub scene_id: SceneId,
    /// Scene version the diagram was computed at
    pub scene_version: u64,
    /// Plane the scene was projected onto
    pub plane: ProjectionPlane,
    /// Every entity, ascending by id
    pub entities: Vec<DiagramEntity>,
    /// Findings, ascending by entity id
    pub diagnostics: Vec<DiagramDiagnostic>,
}

impl DiagramExport {
    /// Look up a projected entity
    pub fn entity(&self, id: &EntityId) -> Option<&DiagramEntity> {
        self.entities
            .binary_search_by(|e| e.id.cmp(id))
            .ok()
            .map(|i| &self.entities[i])
    }

    /// Entities of one kind, ascending by id
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &DiagramEntity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }
}
