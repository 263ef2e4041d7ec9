// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Joint meshes: the mortar or glue boxes between units and under courses.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::keys::UnitId;

/// Vertical (head) joint between neighbours, or horizontal (bed) joint under
/// a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JointKind {
    Vertical,
    Horizontal,
}

/// Filling of a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JointMaterial {
    Mortar,
    Glue,
}

impl JointMaterial {
    pub fn as_str(&self) -> &'static str {
        match self {
            JointMaterial::Mortar => "mortar",
            JointMaterial::Glue => "glue",
        }
    }
}

/// Box extents of a joint in its own frame, which is the owner unit's frame:
/// `width` along the owner's X axis, `depth` along its Z axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointDimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl JointDimensions {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

/// A synthesized joint box, owned by the unit whose face or underside it
/// fills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JointSpec {
    pub kind: JointKind,
    /// Box centre in world coordinates.
    pub center: Point3<f64>,
    /// Current (possibly recessed) extents.
    pub dimensions: JointDimensions,
    /// Rotation about the world Y axis, radians.
    pub rotation: f64,
    pub owner: UnitId,
    /// For head joints, the unit on the other side of the joint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<UnitId>,
    pub material: JointMaterial,
    /// Recess currently applied to `dimensions`.
    pub recess_depth_cm: f64,
    /// Extents before any recess was applied; captured on first recess.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<JointDimensions>,
}

impl JointSpec {
    pub fn new(
        kind: JointKind,
        center: Point3<f64>,
        dimensions: JointDimensions,
        rotation: f64,
        owner: UnitId,
        material: JointMaterial,
    ) -> Self {
        Self {
            kind,
            center,
            dimensions,
            rotation,
            owner,
            partner: None,
            material,
            recess_depth_cm: 0.0,
            original: None,
        }
    }

    /// Marks the unit across a head joint.
    pub fn with_partner(mut self, partner: UnitId) -> Self {
        self.partner = Some(partner);
        self
    }

    /// `true` when this joint fills the face shared by `a` and `b`.
    pub fn joins(&self, a: UnitId, b: UnitId) -> bool {
        self.partner.is_some_and(|partner| {
            (self.owner == a && partner == b) || (self.owner == b && partner == a)
        })
    }

    /// Extents without recess.
    pub fn unrecessed_dimensions(&self) -> JointDimensions {
        self.original.unwrap_or(self.dimensions)
    }

    /// Joint volume in cm³ (current extents).
    pub fn volume(&self) -> f64 {
        self.dimensions.width * self.dimensions.height * self.dimensions.depth
    }
}
