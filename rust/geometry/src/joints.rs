// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Joint synthesis.
//!
//! A pure function of the current scene: head joints fill the gap on each end
//! face where a neighbour was detected, the bed joint fills the gap between a
//! unit's underside and its course's base plane. Joint boxes share the owner
//! unit's rotation; their `width` runs along the owner's X axis and their
//! `depth` along its Z axis.

use assise_core::{
    CourseLedger, JointDimensions, JointKind, JointMaterial, JointSpec, MaterialPolicy, Point3,
    Unit,
};

use crate::adjacency::AdjacencyDetector;
use crate::frame::{Side, UnitFrame};

/// Rounding slack on elevations accumulated over many courses.
const SEATING_EPSILON_CM: f64 = 1e-6;

/// Synthesizes joint boxes from adjacency and the course ledger.
#[derive(Debug, Clone, Copy)]
pub struct JointSynthesizer<'a> {
    ledger: &'a CourseLedger,
}

impl<'a> JointSynthesizer<'a> {
    pub fn new(ledger: &'a CourseLedger) -> Self {
        Self { ledger }
    }

    /// Head and bed joints of `unit`.
    pub fn synthesize(&self, unit: &Unit, units: &[&Unit]) -> Vec<JointSpec> {
        let mut joints = self.vertical_joints(unit, units);
        joints.extend(self.horizontal_joint(unit));
        joints
    }

    /// One head joint per end face touching a neighbour.
    ///
    /// The joint spans from the course's base plane to the top of the unit
    /// and is centred midway between the two facing faces, so both
    /// neighbours describe the same box. Its thickness is the measured face
    /// gap, or the material's head-joint thickness when the faces touch.
    /// Cellular concrete never gets head joints.
    pub fn vertical_joints(&self, unit: &Unit, units: &[&Unit]) -> Vec<JointSpec> {
        if unit.is_cellular() || unit.is_degenerate() {
            return Vec::new();
        }
        let config = self.ledger.config();
        let policy_thickness = unit.material.vertical_joint_thickness(config);
        if policy_thickness <= 0.0 {
            return Vec::new();
        }

        let base = self
            .ledger
            .base_elevation(unit.course.family, unit.course.index);
        let height = unit.top_y() - base;
        if height <= 0.0 {
            tracing::debug!(
                unit = ?unit.id,
                base = base,
                top = unit.top_y(),
                "Unit top below course base, no head joints"
            );
            return Vec::new();
        }

        let frame = UnitFrame::of(unit);
        let mut joints = Vec::new();
        let neighbors = AdjacencyDetector::new(self.ledger).neighbors(unit, units);
        for side in [Side::Left, Side::Right] {
            let Some(neighbor) = neighbors.iter().find(|n| n.side == side) else {
                continue;
            };
            let thickness = if neighbor.gap > config.min_vertical_gap_cm {
                neighbor.gap
            } else {
                policy_thickness
            };
            let outward = frame.rotate(&side.local_normal());
            let face = frame.face_center(side);
            let center_xz = face + outward * (neighbor.gap * 0.5);
            joints.push(
                JointSpec::new(
                    JointKind::Vertical,
                    Point3::new(center_xz.x, base + height * 0.5, center_xz.z),
                    JointDimensions::new(thickness, height, unit.dimensions.width),
                    unit.rotation,
                    unit.id,
                    JointMaterial::Mortar,
                )
                .with_partner(neighbor.id),
            );
        }
        joints
    }

    /// Bed joint between the unit's underside and its course's base plane.
    ///
    /// Returns `None` when the unit already rests on the base plane (gap at or
    /// below the minimum bed joint) or the material is laid dry. A gap within
    /// the snap tolerance of the course's configured thickness snaps to it.
    /// Cellular concrete above the first course always gets a glue joint,
    /// unless the unit sits below its base plane.
    pub fn horizontal_joint(&self, unit: &Unit) -> Option<JointSpec> {
        if unit.is_degenerate() || unit.material == MaterialPolicy::Insulation {
            return None;
        }
        let config = self.ledger.config();
        let course = unit.course;
        let base = self.ledger.base_elevation(course.family, course.index);
        let raw = unit.bottom_y() - base;

        let configured = self.ledger.joint_thickness(course.family, course.index);
        let height = if unit.is_cellular() && course.index >= 1 {
            if raw < -SEATING_EPSILON_CM {
                return None;
            }
            config.glue_thickness_cm
        } else if raw - config.min_horizontal_joint_cm <= SEATING_EPSILON_CM {
            return None;
        } else if (raw - configured).abs() <= config.horizontal_snap_tolerance_cm {
            configured
        } else {
            raw
        };

        let center = UnitFrame::of(unit).center();
        Some(JointSpec::new(
            JointKind::Horizontal,
            Point3::new(center.x, unit.bottom_y() - height * 0.5, center.z),
            JointDimensions::new(unit.dimensions.length, height, unit.dimensions.width),
            unit.rotation,
            unit.id,
            unit.material.joint_material(course.index),
        ))
    }
}
