// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face adjacency between placed units.
//!
//! Two units are neighbours on a side when the end face of one sits within
//! one joint (plus tolerance) of the opposite end face of the other. Cut
//! units drift more when placed, so any pair involving a cut unit gets a
//! wider tolerance.
//!
//! Detection runs in two passes per candidate neighbour:
//!
//! 1. Face-centre check: XZ distance between facing end-face centres.
//! 2. Coarse check: the centre-to-centre offset projected onto the unit's
//!    local axes, which catches near misses the first pass discards (e.g.
//!    neighbours of a different length or slightly rotated).
//!
//! Front/back adjacency is reserved; no material currently produces joints on
//! the long faces, so both are always `false`.

use assise_core::{CourseLedger, Unit, UnitId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::frame::{xz_distance, Side, UnitFrame};

/// Minimum vertical overlap for two units to count as neighbours.
const MIN_VERTICAL_OVERLAP_CM: f64 = 0.01;

/// Which sides of a unit touch a neighbour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacency {
    pub left: bool,
    pub right: bool,
    pub front: bool,
    pub back: bool,
}

impl Adjacency {
    pub fn is_set(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
            Side::Front => self.front,
            Side::Back => self.back,
        }
    }

    pub fn set(&mut self, side: Side) {
        match side {
            Side::Left => self.left = true,
            Side::Right => self.right = true,
            Side::Front => self.front = true,
            Side::Back => self.back = true,
        }
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.front || self.back
    }

    pub fn count(&self) -> usize {
        [self.left, self.right, self.front, self.back]
            .iter()
            .filter(|s| **s)
            .count()
    }
}

/// A neighbouring unit and the side of the reference unit it touches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: UnitId,
    pub side: Side,
    /// Face-to-face gap along the reference unit's X axis (never negative).
    pub gap: f64,
}

/// Neighbours of one unit; usually one per end face.
pub type Neighbors = SmallVec<[Neighbor; 4]>;

/// Distance tolerance added to the joint thickness when matching faces.
///
/// Full units: `max(joint * 0.5, 0.5)`. When a cut unit is involved the
/// tolerance is widened by half, capped at +2 cm, with a 2 cm floor.
pub fn adjacency_tolerance(joint_thickness: f64, cut_involved: bool) -> f64 {
    let base = (joint_thickness * 0.5).max(0.5);
    if cut_involved {
        (base * 1.5).min(base + 2.0).max(2.0)
    } else {
        base
    }
}

/// Detects face contacts using the course ledger's joint thicknesses.
#[derive(Debug, Clone, Copy)]
pub struct AdjacencyDetector<'a> {
    ledger: &'a CourseLedger,
}

impl<'a> AdjacencyDetector<'a> {
    pub fn new(ledger: &'a CourseLedger) -> Self {
        Self { ledger }
    }

    /// Which sides of `unit` touch another unit in `units`.
    pub fn detect(&self, unit: &Unit, units: &[&Unit]) -> Adjacency {
        let mut adjacency = Adjacency::default();
        for neighbor in self.neighbors(unit, units) {
            adjacency.set(neighbor.side);
        }
        adjacency
    }

    /// Every unit in `units` touching an end face of `unit`.
    ///
    /// `units` may contain `unit` itself; it is skipped. Degenerate units on
    /// either side produce no neighbours.
    pub fn neighbors(&self, unit: &Unit, units: &[&Unit]) -> Neighbors {
        let mut out = Neighbors::new();
        if unit.is_degenerate() || !unit.family.is_masonry() {
            return out;
        }
        let frame = UnitFrame::of(unit);
        let joint = self
            .ledger
            .joint_thickness(unit.course.family, unit.course.index);

        for other in units {
            if other.id == unit.id || !other.family.is_masonry() || other.is_degenerate() {
                continue;
            }
            if vertical_overlap(unit, other) < MIN_VERTICAL_OVERLAP_CM {
                continue;
            }
            let tolerance = adjacency_tolerance(joint, unit.cut.is_cut() || other.cut.is_cut());
            if let Some(neighbor) = face_match(&frame, other, joint, tolerance)
                .or_else(|| coarse_match(&frame, other, joint, tolerance))
            {
                out.push(neighbor);
            }
        }

        tracing::trace!(unit = ?unit.id, neighbors = out.len(), "Adjacency computed");
        out
    }
}

fn vertical_overlap(a: &Unit, b: &Unit) -> f64 {
    a.top_y().min(b.top_y()) - a.bottom_y().max(b.bottom_y())
}

fn face_match(frame: &UnitFrame, other: &Unit, joint: f64, tolerance: f64) -> Option<Neighbor> {
    let other_frame = UnitFrame::of(other);
    let limit = joint + tolerance;

    let right = xz_distance(
        &frame.face_center(Side::Right),
        &other_frame.face_center(Side::Left),
    );
    let left = xz_distance(
        &frame.face_center(Side::Left),
        &other_frame.face_center(Side::Right),
    );

    let (side, distance, other_face) = if right <= left {
        (Side::Right, right, Side::Left)
    } else {
        (Side::Left, left, Side::Right)
    };
    if distance > limit {
        return None;
    }

    let along = frame.rotate(&side.local_normal());
    let gap = (other_frame.face_center(other_face) - frame.face_center(side))
        .dot(&along)
        .max(0.0);
    Some(Neighbor {
        id: other.id,
        side,
        gap,
    })
}

fn coarse_match(frame: &UnitFrame, other: &Unit, joint: f64, tolerance: f64) -> Option<Neighbor> {
    let other_frame = UnitFrame::of(other);
    let x_axis = frame.x_axis();
    let delta = other_frame.center() - frame.center();
    let along = delta.dot(&x_axis);
    let across = delta.dot(&frame.z_axis());

    let slack = tolerance + 1.0;
    if across.abs() > slack {
        return None;
    }

    let reach = frame.dimensions().length * 0.5 + other_frame.half_extent_along(&x_axis);
    let gap = along.abs() - reach;
    if (gap - joint).abs() > slack {
        return None;
    }

    Some(Neighbor {
        id: other.id,
        side: if along >= 0.0 { Side::Right } else { Side::Left },
        gap: gap.max(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use assise_core::{
        CourseFamily, CourseRef, CutClass, Dimensions, MaterialPolicy, Point3, Scene, SceneArena,
        UnitDraft, UnitFamily,
    };
    use std::f64::consts::FRAC_PI_2;

    fn brick(x: f64, z: f64, cut: CutClass, length: f64) -> UnitDraft {
        UnitDraft {
            family: UnitFamily::Brick,
            material: MaterialPolicy::Hollow,
            cut,
            block: None,
            position: Point3::new(x, 0.0, z),
            dimensions: Dimensions::new(length, 9.0, 6.5),
            rotation: 0.0,
            course: CourseRef::new(CourseFamily::Brick, 0),
        }
    }

    #[test]
    fn tolerance_for_full_and_cut_units() {
        assert_relative_eq!(adjacency_tolerance(1.2, false), 0.6, epsilon = 1e-12);
        assert_relative_eq!(adjacency_tolerance(0.1, false), 0.5, epsilon = 1e-12);
        assert_relative_eq!(adjacency_tolerance(1.2, true), 2.0, epsilon = 1e-12);
        assert_relative_eq!(adjacency_tolerance(6.0, true), 4.5, epsilon = 1e-12);
        assert_relative_eq!(adjacency_tolerance(10.0, true), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn abutted_bricks_are_mirrored_neighbours() {
        let ledger = CourseLedger::default();
        let mut scene = SceneArena::new();
        let a = scene.add_unit(brick(0.0, 0.0, CutClass::Full, 19.0));
        let b = scene.add_unit(brick(20.2, 0.0, CutClass::Full, 19.0));
        let units = scene.all_units();
        let detector = AdjacencyDetector::new(&ledger);

        let ua = scene.unit(a).unwrap();
        let ub = scene.unit(b).unwrap();
        let adj_a = detector.detect(ua, &units);
        let adj_b = detector.detect(ub, &units);
        assert!(adj_a.right && !adj_a.left);
        assert!(adj_b.left && !adj_b.right);
        assert!(!adj_a.front && !adj_a.back);

        let n = detector.neighbors(ua, &units);
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].id, b);
        assert_relative_eq!(n[0].gap, 1.2, epsilon = 1e-9);
    }

    #[test]
    fn distant_bricks_are_not_neighbours() {
        let ledger = CourseLedger::default();
        let mut scene = SceneArena::new();
        let a = scene.add_unit(brick(0.0, 0.0, CutClass::Full, 19.0));
        scene.add_unit(brick(23.0, 0.0, CutClass::Full, 19.0));
        let units = scene.all_units();
        let adj = AdjacencyDetector::new(&ledger).detect(scene.unit(a).unwrap(), &units);
        assert!(!adj.any());
    }

    #[test]
    fn cut_units_get_wider_tolerance() {
        let ledger = CourseLedger::default();
        let mut scene = SceneArena::new();
        let a = scene.add_unit(brick(0.0, 0.0, CutClass::Full, 19.0));
        // 3 cm gap: beyond 1.2 + 0.6 for full pairs, within 1.2 + 2.0 for cut pairs
        let half = scene.add_unit(brick(22.0, 0.0, CutClass::Half, 9.5));
        let units = scene.all_units();
        let detector = AdjacencyDetector::new(&ledger);
        assert!(detector.detect(scene.unit(a).unwrap(), &units).right);
        assert!(detector.detect(scene.unit(half).unwrap(), &units).left);

        let mut scene = SceneArena::new();
        let a = scene.add_unit(brick(0.0, 0.0, CutClass::Full, 19.0));
        scene.add_unit(brick(22.0, 0.0, CutClass::Full, 19.0));
        let units = scene.all_units();
        assert!(!detector.detect(scene.unit(a).unwrap(), &units).right);
    }

    #[test]
    fn coarse_check_catches_lateral_drift() {
        let ledger = CourseLedger::default();
        let mut scene = SceneArena::new();
        let a = scene.add_unit(brick(0.0, 0.0, CutClass::Full, 19.0));
        // Face centres 1.92 cm apart (1.2 along X, 1.5 across): rejected by the
        // face check, within the coarse slack.
        scene.add_unit(brick(20.2, 1.5, CutClass::Full, 19.0));
        let units = scene.all_units();
        let adj = AdjacencyDetector::new(&ledger).detect(scene.unit(a).unwrap(), &units);
        assert!(adj.right);
    }

    #[test]
    fn units_in_other_courses_are_ignored() {
        let ledger = CourseLedger::default();
        let mut scene = SceneArena::new();
        let a = scene.add_unit(brick(0.0, 0.0, CutClass::Full, 19.0));
        let mut above = brick(20.2, 0.0, CutClass::Full, 19.0);
        above.position.y = 7.7;
        scene.add_unit(above);
        let units = scene.all_units();
        let adj = AdjacencyDetector::new(&ledger).detect(scene.unit(a).unwrap(), &units);
        assert!(!adj.any());
    }

    #[test]
    fn rotated_pair_is_detected_in_local_frame() {
        let ledger = CourseLedger::default();
        let mut scene = SceneArena::new();
        let mut first = brick(0.0, 0.0, CutClass::Full, 19.0);
        first.rotation = FRAC_PI_2;
        let mut second = brick(0.0, 0.0, CutClass::Full, 19.0);
        second.rotation = FRAC_PI_2;
        second.position = Point3::new(0.0, 0.0, -20.2);
        let a = scene.add_unit(first);
        let b = scene.add_unit(second);
        let units = scene.all_units();
        let detector = AdjacencyDetector::new(&ledger);
        assert!(detector.detect(scene.unit(a).unwrap(), &units).right);
        assert!(detector.detect(scene.unit(b).unwrap(), &units).left);
    }

    #[test]
    fn degenerate_and_non_masonry_units_are_skipped() {
        let ledger = CourseLedger::default();
        let mut scene = SceneArena::new();
        let a = scene.add_unit(brick(0.0, 0.0, CutClass::Full, 19.0));
        let mut panel = brick(20.2, 0.0, CutClass::Full, 19.0);
        panel.family = UnitFamily::Insulation;
        scene.add_unit(panel);
        let broken = scene.add_unit(brick(-20.2, 0.0, CutClass::Full, f64::NAN));
        let units = scene.all_units();
        let detector = AdjacencyDetector::new(&ledger);
        assert!(!detector.detect(scene.unit(a).unwrap(), &units).any());
        assert!(!detector.detect(scene.unit(broken).unwrap(), &units).any());
    }
}
