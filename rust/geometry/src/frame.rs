// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local frame of a unit and local/world conversions.
//!
//! Units rotate about the world Y axis around their corner anchor. A rotation
//! of `θ` maps local X to `(cos θ, 0, -sin θ)` and local Z to
//! `(sin θ, 0, cos θ)`.

use assise_core::{Dimensions, Unit};
use nalgebra::{Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Faces of a unit's box, named from the unit's own point of view.
///
/// `Left`/`Right` are the end faces along local X (x = 0 and x = length),
/// `Front`/`Back` the long faces along local Z (z = 0 and z = width).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Left,
    Right,
    Front,
    Back,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }

    /// Outward normal in the unit's local frame.
    pub fn local_normal(&self) -> Vector3<f64> {
        match self {
            Side::Left => Vector3::new(-1.0, 0.0, 0.0),
            Side::Right => Vector3::new(1.0, 0.0, 0.0),
            Side::Front => Vector3::new(0.0, 0.0, -1.0),
            Side::Back => Vector3::new(0.0, 0.0, 1.0),
        }
    }
}

/// Rigid frame of a placed unit.
#[derive(Debug, Clone)]
pub struct UnitFrame {
    anchor: Point3<f64>,
    rotation: Rotation3<f64>,
    dimensions: Dimensions,
}

impl UnitFrame {
    pub fn new(anchor: Point3<f64>, angle: f64, dimensions: Dimensions) -> Self {
        Self {
            anchor,
            rotation: Rotation3::from_axis_angle(&Vector3::y_axis(), angle),
            dimensions,
        }
    }

    pub fn of(unit: &Unit) -> Self {
        Self::new(unit.position, unit.rotation, unit.dimensions)
    }

    pub fn anchor(&self) -> Point3<f64> {
        self.anchor
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// World direction of the local X axis.
    pub fn x_axis(&self) -> Vector3<f64> {
        self.rotation * Vector3::x()
    }

    /// World direction of the local Z axis.
    pub fn z_axis(&self) -> Vector3<f64> {
        self.rotation * Vector3::z()
    }

    /// Rotates a local vector into world orientation (no translation).
    pub fn rotate(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local
    }

    /// Maps a point in the local frame to world coordinates.
    pub fn to_world(&self, local: &Vector3<f64>) -> Point3<f64> {
        self.anchor + self.rotation * local
    }

    /// Maps a world point into the local frame.
    pub fn to_local(&self, world: &Point3<f64>) -> Vector3<f64> {
        self.rotation.inverse() * (world - self.anchor)
    }

    /// Centre of the unit's box.
    pub fn center(&self) -> Point3<f64> {
        let d = &self.dimensions;
        self.to_world(&Vector3::new(d.length * 0.5, d.height * 0.5, d.width * 0.5))
    }

    /// Centre of one face of the box.
    pub fn face_center(&self, side: Side) -> Point3<f64> {
        let d = &self.dimensions;
        let half = Vector3::new(d.length * 0.5, 0.0, d.width * 0.5);
        let offset = side.local_normal().component_mul(&half);
        self.center() + self.rotation * offset
    }

    /// Half of the box's extent along a horizontal world direction.
    pub fn half_extent_along(&self, direction: &Vector3<f64>) -> f64 {
        let d = &self.dimensions;
        0.5 * (d.length * self.x_axis().dot(direction).abs()
            + d.width * self.z_axis().dot(direction).abs())
    }
}

/// Horizontal (XZ-plane) distance between two points.
pub fn xz_distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}
