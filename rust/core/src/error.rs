// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model mutations.
//!
//! Queries never fail: unknown families, courses or units resolve to
//! documented defaults. Only mutations with invalid input return an error.

use crate::keys::{JointId, UnitId};
use crate::material::CourseFamily;

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while mutating the model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced unit was not found in the scene.
    #[error("unit not found: {0:?}")]
    UnitNotFound(UnitId),

    /// A referenced joint mesh was not found in the scene.
    #[error("joint not found: {0:?}")]
    JointNotFound(JointId),

    /// Joint thickness must be finite and non-negative.
    #[error("invalid joint thickness {value} cm for {family} course {index}")]
    InvalidJointThickness {
        family: CourseFamily,
        index: u32,
        value: f64,
    },

    /// Course unit height must be finite and strictly positive.
    #[error("invalid unit height {value} cm for {family} course {index}")]
    InvalidUnitHeight {
        family: CourseFamily,
        index: u32,
        value: f64,
    },

    /// Recess depth must be finite and non-negative.
    #[error("invalid recess depth: {0} cm")]
    InvalidRecessDepth(f64),

    /// Unit dimensions are zero, negative or not finite.
    #[error("degenerate unit dimensions: {length} x {width} x {height} cm")]
    DegenerateUnit { length: f64, width: f64, height: f64 },
}
