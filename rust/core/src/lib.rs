// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Assise Core
//!
//! Data model for the interactive masonry assistant: placed units (bricks,
//! blocks, insulation panels, lintels), the per-family course ledger
//! ("assises"), material joint policies and the scene registry the rest of
//! the workspace reads from and writes to.
//!
//! All lengths are centimetres. The world frame is Y-up; units rotate about
//! the vertical axis only.

pub mod config;
pub mod course;
pub mod diagnostics;
pub mod error;
pub mod joint;
pub mod keys;
pub mod material;
pub mod scene;
pub mod unit;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use config::EngineConfig;
pub use course::{Course, CourseLedger};
pub use diagnostics::DiagnosticLog;
pub use error::{Error, Result};
pub use joint::{JointDimensions, JointKind, JointMaterial, JointSpec};
pub use keys::{JointId, UnitId};
pub use material::{CourseFamily, MaterialPolicy};
pub use scene::{OwnedJoints, Scene, SceneArena};
pub use unit::{
    quarter_turns, BlockSubFamily, CourseRef, CutClass, Dimensions, Unit, UnitDraft, UnitFamily,
};
