// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Assise Geometry
//!
//! Local/world frame maths for masonry units, face adjacency detection and
//! joint synthesis (head joints between neighbours, bed joints under units,
//! recess of existing joints).

pub mod adjacency;
pub mod frame;
pub mod joints;
pub mod recess;

pub use adjacency::{adjacency_tolerance, Adjacency, AdjacencyDetector, Neighbor, Neighbors};
pub use frame::{xz_distance, Side, UnitFrame};
pub use joints::JointSynthesizer;
pub use recess::{apply_recess, clear_recess};
