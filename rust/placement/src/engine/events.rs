// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement events.
//!
//! Mutations enqueue events; the engine drains the queue once per frame.
//! Handlers only read the queue they were given, so a handler can never
//! trigger itself.

use assise_core::{CourseFamily, UnitId};
use smallvec::SmallVec;

/// Units that were adjacent to a unit before it changed.
pub type FormerNeighbors = SmallVec<[UnitId; 4]>;

#[derive(Debug, Clone, PartialEq)]
pub enum PlacementEvent {
    /// The hovered reference unit changed.
    HoverChanged(Option<UnitId>),
    UnitPlaced(UnitId),
    UnitRemoved {
        id: UnitId,
        former_neighbors: FormerNeighbors,
    },
    UnitMoved {
        id: UnitId,
        former_neighbors: FormerNeighbors,
    },
    /// A course's joint thickness changed; that course and every course
    /// above it moved.
    CourseJointChanged { family: CourseFamily, from_index: u32 },
    RecessChanged(f64),
    Reset,
}

impl PlacementEvent {
    /// `true` when the event changed units, courses or joints, so cached
    /// suggestions are stale.
    pub fn touches_scene(&self) -> bool {
        !matches!(self, PlacementEvent::HoverChanged(_) | PlacementEvent::RecessChanged(_))
    }
}
