// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interfaces to the surrounding application.

use assise_core::CourseFamily;
use rustc_hash::FxHashMap;

use crate::candidate::SuggestionCandidate;
use crate::selection::PlacementSpec;

/// The library's active "unit to place".
pub trait LibrarySelector {
    fn current_placement_spec(&self) -> Option<PlacementSpec>;
}

/// The course the user is currently building, per family.
pub trait CourseSelector {
    fn current_course(&self, family: CourseFamily) -> u32;
}

/// Visual preview of suggestion candidates.
pub trait GhostPreview {
    fn show(&mut self, candidates: &[SuggestionCandidate]);
    fn clear(&mut self);
}

/// A library selection that only changes when told to.
#[derive(Debug, Clone, Default)]
pub struct FixedSelection(pub Option<PlacementSpec>);

impl LibrarySelector for FixedSelection {
    fn current_placement_spec(&self) -> Option<PlacementSpec> {
        self.0.clone()
    }
}

/// Course selection from a fixed per-family map; families not in the map
/// build course 0.
#[derive(Debug, Clone, Default)]
pub struct FixedCourses(pub FxHashMap<CourseFamily, u32>);

impl CourseSelector for FixedCourses {
    fn current_course(&self, family: CourseFamily) -> u32 {
        self.0.get(&family).copied().unwrap_or(0)
    }
}

/// Preview that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGhost;

impl GhostPreview for NoGhost {
    fn show(&mut self, _candidates: &[SuggestionCandidate]) {}

    fn clear(&mut self) {}
}
