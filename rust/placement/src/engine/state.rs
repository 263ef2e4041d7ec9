// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use assise_core::{EngineConfig, UnitId};
use serde::Serialize;

use super::scheduler::{Debouncer, Throttle};
use crate::candidate::SuggestionCandidate;
use crate::selection::PlacementSpec;

/// Interactive state of the placement tool.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub(crate) hover: Option<UnitId>,
    pub(crate) suggestion_timer: Debouncer,
    pub(crate) height_throttle: Throttle,
    /// Last valid library selection, used when the library has none.
    pub(crate) last_spec: Option<PlacementSpec>,
    pub(crate) candidates: Vec<SuggestionCandidate>,
    pub(crate) height_offset_cm: f64,
    pub(crate) ghost_dirty: bool,
    pub(crate) recess_depth_cm: f64,
    pub(crate) show_ghost: bool,
}

impl EngineState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            hover: None,
            suggestion_timer: Debouncer::new(config.debounce()),
            height_throttle: Throttle::new(config.height_throttle()),
            last_spec: None,
            candidates: Vec::new(),
            height_offset_cm: 0.0,
            ghost_dirty: false,
            recess_depth_cm: 0.0,
            show_ghost: config.show_ghost,
        }
    }

    /// Reference unit under the pointer.
    pub fn hover(&self) -> Option<UnitId> {
        self.hover
    }

    /// Candidates from the last suggestion run.
    pub fn candidates(&self) -> &[SuggestionCandidate] {
        &self.candidates
    }

    pub fn last_spec(&self) -> Option<&PlacementSpec> {
        self.last_spec.as_ref()
    }

    pub fn height_offset_cm(&self) -> f64 {
        self.height_offset_cm
    }

    pub fn recess_depth_cm(&self) -> f64 {
        self.recess_depth_cm
    }

    pub fn show_ghost(&self) -> bool {
        self.show_ghost
    }

    pub fn suggestions_pending(&self) -> bool {
        self.suggestion_timer.is_pending()
    }

    /// Candidates as the ghost should draw them, height nudge included.
    pub(crate) fn preview(&self) -> Vec<SuggestionCandidate> {
        self.candidates
            .iter()
            .map(|c| c.raised(self.height_offset_cm))
            .collect()
    }

    pub(crate) fn clear_interaction(&mut self) {
        self.hover = None;
        self.suggestion_timer.cancel();
        self.height_throttle.reset();
        self.candidates.clear();
        self.height_offset_cm = 0.0;
        self.ghost_dirty = true;
    }
}

/// What one call to `Engine::process_frame` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub events: usize,
    pub joints_refreshed: usize,
    pub suggestions_recomputed: bool,
    pub ghost_updated: bool,
}
