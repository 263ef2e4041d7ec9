// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use assise_core::{Point3, UnitId};
use serde::Serialize;

use crate::codes::{CandidateKind, SlotLetter};

/// A proposed placement next to a reference unit. Recomputed on every hover
/// change and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionCandidate {
    /// Corner anchor of the unit to place.
    pub world_position: Point3<f64>,
    /// Rotation about the world Y axis, radians.
    pub rotation: f64,
    /// Rule code shown to the user, e.g. `HEA` or `B14_HALF07`.
    pub slot_code: String,
    pub slot: SlotLetter,
    pub kind: CandidateKind,
    pub source_unit: UnitId,
}

impl SuggestionCandidate {
    /// Same candidate lifted by `dy` centimetres.
    pub fn raised(&self, dy: f64) -> Self {
        let mut out = self.clone();
        out.world_position.y += dy;
        out
    }
}
