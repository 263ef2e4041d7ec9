// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement suggestion generator.
//!
//! For a reference unit and the unit about to be placed, every slot around
//! the reference goes through the same pipeline:
//!
//! 1. Material and family restrictions (specialized materials and insulation
//!    only continue the wall).
//! 2. The compatibility matrix on reference/placed buckets.
//! 3. Rule-table lookup: the numeric block code for same-sub-family blocks,
//!    the letter code otherwise. A missing or excluded code drops the slot.
//! 4. Base offset plus correction, rotated into world space around the
//!    reference anchor.

use assise_core::{BlockSubFamily, CourseLedger, CutClass, Unit, UnitFamily, Vector3};
use assise_geometry::UnitFrame;

use crate::candidate::SuggestionCandidate;
use crate::codes::{BlockCode, LetterCode, LocalOffset, SlotLetter};
use crate::compat::{forbidden_slots, UnitBucket};
use crate::rules::SuggestionRuleTable;
use crate::selection::PlacementSpec;

/// Slot spacing dimensions of a reference unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub length: f64,
    pub width: f64,
}

impl Spacing {
    /// Usually the reference unit's own length and width. Insulation panels
    /// space by the panel being placed; B14 blocks space as B9 blocks.
    pub fn resolve(reference: &Unit, spec: &PlacementSpec) -> Self {
        let length = if is_insulation_mode(reference, spec) {
            spec.dimensions.length
        } else {
            reference.dimensions.length
        };
        // TODO: confirm with product whether B14 should keep spacing like B9.
        let width = if reference.family == UnitFamily::Block
            && reference.block == Some(BlockSubFamily::B14)
        {
            BlockSubFamily::B9.nominal_width_cm()
        } else {
            reference.dimensions.width
        };
        Self { length, width }
    }
}

fn is_insulation_mode(reference: &Unit, spec: &PlacementSpec) -> bool {
    reference.family == UnitFamily::Insulation || spec.family == UnitFamily::Insulation
}

/// Generates suggestion candidates around a reference unit.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionGenerator<'a> {
    ledger: &'a CourseLedger,
    rules: &'a SuggestionRuleTable,
}

impl<'a> SuggestionGenerator<'a> {
    pub fn new(ledger: &'a CourseLedger, rules: &'a SuggestionRuleTable) -> Self {
        Self { ledger, rules }
    }

    /// Candidates for placing `spec` next to `reference`, in slot order.
    ///
    /// An empty result means "no suggestions": the caller falls back to free
    /// placement.
    pub fn generate(&self, reference: &Unit, spec: &PlacementSpec) -> Vec<SuggestionCandidate> {
        if reference.is_degenerate() || !spec.is_valid() {
            tracing::debug!(
                reference = ?reference.id,
                "Degenerate reference or placement, no suggestions"
            );
            return Vec::new();
        }

        let insulation = is_insulation_mode(reference, spec);
        let continuation_only = insulation
            || reference.material.is_specialized()
            || spec.material.is_specialized();
        let forbidden = forbidden_slots(
            UnitBucket::of(reference.family, reference.cut),
            UnitBucket::of(spec.family, spec.cut),
        );

        let spacing = Spacing::resolve(reference, spec);
        let joint = self
            .ledger
            .joint_thickness(reference.course.family, reference.course.index);
        let boutisse = reference.is_boutisse();
        let frame = UnitFrame::of(reference);

        let mut out = Vec::new();
        for base_slot in SlotLetter::PANNERESSE {
            if continuation_only && !base_slot.is_continuation() {
                continue;
            }
            if forbidden.contains(base_slot) {
                continue;
            }
            let slot = if boutisse {
                base_slot.boutisse()
            } else {
                base_slot
            };
            let Some((correction, slot_code)) = self.correction(reference, spec, slot) else {
                continue;
            };

            let local = slot.base_offset(spacing.length, spacing.width, joint) + correction;
            out.push(SuggestionCandidate {
                world_position: frame.to_world(&Vector3::new(local.dx, 0.0, local.dz)),
                rotation: reference.rotation + slot.rotation_delta(),
                slot_code,
                slot,
                kind: slot.kind(),
                source_unit: reference.id,
            });
        }

        tracing::debug!(
            reference = ?reference.id,
            placed = %spec.family,
            boutisse = boutisse,
            candidates = out.len(),
            "Suggestions generated"
        );
        out
    }

    /// Cut correction in centimetres and the slot code to display.
    fn correction(
        &self,
        reference: &Unit,
        spec: &PlacementSpec,
        slot: SlotLetter,
    ) -> Option<(LocalOffset, String)> {
        if let Some(code) = block_code(reference, spec, slot) {
            return self.rules.block(code).map(|offset| (offset, code.label()));
        }

        // Insulation spaces by the placed panel, so the placed panel is also
        // the module the correction is expressed in.
        let (reference_cut, module) = if is_insulation_mode(reference, spec) {
            (spec.cut, module_length(spec.dimensions.length, spec.cut))
        } else {
            (reference.cut, reference.module_length())
        };
        let Some(code) = LetterCode::new(spec.cut, reference_cut, slot) else {
            tracing::trace!(slot = %slot, "Custom cut has no rule code");
            return None;
        };
        self.rules
            .letter(code)
            .map(|offset| (offset.scaled(module), code.to_string()))
    }
}

fn module_length(length: f64, cut: CutClass) -> f64 {
    cut.fraction().map(|f| length / f).unwrap_or(length)
}

/// Numeric block code when both units are blocks of the same sub-family.
fn block_code(reference: &Unit, spec: &PlacementSpec, slot: SlotLetter) -> Option<BlockCode> {
    if reference.family != UnitFamily::Block || spec.family != UnitFamily::Block {
        return None;
    }
    match (reference.block, spec.block) {
        (Some(source), Some(placed)) if source == placed => {
            BlockCode::new(source, reference.cut, spec.cut, slot)
        }
        _ => None,
    }
}
