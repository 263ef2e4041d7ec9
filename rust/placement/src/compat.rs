// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference/placement compatibility matrix.
//!
//! Some pairs of unit types categorically forbid slots, whatever the rule
//! table says. The matrix works on coarse buckets, not on codes, and is
//! expressed on panneresse slot letters: a forbidden `I` also forbids its
//! boutisse twin `U`.

use assise_core::{CutClass, UnitFamily};
use serde::{Deserialize, Serialize};

use crate::codes::SlotLetter;

/// Coarse unit type used by the compatibility matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitBucket {
    Full,
    ThreeQuarter,
    Half,
    Quarter,
    Block,
    Other,
}

impl UnitBucket {
    pub fn of(family: UnitFamily, cut: CutClass) -> Self {
        match family {
            UnitFamily::Block => UnitBucket::Block,
            UnitFamily::Brick => match cut {
                CutClass::Full => UnitBucket::Full,
                CutClass::ThreeQuarter => UnitBucket::ThreeQuarter,
                CutClass::Half => UnitBucket::Half,
                CutClass::Quarter => UnitBucket::Quarter,
                CutClass::Custom => UnitBucket::Other,
            },
            _ => UnitBucket::Other,
        }
    }
}

/// A set of slot letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotSet(u16);

impl SlotSet {
    pub const EMPTY: SlotSet = SlotSet(0);

    pub fn of(slots: &[SlotLetter]) -> Self {
        slots.iter().fold(Self::EMPTY, |set, &s| set.with(s))
    }

    /// Every slot except the two continuation slots.
    pub fn all_but_continuation() -> Self {
        SlotLetter::ALL
            .into_iter()
            .filter(|s| !s.is_continuation())
            .fold(Self::EMPTY, |set, s| set.with(s))
    }

    pub fn with(self, slot: SlotLetter) -> Self {
        SlotSet(self.0 | bit(slot))
    }

    pub fn insert(&mut self, slot: SlotLetter) {
        self.0 |= bit(slot);
    }

    pub fn contains(&self, slot: SlotLetter) -> bool {
        self.0 & bit(slot) != 0
    }

    pub fn union(self, other: SlotSet) -> Self {
        SlotSet(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = SlotLetter> + '_ {
        SlotLetter::ALL.into_iter().filter(|s| self.contains(*s))
    }
}

fn bit(slot: SlotLetter) -> u16 {
    1 << (slot.number() - 1)
}

/// Slots a placed unit of bucket `placed` may never take around a reference
/// unit of bucket `reference`.
pub fn forbidden_slots(reference: UnitBucket, placed: UnitBucket) -> SlotSet {
    use SlotLetter::{E, F, I, J};
    use UnitBucket::*;

    let back_and_front_corners = SlotSet::of(&[E, F, I, J]);
    match (reference, placed) {
        (Other, _) | (_, Other) => SlotSet::all_but_continuation(),
        (Block, Block) => SlotSet::EMPTY,
        (Block, _) | (_, Block) => SlotSet::all_but_continuation(),
        (Full, Half) => back_and_front_corners,
        (Full, Quarter) => SlotSet::all_but_continuation(),
        (ThreeQuarter, Quarter) | (Half, Quarter) => back_and_front_corners,
        (Quarter, Full) | (Quarter, ThreeQuarter) => SlotSet::of(&[E, F]),
        _ => SlotSet::EMPTY,
    }
}

/// `true` when `slot` (or its panneresse twin) is allowed for the pair.
pub fn is_slot_allowed(reference: UnitBucket, placed: UnitBucket, slot: SlotLetter) -> bool {
    !forbidden_slots(reference, placed).contains(slot.panneresse())
}
