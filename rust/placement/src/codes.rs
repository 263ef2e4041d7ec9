// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Slot letters and suggestion rule codes.
//!
//! Two code families key the rule table:
//!
//! - Letter codes, three characters `<placed cut><reference cut><slot>`,
//!   e.g. `HEA` (half placed next to a full reference, slot A).
//! - Numeric block codes, six digits `<sub-family><source variant>
//!   <placed variant><slot number>`, e.g. `140103` (B14, full source,
//!   three-quarter placed, slot C).

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

use assise_core::{BlockSubFamily, CutClass};
use serde::{Deserialize, Serialize};

/// A named position around a reference unit.
///
/// `A`..`J` are the panneresse slots; `S`..`V` replace the corner slots
/// `G`..`J` when the reference unit is laid boutisse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotLetter {
    /// Continuation, right.
    A,
    /// Continuation, left.
    B,
    /// Perpendicular front, left.
    C,
    /// Perpendicular front, right.
    D,
    /// Perpendicular back ("dorsale"), right.
    E,
    /// Perpendicular back ("dorsale"), left.
    F,
    /// Corner past the right end, flush with the back face.
    G,
    /// Corner past the left end, flush with the back face.
    H,
    /// Corner past the right end, flush with the front face.
    I,
    /// Corner past the left end, flush with the front face.
    J,
    S,
    T,
    U,
    V,
}

/// What kind of bond a slot produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateKind {
    Continuation,
    Perpendicular,
    CornerPanneresse,
    CornerBoutisse,
}

/// Base offset of a slot in the reference unit's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalOffset {
    pub dx: f64,
    pub dz: f64,
}

impl LocalOffset {
    pub fn new(dx: f64, dz: f64) -> Self {
        Self { dx, dz }
    }

    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dz.is_finite()
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.dx * factor, self.dz * factor)
    }
}

impl std::ops::Add for LocalOffset {
    type Output = LocalOffset;

    fn add(self, rhs: LocalOffset) -> LocalOffset {
        LocalOffset::new(self.dx + rhs.dx, self.dz + rhs.dz)
    }
}

impl SlotLetter {
    pub const ALL: [SlotLetter; 14] = [
        SlotLetter::A,
        SlotLetter::B,
        SlotLetter::C,
        SlotLetter::D,
        SlotLetter::E,
        SlotLetter::F,
        SlotLetter::G,
        SlotLetter::H,
        SlotLetter::I,
        SlotLetter::J,
        SlotLetter::S,
        SlotLetter::T,
        SlotLetter::U,
        SlotLetter::V,
    ];

    /// Slots offered for a panneresse reference, in output order.
    pub const PANNERESSE: [SlotLetter; 10] = [
        SlotLetter::A,
        SlotLetter::B,
        SlotLetter::C,
        SlotLetter::D,
        SlotLetter::E,
        SlotLetter::F,
        SlotLetter::G,
        SlotLetter::H,
        SlotLetter::I,
        SlotLetter::J,
    ];

    pub const CONTINUATION: [SlotLetter; 2] = [SlotLetter::A, SlotLetter::B];

    pub fn as_char(&self) -> char {
        match self {
            SlotLetter::A => 'A',
            SlotLetter::B => 'B',
            SlotLetter::C => 'C',
            SlotLetter::D => 'D',
            SlotLetter::E => 'E',
            SlotLetter::F => 'F',
            SlotLetter::G => 'G',
            SlotLetter::H => 'H',
            SlotLetter::I => 'I',
            SlotLetter::J => 'J',
            SlotLetter::S => 'S',
            SlotLetter::T => 'T',
            SlotLetter::U => 'U',
            SlotLetter::V => 'V',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_char() == c)
    }

    /// Two-digit slot number used in block codes, `1..=14`.
    pub fn number(&self) -> u8 {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .map(|i| i as u8 + 1)
            .unwrap_or(0)
    }

    pub fn from_number(n: u8) -> Option<Self> {
        n.checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize).copied())
    }

    pub fn kind(&self) -> CandidateKind {
        match self {
            SlotLetter::A | SlotLetter::B => CandidateKind::Continuation,
            SlotLetter::C | SlotLetter::D | SlotLetter::E | SlotLetter::F => {
                CandidateKind::Perpendicular
            }
            SlotLetter::G | SlotLetter::H | SlotLetter::I | SlotLetter::J => {
                CandidateKind::CornerPanneresse
            }
            SlotLetter::S | SlotLetter::T | SlotLetter::U | SlotLetter::V => {
                CandidateKind::CornerBoutisse
            }
        }
    }

    pub fn is_continuation(&self) -> bool {
        self.kind() == CandidateKind::Continuation
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self.kind(),
            CandidateKind::CornerPanneresse | CandidateKind::CornerBoutisse
        )
    }

    /// Boutisse equivalent of a corner slot (`G→S`, `H→T`, `I→U`, `J→V`);
    /// other slots map to themselves.
    pub fn boutisse(&self) -> SlotLetter {
        match self {
            SlotLetter::G => SlotLetter::S,
            SlotLetter::H => SlotLetter::T,
            SlotLetter::I => SlotLetter::U,
            SlotLetter::J => SlotLetter::V,
            other => *other,
        }
    }

    /// Inverse of [`SlotLetter::boutisse`].
    pub fn panneresse(&self) -> SlotLetter {
        match self {
            SlotLetter::S => SlotLetter::G,
            SlotLetter::T => SlotLetter::H,
            SlotLetter::U => SlotLetter::I,
            SlotLetter::V => SlotLetter::J,
            other => *other,
        }
    }

    /// Rotation of the placed unit relative to the reference unit.
    pub fn rotation_delta(&self) -> f64 {
        match self.kind() {
            CandidateKind::Continuation => 0.0,
            CandidateKind::Perpendicular | CandidateKind::CornerPanneresse => FRAC_PI_2,
            CandidateKind::CornerBoutisse => -FRAC_PI_2,
        }
    }

    /// Anchor of the placed unit in the reference unit's local frame, before
    /// cut corrections.
    ///
    /// `length` and `width` are the effective spacing dimensions of the
    /// reference unit, `joint` the course joint thickness.
    pub fn base_offset(&self, length: f64, width: f64, joint: f64) -> LocalOffset {
        let (l, w, g) = (length, width, joint);
        let (dx, dz) = match self {
            SlotLetter::A => (l + g, 0.0),
            SlotLetter::B => (-(l + g), 0.0),
            SlotLetter::C => (0.0, -g),
            SlotLetter::D => (l - w, -g),
            SlotLetter::E => (l - w, w + g + l),
            SlotLetter::F => (0.0, w + g + l),
            SlotLetter::G => (l + g, w),
            SlotLetter::H => (-g - w, w),
            SlotLetter::I => (l + g, l),
            SlotLetter::J => (-g - w, l),
            SlotLetter::S => (l + g + w, w - l),
            SlotLetter::T => (-g, w - l),
            SlotLetter::U => (l + g + w, 0.0),
            SlotLetter::V => (-g, 0.0),
        };
        LocalOffset::new(dx, dz)
    }
}

impl fmt::Display for SlotLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Why a code string failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeParseError {
    #[error("code '{0}' has the wrong length")]
    Length(String),
    #[error("code '{0}' has an unknown cut letter or variant digit")]
    Cut(String),
    #[error("code '{0}' has an unknown slot")]
    Slot(String),
    #[error("code '{0}' has an unknown block sub-family prefix")]
    SubFamily(String),
}

/// Three-letter rule code `<placed cut><reference cut><slot>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LetterCode {
    pub placed: CutClass,
    pub reference: CutClass,
    pub slot: SlotLetter,
}

impl LetterCode {
    /// `None` when either cut is custom: custom cuts have no code.
    pub fn new(placed: CutClass, reference: CutClass, slot: SlotLetter) -> Option<Self> {
        (placed.code_letter().is_some() && reference.code_letter().is_some()).then_some(Self {
            placed,
            reference,
            slot,
        })
    }

    /// Every code the table must account for.
    pub fn all() -> impl Iterator<Item = LetterCode> {
        CutClass::CODED.into_iter().flat_map(|placed| {
            CutClass::CODED.into_iter().flat_map(move |reference| {
                SlotLetter::ALL.into_iter().map(move |slot| LetterCode {
                    placed,
                    reference,
                    slot,
                })
            })
        })
    }
}

impl fmt::Display for LetterCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let placed = self.placed.code_letter().unwrap_or('?');
        let reference = self.reference.code_letter().unwrap_or('?');
        write!(f, "{placed}{reference}{}", self.slot)
    }
}

impl FromStr for LetterCode {
    type Err = CodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        let &[p, r, slot] = chars.as_slice() else {
            return Err(CodeParseError::Length(s.to_string()));
        };
        let placed = CutClass::from_code_letter(p).ok_or_else(|| CodeParseError::Cut(s.into()))?;
        let reference =
            CutClass::from_code_letter(r).ok_or_else(|| CodeParseError::Cut(s.into()))?;
        let slot = SlotLetter::from_char(slot).ok_or_else(|| CodeParseError::Slot(s.into()))?;
        Ok(Self {
            placed,
            reference,
            slot,
        })
    }
}

/// Six-digit block rule code. Source and placed blocks share a sub-family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockCode {
    pub sub_family: BlockSubFamily,
    pub source: CutClass,
    pub placed: CutClass,
    pub slot: SlotLetter,
}

impl BlockCode {
    /// `None` for custom cuts.
    pub fn new(
        sub_family: BlockSubFamily,
        source: CutClass,
        placed: CutClass,
        slot: SlotLetter,
    ) -> Option<Self> {
        (source.variant_digit().is_some() && placed.variant_digit().is_some()).then_some(Self {
            sub_family,
            source,
            placed,
            slot,
        })
    }

    pub fn all() -> impl Iterator<Item = BlockCode> {
        BlockSubFamily::ALL.into_iter().flat_map(|sub_family| {
            CutClass::CODED.into_iter().flat_map(move |source| {
                CutClass::CODED.into_iter().flat_map(move |placed| {
                    SlotLetter::ALL.into_iter().map(move |slot| BlockCode {
                        sub_family,
                        source,
                        placed,
                        slot,
                    })
                })
            })
        })
    }

    /// Human-readable slot code, e.g. `B14_HALF07`.
    pub fn label(&self) -> String {
        format!(
            "{}_{}{:02}",
            self.sub_family,
            self.placed.label(),
            self.slot.number()
        )
    }
}

impl fmt::Display for BlockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{:02}",
            self.sub_family.code_prefix(),
            self.source.variant_digit().unwrap_or(9),
            self.placed.variant_digit().unwrap_or(9),
            self.slot.number()
        )
    }
}

impl FromStr for BlockCode {
    type Err = CodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CodeParseError::Length(s.to_string()));
        }
        let sub_family = BlockSubFamily::from_code_prefix(&s[0..2])
            .ok_or_else(|| CodeParseError::SubFamily(s.into()))?;
        let digit = |i: usize| s.as_bytes()[i] - b'0';
        let source =
            CutClass::from_variant_digit(digit(2)).ok_or_else(|| CodeParseError::Cut(s.into()))?;
        let placed =
            CutClass::from_variant_digit(digit(3)).ok_or_else(|| CodeParseError::Cut(s.into()))?;
        let slot = s[4..6]
            .parse::<u8>()
            .ok()
            .and_then(SlotLetter::from_number)
            .ok_or_else(|| CodeParseError::Slot(s.into()))?;
        Ok(Self {
            sub_family,
            source,
            placed,
            slot,
        })
    }
}
