// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Masonry units: the bricks, blocks, panels and lintels laid in the scene.
//!
//! A unit is anchored at a corner of its box. In the unit's local frame the
//! box spans `x ∈ [0, length]`, `y ∈ [0, height]`, `z ∈ [0, width]`, and the
//! local frame is rotated about the world Y axis by `rotation` radians around
//! the anchor. The long faces (length × height) are the panneresse faces, the
//! short faces (width × height) are the boutisse faces.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;

use crate::keys::UnitId;
use crate::material::{CourseFamily, MaterialPolicy};

/// Structural family of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitFamily {
    Brick,
    Block,
    Insulation,
    Lintel,
    Beam,
    Slab,
}

impl UnitFamily {
    /// Bricks and blocks take part in adjacency detection and vertical joints.
    pub fn is_masonry(&self) -> bool {
        matches!(self, UnitFamily::Brick | UnitFamily::Block)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitFamily::Brick => "brick",
            UnitFamily::Block => "block",
            UnitFamily::Insulation => "insulation",
            UnitFamily::Lintel => "lintel",
            UnitFamily::Beam => "beam",
            UnitFamily::Slab => "slab",
        }
    }
}

impl fmt::Display for UnitFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fraction of a full unit produced by on-site cutting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CutClass {
    Full,
    ThreeQuarter,
    Half,
    Quarter,
    Custom,
}

impl CutClass {
    /// Classes that have a rule-table code, in table order.
    pub const CODED: [CutClass; 4] = [
        CutClass::Full,
        CutClass::ThreeQuarter,
        CutClass::Half,
        CutClass::Quarter,
    ];

    /// Length fraction of a full unit. `None` for custom cuts.
    pub fn fraction(&self) -> Option<f64> {
        match self {
            CutClass::Full => Some(1.0),
            CutClass::ThreeQuarter => Some(0.75),
            CutClass::Half => Some(0.5),
            CutClass::Quarter => Some(0.25),
            CutClass::Custom => None,
        }
    }

    /// Classifies a measured length fraction; anything off the standard
    /// fractions by more than 2% is a custom cut.
    pub fn from_fraction(fraction: f64) -> Self {
        Self::CODED
            .into_iter()
            .find(|cut| {
                cut.fraction()
                    .map(|f| (f - fraction).abs() <= 0.02)
                    .unwrap_or(false)
            })
            .unwrap_or(CutClass::Custom)
    }

    /// Letter used in composite suggestion codes (`E`ntier, `T`rois-quarts,
    /// `H`alf, `Q`uarter).
    pub fn code_letter(&self) -> Option<char> {
        match self {
            CutClass::Full => Some('E'),
            CutClass::ThreeQuarter => Some('T'),
            CutClass::Half => Some('H'),
            CutClass::Quarter => Some('Q'),
            CutClass::Custom => None,
        }
    }

    pub fn from_code_letter(letter: char) -> Option<Self> {
        match letter {
            'E' => Some(CutClass::Full),
            'T' => Some(CutClass::ThreeQuarter),
            'H' => Some(CutClass::Half),
            'Q' => Some(CutClass::Quarter),
            _ => None,
        }
    }

    /// Zero-based variant digit used in numeric block codes.
    pub fn variant_digit(&self) -> Option<u8> {
        match self {
            CutClass::Full => Some(0),
            CutClass::ThreeQuarter => Some(1),
            CutClass::Half => Some(2),
            CutClass::Quarter => Some(3),
            CutClass::Custom => None,
        }
    }

    pub fn from_variant_digit(digit: u8) -> Option<Self> {
        Self::CODED.get(digit as usize).copied()
    }

    /// Upper-case label used in human-readable block slot codes.
    pub fn label(&self) -> &'static str {
        match self {
            CutClass::Full => "FULL",
            CutClass::ThreeQuarter => "3Q",
            CutClass::Half => "HALF",
            CutClass::Quarter => "QUARTER",
            CutClass::Custom => "CUSTOM",
        }
    }

    pub fn is_cut(&self) -> bool {
        *self != CutClass::Full
    }
}

/// Concrete block sub-families, named after their nominal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockSubFamily {
    B9,
    B14,
    B19,
    B29,
}

impl BlockSubFamily {
    /// Nominal full-block length.
    pub const NOMINAL_LENGTH_CM: f64 = 50.0;
    /// Nominal block height.
    pub const NOMINAL_HEIGHT_CM: f64 = 20.0;

    pub const ALL: [BlockSubFamily; 4] = [
        BlockSubFamily::B9,
        BlockSubFamily::B14,
        BlockSubFamily::B19,
        BlockSubFamily::B29,
    ];

    pub fn nominal_width_cm(&self) -> f64 {
        match self {
            BlockSubFamily::B9 => 9.0,
            BlockSubFamily::B14 => 14.0,
            BlockSubFamily::B19 => 19.0,
            BlockSubFamily::B29 => 29.0,
        }
    }

    /// Two-digit prefix used in numeric block codes (`"09"`, `"14"`, ...).
    pub fn code_prefix(&self) -> &'static str {
        match self {
            BlockSubFamily::B9 => "09",
            BlockSubFamily::B14 => "14",
            BlockSubFamily::B19 => "19",
            BlockSubFamily::B29 => "29",
        }
    }

    pub fn from_code_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code_prefix() == prefix)
    }

    /// Identifies a sub-family from a measured width (±0.5 cm).
    pub fn from_width(width: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| (s.nominal_width_cm() - width).abs() <= 0.5)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockSubFamily::B9 => "B9",
            BlockSubFamily::B14 => "B14",
            BlockSubFamily::B19 => "B19",
            BlockSubFamily::B29 => "B29",
        }
    }
}

impl fmt::Display for BlockSubFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Box dimensions of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Extent along the local X axis (panneresse face length).
    pub length: f64,
    /// Extent along the local Z axis (boutisse face length).
    pub width: f64,
    /// Extent along Y.
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// `true` if any dimension is zero, negative or not finite.
    pub fn is_degenerate(&self) -> bool {
        [self.length, self.width, self.height]
            .iter()
            .any(|d| !d.is_finite() || *d <= 0.0)
    }
}

/// The course a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseRef {
    pub family: CourseFamily,
    pub index: u32,
}

impl CourseRef {
    pub fn new(family: CourseFamily, index: u32) -> Self {
        Self { family, index }
    }
}

/// Everything needed to create a unit; the scene assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDraft {
    pub family: UnitFamily,
    pub material: MaterialPolicy,
    pub cut: CutClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockSubFamily>,
    pub position: Point3<f64>,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub rotation: f64,
    pub course: CourseRef,
}

impl UnitDraft {
    pub fn into_unit(self, id: UnitId) -> Unit {
        Unit {
            id,
            family: self.family,
            material: self.material,
            cut: self.cut,
            block: self.block,
            position: self.position,
            dimensions: self.dimensions,
            rotation: self.rotation,
            course: self.course,
        }
    }
}

/// A placed masonry unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: UnitId,
    pub family: UnitFamily,
    pub material: MaterialPolicy,
    pub cut: CutClass,
    /// Block sub-family, only meaningful for `UnitFamily::Block`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockSubFamily>,
    /// Corner anchor in world coordinates.
    pub position: Point3<f64>,
    pub dimensions: Dimensions,
    /// Rotation about the world Y axis, radians. Arbitrary values are stored;
    /// adjacency logic only looks at the quarter-turn class.
    pub rotation: f64,
    pub course: CourseRef,
}

impl Unit {
    pub fn is_degenerate(&self) -> bool {
        self.dimensions.is_degenerate()
            || !self.position.coords.iter().all(|c| c.is_finite())
            || !self.rotation.is_finite()
    }

    pub fn bottom_y(&self) -> f64 {
        self.position.y
    }

    pub fn top_y(&self) -> f64 {
        self.position.y + self.dimensions.height
    }

    /// Rotation snapped to the nearest quarter turn, in `0..4`.
    pub fn quarter_turns(&self) -> u8 {
        quarter_turns(self.rotation)
    }

    /// `true` when the unit is turned a quarter (or three quarters) from its
    /// panneresse orientation.
    pub fn is_boutisse(&self) -> bool {
        self.quarter_turns() % 2 == 1
    }

    /// Full-length module this unit was cut from.
    pub fn module_length(&self) -> f64 {
        match self.cut.fraction() {
            Some(f) => self.dimensions.length / f,
            None => self.dimensions.length,
        }
    }

    pub fn is_cellular(&self) -> bool {
        self.material.is_cellular()
    }
}

/// Snaps an angle in radians to the nearest quarter turn, in `0..4`.
pub fn quarter_turns(rotation: f64) -> u8 {
    if !rotation.is_finite() {
        return 0;
    }
    let normalized = rotation.rem_euclid(TAU);
    ((normalized / FRAC_PI_2).round() as u8) % 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn cut_fraction_classification() {
        assert_eq!(CutClass::from_fraction(1.0), CutClass::Full);
        assert_eq!(CutClass::from_fraction(0.74), CutClass::ThreeQuarter);
        assert_eq!(CutClass::from_fraction(0.5), CutClass::Half);
        assert_eq!(CutClass::from_fraction(0.26), CutClass::Quarter);
        assert_eq!(CutClass::from_fraction(0.4), CutClass::Custom);
    }

    #[test]
    fn cut_code_letters_are_reversible() {
        for cut in CutClass::CODED {
            let letter = cut.code_letter().unwrap();
            assert_eq!(CutClass::from_code_letter(letter), Some(cut));
            let digit = cut.variant_digit().unwrap();
            assert_eq!(CutClass::from_variant_digit(digit), Some(cut));
        }
        assert_eq!(CutClass::Custom.code_letter(), None);
        assert_eq!(CutClass::from_variant_digit(4), None);
    }

    #[test]
    fn block_sub_family_lookup() {
        assert_eq!(BlockSubFamily::from_width(14.2), Some(BlockSubFamily::B14));
        assert_eq!(BlockSubFamily::from_width(11.0), None);
        assert_eq!(
            BlockSubFamily::from_code_prefix("29"),
            Some(BlockSubFamily::B29)
        );
        assert_eq!(BlockSubFamily::B9.code_prefix(), "09");
    }

    #[test]
    fn quarter_turn_snapping() {
        assert_eq!(quarter_turns(0.0), 0);
        assert_eq!(quarter_turns(FRAC_PI_2 + 0.1), 1);
        assert_eq!(quarter_turns(PI), 2);
        assert_eq!(quarter_turns(-FRAC_PI_2), 3);
        assert_eq!(quarter_turns(TAU - 0.01), 0);
        assert_eq!(quarter_turns(f64::NAN), 0);
    }

    #[test]
    fn degenerate_dimensions() {
        assert!(!Dimensions::new(19.0, 9.0, 6.5).is_degenerate());
        assert!(Dimensions::new(0.0, 9.0, 6.5).is_degenerate());
        assert!(Dimensions::new(19.0, f64::NAN, 6.5).is_degenerate());
        assert!(Dimensions::new(19.0, 9.0, -1.0).is_degenerate());
    }
}
