// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The library's active "unit to place".

use assise_core::{
    BlockSubFamily, CourseFamily, CourseRef, CutClass, Dimensions, MaterialPolicy, Point3,
    UnitDraft, UnitFamily,
};
use serde::{Deserialize, Serialize};

/// What the user is about to place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementSpec {
    pub family: UnitFamily,
    pub material: MaterialPolicy,
    pub cut: CutClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockSubFamily>,
    pub dimensions: Dimensions,
    /// Course stack the placed unit joins.
    pub course: CourseFamily,
}

impl PlacementSpec {
    /// A full brick of the common 19 x 9 x 6.5 cm format.
    pub fn brick(cut: CutClass) -> Self {
        let fraction = cut.fraction().unwrap_or(1.0);
        Self {
            family: UnitFamily::Brick,
            material: MaterialPolicy::Hollow,
            cut,
            block: None,
            dimensions: Dimensions::new(19.0 * fraction, 9.0, 6.5),
            course: CourseFamily::Brick,
        }
    }

    /// A hollow concrete block of a given sub-family.
    pub fn block(sub_family: BlockSubFamily, cut: CutClass) -> Self {
        let fraction = cut.fraction().unwrap_or(1.0);
        Self {
            family: UnitFamily::Block,
            material: MaterialPolicy::Hollow,
            cut,
            block: Some(sub_family),
            dimensions: Dimensions::new(
                BlockSubFamily::NOMINAL_LENGTH_CM * fraction,
                sub_family.nominal_width_cm(),
                BlockSubFamily::NOMINAL_HEIGHT_CM,
            ),
            course: CourseFamily::Block,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.dimensions.is_degenerate()
    }

    /// Draft of a unit built from this spec.
    pub fn draft(&self, position: Point3<f64>, rotation: f64, course_index: u32) -> UnitDraft {
        UnitDraft {
            family: self.family,
            material: self.material,
            cut: self.cut,
            block: self.block,
            position,
            dimensions: self.dimensions,
            rotation,
            course: CourseRef::new(self.course, course_index),
        }
    }
}
