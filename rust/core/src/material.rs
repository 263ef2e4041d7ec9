// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-material joint policy and course families.
//!
//! Joint behaviour is a closed set of policies rather than free-form
//! category strings: each policy knows its bed-joint thickness for a given
//! course index, its vertical joint thickness, and whether suggestions are
//! restricted to continuation slots.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::EngineConfig;
use crate::joint::JointMaterial;

/// Joint policy of a masonry material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MaterialPolicy {
    /// Hollow brick or concrete block laid in mortar.
    Hollow,
    /// Cellular concrete: mortar bed on the first course, thin glue above.
    CellularStandard,
    /// Cellular concrete whose elevation is driven by the course ledger.
    CellularCourseBased,
    /// Expanded-clay blocks.
    Argex,
    /// Rectified terracotta: mortar levelling course, glued above.
    Terracotta,
    /// Insulation panels, dry laid.
    Insulation,
}

impl MaterialPolicy {
    pub const ALL: [MaterialPolicy; 6] = [
        MaterialPolicy::Hollow,
        MaterialPolicy::CellularStandard,
        MaterialPolicy::CellularCourseBased,
        MaterialPolicy::Argex,
        MaterialPolicy::Terracotta,
        MaterialPolicy::Insulation,
    ];

    /// Default bed-joint thickness under a course of this material.
    pub fn horizontal_joint_thickness(&self, course_index: u32, config: &EngineConfig) -> f64 {
        match self {
            MaterialPolicy::Hollow | MaterialPolicy::Argex => config.mortar_thickness_cm,
            MaterialPolicy::CellularStandard
            | MaterialPolicy::CellularCourseBased
            | MaterialPolicy::Terracotta => {
                if course_index == 0 {
                    config.mortar_thickness_cm
                } else {
                    config.glue_thickness_cm
                }
            }
            MaterialPolicy::Insulation => 0.0,
        }
    }

    /// Head-joint thickness between laterally adjacent units. Zero means
    /// vertical joints are suppressed.
    pub fn vertical_joint_thickness(&self, config: &EngineConfig) -> f64 {
        match self {
            MaterialPolicy::Hollow | MaterialPolicy::Argex | MaterialPolicy::Terracotta => {
                config.vertical_joint_cm
            }
            MaterialPolicy::CellularStandard
            | MaterialPolicy::CellularCourseBased
            | MaterialPolicy::Insulation => 0.0,
        }
    }

    /// What the bed joint of a given course is made of.
    pub fn joint_material(&self, course_index: u32) -> JointMaterial {
        match self {
            MaterialPolicy::CellularStandard
            | MaterialPolicy::CellularCourseBased
            | MaterialPolicy::Terracotta
                if course_index > 0 =>
            {
                JointMaterial::Glue
            }
            _ => JointMaterial::Mortar,
        }
    }

    pub fn is_cellular(&self) -> bool {
        matches!(
            self,
            MaterialPolicy::CellularStandard | MaterialPolicy::CellularCourseBased
        )
    }

    /// Specialized materials only accept continuation suggestions.
    pub fn is_specialized(&self) -> bool {
        matches!(
            self,
            MaterialPolicy::CellularStandard
                | MaterialPolicy::CellularCourseBased
                | MaterialPolicy::Argex
                | MaterialPolicy::Terracotta
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialPolicy::Hollow => "hollow",
            MaterialPolicy::CellularStandard => "cellular",
            MaterialPolicy::CellularCourseBased => "cellular-assise",
            MaterialPolicy::Argex => "argex",
            MaterialPolicy::Terracotta => "terracotta",
            MaterialPolicy::Insulation => "insulation",
        }
    }
}

impl fmt::Display for MaterialPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of an independent stack of courses in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CourseFamily {
    Brick,
    Block,
    Cellular,
    Argex,
    Terracotta,
    Insulation,
    /// Lintels, beams and slabs.
    Structural,
}

impl CourseFamily {
    /// Unit height assumed for a course nobody has configured yet.
    pub fn nominal_unit_height_cm(&self) -> f64 {
        match self {
            CourseFamily::Brick => 6.5,
            CourseFamily::Block => 20.0,
            CourseFamily::Cellular => 25.0,
            CourseFamily::Argex => 19.0,
            CourseFamily::Terracotta => 25.0,
            CourseFamily::Insulation => 60.0,
            CourseFamily::Structural => 20.0,
        }
    }

    /// Policy used for ledger defaults of this family.
    pub fn default_policy(&self) -> MaterialPolicy {
        match self {
            CourseFamily::Brick | CourseFamily::Block | CourseFamily::Structural => {
                MaterialPolicy::Hollow
            }
            CourseFamily::Cellular => MaterialPolicy::CellularStandard,
            CourseFamily::Argex => MaterialPolicy::Argex,
            CourseFamily::Terracotta => MaterialPolicy::Terracotta,
            CourseFamily::Insulation => MaterialPolicy::Insulation,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CourseFamily::Brick => "brick",
            CourseFamily::Block => "block",
            CourseFamily::Cellular => "cellular",
            CourseFamily::Argex => "argex",
            CourseFamily::Terracotta => "terracotta",
            CourseFamily::Insulation => "insulation",
            CourseFamily::Structural => "structural",
        }
    }
}

impl fmt::Display for CourseFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
