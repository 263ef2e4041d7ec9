// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene description files.

use std::path::Path;

use anyhow::{bail, Context, Result};
use assise_core::{CourseFamily, EngineConfig, UnitDraft};
use assise_placement::PlacementSpec;
use serde::Deserialize;

/// Highest course index a scene file may reference.
pub const MAX_COURSE_INDEX: u32 = 1_000;

/// A wall to rebuild: units in placement order plus the library selection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFile {
    /// Engine settings; falls back to `ASSISE_*` environment variables.
    #[serde(default)]
    pub config: Option<EngineConfig>,
    /// Unit type selected in the library.
    #[serde(default)]
    pub selection: Option<PlacementSpec>,
    #[serde(default)]
    pub joint_thickness: Vec<JointThicknessOverride>,
    pub units: Vec<UnitDraft>,
    /// Index into `units` of the unit to suggest around.
    #[serde(default)]
    pub reference: Option<usize>,
    #[serde(default)]
    pub recess_cm: Option<f64>,
}

/// Bed-joint thickness set on one course before any unit is placed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JointThicknessOverride {
    pub family: CourseFamily,
    pub index: u32,
    pub thickness_cm: f64,
}

impl SceneFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read scene file '{}'", path.display()))?;
        let scene: SceneFile = serde_json::from_str(&text)
            .with_context(|| format!("Cannot parse scene file '{}'", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            units = scene.units.len(),
            overrides = scene.joint_thickness.len(),
            "Scene file loaded"
        );
        scene.validate()?;
        Ok(scene)
    }

    /// Rejects course indices above [`MAX_COURSE_INDEX`].
    pub fn validate(&self) -> Result<()> {
        for (i, unit) in self.units.iter().enumerate() {
            if unit.course.index > MAX_COURSE_INDEX {
                bail!(
                    "Unit #{} is on course {}, above the limit of {}",
                    i,
                    unit.course.index,
                    MAX_COURSE_INDEX
                );
            }
        }
        for o in &self.joint_thickness {
            if o.index > MAX_COURSE_INDEX {
                bail!(
                    "Joint thickness override targets course {}, above the limit of {}",
                    o.index,
                    MAX_COURSE_INDEX
                );
            }
        }
        Ok(())
    }
}
