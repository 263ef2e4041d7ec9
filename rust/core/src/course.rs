// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Course ledger ("assises").
//!
//! Each course family keeps an independent stack of courses. A course's base
//! plane is the bottom of its bed joint; its units rest on top of that joint:
//!
//! ```text
//! base(i + 1) = base(i) + joint(i) + unit_height(i),   base(0) = 0
//! ```
//!
//! Courses are materialized lazily: a query for a course nobody configured
//! returns family defaults, and the first placed unit records the course's
//! unit height. Queries never fail.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::diagnostics::DiagnosticLog;
use crate::error::{Error, Result};
use crate::material::CourseFamily;

/// A resolved course entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub family: CourseFamily,
    pub index: u32,
    /// Elevation of the bottom of the course's bed joint.
    pub base_elevation: f64,
    pub joint_thickness_cm: f64,
    pub unit_height_cm: f64,
}

impl Course {
    /// Elevation the course's units rest at (top of the bed joint).
    pub fn seating_elevation(&self) -> f64 {
        self.base_elevation + self.joint_thickness_cm
    }

    /// Elevation of the top face of the course's units.
    pub fn top_elevation(&self) -> f64 {
        self.seating_elevation() + self.unit_height_cm
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct CourseEntry {
    joint_thickness_cm: Option<f64>,
    unit_height_cm: Option<f64>,
}

/// Per-family course bookkeeping.
#[derive(Debug)]
pub struct CourseLedger {
    families: FxHashMap<CourseFamily, BTreeMap<u32, CourseEntry>>,
    config: EngineConfig,
    diagnostics: DiagnosticLog,
}

impl CourseLedger {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            families: FxHashMap::default(),
            config,
            diagnostics: DiagnosticLog::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cumulative elevation of the base plane of course `index`.
    pub fn base_elevation(&self, family: CourseFamily, index: u32) -> f64 {
        self.note_unknown_family(family);
        (0..index)
            .map(|k| self.unit_height(family, k) + self.joint_thickness(family, k))
            .sum()
    }

    /// Elevation at which units of course `index` rest.
    pub fn seating_elevation(&self, family: CourseFamily, index: u32) -> f64 {
        self.base_elevation(family, index) + self.joint_thickness(family, index)
    }

    /// Bed-joint thickness of a course: the configured value, or the family
    /// policy default.
    pub fn joint_thickness(&self, family: CourseFamily, index: u32) -> f64 {
        self.entry(family, index)
            .and_then(|e| e.joint_thickness_cm)
            .unwrap_or_else(|| {
                family
                    .default_policy()
                    .horizontal_joint_thickness(index, &self.config)
            })
    }

    /// Unit height of a course: the recorded value, or the family nominal.
    pub fn unit_height(&self, family: CourseFamily, index: u32) -> f64 {
        self.entry(family, index)
            .and_then(|e| e.unit_height_cm)
            .unwrap_or_else(|| family.nominal_unit_height_cm())
    }

    /// Resolves a full course entry.
    pub fn course(&self, family: CourseFamily, index: u32) -> Course {
        Course {
            family,
            index,
            base_elevation: self.base_elevation(family, index),
            joint_thickness_cm: self.joint_thickness(family, index),
            unit_height_cm: self.unit_height(family, index),
        }
    }

    /// Materializes a course the first time a unit references it. The first
    /// unit defines the course's unit height; later calls keep it.
    pub fn touch(&mut self, family: CourseFamily, index: u32, unit_height_cm: f64) {
        let entry = self
            .families
            .entry(family)
            .or_default()
            .entry(index)
            .or_default();
        if entry.unit_height_cm.is_none() && unit_height_cm.is_finite() && unit_height_cm > 0.0 {
            entry.unit_height_cm = Some(unit_height_cm);
            tracing::debug!(
                family = %family,
                index = index,
                unit_height_cm = unit_height_cm,
                "Course registered"
            );
        }
    }

    /// Sets a course's bed-joint thickness and returns the previous value.
    ///
    /// Every unit in this course and the courses above it moves by the
    /// difference; callers are responsible for shifting them and refreshing
    /// their joints.
    pub fn set_joint_thickness(
        &mut self,
        family: CourseFamily,
        index: u32,
        thickness_cm: f64,
    ) -> Result<f64> {
        if !thickness_cm.is_finite() || thickness_cm < 0.0 {
            tracing::warn!(
                family = %family,
                index = index,
                value = thickness_cm,
                "Rejected joint thickness"
            );
            return Err(Error::InvalidJointThickness {
                family,
                index,
                value: thickness_cm,
            });
        }
        let previous = self.joint_thickness(family, index);
        self.families
            .entry(family)
            .or_default()
            .entry(index)
            .or_default()
            .joint_thickness_cm = Some(thickness_cm);
        tracing::info!(
            family = %family,
            index = index,
            previous_cm = previous,
            thickness_cm = thickness_cm,
            "Course joint thickness changed"
        );
        Ok(previous)
    }

    /// Overrides a course's unit height and returns the previous value.
    pub fn set_unit_height(
        &mut self,
        family: CourseFamily,
        index: u32,
        height_cm: f64,
    ) -> Result<f64> {
        if !height_cm.is_finite() || height_cm <= 0.0 {
            return Err(Error::InvalidUnitHeight {
                family,
                index,
                value: height_cm,
            });
        }
        let previous = self.unit_height(family, index);
        self.families
            .entry(family)
            .or_default()
            .entry(index)
            .or_default()
            .unit_height_cm = Some(height_cm);
        Ok(previous)
    }

    /// Highest course index referenced for a family.
    pub fn highest_index(&self, family: CourseFamily) -> Option<u32> {
        self.families
            .get(&family)
            .and_then(|courses| courses.keys().next_back().copied())
    }

    /// All courses from 0 to the highest referenced index, resolved.
    pub fn courses(&self, family: CourseFamily) -> Vec<Course> {
        match self.highest_index(family) {
            Some(top) => (0..=top).map(|i| self.course(family, i)).collect(),
            None => Vec::new(),
        }
    }

    /// Course families referenced so far.
    pub fn families(&self) -> Vec<CourseFamily> {
        let mut families: Vec<_> = self.families.keys().copied().collect();
        families.sort();
        families
    }

    pub fn is_known(&self, family: CourseFamily) -> bool {
        self.families.contains_key(&family)
    }

    /// Forgets every course (full-scene reset).
    pub fn clear(&mut self) {
        self.families.clear();
        self.diagnostics.reset();
    }

    fn entry(&self, family: CourseFamily, index: u32) -> Option<&CourseEntry> {
        self.families.get(&family).and_then(|c| c.get(&index))
    }

    fn note_unknown_family(&self, family: CourseFamily) {
        if !self.is_known(family) {
            self.diagnostics.debug_once(
                &format!("course-family:{family}"),
                "Course family not configured, using family defaults",
            );
        }
    }
}

impl Default for CourseLedger {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unknown_family_starts_at_zero() {
        let ledger = CourseLedger::default();
        assert_eq!(ledger.base_elevation(CourseFamily::Argex, 0), 0.0);
        assert_eq!(ledger.joint_thickness(CourseFamily::Argex, 0), 1.2);
    }

    #[test]
    fn base_elevation_accumulates_height_and_joint() {
        let mut ledger = CourseLedger::default();
        ledger.touch(CourseFamily::Brick, 0, 6.5);
        ledger.touch(CourseFamily::Brick, 1, 6.5);
        assert_relative_eq!(ledger.base_elevation(CourseFamily::Brick, 1), 7.7, epsilon = 1e-9);
        assert_relative_eq!(ledger.base_elevation(CourseFamily::Brick, 2), 15.4, epsilon = 1e-9);
        assert_relative_eq!(ledger.seating_elevation(CourseFamily::Brick, 1), 8.9, epsilon = 1e-9);
    }

    #[test]
    fn cellular_courses_use_glue_above_first() {
        let ledger = CourseLedger::default();
        assert_relative_eq!(ledger.joint_thickness(CourseFamily::Cellular, 0), 1.2, epsilon = 1e-9);
        assert_relative_eq!(ledger.joint_thickness(CourseFamily::Cellular, 1), 0.1, epsilon = 1e-9);
        assert_relative_eq!(ledger.base_elevation(CourseFamily::Cellular, 1), 26.2, epsilon = 1e-9);
        assert_relative_eq!(ledger.base_elevation(CourseFamily::Cellular, 2), 51.3, epsilon = 1e-9);
    }

    #[test]
    fn set_joint_thickness_shifts_higher_courses() {
        let mut ledger = CourseLedger::default();
        let before = ledger.base_elevation(CourseFamily::Block, 3);
        let previous = ledger
            .set_joint_thickness(CourseFamily::Block, 1, 2.0)
            .unwrap();
        assert_relative_eq!(previous, 1.2, epsilon = 1e-9);
        assert_relative_eq!(ledger.base_elevation(CourseFamily::Block, 1), 21.2, epsilon = 1e-9);
        assert_relative_eq!(ledger.base_elevation(CourseFamily::Block, 3), before + 0.8, epsilon = 1e-9);
    }

    #[test]
    fn rejects_negative_or_nan_thickness() {
        let mut ledger = CourseLedger::default();
        assert!(ledger.set_joint_thickness(CourseFamily::Brick, 0, -0.5).is_err());
        assert!(ledger.set_joint_thickness(CourseFamily::Brick, 0, f64::NAN).is_err());
        assert_relative_eq!(ledger.joint_thickness(CourseFamily::Brick, 0), 1.2, epsilon = 1e-9);
    }

    #[test]
    fn first_unit_defines_course_height() {
        let mut ledger = CourseLedger::default();
        ledger.touch(CourseFamily::Block, 0, 25.0);
        ledger.touch(CourseFamily::Block, 0, 20.0);
        assert_relative_eq!(ledger.unit_height(CourseFamily::Block, 0), 25.0, epsilon = 1e-9);
        assert_eq!(ledger.highest_index(CourseFamily::Block), Some(0));
    }

    #[test]
    fn base_elevation_is_monotonic() {
        let mut ledger = CourseLedger::default();
        ledger.set_joint_thickness(CourseFamily::Brick, 2, 0.0).unwrap();
        ledger.set_unit_height(CourseFamily::Brick, 4, 0.5).unwrap();
        for family in [CourseFamily::Brick, CourseFamily::Cellular, CourseFamily::Insulation] {
            for i in 0..12 {
                assert!(ledger.base_elevation(family, i) <= ledger.base_elevation(family, i + 1));
            }
        }
    }

    #[test]
    fn courses_lists_up_to_highest_index() {
        let mut ledger = CourseLedger::default();
        ledger.touch(CourseFamily::Brick, 2, 6.5);
        let courses = ledger.courses(CourseFamily::Brick);
        assert_eq!(courses.len(), 3);
        assert_relative_eq!(courses[2].seating_elevation(), 16.6, epsilon = 1e-9);
        ledger.clear();
        assert!(ledger.courses(CourseFamily::Brick).is_empty());
    }
}
