// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON report printed by the CLI.

use assise_core::{Course, CourseFamily, CourseRef, JointSpec, Point3, Scene, UnitId};
use assise_geometry::Adjacency;
use assise_placement::{Engine, SuggestionCandidate};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneReport {
    pub units: Vec<UnitReport>,
    pub courses: Vec<CourseStack>,
    pub joints: Vec<JointSpec>,
    pub recess_cm: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<usize>,
    pub suggestions: Vec<SuggestionCandidate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitReport {
    /// Position of the unit in the scene file.
    pub index: usize,
    pub course: CourseRef,
    pub position: Point3<f64>,
    pub adjacency: Adjacency,
    pub joints: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStack {
    pub family: CourseFamily,
    pub courses: Vec<Course>,
}

impl SceneReport {
    /// Collects units (in file order), course stacks and joint meshes.
    pub fn build<S: Scene>(
        engine: &Engine<S>,
        ids: &[UnitId],
        reference: Option<usize>,
        suggestions: Vec<SuggestionCandidate>,
    ) -> Self {
        let scene = engine.scene();
        let units = ids
            .iter()
            .enumerate()
            .filter_map(|(index, &id)| {
                let unit = scene.unit(id)?;
                Some(UnitReport {
                    index,
                    course: unit.course,
                    position: unit.position,
                    adjacency: engine.compute_adjacency(id),
                    joints: scene.joints_owned_by(id).len(),
                })
            })
            .collect();

        let courses = engine
            .ledger()
            .families()
            .into_iter()
            .map(|family| CourseStack {
                family,
                courses: engine.ledger().courses(family),
            })
            .collect();

        let joints = scene
            .joint_ids()
            .into_iter()
            .filter_map(|id| scene.joint_mesh(id).cloned())
            .collect();

        Self {
            units,
            courses,
            joints,
            recess_cm: engine.state().recess_depth_cm(),
            reference,
            suggestions,
        }
    }
}
