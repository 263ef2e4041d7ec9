// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement engine.
//!
//! The single writer of the scene. Mutations update units and the mutated
//! unit's own joints immediately, then enqueue a [`PlacementEvent`];
//! [`Engine::process_frame`] drains the queue once per frame, refreshes the
//! joints of every affected neighbour, regenerates suggestions when the
//! hover debounce fires and pushes the result to the ghost preview.
//!
//! Joint recomputation is an idempotent replace per owner: every joint of a
//! unit is removed before its new joints are added. A head joint is shared by
//! two neighbours and owned by whichever synthesized it first; the other
//! recognises it by the unit pair it joins.

mod collaborators;
mod events;
mod scheduler;
mod state;

pub use collaborators::{
    CourseSelector, FixedCourses, FixedSelection, GhostPreview, LibrarySelector, NoGhost,
};
pub use events::{FormerNeighbors, PlacementEvent};
pub use scheduler::{Debouncer, Throttle};
pub use state::{EngineState, FrameReport};

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use assise_core::{
    CourseFamily, CourseLedger, DiagnosticLog, EngineConfig, JointKind, JointSpec, OwnedJoints,
    Point3, Scene, Unit, UnitDraft, UnitId,
};
use assise_geometry::{apply_recess, Adjacency, AdjacencyDetector, JointSynthesizer};

use crate::candidate::SuggestionCandidate;
use crate::error::{Error, Result};
use crate::generator::SuggestionGenerator;
use crate::rules::SuggestionRuleTable;
use crate::selection::PlacementSpec;

/// Interactive placement engine over a scene collaborator.
pub struct Engine<S: Scene> {
    scene: S,
    ledger: CourseLedger,
    rules: Arc<SuggestionRuleTable>,
    library: Box<dyn LibrarySelector>,
    courses: Box<dyn CourseSelector>,
    ghost: Box<dyn GhostPreview>,
    state: EngineState,
    events: VecDeque<PlacementEvent>,
    diagnostics: DiagnosticLog,
}

impl<S: Scene> Engine<S> {
    /// Creates an engine using the embedded rule table.
    pub fn new(scene: S, config: EngineConfig) -> Result<Self> {
        let rules = SuggestionRuleTable::shared()?;
        Ok(Self::with_rules(scene, config, rules))
    }

    pub fn with_rules(scene: S, config: EngineConfig, rules: Arc<SuggestionRuleTable>) -> Self {
        let state = EngineState::new(&config);
        Self {
            scene,
            ledger: CourseLedger::new(config),
            rules,
            library: Box::new(FixedSelection::default()),
            courses: Box::new(FixedCourses::default()),
            ghost: Box::new(NoGhost),
            state,
            events: VecDeque::new(),
            diagnostics: DiagnosticLog::new(),
        }
    }

    pub fn with_library(mut self, library: impl LibrarySelector + 'static) -> Self {
        self.library = Box::new(library);
        self
    }

    pub fn with_courses(mut self, courses: impl CourseSelector + 'static) -> Self {
        self.courses = Box::new(courses);
        self
    }

    pub fn with_ghost(mut self, ghost: impl GhostPreview + 'static) -> Self {
        self.ghost = Box::new(ghost);
        self
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn into_scene(self) -> S {
        self.scene
    }

    pub fn ledger(&self) -> &CourseLedger {
        &self.ledger
    }

    pub fn config(&self) -> &EngineConfig {
        self.ledger.config()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn rules(&self) -> &SuggestionRuleTable {
        &self.rules
    }

    /// Events waiting for the next frame.
    pub fn pending_events(&self) -> impl Iterator<Item = &PlacementEvent> {
        self.events.iter()
    }

    // Queries. These never fail: unknown ids resolve to empty results and
    // are reported once.

    /// Suggestions for placing `spec` next to `reference`.
    pub fn compute_suggestions(
        &self,
        reference: UnitId,
        spec: &PlacementSpec,
    ) -> Vec<SuggestionCandidate> {
        let Some(unit) = self.known_unit(reference) else {
            return Vec::new();
        };
        SuggestionGenerator::new(&self.ledger, &self.rules).generate(unit, spec)
    }

    /// Suggestions for the library's current selection, falling back to the
    /// last valid selection.
    pub fn suggestions_for_selection(&mut self, reference: UnitId) -> Vec<SuggestionCandidate> {
        match self.current_spec() {
            Some(spec) => self.compute_suggestions(reference, &spec),
            None => Vec::new(),
        }
    }

    pub fn compute_adjacency(&self, id: UnitId) -> Adjacency {
        let Some(unit) = self.known_unit(id) else {
            return Adjacency::default();
        };
        let units = self.scene.all_units();
        AdjacencyDetector::new(&self.ledger).detect(unit, &units)
    }

    /// Head and bed joints a unit should own, without touching the scene.
    pub fn synthesize_joints(&self, id: UnitId) -> Vec<JointSpec> {
        let Some(unit) = self.known_unit(id) else {
            return Vec::new();
        };
        let units = self.scene.all_units();
        JointSynthesizer::new(&self.ledger).synthesize(unit, &units)
    }

    pub fn course_base_elevation(&self, family: CourseFamily, index: u32) -> f64 {
        self.ledger.base_elevation(family, index)
    }

    // Joint maintenance

    /// Replaces a unit's joint meshes with freshly synthesized ones.
    ///
    /// A head joint the neighbour already owns for the same pair of units is
    /// not duplicated. The current recess depth is applied to new joints.
    pub fn apply_joints(&mut self, id: UnitId) -> Result<OwnedJoints> {
        if self.scene.unit(id).is_none() {
            return Err(assise_core::Error::UnitNotFound(id).into());
        }
        let joints = self.synthesize_joints(id);

        for stale in self.scene.joints_owned_by(id) {
            self.scene.remove_joint_mesh(stale);
        }

        let mut owned = OwnedJoints::new();
        for mut joint in joints {
            if joint.kind == JointKind::Vertical && self.has_shared_head_joint(id, &joint) {
                continue;
            }
            if self.state.recess_depth_cm > 0.0 {
                apply_recess(&mut joint, self.state.recess_depth_cm)?;
            }
            owned.push(self.scene.add_joint_mesh(joint));
        }

        tracing::debug!(unit = ?id, joints = owned.len(), "Joints replaced");
        Ok(owned)
    }

    /// Recomputes the joints of every unit currently adjacent to `id`.
    /// Returns how many units were refreshed.
    pub fn refresh_neighbor_joints(&mut self, id: UnitId) -> Result<usize> {
        if self.scene.unit(id).is_none() {
            return Err(assise_core::Error::UnitNotFound(id).into());
        }
        let neighbors = self.neighbor_ids(id);
        Ok(self.refresh_units(&neighbors))
    }

    /// Sets a course's bed-joint thickness and shifts that course and every
    /// course above it by the difference. Joints refresh on the next frame.
    pub fn set_course_joint_thickness(
        &mut self,
        family: CourseFamily,
        index: u32,
        thickness_cm: f64,
    ) -> Result<()> {
        let previous = self
            .ledger
            .set_joint_thickness(family, index, thickness_cm)?;
        let delta = thickness_cm - previous;
        if delta != 0.0 {
            let shifted = self.units_from_course(family, index);
            for id in &shifted {
                if let Some(unit) = self.scene.unit_mut(*id) {
                    unit.position.y += delta;
                }
            }
            tracing::debug!(
                family = %family,
                from_index = index,
                delta_cm = delta,
                units = shifted.len(),
                "Courses shifted"
            );
        }
        self.events.push_back(PlacementEvent::CourseJointChanged {
            family,
            from_index: index,
        });
        Ok(())
    }

    // Scene mutations

    /// Adds a unit as given (no snapping), registers its course and
    /// synthesizes its joints.
    pub fn add_unit(&mut self, draft: UnitDraft) -> Result<UnitId> {
        let dims = draft.dimensions;
        if dims.is_degenerate() {
            return Err(assise_core::Error::DegenerateUnit {
                length: dims.length,
                width: dims.width,
                height: dims.height,
            }
            .into());
        }
        let course = draft.course;
        let family = draft.family;
        let id = self.scene.add_unit(draft);
        self.ledger.touch(course.family, course.index, dims.height);
        self.apply_joints(id)?;
        self.events.push_back(PlacementEvent::UnitPlaced(id));
        tracing::info!(
            unit = ?id,
            family = %family,
            course = %course.family,
            index = course.index,
            "Unit placed"
        );
        Ok(id)
    }

    /// Places the current selection at a suggestion.
    ///
    /// The unit joins the reference unit's course when both share a course
    /// family, otherwise the selected course. Its height snaps to the
    /// course's seating elevation plus the current height nudge.
    pub fn place_candidate(&mut self, candidate: &SuggestionCandidate) -> Result<UnitId> {
        let spec = self.current_spec().ok_or(Error::NoSelection)?;
        let index = match self.scene.unit(candidate.source_unit) {
            Some(reference) if reference.course.family == spec.course => reference.course.index,
            _ => self.courses.current_course(spec.course),
        };
        let mut position = candidate.world_position;
        position.y = self.ledger.seating_elevation(spec.course, index) + self.state.height_offset_cm;
        self.state.height_offset_cm = 0.0;
        self.add_unit(spec.draft(position, candidate.rotation, index))
    }

    /// Free placement of the current selection on the selected course.
    pub fn place_at(&mut self, position: Point3<f64>, rotation: f64) -> Result<UnitId> {
        let spec = self.current_spec().ok_or(Error::NoSelection)?;
        let index = self.courses.current_course(spec.course);
        let mut position = position;
        position.y = self.ledger.seating_elevation(spec.course, index);
        self.add_unit(spec.draft(position, rotation, index))
    }

    /// Removes a unit and the joints it owns. Former neighbours refresh on
    /// the next frame.
    pub fn remove_unit(&mut self, id: UnitId) -> Result<Unit> {
        let former_neighbors = self.neighbor_ids(id);
        for joint in self.scene.joints_owned_by(id) {
            self.scene.remove_joint_mesh(joint);
        }
        let unit = self
            .scene
            .remove_unit(id)
            .ok_or(assise_core::Error::UnitNotFound(id))?;
        if self.state.hover == Some(id) {
            self.state.clear_interaction();
        }
        self.events.push_back(PlacementEvent::UnitRemoved {
            id,
            former_neighbors,
        });
        tracing::info!(unit = ?id, "Unit removed");
        Ok(unit)
    }

    /// Moves and turns a unit, keeping its course.
    pub fn move_unit(&mut self, id: UnitId, position: Point3<f64>, rotation: f64) -> Result<()> {
        let former_neighbors = self.neighbor_ids(id);
        let unit = self
            .scene
            .unit_mut(id)
            .ok_or(assise_core::Error::UnitNotFound(id))?;
        unit.position = position;
        unit.rotation = rotation;
        self.apply_joints(id)?;
        self.events.push_back(PlacementEvent::UnitMoved {
            id,
            former_neighbors,
        });
        Ok(())
    }

    /// Recesses every joint mesh by `depth_cm`; joints created later get the
    /// same recess. Returns how many joints were updated.
    pub fn apply_recess(&mut self, depth_cm: f64) -> Result<usize> {
        if !depth_cm.is_finite() || depth_cm < 0.0 {
            return Err(assise_core::Error::InvalidRecessDepth(depth_cm).into());
        }
        let mut updated = 0;
        for id in self.scene.joint_ids() {
            if let Some(joint) = self.scene.joint_mesh_mut(id) {
                apply_recess(joint, depth_cm)?;
                updated += 1;
            }
        }
        self.state.recess_depth_cm = depth_cm;
        self.events.push_back(PlacementEvent::RecessChanged(depth_cm));
        tracing::info!(depth_cm = depth_cm, joints = updated, "Recess applied");
        Ok(updated)
    }

    /// Clears the scene, the course ledger and the interaction state.
    pub fn reset(&mut self) {
        self.scene.clear();
        self.ledger.clear();
        self.state = EngineState::new(self.ledger.config());
        self.events.clear();
        self.events.push_back(PlacementEvent::Reset);
        self.diagnostics.reset();
        self.ghost.clear();
        tracing::info!("Placement engine reset");
    }

    // Interaction

    /// Pointer moved over `reference` (or over nothing). Suggestions are
    /// regenerated once the pointer settles.
    pub fn hover(&mut self, reference: Option<UnitId>, now: Instant) {
        if self.state.hover != reference {
            self.state.hover = reference;
            self.state.height_offset_cm = 0.0;
            self.events.push_back(PlacementEvent::HoverChanged(reference));
        }
        self.state.suggestion_timer.schedule(now);
    }

    /// Nudges the previewed candidates vertically. The ghost follows at
    /// most once per throttle interval; a skipped update is flushed on the
    /// next frame. Returns `true` when the ghost was updated immediately.
    pub fn adjust_height(&mut self, dy_cm: f64, now: Instant) -> bool {
        if !dy_cm.is_finite() {
            return false;
        }
        self.state.height_offset_cm += dy_cm;
        if self.state.height_throttle.try_acquire(now) {
            self.push_ghost();
            true
        } else {
            self.state.ghost_dirty = true;
            false
        }
    }

    pub fn set_show_ghost(&mut self, show: bool) {
        self.state.show_ghost = show;
        if show {
            self.state.ghost_dirty = true;
        } else {
            self.ghost.clear();
        }
    }

    /// Drains the event queue once.
    pub fn process_frame(&mut self, now: Instant) -> FrameReport {
        let events: Vec<PlacementEvent> = self.events.drain(..).collect();
        let mut report = FrameReport {
            events: events.len(),
            ..FrameReport::default()
        };

        let mut affected: Vec<UnitId> = Vec::new();
        let mut scene_changed = false;
        for event in &events {
            match event {
                PlacementEvent::HoverChanged(_) | PlacementEvent::RecessChanged(_) => {}
                PlacementEvent::UnitPlaced(id) => affected.extend(self.neighbor_ids(*id)),
                PlacementEvent::UnitRemoved {
                    former_neighbors, ..
                } => affected.extend(former_neighbors.iter().copied()),
                PlacementEvent::UnitMoved {
                    id,
                    former_neighbors,
                } => {
                    affected.extend(former_neighbors.iter().copied());
                    affected.extend(self.neighbor_ids(*id));
                }
                PlacementEvent::CourseJointChanged { family, from_index } => {
                    affected.extend(self.units_from_course(*family, *from_index));
                }
                PlacementEvent::Reset => {
                    affected.clear();
                    self.state.ghost_dirty = true;
                }
            }
            scene_changed |= event.touches_scene();
        }
        report.joints_refreshed = self.refresh_units(&affected);

        let timer_fired = self.state.suggestion_timer.fire(now);
        if timer_fired || (scene_changed && self.state.hover.is_some()) {
            self.state.candidates = match self.state.hover {
                Some(reference) => self.suggestions_for_selection(reference),
                None => Vec::new(),
            };
            self.state.ghost_dirty = true;
            report.suggestions_recomputed = true;
        }

        if self.state.ghost_dirty {
            report.ghost_updated = self.push_ghost();
        }

        if report.events > 0 {
            tracing::trace!(
                events = report.events,
                joints_refreshed = report.joints_refreshed,
                suggestions = self.state.candidates.len(),
                "Frame processed"
            );
        }
        report
    }

    // Helpers

    fn known_unit(&self, id: UnitId) -> Option<&Unit> {
        let unit = self.scene.unit(id);
        if unit.is_none() {
            self.diagnostics
                .debug_once(&format!("unknown-unit:{id:?}"), "Unknown unit id, using empty result");
        }
        unit
    }

    fn current_spec(&mut self) -> Option<PlacementSpec> {
        match self.library.current_placement_spec() {
            Some(spec) if spec.is_valid() => {
                self.state.last_spec = Some(spec.clone());
                Some(spec)
            }
            _ => {
                let cached = self.state.last_spec.clone();
                if cached.is_some() {
                    self.diagnostics.debug_once(
                        "selection:cached",
                        "Library selection missing or invalid, using last valid selection",
                    );
                } else {
                    self.diagnostics
                        .warn_once("selection:none", "No unit selected, suggestions disabled");
                }
                cached
            }
        }
    }

    fn neighbor_ids(&self, id: UnitId) -> FormerNeighbors {
        let Some(unit) = self.scene.unit(id) else {
            return FormerNeighbors::new();
        };
        let units = self.scene.all_units();
        AdjacencyDetector::new(&self.ledger)
            .neighbors(unit, &units)
            .iter()
            .map(|n| n.id)
            .collect()
    }

    fn units_from_course(&self, family: CourseFamily, from_index: u32) -> Vec<UnitId> {
        self.scene
            .all_units()
            .into_iter()
            .filter(|u| u.course.family == family && u.course.index >= from_index)
            .map(|u| u.id)
            .collect()
    }

    /// Re-synthesizes joints of each distinct, still existing unit.
    fn refresh_units(&mut self, ids: &[UnitId]) -> usize {
        let mut seen: Vec<UnitId> = Vec::with_capacity(ids.len());
        for &id in ids {
            if seen.contains(&id) || self.scene.unit(id).is_none() {
                continue;
            }
            seen.push(id);
            if let Err(err) = self.apply_joints(id) {
                tracing::warn!(unit = ?id, error = %err, "Joint refresh failed");
            }
        }
        seen.len()
    }

    /// `true` when the neighbour across `joint` already owns the joint for
    /// this pair of units.
    fn has_shared_head_joint(&self, owner: UnitId, joint: &JointSpec) -> bool {
        let Some(partner) = joint.partner else {
            return false;
        };
        self.scene.joints_owned_by(partner).into_iter().any(|id| {
            self.scene.joint_mesh(id).is_some_and(|other| {
                other.kind == JointKind::Vertical && other.joins(owner, partner)
            })
        })
    }

    /// Sends the preview to the ghost. Returns `true` if anything was sent.
    fn push_ghost(&mut self) -> bool {
        self.state.ghost_dirty = false;
        if !self.state.show_ghost {
            return false;
        }
        if self.state.candidates.is_empty() {
            self.ghost.clear();
        } else {
            let preview = self.state.preview();
            self.ghost.show(&preview);
        }
        true
    }
}

impl<S: Scene + std::fmt::Debug> std::fmt::Debug for Engine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("scene", &self.scene)
            .field("ledger", &self.ledger)
            .field("state", &self.state)
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}
