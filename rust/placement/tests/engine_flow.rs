// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use assise_core::{
    CourseFamily, CutClass, EngineConfig, JointKind, JointMaterial, MaterialPolicy, Point3, Scene,
    SceneArena, UnitId,
};
use assise_placement::{
    Engine, Error, FixedCourses, FixedSelection, GhostPreview, LibrarySelector, PlacementEvent,
    PlacementSpec, SlotLetter, SuggestionCandidate,
};
use rustc_hash::FxHashMap;

#[derive(Clone, Default)]
struct RecordingGhost(Rc<RefCell<Vec<Vec<SuggestionCandidate>>>>);

impl RecordingGhost {
    fn frames(&self) -> usize {
        self.0.borrow().len()
    }

    fn last(&self) -> Vec<SuggestionCandidate> {
        self.0.borrow().last().cloned().unwrap_or_default()
    }
}

impl GhostPreview for RecordingGhost {
    fn show(&mut self, candidates: &[SuggestionCandidate]) {
        self.0.borrow_mut().push(candidates.to_vec());
    }

    fn clear(&mut self) {
        self.0.borrow_mut().push(Vec::new());
    }
}

#[derive(Clone, Default)]
struct SharedSelection(Rc<RefCell<Option<PlacementSpec>>>);

impl SharedSelection {
    fn select(&self, spec: Option<PlacementSpec>) {
        *self.0.borrow_mut() = spec;
    }
}

impl LibrarySelector for SharedSelection {
    fn current_placement_spec(&self) -> Option<PlacementSpec> {
        self.0.borrow().clone()
    }
}

fn brick_engine() -> Engine<SceneArena> {
    Engine::new(SceneArena::new(), EngineConfig::default())
        .unwrap()
        .with_library(FixedSelection(Some(PlacementSpec::brick(CutClass::Full))))
}

fn place_pair(engine: &mut Engine<SceneArena>) -> (UnitId, UnitId) {
    let a = engine.place_at(Point3::origin(), 0.0).unwrap();
    let right = engine
        .suggestions_for_selection(a)
        .into_iter()
        .find(|c| c.slot == SlotLetter::A)
        .unwrap();
    let b = engine.place_candidate(&right).unwrap();
    (a, b)
}

fn count(engine: &Engine<SceneArena>, kind: JointKind) -> usize {
    engine.scene().joints_of_kind(kind).len()
}

#[test]
fn placing_a_neighbour_creates_one_shared_head_joint() {
    let mut engine = brick_engine();
    let (a, b) = place_pair(&mut engine);
    engine.process_frame(Instant::now());

    let unit_b = engine.scene().unit(b).unwrap();
    assert_relative_eq!(unit_b.position, Point3::new(20.2, 1.2, 0.0), epsilon = 1e-9);
    assert!(engine.compute_adjacency(a).right);
    assert!(engine.compute_adjacency(b).left);

    assert_eq!(count(&engine, JointKind::Vertical), 1);
    assert_eq!(count(&engine, JointKind::Horizontal), 2);
    let head = engine.scene().joints_of_kind(JointKind::Vertical)[0];
    assert_relative_eq!(head.dimensions.width, 1.2, epsilon = 1e-9);
    for bed in engine.scene().joints_of_kind(JointKind::Horizontal) {
        assert_relative_eq!(bed.dimensions.height, 1.2, epsilon = 1e-9);
    }
}

#[test]
fn refreshing_joints_is_idempotent() {
    let mut engine = brick_engine();
    let (a, b) = place_pair(&mut engine);
    engine.process_frame(Instant::now());
    let before = engine.scene().joint_count();

    engine.apply_joints(a).unwrap();
    engine.apply_joints(b).unwrap();
    engine.refresh_neighbor_joints(a).unwrap();
    assert_eq!(engine.scene().joint_count(), before);
    assert_eq!(count(&engine, JointKind::Vertical), 1);
}

#[test]
fn removing_a_unit_cascades_its_joints() {
    let mut engine = brick_engine();
    let (a, b) = place_pair(&mut engine);
    engine.process_frame(Instant::now());

    let removed = engine.remove_unit(b).unwrap();
    assert_eq!(removed.id, b);
    assert!(matches!(
        engine.pending_events().last(),
        Some(PlacementEvent::UnitRemoved { former_neighbors, .. }) if former_neighbors.contains(&a)
    ));
    let report = engine.process_frame(Instant::now());
    assert_eq!(report.joints_refreshed, 1);

    assert_eq!(count(&engine, JointKind::Vertical), 0);
    assert_eq!(engine.scene().joints_owned_by(a).len(), 1);
    assert_eq!(engine.scene().joint_count(), 1);
    assert!(!engine.compute_adjacency(a).any());
    assert!(!engine.compute_adjacency(b).any());
    assert!(matches!(
        engine.remove_unit(b),
        Err(Error::Core(assise_core::Error::UnitNotFound(_)))
    ));
}

#[test]
fn moving_a_unit_away_drops_the_head_joint() {
    let mut engine = brick_engine();
    let (_, b) = place_pair(&mut engine);
    engine.process_frame(Instant::now());

    engine
        .move_unit(b, Point3::new(60.0, 1.2, 0.0), 0.0)
        .unwrap();
    engine.process_frame(Instant::now());
    assert_eq!(count(&engine, JointKind::Vertical), 0);
    assert_eq!(count(&engine, JointKind::Horizontal), 2);
}

#[test]
fn joint_thickness_change_lifts_the_courses_above() {
    let mut engine = brick_engine();
    let a = engine.place_at(Point3::origin(), 0.0).unwrap();
    engine.process_frame(Instant::now());

    engine
        .set_course_joint_thickness(CourseFamily::Brick, 0, 2.0)
        .unwrap();
    assert_relative_eq!(engine.scene().unit(a).unwrap().position.y, 2.0, epsilon = 1e-9);
    assert_relative_eq!(
        engine.course_base_elevation(CourseFamily::Brick, 1),
        8.5,
        epsilon = 1e-9
    );

    let report = engine.process_frame(Instant::now());
    assert_eq!(report.joints_refreshed, 1);
    let bed = engine.scene().joints_of_kind(JointKind::Horizontal)[0];
    assert_relative_eq!(bed.dimensions.height, 2.0, epsilon = 1e-9);

    assert!(engine
        .set_course_joint_thickness(CourseFamily::Brick, 0, -1.0)
        .is_err());
}

#[test]
fn hover_is_debounced_before_the_ghost_updates() {
    let ghost = RecordingGhost::default();
    let mut engine = brick_engine().with_ghost(ghost.clone());
    let a = engine.place_at(Point3::origin(), 0.0).unwrap();
    let start = Instant::now();
    engine.process_frame(start);

    engine.hover(Some(a), start);
    engine.hover(Some(a), start + Duration::from_millis(40));
    let early = engine.process_frame(start + Duration::from_millis(60));
    assert!(!early.suggestions_recomputed);
    assert_eq!(ghost.frames(), 0);

    let settled = engine.process_frame(start + Duration::from_millis(120));
    assert!(settled.suggestions_recomputed);
    assert!(settled.ghost_updated);
    assert_eq!(ghost.last().len(), 10);
    assert_eq!(engine.state().candidates().len(), 10);

    engine.hover(None, start + Duration::from_millis(200));
    engine.process_frame(start + Duration::from_millis(300));
    assert!(ghost.last().is_empty());
}

#[test]
fn height_nudges_are_throttled() {
    let ghost = RecordingGhost::default();
    let mut engine = brick_engine().with_ghost(ghost.clone());
    let a = engine.place_at(Point3::origin(), 0.0).unwrap();
    let start = Instant::now();
    engine.hover(Some(a), start);
    engine.process_frame(start + Duration::from_millis(100));
    let shown = ghost.frames();

    let t = start + Duration::from_millis(200);
    assert!(engine.adjust_height(1.0, t));
    assert!(!engine.adjust_height(1.0, t + Duration::from_millis(2)));
    assert_eq!(ghost.frames(), shown + 1);

    let report = engine.process_frame(t + Duration::from_millis(3));
    assert!(report.ghost_updated);
    let last = ghost.last();
    assert_relative_eq!(last[0].world_position.y, 1.2 + 2.0, epsilon = 1e-9);
    assert_relative_eq!(engine.state().height_offset_cm(), 2.0, epsilon = 1e-9);
}

#[test]
fn recess_applies_to_existing_and_new_joints() {
    let mut engine = brick_engine();
    let (a, _) = place_pair(&mut engine);
    engine.process_frame(Instant::now());

    assert_eq!(engine.apply_recess(0.5).unwrap(), 3);
    assert_eq!(engine.apply_recess(0.5).unwrap(), 3);
    let head = engine.scene().joints_of_kind(JointKind::Vertical)[0];
    assert_relative_eq!(head.dimensions.width, 0.7, epsilon = 1e-9);

    let left = engine
        .suggestions_for_selection(a)
        .into_iter()
        .find(|c| c.slot == SlotLetter::B)
        .unwrap();
    engine.place_candidate(&left).unwrap();
    engine.process_frame(Instant::now());
    for joint in engine.scene().joints_of_kind(JointKind::Vertical) {
        assert_relative_eq!(joint.recess_depth_cm, 0.5, epsilon = 1e-9);
        assert_relative_eq!(joint.dimensions.width, 0.7, epsilon = 1e-9);
    }
    assert!(engine.apply_recess(f64::NAN).is_err());
}

#[test]
fn missing_selection_falls_back_to_last_valid_one() {
    let selection = SharedSelection::default();
    let mut engine = Engine::new(SceneArena::new(), EngineConfig::default())
        .unwrap()
        .with_library(selection.clone());

    assert!(matches!(
        engine.place_at(Point3::origin(), 0.0),
        Err(Error::NoSelection)
    ));

    selection.select(Some(PlacementSpec::brick(CutClass::Half)));
    let a = engine.place_at(Point3::origin(), 0.0).unwrap();
    selection.select(None);
    let out = engine.suggestions_for_selection(a);
    assert!(!out.is_empty());
    assert_eq!(out[0].slot_code, "HHA");
    assert_eq!(
        engine.state().last_spec().map(|s| s.cut),
        Some(CutClass::Half)
    );
}

#[test]
fn half_brick_selection_never_offers_slot_e() {
    let mut engine = brick_engine();
    let a = engine.place_at(Point3::origin(), 0.0).unwrap();
    let out = engine.compute_suggestions(a, &PlacementSpec::brick(CutClass::Half));
    assert!(!out.is_empty());
    assert!(out.iter().all(|c| c.slot != SlotLetter::E));
}

fn cellular_spec() -> PlacementSpec {
    PlacementSpec {
        material: MaterialPolicy::CellularStandard,
        course: CourseFamily::Cellular,
        dimensions: assise_core::Dimensions::new(60.0, 20.0, 25.0),
        ..PlacementSpec::block(assise_core::BlockSubFamily::B19, CutClass::Full)
    }
}

#[test]
fn seated_cellular_units_get_one_glue_bed_each() {
    for index in 1..=5 {
        let mut courses = FxHashMap::default();
        courses.insert(CourseFamily::Cellular, index);
        let mut engine = Engine::new(SceneArena::new(), EngineConfig::default())
            .unwrap()
            .with_library(FixedSelection(Some(cellular_spec())))
            .with_courses(FixedCourses(courses));

        let a = engine.place_at(Point3::origin(), 0.0).unwrap();
        let right = engine
            .suggestions_for_selection(a)
            .into_iter()
            .find(|c| c.slot == SlotLetter::A)
            .unwrap();
        let b = engine.place_candidate(&right).unwrap();
        engine.process_frame(Instant::now());

        let seating = engine.ledger().seating_elevation(CourseFamily::Cellular, index);
        assert_eq!(count(&engine, JointKind::Vertical), 0, "course {index}");
        assert_eq!(count(&engine, JointKind::Horizontal), 2, "course {index}");
        for id in [a, b] {
            let unit = engine.scene().unit(id).unwrap();
            assert_eq!(unit.course.index, index);
            assert_relative_eq!(unit.position.y, seating, epsilon = 1e-9);

            let owned = engine.scene().joints_owned_by(id);
            assert_eq!(owned.len(), 1, "course {index}");
            let bed = engine.scene().joint_mesh(owned[0]).unwrap();
            assert_eq!(bed.kind, JointKind::Horizontal);
            assert_eq!(bed.material, JointMaterial::Glue);
            assert_relative_eq!(bed.dimensions.height, 0.1, epsilon = 1e-9);
        }
    }
}

#[test]
fn touching_bricks_share_one_head_joint() {
    let mut engine = brick_engine();
    let a = engine.place_at(Point3::origin(), 0.0).unwrap();
    let b = engine.place_at(Point3::new(19.0, 0.0, 0.0), 0.0).unwrap();
    engine.process_frame(Instant::now());
    engine.apply_joints(a).unwrap();
    engine.apply_joints(b).unwrap();

    let heads = engine.scene().joints_of_kind(JointKind::Vertical);
    assert_eq!(heads.len(), 1);
    assert!(heads[0].joins(a, b));
    assert_relative_eq!(heads[0].dimensions.width, 1.0, epsilon = 1e-9);
    assert_relative_eq!(heads[0].center.x, 19.0, epsilon = 1e-9);
}

#[test]
fn reset_clears_everything() {
    let ghost = RecordingGhost::default();
    let mut engine = brick_engine().with_ghost(ghost.clone());
    let (a, _) = place_pair(&mut engine);
    engine.reset();

    assert_eq!(engine.scene().unit_count(), 0);
    assert_eq!(engine.scene().joint_count(), 0);
    assert!(engine.ledger().families().is_empty());
    assert_eq!(
        engine.pending_events().collect::<Vec<_>>(),
        vec![&PlacementEvent::Reset]
    );
    assert!(ghost.last().is_empty());
    assert!(!engine.compute_adjacency(a).any());
    assert!(engine.synthesize_joints(a).is_empty());
}
