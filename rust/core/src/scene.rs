// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene registry: the collaborator that owns placed units and joint meshes.
//!
//! The application renders from whatever implements [`Scene`]; the placement
//! engine is its single writer. [`SceneArena`] is the in-memory registry used
//! by the CLI and tests.

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::joint::{JointKind, JointSpec};
use crate::keys::{JointId, UnitId};
use crate::unit::{Unit, UnitDraft};

/// Joint ids owned by one unit. Most units own at most a bed joint and two
/// head joints.
pub type OwnedJoints = SmallVec<[JointId; 4]>;

/// Read/write access to placed units and joint meshes.
pub trait Scene {
    /// Every placed unit, in a stable order.
    fn all_units(&self) -> Vec<&Unit>;

    fn unit(&self, id: UnitId) -> Option<&Unit>;

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit>;

    fn add_unit(&mut self, draft: UnitDraft) -> UnitId;

    /// Removes a unit. Joint meshes are not touched; owners cascade them.
    fn remove_unit(&mut self, id: UnitId) -> Option<Unit>;

    fn add_joint_mesh(&mut self, spec: JointSpec) -> JointId;

    fn remove_joint_mesh(&mut self, id: JointId) -> Option<JointSpec>;

    fn joint_mesh(&self, id: JointId) -> Option<&JointSpec>;

    fn joint_mesh_mut(&mut self, id: JointId) -> Option<&mut JointSpec>;

    /// Ids of every joint mesh, in a stable order.
    fn joint_ids(&self) -> Vec<JointId>;

    /// Removes every unit and joint mesh.
    fn clear(&mut self);

    /// Joint meshes owned by a unit.
    fn joints_owned_by(&self, owner: UnitId) -> OwnedJoints {
        self.joint_ids()
            .into_iter()
            .filter(|&id| self.joint_mesh(id).is_some_and(|j| j.owner == owner))
            .collect()
    }

    /// Joint meshes of a given kind.
    fn joints_of_kind(&self, kind: JointKind) -> Vec<&JointSpec> {
        self.joint_ids()
            .into_iter()
            .filter_map(|id| self.joint_mesh(id))
            .filter(|j| j.kind == kind)
            .collect()
    }

    fn unit_count(&self) -> usize {
        self.all_units().len()
    }
}

/// Slot-map backed scene registry.
///
/// # Example
///
/// ```
/// use assise_core::{CourseFamily, CourseRef, CutClass, Dimensions, MaterialPolicy,
///     Point3, Scene, SceneArena, UnitDraft, UnitFamily};
///
/// let mut scene = SceneArena::new();
/// let id = scene.add_unit(UnitDraft {
///     family: UnitFamily::Brick,
///     material: MaterialPolicy::Hollow,
///     cut: CutClass::Full,
///     block: None,
///     position: Point3::origin(),
///     dimensions: Dimensions::new(19.0, 9.0, 6.5),
///     rotation: 0.0,
///     course: CourseRef::new(CourseFamily::Brick, 0),
/// });
///
/// assert_eq!(scene.unit(id).unwrap().id, id);
/// assert_eq!(scene.unit_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SceneArena {
    units: SlotMap<UnitId, Unit>,
    joints: SlotMap<JointId, JointSpec>,
}

impl SceneArena {
    pub fn new() -> Self {
        Self {
            units: SlotMap::with_key(),
            joints: SlotMap::with_key(),
        }
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Iterates over joint meshes with their ids.
    pub fn joints(&self) -> impl Iterator<Item = (JointId, &JointSpec)> {
        self.joints.iter()
    }
}

impl Scene for SceneArena {
    fn all_units(&self) -> Vec<&Unit> {
        self.units.values().collect()
    }

    fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id)
    }

    fn add_unit(&mut self, draft: UnitDraft) -> UnitId {
        self.units.insert_with_key(|id| draft.into_unit(id))
    }

    fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        self.units.remove(id)
    }

    fn add_joint_mesh(&mut self, spec: JointSpec) -> JointId {
        self.joints.insert(spec)
    }

    fn remove_joint_mesh(&mut self, id: JointId) -> Option<JointSpec> {
        self.joints.remove(id)
    }

    fn joint_mesh(&self, id: JointId) -> Option<&JointSpec> {
        self.joints.get(id)
    }

    fn joint_mesh_mut(&mut self, id: JointId) -> Option<&mut JointSpec> {
        self.joints.get_mut(id)
    }

    fn joint_ids(&self) -> Vec<JointId> {
        self.joints.keys().collect()
    }

    fn clear(&mut self) {
        self.units.clear();
        self.joints.clear();
    }

    fn unit_count(&self) -> usize {
        self.units.len()
    }
}
