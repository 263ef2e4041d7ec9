// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Joint recess.
//!
//! Recessing shrinks a head joint's width or a bed joint's depth about the
//! joint's centre. The un-recessed extents are captured on first application,
//! so the result only depends on the requested depth.

use assise_core::{Error, JointKind, JointSpec, Result};

/// Recesses a joint by `depth_cm`. Applying the same depth twice gives the
/// same geometry as applying it once; a depth of zero restores the joint.
pub fn apply_recess(joint: &mut JointSpec, depth_cm: f64) -> Result<()> {
    if !depth_cm.is_finite() || depth_cm < 0.0 {
        return Err(Error::InvalidRecessDepth(depth_cm));
    }
    let original = *joint.original.get_or_insert(joint.dimensions);
    let mut dims = original;
    match joint.kind {
        JointKind::Vertical => dims.width = (original.width - depth_cm).max(0.0),
        JointKind::Horizontal => dims.depth = (original.depth - depth_cm).max(0.0),
    }
    joint.dimensions = dims;
    joint.recess_depth_cm = depth_cm;
    Ok(())
}

/// Restores a joint's un-recessed extents.
pub fn clear_recess(joint: &mut JointSpec) {
    if let Some(original) = joint.original.take() {
        joint.dimensions = original;
    }
    joint.recess_depth_cm = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use assise_core::{JointDimensions, JointMaterial, Point3, UnitId};

    fn joint(kind: JointKind) -> JointSpec {
        JointSpec::new(
            kind,
            Point3::new(19.5, 3.25, 4.5),
            JointDimensions::new(1.0, 6.5, 9.0),
            0.0,
            UnitId::default(),
            JointMaterial::Mortar,
        )
    }

    #[test]
    fn recess_is_idempotent() {
        let mut j = joint(JointKind::Vertical);
        apply_recess(&mut j, 0.5).unwrap();
        assert_relative_eq!(j.dimensions.width, 0.5, epsilon = 1e-9);
        apply_recess(&mut j, 0.5).unwrap();
        assert_relative_eq!(j.dimensions.width, 0.5, epsilon = 1e-9);
        assert_relative_eq!(j.center, Point3::new(19.5, 3.25, 4.5), epsilon = 1e-9);
        assert_relative_eq!(j.recess_depth_cm, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn bed_joint_recess_shrinks_depth() {
        let mut j = joint(JointKind::Horizontal);
        apply_recess(&mut j, 2.0).unwrap();
        assert_relative_eq!(j.dimensions.depth, 7.0, epsilon = 1e-9);
        assert_relative_eq!(j.dimensions.width, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn deeper_recess_clamps_to_zero() {
        let mut j = joint(JointKind::Vertical);
        apply_recess(&mut j, 3.0).unwrap();
        assert_eq!(j.dimensions.width, 0.0);
        apply_recess(&mut j, 0.25).unwrap();
        assert_relative_eq!(j.dimensions.width, 0.75, epsilon = 1e-9);
    }

    #[test]
    fn rejects_invalid_depth() {
        let mut j = joint(JointKind::Vertical);
        assert!(apply_recess(&mut j, -0.1).is_err());
        assert!(apply_recess(&mut j, f64::NAN).is_err());
        assert!(j.original.is_none());
    }

    #[test]
    fn clear_restores_original() {
        let mut j = joint(JointKind::Vertical);
        apply_recess(&mut j, 0.4).unwrap();
        clear_recess(&mut j);
        assert_relative_eq!(j.dimensions.width, 1.0, epsilon = 1e-9);
        assert_eq!(j.recess_depth_cm, 0.0);
        assert!(j.original.is_none());
    }
}
