// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for the scene registry.
//!
//! Units and joint meshes are stored in slot maps, so their keys stay valid
//! (and distinguishable from reused slots) after other entries are removed.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a placed masonry unit.
    pub struct UnitId;

    /// Key for a synthesized joint mesh.
    pub struct JointId;
}
