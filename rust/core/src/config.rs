// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration loaded from environment variables.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Delay before a burst of hover changes regenerates suggestions.
    pub debounce_ms: u64,
    /// Minimum interval between ghost height-only updates.
    pub height_throttle_ms: u64,
    /// Mortar bed thickness (first course, hollow families).
    pub mortar_thickness_cm: f64,
    /// Glue bed thickness for thin-joint courses.
    pub glue_thickness_cm: f64,
    /// Head-joint thickness for brick and block families.
    pub vertical_joint_cm: f64,
    /// A computed bed joint within this distance of the configured thickness
    /// snaps to it.
    pub horizontal_snap_tolerance_cm: f64,
    /// Bed joints at or below this height are not produced.
    pub min_horizontal_joint_cm: f64,
    /// Gaps below this are treated as touching faces when sizing head joints.
    pub min_vertical_gap_cm: f64,
    /// Whether the ghost preview is shown while hovering.
    pub show_ghost: bool,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            debounce_ms: env_or("ASSISE_DEBOUNCE_MS", defaults.debounce_ms),
            height_throttle_ms: env_or("ASSISE_HEIGHT_THROTTLE_MS", defaults.height_throttle_ms),
            mortar_thickness_cm: env_or("ASSISE_MORTAR_CM", defaults.mortar_thickness_cm),
            glue_thickness_cm: env_or("ASSISE_GLUE_CM", defaults.glue_thickness_cm),
            vertical_joint_cm: env_or("ASSISE_VERTICAL_JOINT_CM", defaults.vertical_joint_cm),
            horizontal_snap_tolerance_cm: env_or(
                "ASSISE_HORIZONTAL_SNAP_CM",
                defaults.horizontal_snap_tolerance_cm,
            ),
            min_horizontal_joint_cm: env_or(
                "ASSISE_MIN_HORIZONTAL_JOINT_CM",
                defaults.min_horizontal_joint_cm,
            ),
            min_vertical_gap_cm: env_or("ASSISE_MIN_VERTICAL_GAP_CM", defaults.min_vertical_gap_cm),
            show_ghost: env_or("ASSISE_SHOW_GHOST", defaults.show_ghost),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn height_throttle(&self) -> Duration {
        Duration::from_millis(self.height_throttle_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 75,
            height_throttle_ms: 8,
            mortar_thickness_cm: 1.2,
            glue_thickness_cm: 0.1,
            vertical_joint_cm: 1.0,
            horizontal_snap_tolerance_cm: 0.1,
            min_horizontal_joint_cm: 0.1,
            min_vertical_gap_cm: 0.05,
            show_ghost: true,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}
