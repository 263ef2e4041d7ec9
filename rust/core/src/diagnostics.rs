// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Once-per-cause diagnostics.
//!
//! Defaulted inputs (unknown course family, missing selection, unknown rule
//! code) are reported the first time a given cause is seen and then stay
//! quiet, so pointer-move handlers cannot flood the log.

use rustc_hash::FxHashSet;
use std::sync::Mutex;

/// Remembers which diagnostic causes have already been reported.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    seen: Mutex<FxHashSet<String>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time `cause` is seen.
    pub fn first_time(&self, cause: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if seen.contains(cause) {
            false
        } else {
            seen.insert(cause.to_string());
            true
        }
    }

    /// Emits a warning for `cause` unless it has been reported before.
    pub fn warn_once(&self, cause: &str, message: &str) -> bool {
        let first = self.first_time(cause);
        if first {
            tracing::warn!(cause = cause, "{}", message);
        }
        first
    }

    /// Emits a debug event for `cause` unless it has been reported before.
    pub fn debug_once(&self, cause: &str, message: &str) -> bool {
        let first = self.first_time(cause);
        if first {
            tracing::debug!(cause = cause, "{}", message);
        }
        first
    }

    /// Number of distinct causes reported so far.
    pub fn reported(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Forgets all reported causes.
    pub fn reset(&self) {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}
