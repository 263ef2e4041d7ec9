// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Assise Placement
//!
//! Suggests where the next masonry unit can go and keeps joints in sync as
//! units are placed, moved and removed.
//!
//! - [`SuggestionRuleTable`]: validated slot corrections loaded from an
//!   embedded data file.
//! - [`SuggestionGenerator`]: candidates around a reference unit.
//! - [`Engine`]: the interactive facade (event queue, hover debounce, height
//!   throttle, ghost preview).
//!
//! ## Quick Start
//!
//! ```
//! use assise_core::{CutClass, EngineConfig, Point3, SceneArena};
//! use assise_placement::{Engine, FixedSelection, PlacementSpec};
//!
//! let mut engine = Engine::new(SceneArena::new(), EngineConfig::default())
//!     .unwrap()
//!     .with_library(FixedSelection(Some(PlacementSpec::brick(CutClass::Full))));
//!
//! let first = engine.place_at(Point3::origin(), 0.0).unwrap();
//! let suggestions = engine.suggestions_for_selection(first);
//! assert_eq!(suggestions[0].slot_code, "EEA");
//! ```

pub mod candidate;
pub mod codes;
pub mod compat;
pub mod engine;
pub mod error;
pub mod generator;
pub mod rules;
pub mod selection;

pub use candidate::SuggestionCandidate;
pub use codes::{BlockCode, CandidateKind, CodeParseError, LetterCode, LocalOffset, SlotLetter};
pub use compat::{forbidden_slots, is_slot_allowed, SlotSet, UnitBucket};
pub use engine::{
    CourseSelector, Engine, EngineState, FixedCourses, FixedSelection, FrameReport, GhostPreview,
    LibrarySelector, NoGhost, PlacementEvent,
};
pub use error::{Error, Result};
pub use generator::{Spacing, SuggestionGenerator};
pub use rules::{RuleTableError, SuggestionRuleTable};
pub use selection::PlacementSpec;
