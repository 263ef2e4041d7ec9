// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::rules::RuleTableError;

/// Result type for placement operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by engine mutations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] assise_core::Error),

    #[error("suggestion rules: {0}")]
    RuleTable(#[from] RuleTableError),

    /// Nothing is selected in the library and no earlier selection is cached.
    #[error("no unit selected for placement")]
    NoSelection,
}
