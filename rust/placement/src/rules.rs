// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Suggestion rule table.
//!
//! Positional corrections for every slot code live in
//! `data/suggestion_rules.json`, embedded at compile time and validated
//! once at load: every key must parse, no code may be both an entry and
//! excluded, and every possible code must be one of the two. Letter-code
//! offsets are in module fractions (multiples of the reference unit's
//! full-length module); block-code offsets are in centimetres.

use std::sync::{Arc, OnceLock};

use assise_core::DiagnosticLog;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use crate::codes::{BlockCode, CodeParseError, LetterCode, LocalOffset};

const EMBEDDED_RULES: &str = include_str!("../data/suggestion_rules.json");

static SHARED: OnceLock<Arc<SuggestionRuleTable>> = OnceLock::new();

/// Errors raised while loading a rule table.
#[derive(Debug, thiserror::Error)]
pub enum RuleTableError {
    #[error("rule table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{section}: {source}")]
    InvalidCode {
        section: &'static str,
        #[source]
        source: CodeParseError,
    },

    #[error("{section}: expected offsets in '{expected}', found '{found}'")]
    UnitMismatch {
        section: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("{section}: code {code} is both an entry and excluded")]
    Conflict { section: &'static str, code: String },

    #[error("{section}: code {code} is neither an entry nor excluded")]
    Missing { section: &'static str, code: String },

    #[error("{section}: code {code} has a non-finite offset")]
    NonFinite { section: &'static str, code: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleFile {
    letter_codes: RuleSection,
    block_codes: RuleSection,
}

#[derive(Debug, Deserialize)]
struct RuleSection {
    unit: String,
    entries: FxHashMap<String, LocalOffset>,
    #[serde(default)]
    excluded: Vec<String>,
}

/// A validated table of slot corrections.
#[derive(Debug)]
pub struct SuggestionRuleTable {
    letters: FxHashMap<LetterCode, LocalOffset>,
    excluded_letters: FxHashSet<LetterCode>,
    blocks: FxHashMap<BlockCode, LocalOffset>,
    excluded_blocks: FxHashSet<BlockCode>,
    diagnostics: DiagnosticLog,
}

impl SuggestionRuleTable {
    /// Parses and validates a rule table from JSON text.
    pub fn from_json(text: &str) -> Result<Self, RuleTableError> {
        let file: RuleFile = serde_json::from_str(text)?;

        let (letters, excluded_letters) =
            load_section::<LetterCode>("letterCodes", "module", file.letter_codes)?;
        check_total("letterCodes", LetterCode::all(), &letters, &excluded_letters)?;

        let (blocks, excluded_blocks) =
            load_section::<BlockCode>("blockCodes", "cm", file.block_codes)?;
        check_total("blockCodes", BlockCode::all(), &blocks, &excluded_blocks)?;

        tracing::debug!(
            letter_entries = letters.len(),
            letter_excluded = excluded_letters.len(),
            block_entries = blocks.len(),
            block_excluded = excluded_blocks.len(),
            "Suggestion rule table loaded"
        );

        Ok(Self {
            letters,
            excluded_letters,
            blocks,
            excluded_blocks,
            diagnostics: DiagnosticLog::new(),
        })
    }

    /// The table shipped with the crate.
    pub fn embedded() -> Result<Self, RuleTableError> {
        Self::from_json(EMBEDDED_RULES)
    }

    /// Process-wide instance of the embedded table, loaded on first use.
    pub fn shared() -> Result<Arc<Self>, RuleTableError> {
        if let Some(table) = SHARED.get() {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(Self::embedded()?);
        Ok(Arc::clone(SHARED.get_or_init(|| table)))
    }

    /// Looks up a code string, letter or block.
    ///
    /// Excluded codes return `None` silently. Codes the table does not know
    /// at all return `None` and are logged once per code.
    pub fn lookup(&self, code: &str) -> Option<LocalOffset> {
        if let Ok(letter) = code.parse::<LetterCode>() {
            return self.letter(letter);
        }
        if let Ok(block) = code.parse::<BlockCode>() {
            return self.block(block);
        }
        self.diagnostics.debug_once(
            &format!("rule-code:{code}"),
            "Unknown suggestion rule code, slot dropped",
        );
        None
    }

    /// Correction for a letter code, in module fractions.
    pub fn letter(&self, code: LetterCode) -> Option<LocalOffset> {
        self.letters.get(&code).copied()
    }

    /// Correction for a block code, in centimetres.
    pub fn block(&self, code: BlockCode) -> Option<LocalOffset> {
        self.blocks.get(&code).copied()
    }

    pub fn is_letter_excluded(&self, code: LetterCode) -> bool {
        self.excluded_letters.contains(&code)
    }

    pub fn is_block_excluded(&self, code: BlockCode) -> bool {
        self.excluded_blocks.contains(&code)
    }

    pub fn letter_entry_count(&self) -> usize {
        self.letters.len()
    }

    pub fn block_entry_count(&self) -> usize {
        self.blocks.len()
    }

    /// Every code with an entry, as text.
    pub fn codes(&self) -> impl Iterator<Item = String> + '_ {
        self.letters
            .keys()
            .map(|c| c.to_string())
            .chain(self.blocks.keys().map(|c| c.to_string()))
    }
}

type Section<C> = (FxHashMap<C, LocalOffset>, FxHashSet<C>);

fn load_section<C>(
    section: &'static str,
    expected_unit: &'static str,
    raw: RuleSection,
) -> Result<Section<C>, RuleTableError>
where
    C: std::str::FromStr<Err = CodeParseError> + std::hash::Hash + Eq + ToString,
{
    if raw.unit != expected_unit {
        return Err(RuleTableError::UnitMismatch {
            section,
            expected: expected_unit,
            found: raw.unit,
        });
    }

    let mut entries = FxHashMap::default();
    for (key, offset) in raw.entries {
        let code: C = key
            .parse()
            .map_err(|source| RuleTableError::InvalidCode { section, source })?;
        if !offset.is_finite() {
            return Err(RuleTableError::NonFinite { section, code: key });
        }
        entries.insert(code, offset);
    }

    let mut excluded = FxHashSet::default();
    for key in raw.excluded {
        let code: C = key
            .parse()
            .map_err(|source| RuleTableError::InvalidCode { section, source })?;
        if entries.contains_key(&code) {
            return Err(RuleTableError::Conflict { section, code: key });
        }
        excluded.insert(code);
    }

    Ok((entries, excluded))
}

fn check_total<C>(
    section: &'static str,
    all: impl Iterator<Item = C>,
    entries: &FxHashMap<C, LocalOffset>,
    excluded: &FxHashSet<C>,
) -> Result<(), RuleTableError>
where
    C: std::hash::Hash + Eq + ToString,
{
    for code in all {
        if !entries.contains_key(&code) && !excluded.contains(&code) {
            return Err(RuleTableError::Missing {
                section,
                code: code.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::SlotLetter;
    use approx::assert_relative_eq;
    use assise_core::{BlockSubFamily, CutClass};

    #[test]
    fn embedded_table_is_valid() {
        let table = SuggestionRuleTable::embedded().unwrap();
        assert_eq!(table.letter_entry_count() + 32, 224);
        assert_eq!(table.block_entry_count() + 128, 896);
    }

    #[test]
    fn lookup_by_text() {
        let table = SuggestionRuleTable::embedded().unwrap();
        let heb = table.lookup("HEB").unwrap();
        assert_relative_eq!(heb.dx, 0.5, epsilon = 1e-9);
        let hee = table.lookup("HEE").unwrap();
        assert_relative_eq!(hee.dz, -0.5, epsilon = 1e-9);
        let block = table.lookup("140103").unwrap();
        assert_relative_eq!(block.dx, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn quarter_corners_are_excluded() {
        let table = SuggestionRuleTable::embedded().unwrap();
        assert!(table.lookup("QEG").is_none());
        let code = LetterCode::new(CutClass::Quarter, CutClass::Full, SlotLetter::S).unwrap();
        assert!(table.is_letter_excluded(code));
        assert!(table.lookup("QEA").is_some());
    }

    #[test]
    fn narrow_blocks_cannot_turn_corners() {
        let table = SuggestionRuleTable::embedded().unwrap();
        let b29 = BlockCode::new(BlockSubFamily::B29, CutClass::Full, CutClass::Half, SlotLetter::G)
            .unwrap();
        assert!(table.block(b29).is_none());
        assert!(table.is_block_excluded(b29));
        let b9 = BlockCode::new(BlockSubFamily::B9, CutClass::Full, CutClass::Quarter, SlotLetter::G)
            .unwrap();
        assert!(table.block(b9).is_some());
    }

    #[test]
    fn unknown_codes_are_reported_once() {
        let table = SuggestionRuleTable::embedded().unwrap();
        assert!(table.lookup("XYZ").is_none());
        assert!(table.lookup("XYZ").is_none());
        assert!(table.lookup("").is_none());
        assert_eq!(table.diagnostics.reported(), 2);
    }

    #[test]
    fn every_non_null_lookup_is_an_entry() {
        let table = SuggestionRuleTable::embedded().unwrap();
        let mut found = 0;
        for code in LetterCode::all() {
            if let Some(offset) = table.lookup(&code.to_string()) {
                assert_eq!(table.letters.get(&code), Some(&offset));
                found += 1;
            }
        }
        assert_eq!(found, table.letter_entry_count());
    }

    #[test]
    fn rejects_incomplete_table() {
        let text = r#"{
            "version": 1,
            "letterCodes": { "unit": "module", "entries": { "EEA": { "dx": 0, "dz": 0 } } },
            "blockCodes": { "unit": "cm", "entries": {} }
        }"#;
        let err = SuggestionRuleTable::from_json(text).unwrap_err();
        assert!(matches!(err, RuleTableError::Missing { section: "letterCodes", .. }));
    }

    #[test]
    fn rejects_conflicting_and_malformed_codes() {
        let conflict = r#"{
            "version": 1,
            "letterCodes": {
                "unit": "module",
                "entries": { "EEA": { "dx": 0, "dz": 0 } },
                "excluded": ["EEA"]
            },
            "blockCodes": { "unit": "cm", "entries": {} }
        }"#;
        assert!(matches!(
            SuggestionRuleTable::from_json(conflict),
            Err(RuleTableError::Conflict { .. })
        ));

        let malformed = r#"{
            "version": 1,
            "letterCodes": { "unit": "module", "entries": { "EEZ": { "dx": 0, "dz": 0 } } },
            "blockCodes": { "unit": "cm", "entries": {} }
        }"#;
        assert!(matches!(
            SuggestionRuleTable::from_json(malformed),
            Err(RuleTableError::InvalidCode { .. })
        ));

        let wrong_unit = r#"{
            "version": 1,
            "letterCodes": { "unit": "cm", "entries": {} },
            "blockCodes": { "unit": "cm", "entries": {} }
        }"#;
        assert!(matches!(
            SuggestionRuleTable::from_json(wrong_unit),
            Err(RuleTableError::UnitMismatch { .. })
        ));
    }

    #[test]
    fn shared_table_is_reused() {
        let a = SuggestionRuleTable::shared().unwrap();
        let b = SuggestionRuleTable::shared().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
