//! Affix id ↔ name resolution

use super::csv::{parse_rows, TableRow};
use super::filter::{filter_options, FilterOutcome};
use super::lookup::{fold, parse_id, parse_trailing_id, with_id, LookupIndex};
use super::source::load_text;
use crate::core::types::EMPTY_AFFIX_ID;
use std::collections::HashSet;
use std::path::Path;

/// Display form of the empty sentinel
pub const EMPTY_MARKER: &str = "FFFFFFFF";

/// Older input form of the empty sentinel
pub const LEGACY_EMPTY_MARKER: &str = "-";

/// Placeholder id that is never offered for selection
pub const RESERVED_AFFIX_ID: i32 = 0;

const HIDDEN: &[i32] = &[RESERVED_AFFIX_ID];

const BUNDLED: &str = include_str!("../../assets/affix_id_table.csv");

/// Affix table with canonical reverse lookup
#[derive(Debug, Clone, Default)]
pub struct AffixTable {
    index: LookupIndex,
    options: Vec<String>,
}

impl AffixTable {
    pub fn from_rows(rows: &[TableRow]) -> Self {
        let index = LookupIndex::build(rows, HIDDEN);

        // Distinct names, spelled as on their lowest id.
        let mut seen = HashSet::new();
        let mut options: Vec<String> = index
            .entries(HIDDEN)
            .filter(|(_, name)| seen.insert(fold(name)))
            .map(|(_, name)| name.to_string())
            .collect();
        options.sort_by_key(|name| name.to_lowercase());

        AffixTable { index, options }
    }

    /// Parses CSV text with an `id,name` layout
    pub fn parse(text: &str) -> Self {
        Self::from_rows(&parse_rows(text))
    }

    /// Loads the override file when readable, else the bundled table
    pub fn load(override_path: Option<&Path>) -> Self {
        Self::parse(&load_text(override_path, BUNDLED, "affix"))
    }

    /// The bundled table alone
    pub fn bundled() -> Self {
        Self::parse(BUNDLED)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.len() == 0
    }

    pub fn name(&self, id: i32) -> Option<&str> {
        self.index.name(id)
    }

    /// `FFFFFFFF` for the sentinel, `Name (id)` when named, else the bare id
    pub fn format(&self, id: i32) -> String {
        if id == EMPTY_AFFIX_ID {
            return EMPTY_MARKER.to_string();
        }
        match self.index.name(id) {
            Some(name) => with_id(name, id),
            None => id.to_string(),
        }
    }

    /// Resolves operator text to an affix id.
    ///
    /// Precedence: empty, sentinel marker, legacy dash, integer, display
    /// string, trailing `(id)`. Returns `None` when nothing matches.
    pub fn resolve(&self, text: &str) -> Option<i32> {
        let trimmed = text.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case(EMPTY_MARKER)
            || trimmed == LEGACY_EMPTY_MARKER
        {
            return Some(EMPTY_AFFIX_ID);
        }
        if let Some(id) = parse_id(trimmed) {
            return Some(id);
        }
        if let Some(id) = self.index.lookup_display(trimmed) {
            return Some(id);
        }
        parse_trailing_id(trimmed)
    }

    /// Browsable names, sorted case-insensitively
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// `Name (id)` of the canonical entry an option selects
    pub fn canonical_form(&self, option: &str) -> Option<String> {
        let id = self.index.canonical_id(option)?;
        let name = self.index.name(id)?;
        Some(with_id(name, id))
    }

    pub fn filter(&self, text: &str) -> FilterOutcome {
        filter_options(&self.options, text)
    }

    /// Whether two texts select the same affix
    pub fn same_selection(&self, a: &str, b: &str) -> bool {
        if a.trim().eq_ignore_ascii_case(b.trim()) {
            return true;
        }
        matches!((self.resolve(a), self.resolve(b)), (Some(x), Some(y)) if x == y)
    }
}
