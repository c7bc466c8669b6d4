//! Underworld skill id ↔ name resolution

use super::csv::{parse_rows, TableRow};
use super::lookup::{fold, parse_id, parse_trailing_id, with_id, LookupIndex};
use super::source::load_text;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Skill id meaning "no skill"
pub const NO_SKILL_ID: i32 = 0;

const BUNDLED: &str = include_str!("../../assets/underworld_skill_table.csv");

/// Skill table; names shared by several ids are shown with their id
#[derive(Debug, Clone, Default)]
pub struct SkillTable {
    index: LookupIndex,
    options: Vec<String>,
    displays: HashMap<i32, String>,
}

impl SkillTable {
    pub fn from_rows(rows: &[TableRow]) -> Self {
        let index = LookupIndex::build(rows, &[]);

        let mut entries: Vec<(i32, &str)> = index.entries(&[]).collect();
        entries.sort_by(|a, b| a.1.to_lowercase().cmp(&b.1.to_lowercase()).then(a.0.cmp(&b.0)));

        let mut taken = HashSet::new();
        let mut options = Vec::with_capacity(entries.len());
        let mut displays = HashMap::with_capacity(entries.len());
        for (id, name) in entries {
            let mut display = if index.is_shared_name(name) {
                with_id(name, id)
            } else {
                name.to_string()
            };
            if !taken.insert(fold(&display)) {
                display = with_id(name, id);
                taken.insert(fold(&display));
            }
            displays.insert(id, display.clone());
            options.push(display);
        }

        SkillTable {
            index,
            options,
            displays,
        }
    }

    pub fn parse(text: &str) -> Self {
        Self::from_rows(&parse_rows(text))
    }

    /// Loads the override file when readable, else the bundled table
    pub fn load(override_path: Option<&Path>) -> Self {
        Self::parse(&load_text(override_path, BUNDLED, "skill"))
    }

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

    /// Option text for a known id, else the bare id.
    ///
    /// That is the bare name when unique and `Name (id)` when the name is
    /// shared or its bare form is already taken by another entry.
    pub fn format(&self, id: i32) -> String {
        match self.displays.get(&id) {
            Some(display) => display.clone(),
            None => id.to_string(),
        }
    }

    /// Resolves operator text; empty text means no skill
    pub fn resolve(&self, text: &str) -> Option<i32> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Some(NO_SKILL_ID);
        }
        if let Some(id) = parse_id(trimmed) {
            return Some(id);
        }
        if let Some(id) = self.index.lookup_display(trimmed) {
            return Some(id);
        }
        parse_trailing_id(trimmed)
    }

    /// Display strings ordered by name, then id
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn canonical_form(&self, option: &str) -> Option<String> {
        let id = self.resolve(option)?;
        self.index.name(id)?;
        Some(self.format(id))
    }
}
