//! Id ↔ name resolution tables for affixes and underworld skills

mod csv;
mod lookup;

pub mod affix;
pub mod filter;
pub mod skill;
pub mod source;

pub use affix::{AffixTable, EMPTY_MARKER, LEGACY_EMPTY_MARKER, RESERVED_AFFIX_ID};
pub use csv::{parse_line, parse_rows, TableRow};
pub use filter::{bypasses_search, filter_options, FilterOutcome};
pub use skill::{SkillTable, NO_SKILL_ID};
pub use source::{load_text, read_override, TableError};

use std::path::Path;

/// Both tables, loaded together
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub affixes: AffixTable,
    pub skills: SkillTable,
}

impl Tables {
    pub fn new(affixes: AffixTable, skills: SkillTable) -> Self {
        Tables { affixes, skills }
    }

    /// Loads each table from its override path, falling back to the bundled copy
    pub fn load(affix_override: Option<&Path>, skill_override: Option<&Path>) -> Self {
        Tables::new(
            AffixTable::load(affix_override),
            SkillTable::load(skill_override),
        )
    }

    pub fn bundled() -> Self {
        Tables::new(AffixTable::bundled(), SkillTable::bundled())
    }
}
