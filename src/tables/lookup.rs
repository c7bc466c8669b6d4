//! Forward and reverse indexes shared by the resolution tables

use super::csv::TableRow;
use std::collections::{BTreeMap, HashMap};

/// Case-insensitive key for name lookups
pub(crate) fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

/// `Name (id)` display form
pub(crate) fn with_id(name: &str, id: i32) -> String {
    format!("{} ({})", name, id)
}

/// Parses a plain integer id
pub(crate) fn parse_id(text: &str) -> Option<i32> {
    text.trim().parse::<i32>().ok()
}

/// Extracts the id from a trailing `(id)` or full-width `（id）` suffix.
///
/// The closing parenthesis must end the text.
pub(crate) fn parse_trailing_id(text: &str) -> Option<i32> {
    let text = text.trim();
    for (open, close) in [('(', ')'), ('（', '）')] {
        let Some(close_at) = text.rfind(close) else {
            continue;
        };
        let Some(open_at) = text[..close_at].rfind(open) else {
            continue;
        };
        if close_at + close.len_utf8() != text.len() {
            continue;
        }
        return parse_id(&text[open_at + open.len_utf8()..close_at]);
    }
    None
}

/// Whether the text looks like `Name (id)`
pub(crate) fn looks_like_display_with_id(text: &str) -> bool {
    parse_trailing_id(text).is_some()
}

/// id→name map plus the derived name→canonical-id and display→id maps
#[derive(Debug, Clone, Default)]
pub(crate) struct LookupIndex {
    id_to_name: BTreeMap<i32, String>,
    /// folded name → (minimum id, number of ids sharing it)
    names: HashMap<String, (i32, usize)>,
    /// folded display string → id
    display_to_id: HashMap<String, i32>,
}

impl LookupIndex {
    /// Builds the index; the first row for an id wins and `hidden` ids only get a forward entry
    pub fn build(rows: &[TableRow], hidden: &[i32]) -> Self {
        let mut id_to_name = BTreeMap::new();
        for row in rows {
            id_to_name.entry(row.id).or_insert_with(|| row.name.clone());
        }

        let mut names: HashMap<String, (i32, usize)> = HashMap::new();
        for (&id, name) in &id_to_name {
            if hidden.contains(&id) {
                continue;
            }
            let entry = names.entry(fold(name)).or_insert((id, 0));
            entry.0 = entry.0.min(id);
            entry.1 += 1;
        }

        // Bare names resolve to the canonical (minimum) id of their group;
        // an explicit "name (id)" key always wins over a bare name.
        let mut display_to_id: HashMap<String, i32> = names
            .iter()
            .map(|(key, (min_id, _))| (key.clone(), *min_id))
            .collect();
        for (&id, name) in &id_to_name {
            if !hidden.contains(&id) {
                display_to_id.insert(fold(&with_id(name, id)), id);
            }
        }

        LookupIndex {
            id_to_name,
            names,
            display_to_id,
        }
    }

    pub fn name(&self, id: i32) -> Option<&str> {
        self.id_to_name.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    /// Visible entries in id order
    pub fn entries<'a>(&'a self, hidden: &'a [i32]) -> impl Iterator<Item = (i32, &'a str)> + 'a {
        self.id_to_name
            .iter()
            .filter(move |(id, _)| !hidden.contains(id))
            .map(|(id, name)| (*id, name.as_str()))
    }

    /// Minimum id among entries sharing `name`
    pub fn canonical_id(&self, name: &str) -> Option<i32> {
        self.names.get(&fold(name)).map(|(id, _)| *id)
    }

    /// Whether more than one id carries `name`
    pub fn is_shared_name(&self, name: &str) -> bool {
        self.names
            .get(&fold(name))
            .map_or(false, |(_, count)| *count > 1)
    }

    pub fn lookup_display(&self, text: &str) -> Option<i32> {
        self.display_to_id.get(&fold(text)).copied()
    }
}
