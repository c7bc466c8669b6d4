//! Option-list filtering for free-text affix id entry

use super::affix::{EMPTY_MARKER, LEGACY_EMPTY_MARKER};
use super::lookup::{looks_like_display_with_id, parse_id};

/// Result of filtering the browsable options against typed text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Options to offer, in table order
    pub options: Vec<String>,
    /// Whether a suggestion list should be shown
    pub open: bool,
}

/// Text that already denotes an id skips the search entirely.
pub fn bypasses_search(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(EMPTY_MARKER) {
        return true;
    }
    // Partially typed sentinel
    if trimmed.len() <= EMPTY_MARKER.len() && trimmed.chars().all(|c| c == 'F' || c == 'f') {
        return true;
    }
    trimmed == LEGACY_EMPTY_MARKER || looks_like_display_with_id(trimmed) || parse_id(trimmed).is_some()
}

/// Case-insensitive substring filter over `options`
pub fn filter_options(options: &[String], text: &str) -> FilterOutcome {
    if bypasses_search(text) {
        return FilterOutcome {
            options: options.to_vec(),
            open: false,
        };
    }

    let keyword = text.trim().to_lowercase();
    let matches: Vec<String> = options
        .iter()
        .filter(|option| option.to_lowercase().contains(&keyword))
        .cloned()
        .collect();
    let exact = options.iter().any(|option| option.to_lowercase() == keyword);

    FilterOutcome {
        open: !exact && !matches.is_empty(),
        options: matches,
    }
}
