//! Keystroke-level character checks for operator text fields

/// Characters accepted while typing an affix id: digits, `-`, and `F`/`f`
/// for the empty marker. Empty text is allowed.
pub fn is_affix_id_text_allowed(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | 'F' | 'f'))
}

/// Characters accepted while typing a numeric field
pub fn is_digits_only(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affix_id_charset() {
        assert!(is_affix_id_text_allowed(""));
        assert!(is_affix_id_text_allowed("12345"));
        assert!(is_affix_id_text_allowed("FFFFFFFF"));
        assert!(is_affix_id_text_allowed("ff"));
        assert!(is_affix_id_text_allowed("-"));
        assert!(!is_affix_id_text_allowed("0x1F"));
        assert!(!is_affix_id_text_allowed("Fire"));
        assert!(!is_affix_id_text_allowed("E"));
    }

    #[test]
    fn test_digits_only() {
        assert!(is_digits_only(""));
        assert!(is_digits_only("0255"));
        assert!(!is_digits_only("-1"));
        assert!(!is_digits_only("1.5"));
        assert!(!is_digits_only("٣"));
    }
}
