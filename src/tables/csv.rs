//! Minimal reader for two-column `id,name` tables

/// One parsed table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: i32,
    pub name: String,
}

/// Splits one line on commas, honouring double quotes and `""` escapes
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
            continue;
        }

        match ch {
            ',' => fields.push(std::mem::take(&mut current)),
            '"' => in_quotes = true,
            _ => current.push(ch),
        }
    }

    fields.push(current);
    fields
}

/// Parses table text into rows.
///
/// Blank lines, lines with fewer than two fields, non-integer ids and empty
/// names are skipped. The first data-bearing line is dropped when its first
/// cell reads `id` (any case).
pub fn parse_rows(text: &str) -> Vec<TableRow> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    let mut header_seen = false;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let fields = parse_line(line);
        if fields.len() < 2 {
            continue;
        }

        let first = fields[0].trim();
        if !header_seen {
            header_seen = true;
            if first.eq_ignore_ascii_case("id") {
                continue;
            }
        }

        let Ok(id) = first.parse::<i32>() else {
            continue;
        };

        let name = fields[1].trim();
        if name.is_empty() {
            continue;
        }

        rows.push(TableRow {
            id,
            name: name.to_string(),
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_line_quotes() {
        assert_eq!(parse_line("1,abc"), vec!["1", "abc"]);
        assert_eq!(parse_line(r#"2,"a, b""#), vec!["2", "a, b"]);
        assert_eq!(parse_line(r#"3,"say ""hi""""#), vec!["3", r#"say "hi""#]);
        assert_eq!(parse_line("4,"), vec!["4", ""]);
        assert_eq!(parse_line("solo"), vec!["solo"]);
    }

    #[test]
    fn test_parse_rows_header_and_skips() {
        let text = "\u{feff}ID,Name\n\n1,Alpha\nx,Bad\n2,\n3\n4, Delta \n";
        let rows = parse_rows(text);
        assert_eq!(
            rows,
            vec![
                TableRow {
                    id: 1,
                    name: "Alpha".to_string()
                },
                TableRow {
                    id: 4,
                    name: "Delta".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_header_only_considered_first() {
        let rows = parse_rows("5,Five\nid,Name\n6,Six");
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 6]);
    }

    #[test]
    fn test_no_header() {
        let rows = parse_rows("7,Seven\r\n8,\"Eight, quoted\"\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "Eight, quoted");
    }
}
