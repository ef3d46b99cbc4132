//! Line-oriented INI parser.
//!
//! Rules, applied to each line in order:
//!
//! 1. Blank lines, lines starting with `#` or `;` in the first column, and
//!    `rem` lines are skipped.  An indented `#` or `;` is ordinary text.
//! 2. A line starting with whitespace, directly following an option, continues
//!    that option's value (joined with `\n`).
//! 3. `[name]` opens (or re-opens) a section.  The name is taken verbatim.
//! 4. `key = value` / `key: value` sets an option.  The key is lower-cased;
//!    a `;` preceded by whitespace starts an inline comment.
//! 5. Anything else is malformed.  All malformed lines are reported at once.

use super::{normalize_option, IniDocument, IniError};

/// Parses INI `text` into an [`IniDocument`].
///
/// # Errors
///
/// - [`IniError::MissingSectionHeader`] when an option precedes every header.
/// - [`IniError::Malformed`] listing each line that could not be understood.
///
/// # Examples
///
/// ```rust
/// use ovn_k8s_config::parse_ini;
///
/// let doc = parse_ini("[default]\nworkers = 4\n").unwrap();
/// assert_eq!(doc.get("default", "workers"), Ok("4"));
/// ```
pub fn parse_ini(text: &str) -> Result<IniDocument, IniError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut doc = IniDocument::default();
    let mut current_section: Option<String> = None;
    // Option that a continuation line would extend.
    let mut current_option: Option<String> = None;
    let mut malformed: Vec<(usize, String)> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || line.starts_with(['#', ';']) || is_rem_comment(line) {
            continue;
        }

        let indented = line.starts_with(char::is_whitespace);
        if indented {
            if let (Some(section), Some(option)) = (&current_section, &current_option) {
                if let Some(value) = doc.section_mut(section).get_mut(option) {
                    value.push('\n');
                    value.push_str(trimmed);
                }
                continue;
            }
        }

        if let Some(name) = parse_section_header(line) {
            doc.section_mut(name);
            current_section = Some(name.to_string());
            current_option = None;
            continue;
        }

        let Some(section) = &current_section else {
            return Err(IniError::MissingSectionHeader {
                line: line_no,
                content: line.to_string(),
            });
        };

        match parse_option_line(line) {
            Some((key, value)) => {
                let key = normalize_option(key);
                doc.section_mut(section).set(key.clone(), value);
                current_option = Some(key);
            }
            None => malformed.push((line_no, line.to_string())),
        }
    }

    if !malformed.is_empty() {
        return Err(IniError::Malformed { lines: malformed });
    }
    Ok(doc)
}

/// `rem` or `REM` as the first word of an unindented line.
fn is_rem_comment(line: &str) -> bool {
    line.starts_with(['r', 'R'])
        && line
            .split_whitespace()
            .next()
            .is_some_and(|word| word.eq_ignore_ascii_case("rem"))
}

/// Matches `[name]` at the very start of the line.  Anything after the
/// closing bracket is ignored.
fn parse_section_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    if end == 0 {
        return None;
    }
    Some(&rest[..end])
}

/// Splits an option line at the first `=` or `:` and cleans up the value.
fn parse_option_line(line: &str) -> Option<(&str, String)> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    let split = line.find(['=', ':'])?;
    let key = line[..split].trim_end();
    if key.is_empty() {
        return None;
    }

    let raw = line[split + 1..].trim_start();
    let value = strip_inline_comment(raw).trim();
    let value = if value == "\"\"" { "" } else { value };
    Some((key, value.to_string()))
}

/// Removes an inline `;` comment.  Only the first `;` is considered, and only
/// when the character before it is whitespace.  For a `;` at the very start
/// of the value the character "before" it is the last character of the value.
fn strip_inline_comment(value: &str) -> &str {
    let Some(pos) = value.find(';') else {
        return value;
    };
    let before = if pos == 0 {
        value.chars().last()
    } else {
        value[..pos].chars().last()
    };
    match before {
        Some(c) if c.is_whitespace() => &value[..pos],
        _ => value,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections_and_both_separators() {
        // Arrange
        let text = "[default]\nworkers = 4\ndebug: True\n[other]\nname=ovn\n";

        // Act
        let doc = parse_ini(text).expect("valid INI");

        // Assert
        assert_eq!(doc.get("default", "workers"), Ok("4"));
        assert_eq!(doc.get("default", "debug"), Ok("True"));
        assert_eq!(doc.get("other", "name"), Ok("ovn"));
    }

    #[test]
    fn test_parse_splits_at_first_separator() {
        let doc = parse_ini("[s]\nurl = http://host:6641\nratio: a=b\n").expect("valid INI");
        assert_eq!(doc.get("s", "url"), Ok("http://host:6641"));
        assert_eq!(doc.get("s", "ratio"), Ok("a=b"));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let text = "# leading comment\n; another\n\n[s]\nrem old note\nREM\nk = v\n#k = w\n";
        let doc = parse_ini(text).expect("valid INI");
        assert_eq!(doc.get("s", "k"), Ok("v"));
        assert_eq!(doc.section("s").map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_parse_rem_prefix_needs_a_whole_word() {
        let doc = parse_ini("[s]\nremote = host\n").expect("valid INI");
        assert_eq!(doc.get("s", "remote"), Ok("host"));
    }

    #[test]
    fn test_parse_indented_comment_marker_continues_value() {
        // Arrange
        let text = "[default]\ntags = [1,\n    ; 2,\n    # 3,\n    4]\n";

        // Act
        let doc = parse_ini(text).expect("valid INI");

        // Assert
        assert_eq!(doc.get("default", "tags"), Ok("[1,\n; 2,\n# 3,\n4]"));
    }

    #[test]
    fn test_parse_indented_comment_without_option_is_malformed() {
        let err = parse_ini("[s]\n  # c\nk = v\n").unwrap_err();
        assert_eq!(err, IniError::Malformed { lines: vec![(2, "  # c".into())] });
    }

    #[test]
    fn test_parse_indented_comment_before_header_is_missing_header() {
        let err = parse_ini("  ; c\n[s]\n").unwrap_err();
        assert!(matches!(err, IniError::MissingSectionHeader { line: 1, .. }));
    }

    #[test]
    fn test_parse_lowercases_option_names() {
        let doc = parse_ini("[s]\nMixedCase = 1\n").expect("valid INI");
        let keys: Vec<&str> = doc.section("s").expect("section").iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["mixedcase"]);
    }

    #[test]
    fn test_parse_continuation_lines_join_with_newline() {
        // Arrange
        let text = "[default]\ntags = [\"a\",\n    \"b\"]\nnext = 1\n";

        // Act
        let doc = parse_ini(text).expect("valid INI");

        // Assert
        assert_eq!(doc.get("default", "tags"), Ok("[\"a\",\n\"b\"]"));
        assert_eq!(doc.get("default", "next"), Ok("1"));
    }

    #[test]
    fn test_parse_inline_semicolon_comment() {
        let doc = parse_ini("[s]\na = 1 ; one\nb = x;y\nc = x;y ;z\n").expect("valid INI");
        assert_eq!(doc.get("s", "a"), Ok("1"));
        // Only a `;` preceded by whitespace starts a comment.
        assert_eq!(doc.get("s", "b"), Ok("x;y"));
        // ...and only the first `;` is considered.
        assert_eq!(doc.get("s", "c"), Ok("x;y ;z"));
    }

    #[test]
    fn test_parse_hash_inside_value_is_kept() {
        let doc = parse_ini("[s]\ncolor = #ff0000\n").expect("valid INI");
        assert_eq!(doc.get("s", "color"), Ok("#ff0000"));
    }

    #[test]
    fn test_parse_empty_and_double_quote_values() {
        let doc = parse_ini("[s]\nempty =\nquoted = \"\"\n").expect("valid INI");
        assert_eq!(doc.get("s", "empty"), Ok(""));
        assert_eq!(doc.get("s", "quoted"), Ok(""));
    }

    #[test]
    fn test_parse_duplicate_sections_merge_and_last_option_wins() {
        let text = "[s]\na = 1\nb = 2\n[t]\nx = 0\n[s]\na = 3\n";
        let doc = parse_ini(text).expect("valid INI");
        assert_eq!(doc.get("s", "a"), Ok("3"));
        assert_eq!(doc.get("s", "b"), Ok("2"));
        assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["s", "t"]);
    }

    #[test]
    fn test_parse_section_name_is_verbatim() {
        let doc = parse_ini("[ spaced ] trailing text\nk = v\n").expect("valid INI");
        assert!(doc.has_section(" spaced "));
    }

    #[test]
    fn test_parse_strips_byte_order_mark() {
        let doc = parse_ini("\u{feff}[s]\nk = v\n").expect("valid INI");
        assert!(doc.has_section("s"));
    }

    #[test]
    fn test_parse_accepts_crlf_line_endings() {
        let doc = parse_ini("[s]\r\nk = v\r\n").expect("valid INI");
        assert_eq!(doc.get("s", "k"), Ok("v"));
    }

    #[test]
    fn test_parse_option_before_header_fails() {
        let err = parse_ini("k = v\n[s]\n").unwrap_err();
        assert_eq!(
            err,
            IniError::MissingSectionHeader {
                line: 1,
                content: "k = v".into()
            }
        );
    }

    #[test]
    fn test_parse_collects_all_malformed_lines() {
        // Arrange
        let text = "[s]\nno separator here\nk = v\n[]\n= value\n";

        // Act
        let err = parse_ini(text).unwrap_err();

        // Assert
        assert_eq!(
            err,
            IniError::Malformed {
                lines: vec![
                    (2, "no separator here".into()),
                    (4, "[]".into()),
                    (5, "= value".into()),
                ]
            }
        );
    }

    #[test]
    fn test_parse_indented_line_without_option_is_malformed() {
        let err = parse_ini("[s]\n   dangling\n").unwrap_err();
        assert!(matches!(err, IniError::Malformed { .. }));
    }

    #[test]
    fn test_strip_inline_comment_at_value_start_checks_last_char() {
        assert_eq!(strip_inline_comment("; x"), "; x");
        assert_eq!(strip_inline_comment("; x "), "");
    }
}
