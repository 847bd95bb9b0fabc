//
// directive.rs
//
// Parser-directive scanning for the leading region of a Dockerfile.
//
// Directive-scanning mode starts open, stays open across blank lines and
// recognized `escape` directives, and closes permanently at the first line
// that is neither. Only the `escape` key is modeled: a recognized escape
// directive is hoverable regardless of its value, but only a value of
// exactly `\` or a backtick changes the active escape character, and only
// the earliest valid one does.
//

use std::sync::OnceLock;

use regex::Regex;

use crate::scanner::PhysicalLine;

/// The default continuation escape character.
pub const DEFAULT_ESCAPE: char = '\\';

/// A recognized parser directive in the document's leading region.
/// `key_start..key_end` are char columns of the key token on `line`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub key: String,
    pub value: String,
    pub line: usize,
    pub key_start: usize,
    pub key_end: usize,
}

impl Directive {
    /// Lookup key for documentation rendering.
    pub fn canonical_key(&self) -> String {
        self.key.to_ascii_lowercase()
    }
}

/// Result of scanning the leading region: recognized directives plus the
/// escape character in force for the rest of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveScan {
    pub directives: Vec<Directive>,
    pub escape: char,
}

/// `#key=value` with no whitespace anywhere between `#`, the key, and `=`.
/// A line like `#escape ` or `#escape\t` (no `=` directly after the key) is
/// not a directive at all.
fn directive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#([A-Za-z][A-Za-z0-9]*)=(.*)$").unwrap())
}

/// Scan the leading physical lines for parser directives.
///
/// Directives occupy single physical lines; continuation joining never
/// applies inside the leading region because directive lines are comments to
/// the rest of the parser.
pub fn scan_directives(source: &str, lines: &[PhysicalLine]) -> DirectiveScan {
    let pattern = directive_pattern();
    let mut directives = Vec::new();
    let mut escape = DEFAULT_ESCAPE;
    let mut escape_set = false;

    for line in lines {
        let text = line.text(source);

        // Blank lines keep scanning mode open.
        if text.trim().is_empty() {
            continue;
        }

        let recognized = pattern.captures(text).and_then(|caps| {
            let key = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str();
            if key.eq_ignore_ascii_case("escape") {
                Some((key.to_string(), value.to_string()))
            } else {
                None
            }
        });

        match recognized {
            Some((key, value)) => {
                if !escape_set {
                    match value.as_str() {
                        "\\" => {
                            escape = '\\';
                            escape_set = true;
                        }
                        "`" => {
                            escape = '`';
                            escape_set = true;
                        }
                        other => {
                            log::trace!("escape directive with inert value {:?}", other);
                        }
                    }
                }
                let key_end = 1 + key.chars().count();
                directives.push(Directive {
                    key,
                    value,
                    line: line.index,
                    key_start: 1,
                    key_end,
                });
            }
            // Any non-blank line that is not a recognized escape directive
            // closes scanning mode permanently.
            None => break,
        }
    }

    DirectiveScan { directives, escape }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner;

    fn scan_str(source: &str) -> DirectiveScan {
        let lines = scanner::scan(source);
        scan_directives(source, &lines)
    }

    #[test]
    fn test_backtick_escape_directive() {
        let scan = scan_str("#escape=`\nFROM node");
        assert_eq!(scan.escape, '`');
        assert_eq!(scan.directives.len(), 1);
        assert_eq!(scan.directives[0].key, "escape");
        assert_eq!(scan.directives[0].value, "`");
        assert_eq!(scan.directives[0].key_start, 1);
        assert_eq!(scan.directives[0].key_end, 7);
    }

    #[test]
    fn test_backslash_escape_directive() {
        let scan = scan_str("#escape=\\");
        assert_eq!(scan.escape, '\\');
        assert_eq!(scan.directives.len(), 1);
    }

    #[test]
    fn test_unknown_key_not_recognized() {
        let scan = scan_str("#eskape=`");
        assert_eq!(scan.escape, '\\');
        assert!(scan.directives.is_empty());
    }

    #[test]
    fn test_invalid_value_recognized_but_inert() {
        for src in ["#escape=", "#escape=ab"] {
            let scan = scan_str(src);
            assert_eq!(scan.escape, '\\', "source {:?}", src);
            assert_eq!(scan.directives.len(), 1, "source {:?}", src);
        }
    }

    #[test]
    fn test_missing_equals_not_recognized() {
        for src in ["#escape ", "#escape\t", "#escape\n", "#escape\r\n"] {
            let scan = scan_str(src);
            assert!(scan.directives.is_empty(), "source {:?}", src);
        }
    }

    #[test]
    fn test_whitespace_after_hash_not_recognized() {
        let scan = scan_str("# escape=`");
        assert!(scan.directives.is_empty());
        assert_eq!(scan.escape, '\\');
    }

    #[test]
    fn test_blank_lines_keep_mode_open() {
        for src in ["\n#escape=`", "\r#escape=`", "\r\n#escape=`", "  \n#escape=`"] {
            let scan = scan_str(src);
            assert_eq!(scan.escape, '`', "source {:?}", src);
            assert_eq!(scan.directives[0].line, 1, "source {:?}", src);
        }
    }

    #[test]
    fn test_instruction_closes_mode() {
        let scan = scan_str("FROM node\n#escape=`");
        assert_eq!(scan.escape, '\\');
        assert!(scan.directives.is_empty());
    }

    #[test]
    fn test_comment_closes_mode() {
        let scan = scan_str("# a comment\n#escape=`");
        assert_eq!(scan.escape, '\\');
        assert!(scan.directives.is_empty());
    }

    #[test]
    fn test_earliest_valid_escape_wins() {
        let scan = scan_str("#escape=`\n#escape=\\");
        assert_eq!(scan.escape, '`');
        assert_eq!(scan.directives.len(), 2);
    }

    #[test]
    fn test_invalid_value_does_not_consume_the_change() {
        // The first *valid* escape directive changes the character, even if
        // an inert-valued one precedes it.
        let scan = scan_str("#escape=ab\n#escape=`");
        assert_eq!(scan.escape, '`');
        assert_eq!(scan.directives.len(), 2);
    }

    #[test]
    fn test_key_case_insensitive() {
        let scan = scan_str("#Escape=`");
        assert_eq!(scan.escape, '`');
        assert_eq!(scan.directives[0].canonical_key(), "escape");
    }
}
