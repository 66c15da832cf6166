//! The `Pattern(...)` find/replace sub-language.
//!
//! A pattern is a `;`-separated list of `from>to` rules:
//!
//! ```text
//! foo>baz;->_
//! ```
//!
//! Rules are applied in order, each as a literal replace-all over the
//! current string, so a later rule can match text produced by an earlier
//! one. Inside a pattern `\;`, `\(`, `\>`, `\)` and `\\` stand for the bare
//! character. Any other backslash is kept as-is.

use crate::error::{MaskError, MaskResult};

const ESCAPABLE: [char; 5] = [';', '(', '>', ')', '\\'];

/// A single literal replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    pub from: String,
    pub to: String,
}

impl PatternRule {
    pub fn new(from: &str, to: &str) -> Self {
        PatternRule {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn apply(&self, input: &str) -> String {
        input.replace(&self.from, &self.to)
    }
}

/// Parse `from>to;from2>to2` into its rules.
///
/// # Errors
/// - `InvalidPatternSyntax` if a segment has no unescaped `>`
/// - `EmptyFromPattern` if a rule's `from` is empty after unescaping and trimming
pub fn parse_pattern(pattern: &str) -> MaskResult<Vec<PatternRule>> {
    let mut segments = split_unescaped(pattern, ';');
    // A trailing `;` does not open another rule
    if segments.last().is_some_and(|last| last.is_empty()) {
        segments.pop();
    }
    segments.into_iter().map(parse_rule).collect()
}

fn parse_rule(segment: &str) -> MaskResult<PatternRule> {
    let split = find_unescaped(segment, '>')
        .ok_or_else(|| MaskError::InvalidPatternSyntax(segment.to_string()))?;
    let (raw_from, raw_to) = (&segment[..split], &segment[split + 1..]);

    let from = unescape(raw_from).trim().to_string();
    if from.is_empty() {
        return Err(MaskError::EmptyFromPattern(segment.to_string()));
    }

    // A replacement made only of whitespace is meant literally
    let to = unescape(raw_to);
    let to = if to.trim().is_empty() {
        to
    } else {
        to.trim().to_string()
    };

    Ok(PatternRule { from, to })
}

/// Apply rules in order over the whole string.
pub fn apply_rules(input: &str, rules: &[PatternRule]) -> String {
    rules
        .iter()
        .fold(input.to_string(), |current, rule| rule.apply(&current))
}

/// Parse `pattern` and apply it to `input`.
pub fn apply_pattern(input: &str, pattern: &str) -> MaskResult<String> {
    let rules = parse_pattern(pattern)?;
    Ok(apply_rules(input, &rules))
}

/// Split on every `delimiter` not preceded by an escaping backslash. Escape
/// sequences are left intact in the pieces.
fn split_unescaped(input: &str, delimiter: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (index, c) in input.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == delimiter {
            pieces.push(&input[start..index]);
            start = index + c.len_utf8();
        }
    }
    pieces.push(&input[start..]);
    pieces
}

/// Byte offset of the first `target` not preceded by an escaping backslash.
fn find_unescaped(input: &str, target: char) -> Option<usize> {
    let mut escaped = false;
    for (index, c) in input.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == target {
            return Some(index);
        }
    }
    None
}

fn unescape(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if ESCAPABLE.contains(&next) {
                    result.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pattern() {
        let rules = parse_pattern("foo>baz;a>b").unwrap();
        assert_eq!(
            rules,
            vec![PatternRule::new("foo", "baz"), PatternRule::new("a", "b")]
        );
    }

    #[test]
    fn test_apply_pattern() {
        assert_eq!(apply_pattern("foo-bar", "foo>baz;-> ").unwrap(), "baz bar");
        assert_eq!(apply_pattern("Müller", "ü>ue").unwrap(), "Mueller");
    }

    #[test]
    fn test_deletion() {
        assert_eq!(apply_pattern("a-b-c", "->").unwrap(), "abc");
    }

    #[test]
    fn test_escaped_semicolon_stays_in_rule() {
        let rules = parse_pattern(r"a\;b>x").unwrap();
        assert_eq!(rules, vec![PatternRule::new("a;b", "x")]);
        assert_eq!(apply_pattern("a;b", r"a\;b>x").unwrap(), "x");
    }

    #[test]
    fn test_escaped_delimiters() {
        let rules = parse_pattern(r"\(x\)>\>;\\>/").unwrap();
        assert_eq!(
            rules,
            vec![PatternRule::new("(x)", ">"), PatternRule::new(r"\", "/")]
        );
        assert_eq!(apply_pattern("c>d", r"c\>d>ok").unwrap(), "ok");
    }

    #[test]
    fn test_only_first_arrow_splits() {
        let rules = parse_pattern("a>b>c").unwrap();
        assert_eq!(rules, vec![PatternRule::new("a", "b>c")]);
    }

    #[test]
    fn test_rules_chain_over_each_other() {
        // The second rule sees the output of the first
        assert_eq!(apply_pattern("ab", "a>b;b>c").unwrap(), "cc");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let rules = parse_pattern(" foo > bar ; x>  y").unwrap();
        assert_eq!(
            rules,
            vec![PatternRule::new("foo", "bar"), PatternRule::new("x", "y")]
        );
    }

    #[test]
    fn test_trailing_separator_and_empty_pattern() {
        assert_eq!(parse_pattern("a>b;").unwrap().len(), 1);
        assert!(parse_pattern("").unwrap().is_empty());
        assert_eq!(apply_pattern("same", "").unwrap(), "same");
    }

    #[test]
    fn test_missing_arrow() {
        assert_eq!(
            parse_pattern("a>b;nope"),
            Err(MaskError::InvalidPatternSyntax("nope".to_string()))
        );
        assert_eq!(
            parse_pattern(r"a\>b"),
            Err(MaskError::InvalidPatternSyntax(r"a\>b".to_string()))
        );
        assert_eq!(
            parse_pattern("a>b;;c>d"),
            Err(MaskError::InvalidPatternSyntax(String::new()))
        );
    }

    #[test]
    fn test_empty_from() {
        assert_eq!(
            parse_pattern(">x"),
            Err(MaskError::EmptyFromPattern(">x".to_string()))
        );
        assert_eq!(
            parse_pattern("  >x"),
            Err(MaskError::EmptyFromPattern("  >x".to_string()))
        );
    }
}
