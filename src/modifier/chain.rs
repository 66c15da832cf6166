//! Splitting a raw modifier chain (`Reverse#Pattern(a>b)#Upper`) into its
//! individual invocations.

/// Split `chain` on every `#` that is unescaped and outside parentheses.
///
/// `\#` becomes a literal `#` in the current invocation. Every other escape
/// keeps its backslash so that the `Pattern(...)` parser can interpret it,
/// and escaped parentheses do not count towards the nesting depth.
/// Empty invocations (from `##` or a leading/trailing `#`) are dropped.
pub fn split_modifiers(chain: &str) -> Vec<String> {
    let mut modifiers = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    let mut escaped = false;

    for c in chain.chars() {
        if escaped {
            if c != '#' {
                current.push('\\');
            }
            current.push(c);
            escaped = false;
            continue;
        }

        match c {
            '\\' => escaped = true,
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth -= 1;
                current.push(c);
            }
            '#' if depth == 0 => {
                if !current.is_empty() {
                    modifiers.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    // A dangling backslash has nothing to escape
    if escaped {
        current.push('\\');
    }
    if !current.is_empty() {
        modifiers.push(current);
    }
    modifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_chain() {
        assert_eq!(split_modifiers("Reverse#Upper"), vec!["Reverse", "Upper"]);
        assert_eq!(split_modifiers("Lower"), vec!["Lower"]);
        assert!(split_modifiers("").is_empty());
    }

    #[test]
    fn test_empty_invocations_dropped() {
        assert_eq!(
            split_modifiers("#Reverse##Upper#"),
            vec!["Reverse", "Upper"]
        );
    }

    #[test]
    fn test_hash_inside_parentheses() {
        assert_eq!(
            split_modifiers("Pattern(a>#;#>b)#Upper"),
            vec!["Pattern(a>#;#>b)", "Upper"]
        );
    }

    #[test]
    fn test_escaped_hash() {
        assert_eq!(
            split_modifiers(r"Pattern(x>\#)#Lower"),
            vec!["Pattern(x>#)", "Lower"]
        );
        assert_eq!(split_modifiers(r"Up\#per"), vec!["Up#per"]);
    }

    #[test]
    fn test_other_escapes_kept_for_pattern() {
        assert_eq!(
            split_modifiers(r"Pattern(a>b;c\>d)#Reverse"),
            vec![r"Pattern(a>b;c\>d)", "Reverse"]
        );
        assert_eq!(
            split_modifiers(r"Pattern(\)>x)#Upper"),
            vec![r"Pattern(\)>x)", "Upper"]
        );
    }

    #[test]
    fn test_balanced_parentheses_in_argument() {
        assert_eq!(
            split_modifiers("Pattern((a)>b)#Title"),
            vec!["Pattern((a)>b)", "Title"]
        );
    }

    #[test]
    fn test_unbalanced_parenthesis_swallows_rest() {
        assert_eq!(split_modifiers("Pattern(a>b#Upper"), vec!["Pattern(a>b#Upper"]);
    }

    #[test]
    fn test_dangling_backslash() {
        assert_eq!(split_modifiers(r"Upper\"), vec![r"Upper\"]);
    }
}
