//! Leet-speak substitution with case preservation.

use crate::data;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeetTable {
    /// e:3, o:0, i:1, a:4
    Basic,
    /// e:3, o:0, i:1, a:@, t:7
    BasicPlus,
}

impl LeetTable {
    fn substitutions(self) -> &'static [(char, &'static str)] {
        match self {
            LeetTable::Basic => &data::LEET_BASIC,
            LeetTable::BasicPlus => &data::LEET_BASIC_PLUS,
        }
    }

    /// Find the substitution for `c`, matching on its upper-case form.
    pub fn lookup(self, c: char) -> Option<&'static str> {
        let mut upper = c.to_uppercase();
        let key = match (upper.next(), upper.next()) {
            (Some(u), None) => u,
            _ => c,
        };
        self.substitutions()
            .iter()
            .find(|(from, _)| *from == key)
            .map(|(_, to)| *to)
    }
}

/// Replace every character the table knows, keeping the case of the source
/// character on the substitution text.
pub fn leet_speak(input: &str, table: LeetTable) -> String {
    let mut result = String::with_capacity(input.len());
    for c in input.chars() {
        match table.lookup(c) {
            Some(replacement) if c.is_uppercase() => result.push_str(&replacement.to_uppercase()),
            Some(replacement) => result.push_str(&replacement.to_lowercase()),
            None => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(leet_speak("Elite", LeetTable::Basic), "3l1t3");
        assert_eq!(leet_speak("Passwort", LeetTable::Basic), "P4ssw0rt");
    }

    #[test]
    fn test_basic_plus() {
        assert_eq!(leet_speak("Elite", LeetTable::BasicPlus), "3l173");
        assert_eq!(leet_speak("TAT", LeetTable::BasicPlus), "7@7");
    }

    #[test]
    fn test_untouched_characters() {
        assert_eq!(leet_speak("xyz 123 ß!", LeetTable::BasicPlus), "xyz 123 ß!");
        assert_eq!(leet_speak("", LeetTable::Basic), "");
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(LeetTable::Basic.lookup('a'), Some("4"));
        assert_eq!(LeetTable::Basic.lookup('A'), Some("4"));
        assert_eq!(LeetTable::Basic.lookup('t'), None);
        assert_eq!(LeetTable::BasicPlus.lookup('t'), Some("7"));
    }
}
