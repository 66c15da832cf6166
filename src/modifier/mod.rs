//! Text modifiers applied to resolved placeholder values.
//!
//! A placeholder such as `{givenName#Reverse#LeetBasic}` carries a chain of
//! modifiers after the first `#`. The chain is split into invocations
//! ([`chain::split_modifiers`]), each invocation is parsed into a
//! [`Modifier`], and the modifiers are applied left to right, each one
//! consuming the previous output.
//!
//! | Modifier | Effect |
//! |---|---|
//! | `Reverse` | reverse the characters |
//! | `Upper` / `Lower` | change the case of the whole value |
//! | `Title` | lower-case, then upper-case the first letter of every word |
//! | `Capitalize` | upper-case the first character, lower-case the rest |
//! | `AlternateLower` / `AlternateUpper` | alternate case, starting lower/upper |
//! | `LeetBasic` / `LeetBasicPlus` | leet substitutions, see [`leet`] |
//! | `Pattern(from>to;...)` | literal find/replace rules, see [`pattern`] |
//!
//! Modifier names are case-sensitive.

pub mod chain;
pub mod leet;
pub mod pattern;

use std::fmt;
use std::str::FromStr;

pub use chain::split_modifiers;
pub use leet::{LeetTable, leet_speak};
pub use pattern::{PatternRule, apply_pattern, apply_rules, parse_pattern};

use crate::error::{MaskError, MaskResult};

/// A single parsed modifier invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    Reverse,
    Upper,
    Lower,
    Title,
    Capitalize,
    AlternateLower,
    AlternateUpper,
    Leet(LeetTable),
    Pattern(Vec<PatternRule>),
}

impl Modifier {
    /// Parse one invocation string as produced by [`split_modifiers`].
    ///
    /// # Errors
    /// - `UnknownModifier` if the name is not recognised
    /// - any error from [`parse_pattern`] for a malformed `Pattern(...)` argument
    pub fn parse(invocation: &str) -> MaskResult<Self> {
        let modifier = match invocation {
            "Reverse" => Modifier::Reverse,
            "Upper" => Modifier::Upper,
            "Lower" => Modifier::Lower,
            "Title" => Modifier::Title,
            "Capitalize" => Modifier::Capitalize,
            "AlternateLower" => Modifier::AlternateLower,
            "AlternateUpper" => Modifier::AlternateUpper,
            "LeetBasic" => Modifier::Leet(LeetTable::Basic),
            "LeetBasicPlus" => Modifier::Leet(LeetTable::BasicPlus),
            _ => {
                let argument = invocation
                    .strip_prefix("Pattern(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or_else(|| MaskError::UnknownModifier(invocation.to_string()))?;
                Modifier::Pattern(parse_pattern(argument)?)
            }
        };
        Ok(modifier)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Modifier::Reverse => "Reverse",
            Modifier::Upper => "Upper",
            Modifier::Lower => "Lower",
            Modifier::Title => "Title",
            Modifier::Capitalize => "Capitalize",
            Modifier::AlternateLower => "AlternateLower",
            Modifier::AlternateUpper => "AlternateUpper",
            Modifier::Leet(LeetTable::Basic) => "LeetBasic",
            Modifier::Leet(LeetTable::BasicPlus) => "LeetBasicPlus",
            Modifier::Pattern(_) => "Pattern",
        }
    }

    pub fn apply(&self, value: &str) -> String {
        match self {
            Modifier::Reverse => value.chars().rev().collect(),
            Modifier::Upper => value.to_uppercase(),
            Modifier::Lower => value.to_lowercase(),
            Modifier::Title => title_case(value),
            Modifier::Capitalize => capitalize(value),
            Modifier::AlternateLower => alternate_case(value, false),
            Modifier::AlternateUpper => alternate_case(value, true),
            Modifier::Leet(table) => leet_speak(value, *table),
            Modifier::Pattern(rules) => apply_rules(value, rules),
        }
    }
}

impl FromStr for Modifier {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modifier::parse(s)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An ordered list of modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierChain(pub Vec<Modifier>);

impl ModifierChain {
    /// Split and parse a raw chain. The first invalid invocation fails the
    /// whole chain.
    pub fn parse(raw: &str) -> MaskResult<Self> {
        split_modifiers(raw)
            .iter()
            .map(|invocation| Modifier::parse(invocation))
            .collect::<MaskResult<Vec<_>>>()
            .map(ModifierChain)
    }

    pub fn apply(&self, value: &str) -> String {
        self.0
            .iter()
            .fold(value.to_string(), |current, modifier| modifier.apply(&current))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parse `chain` and run `value` through it.
pub fn apply_modifiers(value: &str, chain: &str) -> MaskResult<String> {
    Ok(ModifierChain::parse(chain)?.apply(value))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut word_start = true;
    for c in value.to_lowercase().chars() {
        if word_start && c.is_alphabetic() {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        // Apostrophes do not start a new word: "o'neil" -> "O'neil"
        word_start = !(c.is_alphanumeric() || c == '\'' || c == '’');
    }
    result
}

fn alternate_case(value: &str, upper_first: bool) -> String {
    let mut result = String::with_capacity(value.len());
    for (index, c) in value.chars().enumerate() {
        if (index % 2 == 0) == upper_first {
            result.extend(c.to_uppercase());
        } else {
            result.extend(c.to_lowercase());
        }
    }
    result
}
