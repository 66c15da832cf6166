//! Generating masks from slot templates.
//!
//! A template is literal text with `[WORD]`, `[NUMBER]` and `[SPECIAL]`
//! slots:
//!
//! ```
//! use spraymask::MaskGenerator;
//!
//! let generator = MaskGenerator::new(&[]);
//! let masks: Vec<String> = generator.combinations("[WORD][NUMBER]!").take(3).collect();
//! assert_eq!(masks, vec!["{MonthGerman}{YY}!", "{MonthGerman}{YYYY}!", "{MonthGerman}1!"]);
//! ```
//!
//! Within one template a slot kind never uses the same value twice, so
//! `[NUMBER][NUMBER]` yields `12` and `21` but never `11`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::data::{NOUN_TOKENS, NUMBER_TOKENS, SPECIAL_TOKENS};
use crate::error::SourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Word,
    Number,
    Special,
}

impl SlotKind {
    const ALL: [SlotKind; 3] = [SlotKind::Word, SlotKind::Number, SlotKind::Special];

    /// The marker written in a template, e.g. `[WORD]`.
    pub fn marker(self) -> &'static str {
        match self {
            SlotKind::Word => "[WORD]",
            SlotKind::Number => "[NUMBER]",
            SlotKind::Special => "[SPECIAL]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateToken {
    Text(String),
    Slot(SlotKind),
}

/// Split a template into literal text and slots.
pub fn parse_template(template: &str) -> Vec<TemplateToken> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        let slot = SlotKind::ALL
            .into_iter()
            .find(|kind| rest.starts_with(kind.marker()));
        match slot {
            Some(kind) => {
                if !text.is_empty() {
                    tokens.push(TemplateToken::Text(std::mem::take(&mut text)));
                }
                tokens.push(TemplateToken::Slot(kind));
                rest = &rest[kind.marker().len()..];
            }
            None => {
                text.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    if !text.is_empty() {
        tokens.push(TemplateToken::Text(text));
    }
    tokens
}

/// Nouns followed by the built-in word tokens, first occurrence kept.
pub fn build_word_list(nouns: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    nouns
        .iter()
        .map(String::as_str)
        .chain(NOUN_TOKENS)
        .filter(|word| seen.insert(*word))
        .map(str::to_string)
        .collect()
}

/// Non-blank lines of a text file, trimmed.
pub fn read_lines(path: &Path) -> Result<Vec<String>, SourceError> {
    let content = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Holds the slot values and expands templates into masks.
#[derive(Debug, Clone)]
pub struct MaskGenerator {
    words: Vec<String>,
}

impl MaskGenerator {
    pub fn new(nouns: &[String]) -> Self {
        let words = build_word_list(nouns);
        debug!(words = words.len(), "built word list");
        MaskGenerator { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    fn values(&self, kind: SlotKind) -> Vec<String> {
        match kind {
            SlotKind::Word => self.words.clone(),
            SlotKind::Number => NUMBER_TOKENS.iter().map(|v| v.to_string()).collect(),
            SlotKind::Special => SPECIAL_TOKENS.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Every mask one template produces.
    pub fn combinations(&self, template: &str) -> Combinations {
        let parts = parse_template(template)
            .into_iter()
            .map(|token| match token {
                TemplateToken::Text(text) => Part::Fixed(text),
                TemplateToken::Slot(kind) => Part::Slot {
                    kind,
                    values: self.values(kind),
                },
            })
            .collect();
        Combinations::new(parts)
    }

    /// Masks for all templates in order, at most `limit` of them.
    pub fn generate<'a>(
        &'a self,
        templates: &'a [String],
        limit: Option<usize>,
    ) -> impl Iterator<Item = String> + 'a {
        templates
            .iter()
            .flat_map(|template| self.combinations(template))
            .take(limit.unwrap_or(usize::MAX))
    }
}

#[derive(Debug, Clone)]
enum Part {
    Fixed(String),
    Slot { kind: SlotKind, values: Vec<String> },
}

/// Cartesian walk over a template's slot values; the last slot varies
/// fastest.
#[derive(Debug, Clone)]
pub struct Combinations {
    parts: Vec<Part>,
    // One index per slot, in template order
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    fn new(parts: Vec<Part>) -> Self {
        let mut slots = 0;
        let mut empty_slot = false;
        for part in &parts {
            if let Part::Slot { values, .. } = part {
                slots += 1;
                empty_slot |= values.is_empty();
            }
        }
        Combinations {
            parts,
            indices: vec![0; slots],
            done: empty_slot,
        }
    }

    /// The mask at the current indices, or `None` when a slot kind repeats
    /// a value.
    fn current(&self) -> Option<String> {
        let mut seen = HashSet::new();
        let mut mask = String::new();
        let mut slot = 0;
        for part in &self.parts {
            match part {
                Part::Fixed(text) => mask.push_str(text),
                Part::Slot { kind, values } => {
                    let value = &values[self.indices[slot]];
                    if !seen.insert((*kind, value.as_str())) {
                        return None;
                    }
                    mask.push_str(value);
                    slot += 1;
                }
            }
        }
        Some(mask)
    }

    fn advance(&mut self) {
        let lengths = self.parts.iter().filter_map(|part| match part {
            Part::Slot { values, .. } => Some(values.len()),
            Part::Fixed(_) => None,
        });
        let lengths: Vec<usize> = lengths.collect();
        for slot in (0..self.indices.len()).rev() {
            self.indices[slot] += 1;
            if self.indices[slot] < lengths[slot] {
                return;
            }
            self.indices[slot] = 0;
        }
        self.done = true;
    }
}

impl Iterator for Combinations {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while !self.done {
            let mask = self.current();
            self.advance();
            if mask.is_some() {
                return mask;
            }
        }
        None
    }
}
