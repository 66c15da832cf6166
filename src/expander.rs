//! Placeholder resolution: turning a parsed mask into a string per record.
//!
//! An [`Expander`] scans its mask once and parses every modifier chain up
//! front, so it can be shared (it is `Send + Sync`) and reused for any
//! number of records.
//!
//! # Placeholder resolution
//!
//! - Reserved date names (`yy`, `yyyy`, `m`, `mm`, `MonthGerman`,
//!   `MonthEnglish`, `SeasonGerman`, `SeasonAmerican`, `SeasonBritish`,
//!   matched ignoring case) render the record's password-change timestamp.
//!   Their modifier chain is ignored unless [`ExpandOptions::date_modifiers`]
//!   is set.
//! - Every other name is looked up in the record and run through its chain.
//!
//! # Errors
//!
//! [`Expander::try_expand`] stops at the first placeholder that fails.
//! [`Expander::expand`] keeps going: an attribute placeholder whose chain
//! fails is replaced by its unmodified value, and a date placeholder that
//! cannot be rendered becomes empty.

use tracing::{debug, warn};

use crate::ast::{MaskNode, PlaceholderToken};
use crate::date::{self, DateFormat};
use crate::error::{MaskError, MaskResult};
use crate::modifier::ModifierChain;
use crate::parser::Parser;
use crate::record::AttributeSource;

/// What to do when a placeholder cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Substitute the unmodified value and continue
    #[default]
    Fallback,
    /// Fail the whole expansion
    Abort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Apply modifier chains to reserved date placeholders too
    pub date_modifiers: bool,
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Attribute {
        token: PlaceholderToken,
        chain: MaskResult<ModifierChain>,
    },
    Date {
        token: PlaceholderToken,
        format: DateFormat,
        chain: MaskResult<ModifierChain>,
    },
}

/// A compiled mask.
#[derive(Debug, Clone)]
pub struct Expander {
    mask: String,
    segments: Vec<Segment>,
    options: ExpandOptions,
}

impl Expander {
    pub fn new(mask: &str) -> Self {
        Self::with_options(mask, ExpandOptions::default())
    }

    pub fn with_options(mask: &str, options: ExpandOptions) -> Self {
        let nodes = Parser::new(mask).parse();
        let segments: Vec<Segment> = nodes.into_iter().map(compile_node).collect();
        debug!(
            mask,
            placeholders = segments
                .iter()
                .filter(|segment| !matches!(segment, Segment::Literal(_)))
                .count(),
            "compiled mask"
        );
        Expander {
            mask: mask.to_string(),
            segments,
            options,
        }
    }

    pub fn mask(&self) -> &str {
        &self.mask
    }

    /// Expand the mask for one record, failing on the first placeholder error.
    pub fn try_expand(&self, source: &dyn AttributeSource) -> MaskResult<String> {
        let mut result = String::new();
        for segment in &self.segments {
            result.push_str(&self.resolve(segment, source)?);
        }
        Ok(result)
    }

    /// Expand the mask for one record, substituting unmodified values for
    /// placeholders that fail.
    pub fn expand(&self, source: &dyn AttributeSource) -> String {
        let mut result = String::new();
        for segment in &self.segments {
            match self.resolve(segment, source) {
                Ok(value) => result.push_str(&value),
                Err(err) => {
                    let fallback = self.fallback(segment, source);
                    warn!(mask = %self.mask, error = %err, "placeholder failed, using unmodified value");
                    result.push_str(&fallback);
                }
            }
        }
        result
    }

    /// Expand with the given policy.
    pub fn expand_with(
        &self,
        source: &dyn AttributeSource,
        policy: ErrorPolicy,
    ) -> MaskResult<String> {
        match policy {
            ErrorPolicy::Fallback => Ok(self.expand(source)),
            ErrorPolicy::Abort => self.try_expand(source),
        }
    }

    fn resolve(&self, segment: &Segment, source: &dyn AttributeSource) -> MaskResult<String> {
        match segment {
            Segment::Literal(text) => Ok(text.clone()),
            Segment::Attribute { token, chain } => {
                let value = source.attribute_value(&token.name);
                match chain {
                    Ok(chain) => Ok(chain.apply(&value)),
                    Err(err) => Err(err.clone()),
                }
            }
            Segment::Date {
                format,
                chain,
                token: _,
            } => {
                let formatted = format.format(date::parse_timestamp(&source.raw_timestamp())?);
                if !self.options.date_modifiers {
                    return Ok(formatted);
                }
                match chain {
                    Ok(chain) => Ok(chain.apply(&formatted)),
                    Err(err) => Err(err.clone()),
                }
            }
        }
    }

    fn fallback(&self, segment: &Segment, source: &dyn AttributeSource) -> String {
        match segment {
            Segment::Literal(text) => text.clone(),
            Segment::Attribute { token, .. } => source.attribute_value(&token.name),
            Segment::Date { format, .. } => date::parse_timestamp(&source.raw_timestamp())
                .map(|date| format.format(date))
                .unwrap_or_default(),
        }
    }

    /// Placeholders whose modifier chain does not parse, with the error.
    pub fn chain_errors(&self) -> Vec<(&PlaceholderToken, &MaskError)> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Attribute {
                    token,
                    chain: Err(err),
                } => Some((token, err)),
                Segment::Date {
                    token,
                    chain: Err(err),
                    ..
                } if self.options.date_modifiers => Some((token, err)),
                _ => None,
            })
            .collect()
    }
}

fn compile_node(node: MaskNode) -> Segment {
    match node {
        MaskNode::Text(text) => Segment::Literal(text),
        MaskNode::Placeholder(token) => {
            let chain = ModifierChain::parse(token.chain.as_deref().unwrap_or_default());
            match DateFormat::from_name(&token.name) {
                Some(format) => Segment::Date {
                    token,
                    format,
                    chain,
                },
                None => Segment::Attribute { token, chain },
            }
        }
    }
}

/// Expand `mask` for `source`, falling back to unmodified values on errors.
pub fn expand(mask: &str, source: &dyn AttributeSource) -> String {
    Expander::new(mask).expand(source)
}

/// Expand `mask` for `source`, failing on the first placeholder error.
pub fn try_expand(mask: &str, source: &dyn AttributeSource) -> MaskResult<String> {
    Expander::new(mask).try_expand(source)
}
