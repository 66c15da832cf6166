//! Password mask expansion for directory-service user records.
//!
//! A mask is literal text with `{name}` / `{name#Modifier#Modifier}`
//! placeholders. Each placeholder resolves against a record's attributes, or
//! against its password-change date for the reserved date names, and the
//! result is run through the modifier chain:
//!
//! ```
//! use spraymask::{DirectoryEntry, expand};
//!
//! let mut entry = DirectoryEntry::new("CN=John Smith,DC=corp,DC=local");
//! entry
//!     .with_attribute("givenName", "John")
//!     .with_attribute("pwdLastSet", "133549776000000000");
//!
//! assert_eq!(
//!     expand("Foobar{givenName#Reverse}{MonthGerman}{YYYY}!", &entry),
//!     "FoobarnhoJMärz2024!"
//! );
//! ```

pub mod ast;
pub mod batch;
pub mod data;
pub mod date;
pub mod error;
pub mod expander;
pub mod generate;
pub mod loader;
pub mod modifier;
pub mod output;
pub mod parser;
pub mod record;
pub mod source;


pub use ast::{MaskNode, MaskNodeList, PlaceholderToken};
pub use batch::{SprayCombo, expand_entries, expand_entry};
pub use date::{DateFormat, Season, SeasonLocale, format_timestamp, parse_timestamp};
pub use error::{BatchError, MaskError, MaskResult, SourceError};
pub use expander::{ErrorPolicy, ExpandOptions, Expander, expand, try_expand};
pub use generate::{MaskGenerator, SlotKind};
pub use loader::{DirectoryCache, load_cache_from_file, save_cache_to_file};
pub use modifier::{Modifier, ModifierChain, apply_modifiers, apply_pattern};
pub use output::{OutputFormat, SprayWriter};
pub use parser::Parser;
pub use record::{AttributeSource, DirectoryEntry};
pub use source::{CacheFileSource, RecordSet, RecordSource, StaticSource};
