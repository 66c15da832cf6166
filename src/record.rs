//! Records that placeholders are resolved against.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::{PWD_LAST_SET, USERNAME_ATTRIBUTE};

/// Read-only access to a record's attributes.
///
/// Lookups return the first value of a multi-valued attribute and an empty
/// string when the attribute is absent. Names are matched exactly.
pub trait AttributeSource {
    fn attribute_value(&self, name: &str) -> String;

    /// The raw password-change timestamp used by the date placeholders.
    fn raw_timestamp(&self) -> String {
        self.attribute_value(PWD_LAST_SET)
    }
}

/// A directory entry: a distinguished name plus multi-valued attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(default)]
    pub dn: String,
    #[serde(default)]
    pub attributes: HashMap<String, Vec<String>>,
}

impl DirectoryEntry {
    pub fn new(dn: &str) -> Self {
        DirectoryEntry {
            dn: dn.to_string(),
            attributes: HashMap::new(),
        }
    }

    /// Add a value to `name`, after any values it already has.
    pub fn with_attribute(&mut self, name: &str, value: &str) -> &mut Self {
        self.attributes
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn attribute_values(&self, name: &str) -> &[String] {
        self.attributes
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn username(&self) -> String {
        self.attribute_value(USERNAME_ATTRIBUTE)
    }
}

impl AttributeSource for DirectoryEntry {
    fn attribute_value(&self, name: &str) -> String {
        self.attribute_values(name)
            .first()
            .cloned()
            .unwrap_or_default()
    }
}

impl AttributeSource for HashMap<String, String> {
    fn attribute_value(&self, name: &str) -> String {
        self.get(name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_wins() {
        let mut entry = DirectoryEntry::new("CN=John Smith,DC=corp,DC=local");
        entry
            .with_attribute("sn", "Smith")
            .with_attribute("mail", "a@corp.local")
            .with_attribute("mail", "b@corp.local");
        assert_eq!(entry.attribute_value("sn"), "Smith");
        assert_eq!(entry.attribute_value("mail"), "a@corp.local");
        assert_eq!(entry.attribute_values("mail").len(), 2);
    }

    #[test]
    fn test_missing_attribute_is_empty() {
        let entry = DirectoryEntry::new("CN=x");
        assert_eq!(entry.attribute_value("givenName"), "");
        assert!(entry.attribute_values("givenName").is_empty());
        assert_eq!(entry.raw_timestamp(), "");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut entry = DirectoryEntry::new("CN=x");
        entry.with_attribute("givenName", "John");
        assert_eq!(entry.attribute_value("givenname"), "");
    }

    #[test]
    fn test_username_and_timestamp() {
        let mut entry = DirectoryEntry::new("CN=x");
        entry
            .with_attribute("sAMAccountName", "jsmith")
            .with_attribute("pwdLastSet", "133549776000000000");
        assert_eq!(entry.username(), "jsmith");
        assert_eq!(entry.raw_timestamp(), "133549776000000000");
    }

    #[test]
    fn test_hash_map_source() {
        let mut source = HashMap::new();
        source.insert("sn".to_string(), "Smith".to_string());
        assert_eq!(source.attribute_value("sn"), "Smith");
        assert_eq!(source.attribute_value("cn"), "");
    }
}
