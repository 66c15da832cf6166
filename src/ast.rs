use std::fmt;

/// A piece of a parsed mask: literal text or a `{...}` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskNode {
    Text(String),
    Placeholder(PlaceholderToken),
}

/// `{name}` or `{name#chain}`.
///
/// `name` is everything before the first unescaped `#` (with `\#` turned
/// into `#`); `chain` is the raw remainder, left for the modifier splitter.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderToken {
    pub name: String,
    pub chain: Option<String>,
}

impl PlaceholderToken {
    pub fn new(name: &str, chain: Option<&str>) -> Self {
        PlaceholderToken {
            name: name.to_string(),
            chain: chain.map(str::to_string),
        }
    }

    /// Split a placeholder body (the text between the braces).
    pub fn from_body(body: &str) -> Self {
        let mut name = String::new();
        let mut chars = body.char_indices();
        while let Some((index, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, '#')) => name.push('#'),
                    Some((_, other)) => {
                        name.push('\\');
                        name.push(other);
                    }
                    None => name.push('\\'),
                },
                '#' => {
                    return PlaceholderToken {
                        name,
                        chain: Some(body[index + 1..].to_string()),
                    };
                }
                _ => name.push(c),
            }
        }
        PlaceholderToken { name, chain: None }
    }
}

impl fmt::Display for PlaceholderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.chain {
            Some(chain) => write!(f, "{{{}#{}}}", self.name.replace('#', "\\#"), chain),
            None => write!(f, "{{{}}}", self.name.replace('#', "\\#")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskNodeList(pub Vec<MaskNode>);

impl MaskNodeList {
    pub fn new() -> Self {
        MaskNodeList(Vec::new())
    }

    /// Append a node, merging adjacent text.
    pub fn push(&mut self, node: MaskNode) {
        if let MaskNode::Text(text) = &node {
            if text.is_empty() {
                return;
            }
            if let Some(MaskNode::Text(last)) = self.0.last_mut() {
                last.push_str(text);
                return;
            }
        }
        self.0.push(node);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MaskNode> {
        self.0.get(index)
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &PlaceholderToken> {
        self.0.iter().filter_map(|node| match node {
            MaskNode::Placeholder(token) => Some(token),
            MaskNode::Text(_) => None,
        })
    }
}

impl IntoIterator for MaskNodeList {
    type Item = MaskNode;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MaskNodeList {
    type Item = &'a MaskNode;
    type IntoIter = std::slice::Iter<'a, MaskNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_without_chain() {
        assert_eq!(
            PlaceholderToken::from_body("givenName"),
            PlaceholderToken::new("givenName", None)
        );
    }

    #[test]
    fn test_from_body_splits_on_first_hash() {
        assert_eq!(
            PlaceholderToken::from_body("sn#Reverse#Upper"),
            PlaceholderToken::new("sn", Some("Reverse#Upper"))
        );
        assert_eq!(
            PlaceholderToken::from_body("sn#"),
            PlaceholderToken::new("sn", Some(""))
        );
    }

    #[test]
    fn test_from_body_escaped_hash_in_name() {
        assert_eq!(
            PlaceholderToken::from_body(r"odd\#name#Lower"),
            PlaceholderToken::new("odd#name", Some("Lower"))
        );
    }

    #[test]
    fn test_display_round_trips_body() {
        let token = PlaceholderToken::from_body("sn#Pattern(a>b)#Upper");
        assert_eq!(token.to_string(), "{sn#Pattern(a>b)#Upper}");
    }

    #[test]
    fn test_push_merges_text() {
        let mut nodes = MaskNodeList::new();
        nodes.push(MaskNode::Text("a".to_string()));
        nodes.push(MaskNode::Text("b".to_string()));
        nodes.push(MaskNode::Text(String::new()));
        nodes.push(MaskNode::Placeholder(PlaceholderToken::new("sn", None)));
        nodes.push(MaskNode::Text("c".to_string()));
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes.get(0), Some(&MaskNode::Text("ab".to_string())));
        assert_eq!(nodes.placeholders().count(), 1);
    }
}
