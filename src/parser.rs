use crate::ast::{MaskNode, MaskNodeList, PlaceholderToken};

/// A single-pass scanner for password masks.
///
/// A mask is literal text interleaved with `{name}` / `{name#chain}`
/// placeholders. A placeholder body may not contain `{` or `}`; anything
/// that does not form a complete, non-empty `{...}` token is kept as text.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser { input, position: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Consumes the current character and advances the position.
    /// Returns the character that was consumed, or None if at the end of input.
    fn consume(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    fn parse_text(&mut self) -> MaskNode {
        let start = self.position;
        while let Some(c) = self.peek() {
            if c == '{' {
                break;
            }
            self.consume();
        }
        MaskNode::Text(self.input[start..self.position].to_string())
    }

    /// Parses a placeholder starting at the current `{`.
    ///
    /// Returns `None` and leaves the position untouched when the brace does
    /// not open a complete token: the input ends first, another `{` comes
    /// before the closing `}`, or the body is empty.
    fn parse_placeholder(&mut self) -> Option<MaskNode> {
        let start_pos = self.position;
        if self.consume() != Some('{') {
            self.position = start_pos;
            return None;
        }

        let body_start = self.position;
        loop {
            match self.peek() {
                Some('}') => break,
                Some('{') | None => {
                    self.position = start_pos;
                    return None;
                }
                Some(_) => {
                    self.consume();
                }
            }
        }
        let body = &self.input[body_start..self.position];
        if body.is_empty() {
            self.position = start_pos;
            return None;
        }
        self.consume(); // Consume '}'

        Some(MaskNode::Placeholder(PlaceholderToken::from_body(body)))
    }

    pub fn parse(&mut self) -> MaskNodeList {
        let mut nodes = MaskNodeList::new();
        while self.position < self.input.len() {
            match self.peek() {
                Some('{') => {
                    if let Some(node) = self.parse_placeholder() {
                        nodes.push(node);
                    } else {
                        // Not a token: keep the brace as text and move on
                        self.consume();
                        nodes.push(MaskNode::Text("{".to_string()));
                    }
                }
                _ => nodes.push(self.parse_text()),
            }
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> MaskNode {
        MaskNode::Text(s.to_string())
    }

    fn placeholder(name: &str, chain: Option<&str>) -> MaskNode {
        MaskNode::Placeholder(PlaceholderToken::new(name, chain))
    }

    #[test]
    fn test_parser() {
        let input = "Foobar{givenName#Reverse}{MonthGerman}{YYYY}!";
        let mut parser = Parser::new(input);
        let nodes = parser.parse();
        assert_eq!(
            nodes,
            MaskNodeList(vec![
                text("Foobar"),
                placeholder("givenName", Some("Reverse")),
                placeholder("MonthGerman", None),
                placeholder("YYYY", None),
                text("!"),
            ])
        );
    }

    #[test]
    fn test_parse_text() {
        let mut parser = Parser::new("Hello, World!");
        assert_eq!(parser.parse_text(), text("Hello, World!"));
    }

    #[test]
    fn test_parse_placeholder() {
        let mut parser = Parser::new("{sn#Pattern(a>b;c\\>d)#Upper}");
        assert_eq!(
            parser.parse_placeholder(),
            Some(placeholder("sn", Some("Pattern(a>b;c\\>d)#Upper")))
        );
    }

    #[test]
    fn test_unterminated_placeholder_is_text() {
        let mut parser = Parser::new("{sn");
        assert_eq!(parser.parse(), MaskNodeList(vec![text("{sn")]));
    }

    #[test]
    fn test_empty_braces_are_text() {
        let mut parser = Parser::new("a{}b");
        assert_eq!(parser.parse(), MaskNodeList(vec![text("a{}b")]));
    }

    #[test]
    fn test_nested_brace_restarts_token() {
        let mut parser = Parser::new("{a{sn}}");
        assert_eq!(
            parser.parse(),
            MaskNodeList(vec![text("{a"), placeholder("sn", None), text("}")])
        );
    }

    #[test]
    fn test_multibyte_text() {
        let mut parser = Parser::new("Grüße{sn}€");
        assert_eq!(
            parser.parse(),
            MaskNodeList(vec![text("Grüße"), placeholder("sn", None), text("€")])
        );
    }

    #[test]
    fn test_stray_closing_brace() {
        let mut parser = Parser::new("a}b");
        assert_eq!(parser.parse(), MaskNodeList(vec![text("a}b")]));
    }
}
