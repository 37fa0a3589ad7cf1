//! Selector Parser
//!
//! Parses a token stream into a selector list:
//!
//! ```text
//! list     := complex (',' complex)*
//! complex  := compound (combinator compound)*
//! compound := (tag | '*')? (#id | .class | [attr] | [attr=value] | :pseudo)*
//! ```

use super::lexer::{tokenize, Token};

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

/// Compound selectors joined by combinators
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    /// Left to right
    pub compounds: Vec<Compound>,
    /// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`
    pub combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace
    Descendant,
    /// `>`
    Child,
}

/// One element test: optional type plus filters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    /// Type selector; None is the universal selector
    pub tag: Option<String>,
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Id(String),
    Class(String),
    HasAttribute(String),
    AttributeEquals(String, String),
    NthChild(Nth),
    NthOfType(Nth),
    FirstChild,
    LastChild,
}

/// Argument of `:nth-child()` / `:nth-of-type()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nth {
    /// 1-based position
    Index(usize),
    Odd,
    Even,
}

impl Nth {
    /// Check a 1-based position against the argument
    pub fn accepts(self, position: usize) -> bool {
        match self {
            Nth::Index(n) => position == n,
            Nth::Odd => position % 2 == 1,
            Nth::Even => position % 2 == 0,
        }
    }
}

/// Selector parser
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser
    pub fn new(input: &str) -> Self {
        Parser {
            tokens: tokenize(input),
            pos: 0,
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while *self.current() == Token::Whitespace {
            self.advance();
            skipped = true;
        }
        skipped
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        if *self.current() == expected {
            self.advance();
            Ok(())
        } else {
            Err(format!("expected {:?}, found {:?}", expected, self.current()))
        }
    }

    /// Parse the whole input as a selector list
    pub fn parse(&mut self) -> Result<SelectorList, String> {
        let mut list = Vec::new();
        loop {
            self.skip_whitespace();
            list.push(self.parse_complex()?);
            match self.current() {
                Token::Comma => self.advance(),
                Token::Eof => return Ok(SelectorList(list)),
                other => return Err(format!("unexpected {:?}", other)),
            }
        }
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, String> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let spaced = self.skip_whitespace();
            let combinator = match self.current() {
                Token::Gt => {
                    self.advance();
                    self.skip_whitespace();
                    Combinator::Child
                }
                Token::Comma | Token::Eof => break,
                _ if spaced => Combinator::Descendant,
                other => return Err(format!("unexpected {:?}", other)),
            };
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Compound, String> {
        let mut compound = Compound::default();
        let mut empty = true;

        match self.current().clone() {
            Token::Ident(name) => {
                compound.tag = Some(name);
                self.advance();
                empty = false;
            }
            Token::Star => {
                self.advance();
                empty = false;
            }
            _ => {}
        }

        loop {
            let filter = match self.current().clone() {
                Token::Hash(id) => {
                    self.advance();
                    Filter::Id(id)
                }
                Token::Dot => {
                    self.advance();
                    Filter::Class(self.expect_ident("class name")?)
                }
                Token::LeftBracket => {
                    self.advance();
                    self.parse_attribute()?
                }
                Token::Colon => {
                    self.advance();
                    self.parse_pseudo()?
                }
                _ => break,
            };
            compound.filters.push(filter);
            empty = false;
        }

        if empty {
            return Err(format!("expected a selector, found {:?}", self.current()));
        }
        Ok(compound)
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, String> {
        match self.current().clone() {
            Token::Ident(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(format!("expected {}, found {:?}", what, other)),
        }
    }

    fn parse_attribute(&mut self) -> Result<Filter, String> {
        self.skip_whitespace();
        let name = self.expect_ident("attribute name")?;
        self.skip_whitespace();

        let filter = if *self.current() == Token::Eq {
            self.advance();
            self.skip_whitespace();
            let value = match self.current().clone() {
                Token::Ident(v) | Token::String(v) => v,
                Token::Number(n) => n.to_string(),
                other => return Err(format!("expected attribute value, found {:?}", other)),
            };
            self.advance();
            self.skip_whitespace();
            Filter::AttributeEquals(name, value)
        } else {
            Filter::HasAttribute(name)
        };

        self.expect(Token::RightBracket)?;
        Ok(filter)
    }

    fn parse_pseudo(&mut self) -> Result<Filter, String> {
        let name = self.expect_ident("pseudo-class")?.to_ascii_lowercase();
        match name.as_str() {
            "first-child" => Ok(Filter::FirstChild),
            "last-child" => Ok(Filter::LastChild),
            "nth-child" => Ok(Filter::NthChild(self.parse_nth()?)),
            "nth-of-type" => Ok(Filter::NthOfType(self.parse_nth()?)),
            other => Err(format!("unsupported pseudo-class :{}", other)),
        }
    }

    fn parse_nth(&mut self) -> Result<Nth, String> {
        self.expect(Token::LeftParen)?;
        self.skip_whitespace();
        let nth = match self.current().clone() {
            Token::Number(n) if n > 0 => Nth::Index(n),
            Token::Ident(word) if word.eq_ignore_ascii_case("odd") => Nth::Odd,
            Token::Ident(word) if word.eq_ignore_ascii_case("even") => Nth::Even,
            other => return Err(format!("unsupported nth argument {:?}", other)),
        };
        self.advance();
        self.skip_whitespace();
        self.expect(Token::RightParen)?;
        Ok(nth)
    }
}

/// Parse selector text into a selector list
pub fn parse(input: &str) -> Result<SelectorList, String> {
    if input.trim().is_empty() {
        return Err("empty selector".to_string());
    }
    Parser::new(input).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tag() {
        let list = parse("p").unwrap();
        assert_eq!(list.0.len(), 1);
        assert_eq!(list.0[0].compounds[0].tag.as_deref(), Some("p"));
        assert!(list.0[0].combinators.is_empty());
    }

    #[test]
    fn test_compound_filters() {
        let list = parse("div.note#n1[data-x='1']:nth-child(3)").unwrap();
        let compound = &list.0[0].compounds[0];
        assert_eq!(compound.tag.as_deref(), Some("div"));
        assert_eq!(
            compound.filters,
            vec![
                Filter::Class("note".into()),
                Filter::Id("n1".into()),
                Filter::AttributeEquals("data-x".into(), "1".into()),
                Filter::NthChild(Nth::Index(3)),
            ]
        );
    }

    #[test]
    fn test_combinators() {
        let list = parse("html > body  p").unwrap();
        let complex = &list.0[0];
        assert_eq!(complex.compounds.len(), 3);
        assert_eq!(
            complex.combinators,
            vec![Combinator::Child, Combinator::Descendant]
        );
    }

    #[test]
    fn test_selector_list() {
        let list = parse("h1, h2 ,h3").unwrap();
        assert_eq!(list.0.len(), 3);
    }

    #[test]
    fn test_nth_keywords() {
        let list = parse("li:nth-child(odd), li:nth-of-type( even )").unwrap();
        assert_eq!(list.0[0].compounds[0].filters, vec![Filter::NthChild(Nth::Odd)]);
        assert_eq!(list.0[1].compounds[0].filters, vec![Filter::NthOfType(Nth::Even)]);
    }

    #[test]
    fn test_errors() {
        assert!(parse("").is_err());
        assert!(parse("p +").is_err());
        assert!(parse("p:hover").is_err());
        assert!(parse("p:nth-child(0)").is_err());
        assert!(parse("[id").is_err());
        assert!(parse("a,").is_err());
        assert!(parse(">").is_err());
    }
}
