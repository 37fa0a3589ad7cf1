//! Selector Lexer
//!
//! Tokenizes CSS selector text. Whitespace is kept as a token because it is
//! the descendant combinator.

/// Selector token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    /// `#name`
    Hash(String),
    /// Quoted string literal
    String(String),
    Number(usize),
    Dot,         // .
    Star,        // *
    Colon,       // :
    Comma,       // ,
    Gt,          // >
    Eq,          // =
    LeftParen,   // (
    RightParen,  // )
    LeftBracket, // [
    RightBracket, // ]
    /// A run of whitespace
    Whitespace,
    /// Anything the grammar does not know (`+`, `~`, stray quotes...)
    Unexpected(char),

    // End of input
    Eof,
}

/// Selector lexer
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer
    pub fn new(input: &'a str) -> Self {
        Lexer { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.remaining().chars().nth(offset)
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance(1);
        token
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        let Some(c) = self.peek() else {
            return Token::Eof;
        };

        match c {
            c if c.is_whitespace() => {
                while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
                    self.advance(c.len_utf8());
                }
                Token::Whitespace
            }
            '.' => self.single(Token::Dot),
            '*' => self.single(Token::Star),
            ':' => self.single(Token::Colon),
            ',' => self.single(Token::Comma),
            '>' => self.single(Token::Gt),
            '=' => self.single(Token::Eq),
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            '[' => self.single(Token::LeftBracket),
            ']' => self.single(Token::RightBracket),
            '#' => {
                self.advance(1);
                match self.read_ident() {
                    Some(name) => Token::Hash(name),
                    None => Token::Unexpected('#'),
                }
            }
            '"' | '\'' => self.read_string(c),
            c if c.is_ascii_digit() => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance(1);
                }
                match self.input[start..self.pos].parse() {
                    Ok(n) => Token::Number(n),
                    Err(_) => Token::Unexpected(c),
                }
            }
            c if is_ident_start(c)
                || c == '\\'
                || (c == '-' && self.peek_at(1).is_some_and(is_ident_start)) =>
            {
                match self.read_ident() {
                    Some(name) => Token::Ident(name),
                    None => self.single(Token::Unexpected(c)),
                }
            }
            other => {
                self.advance(other.len_utf8());
                Token::Unexpected(other)
            }
        }
    }

    /// Read an identifier, resolving backslash escapes
    fn read_ident(&mut self) -> Option<String> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.advance(1);
                out.push(self.read_escape()?);
            } else if is_ident_char(c) {
                out.push(c);
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
        (!out.is_empty()).then_some(out)
    }

    /// Escape body after the backslash: 1-6 hex digits (plus one optional
    /// space) or a single literal character
    fn read_escape(&mut self) -> Option<char> {
        let hex_len = self
            .remaining()
            .chars()
            .take(6)
            .take_while(|c| c.is_ascii_hexdigit())
            .count();
        if hex_len == 0 {
            let c = self.peek()?;
            self.advance(c.len_utf8());
            return Some(c);
        }

        let code = u32::from_str_radix(&self.remaining()[..hex_len], 16).ok()?;
        self.advance(hex_len);
        if self.peek() == Some(' ') {
            self.advance(1);
        }
        Some(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn read_string(&mut self, quote: char) -> Token {
        self.advance(1);
        let mut out = String::new();
        while let Some(c) = self.peek() {
            self.advance(c.len_utf8());
            if c == quote {
                return Token::String(out);
            }
            if c == '\\' {
                match self.read_escape() {
                    Some(escaped) => out.push(escaped),
                    None => return Token::Unexpected(quote),
                }
            } else {
                out.push(c);
            }
        }
        Token::Unexpected(quote)
    }
}

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

/// Tokenize a whole selector (including the trailing Eof)
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token == Token::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

/// Escape a name so it lexes back as a single identifier
pub fn escape_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        let plain = if i == 0 {
            is_ident_start(c)
        } else {
            is_ident_char(c)
        };
        if plain {
            out.push(c);
        } else if c.is_ascii_digit() || c.is_control() {
            out.push_str(&format!("\\{:x} ", c as u32));
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}
