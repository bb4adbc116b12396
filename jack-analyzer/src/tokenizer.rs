//! Lexical analyzer for the Jack language.

use crate::error::{JackError, Result};
use crate::token::{Keyword, Token, TokenStream, is_symbol};

/// Jack language tokenizer.
///
/// Scans the source once, left to right, and fails on the first lexical
/// error. Errors are anchored at the start of the partially-consumed token.
pub struct Tokenizer<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
    byte_offset: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
            byte_offset: 0,
        }
    }

    /// Tokenize the input into a [`TokenStream`] ending in the `Eof`
    /// sentinel.
    pub fn tokenize(mut self) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut offsets = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;
            if self.is_at_end() {
                break;
            }
            let start = self.byte_offset;
            tokens.push(self.next_token(start)?);
            offsets.push(start);
        }

        offsets.push(self.byte_offset);
        tokens.push(Token::Eof);

        Ok(TokenStream::new(self.source.to_string(), tokens, offsets))
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    /// Advance one character, keeping the byte offset in step.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        self.byte_offset += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            while let Some(c) = self.peek() {
                if c.is_whitespace() {
                    self.advance();
                } else {
                    break;
                }
            }

            if self.peek() == Some('/') {
                if self.peek_next() == Some('/') {
                    // Line comment: skip through the newline.
                    self.advance();
                    self.advance();
                    while let Some(c) = self.advance() {
                        if c == '\n' {
                            break;
                        }
                    }
                    continue;
                } else if self.peek_next() == Some('*') {
                    // Block comment: skip through the next `*/`.
                    let start = self.byte_offset;
                    self.advance();
                    self.advance();
                    loop {
                        if self.is_at_end() {
                            return Err(JackError::lexical(start, "Unexpected EOF"));
                        }
                        if self.peek() == Some('*') && self.peek_next() == Some('/') {
                            self.advance();
                            self.advance();
                            break;
                        }
                        self.advance();
                    }
                    continue;
                }
            }

            return Ok(());
        }
    }

    /// Scan the next token. `start` is the byte offset of its first char.
    fn next_token(&mut self, start: usize) -> Result<Token> {
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        if is_symbol(c) {
            self.advance();
            return Ok(Token::Symbol(c));
        }

        if c.is_ascii_digit() {
            return self.read_integer(start);
        }

        if c == '"' {
            return self.read_string(start);
        }

        if c.is_alphabetic() || c == '_' {
            return self.read_identifier(start);
        }

        Err(JackError::lexical(start, "Invalid character"))
    }

    /// Digit run. Must end at a symbol, whitespace or end of input, and
    /// the value must fit in 0..=32767.
    fn read_integer(&mut self, start: usize) -> Result<Token> {
        let mut value: u32 = 0;
        while let Some(c) = self.peek() {
            if let Some(digit) = c.to_digit(10) {
                self.advance();
                value = value.saturating_mul(10).saturating_add(digit);
            } else {
                break;
            }
        }

        if value > 32767 || !self.at_token_boundary() {
            return Err(JackError::lexical(start, "Invalid integer"));
        }

        Ok(Token::IntegerConstant(value as u16))
    }

    /// String literal: everything up to the closing quote, no escape
    /// processing. Newlines are allowed inside.
    fn read_string(&mut self, start: usize) -> Result<Token> {
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some(c) => value.push(c),
                None => return Err(JackError::lexical(start, "Unexpected EOF")),
            }
        }

        Ok(Token::StringConstant(value))
    }

    /// Keyword or identifier. Must end at a symbol, whitespace or end of
    /// input.
    fn read_identifier(&mut self, start: usize) -> Result<Token> {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                value.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if !self.at_token_boundary() {
            return Err(JackError::lexical(start, "Invalid character in identifier"));
        }

        if let Some(keyword) = Keyword::parse_keyword(&value) {
            Ok(Token::Keyword(keyword))
        } else {
            Ok(Token::Identifier(value))
        }
    }

    /// A digit run or identifier may only be terminated by a symbol,
    /// whitespace, or the end of input.
    fn at_token_boundary(&self) -> bool {
        match self.peek() {
            None => true,
            Some(c) => is_symbol(c) || c.is_whitespace(),
        }
    }
}
