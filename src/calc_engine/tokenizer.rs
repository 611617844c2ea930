use super::error::LexError;
use super::token::{Operator, Token};

/// Pull-based tokenizer. Hands out one token per `next_token` call and keeps
/// the previously emitted token to tell unary minus from subtraction.
#[derive(Debug)]
pub struct Tokenizer {
    text: String,
    position: usize,
    last: Token,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer {
            text: String::new(),
            position: 0,
            last: Token::End,
        }
    }

    pub fn reset(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.position = 0;
        self.last = Token::End;
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let Some(c) = self.text[self.position..].chars().next() else {
            self.last = Token::End;
            return Ok(Token::End);
        };

        let token = if c == '(' {
            self.position += 1;
            Token::LParen
        } else if c == ')' {
            self.position += 1;
            Token::RParen
        } else if let Some(op) = Operator::from_char(c) {
            self.position += 1;
            if op == Operator::Sub && self.last.admits_unary_minus() {
                Token::Op(Operator::Neg)
            } else {
                Token::Op(op)
            }
        } else if c.is_ascii_digit() || c == '.' {
            self.read_number()?
        } else {
            return Err(LexError::UnexpectedChar {
                ch: c,
                position: self.position,
            });
        };

        self.last = token.clone();
        Ok(token)
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.text.as_bytes();
        while self.position < bytes.len() && matches!(bytes[self.position], b' ' | b'\t' | b'\n' | b'\r') {
            self.position += 1;
        }
    }

    // digits* ('.' digits*)?, with at least one digit somewhere
    fn read_number(&mut self) -> Result<Token, LexError> {
        let bytes = self.text.as_bytes();
        let start = self.position;
        let mut end = start;

        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'.' {
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }

        let literal = &self.text[start..end];
        let invalid = || LexError::InvalidNumber {
            literal: literal.to_string(),
            position: start,
        };

        if !literal.bytes().any(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value = literal.parse::<f64>().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }

        self.position = end;
        Ok(Token::Number {
            value,
            literal: literal.to_string(),
        })
    }
}
