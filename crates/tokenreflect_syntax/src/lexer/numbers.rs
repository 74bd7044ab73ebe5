//! Numeric literal scanning.
//!
//! The lexer only decides *where* a number ends and whether it is an int or a float; converting the spelling to a
//! value is the evaluator's job.

use super::{Lexer, TokenKind};

impl<'a> Lexer<'a> {
    pub(super) fn scan_number(&mut self, start: usize) {
        let radix_digits: Option<fn(u8) -> bool> = match (self.byte_at(0), self.byte_at(1)) {
            (Some(b'0'), Some(b'x' | b'X')) => Some(is_hex_digit as fn(u8) -> bool),
            (Some(b'0'), Some(b'b' | b'B')) => Some(is_binary_digit as fn(u8) -> bool),
            (Some(b'0'), Some(b'o' | b'O')) => Some(is_octal_digit as fn(u8) -> bool),
            _ => None,
        };

        if let Some(is_digit) = radix_digits {
            self.pos += 2;
            while self.byte_at(0).is_some_and(|b| is_digit(b) || b == b'_') {
                self.pos += 1;
            }
            self.add_token(TokenKind::Int, start);
            return;
        }

        let mut is_float = false;
        self.consume_decimal_digits();

        // `1.5`, `.5` and `1.` are floats; `1...` is `1` followed by an ellipsis.
        if self.byte_at(0) == Some(b'.') && self.byte_at(1) != Some(b'.') {
            is_float = true;
            self.pos += 1;
            self.consume_decimal_digits();
        }

        if matches!(self.byte_at(0), Some(b'e' | b'E')) {
            let exponent_digit_at = match self.byte_at(1) {
                Some(b'+' | b'-') => 2,
                _ => 1,
            };
            if self.byte_at(exponent_digit_at).is_some_and(|b| b.is_ascii_digit()) {
                is_float = true;
                self.pos += exponent_digit_at;
                self.consume_decimal_digits();
            }
        }

        let kind = if is_float { TokenKind::Float } else { TokenKind::Int };
        self.add_token(kind, start);
    }

    fn consume_decimal_digits(&mut self) {
        while self.byte_at(0).is_some_and(|b| b.is_ascii_digit() || b == b'_') {
            self.pos += 1;
        }
    }
}

fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

fn is_binary_digit(b: u8) -> bool {
    b == b'0' || b == b'1'
}

fn is_octal_digit(b: u8) -> bool {
    (b'0'..=b'7').contains(&b)
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, lex};

    fn number(source: &str) -> (TokenKind, String) {
        let tokens = lex(&format!("<?php {source};")).unwrap();
        let t = &tokens[2];
        (t.kind, t.text.clone())
    }

    #[test]
    fn test_integers() {
        assert_eq!(number("42"), (TokenKind::Int, "42".to_string()));
        assert_eq!(number("0x1F"), (TokenKind::Int, "0x1F".to_string()));
        assert_eq!(number("0b1010"), (TokenKind::Int, "0b1010".to_string()));
        assert_eq!(number("1_000_000"), (TokenKind::Int, "1_000_000".to_string()));
    }

    #[test]
    fn test_floats() {
        assert_eq!(number("1.5"), (TokenKind::Float, "1.5".to_string()));
        assert_eq!(number(".5"), (TokenKind::Float, ".5".to_string()));
        assert_eq!(number("1e10"), (TokenKind::Float, "1e10".to_string()));
        assert_eq!(number("2.5E-3"), (TokenKind::Float, "2.5E-3".to_string()));
    }
}
