//! Bounded literal evaluator.
//!
//! Evaluates the literal subset of PHP constant expressions from significant tokens: integers (decimal, hex, octal,
//! binary, `_` separators), floats, quoted strings, heredoc/nowdoc, `true`/`false`/`null`, unary `+`/`-` on numbers,
//! and flat arrays written as `array(...)` or `[...]`. Everything else is an [`ReflectionError::InvalidLiteral`].

use tokenreflect_core::lang::keywords::KeywordId;
use tokenreflect_core::lang::literals::{self, LiteralWord};
use tokenreflect_core::lang::operators::OperatorId;
use tokenreflect_core::lang::punctuation::PunctuationId;
use tokenreflect_syntax::lexer::{Token, TokenKind};

use super::{ArrayKey, Value};
use crate::error::ReflectionError;

/// Evaluate a literal expression.
///
/// `tokens` must not contain trivia; `definition` is the source text used in error messages.
pub fn evaluate(tokens: &[Token], definition: &str) -> Result<Value, ReflectionError> {
    let mut parser = LiteralParser { tokens, pos: 0 };
    parser.expression().map_err(|reason| ReflectionError::InvalidLiteral {
        definition: definition.to_string(),
        reason,
    })
}

struct LiteralParser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> LiteralParser<'t> {
    fn expression(&mut self) -> Result<Value, String> {
        let value = match self.array_close() {
            Some(close) => self.array(close)?,
            None => self.scalar()?,
        };
        match self.peek() {
            None => Ok(value),
            Some(t) if matches!(t.kind, TokenKind::Operator(_)) => {
                Err(format!("operator '{}' is not supported", t.text))
            }
            Some(t) => Err(format!("unexpected '{}' after the value", t.text)),
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<&'t Token, String> {
        let token = self.tokens.get(self.pos).ok_or_else(|| "unexpected end of expression".to_string())?;
        self.pos += 1;
        Ok(token)
    }

    fn eat_punct(&mut self, id: PunctuationId) -> bool {
        if self.peek().is_some_and(|t| t.kind.is_punctuation(id)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// If an array literal starts here, consume its opening and return the closing delimiter.
    fn array_close(&mut self) -> Option<PunctuationId> {
        let token = self.peek()?;
        if token.kind.is_punctuation(PunctuationId::LBracket) {
            self.pos += 1;
            return Some(PunctuationId::RBracket);
        }
        if token.kind.is_keyword(KeywordId::Array)
            && self
                .tokens
                .get(self.pos + 1)
                .is_some_and(|t| t.kind.is_punctuation(PunctuationId::LParen))
        {
            self.pos += 2;
            return Some(PunctuationId::RParen);
        }
        None
    }

    fn array(&mut self, close: PunctuationId) -> Result<Value, String> {
        let mut items: Vec<(ArrayKey, Value)> = Vec::new();
        let mut largest_int_key: Option<i64> = None;

        while !self.eat_punct(close) {
            let first = self.element()?;
            let (key, value) = if self.eat_punct(PunctuationId::DoubleArrow) {
                let key = ArrayKey::from_value(&first).ok_or_else(|| "illegal array key type".to_string())?;
                (key, self.element()?)
            } else {
                let index = largest_int_key.map_or(Some(0), |k| k.checked_add(1));
                let index = index.ok_or_else(|| "array index overflow".to_string())?;
                (ArrayKey::Int(index), first)
            };

            if let ArrayKey::Int(i) = key {
                largest_int_key = Some(largest_int_key.map_or(i, |k| k.max(i)));
            }
            match items.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => items.push((key, value)),
            }

            if !self.eat_punct(PunctuationId::Comma) {
                if self.eat_punct(close) {
                    break;
                }
                return Err("expected ',' between array elements".to_string());
            }
        }
        Ok(Value::Array(items))
    }

    fn element(&mut self) -> Result<Value, String> {
        if self.array_close().is_some() {
            return Err("nested array literals are not supported".to_string());
        }
        self.scalar()
    }

    fn scalar(&mut self) -> Result<Value, String> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Int => int_literal(&token.text),
            TokenKind::Float => float_literal(&token.text),
            TokenKind::String => string_literal(&token.text),
            TokenKind::Ident => match literals::from_str(&token.text) {
                Some(LiteralWord::True) => Ok(Value::Bool(true)),
                Some(LiteralWord::False) => Ok(Value::Bool(false)),
                Some(LiteralWord::Null) => Ok(Value::Null),
                None => Err(format!("'{}' is not a literal", token.text)),
            },
            TokenKind::Operator(op @ (OperatorId::Minus | OperatorId::Plus)) => {
                let operand = self.next()?;
                let value = match operand.kind {
                    TokenKind::Int => int_literal(&operand.text)?,
                    TokenKind::Float => float_literal(&operand.text)?,
                    _ => return Err(format!("unary '{}' applies to numbers only", token.text)),
                };
                Ok(match (op, value) {
                    (OperatorId::Minus, Value::Int(i)) => Value::Int(-i),
                    (OperatorId::Minus, Value::Float(f)) => Value::Float(-f),
                    (_, value) => value,
                })
            }
            TokenKind::Operator(_) => Err(format!("operator '{}' is not supported", token.text)),
            _ => Err(format!("unexpected '{}'", token.text)),
        }
    }
}

// --- numbers -----------------------------------------------------------------

fn int_literal(text: &str) -> Result<Value, String> {
    let digits: String = text.chars().filter(|c| *c != '_').collect::<String>().to_ascii_lowercase();
    let (radix, body) = if let Some(body) = digits.strip_prefix("0x") {
        (16, body)
    } else if let Some(body) = digits.strip_prefix("0b") {
        (2, body)
    } else if let Some(body) = digits.strip_prefix("0o") {
        (8, body)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits.as_str())
    };

    let invalid = || format!("'{text}' is not a valid integer");
    if body.is_empty() {
        return Err(invalid());
    }
    if let Ok(i) = i64::from_str_radix(body, radix) {
        return Ok(Value::Int(i));
    }
    // Out of range: PHP silently widens to float.
    if radix == 10 {
        return float_literal(body);
    }
    body.chars()
        .try_fold(0u128, |acc, c| {
            c.to_digit(radix)
                .and_then(|d| acc.checked_mul(u128::from(radix))?.checked_add(u128::from(d)))
        })
        .map(|n| Value::Float(n as f64))
        .ok_or_else(invalid)
}

fn float_literal(text: &str) -> Result<Value, String> {
    text.replace('_', "")
        .parse::<f64>()
        .map(Value::Float)
        .map_err(|_| format!("'{text}' is not a valid float"))
}

// --- strings -----------------------------------------------------------------

fn string_literal(text: &str) -> Result<Value, String> {
    if let Some(body) = text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
        return Ok(Value::String(unescape_single(body)));
    }
    if let Some(body) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        return unescape_double(body, false).map(Value::String);
    }
    if text.starts_with("<<<") {
        let (body, nowdoc) = heredoc_body(text).ok_or_else(|| "malformed heredoc".to_string())?;
        return if nowdoc {
            Ok(Value::String(body))
        } else {
            unescape_double(&body, true).map(Value::String)
        };
    }
    Err(format!("unrecognized string literal {text}"))
}

/// Only `\\` and `\'` are escapes in single-quoted strings.
fn unescape_single(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.peek().copied().filter(|n| matches!(n, '\\' | '\'')) {
                out.push(next);
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn unescape_double(body: &str, heredoc: bool) -> Result<String, String> {
    let bytes = body.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match b {
            b'$' if next.is_some_and(|n| n == b'{' || n == b'_' || n.is_ascii_alphabetic() || n >= 0x80) => {
                return Err("string interpolation is not supported".to_string());
            }
            b'{' if next == Some(b'$') => return Err("string interpolation is not supported".to_string()),
            b'\\' if next.is_some() => {
                let (decoded, consumed) = escape(&bytes[i + 1..], heredoc)?;
                match decoded {
                    Some(decoded) => out.extend_from_slice(&decoded),
                    None => out.push(b'\\'),
                }
                i += 1 + consumed;
            }
            _ => {
                out.push(b);
                i += 1;
            }
        }
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Decode one escape sequence; `rest` starts after the backslash.
///
/// Returns the decoded bytes (or `None` to keep the backslash literally) and how many bytes of `rest` were used.
fn escape(rest: &[u8], heredoc: bool) -> Result<(Option<Vec<u8>>, usize), String> {
    let simple = |b: u8| -> Result<(Option<Vec<u8>>, usize), String> { Ok((Some(vec![b]), 1)) };
    match rest[0] {
        b'n' => simple(b'\n'),
        b't' => simple(b'\t'),
        b'r' => simple(b'\r'),
        b'v' => simple(0x0b),
        b'e' => simple(0x1b),
        b'f' => simple(0x0c),
        b'\\' => simple(b'\\'),
        b'$' => simple(b'$'),
        b'"' if !heredoc => simple(b'"'),
        b'0'..=b'7' => {
            let len = rest.iter().take(3).take_while(|b| (b'0'..=b'7').contains(*b)).count();
            let value = rest[..len].iter().fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
            Ok((Some(vec![(value & 0xff) as u8]), len))
        }
        b'x' if rest.get(1).is_some_and(u8::is_ascii_hexdigit) => {
            let len = rest[1..].iter().take(2).take_while(|b| b.is_ascii_hexdigit()).count();
            let hex = std::str::from_utf8(&rest[1..1 + len]).map_err(|e| e.to_string())?;
            let value = u8::from_str_radix(hex, 16).map_err(|e| e.to_string())?;
            Ok((Some(vec![value]), 1 + len))
        }
        b'u' if rest.get(1) == Some(&b'{') => {
            let close = rest
                .iter()
                .position(|b| *b == b'}')
                .ok_or_else(|| "unterminated \\u{...} escape".to_string())?;
            let hex = std::str::from_utf8(&rest[2..close]).map_err(|e| e.to_string())?;
            let c = u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| format!("invalid codepoint escape \\u{{{hex}}}"))?;
            let mut buf = [0u8; 4];
            Ok((Some(c.encode_utf8(&mut buf).as_bytes().to_vec()), close + 1))
        }
        _ => Ok((None, 0)),
    }
}

/// Extract the body of a heredoc/nowdoc token, with the closing label's indentation removed from every line.
fn heredoc_body(text: &str) -> Option<(String, bool)> {
    let header = text.strip_prefix("<<<")?.trim_start_matches([' ', '\t']);
    let nowdoc = header.starts_with('\'');
    let after_header = &header[header.find('\n')? + 1..];

    let (body, closing) = match after_header.rfind('\n') {
        Some(nl) => (&after_header[..nl], &after_header[nl + 1..]),
        None => ("", after_header),
    };
    let body = body.strip_suffix('\r').unwrap_or(body);
    let indent = &closing[..closing.len() - closing.trim_start_matches([' ', '\t']).len()];

    let lines: Vec<&str> = body
        .split('\n')
        .map(|line| line.strip_prefix(indent).unwrap_or_else(|| line.trim_start_matches([' ', '\t'])))
        .collect();
    Some((lines.join("\n"), nowdoc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenreflect_syntax::lexer::lex;

    fn eval(expr: &str) -> Result<Value, ReflectionError> {
        let tokens: Vec<Token> = lex(&format!("<?php {expr}"))
            .unwrap()
            .into_iter()
            .skip(1)
            .filter(|t| !t.is_trivia())
            .collect();
        evaluate(&tokens, expr)
    }

    fn reason(expr: &str) -> String {
        match eval(expr) {
            Err(ReflectionError::InvalidLiteral { reason, .. }) => reason,
            other => panic!("expected an invalid literal, got {other:?}"),
        }
    }

    #[test]
    fn test_integers() {
        assert_eq!(eval("1").unwrap(), Value::Int(1));
        assert_eq!(eval("0x1F").unwrap(), Value::Int(31));
        assert_eq!(eval("0b101").unwrap(), Value::Int(5));
        assert_eq!(eval("017").unwrap(), Value::Int(15));
        assert_eq!(eval("0o17").unwrap(), Value::Int(15));
        assert_eq!(eval("1_000_000").unwrap(), Value::Int(1_000_000));
        assert_eq!(eval("0").unwrap(), Value::Int(0));
        assert_eq!(eval("-42").unwrap(), Value::Int(-42));
        assert_eq!(eval("+7").unwrap(), Value::Int(7));
    }

    #[test]
    fn test_integer_overflow_becomes_float() {
        assert_eq!(eval("9223372036854775808").unwrap(), Value::Float(9223372036854775808.0));
        assert_eq!(eval("0xFFFFFFFFFFFFFFFF").unwrap(), Value::Float(18446744073709551615.0));
    }

    #[test]
    fn test_floats() {
        assert_eq!(eval("1.5").unwrap(), Value::Float(1.5));
        assert_eq!(eval(".5").unwrap(), Value::Float(0.5));
        assert_eq!(eval("1e3").unwrap(), Value::Float(1000.0));
        assert_eq!(eval("-2.5E-1").unwrap(), Value::Float(-0.25));
    }

    #[test]
    fn test_literal_words_any_case() {
        assert_eq!(eval("TRUE").unwrap(), Value::Bool(true));
        assert_eq!(eval("False").unwrap(), Value::Bool(false));
        assert_eq!(eval("null").unwrap(), Value::Null);
    }

    #[test]
    fn test_single_quoted_strings() {
        assert_eq!(eval(r"'it\'s'").unwrap(), Value::String("it's".into()));
        assert_eq!(eval(r"'a\nb\\c'").unwrap(), Value::String(r"a\nb\c".into()));
    }

    #[test]
    fn test_double_quoted_strings() {
        assert_eq!(eval(r#""a\tb\n""#).unwrap(), Value::String("a\tb\n".into()));
        assert_eq!(eval(r#""\x41\101\u{1F600}""#).unwrap(), Value::String("AA\u{1F600}".into()));
        assert_eq!(eval(r#""\$x \q""#).unwrap(), Value::String(r"$x \q".into()));
        assert_eq!(eval(r#""cost: 5$""#).unwrap(), Value::String("cost: 5$".into()));
    }

    #[test]
    fn test_interpolation_is_rejected() {
        assert_eq!(reason(r#""hello $name""#), "string interpolation is not supported");
        assert_eq!(reason(r#""hello {$name}""#), "string interpolation is not supported");
    }

    #[test]
    fn test_heredoc_and_nowdoc() {
        assert_eq!(eval("<<<EOT\n  a\\tb\n    c\n  EOT").unwrap(), Value::String("a\tb\n  c".into()));
        assert_eq!(eval("<<<'EOT'\na\\tb\nEOT").unwrap(), Value::String("a\\tb".into()));
        assert_eq!(eval("<<<EOT\nEOT").unwrap(), Value::String(String::new()));
    }

    #[test]
    fn test_flat_arrays() {
        assert_eq!(
            eval("array(1, 'a' => 2, 3)").unwrap(),
            Value::Array(vec![
                (ArrayKey::Int(0), Value::Int(1)),
                ("a".into(), Value::Int(2)),
                (ArrayKey::Int(1), Value::Int(3)),
            ])
        );
        assert_eq!(eval("[]").unwrap(), Value::Array(vec![]));
        assert_eq!(eval("[1, 2,]").unwrap().as_array().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_array_keys_are_normalized() {
        let v = eval("['5' => 'a', 'b', true => 'c', 5 => 'd']").unwrap();
        assert_eq!(
            v,
            Value::Array(vec![
                (ArrayKey::Int(5), Value::String("d".into())),
                (ArrayKey::Int(6), Value::String("b".into())),
                (ArrayKey::Int(1), Value::String("c".into())),
            ])
        );
    }

    #[test]
    fn test_rejected_expressions() {
        assert_eq!(reason("[[1]]"), "nested array literals are not supported");
        assert_eq!(reason("1 + 2"), "operator '+' is not supported");
        assert_eq!(reason("'a' . 'b'"), "operator '.' is not supported");
        assert_eq!(reason("-'a'"), "unary '-' applies to numbers only");
        assert_eq!(reason("[1 2]"), "expected ',' between array elements");
        assert!(eval("(1)").is_err());
        assert!(eval("").is_err());
    }
}
