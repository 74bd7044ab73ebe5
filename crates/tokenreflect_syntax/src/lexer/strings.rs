//! Quoted string and heredoc/nowdoc scanning.
//!
//! Tokens keep their delimiters and escapes verbatim. Unescaping happens in the value evaluator, which needs to know
//! which flavour of string it is looking at anyway.

use super::{Lexer, TokenKind, is_ident_continue, is_ident_start};
use crate::diagnostics::SyntaxError;

impl<'a> Lexer<'a> {
    pub(super) fn scan_single_quoted(&mut self, start: usize) -> Result<(), SyntaxError> {
        self.pos += 1;
        while let Some(b) = self.byte_at(0) {
            match b {
                b'\\' => self.pos += 2,
                b'\'' => {
                    self.pos += 1;
                    self.add_token(TokenKind::String, start);
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        Err(self.unterminated("string"))
    }

    pub(super) fn scan_double_quoted(&mut self, start: usize) -> Result<(), SyntaxError> {
        self.pos += 1;
        // Depth of `{$ ... }` interpolation; quotes inside it belong to the embedded expression.
        let mut interpolation = 0usize;
        while let Some(b) = self.byte_at(0) {
            match b {
                b'\\' => self.pos += 2,
                b'{' if self.byte_at(1) == Some(b'$') => {
                    interpolation += 1;
                    self.pos += 2;
                }
                b'}' if interpolation > 0 => {
                    interpolation -= 1;
                    self.pos += 1;
                }
                b'"' if interpolation == 0 => {
                    self.pos += 1;
                    self.add_token(TokenKind::String, start);
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        Err(self.unterminated("string"))
    }

    /// `<<<LABEL`, `<<<"LABEL"` (heredoc) or `<<<'LABEL'` (nowdoc), closed by `LABEL` at the start of a line
    /// (indentation allowed).
    pub(super) fn scan_heredoc(&mut self, start: usize) -> Result<(), SyntaxError> {
        self.pos += 3;
        while matches!(self.byte_at(0), Some(b' ' | b'\t')) {
            self.pos += 1;
        }

        let quote = match self.byte_at(0) {
            Some(q @ (b'\'' | b'"')) => {
                self.pos += 1;
                Some(q)
            }
            _ => None,
        };

        let label_start = self.pos;
        if !self.byte_at(0).is_some_and(is_ident_start) {
            return Err(SyntaxError::MalformedHeredoc { line: self.line });
        }
        while self.byte_at(0).is_some_and(is_ident_continue) {
            self.pos += 1;
        }
        let label = &self.source[label_start..self.pos];

        if let Some(q) = quote {
            if self.byte_at(0) != Some(q) {
                return Err(SyntaxError::MalformedHeredoc { line: self.line });
            }
            self.pos += 1;
        }
        if self.rest().starts_with("\r\n") {
            self.pos += 2;
        } else if self.byte_at(0) == Some(b'\n') {
            self.pos += 1;
        } else {
            return Err(SyntaxError::MalformedHeredoc { line: self.line });
        }

        // Walk the body line by line looking for the closing label.
        let mut line_start = self.pos;
        loop {
            let line = &self.source[line_start..];
            let indented = line.trim_start_matches([' ', '\t']);
            let label_at = line_start + (line.len() - indented.len());
            if indented.starts_with(label)
                && !indented.as_bytes().get(label.len()).is_some_and(|b| is_ident_continue(*b))
            {
                self.pos = label_at + label.len();
                self.add_token(TokenKind::String, start);
                return Ok(());
            }
            match line.find('\n') {
                Some(nl) => line_start += nl + 1,
                None => return Err(self.unterminated("heredoc")),
            }
        }
    }

    fn unterminated(&self, what: &'static str) -> SyntaxError {
        SyntaxError::Unterminated { what, line: self.line }
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::SyntaxError;
    use crate::lexer::{TokenKind, lex};

    fn first_string(source: &str) -> String {
        lex(source)
            .unwrap()
            .into_iter()
            .find(|t| t.kind == TokenKind::String)
            .map(|t| t.text)
            .unwrap()
    }

    #[test]
    fn test_single_quoted_with_escaped_quote() {
        assert_eq!(first_string(r"<?php 'it\'s';"), r"'it\'s'");
    }

    #[test]
    fn test_double_quoted_with_interpolated_array_access() {
        assert_eq!(first_string(r#"<?php "a {$x["k"]} b";"#), r#""a {$x["k"]} b""#);
    }

    #[test]
    fn test_heredoc_and_nowdoc() {
        let source = "<?php $a = <<<EOT\nline one\n  EOT;\n$b = <<<'RAW'\n$x\nRAW;";
        let strings: Vec<_> = lex(source)
            .unwrap()
            .into_iter()
            .filter(|t| t.kind == TokenKind::String)
            .map(|t| t.text)
            .collect();
        assert_eq!(strings, vec!["<<<EOT\nline one\n  EOT", "<<<'RAW'\n$x\nRAW"]);
    }

    #[test]
    fn test_heredoc_label_must_not_be_prefix_of_longer_word() {
        let source = "<?php <<<END\nENDING\nEND;";
        assert_eq!(first_string(source), "<<<END\nENDING\nEND");
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            lex("<?php 'open"),
            Err(SyntaxError::Unterminated { what: "string", .. })
        ));
    }
}
