/// Token-stream helpers shared by every builder chunk.
///
/// This chunk contains the low-level primitives used throughout building:
/// - Matching / expecting keywords, operators and punctuation
/// - Reading names (`Foo`, `\Foo\Bar`, `namespace\Foo`)
/// - Skipping statements and template text the builder does not model
/// - Lines and docblocks of declarations
impl DeclarationBuilder<'_> {
    // ========================================================================
    // Matching
    // ========================================================================

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.stream.is_keyword(id)
    }

    fn check_punct(&self, id: PunctuationId) -> bool {
        self.stream.is_punct(id)
    }

    fn check_op(&self, id: OperatorId) -> bool {
        self.stream.is_op(id)
    }

    /// Consume the current token and the trivia after it.
    fn bump(&mut self) {
        self.stream.advance_significant();
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<(), ReflectionError> {
        if self.check_punct(id) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(msg))
        }
    }

    /// A [`ReflectionError::MalformedDeclaration`] naming the current token, or end of stream past the last one.
    fn unexpected(&self, msg: &str) -> ReflectionError {
        match self.stream.current() {
            Ok(token) => ReflectionError::malformed(format!("{msg}, found '{}'", token.text), token.line),
            Err(err) => err.into(),
        }
    }

    fn peek_is_punct(&self, id: PunctuationId) -> bool {
        self.stream.peek_significant().is_some_and(|t| t.kind.is_punctuation(id))
    }

    fn peek_is_op(&self, id: OperatorId) -> bool {
        self.stream.peek_significant().is_some_and(|t| t.kind.is_operator(id))
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// Consume one identifier. `allow_keywords` also accepts reserved words, as method and class constant names do.
    fn identifier(&mut self, allow_keywords: bool, msg: &str) -> Result<String, ReflectionError> {
        let token = self.stream.current()?;
        let accepted = match token.kind {
            TokenKind::Ident => true,
            TokenKind::Keyword(_) => allow_keywords,
            _ => false,
        };
        if !accepted {
            return Err(self.unexpected(msg));
        }
        let name = token.text.clone();
        self.bump();
        Ok(name)
    }

    /// Consume a name as written: `Foo`, `Foo\Bar`, `\Foo` or `namespace\Foo`.
    ///
    /// Stops in front of `\{` so a group `use` can take over.
    fn qualified_name(&mut self, msg: &str) -> Result<String, ReflectionError> {
        let mut name = String::new();
        if self.check_punct(PunctuationId::Backslash) {
            name.push(names::NAMESPACE_SEPARATOR);
            self.bump();
        }
        loop {
            let token = self.stream.current()?;
            if !matches!(token.kind, TokenKind::Ident | TokenKind::Keyword(_)) {
                return Err(self.unexpected(msg));
            }
            name.push_str(&token.text);
            self.bump();

            if self.check_punct(PunctuationId::Backslash) && !self.peek_is_punct(PunctuationId::LBrace) {
                name.push(names::NAMESPACE_SEPARATOR);
                self.bump();
            } else {
                return Ok(name);
            }
        }
    }

    /// Consume a comma-separated list of class names and resolve each one.
    fn class_name_list(&mut self, scope: Scope<'_>, msg: &str) -> Result<Vec<String>, ReflectionError> {
        let mut list = vec![self.class_name(scope, msg)?];
        while self.match_punct(PunctuationId::Comma) {
            list.push(self.class_name(scope, msg)?);
        }
        Ok(list)
    }

    /// Consume a class name and resolve it to its FQN (without the leading `\`).
    fn class_name(&mut self, scope: Scope<'_>, msg: &str) -> Result<String, ReflectionError> {
        let written = self.qualified_name(msg)?;
        let resolved = names::resolve(&written, scope.aliases, scope.namespace)?;
        Ok(names::trim_root(&resolved).to_string())
    }

    // ========================================================================
    // Skipping
    // ========================================================================

    /// Skip trivia, open and close tags and inline HTML.
    fn skip_template(&mut self) {
        while self.stream.current_kind().is_some_and(|kind| {
            kind.is_trivia() || matches!(kind, TokenKind::OpenTag | TokenKind::CloseTag | TokenKind::InlineHtml)
        }) {
            self.stream.advance();
        }
    }

    /// Skip one statement the builder does not model, never moving past `end`.
    ///
    /// A statement ends at `;` or `?>` on depth 0. Statements that own a block (`if`, `while`, `try`, `{ ... }`,
    /// `enum`, ...) end at the block's closing `}`, extended over `else`/`elseif`/`catch`/`finally` and the
    /// trailing `while` of a `do` loop.
    fn skip_statement(&mut self, end: usize) {
        let first = self.stream.current_kind();
        let is_do = first == Some(TokenKind::Keyword(KeywordId::Do));
        let owns_block = is_do || first.is_some_and(opens_block) || self.at_enum();
        let mut depth = 0usize;

        while self.stream.position() < end {
            let Some(kind) = self.stream.current_kind() else {
                return;
            };
            match kind {
                TokenKind::Punctuation(id) if punctuation::is_opening(id) => depth += 1,
                TokenKind::Punctuation(id) if punctuation::is_closing(id) => {
                    if depth == 0 {
                        // Stray closer; consume it so the caller makes progress.
                        self.stream.advance();
                        return;
                    }
                    depth -= 1;
                    if depth == 0 && id == PunctuationId::RBrace && owns_block {
                        self.stream.advance_significant();
                        if !self.at_block_continuation(is_do) {
                            return;
                        }
                        continue;
                    }
                }
                TokenKind::Punctuation(PunctuationId::Semicolon) | TokenKind::CloseTag if depth == 0 => {
                    self.stream.advance();
                    return;
                }
                _ => {}
            }
            self.stream.advance();
        }
    }

    fn at_block_continuation(&self, is_do: bool) -> bool {
        match self.stream.current_kind() {
            Some(TokenKind::Keyword(
                KeywordId::Else | KeywordId::Elseif | KeywordId::Catch | KeywordId::Finally,
            )) => true,
            Some(TokenKind::Keyword(KeywordId::While)) => is_do,
            _ => false,
        }
    }

    /// `enum` is a contextual word: it starts a declaration only when a name follows.
    fn at_enum(&self) -> bool {
        self.stream
            .current()
            .is_ok_and(|t| t.kind == TokenKind::Ident && t.text.eq_ignore_ascii_case("enum"))
            && self.stream.peek_significant().is_some_and(|t| t.kind == TokenKind::Ident)
    }

    // ========================================================================
    // Positions
    // ========================================================================

    fn line_at(&self, index: usize) -> usize {
        self.stream.get(index).map_or_else(|| self.stream.line(), |t| t.line)
    }

    /// End line of the last significant token before `index`.
    fn last_line_before(&self, index: usize) -> usize {
        let tokens = self.stream.tokens();
        tokens[..index.min(tokens.len())]
            .iter()
            .rev()
            .find(|t| !t.is_trivia())
            .map_or(1, Token::end_line)
    }

    /// Docblock directly in front of the token at `index`, unless docblocks are discarded.
    fn doc_comment_at(&self, index: usize) -> Option<String> {
        if !self.config.keep_doc_comments {
            return None;
        }
        self.stream.preceding_doc_comment(index).map(|t| t.text.clone())
    }

    /// Location of a declaration whose first token (modifiers included) is at `start`.
    fn location(&self, start: usize, end_line: usize) -> Location {
        Location {
            file_name: Rc::clone(&self.file_name),
            start_line: self.line_at(start),
            end_line,
            doc_comment: self.doc_comment_at(start),
        }
    }

    /// Index of the bracket closing the current `(`, `[` or `{`.
    fn block_end(&self) -> Result<usize, ReflectionError> {
        self.stream
            .find_matching_bracket()
            .ok_or_else(|| ReflectionError::UnexpectedEndOfStream {
                line: self.last_line_before(self.stream.len()),
            })
    }
}

/// Statements whose extent is a brace-delimited block rather than a `;`.
fn opens_block(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Punctuation(PunctuationId::LBrace)
            | TokenKind::Keyword(
                KeywordId::If
                    | KeywordId::Else
                    | KeywordId::Elseif
                    | KeywordId::While
                    | KeywordId::For
                    | KeywordId::Foreach
                    | KeywordId::Switch
                    | KeywordId::Try
                    | KeywordId::Declare
            )
    )
}
