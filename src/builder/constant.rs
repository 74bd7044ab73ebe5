/// Constant building and value accumulation.
///
/// A value definition is every token from after `=` up to a terminator on nesting depth 0: `,`/`;` for constants,
/// properties and static variables, `,`/`)` for parameter defaults. Magic constants are replaced by the literal they
/// stand for at that position before the definition is classified.
impl DeclarationBuilder<'_> {
    /// `const A = 1, B = 2;` at the top level or inside a class-like. The cursor is on `const`; `start` is the first
    /// token of the declaration, modifiers included.
    fn constant_list(
        &mut self,
        site: &Site<'_>,
        start: usize,
        modifiers: &Modifiers,
    ) -> Result<Vec<ReflectionConstant>, ReflectionError> {
        self.bump();
        let in_class = site.class.is_some();
        if in_class && !self.peek_is_op(OperatorId::Eq) {
            // Typed class constant: `const int A = 1;`
            self.type_hint(site.scope)?;
        }

        let mut constants = Vec::new();
        loop {
            let short_name = self.identifier(in_class, "Could not determine the constant name")?;
            if !self.check_op(OperatorId::Eq) {
                return Err(self.unexpected("Expected '=' after the constant name"));
            }
            self.stream.advance();
            let tokens = self.value_tokens(&[PunctuationId::Comma, PunctuationId::Semicolon])?;
            let definition = self.definition(tokens, site)?;

            let (name, declaring_class) = match site.class {
                Some(class) => (short_name, Some(class.name.to_string())),
                None => (names::qualify(site.scope.namespace, &short_name), None),
            };
            tracing::trace!(constant = %name, definition = %definition.text(), "built constant");
            constants.push(ReflectionConstant {
                name,
                namespace_name: site.scope.namespace.to_string(),
                declaring_class,
                visibility: modifiers.visibility.unwrap_or_default(),
                is_final: modifiers.is_final,
                definition,
                location: self.location(start, self.stream.line()),
            });

            if self.match_punct(PunctuationId::Comma) {
                continue;
            }
            self.expect_punct(PunctuationId::Semicolon, "Expected ';' after the constant declaration")?;
            return Ok(constants);
        }
    }

    /// Accumulate the tokens of a value definition, leaving the cursor on the terminator.
    fn value_tokens(&mut self, terminators: &[PunctuationId]) -> Result<Vec<Token>, ReflectionError> {
        let start_line = self.stream.line();
        let mut depth = 0usize;
        let mut tokens = Vec::new();

        loop {
            let token = self.stream.current()?;
            match token.kind {
                TokenKind::Punctuation(id) if depth == 0 && terminators.contains(&id) => break,
                TokenKind::Punctuation(id) if punctuation::is_opening(id) => depth += 1,
                TokenKind::Punctuation(id) if punctuation::is_closing(id) => {
                    if depth == 0 {
                        return Err(ReflectionError::malformed(
                            format!("Unbalanced '{}' in value definition", token.text),
                            token.line,
                        ));
                    }
                    depth -= 1;
                }
                TokenKind::Punctuation(PunctuationId::Semicolon) if depth == 0 => {
                    return Err(self.unexpected("Unterminated value definition"));
                }
                TokenKind::OpenTag | TokenKind::OpenTagWithEcho | TokenKind::CloseTag | TokenKind::InlineHtml => {
                    return Err(self.unexpected("Unterminated value definition"));
                }
                _ => {}
            }
            tokens.push(token.clone());
            self.stream.advance();
        }

        if tokens.iter().all(Token::is_trivia) {
            return Err(ReflectionError::malformed("Empty value definition", start_line));
        }
        Ok(tokens)
    }

    /// Substitute magic constants, then classify the definition.
    fn definition(&self, tokens: Vec<Token>, site: &Site<'_>) -> Result<ValueDefinition, ReflectionError> {
        let tokens: Vec<Token> = tokens
            .into_iter()
            .map(|token| match token.keyword_id() {
                Some(id) if keywords::is_magic_constant(id) => self.magic_constant(id, token.line, site),
                _ => token,
            })
            .collect();
        let scope = ValueScope {
            namespace: site.scope.namespace,
            aliases: site.scope.aliases,
            class: site.class.map(|class| class.name),
            parent_class: site.class.and_then(|class| class.parent),
            global_fallback: self.config.global_fallback,
        };
        ValueDefinition::classify(&tokens, &scope)
    }

    /// The literal token a magic constant denotes at `line` of the current site.
    fn magic_constant(&self, id: KeywordId, line: usize, site: &Site<'_>) -> Token {
        let class = site.class;
        let text = match id {
            KeywordId::LineC => return Token::new(TokenKind::Int, line.to_string(), line),
            KeywordId::FileC => self.file_name.to_string(),
            KeywordId::DirC => match Path::new(&*self.file_name).parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir.display().to_string(),
                _ => ".".to_string(),
            },
            KeywordId::NamespaceC => site.scope.namespace.to_string(),
            KeywordId::ClassC => class.map(|c| c.name.to_string()).unwrap_or_default(),
            KeywordId::TraitC => class
                .filter(|c| c.kind == ClassKind::Trait)
                .map(|c| c.name.to_string())
                .unwrap_or_default(),
            KeywordId::FunctionC => site.function.map(|f| f.name.clone()).unwrap_or_default(),
            KeywordId::MethodC => site.function.map(|f| f.qualified.clone()).unwrap_or_default(),
            _ => String::new(),
        };
        Token::new(TokenKind::String, single_quoted(&text), line)
    }
}

/// `text` as a single-quoted PHP string literal.
fn single_quoted(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}
