/// File-level building: namespace blocks, `use` imports and top-level statements.
///
/// A file is a sequence of namespace blocks. `namespace N;` runs to the next `namespace` declaration or the end of
/// the file, `namespace N { ... }` and `namespace { ... }` to their closing brace. Code outside of any namespace
/// declaration forms an implicit global block.
impl DeclarationBuilder<'_> {
    /// The first docblock of the file, unless it documents the declaration that follows it.
    fn file_doc_comment(&self) -> Option<String> {
        if !self.config.keep_doc_comments {
            return None;
        }
        let tokens = self.stream.tokens();
        let index = tokens
            .iter()
            .position(|t| t.kind == TokenKind::DocComment || !is_template_or_trivia(t.kind))?;
        if tokens[index].kind != TokenKind::DocComment {
            return None;
        }
        let documented = tokens[index + 1..]
            .iter()
            .find(|t| !is_template_or_trivia(t.kind) && t.kind != TokenKind::Attribute);
        let is_declaration_doc = documented.is_some_and(|t| {
            matches!(
                t.keyword_id(),
                Some(
                    KeywordId::Class
                        | KeywordId::Interface
                        | KeywordId::Trait
                        | KeywordId::Abstract
                        | KeywordId::Final
                        | KeywordId::Readonly
                        | KeywordId::Function
                        | KeywordId::Const
                )
            )
        });
        (!is_declaration_doc).then(|| tokens[index].text.clone())
    }

    /// `namespace` followed by a name or `{`; `namespace\Foo` is a relative name, not a declaration.
    fn at_namespace_declaration(&self) -> bool {
        self.check_keyword(KeywordId::Namespace) && !self.peek_is_punct(PunctuationId::Backslash)
    }

    fn namespace_block(&mut self) -> Result<FileNamespace, ReflectionError> {
        let start = self.stream.position();
        let start_line = self.line_at(start);
        let doc_comment = self.doc_comment_at(start);
        self.bump();

        let name = if self.check_punct(PunctuationId::LBrace) {
            String::new()
        } else {
            let name = self.qualified_name("Expected a namespace name")?;
            if names::is_rooted(&name) {
                return Err(ReflectionError::malformed(
                    format!("Namespace name '{name}' cannot be fully qualified"),
                    start_line,
                ));
            }
            name
        };
        let mut block = FileNamespace::new(name, start_line, doc_comment);

        if self.check_punct(PunctuationId::LBrace) {
            let close = self.block_end()?;
            self.bump();
            loop {
                self.skip_template();
                if self.stream.position() >= close {
                    break;
                }
                self.namespace_member(&mut block, close)?;
            }
            self.stream.seek(close);
            block.end_line = self.line_at(close);
            self.stream.advance();
        } else if self.check_punct(PunctuationId::Semicolon) {
            self.stream.advance();
            loop {
                self.skip_template();
                if self.stream.at_end() || self.at_namespace_declaration() {
                    break;
                }
                self.namespace_member(&mut block, usize::MAX)?;
            }
            block.end_line = self.last_line_before(self.stream.position());
        } else {
            return Err(self.unexpected("Expected ';' or '{' after the namespace name"));
        }

        tracing::trace!(namespace = %block.name, start_line, end_line = block.end_line, "built namespace block");
        Ok(block)
    }

    /// Build one top-level statement of a namespace block, skipping statements that declare nothing.
    fn namespace_member(&mut self, block: &mut FileNamespace, end: usize) -> Result<(), ReflectionError> {
        let start = self.stream.position();
        let Some(kind) = self.stream.current_kind() else {
            return Ok(());
        };
        match kind {
            TokenKind::Keyword(KeywordId::Use) => self.use_statement(&mut block.aliases),
            TokenKind::Keyword(KeywordId::Const) => {
                let scope = Scope {
                    namespace: &block.name,
                    aliases: &block.aliases,
                };
                let site = Site {
                    scope,
                    class: None,
                    function: None,
                };
                let constants = self.constant_list(&site, start, &Modifiers::default())?;
                block.constants.extend(constants.into_iter().map(Rc::new));
                Ok(())
            }
            TokenKind::Keyword(KeywordId::Function) if self.at_function_declaration() => {
                let scope = Scope {
                    namespace: &block.name,
                    aliases: &block.aliases,
                };
                let function = self.function(scope, start)?;
                block.functions.push(Rc::new(function));
                Ok(())
            }
            TokenKind::Keyword(
                KeywordId::Abstract
                | KeywordId::Final
                | KeywordId::Readonly
                | KeywordId::Class
                | KeywordId::Interface
                | KeywordId::Trait,
            ) if self.at_class_declaration() => {
                let scope = Scope {
                    namespace: &block.name,
                    aliases: &block.aliases,
                };
                let class = self.class(scope, start)?;
                block.classes.push(Rc::new(class));
                Ok(())
            }
            _ => {
                if self.at_enum() {
                    tracing::debug!(line = self.stream.line(), "skipping enum declaration");
                }
                self.skip_statement(end);
                Ok(())
            }
        }
    }

    // ========================================================================
    // Imports
    // ========================================================================

    /// `use A\B;`, `use A\B as C, D;`, `use function A\f;`, `use const A\X;`, `use A\{B, C as D, function f};`
    fn use_statement(&mut self, aliases: &mut AliasTable) -> Result<(), ReflectionError> {
        self.bump();
        let kind = self.import_kind().unwrap_or(ImportKind::Class);

        loop {
            let name = self.qualified_name("Expected a name to import")?;
            if self.check_punct(PunctuationId::Backslash) {
                self.bump();
                self.group_use(aliases, kind, names::trim_root(&name))?;
            } else {
                self.import(aliases, kind, names::trim_root(&name).to_string())?;
            }

            if self.match_punct(PunctuationId::Comma) {
                continue;
            }
            if self.check_punct(PunctuationId::Semicolon) || self.stream.is(TokenKind::CloseTag) {
                self.stream.advance();
                return Ok(());
            }
            return Err(self.unexpected("Expected ';' after the use statement"));
        }
    }

    /// The `{ ... }` of a group use; `prefix` is the part before `\{`.
    fn group_use(&mut self, aliases: &mut AliasTable, kind: ImportKind, prefix: &str) -> Result<(), ReflectionError> {
        self.expect_punct(PunctuationId::LBrace, "Expected '{' in a group use")?;
        loop {
            if self.match_punct(PunctuationId::RBrace) {
                return Ok(());
            }
            let item_kind = self.import_kind().unwrap_or(kind);
            let name = self.qualified_name("Expected a name in the group use")?;
            self.import(aliases, item_kind, names::qualify(prefix, &name))?;
            if !self.match_punct(PunctuationId::Comma) {
                return self.expect_punct(PunctuationId::RBrace, "Expected '}' to close the group use");
            }
        }
    }

    fn import_kind(&mut self) -> Option<ImportKind> {
        if self.match_keyword(KeywordId::Function) {
            Some(ImportKind::Function)
        } else if self.match_keyword(KeywordId::Const) {
            Some(ImportKind::Constant)
        } else {
            None
        }
    }

    /// Register `name` under its `as` alias, or under its last segment.
    fn import(&mut self, aliases: &mut AliasTable, kind: ImportKind, name: String) -> Result<(), ReflectionError> {
        let line = self.stream.line();
        let alias = if self.match_keyword(KeywordId::As) {
            self.identifier(false, "Expected an alias after 'as'")?
        } else {
            names::short_name(&name).to_string()
        };
        if !aliases.add(kind, alias.as_str(), &name) {
            return Err(ReflectionError::malformed(
                format!("Cannot use {name} as {alias} because the name is already in use"),
                line,
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Lookahead
    // ========================================================================

    /// `function name(` or `function &name(`, as opposed to a closure.
    fn at_function_declaration(&self) -> bool {
        let Some(mut index) = self.stream.next_significant_index(self.stream.position() + 1) else {
            return false;
        };
        if self.stream.get(index).is_some_and(|t| t.kind.is_punctuation(PunctuationId::Amp)) {
            match self.stream.next_significant_index(index + 1) {
                Some(next) => index = next,
                None => return false,
            }
        }
        self.stream.get(index).is_some_and(|t| t.kind == TokenKind::Ident)
    }

    /// Optional modifiers followed by `class`, `interface` or `trait`.
    fn at_class_declaration(&self) -> bool {
        let mut index = self.stream.position();
        loop {
            let Some(token) = self.stream.get(index) else {
                return false;
            };
            match token.keyword_id() {
                Some(KeywordId::Abstract | KeywordId::Final | KeywordId::Readonly) => {}
                Some(KeywordId::Class | KeywordId::Interface | KeywordId::Trait) => return true,
                _ => return false,
            }
            match self.stream.next_significant_index(index + 1) {
                Some(next) => index = next,
                None => return false,
            }
        }
    }
}

fn is_template_or_trivia(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Whitespace | TokenKind::Comment | TokenKind::OpenTag | TokenKind::CloseTag | TokenKind::InlineHtml
    )
}
