/// Function and method building: signatures, parameters, type hints and static variables.
impl DeclarationBuilder<'_> {
    /// `function [&] name(params) [: type] { body }`. The cursor is on `function`.
    fn function(&mut self, scope: Scope<'_>, start: usize) -> Result<ReflectionFunction, ReflectionError> {
        self.bump();
        let returns_reference = self.match_punct(PunctuationId::Amp);
        let short_name = self.identifier(false, "Could not determine the function name")?;
        let name = names::qualify(scope.namespace, &short_name);

        let context = FunctionContext {
            name: name.clone(),
            qualified: name.clone(),
        };
        let site = Site {
            scope,
            class: None,
            function: Some(&context),
        };
        let (signature, end_line) = self.signature(&site, returns_reference)?;

        tracing::trace!(function = %name, parameters = signature.parameters.len(), "built function");
        Ok(ReflectionFunction {
            namespace_name: scope.namespace.to_string(),
            signature,
            location: self.location(start, end_line),
            name,
        })
    }

    /// A method and the properties its promoted constructor parameters declare. The cursor is on `function`.
    fn method(
        &mut self,
        scope: Scope<'_>,
        class: &ClassContext<'_>,
        modifiers: &Modifiers,
        start: usize,
    ) -> Result<(ReflectionMethod, Vec<ReflectionProperty>), ReflectionError> {
        self.bump();
        let returns_reference = self.match_punct(PunctuationId::Amp);
        let name = self.identifier(true, "Could not determine the method name")?;

        let context = FunctionContext {
            name: name.clone(),
            qualified: format!("{}::{name}", class.name),
        };
        let site = Site {
            scope,
            class: Some(class),
            function: Some(&context),
        };
        let (signature, end_line) = self.signature(&site, returns_reference)?;

        let promoted = signature
            .parameters
            .iter()
            .filter_map(|parameter| {
                let visibility = parameter.promoted?;
                Some(ReflectionProperty {
                    name: parameter.name.clone(),
                    declaring_class: class.name.to_string(),
                    visibility,
                    is_static: false,
                    is_readonly: parameter.promoted_readonly,
                    type_hint: parameter.type_hint.clone(),
                    default: None,
                    promoted: true,
                    location: Location {
                        file_name: Rc::clone(&self.file_name),
                        start_line: parameter.line,
                        end_line: parameter.line,
                        doc_comment: None,
                    },
                })
            })
            .collect();

        let is_php4_constructor =
            class.kind == ClassKind::Class && scope.namespace.is_empty() && name.eq_ignore_ascii_case(class.name);
        let method = ReflectionMethod {
            declaring_class: class.name.to_string(),
            visibility: modifiers.visibility.unwrap_or_default(),
            is_static: modifiers.is_static,
            is_abstract: modifiers.is_abstract || class.kind == ClassKind::Interface,
            is_final: modifiers.is_final,
            is_constructor: name.eq_ignore_ascii_case("__construct") || is_php4_constructor,
            signature,
            location: self.location(start, end_line),
            name,
        };
        Ok((method, promoted))
    }

    /// Everything from `(` to the end of the body (or the `;` of an abstract method).
    ///
    /// Returns the signature and the end line of the declaration.
    fn signature(
        &mut self,
        site: &Site<'_>,
        returns_reference: bool,
    ) -> Result<(FunctionSignature, usize), ReflectionError> {
        if !self.check_punct(PunctuationId::LParen) {
            return Err(self.unexpected("Expected '(' to open the parameter list"));
        }
        let close = self.block_end()?;
        self.bump();
        let parameters = self.parameters(site, close)?;
        self.stream.seek(close);
        self.bump();

        let return_type = if self.match_punct(PunctuationId::Colon) {
            Some(self.type_hint(site.scope)?)
        } else {
            None
        };

        let (static_variables, end_line) = if self.check_punct(PunctuationId::LBrace) {
            let body_end = self.block_end()?;
            let static_variables = self.static_variables(site, body_end)?;
            self.stream.seek(body_end);
            let end_line = self.stream.line();
            self.stream.advance();
            (static_variables, end_line)
        } else if self.check_punct(PunctuationId::Semicolon) {
            let end_line = self.stream.line();
            self.stream.advance();
            (Vec::new(), end_line)
        } else {
            return Err(self.unexpected("Expected a function body or ';'"));
        };

        Ok((
            FunctionSignature {
                parameters,
                returns_reference,
                return_type,
                static_variables,
            },
            end_line,
        ))
    }

    /// Parameters between the cursor and the closing `)` at `close`.
    fn parameters(&mut self, site: &Site<'_>, close: usize) -> Result<Vec<ReflectionParameter>, ReflectionError> {
        let declaring_function = site.function.map_or_else(String::new, |f| f.qualified.clone());
        let mut parameters: Vec<ReflectionParameter> = Vec::new();

        while self.stream.position() < close {
            let line = self.stream.line();
            let modifiers = self.modifiers();

            let type_hint = if self.check_punct(PunctuationId::Amp)
                || self.check_punct(PunctuationId::Ellipsis)
                || self.stream.is(TokenKind::Variable)
            {
                None
            } else {
                Some(self.type_hint(site.scope)?)
            };
            let by_reference = self.match_punct(PunctuationId::Amp);
            let variadic = self.match_punct(PunctuationId::Ellipsis);

            if !self.stream.is(TokenKind::Variable) {
                return Err(self.unexpected("Could not determine the parameter name"));
            }
            let name = self.stream.current_text()?.trim_start_matches('$').to_string();
            self.bump();

            let default = if self.check_op(OperatorId::Eq) {
                self.stream.advance();
                let tokens = self.value_tokens(&[PunctuationId::Comma, PunctuationId::RParen])?;
                Some(self.definition(tokens, site)?)
            } else {
                None
            };

            let class_name = type_hint
                .as_ref()
                .and_then(TypeHint::class_name)
                .and_then(|hinted| bind_relative_class(hinted, site.class));
            let promoted = (modifiers.visibility.is_some() || modifiers.is_readonly)
                .then(|| modifiers.visibility.unwrap_or_default());

            parameters.push(ReflectionParameter {
                position: parameters.len(),
                name,
                type_hint,
                class_name,
                by_reference,
                variadic,
                optional: false,
                default,
                promoted,
                promoted_readonly: modifiers.is_readonly,
                declaring_function: declaring_function.clone(),
                declaring_class: site.class.map(|class| class.name.to_string()),
                line,
                file_name: Rc::clone(&self.file_name),
            });

            if !self.match_punct(PunctuationId::Comma) && self.stream.position() != close {
                return Err(self.unexpected("Expected ',' or ')' in the parameter list"));
            }
        }

        // A parameter is optional only if every parameter after it is optional too.
        let mut rest_optional = true;
        for parameter in parameters.iter_mut().rev() {
            parameter.optional = rest_optional && (parameter.default.is_some() || parameter.variadic);
            rest_optional = parameter.optional;
        }
        Ok(parameters)
    }

    /// `static $a = 1, $b;` declarations in the body ending at `body_end`.
    ///
    /// Bodies of nested closures, functions and anonymous classes belong to those and are stepped over. The cursor
    /// is left inside the body; the caller moves past it.
    fn static_variables(&mut self, site: &Site<'_>, body_end: usize) -> Result<Vec<StaticVariable>, ReflectionError> {
        let mut variables = Vec::new();
        let mut index = self.stream.position() + 1;

        while index < body_end {
            if let Some(nested_end) = self.nested_body_end(index, body_end) {
                index = nested_end + 1;
                continue;
            }
            let is_declaration = self.stream.get(index).is_some_and(|t| t.kind.is_keyword(KeywordId::Static))
                && self
                    .stream
                    .next_significant_index(index + 1)
                    .and_then(|next| self.stream.get(next))
                    .is_some_and(|t| t.kind == TokenKind::Variable);
            if !is_declaration {
                index += 1;
                continue;
            }

            self.stream.seek(index);
            self.bump();
            loop {
                let name = self.stream.current_text()?.trim_start_matches('$').to_string();
                self.bump();
                let definition = if self.check_op(OperatorId::Eq) {
                    self.stream.advance();
                    let tokens = self.value_tokens(&[PunctuationId::Comma, PunctuationId::Semicolon])?;
                    Some(self.definition(tokens, site)?)
                } else {
                    None
                };
                variables.push(StaticVariable { name, definition });

                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
                if !self.stream.is(TokenKind::Variable) {
                    return Err(self.unexpected("Expected a static variable name"));
                }
            }
            index = self.stream.position();
        }
        Ok(variables)
    }

    /// For a `function` or anonymous `class` at `index`, the index of the `}` closing its body.
    ///
    /// Parenthesized and bracketed groups of the header are skipped whole, so a default value or constructor
    /// argument cannot be mistaken for the body. Member accesses such as `Foo::class` are not declarations.
    fn nested_body_end(&mut self, index: usize, limit: usize) -> Option<usize> {
        let keyword = self.stream.get(index)?.keyword_id()?;
        if !matches!(keyword, KeywordId::Function | KeywordId::Class) {
            return None;
        }
        let previous = self.stream.tokens()[..index].iter().rev().find(|t| !t.is_trivia());
        if previous.is_some_and(|t| {
            matches!(
                t.punctuation_id(),
                Some(PunctuationId::DoubleColon | PunctuationId::Arrow | PunctuationId::NullsafeArrow)
            )
        }) {
            return None;
        }

        let mut cursor = index + 1;
        while cursor < limit {
            let token = self.stream.get(cursor)?;
            match token.punctuation_id() {
                Some(PunctuationId::LBrace) => {
                    self.stream.seek(cursor);
                    return self.stream.find_matching_bracket().filter(|&end| end < limit);
                }
                Some(PunctuationId::LParen | PunctuationId::LBracket) => {
                    self.stream.seek(cursor);
                    cursor = self.stream.find_matching_bracket()? + 1;
                }
                Some(PunctuationId::Semicolon) => return None,
                _ => cursor += 1,
            }
        }
        None
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// `T`, `?T`, `A|B|null`, `A&B` or `(A&B)|null`. Class names are resolved; builtin and relative names are not.
    fn type_hint(&mut self, scope: Scope<'_>) -> Result<TypeHint, ReflectionError> {
        let start = self.stream.position();
        let nullable = self.match_punct(PunctuationId::Question);
        let mut types = Vec::new();
        let mut intersection = false;

        loop {
            if self.check_punct(PunctuationId::LParen) {
                // Disjunctive normal form group, kept as written.
                let close = self.block_end()?;
                let group: String = self.stream.tokens()[self.stream.position()..=close]
                    .iter()
                    .filter(|t| !t.is_trivia())
                    .map(|t| t.text.as_str())
                    .collect();
                types.push(group);
                self.stream.seek(close);
                self.bump();
            } else if self.check_keyword(KeywordId::Array)
                || self.check_keyword(KeywordId::Callable)
                || self.check_keyword(KeywordId::Static)
            {
                types.push(self.stream.current_text()?.to_string());
                self.bump();
            } else {
                types.push(self.class_name(scope, "Expected a type")?);
            }

            if self.check_op(OperatorId::Pipe) {
                self.bump();
            } else if self.check_punct(PunctuationId::Amp)
                && !self.peek_is_punct(PunctuationId::Ellipsis)
                && !self.stream.peek_significant().is_some_and(|t| t.kind == TokenKind::Variable)
            {
                intersection = true;
                self.bump();
            } else {
                break;
            }
        }

        let written = self.stream.tokens()[start..self.stream.position()]
            .iter()
            .filter(|t| !t.is_trivia())
            .map(|t| t.text.as_str())
            .collect();
        Ok(TypeHint {
            written,
            types,
            nullable,
            intersection,
        })
    }
}

/// The class a hint names, with `self`/`static` bound to the declaring class and `parent` to its parent.
fn bind_relative_class(hinted: &str, class: Option<&ClassContext<'_>>) -> Option<String> {
    if hinted.eq_ignore_ascii_case("self") || hinted.eq_ignore_ascii_case("static") {
        class.map(|class| class.name.to_string())
    } else if hinted.eq_ignore_ascii_case("parent") {
        class.and_then(|class| class.parent).map(str::to_string)
    } else {
        Some(hinted.to_string())
    }
}
