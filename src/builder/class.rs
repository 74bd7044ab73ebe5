/// Class-like building: classes, interfaces and traits with their members.
impl DeclarationBuilder<'_> {
    /// `[abstract|final|readonly] class Name [extends Parent] [implements A, B] { ... }`, `interface Name [extends A,
    /// B] { ... }` or `trait Name { ... }`. The cursor is on the first modifier or keyword.
    fn class(&mut self, scope: Scope<'_>, start: usize) -> Result<ReflectionClass, ReflectionError> {
        let (mut is_abstract, mut is_final, mut is_readonly) = (false, false, false);
        loop {
            if self.match_keyword(KeywordId::Abstract) {
                is_abstract = true;
            } else if self.match_keyword(KeywordId::Final) {
                is_final = true;
            } else if self.match_keyword(KeywordId::Readonly) {
                is_readonly = true;
            } else {
                break;
            }
        }

        let kind = if self.match_keyword(KeywordId::Class) {
            ClassKind::Class
        } else if self.match_keyword(KeywordId::Interface) {
            ClassKind::Interface
        } else if self.match_keyword(KeywordId::Trait) {
            ClassKind::Trait
        } else {
            return Err(self.unexpected("Expected 'class', 'interface' or 'trait'"));
        };
        let short_name = self.identifier(false, "Could not determine the class name")?;
        let name = names::qualify(scope.namespace, &short_name);

        let mut parent_class = None;
        let mut interfaces = Vec::new();
        if self.match_keyword(KeywordId::Extends) {
            match kind {
                ClassKind::Class => parent_class = Some(self.class_name(scope, "Expected a parent class name")?),
                ClassKind::Interface => interfaces = self.class_name_list(scope, "Expected an interface name")?,
                ClassKind::Trait => return Err(self.unexpected("A trait cannot extend anything")),
            }
        }
        if self.check_keyword(KeywordId::Implements) {
            if kind != ClassKind::Class {
                return Err(self.unexpected("Only classes can implement interfaces"));
            }
            self.bump();
            interfaces = self.class_name_list(scope, "Expected an interface name")?;
        }

        if !self.check_punct(PunctuationId::LBrace) {
            return Err(self.unexpected("Expected '{' to open the class body"));
        }
        let close = self.block_end()?;
        self.bump();

        let context = ClassContext {
            name: &name,
            parent: parent_class.as_deref(),
            kind,
        };
        let mut members = ClassMembers::default();
        loop {
            self.stream.skip_whitespace_and_comments();
            if self.stream.position() >= close {
                break;
            }
            self.class_member(scope, &context, &mut members)?;
        }
        self.stream.seek(close);
        let end_line = self.line_at(close);
        self.stream.advance();

        tracing::trace!(class = %name, ?kind, end_line, "built class-like");
        Ok(ReflectionClass {
            namespace_name: scope.namespace.to_string(),
            kind,
            is_abstract,
            is_final,
            is_readonly,
            parent_class,
            interfaces,
            traits: members.traits,
            constants: members.constants,
            properties: members.properties,
            methods: members.methods,
            location: self.location(start, end_line),
            name,
        })
    }

    fn class_member(
        &mut self,
        scope: Scope<'_>,
        class: &ClassContext<'_>,
        members: &mut ClassMembers,
    ) -> Result<(), ReflectionError> {
        let start = self.stream.position();
        if self.match_punct(PunctuationId::Semicolon) {
            return Ok(());
        }
        let modifiers = self.modifiers();

        match self.stream.current_kind() {
            Some(TokenKind::Keyword(KeywordId::Use)) if modifiers.is_empty() => self.trait_use(scope, members),
            Some(TokenKind::Keyword(KeywordId::Const)) => {
                let site = Site {
                    scope,
                    class: Some(class),
                    function: None,
                };
                for constant in self.constant_list(&site, start, &modifiers)? {
                    if members.constants.iter().any(|c| c.name == constant.name) {
                        return Err(duplicate(SymbolKind::ClassConstant, format!("{}::{}", class.name, constant.name)));
                    }
                    members.constants.push(constant);
                }
                Ok(())
            }
            Some(TokenKind::Keyword(KeywordId::Function)) => {
                let (method, promoted) = self.method(scope, class, &modifiers, start)?;
                if members.methods.iter().any(|m| m.name.eq_ignore_ascii_case(&method.name)) {
                    return Err(duplicate(SymbolKind::Method, format!("{}::{}", class.name, method.name)));
                }
                members.methods.push(method);
                for property in promoted {
                    add_property(class, members, property)?;
                }
                Ok(())
            }
            Some(TokenKind::Variable) if !modifiers.is_empty() => {
                for property in self.property_list(scope, class, &modifiers, None, start)? {
                    add_property(class, members, property)?;
                }
                Ok(())
            }
            Some(_) if !modifiers.is_empty() => {
                let type_hint = self.type_hint(scope)?;
                for property in self.property_list(scope, class, &modifiers, Some(type_hint), start)? {
                    add_property(class, members, property)?;
                }
                Ok(())
            }
            _ => Err(self.unexpected("Expected a class member")),
        }
    }

    /// `public`, `protected`, `private`, `static`, `abstract`, `final`, `readonly` and `var`, in any order.
    fn modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        loop {
            match self.stream.current_kind().and_then(|kind| kind.keyword_id()) {
                Some(KeywordId::Public) => modifiers.visibility = Some(Visibility::Public),
                Some(KeywordId::Protected) => modifiers.visibility = Some(Visibility::Protected),
                Some(KeywordId::Private) => modifiers.visibility = Some(Visibility::Private),
                Some(KeywordId::Static) => modifiers.is_static = true,
                Some(KeywordId::Abstract) => modifiers.is_abstract = true,
                Some(KeywordId::Final) => modifiers.is_final = true,
                Some(KeywordId::Readonly) => modifiers.is_readonly = true,
                Some(KeywordId::Var) => modifiers.var = true,
                _ => return modifiers,
            }
            self.bump();
        }
    }

    /// `use A, B;` or `use A, B { A::x insteadof B; B::x as y; }` inside a class body.
    fn trait_use(&mut self, scope: Scope<'_>, members: &mut ClassMembers) -> Result<(), ReflectionError> {
        self.bump();
        members.traits.extend(self.class_name_list(scope, "Expected a trait name")?);
        if self.check_punct(PunctuationId::LBrace) {
            // Adaptation rules change visibility and aliases, not which traits are used.
            let close = self.block_end()?;
            self.stream.seek(close);
            self.stream.advance();
            Ok(())
        } else {
            self.expect_punct(PunctuationId::Semicolon, "Expected ';' after the trait list")
        }
    }

    /// `$a = 1, $b;` after the modifiers and optional type of a property declaration.
    fn property_list(
        &mut self,
        scope: Scope<'_>,
        class: &ClassContext<'_>,
        modifiers: &Modifiers,
        type_hint: Option<TypeHint>,
        start: usize,
    ) -> Result<Vec<ReflectionProperty>, ReflectionError> {
        let site = Site {
            scope,
            class: Some(class),
            function: None,
        };
        let mut properties = Vec::new();
        loop {
            if !self.stream.is(TokenKind::Variable) {
                return Err(self.unexpected("Could not determine the property name"));
            }
            let name = self.stream.current_text()?.trim_start_matches('$').to_string();
            self.bump();

            let default = if self.check_op(OperatorId::Eq) {
                self.stream.advance();
                let tokens = self.value_tokens(&[PunctuationId::Comma, PunctuationId::Semicolon])?;
                Some(self.definition(tokens, &site)?)
            } else {
                None
            };
            properties.push(ReflectionProperty {
                name,
                declaring_class: class.name.to_string(),
                visibility: modifiers.visibility.unwrap_or_default(),
                is_static: modifiers.is_static,
                is_readonly: modifiers.is_readonly,
                type_hint: type_hint.clone(),
                default,
                promoted: false,
                location: self.location(start, self.stream.line()),
            });

            if self.match_punct(PunctuationId::Comma) {
                continue;
            }
            self.expect_punct(PunctuationId::Semicolon, "Expected ';' after the property declaration")?;
            return Ok(properties);
        }
    }
}

fn duplicate(kind: SymbolKind, name: String) -> ReflectionError {
    ReflectionError::DuplicateDeclaration { kind, name }
}

fn add_property(
    class: &ClassContext<'_>,
    members: &mut ClassMembers,
    property: ReflectionProperty,
) -> Result<(), ReflectionError> {
    if members.properties.iter().any(|p| p.name == property.name) {
        return Err(duplicate(SymbolKind::Property, format!("{}::${}", class.name, property.name)));
    }
    members.properties.push(property);
    Ok(())
}
