/// Builder core types and entrypoint.
///
/// This chunk defines [`DeclarationBuilder`] and the small context types the other chunks pass around while a
/// declaration is being built.
///
/// ## Notes
/// - This file is `include!`'d into `crate::builder` to keep all builder methods in a single module.

/// Naming context of the namespace block being built.
#[derive(Clone, Copy)]
struct Scope<'s> {
    namespace: &'s str,
    aliases: &'s AliasTable,
}

/// The class-like whose body is being built.
struct ClassContext<'c> {
    /// FQN.
    name: &'c str,
    /// Resolved parent, for `parent::` references.
    parent: Option<&'c str>,
    kind: ClassKind,
}

/// The function or method whose signature is being built.
struct FunctionContext {
    /// What `__FUNCTION__` reports: the FQN of a function, the bare name of a method.
    name: String,
    /// What `__METHOD__` reports: `N\f` or `N\C::m`. Also the owner name of parameters.
    qualified: String,
}

/// Everything a value definition needs to know about where it was written.
#[derive(Clone, Copy)]
struct Site<'s> {
    scope: Scope<'s>,
    class: Option<&'s ClassContext<'s>>,
    function: Option<&'s FunctionContext>,
}

/// Modifiers collected in front of a class member.
#[derive(Debug, Default)]
struct Modifiers {
    visibility: Option<Visibility>,
    is_static: bool,
    is_abstract: bool,
    is_final: bool,
    is_readonly: bool,
    /// `var` was written (a public property).
    var: bool,
}

impl Modifiers {
    fn is_empty(&self) -> bool {
        self.visibility.is_none()
            && !self.is_static
            && !self.is_abstract
            && !self.is_final
            && !self.is_readonly
            && !self.var
    }
}

/// Members of a class-like body, in declaration order.
#[derive(Default)]
struct ClassMembers {
    constants: Vec<ReflectionConstant>,
    properties: Vec<ReflectionProperty>,
    methods: Vec<ReflectionMethod>,
    traits: Vec<String>,
}

/// Builder state for one file.
///
/// ## Notes
/// - One builder consumes one token stream; it is not reused.
/// - Errors are not recovered from: the first malformed declaration aborts the file.
pub struct DeclarationBuilder<'c> {
    stream: TokenStream,
    file_name: Rc<str>,
    config: &'c BrokerConfig,
}

impl<'c> DeclarationBuilder<'c> {
    /// Create a builder over the tokens of one file.
    ///
    /// ## Parameters
    /// - `tokens`: every token of the file, trivia included (see `tokenreflect_syntax::lexer`).
    /// - `file_name`: recorded on every declaration and used for `__FILE__` / `__DIR__`.
    pub fn new(tokens: Vec<Token>, file_name: &str, config: &'c BrokerConfig) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            file_name: Rc::from(file_name),
            config,
        }
    }

    /// Build the whole file.
    ///
    /// ## Errors
    /// - [`ReflectionError::MalformedDeclaration`] when a declaration is missing a required token.
    /// - [`ReflectionError::UnexpectedEndOfStream`] when the file ends inside a declaration.
    /// - [`ReflectionError::DuplicateDeclaration`] for a member declared twice in one class-like.
    pub fn build(mut self) -> Result<ReflectionFile, ReflectionError> {
        let doc_comment = self.file_doc_comment();
        let mut namespaces = Vec::new();
        let mut implicit: Option<FileNamespace> = None;

        loop {
            self.skip_template();
            if self.stream.at_end() {
                break;
            }
            if self.at_namespace_declaration() {
                namespaces.extend(implicit.take().filter(|block| !block.is_empty()));
                namespaces.push(self.namespace_block()?);
                continue;
            }
            let line = self.stream.line();
            let block = implicit.get_or_insert_with(|| FileNamespace::new(String::new(), line, None));
            self.namespace_member(block, usize::MAX)?;
            block.end_line = self.last_line_before(self.stream.position());
        }

        match implicit {
            Some(block) if !block.is_empty() || namespaces.is_empty() => namespaces.push(block),
            None if namespaces.is_empty() => namespaces.push(FileNamespace::new(String::new(), 1, None)),
            _ => {}
        }

        Ok(ReflectionFile {
            name: self.file_name,
            namespaces,
            doc_comment,
        })
    }
}
