//! The broker: the registry every reflected declaration lives in.
//!
//! A broker owns every processed [`ReflectionFile`] and indexes its top-level declarations by fully-qualified name.
//! Each `(kind, FQN)` maps to exactly one record, and every lookup hands out the same `Rc`. Entries are never
//! replaced or removed: the first registration of a name stays authoritative and a second one is rejected with
//! [`ReflectionError::DuplicateDeclaration`].
//!
//! Values are resolved lazily through the broker. While a value definition is being evaluated its owner sits on the
//! broker's resolution stack, which is how reference cycles and runaway chains are detected.
//!
//! The broker uses `Rc` and interior mutability, so it is neither `Send` nor `Sync`.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use tokenreflect_syntax::lexer::{self, Token};

use crate::builder;
use crate::config::BrokerConfig;
use crate::error::ReflectionError;
use crate::names;
use crate::reflection::{ReflectionClass, ReflectionConstant, ReflectionFile, ReflectionFunction, ReflectionNamespace};
use crate::value::Value;

/// What a name refers to; used as registry key, in cycle detection and in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Namespace,
    Class,
    Function,
    Constant,
    ClassConstant,
    Method,
    Property,
    Parameter,
    StaticVariable,
    File,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolKind::Namespace => "namespace",
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
            SymbolKind::Constant => "constant",
            SymbolKind::ClassConstant => "class constant",
            SymbolKind::Method => "method",
            SymbolKind::Property => "property",
            SymbolKind::Parameter => "parameter",
            SymbolKind::StaticVariable => "static variable",
            SymbolKind::File => "file",
        })
    }
}

/// A top-level declaration as stored in the registry.
#[derive(Debug, Clone)]
pub enum Declaration {
    Class(Rc<ReflectionClass>),
    Function(Rc<ReflectionFunction>),
    Constant(Rc<ReflectionConstant>),
}

impl Declaration {
    pub fn kind(&self) -> SymbolKind {
        match self {
            Declaration::Class(_) => SymbolKind::Class,
            Declaration::Function(_) => SymbolKind::Function,
            Declaration::Constant(_) => SymbolKind::Constant,
        }
    }

    /// Fully-qualified name.
    pub fn name(&self) -> &str {
        match self {
            Declaration::Class(class) => class.name(),
            Declaration::Function(function) => function.name(),
            Declaration::Constant(constant) => constant.name(),
        }
    }

    pub fn namespace_name(&self) -> &str {
        names::namespace_of(self.name())
    }

    /// Return `true` if both refer to the same record.
    pub fn ptr_eq(&self, other: &Declaration) -> bool {
        match (self, other) {
            (Declaration::Class(a), Declaration::Class(b)) => Rc::ptr_eq(a, b),
            (Declaration::Function(a), Declaration::Function(b)) => Rc::ptr_eq(a, b),
            (Declaration::Constant(a), Declaration::Constant(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn key(&self) -> String {
        registry_key(self.kind(), self.name())
    }
}

/// Classes, functions and namespaces fold case; constants keep the case of their short name.
fn registry_key(kind: SymbolKind, name: &str) -> String {
    match kind {
        SymbolKind::Constant => names::constant_key(name),
        _ => names::class_key(name),
    }
}

/// Append-only map from registry key to record, iterable in registration order.
#[derive(Debug)]
struct SymbolMap<T> {
    index: HashMap<String, usize>,
    items: Vec<Rc<T>>,
}

impl<T> Default for SymbolMap<T> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            items: Vec::new(),
        }
    }
}

impl<T> SymbolMap<T> {
    fn get(&self, key: &str) -> Option<&Rc<T>> {
        self.index.get(key).map(|&id| &self.items[id])
    }

    fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    fn insert(&mut self, key: String, item: Rc<T>) {
        let id = self.items.len();
        self.index.insert(key, id);
        self.items.push(item);
    }
}

/// Registry of reflected declarations.
///
/// ## Examples
/// ```rust
/// use tokenreflect::{Broker, Value};
///
/// let mut broker = Broker::new();
/// broker
///     .process_source("<?php namespace App; const A = B; const B = 5;", "consts.php")
///     .unwrap();
/// let a = broker.get_constant("App\\A").unwrap();
/// assert_eq!(a.value(&broker).unwrap(), &Value::Int(5));
/// ```
#[derive(Debug, Default)]
pub struct Broker {
    config: BrokerConfig,
    files: Vec<ReflectionFile>,
    file_index: HashMap<String, usize>,
    classes: SymbolMap<ReflectionClass>,
    functions: SymbolMap<ReflectionFunction>,
    constants: SymbolMap<ReflectionConstant>,
    namespace_index: HashMap<String, usize>,
    namespaces: Vec<ReflectionNamespace>,
    /// Owners whose value definitions are being evaluated, outermost first.
    resolving: RefCell<Vec<(SymbolKind, String)>>,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BrokerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Lex `source` and register its declarations. See [`Broker::process_tokens`].
    pub fn process_source(&mut self, source: &str, file_name: &str) -> Result<Vec<Declaration>, ReflectionError> {
        let tokens = lexer::lex(source)?;
        self.process_tokens(tokens, file_name)
    }

    /// Build one file from its tokens and register every top-level declaration in it.
    ///
    /// Registration is all or nothing: when the file is malformed, or any of its declarations collides with a
    /// registered one or with another declaration of the same file, nothing from it is registered.
    ///
    /// ## Errors
    /// - [`ReflectionError::DuplicateDeclaration`] for a file name or declaration that is already registered.
    /// - Any structural error from building the file.
    #[tracing::instrument(skip_all, fields(file = file_name))]
    pub fn process_tokens(&mut self, tokens: Vec<Token>, file_name: &str) -> Result<Vec<Declaration>, ReflectionError> {
        if self.file_index.contains_key(file_name) {
            tracing::warn!("file is already registered");
            return Err(ReflectionError::DuplicateDeclaration {
                kind: SymbolKind::File,
                name: file_name.to_string(),
            });
        }

        let file = builder::build_file(tokens, file_name, &self.config)?;
        let declarations = file.declarations();

        let mut seen = HashSet::new();
        for declaration in &declarations {
            let key = (declaration.kind(), declaration.key());
            if self.is_registered(declaration) || !seen.insert(key) {
                tracing::warn!(kind = %declaration.kind(), name = declaration.name(), "rejecting duplicate declaration");
                return Err(ReflectionError::DuplicateDeclaration {
                    kind: declaration.kind(),
                    name: declaration.name().to_string(),
                });
            }
        }

        for block in file.namespaces() {
            self.namespace_entry(block.name());
        }
        for declaration in &declarations {
            self.insert(declaration.clone());
        }
        tracing::debug!(declarations = declarations.len(), namespaces = file.namespaces().len(), "registered file");

        self.file_index.insert(file_name.to_string(), self.files.len());
        self.files.push(file);
        Ok(declarations)
    }

    /// Register a single declaration.
    ///
    /// ## Errors
    /// [`ReflectionError::DuplicateDeclaration`] if a declaration of the same kind and name exists; the registered
    /// one is kept.
    pub fn register(&mut self, declaration: Declaration) -> Result<(), ReflectionError> {
        if self.is_registered(&declaration) {
            tracing::warn!(kind = %declaration.kind(), name = declaration.name(), "rejecting duplicate declaration");
            return Err(ReflectionError::DuplicateDeclaration {
                kind: declaration.kind(),
                name: declaration.name().to_string(),
            });
        }
        self.namespace_entry(declaration.namespace_name());
        self.insert(declaration);
        Ok(())
    }

    fn is_registered(&self, declaration: &Declaration) -> bool {
        let key = declaration.key();
        match declaration {
            Declaration::Class(_) => self.classes.contains(&key),
            Declaration::Function(_) => self.functions.contains(&key),
            Declaration::Constant(_) => self.constants.contains(&key),
        }
    }

    /// Insert a declaration that is known not to collide.
    fn insert(&mut self, declaration: Declaration) {
        let key = declaration.key();
        let namespace = self.namespace_entry(declaration.namespace_name());
        let name = declaration.name().to_string();
        tracing::debug!(kind = %declaration.kind(), name = %name, "registered declaration");
        match declaration {
            Declaration::Class(class) => {
                self.namespaces[namespace].classes.push(name);
                self.classes.insert(key, class);
            }
            Declaration::Function(function) => {
                self.namespaces[namespace].functions.push(name);
                self.functions.insert(key, function);
            }
            Declaration::Constant(constant) => {
                self.namespaces[namespace].constants.push(name);
                self.constants.insert(key, constant);
            }
        }
    }

    /// Index of the aggregate for `name`, created on first use.
    fn namespace_entry(&mut self, name: &str) -> usize {
        let key = names::class_key(name);
        if let Some(&id) = self.namespace_index.get(&key) {
            return id;
        }
        let id = self.namespaces.len();
        self.namespaces.push(ReflectionNamespace::new(names::trim_root(name)));
        self.namespace_index.insert(key, id);
        id
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// The declaration registered as `name`. Only classes, functions and constants are declarations.
    pub fn lookup(&self, kind: SymbolKind, name: &str) -> Option<Declaration> {
        let key = registry_key(kind, name);
        match kind {
            SymbolKind::Class => self.classes.get(&key).cloned().map(Declaration::Class),
            SymbolKind::Function => self.functions.get(&key).cloned().map(Declaration::Function),
            SymbolKind::Constant => self.constants.get(&key).cloned().map(Declaration::Constant),
            _ => None,
        }
    }

    /// Every declaration of `kind`, in registration order.
    pub fn all_of_kind(&self, kind: SymbolKind) -> Vec<Declaration> {
        match kind {
            SymbolKind::Class => self.classes.items.iter().cloned().map(Declaration::Class).collect(),
            SymbolKind::Function => self.functions.items.iter().cloned().map(Declaration::Function).collect(),
            SymbolKind::Constant => self.constants.items.iter().cloned().map(Declaration::Constant).collect(),
            _ => Vec::new(),
        }
    }

    /// Class, interface or trait by name (case-insensitive, leading `\` optional).
    pub fn get_class(&self, name: &str) -> Option<&Rc<ReflectionClass>> {
        self.classes.get(&names::class_key(name))
    }

    pub fn get_function(&self, name: &str) -> Option<&Rc<ReflectionFunction>> {
        self.functions.get(&names::class_key(name))
    }

    /// Top-level constant by name; the short name is case-sensitive.
    pub fn get_constant(&self, name: &str) -> Option<&Rc<ReflectionConstant>> {
        self.constants.get(&names::constant_key(name))
    }

    pub fn get_namespace(&self, name: &str) -> Option<&ReflectionNamespace> {
        let id = *self.namespace_index.get(&names::class_key(name))?;
        self.namespaces.get(id)
    }

    /// Every namespace seen so far, the global one as `""`.
    pub fn namespaces(&self) -> &[ReflectionNamespace] {
        &self.namespaces
    }

    pub fn get_file(&self, name: &str) -> Option<&ReflectionFile> {
        let id = *self.file_index.get(name)?;
        self.files.get(id)
    }

    pub fn files(&self) -> &[ReflectionFile] {
        &self.files
    }

    /// Constant `name` of class `class`, searched along the class's declaring chain.
    ///
    /// ## Errors
    /// [`ReflectionError::SymbolNotFound`] if the class is not registered or no class in its chain declares `name`.
    pub fn class_constant(&self, class: &str, name: &str) -> Result<&ReflectionConstant, ReflectionError> {
        let reflection = self
            .get_class(class)
            .ok_or_else(|| ReflectionError::not_found(SymbolKind::Class, names::trim_root(class)))?;
        reflection.constant_reflection(name, self)
    }

    // ========================================================================
    // Lazy resolution
    // ========================================================================

    /// Value of the top-level constant `name`, or of `fallback` when `name` is not registered.
    pub(crate) fn constant_value(&self, name: &str, fallback: Option<&str>) -> Result<&Value, ReflectionError> {
        let constant = self
            .get_constant(name)
            .or_else(|| fallback.and_then(|global| self.get_constant(global)))
            .ok_or_else(|| ReflectionError::not_found(SymbolKind::Constant, names::trim_root(name)))?;
        constant.value(self)
    }

    /// Mark `(kind, key)` as being evaluated until the returned guard is dropped.
    ///
    /// ## Errors
    /// - [`ReflectionError::CircularConstantReference`] if `(kind, key)` is already being evaluated.
    /// - [`ReflectionError::ResolutionDepthExceeded`] if the stack is at `max_resolution_depth`.
    pub(crate) fn enter(&self, kind: SymbolKind, key: &str) -> Result<ResolutionGuard<'_>, ReflectionError> {
        let mut resolving = self.resolving.borrow_mut();
        if let Some(at) = resolving.iter().position(|(k, name)| *k == kind && name == key) {
            let mut chain: Vec<&str> = resolving[at..].iter().map(|(_, name)| name.as_str()).collect();
            chain.push(key);
            return Err(ReflectionError::CircularConstantReference {
                chain: chain.join(" -> "),
            });
        }
        if resolving.len() >= self.config.max_resolution_depth {
            return Err(ReflectionError::ResolutionDepthExceeded {
                name: key.to_string(),
                limit: self.config.max_resolution_depth,
            });
        }
        resolving.push((kind, key.to_string()));
        Ok(ResolutionGuard {
            resolving: &self.resolving,
        })
    }
}

/// Pops its entry off the broker's resolution stack when dropped.
pub(crate) struct ResolutionGuard<'b> {
    resolving: &'b RefCell<Vec<(SymbolKind, String)>>,
}

impl Drop for ResolutionGuard<'_> {
    fn drop(&mut self) {
        self.resolving.borrow_mut().pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broker_with(files: &[(&str, &str)]) -> Broker {
        let mut broker = Broker::new();
        for (name, source) in files {
            broker.process_source(source, name).unwrap();
        }
        broker
    }

    #[test]
    fn test_process_registers_top_level_declarations() {
        let broker = broker_with(&[(
            "a.php",
            "<?php\nnamespace App;\nconst VERSION = '1.0';\nfunction boot() {}\nclass Kernel {}\ninterface Runs {}\n",
        )]);

        assert!(broker.get_constant("App\\VERSION").is_some());
        assert!(broker.get_function("App\\boot").is_some());
        assert!(broker.get_class("App\\Kernel").is_some());
        assert!(broker.get_class("App\\Runs").unwrap().is_interface());
        assert_eq!(broker.files().len(), 1);
        assert_eq!(broker.get_file("a.php").unwrap().namespaces().len(), 1);
    }

    #[test]
    fn test_lookup_folds_case_except_constant_short_names() {
        let broker = broker_with(&[("a.php", "<?php namespace App; const Mode = 1; class Kernel {}")]);

        let first = broker.lookup(SymbolKind::Class, "App\\Kernel").unwrap();
        let second = broker.lookup(SymbolKind::Class, "\\app\\KERNEL").unwrap();
        assert!(first.ptr_eq(&second));

        assert!(broker.get_constant("APP\\Mode").is_some());
        assert!(broker.get_constant("App\\MODE").is_none());
        assert!(broker.lookup(SymbolKind::Namespace, "App").is_none());
    }

    #[test]
    fn test_duplicate_across_files_keeps_first() {
        let mut broker = broker_with(&[("a.php", "<?php class Kernel { const V = 1; }")]);
        let first = Rc::clone(broker.get_class("Kernel").unwrap());

        let err = broker
            .process_source("<?php class kernel { const V = 2; }", "b.php")
            .unwrap_err();
        assert_eq!(
            err,
            ReflectionError::DuplicateDeclaration {
                kind: SymbolKind::Class,
                name: "kernel".to_string(),
            }
        );
        assert!(Rc::ptr_eq(&first, broker.get_class("Kernel").unwrap()));
        assert!(broker.get_file("b.php").is_none());
    }

    #[test]
    fn test_file_registration_is_atomic() {
        let mut broker = broker_with(&[("a.php", "<?php const TAKEN = 1;")]);

        let err = broker
            .process_source("<?php const FRESH = 1; function fresh() {} const TAKEN = 2;", "b.php")
            .unwrap_err();
        assert!(matches!(err, ReflectionError::DuplicateDeclaration { kind: SymbolKind::Constant, .. }));
        assert!(broker.get_constant("FRESH").is_none());
        assert!(broker.get_function("fresh").is_none());

        let err = broker
            .process_source("<?php function twice() {} function TWICE() {}", "c.php")
            .unwrap_err();
        assert!(matches!(err, ReflectionError::DuplicateDeclaration { kind: SymbolKind::Function, .. }));
        assert!(broker.get_function("twice").is_none());

        let err = broker
            .process_source("<?php namespace Half; class Done {} class {}", "d.php")
            .unwrap_err();
        assert!(matches!(err, ReflectionError::MalformedDeclaration { .. }));
        assert!(broker.get_class("Half\\Done").is_none());
        assert!(broker.get_namespace("Half").is_none());
    }

    #[test]
    fn test_same_file_name_twice_is_rejected() {
        let mut broker = broker_with(&[("a.php", "<?php const A = 1;")]);
        let err = broker.process_source("<?php const B = 1;", "a.php").unwrap_err();
        assert_eq!(
            err,
            ReflectionError::DuplicateDeclaration {
                kind: SymbolKind::File,
                name: "a.php".to_string(),
            }
        );
        assert!(broker.get_constant("B").is_none());
    }

    #[test]
    fn test_register_single_declaration() {
        let mut source = Broker::new();
        let declarations = source
            .process_source("<?php namespace Lib; function helper() {}", "lib.php")
            .unwrap();
        let helper = declarations.into_iter().next().unwrap();

        let mut broker = Broker::new();
        broker.register(helper.clone()).unwrap();
        assert!(broker.lookup(SymbolKind::Function, "Lib\\helper").unwrap().ptr_eq(&helper));
        assert_eq!(broker.get_namespace("lib").unwrap().function_names(), ["Lib\\helper"]);

        let err = broker.register(helper).unwrap_err();
        assert!(matches!(err, ReflectionError::DuplicateDeclaration { .. }));
    }

    #[test]
    fn test_all_of_kind_in_registration_order() {
        let broker = broker_with(&[
            ("a.php", "<?php class Zeta {} class Alpha {}"),
            ("b.php", "<?php namespace N; class Mid {}"),
        ]);
        let names: Vec<String> = broker
            .all_of_kind(SymbolKind::Class)
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, ["Zeta", "Alpha", "N\\Mid"]);
        assert!(broker.all_of_kind(SymbolKind::Method).is_empty());
    }

    #[test]
    fn test_namespaces_aggregate_across_files() {
        let broker = broker_with(&[
            ("a.php", "<?php namespace Shop; class Cart {}"),
            ("b.php", "<?php namespace Shop { function total() {} } namespace { const DEBUG = true; }"),
        ]);

        let shop = broker.get_namespace("shop").unwrap();
        assert_eq!(shop.name(), "Shop");
        assert_eq!(shop.class_names(), ["Shop\\Cart"]);
        assert_eq!(shop.function_names(), ["Shop\\total"]);
        assert_eq!(shop.classes(&broker).len(), 1);

        let global = broker.get_namespace("").unwrap();
        assert_eq!(global.constant_names(), ["DEBUG"]);
        assert_eq!(broker.namespaces().len(), 2);
    }

    #[test]
    fn test_class_constant_lookup() {
        let broker = broker_with(&[("a.php", "<?php namespace N; class A { const C = 1; } class B extends A {}")]);

        let constant = broker.class_constant("\\N\\B", "C").unwrap();
        assert_eq!(constant.declaring_class_name(), Some("N\\A"));

        let err = broker.class_constant("N\\Missing", "C").unwrap_err();
        assert_eq!(err, ReflectionError::not_found(SymbolKind::Class, "N\\Missing"));
    }

    #[test]
    fn test_constant_value_uses_fallback() {
        let broker = broker_with(&[("a.php", "<?php const LIMIT = 10;")]);
        assert_eq!(broker.constant_value("N\\LIMIT", Some("LIMIT")).unwrap(), &Value::Int(10));

        let err = broker.constant_value("\\N\\LIMIT", None).unwrap_err();
        assert_eq!(err, ReflectionError::not_found(SymbolKind::Constant, "N\\LIMIT"));
    }

    #[test]
    fn test_enter_detects_reentry_and_unwinds() {
        let broker = Broker::new();
        {
            let _a = broker.enter(SymbolKind::Constant, "A").unwrap();
            let _b = broker.enter(SymbolKind::Constant, "B").unwrap();
            let _same_name_other_kind = broker.enter(SymbolKind::ClassConstant, "A").unwrap();
            let err = broker.enter(SymbolKind::Constant, "A").err().unwrap();
            assert_eq!(
                err,
                ReflectionError::CircularConstantReference {
                    chain: "A -> B -> A -> A".to_string(),
                }
            );
        }
        assert!(broker.resolving.borrow().is_empty());
        assert!(broker.enter(SymbolKind::Constant, "A").is_ok());
    }

    #[test]
    fn test_enter_respects_depth_limit() {
        let broker = Broker::with_config(BrokerConfig::new().with_max_resolution_depth(2));
        let _a = broker.enter(SymbolKind::Constant, "A").unwrap();
        let _b = broker.enter(SymbolKind::Constant, "B").unwrap();
        let err = broker.enter(SymbolKind::Constant, "C").err().unwrap();
        assert_eq!(
            err,
            ReflectionError::ResolutionDepthExceeded {
                name: "C".to_string(),
                limit: 2,
            }
        );
    }

    #[test]
    fn test_symbol_kind_display() {
        assert_eq!(SymbolKind::ClassConstant.to_string(), "class constant");
        assert_eq!(SymbolKind::StaticVariable.to_string(), "static variable");
        assert_eq!(SymbolKind::Class.to_string(), "class");
    }
}
