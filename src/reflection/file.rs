//! Files and the namespace blocks inside them.

use std::rc::Rc;

use super::{ReflectionClass, ReflectionConstant, ReflectionFunction};
use crate::broker::Declaration;
use crate::names::AliasTable;

/// One `namespace` block of a file, or the implicit global block.
#[derive(Debug)]
pub struct FileNamespace {
    /// Namespace name; `""` for the global namespace.
    pub(crate) name: String,
    pub(crate) aliases: AliasTable,
    pub(crate) classes: Vec<Rc<ReflectionClass>>,
    pub(crate) functions: Vec<Rc<ReflectionFunction>>,
    pub(crate) constants: Vec<Rc<ReflectionConstant>>,
    pub(crate) start_line: usize,
    pub(crate) end_line: usize,
    pub(crate) doc_comment: Option<String>,
}

impl FileNamespace {
    pub(crate) fn new(name: String, start_line: usize, doc_comment: Option<String>) -> Self {
        Self {
            name,
            aliases: AliasTable::new(),
            classes: Vec::new(),
            functions: Vec::new(),
            constants: Vec::new(),
            start_line,
            end_line: start_line,
            doc_comment,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_global(&self) -> bool {
        self.name.is_empty()
    }

    /// `use` imports in effect in this block.
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Return `true` if the block neither imports nor declares anything.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty() && self.classes.is_empty() && self.functions.is_empty() && self.constants.is_empty()
    }

    pub fn classes(&self) -> &[Rc<ReflectionClass>] {
        &self.classes
    }

    pub fn functions(&self) -> &[Rc<ReflectionFunction>] {
        &self.functions
    }

    pub fn constants(&self) -> &[Rc<ReflectionConstant>] {
        &self.constants
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn end_line(&self) -> usize {
        self.end_line
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    /// Top-level declarations of this block: constants, then functions, then classes.
    pub fn declarations(&self) -> impl Iterator<Item = Declaration> + '_ {
        let constants = self.constants.iter().cloned().map(Declaration::Constant);
        let functions = self.functions.iter().cloned().map(Declaration::Function);
        let classes = self.classes.iter().cloned().map(Declaration::Class);
        constants.chain(functions).chain(classes)
    }
}

/// A processed source file.
#[derive(Debug)]
pub struct ReflectionFile {
    pub(crate) name: Rc<str>,
    pub(crate) namespaces: Vec<FileNamespace>,
    pub(crate) doc_comment: Option<String>,
}

impl ReflectionFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespaces(&self) -> &[FileNamespace] {
        &self.namespaces
    }

    /// The file-level docblock: the first docblock of the file when it does not belong to a declaration.
    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    /// Every top-level declaration, block by block.
    pub fn declarations(&self) -> Vec<Declaration> {
        self.namespaces.iter().flat_map(FileNamespace::declarations).collect()
    }
}
