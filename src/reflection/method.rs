//! Class methods.

use std::rc::Rc;

use super::{FunctionLike, FunctionSignature, Location, ReflectionClass, Visibility};
use crate::broker::Broker;
use crate::names;

#[derive(Debug)]
pub struct ReflectionMethod {
    pub(crate) name: String,
    pub(crate) declaring_class: String,
    pub(crate) visibility: Visibility,
    pub(crate) is_static: bool,
    pub(crate) is_abstract: bool,
    pub(crate) is_final: bool,
    /// `__construct`, or a method named like its class outside any namespace.
    pub(crate) is_constructor: bool,
    pub(crate) signature: FunctionSignature,
    pub(crate) location: Location,
}

impl ReflectionMethod {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        &self.name
    }

    /// Namespace of the declaring class.
    pub fn namespace_name(&self) -> Option<&str> {
        let namespace = names::namespace_of(&self.declaring_class);
        (!namespace.is_empty()).then_some(namespace)
    }

    pub fn in_namespace(&self) -> bool {
        self.namespace_name().is_some()
    }

    pub fn declaring_class_name(&self) -> &str {
        &self.declaring_class
    }

    pub fn declaring_class<'b>(&self, broker: &'b Broker) -> Option<&'b Rc<ReflectionClass>> {
        broker.get_class(&self.declaring_class)
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn is_protected(&self) -> bool {
        self.visibility == Visibility::Protected
    }

    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn is_constructor(&self) -> bool {
        self.is_constructor
    }

    pub fn is_destructor(&self) -> bool {
        self.name.eq_ignore_ascii_case("__destruct")
    }

    pub fn start_line(&self) -> usize {
        self.location.start_line
    }

    pub fn end_line(&self) -> usize {
        self.location.end_line
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.location.doc_comment.as_deref()
    }

    pub fn file_name(&self) -> &str {
        &self.location.file_name
    }
}

impl FunctionLike for ReflectionMethod {
    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn qualified_name(&self) -> String {
        format!("{}::{}", self.declaring_class, self.name)
    }
}
