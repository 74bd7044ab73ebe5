//! Namespaces as seen across every registered file.

use std::rc::Rc;

use super::{ReflectionClass, ReflectionConstant, ReflectionFunction};
use crate::broker::Broker;

/// Aggregate of every declaration registered under one namespace name.
///
/// A namespace can span any number of blocks in any number of files; this record only collects names, in
/// registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflectionNamespace {
    pub(crate) name: String,
    pub(crate) classes: Vec<String>,
    pub(crate) functions: Vec<String>,
    pub(crate) constants: Vec<String>,
}

impl ReflectionNamespace {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Namespace name; `""` for the global namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_names(&self) -> &[String] {
        &self.classes
    }

    pub fn function_names(&self) -> &[String] {
        &self.functions
    }

    pub fn constant_names(&self) -> &[String] {
        &self.constants
    }

    pub fn classes<'b>(&self, broker: &'b Broker) -> Vec<&'b Rc<ReflectionClass>> {
        self.classes.iter().filter_map(|n| broker.get_class(n)).collect()
    }

    pub fn functions<'b>(&self, broker: &'b Broker) -> Vec<&'b Rc<ReflectionFunction>> {
        self.functions.iter().filter_map(|n| broker.get_function(n)).collect()
    }

    pub fn constants<'b>(&self, broker: &'b Broker) -> Vec<&'b Rc<ReflectionConstant>> {
        self.constants.iter().filter_map(|n| broker.get_constant(n)).collect()
    }
}
