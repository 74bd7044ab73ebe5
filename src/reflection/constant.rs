//! Top-level and class constants.

use std::rc::Rc;

use super::{Location, ReflectionClass, Visibility};
use crate::broker::{Broker, SymbolKind};
use crate::error::ReflectionError;
use crate::names;
use crate::value::{Value, ValueDefinition};

/// A `const` declaration, either top-level (`const FOO = 1;`) or inside a class-like.
#[derive(Debug)]
pub struct ReflectionConstant {
    /// FQN for top-level constants, the short name for class constants.
    pub(crate) name: String,
    pub(crate) namespace_name: String,
    pub(crate) declaring_class: Option<String>,
    pub(crate) visibility: Visibility,
    pub(crate) is_final: bool,
    pub(crate) definition: ValueDefinition,
    pub(crate) location: Location,
}

impl ReflectionConstant {
    /// FQN (`N\FOO`) for a top-level constant, the bare name for a class constant.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        names::short_name(&self.name)
    }

    /// `None` in the global namespace.
    pub fn namespace_name(&self) -> Option<&str> {
        (!self.namespace_name.is_empty()).then_some(self.namespace_name.as_str())
    }

    pub fn in_namespace(&self) -> bool {
        !self.namespace_name.is_empty()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Name-resolved source text of the value (`"1"`, `"N\X"`, `"Foo\Bar::Y"`).
    pub fn value_definition(&self) -> &str {
        self.definition.text()
    }

    pub fn definition(&self) -> &ValueDefinition {
        &self.definition
    }

    /// The constant's value, evaluated on first request and memoized.
    ///
    /// ## Errors
    /// - [`ReflectionError::SymbolNotFound`] if a referenced constant or class is not registered.
    /// - [`ReflectionError::CircularConstantReference`] if the definition refers back to itself.
    /// - [`ReflectionError::UnsupportedExpression`] / [`ReflectionError::InvalidLiteral`] for definitions outside the
    ///   evaluable subset.
    pub fn value(&self, broker: &Broker) -> Result<&Value, ReflectionError> {
        match &self.declaring_class {
            Some(class) => {
                let key = format!("{class}::{}", self.name);
                self.definition.evaluate(SymbolKind::ClassConstant, &key, broker)
            }
            None => self.definition.evaluate(SymbolKind::Constant, &self.name, broker),
        }
    }

    /// How many times the value definition has been evaluated (at most once on success).
    pub fn evaluation_count(&self) -> usize {
        self.definition.evaluation_count()
    }

    /// FQN of the class-like that declares this constant; `None` for top-level constants.
    pub fn declaring_class_name(&self) -> Option<&str> {
        self.declaring_class.as_deref()
    }

    pub fn declaring_class<'b>(&self, broker: &'b Broker) -> Option<&'b Rc<ReflectionClass>> {
        broker.get_class(self.declaring_class.as_deref()?)
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
