//! Function and method parameters.

use std::rc::Rc;

use super::{ReflectionClass, TypeHint, Visibility};
use crate::broker::{Broker, SymbolKind};
use crate::error::ReflectionError;
use crate::names;
use crate::value::{Value, ValueDefinition};

#[derive(Debug)]
pub struct ReflectionParameter {
    /// Name without the `$`.
    pub(crate) name: String,
    pub(crate) position: usize,
    pub(crate) type_hint: Option<TypeHint>,
    /// Class named by the hint with `self`/`static`/`parent` bound to the declaring class.
    pub(crate) class_name: Option<String>,
    pub(crate) by_reference: bool,
    pub(crate) variadic: bool,
    pub(crate) optional: bool,
    pub(crate) default: Option<ValueDefinition>,
    /// Visibility of a promoted constructor property.
    pub(crate) promoted: Option<Visibility>,
    pub(crate) promoted_readonly: bool,
    /// `f` for functions, `Class::m` for methods.
    pub(crate) declaring_function: String,
    pub(crate) declaring_class: Option<String>,
    pub(crate) line: usize,
    pub(crate) file_name: Rc<str>,
}

impl ReflectionParameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        &self.name
    }

    /// Zero-based position in the parameter list.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn type_hint(&self) -> Option<&TypeHint> {
        self.type_hint.as_ref()
    }

    /// FQN of the class the parameter is hinted with, if any.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Return `true` if `null` may be passed: no hint, a nullable hint, or a `null` default.
    pub fn allows_null(&self) -> bool {
        match &self.type_hint {
            None => true,
            Some(hint) => hint.allows_null() || self.default.as_ref().is_some_and(ValueDefinition::is_null_literal),
        }
    }

    pub fn is_array(&self) -> bool {
        self.type_hint.as_ref().is_some_and(TypeHint::is_array)
    }

    pub fn is_callable(&self) -> bool {
        self.type_hint.as_ref().is_some_and(TypeHint::is_callable)
    }

    /// Return `true` if this and every following parameter can be omitted.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_default_value_available(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_value_definition(&self) -> Option<&str> {
        self.default.as_ref().map(ValueDefinition::text)
    }

    /// The default value, evaluated on first request; `Ok(None)` if the parameter has no default.
    pub fn default_value(&self, broker: &Broker) -> Result<Option<&Value>, ReflectionError> {
        let Some(default) = &self.default else {
            return Ok(None);
        };
        let key = format!("{}(${})", self.declaring_function, self.name);
        default.evaluate(SymbolKind::Parameter, &key, broker).map(Some)
    }

    pub fn is_passed_by_reference(&self) -> bool {
        self.by_reference
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn is_promoted(&self) -> bool {
        self.promoted.is_some()
    }

    pub fn promoted_visibility(&self) -> Option<Visibility> {
        self.promoted
    }

    /// Namespace of the declaring function or class.
    pub fn namespace_name(&self) -> Option<&str> {
        let owner = self.declaring_class.as_deref().unwrap_or(&self.declaring_function);
        let namespace = names::namespace_of(owner);
        (!namespace.is_empty()).then_some(namespace)
    }

    pub fn in_namespace(&self) -> bool {
        self.namespace_name().is_some()
    }

    pub fn declaring_function_name(&self) -> &str {
        &self.declaring_function
    }

    pub fn declaring_class_name(&self) -> Option<&str> {
        self.declaring_class.as_deref()
    }

    pub fn declaring_class<'b>(&self, broker: &'b Broker) -> Option<&'b Rc<ReflectionClass>> {
        broker.get_class(self.declaring_class.as_deref()?)
    }

    pub fn start_line(&self) -> usize {
        self.line
    }

    pub fn end_line(&self) -> usize {
        self.line
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Parameters carry no docblock of their own.
    pub fn doc_comment(&self) -> Option<&str> {
        None
    }
}
