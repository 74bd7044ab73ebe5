//! Class properties.

use std::rc::Rc;

use super::{Location, ReflectionClass, TypeHint, Visibility};
use crate::broker::{Broker, SymbolKind};
use crate::error::ReflectionError;
use crate::names;
use crate::value::{Value, ValueDefinition};

static IMPLICIT_NULL: Value = Value::Null;

#[derive(Debug)]
pub struct ReflectionProperty {
    /// Name without the `$`.
    pub(crate) name: String,
    pub(crate) declaring_class: String,
    pub(crate) visibility: Visibility,
    pub(crate) is_static: bool,
    pub(crate) is_readonly: bool,
    pub(crate) type_hint: Option<TypeHint>,
    pub(crate) default: Option<ValueDefinition>,
    /// Declared through constructor promotion.
    pub(crate) promoted: bool,
    pub(crate) location: Location,
}

impl ReflectionProperty {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property names are never qualified; same as [`Self::name`].
    pub fn short_name(&self) -> &str {
        &self.name
    }

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

    pub fn is_readonly(&self) -> bool {
        self.is_readonly
    }

    pub fn is_promoted(&self) -> bool {
        self.promoted
    }

    pub fn type_hint(&self) -> Option<&TypeHint> {
        self.type_hint.as_ref()
    }

    /// Untyped properties default to `null` even without an initializer.
    pub fn has_default(&self) -> bool {
        !self.promoted && (self.default.is_some() || self.type_hint.is_none())
    }

    pub fn default_value_definition(&self) -> Option<&str> {
        self.default.as_ref().map(ValueDefinition::text)
    }

    /// The default value, evaluated on first request; `Ok(None)` for a typed property without an initializer.
    pub fn default_value(&self, broker: &Broker) -> Result<Option<&Value>, ReflectionError> {
        match &self.default {
            Some(default) => {
                let key = format!("{}::${}", self.declaring_class, self.name);
                default.evaluate(SymbolKind::Property, &key, broker).map(Some)
            }
            None if self.has_default() => Ok(Some(&IMPLICIT_NULL)),
            None => Ok(None),
        }
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
