//! Functions, and the signature shared with methods.

use super::{Location, ReflectionParameter, TypeHint};
use crate::broker::{Broker, SymbolKind};
use crate::error::ReflectionError;
use crate::names;
use crate::value::{Value, ValueDefinition};

/// A `static $name = ...;` declaration inside a function body.
#[derive(Debug)]
pub struct StaticVariable {
    pub(crate) name: String,
    pub(crate) definition: Option<ValueDefinition>,
}

impl StaticVariable {
    /// Name without the `$`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> Option<&ValueDefinition> {
        self.definition.as_ref()
    }
}

/// Parameters, return type and static variables of a function or method.
#[derive(Debug, Default)]
pub struct FunctionSignature {
    pub(crate) parameters: Vec<ReflectionParameter>,
    pub(crate) returns_reference: bool,
    pub(crate) return_type: Option<TypeHint>,
    pub(crate) static_variables: Vec<StaticVariable>,
}

/// Accessors shared by [`ReflectionFunction`] and [`super::ReflectionMethod`].
pub trait FunctionLike {
    fn signature(&self) -> &FunctionSignature;

    /// `N\f` for functions, `N\Class::m` for methods.
    fn qualified_name(&self) -> String;

    fn parameters(&self) -> &[ReflectionParameter] {
        &self.signature().parameters
    }

    fn parameter(&self, name: &str) -> Option<&ReflectionParameter> {
        self.parameters().iter().find(|p| p.name() == name)
    }

    fn number_of_parameters(&self) -> usize {
        self.parameters().len()
    }

    fn number_of_required_parameters(&self) -> usize {
        self.parameters().iter().filter(|p| !p.is_optional()).count()
    }

    fn returns_reference(&self) -> bool {
        self.signature().returns_reference
    }

    fn return_type(&self) -> Option<&TypeHint> {
        self.signature().return_type.as_ref()
    }

    fn is_variadic(&self) -> bool {
        self.parameters().iter().any(ReflectionParameter::is_variadic)
    }

    /// Named declarations are never closures.
    fn is_closure(&self) -> bool {
        false
    }

    fn static_variable_names(&self) -> Vec<&str> {
        self.signature().static_variables.iter().map(StaticVariable::name).collect()
    }

    /// Static variables with their initial values, in declaration order. Uninitialized ones are `null`.
    fn static_variables(&self, broker: &Broker) -> Result<Vec<(String, Value)>, ReflectionError> {
        let owner = self.qualified_name();
        self.signature()
            .static_variables
            .iter()
            .map(|var| {
                let value = match &var.definition {
                    Some(definition) => {
                        let key = format!("{owner}::${}", var.name);
                        definition.evaluate(SymbolKind::StaticVariable, &key, broker)?.clone()
                    }
                    None => Value::Null,
                };
                Ok((var.name.clone(), value))
            })
            .collect()
    }
}

/// A named top-level function.
#[derive(Debug)]
pub struct ReflectionFunction {
    /// FQN.
    pub(crate) name: String,
    pub(crate) namespace_name: String,
    pub(crate) signature: FunctionSignature,
    pub(crate) location: Location,
}

impl ReflectionFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        names::short_name(&self.name)
    }

    pub fn namespace_name(&self) -> Option<&str> {
        (!self.namespace_name.is_empty()).then_some(self.namespace_name.as_str())
    }

    pub fn in_namespace(&self) -> bool {
        !self.namespace_name.is_empty()
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

impl FunctionLike for ReflectionFunction {
    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn qualified_name(&self) -> String {
        self.name.clone()
    }
}
