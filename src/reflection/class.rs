//! Classes, interfaces and traits.
//!
//! A class only stores the *names* of its parent, interfaces and traits. Inherited lookups walk the declaring chain
//! through the broker: own members first, then members imported from traits, then each ancestor (with its traits),
//! then every interface. Ancestors or interfaces that were never registered (PHP builtins such as `\Exception`,
//! or files that were not processed) end the walk on that branch; their names are still reported.

use std::collections::HashSet;
use std::collections::VecDeque;
use std::ptr;
use std::rc::Rc;

use super::{Location, ReflectionConstant, ReflectionMethod, ReflectionProperty, Visibility};
use crate::broker::{Broker, SymbolKind};
use crate::error::ReflectionError;
use crate::names;
use crate::value::Value;

/// Which kind of class-like a [`ReflectionClass`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
}

#[derive(Debug)]
pub struct ReflectionClass {
    /// FQN.
    pub(crate) name: String,
    pub(crate) namespace_name: String,
    pub(crate) kind: ClassKind,
    pub(crate) is_abstract: bool,
    pub(crate) is_final: bool,
    pub(crate) is_readonly: bool,
    pub(crate) parent_class: Option<String>,
    /// Implemented interfaces; for an interface, the interfaces it extends.
    pub(crate) interfaces: Vec<String>,
    pub(crate) traits: Vec<String>,
    pub(crate) constants: Vec<ReflectionConstant>,
    pub(crate) properties: Vec<ReflectionProperty>,
    pub(crate) methods: Vec<ReflectionMethod>,
    pub(crate) location: Location,
}

/// How a class in the declaring chain relates to the class being inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Own,
    Trait,
    Ancestor,
    Interface,
}

struct Hierarchy<'b> {
    ancestors: Vec<&'b ReflectionClass>,
    unresolved_parent: Option<&'b str>,
    interface_names: Vec<&'b str>,
    interfaces: Vec<&'b ReflectionClass>,
}

impl ReflectionClass {
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

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn is_trait(&self) -> bool {
        self.kind == ClassKind::Trait
    }

    /// Explicitly `abstract` classes and all interfaces.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract || self.kind == ClassKind::Interface
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn is_readonly(&self) -> bool {
        self.is_readonly
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

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// FQN of the declared parent class.
    pub fn parent_class_name(&self) -> Option<&str> {
        self.parent_class.as_deref()
    }

    /// The parent class; `Ok(None)` if the class extends nothing.
    ///
    /// ## Errors
    /// [`ReflectionError::SymbolNotFound`] if the parent was never registered.
    pub fn parent_class<'b>(&self, broker: &'b Broker) -> Result<Option<&'b Rc<ReflectionClass>>, ReflectionError> {
        match self.parent_class.as_deref() {
            None => Ok(None),
            Some(parent) => broker
                .get_class(parent)
                .map(Some)
                .ok_or_else(|| ReflectionError::not_found(SymbolKind::Class, parent)),
        }
    }

    /// Names of all ancestors, nearest first.
    pub fn parent_class_names(&self, broker: &Broker) -> Result<Vec<String>, ReflectionError> {
        let hierarchy = self.hierarchy(broker)?;
        let mut parents: Vec<String> = hierarchy.ancestors.iter().map(|c| c.name.clone()).collect();
        parents.extend(hierarchy.unresolved_parent.map(str::to_string));
        Ok(parents)
    }

    /// Registered ancestors, nearest first.
    pub fn ancestors<'b>(&'b self, broker: &'b Broker) -> Result<Vec<&'b ReflectionClass>, ReflectionError> {
        Ok(self.hierarchy(broker)?.ancestors)
    }

    /// Interfaces named in this declaration's own `implements` (or, for interfaces, `extends`) clause.
    pub fn own_interface_names(&self) -> &[String] {
        &self.interfaces
    }

    /// All implemented interfaces: own, inherited from ancestors, and extended by other interfaces.
    pub fn interface_names(&self, broker: &Broker) -> Result<Vec<String>, ReflectionError> {
        Ok(self
            .hierarchy(broker)?
            .interface_names
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Registered interfaces among [`ReflectionClass::interface_names`].
    pub fn interfaces<'b>(&'b self, broker: &'b Broker) -> Result<Vec<&'b ReflectionClass>, ReflectionError> {
        Ok(self.hierarchy(broker)?.interfaces)
    }

    /// Traits named in `use` statements of the class body.
    pub fn trait_names(&self) -> &[String] {
        &self.traits
    }

    /// Return `true` if `name` is an ancestor or an implemented interface (case-insensitive).
    pub fn is_subclass_of(&self, name: &str, broker: &Broker) -> Result<bool, ReflectionError> {
        let key = names::class_key(name);
        let hierarchy = self.hierarchy(broker)?;
        Ok(hierarchy.ancestors.iter().any(|c| names::class_key(&c.name) == key)
            || hierarchy.unresolved_parent.is_some_and(|p| names::class_key(p) == key)
            || hierarchy.interface_names.iter().any(|i| names::class_key(i) == key))
    }

    pub fn implements_interface(&self, name: &str, broker: &Broker) -> Result<bool, ReflectionError> {
        let key = names::class_key(name);
        Ok(self
            .hierarchy(broker)?
            .interface_names
            .iter()
            .any(|i| names::class_key(i) == key))
    }

    fn hierarchy<'b>(&'b self, broker: &'b Broker) -> Result<Hierarchy<'b>, ReflectionError> {
        let mut ancestors: Vec<&'b ReflectionClass> = Vec::new();
        let mut unresolved_parent = None;
        let mut current: &'b ReflectionClass = self;
        while let Some(parent_name) = current.parent_class.as_deref() {
            let Some(parent) = broker.get_class(parent_name) else {
                unresolved_parent = Some(parent_name);
                break;
            };
            let parent: &'b ReflectionClass = parent;
            if ptr::eq(parent, self) || ancestors.iter().any(|c| ptr::eq(*c, parent)) {
                return Err(ReflectionError::CircularInheritance {
                    class: self.name.clone(),
                });
            }
            ancestors.push(parent);
            current = parent;
        }

        let mut queue: VecDeque<&'b str> = std::iter::once(self)
            .chain(ancestors.iter().copied())
            .flat_map(|c| c.interfaces.iter().map(String::as_str))
            .collect();
        let mut seen = HashSet::new();
        let mut interface_names = Vec::new();
        let mut interfaces = Vec::new();
        while let Some(name) = queue.pop_front() {
            if !seen.insert(names::class_key(name)) {
                continue;
            }
            interface_names.push(name);
            if let Some(interface) = broker.get_class(name) {
                let interface: &'b ReflectionClass = interface;
                interfaces.push(interface);
                queue.extend(interface.interfaces.iter().map(String::as_str));
            }
        }

        Ok(Hierarchy {
            ancestors,
            unresolved_parent,
            interface_names,
            interfaces,
        })
    }

    /// Every class-like whose members this class can see, in lookup order.
    fn declaring_chain<'b>(&'b self, broker: &'b Broker) -> Result<Vec<(Origin, &'b ReflectionClass)>, ReflectionError> {
        let hierarchy = self.hierarchy(broker)?;
        let mut chain = vec![(Origin::Own, self)];
        self.push_traits(&mut chain, broker, Origin::Trait);
        for ancestor in hierarchy.ancestors {
            chain.push((Origin::Ancestor, ancestor));
            ancestor.push_traits(&mut chain, broker, Origin::Ancestor);
        }
        chain.extend(hierarchy.interfaces.into_iter().map(|i| (Origin::Interface, i)));
        Ok(chain)
    }

    fn push_traits<'b>(&'b self, chain: &mut Vec<(Origin, &'b ReflectionClass)>, broker: &'b Broker, origin: Origin) {
        for name in &self.traits {
            let Some(used) = broker.get_class(name) else {
                continue;
            };
            let used: &'b ReflectionClass = used;
            if chain.iter().any(|(_, c)| ptr::eq(*c, used)) {
                continue;
            }
            chain.push((origin, used));
            used.push_traits(chain, broker, origin);
        }
    }

    // ========================================================================
    // Constants
    // ========================================================================

    pub fn own_constants(&self) -> &[ReflectionConstant] {
        &self.constants
    }

    /// Constant declared in this class body (case-sensitive).
    pub fn own_constant(&self, name: &str) -> Option<&ReflectionConstant> {
        self.constants.iter().find(|c| c.name == name)
    }

    pub fn has_own_constant(&self, name: &str) -> bool {
        self.own_constant(name).is_some()
    }

    /// Find a constant along the declaring chain.
    ///
    /// ## Errors
    /// [`ReflectionError::SymbolNotFound`] if no class in the chain declares `name`.
    pub fn constant_reflection<'b>(
        &'b self,
        name: &str,
        broker: &'b Broker,
    ) -> Result<&'b ReflectionConstant, ReflectionError> {
        for (origin, class) in self.declaring_chain(broker)? {
            if let Some(constant) = class.own_constant(name) {
                if origin != Origin::Ancestor || constant.visibility != Visibility::Private {
                    return Ok(constant);
                }
            }
        }
        Err(ReflectionError::not_found(
            SymbolKind::ClassConstant,
            format!("{}::{name}", self.name),
        ))
    }

    pub fn has_constant(&self, name: &str, broker: &Broker) -> Result<bool, ReflectionError> {
        match self.constant_reflection(name, broker) {
            Ok(_) => Ok(true),
            Err(ReflectionError::SymbolNotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Value of a constant found along the declaring chain.
    pub fn constant_value<'b>(&'b self, name: &str, broker: &'b Broker) -> Result<&'b Value, ReflectionError> {
        self.constant_reflection(name, broker)?.value(broker)
    }

    /// Every visible constant with its value, own constants first.
    pub fn constants(&self, broker: &Broker) -> Result<Vec<(String, Value)>, ReflectionError> {
        let mut values: Vec<(String, Value)> = Vec::new();
        for (origin, class) in self.declaring_chain(broker)? {
            for constant in &class.constants {
                if origin == Origin::Ancestor && constant.visibility == Visibility::Private {
                    continue;
                }
                if values.iter().any(|(name, _)| *name == constant.name) {
                    continue;
                }
                values.push((constant.name.clone(), constant.value(broker)?.clone()));
            }
        }
        Ok(values)
    }

    // ========================================================================
    // Methods
    // ========================================================================

    pub fn own_methods(&self) -> &[ReflectionMethod] {
        &self.methods
    }

    /// Method declared in this class body (case-insensitive).
    pub fn own_method(&self, name: &str) -> Option<&ReflectionMethod> {
        self.methods.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn has_own_method(&self, name: &str) -> bool {
        self.own_method(name).is_some()
    }

    /// Find a method along the declaring chain.
    pub fn method<'b>(&'b self, name: &str, broker: &'b Broker) -> Result<Option<&'b ReflectionMethod>, ReflectionError> {
        Ok(self
            .methods(broker)?
            .into_iter()
            .find(|m| m.name.eq_ignore_ascii_case(name)))
    }

    pub fn has_method(&self, name: &str, broker: &Broker) -> Result<bool, ReflectionError> {
        Ok(self.method(name, broker)?.is_some())
    }

    /// Every visible method, own methods first; overridden methods appear once.
    pub fn methods<'b>(&'b self, broker: &'b Broker) -> Result<Vec<&'b ReflectionMethod>, ReflectionError> {
        let mut methods: Vec<&'b ReflectionMethod> = Vec::new();
        for (origin, class) in self.declaring_chain(broker)? {
            for method in &class.methods {
                if origin == Origin::Ancestor && method.visibility == Visibility::Private {
                    continue;
                }
                if methods.iter().any(|m| m.name.eq_ignore_ascii_case(&method.name)) {
                    continue;
                }
                methods.push(method);
            }
        }
        Ok(methods)
    }

    pub fn constructor<'b>(&'b self, broker: &'b Broker) -> Result<Option<&'b ReflectionMethod>, ReflectionError> {
        Ok(self.methods(broker)?.into_iter().find(|m| m.is_constructor))
    }

    /// A concrete class whose constructor (if any) is public.
    pub fn is_instantiable(&self, broker: &Broker) -> Result<bool, ReflectionError> {
        if self.kind != ClassKind::Class || self.is_abstract {
            return Ok(false);
        }
        Ok(self.constructor(broker)?.is_none_or(ReflectionMethod::is_public))
    }

    // ========================================================================
    // Properties
    // ========================================================================

    pub fn own_properties(&self) -> &[ReflectionProperty] {
        &self.properties
    }

    /// Property declared in this class body (case-sensitive, without `$`).
    pub fn own_property(&self, name: &str) -> Option<&ReflectionProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn has_own_property(&self, name: &str) -> bool {
        self.own_property(name).is_some()
    }

    pub fn property<'b>(
        &'b self,
        name: &str,
        broker: &'b Broker,
    ) -> Result<Option<&'b ReflectionProperty>, ReflectionError> {
        Ok(self.properties(broker)?.into_iter().find(|p| p.name == name))
    }

    pub fn has_property(&self, name: &str, broker: &Broker) -> Result<bool, ReflectionError> {
        Ok(self.property(name, broker)?.is_some())
    }

    /// Every visible property, own properties first. Private properties of ancestors are not visible.
    pub fn properties<'b>(&'b self, broker: &'b Broker) -> Result<Vec<&'b ReflectionProperty>, ReflectionError> {
        let mut properties: Vec<&'b ReflectionProperty> = Vec::new();
        for (origin, class) in self.declaring_chain(broker)? {
            if origin == Origin::Interface {
                continue;
            }
            for property in &class.properties {
                if origin == Origin::Ancestor && property.visibility == Visibility::Private {
                    continue;
                }
                if properties.iter().any(|p| p.name == property.name) {
                    continue;
                }
                properties.push(property);
            }
        }
        Ok(properties)
    }
}
