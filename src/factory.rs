//! Constructor signatures for catalog types
//!
//! A [`Constructor`] is the type-erased counterpart of a class constructor:
//! an ordered list of [`Parameter`]s the container resolves, and a closure
//! that builds the value from the resolved [`Arguments`].

use crate::provider::AnyArc;
use crate::{Container, DiError, Identifier, Injectable, Instance, InstantiationFailure, Result};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::trace;

/// Type-erased constructor function
type ConstructFn = Arc<dyn Fn(&Arguments) -> Result<AnyArc> + Send + Sync>;

/// One constructor parameter.
///
/// A parameter with a declared type is resolved through the container; an
/// untyped parameter can only be satisfied by its default.
#[derive(Clone)]
pub struct Parameter {
    name: String,
    declared: Option<Identifier>,
    default: Option<AnyArc>,
}

impl Parameter {
    /// A parameter resolved by identifier
    pub fn typed(name: impl Into<String>, declared: impl Into<Identifier>) -> Self {
        Self {
            name: name.into(),
            declared: Some(declared.into()),
            default: None,
        }
    }

    /// A parameter without a declared type
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: None,
            default: None,
        }
    }

    /// Give the parameter a default value
    pub fn with_default<T: Injectable>(mut self, value: T) -> Self {
        self.default = Some(Arc::new(value) as AnyArc);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn declared_type(&self) -> Option<&Identifier> {
        self.declared.as_ref()
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    #[inline]
    pub(crate) fn default_value(&self) -> Option<&AnyArc> {
        self.default.as_ref()
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("declared", &self.declared)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

/// Constructor of a concrete class
#[derive(Clone)]
pub struct Constructor {
    params: Vec<Parameter>,
    build: ConstructFn,
    #[cfg(feature = "logging")]
    type_name: &'static str,
}

impl Constructor {
    /// Create a constructor producing `T` from resolved arguments
    pub fn new<T: Injectable, F>(params: Vec<Parameter>, build: F) -> Self
    where
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            params,
            build: Arc::new(move |args| build(args).map(|value| Arc::new(value) as AnyArc)),
            #[cfg(feature = "logging")]
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The parameters, in declaration order
    #[inline]
    pub fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    /// Run the constructor
    #[inline]
    pub(crate) fn invoke(&self, args: &Arguments) -> Result<AnyArc> {
        #[cfg(feature = "logging")]
        trace!(
            target: "component_resolver",
            class = %args.class(),
            rust_type = self.type_name,
            arguments = args.len(),
            "Invoking constructor"
        );

        (self.build)(args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish()
    }
}

/// A resolved constructor argument
#[derive(Clone)]
pub(crate) enum Argument {
    /// A component resolved through the container
    Component(Instance),
    /// The parameter's default value
    Default(AnyArc),
}

/// Resolved arguments handed to a constructor closure.
///
/// Arguments are positional and follow the order of the constructor's
/// parameters.
pub struct Arguments {
    class: Identifier,
    values: Vec<Argument>,
}

impl Arguments {
    #[inline]
    pub(crate) fn new(class: Identifier, values: Vec<Argument>) -> Self {
        Self { class, values }
    }

    /// The class being constructed
    #[inline]
    pub fn class(&self) -> &Identifier {
        &self.class
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get argument `index` as its concrete type
    pub fn get<T: Injectable>(&self, index: usize) -> Result<Arc<T>> {
        let value = match self.values.get(index) {
            Some(Argument::Component(instance)) => instance.downcast::<T>(),
            Some(Argument::Default(value)) => Arc::clone(value).downcast::<T>().ok(),
            None => None,
        };
        value.ok_or_else(|| self.mismatch::<T>(index))
    }

    /// Get argument `index` through an interface, e.g. `Arc<dyn Greeter>`
    pub fn view<I: ?Sized + Send + Sync + 'static>(&self, index: usize) -> Result<Arc<I>> {
        let value = match self.values.get(index) {
            Some(Argument::Component(instance)) => instance.view::<I>(),
            Some(Argument::Default(value)) => value.downcast_ref::<Arc<I>>().cloned(),
            None => None,
        };
        value.ok_or_else(|| self.mismatch::<Arc<I>>(index))
    }

    /// Get the component handle of argument `index`, if it was resolved
    /// through the container rather than defaulted
    pub fn instance(&self, index: usize) -> Option<&Instance> {
        match self.values.get(index) {
            Some(Argument::Component(instance)) => Some(instance),
            _ => None,
        }
    }

    /// Get argument `index` as the injecting container
    pub fn container(&self, index: usize) -> Result<Container> {
        self.get::<Container>(index).map(|container| (*container).clone())
    }

    fn mismatch<T: ?Sized>(&self, index: usize) -> DiError {
        DiError::ClassInstantiation(InstantiationFailure::ArgumentMismatch {
            class: self.class.clone(),
            index,
            expected: std::any::type_name::<T>(),
        })
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("class", &self.class)
            .field("len", &self.values.len())
            .finish()
    }
}
