//! Type introspection
//!
//! The container never reflects on Rust types. It asks a [`TypeCatalog`]
//! what an identifier denotes: a class (abstract or not), an interface,
//! which interfaces a class implements, and how to construct it.
//!
//! [`TypeRegistry`] is the in-memory catalog most applications use.
//!
//! # Example
//!
//! ```rust
//! use component_resolver::{Container, TypeRegistry};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String { "hello".into() }
//! }
//!
//! struct Door {
//!     greeter: Arc<dyn Greeter>,
//! }
//!
//! let registry = TypeRegistry::new()
//!     .interface("Greeter")
//!     .class::<English>("English", |c| {
//!         c.implements_as::<dyn Greeter>("Greeter", |e| e)
//!             .constructor(|_| Ok(English))
//!     })
//!     .class::<Door>("Door", |c| {
//!         c.param("greeter", "Greeter")
//!             .constructor(|args| Ok(Door { greeter: args.view::<dyn Greeter>(0)? }))
//!     });
//!
//! let container = Container::new(registry);
//! container.bind("Greeter", "English").unwrap();
//!
//! let door = container.get::<Door>("Door").unwrap();
//! assert_eq!(door.greeter.greet(), "hello");
//! ```

use crate::factory::{Arguments, Constructor, Parameter};
use crate::provider::AnyArc;
use crate::{Identifier, Injectable, Result};
use ahash::{AHashSet, RandomState};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// What an identifier denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A concrete class
    Class,
    /// A class that cannot be instantiated
    AbstractClass,
    /// An interface, satisfied by classes that implement it
    Interface,
}

/// Erased `Fn(AnyArc) -> Option<Arc<I>>` stored per interface `TypeId`
type ErasedCast = Arc<dyn Any + Send + Sync>;
type CastFn<I> = Arc<dyn Fn(&AnyArc) -> Option<Arc<I>> + Send + Sync>;

/// Catalog definition of one class or interface
pub struct TypeInfo {
    name: Identifier,
    kind: TypeKind,
    interfaces: Vec<Identifier>,
    constructor: Option<Constructor>,
    casts: HashMap<TypeId, ErasedCast, RandomState>,
}

impl TypeInfo {
    /// An interface extending the given parent interfaces
    pub fn interface(name: impl Into<Identifier>, extends: Vec<Identifier>) -> Self {
        Self::bare(name.into(), TypeKind::Interface, extends)
    }

    /// An abstract class implementing the given interfaces
    pub fn abstract_class(name: impl Into<Identifier>, implements: Vec<Identifier>) -> Self {
        Self::bare(name.into(), TypeKind::AbstractClass, implements)
    }

    /// A concrete class
    pub fn class(
        name: impl Into<Identifier>,
        implements: Vec<Identifier>,
        constructor: Option<Constructor>,
    ) -> Self {
        let mut info = Self::bare(name.into(), TypeKind::Class, implements);
        info.constructor = constructor;
        info
    }

    fn bare(name: Identifier, kind: TypeKind, interfaces: Vec<Identifier>) -> Self {
        Self {
            name,
            kind,
            interfaces,
            constructor: None,
            casts: HashMap::default(),
        }
    }

    #[inline]
    pub fn name(&self) -> &Identifier {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Interfaces implemented (classes) or extended (interfaces) directly
    #[inline]
    pub fn interfaces(&self) -> &[Identifier] {
        &self.interfaces
    }

    #[inline]
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.kind == TypeKind::AbstractClass
    }

    /// View a value of this class as `Arc<I>`, if the class declared `I`
    pub fn cast<I: ?Sized + Send + Sync + 'static>(&self, value: &AnyArc) -> Option<Arc<I>> {
        let cast = self.casts.get(&TypeId::of::<I>())?.downcast_ref::<CastFn<I>>()?;
        cast(value)
    }

    fn add_cast<I: ?Sized + Send + Sync + 'static>(&mut self, cast: CastFn<I>) {
        self.casts
            .insert(TypeId::of::<I>(), Arc::new(cast) as ErasedCast);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("interfaces", &self.interfaces)
            .field("constructor", &self.constructor)
            .field("views", &self.casts.len())
            .finish()
    }
}

/// Source of type information for the container.
///
/// Lookups must be cheap and synchronous; the container calls them during
/// every construction.
pub trait TypeCatalog: Send + Sync {
    /// Describe the type named `id`, or `None` if it is unknown
    fn describe(&self, id: &Identifier) -> Option<Arc<TypeInfo>>;

    /// Every interface `id` satisfies, following interface inheritance.
    ///
    /// Deduplicated, in discovery order. Does not include `id` itself.
    fn interfaces_of(&self, id: &Identifier) -> Vec<Identifier> {
        let mut seen = AHashSet::new();
        let mut out = Vec::new();
        let mut pending: Vec<Identifier> = match self.describe(id) {
            Some(info) => info.interfaces().iter().rev().cloned().collect(),
            None => return out,
        };

        while let Some(next) = pending.pop() {
            if next == *id || !seen.insert(next.clone()) {
                continue;
            }
            if let Some(info) = self.describe(&next) {
                pending.extend(info.interfaces().iter().rev().cloned());
            }
            out.push(next);
        }
        out
    }
}

impl<C: TypeCatalog + ?Sized> TypeCatalog for Arc<C> {
    fn describe(&self, id: &Identifier) -> Option<Arc<TypeInfo>> {
        (**self).describe(id)
    }

    fn interfaces_of(&self, id: &Identifier) -> Vec<Identifier> {
        (**self).interfaces_of(id)
    }
}

/// In-memory [`TypeCatalog`] built with a fluent API.
#[derive(Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<Identifier, Arc<TypeInfo>, RandomState>,
}

impl TypeRegistry {
    /// Create an empty registry
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ready-made definition, replacing any previous one
    pub fn insert(&mut self, info: TypeInfo) {
        self.types.insert(info.name().clone(), Arc::new(info));
    }

    /// Register an interface
    pub fn interface(self, name: impl Into<Identifier>) -> Self {
        self.interface_extending(name, Vec::<Identifier>::new())
    }

    /// Register an interface that extends other interfaces
    pub fn interface_extending<I, P>(mut self, name: impl Into<Identifier>, parents: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Identifier>,
    {
        let parents = parents.into_iter().map(Into::into).collect();
        self.insert(TypeInfo::interface(name, parents));
        self
    }

    /// Register an abstract class implementing the given interfaces
    pub fn abstract_class<I, P>(mut self, name: impl Into<Identifier>, implements: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Identifier>,
    {
        let implements = implements.into_iter().map(Into::into).collect();
        self.insert(TypeInfo::abstract_class(name, implements));
        self
    }

    /// Register a concrete class whose values are `T`
    pub fn class<T: Injectable>(
        mut self,
        name: impl Into<Identifier>,
        define: impl FnOnce(ClassBuilder<T>) -> ClassBuilder<T>,
    ) -> Self {
        let builder = define(ClassBuilder::new(name.into()));
        self.insert(builder.finish());
        self
    }

    /// Check whether an identifier is registered
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeCatalog for TypeRegistry {
    fn describe(&self, id: &Identifier) -> Option<Arc<TypeInfo>> {
        self.types.get(id).cloned()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("count", &self.types.len())
            .finish()
    }
}

/// Builder for one concrete class, see [`TypeRegistry::class`]
pub struct ClassBuilder<T> {
    info: TypeInfo,
    params: Vec<Parameter>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> ClassBuilder<T> {
    fn new(name: Identifier) -> Self {
        Self {
            info: TypeInfo::class(name, Vec::new(), None),
            params: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declare an implemented interface
    pub fn implements(mut self, interface: impl Into<Identifier>) -> Self {
        self.info.interfaces.push(interface.into());
        self
    }

    /// Declare an implemented interface together with its Rust view.
    ///
    /// `cast` is usually the identity closure `|c| c`, which coerces
    /// `Arc<T>` into `Arc<I>`.
    pub fn implements_as<I: ?Sized + Send + Sync + 'static>(
        mut self,
        interface: impl Into<Identifier>,
        cast: fn(Arc<T>) -> Arc<I>,
    ) -> Self {
        let view: CastFn<I> =
            Arc::new(move |value: &AnyArc| Arc::clone(value).downcast::<T>().ok().map(cast));
        self.info.add_cast(view);
        self.implements(interface)
    }

    /// Add a typed constructor parameter
    pub fn param(mut self, name: impl Into<String>, declared: impl Into<Identifier>) -> Self {
        self.params.push(Parameter::typed(name, declared));
        self
    }

    /// Add a typed constructor parameter with a fallback value
    pub fn param_or<D: Injectable>(
        mut self,
        name: impl Into<String>,
        declared: impl Into<Identifier>,
        default: D,
    ) -> Self {
        self.params
            .push(Parameter::typed(name, declared).with_default(default));
        self
    }

    /// Add an untyped constructor parameter with no default
    pub fn untyped_param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Parameter::untyped(name));
        self
    }

    /// Add an untyped constructor parameter with a default
    pub fn untyped_param_or<D: Injectable>(mut self, name: impl Into<String>, default: D) -> Self {
        self.params.push(Parameter::untyped(name).with_default(default));
        self
    }

    /// Set the constructor
    pub fn constructor<F>(mut self, build: F) -> Self
    where
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        let params = std::mem::take(&mut self.params);
        self.info.constructor = Some(Constructor::new(params, build));
        self
    }

    /// Construct with `T::default()` and no parameters
    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.constructor(|_| Ok(T::default()))
    }

    fn finish(self) -> TypeInfo {
        self.info
    }
}
