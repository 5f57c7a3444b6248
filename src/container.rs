//! The component container
//!
//! [`Container`] ties the pieces together: it normalizes inputs, applies
//! alias bindings, keeps singletons in the instance store and constructs
//! missing components recursively from their catalog constructors.

use crate::binding::BindingTable;
use crate::catalog::{TypeCatalog, TypeKind};
use crate::factory::{Argument, Arguments, Constructor};
use crate::identifier::{self, Target};
use crate::provider::AnyArc;
use crate::storage::InstanceStore;
use crate::{
    DiError, Flags, Identifier, Injectable, Input, Instance, InstantiationFailure,
    ResolutionFailure, Result,
};
use ahash::RandomState;
use std::collections::HashSet;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

struct Inner {
    flags: Flags,
    catalog: Arc<dyn TypeCatalog>,
    bindings: BindingTable,
    store: InstanceStore,
}

/// Dependency injection container.
///
/// Cloning is cheap: clones share bindings and singletons. All methods take
/// `&self`, and no internal lock is held while a constructor runs, so
/// constructors may call back into the container.
///
/// # Examples
///
/// ```rust
/// use component_resolver::{Container, Flags, TypeRegistry};
///
/// struct Clock;
///
/// let registry = TypeRegistry::new().class::<Clock>("Clock", |c| c.constructor(|_| Ok(Clock)));
/// let container = Container::with_flags(registry, Flags::NONE);
///
/// // Not registered and auto-add is off
/// assert!(container.get_component("Clock").is_err());
///
/// container.add_component("Clock").unwrap();
/// let a = container.get_component("Clock").unwrap();
/// let b = container.get_component("Clock").unwrap();
/// assert!(a.ptr_eq(&b));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<Inner>,
}

impl Container {
    /// Identifier under which the container resolves to itself
    pub const IDENTIFIER: &'static str = "component_resolver::Container";

    /// Create a container with [`Flags::DEFAULT_FLAGS`]
    #[inline]
    pub fn new(catalog: impl TypeCatalog + 'static) -> Self {
        Self::with_flags(catalog, Flags::DEFAULT_FLAGS)
    }

    /// Create a container with explicit flags
    pub fn with_flags(catalog: impl TypeCatalog + 'static, flags: Flags) -> Self {
        Self::from_parts(Arc::new(catalog), flags)
    }

    /// Start building a container with initial components and bindings
    #[inline]
    pub fn builder(catalog: impl TypeCatalog + 'static) -> ContainerBuilder {
        ContainerBuilder::new(Arc::new(catalog))
    }

    fn from_parts(catalog: Arc<dyn TypeCatalog>, flags: Flags) -> Self {
        #[cfg(feature = "logging")]
        debug!(
            target: "component_resolver",
            flags = ?flags,
            "Creating new component container"
        );

        Self {
            inner: Arc::new(Inner {
                flags,
                catalog,
                bindings: BindingTable::new(),
                store: InstanceStore::new(),
            }),
        }
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        self.inner.flags
    }

    #[inline]
    pub fn catalog(&self) -> &dyn TypeCatalog {
        &*self.inner.catalog
    }

    // =========================================================================
    // Identifier Resolution
    // =========================================================================

    /// Normalize an input and apply alias bindings to every identifier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use component_resolver::{Container, TypeRegistry};
    ///
    /// let container = Container::new(TypeRegistry::new());
    /// container.bind("IException", "Exception").unwrap();
    ///
    /// let names = container.resolve_class_names(vec!["IException", "Other"]).unwrap();
    /// assert_eq!(names, ["Exception", "Other"]);
    /// ```
    pub fn resolve_class_names(&self, input: impl Into<Input>) -> Result<Vec<Identifier>> {
        Ok(identifier::resolve_identifiers(input)?
            .iter()
            .map(|id| self.inner.bindings.resolve_alias(id))
            .collect())
    }

    /// Single-target form of [`resolve_class_names`](Self::resolve_class_names)
    pub fn resolve_class_name(&self, input: impl Into<Input>) -> Result<Identifier> {
        let id = single_identifier(input.into())?;
        Ok(self.inner.bindings.resolve_alias(&id))
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    /// Bind `alias` to the class named by `target`.
    ///
    /// `target` must name exactly one class: a name or a single instance.
    /// Anything else fails with [`DiError::InterfaceBinding`]. A previous
    /// binding of `alias` is replaced.
    pub fn bind(&self, alias: impl AsRef<str>, target: impl Into<Input>) -> Result<()> {
        let alias = alias.as_ref();
        if alias.is_empty() {
            return Err(DiError::binding(alias, "alias is empty"));
        }

        let targets = identifier::flatten(target.into())
            .map_err(|err| DiError::binding(alias, err.to_string()))?;
        let class = match targets.as_slice() {
            [single] => single.identifier().clone(),
            other => {
                return Err(DiError::binding(
                    alias,
                    format!("target must name exactly one class, got {}", other.len()),
                ));
            }
        };

        #[cfg(feature = "logging")]
        debug!(
            target: "component_resolver",
            alias,
            class = %class,
            "Binding alias"
        );

        self.inner.bindings.bind(Identifier::from(alias), class);
        Ok(())
    }

    /// Check whether `alias` has a binding
    #[inline]
    pub fn is_bound(&self, alias: &str) -> bool {
        self.inner.bindings.is_bound(&Identifier::from(alias))
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register components.
    ///
    /// Instances are stored immediately; names are constructed on first
    /// retrieval. A class that is already registered is left untouched.
    /// Naming the same class twice within one call fails with
    /// [`DiError::DuplicateClass`] and registers nothing.
    ///
    /// With [`Flags::AUTO_BIND_INTERFACES`], every interface the class
    /// implements is bound to it unless already bound.
    pub fn add_component(&self, input: impl Into<Input>) -> Result<()> {
        let targets = identifier::flatten(input.into())?;

        let mut seen: HashSet<&Identifier, RandomState> =
            HashSet::with_capacity_and_hasher(targets.len(), RandomState::new());
        for target in &targets {
            if !seen.insert(target.identifier()) {
                #[cfg(feature = "logging")]
                debug!(
                    target: "component_resolver",
                    class = %target.identifier(),
                    "Rejecting component batch with duplicate class"
                );
                return Err(DiError::DuplicateClass {
                    class: target.identifier().clone(),
                });
            }
        }

        let auto_bind = self.inner.flags.contains(Flags::AUTO_BIND_INTERFACES);
        for target in targets {
            let class = target.identifier().clone();
            if class == Self::IDENTIFIER {
                continue;
            }

            let interfaces = self.inner.catalog.interfaces_of(&class);
            if auto_bind {
                for interface in &interfaces {
                    self.inner
                        .bindings
                        .bind_if_absent(interface.clone(), class.clone());
                }
            }

            let registered = match target {
                Target::Name(id) => self.inner.store.mark_pending(id),
                Target::Instance(instance) => {
                    let info = self.inner.catalog.describe(&class);
                    self.inner.store.put(instance.with_info(info), interfaces)
                }
            };

            #[cfg(feature = "logging")]
            debug!(
                target: "component_resolver",
                class = %class,
                registered,
                "Adding component"
            );
            #[cfg(not(feature = "logging"))]
            let _ = registered;
        }
        Ok(())
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Retrieve a component, using the `AUTO_ADD_DEPENDENCIES` flag as the
    /// auto-add policy.
    #[inline]
    pub fn get_component(&self, target: impl Into<Input>) -> Result<Instance> {
        let auto_add = self.inner.flags.contains(Flags::AUTO_ADD_DEPENDENCIES);
        self.get_component_with(target, auto_add)
    }

    /// Retrieve a component.
    ///
    /// `auto_add` decides whether an unregistered class is constructed on
    /// demand (`true`) or reported as not found (`false`). It applies to
    /// the requested component only; its dependencies follow the
    /// `AUTO_ADD_DEPENDENCIES` flag.
    ///
    /// Repeated retrievals return handles to the same singleton.
    pub fn get_component_with(&self, target: impl Into<Input>, auto_add: bool) -> Result<Instance> {
        let id = single_identifier(target.into())?;
        let mut stack = Vec::new();
        let result = self.resolve(&id, auto_add, &mut stack);

        #[cfg(feature = "logging")]
        {
            if let Err(err) = &result {
                debug!(
                    target: "component_resolver",
                    requested = %id,
                    error = %err,
                    "Component resolution failed"
                );
            }
        }

        result
    }

    /// Retrieve a component as its concrete Rust type
    pub fn get<T: Injectable>(&self, target: impl Into<Input>) -> Result<Arc<T>> {
        let instance = self.get_component(target)?;
        instance.downcast::<T>().ok_or_else(|| {
            DiError::ClassResolution(ResolutionFailure::TypeMismatch {
                identifier: instance.class().clone(),
                expected: std::any::type_name::<T>(),
            })
        })
    }

    /// Retrieve a component through an interface view, e.g. `Arc<dyn Greeter>`
    pub fn get_as<I: ?Sized + Send + Sync + 'static>(
        &self,
        target: impl Into<Input>,
    ) -> Result<Arc<I>> {
        let instance = self.get_component(target)?;
        instance.view::<I>().ok_or_else(|| {
            DiError::ClassResolution(ResolutionFailure::TypeMismatch {
                identifier: instance.class().clone(),
                expected: std::any::type_name::<Arc<I>>(),
            })
        })
    }

    /// Every stored instance satisfying `interface`, in insertion order.
    ///
    /// Bindings are not consulted and nothing is constructed; an interface
    /// without implementors yields an empty list. The container itself is
    /// never stored, so [`Container::IDENTIFIER`] yields an empty list here
    /// and is absent from [`components`](Self::components) even though
    /// [`get_component`](Self::get_component) resolves it.
    pub fn get_implementors(&self, interface: impl Into<Input>) -> Result<Vec<Instance>> {
        let id = single_identifier(interface.into())?;
        Ok(self.inner.store.implementors(&id))
    }

    /// Check whether `target` is registered, stored, or the container itself
    pub fn contains(&self, target: impl Into<Input>) -> bool {
        let Ok(id) = single_identifier(target.into()) else {
            return false;
        };
        if id == Self::IDENTIFIER {
            return true;
        }
        let resolved = self.inner.bindings.resolve_alias(&id);
        self.inner.store.is_registered(&resolved) || self.inner.store.is_registered(&id)
    }

    /// Number of constructed or pre-built instances
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.store.len() == 0
    }

    /// Classes of the stored instances, in insertion order
    pub fn components(&self) -> Vec<Identifier> {
        self.inner.store.classes()
    }

    // =========================================================================
    // Construction Engine
    // =========================================================================

    fn self_instance(&self) -> Instance {
        Instance::new(Self::IDENTIFIER, self.clone())
    }

    /// Resolve one identifier, constructing it if needed.
    ///
    /// `stack` holds the classes currently under construction.
    fn resolve(
        &self,
        requested: &Identifier,
        auto_add: bool,
        stack: &mut Vec<Identifier>,
    ) -> Result<Instance> {
        if *requested == Self::IDENTIFIER {
            return Ok(self.self_instance());
        }

        let bound = self.inner.bindings.get(requested);
        let id = bound.clone().unwrap_or_else(|| requested.clone());
        if id == Self::IDENTIFIER {
            return Ok(self.self_instance());
        }

        if let Some(instance) = self.inner.store.get(&id) {
            #[cfg(feature = "logging")]
            trace!(
                target: "component_resolver",
                requested = %requested,
                class = %id,
                "Component resolved from store"
            );
            return Ok(instance);
        }

        // Applies to the rewritten identifier too, so an alias bound to an
        // interface with several stored implementors is ambiguous
        if let Some(instance) = self.inner.store.single_implementor(&id)? {
            #[cfg(feature = "logging")]
            trace!(
                target: "component_resolver",
                interface = %id,
                class = %instance.class(),
                "Interface resolved to its only implementor"
            );
            return Ok(instance);
        }

        if bound.is_none() {
            // A pending class never hops to another pending class
            let pending = if self.inner.store.is_pending(&id) {
                None
            } else {
                self.pending_implementor(&id)?
            };
            if let Some(class) = pending {
                #[cfg(feature = "logging")]
                trace!(
                    target: "component_resolver",
                    interface = %id,
                    class = %class,
                    "Interface resolved to its only registered implementor"
                );
                return self.resolve(&class, auto_add, stack);
            }
        }

        if stack.contains(&id) {
            let mut chain = stack.clone();
            chain.push(id);
            return Err(DiError::cyclic(chain));
        }

        let registered = self.inner.store.is_pending(&id) || self.inner.store.is_pending(requested);
        if !registered && !auto_add {
            return Err(DiError::not_found(id));
        }

        self.construct(id, stack)
    }

    fn construct(&self, id: Identifier, stack: &mut Vec<Identifier>) -> Result<Instance> {
        let info = self
            .inner
            .catalog
            .describe(&id)
            .ok_or_else(|| DiError::unknown_type(id.clone()))?;

        let constructor = match (info.kind(), info.constructor()) {
            (TypeKind::Class, Some(constructor)) => constructor,
            (TypeKind::Class, None) => {
                return Err(DiError::ClassInstantiation(
                    InstantiationFailure::NoConstructor { class: id },
                ));
            }
            (TypeKind::AbstractClass, _) => {
                return Err(DiError::ClassInstantiation(
                    InstantiationFailure::AbstractClass { class: id },
                ));
            }
            (TypeKind::Interface, _) => {
                return Err(DiError::ClassInstantiation(InstantiationFailure::Interface {
                    interface: id,
                }));
            }
        };

        #[cfg(feature = "logging")]
        debug!(
            target: "component_resolver",
            class = %id,
            depth = stack.len(),
            parameters = constructor.parameters().len(),
            "Constructing component"
        );

        stack.push(id.clone());
        let built = self.build(&id, constructor, stack);
        stack.pop();
        let value = built?;

        let instance = Instance::from_erased(id.clone(), value).with_info(Some(Arc::clone(&info)));
        let interfaces = self.inner.catalog.interfaces_of(&id);
        Ok(self.inner.store.fulfil(instance, interfaces))
    }

    fn build(
        &self,
        id: &Identifier,
        constructor: &Constructor,
        stack: &mut Vec<Identifier>,
    ) -> Result<AnyArc> {
        let auto_add = self.inner.flags.contains(Flags::AUTO_ADD_DEPENDENCIES);
        let mut args = Vec::with_capacity(constructor.parameters().len());

        for param in constructor.parameters() {
            let arg = match (param.declared_type(), param.default_value()) {
                (Some(declared), _) if *declared == Self::IDENTIFIER => {
                    Argument::Component(self.self_instance())
                }
                (Some(declared), default) => match self.resolve(declared, auto_add, stack) {
                    Ok(instance) => Argument::Component(instance),
                    Err(err) => match default {
                        Some(value) if self.is_unavailable(&err, declared) => {
                            #[cfg(feature = "logging")]
                            trace!(
                                target: "component_resolver",
                                class = %id,
                                parameter = param.name(),
                                "Dependency unavailable, using parameter default"
                            );
                            Argument::Default(Arc::clone(value))
                        }
                        _ => return Err(err),
                    },
                },
                (None, Some(value)) => Argument::Default(Arc::clone(value)),
                (None, None) => {
                    return Err(DiError::ClassInstantiation(
                        InstantiationFailure::UnresolvableParameter {
                            class: id.clone(),
                            parameter: param.name().to_owned(),
                        },
                    ));
                }
            };
            args.push(arg);
        }

        constructor.invoke(&Arguments::new(id.clone(), args))
    }

    /// The single class registered by name (not yet constructed) that
    /// implements `interface`
    fn pending_implementor(&self, interface: &Identifier) -> Result<Option<Identifier>> {
        let mut candidates: Vec<Identifier> = self
            .inner
            .store
            .pending_classes()
            .into_iter()
            .filter(|class| self.inner.catalog.interfaces_of(class).contains(interface))
            .collect();

        match candidates.len() {
            0 => Ok(None),
            1 => Ok(candidates.pop()),
            _ => Err(DiError::ClassResolution(ResolutionFailure::AmbiguousInterface {
                interface: interface.clone(),
                candidates,
            })),
        }
    }

    /// Whether `err` means the dependency `declared` simply cannot be
    /// supplied, as opposed to a failure inside its construction
    fn is_unavailable(&self, err: &DiError, declared: &Identifier) -> bool {
        let target = self.inner.bindings.resolve_alias(declared);
        match err {
            DiError::ClassResolution(_) => true,
            DiError::ClassInstantiation(
                InstantiationFailure::Interface { interface: class }
                | InstantiationFailure::AbstractClass { class }
                | InstantiationFailure::NoConstructor { class },
            ) => *class == target,
            _ => false,
        }
    }
}

/// Normalize an input that must name exactly one identifier
fn single_identifier(input: Input) -> Result<Identifier> {
    let mut ids = identifier::resolve_identifiers(input)?;
    if ids.len() != 1 {
        return Err(DiError::ClassResolution(ResolutionFailure::NotSingleTarget {
            count: ids.len(),
        }));
    }
    Ok(ids.remove(0))
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("flags", &self.inner.flags)
            .field("bindings", &self.inner.bindings)
            .field("store", &self.inner.store)
            .finish()
    }
}

/// Builder for a [`Container`] with initial components and bindings.
///
/// Initial components are added as a single batch, then the bindings are
/// applied, both before the container is returned.
///
/// # Examples
///
/// ```rust
/// use component_resolver::{Container, Flags, Instance, TypeRegistry};
///
/// struct Config { debug: bool }
///
/// let container = Container::builder(TypeRegistry::new())
///     .flags(Flags::DEFAULT_FLAGS)
///     .component(Instance::new("Config", Config { debug: true }))
///     .binding("IConfig", "Config")
///     .build()
///     .unwrap();
///
/// assert!(container.get::<Config>("IConfig").unwrap().debug);
/// ```
pub struct ContainerBuilder {
    catalog: Arc<dyn TypeCatalog>,
    flags: Flags,
    components: Vec<Input>,
    bindings: Vec<(String, Input)>,
}

impl ContainerBuilder {
    fn new(catalog: Arc<dyn TypeCatalog>) -> Self {
        Self {
            catalog,
            flags: Flags::DEFAULT_FLAGS,
            components: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Set the container flags
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Add to the initial component batch
    pub fn component(mut self, component: impl Into<Input>) -> Self {
        self.components.push(component.into());
        self
    }

    /// Add an initial binding
    pub fn binding(mut self, alias: impl Into<String>, target: impl Into<Input>) -> Self {
        self.bindings.push((alias.into(), target.into()));
        self
    }

    /// Create the container, applying components then bindings
    pub fn build(self) -> Result<Container> {
        let container = Container::from_parts(self.catalog, self.flags);
        if !self.components.is_empty() {
            container.add_component(Input::List(self.components))?;
        }
        for (alias, target) in self.bindings {
            container.bind(alias, target)?;
        }
        Ok(container)
    }
}

impl std::fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("flags", &self.flags)
            .field("components", &self.components.len())
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, TypeRegistry};
    use std::sync::atomic::{AtomicU32, Ordering};

    const TEST_STRING: &str = "You can call, but I probably won't hear you.";

    static INCREMENT: AtomicU32 = AtomicU32::new(1);

    trait DITestInterface: Send + Sync {
        fn test(&self) -> String;
    }

    struct DITestClass {
        id: u32,
    }

    impl DITestClass {
        fn new() -> Self {
            Self {
                id: INCREMENT.fetch_add(1, Ordering::SeqCst),
            }
        }
    }

    impl DITestInterface for DITestClass {
        fn test(&self) -> String {
            TEST_STRING.into()
        }
    }

    struct DINeedyTestClass {
        test: String,
    }

    struct DICyclicTestClass;

    struct DIBrokenTestClass;

    struct NamespacedTestClass;

    struct DINamespaceTestClass {
        test: Arc<NamespacedTestClass>,
    }

    impl NamespacedTestClass {
        fn get_test(&self) -> &'static str {
            "Honk"
        }
    }

    struct ComponentA;
    struct ComponentB;

    fn catalog() -> TypeRegistry {
        TypeRegistry::new()
            .interface("DITestInterface")
            .interface("DITestInterfaceA")
            .class::<DITestClass>("DITestClass", |c| {
                c.implements_as::<dyn DITestInterface>("DITestInterface", |t| t)
                    .constructor(|_| Ok(DITestClass::new()))
            })
            .class::<DINeedyTestClass>("DINeedyTestClass", |c| {
                c.param("interface", "DITestInterface").constructor(|args| {
                    Ok(DINeedyTestClass {
                        test: args.view::<dyn DITestInterface>(0)?.test(),
                    })
                })
            })
            .class::<DICyclicTestClass>("DICyclicTestClass", |c| {
                c.param("class", "DICyclicTestClass")
                    .constructor(|_| Ok(DICyclicTestClass))
            })
            .class::<DIBrokenTestClass>("DIBrokenTestClass", |c| {
                c.untyped_param("something")
                    .constructor(|_| Ok(DIBrokenTestClass))
            })
            .abstract_class("DIAbstractTestClass", Vec::<&str>::new())
            .class::<NamespacedTestClass>("NamespaceTest\\TestClass", |c| {
                c.constructor(|_| Ok(NamespacedTestClass))
            })
            .class::<DINamespaceTestClass>("DINamespaceTestClass", |c| {
                c.param("test", "NamespaceTest\\TestClass").constructor(|args| {
                    Ok(DINamespaceTestClass {
                        test: args.get::<NamespacedTestClass>(0)?,
                    })
                })
            })
            .class::<ComponentA>("ComponentA", |c| c.implements("DITestInterfaceA"))
            .class::<ComponentB>("ComponentB", |c| c.implements("DITestInterfaceA"))
    }

    fn test_id(instance: &Instance) -> u32 {
        instance.downcast_ref::<DITestClass>().unwrap().id
    }

    #[test]
    fn test_basic_class_resolution() {
        let container = Container::new(catalog());
        assert_eq!(container.resolve_class_name("Exception").unwrap(), "Exception");
    }

    #[test]
    fn test_interface_resolution() {
        let container = Container::new(catalog());
        container.bind("IException", "Exception").unwrap();
        assert_eq!(container.resolve_class_name("IException").unwrap(), "Exception");
    }

    #[test]
    fn test_resolve_class_name_requires_single_target() {
        let container = Container::new(catalog());
        let err = container.resolve_class_name(vec!["A", "B"]).unwrap_err();
        assert_eq!(
            err,
            DiError::ClassResolution(ResolutionFailure::NotSingleTarget { count: 2 })
        );
    }

    #[test]
    fn test_basic_component_adding() {
        let container = Container::new(catalog());
        container.add_component("DITestClass").unwrap();

        let component = container.get_component_with("DITestClass", false).unwrap();
        let component = component.view::<dyn DITestInterface>().unwrap();
        assert_eq!(component.test(), TEST_STRING);
    }

    #[test]
    fn test_component_auto_adding() {
        let container = Container::new(catalog());
        let component = container.get_component_with("DITestClass", true).unwrap();
        assert_eq!(component.class(), "DITestClass");
        assert_eq!(component.view::<dyn DITestInterface>().unwrap().test(), TEST_STRING);
    }

    #[test]
    fn test_missing_component() {
        let container = Container::new(catalog());
        let err = container.get_component_with("DITestClass", false).unwrap_err();
        assert_eq!(err, DiError::not_found("DITestClass".into()));
        assert!(container.is_empty());
    }

    #[test]
    fn test_default_auto_add_follows_flags() {
        let strict = Container::with_flags(catalog(), Flags::NONE);
        assert!(strict.get_component("DITestClass").unwrap_err().is_resolution());

        let lenient = Container::new(catalog());
        assert!(lenient.get_component("DITestClass").is_ok());
    }

    #[test]
    fn test_retrieve_interface_component() {
        let container =
            Container::with_flags(catalog(), Flags::DEFAULT_FLAGS | Flags::AUTO_BIND_INTERFACES);
        container.add_component("DITestClass").unwrap();
        assert!(container.is_bound("DITestInterface"));

        let component = container.get_as::<dyn DITestInterface>("DITestInterface").unwrap();
        assert_eq!(component.test(), TEST_STRING);
    }

    #[test]
    fn test_interface_resolves_to_single_stored_implementor() {
        let container = Container::with_flags(catalog(), Flags::NONE);
        let instance = Instance::new("DITestClass", DITestClass::new());
        container.add_component(&instance).unwrap();

        let component = container.get_component("DITestInterface").unwrap();
        assert!(component.ptr_eq(&instance));
    }

    #[test]
    fn test_repeated_component_retrieval() {
        let container = Container::new(catalog());
        container.add_component("DITestClass").unwrap();

        let a = container.get_component_with("DITestClass", false).unwrap();
        let b = container.get_component_with("DITestClass", false).unwrap();
        assert_eq!(test_id(&a), test_id(&b));
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_repeated_auto_add_component_retrieval() {
        let container = Container::new(catalog());

        let a = container.get_component_with("DITestClass", true).unwrap();
        let b = container.get_component_with("DITestClass", true).unwrap();
        assert_eq!(test_id(&a), test_id(&b));
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_add_retrieve_object() {
        let container = Container::new(catalog());
        let object = DITestClass::new();
        let expected = object.id;

        container
            .add_component(Instance::new("DITestClass", object))
            .unwrap();
        let component = container.get::<DITestClass>("DITestClass").unwrap();
        assert_eq!(component.id, expected);
    }

    #[test]
    fn test_separate_additions_keep_first_registration() {
        let container = Container::new(catalog());
        let first = Instance::new("DITestClass", DITestClass::new());

        container.add_component(&first).unwrap();
        container.add_component("DITestClass").unwrap();
        container
            .add_component(Instance::new("DITestClass", DITestClass::new()))
            .unwrap();

        assert!(container.get_component("DITestClass").unwrap().ptr_eq(&first));
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_object_dependencies() {
        let container = Container::new(catalog());
        container.add_component("DITestClass").unwrap();
        container.add_component("DINeedyTestClass").unwrap();

        let component = container
            .get_component_with("DINeedyTestClass", false)
            .unwrap();
        assert_eq!(
            component.downcast_ref::<DINeedyTestClass>().unwrap().test,
            TEST_STRING
        );
    }

    #[test]
    fn test_object_dependencies_auto_add() {
        let container =
            Container::with_flags(catalog(), Flags::DEFAULT_FLAGS | Flags::AUTO_ADD_DEPENDENCIES);
        container.add_component("DINeedyTestClass").unwrap();
        container.bind("DITestInterface", "DITestClass").unwrap();

        let component = container.get::<DINeedyTestClass>("DINeedyTestClass").unwrap();
        assert_eq!(component.test, TEST_STRING);
        assert_eq!(container.components(), ["DITestClass", "DINeedyTestClass"]);
    }

    #[test]
    fn test_object_dependencies_without_auto_add() {
        let container =
            Container::with_flags(catalog(), Flags::DEFAULT_FLAGS & !Flags::AUTO_ADD_DEPENDENCIES);
        container.add_component("DINeedyTestClass").unwrap();
        container.bind("DITestInterface", "DITestClass").unwrap();

        let err = container
            .get_component_with("DINeedyTestClass", false)
            .unwrap_err();
        assert_eq!(err, DiError::not_found("DITestClass".into()));
        assert!(container.is_empty());
    }

    #[test]
    fn test_top_level_auto_add_does_not_reach_dependencies() {
        let container = Container::with_flags(catalog(), Flags::NONE);
        container.bind("DITestInterface", "DITestClass").unwrap();

        let err = container
            .get_component_with("DINeedyTestClass", true)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ClassResolution);
    }

    #[test]
    fn test_cyclic_dependency_exception() {
        let container = Container::new(catalog());
        container.add_component("DICyclicTestClass").unwrap();

        let err = container.get_component("DICyclicTestClass").unwrap_err();
        assert_eq!(
            err,
            DiError::cyclic(vec!["DICyclicTestClass".into(), "DICyclicTestClass".into()])
        );
        assert!(container.is_empty());
    }

    #[test]
    fn test_transitive_cycle_reports_chain() {
        struct Chicken;
        struct Egg;

        let registry = TypeRegistry::new()
            .class::<Chicken>("Chicken", |c| c.param("egg", "Egg").constructor(|_| Ok(Chicken)))
            .class::<Egg>("Egg", |c| c.param("chicken", "Chicken").constructor(|_| Ok(Egg)));
        let container = Container::new(registry);
        container.add_component("Chicken").unwrap();

        let err = container.get_component("Chicken").unwrap_err();
        assert_eq!(
            err,
            DiError::cyclic(vec!["Chicken".into(), "Egg".into(), "Chicken".into()])
        );
        assert!(container.is_empty());

        // Failure is repeatable, nothing half-built was kept
        assert!(container.get_component("Chicken").unwrap_err().is_instantiation());
    }

    #[test]
    fn test_cycle_detected_even_without_auto_add() {
        struct Loop;

        let registry = TypeRegistry::new()
            .class::<Loop>("Loop", |c| c.param("me", "Loop").constructor(|_| Ok(Loop)));
        let container = Container::with_flags(registry, Flags::NONE);

        let err = container.get_component_with("Loop", true).unwrap_err();
        assert_eq!(err, DiError::cyclic(vec!["Loop".into(), "Loop".into()]));
    }

    #[test]
    fn test_broken_construction() {
        let container = Container::new(catalog());
        container.add_component("DIBrokenTestClass").unwrap();

        let err = container.get_component("DIBrokenTestClass").unwrap_err();
        assert_eq!(
            err,
            DiError::ClassInstantiation(InstantiationFailure::UnresolvableParameter {
                class: "DIBrokenTestClass".into(),
                parameter: "something".into(),
            })
        );
    }

    #[test]
    fn test_bind_invalid_interface() {
        let container = Container::new(catalog());

        let err = container.bind("ISomething", 1i32).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InterfaceBinding);

        let err = container.bind("ISomething", vec!["A", "B"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InterfaceBinding);

        let err = container.bind("", "A").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InterfaceBinding);

        assert!(!container.is_bound("ISomething"));
    }

    #[test]
    fn test_bind_to_instance_uses_its_class() {
        let container = Container::new(catalog());
        let instance = Instance::new("DITestClass", DITestClass::new());

        container.bind("ITest", &instance).unwrap();
        assert_eq!(container.resolve_class_name("ITest").unwrap(), "DITestClass");
    }

    #[test]
    fn test_invalid_instantiation() {
        let container = Container::new(catalog());
        container.add_component("DIAbstractTestClass").unwrap();

        let err = container.get_component("DIAbstractTestClass").unwrap_err();
        assert_eq!(
            err,
            DiError::ClassInstantiation(InstantiationFailure::AbstractClass {
                class: "DIAbstractTestClass".into(),
            })
        );
    }

    #[test]
    fn test_interface_without_implementor_cannot_be_constructed() {
        let container = Container::new(catalog());
        let err = container.get_component("DITestInterface").unwrap_err();
        assert_eq!(
            err,
            DiError::ClassInstantiation(InstantiationFailure::Interface {
                interface: "DITestInterface".into(),
            })
        );
    }

    #[test]
    fn test_class_without_constructor() {
        let container = Container::new(catalog());
        let err = container.get_component("ComponentA").unwrap_err();
        assert!(matches!(
            err,
            DiError::ClassInstantiation(InstantiationFailure::NoConstructor { .. })
        ));
    }

    #[test]
    fn test_unknown_type() {
        let container = Container::new(catalog());
        let err = container.get_component("NoSuchClass").unwrap_err();
        assert_eq!(err, DiError::unknown_type("NoSuchClass".into()));
    }

    #[test]
    fn test_duplicate_component() {
        let container = Container::new(catalog());

        let err = container
            .add_component(vec![
                Instance::new("ComponentA", ComponentA),
                Instance::new("ComponentA", ComponentA),
            ])
            .unwrap_err();
        assert_eq!(err, DiError::DuplicateClass { class: "ComponentA".into() });
        assert!(container.is_empty());
        assert!(!container.contains("ComponentA"));
    }

    #[test]
    fn test_duplicate_names_in_batch() {
        let container = Container::new(catalog());
        let err = container
            .add_component(Input::list([
                Input::from("DITestClass"),
                Input::from(vec!["DINeedyTestClass", "DITestClass"]),
            ]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateClass);
        assert!(!container.contains("DITestClass"));
    }

    #[test]
    fn test_duplicate_component_retrieval() {
        let container = Container::new(catalog());
        let a = Instance::new("ComponentA", ComponentA);
        let b = Instance::new("ComponentB", ComponentB);
        container.add_component(vec![a.clone(), b.clone()]).unwrap();

        let components = container.get_implementors("DITestInterfaceA").unwrap();
        assert_eq!(components.len(), 2);
        assert!(components[0].ptr_eq(&a));
        assert!(components[1].ptr_eq(&b));
        assert!(container.get_implementors("DITestInterface").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_binding() {
        let container = Container::new(catalog());
        container
            .add_component(vec![
                Instance::new("ComponentA", ComponentA),
                Instance::new("ComponentB", ComponentB),
            ])
            .unwrap();

        let err = container.get_component("DITestInterfaceA").unwrap_err();
        assert_eq!(
            err,
            DiError::ClassResolution(ResolutionFailure::AmbiguousInterface {
                interface: "DITestInterfaceA".into(),
                candidates: vec!["ComponentA".into(), "ComponentB".into()],
            })
        );
    }

    #[test]
    fn test_binding_to_ambiguous_interface() {
        let container = Container::new(catalog());
        container
            .add_component(vec![
                Instance::new("ComponentA", ComponentA),
                Instance::new("ComponentB", ComponentB),
            ])
            .unwrap();
        container.bind("Alias", "DITestInterfaceA").unwrap();

        let err = container.get_component("Alias").unwrap_err();
        assert!(err.is_resolution());
        assert_eq!(
            err,
            DiError::ClassResolution(ResolutionFailure::AmbiguousInterface {
                interface: "DITestInterfaceA".into(),
                candidates: vec!["ComponentA".into(), "ComponentB".into()],
            })
        );
    }

    #[test]
    fn test_binding_to_interface_with_one_implementor() {
        let container = Container::new(catalog());
        let a = Instance::new("ComponentA", ComponentA);
        container.add_component(a.clone()).unwrap();
        container.bind("Alias", "DITestInterfaceA").unwrap();

        assert!(container.get_component("Alias").unwrap().ptr_eq(&a));
    }

    #[test]
    fn test_registered_names_count_as_implementors() {
        let container = Container::new(catalog());
        container
            .add_component(vec!["ComponentA", "ComponentB"])
            .unwrap();

        let err = container.get_component("DITestInterfaceA").unwrap_err();
        assert_eq!(
            err,
            DiError::ClassResolution(ResolutionFailure::AmbiguousInterface {
                interface: "DITestInterfaceA".into(),
                candidates: vec!["ComponentA".into(), "ComponentB".into()],
            })
        );
    }

    #[test]
    fn test_explicit_binding_disambiguates() {
        let container = Container::new(catalog());
        let b = Instance::new("ComponentB", ComponentB);
        container
            .add_component(vec![Instance::new("ComponentA", ComponentA), b.clone()])
            .unwrap();
        container.bind("DITestInterfaceA", "ComponentB").unwrap();

        assert!(container.get_component("DITestInterfaceA").unwrap().ptr_eq(&b));
    }

    #[test]
    fn test_constructor_components() {
        let object = DITestClass::new();
        let expected = object.id;

        let container = Container::builder(catalog())
            .flags(Flags::DEFAULT_FLAGS)
            .component(Instance::new("DITestClass", object))
            .build()
            .unwrap();

        let component = container.get_component("DITestClass").unwrap();
        assert_eq!(test_id(&component), expected);
    }

    #[test]
    fn test_constructor_bindings() {
        let object = DITestClass::new();
        let expected = object.id;

        let container = Container::builder(catalog())
            .component(Instance::new("DITestClass", object))
            .binding("ITestInterfaceOfDoom", "DITestClass")
            .build()
            .unwrap();

        let component = container.get_component("ITestInterfaceOfDoom").unwrap();
        assert_eq!(test_id(&component), expected);
    }

    #[test]
    fn test_builder_rejects_invalid_initial_state() {
        let duplicate = Container::builder(catalog())
            .component("DITestClass")
            .component("DITestClass")
            .build()
            .unwrap_err();
        assert_eq!(duplicate.kind(), ErrorKind::DuplicateClass);

        let bad_binding = Container::builder(catalog())
            .binding("IThing", 42i32)
            .build()
            .unwrap_err();
        assert_eq!(bad_binding.kind(), ErrorKind::InterfaceBinding);
    }

    #[test]
    fn test_self_instance() {
        let container = Container::new(catalog());
        container.bind("IMarker", "Marker").unwrap();

        let component = container.get::<Container>(Container::IDENTIFIER).unwrap();
        assert!(component.is_bound("IMarker"));
        assert!(container.contains(Container::IDENTIFIER));
        assert!(container.is_empty());
    }

    #[test]
    fn test_container_injected_as_dependency() {
        struct Locator {
            container: Container,
        }

        let registry = catalog().class::<Locator>("Locator", |c| {
            c.param("injector", Container::IDENTIFIER).constructor(|args| {
                Ok(Locator {
                    container: args.container(0)?,
                })
            })
        });
        let container = Container::new(registry);
        let locator = container.get::<Locator>("Locator").unwrap();

        container.add_component("DITestClass").unwrap();
        assert!(locator.container.contains("DITestClass"));
    }

    #[test]
    fn test_namespace_component() {
        let container = Container::new(catalog());
        container.add_component("DINamespaceTestClass").unwrap();

        let component = container
            .get::<DINamespaceTestClass>("DINamespaceTestClass")
            .unwrap();
        assert_eq!(component.test.get_test(), "Honk");
    }

    #[test]
    fn test_parameter_defaults() {
        trait Formatter: Send + Sync {
            fn format(&self) -> &'static str;
        }
        struct Plain;
        impl Formatter for Plain {
            fn format(&self) -> &'static str {
                "plain"
            }
        }
        struct Fancy;
        impl Formatter for Fancy {
            fn format(&self) -> &'static str {
                "fancy"
            }
        }
        struct Report {
            formatter: Arc<dyn Formatter>,
            pages: usize,
        }

        let registry = TypeRegistry::new()
            .interface("Formatter")
            .class::<Fancy>("Fancy", |c| {
                c.implements_as::<dyn Formatter>("Formatter", |f| f)
                    .constructor(|_| Ok(Fancy))
            })
            .class::<Report>("Report", |c| {
                c.param_or("formatter", "Formatter", Arc::new(Plain) as Arc<dyn Formatter>)
                    .untyped_param_or("pages", 10usize)
                    .constructor(|args| {
                        Ok(Report {
                            formatter: args.view::<dyn Formatter>(0)?,
                            pages: *args.get::<usize>(1)?,
                        })
                    })
            });

        let unbound = Container::new(registry.clone());
        let report = unbound.get::<Report>("Report").unwrap();
        assert_eq!(report.formatter.format(), "plain");
        assert_eq!(report.pages, 10);

        let bound = Container::new(registry);
        bound.bind("Formatter", "Fancy").unwrap();
        let report = bound.get::<Report>("Report").unwrap();
        assert_eq!(report.formatter.format(), "fancy");
    }

    #[test]
    fn test_get_type_mismatch() {
        let container = Container::new(catalog());
        let err = container.get::<String>("DITestClass").unwrap_err();
        assert!(matches!(
            err,
            DiError::ClassResolution(ResolutionFailure::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_targets() {
        let container = Container::new(catalog());
        assert!(container.get_component(7i32).unwrap_err().is_resolution());
        assert!(container
            .get_component(vec!["DITestClass", "DINeedyTestClass"])
            .unwrap_err()
            .is_resolution());
        assert!(container.add_component(1.5f64).unwrap_err().is_resolution());
        assert!(!container.contains(3i32));
    }

    #[test]
    fn test_concurrent_resolution_shares_singleton() {
        let container = Container::new(catalog());
        container.add_component("DITestClass").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let container = container.clone();
                std::thread::spawn(move || test_id(&container.get_component("DITestClass").unwrap()))
            })
            .collect();

        let ids: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let stored = test_id(&container.get_component("DITestClass").unwrap());
        assert!(ids.iter().all(|&id| id == stored));
    }
}
