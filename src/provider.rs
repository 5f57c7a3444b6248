//! Component values and the shared instance handle
//!
//! Every value the container hands out is an [`Instance`]: the concrete
//! class identifier plus a type-erased `Arc` of the value.

use crate::catalog::TypeInfo;
use crate::Identifier;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Values a component can hold.
///
/// Implemented for every `Send + Sync + 'static` type; constructors may run on
/// any thread and singletons are shared across threads.
pub trait Injectable: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Injectable for T {}

/// Type-erased shared value
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// A shared handle to a component.
///
/// Cloning is cheap and never copies the value; two handles obtained for
/// the same singleton satisfy [`Instance::ptr_eq`].
///
/// # Examples
///
/// ```rust
/// use component_resolver::Instance;
///
/// struct Mailer { host: String }
///
/// let mailer = Instance::new("App\\Mailer", Mailer { host: "smtp".into() });
/// assert_eq!(mailer.class(), "App\\Mailer");
/// assert_eq!(mailer.downcast::<Mailer>().unwrap().host, "smtp");
/// ```
#[derive(Clone)]
pub struct Instance {
    class: Identifier,
    value: AnyArc,
    info: Option<Arc<TypeInfo>>,
}

impl Instance {
    /// Wrap a value under its concrete class identifier
    #[inline]
    pub fn new<T: Injectable>(class: impl Into<Identifier>, value: T) -> Self {
        Self::from_arc(class, Arc::new(value))
    }

    /// Wrap an existing `Arc`, keeping its identity
    #[inline]
    pub fn from_arc<T: Injectable>(class: impl Into<Identifier>, value: Arc<T>) -> Self {
        Self {
            class: class.into(),
            value: value as AnyArc,
            info: None,
        }
    }

    #[inline]
    pub(crate) fn from_erased(class: Identifier, value: AnyArc) -> Self {
        Self {
            class,
            value,
            info: None,
        }
    }

    /// Attach the catalog definition so interface views can be produced
    #[inline]
    pub(crate) fn with_info(mut self, info: Option<Arc<TypeInfo>>) -> Self {
        if self.info.is_none() {
            self.info = info;
        }
        self
    }

    /// The concrete class this instance was created as
    #[inline]
    pub fn class(&self) -> &Identifier {
        &self.class
    }

    /// The catalog definition of the class, once the container stored it
    #[inline]
    pub fn type_info(&self) -> Option<&Arc<TypeInfo>> {
        self.info.as_ref()
    }

    /// The type-erased value
    #[inline]
    pub fn as_any(&self) -> &AnyArc {
        &self.value
    }

    /// Check whether the value is a `T`
    #[inline]
    pub fn is<T: Injectable>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Get the value as `Arc<T>` if it is a `T`
    #[inline]
    pub fn downcast<T: Injectable>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    /// Borrow the value as `&T` if it is a `T`
    #[inline]
    pub fn downcast_ref<T: Injectable>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// View the value through an interface, e.g. `Arc<dyn Greeter>`.
    ///
    /// Works when the class declared the interface with
    /// [`ClassBuilder::implements_as`](crate::ClassBuilder::implements_as),
    /// or when the value itself is an `Arc<I>`.
    pub fn view<I: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<I>> {
        if let Some(view) = self.info.as_ref().and_then(|info| info.cast::<I>(&self.value)) {
            return Some(view);
        }
        self.value.downcast_ref::<Arc<I>>().cloned()
    }

    /// Check whether two handles share the same underlying value
    #[inline]
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.value), Arc::as_ptr(&other.value))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class)
            .field("has_type_info", &self.info.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct TestService {
        value: i32,
    }

    #[test]
    fn test_downcast() {
        let instance = Instance::new("TestService", TestService { value: 42 });

        assert!(instance.is::<TestService>());
        assert!(!instance.is::<String>());
        assert_eq!(instance.downcast::<TestService>().unwrap().value, 42);
        assert_eq!(instance.downcast_ref::<TestService>(), Some(&TestService { value: 42 }));
        assert!(instance.downcast::<String>().is_none());
    }

    #[test]
    fn test_clones_share_value() {
        let a = Instance::new("TestService", TestService { value: 1 });
        let b = a.clone();
        let c = Instance::new("TestService", TestService { value: 1 });

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn test_from_arc_keeps_identity() {
        let value = Arc::new(TestService { value: 7 });
        let instance = Instance::from_arc("TestService", Arc::clone(&value));

        assert!(Arc::ptr_eq(&value, &instance.downcast::<TestService>().unwrap()));
    }

    #[test]
    fn test_view_of_stored_trait_object() {
        trait Greeter: Send + Sync {
            fn greet(&self) -> String;
        }
        struct Hello;
        impl Greeter for Hello {
            fn greet(&self) -> String {
                "hello".into()
            }
        }

        let greeter: Arc<dyn Greeter> = Arc::new(Hello);
        let instance = Instance::new("Greeter", greeter);

        assert_eq!(instance.view::<dyn Greeter>().unwrap().greet(), "hello");
    }
}
