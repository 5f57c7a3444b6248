//! Identifiers and input normalization
//!
//! Callers name components in several shapes: a class name, an already
//! constructed [`Instance`], or an arbitrarily nested list of both. The
//! functions here flatten any of those into an ordered list of
//! [`Identifier`]s.

use crate::{DiError, Instance, Result};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Fully-qualified name of a class or interface.
///
/// Cheap to clone (`Arc<str>`). Compared exactly, byte for byte, so
/// `Db\Connection` and `db\connection` are different identifiers.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(Arc<str>);

impl Identifier {
    /// Create an identifier from any string-like value
    #[inline]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for Identifier {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&Identifier> for Identifier {
    fn from(id: &Identifier) -> Self {
        id.clone()
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Anything a caller can hand to the container to name components.
///
/// Conversions exist from strings, identifiers, instances, vectors and
/// arrays, so most call sites never spell out a variant:
///
/// ```rust
/// use component_resolver::{resolve_identifiers, Input};
///
/// let ids = resolve_identifiers(Input::list([
///     Input::from("MyClassA"),
///     Input::from(vec!["MyClassB", "MyClassC"]),
/// ]))
/// .unwrap();
/// assert_eq!(ids, ["MyClassA", "MyClassB", "MyClassC"]);
/// ```
#[derive(Debug, Clone)]
pub enum Input {
    /// A class or interface name
    Name(String),
    /// A constructed component; names its concrete class
    Instance(Instance),
    /// Nested inputs, flattened depth-first
    List(Vec<Input>),
    /// A plain value that names nothing, kept only for its Rust type name
    Raw(&'static str),
}

impl Input {
    /// Build a list input from anything iterable
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Input>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Wrap a value that is not a component; normalizing it always fails
    pub fn raw<T: 'static>(_value: T) -> Self {
        Self::Raw(std::any::type_name::<T>())
    }
}

impl From<&str> for Input {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for Input {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for Input {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

impl From<Identifier> for Input {
    fn from(id: Identifier) -> Self {
        Self::Name(id.as_str().to_owned())
    }
}

impl From<&Identifier> for Input {
    fn from(id: &Identifier) -> Self {
        Self::Name(id.as_str().to_owned())
    }
}

impl From<Instance> for Input {
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

impl From<&Instance> for Input {
    fn from(instance: &Instance) -> Self {
        Self::Instance(instance.clone())
    }
}

impl<T: Into<Input>> From<Vec<T>> for Input {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl<T: Into<Input>, const N: usize> From<[T; N]> for Input {
    fn from(items: [T; N]) -> Self {
        Self::list(items)
    }
}

macro_rules! impl_raw_input {
    ($($t:ty),+ $(,)?) => {
        $(
            impl From<$t> for Input {
                fn from(value: $t) -> Self {
                    Self::raw(value)
                }
            }
        )+
    };
}

impl_raw_input!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64, bool, char, ());

/// One flattened element: a bare name or a constructed instance
#[derive(Debug, Clone)]
pub(crate) enum Target {
    Name(Identifier),
    Instance(Instance),
}

impl Target {
    #[inline]
    pub(crate) fn identifier(&self) -> &Identifier {
        match self {
            Self::Name(id) => id,
            Self::Instance(instance) => instance.class(),
        }
    }
}

/// Flatten an input keeping instances, so registration can store them.
pub(crate) fn flatten(input: Input) -> Result<Vec<Target>> {
    let mut out = Vec::new();
    flatten_into(input, &mut out)?;
    Ok(out)
}

fn flatten_into(input: Input, out: &mut Vec<Target>) -> Result<()> {
    match input {
        Input::Name(name) => {
            if name.is_empty() {
                return Err(DiError::invalid_input("empty name"));
            }
            out.push(Target::Name(Identifier::from(name)));
        }
        Input::Instance(instance) => out.push(Target::Instance(instance)),
        Input::List(items) => {
            for item in items {
                flatten_into(item, out)?;
            }
        }
        Input::Raw(kind) => return Err(DiError::invalid_input(kind)),
    }
    Ok(())
}

/// Normalize any input into a flat, order-preserving list of identifiers.
///
/// Names map to themselves, instances to their concrete class, and lists
/// are flattened depth-first. Raw values and empty names fail with
/// [`DiError::ClassResolution`].
pub fn resolve_identifiers(input: impl Into<Input>) -> Result<Vec<Identifier>> {
    Ok(flatten(input.into())?
        .into_iter()
        .map(|target| match target {
            Target::Name(id) => id,
            Target::Instance(instance) => instance.class().clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, ResolutionFailure};

    #[test]
    fn test_name_resolves_to_itself() {
        assert_eq!(resolve_identifiers("Exception").unwrap(), ["Exception"]);
    }

    #[test]
    fn test_list_keeps_order() {
        let ids = resolve_identifiers(vec!["MyClassA", "MyClassB"]).unwrap();
        assert_eq!(ids, ["MyClassA", "MyClassB"]);
    }

    #[test]
    fn test_nested_lists_flatten() {
        let ids = resolve_identifiers(vec![vec!["MyClassA", "MyClassB"], vec!["MyClassC"]]).unwrap();
        assert_eq!(ids, ["MyClassA", "MyClassB", "MyClassC"]);
    }

    #[test]
    fn test_instance_resolves_to_class() {
        let instance = Instance::new("Exception", String::from("boom"));
        assert_eq!(resolve_identifiers(&instance).unwrap(), ["Exception"]);
    }

    #[test]
    fn test_mixed_input() {
        let mixed = Input::list([
            Input::from("MyClassA"),
            Input::list([
                Input::from("MyClassB"),
                Input::from("MyClassC"),
                Input::from(["MyClassD"]),
            ]),
            Input::from(Instance::new("Exception", 0u8)),
        ]);

        let ids = resolve_identifiers(mixed).unwrap();
        assert_eq!(ids, ["MyClassA", "MyClassB", "MyClassC", "MyClassD", "Exception"]);
    }

    #[test]
    fn test_integer_is_invalid() {
        let err = resolve_identifiers(1i32).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ClassResolution);
        assert_eq!(
            err,
            DiError::ClassResolution(ResolutionFailure::InvalidInput { kind: "i32" })
        );
    }

    #[test]
    fn test_raw_inside_list_is_invalid() {
        let input = Input::list([Input::from("MyClassA"), Input::from(2.5f64)]);
        assert!(resolve_identifiers(input).unwrap_err().is_resolution());
    }

    #[test]
    fn test_empty_name_is_invalid() {
        assert!(resolve_identifiers("").unwrap_err().is_resolution());
    }

    #[test]
    fn test_empty_list_yields_nothing() {
        let empty: Vec<&str> = Vec::new();
        assert!(resolve_identifiers(empty).unwrap().is_empty());
    }

    #[test]
    fn test_identifier_comparison_is_exact() {
        assert_ne!(Identifier::from("Foo"), Identifier::from("foo"));
        assert_eq!(Identifier::from("NamespaceTest\\TestClass"), "NamespaceTest\\TestClass");
    }
}
