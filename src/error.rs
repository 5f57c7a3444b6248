//! Error types for component resolution
//!
//! Every failure belongs to exactly one of four kinds. Callers branch on the
//! [`DiError`] variant (or on [`DiError::kind`]), never on message text.

use crate::Identifier;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while registering, binding or resolving components
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// The target could not be normalized, was ambiguous, or was not found
    #[error("Class resolution failed: {0}")]
    ClassResolution(ResolutionFailure),

    /// The resolved type could not be constructed
    #[error("Class instantiation failed: {0}")]
    ClassInstantiation(InstantiationFailure),

    /// `bind()` was given a target that is not exactly one identifier
    #[error("Cannot bind {alias}: {reason}")]
    InterfaceBinding { alias: String, reason: String },

    /// The same concrete class appeared twice in one registration batch
    #[error("Duplicate class in component batch: {class}")]
    DuplicateClass { class: Identifier },
}

/// Why a target could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionFailure {
    /// Input was neither a name, an instance nor a list of those
    InvalidInput { kind: &'static str },
    /// A single target was required but the input named zero or several
    NotSingleTarget { count: usize },
    /// More than one stored instance satisfies an unbound interface
    AmbiguousInterface {
        interface: Identifier,
        candidates: Vec<Identifier>,
    },
    /// Not registered and auto-add was disabled
    NotFound { identifier: Identifier },
    /// The type catalog has no definition for the identifier
    UnknownType { identifier: Identifier },
    /// The stored component is not of the requested Rust type
    TypeMismatch {
        identifier: Identifier,
        expected: &'static str,
    },
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { kind } => write!(f, "invalid input ({kind})"),
            Self::NotSingleTarget { count } => {
                write!(f, "expected a single target, input named {count}")
            }
            Self::AmbiguousInterface {
                interface,
                candidates,
            } => {
                write!(f, "ambiguous interface {interface}, implemented by ")?;
                write_list(f, candidates)
            }
            Self::NotFound { identifier } => write!(f, "component not found: {identifier}"),
            Self::UnknownType { identifier } => write!(f, "unknown type: {identifier}"),
            Self::TypeMismatch {
                identifier,
                expected,
            } => write!(f, "component {identifier} is not a {expected}"),
        }
    }
}

/// Why a resolved type could not be constructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstantiationFailure {
    /// Abstract classes have no constructor
    AbstractClass { class: Identifier },
    /// Interfaces cannot be constructed directly
    Interface { interface: Identifier },
    /// The class is known but was registered without a constructor
    NoConstructor { class: Identifier },
    /// A constructor parameter has neither a resolvable type nor a default
    UnresolvableParameter { class: Identifier, parameter: String },
    /// The class is already being constructed further up the chain
    CyclicDependency { chain: Vec<Identifier> },
    /// The constructor asked for an argument it was not given
    ArgumentMismatch {
        class: Identifier,
        index: usize,
        expected: &'static str,
    },
    /// The constructor itself reported a failure
    ConstructorFailed { class: Identifier, reason: String },
}

impl fmt::Display for InstantiationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbstractClass { class } => write!(f, "{class} is abstract"),
            Self::Interface { interface } => write!(f, "{interface} is an interface"),
            Self::NoConstructor { class } => write!(f, "{class} has no constructor"),
            Self::UnresolvableParameter { class, parameter } => {
                write!(f, "cannot resolve parameter '{parameter}' of {class}")
            }
            Self::CyclicDependency { chain } => {
                f.write_str("cyclic dependency: ")?;
                for (i, id) in chain.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" -> ")?;
                    }
                    write!(f, "{id}")?;
                }
                Ok(())
            }
            Self::ArgumentMismatch {
                class,
                index,
                expected,
            } => write!(f, "argument {index} of {class} is not a {expected}"),
            Self::ConstructorFailed { class, reason } => {
                write!(f, "constructor of {class} failed: {reason}")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, ids: &[Identifier]) -> fmt::Result {
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{id}")?;
    }
    Ok(())
}

/// The four error kinds, for callers that only care about the category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ClassResolution,
    ClassInstantiation,
    InterfaceBinding,
    DuplicateClass,
}

impl DiError {
    /// The kind of this error
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClassResolution(_) => ErrorKind::ClassResolution,
            Self::ClassInstantiation(_) => ErrorKind::ClassInstantiation,
            Self::InterfaceBinding { .. } => ErrorKind::InterfaceBinding,
            Self::DuplicateClass { .. } => ErrorKind::DuplicateClass,
        }
    }

    #[inline]
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::ClassResolution(_))
    }

    #[inline]
    pub fn is_instantiation(&self) -> bool {
        matches!(self, Self::ClassInstantiation(_))
    }

    /// Create an invalid-input resolution error
    #[inline]
    pub fn invalid_input(kind: &'static str) -> Self {
        Self::ClassResolution(ResolutionFailure::InvalidInput { kind })
    }

    /// Create a NotFound resolution error
    #[inline]
    pub fn not_found(identifier: Identifier) -> Self {
        Self::ClassResolution(ResolutionFailure::NotFound { identifier })
    }

    /// Create an UnknownType resolution error
    #[inline]
    pub fn unknown_type(identifier: Identifier) -> Self {
        Self::ClassResolution(ResolutionFailure::UnknownType { identifier })
    }

    /// Create a CyclicDependency instantiation error
    #[inline]
    pub fn cyclic(chain: Vec<Identifier>) -> Self {
        Self::ClassInstantiation(InstantiationFailure::CyclicDependency { chain })
    }

    /// Create a ConstructorFailed error
    ///
    /// Constructor closures return this when they cannot build their value.
    #[inline]
    pub fn creation_failed(class: impl Into<Identifier>, reason: impl Into<String>) -> Self {
        Self::ClassInstantiation(InstantiationFailure::ConstructorFailed {
            class: class.into(),
            reason: reason.into(),
        })
    }

    /// Create an InterfaceBinding error
    #[inline]
    pub fn binding(alias: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InterfaceBinding {
            alias: alias.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for DI operations
pub type Result<T> = std::result::Result<T, DiError>;
