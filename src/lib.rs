//! # Component Resolver - Reflective Dependency Injection for Rust
//!
//! A runtime container that resolves components by *name*. Callers describe
//! their classes and interfaces once in a [`TypeCatalog`]; the container then
//! normalizes requests, follows alias bindings, keeps one singleton per class
//! and constructs missing components recursively from their constructor
//! parameters.
//!
//! ## Features
//!
//! - **Name based** - Components are identified by class or interface name,
//!   so bindings and registrations can come from configuration
//! - **Singletons** - Each concrete class is constructed at most once
//! - **Interface lookup** - An unbound interface resolves to its only
//!   implementor; several implementors are an error unless one is bound
//! - **Cycle detection** - Dependency cycles are reported with the full chain
//! - **Precise errors** - Callers can branch on [`ErrorKind`]
//! - **Observable** - Optional tracing integration with JSON or pretty output
//!
//! ## Quick Start
//!
//! ```rust
//! use component_resolver::{Container, TypeRegistry};
//! use std::sync::Arc;
//!
//! trait Transport: Send + Sync {
//!     fn send(&self, to: &str) -> String;
//! }
//!
//! struct Smtp;
//! impl Transport for Smtp {
//!     fn send(&self, to: &str) -> String {
//!         format!("smtp -> {to}")
//!     }
//! }
//!
//! struct Mailer {
//!     transport: Arc<dyn Transport>,
//! }
//!
//! let registry = TypeRegistry::new()
//!     .interface("Transport")
//!     .class::<Smtp>("Smtp", |c| {
//!         c.implements_as::<dyn Transport>("Transport", |s| s)
//!             .constructor(|_| Ok(Smtp))
//!     })
//!     .class::<Mailer>("Mailer", |c| {
//!         c.param("transport", "Transport").constructor(|args| {
//!             Ok(Mailer { transport: args.view::<dyn Transport>(0)? })
//!         })
//!     });
//!
//! let container = Container::new(registry);
//! container.add_component(["Smtp", "Mailer"]).unwrap();
//!
//! let mailer = container.get::<Mailer>("Mailer").unwrap();
//! assert_eq!(mailer.transport.send("bob"), "smtp -> bob");
//!
//! // Singletons: the same instance every time
//! let again = container.get::<Mailer>("Mailer").unwrap();
//! assert!(Arc::ptr_eq(&mailer, &again));
//! ```
//!
//! ## Bindings and Flags
//!
//! ```rust
//! use component_resolver::{Container, ErrorKind, Flags, TypeRegistry};
//!
//! struct Redis;
//!
//! let registry = TypeRegistry::new()
//!     .interface("Cache")
//!     .class::<Redis>("Redis", |c| c.implements("Cache").constructor(|_| Ok(Redis)));
//!
//! let container = Container::with_flags(registry, Flags::AUTO_BIND_INTERFACES);
//!
//! // Nothing registered, and auto-add is off
//! let err = container.get_component("Cache").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ClassResolution);
//!
//! // Registering Redis binds Cache -> Redis
//! container.add_component("Redis").unwrap();
//! assert_eq!(container.resolve_class_name("Cache").unwrap(), "Redis");
//! assert!(container.get::<Redis>("Cache").is_ok());
//! ```

mod binding;
mod catalog;
mod container;
mod error;
mod factory;
mod flags;
mod identifier;
#[cfg(feature = "logging")]
pub mod logging;
mod provider;
mod storage;

pub use catalog::*;
pub use container::*;
pub use error::*;
pub use factory::{Arguments, Constructor, Parameter};
pub use flags::Flags;
pub use identifier::{Identifier, Input, resolve_identifiers};
pub use provider::*;

// Re-export tracing macros for convenience when logging feature is enabled
#[cfg(feature = "logging")]
pub use tracing::{debug, error, info, trace, warn};

// Re-export for convenience
pub use std::sync::Arc;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Arguments, Container, ContainerBuilder, DiError, ErrorKind, Flags, Identifier, Injectable,
        Input, Instance, Result, TypeCatalog, TypeRegistry,
    };
    pub use std::sync::Arc;
}
