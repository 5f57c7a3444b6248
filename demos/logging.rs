//! Demo of the resolver's logging output
//!
//! Run with JSON logging (production):
//! ```bash
//! cargo run --example logging --features logging-json
//! ```
//!
//! Run with pretty logging (development):
//! ```bash
//! cargo run --example logging --features logging-pretty
//! ```

use component_resolver::{Container, Flags, Instance, TypeRegistry};
use std::sync::Arc;

trait Transport: Send + Sync {
    fn name(&self) -> &'static str;
}

struct Smtp;

impl Transport for Smtp {
    fn name(&self) -> &'static str {
        "smtp"
    }
}

struct Config {
    sender: String,
}

struct Mailer {
    transport: Arc<dyn Transport>,
    config: Arc<Config>,
}

struct Loop;

fn registry() -> TypeRegistry {
    TypeRegistry::new()
        .interface("App\\Transport")
        .class::<Smtp>("App\\Smtp", |c| {
            c.implements_as::<dyn Transport>("App\\Transport", |s| s)
                .constructor(|_| {
                    println!("  [App] Connecting SMTP transport...");
                    Ok(Smtp)
                })
        })
        .class::<Config>("App\\Config", |c| {
            c.constructor(|_| {
                Ok(Config {
                    sender: "default@example.com".into(),
                })
            })
        })
        .class::<Mailer>("App\\Mailer", |c| {
            c.param("transport", "App\\Transport")
                .param("config", "App\\Config")
                .constructor(|args| {
                    Ok(Mailer {
                        transport: args.view::<dyn Transport>(0)?,
                        config: args.get(1)?,
                    })
                })
        })
        .class::<Loop>("App\\Loop", |c| c.param("inner", "App\\Loop").constructor(|_| Ok(Loop)))
}

fn main() {
    // JSON if logging-json is enabled, pretty if logging-pretty is enabled
    component_resolver::logging::init();

    println!("=== Component Resolver Logging Demo ===\n");

    // logs: "Creating new component container"
    let container =
        Container::with_flags(registry(), Flags::DEFAULT_FLAGS | Flags::AUTO_BIND_INTERFACES);

    // logs: "Adding component" for each class
    container
        .add_component(vec![
            Instance::new(
                "App\\Config",
                Config {
                    sender: "noreply@example.com".into(),
                },
            ),
            Instance::new("App\\Smtp", Smtp),
        ])
        .unwrap();

    // logs: "Constructing component", "Invoking constructor", store hits for
    // both dependencies
    let mailer = container.get::<Mailer>("App\\Mailer").unwrap();
    println!(
        "  [App] Mailer sends as {} via {}",
        mailer.config.sender,
        mailer.transport.name()
    );

    // logs: "Component resolved from store"
    let again = container.get::<Mailer>("App\\Mailer").unwrap();
    assert!(Arc::ptr_eq(&mailer, &again));

    // logs: "Binding alias"
    container.bind("Mailer", "App\\Mailer").unwrap();
    let _ = container.get_component("Mailer").unwrap();

    // logs: "Component resolution failed" with the not-found error
    let missing = container.get_component_with("App\\Missing", false);
    assert!(missing.is_err());

    // logs: "Component resolution failed" with the cycle
    if let Err(err) = container.get_component("App\\Loop") {
        println!("  [App] {err}");
    }

    println!("\n=== Demo Complete ===");
    println!("Components: {:?}", container.components());
}
