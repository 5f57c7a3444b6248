#![no_main]

//! Fuzz target for component resolution
//!
//! Builds a random catalog of classes, abstract classes and interfaces with
//! random constructor dependencies, then runs random registrations, bindings
//! and lookups against a container over it.

use arbitrary::Arbitrary;
use component_resolver::{
    Container, DiError, Flags, Instance, InstantiationFailure, TypeRegistry,
};
use libfuzzer_sys::fuzz_target;

const NAMES: [&str; 8] = ["T0", "T1", "T2", "T3", "T4", "T5", "T6", "T7"];

fn name(index: u8) -> &'static str {
    NAMES[index as usize % NAMES.len()]
}

/// Value stored for every fuzzed class
struct Node(usize);

#[derive(Debug, Arbitrary)]
enum Shape {
    Class,
    Abstract,
    Interface,
    Missing,
}

#[derive(Debug, Arbitrary)]
enum Param {
    Typed(u8),
    TypedOr(u8),
    Untyped,
    UntypedOr,
    Container,
}

#[derive(Debug, Arbitrary)]
struct TypeSpec {
    shape: Shape,
    implements: Vec<u8>,
    params: Vec<Param>,
}

#[derive(Debug, Arbitrary)]
enum Op {
    AddName(u8),
    AddInstance(u8),
    AddBatch(Vec<u8>),
    Bind(u8, u8),
    Get(u8, bool),
    Implementors(u8),
    ResolveName(u8),
}

#[derive(Debug, Arbitrary)]
struct Scenario {
    flags: u8,
    types: Vec<TypeSpec>,
    ops: Vec<Op>,
}

fn build_registry(types: Vec<TypeSpec>) -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    for (index, def) in types.into_iter().take(NAMES.len()).enumerate() {
        let type_name = NAMES[index];
        let implements: Vec<&str> = def.implements.iter().map(|&i| name(i)).collect();
        registry = match def.shape {
            Shape::Missing => registry,
            Shape::Interface => registry.interface_extending(type_name, implements),
            Shape::Abstract => registry.abstract_class(type_name, implements),
            Shape::Class => registry.class::<Node>(type_name, move |mut class| {
                for interface in implements {
                    class = class.implements(interface);
                }
                for (i, param) in def.params.iter().enumerate() {
                    let param_name = format!("p{i}");
                    class = match *param {
                        Param::Typed(t) => class.param(param_name, name(t)),
                        Param::TypedOr(t) => class.param_or(param_name, name(t), 0u8),
                        Param::Untyped => class.untyped_param(param_name),
                        Param::UntypedOr => class.untyped_param_or(param_name, 0u8),
                        Param::Container => class.param(param_name, Container::IDENTIFIER),
                    };
                }
                let arity = def.params.len();
                class.constructor(move |args| {
                    let node = Node(args.len());
                    assert_eq!(node.0, arity, "constructor got the wrong argument count");
                    Ok(node)
                })
            }),
        };
    }
    registry
}

fn check_error(err: &DiError) {
    if let DiError::ClassInstantiation(InstantiationFailure::CyclicDependency { chain }) = err {
        let (last, rest) = chain.split_last().expect("cycle chain is never empty");
        assert!(rest.contains(last), "cycle chain must revisit its last class");
    }
}

fuzz_target!(|scenario: Scenario| {
    let container = Container::with_flags(
        build_registry(scenario.types),
        Flags::from_bits_truncate(scenario.flags as u32),
    );

    let mut stored = 0;
    for op in scenario.ops {
        match op {
            Op::AddName(t) => {
                container.add_component(name(t)).expect("single name is never a duplicate");
            }
            Op::AddInstance(t) => {
                container
                    .add_component(Instance::new(name(t), Node(0)))
                    .expect("single instance is never a duplicate");
            }
            Op::AddBatch(batch) => {
                let names: Vec<&str> = batch.iter().map(|&t| name(t)).collect();
                let mut unique = names.clone();
                unique.sort_unstable();
                unique.dedup();

                let before = container.len();
                match container.add_component(names.clone()) {
                    Ok(()) => assert_eq!(unique.len(), names.len()),
                    Err(err) => {
                        assert!(matches!(err, DiError::DuplicateClass { .. }));
                        assert_eq!(container.len(), before);
                    }
                }
            }
            Op::Bind(alias, target) => {
                container.bind(name(alias), name(target)).expect("binding a name never fails");
                assert_eq!(
                    container.resolve_class_name(name(alias)).unwrap(),
                    name(target)
                );
            }
            Op::Get(t, auto_add) => {
                let first = container.get_component_with(name(t), auto_add);
                let second = container.get_component_with(name(t), auto_add);
                match (&first, &second) {
                    (Ok(a), Ok(b)) => assert!(a.ptr_eq(b), "singleton changed between lookups"),
                    (Ok(_), Err(err)) => panic!("resolved once, then failed: {err}"),
                    (Err(err), _) => check_error(err),
                }
            }
            Op::Implementors(t) => {
                let interface = name(t);
                for instance in container.get_implementors(interface).unwrap() {
                    assert!(
                        *instance.class() == interface
                            || container
                                .catalog()
                                .interfaces_of(instance.class())
                                .iter()
                                .any(|i| *i == interface)
                    );
                }
            }
            Op::ResolveName(t) => {
                let _ = container.resolve_class_names(vec![name(t), Container::IDENTIFIER]);
            }
        }

        // Stored singletons are never dropped
        assert!(container.len() >= stored);
        stored = container.len();
    }
});
