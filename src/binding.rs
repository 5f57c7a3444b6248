//! Alias bindings
//!
//! Maps an alias (usually an interface name) to exactly one concrete class
//! identifier. Uses DashMap so bindings can be read while another thread
//! registers components.

use crate::Identifier;
use ahash::RandomState;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Alias → concrete class table
pub(crate) struct BindingTable {
    bindings: DashMap<Identifier, Identifier, RandomState>,
}

impl BindingTable {
    /// Create an empty table.
    ///
    /// Uses 8 shards; containers rarely hold more than a few dozen bindings.
    #[inline]
    pub fn new() -> Self {
        Self {
            bindings: DashMap::with_capacity_and_hasher_and_shard_amount(
                0,
                RandomState::new(),
                8,
            ),
        }
    }

    /// Bind `alias` to `target`, returning the previous target
    #[inline]
    pub fn bind(&self, alias: Identifier, target: Identifier) -> Option<Identifier> {
        self.bindings.insert(alias, target)
    }

    /// Bind `alias` unless it is already bound. Returns `true` if bound now.
    pub fn bind_if_absent(&self, alias: Identifier, target: Identifier) -> bool {
        match self.bindings.entry(alias) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(target);
                true
            }
        }
    }

    /// The bound target, if any
    #[inline]
    pub fn get(&self, alias: &Identifier) -> Option<Identifier> {
        self.bindings.get(alias).map(|target| target.value().clone())
    }

    /// The bound target, or the identifier itself when unbound
    #[inline]
    pub fn resolve_alias(&self, id: &Identifier) -> Identifier {
        self.get(id).unwrap_or_else(|| id.clone())
    }

    #[inline]
    pub fn is_bound(&self, alias: &Identifier) -> bool {
        self.bindings.contains_key(alias)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

impl std::fmt::Debug for BindingTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingTable")
            .field("count", &self.len())
            .finish()
    }
}
