//! Singleton storage for the container
//!
//! Holds one record per concrete class, in insertion order, plus the set of
//! classes registered by name whose construction is still pending.

use crate::{DiError, Identifier, Instance, ResolutionFailure, Result};
use ahash::RandomState;
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A stored singleton and every identifier it satisfies
struct Record {
    instance: Instance,
    /// The concrete class followed by all implemented interfaces
    satisfies: Vec<Identifier>,
}

impl Record {
    #[inline]
    fn satisfies(&self, id: &Identifier) -> bool {
        self.satisfies.iter().any(|s| s == id)
    }
}

#[derive(Default)]
struct StoreInner {
    records: Vec<Record>,
    index: HashMap<Identifier, usize, RandomState>,
    pending: HashSet<Identifier, RandomState>,
}

/// Instance store
///
/// Register-once: the first registration of a class wins, later ones are
/// ignored. The lock is never held while user code runs.
#[derive(Default)]
pub(crate) struct InstanceStore {
    inner: RwLock<StoreInner>,
}

impl InstanceStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the instance stored under `id`
    #[inline]
    pub fn get(&self, id: &Identifier) -> Option<Instance> {
        let inner = self.read();
        inner
            .index
            .get(id)
            .map(|&slot| inner.records[slot].instance.clone())
    }

    /// Check if `id` was registered by name and not yet constructed
    #[inline]
    pub fn is_pending(&self, id: &Identifier) -> bool {
        self.read().pending.contains(id)
    }

    /// Check if `id` is stored or pending
    #[inline]
    pub fn is_registered(&self, id: &Identifier) -> bool {
        let inner = self.read();
        inner.index.contains_key(id) || inner.pending.contains(id)
    }

    /// Register `id` for construction on first retrieval.
    ///
    /// Returns `false` if it was already stored or pending.
    pub fn mark_pending(&self, id: Identifier) -> bool {
        let mut inner = self.write();
        if inner.index.contains_key(&id) {
            return false;
        }
        inner.pending.insert(id)
    }

    /// Store a pre-built instance.
    ///
    /// Returns `false` (and stores nothing) if its class was already
    /// stored or pending.
    pub fn put(&self, instance: Instance, interfaces: Vec<Identifier>) -> bool {
        let mut inner = self.write();
        let class = instance.class();
        if inner.index.contains_key(class) || inner.pending.contains(class) {
            return false;
        }
        Self::push(&mut inner, instance, interfaces);
        true
    }

    /// Store a freshly constructed instance, clearing its pending mark.
    ///
    /// If another instance of the class was stored in the meantime, that
    /// one is kept and returned instead.
    pub fn fulfil(&self, instance: Instance, interfaces: Vec<Identifier>) -> Instance {
        let mut inner = self.write();
        inner.pending.remove(instance.class());
        if let Some(&slot) = inner.index.get(instance.class()) {
            return inner.records[slot].instance.clone();
        }
        Self::push(&mut inner, instance.clone(), interfaces);
        instance
    }

    fn push(inner: &mut StoreInner, instance: Instance, interfaces: Vec<Identifier>) {
        let class = instance.class().clone();
        let mut satisfies = Vec::with_capacity(interfaces.len() + 1);
        satisfies.push(class.clone());
        satisfies.extend(interfaces);

        let slot = inner.records.len();
        inner.records.push(Record {
            instance,
            satisfies,
        });
        inner.index.insert(class, slot);
    }

    /// Every stored instance satisfying `id`, in insertion order
    pub fn implementors(&self, id: &Identifier) -> Vec<Instance> {
        self.read()
            .records
            .iter()
            .filter(|record| record.satisfies(id))
            .map(|record| record.instance.clone())
            .collect()
    }

    /// The single stored instance satisfying `id`.
    ///
    /// `Ok(None)` when nothing matches; an ambiguity error when more than
    /// one instance does.
    pub fn single_implementor(&self, id: &Identifier) -> Result<Option<Instance>> {
        let mut found = self.implementors(id);
        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop()),
            _ => Err(DiError::ClassResolution(
                ResolutionFailure::AmbiguousInterface {
                    interface: id.clone(),
                    candidates: found.iter().map(|i| i.class().clone()).collect(),
                },
            )),
        }
    }

    /// Stored classes, in insertion order
    pub fn classes(&self) -> Vec<Identifier> {
        self.read()
            .records
            .iter()
            .map(|record| record.instance.class().clone())
            .collect()
    }

    /// Classes registered by name and not yet constructed, sorted
    pub fn pending_classes(&self) -> Vec<Identifier> {
        let mut classes: Vec<Identifier> = self.read().pending.iter().cloned().collect();
        classes.sort_unstable();
        classes
    }

    /// Number of stored instances (pending registrations excluded)
    #[inline]
    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    /// Number of registrations awaiting construction
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.read().pending.len()
    }
}

impl std::fmt::Debug for InstanceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceStore")
            .field("count", &self.len())
            .field("pending", &self.pending_len())
            .finish()
    }
}
