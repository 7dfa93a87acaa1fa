//! # Name resolution and the unit registry.
//!
//! The engine never holds a global table of units. It is handed a
//! [`Resolver`] — the capability to turn a relationship name into a live
//! [`UnitRef`] — so multiple independent supervisor instances can coexist
//! and tests can substitute a handful of fakes.
//!
//! [`Registry`] is the shipped implementation: it owns every unit's
//! lifetime and hands out shared handles. Holders of a handle never
//! control a unit's lifetime; removal is the registry's decision and is
//! refused while the unit is not inactive.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::status::ActivationState;
use crate::units::{Supervisable, UnitRef};

/// Fallible name→unit lookup, injected into the engine.
pub trait Resolver: Send + Sync + 'static {
    /// Returns a handle to the named unit, if it is known.
    fn lookup(&self, name: &str) -> Option<UnitRef>;
}

/// Owns registered units and resolves names to shared handles.
pub struct Registry {
    units: RwLock<HashMap<String, UnitRef>>,
}

impl Registry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            units: RwLock::new(HashMap::new()),
        })
    }

    /// Registers a unit under its own name.
    ///
    /// Returns `false` (and leaves the existing entry alone) when the name
    /// is already taken.
    pub fn insert(&self, unit: UnitRef) -> bool {
        let mut units = self.units.write().expect("registry poisoned");
        match units.entry(unit.name().to_string()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(unit);
                true
            }
        }
    }

    /// Removes and returns a unit, but only once it is `Inactive`.
    ///
    /// An active, activating or failed unit stays registered and `None` is
    /// returned; handles held elsewhere keep a removed unit alive until
    /// they are dropped.
    pub fn remove(&self, name: &str) -> Option<UnitRef> {
        let mut units = self.units.write().expect("registry poisoned");
        match units.get(name) {
            Some(unit) if unit.active() == ActivationState::Inactive => units.remove(name),
            _ => None,
        }
    }

    /// Returns sorted names of all registered units.
    pub fn list(&self) -> Vec<String> {
        let units = self.units.read().expect("registry poisoned");
        let mut names: Vec<String> = units.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.units.read().expect("registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Resolver for Registry {
    fn lookup(&self, name: &str) -> Option<UnitRef> {
        self.units.read().expect("registry poisoned").get(name).cloned()
    }
}
