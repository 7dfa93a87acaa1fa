//! # Dependency-graph cycle detection.
//!
//! The naive activation design waits on `Requires=`/`After=` peers; a
//! circular chain would make every participant wait on the next forever.
//! Before claiming a start, the engine walks the graph reachable from the
//! target over `requires ∪ after` edges and rejects the start when a cycle
//! is found.
//!
//! Unresolvable names are skipped here: the step that owns the name
//! (`After=` wait, `Requires=` trigger) reports the precise
//! `DependencyNotFound` later.

use std::collections::HashMap;

use crate::engine::resolver::Resolver;
use crate::units::{Supervisable, UnitRef};

const UNVISITED: u8 = 0;
const VISITING: u8 = 1;
const DONE: u8 = 2;

/// Returns the first cycle reachable from `root`, as a path that starts
/// and ends at the same unit, or `None` when the graph is acyclic.
pub(crate) fn find_cycle(root: &UnitRef, resolver: &dyn Resolver) -> Option<Vec<String>> {
    let mut state: HashMap<String, u8> = HashMap::new();
    let mut stack: Vec<String> = Vec::new();
    visit(root, resolver, &mut state, &mut stack)
}

fn edges(unit: &UnitRef) -> Vec<String> {
    let mut out = unit.requires();
    out.extend(unit.after());
    out
}

fn visit(
    unit: &UnitRef,
    resolver: &dyn Resolver,
    state: &mut HashMap<String, u8>,
    stack: &mut Vec<String>,
) -> Option<Vec<String>> {
    let name = unit.name().to_string();
    state.insert(name.clone(), VISITING);
    stack.push(name.clone());

    for next in edges(unit) {
        match state.get(&next).copied().unwrap_or(UNVISITED) {
            UNVISITED => {
                if let Some(dep) = resolver.lookup(&next) {
                    if let Some(cycle) = visit(&dep, resolver, state, stack) {
                        return Some(cycle);
                    }
                }
            }
            VISITING => {
                let pos = stack.iter().position(|n| n == &next).unwrap_or(0);
                let mut path = stack[pos..].to_vec();
                path.push(next);
                return Some(path);
            }
            _ => {}
        }
    }

    stack.pop();
    state.insert(name, DONE);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::resolver::Registry;
    use crate::units::{Definition, ServiceUnit};

    fn add(reg: &Registry, name: &str, def: Definition) -> UnitRef {
        let unit = ServiceUnit::arc(name, def);
        reg.insert(unit.clone());
        unit
    }

    #[test]
    fn test_acyclic_chain_passes() {
        let reg = Registry::new();
        add(&reg, "db.service", Definition::default());
        let web = add(
            &reg,
            "web.service",
            Definition::default().with_requires(["db.service"]),
        );
        assert_eq!(find_cycle(&web, reg.as_ref()), None);
    }

    #[test]
    fn test_two_unit_requires_cycle() {
        let reg = Registry::new();
        let a = add(
            &reg,
            "a.service",
            Definition::default().with_requires(["b.service"]),
        );
        add(
            &reg,
            "b.service",
            Definition::default().with_requires(["a.service"]),
        );
        let path = find_cycle(&a, reg.as_ref()).expect("cycle");
        assert_eq!(path.first(), path.last());
        assert!(path.contains(&"a.service".to_string()));
        assert!(path.contains(&"b.service".to_string()));
    }

    #[test]
    fn test_after_edges_count() {
        let reg = Registry::new();
        let a = add(
            &reg,
            "a.service",
            Definition::default().with_after(["b.service"]),
        );
        add(
            &reg,
            "b.service",
            Definition::default().with_after(["a.service"]),
        );
        assert!(find_cycle(&a, reg.as_ref()).is_some());
    }

    #[test]
    fn test_transitive_cycle_found_from_root() {
        let reg = Registry::new();
        let a = add(
            &reg,
            "a.service",
            Definition::default().with_requires(["b.service"]),
        );
        add(
            &reg,
            "b.service",
            Definition::default().with_requires(["c.service"]),
        );
        add(
            &reg,
            "c.service",
            Definition::default().with_requires(["b.service"]),
        );
        let path = find_cycle(&a, reg.as_ref()).expect("cycle");
        assert!(!path.contains(&"a.service".to_string()), "root is not part of the loop");
    }

    #[test]
    fn test_unresolvable_names_are_skipped() {
        let reg = Registry::new();
        let a = add(
            &reg,
            "a.service",
            Definition::default().with_requires(["ghost.service"]),
        );
        assert_eq!(find_cycle(&a, reg.as_ref()), None);
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let reg = Registry::new();
        add(&reg, "base.service", Definition::default());
        add(
            &reg,
            "left.service",
            Definition::default().with_requires(["base.service"]),
        );
        add(
            &reg,
            "right.service",
            Definition::default().with_requires(["base.service"]),
        );
        let top = add(
            &reg,
            "top.service",
            Definition::default().with_requires(["left.service", "right.service"]),
        );
        assert_eq!(find_cycle(&top, reg.as_ref()), None);
    }
}
