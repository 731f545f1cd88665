//! Dependency resolution
//!
//! Computes a topologically valid execution order for the requested layers
//! via depth-first traversal with three-color marking. A dependency is only
//! visited when it is itself part of the requested set; unrequested
//! transitive dependencies are not force-included.

use std::collections::HashMap;

use crate::error::RunnerError;
use crate::registry::LayerRegistry;

/// Per-resolution visit state, discarded after each call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Resolve a dependency-respecting order covering exactly the requested keys.
///
/// Requested keys must already be validated against the registry. Duplicate
/// requests collapse to a single occurrence. A cycle among the requested
/// layers aborts resolution entirely.
pub fn resolve_order(
    requested: &[String],
    registry: &LayerRegistry,
) -> Result<Vec<String>, RunnerError> {
    let mut marks: HashMap<&str, Mark> = requested
        .iter()
        .map(|k| (k.as_str(), Mark::Unvisited))
        .collect();
    let mut sorted = Vec::with_capacity(requested.len());

    for key in requested {
        visit(key, registry, &mut marks, &mut sorted)?;
    }

    Ok(sorted)
}

fn visit<'a>(
    key: &'a str,
    registry: &'a LayerRegistry,
    marks: &mut HashMap<&'a str, Mark>,
    sorted: &mut Vec<String>,
) -> Result<(), RunnerError> {
    match marks.get(key).copied() {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            return Err(RunnerError::CircularDependency(key.to_string()));
        }
        Some(Mark::Unvisited) => {}
        // Not part of the requested set
        None => return Ok(()),
    }

    marks.insert(key, Mark::InProgress);

    if let Some(layer) = registry.get(key) {
        for dep in &layer.dependencies {
            if marks.contains_key(dep.as_str()) {
                visit(dep, registry, marks, sorted)?;
            }
        }
    }

    marks.insert(key, Mark::Done);
    sorted.push(key.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Layer;

    fn keys(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_transitive_dependencies_ordered_first() {
        let registry = LayerRegistry::builtin();
        let order = resolve_order(&keys(&["infrastructure"]), &registry).unwrap();
        assert_eq!(order, vec!["domain", "application", "infrastructure"]);
    }

    #[test]
    fn test_requested_subset_no_duplicates() {
        let registry = LayerRegistry::builtin();
        let order = resolve_order(&keys(&["application", "domain"]), &registry).unwrap();
        assert_eq!(order, vec!["domain", "application"]);
    }

    #[test]
    fn test_unrequested_dependency_not_included() {
        let registry = LayerRegistry::builtin();
        let order = resolve_order(&keys(&["application"]), &registry).unwrap();
        assert_eq!(order, vec!["application"]);
    }

    #[test]
    fn test_full_catalog_order() {
        let registry = LayerRegistry::builtin();
        let requested = registry.keys();
        let order = resolve_order(&requested, &registry).unwrap();

        assert_eq!(order.len(), requested.len());
        for layer in registry.layers() {
            let pos = order.iter().position(|k| *k == layer.key).unwrap();
            for dep in &layer.dependencies {
                let dep_pos = order.iter().position(|k| k == dep).unwrap();
                assert!(dep_pos < pos, "{dep} must precede {}", layer.key);
            }
        }
    }

    #[test]
    fn test_duplicate_request_collapses() {
        let registry = LayerRegistry::builtin();
        let order = resolve_order(&keys(&["domain", "domain", "domain"]), &registry).unwrap();
        assert_eq!(order, vec!["domain"]);
    }

    #[test]
    fn test_cycle_detected() {
        let registry = LayerRegistry::new(vec![
            Layer::new("a", "A", "a.sh").depends_on("b"),
            Layer::new("b", "B", "b.sh").depends_on("c"),
            Layer::new("c", "C", "c.sh").depends_on("a"),
        ]);

        let err = resolve_order(&keys(&["a", "b", "c"]), &registry).unwrap_err();
        assert!(matches!(err, RunnerError::CircularDependency(_)));
    }

    #[test]
    fn test_cycle_broken_when_member_unrequested() {
        // The a→b→c→a cycle cannot close when c is not requested.
        let registry = LayerRegistry::new(vec![
            Layer::new("a", "A", "a.sh").depends_on("b"),
            Layer::new("b", "B", "b.sh").depends_on("c"),
            Layer::new("c", "C", "c.sh").depends_on("a"),
        ]);

        let order = resolve_order(&keys(&["a", "b"]), &registry).unwrap();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let registry = LayerRegistry::new(vec![Layer::new("a", "A", "a.sh").depends_on("a")]);
        let err = resolve_order(&keys(&["a"]), &registry).unwrap_err();
        assert!(matches!(err, RunnerError::CircularDependency(ref k) if k == "a"));
    }
}
