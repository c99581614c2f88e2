//! Layered topological ordering (Kahn's algorithm)

use std::collections::HashMap;
use std::hash::Hash;

/// Group `nodes` into layers such that every edge points to a later layer
///
/// Edges are `(dependency, dependent)` pairs; edges whose endpoints are not
/// in `nodes` are ignored. Within a layer, nodes keep their order in `nodes`,
/// so the result is deterministic. On a cycle, returns the nodes that could
/// not be placed.
pub(crate) fn layered_sort<T>(nodes: &[T], edges: &[(T, T)]) -> Result<Vec<Vec<T>>, Vec<T>>
where
    T: Copy + Eq + Hash,
{
    let position: HashMap<T, usize> = nodes.iter().enumerate().map(|(i, n)| (*n, i)).collect();
    let mut dependents: HashMap<T, Vec<T>> = HashMap::new();
    let mut in_degree: HashMap<T, usize> = nodes.iter().map(|n| (*n, 0)).collect();

    for &(dependency, dependent) in edges {
        if !position.contains_key(&dependency) || !position.contains_key(&dependent) {
            continue;
        }
        dependents.entry(dependency).or_default().push(dependent);
        if let Some(degree) = in_degree.get_mut(&dependent) {
            *degree += 1;
        }
    }

    let mut layer: Vec<T> = nodes
        .iter()
        .copied()
        .filter(|n| in_degree.get(n).copied().unwrap_or(0) == 0)
        .collect();
    let mut layers = Vec::new();
    let mut placed = 0;

    while !layer.is_empty() {
        let mut next = Vec::new();
        for node in &layer {
            for child in dependents.get(node).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree -= 1;
                    if *degree == 0 {
                        next.push(*child);
                    }
                }
            }
        }
        next.sort_by_key(|n| position.get(n).copied().unwrap_or(usize::MAX));
        placed += layer.len();
        layers.push(layer);
        layer = next;
    }

    if placed != nodes.len() {
        let remaining = nodes
            .iter()
            .copied()
            .filter(|n| in_degree.get(n).copied().unwrap_or(0) > 0)
            .collect();
        return Err(remaining);
    }

    Ok(layers)
}
