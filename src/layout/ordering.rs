use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::model::Pipeline;

use super::LayoutError;

/// Reorder pipelines so every node comes after the nodes it depends on,
/// with connected chains grouped contiguously.
///
/// Edges run dependency -> dependent, keyed by lowercase name. Zero
/// in-degree names seed a breadth-first walk in alphabetical order (and
/// dependents are visited alphabetically) so the result is deterministic
/// regardless of input order. Each breadth-first run is one chain; chains
/// are flattened in discovery order. Pipelines that appear in no dependency
/// edge rank after every chain and keep their relative input order.
pub fn sequence(mut pipelines: Vec<Pipeline>) -> Result<Vec<Pipeline>, LayoutError> {
    let mut graph: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut in_degree: BTreeMap<String, usize> = BTreeMap::new();

    for pipeline in &pipelines {
        let dependent = pipeline.name.to_ascii_lowercase();
        for dep in &pipeline.dependencies {
            let parent = dep.name.to_ascii_lowercase();
            graph.entry(parent.clone()).or_default().push(dependent.clone());
            *in_degree.entry(dependent.clone()).or_insert(0) += 1;
            in_degree.entry(parent).or_insert(0);
        }
    }

    let mut queue: VecDeque<String> = {
        let mut roots: Vec<String> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(name, _)| name.clone())
            .collect();
        roots.sort();
        roots.into()
    };

    let mut ordered: Vec<String> = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();

    while let Some(root) = queue.pop_front() {
        if visited.contains(&root) {
            continue;
        }
        // One chain: everything reachable from this root, breadth-first.
        let mut chain_queue = VecDeque::from([root]);
        while let Some(current) = chain_queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            ordered.push(current.clone());
            if let Some(dependents) = graph.get(&current) {
                // Decrement once per edge, duplicates included, so the count
                // mirrors the per-edge increments above. The visited set keeps
                // a dependent from entering the queue twice.
                let mut dependents: Vec<&String> = dependents.iter().collect();
                dependents.sort();
                for dependent in dependents {
                    if let Some(degree) = in_degree.get_mut(dependent) {
                        *degree = degree.saturating_sub(1);
                        if *degree == 0 {
                            chain_queue.push_back(dependent.clone());
                        }
                    }
                }
            }
        }
    }

    // Anything mentioned in an edge but never reaching zero in-degree sits
    // on a cycle; reject the input instead of silently dropping nodes.
    let mut cycle: Vec<String> = in_degree
        .keys()
        .filter(|name| !visited.contains(*name))
        .map(|key| display_name(&pipelines, key))
        .collect();
    if !cycle.is_empty() {
        cycle.sort();
        return Err(LayoutError::DependencyCycle { members: cycle });
    }

    let rank: BTreeMap<&str, usize> = ordered
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    pipelines.sort_by_key(|pipeline| {
        rank.get(pipeline.name.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(usize::MAX)
    });
    Ok(pipelines)
}

fn display_name(pipelines: &[Pipeline], key: &str) -> String {
    pipelines
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(key))
        .map(|p| p.name.clone())
        .unwrap_or_else(|| key.to_string())
}
