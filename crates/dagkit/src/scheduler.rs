//! Topological scheduler - Kahn's algorithm with stable tie-breaking
//!
//! Nodes that become ready at the same time are emitted in the order they
//! were discovered: the initial frontier in document order, then successors
//! in edge document order. The same input always yields the same order.

use crate::error::GraphError;
use crate::types::{Edge, Node, NodeId};
use std::collections::{HashMap, VecDeque};

/// Compute a deployment order of node ids
pub fn schedule(nodes: &[Node], edges: &[Edge]) -> Result<Vec<NodeId>, GraphError> {
    Ok(schedule_nodes(nodes, edges)?
        .into_iter()
        .map(|n| n.id.clone())
        .collect())
}

/// Compute a deployment order, returning the nodes themselves
pub fn schedule_nodes<'n>(nodes: &'n [Node], edges: &[Edge]) -> Result<Vec<&'n Node>, GraphError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.id.as_str()).or_insert(i);
    }

    let mut in_degree = vec![0usize; nodes.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];

    for edge in edges {
        let from = endpoint(&index, edge, &edge.from)?;
        let to = endpoint(&index, edge, &edge.to)?;
        successors[from].push(to);
        predecessors[to].push(from);
        in_degree[to] += 1;
    }

    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(current) = queue.pop_front() {
        order.push(current);
        for &next in &successors[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() != nodes.len() {
        let unresolved: Vec<usize> = (0..nodes.len()).filter(|&i| in_degree[i] > 0).collect();
        let cycle = find_cycle(&unresolved, &predecessors, &in_degree);
        log::debug!(
            "scheduling stopped after {} of {} nodes",
            order.len(),
            nodes.len()
        );
        return Err(GraphError::Cycle {
            unresolved: unresolved.iter().map(|&i| nodes[i].id.clone()).collect(),
            cycle: cycle.iter().map(|&i| nodes[i].id.clone()).collect(),
        });
    }

    Ok(order.into_iter().map(|i| &nodes[i]).collect())
}

fn endpoint(index: &HashMap<&str, usize>, edge: &Edge, id: &str) -> Result<usize, GraphError> {
    index
        .get(id)
        .copied()
        .ok_or_else(|| GraphError::DanglingEdge {
            from: edge.from.clone(),
            to: edge.to.clone(),
            missing: id.to_string(),
        })
}

/// Walk unresolved predecessors until a node repeats
///
/// Every unresolved node still has an incoming edge from another
/// unresolved node, so the walk cannot dead-end. The closed path is
/// returned in edge direction with its first node repeated at the end.
fn find_cycle(unresolved: &[usize], predecessors: &[Vec<usize>], in_degree: &[usize]) -> Vec<usize> {
    let Some(&start) = unresolved.first() else {
        return Vec::new();
    };

    let mut path = vec![start];
    let mut seen: HashMap<usize, usize> = HashMap::from([(start, 0)]);
    let mut current = start;

    loop {
        let Some(&prev) = predecessors[current].iter().find(|&&p| in_degree[p] > 0) else {
            return Vec::new();
        };
        if let Some(&pos) = seen.get(&prev) {
            let mut cycle: Vec<usize> = path[pos..].iter().rev().copied().collect();
            cycle.insert(0, prev);
            return cycle;
        }
        seen.insert(prev, path.len());
        path.push(prev);
        current = prev;
    }
}
