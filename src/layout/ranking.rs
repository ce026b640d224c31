use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use crate::error::Error;
use crate::ir::{Edge, Graph};

/// Kahn's algorithm with an id-ordered ready heap, so the processing order
/// is a deterministic function of the graph alone.
///
/// Fails before any rank is assigned when the graph has a directed cycle,
/// naming the smallest node id still stuck on one.
pub(super) fn topo_order(graph: &Graph) -> Result<Vec<String>, Error> {
    let mut indegree: BTreeMap<&str, usize> = graph
        .nodes
        .keys()
        .map(|id| (id.as_str(), 0usize))
        .collect();
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        successors
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
        if let Some(count) = indegree.get_mut(edge.target.as_str()) {
            *count += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<&str>> = indegree
        .iter()
        .filter(|&(_, &count)| count == 0)
        .map(|(&id, _)| Reverse(id))
        .collect();
    let mut order = Vec::with_capacity(graph.nodes.len());
    while let Some(Reverse(id)) = ready.pop() {
        order.push(id.to_string());
        if let Some(nexts) = successors.get(id) {
            for next in nexts {
                if let Some(count) = indegree.get_mut(next) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(Reverse(*next));
                    }
                }
            }
        }
    }

    if order.len() < graph.nodes.len() {
        // Everything left over still has an unsatisfied predecessor, which
        // can only happen on a cycle.
        let node = indegree
            .iter()
            .find(|&(_, &count)| count > 0)
            .map(|(&id, _)| id.to_string())
            .unwrap_or_default();
        return Err(Error::CyclicGraph { node });
    }
    Ok(order)
}

/// Longest path from any entry node, walked in topological order. Strictly
/// increases along every edge.
pub(super) fn compute_ranks(graph: &Graph, order: &[String]) -> BTreeMap<String, usize> {
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        successors
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut ranks: BTreeMap<String, usize> = order.iter().map(|id| (id.clone(), 0usize)).collect();
    for id in order {
        let rank = ranks.get(id.as_str()).copied().unwrap_or(0);
        if let Some(nexts) = successors.get(id.as_str()) {
            for next in nexts {
                if let Some(entry) = ranks.get_mut(*next) {
                    *entry = (*entry).max(rank + 1);
                }
            }
        }
    }
    ranks
}

/// Crossing reduction: median-of-neighbors sweeps, downward over incoming
/// edges then upward over outgoing ones. Ties break on node id, so repeated
/// runs over the same graph order identically.
pub(super) fn order_ranks(rank_nodes: &mut [Vec<String>], edges: &[Edge], passes: usize) {
    if rank_nodes.len() <= 1 {
        return;
    }
    let mut incoming: HashMap<String, Vec<String>> = HashMap::new();
    let mut outgoing: HashMap<String, Vec<String>> = HashMap::new();
    for edge in edges {
        outgoing
            .entry(edge.source.clone())
            .or_default()
            .push(edge.target.clone());
        incoming
            .entry(edge.target.clone())
            .or_default()
            .push(edge.source.clone());
    }

    let mut positions: HashMap<String, usize> = HashMap::new();
    let update_positions =
        |rank_nodes: &[Vec<String>], positions: &mut HashMap<String, usize>| {
            positions.clear();
            for bucket in rank_nodes.iter() {
                for (idx, node_id) in bucket.iter().enumerate() {
                    positions.insert(node_id.clone(), idx);
                }
            }
        };
    update_positions(rank_nodes, &mut positions);

    let sort_bucket = |bucket: &mut Vec<String>,
                       neighbors: &HashMap<String, Vec<String>>,
                       positions: &HashMap<String, usize>| {
        let current_positions: HashMap<String, usize> = bucket
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();
        bucket.sort_by(|a, b| {
            let a_score = median_position(a, neighbors, positions, &current_positions);
            let b_score = median_position(b, neighbors, positions, &current_positions);
            match a_score.partial_cmp(&b_score) {
                Some(std::cmp::Ordering::Equal) | None => a.cmp(b),
                Some(ordering) => ordering,
            }
        });
    };

    let passes = passes.max(1);
    for _ in 0..passes {
        for rank in 1..rank_nodes.len() {
            if rank_nodes[rank].len() <= 1 {
                continue;
            }
            sort_bucket(&mut rank_nodes[rank], &incoming, &positions);
            update_positions(rank_nodes, &mut positions);
        }
        for rank in (0..rank_nodes.len().saturating_sub(1)).rev() {
            if rank_nodes[rank].len() <= 1 {
                continue;
            }
            sort_bucket(&mut rank_nodes[rank], &outgoing, &positions);
            update_positions(rank_nodes, &mut positions);
        }
    }
}

fn median_position(
    node_id: &str,
    neighbors: &HashMap<String, Vec<String>>,
    positions: &HashMap<String, usize>,
    current_positions: &HashMap<String, usize>,
) -> f32 {
    let Some(list) = neighbors.get(node_id) else {
        return *current_positions.get(node_id).unwrap_or(&0) as f32;
    };
    let mut values = Vec::new();
    for neighbor in list {
        if let Some(pos) = positions.get(neighbor) {
            values.push(*pos as f32);
        }
    }
    if values.is_empty() {
        return *current_positions.get(node_id).unwrap_or(&0) as f32;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) * 0.5
    }
}
