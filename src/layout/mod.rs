//! Layered layout: rank assignment, crossing-reduction ordering, coordinate
//! assignment, and port-to-port edge routing. Everything here is a pure
//! function of the input graph and config; all working maps are allocated
//! per call so concurrent layouts never share state.

mod ranking;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::Error;
use crate::ir::{Branch, Direction, Graph, NodeKind};
use crate::kind::{PortId, Side};

/// Median-heuristic sweep count. Small flowcharts converge in one or two;
/// extra passes are cheap and keep wide graphs tidy.
pub const ORDERING_PASSES: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub rank: usize,
    pub order: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Routed edge: named ports on both ends plus an orthogonal polyline.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeLayout {
    pub source: String,
    pub target: String,
    pub source_port: PortId,
    pub target_port: PortId,
    pub label: String,
    pub branch: Option<Branch>,
    pub points: Vec<(f32, f32)>,
}

/// Positioned nodes paired with the routed edge set. Recomputed in full on
/// every request, never patched incrementally.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutResult {
    pub nodes: BTreeMap<String, NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub width: f32,
    pub height: f32,
}

pub fn compute_layout(graph: &Graph, config: &LayoutConfig) -> Result<LayoutResult, Error> {
    if graph.is_empty() {
        return Ok(LayoutResult::default());
    }

    // Cycle rejection runs first; no node receives a rank on failure.
    let topo = ranking::topo_order(graph)?;
    let ranks = ranking::compute_ranks(graph, &topo);

    let max_rank = ranks.values().copied().max().unwrap_or(0);
    let mut rank_nodes: Vec<Vec<String>> = vec![Vec::new(); max_rank + 1];
    // BTreeMap iteration seeds each bucket in id order.
    for (id, &rank) in &ranks {
        rank_nodes[rank].push(id.clone());
    }
    ranking::order_ranks(&mut rank_nodes, &graph.edges, ORDERING_PASSES);
    debug!(ranks = rank_nodes.len(), "ranks assigned");

    let direction = config.direction;
    let (node_main, node_cross) = match direction {
        Direction::TopToBottom => (config.node_height, config.node_width),
        Direction::LeftToRight => (config.node_width, config.node_height),
    };
    let extent = |count: usize| {
        count as f32 * node_cross + count.saturating_sub(1) as f32 * config.node_spacing
    };
    let max_extent = rank_nodes
        .iter()
        .map(|bucket| extent(bucket.len()))
        .fold(0.0f32, f32::max);

    let mut nodes: BTreeMap<String, NodeLayout> = BTreeMap::new();
    for (rank, bucket) in rank_nodes.iter().enumerate() {
        // Center each rank on the widest one; spacing keeps boxes disjoint.
        let offset = (max_extent - extent(bucket.len())) / 2.0;
        let main = rank as f32 * (node_main + config.rank_spacing);
        for (order, id) in bucket.iter().enumerate() {
            let cross = offset + order as f32 * (node_cross + config.node_spacing);
            let (x, y) = match direction {
                Direction::TopToBottom => (cross, main),
                Direction::LeftToRight => (main, cross),
            };
            let node = graph.node(id).expect("ranked node missing from graph");
            nodes.insert(
                id.clone(),
                NodeLayout {
                    id: id.clone(),
                    kind: node.kind,
                    label: node.label.clone(),
                    rank,
                    order,
                    x,
                    y,
                    width: config.node_width,
                    height: config.node_height,
                },
            );
        }
    }

    let mut edges = Vec::with_capacity(graph.edges.len());
    for edge in &graph.edges {
        let source = nodes.get(&edge.source).expect("edge source missing");
        let target = nodes.get(&edge.target).expect("edge target missing");
        let source_port = source.kind.out_port(edge.branch);
        let target_port = PortId::In;
        let start_side = source
            .kind
            .port_side(source_port, config.yes_side)
            .oriented(direction);
        let end_side = target
            .kind
            .port_side(target_port, config.yes_side)
            .oriented(direction);
        let start = port_position(source, start_side);
        let end = port_position(target, end_side);
        edges.push(EdgeLayout {
            source: edge.source.clone(),
            target: edge.target.clone(),
            source_port,
            target_port,
            label: edge.label.clone(),
            branch: edge.branch,
            points: route_points(direction, start, start_side, end),
        });
    }

    let total_main =
        rank_nodes.len() as f32 * node_main + (rank_nodes.len() - 1) as f32 * config.rank_spacing;
    let (width, height) = match direction {
        Direction::TopToBottom => (max_extent, total_main),
        Direction::LeftToRight => (total_main, max_extent),
    };
    debug!(width, height, "layout computed");

    Ok(LayoutResult {
        nodes,
        edges,
        width,
        height,
    })
}

fn port_position(node: &NodeLayout, side: Side) -> (f32, f32) {
    match side {
        Side::Top => (node.x + node.width / 2.0, node.y),
        Side::Bottom => (node.x + node.width / 2.0, node.y + node.height),
        Side::Left => (node.x, node.y + node.height / 2.0),
        Side::Right => (node.x + node.width, node.y + node.height / 2.0),
    }
}

/// Orthogonal polyline between two ports. Flow-axis exits take a step path
/// through the midline of the rank gap (straight when aligned); branch
/// exits run along the cross axis first, then turn into the target.
fn route_points(
    direction: Direction,
    start: (f32, f32),
    start_side: Side,
    end: (f32, f32),
) -> Vec<(f32, f32)> {
    let flow_exit = matches!(
        (direction, start_side),
        (Direction::TopToBottom, Side::Bottom) | (Direction::LeftToRight, Side::Right)
    );
    let mut points = if flow_exit {
        match direction {
            Direction::TopToBottom => {
                if (start.0 - end.0).abs() < f32::EPSILON {
                    vec![start, end]
                } else {
                    let mid = (start.1 + end.1) / 2.0;
                    vec![start, (start.0, mid), (end.0, mid), end]
                }
            }
            Direction::LeftToRight => {
                if (start.1 - end.1).abs() < f32::EPSILON {
                    vec![start, end]
                } else {
                    let mid = (start.0 + end.0) / 2.0;
                    vec![start, (mid, start.1), (mid, end.1), end]
                }
            }
        }
    } else {
        match direction {
            Direction::TopToBottom => vec![start, (end.0, start.1), end],
            Direction::LeftToRight => vec![start, (start.0, end.1), end],
        }
    };
    points.dedup_by(|a, b| (a.0 - b.0).abs() < f32::EPSILON && (a.1 - b.1).abs() < f32::EPSILON);
    points
}
