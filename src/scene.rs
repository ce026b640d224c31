//! View composition: merges the layout result with kind-specific shapes and
//! edge styling into the scene handed to the rendering surface. Pure and
//! stateless; rebuilt from scratch for every new graph.

use serde::Serialize;
use tracing::debug;

use crate::ir::{Branch, NodeKind};
use crate::kind::{PortId, Shape};
use crate::layout::LayoutResult;
use crate::theme::Theme;

#[derive(Debug, Clone, Serialize)]
pub struct SceneNode {
    pub id: String,
    pub kind: NodeKind,
    pub shape: Shape,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: String,
    pub stroke: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneEdge {
    pub source: String,
    pub target: String,
    pub source_port: PortId,
    pub target_port: PortId,
    pub points: Vec<(f32, f32)>,
    pub label: String,
    pub branch: Option<Branch>,
    pub stroke: String,
}

/// Final positioned, styled representation for the rendering surface.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

/// Maps every laid-out node to its kind's visual and every edge to a styled
/// connector. Cannot fail: the layout it consumes is already validated.
pub fn compose(layout: &LayoutResult, theme: &Theme) -> Scene {
    let nodes = layout
        .nodes
        .values()
        .map(|node| SceneNode {
            id: node.id.clone(),
            kind: node.kind,
            shape: node.kind.shape(),
            label: node.label.clone(),
            x: node.x,
            y: node.y,
            width: node.width,
            height: node.height,
            fill: theme.kind_fill(node.kind).to_string(),
            stroke: theme.node_stroke.clone(),
        })
        .collect();

    let edges = layout
        .edges
        .iter()
        .map(|edge| SceneEdge {
            source: edge.source.clone(),
            target: edge.target.clone(),
            source_port: edge.source_port,
            target_port: edge.target_port,
            points: edge.points.clone(),
            label: edge.label.clone(),
            branch: edge.branch,
            stroke: match edge.branch {
                Some(branch) => theme.branch_color(branch).to_string(),
                None => theme.line_color.clone(),
            },
        })
        .collect();

    let scene = Scene {
        width: layout.width,
        height: layout.height,
        nodes,
        edges,
    };
    debug!(
        nodes = scene.nodes.len(),
        edges = scene.edges.len(),
        "scene composed"
    );
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{Graph, RawEdge, RawNode};
    use crate::layout::compute_layout;

    fn decision_fixture() -> Scene {
        let nodes = [
            RawNode {
                id: "d".into(),
                kind: "decision".into(),
                label: "x > 0".into(),
            },
            RawNode {
                id: "a".into(),
                kind: "io".into(),
                label: "print(x)".into(),
            },
            RawNode {
                id: "b".into(),
                kind: "assignment".into(),
                label: "x = 0".into(),
            },
        ];
        let edges = [
            RawEdge {
                source: "d".into(),
                target: "a".into(),
                branch_id: Some("yes".into()),
                label: None,
            },
            RawEdge {
                source: "d".into(),
                target: "b".into(),
                branch_id: Some("no".into()),
                label: None,
            },
        ];
        let graph = Graph::build(&nodes, &edges).unwrap();
        let layout = compute_layout(&graph, &LayoutConfig::default()).unwrap();
        compose(&layout, &Theme::default())
    }

    #[test]
    fn kinds_map_to_their_shapes() {
        let scene = decision_fixture();
        let shape_of = |id: &str| {
            scene
                .nodes
                .iter()
                .find(|node| node.id == id)
                .map(|node| node.shape)
                .unwrap()
        };
        assert_eq!(shape_of("d"), Shape::Diamond);
        assert_eq!(shape_of("a"), Shape::Parallelogram);
        assert_eq!(shape_of("b"), Shape::Rectangle);
    }

    #[test]
    fn branch_edges_get_distinct_strokes() {
        let scene = decision_fixture();
        let stroke_of = |branch: Branch| {
            scene
                .edges
                .iter()
                .find(|edge| edge.branch == Some(branch))
                .map(|edge| edge.stroke.clone())
                .unwrap()
        };
        assert_ne!(stroke_of(Branch::Yes), stroke_of(Branch::No));
    }

    #[test]
    fn scene_serializes_to_json() {
        let scene = decision_fixture();
        let json = serde_json::to_value(&scene).unwrap();
        assert_eq!(json["nodes"][0]["shape"], "parallelogram");
        assert_eq!(json["edges"][0]["source_port"], "out-yes");
        assert_eq!(json["edges"][0]["branch"], "yes");
    }
}
