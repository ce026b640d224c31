//! Minimal SVG surface for the CLI. Styling beyond what the scene already
//! carries is out of scope; this exists so the pipeline output is viewable
//! without an external rendering library.

use crate::kind::Shape;
use crate::scene::{Scene, SceneEdge, SceneNode};
use crate::theme::Theme;

const PADDING: f32 = 20.0;
/// Horizontal skew of the parallelogram (I/O) outline.
const IO_SKEW: f32 = 16.0;

pub fn render_svg(scene: &Scene, theme: &Theme) -> String {
    let width = scene.width + PADDING * 2.0;
    let height = scene.height + PADDING * 2.0;
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str("</defs>");
    svg.push_str(&format!("<g transform=\"translate({PADDING},{PADDING})\">"));

    for edge in &scene.edges {
        svg.push_str(&edge_svg(edge, theme));
    }
    for node in &scene.nodes {
        svg.push_str(&node_svg(node, theme));
    }

    svg.push_str("</g></svg>");
    svg
}

fn node_svg(node: &SceneNode, theme: &Theme) -> String {
    let mut out = String::new();
    let outline = match node.shape {
        Shape::Rectangle => format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"4\" ry=\"4\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
            node.x, node.y, node.width, node.height, node.fill, node.stroke
        ),
        Shape::Parallelogram => {
            let points = [
                (node.x + IO_SKEW, node.y),
                (node.x + node.width, node.y),
                (node.x + node.width - IO_SKEW, node.y + node.height),
                (node.x, node.y + node.height),
            ];
            polygon(&points, &node.fill, &node.stroke)
        }
        Shape::Diamond => {
            let points = [
                (node.x + node.width / 2.0, node.y),
                (node.x + node.width, node.y + node.height / 2.0),
                (node.x + node.width / 2.0, node.y + node.height),
                (node.x, node.y + node.height / 2.0),
            ];
            polygon(&points, &node.fill, &node.stroke)
        }
    };
    out.push_str(&outline);
    let center_x = node.x + node.width / 2.0;
    let center_y = node.y + node.height / 2.0 + theme.font_size / 3.0;
    out.push_str(&format!(
        "<text x=\"{center_x:.2}\" y=\"{center_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        theme.font_family,
        theme.font_size,
        theme.text_color,
        escape_xml(&node.label)
    ));
    out
}

fn edge_svg(edge: &SceneEdge, theme: &Theme) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" marker-end=\"url(#arrow)\"/>",
        points_to_path(&edge.points),
        edge.stroke
    ));
    if !edge.label.is_empty() {
        if let Some((x, y)) = midpoint(&edge.points) {
            let label_w = edge.label.len() as f32 * theme.font_size * 0.62 + 8.0;
            let label_h = theme.font_size + 6.0;
            out.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{label_w:.2}\" height=\"{label_h:.2}\" rx=\"3\" ry=\"3\" fill=\"{}\"/>",
                x - label_w / 2.0,
                y - label_h / 2.0,
                theme.edge_label_background
            ));
            out.push_str(&format!(
                "<text x=\"{x:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                y + theme.font_size / 3.0,
                theme.font_family,
                theme.font_size,
                edge.stroke,
                escape_xml(&edge.label)
            ));
        }
    }
    out
}

fn polygon(points: &[(f32, f32)], fill: &str, stroke: &str) -> String {
    let list = points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("<polygon points=\"{list}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"2\"/>")
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

fn midpoint(points: &[(f32, f32)]) -> Option<(f32, f32)> {
    if points.len() < 2 {
        return None;
    }
    let mid = points.len() / 2;
    let (a, b) = (points[mid - 1], points[mid]);
    Some(((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0))
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{Graph, RawEdge, RawNode};
    use crate::layout::compute_layout;
    use crate::scene::compose;

    #[test]
    fn renders_well_formed_svg() {
        let nodes = [
            RawNode {
                id: "n1".into(),
                kind: "assignment".into(),
                label: "x < 1".into(),
            },
            RawNode {
                id: "n2".into(),
                kind: "io".into(),
                label: "print(x)".into(),
            },
        ];
        let edges = [RawEdge {
            source: "n1".into(),
            target: "n2".into(),
            branch_id: None,
            label: None,
        }];
        let graph = Graph::build(&nodes, &edges).unwrap();
        let layout = compute_layout(&graph, &LayoutConfig::default()).unwrap();
        let theme = Theme::default();
        let svg = render_svg(&compose(&layout, &theme), &theme);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("<polygon")); // io parallelogram
        assert!(svg.contains("x &lt; 1")); // label escaped
        assert!(svg.contains("marker-end"));
    }
}
