use serde::{Deserialize, Serialize};

use crate::ir::{Branch, NodeKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub text_color: String,
    pub node_stroke: String,
    pub line_color: String,
    pub edge_label_background: String,
    pub assignment_fill: String,
    pub io_fill: String,
    pub decision_fill: String,
    pub yes_branch_color: String,
    pub no_branch_color: String,
}

impl Theme {
    /// Palette of the original visualizer: cyan statements, amber I/O,
    /// lime decisions, green/red branch handles.
    pub fn classic() -> Self {
        Self {
            font_family: "monospace".to_string(),
            font_size: 13.0,
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            node_stroke: "#555555".to_string(),
            line_color: "#000000".to_string(),
            edge_label_background: "#FFFFFF".to_string(),
            assignment_fill: "#E0F7FA".to_string(),
            io_fill: "#FFF3E0".to_string(),
            decision_fill: "#F0F4C3".to_string(),
            yes_branch_color: "#2E7D32".to_string(),
            no_branch_color: "#C62828".to_string(),
        }
    }

    pub fn kind_fill(&self, kind: NodeKind) -> &str {
        match kind {
            NodeKind::Assignment => &self.assignment_fill,
            NodeKind::Io => &self.io_fill,
            NodeKind::Decision => &self.decision_fill,
        }
    }

    /// Branch edges must stay tellable apart without reading their labels.
    pub fn branch_color(&self, branch: Branch) -> &str {
        match branch {
            Branch::Yes => &self.yes_branch_color,
            Branch::No => &self.no_branch_color,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_colors_are_distinct() {
        let theme = Theme::default();
        assert_ne!(
            theme.branch_color(Branch::Yes),
            theme.branch_color(Branch::No)
        );
    }
}
