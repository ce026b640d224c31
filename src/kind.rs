//! Rendering contract per node kind: which shape a kind draws as and which
//! named connection ports it exposes. The kind set is closed; dispatch is
//! exhaustive, so an unhandled kind cannot compile.

use serde::{Deserialize, Serialize};

use crate::ir::{Branch, Direction, NodeKind};

/// Visual outline of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Rectangle,
    Parallelogram,
    Diamond,
}

/// Named connection point on a node. Edges attach to ports, never to bare
/// node centers, so decision branches stay distinguishable after layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortId {
    In,
    Out,
    OutYes,
    OutNo,
}

/// Side of the node's bounding box a port sits on, expressed for
/// `TopToBottom` flow and rotated for `LeftToRight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Rotates a `TopToBottom` side 90 degrees clockwise when the flow runs
    /// left to right, so "in at the top" becomes "in at the left".
    pub fn oriented(self, direction: Direction) -> Self {
        match direction {
            Direction::TopToBottom => self,
            Direction::LeftToRight => match self {
                Self::Top => Self::Left,
                Self::Bottom => Self::Right,
                Self::Left => Self::Top,
                Self::Right => Self::Bottom,
            },
        }
    }
}

/// Which geometric side hosts a decision node's `yes` port. Historically
/// this flipped between variants of the source renderer, so it is a
/// cosmetic configuration knob, not a semantic one; the `no` port always
/// takes the opposite side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchSide {
    #[default]
    Left,
    Right,
}

impl BranchSide {
    pub fn side(self) -> Side {
        match self {
            Self::Left => Side::Left,
            Self::Right => Side::Right,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Port {
    pub id: PortId,
    pub side: Side,
}

impl NodeKind {
    pub fn shape(self) -> Shape {
        match self {
            Self::Assignment => Shape::Rectangle,
            Self::Io => Shape::Parallelogram,
            Self::Decision => Shape::Diamond,
        }
    }

    /// The fixed port set a node of this kind exposes. Sequential kinds flow
    /// top to bottom; decision nodes split sideways into `yes` and `no`.
    pub fn ports(self, yes_side: BranchSide) -> Vec<Port> {
        match self {
            Self::Assignment | Self::Io => vec![
                Port {
                    id: PortId::In,
                    side: Side::Top,
                },
                Port {
                    id: PortId::Out,
                    side: Side::Bottom,
                },
            ],
            Self::Decision => vec![
                Port {
                    id: PortId::In,
                    side: Side::Top,
                },
                Port {
                    id: PortId::OutYes,
                    side: yes_side.side(),
                },
                Port {
                    id: PortId::OutNo,
                    side: yes_side.opposite().side(),
                },
            ],
        }
    }

    /// Outgoing port an edge with the given branch tag leaves from.
    pub fn out_port(self, branch: Option<Branch>) -> PortId {
        match (self, branch) {
            (Self::Decision, Some(Branch::Yes)) => PortId::OutYes,
            (Self::Decision, Some(Branch::No)) => PortId::OutNo,
            _ => PortId::Out,
        }
    }

    /// Side the given port sits on, honoring the configured yes-branch side.
    pub fn port_side(self, port: PortId, yes_side: BranchSide) -> Side {
        self.ports(yes_side)
            .iter()
            .find(|candidate| candidate.id == port)
            .map(|candidate| candidate.side)
            // Every out_port() result appears in ports(); In is universal.
            .unwrap_or(Side::Bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_kinds_flow_top_to_bottom() {
        for kind in [NodeKind::Assignment, NodeKind::Io] {
            let ports = kind.ports(BranchSide::default());
            assert_eq!(ports.len(), 2);
            assert_eq!(kind.port_side(PortId::In, BranchSide::default()), Side::Top);
            assert_eq!(
                kind.port_side(PortId::Out, BranchSide::default()),
                Side::Bottom
            );
        }
    }

    #[test]
    fn decision_branch_ports_sit_on_opposite_sides() {
        let kind = NodeKind::Decision;
        let yes = kind.port_side(PortId::OutYes, BranchSide::Left);
        let no = kind.port_side(PortId::OutNo, BranchSide::Left);
        assert_eq!(yes, Side::Left);
        assert_eq!(no, Side::Right);

        let yes = kind.port_side(PortId::OutYes, BranchSide::Right);
        let no = kind.port_side(PortId::OutNo, BranchSide::Right);
        assert_eq!(yes, Side::Right);
        assert_eq!(no, Side::Left);
    }

    #[test]
    fn sides_rotate_for_left_to_right() {
        assert_eq!(Side::Top.oriented(Direction::LeftToRight), Side::Left);
        assert_eq!(Side::Bottom.oriented(Direction::LeftToRight), Side::Right);
        assert_eq!(Side::Left.oriented(Direction::LeftToRight), Side::Top);
        assert_eq!(Side::Top.oriented(Direction::TopToBottom), Side::Top);
    }

    #[test]
    fn branch_tags_map_to_branch_ports() {
        assert_eq!(
            NodeKind::Decision.out_port(Some(Branch::Yes)),
            PortId::OutYes
        );
        assert_eq!(NodeKind::Decision.out_port(Some(Branch::No)), PortId::OutNo);
        assert_eq!(NodeKind::Assignment.out_port(None), PortId::Out);
    }
}
