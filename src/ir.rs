use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, GraphDefect};

/// Layout direction. Rank maps to `y` for `TopToBottom` and to `x` for
/// `LeftToRight`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    TopToBottom,
    LeftToRight,
}

/// The closed set of node kinds the renderer understands. Anything else in
/// the parser response is rejected at build time, never silently drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Assignment,
    Io,
    Decision,
}

impl NodeKind {
    pub fn from_tag(node: &str, tag: &str) -> Result<Self, Error> {
        match tag {
            "assignment" => Ok(Self::Assignment),
            "io" => Ok(Self::Io),
            "decision" => Ok(Self::Decision),
            _ => Err(Error::UnknownNodeKind {
                node: node.to_string(),
                tag: tag.to_string(),
            }),
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Assignment => "assignment",
            Self::Io => "io",
            Self::Decision => "decision",
        }
    }
}

/// Branch tag on an edge leaving a decision node. A valid decision node has
/// exactly one outgoing edge per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Yes,
    No,
}

impl Branch {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node as it arrives from the external parser, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub label: String,
}

/// Edge as it arrives from the external parser, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "branchId", default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Validated node with a resolved kind.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
}

/// Validated edge. `branch` is present exactly when the source node is a
/// decision node.
#[derive(Debug, Clone)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub branch: Option<Branch>,
    pub label: String,
}

/// In-memory control-flow graph for one visualization request. Built from
/// the parser response, consumed by the layout engine, discarded with the
/// request. Node storage is a `BTreeMap` so every traversal is id-ordered.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: BTreeMap<String, Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Validates the raw node/edge lists and builds the typed graph.
    ///
    /// Checks, in order: node kinds resolve, node ids are unique, edge
    /// endpoints exist, branch tags parse, and each node's outgoing edges
    /// satisfy its kind (decision nodes cover exactly `{yes, no}`, every
    /// other kind has at most one untagged outgoing edge). On failure no
    /// partial graph escapes.
    pub fn build(raw_nodes: &[RawNode], raw_edges: &[RawEdge]) -> Result<Self, Error> {
        let mut nodes: BTreeMap<String, Node> = BTreeMap::new();
        for raw in raw_nodes {
            let kind = NodeKind::from_tag(&raw.id, &raw.kind)?;
            let node = Node {
                id: raw.id.clone(),
                kind,
                label: raw.label.clone(),
            };
            if nodes.insert(raw.id.clone(), node).is_some() {
                return Err(GraphDefect::DuplicateNodeId(raw.id.clone()).into());
            }
        }

        let mut edges = Vec::with_capacity(raw_edges.len());
        for raw in raw_edges {
            for endpoint in [&raw.source, &raw.target] {
                if !nodes.contains_key(endpoint.as_str()) {
                    return Err(GraphDefect::DanglingEdge {
                        edge_source: raw.source.clone(),
                        target: raw.target.clone(),
                        missing: endpoint.to_string(),
                    }
                    .into());
                }
            }
            let branch = match raw.branch_id.as_deref() {
                None => None,
                Some("yes") => Some(Branch::Yes),
                Some("no") => Some(Branch::No),
                Some(other) => {
                    return Err(GraphDefect::InvalidBranchTag {
                        node: raw.source.clone(),
                        tag: other.to_string(),
                    }
                    .into());
                }
            };
            // Decision-sourced edges fall back to the branch tag as label.
            let label = match (&raw.label, branch) {
                (Some(label), _) => label.clone(),
                (None, Some(branch)) => branch.as_str().to_string(),
                (None, None) => String::new(),
            };
            edges.push(Edge {
                source: raw.source.clone(),
                target: raw.target.clone(),
                branch,
                label,
            });
        }

        let graph = Self { nodes, edges };
        graph.check_outgoing()?;
        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "graph built"
        );
        Ok(graph)
    }

    /// Per-node outgoing-edge discipline: decision nodes cover exactly
    /// `{yes, no}`, everything else has at most one untagged edge.
    fn check_outgoing(&self) -> Result<(), GraphDefect> {
        for node in self.nodes.values() {
            let outgoing: Vec<&Edge> = self
                .edges
                .iter()
                .filter(|edge| edge.source == node.id)
                .collect();
            if node.kind == NodeKind::Decision {
                for branch in [Branch::Yes, Branch::No] {
                    let count = outgoing
                        .iter()
                        .filter(|edge| edge.branch == Some(branch))
                        .count();
                    if count == 0 {
                        return Err(GraphDefect::MissingBranch {
                            node: node.id.clone(),
                            branch,
                        });
                    }
                    if count > 1 {
                        return Err(GraphDefect::DuplicateBranch {
                            node: node.id.clone(),
                            branch,
                        });
                    }
                }
                if outgoing.iter().any(|edge| edge.branch.is_none()) {
                    return Err(GraphDefect::UntaggedBranch {
                        node: node.id.clone(),
                    });
                }
            } else {
                if let Some(edge) = outgoing.iter().find(|edge| edge.branch.is_some()) {
                    return Err(GraphDefect::UnexpectedBranch {
                        node: node.id.clone(),
                        branch: edge.branch.unwrap_or(Branch::Yes),
                    });
                }
                if outgoing.len() > 1 {
                    return Err(GraphDefect::MultipleOutgoing {
                        node: node.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
