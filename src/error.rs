use thiserror::Error;

use crate::ir::Branch;

/// Failure taxonomy for the visualization pipeline.
///
/// Every variant is terminal for the request that produced it; nothing in
/// the core retries or recovers. Re-submitting is the caller's decision.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed graph: {0}")]
    MalformedGraph(#[from] GraphDefect),

    #[error("graph contains a directed cycle through node `{node}`")]
    CyclicGraph { node: String },

    #[error("node `{node}` has unknown kind `{tag}`")]
    UnknownNodeKind { node: String, tag: String },

    #[error("parser unavailable: {0}")]
    ParserUnavailable(#[source] std::io::Error),

    #[error("malformed parser response: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

/// The specific invariant a rejected graph violated, with the offending
/// node or edge so the caller can point at it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphDefect {
    #[error("duplicate node id `{0}`")]
    DuplicateNodeId(String),

    // Field is not named `source`: thiserror would treat it as the chained
    // error source, and `String` is not one.
    #[error("edge `{edge_source}` -> `{target}` references missing node `{missing}`")]
    DanglingEdge {
        edge_source: String,
        target: String,
        missing: String,
    },

    #[error("edge leaving `{node}` has invalid branch tag `{tag}`")]
    InvalidBranchTag { node: String, tag: String },

    #[error("decision node `{node}` has no `{branch}` branch")]
    MissingBranch { node: String, branch: Branch },

    #[error("decision node `{node}` has more than one `{branch}` branch")]
    DuplicateBranch { node: String, branch: Branch },

    #[error("decision node `{node}` has an untagged outgoing edge")]
    UntaggedBranch { node: String },

    #[error("edge leaving non-decision node `{node}` carries branch tag `{branch}`")]
    UnexpectedBranch { node: String, branch: Branch },

    #[error("node `{node}` has more than one outgoing edge")]
    MultipleOutgoing { node: String },
}
