//! Error types for diagram model operations.

use thiserror::Error;

use crate::identifier::Id;

/// Errors raised by [`DiagramGraph`](crate::diagram::DiagramGraph) mutations
/// and document (de)serialization.
///
/// Computations over the graph never fail; only explicit edits that would
/// break a model invariant are rejected.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Node '{0}' already exists")]
    DuplicateNode(Id),

    #[error("Edge '{0}' already exists")]
    DuplicateEdge(Id),

    #[error("Node '{0}' not found")]
    NodeNotFound(Id),

    #[error("Edge '{0}' not found")]
    EdgeNotFound(Id),

    #[error("Node '{node}' cannot be placed inside '{parent}': parent does not exist")]
    InvalidParent { node: Id, parent: Id },

    #[error("Node '{node}' cannot be placed inside '{parent}': that would create a cycle")]
    ParentCycle { node: Id, parent: Id },

    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),
}
