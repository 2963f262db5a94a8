use smallvec::SmallVec;

use super::{BranchId, CommitIndex, EdgeId};

/// Index of a node inside the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A commit that was part of the loaded history
    Commit,
    /// A parent outside the loaded window
    EndCommit,
}

/// A commit's position in the graph
#[derive(Debug, Clone)]
pub struct Node {
    pub commit: CommitIndex,
    pub branch: BranchId,
    pub node_type: NodeType,
    /// Row assigned when the node is finalized
    pub row: usize,
    /// Edges coming from children (more recent commits)
    pub up_edges: SmallVec<[EdgeId; 2]>,
    /// Edges going to parents (older commits)
    pub down_edges: SmallVec<[EdgeId; 2]>,
}

impl Node {
    pub(crate) fn new(commit: CommitIndex, branch: BranchId) -> Self {
        Self {
            commit,
            branch,
            node_type: NodeType::Commit,
            row: usize::MAX,
            up_edges: SmallVec::new(),
            down_edges: SmallVec::new(),
        }
    }

    /// A node with exactly one incoming and one outgoing edge
    pub fn is_simple(&self) -> bool {
        self.up_edges.len() == 1 && self.down_edges.len() == 1
    }

    /// Check if this node joins several parents
    pub fn is_merge(&self) -> bool {
        self.down_edges.len() > 1
    }

    /// Check if this node has no children in the loaded history
    pub fn is_head(&self) -> bool {
        self.up_edges.is_empty()
    }

    pub fn degree(&self) -> usize {
        self.up_edges.len() + self.down_edges.len()
    }
}
