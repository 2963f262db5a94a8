use super::{BranchId, NodeId};

/// Index of an edge inside the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// An edge connecting a child node to one of its parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Child (more recent) node
    pub up: NodeId,
    /// Parent (older) node
    pub down: NodeId,
    /// Branch the edge was created for
    pub branch: BranchId,
}

impl Edge {
    pub fn new(up: NodeId, down: NodeId, branch: BranchId) -> Self {
        Self { up, down, branch }
    }

    /// The endpoint opposite to `node`, if `node` is one of the endpoints
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if node == self.up {
            Some(self.down)
        } else if node == self.down {
            Some(self.up)
        } else {
            None
        }
    }
}
