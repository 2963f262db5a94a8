pub mod commit;
pub mod node;
pub mod edge;
pub mod branch;
pub mod graph;

pub use commit::{Commit, CommitIndex, RefKind, Reference, RootId};
pub use node::{Node, NodeId, NodeType};
pub use edge::{Edge, EdgeId};
pub use branch::{Branch, BranchId};
pub use graph::{Graph, GraphElement, GraphStats, Row};
