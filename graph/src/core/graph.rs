use std::collections::HashMap;

use super::{Branch, BranchId, CommitIndex, Edge, EdgeId, Node, NodeId, NodeType};

/// Either end of an interaction with the graph: a node or an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphElement {
    Node(NodeId),
    Edge(EdgeId),
}

/// Nodes sharing one row index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub index: usize,
    pub nodes: Vec<NodeId>,
}

/// Commit graph owning all nodes, edges, branches and rows.
///
/// Nodes and edges refer to each other by arena index; the graph is the
/// only owner.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    branches: Vec<Branch>,
    rows: Vec<Row>,
    by_commit: HashMap<CommitIndex, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_branch(&mut self, branch: Branch) -> BranchId {
        let id = BranchId(self.branches.len());
        self.branches.push(branch);
        id
    }

    pub(crate) fn add_node(&mut self, commit: CommitIndex, branch: BranchId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(commit, branch));
        self.by_commit.insert(commit, id);
        id
    }

    /// Connect `up` (child) to `down` (parent), registering the edge on both ends
    pub(crate) fn add_edge(&mut self, up: NodeId, down: NodeId, branch: BranchId) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge::new(up, down, branch));
        self.nodes[up.0].down_edges.push(id);
        self.nodes[down.0].up_edges.push(id);
        id
    }

    /// Place `nodes` into a new row and mark them with `node_type`
    pub(crate) fn push_row(&mut self, nodes: Vec<NodeId>, node_type: NodeType) -> usize {
        let index = self.rows.len();
        for &id in &nodes {
            let node = &mut self.nodes[id.0];
            node.node_type = node_type;
            node.row = index;
        }
        self.rows.push(Row { index, nodes });
        index
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Nodes of a row; empty for an out of range index
    pub fn nodes_in_row(&self, index: usize) -> &[NodeId] {
        self.rows
            .get(index)
            .map(|row| row.nodes.as_slice())
            .unwrap_or_default()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn branch(&self, id: BranchId) -> &Branch {
        &self.branches[id.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    pub fn branches(&self) -> impl Iterator<Item = (BranchId, &Branch)> {
        self.branches.iter().enumerate().map(|(i, b)| (BranchId(i), b))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Node for a commit index, whether visited as a commit or only as a parent
    pub fn node_for_commit(&self, commit: CommitIndex) -> Option<NodeId> {
        self.by_commit.get(&commit).copied()
    }

    /// Row of a commit index
    pub fn commit_row(&self, commit: CommitIndex) -> Option<usize> {
        self.node_for_commit(commit).map(|id| self.node(id).row)
    }

    /// Parent nodes of `id`, in parent order
    pub fn down_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).down_edges.iter().map(|&e| self.edge(e).down)
    }

    /// Child nodes of `id`
    pub fn up_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).up_edges.iter().map(|&e| self.edge(e).up)
    }

    /// Row of a graph element; for an edge, the row of its upper end
    pub fn element_row(&self, element: GraphElement) -> usize {
        match element {
            GraphElement::Node(id) => self.node(id).row,
            GraphElement::Edge(id) => self.node(self.edge(id).up).row,
        }
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        let merge_commits = self.nodes.iter().filter(|n| n.is_merge()).count();
        let head_commits = self
            .nodes
            .iter()
            .filter(|n| n.node_type == NodeType::Commit && n.is_head())
            .count();
        let end_commits = self
            .nodes
            .iter()
            .filter(|n| n.node_type == NodeType::EndCommit)
            .count();
        let longest_edge = self
            .edges
            .iter()
            .map(|e| self.node(e.down).row - self.node(e.up).row)
            .max()
            .unwrap_or(0);

        GraphStats {
            total_rows: self.rows.len(),
            total_nodes: self.nodes.len(),
            total_edges: self.edges.len(),
            total_branches: self.branches.len(),
            merge_commits,
            head_commits,
            end_commits,
            longest_edge,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub total_rows: usize,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub total_branches: usize,
    pub merge_commits: usize,
    pub head_commits: usize,
    pub end_commits: usize,
    /// Largest row distance spanned by a single edge
    pub longest_edge: usize,
}
