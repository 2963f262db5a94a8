use std::ops::RangeInclusive;

use crate::core::{Graph, GraphElement, NodeId};

use super::VisibilityState;

/// A linear run of the graph between two boundary nodes.
///
/// Every interior node has exactly one incoming and one outgoing edge;
/// the boundaries are the first non-simple nodes above and below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub upper: NodeId,
    pub lower: NodeId,
    /// Interior nodes, top to bottom
    pub interior: Vec<NodeId>,
}

impl Fragment {
    /// Rows from the upper to the lower boundary
    pub fn rows(&self, graph: &Graph) -> RangeInclusive<usize> {
        graph.node(self.upper).row..=graph.node(self.lower).row
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.upper == node || self.lower == node || self.interior.contains(&node)
    }
}

/// Rows touched by a visibility change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateRequest {
    from: usize,
    to: usize,
}

impl UpdateRequest {
    pub fn new(from: usize, to: usize) -> Self {
        Self {
            from: from.min(to),
            to: from.max(to),
        }
    }

    /// Request covering every row of a graph
    pub fn all(row_count: usize) -> Self {
        Self::new(0, row_count.saturating_sub(1))
    }

    /// First affected row; the place to scroll to
    pub fn from(&self) -> usize {
        self.from
    }

    /// Last affected row
    pub fn to(&self) -> usize {
        self.to
    }

    pub fn contains(&self, row: usize) -> bool {
        (self.from..=self.to).contains(&row)
    }
}

/// Collapses and expands fragments by writing into a [`VisibilityState`]
pub struct FragmentManager<'a> {
    graph: &'a Graph,
    visibility: &'a mut VisibilityState,
}

impl<'a> FragmentManager<'a> {
    pub fn new(graph: &'a Graph, visibility: &'a mut VisibilityState) -> Self {
        debug_assert_eq!(graph.row_count(), visibility.row_count());
        Self { graph, visibility }
    }

    /// Find the maximal collapsible run containing `element`
    pub fn relate_fragment(&self, element: GraphElement) -> Option<Fragment> {
        match element {
            GraphElement::Node(id) => {
                if self.graph.node(id).is_simple() {
                    Some(self.chain_through(id))
                } else {
                    self.chain_below(id).or_else(|| self.chain_above(id))
                }
            }
            GraphElement::Edge(id) => {
                let edge = self.graph.edge(id);
                if self.graph.node(edge.down).is_simple() {
                    Some(self.chain_through(edge.down))
                } else if self.graph.node(edge.up).is_simple() {
                    Some(self.chain_through(edge.up))
                } else {
                    None
                }
            }
        }
    }

    pub fn is_collapsed(&self, fragment: &Fragment) -> bool {
        fragment
            .interior
            .first()
            .is_some_and(|&node| !self.visibility.is_node_visible(self.graph, node))
    }

    /// Toggle a fragment between collapsed and expanded
    pub fn change_visibility(&mut self, fragment: &Fragment) -> UpdateRequest {
        let hide = !self.is_collapsed(fragment);
        self.set_fragment_hidden(fragment, hide);
        let rows = fragment.rows(self.graph);
        UpdateRequest::new(*rows.start(), *rows.end())
    }

    /// Expand every fragment
    pub fn show_all(&mut self) -> UpdateRequest {
        self.visibility.show_all();
        UpdateRequest::all(self.graph.row_count())
    }

    /// Collapse every fragment of the graph
    pub fn hide_all(&mut self) -> UpdateRequest {
        let graph = self.graph;
        for (id, node) in graph.nodes() {
            if node.is_simple() && self.visibility.is_node_visible(graph, id) {
                let fragment = self.chain_through(id);
                self.set_fragment_hidden(&fragment, true);
            }
        }
        UpdateRequest::all(self.graph.row_count())
    }

    /// All nodes sharing the branch of `node`, in row order
    pub fn all_commits_current_branch(&self, node: NodeId) -> Vec<NodeId> {
        let branch = self.graph.node(node).branch;
        let mut nodes: Vec<NodeId> = self
            .graph
            .nodes()
            .filter(|(_, n)| n.branch == branch)
            .map(|(id, _)| id)
            .collect();
        nodes.sort_by_key(|&id| (self.graph.node(id).row, id));
        nodes
    }

    fn set_fragment_hidden(&mut self, fragment: &Fragment, hidden: bool) {
        for &node in &fragment.interior {
            self.visibility.set_hidden(self.graph.node(node).row, hidden);
        }
    }

    /// Chain directly below a boundary node with a single parent
    fn chain_below(&self, id: NodeId) -> Option<Fragment> {
        let mut down = self.graph.down_nodes(id);
        match (down.next(), down.next()) {
            (Some(next), None) if self.graph.node(next).is_simple() => Some(self.chain_through(next)),
            _ => None,
        }
    }

    /// Chain directly above a boundary node with a single child
    fn chain_above(&self, id: NodeId) -> Option<Fragment> {
        let mut up = self.graph.up_nodes(id);
        match (up.next(), up.next()) {
            (Some(prev), None) if self.graph.node(prev).is_simple() => Some(self.chain_through(prev)),
            _ => None,
        }
    }

    /// Maximal chain of simple nodes through `start`, which must be simple
    fn chain_through(&self, start: NodeId) -> Fragment {
        let mut interior = vec![start];

        let mut upper = self.single_up(start);
        while self.graph.node(upper).is_simple() {
            interior.push(upper);
            upper = self.single_up(upper);
        }
        interior.reverse();

        let mut lower = self.single_down(start);
        while self.graph.node(lower).is_simple() {
            interior.push(lower);
            lower = self.single_down(lower);
        }

        Fragment {
            upper,
            lower,
            interior,
        }
    }

    fn single_up(&self, id: NodeId) -> NodeId {
        let node = self.graph.node(id);
        self.graph.edge(node.up_edges[0]).up
    }

    fn single_down(&self, id: NodeId) -> NodeId {
        let node = self.graph.node(id);
        self.graph.edge(node.down_edges[0]).down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Commit, CommitIndex, RefKind, Reference};
    use crate::layout::GraphBuilder;

    fn build(commits: &[(CommitIndex, &[CommitIndex])], heads: &[CommitIndex]) -> Graph {
        let commits: Vec<Commit> = commits
            .iter()
            .map(|(index, parents)| Commit::new(*index, parents.to_vec(), 0))
            .collect();
        let refs: Vec<Reference> = heads
            .iter()
            .map(|&h| Reference::new(format!("head-{h}"), h, RefKind::Branch))
            .collect();
        GraphBuilder::build(&commits, &refs).unwrap()
    }

    fn node(graph: &Graph, commit: CommitIndex) -> NodeId {
        graph.node_for_commit(commit).unwrap()
    }

    fn commits_of(graph: &Graph, nodes: &[NodeId]) -> Vec<CommitIndex> {
        nodes.iter().map(|&n| graph.node(n).commit).collect()
    }

    /// Heads 0 and 5 meet at 4; 1..=3 is a linear stretch
    fn forked_graph() -> Graph {
        build(
            &[
                (0, &[1]),
                (1, &[2]),
                (2, &[3]),
                (3, &[4]),
                (5, &[4]),
                (4, &[]),
            ],
            &[0, 5],
        )
    }

    #[test]
    fn test_collapse_linear_chain() {
        let graph = build(&[(0, &[1]), (1, &[2]), (2, &[])], &[0]);
        let mut visibility = VisibilityState::new(&graph);
        let mut manager = FragmentManager::new(&graph, &mut visibility);

        let b = node(&graph, 1);
        let fragment = manager.relate_fragment(GraphElement::Node(b)).unwrap();
        assert_eq!(fragment.upper, node(&graph, 0));
        assert_eq!(fragment.lower, node(&graph, 2));
        assert_eq!(fragment.interior, vec![b]);

        let update = manager.change_visibility(&fragment);
        assert_eq!((update.from(), update.to()), (0, 2));
        assert!(manager.is_collapsed(&fragment));

        let branch = manager.all_commits_current_branch(node(&graph, 0));
        assert_eq!(commits_of(&graph, &branch), vec![0, 1, 2]);

        assert_eq!(visibility.visible_rows(), vec![0, 2]);
    }

    #[test]
    fn test_toggle_restores_rows() {
        let graph = forked_graph();
        let mut visibility = VisibilityState::new(&graph);
        let mut manager = FragmentManager::new(&graph, &mut visibility);

        let fragment = manager
            .relate_fragment(GraphElement::Node(node(&graph, 2)))
            .unwrap();
        assert_eq!(commits_of(&graph, &fragment.interior), vec![1, 2, 3]);
        assert_eq!(graph.node(fragment.lower).commit, 4);

        manager.change_visibility(&fragment);
        assert!(manager.is_collapsed(&fragment));
        manager.change_visibility(&fragment);
        assert!(!manager.is_collapsed(&fragment));
        assert_eq!(visibility.hidden_count(), 0);
    }

    #[test]
    fn test_boundary_node_relates_to_chain_below() {
        let graph = forked_graph();
        let mut visibility = VisibilityState::new(&graph);
        let manager = FragmentManager::new(&graph, &mut visibility);

        let from_head = manager
            .relate_fragment(GraphElement::Node(node(&graph, 0)))
            .unwrap();
        assert_eq!(commits_of(&graph, &from_head.interior), vec![1, 2, 3]);

        // 4 has two children, so it relates to nothing below or above
        assert_eq!(manager.relate_fragment(GraphElement::Node(node(&graph, 4))), None);
        // 5 has a single parent, but that parent is a boundary
        assert_eq!(manager.relate_fragment(GraphElement::Node(node(&graph, 5))), None);
    }

    #[test]
    fn test_edge_relates_to_adjacent_chain() {
        let graph = forked_graph();
        let mut visibility = VisibilityState::new(&graph);
        let manager = FragmentManager::new(&graph, &mut visibility);

        let top = graph.node(node(&graph, 0)).down_edges[0];
        let bottom = graph.node(node(&graph, 3)).down_edges[0];
        let side = graph.node(node(&graph, 5)).down_edges[0];

        let expected = manager.relate_fragment(GraphElement::Node(node(&graph, 1)));
        assert_eq!(manager.relate_fragment(GraphElement::Edge(top)), expected);
        assert_eq!(manager.relate_fragment(GraphElement::Edge(bottom)), expected);
        assert_eq!(manager.relate_fragment(GraphElement::Edge(side)), None);
    }

    #[test]
    fn test_merge_is_never_interior() {
        let graph = build(
            &[(0, &[1]), (1, &[2, 3]), (2, &[4]), (3, &[4]), (4, &[5]), (5, &[])],
            &[0],
        );
        let mut visibility = VisibilityState::new(&graph);
        let manager = FragmentManager::new(&graph, &mut visibility);

        for (id, _) in graph.nodes() {
            if let Some(fragment) = manager.relate_fragment(GraphElement::Node(id)) {
                for &inner in &fragment.interior {
                    assert!(graph.node(inner).degree() <= 2);
                }
            }
        }
        let merge = node(&graph, 1);
        assert!(manager
            .relate_fragment(GraphElement::Node(merge))
            .is_none());
    }

    #[test]
    fn test_hide_all_then_show_all() {
        let graph = forked_graph();
        let mut visibility = VisibilityState::new(&graph);
        let initial = visibility.visible_rows();
        let mut manager = FragmentManager::new(&graph, &mut visibility);

        let update = manager.hide_all();
        assert_eq!((update.from(), update.to()), (0, graph.row_count() - 1));
        let fragment = manager
            .relate_fragment(GraphElement::Node(node(&graph, 0)))
            .unwrap();
        assert!(manager.is_collapsed(&fragment));

        manager.show_all();
        assert_eq!(visibility.visible_rows(), initial);
    }

    #[test]
    fn test_update_request_normalizes() {
        let request = UpdateRequest::new(5, 2);
        assert_eq!(request.from(), 2);
        assert_eq!(request.to(), 5);
        assert!(request.contains(3));
        assert!(!request.contains(6));
        assert_eq!(UpdateRequest::all(0), UpdateRequest::new(0, 0));
    }
}
