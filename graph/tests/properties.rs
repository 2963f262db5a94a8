use std::collections::HashSet;

use graph::{
    Commit, CommitIndex, Fragment, FragmentManager, Graph, GraphBuilder, GraphElement, NodeId,
    PrintCellModel, PrintOptions, RefKind, Reference, SelectController, VisibilityState,
};
use proptest::prelude::*;

/// Commits `0..n` in topological order; parents always have a larger index and
/// indices `>= n` are parents outside the loaded history.
fn history() -> impl Strategy<Value = Vec<Commit>> {
    prop::collection::vec(prop::collection::vec(0u32..64, 0..3), 1..40).prop_map(|picks| {
        let n = picks.len() as u32;
        picks
            .into_iter()
            .enumerate()
            .map(|(i, picks)| {
                let i = i as u32;
                let span = n + 3 - i - 1;
                let mut parents: Vec<CommitIndex> = Vec::new();
                for pick in picks {
                    let parent = i + 1 + pick % span;
                    if !parents.contains(&parent) {
                        parents.push(parent);
                    }
                }
                Commit::new(i, parents, i64::from(n - i))
            })
            .collect()
    })
}

fn head_refs(commits: &[Commit]) -> Vec<Reference> {
    let parents: HashSet<CommitIndex> = commits
        .iter()
        .flat_map(|c| c.parents.iter().copied())
        .collect();
    commits
        .iter()
        .filter(|c| !parents.contains(&c.index))
        .map(|c| Reference::new(format!("head-{}", c.index), c.index, RefKind::Branch))
        .collect()
}

fn unresolved(commits: &[Commit]) -> HashSet<CommitIndex> {
    let n = commits.len() as CommitIndex;
    commits
        .iter()
        .flat_map(|c| c.parents.iter().copied())
        .filter(|&p| p >= n)
        .collect()
}

fn print(graph: &Graph, visibility: &VisibilityState) -> PrintCellModel {
    PrintCellModel::build(
        graph,
        visibility,
        &PrintOptions::default(),
        &SelectController::new(),
    )
}

/// Interior nodes are simple and both boundaries are not
fn check_fragment(graph: &Graph, fragment: &Fragment) -> Result<(), TestCaseError> {
    prop_assert!(!fragment.interior.is_empty());
    for &node in &fragment.interior {
        prop_assert!(graph.node(node).is_simple());
    }
    prop_assert!(!graph.node(fragment.upper).is_simple());
    prop_assert!(!graph.node(fragment.lower).is_simple());
    Ok(())
}

proptest! {
    #[test]
    fn row_count_matches_commits(commits in history()) {
        let graph = GraphBuilder::build(&commits, &head_refs(&commits)).unwrap();
        let end_row = usize::from(!unresolved(&commits).is_empty());
        prop_assert_eq!(graph.row_count(), commits.len() + end_row);
    }

    #[test]
    fn edges_point_down(commits in history()) {
        let graph = GraphBuilder::build(&commits, &head_refs(&commits)).unwrap();
        for (_, edge) in graph.edges() {
            prop_assert!(graph.node(edge.up).row < graph.node(edge.down).row);
        }
        for (row, commit) in commits.iter().enumerate() {
            prop_assert_eq!(graph.commit_row(commit.index), Some(row));
        }
    }

    #[test]
    fn one_node_per_commit(commits in history()) {
        let graph = GraphBuilder::build(&commits, &head_refs(&commits)).unwrap();
        let seen: HashSet<CommitIndex> = graph.nodes().map(|(_, node)| node.commit).collect();
        prop_assert_eq!(seen.len(), graph.node_count());
        prop_assert_eq!(graph.node_count(), commits.len() + unresolved(&commits).len());
    }

    #[test]
    fn edges_are_registered_on_both_ends(commits in history()) {
        let graph = GraphBuilder::build(&commits, &head_refs(&commits)).unwrap();
        for (id, edge) in graph.edges() {
            prop_assert!(graph.node(edge.up).down_edges.contains(&id));
            prop_assert!(graph.node(edge.down).up_edges.contains(&id));
        }
        for (id, node) in graph.nodes() {
            for &edge in &node.down_edges {
                prop_assert_eq!(graph.edge(edge).up, id);
            }
            for &edge in &node.up_edges {
                prop_assert_eq!(graph.edge(edge).down, id);
            }
        }
    }

    #[test]
    fn hide_all_then_show_all_restores_print(commits in history()) {
        let graph = GraphBuilder::build(&commits, &head_refs(&commits)).unwrap();
        let mut visibility = VisibilityState::new(&graph);
        let initial = print(&graph, &visibility);

        FragmentManager::new(&graph, &mut visibility).hide_all();
        // Only simple nodes ever get hidden, so the collapsed model builds
        for (id, node) in graph.nodes() {
            if !visibility.is_node_visible(&graph, id) {
                prop_assert_eq!(node.up_edges.len(), 1);
                prop_assert_eq!(node.down_edges.len(), 1);
            }
        }
        let collapsed = print(&graph, &visibility);
        prop_assert!(collapsed.len() <= initial.len());

        FragmentManager::new(&graph, &mut visibility).show_all();
        prop_assert_eq!(visibility.hidden_count(), 0);
        prop_assert_eq!(print(&graph, &visibility), initial);
    }

    #[test]
    fn toggling_twice_is_identity(commits in history(), pick in any::<prop::sample::Index>()) {
        let graph = GraphBuilder::build(&commits, &head_refs(&commits)).unwrap();
        let mut visibility = VisibilityState::new(&graph);
        let node = NodeId(pick.index(graph.node_count()));
        let before = visibility.clone();

        let mut manager = FragmentManager::new(&graph, &mut visibility);
        if let Some(fragment) = manager.relate_fragment(GraphElement::Node(node)) {
            manager.change_visibility(&fragment);
            prop_assert!(manager.is_collapsed(&fragment));
            manager.change_visibility(&fragment);
        }
        prop_assert_eq!(visibility, before);
    }

    #[test]
    fn related_fragments_never_contain_merges(commits in history()) {
        let graph = GraphBuilder::build(&commits, &head_refs(&commits)).unwrap();
        let mut visibility = VisibilityState::new(&graph);
        let manager = FragmentManager::new(&graph, &mut visibility);

        for (id, node) in graph.nodes() {
            let related = manager.relate_fragment(GraphElement::Node(id));
            if node.is_simple() {
                prop_assert!(related.is_some());
            }
            if let Some(fragment) = related {
                check_fragment(&graph, &fragment)?;
                prop_assert!(fragment.contains(id));
            }
        }

        for (id, edge) in graph.edges() {
            if let Some(fragment) = manager.relate_fragment(GraphElement::Edge(id)) {
                check_fragment(&graph, &fragment)?;
                prop_assert!(fragment.contains(edge.up));
                prop_assert!(fragment.contains(edge.down));
            }
        }
    }
}
