use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

use crate::core::{Commit, Graph, GraphElement, GraphStats, NodeId, Reference};
use crate::error::GraphError;
use crate::fragment::{FragmentManager, UpdateRequest, VisibilityState};
use crate::layout::GraphBuilder;
use crate::print::{PrintCellModel, PrintOptions, SelectController};

struct LogState {
    graph: Arc<Graph>,
    visibility: VisibilityState,
    select: SelectController,
    options: PrintOptions,
}

/// Owns the current graph snapshot with its visibility overlay and selection.
///
/// Rebuilds happen outside the lock and are swapped in whole; readers never
/// see a partially built graph.
pub struct GraphController {
    state: RwLock<LogState>,
}

impl GraphController {
    pub fn new(options: PrintOptions) -> Self {
        let graph = Graph::new();
        Self {
            state: RwLock::new(LogState {
                visibility: VisibilityState::new(&graph),
                graph: Arc::new(graph),
                select: SelectController::new(),
                options,
            }),
        }
    }

    /// Replace the graph with one built from a new commit batch.
    ///
    /// On error the previous graph stays in place.
    pub fn rebuild(&self, commits: &[Commit], references: &[Reference]) -> Result<GraphStats, GraphError> {
        let graph = GraphBuilder::build(commits, references)?;
        let visibility = VisibilityState::new(&graph);
        let stats = graph.stats();

        let mut state = self.state.write();
        state.graph = Arc::new(graph);
        state.visibility = visibility;
        state.select.clear();
        debug!(rows = stats.total_rows, "graph snapshot replaced");
        Ok(stats)
    }

    /// Current graph snapshot
    pub fn graph(&self) -> Arc<Graph> {
        Arc::clone(&self.state.read().graph)
    }

    pub fn options(&self) -> PrintOptions {
        self.state.read().options
    }

    pub fn set_show_long_edges(&self, show: bool) {
        self.state.write().options.show_long_edges = show;
    }

    /// Print model of the current snapshot
    pub fn print(&self) -> PrintCellModel {
        let state = self.state.read();
        PrintCellModel::build(&state.graph, &state.visibility, &state.options, &state.select)
    }

    /// Collapse or expand the fragment around `element`
    pub fn toggle_fragment(&self, element: GraphElement) -> Option<UpdateRequest> {
        let mut state = self.state.write();
        let state = &mut *state;
        let mut manager = FragmentManager::new(&state.graph, &mut state.visibility);
        let fragment = manager.relate_fragment(element)?;
        Some(manager.change_visibility(&fragment))
    }

    pub fn show_all(&self) -> UpdateRequest {
        let mut state = self.state.write();
        let state = &mut *state;
        FragmentManager::new(&state.graph, &mut state.visibility).show_all()
    }

    pub fn hide_all(&self) -> UpdateRequest {
        let mut state = self.state.write();
        let state = &mut *state;
        FragmentManager::new(&state.graph, &mut state.visibility).hide_all()
    }

    /// Highlight a single element
    pub fn select(&self, element: GraphElement) {
        self.state.write().select.select([element]);
    }

    /// Highlight every node of the branch of `node` and the edges of that branch.
    /// Returns the number of highlighted nodes.
    pub fn select_branch(&self, node: NodeId) -> usize {
        let mut state = self.state.write();
        let state = &mut *state;
        let nodes = FragmentManager::new(&state.graph, &mut state.visibility)
            .all_commits_current_branch(node);
        let branch = state.graph.node(node).branch;
        let edges = state
            .graph
            .edges()
            .filter(|(_, e)| e.branch == branch)
            .map(|(id, _)| GraphElement::Edge(id));

        let count = nodes.len();
        state
            .select
            .select(nodes.into_iter().map(GraphElement::Node).chain(edges));
        count
    }

    pub fn clear_selection(&self) {
        self.state.write().select.clear();
    }

    /// Visible position to scroll to for a graph row
    pub fn jump_to_row(&self, row: usize) -> Option<usize> {
        self.state.read().visibility.visible_position(row)
    }

    pub fn visible_row_count(&self) -> usize {
        let state = self.state.read();
        state.visibility.row_count() - state.visibility.hidden_count()
    }
}

impl Default for GraphController {
    fn default() -> Self {
        Self::new(PrintOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RefKind;

    fn chain(len: u32) -> Vec<Commit> {
        (0..len)
            .map(|i| {
                let parents = if i + 1 < len { vec![i + 1] } else { vec![] };
                Commit::new(i, parents, 0)
            })
            .collect()
    }

    fn head_ref() -> Vec<Reference> {
        vec![Reference::new("master", 0, RefKind::Branch)]
    }

    #[test]
    fn test_rebuild_replaces_snapshot() {
        let controller = GraphController::default();
        assert_eq!(controller.graph().row_count(), 0);

        let stats = controller.rebuild(&chain(4), &head_ref()).unwrap();
        assert_eq!(stats.total_rows, 4);
        assert_eq!(controller.print().len(), 4);
    }

    #[test]
    fn test_failed_rebuild_keeps_old_graph() {
        let controller = GraphController::default();
        controller.rebuild(&chain(3), &head_ref()).unwrap();
        let before = controller.graph();

        let broken = vec![Commit::new(0, vec![], 0), Commit::new(0, vec![], 0)];
        assert!(controller.rebuild(&broken, &[]).is_err());
        assert!(Arc::ptr_eq(&before, &controller.graph()));
    }

    #[test]
    fn test_toggle_and_jump() {
        let controller = GraphController::default();
        controller.rebuild(&chain(5), &head_ref()).unwrap();
        let graph = controller.graph();
        let middle = graph.node_for_commit(2).unwrap();

        let update = controller.toggle_fragment(GraphElement::Node(middle)).unwrap();
        assert_eq!((update.from(), update.to()), (0, 4));
        assert_eq!(controller.visible_row_count(), 2);
        assert_eq!(controller.jump_to_row(update.from()), Some(0));
        assert_eq!(controller.jump_to_row(4), Some(1));

        controller.toggle_fragment(GraphElement::Node(middle)).unwrap();
        assert_eq!(controller.visible_row_count(), 5);
    }

    #[test]
    fn test_hide_all_and_show_all() {
        let controller = GraphController::default();
        controller.rebuild(&chain(6), &head_ref()).unwrap();
        let initial = controller.print();

        controller.hide_all();
        assert_eq!(controller.print().len(), 2);
        controller.show_all();
        assert_eq!(controller.print(), initial);
    }

    #[test]
    fn test_select_branch_highlights_cells() {
        let controller = GraphController::default();
        controller.rebuild(&chain(3), &head_ref()).unwrap();
        let head = controller.graph().node_for_commit(0).unwrap();

        assert_eq!(controller.select_branch(head), 3);
        let model = controller.print();
        assert!(model.rows().iter().all(|row| row.cells[0].selected));
        assert!(model.row(0).unwrap().short_edges[0].selected);

        controller.clear_selection();
        assert!(!controller.print().row(0).unwrap().cells[0].selected);
    }

    #[test]
    fn test_long_edge_toggle() {
        let controller = GraphController::default();
        assert!(!controller.options().show_long_edges);
        controller.set_show_long_edges(true);
        assert!(controller.options().show_long_edges);
    }

    #[test]
    fn test_readers_during_rebuild() {
        let controller = GraphController::default();
        controller.rebuild(&chain(50), &head_ref()).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..20 {
                        let rows = controller.print().len();
                        assert!(rows == 50 || rows == 80);
                    }
                });
            }
            scope.spawn(|| controller.rebuild(&chain(80), &head_ref()).unwrap());
        });

        assert_eq!(controller.graph().row_count(), 80);
    }
}
