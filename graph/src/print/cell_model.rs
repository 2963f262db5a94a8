use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::core::{BranchId, EdgeId, Graph, GraphElement, NodeId, NodeType};
use crate::fragment::VisibilityState;

use super::SelectController;

/// Smallest usable long-edge threshold; a shortened edge needs a row between its two stubs
pub const MIN_LONG_EDGE_THRESHOLD: usize = 2;

/// Print settings for the cell model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Draw long edges through every row they cross
    pub show_long_edges: bool,
    /// Edges spanning more visible rows than this are long.
    /// Values below [`MIN_LONG_EDGE_THRESHOLD`] are raised to it.
    pub long_edge_threshold: usize,
}

impl PrintOptions {
    pub fn effective_threshold(&self) -> usize {
        self.long_edge_threshold.max(MIN_LONG_EDGE_THRESHOLD)
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            show_long_edges: false,
            long_edge_threshold: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Commit,
    EndCommit,
    /// An edge passing through the row
    Edge,
    /// Stub below the upper end of a shortened long edge
    LongEdgeDown,
    /// Stub above the lower end of a shortened long edge
    LongEdgeUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintCell {
    pub column: usize,
    pub element: GraphElement,
    pub kind: CellKind,
    pub branch: BranchId,
    /// The edge runs through a collapsed fragment
    pub collapsed: bool,
    pub selected: bool,
}

/// Connection between a cell of one visible row and a cell of the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortEdge {
    pub up_column: usize,
    pub down_column: usize,
    pub edge: EdgeId,
    pub branch: BranchId,
    pub collapsed: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintRow {
    /// Graph row this visible row shows
    pub row: usize,
    pub cells: Vec<PrintCell>,
    /// Connections down to the next visible row
    pub short_edges: Vec<ShortEdge>,
}

impl PrintRow {
    pub fn width(&self) -> usize {
        self.cells.len()
    }

}

/// Edge between two visible nodes, possibly running through hidden rows
#[derive(Debug, Clone, Copy)]
struct VisibleEdge {
    first: EdgeId,
    up: NodeId,
    down: NodeId,
    collapsed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot {
    Node(NodeId),
    Edge(usize),
}

/// Per-row print layout of the visible part of a graph
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrintCellModel {
    rows: Vec<PrintRow>,
}

impl PrintCellModel {
    pub fn build(
        graph: &Graph,
        visibility: &VisibilityState,
        options: &PrintOptions,
        select: &SelectController,
    ) -> Self {
        LayoutPass::new(graph, visibility, options, select).run()
    }

    pub fn rows(&self) -> &[PrintRow] {
        &self.rows
    }

    pub fn row(&self, position: usize) -> Option<&PrintRow> {
        self.rows.get(position)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row, in cells
    pub fn max_width(&self) -> usize {
        self.rows.iter().map(PrintRow::width).max().unwrap_or(0)
    }

    /// Visible position of a graph row, if that row is shown
    pub fn position_of(&self, graph_row: usize) -> Option<usize> {
        self.rows.binary_search_by_key(&graph_row, |r| r.row).ok()
    }

    /// Element printed at a visible position and column
    pub fn element_at(&self, position: usize, column: usize) -> Option<GraphElement> {
        self.rows
            .get(position)?
            .cells
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.element)
    }
}

struct LayoutPass<'a> {
    graph: &'a Graph,
    options: &'a PrintOptions,
    select: &'a SelectController,
    visible_rows: Vec<usize>,
    /// Graph row -> visible position
    position: Vec<Option<usize>>,
    edges: Vec<VisibleEdge>,
    down_of: HashMap<NodeId, Vec<usize>>,
}

impl<'a> LayoutPass<'a> {
    fn new(
        graph: &'a Graph,
        visibility: &'a VisibilityState,
        options: &'a PrintOptions,
        select: &'a SelectController,
    ) -> Self {
        let visible_rows: Vec<usize> = (0..graph.row_count())
            .filter(|&row| visibility.is_row_visible(row))
            .collect();
        let mut position = vec![None; graph.row_count()];
        for (pos, &row) in visible_rows.iter().enumerate() {
            position[row] = Some(pos);
        }

        let mut edges = Vec::new();
        let mut down_of: HashMap<NodeId, Vec<usize>> = HashMap::new();
        for (id, node) in graph.nodes() {
            if !visibility.is_node_visible(graph, id) {
                continue;
            }
            for &first in &node.down_edges {
                let mut down = graph.edge(first).down;
                let mut collapsed = false;
                while !visibility.is_node_visible(graph, down) {
                    let hidden = graph.node(down);
                    assert_eq!(
                        hidden.down_edges.len(),
                        1,
                        "hidden node for commit {} is not inside a fragment",
                        hidden.commit
                    );
                    down = graph.edge(hidden.down_edges[0]).down;
                    collapsed = true;
                }
                down_of.entry(id).or_default().push(edges.len());
                edges.push(VisibleEdge {
                    first,
                    up: id,
                    down,
                    collapsed,
                });
            }
        }

        Self {
            graph,
            options,
            select,
            visible_rows,
            position,
            edges,
            down_of,
        }
    }

    fn run(self) -> PrintCellModel {
        let mut layouts: Vec<Vec<Slot>> = Vec::with_capacity(self.visible_rows.len());
        for &row in &self.visible_rows {
            let previous = layouts.last().map(Vec::as_slice).unwrap_or_default();
            let next = self.next_layout(previous, row);
            layouts.push(next);
        }

        let columns: Vec<HashMap<Slot, usize>> = layouts
            .iter()
            .enumerate()
            .map(|(pos, slots)| {
                slots
                    .iter()
                    .filter(|&&slot| self.is_displayed(slot, pos))
                    .enumerate()
                    .map(|(column, &slot)| (slot, column))
                    .collect()
            })
            .collect();

        let rows = layouts
            .iter()
            .enumerate()
            .map(|(pos, slots)| PrintRow {
                row: self.visible_rows[pos],
                cells: self.cells(slots, pos, &columns[pos]),
                short_edges: columns
                    .get(pos + 1)
                    .map(|below| self.short_edges(slots, pos, &columns[pos], below))
                    .unwrap_or_default(),
            })
            .collect();

        PrintCellModel { rows }
    }

    /// Layout of `row` derived from the layout of the visible row above it
    fn next_layout(&self, previous: &[Slot], row: usize) -> Vec<Slot> {
        let mut slots = Vec::new();
        let mut placed = HashSet::new();

        for &slot in previous {
            match slot {
                Slot::Node(node) => {
                    for &edge in self.down_edges(node) {
                        self.continue_edge(edge, row, &mut slots, &mut placed);
                    }
                }
                Slot::Edge(edge) => self.continue_edge(edge, row, &mut slots, &mut placed),
            }
        }

        for &node in self.graph.nodes_in_row(row) {
            if placed.insert(node) {
                slots.push(Slot::Node(node));
            }
        }
        slots
    }

    fn continue_edge(
        &self,
        edge: usize,
        row: usize,
        slots: &mut Vec<Slot>,
        placed: &mut HashSet<NodeId>,
    ) {
        let down = self.edges[edge].down;
        let down_row = self.graph.node(down).row;
        assert!(
            down_row >= row,
            "edge into row {down_row} is still open at row {row}"
        );
        if down_row == row {
            if placed.insert(down) {
                slots.push(Slot::Node(down));
            }
        } else {
            slots.push(Slot::Edge(edge));
        }
    }

    fn down_edges(&self, node: NodeId) -> &[usize] {
        self.down_of.get(&node).map(Vec::as_slice).unwrap_or_default()
    }

    fn span(&self, edge: usize) -> (usize, usize) {
        let edge = &self.edges[edge];
        let pos = |node: NodeId| {
            self.position[self.graph.node(node).row]
                .unwrap_or_else(|| panic!("edge endpoint in hidden row {}", self.graph.node(node).row))
        };
        (pos(edge.up), pos(edge.down))
    }

    fn is_shortened(&self, edge: usize) -> bool {
        let (up, down) = self.span(edge);
        !self.options.show_long_edges && down - up > self.options.effective_threshold()
    }

    fn is_displayed(&self, slot: Slot, pos: usize) -> bool {
        match slot {
            Slot::Node(_) => true,
            Slot::Edge(edge) => {
                if !self.is_shortened(edge) {
                    return true;
                }
                let (up, down) = self.span(edge);
                pos == up + 1 || pos + 1 == down
            }
        }
    }

    fn cells(&self, slots: &[Slot], pos: usize, columns: &HashMap<Slot, usize>) -> Vec<PrintCell> {
        let mut cells = Vec::with_capacity(columns.len());
        for &slot in slots {
            let Some(&column) = columns.get(&slot) else {
                continue;
            };
            let cell = match slot {
                Slot::Node(id) => {
                    let node = self.graph.node(id);
                    let element = GraphElement::Node(id);
                    PrintCell {
                        column,
                        element,
                        kind: match node.node_type {
                            NodeType::Commit => CellKind::Commit,
                            NodeType::EndCommit => CellKind::EndCommit,
                        },
                        branch: node.branch,
                        collapsed: false,
                        selected: self.select.is_selected(element),
                    }
                }
                Slot::Edge(edge) => {
                    let visible = &self.edges[edge];
                    let element = GraphElement::Edge(visible.first);
                    let kind = if !self.is_shortened(edge) {
                        CellKind::Edge
                    } else if pos == self.span(edge).0 + 1 {
                        CellKind::LongEdgeDown
                    } else {
                        CellKind::LongEdgeUp
                    };
                    PrintCell {
                        column,
                        element,
                        kind,
                        branch: self.graph.edge(visible.first).branch,
                        collapsed: visible.collapsed,
                        selected: self.select.is_selected(element),
                    }
                }
            };
            cells.push(cell);
        }
        cells
    }

    fn short_edges(
        &self,
        slots: &[Slot],
        pos: usize,
        columns: &HashMap<Slot, usize>,
        below: &HashMap<Slot, usize>,
    ) -> Vec<ShortEdge> {
        let next_row = self.visible_rows[pos + 1];
        let mut short_edges = Vec::new();

        for &slot in slots {
            let Some(&up_column) = columns.get(&slot) else {
                continue;
            };
            let single;
            let edges = match slot {
                Slot::Node(node) => self.down_edges(node),
                Slot::Edge(edge) => {
                    single = [edge];
                    &single[..]
                }
            };
            for &edge in edges {
                let visible = &self.edges[edge];
                let target = if self.graph.node(visible.down).row == next_row {
                    Slot::Node(visible.down)
                } else {
                    Slot::Edge(edge)
                };
                if let Some(&down_column) = below.get(&target) {
                    short_edges.push(ShortEdge {
                        up_column,
                        down_column,
                        edge: visible.first,
                        branch: self.graph.edge(visible.first).branch,
                        collapsed: visible.collapsed,
                        selected: self.select.is_selected(GraphElement::Edge(visible.first)),
                    });
                }
            }
        }
        short_edges
    }
}
