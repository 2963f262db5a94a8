use crate::core::{Graph, NodeId};

/// Hidden/shown overlay over the rows of one graph.
///
/// The graph itself is never mutated by collapsing; only this overlay is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityState {
    hidden: Vec<bool>,
}

impl VisibilityState {
    /// All rows of `graph` visible
    pub fn new(graph: &Graph) -> Self {
        Self::all_visible(graph.row_count())
    }

    pub fn all_visible(row_count: usize) -> Self {
        Self {
            hidden: vec![false; row_count],
        }
    }

    pub fn row_count(&self) -> usize {
        self.hidden.len()
    }

    pub fn is_row_visible(&self, row: usize) -> bool {
        !self.hidden.get(row).copied().unwrap_or(false)
    }

    pub fn is_node_visible(&self, graph: &Graph, node: NodeId) -> bool {
        self.is_row_visible(graph.node(node).row)
    }

    pub(crate) fn set_hidden(&mut self, row: usize, hidden: bool) {
        if let Some(slot) = self.hidden.get_mut(row) {
            *slot = hidden;
        }
    }

    pub fn show_all(&mut self) {
        self.hidden.iter_mut().for_each(|h| *h = false);
    }

    /// Indices of the visible rows, in order
    pub fn visible_rows(&self) -> Vec<usize> {
        self.hidden
            .iter()
            .enumerate()
            .filter(|&(_, &hidden)| !hidden)
            .map(|(row, _)| row)
            .collect()
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.iter().filter(|&&h| h).count()
    }

    /// Position of `row` among the visible rows, or of the closest visible row above it
    pub fn visible_position(&self, row: usize) -> Option<usize> {
        let row = row.min(self.hidden.len().checked_sub(1)?);
        let nearest = (0..=row).rev().find(|&r| self.is_row_visible(r))?;
        Some(self.hidden[..nearest].iter().filter(|&&h| !h).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hide_and_show() {
        let mut state = VisibilityState::all_visible(4);
        state.set_hidden(1, true);
        state.set_hidden(2, true);

        assert_eq!(state.visible_rows(), vec![0, 3]);
        assert_eq!(state.hidden_count(), 2);
        assert!(!state.is_row_visible(2));

        state.show_all();
        assert_eq!(state.visible_rows(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_visible_position() {
        let mut state = VisibilityState::all_visible(5);
        state.set_hidden(1, true);
        state.set_hidden(2, true);

        assert_eq!(state.visible_position(0), Some(0));
        assert_eq!(state.visible_position(2), Some(0));
        assert_eq!(state.visible_position(3), Some(1));
        assert_eq!(state.visible_position(40), Some(2));
        assert_eq!(VisibilityState::all_visible(0).visible_position(0), None);
    }

    #[test]
    fn test_out_of_range_row_is_visible() {
        let mut state = VisibilityState::all_visible(1);
        state.set_hidden(3, true);
        assert!(state.is_row_visible(3));
        assert_eq!(state.hidden_count(), 0);
    }
}
