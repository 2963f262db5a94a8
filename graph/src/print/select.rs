use std::collections::HashSet;

use crate::core::GraphElement;

/// Highlighted graph elements for hover/click feedback
#[derive(Debug, Clone, Default)]
pub struct SelectController {
    selected: HashSet<GraphElement>,
}

impl SelectController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current selection with `elements`
    pub fn select<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = GraphElement>,
    {
        self.selected.clear();
        self.selected.extend(elements);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, element: GraphElement) -> bool {
        self.selected.contains(&element)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }
}
