use super::{CommitIndex, Reference, RootId};

/// Index of a branch inside the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchId(pub usize);

/// Coloring/grouping label for a lineage segment of the graph.
///
/// A branch created for a regular commit has no `down` commit; a branch
/// created for one parent edge of a merge records that parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub origin: CommitIndex,
    pub down: Option<CommitIndex>,
    pub references: Vec<Reference>,
    /// One of the heads this branch belongs to, `None` when no reference was known
    pub one_of_heads: Option<CommitIndex>,
    pub root: Option<RootId>,
}

impl Branch {
    pub fn new(origin: CommitIndex, references: Vec<Reference>) -> Self {
        let (one_of_heads, root) = match references.first() {
            Some(head) => (Some(head.target), Some(head.root)),
            None => (None, None),
        };
        Self {
            origin,
            down: None,
            references,
            one_of_heads,
            root,
        }
    }

    /// Branch for the edge from merge commit `origin` to `parent`
    pub fn merge(
        origin: CommitIndex,
        parent: CommitIndex,
        references: Vec<Reference>,
        one_of_heads: Option<CommitIndex>,
    ) -> Self {
        let root = references.first().map(|r| r.root);
        Self {
            origin,
            down: Some(parent),
            references,
            one_of_heads,
            root,
        }
    }

    /// Name of the first associated reference, if any
    pub fn label(&self) -> Option<&str> {
        self.references.first().map(|r| r.name.as_str())
    }
}
