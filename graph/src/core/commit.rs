/// Dense commit identity assigned by the log loader
pub type CommitIndex = u32;

/// Opaque identity of the repository root a reference belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RootId(pub u32);

/// A commit as fed into the graph builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub index: CommitIndex,
    pub parents: Vec<CommitIndex>,
    pub timestamp: i64,
}

impl Commit {
    pub fn new(index: CommitIndex, parents: Vec<CommitIndex>, timestamp: i64) -> Self {
        Self {
            index,
            parents,
            timestamp,
        }
    }

    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Head,
    Branch,
    Remote,
    Tag,
}

/// A named reference pointing at a commit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub name: String,
    pub target: CommitIndex,
    pub kind: RefKind,
    pub root: RootId,
}

impl Reference {
    pub fn new(name: impl Into<String>, target: CommitIndex, kind: RefKind) -> Self {
        Self {
            name: name.into(),
            target,
            kind,
            root: RootId::default(),
        }
    }

    pub fn with_root(mut self, root: RootId) -> Self {
        self.root = root;
        self
    }

    pub fn is_branch(&self) -> bool {
        !matches!(self.kind, RefKind::Tag)
    }
}
