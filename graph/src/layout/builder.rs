use crate::core::{Branch, BranchId, Commit, CommitIndex, Graph, NodeId, NodeType, Reference};
use crate::error::GraphError;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error};

/// Builds a [`Graph`] from commits given in child-before-parent order.
///
/// Every commit gets its own row in input order. Parents not yet visited are
/// kept pending so that a later commit with the same index reuses the node;
/// whatever is still pending at the end goes into one final row of
/// [`NodeType::EndCommit`] nodes.
pub struct GraphBuilder {
    graph: Graph,
    /// Nodes referenced as a parent but not visited as a commit yet
    pending: HashMap<CommitIndex, NodeId>,
    /// Commits already placed in a row
    visited: HashSet<CommitIndex>,
    refs_by_commit: HashMap<CommitIndex, Vec<Reference>>,
}

impl GraphBuilder {
    fn new(commits: &[Commit], references: &[Reference]) -> Self {
        let known: HashSet<CommitIndex> = commits.iter().map(|c| c.index).collect();
        let mut refs_by_commit: HashMap<CommitIndex, Vec<Reference>> = HashMap::new();
        for reference in references {
            if !known.contains(&reference.target) {
                debug!(name = %reference.name, target = reference.target, "ignoring reference outside loaded commits");
                continue;
            }
            refs_by_commit
                .entry(reference.target)
                .or_default()
                .push(reference.clone());
        }

        Self {
            graph: Graph::new(),
            pending: HashMap::new(),
            visited: HashSet::with_capacity(commits.len()),
            refs_by_commit,
        }
    }

    /// Build the graph for `commits` decorated with `references`
    pub fn build(commits: &[Commit], references: &[Reference]) -> Result<Graph, GraphError> {
        let mut builder = Self::new(commits, references);
        for commit in commits {
            builder.append(commit)?;
        }
        Ok(builder.finish())
    }

    fn append(&mut self, commit: &Commit) -> Result<(), GraphError> {
        if !self.visited.insert(commit.index) {
            return Err(GraphError::DuplicateCommit(commit.index));
        }

        let node = match self.pending.remove(&commit.index) {
            Some(node) => node,
            None => {
                let branch = self.create_branch(commit.index);
                self.graph.add_node(commit.index, branch)
            }
        };
        self.graph.push_row(vec![node], NodeType::Commit);

        let branch = self.graph.node(node).branch;
        if let [parent] = commit.parents[..] {
            self.add_parent(commit.index, node, parent, branch)?;
        } else {
            // Each parent of a merge gets its own branch
            let one_of_heads = self.graph.branch(branch).one_of_heads;
            for &parent in &commit.parents {
                let references = self.refs_of(commit.index);
                let merge_branch = self.graph.add_branch(Branch::merge(
                    commit.index,
                    parent,
                    references,
                    one_of_heads,
                ));
                self.add_parent(commit.index, node, parent, merge_branch)?;
            }
        }

        Ok(())
    }

    fn add_parent(
        &mut self,
        commit: CommitIndex,
        node: NodeId,
        parent: CommitIndex,
        branch: BranchId,
    ) -> Result<(), GraphError> {
        if self.visited.contains(&parent) {
            return Err(GraphError::ParentBeforeChild { commit, parent });
        }

        let parent_node = match self.pending.get(&parent) {
            Some(&id) => id,
            None => {
                let id = self.graph.add_node(parent, branch);
                self.pending.insert(parent, id);
                id
            }
        };
        self.graph.add_edge(node, parent_node, branch);
        Ok(())
    }

    /// Branch for a commit reached without any child
    fn create_branch(&mut self, commit: CommitIndex) -> BranchId {
        let references = self.refs_of(commit);
        if references.is_empty() {
            // Loaders are expected to put a reference on every head
            error!(commit, "no reference points at head commit, using a detached branch");
        }
        self.graph.add_branch(Branch::new(commit, references))
    }

    fn refs_of(&self, commit: CommitIndex) -> Vec<Reference> {
        self.refs_by_commit.get(&commit).cloned().unwrap_or_default()
    }

    fn finish(mut self) -> Graph {
        let mut unresolved: Vec<NodeId> = self.pending.into_values().collect();
        unresolved.sort();
        if !unresolved.is_empty() {
            self.graph.push_row(unresolved, NodeType::EndCommit);
        }

        debug!(
            rows = self.graph.row_count(),
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            branches = self.graph.branch_count(),
            "built commit graph"
        );
        self.graph
    }
}
