use anyhow::{Context, Result};
use git2::{Commit as GitCommit, ErrorCode, Oid, Reference as GitReference, Repository, Sort};
use std::collections::HashMap;
use tracing::debug;

use crate::core::{Commit, RefKind, Reference, RootId};
use crate::parse::HashIndex;
use crate::source::{LogBatch, LogSource};

/// Loads commit history and references from a git repository
pub struct GitWalker {
    repo: Repository,
    limit: Option<usize>,
    root: RootId,
}

impl GitWalker {
    pub fn new(repo_path: Option<&str>) -> Result<Self> {
        let repo = match repo_path {
            Some(path) => Repository::open(path),
            None => Repository::open_from_env(),
        }
        .context("Failed to open repository")?;

        Ok(Self {
            repo,
            limit: None,
            root: RootId::default(),
        })
    }

    /// Stop after `limit` commits; parents beyond it become end commits
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_root(mut self, root: RootId) -> Self {
        self.root = root;
        self
    }

    /// Walk HEAD and every reference, newest first, children before parents
    pub fn load_batch(&self) -> Result<LogBatch> {
        let mut revwalk = self.repo.revwalk()?;
        if let Some(head) = self.head()? {
            revwalk.push(head)?;
        }
        for reference in self.repo.references()? {
            let reference = reference?;
            if let Ok(commit) = reference.peel_to_commit() {
                revwalk.push(commit.id())?;
            }
        }
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        let mut hashes = HashIndex::new();
        let mut commits = Vec::new();
        let mut subjects = HashMap::new();
        for oid in revwalk {
            if self.limit.is_some_and(|limit| commits.len() >= limit) {
                break;
            }
            let commit = self.repo.find_commit(oid?)?;
            let node = Self::convert_commit(&commit, &mut hashes);
            if let Some(summary) = commit.summary() {
                subjects.insert(node.index, summary.to_string());
            }
            commits.push(node);
        }

        let references = self.references(&mut hashes)?;
        debug!(
            commits = commits.len(),
            references = references.len(),
            "loaded git history"
        );

        Ok(LogBatch {
            commits,
            references,
            hashes,
            subjects,
        })
    }

    /// Convert a git2 commit, indexing its hash and its parents' hashes
    fn convert_commit(commit: &GitCommit, hashes: &mut HashIndex) -> Commit {
        let index = hashes.index_of(&commit.id().to_string());
        let parents = commit
            .parent_ids()
            .map(|oid| hashes.index_of(&oid.to_string()))
            .collect();
        Commit::new(index, parents, commit.time().seconds())
    }

    /// HEAD, local and remote branches and tags, peeled to commits
    fn references(&self, hashes: &mut HashIndex) -> Result<Vec<Reference>> {
        let mut refs = Vec::new();

        if let Some(oid) = self.head()? {
            if let Some(target) = hashes.get(&oid.to_string()) {
                refs.push(Reference::new("HEAD", target, RefKind::Head).with_root(self.root));
            }
        }

        for reference in self.repo.references()? {
            let reference = reference?;
            let Some(kind) = Self::ref_kind(&reference) else {
                continue;
            };
            let (Some(name), Ok(commit)) = (reference.shorthand(), reference.peel_to_commit()) else {
                continue;
            };
            // References outside the loaded window are of no use to the graph
            if let Some(target) = hashes.get(&commit.id().to_string()) {
                refs.push(Reference::new(name, target, kind).with_root(self.root));
            }
        }

        Ok(refs)
    }

    fn ref_kind(reference: &GitReference) -> Option<RefKind> {
        if reference.is_branch() {
            Some(RefKind::Branch)
        } else if reference.is_remote() {
            Some(RefKind::Remote)
        } else if reference.is_tag() {
            Some(RefKind::Tag)
        } else {
            None
        }
    }

    /// Get HEAD commit, `None` while HEAD is unborn
    pub fn head(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(head) => Ok(head.peel_to_commit().ok().map(|commit| commit.id())),
            Err(err) if matches!(err.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(err) => Err(err).context("Failed to resolve HEAD"),
        }
    }
}

impl LogSource for GitWalker {
    fn load(&self) -> Result<LogBatch> {
        self.load_batch()
    }
}
