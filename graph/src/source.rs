use anyhow::{bail, Context, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use crate::core::{Commit, CommitIndex, RefKind, Reference};
use crate::parse::{index_commits, parse_log, HashIndex};

/// One loaded slice of history, ready for the graph builder
#[derive(Debug, Clone, Default)]
pub struct LogBatch {
    /// Commits in child-before-parent order
    pub commits: Vec<Commit>,
    pub references: Vec<Reference>,
    pub hashes: HashIndex,
    /// Commit subjects, when the source knows them
    pub subjects: HashMap<CommitIndex, String>,
}

impl LogBatch {
    pub fn subject(&self, commit: CommitIndex) -> Option<&str> {
        self.subjects.get(&commit).map(String::as_str)
    }

    /// Reference names pointing at `commit`
    pub fn ref_names(&self, commit: CommitIndex) -> Vec<&str> {
        self.references
            .iter()
            .filter(|r| r.target == commit)
            .map(|r| r.name.as_str())
            .collect()
    }

    pub fn timestamps(&self) -> HashMap<CommitIndex, i64> {
        self.commits.iter().map(|c| (c.index, c.timestamp)).collect()
    }
}

/// Anything that can produce a commit batch
pub trait LogSource {
    fn load(&self) -> Result<LogBatch>;
}

/// Reads the `timestamp|-hash|-parents` text format from a file
pub struct TextLogSource {
    path: PathBuf,
    /// `(name, hash)` pairs; when empty every head gets a reference
    references: Vec<(String, String)>,
}

impl TextLogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            references: Vec::new(),
        }
    }

    pub fn with_references(mut self, references: Vec<(String, String)>) -> Self {
        self.references = references;
        self
    }
}

impl LogSource for TextLogSource {
    fn load(&self) -> Result<LogBatch> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        batch_from_text(&text, &self.references)
            .with_context(|| format!("Failed to load {}", self.path.display()))
    }
}

/// Build a batch from text log content
pub fn batch_from_text(text: &str, references: &[(String, String)]) -> Result<LogBatch> {
    let timed = parse_log(text)?;
    let mut hashes = HashIndex::new();
    let commits = index_commits(&timed, &mut hashes);

    let references = if references.is_empty() {
        head_references(&commits, &hashes)
    } else {
        let mut resolved = Vec::with_capacity(references.len());
        for (name, hash) in references {
            let Some(target) = hashes.get(hash) else {
                bail!("reference {name} points at unknown commit {hash}");
            };
            resolved.push(Reference::new(name.clone(), target, RefKind::Branch));
        }
        resolved
    };

    Ok(LogBatch {
        commits,
        references,
        hashes,
        subjects: HashMap::new(),
    })
}

/// A branch reference, named after the commit hash, on every commit nobody lists as parent
fn head_references(commits: &[Commit], hashes: &HashIndex) -> Vec<Reference> {
    let parents: HashSet<CommitIndex> = commits
        .iter()
        .flat_map(|c| c.parents.iter().copied())
        .collect();
    commits
        .iter()
        .filter(|c| !parents.contains(&c.index))
        .map(|c| {
            let name = hashes.hash(c.index).unwrap_or_default();
            Reference::new(name, c.index, RefKind::Branch)
        })
        .collect()
}
