use crate::core::CommitIndex;

/// Precondition violations detected while building a graph
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("commit {0} appears more than once in the input")]
    DuplicateCommit(CommitIndex),

    #[error("commit {commit} lists {parent} as parent, but {parent} was already placed above it")]
    ParentBeforeChild {
        commit: CommitIndex,
        parent: CommitIndex,
    },
}

/// Malformed lines in the text log format
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("separator \"|-\" not found in line: {0}")]
    MissingSeparator(String),

    #[error("invalid timestamp {timestamp:?} in line: {line}")]
    InvalidTimestamp { timestamp: String, line: String },

    #[error("empty commit hash in line: {0}")]
    EmptyHash(String),

    #[error("invalid reference {0:?}, expected NAME=HASH")]
    InvalidReference(String),
}
