pub mod hash_index;
pub mod text_log;

pub use hash_index::HashIndex;
pub use text_log::{index_commits, parse_log, parse_reference, TimedCommit, SEPARATOR};
