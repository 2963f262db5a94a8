use std::str::FromStr;

use crate::core::Commit;
use crate::error::ParseError;

use super::HashIndex;

/// Field separator of the text log format
pub const SEPARATOR: &str = "|-";

/// One line of the text log format: `timestamp|-hash|-parent1 parent2 ...`.
///
/// The timestamp field may be empty (`|-hash|-parents`) or left out
/// entirely (`hash|-parents`); either way it is 0. The parent list is whitespace separated and may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedCommit {
    pub timestamp: i64,
    pub hash: String,
    pub parents: Vec<String>,
}

impl FromStr for TimedCommit {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (first, rest) = line
            .split_once(SEPARATOR)
            .ok_or_else(|| ParseError::MissingSeparator(line.to_string()))?;

        let (timestamp, hash, parents) = match rest.split_once(SEPARATOR) {
            Some((hash, parents)) => {
                let timestamp = match first.trim() {
                    "" => 0,
                    field => field.parse::<i64>().map_err(|_| ParseError::InvalidTimestamp {
                        timestamp: field.to_string(),
                        line: line.to_string(),
                    })?,
                };
                (timestamp, hash, parents)
            }
            None => (0, first, rest),
        };

        let hash = hash.trim();
        if hash.is_empty() {
            return Err(ParseError::EmptyHash(line.to_string()));
        }

        Ok(Self {
            timestamp,
            hash: hash.to_string(),
            parents: parents.split_whitespace().map(str::to_string).collect(),
        })
    }
}

/// Parse a whole log, skipping blank lines and `#` comments
pub fn parse_log(text: &str) -> Result<Vec<TimedCommit>, ParseError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.parse::<TimedCommit>())
        .collect()
}

/// Convert parsed lines into graph commits, indexing every hash
pub fn index_commits(timed: &[TimedCommit], index: &mut HashIndex) -> Vec<Commit> {
    timed
        .iter()
        .map(|commit| {
            let id = index.index_of(&commit.hash);
            let parents = commit.parents.iter().map(|p| index.index_of(p)).collect();
            Commit::new(id, parents, commit.timestamp)
        })
        .collect()
}

/// Parse a `NAME=HASH` reference argument
pub fn parse_reference(spec: &str) -> Result<(String, String), ParseError> {
    match spec.split_once('=') {
        Some((name, hash)) if !name.trim().is_empty() && !hash.trim().is_empty() => {
            Ok((name.trim().to_string(), hash.trim().to_string()))
        }
        _ => Err(ParseError::InvalidReference(spec.to_string())),
    }
}
