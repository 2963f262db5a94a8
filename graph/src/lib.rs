//! Commit graph engine: turns a topologically ordered commit list into a
//! row-based graph, collapses linear stretches, and lays the visible part
//! out in columns for drawing.

pub mod controller;
pub mod core;
pub mod error;
pub mod fragment;
pub mod git_backend;
pub mod layout;
pub mod parse;
pub mod print;
pub mod render;
pub mod source;

pub use controller::GraphController;
pub use core::{
    Branch, BranchId, Commit, CommitIndex, Edge, EdgeId, Graph, GraphElement, GraphStats, Node,
    NodeId, NodeType, RefKind, Reference, RootId, Row,
};
pub use error::{GraphError, ParseError};
pub use fragment::{Fragment, FragmentManager, UpdateRequest, VisibilityState};
pub use git_backend::GitWalker;
pub use layout::GraphBuilder;
pub use print::{CellKind, PrintCell, PrintCellModel, PrintOptions, PrintRow, SelectController, ShortEdge};
pub use source::{LogBatch, LogSource, TextLogSource};
