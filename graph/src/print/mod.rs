pub mod cell_model;
pub mod select;

pub use cell_model::{
    CellKind, PrintCell, PrintCellModel, PrintOptions, PrintRow, ShortEdge, MIN_LONG_EDGE_THRESHOLD,
};
pub use select::SelectController;
