pub mod label;
pub mod tui;

pub use label::{display_width, pad_to_width, truncate_to_width, RowLabeler};
pub use tui::{Cell, Charset, Color, Glyphs, TextRenderer};
