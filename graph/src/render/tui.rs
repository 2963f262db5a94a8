use serde::Deserialize;

use crate::core::BranchId;
use crate::print::{CellKind, PrintCell, PrintCellModel, PrintRow, ShortEdge};

/// Glyph set used for drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    #[default]
    Utf8,
    Ascii,
}

/// Characters for each kind of graph cell
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub commit: char,
    pub end_commit: char,
    pub edge: char,
    pub collapsed_edge: char,
    pub long_edge_down: char,
    pub long_edge_up: char,
    pub slash: char,
    pub backslash: char,
    pub horizontal: char,
}

impl Charset {
    pub fn glyphs(self) -> Glyphs {
        match self {
            Charset::Utf8 => Glyphs {
                commit: '●',
                end_commit: '○',
                edge: '│',
                collapsed_edge: '┆',
                long_edge_down: '↓',
                long_edge_up: '↑',
                slash: '╱',
                backslash: '╲',
                horizontal: '─',
            },
            Charset::Ascii => Glyphs {
                commit: '*',
                end_commit: 'o',
                edge: '|',
                collapsed_edge: ':',
                long_edge_down: 'v',
                long_edge_up: '^',
                slash: '/',
                backslash: '\\',
                horizontal: '_',
            },
        }
    }
}

/// Terminal color codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Default,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

const PALETTE: [Color; 6] = [
    Color::Blue,
    Color::Green,
    Color::Red,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
];

impl Color {
    pub fn to_ansi(&self) -> &str {
        match self {
            Color::Default => "\x1b[0m",
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
            Color::Magenta => "\x1b[35m",
            Color::Cyan => "\x1b[36m",
        }
    }

    /// Stable color for a branch
    pub fn for_branch(branch: BranchId) -> Self {
        PALETTE[branch.0 % PALETTE.len()]
    }
}

/// A character cell in the rendered grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
    pub bold: bool,
}

impl Cell {
    pub fn new(ch: char, color: Color) -> Self {
        Self {
            ch,
            color,
            bold: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(' ', Color::Default)
    }
}

/// Renders a print model as terminal text, two characters per column
pub struct TextRenderer {
    glyphs: Glyphs,
    color: bool,
}

impl TextRenderer {
    pub fn new(charset: Charset, color: bool) -> Self {
        Self {
            glyphs: charset.glyphs(),
            color,
        }
    }

    /// Cells of one visible row
    pub fn render_row(&self, row: &PrintRow, width: usize) -> Vec<Cell> {
        let mut cells = vec![Cell::empty(); width.max(row.width()) * 2];
        for cell in &row.cells {
            let mut out = Cell::new(self.glyph(cell), Color::for_branch(cell.branch));
            out.bold = cell.selected;
            cells[cell.column * 2] = out;
        }
        cells
    }

    /// Connector line between `row` and the next row, drawn when an edge
    /// changes column or runs through a collapsed fragment
    pub fn render_connector(&self, row: &PrintRow, width: usize) -> Option<Vec<Cell>> {
        if row
            .short_edges
            .iter()
            .all(|e| e.up_column == e.down_column && !e.collapsed)
        {
            return None;
        }

        let mut cells = vec![Cell::empty(); width.max(row.width()) * 2];
        let mut put = |x: usize, ch: char, edge: &ShortEdge| {
            if let Some(slot) = cells.get_mut(x) {
                let mut cell = Cell::new(ch, Color::for_branch(edge.branch));
                cell.bold = edge.selected;
                *slot = cell;
            }
        };

        for edge in &row.short_edges {
            let (up, down) = (edge.up_column * 2, edge.down_column * 2);
            if up == down {
                let ch = if edge.collapsed {
                    self.glyphs.collapsed_edge
                } else {
                    self.glyphs.edge
                };
                put(up, ch, edge);
            } else if down < up {
                for x in down + 1..up - 1 {
                    put(x, self.glyphs.horizontal, edge);
                }
                put(up - 1, self.glyphs.slash, edge);
            } else {
                put(up + 1, self.glyphs.backslash, edge);
                for x in up + 2..down {
                    put(x, self.glyphs.horizontal, edge);
                }
            }
        }
        Some(cells)
    }

    fn glyph(&self, cell: &PrintCell) -> char {
        match cell.kind {
            CellKind::Commit => self.glyphs.commit,
            CellKind::EndCommit => self.glyphs.end_commit,
            CellKind::Edge if cell.collapsed => self.glyphs.collapsed_edge,
            CellKind::Edge => self.glyphs.edge,
            CellKind::LongEdgeDown => self.glyphs.long_edge_down,
            CellKind::LongEdgeUp => self.glyphs.long_edge_up,
        }
    }

    fn write_cells(&self, buffer: &mut String, cells: &[Cell]) {
        for cell in cells {
            if self.color && cell.ch != ' ' {
                if cell.bold {
                    buffer.push_str("\x1b[1m");
                }
                buffer.push_str(cell.color.to_ansi());
                buffer.push(cell.ch);
                buffer.push_str(Color::Default.to_ansi());
            } else {
                buffer.push(cell.ch);
            }
        }
    }

    /// Render every visible row followed by its label
    pub fn render<F>(&self, model: &PrintCellModel, mut label: F) -> String
    where
        F: FnMut(&PrintRow) -> String,
    {
        let width = model.max_width();
        let mut buffer = String::new();

        for row in model.rows() {
            self.write_cells(&mut buffer, &self.render_row(row, width));
            buffer.push(' ');
            buffer.push_str(&label(row));
            buffer.truncate(buffer.trim_end_matches(' ').len());
            buffer.push('\n');

            if let Some(connector) = self.render_connector(row, width) {
                self.write_cells(&mut buffer, &connector);
                buffer.truncate(buffer.trim_end_matches(' ').len());
                buffer.push('\n');
            }
        }

        buffer
    }
}
