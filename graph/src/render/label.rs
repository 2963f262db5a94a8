use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::core::{CommitIndex, Graph};
use crate::source::LogBatch;

/// Display width of a string in terminal columns
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Truncate to `max_width` columns without splitting graphemes, marking the cut with `…`
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut width = 0;
    for grapheme in text.graphemes(true) {
        let grapheme_width = UnicodeWidthStr::width(grapheme);
        // keep one column for the ellipsis
        if width + grapheme_width + 1 > max_width {
            break;
        }
        result.push_str(grapheme);
        width += grapheme_width;
    }
    result.push('…');
    result
}

/// Pad with spaces on the right up to `width` columns
pub fn pad_to_width(text: &str, width: usize) -> String {
    let text = truncate_to_width(text, width);
    let padding = width.saturating_sub(display_width(&text));
    format!("{}{}", text, " ".repeat(padding))
}

/// Builds the text shown next to each graph row
pub struct RowLabeler<'a> {
    graph: &'a Graph,
    batch: &'a LogBatch,
    width: usize,
}

impl<'a> RowLabeler<'a> {
    pub fn new(graph: &'a Graph, batch: &'a LogBatch, width: usize) -> Self {
        Self {
            graph,
            batch,
            width,
        }
    }

    /// `hash (refs) subject` for a commit row; hashes only for the end row
    pub fn label(&self, row: usize) -> String {
        let commits: Vec<CommitIndex> = self
            .graph
            .nodes_in_row(row)
            .iter()
            .map(|&id| self.graph.node(id).commit)
            .collect();

        let text = match commits.as_slice() {
            [commit] => self.commit_label(*commit),
            many => many
                .iter()
                .map(|&c| self.short_hash(c))
                .collect::<Vec<_>>()
                .join(" "),
        };
        truncate_to_width(&text, self.width)
    }

    fn commit_label(&self, commit: CommitIndex) -> String {
        let mut text = self.short_hash(commit);
        let refs = self.batch.ref_names(commit);
        if !refs.is_empty() {
            text.push_str(&format!(" ({})", refs.join(", ")));
        }
        if let Some(subject) = self.batch.subject(commit) {
            text.push(' ');
            text.push_str(subject);
        }
        text
    }

    fn short_hash(&self, commit: CommitIndex) -> String {
        self.batch
            .hashes
            .short_hash(commit, 8)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{commit}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::GraphBuilder;
    use crate::source::batch_from_text;

    #[test]
    fn test_cjk_width() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width("你好"), 4);
        assert_eq!(display_width("hello世界"), 9);
    }

    #[test]
    fn test_truncate_keeps_graphemes() {
        let truncated = truncate_to_width("Hello世界World", 10);
        assert!(display_width(&truncated) <= 10);
        assert!(truncated.ends_with('…'));

        let truncated = truncate_to_width("Hi👨‍👩‍👧‍👦there", 5);
        assert!(truncated.starts_with("Hi"));

        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("anything", 0), "");
    }

    #[test]
    fn test_padding() {
        assert_eq!(display_width(&pad_to_width("测试", 10)), 10);
        assert_eq!(pad_to_width("ab", 4), "ab  ");
    }

    #[test]
    fn test_row_labels() {
        let mut batch = batch_from_text("2|-cafe|-beef dead\n1|-beef|-\n", &[]).unwrap();
        batch.subjects.insert(0, "Merge work".to_string());
        let graph = GraphBuilder::build(&batch.commits, &batch.references).unwrap();
        let labeler = RowLabeler::new(&graph, &batch, 60);

        assert_eq!(labeler.label(0), "cafe (cafe) Merge work");
        assert_eq!(labeler.label(1), "beef");
        assert_eq!(labeler.label(2), "dead");
    }
}
