//! Line and block views over extracted document text.
//!
//! PDF text extraction keeps the visual column layout by padding with
//! spaces, so every heuristic in this crate works in character columns.
//! The helpers here convert between character columns and byte offsets
//! so slicing never lands inside a multi-byte character.

/// A single line of a document and its 0-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Position of the line within the document.
    pub index: usize,
    /// The line text, without its terminator.
    pub text: &'a str,
}

/// Splits a document into [`Line`]s, preserving blank lines so indices
/// match the source text.
#[must_use]
pub fn document_lines(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .enumerate()
        .map(|(index, text)| Line { index, text })
        .collect()
}

/// The consecutive lines attributed to one legislator.
///
/// Always holds at least one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> Block<'a> {
    /// Opens a block at `first`.
    #[must_use]
    pub fn starting_at(first: Line<'a>) -> Self {
        Self { lines: vec![first] }
    }

    /// Builds a block from already grouped lines, or `None` if there are
    /// none.
    #[must_use]
    pub fn from_lines(lines: Vec<Line<'a>>) -> Option<Self> {
        if lines.is_empty() {
            None
        } else {
            Some(Self { lines })
        }
    }

    /// Appends a continuation line.
    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    /// The block's first line.
    #[must_use]
    pub fn first(&self) -> Line<'a> {
        self.lines[0]
    }

    /// All lines in document order.
    #[must_use]
    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    /// The line texts in document order.
    #[must_use]
    pub fn texts(&self) -> Vec<&'a str> {
        self.lines.iter().map(|line| line.text).collect()
    }

    /// Number of physical lines in the block.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always `false` for an assembled block.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Returns the byte offset of character column `column` in `line`, or
/// `line.len()` when the line is shorter.
#[must_use]
pub fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices().nth(column).map_or(line.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_blank_lines_in_indices() {
        let lines = document_lines("first\n\nthird\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], Line { index: 2, text: "third" });
    }

    #[test]
    fn converts_columns_across_multibyte_text() {
        let line = "Müller, Ms Anna   VIC";
        let offset = byte_offset(line, 18);
        assert_eq!(&line[offset..], "VIC");
        assert_eq!(offset, 19);
    }

    #[test]
    fn column_past_end_clamps_to_length() {
        assert_eq!(byte_offset("short", 40), 5);
    }

    #[test]
    fn block_tracks_first_line_and_texts() {
        let lines = document_lines("a\nb\nc");
        let mut block = Block::starting_at(lines[1]);
        block.push(lines[2]);
        assert_eq!(block.first().index, 1);
        assert_eq!(block.texts(), vec!["b", "c"]);
        assert_eq!(block.len(), 2);
        assert!(!block.is_empty());
    }

    #[test]
    fn empty_line_group_is_not_a_block() {
        assert!(Block::from_lines(Vec::new()).is_none());

        let lines = document_lines("a\nb");
        let block = Block::from_lines(lines.clone()).unwrap();
        assert_eq!(block.lines(), lines.as_slice());
    }
}
