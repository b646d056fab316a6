//! Source location tracking
//!
//! Offsets count Unicode scalar values (not bytes), so a token's `lext`/`rext`
//! index straight into the scanner's `[char]` input. Lines start at 1 and a
//! newline resets the column to 1; a tab advances the column by a flat
//! `TAB_WIDTH` (no tab stops), every other character by one.
use crate::config::compile_time::lexical::TAB_WIDTH;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A position in source text with line, column, and character offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Character offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Create the starting position (offset 0, line 1, column 1)
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advance position by one character
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            '\t' => Self {
                offset: self.offset + 1,
                line: self.line,
                column: self.column + TAB_WIDTH,
            },
            _ => Self {
                offset: self.offset + 1,
                line: self.line,
                column: self.column + 1,
            },
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Merge two spans into one covering both
    pub fn merge(self, other: Self) -> Self {
        let start = if self.start.offset < other.start.offset {
            self.start
        } else {
            other.start
        };

        let end = if self.end.offset > other.end.offset {
            self.end
        } else {
            other.end
        };

        Self { start, end }
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Check if this span contains a position
    pub fn contains(&self, pos: Position) -> bool {
        pos.offset >= self.start.offset && pos.offset < self.end.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Line index over a character buffer for position lookup and error rendering
#[derive(Debug, Clone)]
pub struct SourceMap {
    source: Arc<[char]>,
    /// Character offsets of line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: Arc<[char]>) -> Self {
        let mut line_starts = vec![0];
        for (offset, ch) in source.iter().enumerate() {
            if *ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    pub fn source(&self) -> &Arc<[char]> {
        &self.source
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line and column for a character offset. Offsets past the end are
    /// clamped to the end of input.
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert - 1,
        };

        let line_start = self.line_starts[line];
        let column = self.source[line_start..offset]
            .iter()
            .map(|ch| if *ch == '\t' { TAB_WIDTH } else { 1 })
            .sum::<u32>();

        Position::new(offset, (line + 1) as u32, column + 1)
    }

    /// Span covering the character range `[lext, rext)`
    pub fn span(&self, lext: usize, rext: usize) -> Span {
        Span::new(self.position_at(lext), self.position_at(rext.max(lext)))
    }

    /// Get a line of text by line number (1-based), without its newline
    pub fn get_line(&self, line_num: u32) -> Option<String> {
        if line_num == 0 {
            return None;
        }

        let line_idx = (line_num - 1) as usize;
        let start = *self.line_starts.get(line_idx)?;
        let end = match self.line_starts.get(line_idx + 1) {
            Some(next) => next - 1,
            None => self.source.len(),
        };

        Some(self.source[start..end].iter().collect())
    }

    /// Format an error message with source context
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let mut result = String::new();

        result.push_str(&format!("error: {}\n", message));
        result.push_str(&format!(
            "  --> {}:{}\n",
            span.start.line, span.start.column
        ));

        if let Some(line) = self.get_line(span.start.line) {
            let line_num_str = span.start.line.to_string();
            let padding = " ".repeat(line_num_str.len());

            result.push_str(&format!("{} |\n", padding));
            result.push_str(&format!("{} | {}\n", line_num_str, line));

            let span_len = if span.start.line == span.end.line {
                span.end.column.saturating_sub(span.start.column) as usize
            } else {
                let line_width = self.position_at(span.start.offset + line.chars().count()).column;
                line_width.saturating_sub(span.start.column) as usize
            };

            result.push_str(&format!(
                "{} | {}{}\n",
                padding,
                " ".repeat((span.start.column - 1) as usize),
                "^".repeat(span_len.max(1))
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(text: &str) -> SourceMap {
        SourceMap::new(text.chars().collect::<Vec<_>>().into())
    }

    #[test]
    fn test_position_after_newline() {
        let map = map("ab\ncd");
        assert_eq!(map.position_at(0), Position::new(0, 1, 1));
        assert_eq!(map.position_at(2), Position::new(2, 1, 3));
        assert_eq!(map.position_at(3), Position::new(3, 2, 1));
        assert_eq!(map.position_at(4), Position::new(4, 2, 2));
    }

    #[test]
    fn test_tab_is_flat_width() {
        let map = map("\tx\t\ty");
        assert_eq!(map.position_at(1).column, 1 + TAB_WIDTH);
        assert_eq!(map.position_at(4).column, 2 + 3 * TAB_WIDTH);
    }

    #[test]
    fn test_tab_advances_four_columns() {
        let pos = Position::start().advance('\t');
        assert_eq!((pos.line, pos.column), (1, 5));
        assert_eq!(map("\t\tx").position_at(2).column, 9);
    }

    #[test]
    fn test_position_at_matches_advance() {
        let text = "one\n\ttwo\r\nthree";
        let map = map(text);
        let mut pos = Position::start();
        for (offset, ch) in text.chars().enumerate() {
            assert_eq!(map.position_at(offset), pos);
            pos = pos.advance(ch);
        }
        assert_eq!(map.position_at(text.chars().count()), pos);
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let map = map("ab");
        assert_eq!(map.position_at(10), Position::new(2, 1, 3));
    }

    #[test]
    fn test_get_line() {
        let map = map("first\nsecond\n");
        assert_eq!(map.get_line(1).as_deref(), Some("first"));
        assert_eq!(map.get_line(2).as_deref(), Some("second"));
        assert_eq!(map.get_line(3).as_deref(), Some(""));
        assert_eq!(map.get_line(4), None);
        assert_eq!(map.get_line(0), None);
        assert_eq!(map.line_count(), 3);
    }

    #[test]
    fn test_format_error_underlines_span() {
        let map = map("tok : 'a' ;\nbad $$ here");
        let span = map.span(16, 18);
        let rendered = map.format_error(&span, "no rule matches");

        assert!(rendered.contains("--> 2:5"));
        assert!(rendered.contains("2 | bad $$ here"));
        assert!(rendered.lines().last().unwrap().ends_with("    ^^"));
    }

    #[test]
    fn test_span_merge_and_contains() {
        let map = map("abcdef");
        let merged = map.span(1, 2).merge(map.span(4, 5));
        assert_eq!(merged.len(), 4);
        assert!(merged.contains(map.position_at(3)));
        assert!(!merged.contains(map.position_at(5)));
        assert_eq!(merged.to_string(), "1:2-6");
    }
}
