//! CSV reader producing a rectangular grid of optional cells.

use csv::{ByteRecord, ReaderBuilder};
use tracing::debug;

use crate::error::MalformedInputError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Rows of trimmed cells; `None` marks an empty cell. Every row has the same
/// width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Option<String>>>,
    width: usize,
}

impl Grid {
    /// Builds a grid from in-memory rows, trimming and padding like
    /// [`parse_grid`].
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|cell| to_cell(cell.as_ref())).collect())
            .collect();
        Self::rectangular(rows)
    }

    fn rectangular(mut rows: Vec<Vec<Option<String>>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, None);
        }
        Self { rows, width }
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell text at (`row`, `col`), `None` when empty or out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().flatten().all(Option::is_none)
    }
}

fn to_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Decodes CSV bytes into a [`Grid`].
///
/// Rows may have different lengths; shorter rows are padded with empty
/// cells. Invalid UTF-8 is replaced rather than rejected.
///
/// # Errors
///
/// Returns [`MalformedInputError`] when the input has no rows, only empty
/// cells, or cannot be read as CSV at all.
pub fn parse_grid(bytes: &[u8]) -> Result<Grid, MalformedInputError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        let row: Vec<Option<String>> = record
            .iter()
            .map(|field| to_cell(&String::from_utf8_lossy(field)))
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(MalformedInputError::Empty);
    }

    let grid = Grid::rectangular(rows);
    if grid.is_blank() {
        return Err(MalformedInputError::Blank);
    }

    debug!(rows = grid.height(), columns = grid.width(), "CSV grid parsed");
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_bytes_is_malformed() {
        assert_eq!(parse_grid(&[]), Err(MalformedInputError::Empty));
    }

    #[test]
    fn test_parse_only_separators_is_blank() {
        let result = parse_grid(b",,,\n , ,\n");
        assert_eq!(result, Err(MalformedInputError::Blank));
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let grid = parse_grid("a,b,c\n1\n2,3\n".as_bytes()).unwrap();
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.cell(1, 0), Some("1"));
        assert_eq!(grid.cell(1, 2), None);
        assert_eq!(grid.cell(2, 1), Some("3"));
    }

    #[test]
    fn test_bom_is_stripped_and_cells_trimmed() {
        let bytes = "\u{feff}국어 , 수학\n 좋음 ,\n".as_bytes();
        let grid = parse_grid(bytes).unwrap();
        assert_eq!(grid.cell(0, 0), Some("국어"));
        assert_eq!(grid.cell(1, 0), Some("좋음"));
        assert_eq!(grid.cell(1, 1), None);
    }

    #[test]
    fn test_quoted_cells_keep_embedded_newlines() {
        let grid = parse_grid("\"학\n기\",과목\n1,국어\n".as_bytes()).unwrap();
        assert_eq!(grid.cell(0, 0), Some("학\n기"));
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn test_invalid_utf8_does_not_fail() {
        let grid = parse_grid(b"\xff\xfe,ok\n").unwrap();
        assert_eq!(grid.cell(0, 1), Some("ok"));
        assert!(grid.cell(0, 0).is_some());
    }

    #[test]
    fn test_from_rows_matches_parsed_layout() {
        let grid = Grid::from_rows(vec![vec!["a", " b "], vec!["c"]]);
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.cell(0, 1), Some("b"));
        assert_eq!(grid.cell(1, 1), None);
    }
}
