//! Read-only views over an uploaded CSV.
//!
//! `RawInput` owns the decoded text and is shared immutably between layout
//! candidates; every call to [`RawInput::table`] builds an independent
//! [`RawTable`], so no candidate can disturb another's reading position.

use super::column::ColumnResolver;
use super::LayoutError;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Clone)]
pub struct RawInput {
    text: String,
}

impl RawInput {
    /// Decode raw upload bytes. A leading byte order mark is dropped.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LayoutError> {
        let text = std::str::from_utf8(bytes).map_err(|_| LayoutError::InvalidEncoding)?;
        Ok(Self::from_text(text))
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string(),
        }
    }

    /// The first `count` raw lines, without their line terminators.
    pub fn leading_lines(&self, count: usize) -> impl Iterator<Item = &str> {
        self.text.lines().take(count)
    }

    /// Text remaining after dropping `skip_lines` raw lines.
    fn body(&self, skip_lines: usize) -> &str {
        let offset: usize = self
            .text
            .split_inclusive('\n')
            .take(skip_lines)
            .map(str::len)
            .sum();
        &self.text[offset..]
    }

    fn reader(&self, skip_lines: usize) -> csv::Reader<&[u8]> {
        ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(self.body(skip_lines).as_bytes())
    }

    /// Header record found after skipping `skip_lines` raw lines.
    pub fn headers(&self, skip_lines: usize) -> Result<StringRecord, LayoutError> {
        let mut reader = self.reader(skip_lines);
        let headers = reader.headers()?.clone();
        if headers.iter().all(str::is_empty) {
            return Err(LayoutError::MissingHeader);
        }
        Ok(headers)
    }

    /// Parse the table found after skipping `skip_lines` raw lines. The first
    /// remaining record is the header.
    pub fn table(&self, skip_lines: usize) -> Result<RawTable, LayoutError> {
        let mut reader = self.reader(skip_lines);
        let headers = reader.headers()?.clone();
        if headers.iter().all(str::is_empty) {
            return Err(LayoutError::MissingHeader);
        }

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            match result {
                Ok(record) => rows.push(record),
                Err(e) => debug!(row = index + 1, error = %e, "Skipping unreadable CSV record"),
            }
        }

        Ok(RawTable {
            columns: ColumnResolver::new(&headers),
            rows,
        })
    }
}

/// A header-resolved table of string records.
#[derive(Debug, Clone)]
pub struct RawTable {
    columns: ColumnResolver,
    rows: Vec<StringRecord>,
}

impl RawTable {
    pub fn columns(&self) -> &ColumnResolver {
        &self.columns
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_is_stripped() {
        let input = RawInput::from_bytes("\u{feff}a,b\n1,2\n".as_bytes()).unwrap();
        let headers = input.headers(0).unwrap();
        assert_eq!(headers.get(0), Some("a"));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let result = RawInput::from_bytes(&[0xff, 0xfe, 0x00, b'a']);
        assert!(matches!(result, Err(LayoutError::InvalidEncoding)));
    }

    #[test]
    fn test_skip_lines_before_header() {
        let text = "junk 1\njunk,2,3\n\nmore junk\nlast junk\nTime,In\n2024-01-01,5\n";
        let table = RawInput::from_text(text).table(5).unwrap();
        assert_eq!(table.columns().position_of("Time"), Some(0));
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].get(1), Some("5"));
    }

    #[test]
    fn test_skip_more_lines_than_present() {
        let result = RawInput::from_text("a,b\n").table(5);
        assert!(matches!(result, Err(LayoutError::MissingHeader)));
    }

    #[test]
    fn test_ragged_rows_are_kept() {
        let table = RawInput::from_text("a,b,c\n1\n1,2,3,4\n").table(0).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].len(), 1);
    }

    #[test]
    fn test_leading_lines_window() {
        let input = RawInput::from_text("one\r\ntwo\nthree\n");
        let lines: Vec<&str> = input.leading_lines(2).collect();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn test_crlf_preamble_skip() {
        let text = "x\r\nx\r\nx\r\nx\r\nx\r\nh1,h2\r\n1,2\r\n";
        let table = RawInput::from_text(text).table(5).unwrap();
        assert_eq!(table.columns().position_of("h2"), Some(1));
        assert_eq!(table.len(), 1);
    }
}
