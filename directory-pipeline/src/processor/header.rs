//! Header line parsing.

use thiserror::Error;

use super::normalizer::normalize_key;
use super::DELIMITER;

/// Problems with a header line that make the whole file unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// The header line has no content.
    #[error("header line is empty")]
    Empty,

    /// A column the documents need is missing.
    #[error("header has no `{0}` column")]
    MissingColumn(&'static str),

    /// Two columns normalize to the same key.
    #[error("header column `{0}` appears more than once")]
    DuplicateColumn(String),
}

/// One header column: its normalized key and position in the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    pub index: usize,
}

/// Ordered, normalized columns of an input file.
///
/// Built once from the first line. Columns with a blank name still count
/// towards the expected field count but their values are dropped.
#[derive(Debug, Clone)]
pub struct Header {
    columns: Vec<Column>,
    name_index: usize,
    zip_index: usize,
    website_index: Option<usize>,
}

impl Header {
    /// Parse and validate a header line.
    pub fn parse(line: &str) -> Result<Self, HeaderError> {
        if line.trim().is_empty() {
            return Err(HeaderError::Empty);
        }

        let columns: Vec<Column> = line
            .split(DELIMITER)
            .enumerate()
            .map(|(index, token)| Column {
                key: normalize_key(token),
                index,
            })
            .collect();

        let mut seen = std::collections::HashSet::new();
        for column in columns.iter().filter(|c| !c.key.is_empty()) {
            if !seen.insert(column.key.as_str()) {
                return Err(HeaderError::DuplicateColumn(column.key.clone()));
            }
        }

        let position = |key: &str| columns.iter().position(|c| c.key == key);
        let name_index = position("name").ok_or(HeaderError::MissingColumn("name"))?;
        let zip_index = position("zip").ok_or(HeaderError::MissingColumn("zip"))?;
        let website_index = position("website");

        Ok(Self {
            columns,
            name_index,
            zip_index,
            website_index,
        })
    }

    /// Number of fields every data line must have.
    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    /// All columns in input order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn name_index(&self) -> usize {
        self.name_index
    }

    pub fn zip_index(&self) -> usize {
        self.zip_index
    }

    pub fn website_index(&self) -> Option<usize> {
        self.website_index
    }

    /// Named columns without a dedicated document field.
    pub fn extra_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| {
            !c.key.is_empty()
                && c.index != self.name_index
                && c.index != self.zip_index
                && Some(c.index) != self.website_index
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_columns() {
        let header = Header::parse("Name ; addressZip;WEBSITE\r").unwrap();

        let keys: Vec<&str> = header.columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "zip", "website"]);
        assert_eq!(header.field_count(), 3);
        assert_eq!(header.name_index(), 0);
        assert_eq!(header.zip_index(), 1);
        assert_eq!(header.website_index(), Some(2));
        assert_eq!(header.extra_columns().count(), 0);
    }

    #[test]
    fn test_column_order_is_free() {
        let header = Header::parse("zip;city;name").unwrap();

        assert_eq!(header.zip_index(), 0);
        assert_eq!(header.name_index(), 2);
        assert_eq!(header.website_index(), None);

        let extra: Vec<&str> = header.extra_columns().map(|c| c.key.as_str()).collect();
        assert_eq!(extra, vec!["city"]);
    }

    #[test]
    fn test_blank_column_counts_but_is_not_extra() {
        let header = Header::parse("name;zip;").unwrap();
        assert_eq!(header.field_count(), 3);
        assert_eq!(header.extra_columns().count(), 0);
    }

    #[test]
    fn test_invalid_headers() {
        assert_eq!(Header::parse("  ").unwrap_err(), HeaderError::Empty);
        assert_eq!(
            Header::parse("name;website").unwrap_err(),
            HeaderError::MissingColumn("zip")
        );
        assert_eq!(
            Header::parse("zip").unwrap_err(),
            HeaderError::MissingColumn("name")
        );
        assert_eq!(
            Header::parse("name;zip;addressZip").unwrap_err(),
            HeaderError::DuplicateColumn("zip".to_string())
        );
    }
}
