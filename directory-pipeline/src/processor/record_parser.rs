//! Data line parsing into company documents.

use tracing::debug;

use directory_shared::CompanyDocument;

use super::hasher::identity_hash;
use super::header::Header;
use super::normalizer::{normalize_value, normalize_website};
use super::DELIMITER;

/// Result of parsing one data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// A valid record.
    Record(CompanyDocument),
    /// A line with no content.
    Blank,
    /// A line whose field count doesn't match the header.
    Malformed { expected: usize, found: usize },
}

/// Turns data lines into documents using the columns of a parsed header.
pub struct RecordParser {
    header: Header,
}

impl RecordParser {
    /// Create a parser for lines following `header`.
    pub fn new(header: Header) -> Self {
        Self { header }
    }

    /// Parse a single data line.
    ///
    /// Fields are split on the delimiter and trimmed. The document identity
    /// is the hash of the trimmed name followed by the trimmed zip.
    pub fn parse_line(&self, line: &str) -> LineOutcome {
        if line.trim().is_empty() {
            return LineOutcome::Blank;
        }

        let fields: Vec<&str> = line.split(DELIMITER).map(normalize_value).collect();
        if fields.len() != self.header.field_count() {
            debug!(
                expected = self.header.field_count(),
                found = fields.len(),
                "Field count does not match header"
            );
            return LineOutcome::Malformed {
                expected: self.header.field_count(),
                found: fields.len(),
            };
        }

        let name = fields[self.header.name_index()];
        let zip = fields[self.header.zip_index()];
        let website = self
            .header
            .website_index()
            .and_then(|index| normalize_website(fields[index]));

        let mut document = CompanyDocument::new(name, zip, website, identity_hash(&[name, zip]));
        for column in self.header.extra_columns() {
            document
                .extra
                .insert(column.key.clone(), fields[column.index].to_string());
        }

        LineOutcome::Record(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(header: &str) -> RecordParser {
        RecordParser::new(Header::parse(header).unwrap())
    }

    fn record(outcome: LineOutcome) -> CompanyDocument {
        match outcome {
            LineOutcome::Record(doc) => doc,
            other => panic!("expected a record, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_valid_line() {
        let doc = record(parser("name;addressZip").parse_line(" yawoen group ; 30078 "));

        assert_eq!(doc.name, "yawoen group");
        assert_eq!(doc.zip, "30078");
        assert_eq!(doc.website, None);
        assert_eq!(doc.hash_object, identity_hash(&["yawoen group30078"]));
    }

    #[test]
    fn test_website_present_and_empty() {
        let parser = parser("name;addressZip;website");

        let doc = record(parser.parse_line("group;78229;http://group.com"));
        assert_eq!(doc.website.as_deref(), Some("http://group.com"));

        let doc = record(parser.parse_line("group;78229;  "));
        assert_eq!(doc.website, None);
    }

    #[test]
    fn test_identity_ignores_website() {
        let parser = parser("name;zip;website");

        let first = record(parser.parse_line("group;78229;http://a.com"));
        let second = record(parser.parse_line("group;78229;http://b.com"));

        assert_eq!(first.hash_object, second.hash_object);
        assert_ne!(first.website, second.website);
    }

    #[test]
    fn test_field_count_mismatch() {
        let parser = parser("name;addressZip");

        assert_eq!(
            parser.parse_line("foundation"),
            LineOutcome::Malformed {
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            parser.parse_line("group;78229;extra"),
            LineOutcome::Malformed {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parser("name;zip").parse_line("   \r"), LineOutcome::Blank);
    }

    #[test]
    fn test_extra_columns_are_kept() {
        let doc = record(parser("City;name;zip").parse_line("lancaster;yawoen;17602"));

        assert_eq!(doc.extra.get("city").map(String::as_str), Some("lancaster"));
        assert_eq!(doc.name, "yawoen");
        assert_eq!(doc.hash_object, identity_hash(&["yawoen", "17602"]));
    }
}
