//! Line-oriented reader for delimited input files.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

use crate::errors::PipelineError;

/// Streams an input source one line at a time.
///
/// Every I/O failure, including invalid UTF-8, is reported as
/// [`PipelineError::ProcessFile`] with the line number it happened at.
pub struct LineReader<R> {
    lines: Lines<R>,
    line_number: usize,
}

impl LineReader<BufReader<File>> {
    /// Open the file at `path` for streaming.
    pub async fn open(path: &Path) -> Result<Self, PipelineError> {
        let file = File::open(path).await.map_err(|e| {
            PipelineError::process_file(format!("cannot open {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Opened input file");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    /// Wrap an already buffered source.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }

    /// Read the next line, without its line terminator.
    ///
    /// Returns `Ok(None)` at end of input.
    pub async fn next_line(&mut self) -> Result<Option<String>, PipelineError> {
        let line = self.lines.next_line().await.map_err(|e| {
            PipelineError::process_file(format!(
                "read failed after line {}: {}",
                self.line_number, e
            ))
        })?;

        if line.is_some() {
            self.line_number += 1;
        }
        Ok(line)
    }

    /// Number of lines read so far (1-based number of the last line).
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_lines_in_order() {
        let mut reader = LineReader::new(&b"name;zip\r\ngroup;78229\nfoundation;10022"[..]);

        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("name;zip"));
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("group;78229"));
        assert_eq!(reader.line_number(), 2);
        assert_eq!(
            reader.next_line().await.unwrap().as_deref(),
            Some("foundation;10022")
        );
        assert!(reader.next_line().await.unwrap().is_none());
        assert_eq!(reader.line_number(), 3);
    }

    #[tokio::test]
    async fn test_missing_file_is_process_file_error() {
        let result = LineReader::open(Path::new("/tmp/definitely/not/here.csv")).await;
        assert!(matches!(result, Err(PipelineError::ProcessFile(_))));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_process_file_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"name;zip\n\xff\xfe;123\n").unwrap();

        let mut reader = LineReader::open(file.path()).await.unwrap();
        assert!(reader.next_line().await.unwrap().is_some());
        assert!(matches!(
            reader.next_line().await,
            Err(PipelineError::ProcessFile(_))
        ));
    }
}
