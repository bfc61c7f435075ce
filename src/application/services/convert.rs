//! Outline → argument table conversion

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{parser, ArgumentRecord, OutlineParser, ParseError};
use crate::infrastructure::traits::FileSystem;

/// Service turning numbered discussion outlines into argument tables.
pub struct ConvertService {
    fs: Arc<dyn FileSystem>,
    outline: OutlineParser,
}

impl ConvertService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            outline: OutlineParser::new(),
        }
    }

    /// Convert outline text into records.
    pub fn records(&self, outline: &str) -> ApplicationResult<Vec<ArgumentRecord>> {
        let records = self.outline.parse(outline);
        if records.is_empty() {
            return Err(ParseError::NoData.into());
        }
        Ok(records)
    }

    /// Convert outline text into CSV text.
    pub fn convert_str(&self, outline: &str) -> ApplicationResult<String> {
        Ok(parser::to_csv(&self.records(outline)?))
    }

    /// Read an outline file and return the CSV text.
    pub fn convert_file(&self, input: &Path) -> ApplicationResult<String> {
        debug!("convert_file: {}", input.display());
        let content = match self.fs.read_to_string(input) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!("{} is not valid UTF-8, decoding lossily", input.display());
                let bytes = self.fs.read(input).with_path_context("read outline", input)?;
                String::from_utf8_lossy(&bytes).into_owned()
            }
            Err(e) => return Err(e).with_path_context("read outline", input),
        };
        self.convert_str(&content)
    }

    /// Convert `input` and write the CSV to `output`. Returns the number of arguments.
    pub fn convert_to(&self, input: &Path, output: &Path) -> ApplicationResult<usize> {
        let csv = self.convert_file(input)?;
        let count = csv.lines().count().saturating_sub(1);
        self.fs
            .write(output, &csv)
            .with_path_context("write argument table", output)?;
        debug!("wrote {} arguments to {}", count, output.display());
        Ok(count)
    }
}
