//! Numbered discussion outlines.
//!
//! Reads exports shaped like
//!
//! ```text
//! 1. Thesis: we should do it
//!   1.1. Pro: it is cheap [1]
//!   1.2. Con: it is slow
//!     1.2.1. Pro: not that slow
//! ```
//!
//! into argument records. Nesting is two spaces per level.

use regex::Regex;
use tracing::{debug, instrument};

use crate::domain::entities::{ArgumentRecord, Sentiment};

/// Weight assigned to every converted argument.
pub const OUTLINE_WEIGHT: f64 = 10.0;

const INDENT_WIDTH: usize = 2;

pub struct OutlineParser {
    entry_regex: Regex,
    footnote_regex: Regex,
}

impl Default for OutlineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineParser {
    pub fn new() -> Self {
        Self {
            entry_regex: Regex::new(r"^(\s*)(\d+(?:\.\d+)*)\.\s*(Pro|Con)?:?\s*(.*)$").unwrap(),
            footnote_regex: Regex::new(r"\[\d+\]").unwrap(),
        }
    }

    /// Convert an outline into records with sequential ids starting at 1.
    ///
    /// Lines that do not start an entry continue the text of the previous one.
    #[instrument(level = "debug", skip(self, input))]
    pub fn parse(&self, input: &str) -> Vec<ArgumentRecord> {
        let mut records: Vec<ArgumentRecord> = Vec::new();
        // indices into `records`, one per open nesting level
        let mut stack: Vec<usize> = Vec::new();
        let mut continuation = String::new();

        for (i, line) in input.trim().lines().enumerate() {
            let Some(caps) = self.entry_regex.captures(line) else {
                continuation.push(' ');
                continuation.push_str(line.trim());
                continue;
            };

            if let Some(&last) = stack.last() {
                append_text(&mut records[last], &continuation);
            }
            continuation.clear();

            let level = caps[1].len() / INDENT_WIDTH;
            stack.truncate(level);

            let parent_id = stack.last().map(|&p| records[p].id.clone());
            let sentiment = match caps.get(3).map(|m| m.as_str()) {
                Some("Con") => Sentiment::Opposing(-1),
                _ => Sentiment::Supporting,
            };
            let text = self.footnote_regex.replace_all(&caps[4], "").trim().to_string();

            let mut record = ArgumentRecord::new(
                (records.len() + 1).to_string(),
                text,
                OUTLINE_WEIGHT,
                sentiment,
            );
            record.parent_id = parent_id;
            record.line = i + 1;

            records.push(record);
            stack.push(records.len() - 1);
        }

        if let Some(&last) = stack.last() {
            append_text(&mut records[last], &continuation);
        }

        debug!("outline: {} arguments", records.len());
        records
    }
}

fn append_text(record: &mut ArgumentRecord, continuation: &str) {
    let continuation = continuation.trim();
    if !continuation.is_empty() {
        record.text.push(' ');
        record.text.push_str(continuation);
        record.text = record.text.trim().to_string();
    }
}
