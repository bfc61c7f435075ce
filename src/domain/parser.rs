//! Argument table parsing and writing.
//!
//! The table is comma separated with a header row. Fields may be wrapped in
//! double quotes to embed commas; `""` inside a quoted field is a literal quote.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use crate::domain::entities::{ArgumentRecord, ParseOutput, ParseWarning, Sentiment};
use crate::domain::error::ParseError;

pub const COL_ID: &str = "id";
pub const COL_TEXT: &str = "text";
pub const COL_WEIGHT: &str = "weight";
pub const COL_SENTIMENT: &str = "sentiment";
pub const COL_PARENT_ID: &str = "parent_id";

const REQUIRED_COLUMNS: [&str; 4] = [COL_ID, COL_TEXT, COL_WEIGHT, COL_SENTIMENT];

/// Column positions resolved from the header row.
#[derive(Debug)]
struct Header {
    width: usize,
    id: usize,
    text: usize,
    weight: usize,
    sentiment: usize,
    parent_id: Option<usize>,
}

impl Header {
    fn parse(line: &str) -> Result<Self, ParseError> {
        // header names may be quoted like any other field
        let names = tokenize(line);
        let positions: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !positions.contains_key(*c)) {
            return Err(ParseError::MissingColumn(missing.to_string()));
        }

        Ok(Self {
            width: names.len(),
            id: positions[COL_ID],
            text: positions[COL_TEXT],
            weight: positions[COL_WEIGHT],
            sentiment: positions[COL_SENTIMENT],
            parent_id: positions.get(COL_PARENT_ID).copied(),
        })
    }
}

/// Parse the raw table into flat records, in input order.
///
/// Rows with the wrong number of fields are skipped and reported, except the
/// first data row: it is the root argument and must be well formed.
#[instrument(level = "debug", skip(raw_text), fields(bytes = raw_text.len()))]
pub fn parse(raw_text: &str) -> Result<ParseOutput, ParseError> {
    let mut lines = raw_text
        .split('\n')
        .enumerate()
        .map(|(i, line)| (i + 1, line.strip_suffix('\r').unwrap_or(line)))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(ParseError::Empty)?;
    let header = Header::parse(header_line)?;
    debug!("header: {:?}", header);

    let mut output = ParseOutput::default();
    for (line_no, line) in lines {
        let tokens = tokenize(line);
        if tokens.len() != header.width {
            if output.records.is_empty() && output.warnings.is_empty() {
                return Err(ParseError::MalformedRoot {
                    line: line_no,
                    expected: header.width,
                    found: tokens.len(),
                });
            }
            let warning = ParseWarning::ColumnCount {
                line: line_no,
                expected: header.width,
                found: tokens.len(),
            };
            warn!("{}", warning);
            output.warnings.push(warning);
            continue;
        }
        let record = to_record(&header, tokens, line_no, &mut output.warnings);
        output.records.push(record);
    }

    if output.records.is_empty() {
        return Err(ParseError::NoData);
    }
    debug!(
        "parsed {} records, {} warnings",
        output.records.len(),
        output.warnings.len()
    );
    Ok(output)
}

fn to_record(
    header: &Header,
    mut tokens: Vec<String>,
    line: usize,
    warnings: &mut Vec<ParseWarning>,
) -> ArgumentRecord {
    let raw_weight = &tokens[header.weight];
    let weight = raw_weight.parse::<f64>().unwrap_or_else(|_| {
        warnings.push(ParseWarning::InvalidWeight {
            line,
            value: raw_weight.clone(),
        });
        f64::NAN
    });

    let raw_sentiment = &tokens[header.sentiment];
    let sentiment = match raw_sentiment.parse::<i64>() {
        Ok(v) => Sentiment::from_value(v),
        Err(_) => {
            warnings.push(ParseWarning::InvalidSentiment {
                line,
                value: raw_sentiment.clone(),
            });
            Sentiment::Opposing(0)
        }
    };

    let parent_id = header
        .parent_id
        .map(|i| std::mem::take(&mut tokens[i]))
        .filter(|p| !p.is_empty());

    ArgumentRecord {
        id: std::mem::take(&mut tokens[header.id]),
        text: std::mem::take(&mut tokens[header.text]),
        weight,
        sentiment,
        parent_id,
        line,
    }
}

/// Split one data line into trimmed, unquoted fields.
///
/// Commas inside double quotes do not separate fields. A line ending in a
/// comma yields a trailing empty field.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(finish_field(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(finish_field(&mut current));
    fields
}

fn finish_field(current: &mut String) -> String {
    let field = current.trim().to_string();
    current.clear();
    field
}

/// Quote a text field for the table, doubling embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Numeric-looking ids and numbers stay bare; everything else is quoted.
fn cell(field: &str) -> String {
    if !field.is_empty() && field.parse::<f64>().is_ok() {
        field.to_string()
    } else {
        quote(field)
    }
}

/// Write records back into the table format read by [`parse`].
///
/// Column order is `id,text,parent_id,weight,sentiment`.
pub fn to_csv(records: &[ArgumentRecord]) -> String {
    let mut out = format!(
        "{},{},{},{},{}\n",
        COL_ID, COL_TEXT, COL_PARENT_ID, COL_WEIGHT, COL_SENTIMENT
    );
    for r in records {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            cell(&r.id),
            quote(r.text.trim()),
            cell(r.parent_id.as_deref().unwrap_or("")),
            r.weight,
            r.sentiment.value()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1,Root,0,0,", vec!["1", "Root", "0", "0", ""])]
    #[case("2,\"Pro, with comma\",3,1,1", vec!["2", "Pro, with comma", "3", "1", "1"])]
    #[case(" 3 , \"Con B\" , 1 , 2 , 1 ", vec!["3", "Con B", "1", "2", "1"])]
    #[case("4,\"say \"\"hi\"\"\",1,1,1", vec!["4", "say \"hi\"", "1", "1", "1"])]
    fn given_line_when_tokenize_then_splits_outside_quotes(
        #[case] line: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(tokenize(line), expected);
    }

    #[test]
    fn given_reordered_header_when_parse_then_maps_by_name() {
        let raw = "parent_id,sentiment,weight,text,id\n,0,0,Root,r\nr,1,2,Child,c\n";
        let out = parse(raw).unwrap();

        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[1].id, "c");
        assert_eq!(out.records[1].parent_id.as_deref(), Some("r"));
        assert_eq!(out.records[1].weight, 2.0);
    }

    #[test]
    fn given_crlf_line_endings_when_parse_then_strips_carriage_return() {
        let raw = "id,text,weight,sentiment,parent_id\r\n1,Root,0,0,\r\n2,Child,1,1,1\r\n";
        let out = parse(raw).unwrap();
        assert_eq!(out.records[1].parent_id.as_deref(), Some("1"));
    }

    #[test]
    fn given_records_when_to_csv_then_parse_reads_them_back() {
        let records = vec![
            ArgumentRecord::new("1", "Root, \"quoted\"", 10.0, Sentiment::Supporting),
            ArgumentRecord::new("2", "Child", 10.0, Sentiment::Opposing(-1)).with_parent("1"),
        ];
        let csv = to_csv(&records);
        assert!(csv.starts_with("id,text,parent_id,weight,sentiment\n1,\"Root, \"\"quoted\"\"\",\"\",10,1\n"));

        let out = parse(&csv).unwrap();
        assert_eq!(out.records[0].text, "Root, \"quoted\"");
        assert_eq!(out.records[1].sentiment, Sentiment::Opposing(-1));
    }
}
