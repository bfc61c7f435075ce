//! Tests for argument table parsing

use rstest::rstest;

use sundial::domain::parser::{parse, to_csv};
use sundial::domain::{ParseError, ParseWarning, Sentiment};

const HEADER: &str = "id,text,parent_id,weight,sentiment";

#[test]
fn given_debate_table_when_parsing_then_keeps_input_order() {
    // Arrange
    let raw = include_str!("resources/arguments/debate.csv");

    // Act
    let output = parse(raw).unwrap();

    // Assert
    let ids: Vec<&str> = output.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    assert!(output.warnings.is_empty());
    assert_eq!(output.records[0].parent_id, None);
    assert_eq!(output.records[1].parent_id.as_deref(), Some("1"));
    assert_eq!(output.records[1].weight, 3.0);
    assert_eq!(output.records[2].sentiment, Sentiment::Opposing(2));
    assert_eq!(output.records[0].text, "Should cities ban cars downtown?");
}

#[test]
fn given_quoted_comma_when_parsing_then_text_keeps_comma() {
    let raw = format!("{HEADER}\n1,\"Yes, but\",,1,1\n");

    let output = parse(&raw).unwrap();

    assert_eq!(output.records[0].text, "Yes, but");
}

#[test]
fn given_crlf_and_blank_lines_when_parsing_then_ignores_them() {
    let raw = format!("{HEADER}\r\n\r\n1,Root,,1,1\r\n2,Child,1,2,1\r\n\r\n");

    let output = parse(&raw).unwrap();

    assert_eq!(output.records.len(), 2);
    assert_eq!(output.records[1].sentiment, Sentiment::Supporting);
}

#[test]
fn given_short_later_row_when_parsing_then_skips_with_warning() {
    let raw = format!("{HEADER}\n1,Root,,1,1\n2,Broken,1\n3,Fine,1,1,1\n");

    let output = parse(&raw).unwrap();

    assert_eq!(output.records.len(), 2);
    assert_eq!(
        output.warnings,
        vec![ParseWarning::ColumnCount {
            line: 3,
            expected: 5,
            found: 3
        }]
    );
}

#[test]
fn given_malformed_first_row_when_parsing_then_fails() {
    let raw = format!("{HEADER}\n1,Root\n2,Child,1,1,1\n");

    let result = parse(&raw);

    assert!(matches!(
        result,
        Err(ParseError::MalformedRoot {
            line: 2,
            expected: 5,
            found: 2
        })
    ));
}

#[test]
fn given_bad_numbers_when_parsing_then_warns_and_keeps_row() {
    let raw = format!("{HEADER}\n1,Root,,heavy,maybe\n");

    let output = parse(&raw).unwrap();

    let root = &output.records[0];
    assert!(root.weight.is_nan());
    assert_eq!(root.sentiment, Sentiment::Opposing(0));
    assert_eq!(output.warnings.len(), 2);
}

#[rstest]
#[case("", "empty")]
#[case("id,text,weight\n1,Root,1\n", "missing")]
#[case("id,text,parent_id,weight,sentiment\n", "nodata")]
fn given_unusable_input_when_parsing_then_error(#[case] raw: &str, #[case] kind: &str) {
    let err = parse(raw).unwrap_err();
    match kind {
        "empty" => assert!(matches!(err, ParseError::Empty)),
        "missing" => assert!(matches!(err, ParseError::MissingColumn(ref c) if c == "sentiment")),
        _ => assert!(matches!(err, ParseError::NoData)),
    }
}

#[test]
fn given_fully_quoted_header_when_parsing_then_columns_resolve() {
    // Arrange
    let raw = "\"id\",\"text\",\"parent_id\",\"weight\",\"sentiment\"\n\
               \"1.\",\"Root\",\"\",10,0\n\
               \"1.1.\",\"Pro, first\",\"1.\",10,1\n";

    // Act
    let output = parse(raw).unwrap();

    // Assert
    assert!(output.warnings.is_empty());
    assert_eq!(output.records.len(), 2);
    assert_eq!(output.records[0].parent_id, None);
    assert_eq!(output.records[1].id, "1.1.");
    assert_eq!(output.records[1].text, "Pro, first");
    assert_eq!(output.records[1].parent_id.as_deref(), Some("1."));
    assert_eq!(output.records[1].weight, 10.0);
    assert_eq!(output.records[1].sentiment, Sentiment::Supporting);
}

#[test]
fn given_quoted_header_without_sentiment_when_parsing_then_names_missing_column() {
    let raw = "\"id\",\"text\",\"weight\"\n\"1\",\"Root\",1\n";

    let err = parse(raw).unwrap_err();

    assert_eq!(err, ParseError::MissingColumn("sentiment".to_string()));
}

#[test]
fn given_no_parent_column_when_parsing_then_all_parents_none() {
    let raw = "sentiment,weight,text,id\n1,1,Root,1\n1,2,Other,2\n";

    let output = parse(raw).unwrap();

    assert!(output.records.iter().all(|r| r.parent_id.is_none()));
    assert_eq!(output.records[1].weight, 2.0);
}

#[test]
fn given_records_when_writing_csv_then_parses_back() {
    let original = parse(include_str!("resources/arguments/debate.csv")).unwrap();

    let csv = to_csv(&original.records);
    let reparsed = parse(&csv).unwrap();

    assert!(csv.starts_with("id,text,parent_id,weight,sentiment\n1,\"Should cities ban cars downtown?\",\"\",1,1\n"));
    let pairs: Vec<(String, Option<String>)> = reparsed
        .records
        .into_iter()
        .map(|r| (r.id, r.parent_id))
        .collect();
    let expected: Vec<(String, Option<String>)> = original
        .records
        .into_iter()
        .map(|r| (r.id, r.parent_id))
        .collect();
    assert_eq!(pairs, expected);
}
