// File: crates/tsplot-core/tests/ingest.rs
// Purpose: CSV ingestion and frame selection: index detection, missing values, column picks and date windows.

use std::io::Cursor;

use chrono::NaiveDate;
use tsplot_core::ingest::{parse_datetime, parse_value};
use tsplot_core::{read_frame, DropNa, Index, IndexType, InputOptions, PlotError, Source};

const DAILY: &str = "\
Datetime,flow,rain
2020-01-03,3.0,NaN
2020-01-01,1.0,0.5
2020-01-02,2.0,
2020-01-02,9.0,9.0
2020-01-04,,
2020-01-05,5.0,1.5
";

fn reader(text: &'static str) -> Source<'static> {
    Source::Reader(Box::new(Cursor::new(text)))
}

fn read(text: &'static str, opts: &InputOptions) -> tsplot_core::Result<tsplot_core::Frame> {
    read_frame(reader(text), opts, DropNa::No)
}

#[test]
fn dates_become_a_datetime_index() {
    let frame = read(DAILY, &InputOptions::default()).expect("parse csv");
    assert!(frame.index.is_datetime());
    assert_eq!(frame.nrows(), 6);
    assert_eq!(frame.names(), vec!["flow", "rain"]);
    assert!(frame.column(1).values[0].is_nan());
    assert!(frame.column(1).values[2].is_nan());
}

#[test]
fn numbers_and_labels_as_index() {
    let frame = read("x,y\n0.5,1\n1.5,2\n", &InputOptions::default()).unwrap();
    assert_eq!(frame.index, Index::Number(vec![0.5, 1.5]));

    let frame = read("name,v\napples,3\npears,4\n", &InputOptions::default()).unwrap();
    assert_eq!(frame.index, Index::Label(vec!["apples".into(), "pears".into()]));

    let opts = InputOptions { index_type: IndexType::Number, ..Default::default() };
    let frame = read("year,v\n2001,3\n2002,4\n", &opts).unwrap();
    assert_eq!(frame.index, Index::Number(vec![2001.0, 2002.0]));
}

#[test]
fn clean_sorts_and_drops_duplicate_keys() {
    let opts = InputOptions { clean: true, ..Default::default() };
    let frame = read(DAILY, &opts).unwrap();
    assert_eq!(frame.nrows(), 5);
    assert_eq!(frame.column(0).values[..3], [1.0, 2.0, 3.0]);
}

#[test]
fn dropna_any_and_all() {
    let any = InputOptions { dropna: Some(DropNa::Any), ..Default::default() };
    assert_eq!(read(DAILY, &any).unwrap().nrows(), 3);

    let all = InputOptions { dropna: Some(DropNa::All), ..Default::default() };
    assert_eq!(read(DAILY, &all).unwrap().nrows(), 5);
}

#[test]
fn columns_by_name_or_number() {
    let opts = InputOptions { columns: vec!["rain".into(), "1".into()], ..Default::default() };
    let frame = read(DAILY, &opts).unwrap();
    assert_eq!(frame.names(), vec!["rain", "flow"]);

    let opts = InputOptions { columns: vec!["snow".into()], ..Default::default() };
    assert!(matches!(read(DAILY, &opts), Err(PlotError::UnknownColumn(c)) if c == "snow"));
}

#[test]
fn names_rename_before_picking() {
    let opts = InputOptions { names: vec!["q".into(), "p".into()], columns: vec!["p".into()], ..Default::default() };
    let frame = read(DAILY, &opts).unwrap();
    assert_eq!(frame.names(), vec!["p"]);
}

#[test]
fn date_window_is_inclusive() {
    let opts = InputOptions {
        clean: true,
        start_date: Some("2020-01-02".into()),
        end_date: Some("2020-01-04".into()),
        ..Default::default()
    };
    let frame = read(DAILY, &opts).unwrap();
    assert_eq!(frame.nrows(), 3);

    let bad = InputOptions { start_date: Some("someday".into()), ..Default::default() };
    assert!(read(DAILY, &bad).is_err());
}

#[test]
fn skiprows_drops_leading_lines() {
    let text = "# exported by logger\n# units: m3/s\nDatetime,flow\n2020-01-01,1\n2020-01-02,2\n";
    let opts = InputOptions { skiprows: 2, ..Default::default() };
    let frame = read(text, &opts).unwrap();
    assert_eq!(frame.names(), vec!["flow"]);
    assert_eq!(frame.nrows(), 2);
}

#[test]
fn period_of_record_trims_empty_ends() {
    let text = "Datetime,a,b\n2020-01-01,,\n2020-01-02,1,\n2020-01-03,,\n2020-01-04,,2\n2020-01-05,,\n";
    let opts = InputOptions { por: true, ..Default::default() };
    let frame = read(text, &opts).unwrap();
    assert_eq!(frame.nrows(), 3);
    assert_eq!(frame.index.label(0), "2020-01-02");
}

#[test]
fn round_index_then_clean() {
    let text = "Datetime,v\n2020-01-01 10:15,1\n2020-01-01 10:59,2\n2020-01-01 11:05,3\n";
    let opts = InputOptions { round_index: Some("H".into()), clean: true, ..Default::default() };
    let frame = read(text, &opts).unwrap();
    assert_eq!(frame.nrows(), 2);
    assert_eq!(frame.column(0).values, vec![1.0, 2.0]);
    let hour = |h| NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(h, 0, 0).unwrap();
    assert_eq!(frame.index, Index::DateTime(vec![hour(10), hour(11)]));

    let opts = InputOptions { round_index: Some("fortnight".into()), ..Default::default() };
    assert!(matches!(read(text, &opts), Err(PlotError::InvalidOption { option: "round_index", .. })));
}

#[test]
fn bad_values_name_row_and_column() {
    let err = read("Datetime,v\n2020-01-01,1\n2020-01-02,lots\n", &InputOptions::default()).unwrap_err();
    match err {
        PlotError::ParseValue { row, column, value } => {
            assert_eq!((row, column.as_str(), value.as_str()), (2, "v", "lots"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_selections_are_errors() {
    assert!(matches!(read("Datetime,v\n", &InputOptions::default()), Err(PlotError::EmptyInput(_))));
    let opts = InputOptions { start_date: Some("2030-01-01".into()), ..Default::default() };
    assert!(matches!(read(DAILY, &opts), Err(PlotError::EmptyInput(_))));
}

#[test]
fn missing_markers_and_layouts() {
    for raw in ["", "NaN", "NA", "null", "-", " nan "] {
        assert!(parse_value(raw).is_some_and(f64::is_nan), "{raw:?}");
    }
    assert_eq!(parse_value("1e3"), Some(1000.0));
    assert_eq!(parse_value("abc"), None);

    let midnight = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
    assert_eq!(parse_datetime("2020-02-03"), Some(midnight(2020, 2, 3)));
    assert_eq!(parse_datetime("02/03/2020"), Some(midnight(2020, 2, 3)));
    assert_eq!(parse_datetime("2020-02"), Some(midnight(2020, 2, 1)));
    assert_eq!(parse_datetime("1999"), Some(midnight(1999, 1, 1)));
    assert_eq!(
        parse_datetime("2020-02-03T04:05:06"),
        NaiveDate::from_ymd_opt(2020, 2, 3).unwrap().and_hms_opt(4, 5, 6)
    );
    assert_eq!(parse_datetime("12"), None);
}
