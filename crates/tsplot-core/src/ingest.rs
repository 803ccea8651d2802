// File: crates/tsplot-core/src/ingest.rs
// Summary: Reads CSV (file or stdin) into a Frame and applies the shared selection/cleaning options.

use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::{PlotError, Result};
use crate::frame::{Column, DropNa, Frame, Index};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexType {
    #[default]
    DateTime,
    Number,
}

impl std::str::FromStr for IndexType {
    type Err = PlotError;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "datetime" | "date" | "time" => Ok(IndexType::DateTime),
            "number" | "numeric" => Ok(IndexType::Number),
            other => Err(PlotError::invalid("index_type", format!("expected datetime or number, got '{other}'"))),
        }
    }
}

/// Input selection shared by every chart.
#[derive(Clone, Debug, Default)]
pub struct InputOptions {
    pub columns: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub clean: bool,
    pub skiprows: usize,
    pub index_type: IndexType,
    pub names: Vec<String>,
    /// `None` lets the chart pick its own default.
    pub dropna: Option<DropNa>,
    pub round_index: Option<String>,
    pub por: bool,
}

/// Where the table comes from.
pub enum Source<'a> {
    /// A file path, or `-` for standard input.
    Path(&'a str),
    Reader(Box<dyn Read + 'a>),
    Frame(Frame),
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(p: &'a str) -> Self { Source::Path(p) }
}

impl From<Frame> for Source<'_> {
    fn from(f: Frame) -> Self { Source::Frame(f) }
}

/// Read `source` and apply `opts`; `default_dropna` is used when the caller did not choose.
pub fn read_frame(source: Source<'_>, opts: &InputOptions, default_dropna: DropNa) -> Result<Frame> {
    let frame = match source {
        Source::Path("-") => parse_csv(std::io::stdin().lock(), opts)?,
        Source::Path(p) => {
            let file = std::fs::File::open(Path::new(p))?;
            debug!(path = p, "reading input");
            parse_csv(file, opts)?
        }
        Source::Reader(r) => parse_csv(r, opts)?,
        Source::Frame(f) => f,
    };
    prepare_frame(frame, opts, default_dropna)
}

/// Apply selection, filtering and cleaning to an already built frame.
pub fn prepare_frame(mut frame: Frame, opts: &InputOptions, default_dropna: DropNa) -> Result<Frame> {
    if !opts.names.is_empty() {
        frame.rename(&opts.names);
    }
    frame.pick(&opts.columns)?;
    if opts.clean {
        frame.clean();
    }
    if let Some(unit) = &opts.round_index {
        frame.round_index(unit)?;
        if opts.clean {
            frame.clean();
        }
    }
    frame.filter_range(opts.start_date.as_deref(), opts.end_date.as_deref())?;
    frame.drop_na(opts.dropna.unwrap_or(default_dropna));
    if opts.por {
        frame.trim_por();
    }
    if frame.ncols() == 0 {
        return Err(PlotError::EmptyInput(Some("no data columns".into())));
    }
    if frame.nrows() == 0 {
        return Err(PlotError::EmptyInput(Some("no rows left after selection".into())));
    }
    debug!(rows = frame.nrows(), cols = frame.ncols(), "frame ready");
    Ok(frame)
}

fn parse_csv<R: Read>(reader: R, opts: &InputOptions) -> Result<Frame> {
    let mut reader = SkipLines::new(reader, opts.skiprows);
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.iter().map(|h| h.to_string()).collect::<Vec<_>>();
    if headers.len() < 2 {
        return Err(PlotError::EmptyInput(Some("need an index column and at least one data column".into())));
    }

    let mut keys: Vec<String> = Vec::new();
    let mut cols: Vec<Vec<f64>> = vec![Vec::new(); headers.len() - 1];
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        if rec.iter().all(|f| f.is_empty()) { continue; }
        keys.push(rec.get(0).unwrap_or_default().to_string());
        for (ci, col) in cols.iter_mut().enumerate() {
            let raw = rec.get(ci + 1).unwrap_or_default();
            col.push(parse_value(raw).ok_or_else(|| PlotError::ParseValue {
                row: row + 1,
                column: headers[ci + 1].clone(),
                value: raw.to_string(),
            })?);
        }
    }
    if keys.is_empty() {
        return Err(PlotError::EmptyInput(None));
    }

    let index = build_index(keys, opts.index_type);
    debug!(datetime = index.is_datetime(), rows = index.len(), "parsed index");
    let columns = headers[1..]
        .iter()
        .zip(cols)
        .map(|(name, values)| Column::new(name.clone(), values))
        .collect();
    Frame::new(index, columns)
}

fn build_index(keys: Vec<String>, index_type: IndexType) -> Index {
    if index_type == IndexType::DateTime {
        let parsed: Option<Vec<NaiveDateTime>> = keys.iter().map(|k| parse_datetime(k)).collect();
        if let Some(v) = parsed {
            return Index::DateTime(v);
        }
    }
    let parsed: std::result::Result<Vec<f64>, _> = keys.iter().map(|k| k.trim().parse::<f64>()).collect();
    match parsed {
        Ok(v) => Index::Number(v),
        Err(_) => Index::Label(keys),
    }
}

/// Missing markers parse to NaN; anything else must be a number.
pub fn parse_value(raw: &str) -> Option<f64> {
    let s = raw.trim();
    match s {
        "" | "NaN" | "nan" | "NAN" | "NA" | "N/A" | "na" | "null" | "NULL" | "None" | "-" => Some(f64::NAN),
        _ => s.parse::<f64>().ok(),
    }
}

const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse the date/time layouts accepted for an index or a date bound.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() { return None; }
    if let Ok(t) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(t.naive_utc());
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(t);
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, layout) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    // year-month and bare years
    if let Some((y, m)) = s.split_once('-') {
        if let (Ok(y), Ok(m)) = (y.parse::<i32>(), m.parse::<u32>()) {
            if y.to_string().len() == 4 {
                return NaiveDate::from_ymd_opt(y, m, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
            }
        }
    }
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        let y = s.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(y, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    None
}

/// Reader adaptor that drops the first `n` lines.
struct SkipLines<R> {
    inner: R,
    remaining: usize,
}

impl<R: Read> SkipLines<R> {
    fn new(inner: R, remaining: usize) -> Self { Self { inner, remaining } }
}

impl<R: Read> Read for SkipLines<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut byte = [0u8; 1];
        while self.remaining > 0 {
            if self.inner.read(&mut byte)? == 0 {
                return Ok(0);
            }
            if byte[0] == b'\n' {
                self.remaining -= 1;
            }
        }
        self.inner.read(buf)
    }
}
