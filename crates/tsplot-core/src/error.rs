// File: crates/tsplot-core/src/error.rs
// Summary: Error type shared by ingestion, option normalization, chart builders and output.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error(
        "you have to have the same number of style strings as traces to plot: \
         {given} style strings were supplied ({style:?}) but there are {traces} traces"
    )]
    StyleCount { style: Vec<String>, given: usize, traces: usize },

    #[error(
        "the '{kind}' plot needs x,y pairs: an even number of columns arranged as \
         x1,y1,x2,y2,... or a single y column plotted against the index; {columns} columns were supplied"
    )]
    ColumnParity { kind: &'static str, columns: usize },

    #[error("both limits must be between 0 and 1 for a probability axis, instead you have ({low}, {high})")]
    ProbabilityLimits { low: f64, high: f64 },

    #[error("a log axis cannot have limits less than or equal to 0, you have ({low:?}, {high:?})")]
    LogLimits { low: Option<f64>, high: Option<f64> },

    #[error("the second limit must be greater than the first, you gave ({low}, {high})")]
    LimitOrder { low: f64, high: f64 },

    #[error(
        "the index is not a datetime index and cannot be plotted by '{kind}'; \
         use 'xy' instead or supply a date/time index"
    )]
    NotDatetimeIndex { kind: &'static str },

    #[error("each name in legend_names must be unique, got {names:?}")]
    DuplicateLegend { names: Vec<String> },

    #[error(
        "legend_names must have one name per column ({columns} columns, {names} names); \
         for 'xy' and 'double_mass' give one name per x,y pair"
    )]
    LegendCount { columns: usize, names: usize },

    #[error("the '{kind}' plot works with exactly {expected} time-series, the input has {found}")]
    SeriesCount { kind: &'static str, expected: usize, found: usize },

    #[error("the '{kind}' plot only works with a daily time series")]
    NotDaily { kind: &'static str },

    #[error("input has no data{}", .0.as_deref().map(|s| format!(": {s}")).unwrap_or_default())]
    EmptyInput(Option<String>),

    #[error("column '{0}' is not in the input")]
    UnknownColumn(String),

    #[error("cannot parse '{value}' as a number (row {row}, column '{column}')")]
    ParseValue { row: usize, column: String, value: String },

    #[error("unknown color '{0}'")]
    UnknownColor(String),

    #[error("unknown marker style '{0}'")]
    UnknownMarker(String),

    #[error("unknown line style '{0}'")]
    UnknownLineStyle(String),

    #[error("unknown hatch style '{0}'")]
    UnknownHatch(String),

    #[error("unknown plot style '{0}'")]
    UnknownStyle(String),

    #[error("invalid value for '{option}': {reason}")]
    InvalidOption { option: &'static str, reason: String },

    #[error("cannot write '{}': unsupported image format", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("render failed: {0}")]
    Render(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PlotError {
    pub(crate) fn invalid(option: &'static str, reason: impl Into<String>) -> Self {
        PlotError::InvalidOption { option, reason: reason.into() }
    }
}
