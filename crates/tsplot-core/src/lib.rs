// File: crates/tsplot-core/src/lib.rs
// Summary: Library entry point; CSV time-series ingestion, option normalization and chart builders.

pub mod error;
pub mod frame;
pub mod ingest;
pub mod color;
pub mod theme;
pub mod style;
pub mod limits;
pub mod legend;
pub mod stats;
pub mod text;
pub mod scale;
pub mod axis;
pub mod figure;
pub mod render;
pub mod charts;

pub use error::{PlotError, Result};
pub use frame::{Column, DropNa, Frame, Index};
pub use ingest::{read_frame, IndexType, InputOptions, Source};
pub use color::ColorSpec;
pub use theme::Theme;
pub use style::{prepare_hatches, prepare_styles, Hatch, LineStyle, Marker, StyleCycle, StyleList};
pub use limits::{know_your_limits, AxisScale, Limits};
pub use legend::check_column_legend;
pub use stats::{Distribution, PlottingPosition};
pub use text::TextShaper;
pub use axis::{Axis, TickSource};
pub use figure::{DrawStyle, Figure, Layer, Panel};
pub use render::OutputFormat;
pub use charts::{PlotKind, PlotOptions, RefLines};
