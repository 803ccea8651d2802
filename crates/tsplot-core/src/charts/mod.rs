// File: crates/tsplot-core/src/charts/mod.rs
// Summary: Shared chart pipeline: presentation options, ingestion + validation, decoration and saving.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::axis::Axis;
use crate::color::ColorSpec;
use crate::error::{PlotError, Result};
use crate::figure::{DrawStyle, Figure, Layer, Orientation, Panel, RefLine};
use crate::frame::{DropNa, Frame};
use crate::ingest::{read_frame, InputOptions, Source};
use crate::legend::check_column_legend;
use crate::limits::{know_your_limits, AxisScale, Limits};
use crate::scale::ScaleKind;
use crate::style::{prepare_styles, LineStyle, StyleCycle, StyleList};
use crate::theme::Theme;

mod bar;
mod distribution;
mod hexbin;
mod heatmap;
mod probability;
mod scatter_matrix;
mod serial;
mod skill;
mod time;
mod waterfall;
mod xy;

pub use bar::{bar, bar_stacked, barh, barh_stacked, BarOptions};
pub use distribution::{boxplot, histogram, kde, probability_density, BoxplotOptions, HistogramOptions};
pub use heatmap::heatmap;
pub use hexbin::{hexbin, HexbinOptions};
pub use probability::{
    lognorm_xaxis, lognorm_yaxis, norm_xaxis, norm_yaxis, weibull_xaxis, weibull_yaxis, ProbabilityOptions,
};
pub use scatter_matrix::{scatter_matrix, Diagonal, ScatterMatrixOptions};
pub use serial::{autocorrelation, bootstrap, lag_plot, BootstrapOptions};
pub use skill::{target, taylor};
pub use time::{handh, kde_time, time};
pub use waterfall::{waterfall, WaterfallOptions};
pub use xy::{double_mass, xy};

/// Every chart the toolbox can draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlotKind {
    Time,
    Xy,
    DoubleMass,
    Bar,
    Barh,
    BarStacked,
    BarhStacked,
    Histogram,
    Kde,
    KdeTime,
    Boxplot,
    NormXaxis,
    NormYaxis,
    LognormXaxis,
    LognormYaxis,
    WeibullXaxis,
    WeibullYaxis,
    Autocorrelation,
    LagPlot,
    Bootstrap,
    Heatmap,
    Hexbin,
    ScatterMatrix,
    Taylor,
    Target,
    Waterfall,
    Handh,
}

impl PlotKind {
    pub fn name(&self) -> &'static str {
        match self {
            PlotKind::Time => "time",
            PlotKind::Xy => "xy",
            PlotKind::DoubleMass => "double_mass",
            PlotKind::Bar => "bar",
            PlotKind::Barh => "barh",
            PlotKind::BarStacked => "bar_stacked",
            PlotKind::BarhStacked => "barh_stacked",
            PlotKind::Histogram => "histogram",
            PlotKind::Kde => "kde",
            PlotKind::KdeTime => "kde_time",
            PlotKind::Boxplot => "boxplot",
            PlotKind::NormXaxis => "norm_xaxis",
            PlotKind::NormYaxis => "norm_yaxis",
            PlotKind::LognormXaxis => "lognorm_xaxis",
            PlotKind::LognormYaxis => "lognorm_yaxis",
            PlotKind::WeibullXaxis => "weibull_xaxis",
            PlotKind::WeibullYaxis => "weibull_yaxis",
            PlotKind::Autocorrelation => "autocorrelation",
            PlotKind::LagPlot => "lag_plot",
            PlotKind::Bootstrap => "bootstrap",
            PlotKind::Heatmap => "heatmap",
            PlotKind::Hexbin => "hexbin",
            PlotKind::ScatterMatrix => "scatter_matrix",
            PlotKind::Taylor => "taylor",
            PlotKind::Target => "target",
            PlotKind::Waterfall => "waterfall",
            PlotKind::Handh => "handh",
        }
    }

    /// Charts that only make sense for one series.
    pub fn single_series(&self) -> bool {
        matches!(self, PlotKind::Bootstrap | PlotKind::Heatmap | PlotKind::Autocorrelation | PlotKind::LagPlot)
    }

    /// Charts whose columns come as x,y pairs.
    pub fn paired(&self) -> bool { matches!(self, PlotKind::Xy | PlotKind::DoubleMass) }

    /// Charts that need the index to be dates.
    pub fn needs_datetime(&self) -> bool {
        matches!(self, PlotKind::Time | PlotKind::KdeTime | PlotKind::Heatmap | PlotKind::Handh)
    }

    fn default_dropna(&self) -> DropNa {
        match self {
            // gaps stay visible as breaks in the line
            PlotKind::Time | PlotKind::KdeTime | PlotKind::Heatmap | PlotKind::Handh => DropNa::No,
            _ => DropNa::All,
        }
    }
}

/// Horizontal or vertical reference lines drawn on top of a chart.
///
/// Each companion list holds either one value for every line or one value per line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RefLines {
    pub at: Vec<f64>,
    pub min: Vec<f64>,
    pub max: Vec<f64>,
    pub colors: Vec<String>,
    pub linestyles: Vec<String>,
}

/// Presentation options shared by every chart.
#[derive(Clone, Debug)]
pub struct PlotOptions {
    pub input: InputOptions,
    /// `None` returns the figure without writing a file.
    pub ofilename: Option<PathBuf>,
    pub xtitle: String,
    pub ytitle: String,
    pub title: String,
    /// Inches.
    pub figsize: (f32, f32),
    pub dpi: f32,
    /// `None` lets the chart decide.
    pub legend: Option<bool>,
    pub legend_names: Vec<String>,
    pub subplots: bool,
    pub sharex: bool,
    pub sharey: bool,
    pub colors: StyleList,
    pub linestyles: StyleList,
    pub markerstyles: StyleList,
    pub style: StyleList,
    pub xaxis: AxisScale,
    pub yaxis: AxisScale,
    pub xlim: Option<Limits>,
    pub ylim: Option<Limits>,
    /// Column names drawn against a secondary y axis.
    pub secondary_y: Vec<String>,
    /// Append "(right)" to legend labels of secondary-axis series.
    pub mark_right: bool,
    pub grid: bool,
    pub drawstyle: DrawStyle,
    pub invert_xaxis: bool,
    pub invert_yaxis: bool,
    pub plot_styles: Vec<String>,
    pub hlines: RefLines,
    pub vlines: RefLines,
    pub xlabel_rotation: f32,
    pub ylabel_rotation: f32,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            input: InputOptions::default(),
            ofilename: Some(PathBuf::from("plot.png")),
            xtitle: String::new(),
            ytitle: String::new(),
            title: String::new(),
            figsize: (10.0, 6.0),
            dpi: 100.0,
            legend: None,
            legend_names: Vec::new(),
            subplots: false,
            sharex: true,
            sharey: false,
            colors: StyleList::Auto,
            linestyles: StyleList::Auto,
            markerstyles: StyleList::blank(),
            style: StyleList::Auto,
            xaxis: AxisScale::Arithmetic,
            yaxis: AxisScale::Arithmetic,
            xlim: None,
            ylim: None,
            secondary_y: Vec::new(),
            mark_right: true,
            grid: false,
            drawstyle: DrawStyle::Default,
            invert_xaxis: false,
            invert_yaxis: false,
            plot_styles: vec!["bright".to_string()],
            hlines: RefLines::default(),
            vlines: RefLines::default(),
            xlabel_rotation: 0.0,
            ylabel_rotation: 0.0,
        }
    }
}

impl PlotOptions {
    /// Write nothing, only build the figure.
    pub fn in_memory() -> Self { Self { ofilename: None, ..Self::default() } }

    fn title_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
        if value.is_empty() { fallback } else { value }
    }

    pub fn xtitle_or<'a>(&'a self, fallback: &'a str) -> &'a str { Self::title_or(&self.xtitle, fallback) }
    pub fn ytitle_or<'a>(&'a self, fallback: &'a str) -> &'a str { Self::title_or(&self.ytitle, fallback) }

    /// Styles for scatter-like charts: markers unless the caller asked for lines.
    pub(crate) fn scatter_styles(&self, ntrace: usize) -> Result<StyleCycle> {
        let blank_markers = self.markerstyles == StyleList::blank();
        let markers = if blank_markers { StyleList::Auto } else { self.markerstyles.clone() };
        let lines = if self.linestyles.is_auto() { StyleList::blank() } else { self.linestyles.clone() };
        prepare_styles(ntrace, &self.style, &self.colors, &lines, &markers)
    }

    pub(crate) fn line_styles(&self, ntrace: usize) -> Result<StyleCycle> {
        prepare_styles(ntrace, &self.style, &self.colors, &self.linestyles, &self.markerstyles)
    }
}

impl AxisScale {
    pub(crate) fn scale_kind(&self) -> ScaleKind {
        match self {
            AxisScale::Log => ScaleKind::Log10,
            _ => ScaleKind::Linear,
        }
    }
}

/// Everything a builder needs after the shared front half of the pipeline.
pub(crate) struct Prepared {
    pub frame: Frame,
    pub labels: Vec<String>,
    pub theme: Theme,
    pub xlim: Option<Limits>,
    pub ylim: Option<Limits>,
}

/// Ingest, validate legend names and limits, and pick the theme.
pub(crate) fn prepare<'a>(kind: PlotKind, source: impl Into<Source<'a>>, opts: &PlotOptions) -> Result<Prepared> {
    let mut frame = read_frame(source.into(), &opts.input, kind.default_dropna())?;
    if kind.needs_datetime() && !frame.index.is_datetime() {
        return Err(PlotError::NotDatetimeIndex { kind: kind.name() });
    }
    let labels = check_column_legend(kind, &mut frame, &opts.legend_names)?;
    for (option, scale) in [("xaxis", opts.xaxis), ("yaxis", opts.yaxis)] {
        if scale == AxisScale::Normal {
            return Err(PlotError::invalid(
                option,
                format!("a probability scale only applies to a probability axis, not to {}", kind.name()),
            ));
        }
    }
    let xlim = know_your_limits(opts.xlim, opts.xaxis)?;
    let ylim = know_your_limits(opts.ylim, opts.yaxis)?;
    let theme = Theme::from_styles(&opts.plot_styles)?;
    debug!(kind = kind.name(), series = frame.ncols(), rows = frame.nrows(), theme = theme.name, "chart input ready");
    Ok(Prepared { frame, labels, theme, xlim, ylim })
}

pub(crate) fn new_figure(opts: &PlotOptions, theme: Theme) -> Figure {
    let mut fig = Figure::new(opts.figsize, opts.dpi, theme);
    fig.title = opts.title.clone();
    fig
}

/// Apply titles, limits, scales, grid, inversion and label rotation to one panel.
pub(crate) fn decorate(panel: &mut Panel, opts: &PlotOptions, prep: &Prepared, xtitle: &str, ytitle: &str) {
    panel.x.label = xtitle.to_string();
    panel.y.label = ytitle.to_string();
    if let Some(l) = prep.xlim {
        panel.x.limits = l;
    }
    if let Some(l) = prep.ylim {
        panel.y.limits = l;
    }
    panel.grid = opts.grid || prep.theme.grid_on;
    panel.x.inverted ^= opts.invert_xaxis;
    panel.y.inverted ^= opts.invert_yaxis;
    if opts.xlabel_rotation != 0.0 {
        panel.x.label_rotation = opts.xlabel_rotation;
    }
    if opts.ylabel_rotation != 0.0 {
        panel.y.label_rotation = opts.ylabel_rotation;
    }
}

/// Set linear/log scales from the options, ignoring a probability request.
pub(crate) fn apply_scales(axis_x: &mut Axis, axis_y: &mut Axis, opts: &PlotOptions) {
    axis_x.kind = opts.xaxis.scale_kind();
    axis_y.kind = opts.yaxis.scale_kind();
}

/// Add the requested horizontal and vertical reference lines.
pub(crate) fn add_ref_lines(panel: &mut Panel, opts: &PlotOptions, theme: &Theme) -> Result<()> {
    for (lines, orientation, prefix) in
        [(&opts.hlines, Orientation::Horizontal, "hlines"), (&opts.vlines, Orientation::Vertical, "vlines")]
    {
        let n = lines.at.len();
        if n == 0 { continue; }
        let min = companion(prefix, "min", &lines.min, n)?;
        let max = companion(prefix, "max", &lines.max, n)?;
        let colors = companion(prefix, "colors", &lines.colors, n)?;
        let styles = companion(prefix, "linestyles", &lines.linestyles, n)?;
        for (i, &at) in lines.at.iter().enumerate() {
            let color = match colors.as_ref().map(|c| c[i].as_str()) {
                Some(c) => c.parse::<ColorSpec>()?.resolve(theme),
                None => theme.cycle_color(i),
            };
            let style = match styles.as_ref().map(|s| s[i].as_str()) {
                Some(s) => s.parse::<LineStyle>()?,
                None => LineStyle::Solid,
            };
            panel.push(Layer::RefLine(RefLine {
                orientation,
                at,
                from: min.as_ref().map(|v| v[i]),
                to: max.as_ref().map(|v| v[i]),
                color,
                style,
                width: 1.2,
            }));
        }
    }
    Ok(())
}

fn companion<T: Clone>(prefix: &'static str, what: &str, values: &[T], n: usize) -> Result<Option<Vec<T>>> {
    match values.len() {
        0 => Ok(None),
        1 => Ok(Some(vec![values[0].clone(); n])),
        len if len == n => Ok(Some(values.to_vec())),
        len => Err(PlotError::invalid(
            prefix,
            format!("{prefix}_{what} has {len} entries, it needs 1 or one per line ({n})"),
        )),
    }
}

/// Save when a file name was given; the figure is returned either way.
pub(crate) fn finish(fig: Figure, opts: &PlotOptions) -> Result<Figure> {
    match &opts.ofilename {
        Some(path) => fig.save(path)?,
        None => debug!("no output file requested, returning figure"),
    }
    Ok(fig)
}

/// Warn when an axis scale request differs from the scale this chart fixes for the axis.
pub(crate) fn ignore_scale(kind: PlotKind, axis: &str, scale: AxisScale, fixed: AxisScale) {
    if overrides(scale, fixed) {
        warn!(kind = kind.name(), axis, ?scale, ?fixed, "axis scale is fixed for this chart, ignoring request");
    }
}

fn overrides(requested: AxisScale, fixed: AxisScale) -> bool {
    requested != AxisScale::Arithmetic && requested != fixed
}

/// Lay out `n` panels on a near-square grid.
pub(crate) fn grid_shape(n: usize) -> (usize, usize) {
    let ncols = (n as f64).sqrt().ceil().max(1.0) as usize;
    let nrows = n.div_ceil(ncols).max(1);
    (nrows, ncols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_snake_case() {
        assert_eq!(PlotKind::DoubleMass.name(), "double_mass");
        assert_eq!(PlotKind::BarhStacked.name(), "barh_stacked");
        assert!(PlotKind::LagPlot.single_series());
        assert!(PlotKind::Xy.paired() && !PlotKind::Time.paired());
    }

    #[test]
    fn only_foreign_scale_requests_are_overridden() {
        assert!(!overrides(AxisScale::Arithmetic, AxisScale::Normal));
        assert!(!overrides(AxisScale::Normal, AxisScale::Normal));
        assert!(overrides(AxisScale::Log, AxisScale::Normal));
        assert!(overrides(AxisScale::Log, AxisScale::Arithmetic));
    }

    #[test]
    fn grid_shape_is_near_square() {
        assert_eq!(grid_shape(1), (1, 1));
        assert_eq!(grid_shape(3), (2, 2));
        assert_eq!(grid_shape(5), (2, 3));
    }

    #[test]
    fn companion_lists_must_match() {
        assert_eq!(companion("hlines", "min", &[1.0], 3).unwrap(), Some(vec![1.0; 3]));
        assert!(companion("hlines", "min", &[1.0, 2.0], 3).is_err());
        assert_eq!(companion::<f64>("hlines", "min", &[], 3).unwrap(), None);
    }
}
