// File: crates/tsplot/src/cli.rs
// Summary: Argument model (one subcommand per chart) and dispatch into the chart builders.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use tracing::info;
use tsplot_core::charts::{
    self, BarOptions, BootstrapOptions, BoxplotOptions, Diagonal, HexbinOptions, HistogramOptions, ProbabilityOptions,
    ScatterMatrixOptions, WaterfallOptions,
};
use tsplot_core::{
    AxisScale, ColorSpec, DrawStyle, DropNa, Figure, IndexType, InputOptions, Limits, PlotKind, PlotOptions,
    PlottingPosition, RefLines, StyleList,
};

/// Plot CSV time series as one of many chart types.
#[derive(Debug, Parser)]
#[command(name = "tsplot", version, about, long_about = None)]
pub struct Cli {
    /// Log verbosity; TSPLOT_LOG overrides it with a full filter directive
    #[arg(long, global = true, default_value_t = tracing::Level::WARN)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print version, build target, charts and plot styles
    About,

    #[command(flatten)]
    Chart(ChartCommand),
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "snake_case")]
pub enum ChartCommand {
    /// Time series against a date index
    Time(CommonArgs),
    /// x,y pairs (or a single column against the index)
    Xy(CommonArgs),
    /// Cumulative sums of x,y pairs
    DoubleMass(CommonArgs),
    /// Grouped vertical bars
    Bar(BarArgs),
    /// Grouped horizontal bars
    Barh(BarArgs),
    /// Stacked vertical bars
    BarStacked(BarArgs),
    /// Stacked horizontal bars
    BarhStacked(BarArgs),
    /// One histogram per column
    Histogram(HistogramArgs),
    /// Kernel density estimate
    #[command(alias = "probability_density")]
    Kde(CommonArgs),
    /// Time series with its density alongside
    KdeTime(CommonArgs),
    /// Box and whisker plot
    Boxplot(BoxplotArgs),
    /// Normal probability plot, probability on x
    NormXaxis(ProbabilityArgs),
    /// Normal probability plot, probability on y
    NormYaxis(ProbabilityArgs),
    /// Log-normal probability plot, probability on x
    LognormXaxis(ProbabilityArgs),
    /// Log-normal probability plot, probability on y
    LognormYaxis(ProbabilityArgs),
    /// Weibull probability plot, probability on x
    WeibullXaxis(ProbabilityArgs),
    /// Weibull probability plot, probability on y
    WeibullYaxis(ProbabilityArgs),
    /// Autocorrelation with confidence bands
    Autocorrelation(CommonArgs),
    /// y(t) against y(t + lag)
    LagPlot(LagArgs),
    /// Bootstrap mean, median and mid-range
    Bootstrap(BootstrapArgs),
    /// Calendar heat map of a daily series
    Heatmap(CommonArgs),
    /// Hexagonal binning of x,y (and an optional value column)
    Hexbin(HexbinArgs),
    /// Pairwise scatter plots
    ScatterMatrix(ScatterMatrixArgs),
    /// Taylor diagram against the first column
    Taylor(CommonArgs),
    /// Target diagram against the first column
    Target(CommonArgs),
    /// Step changes of a running total
    Waterfall(WaterfallArgs),
    /// Hyetograph over hydrograph
    Handh(CommonArgs),
}

fn parse_figsize(s: &str) -> std::result::Result<(f32, f32), String> {
    let (w, h) = s.split_once(',').ok_or_else(|| format!("expected 'width,height', got '{s}'"))?;
    let num = |p: &str| p.trim().parse::<f32>().map_err(|_| format!("'{p}' is not a number"));
    Ok((num(w)?, num(h)?))
}

/// Input selection and presentation flags every chart accepts.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// CSV file to read, '-' for stdin
    #[arg(long, default_value = "-")]
    pub input_ts: String,
    /// Columns to keep, by name or 1-based number
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
    /// Sort the index and drop duplicate rows
    #[arg(long)]
    pub clean: bool,
    /// Lines to skip before the header
    #[arg(long, default_value_t = 0)]
    pub skiprows: usize,
    #[arg(long, default_value = "datetime")]
    pub index_type: IndexType,
    /// Replacement column names
    #[arg(long, value_delimiter = ',')]
    pub names: Vec<String>,
    /// Drop rows with missing values: no, any or all
    #[arg(long)]
    pub dropna: Option<DropNa>,
    /// Round the date index to a unit (S, T/min, H, D)
    #[arg(long)]
    pub round_index: Option<String>,
    /// Trim to the period where every column has data
    #[arg(long)]
    pub por: bool,

    #[arg(long, default_value = "plot.png")]
    pub ofilename: PathBuf,
    #[arg(long, default_value = "")]
    pub xtitle: String,
    #[arg(long, default_value = "")]
    pub ytitle: String,
    #[arg(long, default_value = "")]
    pub title: String,
    /// Figure size in inches, 'width,height'
    #[arg(long, default_value = "10,6", value_parser = parse_figsize)]
    pub figsize: (f32, f32),
    #[arg(long, default_value_t = 100.0)]
    pub dpi: f32,
    #[arg(long)]
    pub legend: Option<bool>,
    #[arg(long, value_delimiter = ',')]
    pub legend_names: Vec<String>,
    /// One panel per column
    #[arg(long)]
    pub subplots: bool,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub sharex: bool,
    #[arg(long)]
    pub sharey: bool,
    /// Comma separated colors, or 'auto'
    #[arg(long, default_value = "auto")]
    pub colors: StyleList,
    #[arg(long, default_value = "auto")]
    pub linestyles: StyleList,
    #[arg(long, default_value = " ")]
    pub markerstyles: StyleList,
    /// Combined color/marker/line codes such as 'b-' or 'r*--'
    #[arg(long, default_value = "auto")]
    pub style: StyleList,
    /// arithmetic, log, or normal on the probability axis of a probability plot
    #[arg(long, default_value = "arithmetic")]
    pub xaxis: AxisScale,
    #[arg(long, default_value = "arithmetic")]
    pub yaxis: AxisScale,
    /// 'low,high'; either side may be empty
    #[arg(long, allow_hyphen_values = true)]
    pub xlim: Option<Limits>,
    #[arg(long, allow_hyphen_values = true)]
    pub ylim: Option<Limits>,
    /// Columns drawn against a right-hand y axis
    #[arg(long, value_delimiter = ',')]
    pub secondary_y: Vec<String>,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub mark_right: bool,
    #[arg(long)]
    pub grid: bool,
    /// default, steps-pre, steps-mid or steps-post
    #[arg(long, default_value = "default")]
    pub drawstyle: DrawStyle,
    #[arg(long)]
    pub invert_xaxis: bool,
    #[arg(long)]
    pub invert_yaxis: bool,
    #[arg(long, value_delimiter = ',', default_value = "bright")]
    pub plot_styles: Vec<String>,

    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub hlines_y: Vec<f64>,
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub hlines_xmin: Vec<f64>,
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub hlines_xmax: Vec<f64>,
    #[arg(long, value_delimiter = ',')]
    pub hlines_colors: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub hlines_linestyles: Vec<String>,
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub vlines_x: Vec<f64>,
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub vlines_ymin: Vec<f64>,
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub vlines_ymax: Vec<f64>,
    #[arg(long, value_delimiter = ',')]
    pub vlines_colors: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub vlines_linestyles: Vec<String>,
    /// Tick label rotation in degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub xlabel_rotation: f32,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub ylabel_rotation: f32,
}

impl CommonArgs {
    pub fn plot_options(&self) -> PlotOptions {
        PlotOptions {
            input: InputOptions {
                columns: self.columns.clone(),
                start_date: self.start_date.clone(),
                end_date: self.end_date.clone(),
                clean: self.clean,
                skiprows: self.skiprows,
                index_type: self.index_type,
                names: self.names.clone(),
                dropna: self.dropna,
                round_index: self.round_index.clone(),
                por: self.por,
            },
            ofilename: Some(self.ofilename.clone()),
            xtitle: self.xtitle.clone(),
            ytitle: self.ytitle.clone(),
            title: self.title.clone(),
            figsize: self.figsize,
            dpi: self.dpi,
            legend: self.legend,
            legend_names: self.legend_names.clone(),
            subplots: self.subplots,
            sharex: self.sharex,
            sharey: self.sharey,
            colors: self.colors.clone(),
            linestyles: self.linestyles.clone(),
            markerstyles: self.markerstyles.clone(),
            style: self.style.clone(),
            xaxis: self.xaxis,
            yaxis: self.yaxis,
            xlim: self.xlim,
            ylim: self.ylim,
            secondary_y: self.secondary_y.clone(),
            mark_right: self.mark_right,
            grid: self.grid,
            drawstyle: self.drawstyle,
            invert_xaxis: self.invert_xaxis,
            invert_yaxis: self.invert_yaxis,
            plot_styles: self.plot_styles.clone(),
            hlines: RefLines {
                at: self.hlines_y.clone(),
                min: self.hlines_xmin.clone(),
                max: self.hlines_xmax.clone(),
                colors: self.hlines_colors.clone(),
                linestyles: self.hlines_linestyles.clone(),
            },
            vlines: RefLines {
                at: self.vlines_x.clone(),
                min: self.vlines_ymin.clone(),
                max: self.vlines_ymax.clone(),
                colors: self.vlines_colors.clone(),
                linestyles: self.vlines_linestyles.clone(),
            },
            xlabel_rotation: self.xlabel_rotation,
            ylabel_rotation: self.ylabel_rotation,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct BarArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Comma separated hatch patterns, or 'auto'
    #[arg(long, default_value = "auto")]
    pub hatchstyles: StyleList,
    /// Category label rotation in degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub label_rotation: f32,
    /// Label every n-th category only
    #[arg(long, default_value_t = 1)]
    pub label_skip: usize,
}

#[derive(Debug, Clone, Args)]
pub struct HistogramArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[arg(long, default_value_t = 10)]
    pub bins: usize,
}

#[derive(Debug, Clone, Args)]
pub struct BoxplotArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Vertical boxes; false draws them horizontally
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub vert: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ProbabilityArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// weibull, benard, filliben, tukey, gringorten, hazen, cunnane, blom, california or a number in [0, 1]
    #[arg(long, default_value = "weibull")]
    pub plotting_position: PlottingPosition,
}

#[derive(Debug, Clone, Args)]
pub struct LagArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[arg(long, default_value_t = 1)]
    pub lag: usize,
}

#[derive(Debug, Clone, Args)]
pub struct BootstrapArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[arg(long, default_value_t = 50)]
    pub bootstrap_size: usize,
    #[arg(long, default_value_t = 500)]
    pub bootstrap_samples: usize,
    /// Seed for reproducible resampling
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct HexbinArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[arg(long, default_value_t = 100)]
    pub gridsize: usize,
    /// Hide hexagons with fewer points
    #[arg(long, default_value_t = 1)]
    pub mincnt: usize,
}

#[derive(Debug, Clone, Args)]
pub struct ScatterMatrixArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// kde or hist
    #[arg(long, default_value = "kde")]
    pub diagonal: Diagonal,
    #[arg(long, default_value_t = 10)]
    pub bins: usize,
}

#[derive(Debug, Clone, Args)]
pub struct WaterfallArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[arg(long)]
    pub rise_color: Option<ColorSpec>,
    #[arg(long)]
    pub fall_color: Option<ColorSpec>,
    #[arg(long)]
    pub total_color: Option<ColorSpec>,
    #[arg(long)]
    pub line_color: Option<ColorSpec>,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub bar_labels: bool,
    #[arg(long, default_value = "Total")]
    pub total_label: String,
}

impl WaterfallArgs {
    fn options(&self) -> WaterfallOptions {
        let d = WaterfallOptions::default();
        WaterfallOptions {
            rise_color: self.rise_color.unwrap_or(d.rise_color),
            fall_color: self.fall_color.unwrap_or(d.fall_color),
            total_color: self.total_color.unwrap_or(d.total_color),
            line_color: self.line_color.unwrap_or(d.line_color),
            bar_labels: self.bar_labels,
            total_label: self.total_label.clone(),
        }
    }
}

impl ChartCommand {
    pub fn kind(&self) -> PlotKind {
        match self {
            ChartCommand::Time(_) => PlotKind::Time,
            ChartCommand::Xy(_) => PlotKind::Xy,
            ChartCommand::DoubleMass(_) => PlotKind::DoubleMass,
            ChartCommand::Bar(_) => PlotKind::Bar,
            ChartCommand::Barh(_) => PlotKind::Barh,
            ChartCommand::BarStacked(_) => PlotKind::BarStacked,
            ChartCommand::BarhStacked(_) => PlotKind::BarhStacked,
            ChartCommand::Histogram(_) => PlotKind::Histogram,
            ChartCommand::Kde(_) => PlotKind::Kde,
            ChartCommand::KdeTime(_) => PlotKind::KdeTime,
            ChartCommand::Boxplot(_) => PlotKind::Boxplot,
            ChartCommand::NormXaxis(_) => PlotKind::NormXaxis,
            ChartCommand::NormYaxis(_) => PlotKind::NormYaxis,
            ChartCommand::LognormXaxis(_) => PlotKind::LognormXaxis,
            ChartCommand::LognormYaxis(_) => PlotKind::LognormYaxis,
            ChartCommand::WeibullXaxis(_) => PlotKind::WeibullXaxis,
            ChartCommand::WeibullYaxis(_) => PlotKind::WeibullYaxis,
            ChartCommand::Autocorrelation(_) => PlotKind::Autocorrelation,
            ChartCommand::LagPlot(_) => PlotKind::LagPlot,
            ChartCommand::Bootstrap(_) => PlotKind::Bootstrap,
            ChartCommand::Heatmap(_) => PlotKind::Heatmap,
            ChartCommand::Hexbin(_) => PlotKind::Hexbin,
            ChartCommand::ScatterMatrix(_) => PlotKind::ScatterMatrix,
            ChartCommand::Taylor(_) => PlotKind::Taylor,
            ChartCommand::Target(_) => PlotKind::Target,
            ChartCommand::Waterfall(_) => PlotKind::Waterfall,
            ChartCommand::Handh(_) => PlotKind::Handh,
        }
    }

    pub fn common(&self) -> &CommonArgs {
        match self {
            ChartCommand::Time(c)
            | ChartCommand::Xy(c)
            | ChartCommand::DoubleMass(c)
            | ChartCommand::Kde(c)
            | ChartCommand::KdeTime(c)
            | ChartCommand::Autocorrelation(c)
            | ChartCommand::Heatmap(c)
            | ChartCommand::Taylor(c)
            | ChartCommand::Target(c)
            | ChartCommand::Handh(c) => c,
            ChartCommand::Bar(a) | ChartCommand::Barh(a) | ChartCommand::BarStacked(a) | ChartCommand::BarhStacked(a) => {
                &a.common
            }
            ChartCommand::Histogram(a) => &a.common,
            ChartCommand::Boxplot(a) => &a.common,
            ChartCommand::NormXaxis(a)
            | ChartCommand::NormYaxis(a)
            | ChartCommand::LognormXaxis(a)
            | ChartCommand::LognormYaxis(a)
            | ChartCommand::WeibullXaxis(a)
            | ChartCommand::WeibullYaxis(a) => &a.common,
            ChartCommand::LagPlot(a) => &a.common,
            ChartCommand::Bootstrap(a) => &a.common,
            ChartCommand::Hexbin(a) => &a.common,
            ChartCommand::ScatterMatrix(a) => &a.common,
            ChartCommand::Waterfall(a) => &a.common,
        }
    }

    /// Build (and save) the chart with already normalized options.
    pub fn draw(&self, opts: &PlotOptions) -> tsplot_core::Result<Figure> {
        let src = self.common().input_ts.as_str();
        let bars = |a: &BarArgs| BarOptions {
            hatchstyles: a.hatchstyles.clone(),
            label_rotation: a.label_rotation,
            label_skip: a.label_skip,
        };
        let prob = |a: &ProbabilityArgs| ProbabilityOptions { plotting_position: a.plotting_position };
        match self {
            ChartCommand::Time(_) => charts::time(src, opts),
            ChartCommand::Xy(_) => charts::xy(src, opts),
            ChartCommand::DoubleMass(_) => charts::double_mass(src, opts),
            ChartCommand::Bar(a) => charts::bar(src, opts, &bars(a)),
            ChartCommand::Barh(a) => charts::barh(src, opts, &bars(a)),
            ChartCommand::BarStacked(a) => charts::bar_stacked(src, opts, &bars(a)),
            ChartCommand::BarhStacked(a) => charts::barh_stacked(src, opts, &bars(a)),
            ChartCommand::Histogram(a) => charts::histogram(src, opts, &HistogramOptions { bins: a.bins }),
            ChartCommand::Kde(_) => charts::kde(src, opts),
            ChartCommand::KdeTime(_) => charts::kde_time(src, opts),
            ChartCommand::Boxplot(a) => charts::boxplot(src, opts, &BoxplotOptions { vert: a.vert }),
            ChartCommand::NormXaxis(a) => charts::norm_xaxis(src, opts, &prob(a)),
            ChartCommand::NormYaxis(a) => charts::norm_yaxis(src, opts, &prob(a)),
            ChartCommand::LognormXaxis(a) => charts::lognorm_xaxis(src, opts, &prob(a)),
            ChartCommand::LognormYaxis(a) => charts::lognorm_yaxis(src, opts, &prob(a)),
            ChartCommand::WeibullXaxis(a) => charts::weibull_xaxis(src, opts, &prob(a)),
            ChartCommand::WeibullYaxis(a) => charts::weibull_yaxis(src, opts, &prob(a)),
            ChartCommand::Autocorrelation(_) => charts::autocorrelation(src, opts),
            ChartCommand::LagPlot(a) => charts::lag_plot(src, opts, a.lag),
            ChartCommand::Bootstrap(a) => charts::bootstrap(
                src,
                opts,
                &BootstrapOptions { size: a.bootstrap_size, samples: a.bootstrap_samples, seed: a.seed },
            ),
            ChartCommand::Heatmap(_) => charts::heatmap(src, opts),
            ChartCommand::Hexbin(a) => charts::hexbin(src, opts, &HexbinOptions { gridsize: a.gridsize, mincnt: a.mincnt }),
            ChartCommand::ScatterMatrix(a) => {
                charts::scatter_matrix(src, opts, &ScatterMatrixOptions { diagonal: a.diagonal, bins: a.bins })
            }
            ChartCommand::Taylor(_) => charts::taylor(src, opts),
            ChartCommand::Target(_) => charts::target(src, opts),
            ChartCommand::Waterfall(a) => charts::waterfall(src, opts, &a.options()),
            ChartCommand::Handh(_) => charts::handh(src, opts),
        }
    }
}

/// Version, build target, available charts and plot styles.
pub fn about_text() -> String {
    let mut out = format!(
        "tsplot {}\ntarget: {}-{}\n\ncharts:\n",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::ARCH,
        std::env::consts::OS
    );
    for sub in Cli::command().get_subcommands().filter(|s| s.get_name() != "about") {
        out.push_str(&format!("  {}\n", sub.get_name()));
    }
    out.push_str("\nplot styles:\n");
    for theme in tsplot_core::theme::presets() {
        out.push_str(&format!("  {}\n", theme.name));
    }
    out
}

pub fn run(cli: &Cli) -> Result<()> {
    let chart = match &cli.command {
        Command::About => {
            print!("{}", about_text());
            return Ok(());
        }
        Command::Chart(chart) => chart,
    };
    let kind = chart.kind();
    let common = chart.common();
    let opts = common.plot_options();
    let fig = chart
        .draw(&opts)
        .with_context(|| format!("cannot draw the '{}' chart from '{}'", kind.name(), common.input_ts))?;
    info!(
        chart = kind.name(),
        path = %common.ofilename.display(),
        width = fig.width,
        height = fig.height,
        panels = fig.panels.len(),
        "chart written"
    );
    Ok(())
}
