// File: crates/tsplot-core/src/charts/serial.rs
// Summary: Single-series diagnostics: autocorrelation, lag plot and bootstrap statistics.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use super::{add_ref_lines, apply_scales, decorate, finish, new_figure, prepare, PlotKind, PlotOptions};
use crate::error::{PlotError, Result};
use crate::figure::{Figure, Layer, LineLayer, Orientation, Panel, PanelRect, PolygonLayer, RefLine};
use crate::ingest::Source;
use crate::stats::{self, histogram as bin_counts};
use crate::style::LineStyle;

/// Two-sided 95% and 99% normal quantiles for the confidence bands.
const Z95: f64 = 1.959_963_984_540_054;
const Z99: f64 = 2.575_829_303_548_901;

/// Autocorrelation for every lag with 95% (dashed) and 99% (solid) bands.
pub fn autocorrelation<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions) -> Result<Figure> {
    let prep = prepare(PlotKind::Autocorrelation, source, opts)?;
    let mut styles = opts.line_styles(1)?;
    let mut fig = new_figure(opts, prep.theme);

    let values = prep.frame.column(0).valid();
    let n = values.len();
    if n < 2 {
        return Err(PlotError::EmptyInput(Some("autocorrelation needs at least two values".into())));
    }
    let mut panel = Panel::new(PanelRect::FULL);
    decorate(&mut panel, opts, &prep, opts.xtitle_or("Time Lag"), opts.ytitle_or("Autocorrelation"));
    panel.legend = opts.legend.unwrap_or(false);
    panel.y.limits.low = panel.y.limits.low.or(Some(-1.0));
    panel.y.limits.high = panel.y.limits.high.or(Some(1.0));

    let band = |at: f64, style: LineStyle| {
        Layer::RefLine(RefLine {
            orientation: Orientation::Horizontal,
            at,
            from: None,
            to: None,
            color: prep.theme.tick,
            style,
            width: 1.0,
        })
    };
    let root = (n as f64).sqrt();
    panel.push(band(0.0, LineStyle::Solid));
    panel.push(band(Z99 / root, LineStyle::Solid));
    panel.push(band(Z95 / root, LineStyle::Dashed));
    panel.push(band(-Z95 / root, LineStyle::Dashed));
    panel.push(band(-Z99 / root, LineStyle::Solid));

    let st = styles.next_trace(&prep.theme);
    let acf = stats::autocorrelation(&values);
    panel.push(Layer::Line(LineLayer::new(acf, st.color).styled(st.line, st.marker).labeled(prep.labels[0].clone())));
    add_ref_lines(&mut panel, opts, &prep.theme)?;
    fig.push(panel);
    finish(fig, opts)
}

/// `y(t)` against `y(t + lag)`.
pub fn lag_plot<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, lag: usize) -> Result<Figure> {
    if lag == 0 {
        return Err(PlotError::invalid("lag", "must be at least 1"));
    }
    let prep = prepare(PlotKind::LagPlot, source, opts)?;
    let mut styles = opts.scatter_styles(1)?;
    let mut fig = new_figure(opts, prep.theme);

    let mut panel = Panel::new(PanelRect::FULL);
    apply_scales(&mut panel.x, &mut panel.y, opts);
    let ytitle = format!("y(t + {lag})");
    decorate(&mut panel, opts, &prep, opts.xtitle_or("y(t)"), opts.ytitle_or(&ytitle));
    panel.legend = opts.legend.unwrap_or(false);
    let st = styles.next_trace(&prep.theme);
    let pairs = stats::lag_pairs(&prep.frame.column(0).values, lag);
    panel.push(Layer::Line(LineLayer::new(pairs, st.color).styled(st.line, st.marker).labeled(prep.labels[0].clone())));
    add_ref_lines(&mut panel, opts, &prep.theme)?;
    fig.push(panel);
    finish(fig, opts)
}

#[derive(Clone, Debug)]
pub struct BootstrapOptions {
    /// Values drawn per sample.
    pub size: usize,
    pub samples: usize,
    /// Fixed seed for reproducible draws; fresh entropy otherwise.
    pub seed: Option<u64>,
}

impl Default for BootstrapOptions {
    fn default() -> Self { Self { size: 50, samples: 500, seed: None } }
}

/// Mean, median and mid-range of repeated resamples: traces on top, histograms below.
pub fn bootstrap<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, boot: &BootstrapOptions) -> Result<Figure> {
    if boot.size == 0 || boot.samples == 0 {
        return Err(PlotError::invalid("bootstrap", "size and samples must be at least 1"));
    }
    let prep = prepare(PlotKind::Bootstrap, source, opts)?;
    let values = prep.frame.column(0).valid();
    if values.is_empty() {
        return Err(PlotError::EmptyInput(Some("no values to resample".into())));
    }
    let mut rng = match boot.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let result = stats::bootstrap(&values, boot.size, boot.samples, &mut rng);
    debug!(size = boot.size, samples = boot.samples, "bootstrap resampled");

    let mut fig = new_figure(opts, prep.theme);
    let color = prep.theme.cycle_color(0);
    let grid = opts.grid || prep.theme.grid_on;
    let rects = Figure::grid(2, 3);
    let series = [("Mean", &result.means), ("Median", &result.medians), ("Midrange", &result.midranges)];
    for (k, (name, stat)) in series.iter().enumerate() {
        // titles, limits, inversion and reference lines apply to the sample traces
        let mut trace = Panel::new(rects[k]);
        decorate(&mut trace, opts, &prep, opts.xtitle_or("Sample"), &opts.ytitle);
        trace.title = name.to_string();
        let points = stat.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect();
        trace.push(Layer::Line(LineLayer::new(points, color).width(1.0)));
        add_ref_lines(&mut trace, opts, &prep.theme)?;
        fig.push(trace);

        let mut hist = Panel::new(rects[k + 3]);
        hist.x.label = name.to_string();
        if opts.xlabel_rotation != 0.0 {
            hist.x.label_rotation = opts.xlabel_rotation;
        }
        hist.grid = grid;
        hist.y.limits.low = Some(0.0);
        let (edges, counts) = bin_counts(stat, 10);
        for (b, &count) in counts.iter().enumerate() {
            if count == 0.0 { continue; }
            let mut bar = PolygonLayer::rect(edges[b], 0.0, edges[b + 1], count, color);
            bar.edge = Some(prep.theme.axis_line);
            bar.edge_width = 0.6;
            hist.push(Layer::Polygon(bar));
        }
        fig.push(hist);
    }
    finish(fig, opts)
}
