// File: crates/tsplot-core/src/charts/distribution.rs
// Summary: Distribution charts: per-column histograms, kernel density estimates and box plots.

use super::{add_ref_lines, apply_scales, decorate, finish, grid_shape, new_figure, prepare, PlotKind, PlotOptions};
use crate::axis::TickSource;
use crate::color::with_alpha;
use crate::error::{PlotError, Result};
use crate::figure::{Figure, Layer, LineLayer, Panel, PanelRect, PolygonLayer};
use crate::ingest::Source;
use crate::scale::ScaleKind;
use crate::stats::{box_summary, histogram as bin_counts, GaussianKde};
use crate::style::{Hatch, LineStyle, Marker};

#[derive(Clone, Debug)]
pub struct HistogramOptions {
    pub bins: usize,
}

impl Default for HistogramOptions {
    fn default() -> Self { Self { bins: 10 } }
}

/// One histogram panel per column.
pub fn histogram<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, hist: &HistogramOptions) -> Result<Figure> {
    if hist.bins == 0 {
        return Err(PlotError::invalid("bins", "need at least one bin"));
    }
    let prep = prepare(PlotKind::Histogram, source, opts)?;
    let ncols = prep.frame.ncols();
    let mut styles = opts.line_styles(ncols)?;
    let mut fig = new_figure(opts, prep.theme);
    let (rows, cols) = grid_shape(ncols);
    let rects = Figure::grid(rows, cols);

    for ((col, label), rect) in prep.frame.columns.iter().zip(&prep.labels).zip(rects) {
        let st = styles.next_trace(&prep.theme);
        let mut panel = Panel::new(rect);
        apply_scales(&mut panel.x, &mut panel.y, opts);
        decorate(&mut panel, opts, &prep, &opts.xtitle, opts.ytitle_or("Count"));
        panel.title = label.clone();
        if panel.y.kind == ScaleKind::Linear {
            panel.y.limits.low = panel.y.limits.low.or(Some(0.0));
        }
        let (edges, counts) = bin_counts(&col.valid(), hist.bins);
        for (k, &count) in counts.iter().enumerate() {
            if count == 0.0 { continue; }
            let mut rect = PolygonLayer::rect(edges[k], 0.0, edges[k + 1], count, st.color);
            rect.edge = Some(prep.theme.axis_line);
            rect.edge_width = 0.6;
            panel.push(Layer::Polygon(rect));
        }
        add_ref_lines(&mut panel, opts, &prep.theme)?;
        fig.push(panel);
    }
    if opts.sharex && ncols > 1 {
        fig.share_x();
    }
    if opts.sharey && ncols > 1 {
        fig.share_y();
    }
    finish(fig, opts)
}

/// Gaussian kernel density estimate of every column on one panel.
pub fn kde<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions) -> Result<Figure> {
    let prep = prepare(PlotKind::Kde, source, opts)?;
    let ncols = prep.frame.ncols();
    let mut styles = opts.line_styles(ncols)?;
    let mut fig = new_figure(opts, prep.theme);

    let mut panel = Panel::new(PanelRect::FULL);
    apply_scales(&mut panel.x, &mut panel.y, opts);
    decorate(&mut panel, opts, &prep, &opts.xtitle, opts.ytitle_or("Density"));
    panel.legend = opts.legend.unwrap_or(true);
    for (col, label) in prep.frame.columns.iter().zip(&prep.labels) {
        let st = styles.next_trace(&prep.theme);
        let kde = GaussianKde::new(&col.valid())?;
        let xs = kde.default_support(1000);
        let ys = kde.evaluate_many(&xs);
        let line = LineLayer::new(xs.into_iter().zip(ys).collect(), st.color).styled(st.line, st.marker).labeled(label.clone());
        panel.push(Layer::Line(line));
    }
    add_ref_lines(&mut panel, opts, &prep.theme)?;
    fig.push(panel);
    finish(fig, opts)
}

/// Alias of [`kde`].
pub fn probability_density<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions) -> Result<Figure> {
    kde(source, opts)
}

#[derive(Clone, Debug)]
pub struct BoxplotOptions {
    /// Vertical boxes; horizontal when false.
    pub vert: bool,
}

impl Default for BoxplotOptions {
    fn default() -> Self { Self { vert: true } }
}

/// Box and whisker plot, one box per column.
pub fn boxplot<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, boxes: &BoxplotOptions) -> Result<Figure> {
    let prep = prepare(PlotKind::Boxplot, source, opts)?;
    let ncols = prep.frame.ncols();
    let mut styles = opts.line_styles(ncols)?;
    let mut fig = new_figure(opts, prep.theme);

    let mut panel = Panel::new(PanelRect::FULL);
    apply_scales(&mut panel.x, &mut panel.y, opts);
    decorate(&mut panel, opts, &prep, &opts.xtitle, &opts.ytitle);
    // points are given as (position, value) and swapped for horizontal boxes
    let orient = |p: (f64, f64)| if boxes.vert { p } else { (p.1, p.0) };
    let half = 0.25;
    for (i, col) in prep.frame.columns.iter().enumerate() {
        let st = styles.next_trace(&prep.theme);
        let Some(s) = box_summary(&col.values) else { continue };
        let c = i as f64;
        let ink = st.color;
        panel.push(Layer::Polygon(PolygonLayer {
            points: [(c - half, s.q1), (c + half, s.q1), (c + half, s.q3), (c - half, s.q3)].into_iter().map(orient).collect(),
            fill: Some(with_alpha(ink, 40)),
            edge: Some(ink),
            edge_width: 1.2,
            hatch: Hatch::None,
            label: None,
        }));
        let seg = |a: (f64, f64), b: (f64, f64), width: f32| {
            Layer::Line(LineLayer::new(vec![orient(a), orient(b)], ink).width(width))
        };
        panel.push(seg((c - half, s.median), (c + half, s.median), 2.0));
        panel.push(seg((c, s.q1), (c, s.whisker_low), 1.2));
        panel.push(seg((c, s.q3), (c, s.whisker_high), 1.2));
        panel.push(seg((c - half / 2.0, s.whisker_low), (c + half / 2.0, s.whisker_low), 1.2));
        panel.push(seg((c - half / 2.0, s.whisker_high), (c + half / 2.0, s.whisker_high), 1.2));
        if !s.fliers.is_empty() {
            let fliers = s.fliers.iter().map(|&v| orient((c, v))).collect();
            let mut pts = LineLayer::new(fliers, ink).styled(LineStyle::None, Marker::Circle);
            pts.marker_size = 4.0;
            panel.push(Layer::Line(pts));
        }
    }
    let cat_axis = if boxes.vert { &mut panel.x } else { &mut panel.y };
    cat_axis.kind = ScaleKind::Linear;
    cat_axis.ticks = TickSource::Categories(prep.labels.clone());
    cat_axis.limits.low = cat_axis.limits.low.or(Some(-0.5));
    cat_axis.limits.high = cat_axis.limits.high.or(Some(ncols as f64 - 0.5));
    add_ref_lines(&mut panel, opts, &prep.theme)?;
    fig.push(panel);
    finish(fig, opts)
}
