// File: crates/tsplot-core/src/charts/probability.rs
// Summary: Probability plots: sorted values against plotting positions on a normal, log-normal or Weibull axis.

use super::{add_ref_lines, decorate, finish, ignore_scale, new_figure, prepare, PlotKind, PlotOptions};
use crate::error::Result;
use crate::figure::{Figure, Layer, LineLayer, Panel, PanelRect};
use crate::ingest::Source;
use crate::limits::{know_your_limits, AxisScale};
use crate::scale::ScaleKind;
use crate::stats::{Distribution, PlottingPosition};

#[derive(Clone, Debug, Default)]
pub struct ProbabilityOptions {
    pub plotting_position: PlottingPosition,
}

pub fn norm_xaxis<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, prob: &ProbabilityOptions) -> Result<Figure> {
    build(PlotKind::NormXaxis, source.into(), opts, prob)
}

pub fn norm_yaxis<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, prob: &ProbabilityOptions) -> Result<Figure> {
    build(PlotKind::NormYaxis, source.into(), opts, prob)
}

pub fn lognorm_xaxis<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, prob: &ProbabilityOptions) -> Result<Figure> {
    build(PlotKind::LognormXaxis, source.into(), opts, prob)
}

pub fn lognorm_yaxis<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, prob: &ProbabilityOptions) -> Result<Figure> {
    build(PlotKind::LognormYaxis, source.into(), opts, prob)
}

pub fn weibull_xaxis<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, prob: &ProbabilityOptions) -> Result<Figure> {
    build(PlotKind::WeibullXaxis, source.into(), opts, prob)
}

pub fn weibull_yaxis<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, prob: &ProbabilityOptions) -> Result<Figure> {
    build(PlotKind::WeibullYaxis, source.into(), opts, prob)
}

/// Distribution and whether probability runs along x.
fn layout(kind: PlotKind) -> (Distribution, bool) {
    match kind {
        PlotKind::NormXaxis => (Distribution::Normal, true),
        PlotKind::NormYaxis => (Distribution::Normal, false),
        PlotKind::LognormXaxis => (Distribution::LogNormal, true),
        PlotKind::LognormYaxis => (Distribution::LogNormal, false),
        PlotKind::WeibullXaxis => (Distribution::Weibull, true),
        _ => (Distribution::Weibull, false),
    }
}

fn build(kind: PlotKind, source: Source<'_>, opts: &PlotOptions, prob: &ProbabilityOptions) -> Result<Figure> {
    let (dist, on_x) = layout(kind);
    // the probability axis takes its own limits; a log request on it does not apply
    let mut opts = opts.clone();
    let (prob_lim, prob_scale) = if on_x {
        (opts.xlim.take(), std::mem::replace(&mut opts.xaxis, AxisScale::Arithmetic))
    } else {
        (opts.ylim.take(), std::mem::replace(&mut opts.yaxis, AxisScale::Arithmetic))
    };
    ignore_scale(kind, if on_x { "x" } else { "y" }, prob_scale, AxisScale::Normal);
    let prob_lim = know_your_limits(prob_lim, AxisScale::Normal)?;

    let prep = prepare(kind, source, &opts)?;
    let ncols = prep.frame.ncols();
    let mut styles = opts.scatter_styles(ncols)?;
    let mut fig = new_figure(&opts, prep.theme);

    let mut panel = Panel::new(PanelRect::FULL);
    let (xtitle, ytitle) = if on_x {
        (opts.xtitle_or(dist.label()).to_string(), opts.ytitle.clone())
    } else {
        (opts.xtitle.clone(), opts.ytitle_or(dist.label()).to_string())
    };
    decorate(&mut panel, &opts, &prep, &xtitle, &ytitle);
    let (prob_axis, value_axis, value_scale) =
        if on_x { (&mut panel.x, &mut panel.y, opts.yaxis) } else { (&mut panel.y, &mut panel.x, opts.xaxis) };
    prob_axis.kind = ScaleKind::Probability(dist);
    prob_axis.limits = prob_lim.unwrap_or_default();
    value_axis.kind = value_scale.scale_kind();
    panel.legend = opts.legend.unwrap_or(true);

    for (col, label) in prep.frame.columns.iter().zip(&prep.labels) {
        let st = styles.next_trace(&prep.theme);
        let mut values = col.valid();
        values.sort_by(f64::total_cmp);
        let pp = prob.plotting_position.positions(values.len());
        let points = pp
            .into_iter()
            .zip(values)
            .map(|(p, v)| if on_x { (p, v) } else { (v, p) })
            .collect();
        panel.push(Layer::Line(LineLayer::new(points, st.color).styled(st.line, st.marker).labeled(label.clone())));
    }
    add_ref_lines(&mut panel, &opts, &prep.theme)?;
    fig.push(panel);
    finish(fig, &opts)
}
