// File: crates/tsplot-core/src/charts/time.rs
// Summary: Time-indexed line charts: `time`, `kde_time` and the hydrograph/hyetograph `handh`.

use tracing::debug;

use super::{add_ref_lines, apply_scales, decorate, finish, new_figure, prepare, PlotKind, PlotOptions, Prepared};
use crate::axis::TickSource;
use crate::error::{PlotError, Result};
use crate::figure::{Figure, Layer, LineLayer, Panel, PanelRect, PolygonLayer};
use crate::ingest::Source;
use crate::stats::GaussianKde;
use crate::style::{Marker, StyleCycle};

/// Line chart of every column against a date/time index.
pub fn time<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions) -> Result<Figure> {
    let prep = prepare(PlotKind::Time, source, opts)?;
    let ncols = prep.frame.ncols();
    let mut styles = opts.line_styles(ncols)?;
    let mut fig = new_figure(opts, prep.theme);

    if opts.subplots {
        for (i, rect) in Figure::grid(ncols, 1).into_iter().enumerate() {
            let mut panel = time_panel(rect, opts, &prep);
            panel.y.label = opts.ytitle_or(&prep.labels[i]).to_string();
            push_series(&mut panel, &prep, opts, &mut styles, &[i])?;
            add_ref_lines(&mut panel, opts, &prep.theme)?;
            fig.push(panel);
        }
        if opts.sharex {
            fig.share_x();
        }
        if opts.sharey {
            fig.share_y();
        }
    } else {
        let mut panel = time_panel(PanelRect::FULL, opts, &prep);
        let all: Vec<usize> = (0..ncols).collect();
        push_series(&mut panel, &prep, opts, &mut styles, &all)?;
        add_ref_lines(&mut panel, opts, &prep.theme)?;
        fig.push(panel);
    }
    finish(fig, opts)
}

fn time_panel(rect: PanelRect, opts: &PlotOptions, prep: &Prepared) -> Panel {
    let mut panel = Panel::new(rect);
    apply_scales(&mut panel.x, &mut panel.y, opts);
    decorate(&mut panel, opts, prep, &opts.xtitle, &opts.ytitle);
    panel.x.ticks = TickSource::Dates;
    panel.legend = opts.legend.unwrap_or(true);
    panel
}

/// Add columns `cols` as lines, routing `secondary_y` columns to a right-hand axis.
fn push_series(
    panel: &mut Panel,
    prep: &Prepared,
    opts: &PlotOptions,
    styles: &mut StyleCycle,
    cols: &[usize],
) -> Result<()> {
    let names = prep.frame.names();
    for name in &opts.secondary_y {
        if !names.contains(name) {
            return Err(PlotError::UnknownColumn(name.clone()));
        }
    }
    let xs = prep.frame.index.x_values();
    for &i in cols {
        let col = prep.frame.column(i);
        let secondary = opts.secondary_y.contains(&col.name);
        let st = styles.next_trace(&prep.theme);
        let mut label = prep.labels[i].clone();
        if secondary && opts.mark_right {
            label.push_str(" (right)");
        }
        let mut line = LineLayer::new(xs.iter().copied().zip(col.values.iter().copied()).collect(), st.color)
            .styled(st.line, st.marker)
            .labeled(label);
        line.draw_style = opts.drawstyle;
        line.secondary = secondary;
        if secondary && panel.y2.is_none() {
            let mut y2 = panel.y.clone();
            y2.label = String::new();
            y2.limits = Default::default();
            y2.inverted = false;
            panel.y2 = Some(y2);
        }
        panel.push(Layer::Line(line));
    }
    Ok(())
}

/// Time series with a density estimate of its values in a narrow side panel.
pub fn kde_time<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions) -> Result<Figure> {
    let prep = prepare(PlotKind::KdeTime, source, opts)?;
    let ncols = prep.frame.ncols();
    let mut styles = opts.line_styles(ncols)?;
    let mut fig = new_figure(opts, prep.theme);

    let mut ts = time_panel(PanelRect::new(0.0, 0.0, 0.8, 1.0), opts, &prep);
    let all: Vec<usize> = (0..ncols).collect();
    push_series(&mut ts, &prep, opts, &mut styles, &all)?;
    add_ref_lines(&mut ts, opts, &prep.theme)?;

    let mut density = Panel::new(PanelRect::new(0.8, 0.0, 1.0, 1.0));
    density.x.label = "Density".to_string();
    density.y.kind = ts.y.kind;
    density.y.limits = ts.y.limits;
    density.y.inverted = ts.y.inverted;
    density.y.ticks = TickSource::Hidden;
    density.grid = ts.grid;
    styles.rewind();
    for col in &prep.frame.columns {
        let st = styles.next_trace(&prep.theme);
        let kde = GaussianKde::new(&col.valid())?;
        let grid = kde.default_support(1000);
        let dens = kde.evaluate_many(&grid);
        let points = dens.into_iter().zip(grid).collect();
        density.push(Layer::Line(LineLayer::new(points, st.color).styled(st.line, Marker::None)));
    }
    fig.push(ts);
    fig.push(density);
    if opts.ylim.is_none() {
        // both panels share the value axis
        fig.share_y();
    }
    finish(fig, opts)
}

/// Hydrograph (first column, lines) under a hyetograph (second column, bars hanging from the top).
pub fn handh<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions) -> Result<Figure> {
    let prep = prepare(PlotKind::Handh, source, opts)?;
    if prep.frame.ncols() != 2 {
        return Err(PlotError::SeriesCount { kind: PlotKind::Handh.name(), expected: 2, found: prep.frame.ncols() });
    }
    let mut styles = opts.line_styles(2)?;
    let mut fig = new_figure(opts, prep.theme);
    let xs = prep.frame.index.x_values();

    let flow_style = styles.next_trace(&prep.theme);
    let rain_style = styles.next_trace(&prep.theme);

    let mut rain = Panel::new(PanelRect::new(0.0, 0.0, 1.0, 1.0 / 3.0));
    rain.y.label = prep.labels[1].clone();
    rain.y.inverted = true;
    rain.y.limits.low = Some(0.0);
    rain.x.ticks = TickSource::Hidden;
    rain.grid = opts.grid || prep.theme.grid_on;
    if let Some(l) = prep.xlim {
        rain.x.limits = l;
    }
    let width = median_step(&xs);
    for (&x, &v) in xs.iter().zip(&prep.frame.column(1).values) {
        if v.is_nan() { continue; }
        rain.push(Layer::Polygon(PolygonLayer::rect(x - width / 2.0, 0.0, x + width / 2.0, v, rain_style.color)));
    }

    let mut flow = time_panel(PanelRect::new(0.0, 1.0 / 3.0, 1.0, 1.0), opts, &prep);
    flow.y.label = opts.ytitle_or(&prep.labels[0]).to_string();
    flow.legend = opts.legend.unwrap_or(false);
    let mut line = LineLayer::new(xs.iter().copied().zip(prep.frame.column(0).values.iter().copied()).collect(), flow_style.color)
        .styled(flow_style.line, flow_style.marker)
        .labeled(prep.labels[0].clone());
    line.draw_style = opts.drawstyle;
    flow.push(Layer::Line(line));
    add_ref_lines(&mut flow, opts, &prep.theme)?;

    fig.push(rain);
    fig.push(flow);
    fig.share_x();
    debug!(bar_width = width, "hyetograph bars");
    finish(fig, opts)
}

/// Median spacing of sorted positions (bar width for regular series).
pub(crate) fn median_step(xs: &[f64]) -> f64 {
    let mut steps: Vec<f64> = xs.windows(2).map(|w| (w[1] - w[0]).abs()).filter(|d| *d > 0.0).collect();
    if steps.is_empty() { return 1.0; }
    steps.sort_by(f64::total_cmp);
    steps[steps.len() / 2] * 0.8
}
