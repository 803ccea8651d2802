// File: crates/tsplot-core/src/charts/heatmap.rs
// Summary: Calendar heat map of a daily series: one row per year, one column per day of year.

use chrono::Datelike;

use super::{add_ref_lines, decorate, finish, new_figure, prepare, PlotKind, PlotOptions};
use crate::axis::TickSource;
use crate::error::{PlotError, Result};
use crate::figure::{CellLayer, Colorbar, Figure, Layer, Panel, PanelRect};
use crate::frame::Index;
use crate::ingest::Source;
use crate::limits::Limits;
use crate::stats::min_max;

const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
/// Day of year of each month's first day in a common year.
const MONTH_STARTS: [u32; 12] = [1, 32, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

pub fn heatmap<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions) -> Result<Figure> {
    let prep = prepare(PlotKind::Heatmap, source, opts)?;
    let Index::DateTime(stamps) = &prep.frame.index else {
        return Err(PlotError::NotDatetimeIndex { kind: PlotKind::Heatmap.name() });
    };
    let daily = stamps.windows(2).all(|w| (w[1] - w[0]).num_seconds() == 86_400);
    if !daily {
        return Err(PlotError::NotDaily { kind: PlotKind::Heatmap.name() });
    }
    let values = &prep.frame.column(0).values;
    let (Some(first), Some(last)) = (stamps.first(), stamps.last()) else {
        return Err(PlotError::EmptyInput(None));
    };
    let (y0, y1) = (first.year(), last.year());
    let nyears = (y1 - y0 + 1) as usize;
    let mut cells = vec![f64::NAN; nyears * 366];
    for (t, &v) in stamps.iter().zip(values) {
        let row = (t.year() - y0) as usize;
        cells[row * 366 + t.ordinal0() as usize] = v;
    }
    let (vmin, vmax) = min_max(values).unwrap_or((0.0, 1.0));

    let mut fig = new_figure(opts, prep.theme);
    let mut panel = Panel::new(PanelRect::FULL);
    decorate(&mut panel, opts, &prep, &opts.xtitle, &opts.ytitle);
    panel.grid = false;
    // xlim is in days of the year, ylim in years
    let (x_lo, x_hi) = panel.x.limits.or_range(0.5, 366.5);
    let (y_lo, y_hi) = panel.y.limits.or_range(y0 as f64 - 0.5, y1 as f64 + 0.5);
    panel.x.limits = Limits::both(x_lo, x_hi);
    panel.y.limits = Limits::both(y_lo, y_hi);
    panel.y.inverted = !opts.invert_yaxis;
    panel.x.ticks = TickSource::Fixed(MONTH_STARTS.iter().zip(MONTHS).map(|(&d, m)| (d as f64, m.to_string())).collect());
    panel.y.ticks = TickSource::Fixed((y0..=y1).map(|y| (y as f64, y.to_string())).collect());
    if nyears > 12 {
        panel.y.label_skip = nyears.div_ceil(12);
    }
    panel.push(Layer::Cells(CellLayer {
        x_edges: (0..=366).map(|d| d as f64 + 0.5).collect(),
        y_edges: (0..=nyears).map(|r| y0 as f64 - 0.5 + r as f64).collect(),
        values: cells,
        vmin,
        vmax,
    }));
    panel.colorbar = Some(Colorbar { vmin, vmax, label: prep.labels[0].clone() });
    add_ref_lines(&mut panel, opts, &prep.theme)?;
    fig.push(panel);
    finish(fig, opts)
}
