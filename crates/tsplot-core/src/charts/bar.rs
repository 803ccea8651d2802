// File: crates/tsplot-core/src/charts/bar.rs
// Summary: Grouped and stacked bar charts, vertical and horizontal, with hatch cycling.

use super::{add_ref_lines, apply_scales, decorate, finish, new_figure, prepare, PlotKind, PlotOptions};
use crate::axis::{Axis, TickSource};
use crate::error::Result;
use crate::figure::{Figure, Layer, Panel, PanelRect, PolygonLayer};
use crate::ingest::Source;
use crate::style::{prepare_hatches, StyleList};

#[derive(Clone, Debug)]
pub struct BarOptions {
    pub hatchstyles: StyleList,
    /// Category label rotation in degrees.
    pub label_rotation: f32,
    /// Label every n-th category only.
    pub label_skip: usize,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self { hatchstyles: StyleList::Auto, label_rotation: 0.0, label_skip: 1 }
    }
}

/// Grouped vertical bars, one group per index entry.
pub fn bar<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, bars: &BarOptions) -> Result<Figure> {
    build(PlotKind::Bar, source.into(), opts, bars)
}

pub fn barh<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, bars: &BarOptions) -> Result<Figure> {
    build(PlotKind::Barh, source.into(), opts, bars)
}

/// Vertical bars stacked per index entry; negative values stack downwards.
pub fn bar_stacked<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, bars: &BarOptions) -> Result<Figure> {
    build(PlotKind::BarStacked, source.into(), opts, bars)
}

pub fn barh_stacked<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, bars: &BarOptions) -> Result<Figure> {
    build(PlotKind::BarhStacked, source.into(), opts, bars)
}

const GROUP_WIDTH: f64 = 0.8;

fn build(kind: PlotKind, source: Source<'_>, opts: &PlotOptions, bars: &BarOptions) -> Result<Figure> {
    let prep = prepare(kind, source, opts)?;
    let horizontal = matches!(kind, PlotKind::Barh | PlotKind::BarhStacked);
    let stacked = matches!(kind, PlotKind::BarStacked | PlotKind::BarhStacked);
    let (nrows, ncols) = (prep.frame.nrows(), prep.frame.ncols());
    let mut styles = opts.line_styles(ncols)?;
    let hatches = prepare_hatches(&bars.hatchstyles)?;
    let mut fig = new_figure(opts, prep.theme);

    let mut panel = Panel::new(PanelRect::FULL);
    apply_scales(&mut panel.x, &mut panel.y, opts);
    decorate(&mut panel, opts, &prep, &opts.xtitle, &opts.ytitle);
    panel.legend = opts.legend.unwrap_or(true);

    let categories: Vec<String> = (0..nrows).map(|i| prep.frame.index.label(i)).collect();
    let mut pos_stack = vec![0.0; nrows];
    let mut neg_stack = vec![0.0; nrows];
    let width = if stacked { GROUP_WIDTH } else { GROUP_WIDTH / ncols as f64 };
    let mut value_min = f64::INFINITY;
    for (c, col) in prep.frame.columns.iter().enumerate() {
        let st = styles.next_trace(&prep.theme);
        let hatch = hatches[c % hatches.len()];
        let mut first = true;
        for (r, &v) in col.values.iter().enumerate() {
            if v.is_nan() { continue; }
            let (lo_edge, base, top) = if stacked {
                let stack = if v >= 0.0 { &mut pos_stack[r] } else { &mut neg_stack[r] };
                let base = *stack;
                *stack += v;
                (r as f64 - width / 2.0, base, *stack)
            } else {
                (r as f64 - GROUP_WIDTH / 2.0 + c as f64 * width, 0.0, v)
            };
            value_min = value_min.min(base.min(top));
            let (x0, y0, x1, y1) = if horizontal {
                (base, lo_edge, top, lo_edge + width)
            } else {
                (lo_edge, base, lo_edge + width, top)
            };
            let mut rect = PolygonLayer::rect(x0, y0, x1, y1, st.color);
            rect.edge = Some(prep.theme.axis_line);
            rect.edge_width = 0.6;
            rect.hatch = hatch;
            if first {
                rect.label = Some(prep.labels[c].clone());
                first = false;
            }
            panel.push(Layer::Polygon(rect));
        }
    }

    let (cat_axis, value_axis): (&mut Axis, &mut Axis) =
        if horizontal { (&mut panel.y, &mut panel.x) } else { (&mut panel.x, &mut panel.y) };
    cat_axis.ticks = TickSource::Categories(categories);
    cat_axis.label_skip = bars.label_skip.max(1);
    if bars.label_rotation != 0.0 {
        cat_axis.label_rotation = bars.label_rotation;
    }
    cat_axis.margin = 0.0;
    cat_axis.limits.low = cat_axis.limits.low.or(Some(-0.5));
    cat_axis.limits.high = cat_axis.limits.high.or(Some(nrows as f64 - 0.5));
    if value_min >= 0.0 && value_axis.limits.low.is_none() && value_axis.kind == crate::scale::ScaleKind::Linear {
        value_axis.limits.low = Some(0.0);
    }

    add_ref_lines(&mut panel, opts, &prep.theme)?;
    fig.push(panel);
    finish(fig, opts)
}
