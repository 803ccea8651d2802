// File: crates/tsplot-core/src/charts/waterfall.rs
// Summary: Waterfall chart: step changes of a running total as floating bars, closed by a total bar.

use skia_safe as skia;

use super::{add_ref_lines, apply_scales, decorate, finish, new_figure, prepare, PlotKind, PlotOptions};
use crate::axis::TickSource;
use crate::color::ColorSpec;
use crate::error::{PlotError, Result};
use crate::figure::{Figure, Layer, LineLayer, Panel, PanelRect, PolygonLayer, TextLayer};
use crate::frame::format_number;
use crate::ingest::Source;
use crate::style::{LineStyle, Marker};
use crate::text::Anchor;

#[derive(Clone, Debug)]
pub struct WaterfallOptions {
    pub rise_color: ColorSpec,
    pub fall_color: ColorSpec,
    pub total_color: ColorSpec,
    pub line_color: ColorSpec,
    /// Print each change at the top of its bar.
    pub bar_labels: bool,
    pub total_label: String,
}

impl Default for WaterfallOptions {
    fn default() -> Self {
        Self {
            rise_color: ColorSpec::Rgba(skia::Color::from_rgb(0x2c, 0xa0, 0x2c)),
            fall_color: ColorSpec::Rgba(skia::Color::from_rgb(0xd6, 0x27, 0x28)),
            total_color: ColorSpec::Rgba(skia::Color::from_rgb(0x1f, 0x77, 0xb4)),
            line_color: ColorSpec::Rgba(skia::Color::RED),
            bar_labels: true,
            total_label: "Total".to_string(),
        }
    }
}

/// One floating bar: where it starts and ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Step {
    pub base: f64,
    pub top: f64,
}

impl Step {
    pub fn change(&self) -> f64 { self.top - self.base }
}

/// The column holds the running total; each bar spans the previous total to the current one.
pub(crate) fn steps(totals: &[f64]) -> Vec<Step> {
    let mut prev = 0.0;
    totals
        .iter()
        .map(|&t| {
            let t = (t * 100.0).round() / 100.0;
            let step = Step { base: prev, top: t };
            prev = t;
            step
        })
        .collect()
}

pub fn waterfall<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, wf: &WaterfallOptions) -> Result<Figure> {
    let prep = prepare(PlotKind::Waterfall, source, opts)?;
    if prep.frame.ncols() != 1 {
        return Err(PlotError::SeriesCount { kind: PlotKind::Waterfall.name(), expected: 1, found: prep.frame.ncols() });
    }
    let theme = prep.theme;
    let steps = steps(&prep.frame.column(0).valid());
    let Some(total) = steps.last().map(|s| s.top) else {
        return Err(PlotError::EmptyInput(None));
    };
    let mut fig = new_figure(opts, theme);

    let mut panel = Panel::new(PanelRect::FULL);
    apply_scales(&mut panel.x, &mut panel.y, opts);
    decorate(&mut panel, opts, &prep, &opts.xtitle, &opts.ytitle);

    let half = 0.4;
    let (rise, fall) = (wf.rise_color.resolve(&theme), wf.fall_color.resolve(&theme));
    let value_label = |x: f64, y: f64, v: f64| {
        let mut t = TextLayer::new(x, y, format_number((v * 100.0).round() / 100.0));
        t.anchor = Anchor::Center;
        Layer::Text(t)
    };
    for (i, s) in steps.iter().enumerate() {
        let x = i as f64;
        let color = if s.change() >= 0.0 { rise } else { fall };
        let mut bar = PolygonLayer::rect(x - half, s.base, x + half, s.top, color);
        bar.edge = Some(theme.axis_line);
        bar.edge_width = 0.8;
        panel.push(Layer::Polygon(bar));
        if wf.bar_labels {
            panel.push(value_label(x, s.base.max(s.top), s.change()));
        }
    }
    let n = steps.len() as f64;
    let mut closing = PolygonLayer::rect(n - half, 0.0, n + half, total, wf.total_color.resolve(&theme));
    closing.edge = Some(theme.axis_line);
    closing.edge_width = 0.8;
    panel.push(Layer::Polygon(closing));
    if wf.bar_labels {
        panel.push(value_label(n, total.max(0.0), total));
    }

    let running: Vec<(f64, f64)> = steps.iter().enumerate().map(|(i, s)| (i as f64, s.top)).chain([(n, total)]).collect();
    let line = LineLayer::new(running, wf.line_color.resolve(&theme)).styled(LineStyle::Solid, Marker::Point);
    panel.push(Layer::Line(line));

    let mut categories: Vec<String> = (0..prep.frame.nrows()).map(|i| prep.frame.index.label(i)).collect();
    categories.truncate(steps.len());
    categories.push(wf.total_label.clone());
    panel.x.ticks = TickSource::Categories(categories);
    panel.x.margin = 0.0;
    panel.x.limits.low = panel.x.limits.low.or(Some(-0.6));
    panel.x.limits.high = panel.x.limits.high.or(Some(n + 0.6));
    add_ref_lines(&mut panel, opts, &theme)?;
    fig.push(panel);
    finish(fig, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_float_between_totals() {
        let s = steps(&[10.0, 15.0, 12.0]);
        assert_eq!(s[0], Step { base: 0.0, top: 10.0 });
        assert_eq!(s[1].change(), 5.0);
        assert_eq!(s[2], Step { base: 15.0, top: 12.0 });
        assert!(s[2].change() < 0.0);
    }

    #[test]
    fn totals_round_to_cents() {
        let s = steps(&[1.004, 2.006]);
        assert_eq!(s[0].top, 1.0);
        assert_eq!(s[1].top, 2.01);
    }
}
