// File: crates/tsplot-core/src/charts/skill.rs
// Summary: Model skill diagrams comparing simulated series against the first (reference) column.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use skia_safe as skia;
use tracing::debug;

use super::{add_ref_lines, decorate, finish, ignore_scale, new_figure, prepare, PlotKind, PlotOptions, Prepared};
use crate::error::{PlotError, Result};
use crate::figure::{Figure, Layer, LineLayer, Orientation, Panel, PanelRect, RefLine, TextLayer};
use crate::frame::format_number;
use crate::ingest::Source;
use crate::limits::AxisScale;
use crate::scale::nice_ticks;
use crate::stats::{bias, centered_rmsd, correlation, paired_valid, rmsd, std_dev};
use crate::style::{LineStyle, Marker};
use crate::text::Anchor;

/// Statistics of one simulated series against the reference.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Skill {
    pub std: f64,
    pub ref_std: f64,
    pub corr: f64,
    pub bias: f64,
    pub crmsd: f64,
    pub rmsd: f64,
}

impl Skill {
    pub(crate) fn of(sim: &[f64], reference: &[f64]) -> Option<Self> {
        let (s, r) = paired_valid(sim, reference);
        if s.len() < 2 {
            return None;
        }
        Some(Self {
            std: std_dev(&s),
            ref_std: std_dev(&r),
            corr: correlation(&s, &r),
            bias: bias(&s, &r),
            crmsd: centered_rmsd(&s, &r),
            rmsd: rmsd(&s, &r),
        })
    }

    /// Centered RMSD carrying the sign of `std - ref_std`.
    pub(crate) fn signed_crmsd(&self) -> f64 {
        if self.std >= self.ref_std { self.crmsd } else { -self.crmsd }
    }
}

/// Reference first, every other column compared against it.
fn skills(kind: PlotKind, prep: &Prepared) -> Result<Vec<Skill>> {
    let ncols = prep.frame.ncols();
    if ncols < 2 {
        return Err(PlotError::SeriesCount { kind: kind.name(), expected: 2, found: ncols });
    }
    let reference = &prep.frame.column(0).values;
    let mut out = Vec::with_capacity(ncols - 1);
    for col in &prep.frame.columns[1..] {
        let skill = Skill::of(&col.values, reference)
            .ok_or_else(|| PlotError::EmptyInput(Some(format!("'{}' shares fewer than two values with the reference", col.name))))?;
        debug!(series = %col.name, ?skill, "skill statistics");
        out.push(skill);
    }
    Ok(out)
}

fn arc(cx: f64, cy: f64, r: f64, from: f64, to: f64) -> Vec<(f64, f64)> {
    (0..=120)
        .map(|i| from + (to - from) * i as f64 / 120.0)
        .map(|t| (cx + r * t.cos(), cy + r * t.sin()))
        .collect()
}

fn guide(points: Vec<(f64, f64)>, color: skia::Color, style: LineStyle) -> Layer {
    Layer::Line(LineLayer::new(points, color).styled(style, Marker::None).width(0.8))
}

fn text(x: f64, y: f64, s: impl Into<String>, color: skia::Color, anchor: Anchor, rotation: f32) -> Layer {
    let mut t = TextLayer::new(x, y, s);
    t.color = Some(color);
    t.anchor = anchor;
    t.rotation = rotation;
    Layer::Text(t)
}

/// Smallest round number at or above `v`.
fn round_up(v: f64) -> f64 {
    match nice_ticks(0.0, v, 5).as_slice() {
        [a, b, ..] => (v / (b - a) - 1e-9).ceil() * (b - a),
        _ => v,
    }
}

const CORRELATIONS: [f64; 11] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.95, 0.99];

/// Taylor diagram: standard deviation as radius, correlation as angle,
/// with centered-RMS difference arcs about the reference point.
pub fn taylor<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions) -> Result<Figure> {
    let prep = prepare(PlotKind::Taylor, source, opts)?;
    let sk = skills(PlotKind::Taylor, &prep)?;
    ignore_scale(PlotKind::Taylor, "x", opts.xaxis, AxisScale::Arithmetic);
    ignore_scale(PlotKind::Taylor, "y", opts.yaxis, AxisScale::Arithmetic);
    let mut styles = opts.scatter_styles(sk.len())?;
    let theme = prep.theme;
    let mut fig = new_figure(opts, theme);

    let ref_std = sk[0].ref_std;
    let smax = sk.iter().map(|s| s.std).fold(ref_std, f64::max);
    let rmax = round_up(smax * 1.1).max(f64::MIN_POSITIVE);
    let half = sk.iter().any(|s| s.corr < 0.0);
    let tmax = if half { PI } else { FRAC_PI_2 };

    let mut panel = Panel::new(PanelRect::FULL);
    let std_title = opts.xtitle_or("Standard Deviation").to_string();
    let ytitle = if half { opts.ytitle.clone() } else { opts.ytitle_or("Standard Deviation").to_string() };
    decorate(&mut panel, opts, &prep, &std_title, &ytitle);
    panel.grid = false;
    panel.equal_aspect = true;
    panel.legend = opts.legend.unwrap_or(true);
    panel.x.margin = 0.0;
    panel.y.margin = 0.0;
    panel.x.limits.low = panel.x.limits.low.or(Some(if half { -rmax * 1.15 } else { 0.0 }));
    panel.x.limits.high = panel.x.limits.high.or(Some(rmax * 1.15));
    panel.y.limits.low = panel.y.limits.low.or(Some(0.0));
    panel.y.limits.high = panel.y.limits.high.or(Some(rmax * 1.15));

    // frame: outer arc and the bounding radii
    panel.push(guide(arc(0.0, 0.0, rmax, 0.0, tmax), theme.axis_line, LineStyle::Solid));
    panel.push(guide(vec![(0.0, 0.0), (rmax, 0.0)], theme.axis_line, LineStyle::Solid));
    panel.push(guide(vec![(0.0, 0.0), (rmax * tmax.cos(), rmax * tmax.sin())], theme.axis_line, LineStyle::Solid));

    for r in nice_ticks(0.0, rmax, 5).into_iter().filter(|&r| r > 0.0 && r < rmax) {
        panel.push(guide(arc(0.0, 0.0, r, 0.0, tmax), theme.grid, LineStyle::Dotted));
    }

    let mut spokes = CORRELATIONS.to_vec();
    spokes.push(0.0);
    if half {
        spokes.extend(CORRELATIONS.iter().map(|c| -c));
    }
    for c in spokes {
        let t = c.acos();
        let (ct, st) = (t.cos(), t.sin());
        panel.push(guide(vec![(0.0, 0.0), (rmax * ct, rmax * st)], theme.grid, LineStyle::Dotted));
        let anchor = if ct >= 0.0 { Anchor::Left } else { Anchor::Right };
        panel.push(text(rmax * 1.02 * ct, rmax * 1.02 * st, format_number(c), theme.text, anchor, 0.0));
    }
    let label_angle = if half { FRAC_PI_2 - 0.15 } else { FRAC_PI_4 };
    panel.push(text(
        rmax * 1.1 * label_angle.cos(),
        rmax * 1.1 * label_angle.sin(),
        "Correlation",
        theme.text,
        Anchor::Center,
        (label_angle.to_degrees() - 90.0) as f32,
    ));

    // centered RMS difference arcs about the reference, kept inside the outer arc
    let rms_color = skia::Color::from_rgb(0x2c, 0xa0, 0x2c);
    for r in nice_ticks(0.0, rmax, 5).into_iter().filter(|&r| r > 0.0) {
        let points: Vec<(f64, f64)> = arc(ref_std, 0.0, r, 0.0, PI)
            .into_iter()
            .map(|(x, y)| if x.hypot(y) <= rmax && y.atan2(x) <= tmax { (x, y) } else { (f64::NAN, f64::NAN) })
            .collect();
        if points.iter().all(|p| p.0.is_nan()) { continue; }
        panel.push(guide(points, rms_color, LineStyle::Dashed));
        let (lx, ly) = (ref_std + r * (2.0 * PI / 3.0).cos(), r * (2.0 * PI / 3.0).sin());
        if lx.hypot(ly) < rmax {
            panel.push(text(lx, ly, format_number(r), rms_color, Anchor::Center, 0.0));
        }
    }
    panel.push(guide(arc(0.0, 0.0, ref_std, 0.0, tmax), theme.axis_line, LineStyle::Dashed));

    let mut reference = LineLayer::new(vec![(ref_std, 0.0)], theme.axis_line)
        .styled(LineStyle::None, Marker::Star)
        .labeled(prep.labels[0].clone());
    reference.marker_size = 10.0;
    panel.push(Layer::Line(reference));
    for (s, label) in sk.iter().zip(&prep.labels[1..]) {
        let st = styles.next_trace(&theme);
        let t = s.corr.clamp(-1.0, 1.0).acos();
        let marker = if st.marker.is_none() { Marker::Circle } else { st.marker };
        let mut pt = LineLayer::new(vec![(s.std * t.cos(), s.std * t.sin())], st.color)
            .styled(LineStyle::None, marker)
            .labeled(label.clone());
        pt.marker_size = 8.0;
        panel.push(Layer::Line(pt));
    }
    add_ref_lines(&mut panel, opts, &theme)?;
    fig.push(panel);
    finish(fig, opts)
}

/// Target diagram: bias against signed centered RMSD, with RMSD circles.
pub fn target<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions) -> Result<Figure> {
    let prep = prepare(PlotKind::Target, source, opts)?;
    let sk = skills(PlotKind::Target, &prep)?;
    ignore_scale(PlotKind::Target, "x", opts.xaxis, AxisScale::Arithmetic);
    ignore_scale(PlotKind::Target, "y", opts.yaxis, AxisScale::Arithmetic);
    let mut styles = opts.scatter_styles(sk.len())?;
    let theme = prep.theme;
    let mut fig = new_figure(opts, theme);

    let reach = sk.iter().map(|s| s.rmsd.max(s.signed_crmsd().abs()).max(s.bias.abs())).fold(0.0, f64::max);
    let lim = round_up(if reach > 0.0 { reach * 1.1 } else { 1.0 });

    let mut panel = Panel::new(PanelRect::FULL);
    decorate(&mut panel, opts, &prep, opts.xtitle_or("uRMSD"), opts.ytitle_or("Bias"));
    panel.equal_aspect = true;
    panel.legend = opts.legend.unwrap_or(true);
    panel.x.margin = 0.0;
    panel.y.margin = 0.0;
    panel.x.limits.low = panel.x.limits.low.or(Some(-lim));
    panel.x.limits.high = panel.x.limits.high.or(Some(lim));
    panel.y.limits.low = panel.y.limits.low.or(Some(-lim));
    panel.y.limits.high = panel.y.limits.high.or(Some(lim));

    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        panel.push(Layer::RefLine(RefLine {
            orientation,
            at: 0.0,
            from: None,
            to: None,
            color: theme.axis_line,
            style: LineStyle::Solid,
            width: 0.8,
        }));
    }
    for r in [lim, 0.7 * lim] {
        panel.push(guide(arc(0.0, 0.0, r, 0.0, 2.0 * PI), theme.tick, LineStyle::Dashed));
        panel.push(text(r * FRAC_PI_4.cos(), r * FRAC_PI_4.sin(), format_number((r * 1e3).round() / 1e3), theme.text, Anchor::Left, 0.0));
    }
    panel.push(text(lim * 0.95, lim * 0.92, "RMSD", theme.text, Anchor::Right, 0.0));

    for (s, label) in sk.iter().zip(&prep.labels[1..]) {
        let st = styles.next_trace(&theme);
        let marker = if st.marker.is_none() { Marker::Circle } else { st.marker };
        let mut pt = LineLayer::new(vec![(s.signed_crmsd(), s.bias)], st.color)
            .styled(LineStyle::None, marker)
            .labeled(label.clone());
        pt.marker_size = 8.0;
        panel.push(Layer::Line(pt));
    }
    add_ref_lines(&mut panel, opts, &theme)?;
    fig.push(panel);
    finish(fig, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_of_identical_series() {
        let v = [1.0, 2.0, 3.0, 4.0];
        let s = Skill::of(&v, &v).unwrap();
        assert!((s.corr - 1.0).abs() < 1e-12);
        assert_eq!(s.bias, 0.0);
        assert_eq!(s.crmsd, 0.0);
        assert_eq!(s.rmsd, 0.0);
    }

    #[test]
    fn signed_crmsd_follows_spread() {
        let reference = [1.0, 2.0, 3.0, 4.0];
        let wide = [0.0, 2.0, 4.0, 6.0];
        let narrow = [2.0, 2.5, 3.0, 3.5];
        assert!(Skill::of(&wide, &reference).unwrap().signed_crmsd() > 0.0);
        assert!(Skill::of(&narrow, &reference).unwrap().signed_crmsd() < 0.0);
    }

    #[test]
    fn shifted_series_has_bias_but_no_centered_error() {
        let reference = [1.0, 2.0, 3.0];
        let shifted = [3.0, 4.0, 5.0];
        let s = Skill::of(&shifted, &reference).unwrap();
        assert!((s.bias - 2.0).abs() < 1e-12);
        assert!(s.crmsd.abs() < 1e-12);
        assert!((s.rmsd - 2.0).abs() < 1e-12);
    }

    #[test]
    fn round_up_lands_on_a_tick() {
        assert!((round_up(3.3) - 4.0).abs() < 1e-9);
        assert!((round_up(2.0) - 2.0).abs() < 1e-9);
    }
}
