// File: crates/tsplot-core/src/charts/hexbin.rs
// Summary: Hexagonal binning of x,y pairs, colored by count or by the mean of a third column.

use std::collections::BTreeMap;

use tracing::debug;

use super::{add_ref_lines, decorate, finish, ignore_scale, new_figure, prepare, PlotKind, PlotOptions};
use crate::color::viridis;
use crate::error::{PlotError, Result};
use crate::figure::{Colorbar, Figure, Layer, Panel, PanelRect, PolygonLayer};
use crate::ingest::Source;
use crate::limits::AxisScale;
use crate::stats::min_max;
use crate::style::Hatch;

#[derive(Clone, Debug)]
pub struct HexbinOptions {
    /// Hexagons across the x range.
    pub gridsize: usize,
    /// Leave out hexagons holding fewer points than this.
    pub mincnt: usize,
}

impl Default for HexbinOptions {
    fn default() -> Self { Self { gridsize: 100, mincnt: 1 } }
}

/// Unit hexagon, pointy side up, in lattice steps.
const HEX_X: [f64; 6] = [0.5, 0.5, 0.0, -0.5, -0.5, 0.0];
const HEX_Y: [f64; 6] = [-0.5, 0.5, 1.0, 0.5, -0.5, -1.0];

/// Points in one hexagon and the sum of the reduced column.
#[derive(Clone, Copy, Debug, Default)]
struct Bin {
    count: usize,
    sum: f64,
}

/// Cell key: lattice indices and which of the two offset lattices.
type Key = (i64, i64, bool);

/// Assign each point to the nearest centre of two interleaved rectangular lattices.
fn bin_points(points: &[(f64, f64, f64)], xr: (f64, f64), yr: (f64, f64), nx: usize) -> (BTreeMap<Key, Bin>, f64, f64) {
    let ny = ((nx as f64) / 3f64.sqrt()).floor().max(1.0);
    let sx = ((xr.1 - xr.0) / nx as f64).max(f64::EPSILON);
    let sy = ((yr.1 - yr.0) / ny).max(f64::EPSILON);
    let mut bins: BTreeMap<Key, Bin> = BTreeMap::new();
    for &(x, y, c) in points {
        let u = (x - xr.0) / sx;
        let v = (y - yr.0) / sy;
        let (i1, j1) = (u.round(), v.round());
        let (i2, j2) = (u.floor(), v.floor());
        let d1 = (u - i1).powi(2) + 3.0 * (v - j1).powi(2);
        let d2 = (u - i2 - 0.5).powi(2) + 3.0 * (v - j2 - 0.5).powi(2);
        let key = if d1 < d2 { (i1 as i64, j1 as i64, false) } else { (i2 as i64, j2 as i64, true) };
        let bin = bins.entry(key).or_default();
        bin.count += 1;
        bin.sum += c;
    }
    (bins, sx, sy)
}

fn centre(key: Key, origin: (f64, f64), sx: f64, sy: f64) -> (f64, f64) {
    let off = if key.2 { 0.5 } else { 0.0 };
    (origin.0 + (key.0 as f64 + off) * sx, origin.1 + (key.1 as f64 + off) * sy)
}

/// Two columns give counts; a third column is averaged per hexagon.
pub fn hexbin<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, hex: &HexbinOptions) -> Result<Figure> {
    if hex.gridsize == 0 {
        return Err(PlotError::invalid("gridsize", "must be at least 1"));
    }
    let prep = prepare(PlotKind::Hexbin, source, opts)?;
    let ncols = prep.frame.ncols();
    if !(2..=3).contains(&ncols) {
        return Err(PlotError::SeriesCount { kind: PlotKind::Hexbin.name(), expected: 2, found: ncols });
    }
    ignore_scale(PlotKind::Hexbin, "x", opts.xaxis, AxisScale::Arithmetic);
    ignore_scale(PlotKind::Hexbin, "y", opts.yaxis, AxisScale::Arithmetic);

    let cols = &prep.frame.columns;
    let points: Vec<(f64, f64, f64)> = (0..prep.frame.nrows())
        .map(|r| (cols[0].values[r], cols[1].values[r], if ncols == 3 { cols[2].values[r] } else { 1.0 }))
        .filter(|(x, y, c)| x.is_finite() && y.is_finite() && c.is_finite())
        .collect();
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let (Some(xr), Some(yr)) = (min_max(&xs), min_max(&ys)) else {
        return Err(PlotError::EmptyInput(Some("no complete x,y pairs to bin".into())));
    };
    let (bins, sx, sy) = bin_points(&points, xr, yr, hex.gridsize);
    let reduce = |b: &Bin| if ncols == 3 { b.sum / b.count as f64 } else { b.count as f64 };
    let kept: Vec<(Key, f64)> =
        bins.iter().filter(|(_, b)| b.count >= hex.mincnt.max(1)).map(|(k, b)| (*k, reduce(b))).collect();
    let values: Vec<f64> = kept.iter().map(|(_, v)| *v).collect();
    let (vmin, vmax) = min_max(&values).unwrap_or((0.0, 1.0));
    debug!(points = points.len(), hexagons = kept.len(), "hexbin binned");

    let mut fig = new_figure(opts, prep.theme);
    let mut panel = Panel::new(PanelRect::FULL);
    decorate(&mut panel, opts, &prep, opts.xtitle_or(&prep.labels[0]), opts.ytitle_or(&prep.labels[1]));
    panel.grid = false;
    let span = if vmax > vmin { vmax - vmin } else { 1.0 };
    for (key, v) in kept {
        let (cx, cy) = centre(key, (xr.0, yr.0), sx, sy);
        let points = HEX_X.iter().zip(HEX_Y).map(|(&ox, oy)| (cx + ox * sx, cy + oy * sy / 3.0)).collect();
        panel.push(Layer::Polygon(PolygonLayer {
            points,
            fill: Some(viridis((v - vmin) / span)),
            edge: None,
            edge_width: 0.0,
            hatch: Hatch::None,
            label: None,
        }));
    }
    let label = if ncols == 3 { format!("Mean {}", prep.labels[2]) } else { "Count".to_string() };
    panel.colorbar = Some(Colorbar { vmin, vmax, label });
    add_ref_lines(&mut panel, opts, &prep.theme)?;
    fig.push(panel);
    finish(fig, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_on_a_lattice_centre_share_a_bin() {
        let pts = vec![(0.0, 0.0, 1.0), (0.01, 0.0, 1.0), (10.0, 10.0, 1.0)];
        let (bins, _, _) = bin_points(&pts, (0.0, 10.0), (0.0, 10.0), 10);
        assert_eq!(bins.values().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(bins.get(&(0, 0, false)).map(|b| b.count), Some(2));
    }

    #[test]
    fn offset_lattice_catches_points_between_centres() {
        let pts = vec![(0.5, 0.5, 1.0)];
        let (bins, sx, sy) = bin_points(&pts, (0.0, 10.0), (0.0, 10.0), 10);
        let (&key, _) = bins.iter().next().unwrap();
        assert!(key.2);
        let (cx, cy) = centre(key, (0.0, 0.0), sx, sy);
        assert!((cx - 0.5).abs() < 1e-9);
        assert!((cy - 0.5 * sy).abs() < 1e-9);
    }
}
