// File: crates/tsplot-core/src/charts/xy.rs
// Summary: Paired x,y charts: `xy` and the cumulative `double_mass` curve.

use super::{add_ref_lines, apply_scales, decorate, finish, new_figure, prepare, PlotKind, PlotOptions};
use crate::axis::TickSource;
use crate::error::Result;
use crate::figure::{Figure, Layer, LineLayer, Panel, PanelRect};
use crate::frame::Frame;
use crate::ingest::Source;
use crate::legend::check_pairs;

/// `(x, y)` points per pair; a single column is drawn against the index.
fn pairs(frame: &Frame, npairs: usize) -> Vec<Vec<(f64, f64)>> {
    if frame.ncols() == 1 {
        let xs = frame.index.x_values();
        return vec![xs.into_iter().zip(frame.column(0).values.iter().copied()).collect()];
    }
    (0..npairs)
        .map(|k| {
            let (x, y) = (frame.column(2 * k), frame.column(2 * k + 1));
            x.values.iter().copied().zip(y.values.iter().copied()).collect()
        })
        .collect()
}

fn build(kind: PlotKind, source: Source<'_>, opts: &PlotOptions) -> Result<Figure> {
    let prep = prepare(kind, source, opts)?;
    let npairs = check_pairs(kind, &prep.frame)?;
    let mut styles = opts.line_styles(npairs)?;
    let mut fig = new_figure(opts, prep.theme);

    let mut data = pairs(&prep.frame, npairs);
    let (mut xtitle, mut ytitle) = (opts.xtitle.clone(), opts.ytitle.clone());
    if kind == PlotKind::DoubleMass {
        for pts in &mut data {
            pts.retain(|(x, y)| !x.is_nan() && !y.is_nan());
            let (mut sx, mut sy) = (0.0, 0.0);
            for p in pts.iter_mut() {
                sx += p.0;
                sy += p.1;
                *p = (sx, sy);
            }
        }
        let names = prep.frame.names();
        let (xname, yname) = if names.len() == 1 { ("index".to_string(), names[0].clone()) } else { (names[0].clone(), names[1].clone()) };
        if xtitle.is_empty() {
            xtitle = format!("Cumulative {xname}");
        }
        if ytitle.is_empty() {
            ytitle = format!("Cumulative {yname}");
        }
    }

    let mut panel = Panel::new(PanelRect::FULL);
    apply_scales(&mut panel.x, &mut panel.y, opts);
    decorate(&mut panel, opts, &prep, &xtitle, &ytitle);
    if prep.frame.ncols() == 1 && prep.frame.index.is_datetime() && kind == PlotKind::Xy {
        panel.x.ticks = TickSource::Dates;
    }
    panel.legend = opts.legend.unwrap_or(true);
    for (pts, label) in data.into_iter().zip(&prep.labels) {
        let st = styles.next_trace(&prep.theme);
        let mut line = LineLayer::new(pts, st.color).styled(st.line, st.marker).labeled(label.clone());
        line.draw_style = opts.drawstyle;
        panel.push(Layer::Line(line));
    }
    add_ref_lines(&mut panel, opts, &prep.theme)?;
    fig.push(panel);
    finish(fig, opts)
}

/// Columns as `x1,y1,x2,y2,...`, or one column against the index.
pub fn xy<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions) -> Result<Figure> {
    build(PlotKind::Xy, source.into(), opts)
}

/// Cumulative sum of each y against the cumulative sum of its x.
pub fn double_mass<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions) -> Result<Figure> {
    build(PlotKind::DoubleMass, source.into(), opts)
}
