// File: crates/tsplot-core/src/charts/scatter_matrix.rs
// Summary: Pairwise scatter matrix with a density or histogram on the diagonal.

use std::str::FromStr;

use skia_safe as skia;

use super::{add_ref_lines, decorate, finish, new_figure, prepare, PlotKind, PlotOptions};
use crate::axis::TickSource;
use crate::error::{PlotError, Result};
use crate::figure::{Figure, Layer, LineLayer, Panel, PolygonLayer};
use crate::ingest::Source;
use crate::stats::{histogram as bin_counts, paired_valid, GaussianKde};
use crate::style::{LineStyle, Marker};

/// What goes on the diagonal of the matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Diagonal {
    #[default]
    Kde,
    Hist,
}

impl FromStr for Diagonal {
    type Err = PlotError;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kde" | "density" => Ok(Diagonal::Kde),
            "hist" | "histogram" => Ok(Diagonal::Hist),
            other => Err(PlotError::invalid("diagonal", format!("expected 'kde' or 'hist', got '{other}'"))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScatterMatrixOptions {
    pub diagonal: Diagonal,
    pub bins: usize,
}

impl Default for ScatterMatrixOptions {
    fn default() -> Self { Self { diagonal: Diagonal::Kde, bins: 10 } }
}

pub fn scatter_matrix<'a>(source: impl Into<Source<'a>>, opts: &PlotOptions, sm: &ScatterMatrixOptions) -> Result<Figure> {
    let prep = prepare(PlotKind::ScatterMatrix, source, opts)?;
    let n = prep.frame.ncols();
    let mut styles = opts.scatter_styles(1)?;
    let st = styles.next_trace(&prep.theme);
    let mut fig = new_figure(opts, prep.theme);
    let rects = Figure::grid(n, n);

    for row in 0..n {
        for col in 0..n {
            let mut panel = Panel::new(rects[row * n + col]);
            let xtitle = if row + 1 == n { prep.labels[col].as_str() } else { "" };
            let ytitle = if col == 0 { prep.labels[row].as_str() } else { "" };
            decorate(&mut panel, opts, &prep, xtitle, ytitle);
            if row + 1 != n {
                panel.x.ticks = TickSource::Hidden;
            }
            if col != 0 {
                panel.y.ticks = TickSource::Hidden;
            }
            let xs = &prep.frame.column(col).values;
            if row == col {
                diagonal_layers(&mut panel, &prep.frame.column(col).valid(), sm, st.color)?;
            } else {
                let (x, y) = paired_valid(xs, &prep.frame.column(row).values);
                let mut dots = LineLayer::new(x.into_iter().zip(y).collect(), st.color).styled(LineStyle::None, st.marker);
                if dots.marker.is_none() {
                    dots.marker = Marker::Circle;
                }
                dots.marker_size = 3.0;
                panel.push(Layer::Line(dots));
            }
            add_ref_lines(&mut panel, opts, &prep.theme)?;
            fig.push(panel);
        }
    }
    finish(fig, opts)
}

fn diagonal_layers(panel: &mut Panel, values: &[f64], sm: &ScatterMatrixOptions, color: skia::Color) -> Result<()> {
    match sm.diagonal {
        Diagonal::Kde => {
            let kde = GaussianKde::new(values)?;
            let xs = kde.default_support(200);
            let ys = kde.evaluate_many(&xs);
            panel.push(Layer::Line(LineLayer::new(xs.into_iter().zip(ys).collect(), color)));
        }
        Diagonal::Hist => {
            let (edges, counts) = bin_counts(values, sm.bins.max(1));
            for (k, &count) in counts.iter().enumerate() {
                if count == 0.0 { continue; }
                panel.push(Layer::Polygon(PolygonLayer::rect(edges[k], 0.0, edges[k + 1], count, color)));
            }
            panel.y.limits.low = Some(0.0);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_parses_both_spellings() {
        assert_eq!("kde".parse::<Diagonal>().unwrap(), Diagonal::Kde);
        assert_eq!("Hist".parse::<Diagonal>().unwrap(), Diagonal::Hist);
        assert!("box".parse::<Diagonal>().is_err());
    }
}
