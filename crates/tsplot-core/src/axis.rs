// File: crates/tsplot-core/src/axis.rs
// Summary: Axis model: title, scale, limits, orientation and where tick labels come from.

use crate::limits::Limits;
use crate::scale::{self, ScaleKind};

/// Where tick positions and labels come from.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TickSource {
    /// Round numbers (decades on log axes, percentiles on probability axes).
    #[default]
    Numeric,
    /// Values are days since the epoch; calendar ticks.
    Dates,
    /// Category `i` sits at position `i`.
    Categories(Vec<String>),
    /// Explicit positions and labels.
    Fixed(Vec<(f64, String)>),
    Hidden,
}

#[derive(Clone, Debug)]
pub struct Axis {
    pub label: String,
    pub kind: ScaleKind,
    pub limits: Limits,
    pub inverted: bool,
    pub ticks: TickSource,
    /// Tick label rotation in degrees.
    pub label_rotation: f32,
    /// Draw every n-th tick label only.
    pub label_skip: usize,
    /// Fraction of the data span added on both sides when a limit is not given.
    pub margin: f64,
}

impl Default for Axis {
    fn default() -> Self {
        Self {
            label: String::new(),
            kind: ScaleKind::Linear,
            limits: Limits::default(),
            inverted: false,
            ticks: TickSource::Numeric,
            label_rotation: 0.0,
            label_skip: 1,
            margin: 0.05,
        }
    }
}

impl Axis {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Self::default() }
    }

    pub fn with_kind(mut self, kind: ScaleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_ticks(mut self, ticks: TickSource) -> Self {
        self.ticks = ticks;
        self
    }

    /// Final `(lo, hi)` from the user limits and the data extent.
    pub fn resolve_range(&self, extent: Option<(f64, f64)>) -> (f64, f64) {
        let (dlo, dhi) = extent.unwrap_or(match self.kind {
            ScaleKind::Log10 => (1.0, 10.0),
            ScaleKind::Probability(_) => (0.01, 0.99),
            ScaleKind::Linear => (0.0, 1.0),
        });
        let (mut lo, mut hi) = match self.kind {
            ScaleKind::Log10 => {
                let (a, b) = (dlo.max(1e-12).log10(), dhi.max(1e-12).log10());
                let pad = if b > a { (b - a) * self.margin } else { 0.5 };
                (10f64.powf(a - pad), 10f64.powf(b + pad))
            }
            ScaleKind::Probability(_) => (dlo, dhi),
            ScaleKind::Linear => {
                let pad = if dhi > dlo { (dhi - dlo) * self.margin } else if dlo == 0.0 { 0.5 } else { dlo.abs() * 0.05 };
                (dlo - pad, dhi + pad)
            }
        };
        if let Some(l) = self.limits.low {
            lo = l;
        }
        if let Some(h) = self.limits.high {
            hi = h;
        }
        if hi <= lo {
            hi = lo + 1.0;
        }
        (lo, hi)
    }

    /// Tick positions and labels for the resolved range.
    pub fn tick_marks(&self, lo: f64, hi: f64) -> Vec<(f64, String)> {
        let inside = |v: f64| v >= lo.min(hi) - 1e-9 * (hi - lo).abs() && v <= hi.max(lo) + 1e-9 * (hi - lo).abs();
        let marks: Vec<(f64, String)> = match &self.ticks {
            TickSource::Hidden => Vec::new(),
            TickSource::Fixed(v) => v.iter().filter(|(p, _)| inside(*p)).cloned().collect(),
            TickSource::Categories(names) => names
                .iter()
                .enumerate()
                .filter(|(i, _)| inside(*i as f64))
                .map(|(i, n)| (i as f64, n.clone()))
                .collect(),
            TickSource::Dates => scale::date_ticks(lo, hi),
            TickSource::Numeric => match self.kind {
                ScaleKind::Linear => {
                    let t = scale::nice_ticks(lo, hi, 8);
                    let labels = scale::format_ticks(&t);
                    t.into_iter().zip(labels).collect()
                }
                ScaleKind::Log10 => {
                    let t = scale::log_ticks(lo, hi);
                    let labels = scale::format_log_ticks(&t);
                    t.into_iter().zip(labels).collect()
                }
                ScaleKind::Probability(_) => scale::probability_ticks(lo, hi)
                    .into_iter()
                    .map(|p| (p, scale::probability_label(p)))
                    .collect(),
            },
        };
        let skip = self.label_skip.max(1);
        marks
            .into_iter()
            .enumerate()
            .map(|(i, (p, l))| (p, if i % skip == 0 { l } else { String::new() }))
            .collect()
    }
}
