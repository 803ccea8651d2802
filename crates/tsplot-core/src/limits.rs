// File: crates/tsplot-core/src/limits.rs
// Summary: Axis scale modes and validation/defaulting of user supplied axis limits.

use std::str::FromStr;

use crate::error::{PlotError, Result};

/// How an axis maps values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisScale {
    #[default]
    Arithmetic,
    Log,
    /// Probability axis (normal, log-normal or Weibull quantiles).
    Normal,
}

impl FromStr for AxisScale {
    type Err = PlotError;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arithmetic" | "linear" | "" => Ok(AxisScale::Arithmetic),
            "log" => Ok(AxisScale::Log),
            "normal" | "lognormal" | "weibull" => Ok(AxisScale::Normal),
            other => Err(PlotError::invalid("axis", format!("expected arithmetic, log or normal, got '{other}'"))),
        }
    }
}

/// Lower/upper axis bounds; a missing side is taken from the data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Limits {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl Limits {
    pub fn new(low: Option<f64>, high: Option<f64>) -> Self { Self { low, high } }

    pub fn both(low: f64, high: f64) -> Self { Self { low: Some(low), high: Some(high) } }

    /// Fill missing sides from a data range.
    pub fn or_range(&self, lo: f64, hi: f64) -> (f64, f64) {
        (self.low.unwrap_or(lo), self.high.unwrap_or(hi))
    }
}

/// Parses `low,high`, `,high`, `low,` or a single `low`.
impl FromStr for Limits {
    type Err = PlotError;
    fn from_str(s: &str) -> Result<Self> {
        let side = |p: &str| -> Result<Option<f64>> {
            let p = p.trim();
            if p.is_empty() || p == "None" {
                return Ok(None);
            }
            p.parse::<f64>()
                .map(Some)
                .map_err(|_| PlotError::invalid("limits", format!("'{p}' is not a number")))
        };
        let mut parts = s.split(',');
        let low = side(parts.next().unwrap_or_default())?;
        let high = side(parts.next().unwrap_or_default())?;
        if parts.next().is_some() {
            return Err(PlotError::invalid("limits", format!("expected 'low,high', got '{s}'")));
        }
        Ok(Limits { low, high })
    }
}

/// Establish axis limits for `scale`.
///
/// Probability axes default to `(0.01, 0.99)` and must stay inside `[0, 1]`;
/// log axes need strictly positive bounds; when both bounds are present the
/// lower one must be strictly smaller.
pub fn know_your_limits(limits: Option<Limits>, scale: AxisScale) -> Result<Option<Limits>> {
    let limits = match scale {
        AxisScale::Normal => {
            let l = limits.unwrap_or_default();
            let low = l.low.unwrap_or(0.01);
            let high = l.high.unwrap_or(0.99);
            if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) {
                return Err(PlotError::ProbabilityLimits { low, high });
            }
            Some(Limits::both(low, high))
        }
        _ => limits,
    };
    let Some(l) = limits else { return Ok(None) };

    if let (Some(low), Some(high)) = (l.low, l.high) {
        if low >= high {
            return Err(PlotError::LimitOrder { low, high });
        }
    }
    if scale == AxisScale::Log && (l.low.is_some_and(|v| v <= 0.0) || l.high.is_some_and(|v| v <= 0.0)) {
        return Err(PlotError::LogLimits { low: l.low, high: l.high });
    }
    Ok(Some(l))
}
