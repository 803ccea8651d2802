// File: crates/tsplot-core/src/scale.rs
// Summary: Value-to-pixel transforms (linear, log10, probability) and tick locators.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::frame::{datetime_to_days, days_to_datetime};
use crate::stats::Distribution;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScaleKind {
    #[default]
    Linear,
    Log10,
    /// Values are probabilities in `(0, 1)`, spaced by the distribution's quantile function.
    Probability(Distribution),
}

const TINY: f64 = 1e-12;

/// Upper bound on ticks from one locator call.
const MAX_TICKS: f64 = 1000.0;

impl ScaleKind {
    /// Forward transform into the space where the axis is linear.
    pub fn transform(&self, v: f64) -> f64 {
        match self {
            ScaleKind::Linear => v,
            ScaleKind::Log10 => v.max(TINY).log10(),
            ScaleKind::Probability(d) => d.ppf(v.clamp(1e-9, 1.0 - 1e-9)),
        }
    }

    pub fn inverse(&self, t: f64) -> f64 {
        match self {
            ScaleKind::Linear => t,
            ScaleKind::Log10 => 10f64.powf(t),
            ScaleKind::Probability(_) => t,
        }
    }

    /// Whether `v` can be placed on this scale at all.
    pub fn accepts(&self, v: f64) -> bool {
        match self {
            ScaleKind::Linear => v.is_finite(),
            ScaleKind::Log10 => v.is_finite() && v > 0.0,
            ScaleKind::Probability(_) => v > 0.0 && v < 1.0,
        }
    }
}

/// Maps data values on one axis to pixels; `p0` is where `lo` lands.
#[derive(Clone, Copy, Debug)]
pub struct AxisMap {
    pub kind: ScaleKind,
    pub lo: f64,
    pub hi: f64,
    pub p0: f32,
    pub p1: f32,
    t_lo: f64,
    t_hi: f64,
}

impl AxisMap {
    pub fn new(kind: ScaleKind, lo: f64, hi: f64, p0: f32, p1: f32) -> Self {
        let mut t_lo = kind.transform(lo);
        let mut t_hi = kind.transform(hi);
        if (t_hi - t_lo).abs() < TINY {
            t_lo -= 0.5;
            t_hi += 0.5;
        }
        Self { kind, lo, hi, p0, p1, t_lo, t_hi }
    }

    #[inline]
    pub fn to_px(&self, v: f64) -> f32 {
        let t = self.kind.transform(v);
        self.p0 + ((t - self.t_lo) / (self.t_hi - self.t_lo)) as f32 * (self.p1 - self.p0)
    }

    #[inline]
    pub fn from_px(&self, px: f32) -> f64 {
        let frac = ((px - self.p0) / (self.p1 - self.p0)) as f64;
        self.kind.inverse(self.t_lo + frac * (self.t_hi - self.t_lo))
    }

    pub fn contains(&self, v: f64) -> bool {
        let (a, b) = if self.lo <= self.hi { (self.lo, self.hi) } else { (self.hi, self.lo) };
        v >= a - (b - a) * 1e-9 && v <= b + (b - a) * 1e-9
    }
}

const AUTO_BINS: u32 = 8;
const AUTO_STEPS: &[f64] = &[1.0, 2.0, 2.5, 5.0];

/// Round-number ticks covering `[lo, hi]` with about `bins` intervals.
pub fn nice_ticks(lo: f64, hi: f64, bins: u32) -> Vec<f64> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 {
        return if lo.is_finite() { vec![lo] } else { Vec::new() };
    }
    let target = span / bins.max(1) as f64;
    let mut scale = 10f64.powf(target.log10().floor());
    let mut idx = 0;
    // walk the 1-2-2.5-5 ladder until the step reaches the target
    while AUTO_STEPS[idx] * scale < target {
        idx += 1;
        if idx == AUTO_STEPS.len() {
            idx = 0;
            scale *= 10.0;
        }
    }
    let step = AUTO_STEPS[idx] * scale;
    let first = (lo / step - 1e-9).ceil();
    let last = (hi / step + 1e-9).floor();
    if last < first || last - first > MAX_TICKS {
        return Vec::new();
    }
    let mut ticks: Vec<f64> = (0..=(last - first) as i64)
        .map(|i| {
            let v = (first + i as f64) * step;
            if v.abs() < step * 1e-9 { 0.0 } else { v }
        })
        .collect();
    // past 2^53 neighbouring multiples can collapse onto one float
    ticks.dedup();
    ticks
}

/// Decades inside `[lo, hi]`, with 2 and 5 multiples when fewer than three decades fit.
pub fn log_ticks(lo: f64, hi: f64) -> Vec<f64> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if lo <= 0.0 || !hi.is_finite() { return Vec::new(); }
    let min_exp = lo.log10().floor() as i32;
    let max_exp = hi.log10().ceil() as i32;
    let decades = (max_exp - min_exp).max(0);
    let mults: &[f64] = if decades < 3 { &[1.0, 2.0, 5.0] } else { &[1.0] };
    let stride = ((decades as f64 / 8.0).ceil() as i32).max(1);
    let mut ticks = Vec::new();
    for exp in (min_exp..=max_exp).filter(|e| (e - min_exp) % stride == 0) {
        for m in mults {
            let v = m * 10f64.powi(exp);
            if v >= lo * (1.0 - 1e-9) && v <= hi * (1.0 + 1e-9) {
                ticks.push(v);
            }
        }
    }
    ticks
}

/// Probability axis ticks, in cumulative probability.
pub fn probability_ticks(lo: f64, hi: f64) -> Vec<f64> {
    const MAJOR: &[f64] = &[0.01, 0.1, 0.5, 0.9, 0.99];
    const DENSE: &[f64] = &[0.001, 0.01, 0.05, 0.1, 0.2, 0.3, 0.5, 0.7, 0.8, 0.9, 0.95, 0.99, 0.999];
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let inside = |set: &[f64]| -> Vec<f64> {
        set.iter().copied().filter(|&p| p >= lo - 1e-12 && p <= hi + 1e-12).collect()
    };
    let major = inside(MAJOR);
    if major.len() >= 3 { major } else { inside(DENSE) }
}

pub fn probability_label(p: f64) -> String {
    let pct = p * 100.0;
    if (pct - pct.round()).abs() < 1e-9 { format!("{}", pct.round() as i64) } else { format!("{pct}") }
}

/// Format tick values with the precision their spacing needs.
pub fn format_ticks(ticks: &[f64]) -> Vec<String> {
    let step = ticks.windows(2).map(|w| (w[1] - w[0]).abs()).fold(f64::INFINITY, f64::min);
    let biggest = ticks.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if biggest >= 1e6 || (step.is_finite() && step < 1e-4 && biggest < 1e-3) {
        return ticks.iter().map(|v| if *v == 0.0 { "0".to_string() } else { format!("{v:.1e}") }).collect();
    }
    let decimals = if step.is_finite() && step > 0.0 { (-step.log10().floor()).max(0.0) as usize } else { 2 };
    let decimals = if step.is_finite() && decimals > 0 && (step * 10f64.powi(decimals as i32)).fract().abs() > 1e-6 {
        decimals + 1
    } else {
        decimals
    };
    ticks.iter().map(|v| format!("{v:.decimals$}")).collect()
}

pub fn format_log_ticks(ticks: &[f64]) -> Vec<String> {
    ticks
        .iter()
        .map(|&v| {
            if (1e-3..1e5).contains(&v) {
                crate::frame::format_number((v * 1e6).round() / 1e6)
            } else {
                format!("{v:.0e}")
            }
        })
        .collect()
}

/// Calendar ticks for an axis holding days since the epoch.
pub fn date_ticks(lo: f64, hi: f64) -> Vec<(f64, String)> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let (Some(start), Some(end)) = (days_to_datetime(lo), days_to_datetime(hi)) else { return Vec::new() };
    let span = hi - lo;

    let mut out: Vec<NaiveDateTime> = Vec::new();
    let fmt: &str;
    if span > 5.0 * 365.0 {
        let step = ((span / 365.25 / 8.0).ceil() as i32).max(1);
        let mut y = start.year() - start.year().rem_euclid(step);
        while let Some(t) = ymd(y, 1, 1) {
            if t > end { break; }
            if t >= start { out.push(t); }
            y += step;
        }
        fmt = "%Y";
    } else if span > 60.0 {
        let step = ((span / 30.4 / 8.0).ceil() as u32).clamp(1, 12);
        let step = [1, 2, 3, 4, 6, 12].into_iter().find(|s| *s >= step).unwrap_or(12);
        let (mut y, mut m) = (start.year(), 1);
        while m + step <= start.month() {
            m += step;
        }
        while let Some(t) = ymd(y, m, 1) {
            if t > end { break; }
            if t >= start { out.push(t); }
            m += step;
            if m > 12 {
                m -= 12;
                y += 1;
            }
        }
        fmt = "%Y-%m";
    } else if span > 2.0 {
        let step = ((span / 8.0).ceil() as i64).max(1);
        let mut t = start.date().and_hms_opt(0, 0, 0).unwrap_or(start);
        while t <= end {
            if t >= start { out.push(t); }
            t += Duration::days(step);
        }
        fmt = "%Y-%m-%d";
    } else {
        let hours = span * 24.0;
        let step_min = [1, 5, 10, 15, 30, 60, 120, 180, 360, 720]
            .into_iter()
            .find(|m| (hours * 60.0 / *m as f64) <= 8.0)
            .unwrap_or(720);
        let mut t = start.date().and_hms_opt(start.hour(), 0, 0).unwrap_or(start);
        while t <= end {
            if t >= start { out.push(t); }
            t += Duration::minutes(step_min);
        }
        fmt = "%m-%d %H:%M";
    }
    out.into_iter().map(|t| (datetime_to_days(&t), t.format(fmt).to_string())).collect()
}

fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_ticks_are_round() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        let t = nice_ticks(0.13, 0.87, 8);
        assert!(t.iter().all(|v| (v * 10.0 - (v * 10.0).round()).abs() < 1e-9));
    }

    #[test]
    fn nice_ticks_terminate_on_huge_values() {
        let t = nice_ticks(1e17, 1e17 + 10.0, 8);
        assert!(!t.is_empty() && t.len() <= 8);
        assert!(t.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn log_ticks_cover_decades() {
        let t = log_ticks(1.0, 10_000.0);
        assert_eq!(t, vec![1.0, 10.0, 100.0, 1000.0, 10_000.0]);
    }

    #[test]
    fn probability_ticks_default_range() {
        assert_eq!(probability_ticks(0.01, 0.99), vec![0.01, 0.1, 0.5, 0.9, 0.99]);
        assert_eq!(probability_label(0.5), "50");
    }

    #[test]
    fn axis_map_inverts() {
        let m = AxisMap::new(ScaleKind::Log10, 1.0, 100.0, 0.0, 200.0);
        assert!((m.to_px(10.0) - 100.0).abs() < 1e-3);
        assert!((m.from_px(100.0) - 10.0).abs() < 1e-6);
    }
}
