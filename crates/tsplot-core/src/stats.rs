// File: crates/tsplot-core/src/stats.rs
// Summary: Numerical helpers behind the statistical charts (KDE, histograms, plotting positions, skill scores).

use rand::Rng;

use crate::error::{PlotError, Result};

pub fn mean(v: &[f64]) -> f64 {
    if v.is_empty() { return f64::NAN; }
    v.iter().sum::<f64>() / v.len() as f64
}

/// Population standard deviation.
pub fn std_dev(v: &[f64]) -> f64 {
    if v.is_empty() { return f64::NAN; }
    let m = mean(v);
    (v.iter().map(|x| (x - m).powi(2)).sum::<f64>() / v.len() as f64).sqrt()
}

/// Sample standard deviation (n - 1), as used for KDE bandwidths.
pub fn sample_std(v: &[f64]) -> f64 {
    if v.len() < 2 { return f64::NAN; }
    let m = mean(v);
    (v.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (v.len() - 1) as f64).sqrt()
}

pub fn min_max(v: &[f64]) -> Option<(f64, f64)> {
    v.iter().filter(|x| x.is_finite()).fold(None, |acc, &x| match acc {
        None => Some((x, x)),
        Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
    })
}

/// Linear interpolated quantile of sorted data, `q` in [0, 1].
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() { return f64::NAN; }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn median(v: &[f64]) -> f64 {
    let mut s = v.to_vec();
    s.sort_by(f64::total_cmp);
    quantile_sorted(&s, 0.5)
}

pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 { return vec![start, end]; }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

/// Gaussian kernel density estimate with Scott's bandwidth.
#[derive(Clone, Debug)]
pub struct GaussianKde {
    data: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    pub fn new(data: &[f64]) -> Result<Self> {
        let data: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
        if data.len() < 2 {
            return Err(PlotError::EmptyInput(Some("a density estimate needs at least two values".into())));
        }
        let sd = sample_std(&data);
        if !(sd > 0.0) {
            return Err(PlotError::invalid("kde", "all values are identical, the density is singular"));
        }
        let factor = (data.len() as f64).powf(-0.2);
        Ok(Self { bandwidth: sd * factor, data })
    }

    pub fn bandwidth(&self) -> f64 { self.bandwidth }

    pub fn evaluate(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let norm = 1.0 / (self.data.len() as f64 * h * (2.0 * std::f64::consts::PI).sqrt());
        self.data.iter().map(|&d| (-0.5 * ((x - d) / h).powi(2)).exp()).sum::<f64>() * norm
    }

    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Evaluation grid used by density charts: the data range widened by half its span on each side.
    pub fn default_support(&self, points: usize) -> Vec<f64> {
        let (lo, hi) = min_max(&self.data).unwrap_or((0.0, 1.0));
        let pad = (hi - lo) * 0.5;
        linspace(lo - pad, hi + pad, points)
    }
}

/// Equal-width histogram: returns bin edges (`bins + 1`) and counts.
pub fn histogram(v: &[f64], bins: usize) -> (Vec<f64>, Vec<f64>) {
    let bins = bins.max(1);
    let Some((mut lo, mut hi)) = min_max(v) else { return (vec![0.0, 1.0], vec![0.0]) };
    if hi == lo {
        lo -= 0.5;
        hi += 0.5;
    }
    let edges = linspace(lo, hi, bins + 1);
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0.0; bins];
    for &x in v.iter().filter(|x| x.is_finite()) {
        let k = (((x - lo) / width) as usize).min(bins - 1);
        counts[k] += 1.0;
    }
    (edges, counts)
}

/// Autocorrelation for lags 1..=n, normalized by the lag-0 autocovariance.
pub fn autocorrelation(v: &[f64]) -> Vec<(f64, f64)> {
    let n = v.len();
    if n < 2 { return Vec::new(); }
    let m = mean(v);
    let c0 = v.iter().map(|x| (x - m).powi(2)).sum::<f64>() / n as f64;
    (1..=n)
        .map(|h| {
            let s: f64 = (0..n - h).map(|i| (v[i] - m) * (v[i + h] - m)).sum();
            (h as f64, if c0 > 0.0 { s / n as f64 / c0 } else { 0.0 })
        })
        .collect()
}

/// `(y[t], y[t + lag])` pairs.
pub fn lag_pairs(v: &[f64], lag: usize) -> Vec<(f64, f64)> {
    if lag >= v.len() { return Vec::new(); }
    v.iter().zip(v.iter().skip(lag)).map(|(&a, &b)| (a, b)).collect()
}

/// Bootstrap statistics of `samples` random draws (with replacement) of `size` values.
#[derive(Clone, Debug, Default)]
pub struct Bootstrap {
    pub means: Vec<f64>,
    pub medians: Vec<f64>,
    pub midranges: Vec<f64>,
}

pub fn bootstrap<R: Rng>(v: &[f64], size: usize, samples: usize, rng: &mut R) -> Bootstrap {
    let mut out = Bootstrap::default();
    if v.is_empty() || size == 0 { return out; }
    let mut draw = vec![0.0; size];
    for _ in 0..samples {
        for d in draw.iter_mut() {
            *d = v[rng.random_range(0..v.len())];
        }
        out.means.push(mean(&draw));
        out.medians.push(median(&draw));
        let (lo, hi) = min_max(&draw).unwrap_or((f64::NAN, f64::NAN));
        out.midranges.push((lo + hi) / 2.0);
    }
    out
}

/// Five-number summary plus fliers beyond 1.5 IQR.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub fliers: Vec<f64>,
}

pub fn box_summary(v: &[f64]) -> Option<BoxSummary> {
    let mut s: Vec<f64> = v.iter().copied().filter(|x| x.is_finite()).collect();
    if s.is_empty() { return None; }
    s.sort_by(f64::total_cmp);
    let q1 = quantile_sorted(&s, 0.25);
    let q3 = quantile_sorted(&s, 0.75);
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;
    let whisker_low = s.iter().copied().find(|&x| x >= lo_fence).unwrap_or(q1);
    let whisker_high = s.iter().rev().copied().find(|&x| x <= hi_fence).unwrap_or(q3);
    let fliers = s.iter().copied().filter(|&x| x < whisker_low || x > whisker_high).collect();
    Some(BoxSummary { q1, median: quantile_sorted(&s, 0.5), q3, whisker_low, whisker_high, fliers })
}

/// Plotting-position formulas mapping rank to cumulative probability.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PlottingPosition {
    #[default]
    Weibull,
    Benard,
    Filliben,
    Tukey,
    Gringorten,
    Hazen,
    Cunnane,
    Blom,
    California,
    /// Custom `a` in `(i - a) / (n + 1 - 2a)`.
    Alpha(f64),
}

impl std::str::FromStr for PlottingPosition {
    type Err = PlotError;
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "weibull" => PlottingPosition::Weibull,
            "benard" | "median" => PlottingPosition::Benard,
            "filliben" => PlottingPosition::Filliben,
            "tukey" => PlottingPosition::Tukey,
            "gringorten" => PlottingPosition::Gringorten,
            "hazen" => PlottingPosition::Hazen,
            "cunnane" => PlottingPosition::Cunnane,
            "blom" => PlottingPosition::Blom,
            "california" => PlottingPosition::California,
            other => match other.parse::<f64>() {
                Ok(a) if (0.0..=1.0).contains(&a) => PlottingPosition::Alpha(a),
                _ => return Err(PlotError::invalid("plotting_position", format!("unknown formula '{s}'"))),
            },
        })
    }
}

impl PlottingPosition {
    /// Probabilities for ranks 1..=n.
    pub fn positions(&self, n: usize) -> Vec<f64> {
        let nf = n as f64;
        let general = |a: f64| -> Vec<f64> { (1..=n).map(|i| (i as f64 - a) / (nf + 1.0 - 2.0 * a)).collect() };
        match *self {
            PlottingPosition::Weibull => general(0.0),
            PlottingPosition::Benard => general(0.3),
            PlottingPosition::Tukey => general(1.0 / 3.0),
            PlottingPosition::Gringorten => general(0.44),
            PlottingPosition::Hazen => general(0.5),
            PlottingPosition::Cunnane => general(0.4),
            PlottingPosition::Blom => general(0.375),
            PlottingPosition::Alpha(a) => general(a),
            PlottingPosition::California => (1..=n).map(|i| i as f64 / nf).collect(),
            PlottingPosition::Filliben => {
                let last = 0.5f64.powf(1.0 / nf);
                (1..=n)
                    .map(|i| {
                        if i == 1 {
                            1.0 - last
                        } else if i == n {
                            last
                        } else {
                            (i as f64 - 0.3175) / (nf + 0.365)
                        }
                    })
                    .collect()
            }
        }
    }
}

/// Quantile transform used to straighten a probability axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Distribution {
    Normal,
    LogNormal,
    Weibull,
}

impl Distribution {
    pub fn ppf(&self, p: f64) -> f64 {
        match self {
            Distribution::Normal => norm_ppf(p),
            Distribution::LogNormal => (0.5 * norm_ppf(p)).exp(),
            Distribution::Weibull => (-(1.0 - p).ln()).ln(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Distribution::Normal => "Normal Distribution",
            Distribution::LogNormal => "Log Normal Distribution",
            Distribution::Weibull => "Weibull Distribution",
        }
    }
}

/// Inverse of the standard normal CDF (Acklam's rational approximation).
pub fn norm_ppf(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) { return f64::NAN; }
    if p == 0.0 { return f64::NEG_INFINITY; }
    if p == 1.0 { return f64::INFINITY; }
    const A: [f64; 6] = [
        -3.969683028665376e+01, 2.209460984245205e+02, -2.759285104469687e+02,
        1.383577518672690e+02, -3.066479806614716e+01, 2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01, 1.615858368580409e+02, -1.556989798598866e+02,
        6.680131188771972e+01, -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03, -3.223964580411365e-01, -2.400758277161838e+00,
        -2.549732539343734e+00, 4.374664141464968e+00, 2.938163982698783e+00,
    ];
    const D: [f64; 4] = [7.784695709041462e-03, 3.224671290700398e-01, 2.445134137142996e+00, 3.754408661907416e+00];
    const P_LOW: f64 = 0.02425;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

/// Pearson correlation of paired values.
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let (ma, mb) = (mean(a), mean(b));
    let cov: f64 = a.iter().zip(b).map(|(x, y)| (x - ma) * (y - mb)).sum();
    let va: f64 = a.iter().map(|x| (x - ma).powi(2)).sum();
    let vb: f64 = b.iter().map(|y| (y - mb).powi(2)).sum();
    cov / (va * vb).sqrt()
}

pub fn bias(pred: &[f64], reference: &[f64]) -> f64 {
    mean(pred) - mean(reference)
}

pub fn rmsd(pred: &[f64], reference: &[f64]) -> f64 {
    let n = pred.len().min(reference.len());
    if n == 0 { return f64::NAN; }
    (pred.iter().zip(reference).map(|(p, r)| (p - r).powi(2)).sum::<f64>() / n as f64).sqrt()
}

/// RMS difference after removing each series' mean.
pub fn centered_rmsd(pred: &[f64], reference: &[f64]) -> f64 {
    let n = pred.len().min(reference.len());
    if n == 0 { return f64::NAN; }
    let (mp, mr) = (mean(pred), mean(reference));
    (pred.iter().zip(reference).map(|(p, r)| ((p - mp) - (r - mr)).powi(2)).sum::<f64>() / n as f64).sqrt()
}

/// Keep only rows where both series have a value.
pub fn paired_valid(a: &[f64], b: &[f64]) -> (Vec<f64>, Vec<f64>) {
    a.iter().zip(b).filter(|(x, y)| !x.is_nan() && !y.is_nan()).map(|(&x, &y)| (x, y)).unzip()
}
