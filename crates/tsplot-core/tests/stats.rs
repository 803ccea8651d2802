// File: crates/tsplot-core/tests/stats.rs
// Purpose: Numerical helpers behind the statistical charts.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tsplot_core::stats::{
    autocorrelation, bias, bootstrap, box_summary, centered_rmsd, correlation, histogram, lag_pairs, linspace, median,
    norm_ppf, paired_valid, rmsd, GaussianKde,
};
use tsplot_core::{Distribution, PlotError, PlottingPosition};

fn close(a: f64, b: f64, tol: f64) -> bool { (a - b).abs() <= tol }

#[test]
fn kde_integrates_to_one() {
    let data = [1.0, 2.0, 3.0, 4.0, 10.0, f64::NAN];
    let kde = GaussianKde::new(&data).expect("kde");
    assert!(kde.bandwidth() > 0.0);

    let xs = linspace(-30.0, 40.0, 2001);
    let ys = kde.evaluate_many(&xs);
    let dx = xs[1] - xs[0];
    let area: f64 = ys.windows(2).map(|w| (w[0] + w[1]) / 2.0 * dx).sum();
    assert!(close(area, 1.0, 1e-3), "area {area}");

    let support = kde.default_support(200);
    assert_eq!(support.len(), 200);
    assert!(support[0] < 1.0 && support[199] > 10.0);
}

#[test]
fn kde_needs_spread() {
    assert!(matches!(GaussianKde::new(&[1.0]), Err(PlotError::EmptyInput(_))));
    assert!(matches!(GaussianKde::new(&[2.0, 2.0, 2.0]), Err(PlotError::InvalidOption { option: "kde", .. })));
}

#[test]
fn histogram_counts_include_the_top_edge() {
    let (edges, counts) = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0, f64::NAN], 4);
    assert_eq!(edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(counts, vec![1.0, 1.0, 1.0, 2.0]);

    let (edges, counts) = histogram(&[2.0, 2.0], 1);
    assert_eq!(edges, vec![1.5, 2.5]);
    assert_eq!(counts, vec![2.0]);
}

#[test]
fn box_summary_flags_outliers() {
    let mut v: Vec<f64> = (1..=9).map(f64::from).collect();
    v.push(100.0);
    let b = box_summary(&v).expect("summary");
    assert!(close(b.q1, 3.25, 1e-12));
    assert!(close(b.median, 5.5, 1e-12));
    assert!(close(b.q3, 7.75, 1e-12));
    assert_eq!((b.whisker_low, b.whisker_high), (1.0, 9.0));
    assert_eq!(b.fliers, vec![100.0]);
    assert!(box_summary(&[f64::NAN]).is_none());
}

#[test]
fn plotting_positions() {
    assert_eq!(PlottingPosition::Weibull.positions(4), vec![0.2, 0.4, 0.6, 0.8]);
    assert_eq!(PlottingPosition::Hazen.positions(2), vec![0.25, 0.75]);
    assert_eq!(PlottingPosition::California.positions(2), vec![0.5, 1.0]);

    let f = PlottingPosition::Filliben.positions(5);
    assert!(close(f[4], 0.5f64.powf(0.2), 1e-12));
    assert!(close(f[0], 1.0 - f[4], 1e-12));
    assert!(f.windows(2).all(|w| w[0] < w[1]));

    assert_eq!("hazen".parse::<PlottingPosition>().unwrap(), PlottingPosition::Hazen);
    assert_eq!("0.3".parse::<PlottingPosition>().unwrap(), PlottingPosition::Alpha(0.3));
    assert!("1.5".parse::<PlottingPosition>().is_err());
}

#[test]
fn normal_quantiles() {
    assert_eq!(norm_ppf(0.5), 0.0);
    assert!(close(norm_ppf(0.975), 1.959964, 1e-6));
    assert!(close(norm_ppf(0.01), -2.326348, 1e-6));
    assert!(close(norm_ppf(0.001), -norm_ppf(0.999), 1e-9));
    assert!(norm_ppf(1.5).is_nan());

    assert!(close(Distribution::Weibull.ppf(1.0 - (-1.0f64).exp()), 0.0, 1e-12));
    assert!(close(Distribution::LogNormal.ppf(0.5), 1.0, 1e-12));
}

#[test]
fn autocorrelation_of_alternating_series() {
    let ac = autocorrelation(&[1.0, -1.0, 1.0, -1.0]);
    assert_eq!(ac.len(), 4);
    assert_eq!(ac[0], (1.0, -0.75));
    assert_eq!(ac[1], (2.0, 0.5));
    assert_eq!(ac[3].1, 0.0);
    assert!(autocorrelation(&[1.0]).is_empty());
}

#[test]
fn lagged_pairs() {
    assert_eq!(lag_pairs(&[1.0, 2.0, 3.0], 1), vec![(1.0, 2.0), (2.0, 3.0)]);
    assert!(lag_pairs(&[1.0, 2.0, 3.0], 3).is_empty());
}

#[test]
fn bootstrap_is_reproducible_with_a_seed() {
    let data: Vec<f64> = (0..100).map(|i| (i as f64 * 0.37).sin() * 4.0).collect();
    let a = bootstrap(&data, 20, 50, &mut StdRng::seed_from_u64(42));
    let b = bootstrap(&data, 20, 50, &mut StdRng::seed_from_u64(42));
    assert_eq!(a.means, b.means);
    assert_eq!(a.medians.len(), 50);
    assert_eq!(a.midranges.len(), 50);
    assert!(a.means.iter().all(|m| (-4.0..=4.0).contains(m)));
    assert!(bootstrap(&[], 20, 50, &mut StdRng::seed_from_u64(1)).means.is_empty());
}

#[test]
fn skill_scores() {
    let reference = [1.0, 2.0, 3.0, 4.0];
    let shifted = [4.0, 5.0, 6.0, 7.0];
    assert!(close(correlation(&reference, &[3.0, 5.0, 7.0, 9.0]), 1.0, 1e-12));
    assert_eq!(bias(&shifted, &reference), 3.0);
    assert_eq!(rmsd(&shifted, &reference), 3.0);
    assert_eq!(centered_rmsd(&shifted, &reference), 0.0);
    assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
}

#[test]
fn pairs_skip_missing_rows() {
    let (x, y) = paired_valid(&[1.0, f64::NAN, 3.0, 4.0], &[5.0, 6.0, f64::NAN, 8.0]);
    assert_eq!(x, vec![1.0, 4.0]);
    assert_eq!(y, vec![5.0, 8.0]);
}
