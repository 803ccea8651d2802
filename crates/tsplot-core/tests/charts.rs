// File: crates/tsplot-core/tests/charts.rs
// Purpose: Smoke test every chart builder on programmatic frames, in memory and written to disk.

use std::path::PathBuf;

use chrono::NaiveDate;
use tsplot_core::charts::{
    self, BarOptions, BootstrapOptions, BoxplotOptions, Diagonal, HexbinOptions, HistogramOptions, ProbabilityOptions,
    ScatterMatrixOptions, WaterfallOptions,
};
use tsplot_core::{Column, Figure, Frame, Index, Layer, PlotOptions, Result};

/// `ncols` positive daily series of `n` rows, each a different wave.
fn daily(ncols: usize, n: usize) -> Frame {
    let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let index = Index::DateTime((0..n as i64).map(|d| start + chrono::Duration::days(d)).collect());
    let columns = (0..ncols)
        .map(|c| {
            let k = c as f64 + 1.0;
            let values = (0..n)
                .map(|i| {
                    let t = i as f64;
                    10.0 * k + 3.0 * (t / (5.0 * k)).sin() + ((t * 13.0 + k * 7.0) % 5.0) * 0.4
                })
                .collect();
            Column::new(format!("gauge{c}"), values)
        })
        .collect();
    Frame::new(index, columns).unwrap()
}

fn numbered(ncols: usize, n: usize) -> Frame {
    let mut f = daily(ncols, n);
    f.reset_index();
    f
}

fn small() -> PlotOptions {
    PlotOptions { figsize: (4.0, 3.0), dpi: 80.0, ..PlotOptions::in_memory() }
}

/// Build, then check the figure rasterizes to a PNG.
fn check(name: &str, built: Result<Figure>) -> Figure {
    let fig = built.unwrap_or_else(|e| panic!("{name}: {e}"));
    assert!(!fig.panels.is_empty(), "{name}: no panels");
    let bytes = fig.render_png_bytes().unwrap_or_else(|e| panic!("{name}: render failed: {e}"));
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "{name}: should be PNG header");
    fig
}

#[test]
fn line_charts() {
    let opts = small();
    assert_eq!(check("time", charts::time(daily(3, 90), &opts)).panels.len(), 1);
    let sub = PlotOptions { subplots: true, ..small() };
    assert_eq!(check("time subplots", charts::time(daily(3, 90), &sub)).panels.len(), 3);
    check("xy", charts::xy(numbered(4, 50), &opts));
    check("double_mass", charts::double_mass(numbered(2, 50), &opts));
    assert_eq!(check("kde_time", charts::kde_time(daily(2, 120), &opts)).panels.len(), 2);
    assert_eq!(check("handh", charts::handh(daily(2, 60), &opts)).panels.len(), 2);
}

#[test]
fn bar_charts() {
    let opts = small();
    let bars = BarOptions::default();
    check("bar", charts::bar(daily(3, 8), &opts, &bars));
    check("barh", charts::barh(daily(3, 8), &opts, &bars));
    check("bar_stacked", charts::bar_stacked(daily(3, 8), &opts, &bars));
    check("barh_stacked", charts::barh_stacked(daily(3, 8), &opts, &bars));
}

#[test]
fn distribution_charts() {
    let opts = small();
    let hist = check("histogram", charts::histogram(daily(3, 200), &opts, &HistogramOptions { bins: 15 }));
    assert_eq!(hist.panels.len(), 3);
    check("kde", charts::kde(daily(2, 200), &opts));
    check("probability_density", charts::probability_density(daily(2, 200), &opts));
    check("boxplot", charts::boxplot(daily(3, 200), &opts, &BoxplotOptions::default()));
    check("boxplot horizontal", charts::boxplot(daily(3, 200), &opts, &BoxplotOptions { vert: false }));
}

#[test]
fn probability_axes() {
    let opts = small();
    let prob = ProbabilityOptions::default();
    check("norm_xaxis", charts::norm_xaxis(numbered(2, 80), &opts, &prob));
    check("norm_yaxis", charts::norm_yaxis(numbered(2, 80), &opts, &prob));
    check("lognorm_xaxis", charts::lognorm_xaxis(numbered(2, 80), &opts, &prob));
    check("lognorm_yaxis", charts::lognorm_yaxis(numbered(2, 80), &opts, &prob));
    check("weibull_xaxis", charts::weibull_xaxis(numbered(2, 80), &opts, &prob));
    check("weibull_yaxis", charts::weibull_yaxis(numbered(2, 80), &opts, &prob));
}

#[test]
fn serial_charts() {
    let opts = small();
    check("autocorrelation", charts::autocorrelation(numbered(1, 120), &opts));
    check("lag_plot", charts::lag_plot(numbered(1, 120), &opts, 2));
    let boot = BootstrapOptions { size: 30, samples: 100, seed: Some(7) };
    assert_eq!(check("bootstrap", charts::bootstrap(numbered(1, 120), &opts, &boot)).panels.len(), 6);
}

#[test]
fn heatmap_spans_the_years() {
    let fig = check("heatmap", charts::heatmap(daily(1, 500), &small()));
    assert!(fig.panels[0].colorbar.is_some());
    assert!(fig.panels[0].layers.iter().any(|l| matches!(l, Layer::Cells(_))));
}

#[test]
fn hexbin_counts_and_means() {
    let opts = small();
    let hex = HexbinOptions { gridsize: 20, ..Default::default() };
    let counts = check("hexbin", charts::hexbin(numbered(2, 400), &opts, &hex));
    assert!(counts.panels[0].colorbar.is_some());
    check("hexbin mean", charts::hexbin(numbered(3, 400), &opts, &hex));
}

#[test]
fn scatter_matrix_grid() {
    let opts = small();
    let kde = check("scatter_matrix", charts::scatter_matrix(numbered(3, 80), &opts, &ScatterMatrixOptions::default()));
    assert_eq!(kde.panels.len(), 9);
    let hist = ScatterMatrixOptions { diagonal: Diagonal::Hist, bins: 8 };
    check("scatter_matrix hist", charts::scatter_matrix(numbered(2, 80), &opts, &hist));
}

#[test]
fn skill_diagrams() {
    let opts = small();
    let taylor = check("taylor", charts::taylor(numbered(3, 100), &opts));
    assert!(taylor.panels[0].equal_aspect);
    check("target", charts::target(numbered(3, 100), &opts));
}

#[test]
fn waterfall_with_labels() {
    let index = Index::Label(["Jan", "Feb", "Mar", "Apr"].map(String::from).to_vec());
    let frame = Frame::new(index, vec![Column::new("balance", vec![100.0, 140.0, 90.0, 120.0])]).unwrap();
    let fig = check("waterfall", charts::waterfall(frame, &small(), &WaterfallOptions::default()));
    let bars = fig.panels[0].layers.iter().filter(|l| matches!(l, Layer::Polygon(_))).count();
    assert_eq!(bars, 5);
}

#[test]
fn writes_every_output_format() {
    let dir = PathBuf::from("target/test_out/charts");
    std::fs::create_dir_all(&dir).unwrap();
    for ext in ["png", "jpg", "bmp", "tif", "svg"] {
        let out = dir.join(format!("time.{ext}"));
        let _ = std::fs::remove_file(&out);
        let opts = PlotOptions { ofilename: Some(out.clone()), ..small() };
        charts::time(daily(2, 30), &opts).expect("render should succeed");
        let meta = std::fs::metadata(&out).expect("output exists");
        assert!(meta.len() > 0, "{ext} should be non-empty");
    }
    let svg = std::fs::read_to_string(dir.join("time.svg")).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn nested_output_directories_are_created() {
    let out = PathBuf::from("target/test_out/charts/nested/deeper/kde.png");
    let _ = std::fs::remove_dir_all("target/test_out/charts/nested");
    let opts = PlotOptions { ofilename: Some(out.clone()), ..small() };
    charts::kde(daily(1, 50), &opts).expect("render should succeed");
    assert!(out.exists());
}
