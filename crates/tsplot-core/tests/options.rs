// File: crates/tsplot-core/tests/options.rs
// Purpose: Option validation shared by the chart builders: styles, limits, legends and column counts.

use chrono::{NaiveDate, NaiveDateTime};
use tsplot_core::charts::{self, BootstrapOptions, HexbinOptions, ProbabilityOptions, WaterfallOptions};
use tsplot_core::{
    check_column_legend, know_your_limits, AxisScale, Column, Frame, Index, Layer, Limits, PlotError, PlotKind,
    PlotOptions, StyleList,
};

fn day(d: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap() + chrono::Duration::days(d)
}

/// `ncols` wavy daily columns of `n` rows.
fn daily(ncols: usize, n: usize) -> Frame {
    let index = Index::DateTime((0..n as i64).map(day).collect());
    let columns = (0..ncols)
        .map(|c| {
            let values = (0..n).map(|i| 5.0 + c as f64 + (i as f64 / 4.0 + c as f64).sin()).collect();
            Column::new(format!("s{c}"), values)
        })
        .collect();
    Frame::new(index, columns).unwrap()
}

fn numbered(ncols: usize, n: usize) -> Frame {
    let mut f = daily(ncols, n);
    f.reset_index();
    f
}

#[test]
fn style_list_must_match_trace_count() {
    let mut opts = PlotOptions::in_memory();
    opts.style = StyleList::list(["b-", "r--"]);
    let err = charts::time(daily(3, 20), &opts).unwrap_err();
    assert!(matches!(err, PlotError::StyleCount { given: 2, traces: 3, .. }), "{err}");

    opts.style = StyleList::list(["b-", "r--", "g:"]);
    assert!(charts::time(daily(3, 20), &opts).is_ok());
}

#[test]
fn colors_cycle_but_must_be_known() {
    let mut opts = PlotOptions::in_memory();
    opts.colors = StyleList::list(["r"]);
    assert!(charts::time(daily(3, 20), &opts).is_ok());

    opts.colors = StyleList::list(["notacolor"]);
    let err = charts::time(daily(3, 20), &opts).unwrap_err();
    assert!(matches!(err, PlotError::UnknownColor(_)), "{err}");
}

#[test]
fn log_axis_rejects_non_positive_limits() {
    let mut opts = PlotOptions::in_memory();
    opts.yaxis = AxisScale::Log;
    opts.ylim = Some(Limits::both(0.0, 10.0));
    let err = charts::time(daily(1, 20), &opts).unwrap_err();
    assert!(matches!(err, PlotError::LogLimits { low: Some(l), .. } if l == 0.0), "{err}");

    opts.ylim = Some(Limits::both(0.1, 10.0));
    assert!(charts::time(daily(1, 20), &opts).is_ok());
}

#[test]
fn probability_limits_stay_in_unit_interval() {
    assert_eq!(know_your_limits(None, AxisScale::Normal).unwrap(), Some(Limits::both(0.01, 0.99)));
    assert_eq!(
        know_your_limits(Some(Limits::new(Some(0.05), None)), AxisScale::Normal).unwrap(),
        Some(Limits::both(0.05, 0.99))
    );

    let mut opts = PlotOptions::in_memory();
    opts.xaxis = AxisScale::Normal;
    opts.xlim = Some(Limits::both(0.0, 1.5));
    let err = charts::norm_xaxis(numbered(1, 30), &opts, &ProbabilityOptions::default()).unwrap_err();
    assert!(matches!(err, PlotError::ProbabilityLimits { .. }), "{err}");
}

#[test]
fn limits_must_be_ordered() {
    assert!(matches!(
        know_your_limits(Some(Limits::both(5.0, 1.0)), AxisScale::Arithmetic),
        Err(PlotError::LimitOrder { .. })
    ));
    assert!(know_your_limits(Some(Limits::new(None, Some(-3.0))), AxisScale::Arithmetic).is_ok());
    assert_eq!(know_your_limits(None, AxisScale::Log).unwrap(), None);
}

#[test]
fn paired_charts_need_even_columns() {
    let opts = PlotOptions::in_memory();
    let err = charts::xy(numbered(3, 10), &opts).unwrap_err();
    assert!(matches!(err, PlotError::ColumnParity { columns: 3, .. }), "{err}");
    assert!(charts::xy(numbered(4, 10), &opts).is_ok());
    assert!(charts::xy(numbered(1, 10), &opts).is_ok());
}

#[test]
fn legend_names_are_validated() {
    let mut frame = daily(2, 5);
    let err = check_column_legend(PlotKind::Time, &mut frame, &["a".into(), "a".into()]).unwrap_err();
    assert!(matches!(err, PlotError::DuplicateLegend { .. }));

    let err = check_column_legend(PlotKind::Time, &mut frame, &["a".into(), "b".into(), "c".into()]).unwrap_err();
    assert!(matches!(err, PlotError::LegendCount { columns: 2, names: 3 }));

    let labels = check_column_legend(PlotKind::Time, &mut frame, &["flow".into(), "rain".into()]).unwrap();
    assert_eq!(labels, vec!["flow", "rain"]);
    assert_eq!(frame.names(), vec!["flow", "rain"]);
}

#[test]
fn paired_legend_names_one_per_pair() {
    let mut frame = numbered(4, 5);
    assert_eq!(check_column_legend(PlotKind::Xy, &mut frame, &[]).unwrap(), vec!["s1", "s3"]);
    let labels = check_column_legend(PlotKind::Xy, &mut frame, &["left".into(), "right".into()]).unwrap();
    assert_eq!(labels, vec!["left", "right"]);
    assert_eq!(frame.column(1).name, "left");
    assert_eq!(frame.column(3).name, "right");
}

#[test]
fn time_charts_need_dates() {
    let opts = PlotOptions::in_memory();
    for result in [
        charts::time(numbered(1, 10), &opts),
        charts::kde_time(numbered(1, 10), &opts),
        charts::heatmap(numbered(1, 10), &opts),
    ] {
        assert!(matches!(result, Err(PlotError::NotDatetimeIndex { .. })));
    }
}

#[test]
fn heatmap_needs_daily_steps() {
    let hourly = Frame::new(
        Index::DateTime((0..48).map(|h| day(0) + chrono::Duration::hours(h)).collect()),
        vec![Column::new("t", (0..48).map(f64::from).collect())],
    )
    .unwrap();
    let err = charts::heatmap(hourly, &PlotOptions::in_memory()).unwrap_err();
    assert!(matches!(err, PlotError::NotDaily { .. }), "{err}");
}

#[test]
fn single_series_charts_reject_more_columns() {
    let opts = PlotOptions::in_memory();
    let two = || numbered(2, 30);
    assert!(matches!(charts::autocorrelation(two(), &opts), Err(PlotError::SeriesCount { expected: 1, found: 2, .. })));
    assert!(matches!(charts::lag_plot(two(), &opts, 1), Err(PlotError::SeriesCount { .. })));
    assert!(matches!(
        charts::bootstrap(two(), &opts, &BootstrapOptions { seed: Some(1), ..Default::default() }),
        Err(PlotError::SeriesCount { .. })
    ));
    assert!(matches!(
        charts::waterfall(two(), &opts, &WaterfallOptions::default()),
        Err(PlotError::SeriesCount { expected: 1, .. })
    ));
    assert!(matches!(
        charts::hexbin(numbered(4, 30), &opts, &HexbinOptions::default()),
        Err(PlotError::SeriesCount { expected: 2, .. })
    ));
    assert!(matches!(charts::taylor(numbered(1, 30), &opts), Err(PlotError::SeriesCount { expected: 2, .. })));
}

#[test]
fn reference_line_companions_must_line_up() {
    let mut opts = PlotOptions::in_memory();
    opts.hlines.at = vec![1.0, 2.0, 3.0];
    opts.hlines.colors = vec!["r".into()];
    assert!(charts::time(daily(1, 20), &opts).is_ok());

    opts.hlines.colors = vec!["r".into(), "g".into()];
    let err = charts::time(daily(1, 20), &opts).unwrap_err();
    assert!(matches!(err, PlotError::InvalidOption { option: "hlines", .. }), "{err}");
}

#[test]
fn unknown_theme_is_reported() {
    let mut opts = PlotOptions::in_memory();
    opts.plot_styles = vec!["no-such-theme".into()];
    let err = charts::time(daily(1, 20), &opts).unwrap_err();
    assert!(matches!(err, PlotError::UnknownStyle(ref s) if s == "no-such-theme"), "{err}");
}

#[test]
fn style_lists_trim_entries_but_keep_blanks() {
    assert_eq!("r*--, b".parse::<StyleList>().unwrap(), StyleList::list(["r*--", "b"]));
    assert_eq!(" ".parse::<StyleList>().unwrap(), StyleList::blank());
    assert_eq!(" auto ".parse::<StyleList>().unwrap(), StyleList::Auto);

    let mut opts = PlotOptions::in_memory();
    opts.style = "r*--, b".parse().unwrap();
    assert!(charts::time(daily(2, 20), &opts).is_ok());
}

#[test]
fn probability_scale_belongs_to_probability_axes() {
    let mut opts = PlotOptions::in_memory();
    opts.yaxis = AxisScale::Normal;
    let err = charts::xy(numbered(2, 10), &opts).unwrap_err();
    assert!(matches!(err, PlotError::InvalidOption { option: "yaxis", .. }), "{err}");

    let mut opts = PlotOptions::in_memory();
    opts.xaxis = AxisScale::Normal;
    let err = charts::time(daily(1, 10), &opts).unwrap_err();
    assert!(matches!(err, PlotError::InvalidOption { option: "xaxis", .. }), "{err}");

    // the probability axis itself accepts it, the value axis does not
    assert!(charts::norm_xaxis(numbered(1, 30), &opts, &ProbabilityOptions::default()).is_ok());
    let err = charts::norm_yaxis(numbered(1, 30), &opts, &ProbabilityOptions::default()).unwrap_err();
    assert!(matches!(err, PlotError::InvalidOption { option: "xaxis", .. }), "{err}");
}

#[test]
fn bootstrap_takes_the_common_decoration() {
    let boot = BootstrapOptions { size: 10, samples: 20, seed: Some(3) };
    let mut opts = PlotOptions::in_memory();
    opts.title = "Resampled".into();
    opts.hlines.at = vec![5.0];
    let fig = charts::bootstrap(numbered(1, 30), &opts, &boot).unwrap();
    assert_eq!(fig.title, "Resampled");
    let with_lines = fig.panels.iter().filter(|p| p.layers.iter().any(|l| matches!(l, Layer::RefLine(_)))).count();
    assert_eq!(with_lines, 3);

    opts.hlines.colors = vec!["r".into(), "g".into()];
    let err = charts::bootstrap(numbered(1, 30), &opts, &boot).unwrap_err();
    assert!(matches!(err, PlotError::InvalidOption { option: "hlines", .. }), "{err}");
}

#[test]
fn heatmap_honours_requested_limits() {
    let fig = charts::heatmap(daily(1, 400), &PlotOptions::in_memory()).unwrap();
    assert_eq!(fig.panels[0].x.limits, Limits::both(0.5, 366.5));

    let mut opts = PlotOptions::in_memory();
    opts.xlim = Some(Limits::both(1.0, 31.0));
    let fig = charts::heatmap(daily(1, 400), &opts).unwrap();
    assert_eq!(fig.panels[0].x.limits, Limits::both(1.0, 31.0));
    assert_eq!(fig.panels[0].y.limits, Limits::both(2020.5, 2022.5));
}
