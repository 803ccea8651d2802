// File: crates/tsplot/tests/cli.rs
// Purpose: Argument parsing for the chart subcommands and end-to-end runs writing images.

use std::path::PathBuf;

use clap::Parser;
use tsplot_cli::{about_text, run, ChartCommand, Cli, Command};
use tsplot_core::{AxisScale, Limits, PlotKind, StyleList};

fn out_dir() -> PathBuf {
    let dir = PathBuf::from("target/test_out/cli");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Daily three-column series for 60 days.
fn write_csv(name: &str) -> PathBuf {
    let path = out_dir().join(name);
    let mut text = String::from("Datetime,flow,rain,temp\n");
    for d in 0..60 {
        let date = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(d);
        let t = d as f64;
        text.push_str(&format!("{date},{:.3},{:.3},{:.3}\n", 10.0 + (t / 5.0).sin() * 3.0, (t * 7.0) % 4.0, 5.0 + t / 10.0));
    }
    std::fs::write(&path, text).unwrap();
    path
}

fn chart(cli: &Cli) -> &ChartCommand {
    match &cli.command {
        Command::Chart(c) => c,
        Command::About => panic!("expected a chart subcommand"),
    }
}

#[test]
fn parses_common_flags() {
    let cli = Cli::try_parse_from([
        "tsplot",
        "time",
        "--input-ts",
        "data.csv",
        "--columns",
        "flow,rain",
        "--ylim",
        "-1,5",
        "--yaxis",
        "log",
        "--figsize",
        "8,4",
        "--legend",
        "false",
        "--sharex",
        "false",
    ])
    .unwrap();
    let c = chart(&cli);
    assert_eq!(c.kind(), PlotKind::Time);
    let common = c.common();
    assert_eq!(common.columns, vec!["flow", "rain"]);
    assert_eq!(common.ylim, Some(Limits::both(-1.0, 5.0)));
    assert_eq!(common.yaxis, AxisScale::Log);
    assert_eq!(common.figsize, (8.0, 4.0));
    assert_eq!(common.legend, Some(false));
    assert!(!common.sharex);
    assert_eq!(common.ofilename, PathBuf::from("plot.png"));
}

#[test]
fn defaults_match_the_library() {
    let cli = Cli::try_parse_from(["tsplot", "xy"]).unwrap();
    let opts = chart(&cli).common().plot_options();
    assert_eq!(opts.colors, StyleList::Auto);
    assert_eq!(opts.markerstyles, StyleList::blank());
    assert_eq!(opts.plot_styles, vec!["bright"]);
    assert_eq!(opts.figsize, (10.0, 6.0));
    assert!(opts.sharex && opts.mark_right);
    assert_eq!(chart(&cli).common().input_ts, "-");
}

#[test]
fn subcommands_use_snake_case_names() {
    for (name, kind) in [
        ("bar_stacked", PlotKind::BarStacked),
        ("kde_time", PlotKind::KdeTime),
        ("lognorm_yaxis", PlotKind::LognormYaxis),
        ("scatter_matrix", PlotKind::ScatterMatrix),
        ("probability_density", PlotKind::Kde),
    ] {
        let cli = Cli::try_parse_from(["tsplot", name]).unwrap();
        assert_eq!(chart(&cli).kind(), kind, "{name}");
    }
    assert!(Cli::try_parse_from(["tsplot", "bar-stacked"]).is_err());
}

#[test]
fn chart_specific_flags() {
    let cli = Cli::try_parse_from(["tsplot", "lag_plot", "--lag", "3"]).unwrap();
    assert!(matches!(chart(&cli), ChartCommand::LagPlot(a) if a.lag == 3));

    let cli = Cli::try_parse_from(["tsplot", "bootstrap", "--bootstrap-size", "20", "--seed", "7"]).unwrap();
    assert!(matches!(chart(&cli), ChartCommand::Bootstrap(a) if a.bootstrap_size == 20 && a.seed == Some(7)));

    let cli = Cli::try_parse_from(["tsplot", "boxplot", "--vert", "false"]).unwrap();
    assert!(matches!(chart(&cli), ChartCommand::Boxplot(a) if !a.vert));

    // histogram-only flag is rejected elsewhere
    assert!(Cli::try_parse_from(["tsplot", "time", "--bins", "5"]).is_err());
}

#[test]
fn rejects_bad_values() {
    assert!(Cli::try_parse_from(["tsplot", "time", "--xaxis", "sideways"]).is_err());
    assert!(Cli::try_parse_from(["tsplot", "time", "--figsize", "10"]).is_err());
    assert!(Cli::try_parse_from(["tsplot", "norm_xaxis", "--plotting-position", "nonsense"]).is_err());
    assert!(Cli::try_parse_from(["tsplot", "scatter_matrix", "--diagonal", "violin"]).is_err());
}

#[test]
fn about_lists_charts() {
    let text = about_text();
    assert!(text.starts_with("tsplot "));
    assert!(text.contains("  kde_time\n"));
    assert!(text.contains("  waterfall\n"));
    assert!(text.contains("  bright\n"));
    assert!(Cli::try_parse_from(["tsplot", "about"]).is_ok());
}

#[test]
fn time_chart_end_to_end() {
    let input = write_csv("time.csv");
    let out = out_dir().join("time.png");
    let _ = std::fs::remove_file(&out);
    let cli = Cli::try_parse_from([
        "tsplot",
        "time",
        "--input-ts",
        input.to_str().unwrap(),
        "--ofilename",
        out.to_str().unwrap(),
        "--title",
        "Flow",
        "--hlines-y",
        "10",
    ])
    .unwrap();
    run(&cli).expect("time chart");
    let bytes = std::fs::read(&out).expect("output exists");
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");
}

#[test]
fn svg_output_end_to_end() {
    let input = write_csv("svg.csv");
    let out = out_dir().join("kde.svg");
    let cli = Cli::try_parse_from([
        "tsplot",
        "kde",
        "--input-ts",
        input.to_str().unwrap(),
        "--ofilename",
        out.to_str().unwrap(),
    ])
    .unwrap();
    run(&cli).expect("kde chart");
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("<svg"));
}

#[test]
fn style_count_error_surfaces() {
    let input = write_csv("styles.csv");
    let out = out_dir().join("styles.png");
    let cli = Cli::try_parse_from([
        "tsplot",
        "time",
        "--input-ts",
        input.to_str().unwrap(),
        "--ofilename",
        out.to_str().unwrap(),
        "--style",
        "b-,r--",
    ])
    .unwrap();
    let err = run(&cli).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("'time' chart"), "{chain}");
    assert!(chain.contains("style strings"), "{chain}");
}

#[test]
fn unsupported_extension_fails() {
    let input = write_csv("ext.csv");
    let cli = Cli::try_parse_from([
        "tsplot",
        "time",
        "--input-ts",
        input.to_str().unwrap(),
        "--ofilename",
        "target/test_out/cli/plot.gif",
    ])
    .unwrap();
    let err = run(&cli).unwrap_err();
    assert!(format!("{err:#}").contains("unsupported image format"));
}
