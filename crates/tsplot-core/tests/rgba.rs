// File: crates/tsplot-core/tests/rgba.rs
// Purpose: Validate RGBA rendering buffer shape and a few pixels.

use tsplot_core::charts::{self, BarOptions, HistogramOptions};
use tsplot_core::{AxisScale, Column, Figure, Frame, Index, PlotOptions};

/// Pixels painted exactly in the figure's first cycle color.
fn first_color_pixels(fig: &Figure) -> usize {
    let c = fig.theme.cycle_color(0);
    let (px, ..) = fig.render_rgba8().expect("rgba render");
    px.chunks_exact(4).filter(|p| p[0] == c.r() && p[1] == c.g() && p[2] == c.b()).count()
}

#[test]
fn render_rgba8_buffer() {
    let frame = Frame::new(
        Index::Number(vec![0.0, 1.0, 2.0, 3.0, 4.0]),
        vec![Column::new("y", vec![0.0, 1.0, 2.0, 3.0, 4.0])],
    )
    .unwrap();
    let opts = PlotOptions { figsize: (3.0, 2.0), dpi: 100.0, ..PlotOptions::in_memory() };
    let fig = charts::xy(frame, &opts).expect("xy chart");

    let (px, w, h, stride) = fig.render_rgba8().expect("rgba render");
    assert_eq!((w, h), (300, 200));
    assert_eq!(w as usize * h as usize * 4, px.len());
    assert_eq!(stride, (w as usize) * 4);

    // Check background alpha in top-left pixel (RGBA)
    let a = px[3];
    assert_eq!(a, 255);
}

#[test]
fn dark_theme_paints_a_dark_background() {
    let frame = Frame::new(Index::Number(vec![0.0, 1.0]), vec![Column::new("y", vec![1.0, 2.0])]).unwrap();
    let opts = PlotOptions {
        figsize: (2.0, 2.0),
        plot_styles: vec!["dark_background".into()],
        ..PlotOptions::in_memory()
    };
    let (px, ..) = charts::xy(frame, &opts).unwrap().render_rgba8().unwrap();
    assert!(px[0] < 64 && px[1] < 64 && px[2] < 64, "top-left pixel {:?}", &px[..4]);
}

#[test]
fn bars_on_a_log_axis_rise_from_the_floor() {
    let labels = ["low", "mid", "high"].map(String::from).to_vec();
    let frame = Frame::new(Index::Label(labels), vec![Column::new("v", vec![10.0, 100.0, 1000.0])]).unwrap();
    let opts = PlotOptions { figsize: (4.0, 3.0), dpi: 80.0, yaxis: AxisScale::Log, ..PlotOptions::in_memory() };
    let vertical = charts::bar(frame.clone(), &opts, &BarOptions::default()).unwrap();
    assert!(first_color_pixels(&vertical) > 200);

    let stacked = charts::bar_stacked(frame.clone(), &opts, &BarOptions::default()).unwrap();
    assert!(first_color_pixels(&stacked) > 200);

    let opts = PlotOptions { yaxis: AxisScale::Arithmetic, xaxis: AxisScale::Log, ..opts };
    let horizontal = charts::barh(frame, &opts, &BarOptions::default()).unwrap();
    assert!(first_color_pixels(&horizontal) > 200);
}

#[test]
fn histogram_on_a_log_count_axis() {
    let values: Vec<f64> = (0..200).map(|i| (i as f64 * 0.7).sin() * 5.0).collect();
    let frame = Frame::new(Index::Number((0..200).map(f64::from).collect()), vec![Column::new("v", values)]).unwrap();
    let opts = PlotOptions { figsize: (4.0, 3.0), dpi: 80.0, yaxis: AxisScale::Log, ..PlotOptions::in_memory() };
    let fig = charts::histogram(frame, &opts, &HistogramOptions { bins: 8 }).unwrap();
    assert!(first_color_pixels(&fig) > 200);
}
