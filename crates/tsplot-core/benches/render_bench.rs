use anyhow::Result;
use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion, black_box};
use tsplot_core::charts;
use tsplot_core::{Column, Figure, Frame, Index, PlotOptions};

fn build_time_chart(n: usize) -> Figure {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let index = Index::DateTime((0..n as i64).map(|d| start + chrono::Duration::days(d)).collect());
    let values = (0..n).map(|i| (i as f64 * 0.01).sin() * 10.0 + (i as f64 * 0.0001)).collect();
    let frame = Frame::new(index, vec![Column::new("flow", values)]).unwrap();
    let opts = PlotOptions { figsize: (8.0, 5.0), ..PlotOptions::in_memory() };
    charts::time(frame, &opts).unwrap()
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_png_bytes");
    for &n in &[10_000usize, 50_000usize] {
        group.bench_function(format!("time_{n}"), |b| {
            let fig = build_time_chart(n);
            b.iter(|| -> Result<()> {
                let bytes = fig.render_png_bytes()?;
                black_box(bytes);
                Ok(())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
