use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, black_box};
use tsplot_core::stats::GaussianKde;

fn gen_values(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 * 0.37).sin() * 10.0 + (i % 17) as f64).collect()
}

fn bench_kde(c: &mut Criterion) {
    let mut group = c.benchmark_group("kde");
    for &n in &[1_000usize, 10_000usize] {
        let kde = GaussianKde::new(&gen_values(n)).unwrap();
        for &points in &[200usize, 1_000usize] {
            let xs = kde.default_support(points);
            group.bench_with_input(BenchmarkId::from_parameter(format!("n{n}_p{points}")), &xs, |b, xs| {
                b.iter(|| black_box(kde.evaluate_many(xs)));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_kde);
criterion_main!(benches);
