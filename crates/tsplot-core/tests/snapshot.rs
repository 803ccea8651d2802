// File: crates/tsplot-core/tests/snapshot.rs
// Purpose: Golden snapshot harness with bless flow.
// Behavior:
// - Renders a deterministic small chart to PNG bytes.
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot file.
// - Else, if snapshot exists, compares decoded pixels for exact match.
// - Else, logs a note and returns (skips) without failing to ease first run.

use tsplot_core::charts::{self, BarOptions};
use tsplot_core::{Column, Frame, Index, PlotOptions};

fn render_bytes() -> Vec<u8> {
    let frame = Frame::new(
        Index::Number(vec![1.0, 2.0, 3.0, 4.0]),
        vec![Column::new("a", vec![1.0, 3.0, 2.0, 4.0]), Column::new("b", vec![2.0, 1.0, 3.0, 2.5])],
    )
    .unwrap();
    // no legend box; tick labels still depend on the installed fonts
    let opts = PlotOptions { figsize: (4.0, 3.0), legend: Some(false), ..PlotOptions::in_memory() };
    let fig = charts::bar_stacked(frame, &opts, &BarOptions::default()).expect("bar chart");
    fig.render_png_bytes().expect("render png")
}

#[test]
fn golden_stacked_bar_chart() {
    let bytes = render_bytes();
    let snap_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__");
    let snap_path = snap_dir.join("stacked_bar.png");

    let update = std::env::var("UPDATE_SNAPSHOTS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if update {
        std::fs::create_dir_all(&snap_dir).expect("create snapshots dir");
        std::fs::write(&snap_path, &bytes).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", snap_path.display(), bytes.len());
        return;
    }

    if snap_path.exists() {
        let want = std::fs::read(&snap_path).expect("read snapshot");
        let got_img = image::load_from_memory(&bytes).expect("decode got").to_rgba8();
        let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
        assert_eq!(got_img.dimensions(), want_img.dimensions());
        assert_eq!(got_img.as_raw(), want_img.as_raw(), "rendered pixels differ from golden snapshot: {}", snap_path.display());
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", snap_path.display());
    }
}

#[test]
fn rendering_is_deterministic() {
    let a = image::load_from_memory(&render_bytes()).unwrap().to_rgba8();
    let b = image::load_from_memory(&render_bytes()).unwrap().to_rgba8();
    assert_eq!(a.as_raw(), b.as_raw());
}
