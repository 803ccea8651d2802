// File: crates/tsplot-core/src/render.rs
// Summary: Draws a Figure on a Skia canvas and writes raster (via `image`) or SVG output.

use std::io::Cursor;
use std::path::Path;

use skia_safe as skia;
use tracing::{debug, info};

use crate::axis::Axis;
use crate::color::{viridis, with_alpha};
use crate::error::{PlotError, Result};
use crate::figure::{CellLayer, Colorbar, DrawStyle, Figure, Layer, LineLayer, Orientation, Panel, PolygonLayer};
use crate::scale::{self, AxisMap, ScaleKind};
use crate::style::{Hatch, LineStyle, Marker};
use crate::text::{Anchor, TextShaper};
use crate::theme::Theme;

/// Base font size in points.
const FONT_PT: f32 = 10.0;

/// Image formats picked from the output file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
    Tiff,
    Svg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => Ok(OutputFormat::Png),
            Some("jpg" | "jpeg") => Ok(OutputFormat::Jpeg),
            Some("bmp") => Ok(OutputFormat::Bmp),
            Some("tif" | "tiff") => Ok(OutputFormat::Tiff),
            Some("svg") => Ok(OutputFormat::Svg),
            _ => Err(PlotError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Screen margins around a panel's plot area, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Insets {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

impl Insets {
    fn for_panel(panel: &Panel, fs: f32) -> Self {
        let rotated = panel.x.label_rotation.abs() > 1.0;
        let right_axis = panel.y2.is_some() || panel.colorbar.is_some();
        Self {
            left: fs * if panel.y.label.is_empty() { 5.0 } else { 6.6 },
            right: fs * if right_axis { 7.5 } else { 1.6 },
            top: fs * if panel.title.is_empty() { 1.0 } else { 2.4 },
            bottom: fs * if rotated { 6.5 } else if panel.x.label.is_empty() { 2.6 } else { 4.2 },
        }
    }
}

struct Ctx<'a> {
    canvas: &'a skia::Canvas,
    text: &'a TextShaper,
    theme: &'a Theme,
    /// Base font size in pixels.
    fs: f32,
}

/// Mapped plot rectangle and the axis transforms of one panel.
struct PlotArea {
    rect: skia::Rect,
    x: AxisMap,
    y: AxisMap,
    y2: Option<AxisMap>,
}

impl PlotArea {
    fn y_for(&self, secondary: bool) -> &AxisMap {
        if secondary { self.y2.as_ref().unwrap_or(&self.y) } else { &self.y }
    }
}

impl Figure {
    /// Paint the whole figure onto `canvas`.
    pub fn draw(&self, canvas: &skia::Canvas) {
        let text = TextShaper::new();
        let fs = FONT_PT * self.dpi / 72.0;
        let ctx = Ctx { canvas, text: &text, theme: &self.theme, fs };
        canvas.clear(self.theme.background);

        let (w, h) = (self.width as f32, self.height as f32);
        let title_h = if self.title.is_empty() { 0.0 } else { fs * 2.6 };
        if !self.title.is_empty() {
            text.draw(canvas, &self.title, w / 2.0, fs * 1.8, fs * 1.25, self.theme.text, Anchor::Center);
        }
        for panel in &self.panels {
            let area = skia::Rect::from_ltrb(
                panel.rect.left * w,
                title_h + panel.rect.top * (h - title_h),
                panel.rect.right * w,
                title_h + panel.rect.bottom * (h - title_h),
            );
            draw_panel(&ctx, panel, area);
        }
    }

    /// Render to a tightly packed RGBA8 buffer: `(pixels, width, height, stride)`.
    pub fn render_rgba8(&self) -> Result<(Vec<u8>, u32, u32, usize)> {
        let (w, h) = (self.width, self.height);
        let mut surface = skia::surfaces::raster_n32_premul((w, h))
            .ok_or_else(|| PlotError::Render("failed to create raster surface".into()))?;
        self.draw(surface.canvas());

        let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
        let stride = w as usize * 4;
        let mut px = vec![0u8; stride * h as usize];
        if !surface.read_pixels(&info, &mut px, stride, (0, 0)) {
            return Err(PlotError::Render("failed to read back raster pixels".into()));
        }
        Ok((px, w as u32, h as u32, stride))
    }

    /// Encode the figure in `format`.
    pub fn render_bytes(&self, format: OutputFormat) -> Result<Vec<u8>> {
        let fmt = match format {
            OutputFormat::Svg => return Ok(self.render_svg()),
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Tiff => image::ImageFormat::Tiff,
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
            OutputFormat::Bmp => image::ImageFormat::Bmp,
        };
        let (px, w, h, _) = self.render_rgba8()?;
        let rgba = image::RgbaImage::from_raw(w, h, px)
            .ok_or_else(|| PlotError::Render("raster buffer does not match the figure size".into()))?;
        let mut img = image::DynamicImage::ImageRgba8(rgba);
        if matches!(format, OutputFormat::Jpeg | OutputFormat::Bmp) {
            // no alpha channel in these encoders
            img = image::DynamicImage::ImageRgb8(img.to_rgb8());
        }
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), fmt)?;
        Ok(bytes)
    }

    pub fn render_png_bytes(&self) -> Result<Vec<u8>> { self.render_bytes(OutputFormat::Png) }

    /// SVG document bytes.
    pub fn render_svg(&self) -> Vec<u8> {
        let bounds = skia::Rect::from_wh(self.width as f32, self.height as f32);
        let canvas = skia::svg::Canvas::new(bounds, None);
        self.draw(&canvas);
        canvas.end().as_bytes().to_vec()
    }

    /// Write the figure to `path`; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = OutputFormat::from_path(path)?;
        let bytes = self.render_bytes(format)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), ?format, "wrote figure");
        Ok(())
    }
}

fn draw_panel(ctx: &Ctx<'_>, panel: &Panel, area: skia::Rect) {
    let fs = ctx.fs;
    let ins = Insets::for_panel(panel, fs);
    let (l, t) = (area.left + ins.left, area.top + ins.top);
    let r = (area.right - ins.right).max(l + 8.0);
    let b = (area.bottom - ins.bottom).max(t + 8.0);
    let rect = skia::Rect::from_ltrb(l, t, r, b);

    let (xlo, mut xhi) = panel.x.resolve_range(panel.x_extent());
    let (mut ylo, mut yhi) = panel.y.resolve_range(panel.y_extent(false));
    if panel.equal_aspect && panel.x.kind == ScaleKind::Linear && panel.y.kind == ScaleKind::Linear {
        let ux = (xhi - xlo) / rect.width() as f64;
        let uy = (yhi - ylo) / rect.height() as f64;
        if ux > uy {
            yhi = ylo + ux * rect.height() as f64;
        } else {
            xhi = xlo + uy * rect.width() as f64;
        }
    }
    if xhi <= xlo { xhi = xlo + 1.0; }
    if yhi <= ylo { ylo = yhi - 1.0; }
    let (x0, x1) = if panel.x.inverted { (r, l) } else { (l, r) };
    let (y0, y1) = if panel.y.inverted { (t, b) } else { (b, t) };
    let y2 = panel.y2.as_ref().map(|a| {
        let (lo, hi) = a.resolve_range(panel.y_extent(true));
        let (p0, p1) = if a.inverted { (t, b) } else { (b, t) };
        AxisMap::new(a.kind, lo, hi, p0, p1)
    });
    let frame = PlotArea {
        rect,
        x: AxisMap::new(panel.x.kind, xlo, xhi, x0, x1),
        y: AxisMap::new(panel.y.kind, ylo, yhi, y0, y1),
        y2,
    };
    debug!(xlo, xhi, ylo, yhi, layers = panel.layers.len(), "panel ranges");

    let canvas = ctx.canvas;
    let mut bg = fill_paint(ctx.theme.plot_background);
    bg.set_anti_alias(false);
    canvas.draw_rect(rect, &bg);

    let xticks = panel.x.tick_marks(xlo, xhi);
    let yticks = panel.y.tick_marks(ylo, yhi);
    if panel.grid {
        let grid = stroke_paint(ctx.theme.grid, 0.8);
        for (v, _) in &xticks {
            let px = frame.x.to_px(*v);
            canvas.draw_line((px, t), (px, b), &grid);
        }
        for (v, _) in &yticks {
            let py = frame.y.to_px(*v);
            canvas.draw_line((l, py), (r, py), &grid);
        }
    }

    canvas.save();
    canvas.clip_rect(rect, None, true);
    for layer in &panel.layers {
        match layer {
            Layer::Cells(c) => draw_cells(ctx, &frame, c),
            Layer::Polygon(p) => draw_polygon(ctx, &frame, p),
            _ => {}
        }
    }
    for layer in &panel.layers {
        match layer {
            Layer::Line(line) => draw_line(ctx, &frame, line),
            Layer::RefLine(rl) => {
                let mut paint = stroke_paint(rl.color, rl.width);
                apply_dash(&mut paint, rl.style, rl.width);
                let (a, b) = match rl.orientation {
                    Orientation::Horizontal => {
                        let y = frame.y.to_px(rl.at);
                        let xa = rl.from.map_or(l, |v| frame.x.to_px(v));
                        let xb = rl.to.map_or(r, |v| frame.x.to_px(v));
                        ((xa, y), (xb, y))
                    }
                    Orientation::Vertical => {
                        let x = frame.x.to_px(rl.at);
                        let ya = rl.from.map_or(b, |v| frame.y.to_px(v));
                        let yb = rl.to.map_or(t, |v| frame.y.to_px(v));
                        ((x, ya), (x, yb))
                    }
                };
                if rl.style != LineStyle::None {
                    canvas.draw_line(a, b, &paint);
                }
            }
            _ => {}
        }
    }
    canvas.restore();

    // text annotations may sit outside the plot area (bar labels, taylor arcs)
    for layer in &panel.layers {
        if let Layer::Text(tl) = layer {
            let color = tl.color.unwrap_or(ctx.theme.text);
            let (px, py) = (frame.x.to_px(tl.x), frame.y.to_px(tl.y));
            ctx.text.draw_rotated(canvas, &tl.text, px, py, fs * tl.scale, color, tl.anchor, tl.rotation);
        }
    }

    canvas.draw_rect(rect, &stroke_paint(ctx.theme.axis_line, 1.0));

    draw_x_ticks(ctx, &panel.x, &frame, &xticks);
    draw_y_ticks(ctx, &panel.y, &frame.y, &yticks, l, false);
    if let (Some(axis), Some(map)) = (&panel.y2, &frame.y2) {
        let marks = axis.tick_marks(map.lo, map.hi);
        draw_y_ticks(ctx, axis, map, &marks, r, true);
    }

    if !panel.x.label.is_empty() {
        let extra = if panel.x.label_rotation.abs() > 1.0 { fs * 4.6 } else { fs * 3.0 };
        ctx.text.draw(canvas, &panel.x.label, (l + r) / 2.0, b + extra, fs, ctx.theme.text, Anchor::Center);
    }
    if !panel.y.label.is_empty() {
        ctx.text.draw_rotated(canvas, &panel.y.label, l - fs * 5.4, (t + b) / 2.0, fs, ctx.theme.text, Anchor::Center, 90.0);
    }
    if let Some(a) = panel.y2.as_ref().filter(|a| !a.label.is_empty()) {
        ctx.text.draw_rotated(canvas, &a.label, r + fs * 6.6, (t + b) / 2.0, fs, ctx.theme.text, Anchor::Center, -90.0);
    }
    if !panel.title.is_empty() {
        ctx.text.draw(canvas, &panel.title, (l + r) / 2.0, t - fs * 0.7, fs * 1.1, ctx.theme.text, Anchor::Center);
    }
    if panel.legend && panel.has_labels() {
        draw_legend(ctx, panel, &frame);
    }
    if let Some(cb) = &panel.colorbar {
        draw_colorbar(ctx, cb, rect);
    }
}

fn draw_x_ticks(ctx: &Ctx<'_>, axis: &Axis, frame: &PlotArea, marks: &[(f64, String)]) {
    let fs = ctx.fs;
    let tick = stroke_paint(ctx.theme.tick, 1.0);
    let b = frame.rect.bottom;
    for (v, label) in marks {
        let px = frame.x.to_px(*v);
        ctx.canvas.draw_line((px, b), (px, b + fs * 0.35), &tick);
        if label.is_empty() { continue; }
        if axis.label_rotation.abs() > 1.0 {
            let anchor = if axis.label_rotation > 0.0 { Anchor::Right } else { Anchor::Left };
            ctx.text.draw_rotated(ctx.canvas, label, px, b + fs * 1.0, fs * 0.85, ctx.theme.text, anchor, axis.label_rotation);
        } else {
            ctx.text.draw(ctx.canvas, label, px, b + fs * 1.4, fs * 0.85, ctx.theme.text, Anchor::Center);
        }
    }
}

fn draw_y_ticks(ctx: &Ctx<'_>, axis: &Axis, map: &AxisMap, marks: &[(f64, String)], at: f32, right: bool) {
    let fs = ctx.fs;
    let tick = stroke_paint(ctx.theme.tick, 1.0);
    let dir = if right { 1.0 } else { -1.0 };
    for (v, label) in marks {
        let py = map.to_px(*v);
        ctx.canvas.draw_line((at, py), (at + dir * fs * 0.35, py), &tick);
        if label.is_empty() { continue; }
        let anchor = if right { Anchor::Left } else { Anchor::Right };
        let x = at + dir * fs * 0.6;
        ctx.text.draw_rotated(ctx.canvas, label, x, py + fs * 0.3, fs * 0.85, ctx.theme.text, anchor, axis.label_rotation);
    }
}

fn to_screen(frame: &PlotArea, pts: &[(f64, f64)], secondary: bool) -> Vec<Option<skia::Point>> {
    let y = frame.y_for(secondary);
    pts.iter()
        .map(|&(px, py)| {
            if px.is_nan() || py.is_nan() || !frame.x.kind.accepts(px) || !y.kind.accepts(py) {
                None
            } else {
                Some(skia::Point::new(frame.x.to_px(px), y.to_px(py)))
            }
        })
        .collect()
}

/// Expand a run of points into the steps requested by `style`.
fn step_points(run: &[skia::Point], style: DrawStyle) -> Vec<skia::Point> {
    if style == DrawStyle::Default || run.len() < 2 {
        return run.to_vec();
    }
    let mut out = Vec::with_capacity(run.len() * 3);
    out.push(run[0]);
    for w in run.windows(2) {
        let (a, b) = (w[0], w[1]);
        match style {
            DrawStyle::StepsPre => out.push(skia::Point::new(a.x, b.y)),
            DrawStyle::StepsPost => out.push(skia::Point::new(b.x, a.y)),
            DrawStyle::StepsMid => {
                let mid = (a.x + b.x) / 2.0;
                out.push(skia::Point::new(mid, a.y));
                out.push(skia::Point::new(mid, b.y));
            }
            DrawStyle::Default => {}
        }
        out.push(b);
    }
    out
}

fn draw_line(ctx: &Ctx<'_>, frame: &PlotArea, line: &LineLayer) {
    let pts = to_screen(frame, &line.points, line.secondary);
    if line.style != LineStyle::None {
        let mut paint = stroke_paint(line.color, line.width);
        paint.set_stroke_join(skia::paint::Join::Round);
        apply_dash(&mut paint, line.style, line.width);
        let mut path = skia::Path::new();
        let mut run: Vec<skia::Point> = Vec::new();
        let flush = |run: &mut Vec<skia::Point>, path: &mut skia::Path| {
            if run.len() >= 2 {
                let stepped = step_points(run, line.draw_style);
                path.move_to(stepped[0]);
                for p in &stepped[1..] {
                    path.line_to(*p);
                }
            }
            run.clear();
        };
        for p in &pts {
            match p {
                Some(p) => run.push(*p),
                None => flush(&mut run, &mut path),
            }
        }
        flush(&mut run, &mut path);
        ctx.canvas.draw_path(&path, &paint);
    }
    if !line.marker.is_none() {
        for p in pts.iter().flatten() {
            draw_marker(ctx.canvas, line.marker, *p, line.marker_size * ctx.fs / 13.9, line.color);
        }
    }
}

/// Like `to_screen`, but a bar base at or below zero on a log axis sits on the axis floor.
fn polygon_to_screen(frame: &PlotArea, pts: &[(f64, f64)]) -> Vec<skia::Point> {
    let place = |map: &AxisMap, v: f64| -> Option<f32> {
        if map.kind.accepts(v) {
            Some(map.to_px(v))
        } else if map.kind == ScaleKind::Log10 && v.is_finite() && v <= 0.0 {
            Some(map.to_px(map.lo))
        } else {
            None
        }
    };
    pts.iter()
        .filter_map(|&(x, y)| Some(skia::Point::new(place(&frame.x, x)?, place(&frame.y, y)?)))
        .collect()
}

fn draw_polygon(ctx: &Ctx<'_>, frame: &PlotArea, poly: &PolygonLayer) {
    let pts = polygon_to_screen(frame, &poly.points);
    if pts.len() < 3 { return; }
    let mut path = skia::Path::new();
    path.move_to(pts[0]);
    for p in &pts[1..] {
        path.line_to(*p);
    }
    path.close();
    if let Some(fill) = poly.fill {
        ctx.canvas.draw_path(&path, &fill_paint(fill));
    }
    if poly.hatch != Hatch::None {
        let ink = poly.edge.unwrap_or(ctx.theme.text);
        ctx.canvas.save();
        ctx.canvas.clip_path(&path, None, true);
        draw_hatch(ctx.canvas, poly.hatch, *path.bounds(), ink, ctx.fs * 0.6);
        ctx.canvas.restore();
    }
    if let Some(edge) = poly.edge {
        ctx.canvas.draw_path(&path, &stroke_paint(edge, poly.edge_width));
    }
}

fn draw_cells(ctx: &Ctx<'_>, frame: &PlotArea, cells: &CellLayer) {
    let (nx, ny) = (cells.nx(), cells.ny());
    let span = (cells.vmax - cells.vmin).max(1e-12);
    let mut paint = fill_paint(skia::Color::BLACK);
    paint.set_anti_alias(false);
    for row in 0..ny {
        for col in 0..nx {
            let Some(&v) = cells.values.get(row * nx + col) else { continue };
            if v.is_nan() { continue; }
            let xa = frame.x.to_px(cells.x_edges[col]);
            let xb = frame.x.to_px(cells.x_edges[col + 1]);
            let ya = frame.y.to_px(cells.y_edges[row]);
            let yb = frame.y.to_px(cells.y_edges[row + 1]);
            paint.set_color(viridis((v - cells.vmin) / span));
            ctx.canvas.draw_rect(skia::Rect::from_ltrb(xa.min(xb), ya.min(yb), xa.max(xb), ya.max(yb)), &paint);
        }
    }
}

fn draw_colorbar(ctx: &Ctx<'_>, cb: &Colorbar, plot: skia::Rect) {
    let fs = ctx.fs;
    let bar = skia::Rect::from_ltrb(plot.right + fs * 1.2, plot.top, plot.right + fs * 2.4, plot.bottom);
    let steps = 64;
    let mut paint = fill_paint(skia::Color::BLACK);
    paint.set_anti_alias(false);
    for i in 0..steps {
        let f0 = i as f32 / steps as f32;
        let f1 = (i + 1) as f32 / steps as f32;
        paint.set_color(viridis((i as f64 + 0.5) / steps as f64));
        let y0 = bar.bottom - f1 * bar.height();
        let y1 = bar.bottom - f0 * bar.height();
        ctx.canvas.draw_rect(skia::Rect::from_ltrb(bar.left, y0, bar.right, y1 + 0.5), &paint);
    }
    ctx.canvas.draw_rect(bar, &stroke_paint(ctx.theme.axis_line, 1.0));
    let map = AxisMap::new(ScaleKind::Linear, cb.vmin, cb.vmax, bar.bottom, bar.top);
    let ticks = scale::nice_ticks(cb.vmin, cb.vmax, 5);
    let labels = scale::format_ticks(&ticks);
    let axis = Axis::default();
    let marks: Vec<(f64, String)> = ticks.into_iter().zip(labels).collect();
    draw_y_ticks(ctx, &axis, &map, &marks, bar.right, true);
    if !cb.label.is_empty() {
        ctx.text.draw_rotated(ctx.canvas, &cb.label, bar.right + fs * 5.2, (bar.top + bar.bottom) / 2.0, fs, ctx.theme.text, Anchor::Center, -90.0);
    }
}

enum Swatch<'a> {
    Line(&'a LineLayer),
    Patch(&'a PolygonLayer),
}

fn draw_legend(ctx: &Ctx<'_>, panel: &Panel, frame: &PlotArea) {
    let fs = ctx.fs;
    let entries: Vec<(&str, Swatch<'_>)> = panel
        .layers
        .iter()
        .filter_map(|l| match l {
            Layer::Line(line) => line.label.as_deref().map(|s| (s, Swatch::Line(line))),
            Layer::Polygon(p) => p.label.as_deref().map(|s| (s, Swatch::Patch(p))),
            _ => None,
        })
        .collect();
    if entries.is_empty() { return; }

    let size = fs * 0.9;
    let row_h = fs * 1.5;
    let swatch_w = fs * 2.2;
    let pad = fs * 0.5;
    let text_w = entries.iter().map(|(s, _)| ctx.text.measure_width(s, size)).fold(0.0f32, f32::max);
    let box_w = pad * 3.0 + swatch_w + text_w;
    let box_h = pad * 2.0 + row_h * entries.len() as f32;

    let rect = frame.rect;
    let margin = fs * 0.5;
    let candidates = [
        skia::Rect::from_xywh(rect.right - margin - box_w, rect.top + margin, box_w, box_h),
        skia::Rect::from_xywh(rect.left + margin, rect.top + margin, box_w, box_h),
        skia::Rect::from_xywh(rect.left + margin, rect.bottom - margin - box_h, box_w, box_h),
        skia::Rect::from_xywh(rect.right - margin - box_w, rect.bottom - margin - box_h, box_w, box_h),
    ];
    // least covered corner wins, upper right on ties
    let covered = |c: &skia::Rect| -> usize {
        panel
            .layers
            .iter()
            .map(|l| match l {
                Layer::Line(line) => to_screen(frame, &line.points, line.secondary)
                    .into_iter()
                    .flatten()
                    .filter(|p| c.contains(*p))
                    .count(),
                Layer::Polygon(p) => to_screen(frame, &p.points, false)
                    .into_iter()
                    .flatten()
                    .filter(|p| c.contains(*p))
                    .count(),
                _ => 0,
            })
            .sum()
    };
    let mut best = candidates[0];
    let mut best_score = usize::MAX;
    for c in &candidates {
        let score = covered(c);
        if score < best_score {
            best = *c;
            best_score = score;
        }
    }

    let bg = with_alpha(ctx.theme.plot_background, 210);
    ctx.canvas.draw_rect(best, &fill_paint(bg));
    ctx.canvas.draw_rect(best, &stroke_paint(with_alpha(ctx.theme.axis_line, 90), 0.8));
    for (i, (label, swatch)) in entries.iter().enumerate() {
        let cy = best.top + pad + row_h * (i as f32 + 0.5);
        let sx = best.left + pad;
        match swatch {
            Swatch::Line(line) => {
                if line.style != LineStyle::None {
                    let mut paint = stroke_paint(line.color, line.width);
                    apply_dash(&mut paint, line.style, line.width);
                    ctx.canvas.draw_line((sx, cy), (sx + swatch_w, cy), &paint);
                }
                if !line.marker.is_none() {
                    let size = line.marker_size * fs / 13.9;
                    draw_marker(ctx.canvas, line.marker, skia::Point::new(sx + swatch_w / 2.0, cy), size, line.color);
                }
            }
            Swatch::Patch(p) => {
                let r = skia::Rect::from_xywh(sx, cy - fs * 0.45, swatch_w, fs * 0.9);
                if let Some(fill) = p.fill {
                    ctx.canvas.draw_rect(r, &fill_paint(fill));
                }
                if p.hatch != Hatch::None {
                    ctx.canvas.save();
                    ctx.canvas.clip_rect(r, None, true);
                    draw_hatch(ctx.canvas, p.hatch, r, p.edge.unwrap_or(ctx.theme.text), fs * 0.6);
                    ctx.canvas.restore();
                }
                if let Some(edge) = p.edge {
                    ctx.canvas.draw_rect(r, &stroke_paint(edge, p.edge_width));
                }
            }
        }
        ctx.text.draw(ctx.canvas, label, sx + swatch_w + pad, cy + size * 0.35, size, ctx.theme.text, Anchor::Left);
    }
}

fn draw_marker(canvas: &skia::Canvas, marker: Marker, p: skia::Point, size: f32, color: skia::Color) {
    let r = size / 2.0;
    let fill = fill_paint(color);
    let stroke = stroke_paint(color, (size / 6.0).max(1.0));
    let polygon = |n: usize, radius: f32, rot_deg: f32| -> skia::Path {
        let mut path = skia::Path::new();
        for k in 0..n {
            let a = (rot_deg + 360.0 * k as f32 / n as f32).to_radians();
            let q = (p.x + radius * a.cos(), p.y - radius * a.sin());
            if k == 0 { path.move_to(q); } else { path.line_to(q); }
        }
        path.close();
        path
    };
    let spokes = |angles: &[f32]| {
        for a in angles {
            let a = a.to_radians();
            canvas.draw_line(p, (p.x + r * a.cos(), p.y - r * a.sin()), &stroke);
        }
    };
    match marker {
        Marker::None => {}
        Marker::Point => { canvas.draw_circle(p, r * 0.5, &fill); }
        Marker::Pixel => { canvas.draw_rect(skia::Rect::from_xywh(p.x - 0.5, p.y - 0.5, 1.0, 1.0), &fill); }
        Marker::Circle => { canvas.draw_circle(p, r, &fill); }
        Marker::TriangleUp => { canvas.draw_path(&polygon(3, r, 90.0), &fill); }
        Marker::TriangleDown => { canvas.draw_path(&polygon(3, r, 270.0), &fill); }
        Marker::TriangleLeft => { canvas.draw_path(&polygon(3, r, 180.0), &fill); }
        Marker::TriangleRight => { canvas.draw_path(&polygon(3, r, 0.0), &fill); }
        Marker::TriDown => spokes(&[270.0, 30.0, 150.0]),
        Marker::TriUp => spokes(&[90.0, 210.0, 330.0]),
        Marker::TriLeft => spokes(&[180.0, 300.0, 60.0]),
        Marker::TriRight => spokes(&[0.0, 120.0, 240.0]),
        Marker::Octagon => { canvas.draw_path(&polygon(8, r, 22.5), &fill); }
        Marker::Square => { canvas.draw_rect(skia::Rect::from_xywh(p.x - r * 0.9, p.y - r * 0.9, r * 1.8, r * 1.8), &fill); }
        Marker::Pentagon => { canvas.draw_path(&polygon(5, r, 90.0), &fill); }
        Marker::Star => {
            let mut path = skia::Path::new();
            for k in 0..10 {
                let radius = if k % 2 == 0 { r } else { r * 0.45 };
                let a = (90.0 + 36.0 * k as f32).to_radians();
                let q = (p.x + radius * a.cos(), p.y - radius * a.sin());
                if k == 0 { path.move_to(q); } else { path.line_to(q); }
            }
            path.close();
            canvas.draw_path(&path, &fill);
        }
        Marker::Hexagon1 => { canvas.draw_path(&polygon(6, r, 90.0), &fill); }
        Marker::Hexagon2 => { canvas.draw_path(&polygon(6, r, 0.0), &fill); }
        Marker::Plus => spokes(&[0.0, 90.0, 180.0, 270.0]),
        Marker::X => spokes(&[45.0, 135.0, 225.0, 315.0]),
        Marker::Diamond => { canvas.draw_path(&polygon(4, r, 90.0), &fill); }
        Marker::ThinDiamond => {
            let mut path = skia::Path::new();
            path.move_to((p.x, p.y - r));
            path.line_to((p.x + r * 0.6, p.y));
            path.line_to((p.x, p.y + r));
            path.line_to((p.x - r * 0.6, p.y));
            path.close();
            canvas.draw_path(&path, &fill);
        }
        Marker::VLine => spokes(&[90.0, 270.0]),
        Marker::HLine => spokes(&[0.0, 180.0]),
    }
}

fn draw_hatch(canvas: &skia::Canvas, hatch: Hatch, area: skia::Rect, ink: skia::Color, gap: f32) {
    let gap = gap.max(3.0);
    let paint = stroke_paint(ink, 0.8);
    let (l, t, r, b) = (area.left, area.top, area.right, area.bottom);
    let diag = |back: bool| {
        let mut d = -(b - t);
        while d < r - l {
            let x0 = l + d;
            if back {
                canvas.draw_line((x0, t), (x0 + (b - t), b), &paint);
            } else {
                canvas.draw_line((x0, b), (x0 + (b - t), t), &paint);
            }
            d += gap;
        }
    };
    let verticals = || {
        let mut x = l + gap / 2.0;
        while x < r {
            canvas.draw_line((x, t), (x, b), &paint);
            x += gap;
        }
    };
    let horizontals = || {
        let mut y = t + gap / 2.0;
        while y < b {
            canvas.draw_line((l, y), (r, y), &paint);
            y += gap;
        }
    };
    let dots = |radius: f32, filled: bool, step: f32| {
        let p = if filled { fill_paint(ink) } else { stroke_paint(ink, 0.8) };
        let mut y = t + step / 2.0;
        while y < b {
            let mut x = l + step / 2.0;
            while x < r {
                canvas.draw_circle((x, y), radius, &p);
                x += step;
            }
            y += step;
        }
    };
    match hatch {
        Hatch::None => {}
        Hatch::Diagonal => diag(false),
        Hatch::BackDiagonal => diag(true),
        Hatch::Vertical => verticals(),
        Hatch::Horizontal => horizontals(),
        Hatch::Crossed => {
            verticals();
            horizontals();
        }
        Hatch::CrossedDiagonal => {
            diag(false);
            diag(true);
        }
        Hatch::SmallCircle => dots(gap * 0.25, false, gap * 1.2),
        Hatch::LargeCircle => dots(gap * 0.45, false, gap * 1.6),
        Hatch::Dots => dots(gap * 0.12, true, gap),
        Hatch::Stars => {
            let step = gap * 1.6;
            let mut y = t + step / 2.0;
            while y < b {
                let mut x = l + step / 2.0;
                while x < r {
                    draw_marker(canvas, Marker::Star, skia::Point::new(x, y), gap * 0.8, ink);
                    x += step;
                }
                y += step;
            }
        }
    }
}

fn apply_dash(paint: &mut skia::Paint, style: LineStyle, width: f32) {
    if let Some(iv) = style.intervals(width) {
        if let Some(effect) = skia::PathEffect::dash(&iv, 0.0) {
            paint.set_path_effect(effect);
        }
    }
}

fn stroke_paint(color: skia::Color, width: f32) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_color(color);
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width);
    paint
}

fn fill_paint(color: skia::Color) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_color(color);
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint
}
