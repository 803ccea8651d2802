// File: crates/tsplot-core/src/text.rs
// Summary: Text shaper/renderer on Skia textlayout used for titles, tick labels and legends.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextAlign, TextStyle};

/// Horizontal anchor of a drawn string relative to its x coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    Left,
    Center,
    Right,
}

pub struct TextShaper {
    fonts: FontCollection,
}

impl Default for TextShaper {
    fn default() -> Self { Self::new() }
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn make_style(size: f32, color: skia::Color) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(size.max(1.0));
        ts.set_color(color);
        ts.set_font_families(&["DejaVu Sans", "Arial", "Helvetica", "Roboto", "Segoe UI", "sans-serif"]);
        ts
    }

    pub fn layout(&self, text: &str, size: f32, color: skia::Color) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&Self::make_style(size, color));
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    pub fn measure_width(&self, text: &str, size: f32) -> f32 {
        let p = self.layout(text, size, skia::Color::TRANSPARENT);
        p.longest_line()
    }

    /// Draw `text` with its baseline at `y`.
    pub fn draw(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, size: f32, color: skia::Color, anchor: Anchor) {
        if text.is_empty() { return; }
        let mut p = self.layout(text, size, color);
        let w = p.longest_line();
        let left = match anchor {
            Anchor::Left => x,
            Anchor::Center => x - w / 2.0,
            Anchor::Right => x - w,
        };
        // paragraphs paint from their top-left corner
        p.paint(canvas, (left, y - size * 0.8));
    }

    /// Draw `text` rotated by `degrees` (counter-clockwise) around `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rotated(
        &self,
        canvas: &skia::Canvas,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        color: skia::Color,
        anchor: Anchor,
        degrees: f32,
    ) {
        if degrees == 0.0 {
            self.draw(canvas, text, x, y, size, color, anchor);
            return;
        }
        canvas.save();
        canvas.translate((x, y));
        canvas.rotate(-degrees, None);
        self.draw(canvas, text, 0.0, 0.0, size, color, anchor);
        canvas.restore();
    }
}
