// File: crates/tsplot-core/src/figure.rs
// Summary: In-memory figure model: panels with axes and drawable layers, independent of the output format.

use std::str::FromStr;

use skia_safe as skia;

use crate::axis::Axis;
use crate::error::{PlotError, Result};
use crate::style::{Hatch, LineStyle, Marker};
use crate::text::Anchor;
use crate::theme::Theme;

/// How consecutive points of a line are joined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawStyle {
    #[default]
    Default,
    StepsPre,
    StepsMid,
    StepsPost,
}

impl FromStr for DrawStyle {
    type Err = PlotError;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "default" | "" => Ok(DrawStyle::Default),
            "steps" | "steps-pre" => Ok(DrawStyle::StepsPre),
            "steps-mid" => Ok(DrawStyle::StepsMid),
            "steps-post" => Ok(DrawStyle::StepsPost),
            other => Err(PlotError::invalid("drawstyle", format!("unknown draw style '{other}'"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineLayer {
    /// NaN in either coordinate breaks the line.
    pub points: Vec<(f64, f64)>,
    pub color: skia::Color,
    pub width: f32,
    pub style: LineStyle,
    pub marker: Marker,
    pub marker_size: f32,
    pub draw_style: DrawStyle,
    pub label: Option<String>,
    /// Drawn against the panel's secondary y axis.
    pub secondary: bool,
}

impl LineLayer {
    pub fn new(points: Vec<(f64, f64)>, color: skia::Color) -> Self {
        Self {
            points,
            color,
            width: 1.5,
            style: LineStyle::Solid,
            marker: Marker::None,
            marker_size: 6.0,
            draw_style: DrawStyle::Default,
            label: None,
            secondary: false,
        }
    }

    pub fn styled(mut self, style: LineStyle, marker: Marker) -> Self {
        self.style = style;
        self.marker = marker;
        self
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolygonLayer {
    pub points: Vec<(f64, f64)>,
    pub fill: Option<skia::Color>,
    pub edge: Option<skia::Color>,
    pub edge_width: f32,
    pub hatch: Hatch,
    pub label: Option<String>,
}

impl PolygonLayer {
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64, fill: skia::Color) -> Self {
        Self {
            points: vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)],
            fill: Some(fill),
            edge: None,
            edge_width: 1.0,
            hatch: Hatch::None,
            label: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLayer {
    pub x: f64,
    pub y: f64,
    pub text: String,
    /// `None` uses the theme's text color.
    pub color: Option<skia::Color>,
    /// Multiplier on the base font size.
    pub scale: f32,
    pub anchor: Anchor,
    pub rotation: f32,
}

impl TextLayer {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self { x, y, text: text.into(), color: None, scale: 0.85, anchor: Anchor::Center, rotation: 0.0 }
    }
}

/// A value raster; `values[row * nx + col]`, row 0 at `y_edges[0]`.
#[derive(Clone, Debug, PartialEq)]
pub struct CellLayer {
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    pub values: Vec<f64>,
    pub vmin: f64,
    pub vmax: f64,
}

impl CellLayer {
    pub fn nx(&self) -> usize { self.x_edges.len().saturating_sub(1) }
    pub fn ny(&self) -> usize { self.y_edges.len().saturating_sub(1) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A horizontal or vertical reference line; missing ends span the axis.
#[derive(Clone, Debug, PartialEq)]
pub struct RefLine {
    pub orientation: Orientation,
    pub at: f64,
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub color: skia::Color,
    pub style: LineStyle,
    pub width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    Line(LineLayer),
    Polygon(PolygonLayer),
    Text(TextLayer),
    Cells(CellLayer),
    RefLine(RefLine),
}

/// Color scale drawn beside a panel holding cells or hexagons.
#[derive(Clone, Debug, PartialEq)]
pub struct Colorbar {
    pub vmin: f64,
    pub vmax: f64,
    pub label: String,
}

/// Panel placement in figure fractions, top-left origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PanelRect {
    pub const FULL: PanelRect = PanelRect { left: 0.0, top: 0.0, right: 1.0, bottom: 1.0 };

    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self { Self { left, top, right, bottom } }
}

#[derive(Clone, Debug)]
pub struct Panel {
    pub rect: PanelRect,
    pub title: String,
    pub x: Axis,
    pub y: Axis,
    pub y2: Option<Axis>,
    pub layers: Vec<Layer>,
    pub legend: bool,
    pub grid: bool,
    pub colorbar: Option<Colorbar>,
    /// Same data units per pixel on both axes.
    pub equal_aspect: bool,
}

impl Panel {
    pub fn new(rect: PanelRect) -> Self {
        Self {
            rect,
            title: String::new(),
            x: Axis::default(),
            y: Axis::default(),
            y2: None,
            layers: Vec::new(),
            legend: false,
            grid: false,
            colorbar: None,
            equal_aspect: false,
        }
    }

    pub fn push(&mut self, layer: Layer) { self.layers.push(layer); }

    /// Data extent along x of everything that scales the axis.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        let kind = self.x.kind;
        let mut ext = Extent::default();
        for layer in &self.layers {
            match layer {
                Layer::Line(l) => l.points.iter().for_each(|p| ext.add(p.0, kind)),
                Layer::Polygon(p) => p.points.iter().for_each(|p| ext.add(p.0, kind)),
                Layer::Cells(c) => c.x_edges.iter().for_each(|&x| ext.add(x, kind)),
                Layer::RefLine(r) => match r.orientation {
                    Orientation::Vertical => ext.add(r.at, kind),
                    Orientation::Horizontal => {
                        r.from.iter().chain(r.to.iter()).for_each(|&x| ext.add(x, kind));
                    }
                },
                Layer::Text(_) => {}
            }
        }
        ext.get()
    }

    /// Data extent along the primary (or secondary) y axis.
    pub fn y_extent(&self, secondary: bool) -> Option<(f64, f64)> {
        let axis = if secondary { self.y2.as_ref().unwrap_or(&self.y) } else { &self.y };
        let kind = axis.kind;
        let mut ext = Extent::default();
        for layer in &self.layers {
            match layer {
                Layer::Line(l) if l.secondary == secondary => l.points.iter().for_each(|p| ext.add(p.1, kind)),
                Layer::Polygon(p) if !secondary => p.points.iter().for_each(|p| ext.add(p.1, kind)),
                Layer::Cells(c) if !secondary => c.y_edges.iter().for_each(|&y| ext.add(y, kind)),
                Layer::RefLine(r) if !secondary => match r.orientation {
                    Orientation::Horizontal => ext.add(r.at, kind),
                    Orientation::Vertical => {
                        r.from.iter().chain(r.to.iter()).for_each(|&y| ext.add(y, kind));
                    }
                },
                _ => {}
            }
        }
        ext.get()
    }

    pub fn has_labels(&self) -> bool {
        self.layers.iter().any(|l| match l {
            Layer::Line(l) => l.label.is_some(),
            Layer::Polygon(p) => p.label.is_some(),
            _ => false,
        })
    }
}

#[derive(Default)]
struct Extent(Option<(f64, f64)>);

impl Extent {
    fn add(&mut self, v: f64, kind: crate::scale::ScaleKind) {
        if !kind.accepts(v) { return; }
        self.0 = Some(match self.0 {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }

    fn get(&self) -> Option<(f64, f64)> { self.0 }
}

#[derive(Clone, Debug)]
pub struct Figure {
    /// Pixels.
    pub width: i32,
    pub height: i32,
    pub dpi: f32,
    pub title: String,
    pub theme: Theme,
    pub panels: Vec<Panel>,
}

impl Figure {
    /// A figure of `figsize` inches at `dpi`.
    pub fn new(figsize: (f32, f32), dpi: f32, theme: Theme) -> Self {
        let dpi = if dpi > 0.0 { dpi } else { 100.0 };
        Self {
            width: (figsize.0 * dpi).round().max(16.0) as i32,
            height: (figsize.1 * dpi).round().max(16.0) as i32,
            dpi,
            title: String::new(),
            theme,
            panels: Vec::new(),
        }
    }

    /// Row-major grid of panel rectangles.
    pub fn grid(nrows: usize, ncols: usize) -> Vec<PanelRect> {
        let (nrows, ncols) = (nrows.max(1), ncols.max(1));
        let mut out = Vec::with_capacity(nrows * ncols);
        for r in 0..nrows {
            for c in 0..ncols {
                out.push(PanelRect::new(
                    c as f32 / ncols as f32,
                    r as f32 / nrows as f32,
                    (c + 1) as f32 / ncols as f32,
                    (r + 1) as f32 / nrows as f32,
                ));
            }
        }
        out
    }

    pub fn push(&mut self, panel: Panel) -> &mut Panel {
        self.panels.push(panel);
        let last = self.panels.len() - 1;
        &mut self.panels[last]
    }

    /// Give every panel the union of the x extents, except where limits were set explicitly.
    pub fn share_x(&mut self) {
        let union = union(self.panels.iter().map(|p| p.x_extent()));
        if let Some((lo, hi)) = union {
            for p in &mut self.panels {
                let pad = p.x.resolve_range(Some((lo, hi)));
                p.x.limits.low = p.x.limits.low.or(Some(pad.0));
                p.x.limits.high = p.x.limits.high.or(Some(pad.1));
            }
        }
    }

    pub fn share_y(&mut self) {
        let union = union(self.panels.iter().map(|p| p.y_extent(false)));
        if let Some((lo, hi)) = union {
            for p in &mut self.panels {
                let pad = p.y.resolve_range(Some((lo, hi)));
                p.y.limits.low = p.y.limits.low.or(Some(pad.0));
                p.y.limits.high = p.y.limits.high.or(Some(pad.1));
            }
        }
    }
}

fn union(extents: impl Iterator<Item = Option<(f64, f64)>>) -> Option<(f64, f64)> {
    extents.flatten().fold(None, |acc, (lo, hi)| match acc {
        None => Some((lo, hi)),
        Some((a, b)) => Some((a.min(lo), b.max(hi))),
    })
}
