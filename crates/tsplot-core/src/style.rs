// File: crates/tsplot-core/src/style.rs
// Summary: Line/marker/hatch codes and the per-series style cycling shared by every chart.

use std::str::FromStr;

use skia_safe as skia;
use tracing::debug;

use crate::color::ColorSpec;
use crate::error::{PlotError, Result};
use crate::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
    Dotted,
    None,
}

impl LineStyle {
    pub const CYCLE: [LineStyle; 4] = [LineStyle::Solid, LineStyle::Dashed, LineStyle::DashDot, LineStyle::Dotted];

    /// Dash intervals scaled by the stroke width; `None` for a solid stroke.
    pub fn intervals(&self, width: f32) -> Option<Vec<f32>> {
        let w = width.max(1.0);
        match self {
            LineStyle::Dashed => Some(vec![3.7 * w, 1.6 * w]),
            LineStyle::DashDot => Some(vec![6.4 * w, 1.6 * w, w, 1.6 * w]),
            LineStyle::Dotted => Some(vec![w, 1.65 * w]),
            LineStyle::Solid | LineStyle::None => None,
        }
    }
}

impl FromStr for LineStyle {
    type Err = PlotError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "-" | "solid" => Ok(LineStyle::Solid),
            "--" | "dashed" => Ok(LineStyle::Dashed),
            "-." | "dashdot" | "dash_dot" => Ok(LineStyle::DashDot),
            ":" | "dotted" => Ok(LineStyle::Dotted),
            _ if s.trim().is_empty() || s == "None" => Ok(LineStyle::None),
            _ => Err(PlotError::UnknownLineStyle(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Point,
    Pixel,
    Circle,
    TriangleDown,
    TriangleUp,
    TriangleLeft,
    TriangleRight,
    TriDown,
    TriUp,
    TriLeft,
    TriRight,
    Octagon,
    Square,
    Pentagon,
    Star,
    Hexagon1,
    Hexagon2,
    Plus,
    X,
    Diamond,
    ThinDiamond,
    VLine,
    HLine,
    None,
}

impl Marker {
    /// Marker codes in cycling order.
    pub const CODES: [char; 23] = [
        '.', ',', 'o', 'v', '^', '<', '>', '1', '2', '3', '4', '8', 's', 'p', '*', 'h', 'H', '+', 'x', 'D', 'd', '|', '_',
    ];

    pub fn from_code(c: char) -> Option<Self> {
        Some(match c {
            '.' => Marker::Point,
            ',' => Marker::Pixel,
            'o' => Marker::Circle,
            'v' => Marker::TriangleDown,
            '^' => Marker::TriangleUp,
            '<' => Marker::TriangleLeft,
            '>' => Marker::TriangleRight,
            '1' => Marker::TriDown,
            '2' => Marker::TriUp,
            '3' => Marker::TriLeft,
            '4' => Marker::TriRight,
            '8' => Marker::Octagon,
            's' => Marker::Square,
            'p' => Marker::Pentagon,
            '*' => Marker::Star,
            'h' => Marker::Hexagon1,
            'H' => Marker::Hexagon2,
            '+' => Marker::Plus,
            'x' => Marker::X,
            'D' => Marker::Diamond,
            'd' => Marker::ThinDiamond,
            '|' => Marker::VLine,
            '_' => Marker::HLine,
            _ => return None,
        })
    }

    pub fn is_none(&self) -> bool { *self == Marker::None }
}

impl FromStr for Marker {
    type Err = PlotError;
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() || s == "None" {
            return Ok(Marker::None);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Marker::from_code(c).ok_or_else(|| PlotError::UnknownMarker(s.to_string())),
            _ => Err(PlotError::UnknownMarker(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hatch {
    Diagonal,
    BackDiagonal,
    Vertical,
    Horizontal,
    Crossed,
    CrossedDiagonal,
    SmallCircle,
    LargeCircle,
    Dots,
    Stars,
    None,
}

impl Hatch {
    pub const CYCLE: [Hatch; 10] = [
        Hatch::Diagonal,
        Hatch::BackDiagonal,
        Hatch::Vertical,
        Hatch::Horizontal,
        Hatch::Crossed,
        Hatch::CrossedDiagonal,
        Hatch::SmallCircle,
        Hatch::LargeCircle,
        Hatch::Dots,
        Hatch::Stars,
    ];
}

impl FromStr for Hatch {
    type Err = PlotError;
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "/" => Hatch::Diagonal,
            "\\" => Hatch::BackDiagonal,
            "|" => Hatch::Vertical,
            "-" => Hatch::Horizontal,
            "+" => Hatch::Crossed,
            "x" => Hatch::CrossedDiagonal,
            "o" => Hatch::SmallCircle,
            "O" => Hatch::LargeCircle,
            "." => Hatch::Dots,
            "*" => Hatch::Stars,
            _ if s.trim().is_empty() || s == "None" => Hatch::None,
            _ => return Err(PlotError::UnknownHatch(s.to_string())),
        })
    }
}

/// `auto`, or an explicit list of codes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StyleList {
    #[default]
    Auto,
    List(Vec<String>),
}

impl StyleList {
    pub fn list<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        StyleList::List(items.into_iter().map(Into::into).collect())
    }

    /// A single blank entry: draw no marker / no line.
    pub fn blank() -> Self { StyleList::List(vec![" ".to_string()]) }

    pub fn is_auto(&self) -> bool { matches!(self, StyleList::Auto) }
}

impl FromStr for StyleList {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim() == "auto" {
            Ok(StyleList::Auto)
        } else {
            // a whitespace-only entry is the blank code and stays as given
            let entry = |p: &str| if p.trim().is_empty() { p.to_string() } else { p.trim().to_string() };
            Ok(StyleList::List(s.split(',').map(entry).collect()))
        }
    }
}

/// One drawn series' resolved look.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceStyle {
    pub color: skia::Color,
    pub line: LineStyle,
    pub marker: Marker,
}

/// Cyclic color/line/marker sequences, consumed round-robin per series.
#[derive(Clone, Debug)]
pub struct StyleCycle {
    colors: Option<Vec<ColorSpec>>,
    lines: Vec<LineStyle>,
    markers: Vec<Marker>,
    next: usize,
}

impl StyleCycle {
    pub fn colors(&self) -> Option<&[ColorSpec]> { self.colors.as_deref() }
    pub fn lines(&self) -> &[LineStyle] { &self.lines }
    pub fn markers(&self) -> &[Marker] { &self.markers }

    /// Style of the next series; colors fall back to the theme cycle.
    pub fn next_trace(&mut self, theme: &Theme) -> TraceStyle {
        let i = self.next;
        self.next += 1;
        let color = match &self.colors {
            Some(c) => c[i % c.len()].resolve(theme),
            None => theme.cycle_color(i),
        };
        TraceStyle { color, line: self.lines[i % self.lines.len()], marker: self.markers[i % self.markers.len()] }
    }

    /// Start the cycles over (second pass over the same series).
    pub fn rewind(&mut self) { self.next = 0; }
}

/// Normalize the per-series style options into cycles.
///
/// A combined `style` list must have exactly `ntrace` entries and overrides
/// the separate lists.
pub fn prepare_styles(
    ntrace: usize,
    style: &StyleList,
    colors: &StyleList,
    linestyles: &StyleList,
    markerstyles: &StyleList,
) -> Result<StyleCycle> {
    if let StyleList::List(styles) = style {
        if styles.len() != ntrace {
            return Err(PlotError::StyleCount { style: styles.clone(), given: styles.len(), traces: ntrace });
        }
        let mut cs = Vec::with_capacity(ntrace);
        let mut ls = Vec::with_capacity(ntrace);
        let mut ms = Vec::with_capacity(ntrace);
        for s in styles {
            let (c, m, l) = split_style(s)?;
            cs.push(c);
            ms.push(m);
            ls.push(l);
        }
        debug!(?styles, "using combined style strings");
        return Ok(StyleCycle { colors: Some(cs), lines: ls, markers: ms, next: 0 });
    }

    let colors = match colors {
        StyleList::Auto => None,
        StyleList::List(v) => Some(v.iter().map(|c| c.parse()).collect::<Result<Vec<ColorSpec>>>()?),
    };
    let lines = match linestyles {
        StyleList::Auto => LineStyle::CYCLE.to_vec(),
        StyleList::List(v) => v.iter().map(|l| l.parse()).collect::<Result<Vec<LineStyle>>>()?,
    };
    let markers = match markerstyles {
        StyleList::Auto => Marker::CODES.iter().filter_map(|&c| Marker::from_code(c)).collect(),
        StyleList::List(v) => v.iter().map(|m| m.parse()).collect::<Result<Vec<Marker>>>()?,
    };
    Ok(StyleCycle {
        colors: colors.filter(|c| !c.is_empty()),
        lines: if lines.is_empty() { vec![LineStyle::None] } else { lines },
        markers: if markers.is_empty() { vec![Marker::None] } else { markers },
        next: 0,
    })
}

/// Split a `ColorMarkerLine` code such as `r*--`.
pub fn split_style(s: &str) -> Result<(ColorSpec, Marker, LineStyle)> {
    let (color, rest) = split_color(s)?;
    let mut chars = rest.chars();
    let Some(first) = chars.next() else {
        // only a color: a plain solid line
        return Ok((color, Marker::None, LineStyle::Solid));
    };
    match Marker::from_code(first) {
        Some(m) => Ok((color, m, chars.as_str().parse()?)),
        None => Ok((color, Marker::None, rest.parse()?)),
    }
}

fn split_color(s: &str) -> Result<(ColorSpec, &str)> {
    if let Some(rest) = s.strip_prefix('C') {
        let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits > 0 {
            let n = rest[..digits].parse().map_err(|_| PlotError::UnknownColor(s.to_string()))?;
            return Ok((ColorSpec::Cycle(n), &rest[digits..]));
        }
    }
    let first = s.chars().next().ok_or_else(|| PlotError::UnknownColor(s.to_string()))?;
    let color = first.to_string().parse::<ColorSpec>()?;
    Ok((color, &s[first.len_utf8()..]))
}

/// Bar hatch cycle.
pub fn prepare_hatches(hatches: &StyleList) -> Result<Vec<Hatch>> {
    let v = match hatches {
        StyleList::Auto => Hatch::CYCLE.to_vec(),
        StyleList::List(v) => v.iter().map(|h| h.parse()).collect::<Result<Vec<Hatch>>>()?,
    };
    Ok(if v.is_empty() { vec![Hatch::None] } else { v })
}
