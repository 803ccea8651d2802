// File: crates/tsplot-core/src/color.rs
// Summary: Color specifications (cycle references, one-letter codes, gray levels, hex, named colors).

use skia_safe as skia;

use crate::error::{PlotError, Result};
use crate::theme::Theme;

/// A color as the user wrote it; `Cycle(n)` is resolved against the active theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorSpec {
    Rgba(skia::Color),
    Cycle(usize),
}

impl ColorSpec {
    pub fn resolve(&self, theme: &Theme) -> skia::Color {
        match *self {
            ColorSpec::Rgba(c) => c,
            ColorSpec::Cycle(n) => theme.cycle_color(n),
        }
    }
}

impl std::str::FromStr for ColorSpec {
    type Err = PlotError;

    fn from_str(raw: &str) -> Result<Self> {
        let s = raw.trim();
        let unknown = || PlotError::UnknownColor(raw.to_string());
        if s.is_empty() { return Err(unknown()); }

        if let Some(n) = s.strip_prefix('C').and_then(|d| d.parse::<usize>().ok()) {
            return Ok(ColorSpec::Cycle(n));
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).map(ColorSpec::Rgba).ok_or_else(unknown);
        }
        if let Ok(level) = s.parse::<f64>() {
            if !(0.0..=1.0).contains(&level) { return Err(unknown()); }
            let g = (level * 255.0).round() as u8;
            return Ok(ColorSpec::Rgba(skia::Color::from_rgb(g, g, g)));
        }
        if s.len() == 1 {
            return code_color(s.as_bytes()[0]).map(ColorSpec::Rgba).ok_or_else(unknown);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(name) = lower.strip_prefix("tab:") {
            return TABLEAU
                .iter()
                .find(|(n, _)| *n == name)
                .map(|&(_, rgb)| ColorSpec::Rgba(from_u32(rgb)))
                .ok_or_else(unknown);
        }
        named_color(&lower).map(ColorSpec::Rgba).ok_or_else(unknown)
    }
}

/// Matplotlib's one-letter base colors.
pub fn code_color(code: u8) -> Option<skia::Color> {
    let rgb = match code {
        b'b' => (0, 0, 255),
        b'g' => (0, 128, 0),
        b'r' => (255, 0, 0),
        b'c' => (0, 191, 191),
        b'm' => (191, 0, 191),
        b'y' => (191, 191, 0),
        b'k' => (0, 0, 0),
        b'w' => (255, 255, 255),
        _ => return None,
    };
    Some(skia::Color::from_rgb(rgb.0, rgb.1, rgb.2))
}

fn parse_hex(hex: &str) -> Option<skia::Color> {
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(skia::Color::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(skia::Color::from_argb(byte(6)?, byte(0)?, byte(2)?, byte(4)?)),
        3 => {
            let nib = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok().map(|v| v * 17);
            Some(skia::Color::from_rgb(nib(0)?, nib(1)?, nib(2)?))
        }
        _ => None,
    }
}

pub(crate) fn from_u32(rgb: u32) -> skia::Color {
    skia::Color::new(0xff00_0000 | rgb)
}

pub fn named_color(name: &str) -> Option<skia::Color> {
    let key: String = name.chars().filter(|c| !c.is_whitespace() && *c != '_').collect();
    CSS_COLORS
        .binary_search_by(|(n, _)| n.cmp(&key.as_str()))
        .ok()
        .map(|i| from_u32(CSS_COLORS[i].1))
}

const TABLEAU: &[(&str, u32)] = &[
    ("blue", 0x1f77b4),
    ("orange", 0xff7f0e),
    ("green", 0x2ca02c),
    ("red", 0xd62728),
    ("purple", 0x9467bd),
    ("brown", 0x8c564b),
    ("pink", 0xe377c2),
    ("gray", 0x7f7f7f),
    ("grey", 0x7f7f7f),
    ("olive", 0xbcbd22),
    ("cyan", 0x17becf),
];

// Sorted by name for binary search.
const CSS_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xf0f8ff),
    ("antiquewhite", 0xfaebd7),
    ("aqua", 0x00ffff),
    ("aquamarine", 0x7fffd4),
    ("azure", 0xf0ffff),
    ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4),
    ("black", 0x000000),
    ("blanchedalmond", 0xffebcd),
    ("blue", 0x0000ff),
    ("blueviolet", 0x8a2be2),
    ("brown", 0xa52a2a),
    ("burlywood", 0xdeb887),
    ("cadetblue", 0x5f9ea0),
    ("chartreuse", 0x7fff00),
    ("chocolate", 0xd2691e),
    ("coral", 0xff7f50),
    ("cornflowerblue", 0x6495ed),
    ("cornsilk", 0xfff8dc),
    ("crimson", 0xdc143c),
    ("cyan", 0x00ffff),
    ("darkblue", 0x00008b),
    ("darkcyan", 0x008b8b),
    ("darkgoldenrod", 0xb8860b),
    ("darkgray", 0xa9a9a9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xa9a9a9),
    ("darkkhaki", 0xbdb76b),
    ("darkmagenta", 0x8b008b),
    ("darkolivegreen", 0x556b2f),
    ("darkorange", 0xff8c00),
    ("darkorchid", 0x9932cc),
    ("darkred", 0x8b0000),
    ("darksalmon", 0xe9967a),
    ("darkseagreen", 0x8fbc8f),
    ("darkslateblue", 0x483d8b),
    ("darkslategray", 0x2f4f4f),
    ("darkslategrey", 0x2f4f4f),
    ("darkturquoise", 0x00ced1),
    ("darkviolet", 0x9400d3),
    ("deeppink", 0xff1493),
    ("deepskyblue", 0x00bfff),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1e90ff),
    ("firebrick", 0xb22222),
    ("floralwhite", 0xfffaf0),
    ("forestgreen", 0x228b22),
    ("fuchsia", 0xff00ff),
    ("gainsboro", 0xdcdcdc),
    ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700),
    ("goldenrod", 0xdaa520),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("greenyellow", 0xadff2f),
    ("grey", 0x808080),
    ("honeydew", 0xf0fff0),
    ("hotpink", 0xff69b4),
    ("indianred", 0xcd5c5c),
    ("indigo", 0x4b0082),
    ("ivory", 0xfffff0),
    ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa),
    ("lavenderblush", 0xfff0f5),
    ("lawngreen", 0x7cfc00),
    ("lemonchiffon", 0xfffacd),
    ("lightblue", 0xadd8e6),
    ("lightcoral", 0xf08080),
    ("lightcyan", 0xe0ffff),
    ("lightgoldenrodyellow", 0xfafad2),
    ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90),
    ("lightgrey", 0xd3d3d3),
    ("lightpink", 0xffb6c1),
    ("lightsalmon", 0xffa07a),
    ("lightseagreen", 0x20b2aa),
    ("lightskyblue", 0x87cefa),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xb0c4de),
    ("lightyellow", 0xffffe0),
    ("lime", 0x00ff00),
    ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6),
    ("magenta", 0xff00ff),
    ("maroon", 0x800000),
    ("mediumaquamarine", 0x66cdaa),
    ("mediumblue", 0x0000cd),
    ("mediumorchid", 0xba55d3),
    ("mediumpurple", 0x9370db),
    ("mediumseagreen", 0x3cb371),
    ("mediumslateblue", 0x7b68ee),
    ("mediumspringgreen", 0x00fa9a),
    ("mediumturquoise", 0x48d1cc),
    ("mediumvioletred", 0xc71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xf5fffa),
    ("mistyrose", 0xffe4e1),
    ("moccasin", 0xffe4b5),
    ("navajowhite", 0xffdead),
    ("navy", 0x000080),
    ("oldlace", 0xfdf5e6),
    ("olive", 0x808000),
    ("olivedrab", 0x6b8e23),
    ("orange", 0xffa500),
    ("orangered", 0xff4500),
    ("orchid", 0xda70d6),
    ("palegoldenrod", 0xeee8aa),
    ("palegreen", 0x98fb98),
    ("paleturquoise", 0xafeeee),
    ("palevioletred", 0xdb7093),
    ("papayawhip", 0xffefd5),
    ("peachpuff", 0xffdab9),
    ("peru", 0xcd853f),
    ("pink", 0xffc0cb),
    ("plum", 0xdda0dd),
    ("powderblue", 0xb0e0e6),
    ("purple", 0x800080),
    ("rebeccapurple", 0x663399),
    ("red", 0xff0000),
    ("rosybrown", 0xbc8f8f),
    ("royalblue", 0x4169e1),
    ("saddlebrown", 0x8b4513),
    ("salmon", 0xfa8072),
    ("sandybrown", 0xf4a460),
    ("seagreen", 0x2e8b57),
    ("seashell", 0xfff5ee),
    ("sienna", 0xa0522d),
    ("silver", 0xc0c0c0),
    ("skyblue", 0x87ceeb),
    ("slateblue", 0x6a5acd),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xfffafa),
    ("springgreen", 0x00ff7f),
    ("steelblue", 0x4682b4),
    ("tan", 0xd2b48c),
    ("teal", 0x008080),
    ("thistle", 0xd8bfd8),
    ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0),
    ("violet", 0xee82ee),
    ("wheat", 0xf5deb3),
    ("white", 0xffffff),
    ("whitesmoke", 0xf5f5f5),
    ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];

/// Perceptually ordered color map used by raster and hexbin charts.
pub fn viridis(t: f64) -> skia::Color {
    const STOPS: [(f64, [u8; 3]); 9] = [
        (0.000, [68, 1, 84]),
        (0.125, [71, 44, 122]),
        (0.250, [59, 81, 139]),
        (0.375, [44, 113, 142]),
        (0.500, [33, 144, 141]),
        (0.625, [39, 173, 129]),
        (0.750, [92, 200, 99]),
        (0.875, [170, 220, 50]),
        (1.000, [253, 231, 37]),
    ];
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let k = STOPS.iter().position(|(p, _)| *p >= t).unwrap_or(STOPS.len() - 1).max(1);
    let (p0, c0) = STOPS[k - 1];
    let (p1, c1) = STOPS[k];
    let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
    skia::Color::from_rgb(mix(c0[0], c1[0]), mix(c0[1], c1[1]), mix(c0[2], c1[2]))
}

pub fn with_alpha(c: skia::Color, a: u8) -> skia::Color {
    skia::Color::from_argb(a, c.r(), c.g(), c.b())
}
