// File: crates/tsplot-core/src/theme.rs
// Summary: Built-in plot styles (figure colors, grid defaults and series color cycles).

use skia_safe as skia;

use crate::color::from_u32;
use crate::error::{PlotError, Result};

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub plot_background: skia::Color,
    pub grid: skia::Color,
    pub axis_line: skia::Color,
    pub text: skia::Color,
    pub tick: skia::Color,
    /// Series color cycle, `0xRRGGBB`.
    pub palette: &'static [u32],
    /// Grid drawn even when the caller did not ask for one.
    pub grid_on: bool,
}

const WHITE: skia::Color = skia::Color::WHITE;
const BLACK: skia::Color = skia::Color::BLACK;

impl Theme {
    fn light(name: &'static str, palette: &'static [u32]) -> Self {
        Self {
            name,
            background: WHITE,
            plot_background: WHITE,
            grid: skia::Color::from_argb(255, 0xb0, 0xb0, 0xb0),
            axis_line: BLACK,
            text: BLACK,
            tick: BLACK,
            palette,
            grid_on: false,
        }
    }

    pub fn default_style() -> Self {
        Self::light(
            "default",
            &[0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22, 0x17becf],
        )
    }

    pub fn classic() -> Self {
        Self::light("classic", &[0x0000ff, 0x008000, 0xff0000, 0x00bfbf, 0xbf00bf, 0xbfbf00, 0x000000])
    }

    pub fn bright() -> Self {
        Self::light("bright", &[0x4477aa, 0xee6677, 0x228833, 0xccbb44, 0x66ccee, 0xaa3377, 0xbbbbbb])
    }

    pub fn vibrant() -> Self {
        Self::light("vibrant", &[0xee7733, 0x0077bb, 0x33bbee, 0xee3377, 0xcc3311, 0x009988, 0xbbbbbb])
    }

    pub fn muted() -> Self {
        Self::light(
            "muted",
            &[0xcc6677, 0x332288, 0xddcc77, 0x117733, 0x88ccee, 0x882255, 0x44aa99, 0x999933, 0xaa4499],
        )
    }

    pub fn ggplot() -> Self {
        Self {
            plot_background: from_u32(0xe5e5e5),
            grid: WHITE,
            axis_line: from_u32(0xe5e5e5),
            text: from_u32(0x555555),
            tick: from_u32(0x555555),
            grid_on: true,
            ..Self::light("ggplot", &[0xe24a33, 0x348abd, 0x988ed5, 0x777777, 0xfbc15e, 0x8eba42, 0xffb5b8])
        }
    }

    pub fn bmh() -> Self {
        Self {
            plot_background: from_u32(0xeeeeee),
            grid: from_u32(0xb2b2b2),
            axis_line: from_u32(0xbcbcbc),
            grid_on: true,
            ..Self::light(
                "bmh",
                &[0x348abd, 0xa60628, 0x7a68a6, 0x467821, 0xd55e00, 0xcc79a7, 0x56b4e9, 0x009e73, 0xf0e442, 0x0072b2],
            )
        }
    }

    pub fn grayscale() -> Self {
        Self::light("grayscale", &[0x000000, 0x666666, 0x999999, 0xb3b3b3, 0x4d4d4d])
    }

    pub fn dark_background() -> Self {
        Self {
            name: "dark_background",
            background: BLACK,
            plot_background: BLACK,
            grid: from_u32(0x444444),
            axis_line: WHITE,
            text: WHITE,
            tick: WHITE,
            palette: &[0x8dd3c7, 0xfeffb3, 0xbfbbd9, 0xfa8174, 0x81b1d2, 0xfdb462, 0xb3de69, 0xbc82bd, 0xccebc4, 0xffed6f],
            grid_on: false,
        }
    }

    pub fn solarize_light2() -> Self {
        Self {
            background: from_u32(0xfdf6e3),
            plot_background: from_u32(0xeee8d5),
            grid: from_u32(0xfdf6e3),
            axis_line: from_u32(0x657b83),
            text: from_u32(0x657b83),
            tick: from_u32(0x657b83),
            grid_on: true,
            ..Self::light(
                "solarize_light2",
                &[0x268bd2, 0x2aa198, 0x859900, 0xb58900, 0xcb4b16, 0xdc322f, 0xd33682, 0x6c71c4],
            )
        }
    }

    pub fn seaborn_colorblind() -> Self {
        Self::light("seaborn-colorblind", &[0x0072b2, 0x009e73, 0xd55e00, 0xcc79a7, 0xf0e442, 0x56b4e9])
    }

    pub fn tableau_colorblind10() -> Self {
        Self::light(
            "tableau-colorblind10",
            &[0x006ba4, 0xff800e, 0xababab, 0x595959, 0x5f9ed1, 0xc85200, 0x898989, 0xa2c8ec, 0xffbc79, 0xcfcfcf],
        )
    }

    pub fn high_contrast() -> Self {
        Self::light("high-contrast", &[0x004488, 0xddaa33, 0xbb5566])
    }

    /// Color `n` of the series cycle.
    pub fn cycle_color(&self, n: usize) -> skia::Color {
        from_u32(self.palette[n % self.palette.len()])
    }

    /// Apply `styles` left to right; later presets replace earlier ones and
    /// modifiers tweak whatever is active.
    pub fn from_styles(styles: &[String]) -> Result<Self> {
        let mut theme = Theme::default_style();
        for s in styles {
            let key = s.trim().to_ascii_lowercase();
            match key.as_str() {
                "" | "no-latex" | "science" | "notebook" | "scatter" => {}
                "grid" => theme.grid_on = true,
                _ => theme = find(&key).ok_or_else(|| PlotError::UnknownStyle(s.clone()))?,
            }
        }
        Ok(theme)
    }
}

impl Default for Theme {
    fn default() -> Self { Theme::bright() }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![
        Theme::default_style(),
        Theme::classic(),
        Theme::bright(),
        Theme::vibrant(),
        Theme::muted(),
        Theme::ggplot(),
        Theme::bmh(),
        Theme::grayscale(),
        Theme::dark_background(),
        Theme::solarize_light2(),
        Theme::seaborn_colorblind(),
        Theme::tableau_colorblind10(),
        Theme::high_contrast(),
    ]
}

/// Find a theme by its `name` (case-insensitive, `_` and `-` interchangeable).
pub fn find(name: &str) -> Option<Theme> {
    let norm = |s: &str| s.to_ascii_lowercase().replace('_', "-");
    let want = norm(name);
    presets().into_iter().find(|t| norm(t.name) == want)
}
