use askama::Template;

use crate::color::{contrast_text_color, hex_to_hsl, hsl_string, ColorError};
use crate::palette::{Mode, PolicyPalette};

pub struct Swatch {
    pub hex: String,
    pub text_color: String,
    pub hsl: String,
    pub is_base: bool,
}

pub struct PaletteColumn {
    pub title: &'static str,
    pub swatches: Vec<Swatch>,
}

impl PaletteColumn {
    pub fn from_palette(palette: &PolicyPalette) -> Result<Self, ColorError> {
        let swatches = palette
            .colors
            .iter()
            .enumerate()
            .map(|(index, hex)| {
                Ok(Swatch {
                    hex: hex.clone(),
                    text_color: contrast_text_color(hex)?,
                    hsl: hsl_string(hex_to_hsl(hex)?),
                    is_base: index == palette.base_index,
                })
            })
            .collect::<Result<Vec<_>, ColorError>>()?;
        Ok(Self {
            title: palette.policy.title(),
            swatches,
        })
    }
}

#[derive(Template)]
#[template(path = "palettes.html")]
pub struct PalettePageTemplate {
    pub color: String,
    pub color_text: String,
    pub mode: Mode,
    pub columns: Vec<PaletteColumn>,
}

impl PalettePageTemplate {
    /// Query-string form of the base color, without the '#'.
    pub fn color_param(&self) -> &str {
        self.color.trim_start_matches('#')
    }

    pub fn toggled_mode(&self) -> Mode {
        self.mode.toggled()
    }
}
