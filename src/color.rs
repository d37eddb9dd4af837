use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub const WHITE: &str = "#FFFFFF";
pub const BLACK: &str = "#000000";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid hex color {0:?}: expected RRGGBB or #RRGGBB")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self { hue, saturation, lightness }
    }

    /// Whole degrees and whole percents.
    pub fn rounded(self) -> Self {
        Self {
            hue: self.hue.round(),
            saturation: self.saturation.round(),
            lightness: self.lightness.round(),
        }
    }
}

/// The two equivalent HSL -> RGB formulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HslFormula {
    /// Chroma / intermediate / match-value over six 60 degree sectors.
    Sector,
    /// The `k(n) = (n + h/30) mod 12` channel function.
    Kelvin,
}

pub fn hsl_string(hsl: Hsl) -> String {
    format!("hsl({:.0}, {:.0}%, {:.0}%)", hsl.hue, hsl.saturation, hsl.lightness)
}

pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    // from_str_radix alone would accept a leading '+'
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidFormat(hex.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::InvalidFormat(hex.to_string()))
    };
    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn normalize_hex(hex: &str) -> Result<String, ColorError> {
    Ok(hex_to_rgb(hex)?.to_hex())
}

pub fn hex_to_hsl(hex: &str) -> Result<Hsl, ColorError> {
    Ok(rgb_to_hsl(hex_to_rgb(hex)?))
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    let (h, s);
    if d == 0.0 {
        h = 0.0;
        s = 0.0;
    } else {
        // max != min here, so neither denominator can reach zero
        s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let sector = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        h = sector / 6.0;
    }
    Hsl::new(h * 360.0, s * 100.0, l * 100.0)
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

fn normalize_hue(h: f64) -> f64 {
    let h = finite_or_zero(h).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}

fn to_channel(x: f64) -> u8 {
    // round-half-up; inputs are non-negative after clamping
    (x * 255.0 + 0.5).floor().clamp(0.0, 255.0) as u8
}

pub fn hsl_to_rgb(formula: HslFormula, h: f64, s: f64, l: f64) -> Rgb {
    let h = normalize_hue(h);
    let s = finite_or_zero(s).clamp(0.0, 100.0) / 100.0;
    let l = finite_or_zero(l).clamp(0.0, 100.0) / 100.0;

    let (r, g, b) = match formula {
        HslFormula::Sector => {
            let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
            let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
            let m = l - c / 2.0;
            let (r, g, b) = match h {
                h if h < 60.0 => (c, x, 0.0),
                h if h < 120.0 => (x, c, 0.0),
                h if h < 180.0 => (0.0, c, x),
                h if h < 240.0 => (0.0, x, c),
                h if h < 300.0 => (x, 0.0, c),
                _ => (c, 0.0, x),
            };
            (r + m, g + m, b + m)
        }
        HslFormula::Kelvin => {
            let a = s * l.min(1.0 - l);
            let f = |n: f64| {
                let k = (n + h / 30.0) % 12.0;
                l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0)
            };
            (f(0.0), f(8.0), f(4.0))
        }
    };
    Rgb::new(to_channel(r), to_channel(g), to_channel(b))
}

/// Converts HSL (degrees, percent, percent) to `#RRGGBB`. Never fails: hue wraps,
/// saturation and lightness clamp to [0, 100].
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    hsl_to_rgb(HslFormula::Kelvin, h, s, l).to_hex()
}

/// WCAG relative luminance of an sRGB color, in [0, 1].
pub fn relative_luminance(rgb: Rgb) -> f64 {
    let linear = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
    };
    0.2126 * linear(rgb.r) + 0.7152 * linear(rgb.g) + 0.0722 * linear(rgb.b)
}

/// White text on dark backgrounds, black text otherwise.
pub fn contrast_text_color(hex: &str) -> Result<String, ColorError> {
    let luminance = relative_luminance(hex_to_rgb(hex)?);
    Ok(if luminance < 0.5 { WHITE } else { BLACK }.to_string())
}
