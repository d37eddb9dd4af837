//! Shade and tint ramps generated from a single base color.
//!
//! [`color`] converts between HEX, RGB and HSL and picks readable text colors;
//! [`palette`] builds ten-step ramps with one of three [`Policy`] variants. The
//! [`api`] module serves both over HTTP.

pub mod api;
pub mod color;
pub mod config;
pub mod palette;
pub mod templates;

pub use color::{contrast_text_color, hex_to_hsl, hsl_to_hex, ColorError, Hsl, Rgb};
pub use palette::{build_all, build_palette, Mode, Palette, Policy, PolicyPalette, RampTuning, PALETTE_LEN};
