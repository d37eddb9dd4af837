use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::color::{hex_to_rgb, hsl_to_hex, hsl_to_rgb, rgb_to_hsl, ColorError, Hsl, HslFormula, Rgb};

pub const PALETTE_LEN: usize = 10;

pub type Palette = [String; PALETTE_LEN];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown mode {0:?}: expected light or dark")]
    UnknownMode(String),
    #[error("unknown palette policy {0:?}: expected algorithm, algorithm-v2 or chroma")]
    UnknownPolicy(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Light => "light",
            Mode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Mode::Light => Mode::Dark,
            Mode::Dark => Mode::Light,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Mode::Light),
            "dark" => Ok(Mode::Dark),
            _ => Err(SelectionError::UnknownMode(s.to_string())),
        }
    }
}

/// Numeric knobs that tune a policy without changing what it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampTuning {
    /// Degrees of hue drift across ten Algorithm steps, centered on the pivot.
    pub hue_shift_degrees: f64,
}

impl Default for RampTuning {
    fn default() -> Self {
        Self { hue_shift_degrees: 5.0 }
    }
}

/// A palette generation strategy. Each variant is a pure function of
/// `(base color, mode, tuning)` producing ten `#RRGGBB` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Fixed lightness ladders with saturation boosts and a slight hue drift.
    Algorithm,
    /// Multipliers of the base lightness and saturation.
    AlgorithmV2,
    /// Fixed luminance ladder with the base lightness slotted in.
    Chroma,
}

impl Policy {
    /// Display order of the side-by-side page.
    pub const ALL: [Policy; 3] = [Policy::Chroma, Policy::Algorithm, Policy::AlgorithmV2];

    pub fn slug(self) -> &'static str {
        match self {
            Policy::Algorithm => "algorithm",
            Policy::AlgorithmV2 => "algorithm-v2",
            Policy::Chroma => "chroma",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Policy::Algorithm => "Algorithm",
            Policy::AlgorithmV2 => "Algorithm V2",
            Policy::Chroma => "Chroma",
        }
    }

    /// Position of the unmodified base color in the output.
    pub fn base_index(self, mode: Mode) -> usize {
        match (self, mode) {
            (Policy::Algorithm, Mode::Light) => ALGORITHM_PIVOT,
            (Policy::Algorithm, Mode::Dark) => PALETTE_LEN - 1 - ALGORITHM_PIVOT,
            (Policy::AlgorithmV2, Mode::Light) => V2_BASE_INDEX,
            (Policy::AlgorithmV2, Mode::Dark) => V2_DARK_PREFIX - 1 - V2_BASE_INDEX,
            (Policy::Chroma, Mode::Light) => CHROMA_LIGHT_BASE_INDEX,
            (Policy::Chroma, Mode::Dark) => CHROMA_DARK_BASE_INDEX,
        }
    }

    pub fn build(self, base: &str, mode: Mode, tuning: &RampTuning) -> Result<Palette, ColorError> {
        let base = hex_to_rgb(base)?;
        Ok(match self {
            Policy::Algorithm => algorithm(base, mode, tuning),
            Policy::AlgorithmV2 => algorithm_v2(base, mode),
            Policy::Chroma => chroma(base, mode),
        })
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Policy {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "algorithm" | "a" => Ok(Policy::Algorithm),
            "algorithm-v2" | "v2" | "b" => Ok(Policy::AlgorithmV2),
            "chroma" | "c" => Ok(Policy::Chroma),
            _ => Err(SelectionError::UnknownPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyPalette {
    pub policy: Policy,
    pub mode: Mode,
    pub base: String,
    pub base_index: usize,
    pub colors: Palette,
}

impl PolicyPalette {
    pub fn build(policy: Policy, base: &str, mode: Mode, tuning: &RampTuning) -> Result<Self, ColorError> {
        let colors = policy.build(base, mode, tuning)?;
        let base_index = policy.base_index(mode);
        Ok(Self {
            policy,
            mode,
            base: colors[base_index].clone(),
            base_index,
            colors,
        })
    }
}

pub fn build_palette(policy: Policy, base: &str, mode: Mode) -> Result<Palette, ColorError> {
    policy.build(base, mode, &RampTuning::default())
}

/// Every policy for one base color, in `Policy::ALL` order.
pub fn build_all(base: &str, mode: Mode, tuning: &RampTuning) -> Result<Vec<PolicyPalette>, ColorError> {
    Policy::ALL
        .iter()
        .map(|&policy| PolicyPalette::build(policy, base, mode, tuning))
        .collect()
}

// Algorithm: ladders run light to dark; dark mode is flipped at the end.
const ALGORITHM_LIGHT: [f64; PALETTE_LEN] = [98.0, 95.0, 90.0, 82.0, 72.0, 60.0, 45.0, 35.0, 25.0, 15.0];
const ALGORITHM_DARK: [f64; PALETTE_LEN] = [95.0, 90.0, 82.0, 72.0, 60.0, 45.0, 35.0, 25.0, 15.0, 8.0];
const ALGORITHM_PIVOT: usize = 4;

fn algorithm_saturation(mode: Mode, saturation: f64, index: usize) -> f64 {
    match mode {
        Mode::Light if index < 3 => (saturation * 0.8).max(10.0),
        Mode::Light if index > 6 => (saturation * 1.2).min(100.0),
        Mode::Dark if index > 6 => saturation * 0.7,
        Mode::Dark if index < 3 => (saturation * 1.1).min(100.0),
        _ => saturation,
    }
}

fn algorithm(base: Rgb, mode: Mode, tuning: &RampTuning) -> Palette {
    let Hsl { hue, saturation, .. } = rgb_to_hsl(base).rounded();
    let ladder = match mode {
        Mode::Light => &ALGORITHM_LIGHT,
        Mode::Dark => &ALGORITHM_DARK,
    };
    let mut palette: Palette = std::array::from_fn(|index| {
        if index == ALGORITHM_PIVOT {
            return base.to_hex();
        }
        let shift = (index as f64 - ALGORITHM_PIVOT as f64) / 10.0 * tuning.hue_shift_degrees;
        hsl_to_rgb(
            HslFormula::Sector,
            hue + shift,
            algorithm_saturation(mode, saturation, index),
            ladder[index],
        )
        .to_hex()
    });
    if mode == Mode::Dark {
        palette.reverse();
    }
    palette
}

// Algorithm V2: (saturation, lightness) multipliers of the base.
const V2_LIGHT_STEPS: [(f64, f64); PALETTE_LEN] = [
    (0.9, 0.25),
    (0.95, 0.4),
    (1.0, 0.6),
    (1.0, 1.0),
    (0.9, 1.1),
    (0.8, 1.2),
    (0.7, 1.3),
    (0.6, 1.4),
    (0.5, 1.5),
    (0.4, 1.6),
];
const V2_BASE_INDEX: usize = 3;
// Dark mode reuses the first six light entries reversed, then goes darker.
const V2_DARK_PREFIX: usize = 6;
const V2_DARK_TAIL: [(f64, f64); PALETTE_LEN - V2_DARK_PREFIX] = [(0.4, 0.4), (0.3, 0.3), (0.25, 0.25), (0.2, 0.15)];

fn algorithm_v2(base: Rgb, mode: Mode) -> Palette {
    let Hsl { hue, saturation, lightness } = rgb_to_hsl(base);
    let step = |(s, l): (f64, f64)| hsl_to_hex(hue, saturation * s, (lightness * l).min(100.0));
    let light: Palette = std::array::from_fn(|index| {
        if index == V2_BASE_INDEX {
            base.to_hex()
        } else {
            step(V2_LIGHT_STEPS[index])
        }
    });
    match mode {
        Mode::Light => light,
        Mode::Dark => std::array::from_fn(|index| {
            if index < V2_DARK_PREFIX {
                light[V2_DARK_PREFIX - 1 - index].clone()
            } else {
                step(V2_DARK_TAIL[index - V2_DARK_PREFIX])
            }
        }),
    }
}

// Chroma: fractional lightness; the base slot holds the base lightness.
const CHROMA_LIGHT: [f64; PALETTE_LEN] = [0.1, 0.2, 0.3, 0.4, 0.5, f64::NAN, 0.7, 0.8, 0.85, 0.95];
const CHROMA_DARK: [f64; PALETTE_LEN] = [0.95, 0.85, 0.8, 0.7, f64::NAN, 0.5, 0.35, 0.25, 0.2, 0.1];
const CHROMA_LIGHT_BASE_INDEX: usize = 5;
const CHROMA_DARK_BASE_INDEX: usize = 4;

fn chroma_saturation_multiplier(mode: Mode, index: usize) -> f64 {
    match mode {
        Mode::Light if index < 5 => 1.0,
        Mode::Light => 1.0 - (index - 4) as f64 * 0.1,
        Mode::Dark if index > 4 => 0.9,
        Mode::Dark => 1.0 - (4 - index) as f64 * 0.1,
    }
}

fn chroma(base: Rgb, mode: Mode) -> Palette {
    let Hsl { hue, saturation, .. } = rgb_to_hsl(base);
    let (ladder, base_index) = match mode {
        Mode::Light => (&CHROMA_LIGHT, CHROMA_LIGHT_BASE_INDEX),
        Mode::Dark => (&CHROMA_DARK, CHROMA_DARK_BASE_INDEX),
    };
    std::array::from_fn(|index| {
        if index == base_index {
            return base.to_hex();
        }
        let saturation = saturation * chroma_saturation_multiplier(mode, index);
        hsl_to_hex(hue, saturation, ladder[index] * 100.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hex_to_hsl;

    const SAMPLES: [&str; 8] = ["#FF0000", "#808080", "#3A7BD5", "#00FF7F", "#000000", "#FFFFFF", "#F0E68C", "#4B0082"];

    fn lightness(hex: &str) -> f64 {
        hex_to_hsl(hex).unwrap().lightness
    }

    fn without_base(palette: &Palette, base_index: usize) -> Vec<f64> {
        palette
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != base_index)
            .map(|(_, hex)| lightness(hex))
            .collect()
    }

    #[test]
    fn every_palette_has_ten_entries_and_the_base() {
        for base in SAMPLES {
            for policy in Policy::ALL {
                for mode in [Mode::Light, Mode::Dark] {
                    let palette = build_palette(policy, base, mode).unwrap();
                    assert_eq!(palette.len(), PALETTE_LEN);
                    assert_eq!(palette[policy.base_index(mode)], base, "{policy} {mode} {base}");
                    for hex in &palette {
                        assert!(hex_to_rgb(hex).is_ok(), "{hex}");
                    }
                }
            }
        }
    }

    #[test]
    fn base_is_normalized() {
        let palette = build_palette(Policy::Chroma, "3a7bd5", Mode::Light).unwrap();
        assert_eq!(palette[5], "#3A7BD5");
    }

    #[test]
    fn invalid_base_is_rejected() {
        for policy in Policy::ALL {
            assert!(matches!(
                build_palette(policy, "not-a-color", Mode::Light),
                Err(ColorError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn builds_are_deterministic() {
        let tuning = RampTuning::default();
        for policy in Policy::ALL {
            let first = build_all("#3A7BD5", Mode::Dark, &tuning).unwrap();
            let second = build_all("#3A7BD5", Mode::Dark, &tuning).unwrap();
            assert_eq!(first, second);
            assert_eq!(policy.build("#3A7BD5", Mode::Light, &tuning), policy.build("#3A7BD5", Mode::Light, &tuning));
        }
    }

    #[test]
    fn algorithm_lightness_is_monotonic() {
        for base in SAMPLES {
            let light = build_palette(Policy::Algorithm, base, Mode::Light).unwrap();
            let values = without_base(&light, Policy::Algorithm.base_index(Mode::Light));
            assert!(values.windows(2).all(|w| w[0] >= w[1]), "{base} light {values:?}");

            let dark = build_palette(Policy::Algorithm, base, Mode::Dark).unwrap();
            let values = without_base(&dark, Policy::Algorithm.base_index(Mode::Dark));
            assert!(values.windows(2).all(|w| w[0] <= w[1]), "{base} dark {values:?}");
        }
    }

    #[test]
    fn chroma_lightness_follows_its_ladder() {
        for base in SAMPLES {
            let light = build_palette(Policy::Chroma, base, Mode::Light).unwrap();
            let values = without_base(&light, Policy::Chroma.base_index(Mode::Light));
            assert!(values.windows(2).all(|w| w[0] <= w[1]), "{base} light {values:?}");

            let dark = build_palette(Policy::Chroma, base, Mode::Dark).unwrap();
            let values = without_base(&dark, Policy::Chroma.base_index(Mode::Dark));
            assert!(values.windows(2).all(|w| w[0] >= w[1]), "{base} dark {values:?}");
        }
    }

    #[test]
    fn algorithm_red() {
        let light = build_palette(Policy::Algorithm, "#FF0000", Mode::Light).unwrap();
        assert_eq!(light[0], "#FEF6F6");
        assert_eq!(light[4], "#FF0000");

        let dark = build_palette(Policy::Algorithm, "#FF0000", Mode::Dark).unwrap();
        assert_eq!(dark[5], "#FF0000");
        let mut reversed = dark.clone();
        reversed.reverse();
        assert_eq!(reversed[ALGORITHM_PIVOT], "#FF0000");
    }

    #[test]
    fn algorithm_hue_shift_is_tunable() {
        let flat = RampTuning { hue_shift_degrees: 0.0 };
        let unshifted = Policy::Algorithm.build("#FF0000", Mode::Light, &flat).unwrap();
        let shifted = Policy::Algorithm.build("#FF0000", Mode::Light, &RampTuning::default()).unwrap();
        assert_eq!(unshifted[8], "#800000");
        assert_ne!(unshifted[8], shifted[8]);
    }

    #[test]
    fn algorithm_v2_red() {
        let light = build_palette(Policy::AlgorithmV2, "#FF0000", Mode::Light).unwrap();
        assert_eq!(&light[..5], ["#3D0303", "#630303", "#990000", "#FF0000", "#F42525"]);

        let dark = build_palette(Policy::AlgorithmV2, "#FF0000", Mode::Dark).unwrap();
        let prefix: Vec<&String> = light[..6].iter().rev().collect();
        let dark_prefix: Vec<&String> = dark[..6].iter().collect();
        assert_eq!(dark_prefix, prefix);
        assert_eq!(dark[2], "#FF0000");
        assert_eq!(dark[6], "#471F1F");
    }

    #[test]
    fn algorithm_v2_dark_is_not_a_reversal() {
        let mut light = build_palette(Policy::AlgorithmV2, "#3A7BD5", Mode::Light).unwrap();
        let dark = build_palette(Policy::AlgorithmV2, "#3A7BD5", Mode::Dark).unwrap();
        light.reverse();
        assert_ne!(light, dark);
    }

    #[test]
    fn chroma_red() {
        let light = build_palette(Policy::Chroma, "#FF0000", Mode::Light).unwrap();
        assert_eq!(light[0], "#330000");
        assert_eq!(light[9], "#F9ECEC");
        assert_eq!(light[5], "#FF0000");

        let dark = build_palette(Policy::Chroma, "#FF0000", Mode::Dark).unwrap();
        assert_eq!(dark[0], "#FAEBEB");
        assert_eq!(dark[3], "#F76E6E");
        assert_eq!(dark[4], "#FF0000");
        assert_eq!(dark[5], "#F20D0D");
        assert_eq!(dark[9], "#300303");
    }

    #[test]
    fn chroma_saturation_decays_past_the_midpoint() {
        assert_eq!(chroma_saturation_multiplier(Mode::Light, 0), 1.0);
        assert_eq!(chroma_saturation_multiplier(Mode::Light, 4), 1.0);
        assert!((chroma_saturation_multiplier(Mode::Light, 9) - 0.5).abs() < 1e-12);
        assert!((chroma_saturation_multiplier(Mode::Dark, 0) - 0.6).abs() < 1e-12);
        assert_eq!(chroma_saturation_multiplier(Mode::Dark, 4), 1.0);
        assert_eq!(chroma_saturation_multiplier(Mode::Dark, 7), 0.9);
    }

    #[test]
    fn gray_stays_gray() {
        for policy in [Policy::AlgorithmV2, Policy::Chroma] {
            for mode in [Mode::Light, Mode::Dark] {
                for hex in build_palette(policy, "#808080", mode).unwrap() {
                    assert_eq!(hex_to_hsl(&hex).unwrap().saturation, 0.0, "{policy} {hex}");
                }
            }
        }
    }

    #[test]
    fn algorithm_floors_light_saturation() {
        let light = build_palette(Policy::Algorithm, "#808080", Mode::Light).unwrap();
        assert!(hex_to_hsl(&light[2]).unwrap().saturation > 0.0);
        assert_eq!(hex_to_hsl(&light[5]).unwrap().saturation, 0.0);
    }

    #[test]
    fn policy_and_mode_parse() {
        assert_eq!("Chroma".parse::<Policy>().unwrap(), Policy::Chroma);
        assert_eq!("v2".parse::<Policy>().unwrap(), Policy::AlgorithmV2);
        assert_eq!("algorithm".parse::<Policy>().unwrap(), Policy::Algorithm);
        assert_eq!("DARK".parse::<Mode>().unwrap(), Mode::Dark);
        assert_eq!(
            "sepia".parse::<Mode>(),
            Err(SelectionError::UnknownMode("sepia".to_string()))
        );
        assert!("rainbow".parse::<Policy>().is_err());
        for policy in Policy::ALL {
            assert_eq!(policy.slug().parse::<Policy>().unwrap(), policy);
        }
    }

    #[test]
    fn policy_palette_serializes() {
        let palette = PolicyPalette::build(Policy::AlgorithmV2, "#ff0000", Mode::Dark, &RampTuning::default()).unwrap();
        let json = serde_json::to_value(&palette).unwrap();
        assert_eq!(json["policy"], "algorithm-v2");
        assert_eq!(json["mode"], "dark");
        assert_eq!(json["base"], "#FF0000");
        assert_eq!(json["base_index"], 2);
        assert_eq!(json["colors"].as_array().unwrap().len(), PALETTE_LEN);
    }
}
