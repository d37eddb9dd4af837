use std::env;

use anyhow::{Context, Result};
use log::warn;

use crate::color::normalize_hex;
use crate::palette::{Mode, RampTuning};

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub default_color: String,
    pub default_mode: Mode,
    pub tuning: RampTuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            default_color: "#FF0000".to_string(),
            default_mode: Mode::Light,
            tuning: RampTuning::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            // Server
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: parse_or_default(&lookup, "PORT", defaults.port),
            // Palette defaults
            default_color: match lookup("DEFAULT_COLOR") {
                Some(v) => normalize_hex(&v).context("DEFAULT_COLOR is not a valid hex color")?,
                None => defaults.default_color,
            },
            default_mode: match lookup("DEFAULT_MODE") {
                Some(v) => v.parse::<Mode>().context("DEFAULT_MODE must be light or dark")?,
                None => defaults.default_mode,
            },
            tuning: RampTuning {
                hue_shift_degrees: parse_or_default(&lookup, "HUE_SHIFT_DEGREES", defaults.tuning.hue_shift_degrees),
            },
        })
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {}={:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}
