//! Tunable processing settings.
//!
//! A flat record of numeric and enumerated tunables persisted alongside
//! the palette. Most fields belong to an enhanced tone-mapping mode that
//! the web frontend edits and future pipeline revisions will consume;
//! the current stages read only the display tuning (contrast and
//! brightness f-stop), which lives in [`DisplayTuning`]. The settings are
//! still validated, persisted bit-exact, and round-tripped faithfully so
//! the frontend never loses state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tone curve selection for the enhanced processing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMode {
    #[default]
    Scurve,
    Contrast,
}

/// Color distance method for the enhanced processing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMethod {
    #[default]
    Rgb,
    Lab,
}

/// Overall processing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    #[default]
    Enhanced,
    Stock,
}

impl FromStr for ToneMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scurve" => Ok(Self::Scurve),
            "contrast" => Ok(Self::Contrast),
            other => Err(format!("unknown tone mode '{other}' (scurve|contrast)")),
        }
    }
}

impl FromStr for ColorMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rgb" => Ok(Self::Rgb),
            "lab" => Ok(Self::Lab),
            other => Err(format!("unknown color method '{other}' (rgb|lab)")),
        }
    }
}

impl FromStr for ProcessingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enhanced" => Ok(Self::Enhanced),
            "stock" => Ok(Self::Stock),
            other => Err(format!("unknown processing mode '{other}' (enhanced|stock)")),
        }
    }
}

/// Persisted processing tunables.
///
/// Floats round-trip bit-exact through the JSON store (serde_json prints
/// the shortest representation that parses back to the same f32), so a
/// value saved as `0.9` is read back as exactly `0.9f32`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    pub exposure: f32,
    pub saturation: f32,
    pub tone_mode: ToneMode,
    pub contrast: f32,
    pub strength: f32,
    pub shadow_boost: f32,
    pub highlight_compress: f32,
    pub midpoint: f32,
    pub color_method: ColorMethod,
    pub render_measured: bool,
    pub processing_mode: ProcessingMode,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            saturation: 1.3,
            tone_mode: ToneMode::Scurve,
            contrast: 1.0,
            strength: 0.9,
            shadow_boost: 0.0,
            highlight_compress: 1.5,
            midpoint: 0.5,
            color_method: ColorMethod::Rgb,
            render_measured: true,
            processing_mode: ProcessingMode::Enhanced,
        }
    }
}

/// Display tuning consumed by the tone stages.
///
/// Kept separate from [`ProcessingSettings`] because it is the one pair
/// of knobs the pipeline actually reads today, persisted under its own
/// store key exactly like the firmware's display manager kept it apart
/// from the processing record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayTuning {
    /// Contrast multiplier, 1.0 = no change.
    pub contrast: f32,
    /// Brightness adjustment in f-stops, 0.0 = no change.
    pub brightness_fstop: f32,
}

impl Default for DisplayTuning {
    fn default() -> Self {
        Self {
            contrast: 1.3,
            brightness_fstop: 0.3,
        }
    }
}
