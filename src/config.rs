//! Construction-time parameters for the overlay layers.
//!
//! Every field is optional in JSON; missing fields take the defaults below.

use std::path::Path;

use anyhow::Context as _;

use crate::bar::BarParams;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::noise::ColorMode;
use crate::surface::ResolutionCap;

/// Ambient full-field noise.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Final layer alpha, `0..=1`.
    pub opacity: f32,
    /// Noise chunkiness: the downscale factor used on desktop (mobile uses one more). `null`
    /// lets the surface area decide.
    pub scale: Option<u32>,
    /// Target draw rate.
    pub fps: f64,
    /// Side of the centered square box in logical px; `None` fills the viewport.
    pub size: Option<f64>,
    /// How samples are colored.
    pub color_mode: ColorMode,
    /// Cap on the device-pixel ratio; defaults per device class.
    pub resolution_cap: Option<ResolutionCap>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            opacity: 0.07,
            scale: Some(2),
            fps: 20.0,
            size: Some(700.0),
            color_mode: ColorMode::Grayscale,
            resolution_cap: None,
        }
    }
}

/// Transient traveling bar.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Final layer alpha, `0..=1`.
    pub opacity: f32,
    /// Noise cell size in device px. `null` fills small bars at full resolution.
    pub scale: Option<u32>,
    /// Target draw rate.
    pub fps: f64,
    /// Timing and geometry ranges.
    #[serde(flatten)]
    pub params: BarParams,
    /// How samples are colored.
    pub color_mode: ColorMode,
    /// Cap on the device-pixel ratio; defaults per device class.
    pub resolution_cap: Option<ResolutionCap>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            opacity: 0.1,
            scale: Some(3),
            fps: 20.0,
            params: BarParams::default(),
            color_mode: ColorMode::Grayscale,
            resolution_cap: None,
        }
    }
}

/// Which layers to mount and how.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Background layer; `null` disables it.
    pub background: Option<BackgroundConfig>,
    /// Bar layer; `null` disables it.
    pub bar: Option<BarConfig>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            background: Some(BackgroundConfig {
                opacity: 0.08,
                ..BackgroundConfig::default()
            }),
            bar: Some(BarConfig::default()),
        }
    }
}

fn check_common(layer: &str, opacity: f32, scale: Option<u32>, fps: f64) -> OverlayResult<()> {
    if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
        return Err(OverlayError::validation(format!(
            "{layer} opacity must be within 0..=1"
        )));
    }
    if scale == Some(0) {
        return Err(OverlayError::validation(format!("{layer} scale must be >= 1")));
    }
    if !fps.is_finite() || fps <= 0.0 {
        return Err(OverlayError::validation(format!("{layer} fps must be > 0")));
    }
    Ok(())
}

impl BackgroundConfig {
    /// Validate ranges.
    pub fn validate(&self) -> OverlayResult<()> {
        check_common("background", self.opacity, self.scale, self.fps)?;
        if let Some(size) = self.size
            && (!size.is_finite() || size < 0.0)
        {
            return Err(OverlayError::validation(
                "background size must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

impl BarConfig {
    /// Validate ranges.
    pub fn validate(&self) -> OverlayResult<()> {
        check_common("bar", self.opacity, self.scale, self.fps)?;
        self.params.validate()
    }
}

impl OverlayConfig {
    /// Parse JSON.
    pub fn from_json_str(s: &str) -> OverlayResult<Self> {
        serde_json::from_str(s).map_err(|e| OverlayError::serde(e.to_string()))
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: &Path) -> OverlayResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read overlay config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Validate every enabled layer.
    pub fn validate(&self) -> OverlayResult<()> {
        if let Some(bg) = &self.background {
            bg.validate()?;
        }
        if let Some(bar) = &self.bar {
            bar.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
