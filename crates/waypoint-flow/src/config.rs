#![forbid(unsafe_code)]

//! Tour configuration as data.
//!
//! [`TourConfig`] gathers every global tunable: the deferred reset delay,
//! the anchor layout parameters and the global style defaults that sit at
//! the bottom of the override chain. With the `config` feature it loads from
//! TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! # waypoint.toml
//! reset_delay_ms = 350
//!
//! [layout]
//! padding = 12.0
//!
//! [styles.dim]
//! opacity = 0.5
//! ```
//!
//! ```rust,ignore
//! let config = TourConfig::from_toml_file("waypoint.toml")?.validated()?;
//! let coordinator = Coordinator::with_config(config);
//! ```
//!
//! # Defaults
//!
//! Every field has a default, so a partial file only overrides what it
//! names and `TourConfig::default()` is always a working setup.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use thiserror::Error;
use waypoint_geometry::LayoutParams;

use crate::style::{ResolvedStyles, Transition};

/// Delay between a flow ending and its state being cleared.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TourConfig {
    /// Milliseconds between completion/skip and the deferred reset.
    pub reset_delay_ms: u64,

    /// Anchor resolution parameters.
    pub layout: LayoutParams,

    /// Global style defaults.
    pub styles: ResolvedStyles,

    /// Transition used when a flow does not set its own.
    pub transition: Transition,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            reset_delay_ms: DEFAULT_RESET_DELAY.as_millis() as u64,
            layout: LayoutParams::default(),
            styles: ResolvedStyles::default(),
            transition: Transition::default(),
        }
    }
}

impl TourConfig {
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    /// Set the reset delay.
    #[must_use]
    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutParams) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_styles(mut self, styles: ResolvedStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every parameter is within its acceptable range.
    ///
    /// Returns a list of violations. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let layout = &self.layout;
        if !(layout.padding.is_finite() && layout.padding >= 0.0) {
            errors.push(format!("layout.padding must be >= 0, got {}", layout.padding));
        }
        if !(layout.automatic_gap.is_finite() && layout.automatic_gap >= 0.0) {
            errors.push(format!(
                "layout.automatic_gap must be >= 0, got {}",
                layout.automatic_gap
            ));
        }
        let fallback = layout.fallback_footprint;
        if !(fallback.width > 0.0 && fallback.height > 0.0)
            || !(fallback.width.is_finite() && fallback.height.is_finite())
        {
            errors.push(format!(
                "layout.fallback_footprint must be positive, got {}x{}",
                fallback.width, fallback.height
            ));
        }

        let tooltip = &self.styles.tooltip;
        if tooltip.corner_radius < 0.0 {
            errors.push(format!(
                "styles.tooltip.corner_radius must be >= 0, got {}",
                tooltip.corner_radius
            ));
        }
        if !(0.0..=1.0).contains(&tooltip.shadow_opacity) {
            errors.push(format!(
                "styles.tooltip.shadow_opacity must be in [0, 1], got {}",
                tooltip.shadow_opacity
            ));
        }
        if let Some(max_width) = tooltip.max_width
            && max_width <= 0.0
        {
            errors.push(format!(
                "styles.tooltip.max_width must be > 0, got {max_width}"
            ));
        }

        if !(0.0..=1.0).contains(&self.styles.dim.opacity) {
            errors.push(format!(
                "styles.dim.opacity must be in [0, 1], got {}",
                self.styles.dim.opacity
            ));
        }

        let arrow = &self.styles.arrow;
        if arrow.line_width <= 0.0 {
            errors.push(format!(
                "styles.arrow.line_width must be > 0, got {}",
                arrow.line_width
            ));
        }
        if arrow.head_length < 0.0 {
            errors.push(format!(
                "styles.arrow.head_length must be >= 0, got {}",
                arrow.head_length
            ));
        }
        if !(arrow.head_angle > 0.0 && arrow.head_angle < 90.0) {
            errors.push(format!(
                "styles.arrow.head_angle must be in (0, 90), got {}",
                arrow.head_angle
            ));
        }
        if !arrow.curve_intensity.is_finite() {
            errors.push(format!(
                "styles.arrow.curve_intensity must be finite, got {}",
                arrow.curve_intensity
            ));
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing, otherwise the
    /// collected violations.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading a [`TourConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
