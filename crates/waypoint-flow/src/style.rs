#![forbid(unsafe_code)]

//! Visual style records and their three-level override chain.
//!
//! Each style exists twice: a complete record with every field set
//! ([`TooltipStyle`], [`DimStyle`], [`ArrowStyle`]) and a patch with every
//! field optional ([`TooltipPatch`], [`DimPatch`], [`ArrowPatch`]). Steps and
//! flows carry patches; the global defaults are complete. [`resolve`] is the
//! single place where precedence is decided:
//!
//! ```text
//! step patch  >  flow patch  >  global style
//! ```
//!
//! Fields are resolved independently, so a step can override just the
//! corner radius and still inherit a flow-wide background color.

use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const BLUE: Self = Self::rgb(0, 122, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha set from a `0.0..=1.0` opacity.
    #[must_use]
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum FontWeight {
    #[default]
    Regular,
    Medium,
    Semibold,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct Font {
    /// `None` selects the platform's system font.
    pub family: Option<String>,
    pub size: f64,
    pub weight: FontWeight,
}

impl Default for Font {
    fn default() -> Self {
        Self::body()
    }
}

impl Font {
    pub fn headline() -> Self {
        Self {
            family: None,
            size: 17.0,
            weight: FontWeight::Semibold,
        }
    }

    pub fn body() -> Self {
        Self {
            family: None,
            size: 17.0,
            weight: FontWeight::Regular,
        }
    }
}

/// Tooltip callout appearance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TooltipStyle {
    pub background: Rgba,
    pub text_color: Rgba,
    pub corner_radius: f64,
    pub shadow_color: Rgba,
    pub shadow_opacity: f64,
    pub shadow_radius: f64,
    pub shadow_offset_x: f64,
    pub shadow_offset_y: f64,
    /// Cap on the callout width. `None` uses the layout fallback width.
    pub max_width: Option<f64>,
    /// Inner padding around the callout content.
    pub padding: f64,
    /// Vertical gap between title and description.
    pub spacing: f64,
    pub title_font: Font,
    pub body_font: Font,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            text_color: Rgba::BLACK,
            corner_radius: 12.0,
            shadow_color: Rgba::BLACK,
            shadow_opacity: 0.2,
            shadow_radius: 10.0,
            shadow_offset_x: 0.0,
            shadow_offset_y: 5.0,
            max_width: None,
            padding: 16.0,
            spacing: 12.0,
            title_font: Font::headline(),
            body_font: Font::body(),
        }
    }
}

/// The dim layer behind the spotlight hole.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct DimStyle {
    pub color: Rgba,
    pub opacity: f64,
}

impl Default for DimStyle {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            opacity: 0.7,
        }
    }
}

/// Pointer arrow appearance and animation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ArrowStyle {
    pub color: Rgba,
    pub line_width: f64,
    pub head_length: f64,
    /// Wing angle from the shaft, in degrees.
    pub head_angle: f64,
    #[cfg_attr(feature = "config", serde(rename = "animation_ms", with = "millis"))]
    pub animation_duration: Duration,
    pub animation_enabled: bool,
    /// Scales the bow of the curve; `0.0` draws a straight line.
    pub curve_intensity: f64,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            color: Rgba::BLUE,
            line_width: 3.0,
            head_length: 10.0,
            head_angle: 30.0,
            animation_duration: Duration::from_millis(600),
            animation_enabled: true,
            curve_intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum TransitionKind {
    #[default]
    Fade,
    Slide,
    Scale,
    /// Host-defined animation; the core only carries the duration.
    Custom,
}

/// Step-to-step transition the host should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct Transition {
    pub kind: TransitionKind,
    #[cfg_attr(feature = "config", serde(rename = "duration_ms", with = "millis"))]
    pub duration: Duration,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            kind: TransitionKind::Fade,
            duration: Duration::from_millis(300),
        }
    }
}

// ---------------------------------------------------------------------------
// Patches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipPatch {
    pub background: Option<Rgba>,
    pub text_color: Option<Rgba>,
    pub corner_radius: Option<f64>,
    pub shadow_color: Option<Rgba>,
    pub shadow_opacity: Option<f64>,
    pub shadow_radius: Option<f64>,
    pub shadow_offset_x: Option<f64>,
    pub shadow_offset_y: Option<f64>,
    pub max_width: Option<f64>,
    pub padding: Option<f64>,
    pub spacing: Option<f64>,
    pub title_font: Option<Font>,
    pub body_font: Option<Font>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DimPatch {
    pub color: Option<Rgba>,
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArrowPatch {
    pub color: Option<Rgba>,
    pub line_width: Option<f64>,
    pub head_length: Option<f64>,
    pub head_angle: Option<f64>,
    pub animation_duration: Option<Duration>,
    pub animation_enabled: Option<bool>,
    pub curve_intensity: Option<f64>,
}

/// Copy every set field of `$patch` onto `$base`.
macro_rules! overlay {
    ($base:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$patch.$field {
                $base.$field.clone_from(value);
            }
        )+
    };
}

impl TooltipPatch {
    pub fn apply_to(&self, base: &mut TooltipStyle) {
        overlay!(base, self; background, text_color, corner_radius, shadow_color,
            shadow_opacity, shadow_radius, shadow_offset_x, shadow_offset_y,
            padding, spacing, title_font, body_font);
        if let Some(max_width) = self.max_width {
            base.max_width = Some(max_width);
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl DimPatch {
    pub fn apply_to(&self, base: &mut DimStyle) {
        overlay!(base, self; color, opacity);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ArrowPatch {
    pub fn apply_to(&self, base: &mut ArrowStyle) {
        overlay!(base, self; color, line_width, head_length, head_angle,
            animation_duration, animation_enabled, curve_intensity);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The overrides a step or flow carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StylePatches {
    pub tooltip: TooltipPatch,
    pub dim: DimPatch,
    pub arrow: ArrowPatch,
}

impl StylePatches {
    pub fn is_empty(&self) -> bool {
        self.tooltip.is_empty() && self.dim.is_empty() && self.arrow.is_empty()
    }
}

/// Fully resolved styles for one step. Also used for the global defaults.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ResolvedStyles {
    pub tooltip: TooltipStyle,
    pub dim: DimStyle,
    pub arrow: ArrowStyle,
}

/// Resolve the styles for a step: step overrides win over flow overrides,
/// which win over `global`.
pub fn resolve(step: &StylePatches, flow: &StylePatches, global: &ResolvedStyles) -> ResolvedStyles {
    let mut styles = global.clone();
    for layer in [flow, step] {
        layer.tooltip.apply_to(&mut styles.tooltip);
        layer.dim.apply_to(&mut styles.dim);
        layer.arrow.apply_to(&mut styles.arrow);
    }
    styles
}

#[cfg(feature = "config")]
pub(crate) mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
