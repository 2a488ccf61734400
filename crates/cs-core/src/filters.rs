//! Image filter catalog.
//!
//! An image carries at most one active filter in this editor. Each
//! catalog entry is created with fixed default parameters; the `none`
//! entry clears filters instead of creating one.
//!
//! Documents may carry filters the catalog does not know (other renderer
//! effects, or catalog effects with extra parameters). Those entries are
//! held as raw JSON and written back unchanged.

use crate::model::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Every name the filter picker offers, `none` first.
pub const FILTER_NAMES: &[&str] = &[
    "none",
    "polaroid",
    "sepia",
    "kodachrome",
    "contrast",
    "brightness",
    "greyscale",
    "brownie",
    "vintage",
    "technicolor",
    "pixelate",
    "invert",
    "blur",
    "sharpen",
    "emboss",
    "removecolor",
    "blacknwhite",
    "vibrance",
    "blendcolor",
    "huerotate",
    "saturation",
    "gamma",
];

const SHARPEN_MATRIX: [f64; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];
const EMBOSS_MATRIX: [f64; 9] = [1.0, 1.0, 1.0, 1.0, 0.7, -1.0, -1.0, -1.0, -1.0];

/// A single image filter effect, encoded as `{"type": "...", ...params}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ImageFilter {
    Polaroid,
    Sepia,
    Kodachrome,
    Contrast { contrast: f64 },
    Brightness { brightness: f64 },
    Grayscale,
    Brownie,
    Vintage,
    Technicolor,
    Pixelate { blocksize: f64 },
    Invert,
    Blur { blur: f64 },
    Sharpen { matrix: Vec<f64> },
    Emboss { matrix: Vec<f64> },
    RemoveColor { threshold: f64, distance: f64 },
    BlackWhite,
    Vibrance { vibrance: f64 },
    BlendColor { color: Color, mode: String },
    HueRotation { rotation: f64 },
    Saturation { saturation: f64 },
    Gamma { gamma: [f64; 3] },
}

/// A filter name outside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown image filter `{0}`")]
pub struct UnknownFilter(pub String);

impl ImageFilter {
    /// Build the catalog entry for `name`. `Ok(None)` is the `none` entry.
    pub fn from_name(name: &str) -> Result<Option<Self>, UnknownFilter> {
        let filter = match name {
            "none" => return Ok(None),
            "polaroid" => ImageFilter::Polaroid,
            "sepia" => ImageFilter::Sepia,
            "kodachrome" => ImageFilter::Kodachrome,
            "contrast" => ImageFilter::Contrast { contrast: 0.3 },
            "brightness" => ImageFilter::Brightness { brightness: 0.8 },
            "greyscale" => ImageFilter::Grayscale,
            "brownie" => ImageFilter::Brownie,
            "vintage" => ImageFilter::Vintage,
            "technicolor" => ImageFilter::Technicolor,
            "pixelate" => ImageFilter::Pixelate { blocksize: 4.0 },
            "invert" => ImageFilter::Invert,
            "blur" => ImageFilter::Blur { blur: 0.5 },
            "sharpen" => ImageFilter::Sharpen {
                matrix: SHARPEN_MATRIX.to_vec(),
            },
            "emboss" => ImageFilter::Emboss {
                matrix: EMBOSS_MATRIX.to_vec(),
            },
            "removecolor" => ImageFilter::RemoveColor {
                threshold: 0.2,
                distance: 0.5,
            },
            "blacknwhite" => ImageFilter::BlackWhite,
            "vibrance" => ImageFilter::Vibrance { vibrance: 1.0 },
            "blendcolor" => ImageFilter::BlendColor {
                color: Color::rgb8(0, 255, 0),
                mode: "multiply".into(),
            },
            "huerotate" => ImageFilter::HueRotation { rotation: 0.5 },
            "saturation" => ImageFilter::Saturation { saturation: 0.7 },
            "gamma" => ImageFilter::Gamma {
                gamma: [1.0, 0.5, 2.1],
            },
            other => return Err(UnknownFilter(other.to_string())),
        };
        Ok(Some(filter))
    }

    /// The catalog name this filter was created from.
    pub fn name(&self) -> &'static str {
        match self {
            ImageFilter::Polaroid => "polaroid",
            ImageFilter::Sepia => "sepia",
            ImageFilter::Kodachrome => "kodachrome",
            ImageFilter::Contrast { .. } => "contrast",
            ImageFilter::Brightness { .. } => "brightness",
            ImageFilter::Grayscale => "greyscale",
            ImageFilter::Brownie => "brownie",
            ImageFilter::Vintage => "vintage",
            ImageFilter::Technicolor => "technicolor",
            ImageFilter::Pixelate { .. } => "pixelate",
            ImageFilter::Invert => "invert",
            ImageFilter::Blur { .. } => "blur",
            ImageFilter::Sharpen { .. } => "sharpen",
            ImageFilter::Emboss { .. } => "emboss",
            ImageFilter::RemoveColor { .. } => "removecolor",
            ImageFilter::BlackWhite => "blacknwhite",
            ImageFilter::Vibrance { .. } => "vibrance",
            ImageFilter::BlendColor { .. } => "blendcolor",
            ImageFilter::HueRotation { .. } => "huerotate",
            ImageFilter::Saturation { .. } => "saturation",
            ImageFilter::Gamma { .. } => "gamma",
        }
    }

    /// CSS `filter` approximation used by the SVG writer and Canvas2D
    /// preview. Convolution-style effects have no CSS equivalent.
    pub fn css(&self) -> Option<String> {
        let css = match self {
            ImageFilter::Sepia | ImageFilter::Brownie => "sepia(1)".to_string(),
            ImageFilter::Vintage => "sepia(0.6) contrast(1.1)".to_string(),
            ImageFilter::Polaroid | ImageFilter::Kodachrome | ImageFilter::Technicolor => {
                "saturate(1.4) contrast(1.1)".to_string()
            }
            ImageFilter::Grayscale | ImageFilter::BlackWhite => "grayscale(1)".to_string(),
            ImageFilter::Invert => "invert(1)".to_string(),
            ImageFilter::Contrast { contrast } => format!("contrast({})", 1.0 + contrast),
            ImageFilter::Brightness { brightness } => format!("brightness({})", 1.0 + brightness),
            ImageFilter::Blur { blur } => format!("blur({}px)", blur * 10.0),
            ImageFilter::HueRotation { rotation } => format!("hue-rotate({}deg)", rotation * 180.0),
            ImageFilter::Saturation { saturation } => format!("saturate({})", 1.0 + saturation),
            ImageFilter::Vibrance { vibrance } => format!("saturate({})", 1.0 + vibrance / 2.0),
            _ => return None,
        };
        Some(css)
    }
}

impl fmt::Display for ImageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of an image's filter list, kept exactly as encoded.
///
/// `effect` is the catalog reading of the entry, or `None` when its type
/// is outside the catalog. Keys the catalog does not model survive in
/// the raw value.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedFilter {
    effect: Option<ImageFilter>,
    raw: Value,
}

impl AppliedFilter {
    pub fn from_raw(raw: Value) -> Self {
        let effect = match &raw {
            Value::Object(_) => ImageFilter::deserialize(&raw).ok(),
            _ => None,
        };
        AppliedFilter { effect, raw }
    }

    pub fn effect(&self) -> Option<&ImageFilter> {
        self.effect.as_ref()
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn css(&self) -> Option<String> {
        self.effect.as_ref().and_then(ImageFilter::css)
    }
}

impl From<ImageFilter> for AppliedFilter {
    fn from(filter: ImageFilter) -> Self {
        // Plain data with string keys: conversion to a `Value` cannot fail.
        let raw = serde_json::to_value(&filter).unwrap_or(Value::Null);
        AppliedFilter {
            effect: Some(filter),
            raw,
        }
    }
}

impl Serialize for AppliedFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AppliedFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(AppliedFilter::from_raw)
    }
}
