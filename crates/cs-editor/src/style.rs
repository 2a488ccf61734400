//! Style state and the property table.
//!
//! `StyleState` holds the editor-level defaults applied to new objects.
//! The property table maps a `Property` key to a typed read of an object,
//! a fallback when nothing is selected, and a write onto an object. The
//! typed accessors on `Editor` go through it.

use cs_core::{Color, DrawableObject, FontStyle, FontWeight, ObjectKind, TextAlign};
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Fixed font catalog offered by the font picker.
pub const FONTS: &[&str] = &[
    "Arial",
    "Arial Black",
    "Verdana",
    "Helvetica",
    "Tahoma",
    "Trebuchet MS",
    "Times New Roman",
    "Georgia",
    "Garamond",
    "Courier New",
    "Brush Script MT",
    "Palatino",
    "Bookman",
    "Comic Sans MS",
    "Impact",
    "Lucida Sans Unicode",
    "Geneva",
    "Lucida Console",
];

/// Material palette offered by the color pickers.
pub const PALETTE: &[&str] = &[
    "#F44336", "#E91E63", "#9C27B0", "#673AB7", "#3F51B5", "#2196F3", "#03A9F4", "#00BCD4",
    "#009688", "#4CAF50", "#8BC34A", "#CDDC39", "#FFEB3B", "#FFC107", "#FF9800", "#FF5722",
    "#795548", "#607D8B",
];

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_FONT_SIZE: f64 = 32.0;
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

pub type DashArray = SmallVec<[f64; 4]>;

/// Editor-level paint defaults. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleState {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub stroke_dash_array: DashArray,
    pub font_family: String,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::BLACK,
            stroke_width: DEFAULT_STROKE_WIDTH,
            stroke_dash_array: DashArray::new(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

// ─── Property keys ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Fill,
    StrokeColor,
    StrokeWidth,
    StrokeDashArray,
    Opacity,
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    TextAlign,
    Underline,
    Linethrough,
}

impl Property {
    pub const ALL: [Property; 12] = [
        Property::Fill,
        Property::StrokeColor,
        Property::StrokeWidth,
        Property::StrokeDashArray,
        Property::Opacity,
        Property::FontFamily,
        Property::FontSize,
        Property::FontWeight,
        Property::FontStyle,
        Property::TextAlign,
        Property::Underline,
        Property::Linethrough,
    ];

    /// The document-format key for this property.
    pub fn key(&self) -> &'static str {
        match self {
            Property::Fill => "fill",
            Property::StrokeColor => "stroke",
            Property::StrokeWidth => "strokeWidth",
            Property::StrokeDashArray => "strokeDashArray",
            Property::Opacity => "opacity",
            Property::FontFamily => "fontFamily",
            Property::FontSize => "fontSize",
            Property::FontWeight => "fontWeight",
            Property::FontStyle => "fontStyle",
            Property::TextAlign => "textAlign",
            Property::Underline => "underline",
            Property::Linethrough => "linethrough",
        }
    }

    /// Font properties only apply to text objects.
    pub fn is_text_only(&self) -> bool {
        matches!(
            self,
            Property::FontFamily
                | Property::FontSize
                | Property::FontWeight
                | Property::FontStyle
                | Property::TextAlign
                | Property::Underline
                | Property::Linethrough
        )
    }

    /// Whether setting this property also updates the style state.
    pub fn updates_style_state(&self) -> bool {
        matches!(
            self,
            Property::Fill
                | Property::StrokeColor
                | Property::StrokeWidth
                | Property::StrokeDashArray
                | Property::FontFamily
        )
    }

    pub fn applies_to(&self, obj: &DrawableObject) -> bool {
        !self.is_text_only() || obj.is_text()
    }

    /// Read this property from an object. `None` when it does not apply
    /// or the object has no value for it.
    pub fn read(&self, obj: &DrawableObject) -> Option<PropertyValue> {
        if !self.applies_to(obj) {
            return None;
        }
        let value = match self {
            Property::Fill => PropertyValue::Color(obj.fill?),
            Property::StrokeColor => PropertyValue::Color(obj.stroke?),
            Property::StrokeWidth => PropertyValue::Number(obj.stroke_width),
            Property::StrokeDashArray => PropertyValue::Dashes(obj.stroke_dash_array.clone()),
            Property::Opacity => PropertyValue::Number(obj.opacity),
            _ => {
                let style = obj.text_style()?;
                match self {
                    Property::FontFamily => PropertyValue::Text(style.font_family.clone()),
                    Property::FontSize => PropertyValue::Number(style.font_size),
                    Property::FontWeight => PropertyValue::Weight(style.font_weight),
                    Property::FontStyle => PropertyValue::FontStyle(style.font_style),
                    Property::TextAlign => PropertyValue::Align(style.text_align),
                    Property::Underline => PropertyValue::Flag(style.underline),
                    _ => PropertyValue::Flag(style.linethrough),
                }
            }
        };
        Some(value)
    }

    /// The value reported when no selected object supplies one.
    pub fn fallback(&self, state: &StyleState) -> PropertyValue {
        match self {
            Property::Fill => PropertyValue::Color(state.fill),
            Property::StrokeColor => PropertyValue::Color(state.stroke),
            Property::StrokeWidth => PropertyValue::Number(state.stroke_width),
            Property::StrokeDashArray => PropertyValue::Dashes(state.stroke_dash_array.clone()),
            Property::Opacity => PropertyValue::Number(1.0),
            Property::FontFamily => PropertyValue::Text(state.font_family.clone()),
            Property::FontSize => PropertyValue::Number(DEFAULT_FONT_SIZE),
            Property::FontWeight => PropertyValue::Weight(FontWeight::NORMAL),
            Property::FontStyle => PropertyValue::FontStyle(FontStyle::Normal),
            Property::TextAlign => PropertyValue::Align(TextAlign::Left),
            Property::Underline | Property::Linethrough => PropertyValue::Flag(false),
        }
    }

    /// Write `value` onto `obj`. Returns false if the property does not
    /// apply or the value has the wrong shape.
    pub fn write(&self, obj: &mut DrawableObject, value: &PropertyValue) -> bool {
        if !self.applies_to(obj) {
            return false;
        }
        match (self, value) {
            (Property::Fill, PropertyValue::Color(c)) => obj.set_fill(*c),
            (Property::StrokeColor, PropertyValue::Color(c)) => {
                // Text has no visible outline; the stroke picker recolors it.
                if obj.is_text() {
                    obj.set_fill(*c);
                }
                obj.set_stroke(*c);
            }
            (Property::StrokeWidth, PropertyValue::Number(w)) => obj.stroke_width = w.max(0.0),
            (Property::StrokeDashArray, PropertyValue::Dashes(d)) => {
                obj.stroke_dash_array = d.clone();
            }
            (Property::Opacity, PropertyValue::Number(o)) => obj.opacity = o.clamp(0.0, 1.0),
            (_, value) => {
                let Some(style) = obj.text_style_mut() else {
                    return false;
                };
                match (self, value) {
                    (Property::FontFamily, PropertyValue::Text(f)) => style.font_family = f.clone(),
                    (Property::FontSize, PropertyValue::Number(s)) => style.font_size = s.max(1.0),
                    (Property::FontWeight, PropertyValue::Weight(w)) => style.font_weight = *w,
                    (Property::FontStyle, PropertyValue::FontStyle(s)) => style.font_style = *s,
                    (Property::TextAlign, PropertyValue::Align(a)) => style.text_align = *a,
                    (Property::Underline, PropertyValue::Flag(u)) => style.underline = *u,
                    (Property::Linethrough, PropertyValue::Flag(l)) => style.linethrough = *l,
                    _ => return false,
                }
                if matches!(self, Property::FontSize | Property::FontFamily)
                    && let ObjectKind::Textbox { text, width, style } = &mut obj.kind
                {
                    *width = width.max(cs_core::estimate_text_width(text, style.font_size));
                }
            }
        }
        true
    }

    /// Fold `value` into the style state, if this property is tracked there.
    pub fn write_state(&self, state: &mut StyleState, value: &PropertyValue) {
        match (self, value) {
            (Property::Fill, PropertyValue::Color(c)) => state.fill = *c,
            (Property::StrokeColor, PropertyValue::Color(c)) => state.stroke = *c,
            (Property::StrokeWidth, PropertyValue::Number(w)) => state.stroke_width = w.max(0.0),
            (Property::StrokeDashArray, PropertyValue::Dashes(d)) => {
                state.stroke_dash_array = d.clone();
            }
            (Property::FontFamily, PropertyValue::Text(f)) => state.font_family = f.clone(),
            _ => {}
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown property `{0}`")]
pub struct UnknownProperty(pub String);

impl FromStr for Property {
    type Err = UnknownProperty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| UnknownProperty(s.to_string()))
    }
}

// ─── Property values ─────────────────────────────────────────────────────

/// A property value of any shape. Serializes to its plain JSON form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Color(Color),
    Number(f64),
    Dashes(DashArray),
    Text(String),
    Weight(FontWeight),
    FontStyle(FontStyle),
    Align(TextAlign),
    Flag(bool),
}

/// Types that can be pulled out of a `PropertyValue`.
pub trait FromProperty: Sized {
    fn from_property(value: PropertyValue) -> Option<Self>;
}

macro_rules! from_property {
    ($ty:ty, $variant:ident) => {
        impl FromProperty for $ty {
            fn from_property(value: PropertyValue) -> Option<Self> {
                match value {
                    PropertyValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<$ty> for PropertyValue {
            fn from(v: $ty) -> Self {
                PropertyValue::$variant(v)
            }
        }
    };
}

from_property!(Color, Color);
from_property!(f64, Number);
from_property!(DashArray, Dashes);
from_property!(String, Text);
from_property!(FontWeight, Weight);
from_property!(FontStyle, FontStyle);
from_property!(TextAlign, Align);
from_property!(bool, Flag);

impl FromProperty for PropertyValue {
    fn from_property(value: PropertyValue) -> Option<Self> {
        Some(value)
    }
}
