//! Placed fields, kept in insertion order for the session.

use crate::color::HexColor;
use serde::{Deserialize, Serialize};

pub const DEFAULT_KEY: &str = "$name";
pub const DEFAULT_FONT_SIZE: f32 = 18.0;
pub const DEFAULT_FONT: &str = "Lora";
pub const DEFAULT_COLOR: &str = "#000000";

/// One data-bound text placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Logical column, e.g. `$name`
    pub key: String,
    /// Preview x in pixels
    pub x: f64,
    /// Preview y in pixels
    pub y: f64,
    pub size: f32,
    /// Display label only; drawing uses the standard faces
    pub font: String,
    pub color: HexColor,
}

impl Field {
    /// Font size used for drawing. Non-positive sizes fall back to the default.
    pub fn effective_size(&self) -> f32 {
        if self.size > 0.0 && self.size.is_finite() {
            self.size
        } else {
            DEFAULT_FONT_SIZE
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldRegistry {
    fields: Vec<Field>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field. Keys are not checked against the dataset here; a key
    /// that matches nothing simply draws nothing.
    pub fn add(
        &mut self,
        key: impl Into<String>,
        x: f64,
        y: f64,
        size: f32,
        font: impl Into<String>,
        color: HexColor,
    ) -> &Field {
        self.fields.push(Field {
            key: key.into(),
            x,
            y,
            size,
            font: font.into(),
            color,
        });
        let last = self.fields.len() - 1;
        &self.fields[last]
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Moves the most recently added field. Returns `false` when empty.
    pub fn nudge_last(&mut self, dx: f64, dy: f64) -> bool {
        match self.fields.last_mut() {
            Some(field) => {
                field.x += dx;
                field.y += dy;
                true
            }
            None => false,
        }
    }

    pub fn last(&self) -> Option<&Field> {
        self.fields.last()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldRegistry {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
