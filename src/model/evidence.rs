//! Extracted listing attributes shown in the evidence viewer.
//!
//! Values, confidences and bounding boxes are illustrative literals; no
//! extraction happens in this crate.

use serde::{Deserialize, Serialize};

/// Width and height of the listing image the bounding boxes refer to.
pub const SOURCE_IMAGE_SIZE: (u16, u16) = (480, 480);

/// Location of an extracted value on the listing image, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceField {
    /// Stable field key, e.g. `netQuantity`.
    pub key: String,
    pub value: String,
    /// Extraction confidence in `0.0..=1.0`.
    pub confidence: f64,
    pub location: BoundingBox,
    /// Marks the field that triggered the violation.
    #[serde(default)]
    pub violation: bool,
}

impl EvidenceField {
    /// Display label derived from the camelCase key ("net quantity").
    pub fn label(&self) -> String {
        let mut label = String::with_capacity(self.key.len() + 4);
        for ch in self.key.chars() {
            if ch.is_uppercase() {
                label.push(' ');
            }
            label.extend(ch.to_lowercase());
        }
        label
    }
}
