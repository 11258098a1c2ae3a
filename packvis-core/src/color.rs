//! Box colors and display classification

use crate::snapshot::{BoxId, Snapshot};
use serde::{Deserialize, Serialize};

/// An RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    /// Create a color from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Components as an array, for vertex upload.
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Display classification of a packed box.
///
/// Classes are checked in declaration order and the first match wins: a box
/// that is simultaneously removable, blocked, and last placed renders as
/// removable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorClass {
    /// Eligible for removal (red).
    Removable,
    /// Out of candidate status (orange).
    Blocked,
    /// The most recently placed box (magenta).
    LastPlaced,
    /// Everything else (blue).
    Default,
}

impl ColorClass {
    /// Classify a box id against the membership sets of a snapshot.
    pub fn classify(id: BoxId, snapshot: &Snapshot) -> Self {
        if snapshot.removable.contains(&id) {
            ColorClass::Removable
        } else if snapshot.blocked.contains(&id) {
            ColorClass::Blocked
        } else if snapshot.last_placed == Some(id) {
            ColorClass::LastPlaced
        } else {
            ColorClass::Default
        }
    }

    /// The fixed palette color for this class.
    pub fn color(self) -> Color {
        match self {
            ColorClass::Removable => Color::from_hex(0xff0000),
            ColorClass::Blocked => Color::from_hex(0xffa500),
            ColorClass::LastPlaced => Color::from_hex(0xff00ff),
            ColorClass::Default => Color::from_hex(0x0000ff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_hex_extracts_channels() {
        let c = Color::from_hex(0xff8000);
        assert_relative_eq!(c.r, 1.0);
        assert_relative_eq!(c.g, 128.0 / 255.0);
        assert_relative_eq!(c.b, 0.0);
    }

    #[test]
    fn classification_precedence_is_fixed() {
        let mut snapshot = Snapshot::default();
        snapshot.removable.insert(7);
        snapshot.blocked.insert(7);
        snapshot.last_placed = Some(7);

        // Membership overlap always resolves to the highest-priority class.
        assert_eq!(ColorClass::classify(7, &snapshot), ColorClass::Removable);

        snapshot.removable.clear();
        assert_eq!(ColorClass::classify(7, &snapshot), ColorClass::Blocked);

        snapshot.blocked.clear();
        assert_eq!(ColorClass::classify(7, &snapshot), ColorClass::LastPlaced);

        snapshot.last_placed = None;
        assert_eq!(ColorClass::classify(7, &snapshot), ColorClass::Default);
    }
}
