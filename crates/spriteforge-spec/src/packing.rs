//! Atlas packing settings recorded for a sprite.

use serde::{Deserialize, Serialize};

/// Rotation or flip applied to a sprite when it was packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingRotation {
    #[default]
    None,
    FlipHorizontal,
    FlipVertical,
    Rotate180,
    Rotate90,
}

impl PackingRotation {
    /// Decodes the engine's numeric rotation code. Unknown codes read as `None`.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => PackingRotation::FlipHorizontal,
            2 => PackingRotation::FlipVertical,
            3 => PackingRotation::Rotate180,
            4 => PackingRotation::Rotate90,
            _ => PackingRotation::None,
        }
    }
}

/// Whether the packed region is the whole rectangle or a mesh silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingMode {
    Tight,
    #[default]
    Rectangle,
}

impl PackingMode {
    /// Decodes the engine's numeric packing mode (0 = tight, 1 = rectangle).
    pub fn from_raw(raw: u32) -> Self {
        if raw == 0 {
            PackingMode::Tight
        } else {
            PackingMode::Rectangle
        }
    }
}

/// Packing settings for one sprite instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PackingSettings {
    /// Whether the sprite took part in atlas packing.
    #[serde(default)]
    pub packed: bool,
    /// Rotation/flip applied while packing. Only meaningful when `packed`.
    #[serde(default)]
    pub packing_rotation: PackingRotation,
    /// Rectangle or tight packing.
    #[serde(default)]
    pub packing_mode: PackingMode,
}

impl PackingSettings {
    /// Settings for an unpacked rectangular sprite.
    pub fn rectangle() -> Self {
        Self::default()
    }

    /// Decodes the engine's packed settings bitfield.
    ///
    /// Bit 0 is the packed flag, bit 1 the packing mode, bits 2..=5 the
    /// rotation. The mesh type in bit 6 is not needed here.
    pub fn from_raw(raw: u32) -> Self {
        Self {
            packed: raw & 1 == 1,
            packing_mode: PackingMode::from_raw((raw >> 1) & 1),
            packing_rotation: PackingRotation::from_raw((raw >> 2) & 0xF),
        }
    }

    /// Returns a copy with the packed flag set and the given rotation.
    pub fn with_rotation(mut self, rotation: PackingRotation) -> Self {
        self.packed = true;
        self.packing_rotation = rotation;
        self
    }

    /// Returns a copy with the given packing mode.
    pub fn with_mode(mut self, mode: PackingMode) -> Self {
        self.packing_mode = mode;
        self
    }

    /// True for tight (mesh silhouette) packing.
    pub fn is_tight(&self) -> bool {
        self.packing_mode == PackingMode::Tight
    }
}
