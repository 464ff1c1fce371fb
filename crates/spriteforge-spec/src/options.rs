//! Caller switches for sprite reconstruction.

use serde::{Deserialize, Serialize};

/// Fill rule used when rasterizing a tight-packing silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    /// Inside when a ray crosses an odd number of edges. Matches the fill
    /// mode the sprites were historically exported with.
    #[default]
    EvenOdd,
    /// Inside when the signed winding number is non-zero.
    NonZero,
}

/// Options for one reconstruction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructOptions {
    /// Merge the sprite's own alpha texture when it has one.
    pub use_self_alpha: bool,
    /// Use bicubic instead of nearest-neighbour sampling when an alpha mask
    /// has to be resized.
    pub high_quality: bool,
    /// Fill rule for tight silhouettes.
    pub fill_rule: FillRule,
}

impl ReconstructOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_self_alpha(mut self, use_self_alpha: bool) -> Self {
        self.use_self_alpha = use_self_alpha;
        self
    }

    pub fn with_high_quality(mut self, high_quality: bool) -> Self {
        self.high_quality = high_quality;
        self
    }

    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }
}
