//! Sprite metadata: the packed sub-image record and its render data.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mesh::MeshGeometry;
use crate::packing::PackingSettings;
use crate::version::ProducerVersion;

/// 2D vector in sprite-local or texture space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Floating-point rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

macro_rules! asset_ref {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

asset_ref!(
    /// Lazy reference to a texture asset, resolved by the host.
    TextureRef
);
asset_ref!(
    /// Lazy reference to a sprite atlas asset, resolved by the host.
    AtlasRef
);
asset_ref!(
    /// Key of a sprite's entry in an atlas render-data map.
    RenderDataKey
);

/// Physical packing record of a sprite (its own, or an atlas entry).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderData {
    /// Texture holding the sprite's colour pixels.
    #[serde(default)]
    pub texture: Option<TextureRef>,
    /// Separate texture holding the sprite's alpha, if split out.
    #[serde(default)]
    pub alpha_texture: Option<TextureRef>,
    /// Sub-region of the texture in pixels (origin bottom-left).
    pub texture_rect: RectF,
    /// Offset of the texture rect inside the sprite rect; used for tight packing.
    #[serde(default)]
    pub texture_rect_offset: Vector2,
    #[serde(default)]
    pub settings: PackingSettings,
    /// Render mesh; only read for tight packing.
    #[serde(default)]
    pub geometry: MeshGeometry,
}

impl RenderData {
    /// Render data pointing at `texture` with a plain rectangular region.
    pub fn new(texture: impl Into<TextureRef>, texture_rect: RectF) -> Self {
        Self {
            texture: Some(texture.into()),
            texture_rect,
            ..Default::default()
        }
    }
}

fn default_pivot() -> Vector2 {
    Vector2::new(0.5, 0.5)
}

fn default_pixels_to_units() -> f32 {
    100.0
}

/// A packed sprite as described by the asset metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    #[serde(default)]
    pub name: String,
    /// Atlas the sprite was packed into, if any.
    #[serde(default)]
    pub atlas: Option<AtlasRef>,
    /// Key of this sprite's entry in the atlas render-data map.
    #[serde(default)]
    pub render_data_key: Option<RenderDataKey>,
    /// Logical rectangle in the sprite's own units.
    pub rect: RectF,
    /// Normalized anchor point.
    #[serde(default = "default_pivot")]
    pub pivot: Vector2,
    /// Scale from local units to pixels.
    #[serde(default = "default_pixels_to_units")]
    pub pixels_to_units: f32,
    /// Version of the producing engine.
    pub version: ProducerVersion,
    /// The sprite's own render data.
    pub render_data: RenderData,
}

impl Sprite {
    /// Creates an unpacked, atlas-less sprite with default pivot and scale.
    pub fn new(name: impl Into<String>, rect: RectF, render_data: RenderData) -> Self {
        Self {
            name: name.into(),
            atlas: None,
            render_data_key: None,
            rect,
            pivot: default_pivot(),
            pixels_to_units: default_pixels_to_units(),
            version: ProducerVersion::default(),
            render_data,
        }
    }

    /// Parses a sprite from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the sprite to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the sprite to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A sprite atlas: a render-data map keyed by each packed sprite's key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpriteAtlas {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub render_data: HashMap<RenderDataKey, RenderData>,
}

impl SpriteAtlas {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            render_data: HashMap::new(),
        }
    }

    /// Adds or replaces the entry for `key`.
    pub fn insert(&mut self, key: impl Into<RenderDataKey>, data: RenderData) {
        self.render_data.insert(key.into(), data);
    }

    /// Looks up the render data for a sprite key.
    pub fn get(&self, key: &RenderDataKey) -> Option<&RenderData> {
        self.render_data.get(key)
    }

    /// Parses an atlas from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Secondary "face" region composited onto character art before the alpha
/// merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceOverlay {
    /// Alpha mask for the face, if it has one.
    #[serde(default)]
    pub alpha_texture: Option<TextureRef>,
    /// Colour texture carrying the face.
    pub full_color_texture: TextureRef,
    /// Where the face lands on the base image, in base-image pixels.
    pub face_rect: PixelRect,
    /// Replacement overlays are full canvases cut down to `face_rect`;
    /// additive overlays are already face-sized.
    #[serde(default)]
    pub is_face_replacement: bool,
}
