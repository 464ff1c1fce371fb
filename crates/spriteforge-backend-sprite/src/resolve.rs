//! Host-side asset resolution.
//!
//! The pipeline never decodes texture payloads or walks asset containers
//! itself. Hosts plug those in through the traits here; [`MemoryAssets`] is a
//! ready-made in-memory implementation.

use std::collections::{HashMap, HashSet};

use spriteforge_spec::{AtlasRef, SpriteAtlas, TextureRef};

use crate::bitmap::Bitmap;

/// Turns a texture reference into pixels.
pub trait TextureDecoder {
    /// Decode a texture to BGRA with rows in stored order (bottom row of the
    /// image first). `None` when the texture cannot be decoded.
    fn decode(&self, texture: &TextureRef) -> Option<Bitmap>;
}

/// Resolves atlas references.
pub trait AtlasResolver {
    fn resolve_atlas(&self, atlas: &AtlasRef) -> Option<&SpriteAtlas>;
}

/// Reports whether a lazy texture reference points at anything.
pub trait TextureResolver {
    fn has_texture(&self, _texture: &TextureRef) -> bool {
        true
    }
}

/// Everything reconstruction needs from the host.
pub trait AssetSource: TextureDecoder + AtlasResolver + TextureResolver {}

impl<T> AssetSource for T where T: TextureDecoder + AtlasResolver + TextureResolver + ?Sized {}

/// In-memory asset store.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    textures: HashMap<TextureRef, Bitmap>,
    undecodable: HashSet<TextureRef>,
    atlases: HashMap<AtlasRef, SpriteAtlas>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a decoded texture (stored row order).
    pub fn insert_texture(&mut self, texture: impl Into<TextureRef>, bitmap: Bitmap) {
        let texture = texture.into();
        self.undecodable.remove(&texture);
        self.textures.insert(texture, bitmap);
    }

    /// Register a texture that resolves but fails to decode.
    pub fn insert_undecodable(&mut self, texture: impl Into<TextureRef>) {
        let texture = texture.into();
        self.textures.remove(&texture);
        self.undecodable.insert(texture);
    }

    pub fn insert_atlas(&mut self, atlas: impl Into<AtlasRef>, data: SpriteAtlas) {
        self.atlases.insert(atlas.into(), data);
    }

    pub fn with_texture(mut self, texture: impl Into<TextureRef>, bitmap: Bitmap) -> Self {
        self.insert_texture(texture, bitmap);
        self
    }

    pub fn with_atlas(mut self, atlas: impl Into<AtlasRef>, data: SpriteAtlas) -> Self {
        self.insert_atlas(atlas, data);
        self
    }
}

impl TextureDecoder for MemoryAssets {
    fn decode(&self, texture: &TextureRef) -> Option<Bitmap> {
        self.textures.get(texture).cloned()
    }
}

impl AtlasResolver for MemoryAssets {
    fn resolve_atlas(&self, atlas: &AtlasRef) -> Option<&SpriteAtlas> {
        self.atlases.get(atlas)
    }
}

impl TextureResolver for MemoryAssets {
    fn has_texture(&self, texture: &TextureRef) -> bool {
        self.textures.contains_key(texture) || self.undecodable.contains(texture)
    }
}
