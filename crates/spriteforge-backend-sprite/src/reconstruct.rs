//! Sprite reconstruction entry point.
//!
//! Picks one of four paths from what the host can resolve and runs it:
//!
//! 1. **Atlas**: the sprite's atlas resolves. The atlas entry's rect,
//!    offset and settings drive the cut; alpha arguments are ignored. A
//!    missing entry or texture ends reconstruction here.
//! 2. **Character art**: an external alpha texture is supplied. Whole colour
//!    and alpha textures are mirrored upright, the face overlay is applied and
//!    the alpha is merged in.
//! 3. **Self alpha**: self alpha is requested and the sprite has its own
//!    alpha texture. Colour and alpha are cut the same way and merged.
//! 4. **Plain**: the sprite's own texture is cut.

use spriteforge_spec::{
    FaceOverlay, FillRule, ReconstructOptions, RenderData, Sprite, SpriteAtlas, TextureRef,
};

use crate::bitmap::Bitmap;
use crate::error::{Result, SpriteError};
use crate::extract::cut_sprite;
use crate::mask::{apply_face_overlay, apply_mask};
use crate::png::{write_bitmap_to_vec_with_hash, PngConfig};
use crate::resize::{resize, Quality};
use crate::resolve::AssetSource;

/// Which reconstruction path a sprite takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconstructPath {
    Atlas,
    CharacterArt,
    SelfAlpha,
    Plain,
    /// Nothing resolvable; reconstruction yields no bitmap.
    Absent,
}

/// Decide the path without decoding anything.
pub fn reconstruct_path(
    assets: &dyn AssetSource,
    sprite: &Sprite,
    external_alpha: Option<&TextureRef>,
    options: &ReconstructOptions,
) -> ReconstructPath {
    if let Some(atlas) = sprite.atlas.as_ref().and_then(|a| assets.resolve_atlas(a)) {
        return if atlas_entry(assets, atlas, sprite).is_some() {
            ReconstructPath::Atlas
        } else {
            ReconstructPath::Absent
        };
    }

    let rd = &sprite.render_data;
    let texture = rd.texture.as_ref().filter(|t| assets.has_texture(t));
    let alpha = rd.alpha_texture.as_ref().filter(|t| assets.has_texture(t));

    match (texture, alpha) {
        (Some(_), _) if external_alpha.is_some() => ReconstructPath::CharacterArt,
        (Some(_), Some(_)) if options.use_self_alpha => ReconstructPath::SelfAlpha,
        (Some(_), _) => ReconstructPath::Plain,
        (None, _) => ReconstructPath::Absent,
    }
}

fn atlas_entry<'a>(
    assets: &dyn AssetSource,
    atlas: &'a SpriteAtlas,
    sprite: &Sprite,
) -> Option<&'a RenderData> {
    let entry = sprite.render_data_key.as_ref().and_then(|k| atlas.get(k))?;
    let texture = entry.texture.as_ref()?;
    assets.has_texture(texture).then_some(entry)
}

/// Reconstruct a standalone bitmap for `sprite`, top row first.
///
/// Returns `None` when no path resolves or a texture on the chosen path
/// cannot be decoded.
pub fn reconstruct(
    assets: &dyn AssetSource,
    sprite: &Sprite,
    external_alpha: Option<&TextureRef>,
    face: Option<&FaceOverlay>,
    options: &ReconstructOptions,
) -> Option<Bitmap> {
    let path = reconstruct_path(assets, sprite, external_alpha, options);
    log::debug!("reconstructing '{}' via {:?} path", sprite.name, path);

    match path {
        ReconstructPath::Atlas => {
            let atlas = sprite.atlas.as_ref().and_then(|a| assets.resolve_atlas(a))?;
            let entry = atlas_entry(assets, atlas, sprite)?;
            let source = decode(assets, entry.texture.as_ref()?)?;
            cut(&source, sprite, entry, options)
        }
        ReconstructPath::CharacterArt => {
            character_art(assets, sprite, external_alpha?, face, options)
        }
        ReconstructPath::SelfAlpha => {
            let rd = &sprite.render_data;
            let color = decode(assets, rd.texture.as_ref()?)?;
            let alpha = decode(assets, rd.alpha_texture.as_ref()?)?;
            let color = cut(&color, sprite, rd, options)?;
            let alpha = cut(&alpha, sprite, rd, options)?;
            merge(&color, &alpha, options)
        }
        ReconstructPath::Plain => {
            let rd = &sprite.render_data;
            let source = decode(assets, rd.texture.as_ref()?)?;
            cut(&source, sprite, rd, options)
        }
        ReconstructPath::Absent => None,
    }
}

fn character_art(
    assets: &dyn AssetSource,
    sprite: &Sprite,
    external_alpha: &TextureRef,
    face: Option<&FaceOverlay>,
    options: &ReconstructOptions,
) -> Option<Bitmap> {
    let mut color = decode(assets, sprite.render_data.texture.as_ref()?)?;
    let mut alpha = decode(assets, external_alpha)?;
    color.flip_vertical_in_place();
    alpha.flip_vertical_in_place();

    if let Some(face) = face {
        let mut face_color = decode(assets, &face.full_color_texture)?;
        face_color.flip_vertical_in_place();
        let face_alpha = match &face.alpha_texture {
            Some(t) => {
                let mut bmp = decode(assets, t)?;
                bmp.flip_vertical_in_place();
                Some(bmp)
            }
            None => None,
        };
        apply_face_overlay(&mut color, &mut alpha, &face_color, face_alpha.as_ref(), face);
    }

    merge(&color, &alpha, options)
}

/// Resize `alpha` to `color` if needed, then take alpha from its blue channel.
fn merge(color: &Bitmap, alpha: &Bitmap, options: &ReconstructOptions) -> Option<Bitmap> {
    let (width, height) = color.dimensions();
    let alpha = if alpha.dimensions() != (width, height) {
        log::debug!(
            "resizing alpha {:?} to {}x{}",
            alpha.dimensions(),
            width,
            height
        );
        resize(
            alpha,
            width,
            height,
            Quality::from_high_quality(options.high_quality),
        )
    } else {
        alpha.clone()
    };

    match apply_mask(color, &alpha) {
        Ok(merged) => Some(merged),
        Err(e) => {
            log::warn!("alpha merge failed: {}", e);
            None
        }
    }
}

fn cut(
    source: &Bitmap,
    sprite: &Sprite,
    render_data: &RenderData,
    options: &ReconstructOptions,
) -> Option<Bitmap> {
    match cut_sprite(source, sprite, render_data, options) {
        Ok(bitmap) => Some(bitmap),
        Err(e) => {
            log::warn!("cutting '{}' failed: {}", sprite.name, e);
            None
        }
    }
}

fn decode(assets: &dyn AssetSource, texture: &TextureRef) -> Option<Bitmap> {
    let bitmap = assets.decode(texture);
    if bitmap.is_none() {
        log::warn!("texture '{}' could not be decoded", texture);
    }
    bitmap
}

/// An encoded reconstruction.
#[derive(Debug, Clone)]
pub struct SpriteExport {
    pub width: u32,
    pub height: u32,
    /// PNG bytes.
    pub data: Vec<u8>,
    /// BLAKE3 hash of `data`.
    pub hash: String,
}

/// Reconstruction bound to an asset source and a set of options.
///
/// ```
/// use spriteforge_backend_sprite::{Bitmap, MemoryAssets, SpriteReconstructor};
/// use spriteforge_spec::{RectF, RenderData, Sprite};
///
/// let assets = MemoryAssets::new().with_texture("tex", Bitmap::new(8, 8));
/// let sprite = Sprite::new(
///     "block",
///     RectF::new(0.0, 0.0, 4.0, 4.0),
///     RenderData::new("tex", RectF::new(2.0, 2.0, 4.0, 4.0)),
/// );
///
/// let bitmap = SpriteReconstructor::new(&assets).reconstruct(&sprite).unwrap();
/// assert_eq!(bitmap.dimensions(), (4, 4));
/// ```
pub struct SpriteReconstructor<'a> {
    assets: &'a dyn AssetSource,
    options: ReconstructOptions,
}

impl<'a> SpriteReconstructor<'a> {
    pub fn new(assets: &'a dyn AssetSource) -> Self {
        Self {
            assets,
            options: ReconstructOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReconstructOptions) -> Self {
        self.options = options;
        self
    }

    pub fn use_self_alpha(mut self, use_self_alpha: bool) -> Self {
        self.options.use_self_alpha = use_self_alpha;
        self
    }

    pub fn high_quality(mut self, high_quality: bool) -> Self {
        self.options.high_quality = high_quality;
        self
    }

    pub fn fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.options.fill_rule = fill_rule;
        self
    }

    pub fn options(&self) -> &ReconstructOptions {
        &self.options
    }

    pub fn path(&self, sprite: &Sprite, external_alpha: Option<&TextureRef>) -> ReconstructPath {
        reconstruct_path(self.assets, sprite, external_alpha, &self.options)
    }

    pub fn reconstruct(&self, sprite: &Sprite) -> Option<Bitmap> {
        self.reconstruct_with(sprite, None, None)
    }

    /// Reconstruct with an external alpha texture and optional face overlay.
    pub fn reconstruct_with(
        &self,
        sprite: &Sprite,
        external_alpha: Option<&TextureRef>,
        face: Option<&FaceOverlay>,
    ) -> Option<Bitmap> {
        reconstruct(self.assets, sprite, external_alpha, face, &self.options)
    }

    /// Reconstruct and encode as PNG.
    pub fn export_png(&self, sprite: &Sprite, config: &PngConfig) -> Result<SpriteExport> {
        let bitmap = self
            .reconstruct(sprite)
            .ok_or_else(|| SpriteError::NotReconstructed(sprite.name.clone()))?;
        let (data, hash) = write_bitmap_to_vec_with_hash(&bitmap, config)?;
        Ok(SpriteExport {
            width: bitmap.width(),
            height: bitmap.height(),
            data,
            hash,
        })
    }
}
