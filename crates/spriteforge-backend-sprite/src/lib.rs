//! SpriteForge Sprite Reconstruction Backend
//!
//! This crate rebuilds a standalone bitmap for a sprite that was packed into
//! a larger texture. It undoes packing rotation and flips, clips tight-packed
//! sprites to their render-mesh silhouette, and merges alpha from a separate
//! mask texture when one is supplied.
//!
//! Texture decoding and asset lookup stay with the host, behind the traits
//! in [`resolve`].
//!
//! # Example
//!
//! ```
//! use spriteforge_backend_sprite::{reconstruct, Bitmap, MemoryAssets};
//! use spriteforge_spec::{ReconstructOptions, RectF, RenderData, Sprite};
//!
//! // Decoded textures keep the engine's bottom-up row order.
//! let mut texture = Bitmap::new(4, 4);
//! texture.set_pixel(0, 0, [0, 0, 255, 255]);
//!
//! let assets = MemoryAssets::new().with_texture("tex", texture);
//! let sprite = Sprite::new(
//!     "corner",
//!     RectF::new(0.0, 0.0, 2.0, 2.0),
//!     RenderData::new("tex", RectF::new(0.0, 0.0, 2.0, 2.0)),
//! );
//!
//! let out = reconstruct(&assets, &sprite, None, None, &ReconstructOptions::default()).unwrap();
//! assert_eq!(out.dimensions(), (2, 2));
//! // The bottom-left texel ends up bottom-left of the upright image.
//! assert_eq!(out.pixel(0, 1), [0, 0, 255, 255]);
//! ```
//!
//! # Pipeline
//!
//! - [`geometry`]: integer crop, packing orientation, mesh transform
//! - [`extract`]: rectangle crop and the crop/orient/clip composition
//! - [`mesh`]: render-mesh triangulation
//! - [`clip`]: tight silhouette rasterization
//! - [`mask`]: alpha merge and face overlays
//! - [`resize`]: mask resampling
//! - [`reconstruct`]: path selection and the public entry point
//! - [`png`]: deterministic PNG encoding

pub mod bitmap;
pub mod clip;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod mask;
pub mod mesh;
pub mod png;
pub mod reconstruct;
pub mod resize;
pub mod resolve;

pub use bitmap::{Bitmap, BitmapError, Channel};
pub use clip::{clip_silhouette, clip_tight, ClipError};
pub use error::{Result, SpriteError};
pub use extract::{apply_orientation, cut_sprite, extract_rect};
pub use geometry::{crop_rect, mesh_transform, orientation, Affine2, GeometryError, Orientation};
pub use mask::{apply_face_overlay, apply_mask, paste, MaskError};
pub use mesh::{triangulate, MeshError, Triangle};
pub use self::png::{write_bitmap_to_vec_with_hash, write_bitmap_to_writer, PngConfig, PngError};
pub use reconstruct::{
    reconstruct, reconstruct_path, ReconstructPath, SpriteExport, SpriteReconstructor,
};
pub use resize::{resize, Quality};
pub use resolve::{AssetSource, AtlasResolver, MemoryAssets, TextureDecoder, TextureResolver};
