//! SpriteForge Sprite Metadata Library
//!
//! This crate provides the types that describe a packed sprite: its logical
//! rectangle, pivot and scale, the render data locating its pixels inside a
//! texture or atlas, the packing settings, and the render mesh used for
//! tight packing. All types are plain serde data so hosts can feed metadata
//! decoded from any container format, or JSON.
//!
//! # Example
//!
//! ```
//! use spriteforge_spec::{ProducerVersion, RectF, RenderData, Sprite};
//! use spriteforge_spec::validation::validate_sprite;
//!
//! let mut sprite = Sprite::new(
//!     "coin",
//!     RectF::new(0.0, 0.0, 16.0, 16.0),
//!     RenderData::new("tex/items", RectF::new(32.0, 0.0, 16.0, 16.0)),
//! );
//! sprite.version = ProducerVersion::parse("2019.4.1f1").unwrap();
//!
//! assert!(validate_sprite(&sprite).is_ok());
//! let json = sprite.to_json().unwrap();
//! assert_eq!(Sprite::from_json(&json).unwrap(), sprite);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning types for validation
//! - [`mesh`]: Render-mesh layouts
//! - [`options`]: Reconstruction switches
//! - [`packing`]: Packing rotation, mode and settings
//! - [`sprite`]: Sprite, render data, atlas and face overlay types
//! - [`validation`]: Metadata validation
//! - [`version`]: Producer version triple

pub mod error;
pub mod mesh;
pub mod options;
pub mod packing;
pub mod sprite;
pub mod validation;
pub mod version;

pub use error::{
    ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
pub use mesh::{ChannelInfo, MeshGeometry, StreamInfo, SubMesh, VertexData};
pub use options::{FillRule, ReconstructOptions};
pub use packing::{PackingMode, PackingRotation, PackingSettings};
pub use sprite::{
    AtlasRef, FaceOverlay, PixelRect, RectF, RenderData, RenderDataKey, Sprite, SpriteAtlas,
    TextureRef, Vector2,
};
pub use version::ProducerVersion;
