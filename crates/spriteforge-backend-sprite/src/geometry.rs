//! Geometry resolution: integer crop, packing orientation, and the affine
//! transform from mesh space into crop-pixel space.

use spriteforge_spec::{PackingRotation, PackingSettings, PixelRect, RectF, Sprite, Vector2};
use thiserror::Error;

/// Errors from building the mesh transform.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    /// The transform has a NaN or infinite coefficient.
    #[error("mesh transform is not finite: {0:?}")]
    NonFiniteTransform(Affine2),
}

/// Round a texture rectangle to whole pixels.
///
/// Each component rounds to the nearest integer with ties to even. A size
/// that rounds to zero (or below) becomes one pixel so the crop always has
/// at least one pixel.
pub fn crop_rect(rect: &RectF) -> PixelRect {
    let round = |v: f32| v.round_ties_even() as i64;
    let size = |v: f32| round(v).clamp(1, u32::MAX as i64) as u32;

    PixelRect {
        x: round(rect.x).clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        y: round(rect.y).clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        width: size(rect.width),
        height: size(rect.height),
    }
}

/// Normalization applied to a crop to undo packing rotation/flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Identity,
    MirrorX,
    MirrorY,
    Rotate180,
    /// Three clockwise quarter turns.
    Rotate270,
}

/// Orientation implied by packing settings.
///
/// Unpacked sprites are never reoriented. A packed `Rotate90` sprite gets
/// three clockwise quarter turns; the crop is still bottom-up at this point
/// and is mirrored vertically afterwards.
pub fn orientation(settings: &PackingSettings) -> Orientation {
    if !settings.packed {
        return Orientation::Identity;
    }
    match settings.packing_rotation {
        PackingRotation::None => Orientation::Identity,
        PackingRotation::FlipHorizontal => Orientation::MirrorX,
        PackingRotation::FlipVertical => Orientation::MirrorY,
        PackingRotation::Rotate180 => Orientation::Rotate180,
        PackingRotation::Rotate90 => Orientation::Rotate270,
    }
}

/// 2D affine transform: `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Affine2 {
    pub const IDENTITY: Affine2 = Affine2 {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Transform that applies `self` first and `next` second.
    pub fn then(&self, next: &Affine2) -> Affine2 {
        Affine2 {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            tx: next.a * self.tx + next.c * self.ty + next.tx,
            ty: next.b * self.tx + next.d * self.ty + next.ty,
        }
    }

    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d, self.tx, self.ty]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Point of the sprite rectangle that mesh space is anchored to, in
/// normalized rectangle coordinates.
///
/// Sprites produced before 5.4.2 anchor at the rectangle centre; later ones
/// at their pivot.
pub fn mesh_origin(sprite: &Sprite) -> Vector2 {
    if sprite.version.uses_center_origin() {
        Vector2::new(0.5, 0.5)
    } else {
        sprite.pivot
    }
}

/// Transform mapping mesh-local points into crop pixels.
///
/// Points are scaled by pixels-per-unit, then moved by the origin position
/// inside the sprite rectangle minus the texture-rect offset.
pub fn mesh_transform(sprite: &Sprite, offset: Vector2) -> Result<Affine2, GeometryError> {
    let origin = mesh_origin(sprite);
    let tx = sprite.rect.width as f64 * origin.x as f64 - offset.x as f64;
    let ty = sprite.rect.height as f64 * origin.y as f64 - offset.y as f64;
    let ppu = sprite.pixels_to_units as f64;

    let transform = Affine2::scale(ppu, ppu).then(&Affine2::translation(tx, ty));
    if !transform.is_finite() {
        return Err(GeometryError::NonFiniteTransform(transform));
    }
    Ok(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spriteforge_spec::{PackingMode, ProducerVersion, RenderData};

    fn sprite(version: ProducerVersion) -> Sprite {
        let mut s = Sprite::new(
            "s",
            RectF::new(0.0, 0.0, 40.0, 20.0),
            RenderData::new("tex", RectF::new(0.0, 0.0, 40.0, 20.0)),
        );
        s.version = version;
        s.pivot = Vector2::new(0.25, 0.0);
        s.pixels_to_units = 10.0;
        s
    }

    #[test]
    fn test_crop_rect_rounds_half_to_even() {
        let r = crop_rect(&RectF::new(1.5, 2.5, 10.4, 3.6));
        assert_eq!(r, PixelRect::new(2, 2, 10, 4));
        let r = crop_rect(&RectF::new(-0.5, 0.49, 2.5, 0.5));
        assert_eq!(r, PixelRect::new(0, 0, 2, 1));
    }

    #[test]
    fn test_crop_rect_never_zero() {
        let r = crop_rect(&RectF::new(3.0, 4.0, 0.2, 0.0));
        assert_eq!((r.width, r.height), (1, 1));
        let r = crop_rect(&RectF::new(0.0, 0.0, -3.0, f32::NAN));
        assert_eq!((r.width, r.height), (1, 1));
    }

    #[test]
    fn test_crop_rect_dimension_property() {
        for w in [0.0f32, 0.4, 0.6, 1.0, 7.49, 7.51, 128.0] {
            for h in [0.0f32, 1.5, 2.5, 64.2] {
                let r = crop_rect(&RectF::new(0.0, 0.0, w, h));
                assert_eq!(r.width, (w.round_ties_even() as u32).max(1));
                assert_eq!(r.height, (h.round_ties_even() as u32).max(1));
            }
        }
    }

    #[test]
    fn test_orientation_table() {
        let packed = |rot| PackingSettings::rectangle().with_rotation(rot);
        assert_eq!(orientation(&packed(PackingRotation::None)), Orientation::Identity);
        assert_eq!(
            orientation(&packed(PackingRotation::FlipHorizontal)),
            Orientation::MirrorX
        );
        assert_eq!(
            orientation(&packed(PackingRotation::FlipVertical)),
            Orientation::MirrorY
        );
        assert_eq!(
            orientation(&packed(PackingRotation::Rotate180)),
            Orientation::Rotate180
        );
        // Quarter-turn packing is undone with a 270 degree turn, not 90.
        assert_eq!(
            orientation(&packed(PackingRotation::Rotate90)),
            Orientation::Rotate270
        );
    }

    #[test]
    fn test_unpacked_ignores_rotation() {
        let settings = PackingSettings {
            packed: false,
            packing_rotation: PackingRotation::Rotate180,
            packing_mode: PackingMode::Tight,
        };
        assert_eq!(orientation(&settings), Orientation::Identity);
    }

    #[test]
    fn test_affine_then_order() {
        let m = Affine2::scale(2.0, 3.0).then(&Affine2::translation(1.0, -1.0));
        assert_eq!(m.transform_point(1.0, 1.0), (3.0, 2.0));
        let m = Affine2::translation(1.0, -1.0).then(&Affine2::scale(2.0, 3.0));
        assert_eq!(m.transform_point(1.0, 1.0), (4.0, 0.0));
    }

    #[test]
    fn test_origin_version_gate_boundaries() {
        let center = Vector2::new(0.5, 0.5);
        let pivot = Vector2::new(0.25, 0.0);
        assert_eq!(mesh_origin(&sprite(ProducerVersion::new(5, 3, 9))), center);
        assert_eq!(mesh_origin(&sprite(ProducerVersion::new(5, 4, 1))), center);
        assert_eq!(mesh_origin(&sprite(ProducerVersion::new(5, 4, 2))), pivot);
        assert_eq!(mesh_origin(&sprite(ProducerVersion::new(5, 5, 0))), pivot);
    }

    #[test]
    fn test_mesh_transform_center_origin() {
        let s = sprite(ProducerVersion::new(5, 4, 1));
        let m = mesh_transform(&s, Vector2::new(2.0, 1.0)).unwrap();
        // (40 * 0.5 - 2, 20 * 0.5 - 1) = (18, 9)
        assert_eq!(m.transform_point(0.0, 0.0), (18.0, 9.0));
        assert_eq!(m.transform_point(1.0, -0.5), (28.0, 4.0));
    }

    #[test]
    fn test_mesh_transform_pivot_origin() {
        let s = sprite(ProducerVersion::new(5, 4, 2));
        let m = mesh_transform(&s, Vector2::new(2.0, 1.0)).unwrap();
        // (40 * 0.25 - 2, 20 * 0 - 1) = (8, -1)
        assert_eq!(m.transform_point(0.0, 0.0), (8.0, -1.0));
        assert_eq!(m.transform_point(0.5, 0.5), (13.0, 4.0));
    }

    #[test]
    fn test_mesh_transform_rejects_non_finite() {
        let mut s = sprite(ProducerVersion::new(2019, 1, 0));
        s.pixels_to_units = f32::INFINITY;
        assert!(matches!(
            mesh_transform(&s, Vector2::default()),
            Err(GeometryError::NonFiniteTransform(_))
        ));
    }
}
