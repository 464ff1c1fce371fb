//! Rectangle extraction and the crop/orient/clip composition.

use image::imageops;
use spriteforge_spec::{PixelRect, ReconstructOptions, RenderData, Sprite};

use crate::bitmap::{Bitmap, BitmapError};
use crate::clip::clip_tight;
use crate::geometry::{crop_rect, orientation, Orientation};

/// Copy `rect` out of `source` into a new bitmap of exactly the rect's size.
///
/// Pixels of the rect that fall outside the source are transparent. Fails
/// when the rect is too large to allocate.
pub fn extract_rect(source: &Bitmap, rect: PixelRect) -> Result<Bitmap, BitmapError> {
    let mut out = Bitmap::try_new(rect.width, rect.height)?;
    imageops::replace(
        out.raw_mut(),
        source.raw(),
        -(rect.x as i64),
        -(rect.y as i64),
    );
    Ok(out)
}

/// Apply a packing orientation to a crop.
pub fn apply_orientation(bitmap: Bitmap, orientation: Orientation) -> Bitmap {
    match orientation {
        Orientation::Identity => bitmap,
        Orientation::MirrorX => bitmap.flip_horizontal(),
        Orientation::MirrorY => bitmap.flip_vertical(),
        Orientation::Rotate180 => bitmap.rotate180(),
        Orientation::Rotate270 => bitmap.rotate270(),
    }
}

/// Cut a sprite out of a decoded texture.
///
/// `source` holds the texture's stored rows, bottom row first. `render_data`
/// supplies the rect, offset and packing settings; the silhouette mesh always
/// comes from the sprite's own render data. The result is top row first.
///
/// Tight sprites whose silhouette cannot be built fall back to the plain
/// rectangle. The only error is a crop too large to allocate.
pub fn cut_sprite(
    source: &Bitmap,
    sprite: &Sprite,
    render_data: &RenderData,
    options: &ReconstructOptions,
) -> Result<Bitmap, BitmapError> {
    let rect = crop_rect(&render_data.texture_rect);
    let orient = orientation(&render_data.settings);
    log::debug!(
        "cutting '{}': crop {:?}, orientation {:?}",
        sprite.name,
        rect,
        orient
    );

    let mut crop = apply_orientation(extract_rect(source, rect)?, orient);

    if render_data.settings.is_tight() {
        match clip_tight(
            &crop,
            sprite,
            &sprite.render_data.geometry,
            render_data.texture_rect_offset,
            rect.width,
            rect.height,
            options.fill_rule,
        ) {
            Ok(clipped) => return Ok(clipped),
            Err(e) => log::warn!(
                "tight clip of '{}' failed, using rectangle: {}",
                sprite.name,
                e
            ),
        }
    }

    crop.flip_vertical_in_place();
    Ok(crop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Channel;
    use pretty_assertions::assert_eq;
    use spriteforge_spec::{MeshGeometry, PackingMode, PackingRotation, PackingSettings, RectF};

    /// Bitmap where pixel (x, y) has blue = 16 * y + x and full alpha.
    fn numbered(w: u32, h: u32) -> Bitmap {
        let mut bmp = Bitmap::new(w, h);
        for y in 0..h {
            for x in 0..w {
                bmp.set_pixel(x, y, [(16 * y + x) as u8, 0, 0, 255]);
            }
        }
        bmp
    }

    fn blue(bmp: &Bitmap, x: u32, y: u32) -> u8 {
        bmp.channel(x, y, Channel::Blue)
    }

    fn sprite_with(settings: PackingSettings, rect: RectF) -> Sprite {
        let mut rd = RenderData::new("tex", rect);
        rd.settings = settings;
        Sprite::new("s", RectF::new(0.0, 0.0, rect.width, rect.height), rd)
    }

    #[test]
    fn test_extract_inside() {
        let src = numbered(8, 8);
        let out = extract_rect(&src, PixelRect::new(2, 3, 3, 2)).unwrap();
        assert_eq!(out.dimensions(), (3, 2));
        assert_eq!(blue(&out, 0, 0), 16 * 3 + 2);
        assert_eq!(blue(&out, 2, 1), 16 * 4 + 4);
    }

    #[test]
    fn test_extract_pads_outside_with_transparent() {
        let src = numbered(4, 4);
        let out = extract_rect(&src, PixelRect::new(-1, 2, 3, 3)).unwrap();
        assert_eq!(out.dimensions(), (3, 3));
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(blue(&out, 1, 0), 16 * 2);
        assert_eq!(out.channel(1, 0, Channel::Alpha), 255);
        // Row 2 of the crop is source row 4, past the bottom.
        assert_eq!(out.pixel(1, 2), [0, 0, 0, 0]);

        let far = extract_rect(&src, PixelRect::new(100, 100, 2, 2)).unwrap();
        assert_eq!(far, Bitmap::new(2, 2));
    }

    #[test]
    fn test_oversized_rect_is_an_error() {
        let src = numbered(4, 4);
        let huge = PixelRect::new(0, 0, u32::MAX, u32::MAX);
        assert!(matches!(
            extract_rect(&src, huge),
            Err(BitmapError::TooLarge { .. })
        ));

        let sprite = sprite_with(
            PackingSettings::rectangle(),
            RectF::new(0.0, 0.0, 4.0e9, 4.0e9),
        );
        let opts = ReconstructOptions::default();
        assert!(cut_sprite(&src, &sprite, &sprite.render_data, &opts).is_err());
    }

    #[test]
    fn test_apply_orientation_rotate180_round_trips() {
        let src = numbered(3, 2);
        let once = apply_orientation(src.clone(), Orientation::Rotate180);
        assert_eq!(apply_orientation(once, Orientation::Rotate180), src);
    }

    #[test]
    fn test_cut_rectangle_is_mirrored_crop() {
        let src = numbered(8, 8);
        let rect = RectF::new(1.0, 1.0, 4.0, 3.0);
        let sprite = sprite_with(PackingSettings::rectangle(), rect);

        let opts = ReconstructOptions::default();
        let out = cut_sprite(&src, &sprite, &sprite.render_data, &opts).unwrap();
        let expected = extract_rect(&src, PixelRect::new(1, 1, 4, 3))
            .unwrap()
            .flip_vertical();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_cut_ignores_rotation_when_unpacked() {
        let src = numbered(8, 8);
        let rect = RectF::new(0.0, 0.0, 4.0, 2.0);
        let settings = PackingSettings {
            packed: false,
            packing_rotation: PackingRotation::Rotate90,
            packing_mode: PackingMode::Rectangle,
        };
        let sprite = sprite_with(settings, rect);
        let opts = ReconstructOptions::default();
        let out = cut_sprite(&src, &sprite, &sprite.render_data, &opts).unwrap();
        assert_eq!(out.dimensions(), (4, 2));
    }

    #[test]
    fn test_cut_rotate90_turns_three_quarters() {
        let src = numbered(8, 8);
        let rect = RectF::new(0.0, 0.0, 4.0, 2.0);
        let settings = PackingSettings::rectangle().with_rotation(PackingRotation::Rotate90);
        let sprite = sprite_with(settings, rect);

        let opts = ReconstructOptions::default();
        let out = cut_sprite(&src, &sprite, &sprite.render_data, &opts).unwrap();
        let expected = extract_rect(&src, PixelRect::new(0, 0, 4, 2))
            .unwrap()
            .rotate270()
            .flip_vertical();
        assert_eq!(out.dimensions(), (2, 4));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_tight_failure_matches_rectangle() {
        let src = numbered(8, 8);
        let rect = RectF::new(2.0, 2.0, 4.0, 4.0);
        let tight = PackingSettings::rectangle().with_mode(PackingMode::Tight);
        let mut sprite = sprite_with(tight, rect);
        sprite.render_data.geometry = MeshGeometry::Legacy {
            vertices: vec![],
            indices: vec![],
        };
        let rectangle = sprite_with(PackingSettings::rectangle(), rect);

        let options = ReconstructOptions::default();
        assert_eq!(
            cut_sprite(&src, &sprite, &sprite.render_data, &options).unwrap(),
            cut_sprite(&src, &rectangle, &rectangle.render_data, &options).unwrap()
        );
    }
}
