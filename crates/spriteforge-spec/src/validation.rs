//! Sprite metadata validation.
//!
//! Validation is advisory: reconstruction stays best-effort whatever this
//! reports. Hosts use it to surface broken metadata before exporting.

use crate::error::{
    ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
use crate::mesh::MeshGeometry;
use crate::sprite::{RenderData, Sprite};

/// Validates a sprite and returns every problem found.
///
/// # Example
/// ```
/// use spriteforge_spec::{RectF, RenderData, Sprite};
/// use spriteforge_spec::validation::validate_sprite;
///
/// let sprite = Sprite::new(
///     "coin",
///     RectF::new(0.0, 0.0, 8.0, 8.0),
///     RenderData::new("tex/coins", RectF::new(0.0, 0.0, 8.0, 8.0)),
/// );
/// assert!(validate_sprite(&sprite).is_ok());
/// ```
pub fn validate_sprite(sprite: &Sprite) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_scale(sprite, &mut result);
    validate_pivot(sprite, &mut result);
    validate_sources(sprite, &mut result);
    validate_render_data(&sprite.render_data, "render_data", &mut result);

    result
}

/// Parses a sprite from JSON and rejects it if validation reports errors.
///
/// Warnings do not fail the load.
pub fn load_sprite(json: &str) -> Result<Sprite, SpecError> {
    let sprite = Sprite::from_json(json)?;
    let result = validate_sprite(&sprite);
    if !result.is_ok() {
        return Err(SpecError::ValidationFailed(result.errors.len()));
    }
    Ok(sprite)
}

/// Validates one render-data record (a sprite's own or an atlas entry).
pub fn validate_render_data(data: &RenderData, path: &str, result: &mut ValidationResult) {
    let rect = &data.texture_rect;
    if !rect.is_finite() {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidTextureRect,
            "texture rect has a non-finite component",
            format!("{path}.texture_rect"),
        ));
    } else if rect.width < 0.0 || rect.height < 0.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidTextureRect,
            format!("texture rect has negative size {}x{}", rect.width, rect.height),
            format!("{path}.texture_rect"),
        ));
    }

    validate_geometry(&data.geometry, &format!("{path}.geometry"), result);

    if data.settings.is_tight() && data.geometry.triangle_count() == 0 {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::TightWithoutTriangles,
            "tight packing without mesh triangles; the rectangle will be used",
            format!("{path}.geometry"),
        ));
    }
}

fn validate_scale(sprite: &Sprite, result: &mut ValidationResult) {
    let ppu = sprite.pixels_to_units;
    if !ppu.is_finite() || ppu <= 0.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidPixelsToUnits,
            format!("pixels_to_units must be positive and finite, got {ppu}"),
            "pixels_to_units",
        ));
    }
}

fn validate_pivot(sprite: &Sprite, result: &mut ValidationResult) {
    let in_range = |v: f32| (0.0..=1.0).contains(&v);
    if !in_range(sprite.pivot.x) || !in_range(sprite.pivot.y) {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::PivotOutOfRange,
            format!(
                "pivot ({}, {}) lies outside the sprite rectangle",
                sprite.pivot.x, sprite.pivot.y
            ),
            "pivot",
        ));
    }
}

fn validate_sources(sprite: &Sprite, result: &mut ValidationResult) {
    if sprite.atlas.is_none() && sprite.render_data.texture.is_none() {
        result.add_warning(ValidationWarning::new(
            WarningCode::NoImageSource,
            "sprite has neither an atlas nor a texture",
        ));
    }
}

fn validate_geometry(geometry: &MeshGeometry, path: &str, result: &mut ValidationResult) {
    match geometry {
        MeshGeometry::Legacy { vertices, indices } => {
            if let Some((i, index)) = indices
                .iter()
                .enumerate()
                .find(|(_, index)| **index as usize >= vertices.len())
            {
                result.add_error(ValidationError::with_path(
                    ErrorCode::LegacyIndexOutOfRange,
                    format!("index {index} exceeds {} vertices", vertices.len()),
                    format!("{path}.indices[{i}]"),
                ));
            }
        }
        MeshGeometry::Modern {
            vertex_data,
            sub_meshes,
            index_buffer,
        } => {
            match vertex_data.channels.first() {
                None => result.add_error(ValidationError::with_path(
                    ErrorCode::MissingPositionChannel,
                    "vertex data has no position channel",
                    format!("{path}.vertex_data.channels"),
                )),
                Some(channel) if channel.stream as usize >= vertex_data.streams.len() => {
                    result.add_error(ValidationError::with_path(
                        ErrorCode::MissingPositionChannel,
                        format!("position channel refers to missing stream {}", channel.stream),
                        format!("{path}.vertex_data.channels[0]"),
                    ))
                }
                Some(_) => {}
            }

            for (i, sub) in sub_meshes.iter().enumerate() {
                let end = sub.first_byte as u64 + sub.index_count as u64 * 2;
                if end > index_buffer.len() as u64 {
                    result.add_error(ValidationError::with_path(
                        ErrorCode::SubMeshOutOfRange,
                        format!(
                            "indices end at byte {end}, index buffer has {} bytes",
                            index_buffer.len()
                        ),
                        format!("{path}.sub_meshes[{i}]"),
                    ));
                }
            }
        }
    }
}
