//! Tight-packing silhouette clipping.
//!
//! The render mesh is rasterized as a set of closed triangle polygons over a
//! transparent canvas the size of the crop. Covered pixels take their value
//! from the crop, tiled from the canvas origin; everything else stays
//! transparent. Sampling is at pixel centres with no anti-aliasing.

use spriteforge_spec::{FillRule, MeshGeometry, Sprite, Vector2};
use thiserror::Error;

use crate::bitmap::{Bitmap, BitmapError};
use crate::geometry::{mesh_transform, Affine2, GeometryError};
use crate::mesh::{triangulate, MeshError, Triangle};

/// Errors from silhouette clipping. Callers recover from all of them by
/// falling back to the plain rectangle.
#[derive(Debug, Error, PartialEq)]
pub enum ClipError {
    #[error("mesh decoding failed: {0}")]
    Mesh(#[from] MeshError),

    #[error("transform construction failed: {0}")]
    Geometry(#[from] GeometryError),

    #[error("canvas allocation failed: {0}")]
    Bitmap(#[from] BitmapError),

    /// The mesh has no triangles to clip with.
    #[error("mesh has no triangles")]
    NoTriangles,

    /// A transformed vertex is NaN or infinite.
    #[error("transformed vertex is not finite")]
    NonFiniteVertex,

    /// The fill texture has no pixels.
    #[error("fill texture is empty")]
    EmptyTile,
}

/// A non-horizontal polygon edge in canvas space.
#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    /// +1 when the edge runs downwards (increasing y), -1 otherwise.
    winding: i32,
}

impl Edge {
    fn new(from: (f64, f64), to: (f64, f64)) -> Option<Self> {
        if from.1 == to.1 {
            return None;
        }
        let (winding, (x0, y0), (x1, y1)) = if from.1 < to.1 {
            (1, from, to)
        } else {
            (-1, to, from)
        };
        Some(Self {
            x0,
            y0,
            x1,
            y1,
            winding,
        })
    }

    /// X where the edge crosses scanline `y`, if it does. The span is
    /// half-open (`y0 <= y < y1`) so shared vertices count once.
    fn crossing(&self, y: f64) -> Option<f64> {
        if y < self.y0 || y >= self.y1 {
            return None;
        }
        let t = (y - self.y0) / (self.y1 - self.y0);
        Some(self.x0 + t * (self.x1 - self.x0))
    }
}

/// Triangulate the sprite's mesh, map it into crop space and clip `tile`
/// with it.
///
/// `offset` is the texture-rect offset of whichever render data the crop
/// came from.
pub fn clip_tight(
    tile: &Bitmap,
    sprite: &Sprite,
    geometry: &MeshGeometry,
    offset: Vector2,
    width: u32,
    height: u32,
    fill_rule: FillRule,
) -> Result<Bitmap, ClipError> {
    let triangles = triangulate(geometry)?;
    let transform = mesh_transform(sprite, offset)?;
    clip_silhouette(tile, &triangles, &transform, width, height, fill_rule)
}

/// Fill the union of `triangles` (after `transform`) with `tile` on a
/// `width`×`height` canvas, then mirror the result vertically.
pub fn clip_silhouette(
    tile: &Bitmap,
    triangles: &[Triangle],
    transform: &Affine2,
    width: u32,
    height: u32,
    fill_rule: FillRule,
) -> Result<Bitmap, ClipError> {
    if triangles.is_empty() {
        return Err(ClipError::NoTriangles);
    }
    let (tile_w, tile_h) = tile.dimensions();
    if tile_w == 0 || tile_h == 0 {
        return Err(ClipError::EmptyTile);
    }

    let edges = build_edges(triangles, transform)?;
    let mut canvas = Bitmap::try_new(width, height)?;
    let mut crossings: Vec<(f64, i32)> = Vec::new();

    for py in 0..height {
        let sy = py as f64 + 0.5;
        crossings.clear();
        crossings.extend(
            edges
                .iter()
                .filter_map(|e| e.crossing(sy).map(|x| (x, e.winding))),
        );
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut winding = 0i32;
        for pair in crossings.windows(2) {
            let (x_start, w) = pair[0];
            let x_end = pair[1].0;
            winding += w;

            let inside = match fill_rule {
                FillRule::EvenOdd => winding % 2 != 0,
                FillRule::NonZero => winding != 0,
            };
            if !inside {
                continue;
            }

            // Pixels whose centre lies in [x_start, x_end).
            let first = (x_start - 0.5).ceil().max(0.0);
            let last = (x_end - 0.5).ceil().min(width as f64);
            if first >= last {
                continue;
            }
            for px in first as u32..last as u32 {
                canvas.set_pixel(px, py, tile.pixel(px % tile_w, py % tile_h));
            }
        }
    }

    canvas.flip_vertical_in_place();
    Ok(canvas)
}

fn build_edges(triangles: &[Triangle], transform: &Affine2) -> Result<Vec<Edge>, ClipError> {
    let mut edges = Vec::with_capacity(triangles.len() * 3);
    for tri in triangles {
        let mut points = [(0.0, 0.0); 3];
        for (p, v) in points.iter_mut().zip(tri) {
            let (x, y) = transform.transform_point(v.x as f64, v.y as f64);
            if !x.is_finite() || !y.is_finite() {
                return Err(ClipError::NonFiniteVertex);
            }
            *p = (x, y);
        }
        for i in 0..3 {
            edges.extend(Edge::new(points[i], points[(i + 1) % 3]));
        }
    }
    Ok(edges)
}
