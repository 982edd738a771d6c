//! Camera-space to screen-space conversion.
//!
//! A [`Projection`] takes geometry already expressed in camera space
//! (+Z is view depth) and produces screen-space coordinates with the
//! origin at the image center, +Y up. Segments are clipped against the
//! near and far planes in camera space, then against the normalized
//! device square after the perspective (or orthographic) mapping.

use crate::error::{Error, Result};
use crate::math::{Vector2, Vector3};

/// Viewing parameters, validated when a [`Projection`] is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    /// Vertical-or-horizontal field of view in radians; applies to the
    /// narrower image axis.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub zoom: f32,
    pub orthographic: bool,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            fov: std::f32::consts::FRAC_PI_4, // 45 degrees
            near: 0.1,
            far: 100.0,
            zoom: 1.0,
            orthographic: false,
        }
    }
}

/// Precomputed screen mapping for one viewport configuration.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    near: f32,
    far: f32,
    zoom: f32,
    orthographic: bool,
    tan_x: f32,
    tan_y: f32,
    half_width: f32,
    half_height: f32,
}

impl Projection {
    /// Validate parameters and precompute the per-axis half-FOV
    /// tangents. The narrower axis is normalized to the full field of
    /// view and the wider axis scaled up by the aspect ratio, keeping
    /// pixels square.
    pub fn new(params: &ViewParams, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "render target is {width}x{height}, both dimensions must be positive"
            )));
        }
        if params.near < 0.0 || params.far < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "clip distances must be non-negative (near {}, far {})",
                params.near, params.far
            )));
        }
        if params.near >= params.far {
            return Err(Error::InvalidConfiguration(format!(
                "near clip {} must be closer than far clip {}",
                params.near, params.far
            )));
        }
        if !(params.fov > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "field of view must be positive, got {}",
                params.fov
            )));
        }
        if !(params.zoom > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "zoom must be positive, got {}",
                params.zoom
            )));
        }

        let t = (params.fov * 0.5).tan();
        let (tan_x, tan_y) = if width >= height {
            (t * width as f32 / height as f32, t)
        } else {
            (t, t * height as f32 / width as f32)
        };
        Ok(Self {
            near: params.near,
            far: params.far,
            zoom: params.zoom,
            orthographic: params.orthographic,
            tan_x,
            tan_y,
            half_width: width as f32 * 0.5,
            half_height: height as f32 * 0.5,
        })
    }

    pub fn orthographic(&self) -> bool {
        self.orthographic
    }

    /// Map a camera-space point to normalized device coordinates.
    /// Perspective divides by view depth; orthographic truncates the
    /// depth axis. Both scale by the per-axis half-FOV tangent, gated by
    /// zoom.
    fn to_ndc(&self, v: Vector3) -> Vector2 {
        if self.orthographic {
            Vector2::new(v.x * self.zoom / self.tan_x, v.y * self.zoom / self.tan_y)
        } else {
            Vector2::new(
                v.x * self.zoom / (v.z * self.tan_x),
                v.y * self.zoom / (v.z * self.tan_y),
            )
        }
    }

    #[inline]
    fn to_screen(&self, ndc: Vector2) -> Vector2 {
        Vector2::new(ndc.x * self.half_width, ndc.y * self.half_height)
    }

    /// Project one camera-space segment to a screen-space segment.
    ///
    /// `None` means nothing to draw: the segment was clipped away
    /// entirely. Coordinates are pixels with the origin at the image
    /// center and +Y up, bounded by ±half width/height.
    pub fn project_segment(&self, a: Vector3, b: Vector3) -> Option<(Vector2, Vector2)> {
        let (a, b) = clip_depth(a, b, self.near, self.far)?;
        let p = self.to_ndc(a);
        let q = self.to_ndc(b);
        if !p.is_finite() || !q.is_finite() {
            return None;
        }
        let (p, q) = clip_square(p, q)?;
        Some((self.to_screen(p), self.to_screen(q)))
    }

    /// Project one camera-space point, used for polygon vertices.
    ///
    /// `None` when the point lies outside the [near, far] depth range.
    /// The result is not clipped to the screen rectangle; polygons clip
    /// at raster time.
    pub fn project_point(&self, v: Vector3) -> Option<Vector2> {
        if v.z < self.near || v.z > self.far {
            return None;
        }
        let ndc = self.to_ndc(v);
        if !ndc.is_finite() {
            return None;
        }
        Some(self.to_screen(ndc))
    }
}

/// Clip a segment to `near <= z <= far` by parametric interpolation.
fn clip_depth(mut a: Vector3, mut b: Vector3, near: f32, far: f32) -> Option<(Vector3, Vector3)> {
    if a.z < near && b.z < near {
        return None;
    }
    if a.z > far && b.z > far {
        return None;
    }
    if a.z < near {
        a = intersect_depth(a, b, near);
    } else if b.z < near {
        b = intersect_depth(a, b, near);
    }
    if a.z > far {
        a = intersect_depth(a, b, far);
    } else if b.z > far {
        b = intersect_depth(a, b, far);
    }
    Some((a, b))
}

/// Point where segment `a`-`b` crosses the plane `z = plane`. Callers
/// guarantee the segment straddles it, so the division is well-defined.
fn intersect_depth(a: Vector3, b: Vector3, plane: f32) -> Vector3 {
    let t = (plane - a.z) / (b.z - a.z);
    a + (b - a) * t
}

/// Clip a 2D segment to the NDC square by successive boundary clips.
fn clip_square(a: Vector2, b: Vector2) -> Option<(Vector2, Vector2)> {
    let (a, b) = clip_boundary(a, b, |p| p.x + 1.0)?; // left
    let (a, b) = clip_boundary(a, b, |p| 1.0 - p.x)?; // right
    let (a, b) = clip_boundary(a, b, |p| p.y + 1.0)?; // bottom
    clip_boundary(a, b, |p| 1.0 - p.y) // top
}

/// Clip against one boundary line. `inside` is a signed distance,
/// non-negative inside the kept half-plane.
fn clip_boundary(
    a: Vector2,
    b: Vector2,
    inside: impl Fn(Vector2) -> f32,
) -> Option<(Vector2, Vector2)> {
    let da = inside(a);
    let db = inside(b);
    if da < 0.0 && db < 0.0 {
        return None;
    }
    if da >= 0.0 && db >= 0.0 {
        return Some((a, b));
    }
    let t = da / (da - db);
    let crossing = a + (b - a) * t;
    if da < 0.0 {
        Some((crossing, b))
    } else {
        Some((a, crossing))
    }
}
