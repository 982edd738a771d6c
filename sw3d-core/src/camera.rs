//! The camera: render queue, view conversion, and the frame loop.

use log::{debug, warn};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::Mesh;
use crate::math::{Vector2, Vector3, EPSILON};
use crate::object::SceneObject;
use crate::projection::{Projection, ViewParams};
use crate::scene::{ObjectHandle, Scene};
use crate::surface::DrawSurface;
use crate::transform::Transform;

/// Axis-gizmo pens: forward/up/right.
const AXIS_FORWARD: Color = Color::BLUE;
const AXIS_UP: Color = Color::GREEN;
const AXIS_RIGHT: Color = Color::RED;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Wireframe,
    Solid,
}

/// A camera owning its output surface and a queue of scene handles.
///
/// The queue borrows: objects live in the [`Scene`], the camera only
/// records which ones to draw. The camera itself carries a transform and
/// a selection flag like any scene object; [`Self::scene_object`] yields
/// a frustum-gizmo record so other cameras can render this one.
#[derive(Debug)]
pub struct Camera<S: DrawSurface> {
    transform: Transform,
    pub selected: bool,
    queue: Vec<ObjectHandle>,
    mode: RenderMode,
    params: ViewParams,
    width: u32,
    height: u32,
    pub background: Color,
    pub pen: Color,
    pub highlight: Color,
    /// Draw forward/up/right axis segments for every queued object.
    pub draw_axes: bool,
    pub axis_length: f32,
    projection: Projection,
    surface: S,
}

impl<S: DrawSurface> Camera<S> {
    /// Validate the configuration and allocate the output surface. An
    /// invalid configuration fails before any allocation.
    pub fn new(width: u32, height: u32, params: ViewParams) -> Result<Self> {
        let projection = Projection::new(&params, width, height)?;
        Ok(Self {
            transform: Transform::identity(),
            selected: false,
            queue: Vec::new(),
            mode: RenderMode::Wireframe,
            params,
            width,
            height,
            background: Color::BLACK,
            pen: Color::WHITE,
            highlight: Color::YELLOW,
            draw_axes: false,
            axis_length: 1.0,
            projection,
            surface: S::create(width, height),
        })
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// The camera caches no world-space geometry, so direct mutation
    /// needs no resync step.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Append to the render queue. No deduplication; an object queued
    /// twice draws twice.
    pub fn enqueue(&mut self, handle: ObjectHandle) {
        self.queue.push(handle);
    }

    pub fn queue(&self) -> &[ObjectHandle] {
        &self.queue
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    pub fn view_params(&self) -> &ViewParams {
        &self.params
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Resize the output. Rebuilds the projection and reallocates the
    /// surface; on failure the previous configuration stays in effect.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> Result<()> {
        let projection = Projection::new(&self.params, width, height)?;
        self.projection = projection;
        self.width = width;
        self.height = height;
        self.surface = S::create(width, height);
        Ok(())
    }

    /// Replace the viewing parameters. Rebuilds the projection and the
    /// surface; on failure the previous configuration stays in effect.
    pub fn set_view_params(&mut self, params: ViewParams) -> Result<()> {
        self.projection = Projection::new(&params, self.width, self.height)?;
        self.params = params;
        self.surface = S::create(self.width, self.height);
        Ok(())
    }

    pub fn set_fov(&mut self, fov: f32) -> Result<()> {
        self.set_view_params(ViewParams { fov, ..self.params })
    }

    pub fn set_clip(&mut self, near: f32, far: f32) -> Result<()> {
        self.set_view_params(ViewParams {
            near,
            far,
            ..self.params
        })
    }

    pub fn set_zoom(&mut self, zoom: f32) -> Result<()> {
        self.set_view_params(ViewParams {
            zoom,
            ..self.params
        })
    }

    pub fn set_orthographic(&mut self, orthographic: bool) -> Result<()> {
        self.set_view_params(ViewParams {
            orthographic,
            ..self.params
        })
    }

    /// A frustum-gizmo record at this camera's pose, for rendering this
    /// camera from another one. Cosmetic only.
    pub fn scene_object(&self) -> SceneObject {
        let mut object = SceneObject::with_transform(Mesh::camera_gizmo(), self.transform);
        object.selected = self.selected;
        object
    }

    /// Draw one frame of every queued object and return the finished
    /// image.
    ///
    /// World-space vertices are read from each object's resync cache,
    /// converted to camera space as
    /// `inverse(rotation) · (vertex - position)`, and pushed through the
    /// projection. Degenerate and clipped primitives are omitted from
    /// the frame, never an error.
    pub fn render(&mut self, scene: &Scene) -> Result<&S::Image> {
        if self.mode == RenderMode::Solid && self.params.orthographic {
            return Err(Error::NotSupported("orthographic solid rendering"));
        }

        let projection = self.projection;
        let cam_pos = self.transform.position();
        let inv_rot = self.transform.rotation().conjugate();
        let to_view = move |v: Vector3| inv_rot.rotate(v - cam_pos);
        let half_w = self.width as f32 * 0.5;
        let half_h = self.height as f32 * 0.5;
        // Center-origin +Y-up projection space to top-left +Y-down
        // raster space.
        let to_raster = move |p: Vector2| Vector2::new(half_w + p.x, half_h - p.y);

        let pen_default = self.pen;
        let pen_highlight = self.highlight;
        let draw_axes = self.draw_axes;
        let axis_length = self.axis_length;
        let mode = self.mode;
        let background = self.background;
        let Self { queue, surface, .. } = self;

        surface.clear(background);

        match mode {
            RenderMode::Wireframe => {
                let mut drawn = 0usize;
                let mut clipped = 0usize;
                for &handle in queue.iter() {
                    let Some(object) = scene.get(handle) else {
                        warn!("queued handle {handle:?} not in scene, skipping");
                        continue;
                    };
                    let pen = if object.selected() {
                        pen_highlight
                    } else {
                        pen_default
                    };
                    let verts = object.world_vertices();
                    for &(i, j) in object.mesh().edges() {
                        match projection.project_segment(to_view(verts[i]), to_view(verts[j])) {
                            Some((p, q)) => {
                                surface.draw_line(pen, to_raster(p), to_raster(q));
                                drawn += 1;
                            }
                            None => clipped += 1,
                        }
                    }
                    if draw_axes {
                        let origin = object.transform().position();
                        for (dir, color) in [
                            (object.transform().forward(), AXIS_FORWARD),
                            (object.transform().up(), AXIS_UP),
                            (object.transform().right(), AXIS_RIGHT),
                        ] {
                            let tip = origin + dir * axis_length;
                            if let Some((p, q)) =
                                projection.project_segment(to_view(origin), to_view(tip))
                            {
                                surface.draw_line(color, to_raster(p), to_raster(q));
                            }
                        }
                    }
                }
                debug!("wireframe frame: {drawn} segments drawn, {clipped} clipped");
            }
            RenderMode::Solid => {
                let mut filled = 0usize;
                let mut culled = 0usize;
                let mut skipped = 0usize;
                for &handle in queue.iter() {
                    let Some(object) = scene.get(handle) else {
                        warn!("queued handle {handle:?} not in scene, skipping");
                        continue;
                    };
                    // Shading references the direction from the camera
                    // to the object; a camera-coincident object has no
                    // such direction and is skipped whole.
                    let Some(view_dir) =
                        (object.transform().position() - cam_pos).try_normalize()
                    else {
                        skipped += object.mesh().faces().len();
                        continue;
                    };
                    let verts = object.world_vertices();
                    for (fi, face) in object.mesh().faces().iter().enumerate() {
                        let Some(normal) = object.world_normals()[fi] else {
                            skipped += 1;
                            continue;
                        };
                        let dot = view_dir.dot(normal);
                        if !dot.is_finite() || dot >= 0.0 || dot.abs() < EPSILON {
                            culled += 1;
                            continue;
                        }
                        let shade = Color::greyscale((-dot * 255.0).clamp(0.0, 255.0) as u8);
                        let mut points = Vec::with_capacity(face.len());
                        let mut off_frustum = false;
                        for &vi in face {
                            match projection.project_point(to_view(verts[vi])) {
                                Some(p) => points.push(to_raster(p)),
                                None => {
                                    off_frustum = true;
                                    break;
                                }
                            }
                        }
                        if off_frustum {
                            skipped += 1;
                            continue;
                        }
                        surface.fill_polygon(shade, &points);
                        filled += 1;
                    }
                }
                debug!("solid frame: {filled} faces filled, {culled} culled, {skipped} skipped");
            }
        }

        Ok(surface.image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every draw call instead of rasterizing.
    #[derive(Default, Debug)]
    struct MockSurface {
        width: u32,
        height: u32,
        clears: Vec<Color>,
        lines: Vec<(Color, Vector2, Vector2)>,
        fills: Vec<(Color, Vec<Vector2>)>,
    }

    impl DrawSurface for MockSurface {
        type Image = ();

        fn create(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                ..Default::default()
            }
        }

        fn clear(&mut self, color: Color) {
            self.clears.push(color);
            self.lines.clear();
            self.fills.clear();
        }

        fn draw_line(&mut self, color: Color, from: Vector2, to: Vector2) {
            self.lines.push((color, from, to));
        }

        fn fill_polygon(&mut self, color: Color, points: &[Vector2]) {
            self.fills.push((color, points.to_vec()));
        }

        fn image(&self) -> &() {
            &()
        }
    }

    fn camera_at(position: Vector3) -> Camera<MockSurface> {
        let mut camera = Camera::new(800, 600, ViewParams::default()).unwrap();
        camera.transform_mut().set_position(position);
        camera
    }

    fn away_facing_plane() -> Mesh {
        // Triangle in the XY plane wound so its normal points +Z, away
        // from a camera on -Z.
        Mesh::with_derived_edges(
            "plane",
            vec![
                Vector3::new(-1.0, -1.0, 0.0),
                Vector3::new(1.0, -1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2]],
        )
        .unwrap()
    }

    #[test]
    fn wireframe_cube_draws_all_twelve_edges() {
        let mut scene = Scene::new();
        let cube = scene.insert(SceneObject::new(Mesh::cube()));
        let mut camera = camera_at(Vector3::new(0.0, 0.0, -10.0));
        camera.enqueue(cube);
        camera.render(&scene).unwrap();

        let surface = camera.surface();
        assert_eq!(surface.clears, vec![Color::BLACK]);
        assert_eq!(surface.lines.len(), 12);
        for (color, a, b) in &surface.lines {
            assert_eq!(*color, Color::WHITE);
            for p in [a, b] {
                assert!(p.is_finite());
                assert!((0.0..=800.0).contains(&p.x), "x out of frame: {}", p.x);
                assert!((0.0..=600.0).contains(&p.y), "y out of frame: {}", p.y);
            }
        }
    }

    #[test]
    fn object_beyond_far_clip_draws_nothing() {
        let mut scene = Scene::new();
        let cube = scene.insert(SceneObject::new(Mesh::cube()));
        scene
            .get_mut(cube)
            .unwrap()
            .set_position(Vector3::new(0.0, 0.0, 200.0));
        let mut camera = camera_at(Vector3::new(0.0, 0.0, -10.0));
        camera.enqueue(cube);
        camera.render(&scene).unwrap();
        assert!(camera.surface().lines.is_empty());
    }

    #[test]
    fn solid_mode_culls_an_away_facing_plane() {
        let mut scene = Scene::new();
        let plane = scene.insert(SceneObject::new(away_facing_plane()));
        let mut camera = camera_at(Vector3::new(0.0, 0.0, -10.0));
        camera.enqueue(plane);
        camera.set_mode(RenderMode::Solid);
        camera.render(&scene).unwrap();
        assert!(camera.surface().fills.is_empty());
    }

    #[test]
    fn solid_mode_fills_a_camera_facing_plane() {
        // Same plane, opposite winding: the normal now points at the
        // camera.
        let mesh = Mesh::with_derived_edges(
            "plane",
            vec![
                Vector3::new(-1.0, -1.0, 0.0),
                Vector3::new(1.0, -1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 2, 1]],
        )
        .unwrap();
        let mut scene = Scene::new();
        let plane = scene.insert(SceneObject::new(mesh));
        let mut camera = camera_at(Vector3::new(0.0, 0.0, -10.0));
        camera.enqueue(plane);
        camera.set_mode(RenderMode::Solid);
        camera.render(&scene).unwrap();

        let fills = &camera.surface().fills;
        assert_eq!(fills.len(), 1);
        // Head-on face: full brightness.
        assert_eq!(fills[0].0, Color::greyscale(255));
        assert_eq!(fills[0].1.len(), 3);
    }

    #[test]
    fn solid_cube_fills_only_the_facing_side() {
        // Head-on, only the near face survives: the far face is
        // back-facing and the four side faces are edge-on (dot = 0).
        let mut scene = Scene::new();
        let cube = scene.insert(SceneObject::new(Mesh::cube()));
        let mut camera = camera_at(Vector3::new(0.0, 0.0, -10.0));
        camera.enqueue(cube);
        camera.set_mode(RenderMode::Solid);
        camera.render(&scene).unwrap();
        assert_eq!(camera.surface().fills.len(), 1);
    }

    #[test]
    fn zero_dimensions_fail_construction() {
        let err = Camera::<MockSurface>::new(0, 0, ViewParams::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn orthographic_solid_rendering_is_refused() {
        let mut scene = Scene::new();
        let cube = scene.insert(SceneObject::new(Mesh::cube()));
        let mut camera = camera_at(Vector3::new(0.0, 0.0, -10.0));
        camera.enqueue(cube);
        camera.set_mode(RenderMode::Solid);
        camera.set_orthographic(true).unwrap();
        let err = camera.render(&scene).unwrap_err();
        assert!(matches!(err, Error::NotSupported(_)));
        // Refused before any draw call.
        assert!(camera.surface().clears.is_empty());
    }

    #[test]
    fn selected_objects_use_the_highlight_pen() {
        let mut scene = Scene::new();
        let cube = scene.insert(SceneObject::new(Mesh::cube()));
        scene.get_mut(cube).unwrap().selected = true;
        let mut camera = camera_at(Vector3::new(0.0, 0.0, -10.0));
        camera.enqueue(cube);
        camera.render(&scene).unwrap();
        assert!(camera
            .surface()
            .lines
            .iter()
            .all(|(color, _, _)| *color == Color::YELLOW));
    }

    #[test]
    fn axis_gizmos_add_three_colored_segments() {
        let mut scene = Scene::new();
        let cube = scene.insert(SceneObject::new(Mesh::cube()));
        let mut camera = camera_at(Vector3::new(0.0, 0.0, -10.0));
        camera.enqueue(cube);
        camera.draw_axes = true;
        camera.render(&scene).unwrap();

        let lines = &camera.surface().lines;
        assert_eq!(lines.len(), 15);
        let tail: Vec<Color> = lines[12..].iter().map(|(c, _, _)| *c).collect();
        assert_eq!(tail, vec![Color::BLUE, Color::GREEN, Color::RED]);
    }

    #[test]
    fn stale_handle_is_skipped_without_panic() {
        let mut other = Scene::new();
        other.insert(SceneObject::new(Mesh::cube()));
        let stale = other.insert(SceneObject::new(Mesh::cube()));

        let scene = Scene::new();
        let mut camera = camera_at(Vector3::new(0.0, 0.0, -10.0));
        camera.enqueue(stale);
        camera.render(&scene).unwrap();
        assert!(camera.surface().lines.is_empty());
    }

    #[test]
    fn viewport_mutation_rebuilds_surface_and_keeps_old_state_on_error() {
        let mut camera =
            Camera::<MockSurface>::new(800, 600, ViewParams::default()).unwrap();
        camera.set_viewport(1024, 768).unwrap();
        assert_eq!(camera.width(), 1024);
        assert_eq!(camera.surface().width, 1024);

        let err = camera.set_viewport(0, 768).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert_eq!(camera.width(), 1024);
        assert_eq!(camera.surface().width, 1024);

        assert!(camera.set_clip(5.0, 1.0).is_err());
        assert_eq!(camera.view_params().near, 0.1);
    }

    #[test]
    fn a_camera_can_render_another_cameras_gizmo() {
        let mut subject =
            Camera::<MockSurface>::new(320, 200, ViewParams::default()).unwrap();
        subject.transform_mut().set_position(Vector3::new(0.0, 0.0, 5.0));

        let mut scene = Scene::new();
        let gizmo = scene.insert(subject.scene_object());
        let mut observer = camera_at(Vector3::new(0.0, 0.0, -10.0));
        observer.enqueue(gizmo);
        observer.render(&scene).unwrap();
        // Frustum gizmo: 8 edges, all in view.
        assert_eq!(observer.surface().lines.len(), 8);
    }
}
