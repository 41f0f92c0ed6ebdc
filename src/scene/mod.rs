//! Scene graph and the camera controller that owns it.
//!
//! The scene is flat: a ground plane, an optional model that has
//! already been baked into world-space triangles, and two lights. Every
//! camera-changing operation on [`SceneController`] ends with a redraw through
//! its [`Surface`].

pub mod canvas;
pub mod gltf;
pub mod loader;

use glam::{DVec3, EulerRot, Mat4, Quat, Vec3};
use serde::Deserialize;

use crate::error::{display_chain, ViewerError};
use crate::model::Direction;
use crate::state::{Camera, CameraLimits};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
    /// Linear RGB in [0, 1].
    pub color: [f32; 3],
}

impl Triangle {
    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a).normalize_or_zero()
    }

    fn transformed(&self, m: &Mat4) -> Self {
        Self {
            vertices: self.vertices.map(|v| m.transform_point3(v)),
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (min, max) = it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Sphere through the box corners: box center, half the diagonal.
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        (self.center(), (self.max - self.min).length() * 0.5)
    }
}

/// Triangles of a loaded model, before placement into the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGeometry {
    pub triangles: Vec<Triangle>,
    pub mesh_count: usize,
}

/// Rigid placement applied to the model when it enters the scene.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelPlacement {
    /// XYZ Euler angles in radians.
    pub rotation: [f32; 3],
    pub scale: f32,
    pub position: [f32; 3],
}

impl Default for ModelPlacement {
    fn default() -> Self {
        Self {
            rotation: [1.55, 3.14, 0.0],
            scale: 0.25,
            position: [0.0, 0.0, 0.0],
        }
    }
}

impl ModelPlacement {
    pub fn matrix(&self) -> Mat4 {
        let [rx, ry, rz] = self.rotation;
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, rx, ry, rz),
            Vec3::from_array(self.position),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    pub directional: f32,
    /// Unit vector pointing from the surface towards the light.
    pub direction: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: 0.5,
            directional: 0.5,
            direction: Vec3::Y,
        }
    }
}

impl Lighting {
    /// Brightness factor for a face; faces are lit from either side.
    pub fn shade(&self, normal: Vec3) -> f32 {
        (self.ambient + self.directional * normal.dot(self.direction).abs()).min(1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Unlit backdrop drawn under the model.
    pub ground: Vec<Triangle>,
    pub model: Vec<Triangle>,
    pub model_bounds: Option<Aabb>,
    pub lighting: Lighting,
}

pub const GROUND_SIZE: (f32, f32) = (15.0, 10.0);
pub const GROUND_COLOR: [f32; 3] = [0.0, 1.0, 0.0];

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let (w, h) = (GROUND_SIZE.0 * 0.5, GROUND_SIZE.1 * 0.5);
        let corners = [
            Vec3::new(-w, -h, 0.0),
            Vec3::new(w, -h, 0.0),
            Vec3::new(w, h, 0.0),
            Vec3::new(-w, h, 0.0),
        ];
        let ground = vec![
            Triangle {
                vertices: [corners[0], corners[1], corners[2]],
                color: GROUND_COLOR,
            },
            Triangle {
                vertices: [corners[0], corners[2], corners[3]],
                color: GROUND_COLOR,
            },
        ];
        Self {
            ground,
            model: Vec::new(),
            model_bounds: None,
            lighting: Lighting::default(),
        }
    }

    /// Places the model in world space and records its bounds.
    pub fn set_model(&mut self, geometry: &ModelGeometry, placement: &ModelPlacement) {
        let m = placement.matrix();
        self.model = geometry
            .triangles
            .iter()
            .map(|t| t.transformed(&m))
            .collect();
        self.model_bounds = Aabb::from_points(self.model.iter().flat_map(|t| t.vertices));
    }
}

/// Something that can draw the scene as seen through the camera.
pub trait Surface {
    fn present(&mut self, scene: &Scene, camera: &Camera, limits: &CameraLimits);
}

pub struct SceneController<S: Surface> {
    scene: Scene,
    camera: Camera,
    limits: CameraLimits,
    placement: ModelPlacement,
    surface: S,
}

impl<S: Surface> SceneController<S> {
    pub fn new(limits: CameraLimits, placement: ModelPlacement, surface: S) -> Self {
        Self {
            scene: Scene::new(),
            camera: Camera::new(&limits),
            limits,
            placement,
            surface,
        }
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn redraw(&mut self) {
        self.surface
            .present(&self.scene, &self.camera, &self.limits);
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        if aspect.is_finite() && aspect > 0.0 {
            self.camera.aspect = aspect;
        }
        self.redraw();
    }

    pub fn reset(&mut self) {
        self.camera.reset(&self.limits);
        tracing::debug!("camera reset");
        self.redraw();
    }

    pub fn zoom(&mut self, delta: f64) {
        if self.camera.zoom(delta, &self.limits) {
            tracing::debug!(z = self.camera.z, "zoom");
        }
        self.redraw();
    }

    /// One pan step; returns false when the bound in `dir` is already reached.
    pub fn pan(&mut self, dir: Direction) -> bool {
        let moved = self.camera.pan(dir, &self.limits);
        if moved {
            tracing::debug!(?dir, x = self.camera.x, y = self.camera.y, "pan");
        }
        self.redraw();
        moved
    }

    pub fn on_model_loaded(&mut self, geometry: ModelGeometry) {
        self.scene.set_model(&geometry, &self.placement);
        tracing::info!(
            meshes = geometry.mesh_count,
            triangles = geometry.triangles.len(),
            "model loaded"
        );
        if let Some(bounds) = self.scene.model_bounds {
            let (center, radius) = bounds.bounding_sphere();
            self.camera
                .frame_sphere(center.as_dvec3(), f64::from(radius), &self.limits);
            let DVec3 { x, y, z } = self.camera.position();
            tracing::debug!(x, y, z, radius, "camera framed on model");
        }
        self.redraw();
    }

    pub fn on_model_failed(&mut self, err: &ViewerError) {
        tracing::error!("error loading model: {}", display_chain(err));
        self.redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSurface {
        frames: Vec<(f64, f64, f64, usize)>,
    }

    impl Surface for RecordingSurface {
        fn present(&mut self, scene: &Scene, camera: &Camera, _limits: &CameraLimits) {
            self.frames
                .push((camera.x, camera.y, camera.z, scene.model.len()));
        }
    }

    fn controller() -> SceneController<RecordingSurface> {
        SceneController::new(
            CameraLimits::default(),
            ModelPlacement::default(),
            RecordingSurface::default(),
        )
    }

    fn unit_quad() -> ModelGeometry {
        let c = [1.0, 1.0, 1.0];
        let p = [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ];
        ModelGeometry {
            triangles: vec![
                Triangle {
                    vertices: [p[0], p[1], p[2]],
                    color: c,
                },
                Triangle {
                    vertices: [p[0], p[2], p[3]],
                    color: c,
                },
            ],
            mesh_count: 1,
        }
    }

    #[test]
    fn every_operation_redraws() {
        let mut c = controller();
        c.zoom(100.0);
        c.pan(Direction::Left);
        c.pan(Direction::Up);
        c.reset();
        c.set_aspect(2.0);
        assert_eq!(c.surface_mut().frames.len(), 5);
        assert_eq!(c.surface_mut().frames.last(), Some(&(0.0, 0.0, 15.0, 0)));
    }

    #[test]
    fn reset_after_model_framing_returns_to_default() {
        let mut c = controller();
        c.on_model_loaded(unit_quad());
        c.zoom(-300.0);
        c.pan(Direction::Right);
        c.reset();
        let cam = &c.camera;
        assert_eq!((cam.x, cam.y, cam.z), (0.0, 0.0, 15.0));
    }

    #[test]
    fn model_load_frames_bounding_sphere() {
        let mut c = controller();
        c.on_model_loaded(unit_quad());
        assert!(!c.scene.model.is_empty());
        let bounds = c.scene.model_bounds.expect("bounds");
        let (center, radius) = bounds.bounding_sphere();
        let limits = CameraLimits::default();
        let expected_z =
            (f64::from(center.z) + 2.0 * f64::from(radius)).clamp(limits.min_zoom, limits.max_zoom);
        assert!((c.camera.z - expected_z).abs() < 1e-6);
        let last = *c.surface_mut().frames.last().expect("frame");
        assert_eq!(last.3, 2);
    }

    #[test]
    fn model_failure_keeps_default_framing() {
        let mut c = controller();
        c.on_model_failed(&ViewerError::EmptyModel);
        let cam = &c.camera;
        assert_eq!((cam.x, cam.y, cam.z), (0.0, 0.0, 15.0));
        assert!(c.scene.model.is_empty());
        assert_eq!(c.surface_mut().frames.len(), 1);
    }

    #[test]
    fn placement_scales_and_rotates_model() {
        let mut scene = Scene::new();
        scene.set_model(&unit_quad(), &ModelPlacement::default());
        let b = scene.model_bounds.expect("bounds");
        // Scaled by 0.25 and tipped about x by ~90°: the quad stands up along z.
        assert!((b.max.x - 0.25).abs() < 1e-2);
        assert!(b.max.y.abs() < 1e-2);
        assert!((b.max.z - 0.25).abs() < 1e-2);
    }

    #[test]
    fn aabb_sphere_spans_half_diagonal() {
        let b = Aabb::from_points([Vec3::ZERO, Vec3::new(2.0, 2.0, 1.0)]).expect("box");
        let (c, r) = b.bounding_sphere();
        assert_eq!(c, Vec3::new(1.0, 1.0, 0.5));
        assert!((r - 1.5).abs() < 1e-6);
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn shading_is_two_sided_and_capped() {
        let l = Lighting::default();
        assert_eq!(l.shade(Vec3::Y), 1.0);
        assert_eq!(l.shade(Vec3::NEG_Y), 1.0);
        assert!((l.shade(Vec3::X) - 0.5).abs() < 1e-6);
    }
}
