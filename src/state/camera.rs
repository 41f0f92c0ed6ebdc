use glam::{DMat4, DVec3};
use serde::Deserialize;

use crate::model::Direction;

/// Zoom range, pan bounds and projection parameters for the map camera.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraLimits {
    pub default_position: [f64; 3],
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_speed: f64,
    pub pan_step: f64,
    /// Camera z below this value counts as zoomed in.
    pub zoomed_in_below: f64,
    pub max_left: f64,
    pub max_right: f64,
    pub zoomed_max_left: f64,
    pub zoomed_max_right: f64,
    /// Vertical pan reach, only available while zoomed in.
    pub max_vertical: f64,
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self {
            default_position: [0.0, 0.0, 15.0],
            min_zoom: 7.0,
            max_zoom: 15.0,
            zoom_speed: 0.002,
            pan_step: 0.2,
            zoomed_in_below: 10.5,
            max_left: 0.5,
            max_right: 0.5,
            zoomed_max_left: 3.0,
            zoomed_max_right: 3.0,
            max_vertical: 1.0,
            fov_y_deg: 50.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraLimits {
    pub fn is_zoomed_in(&self, z: f64) -> bool {
        z < self.zoomed_in_below
    }

    /// Horizontal pan range `(-left, right)` for the given camera z.
    pub fn horizontal_bounds(&self, z: f64) -> (f64, f64) {
        if self.is_zoomed_in(z) {
            (-self.zoomed_max_left, self.zoomed_max_right)
        } else {
            (-self.max_left, self.max_right)
        }
    }

    /// Vertical pan range; collapses to zero when zoomed out.
    pub fn vertical_bounds(&self, z: f64) -> (f64, f64) {
        if self.is_zoomed_in(z) {
            (-self.max_vertical, self.max_vertical)
        } else {
            (0.0, 0.0)
        }
    }
}

/// Perspective camera that always faces -z; only its position moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub aspect: f64,
}

impl Camera {
    pub fn new(limits: &CameraLimits) -> Self {
        let [x, y, z] = limits.default_position;
        Self {
            x,
            y,
            z,
            aspect: 1.0,
        }
    }

    pub fn position(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn reset(&mut self, limits: &CameraLimits) {
        let [x, y, z] = limits.default_position;
        self.x = x;
        self.y = y;
        self.z = z;
    }

    /// Moves along z by `delta * zoom_speed`; positive wheel deltas move closer.
    /// Returns whether z changed.
    pub fn zoom(&mut self, delta: f64, limits: &CameraLimits) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let next = (self.z - delta * limits.zoom_speed).clamp(limits.min_zoom, limits.max_zoom);
        let changed = next != self.z;
        self.z = next;
        changed
    }

    /// One pan step towards `dir`. A step is taken only while the coordinate is
    /// strictly inside the bound on that side, and lands no further than the bound.
    /// Vertical steps need the camera zoomed in. Returns false when blocked.
    pub fn pan(&mut self, dir: Direction, limits: &CameraLimits) -> bool {
        if dir.is_vertical() && !limits.is_zoomed_in(self.z) {
            return false;
        }
        let step = limits.pan_step;
        let (lo, hi) = if dir.is_vertical() {
            limits.vertical_bounds(self.z)
        } else {
            limits.horizontal_bounds(self.z)
        };
        let coord = if dir.is_vertical() {
            &mut self.y
        } else {
            &mut self.x
        };
        match dir {
            Direction::Left | Direction::Down if *coord > lo => {
                *coord = (*coord - step).max(lo);
                true
            }
            Direction::Right | Direction::Up if *coord < hi => {
                *coord = (*coord + step).min(hi);
                true
            }
            _ => false,
        }
    }

    /// Places the camera 2r in front of a bounding sphere, then pulls the result
    /// back inside the zoom range and pan bounds.
    pub fn frame_sphere(&mut self, center: DVec3, radius: f64, limits: &CameraLimits) {
        self.z = (center.z + radius * 2.0).clamp(limits.min_zoom, limits.max_zoom);
        let (left, right) = limits.horizontal_bounds(self.z);
        let (down, up) = limits.vertical_bounds(self.z);
        self.x = center.x.clamp(left, right);
        self.y = center.y.clamp(down, up);
    }

    pub fn view(&self) -> DMat4 {
        DMat4::look_to_rh(self.position(), DVec3::NEG_Z, DVec3::Y)
    }

    pub fn projection(&self, limits: &CameraLimits) -> DMat4 {
        DMat4::perspective_rh(
            limits.fov_y_deg.to_radians(),
            self.aspect.max(1e-6),
            limits.near,
            limits.far,
        )
    }

    pub fn view_projection(&self, limits: &CameraLimits) -> DMat4 {
        self.projection(limits) * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn limits() -> CameraLimits {
        CameraLimits::default()
    }

    #[test]
    fn starts_at_default_position() {
        let cam = Camera::new(&limits());
        assert_eq!((cam.x, cam.y, cam.z), (0.0, 0.0, 15.0));
    }

    #[test]
    fn non_finite_wheel_delta_is_ignored() {
        let l = limits();
        let mut cam = Camera::new(&l);
        assert!(!cam.zoom(f64::NAN, &l));
        assert!(!cam.zoom(f64::INFINITY, &l));
        assert_eq!(cam.z, l.max_zoom);
    }

    #[test]
    fn positive_wheel_delta_moves_closer() {
        let l = limits();
        let mut cam = Camera::new(&l);
        assert!(cam.zoom(500.0, &l));
        assert!((cam.z - 14.0).abs() < 1e-9);
        // Already at max: scrolling out is a no-op.
        let mut far = Camera::new(&l);
        assert!(!far.zoom(-100.0, &l));
        assert_eq!(far.z, l.max_zoom);
    }

    #[test]
    fn zoomed_out_pan_respects_narrow_bound() {
        let l = limits();
        let mut cam = Camera::new(&l);
        let mut steps = 0;
        while cam.pan(Direction::Left, &l) {
            steps += 1;
            assert!(cam.x >= -l.max_left);
        }
        assert_eq!(cam.x, -l.max_left);
        assert_eq!(steps, 3);
        assert!(!cam.pan(Direction::Left, &l));
    }

    #[test]
    fn zoomed_in_pan_reaches_wider_bound() {
        let l = limits();
        let mut cam = Camera::new(&l);
        cam.zoom(3000.0, &l);
        assert!(l.is_zoomed_in(cam.z));
        while cam.pan(Direction::Right, &l) {}
        assert!((cam.x - l.zoomed_max_right).abs() < 1e-9);
        while cam.pan(Direction::Up, &l) {}
        assert!((cam.y - l.max_vertical).abs() < 1e-9);
        while cam.pan(Direction::Down, &l) {}
        assert!((cam.y + l.max_vertical).abs() < 1e-9);
    }

    #[test]
    fn vertical_pan_blocked_when_zoomed_out() {
        let l = limits();
        let mut cam = Camera::new(&l);
        assert!(!cam.pan(Direction::Up, &l));
        assert!(!cam.pan(Direction::Down, &l));
        assert_eq!(cam.y, 0.0);
    }

    #[test]
    fn vertical_offset_is_frozen_after_zooming_out() {
        let l = limits();
        let mut cam = Camera::new(&l);
        cam.zoom(3000.0, &l);
        while cam.pan(Direction::Down, &l) {}
        assert_eq!(cam.y, -l.max_vertical);
        cam.zoom(-3000.0, &l);
        assert!(!l.is_zoomed_in(cam.z));
        assert!(!cam.pan(Direction::Up, &l));
        assert!(!cam.pan(Direction::Down, &l));
        assert_eq!(cam.y, -l.max_vertical);
    }

    #[test]
    fn reset_restores_default_from_anywhere() {
        let l = limits();
        let mut cam = Camera::new(&l);
        cam.zoom(4000.0, &l);
        for _ in 0..10 {
            cam.pan(Direction::Left, &l);
            cam.pan(Direction::Up, &l);
        }
        cam.frame_sphere(DVec3::new(1.0, 2.0, 3.0), 10.0, &l);
        cam.reset(&l);
        assert_eq!((cam.x, cam.y, cam.z), (0.0, 0.0, 15.0));
    }

    #[test]
    fn frame_sphere_sits_two_radii_out_and_stays_in_range() {
        let l = limits();
        let mut cam = Camera::new(&l);
        cam.frame_sphere(DVec3::new(0.2, 0.0, 0.5), 4.0, &l);
        assert!((cam.z - 8.5).abs() < 1e-9);
        assert!((cam.x - 0.2).abs() < 1e-9);
        cam.frame_sphere(DVec3::new(9.0, -9.0, 0.0), 40.0, &l);
        assert_eq!(cam.z, l.max_zoom);
        assert_eq!(cam.x, l.max_right);
        assert_eq!(cam.y, 0.0);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let l = limits();
        let mut cam = Camera::new(&l);
        cam.aspect = 16.0 / 9.0;
        let clip = cam.view_projection(&l) * glam::DVec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-9 && ndc.y.abs() < 1e-9);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[derive(Debug, Clone, Copy)]
    enum Command {
        Zoom(f64),
        Pan(Direction),
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    fn command() -> impl Strategy<Value = Command> {
        prop_oneof![
            (-5000.0f64..5000.0).prop_map(Command::Zoom),
            direction().prop_map(Command::Pan),
        ]
    }

    proptest! {
        #[test]
        fn zoom_never_leaves_range(deltas in proptest::collection::vec(-1.0e6f64..1.0e6, 1..64)) {
            let l = limits();
            let mut cam = Camera::new(&l);
            for d in deltas {
                cam.zoom(d, &l);
                prop_assert!(cam.z >= l.min_zoom && cam.z <= l.max_zoom, "z={}", cam.z);
            }
        }

        #[test]
        fn pan_respects_bound_active_at_each_step(commands in proptest::collection::vec(command(), 1..128)) {
            let l = limits();
            let mut cam = Camera::new(&l);
            for cmd in commands {
                match cmd {
                    Command::Zoom(d) => {
                        cam.zoom(d, &l);
                    }
                    Command::Pan(dir) => {
                        let zoomed_in = l.is_zoomed_in(cam.z);
                        let (lo, hi) = if dir.is_vertical() {
                            l.vertical_bounds(cam.z)
                        } else {
                            l.horizontal_bounds(cam.z)
                        };
                        let (x0, y0) = (cam.x, cam.y);
                        let before = if dir.is_vertical() { y0 } else { x0 };
                        cam.pan(dir, &l);
                        let after = if dir.is_vertical() { cam.y } else { cam.x };

                        if dir.is_vertical() {
                            prop_assert_eq!(cam.x, x0);
                            if !zoomed_in {
                                prop_assert_eq!(cam.y, y0);
                                continue;
                            }
                        } else {
                            prop_assert_eq!(cam.y, y0);
                        }
                        if before >= lo && before <= hi {
                            prop_assert!(after >= lo && after <= hi, "{after} left [{lo}, {hi}]");
                        } else {
                            // Outside the active bound: never step further out.
                            let gap = |v: f64| (lo - v).max(v - hi).max(0.0);
                            prop_assert!(gap(after) <= gap(before) + 1e-12);
                        }
                    }
                }
            }
        }
    }
}
