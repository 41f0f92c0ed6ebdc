use glam::{DMat4, DVec4, Vec3};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Lighting, Scene, Surface, Triangle};
use crate::state::{Camera, CameraLimits};

pub const CLEAR_COLOR: &str = "#000000";

/// A triangle in canvas pixels, ready to fill.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenTriangle {
    pub points: [(f64, f64); 3],
    /// Mean NDC depth, 0 at the near plane, 1 at the far plane.
    pub depth: f64,
    pub fill: String,
}

fn css_rgb(color: [f32; 3], brightness: f32) -> String {
    let [r, g, b] = color.map(|c| ((c * brightness).clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("rgb({},{},{})", r, g, b)
}

fn to_screen(vp: &DMat4, v: Vec3, width: f64, height: f64) -> Option<((f64, f64), f64)> {
    let clip = *vp * DVec4::new(f64::from(v.x), f64::from(v.y), f64::from(v.z), 1.0);
    // Depth range is [0, w]; anything outside lies behind the near plane or past far.
    if clip.w <= 0.0 || clip.z < 0.0 || clip.z > clip.w {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    let sx = (ndc.x * 0.5 + 0.5) * width;
    let sy = (1.0 - (ndc.y * 0.5 + 0.5)) * height;
    Some(((sx, sy), ndc.z))
}

fn project(
    vp: &DMat4,
    tri: &Triangle,
    fill: String,
    width: f64,
    height: f64,
) -> Option<ScreenTriangle> {
    let [a, b, c] = tri.vertices;
    let (pa, za) = to_screen(vp, a, width, height)?;
    let (pb, zb) = to_screen(vp, b, width, height)?;
    let (pc, zc) = to_screen(vp, c, width, height)?;
    Some(ScreenTriangle {
        points: [pa, pb, pc],
        depth: (za + zb + zc) / 3.0,
        fill,
    })
}

/// Projects the whole scene and orders it back to front for painting.
/// Triangles crossing the near or far plane are dropped.
pub fn project_scene(
    scene: &Scene,
    camera: &Camera,
    limits: &CameraLimits,
    width: f64,
    height: f64,
) -> Vec<ScreenTriangle> {
    let vp = camera.view_projection(limits);
    let lighting: &Lighting = &scene.lighting;
    let ground = scene
        .ground
        .iter()
        .filter_map(|t| project(&vp, t, css_rgb(t.color, 1.0), width, height));
    let model = scene.model.iter().filter_map(|t| {
        let fill = css_rgb(t.color, lighting.shade(t.normal()));
        project(&vp, t, fill, width, height)
    });
    let mut out: Vec<ScreenTriangle> = ground.chain(model).collect();
    out.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    out
}

/// Software renderer onto a 2D canvas context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }

    pub fn aspect(&self) -> f64 {
        let h = self.canvas.height().max(1) as f64;
        self.canvas.width() as f64 / h
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

impl Surface for CanvasSurface {
    fn present(&mut self, scene: &Scene, camera: &Camera, limits: &CameraLimits) {
        if !self.canvas.is_connected() {
            return;
        }
        let ctx = match self
            .canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        {
            Some(c) => c,
            None => return,
        };
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        ctx.set_fill_style_str(CLEAR_COLOR);
        ctx.fill_rect(0.0, 0.0, w, h);
        ctx.set_line_width(0.5);
        for tri in project_scene(scene, camera, limits, w, h) {
            let [(x0, y0), (x1, y1), (x2, y2)] = tri.points;
            ctx.begin_path();
            ctx.move_to(x0, y0);
            ctx.line_to(x1, y1);
            ctx.line_to(x2, y2);
            ctx.close_path();
            ctx.set_fill_style_str(&tri.fill);
            ctx.fill();
            // Hairline in the same colour hides seams between neighbours.
            ctx.set_stroke_style_str(&tri.fill);
            ctx.stroke();
        }
    }
}
