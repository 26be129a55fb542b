//! Perspective projection and scan conversion of 3D sprite meshes.
//!
//! Camera space uses the camera's facing as the depth axis and its perpendicular
//! `(-dir.y, dir.x)` as the right axis, which is the side the camera plane points
//! to. A vertex at depth `z` and lateral offset `x` lands at
//! `x / z * FOV_SCALE + width / 2`. `FOV_SCALE` is a fixed constant and does not
//! follow the camera plane, so meshes are drawn narrower than the wall sweep's
//! field of view would place them.

use std::cmp::Ordering;

use free_roam_types::{FOV_SCALE, NEAR_PLANE};

use crate::camera::{CameraParams, DEFAULT_FORWARD};
use crate::canvas::{Canvas, Color};
use crate::sprite3d::{Sprite3D, Vertex3D};

/// A projected vertex in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Project a world-space vertex for a `width`x`height` screen.
///
/// Returns `None` when the vertex sits at or behind the near plane. The result may
/// still be off-screen.
pub fn project_point(vertex: &Vertex3D, camera: &CameraParams, width: u16, height: u16) -> Option<ScreenPoint> {
    let forward = camera.direction.normalized().unwrap_or(DEFAULT_FORWARD);
    let right = forward.perpendicular();

    let dx = vertex.x - camera.position.x;
    let dz = vertex.z - camera.position.y;
    let dy = vertex.y - camera.height;

    let cam_x = dx * right.x + dz * right.y;
    let cam_z = dx * forward.x + dz * forward.y;
    if cam_z.is_nan() || cam_z <= NEAR_PLANE {
        return None;
    }

    Some(ScreenPoint::new(
        cam_x / cam_z * FOV_SCALE + width as f32 / 2.0,
        -dy / cam_z * FOV_SCALE + height as f32 / 2.0,
    ))
}

fn on_screen(p: &ScreenPoint, width: u16, height: u16) -> bool {
    p.x >= 0.0 && p.x < width as f32 && p.y >= 0.0 && p.y < height as f32
}

/// Fill a screen-space triangle with horizontal spans. Returns the number of
/// pixels written.
pub fn fill_triangle(canvas: &mut dyn Canvas, a: ScreenPoint, b: ScreenPoint, c: ScreenPoint) -> usize {
    let mut pts = [a, b, c];
    pts.sort_by(|p, q| p.y.partial_cmp(&q.y).unwrap_or(Ordering::Equal));
    let [p1, p2, p3] = pts;

    let (y1, y2, y3) = (p1.y as i32, p2.y as i32, p3.y as i32);
    if y1 == y3 {
        return 0;
    }

    let width = canvas.width() as i32;
    let height = canvas.height() as i32;
    let edge = |from: ScreenPoint, to: ScreenPoint, y_from: i32, y_to: i32, y: i32| {
        from.x + (to.x - from.x) * (y - y_from) as f32 / (y_to - y_from) as f32
    };

    let mut drawn = 0;
    for y in y1.max(0)..=y3.min(height - 1) {
        let long = edge(p1, p3, y1, y3, y);
        let short = if y < y2 {
            edge(p1, p2, y1, y2, y)
        } else if y3 != y2 {
            edge(p2, p3, y2, y3, y)
        } else {
            p2.x
        };

        let start_x = (long.min(short) as i32).max(0);
        let end_x = (long.max(short) as i32).min(width - 1);
        for x in start_x..=end_x {
            canvas.draw_pixel(x, y, Color::Black);
            drawn += 1;
        }
    }
    drawn
}

/// Draw every camera-facing triangle of `sprite`. A triangle with any vertex behind
/// the camera or off-screen is skipped whole. Returns the number of triangles
/// filled.
pub fn render_sprite(canvas: &mut dyn Canvas, sprite: &Sprite3D, camera: &CameraParams) -> usize {
    if !sprite.is_active() {
        return 0;
    }
    let (width, height) = (canvas.width(), canvas.height());

    let mut filled = 0;
    for triangle in sprite.visible_triangles(camera.position, camera.height) {
        let mut points = [ScreenPoint::new(0.0, 0.0); 3];
        let mut visible = true;
        for (slot, vertex) in points.iter_mut().zip(triangle.vertices.iter()) {
            match project_point(vertex, camera, width, height) {
                Some(p) if on_screen(&p, width, height) => *slot = p,
                _ => {
                    visible = false;
                    break;
                }
            }
        }
        if visible {
            fill_triangle(canvas, points[0], points[1], points[2]);
            filled += 1;
        }
    }
    filled
}
