//! Small triangle meshes with a world transform.
//!
//! World space is right-handed with y up: map x becomes world x and map y becomes
//! world z. Meshes are built in object space with their base on y = 0 and are
//! placed by scaling, rotating about the y axis, then translating to the owner's
//! map position.
//!
//! Canonical shapes are generated procedurally and kept within
//! `MAX_TRIANGLES_PER_SPRITE`:
//!
//! | Shape | Parts | Triangles |
//! |-------|-------|-----------|
//! | Humanoid | head, torso, two arms, two legs (stacked boxes) | 48 |
//! | Tree | trunk box plus canopy box | 16 |
//! | House | walls box plus roof prism | 16 |
//! | Pillar | 6-sided shaft, base and capital rings | 28 |
//!
//! Boxes only carry their four side faces; tops and bottoms are never visible from
//! a camera at eye height on a flat floor.

use std::f32::consts::PI;

use arrayvec::ArrayVec;
use log::trace;

use free_roam_types::{Sprite3DType, Vector, MAX_TRIANGLES_PER_SPRITE};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vertex3D {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn scale(&self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Rotate about the y axis.
    pub fn rotate_y(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.z * sin, self.y, self.x * sin + self.z * cos)
    }

    pub fn translate(&self, dx: f32, dy: f32, dz: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub fn sub(&self, other: &Vertex3D) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn cross(&self, other: &Vertex3D) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn dot(&self, other: &Vertex3D) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

/// Three vertices wound counter-clockwise when seen from outside the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Triangle3D {
    pub vertices: [Vertex3D; 3],
}

impl Triangle3D {
    pub const fn new(a: Vertex3D, b: Vertex3D, c: Vertex3D) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    pub fn center(&self) -> Vertex3D {
        let [a, b, c] = self.vertices;
        Vertex3D::new(
            (a.x + b.x + c.x) / 3.0,
            (a.y + b.y + c.y) / 3.0,
            (a.z + b.z + c.z) / 3.0,
        )
    }

    /// Outward face normal (not normalized).
    pub fn normal(&self) -> Vertex3D {
        let [a, b, c] = self.vertices;
        b.sub(&a).cross(&c.sub(&a))
    }

    /// Back-face test against a camera at map position `camera` and eye height
    /// `camera_height`.
    pub fn is_facing(&self, camera: Vector, camera_height: f32) -> bool {
        let center = self.center();
        let to_camera = Vertex3D::new(camera.x - center.x, camera_height - center.y, camera.y - center.z);
        self.normal().dot(&to_camera) > 0.0
    }

    fn map(&self, f: impl Fn(&Vertex3D) -> Vertex3D) -> Self {
        let [a, b, c] = self.vertices;
        Self::new(f(&a), f(&b), f(&c))
    }
}

/// A mesh plus the transform placing it in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite3D {
    triangles: ArrayVec<Triangle3D, MAX_TRIANGLES_PER_SPRITE>,
    position: Vector,
    rotation_y: f32,
    scale: f32,
    kind: Sprite3DType,
    active: bool,
}

impl Default for Sprite3D {
    fn default() -> Self {
        Self::new()
    }
}

impl Sprite3D {
    /// An empty custom mesh at the origin.
    pub fn new() -> Self {
        Self {
            triangles: ArrayVec::new(),
            position: Vector::ZERO,
            rotation_y: 0.0,
            scale: 1.0,
            kind: Sprite3DType::Custom,
            active: false,
        }
    }

    pub fn humanoid(position: Vector, height: f32, rotation: f32) -> Self {
        let mut sprite = Self::placed(Sprite3DType::Humanoid, position, rotation);
        sprite.create_humanoid(height);
        sprite
    }

    pub fn tree(position: Vector, height: f32) -> Self {
        let mut sprite = Self::placed(Sprite3DType::Tree, position, 0.0);
        sprite.create_tree(height);
        sprite
    }

    pub fn house(position: Vector, width: f32, height: f32, rotation: f32) -> Self {
        let mut sprite = Self::placed(Sprite3DType::House, position, rotation);
        sprite.create_house(width, height);
        sprite
    }

    pub fn pillar(position: Vector, height: f32, radius: f32) -> Self {
        let mut sprite = Self::placed(Sprite3DType::Pillar, position, 0.0);
        sprite.create_pillar(height, radius);
        sprite
    }

    fn placed(kind: Sprite3DType, position: Vector, rotation: f32) -> Self {
        Self {
            triangles: ArrayVec::new(),
            position,
            rotation_y: rotation,
            scale: 1.0,
            kind,
            active: true,
        }
    }

    pub fn kind(&self) -> Sprite3DType {
        self.kind
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn set_position(&mut self, position: Vector) {
        self.position = position;
    }

    pub fn rotation(&self) -> f32 {
        self.rotation_y
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation_y = rotation;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn triangles(&self) -> &[Triangle3D] {
        &self.triangles
    }

    /// Append a triangle. Returns false once the mesh budget is used up.
    pub fn add_triangle(&mut self, triangle: Triangle3D) -> bool {
        if self.triangles.try_push(triangle).is_err() {
            trace!("sprite3d {:?}: triangle budget exhausted", self.kind);
            return false;
        }
        true
    }

    pub fn clear_triangles(&mut self) {
        self.triangles.clear();
    }

    /// Triangle `index` in world space: scaled, rotated about y, then translated to
    /// the sprite position.
    pub fn world_triangle(&self, index: usize) -> Option<Triangle3D> {
        let triangle = self.triangles.get(index)?;
        Some(triangle.map(|v| {
            v.scale(self.scale)
                .rotate_y(self.rotation_y)
                .translate(self.position.x, 0.0, self.position.y)
        }))
    }

    /// All world-space triangles facing a camera at `camera`/`camera_height`.
    pub fn visible_triangles(
        &self,
        camera: Vector,
        camera_height: f32,
    ) -> impl Iterator<Item = Triangle3D> + '_ {
        (0..self.triangles.len())
            .filter_map(move |i| self.world_triangle(i))
            .filter(move |t| t.is_facing(camera, camera_height))
    }

    pub fn create_humanoid(&mut self, height: f32) {
        self.clear_triangles();
        self.kind = Sprite3DType::Humanoid;

        let head = height * 0.12;
        let torso_width = height * 0.20;
        let torso_height = height * 0.35;
        let leg_height = height * 0.45;
        let arm_length = height * 0.25;

        self.add_box(0.0, height - head, 0.0, head * 2.0, head * 2.0, head * 1.5);
        self.add_box(
            0.0,
            leg_height + torso_height / 2.0,
            0.0,
            torso_width,
            torso_height,
            torso_width * 0.8,
        );

        let arm_width = torso_width * 0.35;
        let arm_y = leg_height + torso_height - arm_length / 2.0;
        self.add_box(-torso_width * 0.8, arm_y, 0.0, arm_width, arm_length, arm_width);
        self.add_box(torso_width * 0.8, arm_y, 0.0, arm_width, arm_length, arm_width);

        let leg_width = torso_width * 0.45;
        self.add_box(-leg_width * 0.7, leg_height / 2.0, 0.0, leg_width, leg_height, leg_width);
        self.add_box(leg_width * 0.7, leg_height / 2.0, 0.0, leg_width, leg_height, leg_width);
    }

    pub fn create_tree(&mut self, height: f32) {
        self.clear_triangles();
        self.kind = Sprite3DType::Tree;

        let trunk_width = height * 0.18;
        let trunk_height = height * 0.4;
        let crown_width = height * 0.65;
        let crown_height = height * 0.6;

        self.add_box(0.0, trunk_height / 2.0, 0.0, trunk_width, trunk_height, trunk_width);
        self.add_box(
            0.0,
            trunk_height + crown_height / 2.0,
            0.0,
            crown_width,
            crown_height,
            crown_width,
        );
    }

    pub fn create_house(&mut self, width: f32, height: f32) {
        self.clear_triangles();
        self.kind = Sprite3DType::House;

        let wall_height = height * 0.7;
        let roof_height = height * 0.3;
        let house_width = width * 1.3;
        let house_depth = width * 1.1;

        self.add_box(0.0, wall_height / 2.0, 0.0, house_width, wall_height, house_depth);
        self.add_prism(
            0.0,
            wall_height + roof_height / 2.0,
            0.0,
            house_width,
            roof_height,
            house_depth,
        );
    }

    pub fn create_pillar(&mut self, height: f32, radius: f32) {
        self.clear_triangles();
        self.kind = Sprite3DType::Pillar;

        let r = radius * 1.5;
        self.add_cylinder(0.0, height / 2.0, 0.0, r, height, 6);
        self.add_cylinder(0.0, r * 0.4, 0.0, r * 1.4, r * 0.8, 4);
        self.add_cylinder(0.0, height - r * 0.4, 0.0, r * 1.4, r * 0.8, 4);
    }

    /// Four side faces of an axis-aligned box centred on `(x, y, z)`.
    pub fn add_box(&mut self, x: f32, y: f32, z: f32, width: f32, height: f32, depth: f32) {
        let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);
        let v = Vertex3D::new;

        // front (+z)
        self.add_quad(
            v(x - hw, y - hh, z + hd),
            v(x + hw, y - hh, z + hd),
            v(x + hw, y + hh, z + hd),
            v(x - hw, y + hh, z + hd),
        );
        // back (-z)
        self.add_quad(
            v(x + hw, y - hh, z - hd),
            v(x - hw, y - hh, z - hd),
            v(x - hw, y + hh, z - hd),
            v(x + hw, y + hh, z - hd),
        );
        // right (+x)
        self.add_quad(
            v(x + hw, y - hh, z + hd),
            v(x + hw, y - hh, z - hd),
            v(x + hw, y + hh, z - hd),
            v(x + hw, y + hh, z + hd),
        );
        // left (-x)
        self.add_quad(
            v(x - hw, y - hh, z - hd),
            v(x - hw, y - hh, z + hd),
            v(x - hw, y + hh, z + hd),
            v(x - hw, y + hh, z - hd),
        );
    }

    /// Side faces of a vertical cylinder, at most 6 segments.
    pub fn add_cylinder(&mut self, x: f32, y: f32, z: f32, radius: f32, height: f32, segments: u8) {
        let segments = segments.clamp(3, 6);
        let hh = height * 0.5;
        for i in 0..segments {
            let a1 = i as f32 * 2.0 * PI / segments as f32;
            let a2 = (i + 1) as f32 * 2.0 * PI / segments as f32;
            let (x1, z1) = (x + radius * a1.cos(), z + radius * a1.sin());
            let (x2, z2) = (x + radius * a2.cos(), z + radius * a2.sin());
            // wound from the second edge back to the first to face outwards
            self.add_quad(
                Vertex3D::new(x2, y - hh, z2),
                Vertex3D::new(x1, y - hh, z1),
                Vertex3D::new(x1, y + hh, z1),
                Vertex3D::new(x2, y + hh, z2),
            );
        }
    }

    /// A roof-shaped prism with its ridge along z.
    pub fn add_prism(&mut self, x: f32, y: f32, z: f32, width: f32, height: f32, depth: f32) {
        let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);
        let v = Vertex3D::new;

        // gable ends
        self.add_triangle(Triangle3D::new(
            v(x - hw, y - hh, z + hd),
            v(x + hw, y - hh, z + hd),
            v(x, y + hh, z + hd),
        ));
        self.add_triangle(Triangle3D::new(
            v(x + hw, y - hh, z - hd),
            v(x - hw, y - hh, z - hd),
            v(x, y + hh, z - hd),
        ));
        // bottom
        self.add_quad(
            v(x - hw, y - hh, z - hd),
            v(x + hw, y - hh, z - hd),
            v(x + hw, y - hh, z + hd),
            v(x - hw, y - hh, z + hd),
        );
        // slopes
        self.add_quad(
            v(x - hw, y - hh, z - hd),
            v(x - hw, y - hh, z + hd),
            v(x, y + hh, z + hd),
            v(x, y + hh, z - hd),
        );
        self.add_quad(
            v(x + hw, y - hh, z + hd),
            v(x + hw, y - hh, z - hd),
            v(x, y + hh, z - hd),
            v(x, y + hh, z + hd),
        );
    }

    fn add_quad(&mut self, a: Vertex3D, b: Vertex3D, c: Vertex3D, d: Vertex3D) {
        self.add_triangle(Triangle3D::new(a, b, c));
        self.add_triangle(Triangle3D::new(a, c, d));
    }
}
