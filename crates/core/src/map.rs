//! Tile grid, wall list and the raycasting sweep.
//!
//! The grid is `height` rows of `width` cells stored row-major in a flat vector.
//! Coordinates are `(x, y)` with x growing right and y growing down. Every query
//! outside `[0, width) x [0, height)` resolves to an empty, non-solid cell and every
//! write there is ignored, so callers never need to bounds-check first.
//!
//! # Raycasting
//!
//! [`DynamicMap::cast_ray`] marches a ray one cell at a time (DDA). Two running
//! accumulators hold the ray length at which the next vertical and horizontal grid
//! line is crossed; whichever is smaller advances. On a hit the distance reported is
//! the perpendicular distance to the camera plane, not the euclidean ray length,
//! which keeps straight walls straight on screen.
//!
//! [`DynamicMap::render`] sweeps every `RES_DIVIDER`th screen column and draws one
//! vertical slice per hit.

use log::{debug, warn};

use free_roam_types::{
    TileType, Vector, MAX_MAP_HEIGHT, MAX_MAP_WIDTH, MAX_RENDER_DEPTH, MAX_WALLS, RAY_EPSILON,
    RENDER_HEIGHT, RES_DIVIDER, SCREEN_HEIGHT,
};

use crate::canvas::{Canvas, Color};

/// Opacity returned by [`DynamicMap::get_block_at`] for walls and doors.
pub const BLOCK_SOLID: u8 = 0xF;

/// Opacity returned for everything else, including out-of-range cells.
pub const BLOCK_OPEN: u8 = 0x0;

/// An explicit wall segment recorded alongside the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub start: Vector,
    pub end: Vector,
    pub tile: TileType,
    pub height: u8,
    pub solid: bool,
}

/// Which family of grid lines a ray crossed last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSide {
    /// Crossed a vertical grid line (stepped along x).
    Vertical,
    /// Crossed a horizontal grid line (stepped along y).
    Horizontal,
}

/// Result of a single ray march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub cell_x: i32,
    pub cell_y: i32,
    pub side: HitSide,
    /// Distance along the camera's forward axis.
    pub distance: f32,
    /// Grid steps taken, including the one that hit.
    pub steps: u32,
}

/// A tile map that can be mutated while a level is being built.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicMap {
    name: String,
    width: u8,
    height: u8,
    tiles: Vec<TileType>,
    walls: Vec<Wall>,
    fill: bool,
}

impl DynamicMap {
    /// Create an empty map. Sizes are clamped to `MAX_MAP_WIDTH`/`MAX_MAP_HEIGHT`.
    pub fn new(name: impl Into<String>, width: u8, height: u8, add_border: bool, fill: bool) -> Self {
        let width = width.min(MAX_MAP_WIDTH);
        let height = height.min(MAX_MAP_HEIGHT);
        let mut map = Self {
            name: name.into(),
            width,
            height,
            tiles: vec![TileType::Empty; width as usize * height as usize],
            walls: Vec::new(),
            fill,
        };
        if add_border {
            map.add_border_walls();
        }
        map
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn fill(&self) -> bool {
        self.fill
    }

    pub fn set_fill(&mut self, fill: bool) {
        self.fill = fill;
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Tile at `(x, y)`; out of range reads as `Empty`.
    pub fn get_tile(&self, x: i32, y: i32) -> TileType {
        self.index(x, y)
            .map(|i| self.tiles[i])
            .unwrap_or(TileType::Empty)
    }

    /// Set the tile at `(x, y)`; out-of-range writes are ignored.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileType) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
        }
    }

    /// Opacity of a cell: [`BLOCK_SOLID`] for walls and doors, [`BLOCK_OPEN`] otherwise.
    pub fn get_block_at(&self, x: i32, y: i32) -> u8 {
        if self.get_tile(x, y).is_solid() {
            BLOCK_SOLID
        } else {
            BLOCK_OPEN
        }
    }

    /// Whether a world-space point lies in a solid cell.
    pub fn is_solid_at(&self, position: Vector) -> bool {
        let (x, y) = position.cell();
        self.get_block_at(x, y) == BLOCK_SOLID
    }

    /// Tile under a world-space point.
    pub fn tile_at(&self, position: Vector) -> TileType {
        let (x, y) = position.cell();
        self.get_tile(x, y)
    }

    /// Record an explicit wall segment. Ignored once `MAX_WALLS` are stored.
    pub fn add_wall(&mut self, start: Vector, end: Vector, tile: TileType, height: u8, solid: bool) {
        if self.walls.len() >= MAX_WALLS {
            warn!("map `{}`: wall list full, dropping wall", self.name);
            return;
        }
        self.walls.push(Wall {
            start,
            end,
            tile,
            height,
            solid,
        });
    }

    /// Set cells `x1..=x2` on row `y`.
    pub fn add_horizontal_wall(&mut self, x1: i32, x2: i32, y: i32, tile: TileType) {
        for x in x1.min(x2)..=x1.max(x2) {
            self.set_tile(x, y, tile);
        }
    }

    /// Set cells `y1..=y2` on column `x`.
    pub fn add_vertical_wall(&mut self, x: i32, y1: i32, y2: i32, tile: TileType) {
        for y in y1.min(y2)..=y1.max(y2) {
            self.set_tile(x, y, tile);
        }
    }

    /// Clear the rectangle `(x1, y1)..=(x2, y2)` and optionally wall its perimeter.
    pub fn add_room(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, add_walls: bool) {
        let (x1, x2) = (x1.min(x2), x1.max(x2));
        let (y1, y2) = (y1.min(y2), y1.max(y2));
        for y in y1..=y2 {
            for x in x1..=x2 {
                self.set_tile(x, y, TileType::Empty);
            }
        }
        if add_walls {
            self.add_horizontal_wall(x1, x2, y1, TileType::Wall);
            self.add_horizontal_wall(x1, x2, y2, TileType::Wall);
            self.add_vertical_wall(x1, y1, y2, TileType::Wall);
            self.add_vertical_wall(x2, y1, y2, TileType::Wall);
        }
    }

    pub fn add_door(&mut self, x: i32, y: i32) {
        self.set_tile(x, y, TileType::Door);
    }

    /// Carve an empty corridor. Straight when the endpoints share a row or column,
    /// otherwise L-shaped: along row `y1` first, then down column `x2`.
    pub fn add_corridor(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        if x1 == x2 {
            self.add_vertical_wall(x1, y1, y2, TileType::Empty);
        } else if y1 == y2 {
            self.add_horizontal_wall(x1, x2, y1, TileType::Empty);
        } else {
            self.add_horizontal_wall(x1, x2, y1, TileType::Empty);
            self.add_vertical_wall(x2, y1, y2, TileType::Empty);
        }
    }

    /// Wall the outermost ring of cells.
    pub fn add_border_walls(&mut self) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (w, h) = (self.width as i32 - 1, self.height as i32 - 1);
        self.add_horizontal_wall(0, w, 0, TileType::Wall);
        self.add_horizontal_wall(0, w, h, TileType::Wall);
        self.add_vertical_wall(0, 0, h, TileType::Wall);
        self.add_vertical_wall(w, 0, h, TileType::Wall);
    }

    /// March a ray from `origin` along `direction` until it enters a solid cell or
    /// `MAX_RENDER_DEPTH` steps have been taken.
    ///
    /// `direction` does not need to be normalized; the reported distance is in units
    /// of the camera's forward axis when `direction = forward + plane * offset`.
    pub fn cast_ray(&self, origin: Vector, direction: Vector) -> Option<RayHit> {
        let ray_x = if direction.x == 0.0 { RAY_EPSILON } else { direction.x };
        let ray_y = if direction.y == 0.0 { RAY_EPSILON } else { direction.y };

        let (mut map_x, mut map_y) = origin.cell();

        let delta_x = (1.0 / ray_x).abs();
        let delta_y = (1.0 / ray_y).abs();

        let (step_x, mut side_x) = if ray_x < 0.0 {
            (-1, (origin.x - map_x as f32) * delta_x)
        } else {
            (1, (map_x as f32 + 1.0 - origin.x) * delta_x)
        };
        let (step_y, mut side_y) = if ray_y < 0.0 {
            (-1, (origin.y - map_y as f32) * delta_y)
        } else {
            (1, (map_y as f32 + 1.0 - origin.y) * delta_y)
        };

        for steps in 1..=MAX_RENDER_DEPTH {
            let side = if side_x < side_y {
                side_x += delta_x;
                map_x += step_x;
                HitSide::Vertical
            } else {
                side_y += delta_y;
                map_y += step_y;
                HitSide::Horizontal
            };

            if self.get_block_at(map_x, map_y) != BLOCK_SOLID {
                continue;
            }

            let distance = match side {
                HitSide::Vertical => {
                    (map_x as f32 - origin.x + (1 - step_x) as f32 / 2.0) / ray_x
                }
                HitSide::Horizontal => {
                    (map_y as f32 - origin.y + (1 - step_y) as f32 / 2.0) / ray_y
                }
            };
            return Some(RayHit {
                cell_x: map_x,
                cell_y: map_y,
                side,
                distance,
                steps,
            });
        }
        None
    }

    /// Draw the wall slices visible from a camera at `position` looking along
    /// `direction` with camera plane `plane`.
    ///
    /// `view_height` shifts slices vertically in proportion to inverse distance.
    /// Slices are a single pixel wide, or two when the map's fill flag is set.
    pub fn render(
        &self,
        view_height: f32,
        canvas: &mut dyn Canvas,
        position: Vector,
        direction: Vector,
        plane: Vector,
    ) {
        let screen_w = canvas.width() as i32;
        let screen_h = canvas.height() as i32;
        if screen_w == 0 || screen_h == 0 {
            return;
        }
        let render_height = screen_h as f32 * RENDER_HEIGHT as f32 / SCREEN_HEIGHT as f32;
        let mut slices = 0u32;

        for x in (0..screen_w).step_by(RES_DIVIDER) {
            let camera_x = 2.0 * x as f32 / screen_w as f32 - 1.0;
            let ray = direction + plane * camera_x;

            let Some(hit) = self.cast_ray(position, ray) else {
                continue;
            };

            // Inside a solid cell the perpendicular distance collapses towards zero.
            let distance = hit.distance.max(1.0);
            let line_height = render_height / distance;
            let offset = view_height / distance;
            let start_y = ((offset - line_height / 2.0 + render_height / 2.0) as i32).max(0);
            let end_y = ((offset + line_height / 2.0 + render_height / 2.0) as i32).min(screen_h - 1);

            for y in start_y..end_y {
                canvas.draw_pixel(x, y, Color::Black);
                if self.fill && x + 1 < screen_w {
                    canvas.draw_pixel(x + 1, y, Color::Black);
                }
            }
            slices += 1;
        }

        debug!("map `{}`: drew {} wall slices", self.name, slices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PixelBuffer;

    #[test]
    fn border_walls_ring_the_map() {
        let map = DynamicMap::new("border", 6, 4, true, false);
        for x in 0..6 {
            assert_eq!(map.get_tile(x, 0), TileType::Wall);
            assert_eq!(map.get_tile(x, 3), TileType::Wall);
        }
        for y in 0..4 {
            assert_eq!(map.get_tile(0, y), TileType::Wall);
            assert_eq!(map.get_tile(5, y), TileType::Wall);
        }
        assert_eq!(map.get_tile(2, 2), TileType::Empty);
    }

    #[test]
    fn oversized_maps_are_clamped() {
        let map = DynamicMap::new("huge", 200, 255, false, false);
        assert_eq!(map.width(), MAX_MAP_WIDTH);
        assert_eq!(map.height(), MAX_MAP_HEIGHT);
    }

    #[test]
    fn doors_block_but_teleports_do_not() {
        let mut map = DynamicMap::new("doors", 8, 8, false, false);
        map.add_door(3, 3);
        map.set_tile(4, 4, TileType::Teleport);
        assert_eq!(map.get_block_at(3, 3), BLOCK_SOLID);
        assert_eq!(map.get_block_at(4, 4), BLOCK_OPEN);
        assert!(map.is_solid_at(Vector::new(3.5, 3.2)));
        assert_eq!(map.tile_at(Vector::new(4.1, 4.9)), TileType::Teleport);
    }

    #[test]
    fn l_shaped_corridor_runs_row_then_column() {
        let mut map = DynamicMap::new("corridor", 10, 10, false, false);
        for y in 0..10 {
            map.add_horizontal_wall(0, 9, y, TileType::Wall);
        }
        map.add_corridor(1, 1, 6, 5);
        for x in 1..=6 {
            assert_eq!(map.get_tile(x, 1), TileType::Empty);
        }
        for y in 1..=5 {
            assert_eq!(map.get_tile(6, y), TileType::Empty);
        }
        assert_eq!(map.get_tile(1, 5), TileType::Wall);
    }

    #[test]
    fn wall_list_is_capped() {
        let mut map = DynamicMap::new("walls", 4, 4, false, false);
        for i in 0..(MAX_WALLS + 5) {
            map.add_wall(
                Vector::new(i as f32, 0.0),
                Vector::new(i as f32, 1.0),
                TileType::Wall,
                255,
                true,
            );
        }
        assert_eq!(map.walls().len(), MAX_WALLS);
    }

    #[test]
    fn ray_hits_nearest_wall_on_its_side() {
        let map = DynamicMap::new("box", 8, 8, true, false);
        let hit = map
            .cast_ray(Vector::new(4.5, 4.5), Vector::new(0.0, -1.0))
            .expect("border wall ahead");
        assert_eq!((hit.cell_x, hit.cell_y), (4, 0));
        assert_eq!(hit.side, HitSide::Horizontal);
        assert!((hit.distance - 3.5).abs() < 1e-4);
    }

    #[test]
    fn oblique_ray_reports_perpendicular_distance() {
        let map = DynamicMap::new("box", 10, 10, true, false);
        // Facing east with a plane offset; the wall at x = 9 is 6.5 units ahead
        // along the forward axis regardless of the ray's slant.
        let dir = Vector::new(1.0, 0.0);
        let plane = Vector::new(0.0, 0.66);
        let hit = map
            .cast_ray(Vector::new(2.5, 5.5), dir + plane * 0.5)
            .expect("east wall");
        assert_eq!(hit.cell_x, 9);
        assert_eq!(hit.side, HitSide::Vertical);
        assert!((hit.distance - 6.5).abs() < 1e-3);
    }

    #[test]
    fn out_of_range_cells_are_open_and_writes_are_dropped() {
        let mut map = DynamicMap::new("bounds", 6, 4, false, false);
        let before = map.clone();

        map.set_tile(-1, 2, TileType::Wall);
        map.set_tile(6, 2, TileType::Wall);
        map.set_tile(2, 4, TileType::Wall);
        map.set_tile(i32::MAX, i32::MIN, TileType::Wall);
        assert_eq!(map, before);

        for (x, y) in [(-1, 2), (6, 2), (2, -1), (2, 4), (i32::MAX, i32::MIN), (i32::MIN, i32::MAX)] {
            assert_eq!(map.get_tile(x, y), TileType::Empty, "({x}, {y})");
            assert_eq!(map.get_block_at(x, y), BLOCK_OPEN, "({x}, {y})");
        }
        assert!(!map.is_solid_at(Vector::new(-0.5, 1.0)));
        assert!(!map.is_solid_at(Vector::new(f32::NAN, 1e30)));
        assert!(!map.is_solid_at(Vector::new(f32::INFINITY, f32::NEG_INFINITY)));
        assert_eq!(map.tile_at(Vector::new(f32::NAN, f32::NAN)), TileType::Empty);
    }

    #[test]
    fn room_has_open_interior_and_walled_perimeter() {
        for (x1, y1, x2, y2) in [(2, 1, 7, 5), (7, 5, 2, 1)] {
            let mut map = DynamicMap::new("room", 10, 8, false, false);
            for y in 0..8 {
                map.add_horizontal_wall(0, 9, y, TileType::Wall);
            }
            map.add_room(x1, y1, x2, y2, true);

            for y in 1..=5 {
                for x in 2..=7 {
                    let perimeter = x == 2 || x == 7 || y == 1 || y == 5;
                    let expected = if perimeter { TileType::Wall } else { TileType::Empty };
                    assert_eq!(map.get_tile(x, y), expected, "({x}, {y})");
                }
            }
            assert_eq!(map.get_tile(1, 3), TileType::Wall);
            assert_eq!(map.get_tile(8, 3), TileType::Wall);
        }
    }

    #[test]
    fn ray_reports_distance_to_a_lone_block() {
        let mut map = DynamicMap::new("lone", 10, 10, false, false);
        map.set_tile(5, 5, TileType::Wall);

        let hit = map
            .cast_ray(Vector::new(0.0, 5.0), Vector::new(1.0, 0.0))
            .expect("block ahead");
        assert_eq!((hit.cell_x, hit.cell_y), (5, 5));
        assert_eq!(hit.side, HitSide::Vertical);
        assert!((hit.distance - 5.0).abs() < 1e-4, "distance = {}", hit.distance);
    }

    #[test]
    fn empty_map_never_reports_a_hit() {
        let map = DynamicMap::new("void", 64, 64, false, false);
        let mut rays = 0;
        for oy in (-8..72).step_by(8) {
            for ox in (-8..72).step_by(8) {
                let origin = Vector::new(ox as f32 + 0.3, oy as f32 + 0.7);
                for step in 0..36 {
                    let direction = Vector::new(1.0, 0.0).rotated(step as f32 * 10f32.to_radians());
                    assert_eq!(map.cast_ray(origin, direction), None, "{origin:?} {direction:?}");
                    rays += 1;
                }
            }
        }
        assert_eq!(rays, 100 * 36);
    }

    #[test]
    fn render_draws_centered_slices() {
        let map = DynamicMap::new("room", 10, 10, true, false);
        let mut fb = PixelBuffer::screen();
        map.render(
            0.0,
            &mut fb,
            Vector::new(5.5, 5.5),
            Vector::new(1.0, 0.0),
            Vector::new(0.0, 0.66),
        );
        // Middle column hits the east wall 3.5 cells away: 56 / 3.5 = 16 px tall.
        let ink = fb.column_ink(64);
        assert!((15..=17).contains(&ink), "ink = {}", ink);
        assert!(fb.is_ink(64, 28));
        // Odd columns are skipped without fill.
        assert_eq!(fb.column_ink(65), 0);
    }

    #[test]
    fn fill_flag_doubles_slice_width() {
        let map = DynamicMap::new("room", 10, 10, true, true);
        let mut fb = PixelBuffer::screen();
        map.render(
            0.0,
            &mut fb,
            Vector::new(5.5, 5.5),
            Vector::new(1.0, 0.0),
            Vector::new(0.0, 0.66),
        );
        assert_eq!(fb.column_ink(64), fb.column_ink(65));
        assert!(fb.column_ink(65) > 0);
    }

    #[test]
    fn camera_inside_wall_does_not_blow_up() {
        let map = DynamicMap::new("solid", 4, 4, true, false);
        let mut fb = PixelBuffer::screen();
        map.render(
            1.6,
            &mut fb,
            Vector::new(0.5, 0.5),
            Vector::new(1.0, 0.0),
            Vector::new(0.0, 0.66),
        );
        // Distance is clamped to 1, so a slice is never taller than the screen.
        for x in (0..128).step_by(2) {
            assert!(fb.column_ink(x) < 64);
        }
    }
}
