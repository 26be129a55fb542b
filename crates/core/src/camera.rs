//! Camera parameters shared by the wall sweep and the mesh projector.

use free_roam_types::{
    Vector, CAMERA_HEIGHT, DEFAULT_PLANE_LENGTH, THIRD_PERSON_DISTANCE, THIRD_PERSON_HEIGHT,
};

/// Facing used when the player's own direction is degenerate.
pub const DEFAULT_FORWARD: Vector = Vector::new(1.0, 0.0);

/// Position, facing, camera plane and eye height of a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    pub position: Vector,
    pub direction: Vector,
    pub plane: Vector,
    pub height: f32,
}

impl CameraParams {
    pub fn new(position: Vector, direction: Vector, plane: Vector, height: f32) -> Self {
        Self {
            position,
            direction,
            plane,
            height,
        }
    }

    /// Looking out of the player's eyes.
    pub fn first_person(position: Vector, direction: Vector, plane: Vector) -> Self {
        Self::new(position, direction, plane, CAMERA_HEIGHT)
    }

    /// A camera stepped back from the player along its (normalized) facing and
    /// raised to `THIRD_PERSON_HEIGHT`.
    ///
    /// A near-zero facing falls back to [`DEFAULT_FORWARD`]. The plane is rebuilt
    /// perpendicular to the normalized facing, keeping the player's plane length
    /// (or the default when that is degenerate too), so every field is finite.
    pub fn third_person(player_position: Vector, player_direction: Vector, player_plane: Vector) -> Self {
        let forward = player_direction.normalized().unwrap_or(DEFAULT_FORWARD);
        let plane_length = player_plane.length();
        let plane_length = if plane_length.is_finite() && plane_length > 0.0 {
            plane_length
        } else {
            DEFAULT_PLANE_LENGTH
        };
        let position = if player_position.is_finite() {
            player_position
        } else {
            Vector::ZERO
        };

        Self {
            position: position - forward * THIRD_PERSON_DISTANCE,
            direction: forward,
            plane: forward.perpendicular() * plane_length,
            height: THIRD_PERSON_HEIGHT,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.direction.is_finite()
            && self.plane.is_finite()
            && self.height.is_finite()
    }
}
