//! Navigation adapter boundary.
//!
//! The core never plans paths itself. Hosts plug a destination-seeking agent
//! in behind [`NavAgent`] and the state behaviors drive it.

use glam::Vec3;

/// A destination-seeking pathfinding agent owned by one character.
pub trait NavAgent: Send {
    /// Request a new destination. Path computation may complete later, see
    /// [`path_pending`](Self::path_pending).
    fn set_destination(&mut self, point: Vec3);

    /// Distance left along the current path.
    fn remaining_distance(&self) -> f32;

    /// Distance under which the agent counts as arrived.
    fn stopping_distance(&self) -> f32;

    /// Whether a requested path is still being computed.
    fn path_pending(&self) -> bool;

    /// Whether the agent currently has a path.
    fn has_path(&self) -> bool;

    /// Halt or resume movement along the current path.
    fn set_stopped(&mut self, stopped: bool);

    /// Whether movement is halted.
    fn is_stopped(&self) -> bool;

    /// Current velocity.
    fn velocity(&self) -> Vec3;

    /// Current maximum speed.
    fn speed(&self) -> f32;

    /// Set the maximum speed.
    fn set_speed(&mut self, speed: f32);

    /// Set the acceleration.
    fn set_acceleration(&mut self, acceleration: f32);

    /// Teleport the agent without pathing. Clears the current path, so
    /// [`remaining_distance`](Self::remaining_distance) reads zero afterwards.
    fn warp(&mut self, position: Vec3);

    /// Project `point` onto the walkable surface within `max_distance`.
    /// `None` when no walkable position is close enough.
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;
}
