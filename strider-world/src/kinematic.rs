//! Straight-line navigation over a flat rectangular walkable area.
//!
//! Good enough to drive the behavior core without a real navmesh: agents
//! accelerate toward their destination in a straight line and the walkable
//! surface is an axis-aligned rectangle on the XZ plane.

use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;
use strider_core::config::WorldConfig;
use strider_core::nav::NavAgent;

/// The walkable rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavBounds {
    /// Minimum corner. Its `y` is the floor height.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl NavBounds {
    /// Bounds from the world settings.
    #[must_use]
    pub fn from_config(world: &WorldConfig) -> Self {
        Self {
            min: world.bounds_min,
            max: world.bounds_max,
        }
    }

    /// Closest walkable point to `point`.
    #[must_use]
    pub fn project(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            self.min.y,
            point.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Whether `point` lies on the walkable surface, ignoring height.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.z..=self.max.z).contains(&point.z)
    }
}

#[derive(Debug)]
struct AgentState {
    bounds: NavBounds,
    position: Vec3,
    destination: Option<Vec3>,
    pending: bool,
    stopped: bool,
    velocity: Vec3,
    speed: f32,
    acceleration: f32,
    stopping_distance: f32,
}

impl AgentState {
    fn remaining(&self) -> f32 {
        self.destination.map_or(0.0, |d| self.position.distance(d))
    }
}

/// Host-side handle to an agent: steps it and reads where it went.
#[derive(Debug, Clone)]
pub struct AgentHandle(Arc<Mutex<AgentState>>);

impl AgentHandle {
    /// A resting agent at `position` with default locomotion settings.
    #[must_use]
    pub fn new(bounds: NavBounds, position: Vec3, stopping_distance: f32) -> Self {
        Self(Arc::new(Mutex::new(AgentState {
            bounds,
            position: bounds.project(position),
            destination: None,
            pending: false,
            stopped: false,
            velocity: Vec3::ZERO,
            speed: 3.5,
            acceleration: 8.0,
            stopping_distance,
        })))
    }

    /// The adapter to hand to a character.
    #[must_use]
    pub fn agent(&self) -> Box<dyn NavAgent> {
        Box::new(KinematicAgent(Arc::clone(&self.0)))
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.0.lock().position
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.0.lock().velocity
    }

    /// Teleport, dropping the current path.
    pub fn teleport(&self, position: Vec3) {
        let mut s = self.0.lock();
        s.position = s.bounds.project(position);
        s.destination = None;
        s.velocity = Vec3::ZERO;
    }

    /// Advance `dt` seconds and return the new position.
    pub fn step(&self, dt: f32) -> Vec3 {
        let mut s = self.0.lock();
        s.pending = false;
        let Some(destination) = s.destination else {
            s.velocity = Vec3::ZERO;
            return s.position;
        };
        if s.stopped {
            s.velocity = Vec3::ZERO;
            return s.position;
        }

        let to_go = destination - s.position;
        let distance = to_go.length();
        let current = (s.velocity.length() + s.acceleration * dt).min(s.speed);
        let travel = current * dt;
        if travel >= distance {
            s.position = destination;
            s.destination = None;
            s.velocity = Vec3::ZERO;
        } else {
            let direction = to_go / distance;
            s.position += direction * travel;
            s.velocity = direction * current;
        }
        s.position
    }
}

/// [`NavAgent`] backed by an [`AgentHandle`].
struct KinematicAgent(Arc<Mutex<AgentState>>);

impl NavAgent for KinematicAgent {
    fn set_destination(&mut self, point: Vec3) {
        let mut s = self.0.lock();
        let target = s.bounds.project(point);
        s.destination = Some(target);
        s.pending = true;
    }

    fn remaining_distance(&self) -> f32 {
        self.0.lock().remaining()
    }

    fn stopping_distance(&self) -> f32 {
        self.0.lock().stopping_distance
    }

    fn path_pending(&self) -> bool {
        self.0.lock().pending
    }

    fn has_path(&self) -> bool {
        self.0.lock().destination.is_some()
    }

    fn set_stopped(&mut self, stopped: bool) {
        let mut s = self.0.lock();
        s.stopped = stopped;
        if stopped {
            s.velocity = Vec3::ZERO;
        }
    }

    fn is_stopped(&self) -> bool {
        self.0.lock().stopped
    }

    fn velocity(&self) -> Vec3 {
        self.0.lock().velocity
    }

    fn speed(&self) -> f32 {
        self.0.lock().speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.0.lock().speed = speed.max(0.0);
    }

    fn set_acceleration(&mut self, acceleration: f32) {
        self.0.lock().acceleration = acceleration.max(0.0);
    }

    fn warp(&mut self, position: Vec3) {
        let mut s = self.0.lock();
        s.position = s.bounds.project(position);
        s.destination = None;
        s.velocity = Vec3::ZERO;
    }

    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        let s = self.0.lock();
        let projected = s.bounds.project(point);
        (projected.distance(point) <= max_distance).then_some(projected)
    }
}
