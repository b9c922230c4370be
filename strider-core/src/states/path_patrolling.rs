//! Continuous path following.
//!
//! The navigation agent brings the character onto the path. Once it is
//! there, the agent is stopped and the character is driven along the path
//! directly by a distance cursor advancing at the agent's speed.

use tracing::{debug, trace, warn};

use crate::anim::params;
use crate::character::CharacterBody;
use crate::dispatch::{Env, Flow};
use crate::states::StateBehavior;
use crate::types::{StateId, Transform};

/// Drives the character along its patrol path.
#[derive(Debug, Clone, Default)]
pub struct PathPatrolling {
    distance: f32,
    reported: bool,
}

impl PathPatrolling {
    /// Distance along the path of the cursor.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    fn hold(&mut self, body: &mut CharacterBody) {
        if self.reported {
            trace!(character = %body.id, "No path, holding position");
        } else {
            warn!(character = %body.id, "Path missing, holding position");
            self.reported = true;
        }
        if let Some(nav) = body.nav.quiet() {
            nav.set_stopped(true);
        }
    }
}

impl StateBehavior for PathPatrolling {
    fn id(&self) -> StateId {
        StateId::PathPatrolling
    }

    fn start(&mut self, body: &mut CharacterBody, _env: &mut Env<'_>) -> Flow {
        self.distance = 0.0;
        self.reported = false;
        let Some((path, end)) = body.path() else {
            self.hold(body);
            return Flow::Continue;
        };
        self.distance = path.closest_distance(body.transform.position);
        let id = body.id;
        if let Some(nav) = body.nav.get(id, "path patrol") {
            nav.set_stopped(false);
            nav.set_destination(path.point_at(self.distance, end));
        }
        debug!(character = %id, distance = self.distance, "Joining path");
        Flow::Continue
    }

    fn update(&mut self, body: &mut CharacterBody, env: &mut Env<'_>) -> Flow {
        let Some((path, end)) = body.path() else {
            self.hold(body);
            return Flow::Continue;
        };
        let id = body.id;
        let Some(nav) = body.nav.get(id, "path patrol") else {
            return Flow::Continue;
        };

        if nav.path_pending() || nav.remaining_distance() > nav.stopping_distance() {
            // Still approaching: keep aiming at the closest point.
            self.distance = path.closest_distance(body.transform.position);
            nav.set_destination(path.point_at(self.distance, end));
            return Flow::Continue;
        }

        nav.set_stopped(true);
        let speed = nav.speed();
        self.distance += speed * env.dt;
        let position = path.point_at(self.distance, end);
        nav.warp(position);
        body.transform = Transform {
            position,
            rotation: path.rotation_at(self.distance, end),
        };
        if let Some(animator) = body.animator.get(id, "path patrol") {
            animator.set_float(params::SPEED, speed);
        }
        Flow::Continue
    }
}
