//! Cyclic waypoint patrol.

use tracing::{debug, warn};

use crate::character::CharacterBody;
use crate::dispatch::{Env, Flow};
use crate::states::StateBehavior;
use crate::types::StateId;

/// Walks the character's waypoint list in its patrol direction, forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct Patrolling;

impl Patrolling {
    fn head_to_next(body: &mut CharacterBody) {
        let id = body.id;
        let Some(route) = body.waypoints_mut() else {
            return;
        };
        let Some(next) = route.advance() else {
            return;
        };
        let index = route.index;
        if let Some(nav) = body.nav.get(id, "patrol") {
            nav.set_destination(next);
            debug!(character = %id, index, "Next waypoint");
        }
    }
}

impl StateBehavior for Patrolling {
    fn id(&self) -> StateId {
        StateId::Patrolling
    }

    fn start(&mut self, body: &mut CharacterBody, _env: &mut Env<'_>) -> Flow {
        let id = body.id;
        match body.waypoints_mut() {
            Some(route) if !route.points.is_empty() => {}
            _ => {
                warn!(character = %id, "Patrolling without waypoints, holding position");
                return Flow::Continue;
            }
        }
        if let Some(nav) = body.nav.get(id, "patrol") {
            nav.set_stopped(false);
        }
        Self::head_to_next(body);
        Flow::Continue
    }

    fn update(&mut self, body: &mut CharacterBody, _env: &mut Env<'_>) -> Flow {
        let id = body.id;
        let Some(nav) = body.nav.get(id, "patrol") else {
            return Flow::Continue;
        };
        if nav.path_pending() || nav.remaining_distance() > nav.stopping_distance() {
            return Flow::Continue;
        }
        Self::head_to_next(body);
        Flow::Continue
    }
}
