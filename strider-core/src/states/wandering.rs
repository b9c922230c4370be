//! Random destinations on the walkable surface.

use glam::Vec3;
use rand::Rng;
use tracing::{debug, trace};

use crate::character::CharacterBody;
use crate::dispatch::{Env, Flow};
use crate::states::StateBehavior;
use crate::types::StateId;

/// Picks a random reachable point, walks there, repeats.
///
/// With a zero wander offset the sample is taken anywhere within the wander
/// radius. With a positive offset it is biased ahead of the character, and
/// the point mirrored through the character's position is tried when the
/// first sample is off the walkable surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wandering;

/// Uniform point inside the unit sphere.
fn unit_sphere<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

impl Wandering {
    /// Try to pick a new destination. Returns whether one was set; on a miss
    /// the character keeps its current path and tries again next tick.
    fn pick(body: &mut CharacterBody) -> bool {
        let radius = body.movement.wander_radius;
        let offset = body.movement.wander_offset;
        let origin = body.transform.position;
        let sample = unit_sphere(&mut body.rng) * radius;

        let (primary, fallback) = if offset > 0.0 {
            let candidate = origin + body.transform.forward() * offset + sample;
            (candidate, Some(origin * 2.0 - candidate))
        } else {
            (origin + sample, None)
        };

        let id = body.id;
        let Some(nav) = body.nav.get(id, "wander") else {
            return false;
        };
        let found = nav
            .sample_position(primary, radius)
            .or_else(|| fallback.and_then(|p| nav.sample_position(p, radius)));
        match found {
            Some(destination) => {
                nav.set_destination(destination);
                debug!(character = %id, x = destination.x, z = destination.z, "Wander destination");
                true
            }
            None => {
                trace!(character = %id, "No walkable wander sample, retrying next tick");
                false
            }
        }
    }
}

impl StateBehavior for Wandering {
    fn id(&self) -> StateId {
        StateId::Wandering
    }

    fn start(&mut self, body: &mut CharacterBody, _env: &mut Env<'_>) -> Flow {
        let id = body.id;
        let Some(nav) = body.nav.get(id, "wander") else {
            return Flow::Continue;
        };
        nav.set_stopped(false);
        if !nav.has_path() {
            Self::pick(body);
        }
        Flow::Continue
    }

    fn update(&mut self, body: &mut CharacterBody, _env: &mut Env<'_>) -> Flow {
        let id = body.id;
        let own_threshold = body.movement.wander_stopping_distance;
        let Some(nav) = body.nav.get(id, "wander") else {
            return Flow::Continue;
        };
        let threshold = if own_threshold > 0.0 {
            own_threshold
        } else {
            nav.stopping_distance()
        };
        if nav.path_pending() || nav.remaining_distance() > threshold {
            return Flow::Continue;
        }
        Self::pick(body);
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn unit_sphere_samples_stay_inside() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(unit_sphere(&mut rng).length() <= 1.0 + 1e-6);
        }
    }
}
