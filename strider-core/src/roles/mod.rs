//! Role policies: how each kind of character reacts to its world.
//!
//! Policies are stateless. Everything they touch arrives through the
//! [`Dispatch`] context, and the only way they change what a character does
//! is [`Dispatch::request_state`]. Every capability defaults to a no-op so a
//! role only spells out what it supports.

mod elder;
mod runner;
mod zen;

pub use elder::Elder;
pub use runner::{PathRunner, Runner};
pub use zen::{ZenDummy, ZenMaster, ZenPerson};

use rand::Rng;
use tracing::trace;

use crate::anim::params;
use crate::dispatch::Dispatch;
use crate::types::{AnimationEvent, Contact, ContactKind, Role};

/// Behavior shared by every character of one [`Role`].
pub trait RolePolicy: Send + Sync {
    /// The role this policy implements.
    fn role(&self) -> Role;

    /// Runs exactly once, on the character's first permitted tick.
    fn start(&self, cx: &mut Dispatch<'_, '_>) {
        cx.enter_current_state();
    }

    /// Runs every tick after start.
    fn update(&self, cx: &mut Dispatch<'_, '_>) {
        cx.update_state();
    }

    /// Physical collision.
    fn handle_collision(&self, kind: ContactKind, contact: &Contact, cx: &mut Dispatch<'_, '_>) {
        trace!(character = %cx.body().id, ?kind, tag = %contact.tag, "Collision ignored");
    }

    /// Trigger overlap.
    fn handle_trigger(&self, kind: ContactKind, contact: &Contact, cx: &mut Dispatch<'_, '_>) {
        trace!(character = %cx.body().id, ?kind, tag = %contact.tag, "Trigger ignored");
    }

    /// Animation completion. Forwarded to the active state by default.
    fn handle_animation(&self, event: AnimationEvent, cx: &mut Dispatch<'_, '_>) {
        cx.animate(event);
    }

    /// Stand still.
    fn idle(&self, _cx: &mut Dispatch<'_, '_>) {}

    /// Pick random destinations.
    fn wander(&self, _cx: &mut Dispatch<'_, '_>) {}

    /// Walk the patrol route.
    fn patrol(&self, _cx: &mut Dispatch<'_, '_>) {}

    /// Sit down in the claimed rest area.
    fn rest(&self, _cx: &mut Dispatch<'_, '_>) {}

    /// Leave the rest area and give up the claim.
    fn stop_resting(&self, _cx: &mut Dispatch<'_, '_>) {}

    /// Mirror the follow target.
    fn follow(&self, _cx: &mut Dispatch<'_, '_>) {}
}

/// One instance of every built-in policy.
#[must_use]
pub fn standard() -> Vec<Box<dyn RolePolicy>> {
    vec![
        Box::new(Elder),
        Box::new(Runner),
        Box::new(PathRunner),
        Box::new(ZenDummy),
        Box::new(ZenMaster),
        Box::new(ZenPerson),
    ]
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Re-resolve the animator's parameter bindings.
fn rebind_animator(cx: &mut Dispatch<'_, '_>) {
    let body = cx.body();
    let id = body.id;
    if let Some(animator) = body.animator.get(id, "rebind") {
        animator.rebind();
    }
}

/// Mirror the agent's current speed into the animator.
fn write_speed(cx: &mut Dispatch<'_, '_>) {
    let body = cx.body();
    let id = body.id;
    let Some(nav) = body.nav.get(id, "speed") else {
        return;
    };
    let speed = nav.velocity().length();
    if let Some(animator) = body.animator.get(id, "speed") {
        animator.set_float(params::SPEED, speed);
    }
}

/// Pick a patrol speed and direction for a runner.
fn randomize_gait(cx: &mut Dispatch<'_, '_>) {
    let body = cx.body();
    let id = body.id;
    let (min, max) = (body.movement.min_speed, body.movement.max_speed);
    let speed = body.rng.gen_range(min..=max);
    let forward = match body.movement.patrol_direction {
        Some(forward) => forward,
        None => body.rng.gen_bool(0.5),
    };
    if let Some(route) = body.waypoints_mut() {
        route.forward = forward;
    }
    if let Some(nav) = body.nav.get(id, "gait") {
        nav.set_speed(speed);
        nav.set_acceleration(speed * 2.0);
    }
    trace!(character = %id, speed, forward, "Gait chosen");
}
