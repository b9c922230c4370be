//! State behaviors: what a character does frame by frame.
//!
//! A behavior holds only bookkeeping scoped to one activation, reset in
//! [`StateBehavior::start`]. Anything that must survive a state change lives
//! on the [`CharacterBody`].

mod following;
mod idle;
mod path_patrolling;
mod patrolling;
mod resting;
mod wandering;

pub use following::Following;
pub use idle::Idle;
pub use path_patrolling::PathPatrolling;
pub use patrolling::Patrolling;
pub use resting::{RestPhase, Resting};
pub use wandering::Wandering;

use crate::character::CharacterBody;
use crate::dispatch::{Env, Flow};
use crate::types::{AnimationEvent, StateId};

/// Per-frame logic for one [`StateId`].
pub trait StateBehavior: Send {
    /// The state this behavior implements.
    fn id(&self) -> StateId;

    /// Called once on every transition into the state.
    fn start(&mut self, body: &mut CharacterBody, env: &mut Env<'_>) -> Flow;

    /// Called once per tick while the state is active.
    fn update(&mut self, body: &mut CharacterBody, env: &mut Env<'_>) -> Flow;

    /// An animation clip finished.
    fn on_animation(&mut self, _event: AnimationEvent, _body: &mut CharacterBody, _env: &mut Env<'_>) -> Flow {
        Flow::Continue
    }

    /// Sub-phase of the resting sequence. Only [`Resting`] reports one.
    fn rest_phase(&self) -> Option<RestPhase> {
        None
    }
}

/// A fresh instance of every built-in behavior.
#[must_use]
pub fn standard() -> Vec<Box<dyn StateBehavior>> {
    vec![
        Box::new(Idle),
        Box::new(Following::default()),
        Box::new(Resting::default()),
        Box::new(Patrolling),
        Box::new(PathPatrolling::default()),
        Box::new(Wandering),
    ]
}
