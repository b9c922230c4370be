//! The transition protocol between role policies and state behaviors.
//!
//! A [`Dispatch`] is built for the duration of one callback. It borrows the
//! character's body, its state table and the scene services, and it is the
//! only way a role policy can move a character into another state.

use std::collections::HashMap;

use tracing::{debug, error, trace};

use crate::character::{CharacterBody, StateTable};
use crate::config::RestingTuning;
use crate::events::EventBus;
use crate::metrics::DispatchCounters;
use crate::rest_area::RestAreas;
use crate::roles::RolePolicy;
use crate::states::StateBehavior;
use crate::types::{AnimationEvent, CharacterId, StateId, Transform};

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

/// A capability call a state asks the active role to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleCommand {
    /// [`RolePolicy::idle`].
    Idle,
    /// [`RolePolicy::wander`].
    Wander,
    /// [`RolePolicy::patrol`].
    Patrol,
    /// [`RolePolicy::rest`].
    Rest,
    /// [`RolePolicy::stop_resting`].
    StopResting,
    /// [`RolePolicy::follow`].
    Follow,
}

/// Outcome of a state behavior callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Stay in the current state.
    Continue,
    /// Hand a command to the character's currently active role.
    Role(RoleCommand),
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// Last known transform of every character, for states that track others.
#[derive(Debug, Clone, Default)]
pub struct TransformIndex {
    transforms: HashMap<CharacterId, Transform>,
}

impl TransformIndex {
    /// Empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id`'s transform.
    pub fn insert(&mut self, id: CharacterId, transform: Transform) {
        self.transforms.insert(id, transform);
    }

    /// Forget `id`.
    pub fn remove(&mut self, id: CharacterId) -> Option<Transform> {
        self.transforms.remove(&id)
    }

    /// Transform of `id`, if known.
    #[must_use]
    pub fn get(&self, id: CharacterId) -> Option<&Transform> {
        self.transforms.get(&id)
    }
}

/// Scene-wide services a character reads and writes during one callback.
pub struct Env<'w> {
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Shared rest areas.
    pub rest_areas: &'w mut RestAreas,
    /// Where everyone else is.
    pub transforms: &'w TransformIndex,
    /// Gameplay event bus.
    pub events: &'w EventBus,
    /// Dispatch counters.
    pub counters: &'w DispatchCounters,
    /// Sit-down tuning.
    pub resting: &'w RestingTuning,
}

/// Owned backing storage for an [`Env`], for hosts and tests.
#[derive(Debug, Default)]
pub struct Services {
    /// Shared rest areas.
    pub rest_areas: RestAreas,
    /// Where everyone is.
    pub transforms: TransformIndex,
    /// Gameplay event bus.
    pub events: EventBus,
    /// Dispatch counters.
    pub counters: DispatchCounters,
    /// Sit-down tuning.
    pub resting: RestingTuning,
}

impl Services {
    /// Borrow everything as an [`Env`] for a tick of `dt` seconds.
    pub fn env(&mut self, dt: f32) -> Env<'_> {
        Env {
            dt,
            rest_areas: &mut self.rest_areas,
            transforms: &self.transforms,
            events: &self.events,
            counters: &self.counters,
            resting: &self.resting,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Which state is active and whether it has been started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Activity {
    pub(crate) state: StateId,
    pub(crate) entered: bool,
}

/// Context handed to every [`RolePolicy`] callback.
pub struct Dispatch<'a, 'w> {
    pub(crate) role: &'a dyn RolePolicy,
    pub(crate) body: &'a mut CharacterBody,
    pub(crate) activity: &'a mut Activity,
    pub(crate) states: &'a mut StateTable,
    pub(crate) env: &'a mut Env<'w>,
}

impl<'a, 'w> Dispatch<'a, 'w> {
    /// The character being dispatched.
    pub fn body(&mut self) -> &mut CharacterBody {
        &mut *self.body
    }

    /// Scene services.
    pub fn env(&mut self) -> &mut Env<'w> {
        &mut *self.env
    }

    /// Body and services at once.
    pub fn parts(&mut self) -> (&mut CharacterBody, &mut Env<'w>) {
        (&mut *self.body, &mut *self.env)
    }

    /// Currently active state.
    #[must_use]
    pub fn state(&self) -> StateId {
        self.activity.state
    }

    /// Switch to `id` and start it. A no-op if `id` is already active.
    pub fn request_state(&mut self, id: StateId) {
        if self.activity.entered && self.activity.state == id {
            DispatchCounters::bump(&self.env.counters.redundant_requests);
            trace!(character = %self.body.id, state = ?id, "State already active");
            return;
        }
        let from = self.activity.state;
        self.activity.state = id;
        self.activity.entered = true;
        DispatchCounters::bump(&self.env.counters.transitions);
        debug!(character = %self.body.id, role = %self.body.role, ?from, to = ?id, "State transition");
        self.run(|behavior, body, env| behavior.start(body, env));
    }

    /// Start the configured state if nothing has been started yet.
    pub fn enter_current_state(&mut self) {
        if !self.activity.entered {
            let id = self.activity.state;
            self.request_state(id);
        }
    }

    /// Run one update of the active state.
    pub fn update_state(&mut self) {
        if !self.activity.entered {
            trace!(character = %self.body.id, "No state entered yet, skipping update");
            return;
        }
        self.run(|behavior, body, env| behavior.update(body, env));
    }

    /// Forward an animation completion to the active state.
    pub fn animate(&mut self, event: AnimationEvent) {
        if !self.activity.entered {
            debug!(character = %self.body.id, ?event, "Animation event before any state, ignored");
            return;
        }
        self.run(|behavior, body, env| behavior.on_animation(event, body, env));
    }

    /// Execute `command` on the active role.
    pub fn command(&mut self, command: RoleCommand) {
        let role = self.role;
        match command {
            RoleCommand::Idle => role.idle(self),
            RoleCommand::Wander => role.wander(self),
            RoleCommand::Patrol => role.patrol(self),
            RoleCommand::Rest => role.rest(self),
            RoleCommand::StopResting => role.stop_resting(self),
            RoleCommand::Follow => role.follow(self),
        }
    }

    fn run<F>(&mut self, f: F)
    where
        F: FnOnce(&mut dyn StateBehavior, &mut CharacterBody, &mut Env<'w>) -> Flow,
    {
        let id = self.activity.state;
        let Some(behavior) = self.states.get_mut(id) else {
            error!(character = %self.body.id, state = ?id, "State registry has no behavior");
            return;
        };
        let flow = f(behavior, &mut *self.body, &mut *self.env);
        if let Flow::Role(command) = flow {
            trace!(character = %self.body.id, ?command, "State handed control to role");
            self.command(command);
        }
    }
}
