//! The character aggregate: body, lifecycle, registries and stimulus intake.
//!
//! A [`Character`] owns everything one NPC needs between ticks. The host
//! drives it with [`Character::tick`] and feeds it world stimuli either
//! immediately (`on_collision`, `on_trigger`, `on_animation`) or through
//! the pending queue ([`Character::enqueue`]), which is drained at the start
//! of the next tick before the active state updates.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, error, info, trace, warn};

use crate::anim::Animator;
use crate::config::MovementConfig;
use crate::dispatch::{Activity, Dispatch, Env, RoleCommand};
use crate::error::{Result, StriderError};
use crate::metrics::DispatchCounters;
use crate::nav::NavAgent;
use crate::path::{EndOfPath, PathSpline};
use crate::rest_area::RestBinding;
use crate::roles::{self, RolePolicy};
use crate::states::{self, RestPhase, StateBehavior};
use crate::types::{AnimationEvent, CharacterId, Contact, ContactKind, Role, StateId, Stimulus, Transform};

// ---------------------------------------------------------------------------
// Adapter slots
// ---------------------------------------------------------------------------

/// An optional host adapter. Reading an empty slot logs one warning per
/// character and then stays quiet.
pub struct Slot<T: ?Sized> {
    label: &'static str,
    inner: Option<Box<T>>,
    reported: bool,
}

impl<T: ?Sized> Slot<T> {
    fn new(label: &'static str, inner: Option<Box<T>>) -> Self {
        Self {
            label,
            inner,
            reported: false,
        }
    }

    /// Whether an adapter is attached.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.inner.is_some()
    }

    /// Replace the adapter.
    pub fn attach(&mut self, adapter: Box<T>) {
        self.inner = Some(adapter);
        self.reported = false;
    }

    /// Remove the adapter.
    pub fn detach(&mut self) -> Option<Box<T>> {
        self.inner.take()
    }

    /// The adapter, or `None` with a one-time warning naming `op`.
    pub fn get(&mut self, owner: CharacterId, op: &'static str) -> Option<&mut T> {
        if self.inner.is_none() {
            if self.reported {
                trace!(character = %owner, adapter = self.label, op, "Adapter missing");
            } else {
                warn!(character = %owner, adapter = self.label, op, "Adapter missing, skipping");
                self.reported = true;
            }
            return None;
        }
        self.inner.as_deref_mut()
    }

    /// The adapter without logging anything when it is missing.
    pub fn quiet(&mut self) -> Option<&mut T> {
        self.inner.as_deref_mut()
    }

    /// Read-only view.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.inner.as_deref()
    }
}

impl<T: ?Sized> std::fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("label", &self.label)
            .field("present", &self.inner.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// A cyclic waypoint list and the cursor into it.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointRoute {
    /// Waypoints in patrol order.
    pub points: Vec<Vec3>,
    /// Index of the current destination.
    pub index: usize,
    /// `true` walks the list forward, `false` backward.
    pub forward: bool,
}

impl WaypointRoute {
    /// Start at waypoint 0, walking forward.
    #[must_use]
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            index: 0,
            forward: true,
        }
    }

    /// Start at waypoint `index` (wrapped into range), walking forward.
    /// The first patrol target is the waypoint after it.
    #[must_use]
    pub fn starting_at(points: Vec<Vec3>, index: usize) -> Self {
        let index = if points.is_empty() { 0 } else { index % points.len() };
        Self {
            points,
            index,
            forward: true,
        }
    }

    /// Step the cursor once in the patrol direction and return the new
    /// destination. `None` for an empty list.
    pub fn advance(&mut self) -> Option<Vec3> {
        let len = self.points.len();
        if len == 0 {
            return None;
        }
        self.index = if self.forward {
            (self.index + 1) % len
        } else {
            (self.index + len - 1) % len
        };
        self.points.get(self.index).copied()
    }
}

/// Where a patrolling character goes.
#[derive(Debug, Clone, Default)]
pub enum Route {
    /// Nothing to patrol.
    #[default]
    None,
    /// Discrete waypoints.
    Waypoints(WaypointRoute),
    /// A continuous path. `path` may be removed at runtime.
    Path {
        /// The path, if still present.
        path: Option<Arc<PathSpline>>,
        /// End-of-path behavior.
        end: EndOfPath,
    },
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// Per-character data that roles and states read and write.
pub struct CharacterBody {
    /// Host-assigned identity.
    pub id: CharacterId,
    /// Fixed role.
    pub role: Role,
    /// Current transform.
    pub transform: Transform,
    /// Navigation agent.
    pub nav: Slot<dyn NavAgent>,
    /// Animation driver.
    pub animator: Slot<dyn Animator>,
    /// Movement tuning.
    pub movement: MovementConfig,
    /// Patrol route.
    pub route: Route,
    /// Anchors of the held rest area, while a claim is held.
    pub rest: Option<RestBinding>,
    /// Character to follow.
    pub follow_target: Option<CharacterId>,
    /// Per-character random stream.
    pub rng: SmallRng,
}

impl CharacterBody {
    /// Mutable waypoint route, if the character patrols waypoints.
    pub fn waypoints_mut(&mut self) -> Option<&mut WaypointRoute> {
        match &mut self.route {
            Route::Waypoints(route) => Some(route),
            _ => None,
        }
    }

    /// The patrol path, if present.
    #[must_use]
    pub fn path(&self) -> Option<(Arc<PathSpline>, EndOfPath)> {
        match &self.route {
            Route::Path { path: Some(path), end } => Some((Arc::clone(path), *end)),
            _ => None,
        }
    }

    /// Drop the patrol path, keeping the end-of-path setting.
    pub fn detach_path(&mut self) -> Option<Arc<PathSpline>> {
        match &mut self.route {
            Route::Path { path, .. } => path.take(),
            _ => None,
        }
    }
}

impl std::fmt::Debug for CharacterBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterBody")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("transform", &self.transform)
            .field("nav", &self.nav)
            .field("animator", &self.animator)
            .field("route", &self.route)
            .field("rest", &self.rest)
            .field("follow_target", &self.follow_target)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Registries
// ---------------------------------------------------------------------------

/// Role → policy registry.
#[derive(Default)]
pub struct RoleTable {
    policies: HashMap<Role, Box<dyn RolePolicy>>,
}

impl RoleTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with the built-in policy for every role.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::new();
        for policy in roles::standard() {
            table.insert(policy);
        }
        table
    }

    /// Register `policy` under the role it reports, replacing any previous one.
    pub fn insert(&mut self, policy: Box<dyn RolePolicy>) {
        self.policies.insert(policy.role(), policy);
    }

    /// Policy for `role`.
    #[must_use]
    pub fn get(&self, role: Role) -> Option<&dyn RolePolicy> {
        self.policies.get(&role).map(|p| &**p)
    }

    /// Check that every role has a policy.
    ///
    /// # Errors
    /// Returns `StriderError::MissingRole` for the first gap.
    pub fn validate(&self) -> Result<()> {
        match Role::ALL.into_iter().find(|r| !self.policies.contains_key(r)) {
            Some(role) => Err(StriderError::MissingRole(role)),
            None => Ok(()),
        }
    }
}

/// State id → behavior registry. Behaviors carry per-activation bookkeeping,
/// so every character owns its own table.
#[derive(Default)]
pub struct StateTable {
    behaviors: HashMap<StateId, Box<dyn StateBehavior>>,
}

impl StateTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with a fresh built-in behavior for every state.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::new();
        for behavior in states::standard() {
            let id = behavior.id();
            table.insert(id, behavior);
        }
        table
    }

    /// Register `behavior` under `id`, replacing any previous one.
    pub fn insert(&mut self, id: StateId, behavior: Box<dyn StateBehavior>) {
        self.behaviors.insert(id, behavior);
    }

    /// Behavior for `id`.
    #[must_use]
    pub fn get(&self, id: StateId) -> Option<&dyn StateBehavior> {
        self.behaviors.get(&id).map(|b| &**b)
    }

    /// Mutable behavior for `id`.
    pub fn get_mut(&mut self, id: StateId) -> Option<&mut dyn StateBehavior> {
        match self.behaviors.get_mut(&id) {
            Some(behavior) => Some(behavior.as_mut()),
            None => None,
        }
    }

    /// Check that every state has a behavior registered under its own id.
    ///
    /// # Errors
    /// Returns `StriderError::MissingState` for a gap and
    /// `StriderError::MismatchedState` for a behavior under the wrong key.
    pub fn validate(&self) -> Result<()> {
        for id in StateId::ALL {
            let Some(behavior) = self.behaviors.get(&id) else {
                return Err(StriderError::MissingState(id));
            };
            if behavior.id() != id {
                return Err(StriderError::MismatchedState {
                    registered: id,
                    reported: behavior.id(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// Lifecycle phase of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Built but not started. Stimuli are dropped.
    Spawned,
    /// Started. Ticks update the active state.
    Active,
}

/// One NPC.
pub struct Character {
    body: CharacterBody,
    activity: Activity,
    lifecycle: Lifecycle,
    can_start: bool,
    roles: RoleTable,
    states: StateTable,
    pending: VecDeque<Stimulus>,
}

impl Character {
    /// Start building a character with `id` and `role`.
    #[must_use]
    pub fn builder(id: CharacterId, role: Role) -> CharacterBuilder {
        CharacterBuilder::new(id, role)
    }

    /// Identity.
    #[must_use]
    pub fn id(&self) -> CharacterId {
        self.body.id
    }

    /// Fixed role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.body.role
    }

    /// Active state.
    #[must_use]
    pub fn state(&self) -> StateId {
        self.activity.state
    }

    /// Lifecycle phase.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Sub-phase of the resting sequence, while resting.
    #[must_use]
    pub fn rest_phase(&self) -> Option<RestPhase> {
        if self.activity.state != StateId::Resting {
            return None;
        }
        self.states.get(StateId::Resting).and_then(StateBehavior::rest_phase)
    }

    /// Read-only body.
    #[must_use]
    pub fn body(&self) -> &CharacterBody {
        &self.body
    }

    /// Mutable body, for hosts syncing transforms or swapping adapters.
    pub fn body_mut(&mut self) -> &mut CharacterBody {
        &mut self.body
    }

    /// Stimuli waiting for the next tick.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Allow the character to start on its next tick.
    pub fn permit_start(&mut self) {
        self.can_start = true;
    }

    /// Advance one frame.
    ///
    /// Queued stimuli are applied first. A spawned character with the start
    /// permit runs its role's `start` exactly once; an active one runs the
    /// role's `update`.
    pub fn tick(&mut self, env: &mut Env<'_>) {
        DispatchCounters::bump(&env.counters.ticks);
        while let Some(stimulus) = self.pending.pop_front() {
            self.deliver(stimulus, env);
        }

        match self.lifecycle {
            Lifecycle::Spawned if !self.can_start => {
                trace!(character = %self.body.id, "Waiting for start permit");
            }
            Lifecycle::Spawned => {
                self.lifecycle = Lifecycle::Active;
                DispatchCounters::bump(&env.counters.starts);
                info!(character = %self.body.id, role = %self.body.role, state = ?self.activity.state, "Character started");
                if let Some(mut cx) = self.dispatch(env) {
                    let role = cx.role;
                    role.start(&mut cx);
                }
            }
            Lifecycle::Active => {
                if let Some(mut cx) = self.dispatch(env) {
                    let role = cx.role;
                    role.update(&mut cx);
                }
            }
        }
    }

    /// Apply a physical collision now.
    pub fn on_collision(&mut self, kind: ContactKind, contact: Contact, env: &mut Env<'_>) {
        self.deliver(Stimulus::Collision(kind, contact), env);
    }

    /// Apply a trigger overlap now.
    pub fn on_trigger(&mut self, kind: ContactKind, contact: Contact, env: &mut Env<'_>) {
        self.deliver(Stimulus::Trigger(kind, contact), env);
    }

    /// Apply an animation completion now.
    pub fn on_animation(&mut self, event: AnimationEvent, env: &mut Env<'_>) {
        self.deliver(Stimulus::Animation(event), env);
    }

    /// Queue a stimulus for the next tick.
    pub fn enqueue(&mut self, stimulus: Stimulus) {
        self.pending.push_back(stimulus);
    }

    /// Run one role capability on an active character, as a behavior tree
    /// action would.
    pub fn invoke(&mut self, command: RoleCommand, env: &mut Env<'_>) {
        if self.lifecycle != Lifecycle::Active {
            debug!(character = %self.body.id, ?command, "Command before start, ignored");
            return;
        }
        if let Some(mut cx) = self.dispatch(env) {
            cx.command(command);
        }
    }

    /// Give up anything shared before the character is removed.
    pub fn retire(&mut self, env: &mut Env<'_>) {
        self.body.rest = None;
        let released = env.rest_areas.release_all(self.body.id);
        self.pending.clear();
        debug!(character = %self.body.id, released, "Character retired");
    }

    fn deliver(&mut self, stimulus: Stimulus, env: &mut Env<'_>) {
        if self.lifecycle != Lifecycle::Active {
            DispatchCounters::bump(&env.counters.stimuli_before_start);
            debug!(character = %self.body.id, ?stimulus, "Stimulus before start, dropped");
            return;
        }
        if let Stimulus::Collision(_, contact) | Stimulus::Trigger(_, contact) = &stimulus {
            if contact.owner == Some(self.body.id) {
                DispatchCounters::bump(&env.counters.stimuli_self_filtered);
                trace!(character = %self.body.id, tag = %contact.tag, "Own body, contact ignored");
                return;
            }
        }
        DispatchCounters::bump(&env.counters.stimuli_delivered);

        let Some(mut cx) = self.dispatch(env) else {
            return;
        };
        let role = cx.role;
        match stimulus {
            Stimulus::Collision(kind, contact) => role.handle_collision(kind, &contact, &mut cx),
            Stimulus::Trigger(kind, contact) => role.handle_trigger(kind, &contact, &mut cx),
            Stimulus::Animation(event) => role.handle_animation(event, &mut cx),
        }
    }

    fn dispatch<'a, 'w>(&'a mut self, env: &'a mut Env<'w>) -> Option<Dispatch<'a, 'w>> {
        let Some(role) = self.roles.get(self.body.role) else {
            error!(character = %self.body.id, role = %self.body.role, "Role registry has no policy");
            return None;
        };
        Some(Dispatch {
            role,
            body: &mut self.body,
            activity: &mut self.activity,
            states: &mut self.states,
            env,
        })
    }
}

impl std::fmt::Debug for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Character")
            .field("body", &self.body)
            .field("activity", &self.activity)
            .field("lifecycle", &self.lifecycle)
            .field("can_start", &self.can_start)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`Character`].
pub struct CharacterBuilder {
    id: CharacterId,
    role: Role,
    initial_state: StateId,
    transform: Transform,
    movement: MovementConfig,
    route: Route,
    follow_target: Option<CharacterId>,
    seed: u64,
    can_start: bool,
    nav: Option<Box<dyn NavAgent>>,
    animator: Option<Box<dyn Animator>>,
    roles: Option<RoleTable>,
    states: Option<StateTable>,
}

impl CharacterBuilder {
    fn new(id: CharacterId, role: Role) -> Self {
        Self {
            id,
            role,
            initial_state: StateId::Idle,
            transform: Transform::default(),
            movement: MovementConfig::default(),
            route: Route::None,
            follow_target: None,
            seed: 0,
            can_start: true,
            nav: None,
            animator: None,
            roles: None,
            states: None,
        }
    }

    /// State the character is in before its first transition.
    #[must_use]
    pub fn initial_state(mut self, state: StateId) -> Self {
        self.initial_state = state;
        self
    }

    /// Spawn transform.
    #[must_use]
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Movement tuning.
    #[must_use]
    pub fn movement(mut self, movement: MovementConfig) -> Self {
        self.movement = movement;
        self
    }

    /// Patrol waypoints.
    #[must_use]
    pub fn waypoints(mut self, points: Vec<Vec3>) -> Self {
        self.route = Route::Waypoints(WaypointRoute::new(points));
        self
    }

    /// Patrol waypoints with the cursor on `index`, typically the waypoint
    /// the character spawned at.
    #[must_use]
    pub fn waypoints_from(mut self, points: Vec<Vec3>, index: usize) -> Self {
        self.route = Route::Waypoints(WaypointRoute::starting_at(points, index));
        self
    }

    /// Patrol path.
    #[must_use]
    pub fn path(mut self, path: Arc<PathSpline>, end: EndOfPath) -> Self {
        self.route = Route::Path {
            path: Some(path),
            end,
        };
        self
    }

    /// Character to follow.
    #[must_use]
    pub fn follow(mut self, target: CharacterId) -> Self {
        self.follow_target = Some(target);
        self
    }

    /// Scene seed. Mixed with the id so every character draws its own stream.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Keep the character spawned until [`Character::permit_start`].
    #[must_use]
    pub fn held(mut self) -> Self {
        self.can_start = false;
        self
    }

    /// Navigation agent.
    #[must_use]
    pub fn nav(mut self, nav: Box<dyn NavAgent>) -> Self {
        self.nav = Some(nav);
        self
    }

    /// Animation driver.
    #[must_use]
    pub fn animator(mut self, animator: Box<dyn Animator>) -> Self {
        self.animator = Some(animator);
        self
    }

    /// Custom role registry.
    #[must_use]
    pub fn roles(mut self, roles: RoleTable) -> Self {
        self.roles = Some(roles);
        self
    }

    /// Custom state registry.
    #[must_use]
    pub fn states(mut self, states: StateTable) -> Self {
        self.states = Some(states);
        self
    }

    /// Validate the registries and build.
    ///
    /// # Errors
    /// Returns `StriderError::MissingRole`, `StriderError::MissingState` or
    /// `StriderError::MismatchedState` for an incomplete registry, and
    /// `StriderError::Config` for invalid movement tuning.
    pub fn build(self) -> Result<Character> {
        let roles = self.roles.unwrap_or_else(RoleTable::standard);
        let states = self.states.unwrap_or_else(StateTable::standard);
        roles.validate()?;
        states.validate()?;
        self.movement.validate()?;

        let stream = self.seed ^ u64::from(self.id.0).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        debug!(character = %self.id, role = %self.role, state = ?self.initial_state, "Character built");

        Ok(Character {
            body: CharacterBody {
                id: self.id,
                role: self.role,
                transform: self.transform,
                nav: Slot::new("nav", self.nav),
                animator: Slot::new("animator", self.animator),
                movement: self.movement,
                route: self.route,
                rest: None,
                follow_target: self.follow_target,
                rng: SmallRng::seed_from_u64(stream),
            },
            activity: Activity {
                state: self.initial_state,
                entered: false,
            },
            lifecycle: Lifecycle::Spawned,
            can_start: self.can_start,
            roles,
            states,
            pending: VecDeque::new(),
        })
    }
}
