//! # Strider Core
//!
//! Engine-agnostic behavior core for ambient NPCs.
//!
//! Every [`Character`] pairs a fixed [`Role`] with a current [`StateId`]:
//!
//! - **Role policies** decide how a character reacts to stimuli and which
//!   capabilities (rest, patrol, wander, follow, idle) it supports.
//! - **State behaviors** carry the per-frame logic: patrolling a waypoint
//!   loop, riding a path, wandering, following, sitting in a rest area.
//!
//! A state never switches itself. It returns a [`Flow`] that hands a
//! [`RoleCommand`] back to the active role, and the role decides which state
//! comes next through [`Dispatch::request_state`].
//!
//! The host supplies navigation and animation through the [`NavAgent`] and
//! [`Animator`] traits and drives everything with [`Character::tick`].

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod anim;
pub mod character;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod metrics;
pub mod nav;
pub mod path;
pub mod rest_area;
pub mod roles;
pub mod states;
pub mod types;

pub use anim::{Animator, ParamId};
pub use character::{Character, CharacterBody, CharacterBuilder, Lifecycle, Route, RoleTable, StateTable};
pub use config::{MovementConfig, StriderConfig};
pub use dispatch::{Dispatch, Env, Flow, RoleCommand, Services, TransformIndex};
pub use error::{Result, StriderError};
pub use events::{CustomEvent, CustomEventKind, Delivery, EventBus, EventTarget};
pub use metrics::{CounterSnapshot, DispatchCounters};
pub use nav::NavAgent;
pub use path::{EndOfPath, PathSpline};
pub use rest_area::{RestArea, RestAreaId, RestAreas, RestBinding};
pub use roles::RolePolicy;
pub use states::{RestPhase, StateBehavior};
pub use types::*;
