//! # strider-world: reference host for the Strider behavior core
//!
//! Provides just enough world for characters to live in:
//!
//! - `kinematic`: straight-line [`NavAgent`](strider_core::NavAgent) over a
//!   rectangular walkable area
//! - `clips`: an [`Animator`](strider_core::Animator) with timed sit-down and
//!   stand-up clips that report their completion
//! - `triggers`: enter/stay/exit tracking for rest-area volumes and bodies
//! - `scene`: the frame loop tying them to the characters

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clips;
pub mod kinematic;
pub mod scene;
pub mod triggers;

pub use clips::{ClipHandle, ParamValue};
pub use kinematic::{AgentHandle, NavBounds};
pub use scene::Scene;
pub use triggers::OverlapTracker;
