//! Walk into a claimed rest area, sit, wait, stand up and walk out.
//!
//! The sequence is driven by animation completions: the seated countdown
//! only starts once the sit-down clip reports it finished, and the character
//! only walks to the exit anchor once the stand-up clip has finished.
//! Completions that arrive out of phase are ignored.

use tracing::{debug, warn};

use crate::anim::params;
use crate::character::CharacterBody;
use crate::dispatch::{Env, Flow, RoleCommand};
use crate::states::StateBehavior;
use crate::types::{AnimationEvent, StateId, look_rotation};

/// Where a character is in the resting sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestPhase {
    /// Walking to the enter anchor, turning and sitting down.
    #[default]
    Entering,
    /// Seated, counting down.
    Seated,
    /// Standing up and walking to the exit anchor.
    Exiting,
}

/// The resting sequence. Requires a rest claim on the body.
#[derive(Debug, Clone, Default)]
pub struct Resting {
    phase: RestPhase,
    countdown: f32,
    sit_requested: bool,
    stand_requested: bool,
    reported: bool,
}

impl Resting {
    /// Seconds left seated.
    #[must_use]
    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    fn report_unbound(&mut self, body: &CharacterBody) {
        if !self.reported {
            warn!(character = %body.id, "Resting without a rest area claim, staying put");
            self.reported = true;
        }
    }

    fn enter(&mut self, body: &mut CharacterBody, env: &mut Env<'_>) {
        if self.sit_requested {
            return;
        }
        let Some(binding) = body.rest else {
            self.report_unbound(body);
            return;
        };
        let id = body.id;
        let Some(nav) = body.nav.get(id, "rest") else {
            return;
        };
        if nav.path_pending() || nav.remaining_distance() > nav.stopping_distance() {
            return;
        }
        nav.set_stopped(true);

        // Face the exit anchor before sitting.
        if let Some(facing) = look_rotation(binding.exit - body.transform.position) {
            let off_by = body.transform.rotation.angle_between(facing).to_degrees();
            if off_by > env.resting.face_tolerance_deg {
                let t = (env.dt * env.resting.turn_rate).min(1.0);
                body.transform.rotation = body.transform.rotation.slerp(facing, t);
                return;
            }
        }

        if let Some(animator) = body.animator.get(id, "rest") {
            animator.set_bool(params::SITTING, true);
            self.sit_requested = true;
            debug!(character = %id, area = %binding.area, "Sitting down");
        }
    }

    fn sit(&mut self, body: &mut CharacterBody, env: &mut Env<'_>) {
        self.countdown -= env.dt;
        if self.countdown > 0.0 || self.stand_requested {
            return;
        }
        let id = body.id;
        if let Some(animator) = body.animator.get(id, "rest") {
            animator.set_bool(params::SITTING, false);
            self.stand_requested = true;
            debug!(character = %id, "Standing up");
        }
    }

    fn leave(body: &mut CharacterBody) -> Flow {
        let id = body.id;
        let Some(nav) = body.nav.get(id, "rest") else {
            return Flow::Continue;
        };
        if nav.path_pending() || nav.remaining_distance() > nav.stopping_distance() {
            return Flow::Continue;
        }
        debug!(character = %id, "Left rest area");
        Flow::Role(RoleCommand::StopResting)
    }
}

impl StateBehavior for Resting {
    fn id(&self) -> StateId {
        StateId::Resting
    }

    fn start(&mut self, body: &mut CharacterBody, _env: &mut Env<'_>) -> Flow {
        *self = Self {
            countdown: body.movement.resting_time,
            ..Self::default()
        };
        let Some(binding) = body.rest else {
            self.report_unbound(body);
            return Flow::Continue;
        };
        let id = body.id;
        if let Some(nav) = body.nav.get(id, "rest") {
            nav.set_stopped(false);
            nav.set_destination(binding.enter);
        }
        Flow::Continue
    }

    fn update(&mut self, body: &mut CharacterBody, env: &mut Env<'_>) -> Flow {
        match self.phase {
            RestPhase::Entering => {
                self.enter(body, env);
                Flow::Continue
            }
            RestPhase::Seated => {
                self.sit(body, env);
                Flow::Continue
            }
            RestPhase::Exiting => Self::leave(body),
        }
    }

    fn on_animation(&mut self, event: AnimationEvent, body: &mut CharacterBody, _env: &mut Env<'_>) -> Flow {
        match (event, self.phase) {
            (AnimationEvent::SittingFinished, RestPhase::Entering) if self.sit_requested => {
                self.phase = RestPhase::Seated;
                self.countdown = body.movement.resting_time;
                debug!(character = %body.id, seconds = self.countdown, "Seated");
            }
            (AnimationEvent::StandingUpFinished, RestPhase::Seated) if self.stand_requested => {
                self.phase = RestPhase::Exiting;
                let id = body.id;
                let exit = body.rest.map(|b| b.exit);
                if let (Some(exit), Some(nav)) = (exit, body.nav.get(id, "rest")) {
                    nav.set_stopped(false);
                    nav.set_destination(exit);
                }
            }
            _ => {
                debug!(character = %body.id, ?event, phase = ?self.phase, "Animation event out of phase, ignored");
            }
        }
        Flow::Continue
    }

    fn rest_phase(&self) -> Option<RestPhase> {
        Some(self.phase)
    }
}
