use crate::dispatch::Dispatch;
use crate::roles::{RolePolicy, randomize_gait, rebind_animator, write_speed};
use crate::types::{Role, StateId};

/// Loops its waypoint list at a randomized speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Runner;

impl RolePolicy for Runner {
    fn role(&self) -> Role {
        Role::Runner
    }

    fn start(&self, cx: &mut Dispatch<'_, '_>) {
        randomize_gait(cx);
        rebind_animator(cx);
        self.patrol(cx);
    }

    fn update(&self, cx: &mut Dispatch<'_, '_>) {
        write_speed(cx);
        cx.update_state();
    }

    fn idle(&self, cx: &mut Dispatch<'_, '_>) {
        cx.request_state(StateId::Idle);
    }

    fn patrol(&self, cx: &mut Dispatch<'_, '_>) {
        cx.request_state(StateId::Patrolling);
    }
}

/// Follows its patrol path at a randomized speed. The path state writes the
/// animator speed itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathRunner;

impl RolePolicy for PathRunner {
    fn role(&self) -> Role {
        Role::PathRunner
    }

    fn start(&self, cx: &mut Dispatch<'_, '_>) {
        randomize_gait(cx);
        rebind_animator(cx);
        self.patrol(cx);
    }

    fn idle(&self, cx: &mut Dispatch<'_, '_>) {
        cx.request_state(StateId::Idle);
    }

    fn patrol(&self, cx: &mut Dispatch<'_, '_>) {
        cx.request_state(StateId::PathPatrolling);
    }
}
