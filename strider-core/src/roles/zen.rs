//! Scripted roles for staged scenes: a lead, its followers and a stand-in.

use crate::dispatch::Dispatch;
use crate::roles::{RolePolicy, rebind_animator, write_speed};
use crate::types::{Role, StateId};

/// Holds whatever state it was configured to start in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZenMaster;

impl RolePolicy for ZenMaster {
    fn role(&self) -> Role {
        Role::ZenMaster
    }

    fn start(&self, cx: &mut Dispatch<'_, '_>) {
        rebind_animator(cx);
        cx.enter_current_state();
    }

    fn update(&self, cx: &mut Dispatch<'_, '_>) {
        write_speed(cx);
        cx.update_state();
    }

    fn idle(&self, cx: &mut Dispatch<'_, '_>) {
        cx.request_state(StateId::Idle);
    }
}

/// Mirrors its follow target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZenPerson;

impl RolePolicy for ZenPerson {
    fn role(&self) -> Role {
        Role::ZenPerson
    }

    fn start(&self, cx: &mut Dispatch<'_, '_>) {
        rebind_animator(cx);
        self.follow(cx);
    }

    fn update(&self, cx: &mut Dispatch<'_, '_>) {
        write_speed(cx);
        cx.update_state();
    }

    fn idle(&self, cx: &mut Dispatch<'_, '_>) {
        cx.request_state(StateId::Idle);
    }

    fn follow(&self, cx: &mut Dispatch<'_, '_>) {
        cx.request_state(StateId::Following);
    }
}

/// Stands still and never touches the animator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZenDummy;

impl RolePolicy for ZenDummy {
    fn role(&self) -> Role {
        Role::ZenDummy
    }

    fn start(&self, cx: &mut Dispatch<'_, '_>) {
        self.idle(cx);
    }

    fn idle(&self, cx: &mut Dispatch<'_, '_>) {
        cx.request_state(StateId::Idle);
    }
}
