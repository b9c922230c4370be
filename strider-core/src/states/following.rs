use std::f32::consts::PI;

use glam::{Quat, Vec3};
use tracing::{debug, warn};

use crate::character::CharacterBody;
use crate::dispatch::{Env, Flow, RoleCommand};
use crate::states::StateBehavior;
use crate::types::{StateId, Transform};

/// Keeps the character at a fixed offset from its follow target, mirroring
/// the target's facing. Falls back to idle when there is nothing to follow.
#[derive(Debug, Clone, Default)]
pub struct Following {
    offset: Vec3,
}

impl Following {
    fn target<'e>(body: &CharacterBody, env: &'e Env<'_>) -> Option<&'e Transform> {
        let Some(target) = body.follow_target else {
            debug!(character = %body.id, "No follow target, going idle");
            return None;
        };
        let found = env.transforms.get(target);
        if found.is_none() {
            warn!(character = %body.id, target = %target, "Follow target not in scene, going idle");
        }
        found
    }
}

impl StateBehavior for Following {
    fn id(&self) -> StateId {
        StateId::Following
    }

    fn start(&mut self, body: &mut CharacterBody, env: &mut Env<'_>) -> Flow {
        let Some(target) = Self::target(body, env) else {
            self.offset = Vec3::ZERO;
            return Flow::Role(RoleCommand::Idle);
        };
        self.offset = body.transform.position - target.position;
        Flow::Continue
    }

    fn update(&mut self, body: &mut CharacterBody, env: &mut Env<'_>) -> Flow {
        let Some(target) = Self::target(body, env).copied() else {
            return Flow::Role(RoleCommand::Idle);
        };
        let position = target.position + self.offset;
        body.transform = Transform {
            position,
            rotation: target.rotation.inverse() * Quat::from_rotation_y(PI),
        };
        if let Some(nav) = body.nav.quiet() {
            nav.warp(position);
        }
        Flow::Continue
    }
}
