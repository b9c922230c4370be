use crate::character::CharacterBody;
use crate::dispatch::{Env, Flow};
use crate::states::StateBehavior;
use crate::types::StateId;

/// Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl StateBehavior for Idle {
    fn id(&self) -> StateId {
        StateId::Idle
    }

    fn start(&mut self, _body: &mut CharacterBody, _env: &mut Env<'_>) -> Flow {
        Flow::Continue
    }

    fn update(&mut self, _body: &mut CharacterBody, _env: &mut Env<'_>) -> Flow {
        Flow::Continue
    }
}
