use tracing::{debug, warn};

use crate::dispatch::Dispatch;
use crate::events::{CustomEvent, CustomEventKind, EventTarget};
use crate::metrics::DispatchCounters;
use crate::roles::{RolePolicy, rebind_animator, write_speed};
use crate::types::{Contact, ContactKind, Role, StateId, tags};

/// Wanders, and sits down in any free rest area it walks into.
#[derive(Debug, Clone, Copy, Default)]
pub struct Elder;

impl Elder {
    fn enter_area(&self, contact: &Contact, cx: &mut Dispatch<'_, '_>) {
        let (body, env) = cx.parts();
        let Some(area) = contact.rest_area else {
            warn!(character = %body.id, "Rest area trigger without an area id");
            return;
        };
        if let Some(held) = body.rest {
            if held.area != area {
                debug!(character = %body.id, held = %held.area, area = %area, "Already holding another rest area");
                return;
            }
        }

        match env.rest_areas.try_claim(area, body.id) {
            Ok(Some(binding)) => {
                body.rest = Some(binding);
                DispatchCounters::bump(&env.counters.claims_granted);
                env.events.raise(&CustomEvent {
                    kind: CustomEventKind::SomethingFound,
                    raiser: body.id,
                    target: Some(EventTarget::RestArea(area)),
                    value: body.movement.resting_time,
                });
                self.rest(cx);
            }
            Ok(None) => DispatchCounters::bump(&env.counters.claims_declined),
            Err(e) => warn!(character = %body.id, error = %e, "Rest area claim failed"),
        }
    }
}

impl RolePolicy for Elder {
    fn role(&self) -> Role {
        Role::Elder
    }

    fn start(&self, cx: &mut Dispatch<'_, '_>) {
        rebind_animator(cx);
        self.wander(cx);
    }

    fn update(&self, cx: &mut Dispatch<'_, '_>) {
        write_speed(cx);
        cx.update_state();
    }

    fn handle_trigger(&self, kind: ContactKind, contact: &Contact, cx: &mut Dispatch<'_, '_>) {
        if !contact.has_tag(tags::REST_AREA) {
            return;
        }
        match kind {
            ContactKind::Enter => self.enter_area(contact, cx),
            ContactKind::Exit => {
                let held = cx.body().rest.map(|b| b.area);
                if held.is_some() && held == contact.rest_area {
                    self.stop_resting(cx);
                }
            }
            ContactKind::Stay => {}
        }
    }

    fn idle(&self, cx: &mut Dispatch<'_, '_>) {
        cx.request_state(StateId::Idle);
    }

    fn wander(&self, cx: &mut Dispatch<'_, '_>) {
        cx.request_state(StateId::Wandering);
    }

    fn rest(&self, cx: &mut Dispatch<'_, '_>) {
        cx.request_state(StateId::Resting);
    }

    fn stop_resting(&self, cx: &mut Dispatch<'_, '_>) {
        let (body, env) = cx.parts();
        if let Some(binding) = body.rest.take() {
            env.rest_areas.release(binding.area, body.id);
        }
        self.wander(cx);
    }
}
