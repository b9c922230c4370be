//! Overlap tracking: turns per-frame positions into enter/stay/exit contacts.

use std::collections::HashSet;

use glam::Vec3;
use strider_core::rest_area::{RestAreaId, RestAreas};
use strider_core::types::{CharacterId, Contact, ContactKind, Stimulus};

/// Radius of a character's collision body.
pub const BODY_RADIUS: f32 = 0.4;

/// Remembers which overlaps were active last frame.
#[derive(Debug, Default)]
pub struct OverlapTracker {
    triggers: HashSet<(CharacterId, RestAreaId)>,
    bodies: HashSet<(CharacterId, CharacterId)>,
}

fn edge(was: bool, is: bool) -> Option<ContactKind> {
    match (was, is) {
        (false, true) => Some(ContactKind::Enter),
        (true, true) => Some(ContactKind::Stay),
        (true, false) => Some(ContactKind::Exit),
        (false, false) => None,
    }
}

fn flat_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(a.x - b.x, 0.0, a.z - b.z).length()
}

impl OverlapTracker {
    /// Empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger stimuli for `who` standing at `position`.
    pub fn rest_areas(&mut self, who: CharacterId, position: Vec3, areas: &RestAreas) -> Vec<Stimulus> {
        let mut out = Vec::new();
        for (id, area) in areas.iter() {
            let key = (who, id);
            let inside = flat_distance(position, area.enter) <= area.radius;
            let was = if inside {
                !self.triggers.insert(key)
            } else {
                self.triggers.remove(&key)
            };
            if let Some(kind) = edge(was, inside) {
                out.push(Stimulus::Trigger(kind, Contact::rest_area(id)));
            }
        }
        out
    }

    /// Collision stimuli between character bodies, as `(receiver, stimulus)`.
    pub fn bodies(&mut self, positions: &[(CharacterId, Vec3)]) -> Vec<(CharacterId, Stimulus)> {
        let mut out = Vec::new();
        for (i, &(a, pa)) in positions.iter().enumerate() {
            for &(b, pb) in &positions[i + 1..] {
                let key = if a < b { (a, b) } else { (b, a) };
                let touching = flat_distance(pa, pb) <= BODY_RADIUS * 2.0;
                let was = if touching {
                    !self.bodies.insert(key)
                } else {
                    self.bodies.remove(&key)
                };
                if let Some(kind) = edge(was, touching) {
                    out.push((a, Stimulus::Collision(kind, Contact::character(b))));
                    out.push((b, Stimulus::Collision(kind, Contact::character(a))));
                }
            }
        }
        out
    }

    /// Drop everything remembered about `who`.
    pub fn forget(&mut self, who: CharacterId) {
        self.triggers.retain(|(c, _)| *c != who);
        self.bodies.retain(|(a, b)| *a != who && *b != who);
    }
}
