//! Rest areas: single-occupant slots shared by every character in a scene.
//!
//! Exclusivity is a check-then-claim on the occupant inside one `&mut`
//! method, so it cannot interleave with another claim as long as the host
//! ticks characters one at a time. A host that ticks in parallel must put
//! [`RestAreas`] behind a lock.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, StriderError};
use crate::types::CharacterId;

/// Index of a rest area within its [`RestAreas`] registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RestAreaId(pub u32);

impl fmt::Display for RestAreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rest#{}", self.0)
    }
}

/// A bench, a log, a spot under a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RestArea {
    /// Where a character walks to before sitting down.
    pub enter: Vec3,
    /// Where a character faces while seated and walks to when leaving.
    pub exit: Vec3,
    /// Radius of the trigger volume around `enter`.
    pub radius: f32,
    occupant: Option<CharacterId>,
}

impl RestArea {
    /// A free rest area.
    #[must_use]
    pub fn new(enter: Vec3, exit: Vec3, radius: f32) -> Self {
        Self {
            enter,
            exit,
            radius,
            occupant: None,
        }
    }

    /// Whether someone holds the area.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Current occupant.
    #[must_use]
    pub fn occupant(&self) -> Option<CharacterId> {
        self.occupant
    }
}

/// Anchors a character copies in while it holds a rest area claim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestBinding {
    /// The claimed area.
    pub area: RestAreaId,
    /// Enter anchor.
    pub enter: Vec3,
    /// Exit anchor.
    pub exit: Vec3,
}

/// All rest areas in a scene.
#[derive(Debug, Clone, Default)]
pub struct RestAreas {
    areas: Vec<RestArea>,
}

impl RestAreas {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an area and return its id.
    pub fn add(&mut self, area: RestArea) -> RestAreaId {
        let id = RestAreaId(self.areas.len() as u32);
        self.areas.push(area);
        id
    }

    /// Look an area up.
    #[must_use]
    pub fn get(&self, id: RestAreaId) -> Option<&RestArea> {
        self.areas.get(id.0 as usize)
    }

    /// Iterate over `(id, area)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (RestAreaId, &RestArea)> {
        self.areas
            .iter()
            .enumerate()
            .map(|(i, a)| (RestAreaId(i as u32), a))
    }

    /// Number of registered areas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Whether no areas are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Claim `id` for `who` if it is free or already held by `who`.
    ///
    /// Returns the anchors on success and `Ok(None)` when someone else holds
    /// the area. Contention is not an error.
    ///
    /// # Errors
    /// Returns `StriderError::UnknownRestArea` if `id` is not registered.
    pub fn try_claim(&mut self, id: RestAreaId, who: CharacterId) -> Result<Option<RestBinding>> {
        let area = self
            .areas
            .get_mut(id.0 as usize)
            .ok_or(StriderError::UnknownRestArea(id))?;
        match area.occupant {
            Some(holder) if holder != who => {
                debug!(area = %id, character = %who, holder = %holder, "Rest area occupied, claim declined");
                Ok(None)
            }
            _ => {
                area.occupant = Some(who);
                info!(area = %id, character = %who, "Rest area claimed");
                Ok(Some(RestBinding {
                    area: id,
                    enter: area.enter,
                    exit: area.exit,
                }))
            }
        }
    }

    /// Release `id` if `who` holds it. Returns whether anything was released.
    pub fn release(&mut self, id: RestAreaId, who: CharacterId) -> bool {
        match self.areas.get_mut(id.0 as usize) {
            Some(area) if area.occupant == Some(who) => {
                area.occupant = None;
                info!(area = %id, character = %who, "Rest area released");
                true
            }
            _ => false,
        }
    }

    /// Release every area held by `who`. Used when a character is removed.
    pub fn release_all(&mut self, who: CharacterId) -> usize {
        let mut released = 0;
        for area in &mut self.areas {
            if area.occupant == Some(who) {
                area.occupant = None;
                released += 1;
            }
        }
        released
    }
}
