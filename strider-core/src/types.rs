//! Core type definitions shared by roles, states and the dispatcher.

use std::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::rest_area::RestAreaId;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Identifier of one character instance, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub u32);

impl CharacterId {
    /// Index form, for hosts storing characters in a `Vec`.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "npc#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Role & State
// ---------------------------------------------------------------------------

/// What kind of creature a character is. Fixed for the character's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Wanders around and sits down in free rest areas.
    Elder,
    /// Loops a waypoint list.
    Runner,
    /// Follows a continuous path.
    PathRunner,
    /// Scripted stand-in that never moves.
    ZenDummy,
    /// Scripted lead that holds its configured state.
    ZenMaster,
    /// Scripted follower that mirrors a target.
    ZenPerson,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 6] = [
        Role::Elder,
        Role::Runner,
        Role::PathRunner,
        Role::ZenDummy,
        Role::ZenMaster,
        Role::ZenPerson,
    ];

    /// Stable display name, matching the serialized form.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Elder => "Elder",
            Self::Runner => "Runner",
            Self::PathRunner => "PathRunner",
            Self::ZenDummy => "ZenDummy",
            Self::ZenMaster => "ZenMaster",
            Self::ZenPerson => "ZenPerson",
        }
    }

    /// Look a role up by its display name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a character is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StateId {
    /// Standing still.
    #[default]
    Idle,
    /// Glued to a target with a fixed offset.
    Following,
    /// Walking into, sitting in and leaving a rest area.
    Resting,
    /// Looping a waypoint list.
    Patrolling,
    /// Following a continuous path.
    PathPatrolling,
    /// Picking random destinations.
    Wandering,
}

impl StateId {
    /// Every state, in declaration order.
    pub const ALL: [StateId; 6] = [
        StateId::Idle,
        StateId::Following,
        StateId::Resting,
        StateId::Patrolling,
        StateId::PathPatrolling,
        StateId::Wandering,
    ];
}

// ---------------------------------------------------------------------------
// Stimuli
// ---------------------------------------------------------------------------

/// Phase of a collision or trigger overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    /// First frame of contact.
    Enter,
    /// Every following frame while the contact persists.
    Stay,
    /// Contact ended.
    Exit,
}

/// Tags carried by world bodies.
pub mod tags {
    /// Trigger volume of a rest area.
    pub const REST_AREA: &str = "RestArea";
    /// Another character.
    pub const CHARACTER: &str = "Character";
    /// Static prop.
    pub const PROP: &str = "Prop";
}

/// The other body involved in a collision or trigger callback.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Semantic tag of the body, e.g. [`tags::REST_AREA`].
    pub tag: String,
    /// Character the body belongs to, if any. Used for the self-filter.
    pub owner: Option<CharacterId>,
    /// Rest area the body is the trigger volume of, if any.
    pub rest_area: Option<RestAreaId>,
}

impl Contact {
    /// A body with a tag and nothing else.
    #[must_use]
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            owner: None,
            rest_area: None,
        }
    }

    /// The trigger volume of a rest area.
    #[must_use]
    pub fn rest_area(id: RestAreaId) -> Self {
        Self {
            tag: tags::REST_AREA.to_string(),
            owner: None,
            rest_area: Some(id),
        }
    }

    /// A body (or child body) of a character.
    #[must_use]
    pub fn character(owner: CharacterId) -> Self {
        Self {
            tag: tags::CHARACTER.to_string(),
            owner: Some(owner),
            rest_area: None,
        }
    }

    /// Whether the body carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag == tag
    }
}

/// Completion callbacks raised by the animation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationEvent {
    /// The sit-down clip finished.
    SittingFinished,
    /// The stand-up clip finished.
    StandingUpFinished,
}

/// A world stimulus waiting to be applied to a character.
#[derive(Debug, Clone, PartialEq)]
pub enum Stimulus {
    /// Physical collision.
    Collision(ContactKind, Contact),
    /// Trigger volume overlap.
    Trigger(ContactKind, Contact),
    /// Animation clip completion.
    Animation(AnimationEvent),
}

// ---------------------------------------------------------------------------
// Spatial
// ---------------------------------------------------------------------------

/// Position and orientation of a character. Forward is +Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World position.
    pub position: Vec3,
    /// World rotation.
    pub rotation: Quat,
}

impl Transform {
    /// A transform at `position` facing +Z.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Unit forward vector.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Yaw-only rotation that looks along `direction`. Returns `None` for a
/// direction with no horizontal component.
#[must_use]
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(Quat::from_rotation_y(flat.x.atan2(flat.z)))
}
