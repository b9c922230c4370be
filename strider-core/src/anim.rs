//! Animation adapter boundary and parameter ids.

use std::fmt;

/// Hashed id of an animation graph parameter.
///
/// Ids are FNV-1a hashes of the parameter name so hosts can map them back to
/// their own graph without a shared string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

impl ParamId {
    /// Hash a parameter name.
    #[must_use]
    pub const fn of(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash: u32 = 0x811c_9dc5;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u32;
            hash = hash.wrapping_mul(0x0100_0193);
            i += 1;
        }
        Self(hash)
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Well-known parameters driven by the core.
pub mod params {
    use super::ParamId;

    /// Float: locomotion blend speed.
    pub const SPEED: ParamId = ParamId::of("Speed");
    /// Bool: true while the character should be seated.
    pub const SITTING: ParamId = ParamId::of("Sitting");
}

/// The animation graph of one character.
pub trait Animator: Send {
    /// Fire a trigger parameter.
    fn set_trigger(&mut self, id: ParamId);

    /// Write a float parameter.
    fn set_float(&mut self, id: ParamId, value: f32);

    /// Write a bool parameter.
    fn set_bool(&mut self, id: ParamId, value: bool);

    /// Reset every parameter and return to the entry state.
    fn rebind(&mut self);
}
