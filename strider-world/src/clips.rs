//! A parameter sheet with two timed clips, standing in for an animation graph.
//!
//! Flipping the `Sitting` bool plays the sit-down or stand-up clip. When a
//! clip runs out, [`ClipHandle::advance`] reports the matching completion so
//! the host can deliver it to the character.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use strider_core::anim::{Animator, ParamId, params};
use strider_core::types::AnimationEvent;
use tracing::trace;

/// Value of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Float parameter.
    Float(f32),
    /// Bool parameter.
    Bool(bool),
    /// Trigger that fired and has not been reset since.
    Trigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipKind {
    SitDown,
    StandUp,
}

#[derive(Debug)]
struct ClipState {
    params: HashMap<ParamId, ParamValue>,
    playing: Option<(ClipKind, f32)>,
    sit_seconds: f32,
    stand_seconds: f32,
}

impl ClipState {
    fn reset(&mut self) {
        self.params.clear();
        self.playing = None;
    }

    fn sitting(&self) -> bool {
        matches!(self.params.get(&params::SITTING), Some(ParamValue::Bool(true)))
    }
}

/// Host-side handle to a clip animator.
#[derive(Debug, Clone)]
pub struct ClipHandle(Arc<Mutex<ClipState>>);

impl ClipHandle {
    /// An animator whose sit-down and stand-up clips last the given seconds.
    #[must_use]
    pub fn new(sit_seconds: f32, stand_seconds: f32) -> Self {
        Self(Arc::new(Mutex::new(ClipState {
            params: HashMap::new(),
            playing: None,
            sit_seconds,
            stand_seconds,
        })))
    }

    /// The adapter to hand to a character.
    #[must_use]
    pub fn animator(&self) -> Box<dyn Animator> {
        Box::new(ClipAnimator(Arc::clone(&self.0)))
    }

    /// Current value of a parameter.
    #[must_use]
    pub fn param(&self, id: ParamId) -> Option<ParamValue> {
        self.0.lock().params.get(&id).copied()
    }

    /// Whether a clip is playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.0.lock().playing.is_some()
    }

    /// Advance the playing clip and report its completion.
    pub fn advance(&self, dt: f32) -> Option<AnimationEvent> {
        let mut s = self.0.lock();
        let (kind, left) = s.playing?;
        let left = left - dt;
        if left > 0.0 {
            s.playing = Some((kind, left));
            return None;
        }
        s.playing = None;
        Some(match kind {
            ClipKind::SitDown => AnimationEvent::SittingFinished,
            ClipKind::StandUp => AnimationEvent::StandingUpFinished,
        })
    }
}

struct ClipAnimator(Arc<Mutex<ClipState>>);

impl Animator for ClipAnimator {
    fn set_trigger(&mut self, id: ParamId) {
        trace!(param = %id, "Trigger fired");
        self.0.lock().params.insert(id, ParamValue::Trigger);
    }

    fn set_float(&mut self, id: ParamId, value: f32) {
        self.0.lock().params.insert(id, ParamValue::Float(value));
    }

    fn set_bool(&mut self, id: ParamId, value: bool) {
        let mut s = self.0.lock();
        if id == params::SITTING && s.sitting() != value {
            let clip = if value {
                (ClipKind::SitDown, s.sit_seconds)
            } else {
                (ClipKind::StandUp, s.stand_seconds)
            };
            trace!(clip = ?clip.0, seconds = clip.1, "Clip started");
            s.playing = Some(clip);
        }
        s.params.insert(id, ParamValue::Bool(value));
    }

    fn rebind(&mut self) {
        self.0.lock().reset();
    }
}
