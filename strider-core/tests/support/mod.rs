//! Scripted adapter doubles shared by the integration tests.
//!
//! Each double keeps its state behind an `Arc<Mutex<_>>`, so a test holds a
//! handle to inspect and steer the adapter after handing the boxed adapter
//! to the character.

#![allow(dead_code)]

use std::sync::Arc;

use glam::Vec3;
use parking_lot::{Mutex, MutexGuard};
use strider_core::anim::{Animator, ParamId};
use strider_core::nav::NavAgent;

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Everything the scripted agent was told, plus what it reports back.
#[derive(Debug)]
pub struct NavState {
    pub destinations: Vec<Vec3>,
    pub warps: Vec<Vec3>,
    pub samples: Vec<Vec3>,
    pub remaining: f32,
    pub stopping: f32,
    pub pending: bool,
    pub has_path: bool,
    pub stopped: bool,
    pub velocity: Vec3,
    pub speed: f32,
    pub acceleration: f32,
    /// Distance reported right after `set_destination`. Zero arrives at once.
    pub travel: f32,
    /// Reject this many upcoming `sample_position` calls.
    pub reject_samples: usize,
    /// Number of mutating calls received, including ones that wrote the
    /// value already set.
    pub writes: usize,
}

/// What a character has done to its agent so far, for before/after checks.
#[derive(Debug, Clone, PartialEq)]
pub struct NavFootprint {
    pub destinations: Vec<Vec3>,
    pub warps: Vec<Vec3>,
    pub samples: Vec<Vec3>,
    pub stopped: bool,
    pub speed: f32,
    pub acceleration: f32,
    pub writes: usize,
}

impl Default for NavState {
    fn default() -> Self {
        Self {
            destinations: Vec::new(),
            warps: Vec::new(),
            samples: Vec::new(),
            remaining: 0.0,
            stopping: 0.5,
            pending: false,
            has_path: false,
            stopped: false,
            velocity: Vec3::ZERO,
            speed: 3.5,
            acceleration: 8.0,
            travel: 10.0,
            reject_samples: 0,
            writes: 0,
        }
    }
}

/// Test-side handle to a [`ScriptedNav`].
#[derive(Debug, Clone, Default)]
pub struct NavHandle(Arc<Mutex<NavState>>);

impl NavHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// An agent that arrives the moment it gets a destination.
    pub fn instant() -> Self {
        let handle = Self::new();
        handle.state().travel = 0.0;
        handle
    }

    pub fn agent(&self) -> Box<dyn NavAgent> {
        Box::new(ScriptedNav(Arc::clone(&self.0)))
    }

    pub fn state(&self) -> MutexGuard<'_, NavState> {
        self.0.lock()
    }

    /// Pretend the agent reached its destination.
    pub fn arrive(&self) {
        let mut s = self.state();
        s.remaining = 0.0;
        s.pending = false;
    }

    pub fn footprint(&self) -> NavFootprint {
        let s = self.state();
        NavFootprint {
            destinations: s.destinations.clone(),
            warps: s.warps.clone(),
            samples: s.samples.clone(),
            stopped: s.stopped,
            speed: s.speed,
            acceleration: s.acceleration,
            writes: s.writes,
        }
    }

    pub fn destinations(&self) -> Vec<Vec3> {
        self.state().destinations.clone()
    }

    pub fn last_destination(&self) -> Option<Vec3> {
        self.state().destinations.last().copied()
    }
}

struct ScriptedNav(Arc<Mutex<NavState>>);

impl NavAgent for ScriptedNav {
    fn set_destination(&mut self, point: Vec3) {
        let mut s = self.0.lock();
        s.writes += 1;
        s.destinations.push(point);
        s.has_path = true;
        s.remaining = s.travel;
    }

    fn remaining_distance(&self) -> f32 {
        self.0.lock().remaining
    }

    fn stopping_distance(&self) -> f32 {
        self.0.lock().stopping
    }

    fn path_pending(&self) -> bool {
        self.0.lock().pending
    }

    fn has_path(&self) -> bool {
        self.0.lock().has_path
    }

    fn set_stopped(&mut self, stopped: bool) {
        let mut s = self.0.lock();
        s.writes += 1;
        s.stopped = stopped;
    }

    fn is_stopped(&self) -> bool {
        self.0.lock().stopped
    }

    fn velocity(&self) -> Vec3 {
        self.0.lock().velocity
    }

    fn speed(&self) -> f32 {
        self.0.lock().speed
    }

    fn set_speed(&mut self, speed: f32) {
        let mut s = self.0.lock();
        s.writes += 1;
        s.speed = speed;
    }

    fn set_acceleration(&mut self, acceleration: f32) {
        let mut s = self.0.lock();
        s.writes += 1;
        s.acceleration = acceleration;
    }

    fn warp(&mut self, position: Vec3) {
        let mut s = self.0.lock();
        s.writes += 1;
        s.warps.push(position);
        s.remaining = 0.0;
        s.has_path = false;
    }

    fn sample_position(&self, point: Vec3, _max_distance: f32) -> Option<Vec3> {
        let mut s = self.0.lock();
        s.samples.push(point);
        if s.reject_samples > 0 {
            s.reject_samples -= 1;
            return None;
        }
        Some(point)
    }
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// One animator write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimCall {
    Trigger(ParamId),
    Float(ParamId, f32),
    Bool(ParamId, bool),
    Rebind,
}

/// Test-side handle to a recording animator.
#[derive(Debug, Clone, Default)]
pub struct AnimHandle(Arc<Mutex<Vec<AnimCall>>>);

impl AnimHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animator(&self) -> Box<dyn Animator> {
        Box::new(RecordingAnimator(Arc::clone(&self.0)))
    }

    pub fn calls(&self) -> Vec<AnimCall> {
        self.0.lock().clone()
    }

    /// Every value written to the bool `id`, in order.
    pub fn bools(&self, id: ParamId) -> Vec<bool> {
        self.0
            .lock()
            .iter()
            .filter_map(|c| match c {
                AnimCall::Bool(p, v) if *p == id => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn last_float(&self, id: ParamId) -> Option<f32> {
        self.0.lock().iter().rev().find_map(|c| match c {
            AnimCall::Float(p, v) if *p == id => Some(*v),
            _ => None,
        })
    }

    pub fn rebinds(&self) -> usize {
        self.0.lock().iter().filter(|c| **c == AnimCall::Rebind).count()
    }
}

struct RecordingAnimator(Arc<Mutex<Vec<AnimCall>>>);

impl Animator for RecordingAnimator {
    fn set_trigger(&mut self, id: ParamId) {
        self.0.lock().push(AnimCall::Trigger(id));
    }

    fn set_float(&mut self, id: ParamId, value: f32) {
        self.0.lock().push(AnimCall::Float(id, value));
    }

    fn set_bool(&mut self, id: ParamId, value: bool) {
        self.0.lock().push(AnimCall::Bool(id, value));
    }

    fn rebind(&mut self) {
        self.0.lock().push(AnimCall::Rebind);
    }
}
