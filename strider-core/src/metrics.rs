//! Dispatch counters.
//!
//! Lock-free `AtomicU64` counters bumped on the dispatch hot path and read
//! by the host when it wants a summary. A single [`DispatchCounters`] is
//! shared by every character in a scene.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for high-frequency dispatch events.
#[derive(Debug)]
pub struct DispatchCounters {
    /// Character ticks processed (including no-op ticks before start).
    pub ticks: AtomicU64,
    /// Role `start` invocations (one per character lifetime).
    pub starts: AtomicU64,
    /// State transitions applied through `request_state`.
    pub transitions: AtomicU64,
    /// `request_state` calls that were no-ops because the state was active.
    pub redundant_requests: AtomicU64,
    /// Stimuli handed to a role or state.
    pub stimuli_delivered: AtomicU64,
    /// Stimuli discarded by the self-collision filter.
    pub stimuli_self_filtered: AtomicU64,
    /// Stimuli discarded because the character had not started yet.
    pub stimuli_before_start: AtomicU64,
    /// Rest area claims granted.
    pub claims_granted: AtomicU64,
    /// Rest area claims declined because the area was held.
    pub claims_declined: AtomicU64,
}

impl DispatchCounters {
    /// Create a new set of zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            starts: AtomicU64::new(0),
            transitions: AtomicU64::new(0),
            redundant_requests: AtomicU64::new(0),
            stimuli_delivered: AtomicU64::new(0),
            stimuli_self_filtered: AtomicU64::new(0),
            stimuli_before_start: AtomicU64::new(0),
            claims_granted: AtomicU64::new(0),
            claims_declined: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            starts: self.starts.load(Ordering::Relaxed),
            transitions: self.transitions.load(Ordering::Relaxed),
            redundant_requests: self.redundant_requests.load(Ordering::Relaxed),
            stimuli_delivered: self.stimuli_delivered.load(Ordering::Relaxed),
            stimuli_self_filtered: self.stimuli_self_filtered.load(Ordering::Relaxed),
            stimuli_before_start: self.stimuli_before_start.load(Ordering::Relaxed),
            claims_granted: self.claims_granted.load(Ordering::Relaxed),
            claims_declined: self.claims_declined.load(Ordering::Relaxed),
        }
    }
}

impl Default for DispatchCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// A snapshot of counter values at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Character ticks processed.
    pub ticks: u64,
    /// Role starts.
    pub starts: u64,
    /// Applied state transitions.
    pub transitions: u64,
    /// No-op state requests.
    pub redundant_requests: u64,
    /// Stimuli delivered.
    pub stimuli_delivered: u64,
    /// Stimuli dropped by the self-filter.
    pub stimuli_self_filtered: u64,
    /// Stimuli dropped before start.
    pub stimuli_before_start: u64,
    /// Rest area claims granted.
    pub claims_granted: u64,
    /// Rest area claims declined.
    pub claims_declined: u64,
}

impl CounterSnapshot {
    /// Format as Prometheus-compatible text.
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        let rows = [
            ("strider_ticks_total", "Character ticks processed", self.ticks),
            ("strider_starts_total", "Role start invocations", self.starts),
            ("strider_transitions_total", "State transitions applied", self.transitions),
            ("strider_redundant_requests_total", "No-op state requests", self.redundant_requests),
            ("strider_stimuli_delivered_total", "Stimuli delivered", self.stimuli_delivered),
            ("strider_stimuli_self_filtered_total", "Stimuli dropped by self-filter", self.stimuli_self_filtered),
            ("strider_stimuli_before_start_total", "Stimuli dropped before start", self.stimuli_before_start),
            ("strider_claims_granted_total", "Rest area claims granted", self.claims_granted),
            ("strider_claims_declined_total", "Rest area claims declined", self.claims_declined),
        ];
        let mut out = String::new();
        for (name, help, value) in rows {
            out.push_str(&format!("# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}\n"));
        }
        out
    }
}
