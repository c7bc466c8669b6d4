//! Base-address change detection and the refresh gate

use crate::core::types::Address;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// "Refresh in flight" flag shared by the poll loop and manual refreshes.
///
/// At most one guard exists at a time; dropping it reopens the gate.
#[derive(Debug, Clone, Default)]
pub struct RefreshGate {
    busy: Arc<AtomicBool>,
}

/// Held for the duration of one refresh
#[derive(Debug)]
pub struct RefreshGuard {
    busy: Arc<AtomicBool>,
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claims the gate, or `None` while another refresh holds it
    pub fn try_begin(&self) -> Option<RefreshGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshGuard {
                busy: Arc::clone(&self.busy),
            })
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// What a poll tick should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDecision {
    /// Not capturing
    Idle,
    /// A refresh is in flight; the tick is dropped
    Busy,
    /// No address, or the same address as last time
    Unchanged,
    /// A new address was observed and a refresh is due
    Changed(Address),
}

/// Tracks the last base address a refresh was triggered for
#[derive(Debug, Clone, Default)]
pub struct Poller {
    last_seen: Option<Address>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_seen(&self) -> Option<Address> {
        self.last_seen
    }

    /// Forgets the last address so the next observation triggers a refresh
    pub fn reset(&mut self) {
        self.last_seen = None;
    }

    /// Decides one tick. Only a `Changed` decision updates the last-seen address.
    pub fn observe(&mut self, capturing: bool, busy: bool, base: Option<Address>) -> TickDecision {
        if busy {
            return TickDecision::Busy;
        }
        if !capturing {
            return TickDecision::Idle;
        }
        match base {
            Some(base) if self.last_seen != Some(base) => {
                self.last_seen = Some(base);
                TickDecision::Changed(base)
            }
            _ => TickDecision::Unchanged,
        }
    }
}
