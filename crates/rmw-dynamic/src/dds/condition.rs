// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conditions - event notification predicates for WaitSets.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Wake-up channel shared between a waitset and its attached conditions.
///
/// Every notification bumps a generation counter under the lock, so a
/// waiter that sampled the generation before checking its conditions
/// cannot miss a trigger that lands in between.
pub struct WaitSignal {
    id: u64,
    generation: Mutex<u64>,
    condvar: Condvar,
}

impl WaitSignal {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            id: next_id(),
            generation: Mutex::new(0),
            condvar: Condvar::new(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn notify(&self) {
        let mut generation = self.generation.lock();
        *generation = generation.wrapping_add(1);
        self.condvar.notify_all();
    }

    pub(crate) fn generation(&self) -> u64 {
        *self.generation.lock()
    }

    /// Block until the generation moves past `seen` or `deadline` passes.
    /// Returns `false` on timeout.
    pub(crate) fn wait_for_change(&self, seen: u64, deadline: Option<Instant>) -> bool {
        let mut generation = self.generation.lock();
        while *generation == seen {
            match deadline {
                Some(deadline) => {
                    if self.condvar.wait_until(&mut generation, deadline).timed_out() {
                        return *generation != seen;
                    }
                }
                None => self.condvar.wait(&mut generation),
            }
        }
        true
    }
}

/// Signals registered on one condition.
#[derive(Default)]
struct SignalList(Mutex<Vec<Arc<WaitSignal>>>);

impl SignalList {
    fn add(&self, signal: Arc<WaitSignal>) {
        self.0.lock().push(signal);
    }

    fn remove(&self, signal_id: u64) {
        self.0.lock().retain(|s| s.id() != signal_id);
    }

    fn notify(&self) {
        for signal in self.0.lock().iter() {
            signal.notify();
        }
    }
}

/// Condition trait - base interface for all conditions.
pub trait Condition: Send + Sync {
    fn trigger_value(&self) -> bool;

    /// Unique identifier for this condition.
    fn condition_id(&self) -> u64;

    /// Register a waitset signal so this condition can wake blocked waiters.
    fn add_wait_signal(&self, signal: Arc<WaitSignal>);

    fn remove_wait_signal(&self, signal_id: u64);
}

/// Status mask bits for StatusCondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMask(u32);

impl StatusMask {
    pub const NONE: StatusMask = StatusMask(0);
    pub const ALL: StatusMask = StatusMask(0xFFFF_FFFF);
    /// Data available to take (DataReader).
    pub const DATA_AVAILABLE: StatusMask = StatusMask(1 << 0);
    /// A matching writer or reader appeared or went away.
    pub const SUBSCRIPTION_MATCHED: StatusMask = StatusMask(1 << 6);
    pub const PUBLICATION_MATCHED: StatusMask = StatusMask(1 << 10);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: StatusMask) -> bool {
        (self.0 & other.0) == other.0
    }

    pub const fn intersects(self, other: StatusMask) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for StatusMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        StatusMask(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for StatusMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        StatusMask(self.0 & rhs.0)
    }
}

impl std::ops::Not for StatusMask {
    type Output = Self;
    fn not(self) -> Self {
        StatusMask(!self.0)
    }
}

/// StatusCondition - triggered while any enabled status is active.
pub struct StatusCondition {
    id: u64,
    enabled: Mutex<StatusMask>,
    active: Mutex<StatusMask>,
    signals: SignalList,
}

impl StatusCondition {
    /// No statuses are enabled until [`set_enabled_statuses`] is called.
    ///
    /// [`set_enabled_statuses`]: StatusCondition::set_enabled_statuses
    pub fn new() -> Self {
        Self {
            id: next_id(),
            enabled: Mutex::new(StatusMask::NONE),
            active: Mutex::new(StatusMask::NONE),
            signals: SignalList::default(),
        }
    }

    pub fn set_enabled_statuses(&self, mask: StatusMask) {
        *self.enabled.lock() = mask;
        if self.trigger_value() {
            self.signals.notify();
        }
    }

    pub fn enabled_statuses(&self) -> StatusMask {
        *self.enabled.lock()
    }

    pub fn active_statuses(&self) -> StatusMask {
        *self.active.lock()
    }

    /// Raise statuses on behalf of the owning entity.
    pub(crate) fn activate(&self, mask: StatusMask) {
        {
            let mut active = self.active.lock();
            *active = *active | mask;
        }
        if self.enabled_statuses().intersects(mask) {
            self.signals.notify();
        }
    }

    pub(crate) fn deactivate(&self, mask: StatusMask) {
        let mut active = self.active.lock();
        *active = *active & !mask;
    }
}

impl Default for StatusCondition {
    fn default() -> Self {
        Self::new()
    }
}

impl Condition for StatusCondition {
    fn trigger_value(&self) -> bool {
        self.enabled_statuses().intersects(self.active_statuses())
    }

    fn condition_id(&self) -> u64 {
        self.id
    }

    fn add_wait_signal(&self, signal: Arc<WaitSignal>) {
        self.signals.add(signal);
    }

    fn remove_wait_signal(&self, signal_id: u64) {
        self.signals.remove(signal_id);
    }
}

/// GuardCondition - manually triggered condition.
pub struct GuardCondition {
    id: u64,
    trigger: AtomicBool,
    signals: SignalList,
}

impl GuardCondition {
    pub fn new() -> Self {
        Self {
            id: next_id(),
            trigger: AtomicBool::new(false),
            signals: SignalList::default(),
        }
    }

    /// Setting `true` wakes every waitset this condition is attached to.
    pub fn set_trigger_value(&self, value: bool) {
        self.trigger.store(value, Ordering::Release);
        if value {
            self.signals.notify();
        }
    }
}

impl Default for GuardCondition {
    fn default() -> Self {
        Self::new()
    }
}

impl Condition for GuardCondition {
    fn trigger_value(&self) -> bool {
        self.trigger.load(Ordering::Acquire)
    }

    fn condition_id(&self) -> u64 {
        self.id
    }

    fn add_wait_signal(&self, signal: Arc<WaitSignal>) {
        self.signals.add(signal);
    }

    fn remove_wait_signal(&self, signal_id: u64) {
        self.signals.remove(signal_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_condition_triggers_only_on_enabled_statuses() {
        let condition = StatusCondition::new();
        condition.activate(StatusMask::DATA_AVAILABLE);
        assert!(!condition.trigger_value());

        condition.set_enabled_statuses(StatusMask::DATA_AVAILABLE);
        assert!(condition.trigger_value());

        condition.deactivate(StatusMask::DATA_AVAILABLE);
        assert!(!condition.trigger_value());
        assert_eq!(condition.active_statuses(), StatusMask::NONE);
    }

    #[test]
    fn guard_condition_notifies_registered_signal() {
        let guard = GuardCondition::new();
        let signal = WaitSignal::new();
        guard.add_wait_signal(Arc::clone(&signal));

        let before = signal.generation();
        guard.set_trigger_value(true);
        assert!(guard.trigger_value());
        assert_ne!(signal.generation(), before);

        guard.remove_wait_signal(signal.id());
        let after = signal.generation();
        guard.set_trigger_value(true);
        assert_eq!(signal.generation(), after);
    }

    #[test]
    fn condition_ids_are_unique() {
        let a = GuardCondition::new();
        let b = GuardCondition::new();
        let c = StatusCondition::new();
        assert_ne!(a.condition_id(), b.condition_id());
        assert_ne!(b.condition_id(), c.condition_id());
    }
}
