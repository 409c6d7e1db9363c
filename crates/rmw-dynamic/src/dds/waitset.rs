// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! WaitSet - blocking wait for Condition triggers
//!
//! Each waitset owns one [`WaitSignal`]. Attaching a condition registers
//! that signal with it so the condition can wake blocked waiters as soon as
//! its trigger value flips to `true`.

use super::condition::{Condition, WaitSignal};
use super::{DdsError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// WaitSet - wait for multiple conditions
pub struct WaitSet {
    signal: Arc<WaitSignal>,
    conditions: Mutex<Vec<Arc<dyn Condition>>>,
}

impl WaitSet {
    #[must_use]
    pub fn new() -> Self {
        Self {
            signal: WaitSignal::new(),
            conditions: Mutex::new(Vec::new()),
        }
    }

    /// Attach a Condition to this WaitSet.
    ///
    /// Attaching the same condition twice fails with
    /// [`DdsError::AlreadyAttached`].
    pub fn attach_condition(&self, condition: Arc<dyn Condition>) -> Result<()> {
        let condition_id = condition.condition_id();
        let mut conditions = self.conditions.lock();
        if conditions
            .iter()
            .any(|attached| attached.condition_id() == condition_id)
        {
            return Err(DdsError::AlreadyAttached(condition_id));
        }
        condition.add_wait_signal(Arc::clone(&self.signal));
        conditions.push(condition);
        Ok(())
    }

    pub fn detach_condition(&self, condition: &dyn Condition) -> Result<()> {
        let condition_id = condition.condition_id();
        let mut conditions = self.conditions.lock();
        let index = conditions
            .iter()
            .position(|attached| attached.condition_id() == condition_id)
            .ok_or(DdsError::NotAttached(condition_id))?;
        let removed = conditions.swap_remove(index);
        removed.remove_wait_signal(self.signal.id());
        Ok(())
    }

    /// Get all attached Conditions
    #[must_use]
    pub fn conditions(&self) -> Vec<Arc<dyn Condition>> {
        self.conditions.lock().clone()
    }

    /// Wait until at least one Condition is triggered.
    ///
    /// `None` blocks indefinitely and `Some(Duration::ZERO)` only polls.
    /// Returns the triggered conditions, or [`DdsError::Timeout`] when the
    /// deadline passes with nothing triggered.
    pub fn wait(&self, timeout: Option<Duration>) -> Result<Vec<Arc<dyn Condition>>> {
        log::trace!("[waitset] wait timeout={:?}", timeout);
        // A timeout too large to represent as an instant behaves as infinite.
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));

        loop {
            let seen = self.signal.generation();
            let triggered = self.collect_triggered();
            if !triggered.is_empty() {
                log::trace!("[waitset] wait returning triggered_len={}", triggered.len());
                return Ok(triggered);
            }

            if timeout == Some(Duration::ZERO) {
                return Err(DdsError::Timeout);
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(DdsError::Timeout);
                }
            }

            if !self.signal.wait_for_change(seen, deadline) {
                let triggered = self.collect_triggered();
                if triggered.is_empty() {
                    return Err(DdsError::Timeout);
                }
                return Ok(triggered);
            }
        }
    }

    /// Wake a blocked `wait()` without triggering any condition.
    pub fn notify(&self) {
        self.signal.notify();
    }

    fn collect_triggered(&self) -> Vec<Arc<dyn Condition>> {
        self.conditions
            .lock()
            .iter()
            .filter(|condition| condition.trigger_value())
            .cloned()
            .collect()
    }
}

impl Default for WaitSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WaitSet {
    fn drop(&mut self) {
        for condition in self.conditions.get_mut().drain(..) {
            condition.remove_wait_signal(self.signal.id());
        }
    }
}
