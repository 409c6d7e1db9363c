// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! User-triggered guard condition.

use super::IMPLEMENTATION_IDENTIFIER;
use crate::dds;
use std::sync::Arc;

/// Guard condition that wakes any [`wait`](super::wait) it takes part in.
///
/// Triggering is sticky until a wait observes it; the wait then clears it.
/// Clones share the same underlying condition.
#[derive(Clone)]
pub struct GuardCondition {
    condition: Arc<dds::GuardCondition>,
}

impl GuardCondition {
    pub fn new() -> Self {
        Self::from_condition(Arc::new(dds::GuardCondition::new()))
    }

    pub(crate) fn from_condition(condition: Arc<dds::GuardCondition>) -> Self {
        Self { condition }
    }

    /// Safe to call from any thread.
    pub fn trigger(&self) {
        log::trace!("[rmw] guard condition triggered");
        self.condition.set_trigger_value(true);
    }

    pub fn implementation_identifier(&self) -> &'static str {
        IMPLEMENTATION_IDENTIFIER
    }

    pub(crate) fn condition(&self) -> &Arc<dds::GuardCondition> {
        &self.condition
    }
}

impl Default for GuardCondition {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GuardCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use dds::Condition;
        f.debug_struct("GuardCondition")
            .field("id", &self.condition.condition_id())
            .field("triggered", &self.condition.trigger_value())
            .finish()
    }
}
