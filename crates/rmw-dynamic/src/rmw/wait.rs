// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Unified wait over subscriptions, guard conditions, services and clients.
//!
//! Each call builds a fresh [`WaitSet`], attaches one condition per entry,
//! blocks, and then rewrites the caller's slices in place: entries whose
//! condition did not fire become `None`. The same condition may back
//! several entries (one subscription listed twice, or graph guards of
//! several nodes); it is attached once. A timeout is not an error; every
//! entry is simply cleared.

use super::client::Client;
use super::guard_condition::GuardCondition;
use super::service::Service;
use super::subscription::Subscription;
use crate::dds::{Condition, DdsError, StatusCondition, StatusMask, WaitSet};
use crate::error::{record, Error, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Endpoints handed to one [`wait`] call.
#[derive(Default)]
pub struct WaitArgs<'a, 'b> {
    pub subscriptions: &'b mut [Option<&'a Subscription>],
    pub guard_conditions: &'b mut [Option<&'a GuardCondition>],
    pub services: &'b mut [Option<&'a Service>],
    pub clients: &'b mut [Option<&'a Client>],
}

impl WaitArgs<'_, '_> {
    /// Entries still set (after a wait: the ones that are ready).
    pub fn ready_count(&self) -> usize {
        self.subscriptions.iter().flatten().count()
            + self.guard_conditions.iter().flatten().count()
            + self.services.iter().flatten().count()
            + self.clients.iter().flatten().count()
    }
}

/// Block until at least one entry is ready or `timeout` passes.
///
/// `None` waits indefinitely and `Some(Duration::ZERO)` only polls. A
/// positive timeout is a single bounded wait. Guard conditions that fired
/// are reset.
pub fn wait(args: &mut WaitArgs<'_, '_>, timeout: Option<Duration>) -> Result<()> {
    wait_inner(args, timeout).map_err(record)
}

fn data_available(status: Arc<StatusCondition>) -> Arc<dyn Condition> {
    status.set_enabled_statuses(StatusMask::DATA_AVAILABLE);
    status
}

fn wait_inner(args: &mut WaitArgs<'_, '_>, timeout: Option<Duration>) -> Result<()> {
    let waitset = WaitSet::new();

    let subscriptions = attach_all(&waitset, "subscription", args.subscriptions, |s| {
        data_available(s.condition())
    })?;
    let guards = attach_all(&waitset, "guard condition", args.guard_conditions, |g| {
        Arc::clone(g.condition()) as Arc<dyn Condition>
    })?;
    let services = attach_all(&waitset, "service", args.services, |s| {
        data_available(s.condition())
    })?;
    let clients = attach_all(&waitset, "client", args.clients, |c| {
        data_available(c.condition())
    })?;

    let fired: HashSet<u64> = match waitset.wait(timeout) {
        Ok(triggered) => triggered.iter().map(|c| c.condition_id()).collect(),
        Err(DdsError::Timeout) => {
            log::trace!("[rmw] wait timed out after {:?}", timeout);
            HashSet::new()
        }
        Err(err) => return Err(Error::Wait(err)),
    };

    clear_unfired(args.subscriptions, &subscriptions, &fired);
    clear_unfired(args.guard_conditions, &guards, &fired);
    clear_unfired(args.services, &services, &fired);
    clear_unfired(args.clients, &clients, &fired);

    for guard in args.guard_conditions.iter().flatten() {
        guard.condition().set_trigger_value(false);
    }

    log::trace!("[rmw] wait returning ready={}", args.ready_count());
    Ok(())
}

/// Attach one condition per entry, returning the condition ids in entry
/// order. Entries sharing a condition attach it once and are reported
/// together.
fn attach_all<T, F>(
    waitset: &WaitSet,
    what: &'static str,
    entries: &[Option<&T>],
    condition_of: F,
) -> Result<Vec<u64>>
where
    F: Fn(&T) -> Arc<dyn Condition>,
{
    entries
        .iter()
        .map(|entry| {
            let endpoint = entry.ok_or(Error::NullHandle(what))?;
            let condition = condition_of(endpoint);
            let id = condition.condition_id();
            match waitset.attach_condition(condition) {
                Ok(()) => log::trace!("[rmw] attached {} condition {}", what, id),
                Err(DdsError::AlreadyAttached(_)) => {
                    log::trace!("[rmw] {} condition {} already attached", what, id)
                }
                Err(source) => return Err(Error::Attach { what, source }),
            }
            Ok(id)
        })
        .collect()
}

fn clear_unfired<T>(entries: &mut [Option<&T>], ids: &[u64], fired: &HashSet<u64>) {
    for (entry, id) in entries.iter_mut().zip(ids) {
        if !fired.contains(id) {
            *entry = None;
        }
    }
}
