//! Tracked targets.
//!
//! A target becomes tracked when a user inspects it, and stays tracked until
//! a client releases it. State queries only answer for tracked targets; the
//! log itself keeps every target regardless.

use std::collections::BTreeMap;

use causeway_foundation::{TargetId, TargetRef, TargetType};
use causeway_recorder::CausalLog;
use serde::{Deserialize, Serialize};

/// A tracked target as shown to clients.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Target id.
    pub id: u32,
    /// Observable or subscriber.
    #[serde(rename = "type")]
    pub target_type: TargetType,
    /// Declaration name.
    pub name: String,
}

impl Target {
    /// Returns the untyped identity.
    #[must_use]
    pub fn target_id(&self) -> TargetId {
        TargetId {
            target_type: self.target_type,
            id: self.id,
        }
    }
}

/// Targets currently tracked, keyed by id per type.
#[derive(Clone, Debug, Default)]
pub struct TargetTable {
    observables: BTreeMap<u32, Target>,
    subscribers: BTreeMap<u32, Target>,
    notifications: Vec<Target>,
}

impl TargetTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, target_type: TargetType) -> &BTreeMap<u32, Target> {
        match target_type {
            TargetType::Observable => &self.observables,
            TargetType::Subscriber => &self.subscribers,
        }
    }

    fn table_mut(&mut self, target_type: TargetType) -> &mut BTreeMap<u32, Target> {
        match target_type {
            TargetType::Observable => &mut self.observables,
            TargetType::Subscriber => &mut self.subscribers,
        }
    }

    /// Starts tracking `target` and queues a notification for clients.
    ///
    /// Returns `None` if the log has no such target. Inspecting a target that
    /// is already tracked notifies again.
    pub fn inspect(&mut self, log: &CausalLog, target: TargetRef) -> Option<Target> {
        let view = log.target(target)?;
        let name = log.declaration(view.declaration())?.name.clone();
        let tracked = Target {
            id: view.id(),
            target_type: view.target_type(),
            name,
        };

        tracing::debug!(%target, name = %tracked.name, "inspecting target");
        self.table_mut(tracked.target_type)
            .insert(tracked.id, tracked.clone());
        self.notifications.push(tracked.clone());
        Some(tracked)
    }

    /// Stops tracking a target. Returns false if it was not tracked.
    pub fn release(&mut self, target: TargetId) -> bool {
        let released = self
            .table_mut(target.target_type)
            .remove(&target.id)
            .is_some();
        if released {
            tracing::debug!(target = %target.to_ref(), "released target");
        }
        released
    }

    /// Returns a tracked target.
    #[must_use]
    pub fn get(&self, target_type: TargetType, id: u32) -> Option<&Target> {
        self.table(target_type).get(&id)
    }

    /// Returns true if the target is tracked.
    #[must_use]
    pub fn contains(&self, target: TargetId) -> bool {
        self.get(target.target_type, target.id).is_some()
    }

    /// Returns every tracked target, observables first, each in id order.
    #[must_use]
    pub fn targets(&self) -> Vec<Target> {
        self.observables
            .values()
            .chain(self.subscribers.values())
            .cloned()
            .collect()
    }

    /// Returns the number of tracked targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observables.len() + self.subscribers.len()
    }

    /// Returns true if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes the queued inspect notifications, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Target> {
        std::mem::take(&mut self.notifications)
    }
}
