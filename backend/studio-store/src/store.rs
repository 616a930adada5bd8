//! Shared machinery behind every store: the copy-on-write snapshot, audit
//! recording, change notification and the terminal-state guard.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::audit::{AuditAction, AuditEvent, AuditLog, AuditTarget};
use crate::clock::Clock;
use crate::config::{StoreOptions, TerminalStatePolicy};
use crate::error::{Result, StoreError};
use crate::models::{AuditEventId, Entity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    Livestream,
    PlatformOps,
    Branding,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Livestream => "livestream",
            StoreKind::PlatformOps => "platform_ops",
            StoreKind::Branding => "branding",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// An audited action was applied.
    Action(AuditAction),
    /// State changed without an audit entry (favorites, usage counters).
    Quiet,
    Selection,
    Reset,
}

/// Sent to subscribers after every change to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub store: StoreKind,
    pub kind: ChangeKind,
    pub target: Option<AuditTarget>,
}

/// Inputs handed to a seed generator.
#[derive(Debug, Clone)]
pub struct SeedContext {
    pub seed: u64,
    pub now: DateTime<Utc>,
    pub audit_capacity: usize,
}

/// Read/reset/subscribe surface shared by all stores.
pub trait Store {
    type Snapshot;
    type Stats;

    fn kind(&self) -> StoreKind;

    /// Current state. The returned snapshot never changes, later actions
    /// produce a new one.
    fn snapshot(&self) -> Arc<Self::Snapshot>;

    /// Recomputed from the collections on every call.
    fn stats(&self) -> Self::Stats;

    /// Throw away the current state and rebuild it from the seed generator.
    fn reset(&mut self);

    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}

pub trait StoreSnapshot: Clone + Send + Sync + 'static {
    type Selection: Default;

    fn audit(&self) -> &AuditLog;
    fn audit_mut(&mut self) -> &mut AuditLog;
    fn selection_mut(&mut self) -> &mut Self::Selection;
}

/// Access to one of the snapshot's entity collections.
pub trait Collection<T: Entity> {
    fn items(&self) -> &[T];
    fn items_mut(&mut self) -> &mut Vec<T>;
}

macro_rules! impl_collection {
    ($snapshot:ty, $entity:ty, $field:ident) => {
        impl $crate::store::Collection<$entity> for $snapshot {
            fn items(&self) -> &[$entity] {
                &self.$field
            }

            fn items_mut(&mut self) -> &mut Vec<$entity> {
                &mut self.$field
            }
        }
    };
}
pub(crate) use impl_collection;

pub(crate) struct StoreCore<S> {
    kind: StoreKind,
    state: Arc<S>,
    clock: Arc<dyn Clock>,
    options: StoreOptions,
    changes: broadcast::Sender<StoreChange>,
}

impl<S: StoreSnapshot> StoreCore<S> {
    pub fn new(
        kind: StoreKind,
        seed: impl FnOnce(&SeedContext) -> S,
        clock: Arc<dyn Clock>,
        options: StoreOptions,
    ) -> Self {
        let (changes, _) = broadcast::channel(options.change_channel_capacity);
        let context = SeedContext {
            seed: options.seed,
            now: clock.now(),
            audit_capacity: options.audit_capacity,
        };
        let state = Arc::new(seed(&context));

        tracing::debug!(store = kind.as_str(), seed = options.seed, "Store seeded");

        Self {
            kind,
            state,
            clock,
            options,
            changes,
        }
    }

    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn snapshot(&self) -> Arc<S> {
        Arc::clone(&self.state)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn actor_name(&self) -> &str {
        &self.options.actor.name
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    pub fn seed_context(&self) -> SeedContext {
        SeedContext {
            seed: self.options.seed,
            now: self.clock.now(),
            audit_capacity: self.options.audit_capacity,
        }
    }

    pub fn find<T>(&self, id: T::Id) -> Option<&T>
    where
        T: Entity,
        S: Collection<T>,
    {
        self.state.items().iter().find(|item| item.id() == id)
    }

    /// Apply `f` to the record with `id`. Returns false, leaving the state
    /// untouched, when nothing matches.
    pub fn update<T>(&mut self, id: T::Id, f: impl FnOnce(&mut T)) -> bool
    where
        T: Entity,
        S: Collection<T>,
    {
        self.update_if(id, |_| true, f)
    }

    /// Like `update`, but only applies `f` when `when` holds for the current
    /// record. The snapshot is not copied otherwise.
    pub fn update_if<T>(
        &mut self,
        id: T::Id,
        when: impl Fn(&T) -> bool,
        f: impl FnOnce(&mut T),
    ) -> bool
    where
        T: Entity,
        S: Collection<T>,
    {
        let Some(index) = self
            .state
            .items()
            .iter()
            .position(|item| item.id() == id && when(item))
        else {
            return false;
        };
        let state = Arc::make_mut(&mut self.state);
        f(&mut state.items_mut()[index]);
        true
    }

    /// Apply `f` to every record matching `predicate`; returns the number
    /// of records touched.
    pub fn update_where<T>(&mut self, predicate: impl Fn(&T) -> bool, mut f: impl FnMut(&mut T)) -> usize
    where
        T: Entity,
        S: Collection<T>,
    {
        if !self.state.items().iter().any(&predicate) {
            return 0;
        }
        let state = Arc::make_mut(&mut self.state);
        let mut touched = 0;
        for item in state.items_mut().iter_mut().filter(|item| predicate(item)) {
            f(item);
            touched += 1;
        }
        touched
    }

    pub fn insert<T>(&mut self, item: T)
    where
        T: Entity,
        S: Collection<T>,
    {
        Arc::make_mut(&mut self.state).items_mut().push(item);
    }

    /// Mutate fields outside the entity collections (settings records).
    pub fn update_state(&mut self, f: impl FnOnce(&mut S)) {
        f(Arc::make_mut(&mut self.state));
    }

    /// Enforce the configured terminal-state policy for `id`. `terminal`
    /// returns the blocking status name when the record is in a terminal
    /// state for the action being attempted.
    pub fn guard<T>(
        &self,
        id: T::Id,
        kind: &'static str,
        terminal: impl Fn(&T) -> Option<&'static str>,
    ) -> Result<()>
    where
        T: Entity,
        S: Collection<T>,
    {
        if self.options.terminal_policy == TerminalStatePolicy::Allow {
            return Ok(());
        }
        match self.find::<T>(id).and_then(|item| terminal(item)) {
            Some(status) => {
                tracing::warn!(
                    store = self.kind.as_str(),
                    kind,
                    id = %id,
                    status,
                    "Rejected action on record in terminal state"
                );
                Err(StoreError::TerminalState {
                    kind,
                    id: id.to_string(),
                    status,
                })
            }
            None => Ok(()),
        }
    }

    /// Append an audit event and notify subscribers.
    pub fn record(&mut self, action: AuditAction, target: AuditTarget, summary: String) {
        let event = AuditEvent {
            id: AuditEventId::new(),
            at: self.clock.now(),
            actor: self.options.actor.name.clone(),
            action,
            summary,
            target: Some(target),
        };

        tracing::debug!(
            store = self.kind.as_str(),
            action = action.as_str(),
            target = target.kind(),
            target_id = ?target.id_string(),
            "{}",
            event.summary
        );

        Arc::make_mut(&mut self.state).audit_mut().push(event);
        self.notify(ChangeKind::Action(action), Some(target));
    }

    /// Common tail of every audited action: record when `applied`, log the
    /// no-op otherwise. Returns `applied`.
    pub fn finish(
        &mut self,
        applied: bool,
        action: AuditAction,
        target: AuditTarget,
        summary: impl FnOnce() -> String,
    ) -> bool {
        if applied {
            self.record(action, target, summary());
        } else {
            tracing::trace!(
                store = self.kind.as_str(),
                action = action.as_str(),
                target_id = ?target.id_string(),
                "No matching record, nothing changed"
            );
        }
        applied
    }

    pub fn notify(&self, kind: ChangeKind, target: Option<AuditTarget>) {
        // No receivers is fine.
        let _ = self.changes.send(StoreChange {
            store: self.kind,
            kind,
            target,
        });
    }

    pub fn select(&mut self, f: impl FnOnce(&mut S::Selection)) {
        f(Arc::make_mut(&mut self.state).selection_mut());
        self.notify(ChangeKind::Selection, None);
    }

    pub fn replace(&mut self, state: S) {
        self.state = Arc::new(state);
        tracing::info!(store = self.kind.as_str(), "Store reset to seed data");
        self.notify(ChangeKind::Reset, None);
    }
}

/// Whether `add_unique` would change `list`.
pub(crate) fn can_add(list: &[String], value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !list.iter().any(|existing| existing == value)
}

pub(crate) fn has_value(list: &[String], value: &str) -> bool {
    list.iter().any(|existing| existing == value.trim())
}

/// Push `value` onto `list` unless blank or already present.
pub(crate) fn add_unique(list: &mut Vec<String>, value: &str) -> bool {
    if !can_add(list, value) {
        return false;
    }
    list.push(value.trim().to_string());
    true
}

/// Remove every entry equal to `value`.
pub(crate) fn remove_value(list: &mut Vec<String>, value: &str) -> bool {
    let before = list.len();
    list.retain(|existing| existing != value.trim());
    list.len() != before
}

/// Append `": note"` to a summary unless the note is blank.
pub(crate) fn with_note(summary: String, note: &str) -> String {
    match note.trim() {
        "" => summary,
        note => format!("{}: {}", summary, note),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_unique_skips_blank_and_duplicates() {
        let mut tags = vec!["music".to_string()];
        assert!(!add_unique(&mut tags, "   "));
        assert!(!add_unique(&mut tags, "music"));
        assert!(add_unique(&mut tags, " gaming "));
        assert_eq!(tags, vec!["music", "gaming"]);
    }

    #[test]
    fn test_remove_value() {
        let mut tags = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert!(remove_value(&mut tags, "a"));
        assert_eq!(tags, vec!["b"]);
        assert!(!remove_value(&mut tags, "z"));
    }

    #[test]
    fn test_with_note_skips_blank() {
        assert_eq!(with_note("Ticket closed".to_string(), "  "), "Ticket closed");
        assert_eq!(with_note("Ticket closed".to_string(), " fixed "), "Ticket closed: fixed");
    }
}
