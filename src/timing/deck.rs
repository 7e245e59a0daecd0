//! A deck of named, cancellable one-shot and repeating timers.
//!
//! Each gameplay domain owns its own deck (wave scheduling owns one, status
//! effects own another) so that pause, cancellation, and teardown are
//! enumerable operations on a known set of handles rather than a global
//! timer list.

use bevy::prelude::*;
use std::time::Duration;

/// Opaque handle returned by [`TimerDeck::schedule`]. Invalidating the
/// handle (via `cancel`) guarantees the action never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry<A> {
    handle: TimerHandle,
    label: &'static str,
    owner: Option<Entity>,
    timer: Timer,
    action: A,
}

/// Ordered collection of scheduled actions. Entries expiring on the same
/// tick fire in registration order, which is the tie-break callers rely on
/// when a spawn pulse and a completion check land on the same instant.
#[derive(Debug)]
pub struct TimerDeck<A> {
    entries: Vec<Entry<A>>,
    next_handle: u64,
}

impl<A> Default for TimerDeck<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_handle: 0,
        }
    }
}

impl<A: Clone> TimerDeck<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an action with no owning entity.
    pub fn schedule(
        &mut self,
        label: &'static str,
        seconds: f32,
        mode: TimerMode,
        action: A,
    ) -> TimerHandle {
        self.schedule_inner(label, seconds, mode, None, action)
    }

    /// Schedule an action bound to an entity. All of an entity's timers can
    /// be dropped at once with [`TimerDeck::cancel_owned_by`] when it dies.
    pub fn schedule_for(
        &mut self,
        owner: Entity,
        label: &'static str,
        seconds: f32,
        mode: TimerMode,
        action: A,
    ) -> TimerHandle {
        self.schedule_inner(label, seconds, mode, Some(owner), action)
    }

    fn schedule_inner(
        &mut self,
        label: &'static str,
        seconds: f32,
        mode: TimerMode,
        owner: Option<Entity>,
        action: A,
    ) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Entry {
            handle,
            label,
            owner,
            timer: Timer::from_seconds(seconds, mode),
            action,
        });
        handle
    }

    /// Invalidate a handle. Returns false if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Drop every timer bound to `owner`. Returns how many were dropped.
    pub fn cancel_owned_by(&mut self, owner: Entity) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.owner != Some(owner));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels of all pending entries, in registration order.
    pub fn pending_labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.label).collect()
    }

    /// Advance every timer by `delta` and collect the actions that expired,
    /// in registration order. One-shot entries self-disarm after firing;
    /// repeating entries re-arm.
    pub fn tick(&mut self, delta: Duration) -> Vec<A> {
        let mut fired = Vec::new();
        for entry in &mut self.entries {
            entry.timer.tick(delta);
            for _ in 0..entry.timer.times_finished_this_tick() {
                fired.push(entry.action.clone());
            }
        }
        self.entries
            .retain(|e| e.timer.mode() == TimerMode::Repeating || !e.timer.is_finished());
        fired
    }
}
