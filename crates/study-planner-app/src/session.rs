//! Stateful task session: owns the list, persists after every change and
//! keeps a single-slot undo buffer for deletions.

use std::time::Duration;

use study_planner_core::{
    Clock, DueDate, Stats, SystemClock, Task, TaskEnvelope, TaskId, TaskRow, TaskType, Timestamp,
    ViewFilter,
};
use study_planner_store::{Slot, TaskStore};
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::reducer::{Action, apply};
use crate::task_patch::TaskPatch;

/// Identifies one armed undo deadline. A newer deletion invalidates older tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndoTicket(u64);

/// The most recently deleted task, restorable until its deadline.
#[derive(Debug)]
pub struct PendingDelete {
    task: Task,
    ticket: UndoTicket,
    deadline: Timestamp,
    timer: Option<AbortHandle>,
}

impl PendingDelete {
    /// Snapshot of the deleted task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Ticket armed for this deletion.
    #[must_use]
    pub const fn ticket(&self) -> UndoTicket {
        self.ticket
    }

    /// Instant after which the deletion can no longer be undone.
    #[must_use]
    pub const fn deadline(&self) -> Timestamp {
        self.deadline
    }

    fn is_live(&self, now: Timestamp) -> bool {
        now < self.deadline
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// A task list bound to a storage slot.
#[derive(Debug)]
pub struct TaskSession<S, C = SystemClock> {
    store: TaskStore<S>,
    key: String,
    clock: C,
    envelope: TaskEnvelope,
    undo_window: Duration,
    pending: Option<PendingDelete>,
    next_ticket: u64,
}

impl<S: Slot, C: Clock> TaskSession<S, C> {
    /// Load the list stored under `key` (falling back to `seed` when nothing is
    /// stored) and write it back once in the current format.
    pub fn open(
        store: TaskStore<S>,
        key: impl Into<String>,
        seed: Vec<Task>,
        clock: C,
        undo_window: Duration,
    ) -> Self {
        let key = key.into();
        let loaded = store.load(&key, seed, clock.now());
        let mut session = Self {
            store,
            key,
            clock,
            envelope: TaskEnvelope::default(),
            undo_window,
            pending: None,
            next_ticket: 0,
        };
        apply(&mut session.envelope, Action::Init(loaded), session.clock.now());
        session.persist();
        info!(key = %session.key, tasks = session.envelope.todos.len(), "Opened task session");
        session
    }

    /// Create a task and return its id.
    pub fn add(&mut self, title: impl Into<String>, due_date: Option<DueDate>, kind: TaskType) -> TaskId {
        self.dispatch(Action::Add {
            title: title.into(),
            due_date,
            kind,
        });
        self.envelope
            .todos
            .last()
            .map(|task| task.id.clone())
            .unwrap_or_default()
    }

    /// Flip completion. Returns false for unknown ids.
    pub fn toggle(&mut self, id: &TaskId) -> bool {
        self.dispatch(Action::Toggle(id.clone()))
    }

    /// Apply `patch` to a task. Returns false for unknown ids.
    pub fn update(&mut self, id: &TaskId, patch: TaskPatch) -> bool {
        self.dispatch(Action::Update { id: id.clone(), patch })
    }

    /// Remove a task and arm the undo buffer with it.
    ///
    /// Any earlier pending deletion becomes permanent. Returns `None` for unknown ids.
    pub fn delete(&mut self, id: &TaskId) -> Option<UndoTicket> {
        let task = self.envelope.find(id)?.clone();
        self.dispatch(Action::Delete(id.clone()));

        if let Some(mut previous) = self.pending.take() {
            previous.cancel_timer();
        }
        let ticket = UndoTicket(self.next_ticket);
        self.next_ticket += 1;
        let deadline = self.clock.now().saturating_add(self.undo_window);
        debug!(id = %task.id, ?ticket, %deadline, "Armed undo buffer");
        self.pending = Some(PendingDelete {
            task,
            ticket,
            deadline,
            timer: None,
        });
        Some(ticket)
    }

    /// Re-insert a task unless its id already exists.
    pub fn restore(&mut self, task: Task) -> bool {
        self.dispatch(Action::Restore(task))
    }

    /// Restore the pending deletion if its window is still open.
    pub fn undo_delete(&mut self) -> bool {
        let Some(mut pending) = self.pending.take() else {
            return false;
        };
        pending.cancel_timer();
        if !pending.is_live(self.clock.now()) {
            debug!(ticket = ?pending.ticket, "Undo window already closed");
            return false;
        }
        self.dispatch(Action::Restore(pending.task))
    }

    /// Clear the undo buffer if `ticket` is still the armed one.
    ///
    /// Returns false when a newer deletion or an undo already replaced it.
    pub fn expire_undo(&mut self, ticket: UndoTicket) -> bool {
        if self.pending.as_ref().is_none_or(|pending| pending.ticket != ticket) {
            return false;
        }
        self.pending = None;
        debug!(?ticket, "Undo window expired");
        true
    }

    /// Complete every incomplete task.
    pub fn mark_all_completed(&mut self) -> bool {
        self.dispatch(Action::MarkAll)
    }

    /// Drop every completed task.
    pub fn clear_completed(&mut self) -> bool {
        self.dispatch(Action::ClearCompleted)
    }

    /// Tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.envelope.todos
    }

    /// Current envelope.
    #[must_use]
    pub const fn envelope(&self) -> &TaskEnvelope {
        &self.envelope
    }

    /// Total and completed counters.
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.envelope.stats()
    }

    /// Filtered tasks ranked by urgency as of the clock's current day.
    #[must_use]
    pub fn view(&self, filter: &ViewFilter) -> Vec<TaskRow<'_>> {
        filter.rows(&self.envelope.todos, self.clock.today())
    }

    /// The pending deletion, if its window is still open.
    #[must_use]
    pub fn pending_undo(&self) -> Option<&PendingDelete> {
        let now = self.clock.now();
        self.pending.as_ref().filter(|pending| pending.is_live(now))
    }

    /// Configured undo window.
    #[must_use]
    pub const fn undo_window(&self) -> Duration {
        self.undo_window
    }

    /// Slot key this session writes to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Time source used for stamps and "today".
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Attach the deferred expiry task for `ticket`. Ignored for stale tickets.
    pub(crate) fn attach_timer(&mut self, ticket: UndoTicket, timer: AbortHandle) {
        match self.pending.as_mut() {
            Some(pending) if pending.ticket == ticket => pending.timer = Some(timer),
            _ => timer.abort(),
        }
    }

    fn dispatch(&mut self, action: Action) -> bool {
        let name = action.name();
        let changed = apply(&mut self.envelope, action, self.clock.now());
        debug!(action = name, changed, "Applied action");
        if changed {
            self.persist();
        }
        changed
    }

    fn persist(&self) {
        self.store.save(&self.key, &self.envelope);
    }
}
