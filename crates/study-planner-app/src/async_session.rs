//! Shared, async-friendly session with a real undo timer.

use std::sync::Arc;

use study_planner_core::{Clock, DueDate, Stats, SystemClock, Task, TaskId, TaskType};
use study_planner_store::Slot;
use tokio::sync::Mutex;
use tracing::debug;

use crate::session::{TaskSession, UndoTicket};
use crate::task_patch::TaskPatch;

/// A [`TaskSession`] behind `Arc<tokio::sync::Mutex<_>>`.
///
/// Deleting spawns a sleep task on the current tokio runtime that expires the
/// undo buffer once the window passes; a newer delete or an undo aborts it.
pub struct SharedTaskSession<S, C = SystemClock> {
    inner: Arc<Mutex<TaskSession<S, C>>>,
}

impl<S, C> Clone for SharedTaskSession<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, C> SharedTaskSession<S, C>
where
    S: Slot + Send + 'static,
    C: Clock + 'static,
{
    /// Wrap an opened session.
    pub fn new(session: TaskSession<S, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Create a task and return its id.
    pub async fn add(&self, title: impl Into<String>, due_date: Option<DueDate>, kind: TaskType) -> TaskId {
        self.inner.lock().await.add(title, due_date, kind)
    }

    /// Flip completion. Returns false for unknown ids.
    pub async fn toggle(&self, id: &TaskId) -> bool {
        self.inner.lock().await.toggle(id)
    }

    /// Apply `patch` to a task. Returns false for unknown ids.
    pub async fn update(&self, id: &TaskId, patch: TaskPatch) -> bool {
        self.inner.lock().await.update(id, patch)
    }

    /// Remove a task and start its undo timer.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn delete(&self, id: &TaskId) -> Option<UndoTicket> {
        let mut session = self.inner.lock().await;
        let ticket = session.delete(id)?;
        let window = session.undo_window();
        let inner = Arc::clone(&self.inner);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if inner.lock().await.expire_undo(ticket) {
                debug!(?ticket, "Undo timer fired");
            }
        });
        session.attach_timer(ticket, timer.abort_handle());
        Some(ticket)
    }

    /// Restore the pending deletion if its window is still open.
    pub async fn undo_delete(&self) -> bool {
        self.inner.lock().await.undo_delete()
    }

    /// Re-insert a task unless its id already exists.
    pub async fn restore(&self, task: Task) -> bool {
        self.inner.lock().await.restore(task)
    }

    /// Complete every incomplete task.
    pub async fn mark_all_completed(&self) -> bool {
        self.inner.lock().await.mark_all_completed()
    }

    /// Drop every completed task.
    pub async fn clear_completed(&self) -> bool {
        self.inner.lock().await.clear_completed()
    }

    /// Copy of the current tasks in insertion order.
    pub async fn tasks(&self) -> Vec<Task> {
        self.inner.lock().await.tasks().to_vec()
    }

    /// Total and completed counters.
    pub async fn stats(&self) -> Stats {
        self.inner.lock().await.stats()
    }

    /// Copy of the task awaiting undo, if any.
    pub async fn pending_undo(&self) -> Option<Task> {
        self.inner
            .lock()
            .await
            .pending_undo()
            .map(|pending| pending.task().clone())
    }

    /// Run `f` with exclusive access to the underlying session.
    pub async fn with_session<R>(&self, f: impl FnOnce(&mut TaskSession<S, C>) -> R) -> R {
        f(&mut *self.inner.lock().await)
    }
}
