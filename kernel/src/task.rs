//! Scheduler and process-table hooks
//!
//! The console never owns a scheduler. It parks and wakes tasks through the
//! [`Scheduler`] trait and asks the process table for a diagnostic dump
//! through [`ProcessDump`].

/// Thread identifier as handed out by the scheduler
pub type ThreadId = u64;

/// Blocking primitives used by console readers
///
/// `block_current` and `unblock` must have permit semantics: an `unblock`
/// that lands before the matching `block_current` makes it return at once.
/// `block_current` may also return spuriously; callers re-check their
/// condition.
pub trait Scheduler: Send + Sync {
    /// ID of the thread making the call
    fn current_thread_id(&self) -> ThreadId;

    /// Park the calling thread until it is unblocked
    fn block_current(&self);

    /// Make a parked (or about to park) thread runnable
    fn unblock(&self, thread_id: ThreadId);

    /// Whether the thread has been marked for termination
    fn is_killed(&self, thread_id: ThreadId) -> bool;
}

/// Process-list dump triggered from the console (Ctrl+P)
pub trait ProcessDump: Send + Sync {
    fn procdump(&self);
}
