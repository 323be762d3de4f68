//! Blocked console readers
//!
//! A reader that finds nothing committed registers its thread here (while
//! still holding the console lock), drops the lock and parks. The input path
//! wakes everybody registered after it commits. Lock order is console state
//! first, then the gate.

use alloc::collections::VecDeque;
use spin::Mutex;

use crate::task::{Scheduler, ThreadId};

/// Readers expected to wait on one console at the same time
const READERS_HINT: usize = 8;

pub struct SyncGate {
    blocked: Mutex<VecDeque<ThreadId>>,
}

impl SyncGate {
    pub fn new() -> Self {
        Self {
            blocked: Mutex::new(VecDeque::with_capacity(READERS_HINT)),
        }
    }

    /// Register a thread as blocked waiting for console input
    pub fn register(&self, thread_id: ThreadId) {
        let mut blocked = self.blocked.lock();
        if !blocked.contains(&thread_id) {
            blocked.push_back(thread_id);
        }
    }

    /// Forget a thread that is no longer waiting
    pub fn unregister(&self, thread_id: ThreadId) {
        self.blocked.lock().retain(|&t| t != thread_id);
    }

    /// Wake all blocked readers
    ///
    /// Never allocates, so it is usable from the input path.
    pub fn wake_all(&self, sched: &dyn Scheduler) -> usize {
        let mut blocked = self.blocked.lock();
        let mut woken = 0;
        while let Some(thread_id) = blocked.pop_front() {
            sched.unblock(thread_id);
            woken += 1;
        }
        woken
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.lock().len()
    }
}

impl Default for SyncGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ThreadScheduler;

    #[test]
    fn test_register_is_idempotent() {
        let gate = SyncGate::new();
        gate.register(7);
        gate.register(7);
        assert_eq!(gate.blocked_count(), 1);
    }

    #[test]
    fn test_unregister_removes_only_that_thread() {
        let gate = SyncGate::new();
        gate.register(1);
        gate.register(2);
        gate.unregister(1);
        assert_eq!(gate.blocked_count(), 1);
    }

    #[test]
    fn test_wake_all_drains_and_unblocks() {
        let sched = ThreadScheduler::new();
        let gate = SyncGate::new();
        gate.register(3);
        gate.register(4);

        assert_eq!(gate.wake_all(&sched), 2);
        assert_eq!(gate.blocked_count(), 0);
        assert_eq!(sched.unblocked(), vec![3, 4]);
        assert_eq!(gate.wake_all(&sched), 0);
    }
}
