//! Host-side doubles for the console's collaborators
//!
//! Unit tests run on std threads: [`ThreadScheduler`] parks and unparks them,
//! [`RecordingOutput`] captures everything the console emits, and
//! [`UserMemory`] is a flat mapped window standing in for a task's address
//! space.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread::{self, Thread};

use crate::task::{ProcessDump, Scheduler, ThreadId};
use crate::tty::OutputSink;
use crate::uaccess::AddressSpace;

#[derive(Default)]
struct SchedState {
    next_id: ThreadId,
    ids: HashMap<thread::ThreadId, ThreadId>,
    threads: HashMap<ThreadId, Thread>,
    killed: HashSet<ThreadId>,
    unblocked: Vec<ThreadId>,
}

/// Scheduler backed by `thread::park`/`Thread::unpark`
///
/// Threads get an ID the first time they ask for one. Park tokens give the
/// permit semantics the console relies on.
#[derive(Default)]
pub struct ThreadScheduler {
    state: Mutex<SchedState>,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a thread killed and kick it out of `block_current`
    pub fn kill(&self, thread_id: ThreadId) {
        let mut state = self.state.lock().unwrap();
        state.killed.insert(thread_id);
        if let Some(t) = state.threads.get(&thread_id) {
            t.unpark();
        }
    }

    /// Every ID passed to `unblock`, in call order
    pub fn unblocked(&self) -> Vec<ThreadId> {
        self.state.lock().unwrap().unblocked.clone()
    }
}

impl Scheduler for ThreadScheduler {
    fn current_thread_id(&self) -> ThreadId {
        let current = thread::current();
        let mut state = self.state.lock().unwrap();
        if let Some(&id) = state.ids.get(&current.id()) {
            return id;
        }
        state.next_id += 1;
        let id = state.next_id;
        state.ids.insert(current.id(), id);
        state.threads.insert(id, current);
        id
    }

    fn block_current(&self) {
        thread::park();
    }

    fn unblock(&self, thread_id: ThreadId) {
        let mut state = self.state.lock().unwrap();
        state.unblocked.push(thread_id);
        if let Some(t) = state.threads.get(&thread_id) {
            t.unpark();
        }
    }

    fn is_killed(&self, thread_id: ThreadId) -> bool {
        self.state.lock().unwrap().killed.contains(&thread_id)
    }
}

/// Output sink that records every byte
#[derive(Default)]
pub struct RecordingOutput {
    bytes: Mutex<Vec<u8>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain what has been emitted so far
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.bytes.lock().unwrap())
    }
}

impl OutputSink for RecordingOutput {
    fn emit(&self, c: u8) {
        self.bytes.lock().unwrap().push(c);
    }
}

/// Process table that only counts dump requests
#[derive(Default)]
pub struct RecordingDump {
    calls: AtomicUsize,
}

impl RecordingDump {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProcessDump for RecordingDump {
    fn procdump(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// A single mapped window `[base, base + len)`; everything else faults
pub struct UserMemory {
    base: u64,
    data: Vec<u8>,
}

impl UserMemory {
    pub fn new(base: u64, len: usize) -> Self {
        Self {
            base,
            data: vec![0; len],
        }
    }

    fn slot(&self, addr: u64) -> Option<usize> {
        let off = usize::try_from(addr.checked_sub(self.base)?).ok()?;
        (off < self.data.len()).then_some(off)
    }

    /// Preload bytes at `addr`; panics outside the window
    pub fn fill(&mut self, addr: u64, bytes: &[u8]) {
        let off = self.slot(addr).expect("fill outside mapped window");
        self.data[off..off + bytes.len()].copy_from_slice(bytes);
    }

    pub fn bytes(&self, addr: u64, len: usize) -> &[u8] {
        let off = self.slot(addr).expect("read outside mapped window");
        &self.data[off..off + len]
    }
}

impl AddressSpace for UserMemory {
    fn read_byte(&self, addr: u64) -> Option<u8> {
        self.slot(addr).map(|off| self.data[off])
    }

    fn write_byte(&mut self, addr: u64, byte: u8) -> bool {
        match self.slot(addr) {
            Some(off) => {
                self.data[off] = byte;
                true
            }
            None => false,
        }
    }
}
