//! Console input ring
//!
//! A fixed array indexed by three free-running counters:
//!
//! ```text
//!   read          committed          edit
//!    |  ready for a reader  |  line being typed  |
//! ```
//!
//! `read <= committed <= edit` and `edit - read <= N` hold outside every
//! critical section. Counters only ever move forward except `edit` (erase)
//! and `read` (push-back of the byte just taken). Slot of counter `i` is
//! `i % N`; differences use wrapping arithmetic so counter overflow is
//! harmless.

use super::termios::INPUT_BUF_SIZE;

/// Snapshot of the ring counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indices {
    pub read: usize,
    pub committed: usize,
    pub edit: usize,
}

/// Console input buffer
pub struct InputBuffer<const N: usize = INPUT_BUF_SIZE> {
    storage: [u8; N],
    /// Next byte a reader will take
    read: usize,
    /// End of the bytes a reader may take
    committed: usize,
    /// End of everything typed so far
    edit: usize,
}

impl<const N: usize> InputBuffer<N> {
    const CAPACITY_IS_POWER_OF_TWO: () = assert!(
        N.is_power_of_two(),
        "input buffer capacity must be a power of two"
    );

    /// Create an empty buffer
    pub const fn new() -> Self {
        let () = Self::CAPACITY_IS_POWER_OF_TWO;
        Self {
            storage: [0; N],
            read: 0,
            committed: 0,
            edit: 0,
        }
    }

    /// Append a byte to the edit region
    ///
    /// Returns false, leaving the buffer untouched, when it already holds
    /// `N` unread bytes.
    pub fn append(&mut self, c: u8) -> bool {
        if self.len() >= N {
            return false;
        }
        self.storage[self.edit % N] = c;
        self.edit = self.edit.wrapping_add(1);
        true
    }

    /// Move the commit point to `new_committed` (between `committed` and `edit`)
    pub fn commit_to(&mut self, new_committed: usize) {
        debug_assert!(new_committed.wrapping_sub(self.committed) <= self.edit_len());
        self.committed = new_committed;
    }

    /// Commit everything typed so far
    #[inline]
    pub fn commit(&mut self) {
        self.commit_to(self.edit);
    }

    /// Take the oldest committed byte
    ///
    /// Callers check [`has_committed`](Self::has_committed) first.
    pub fn take_one(&mut self) -> u8 {
        debug_assert!(self.has_committed());
        let c = self.storage[self.read % N];
        self.read = self.read.wrapping_add(1);
        c
    }

    /// Give back the byte returned by the last [`take_one`](Self::take_one)
    pub fn unread(&mut self) {
        self.read = self.read.wrapping_sub(1);
    }

    /// Drop the last byte of the edit region
    ///
    /// Returns false if the edit region is empty or ends in a newline.
    pub fn erase_last(&mut self) -> bool {
        if self.edit == self.committed {
            return false;
        }
        let last = self.edit.wrapping_sub(1);
        if self.storage[last % N] == b'\n' {
            return false;
        }
        self.edit = last;
        true
    }

    /// Erase back to the start of the current line; returns bytes removed
    pub fn kill_line(&mut self) -> usize {
        let mut erased = 0;
        while self.erase_last() {
            erased += 1;
        }
        erased
    }

    /// Discard everything, committed or not
    pub fn clear(&mut self) {
        self.read = self.edit;
        self.committed = self.edit;
    }

    /// Whether a reader has a byte to take
    #[inline]
    pub fn has_committed(&self) -> bool {
        self.committed != self.read
    }

    /// Bytes ready for a reader
    #[inline]
    pub fn committed_len(&self) -> usize {
        self.committed.wrapping_sub(self.read)
    }

    /// Bytes typed but not yet committed
    #[inline]
    pub fn edit_len(&self) -> usize {
        self.edit.wrapping_sub(self.committed)
    }

    /// All unread bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.edit.wrapping_sub(self.read)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn indices(&self) -> Indices {
        Indices {
            read: self.read,
            committed: self.committed,
            edit: self.edit,
        }
    }
}

impl<const N: usize> Default for InputBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
