//! Bounded execution trace.
//!
//! One entry is recorded per executed instruction when tracing is enabled.
//! The buffer drops new entries once full and counts what it dropped.

use crate::word::Word;

/// Fetch record for one executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct TraceEntry {
    /// Raw instruction word.
    pub instruction: Word,
    /// Address the instruction was fetched from.
    pub address: Word,
    /// Destination register field.
    pub destination: u8,
    /// Value of the primary source register.
    pub primary: Word,
    /// Resolved secondary operand.
    pub secondary: Word,
}

/// Fixed-capacity trace buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceBuffer {
    entries: Vec<TraceEntry>,
    capacity: usize,
    dropped: u64,
}

impl TraceBuffer {
    /// Creates an empty buffer holding at most `capacity` entries.
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            dropped: 0,
        }
    }

    /// Appends `entry`; returns `false` and counts a drop when full.
    pub fn record(&mut self, entry: TraceEntry) -> bool {
        if self.entries.len() >= self.capacity {
            if self.dropped == 0 {
                tracing::warn!(capacity = self.capacity, "trace buffer full, dropping entries");
            }
            self.dropped += 1;
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Recorded entries in execution order.
    #[must_use]
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Maximum number of entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries rejected because the buffer was full.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discards recorded entries and the drop counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.dropped = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::{TraceBuffer, TraceEntry};

    fn entry(address: u32) -> TraceEntry {
        TraceEntry {
            instruction: 0x400D_0000,
            address,
            destination: 0,
            primary: 0,
            secondary: 0,
        }
    }

    #[test]
    fn drops_once_full() {
        let mut trace = TraceBuffer::new(2);
        assert!(trace.record(entry(0)));
        assert!(trace.record(entry(1)));
        assert!(!trace.record(entry(2)));
        assert!(!trace.record(entry(3)));

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.dropped(), 2);
        assert_eq!(trace.entries()[1].address, 1);
    }

    #[test]
    fn clear_resets_entries_and_drop_count() {
        let mut trace = TraceBuffer::new(1);
        trace.record(entry(0));
        trace.record(entry(1));
        trace.clear();
        assert!(trace.is_empty());
        assert_eq!(trace.dropped(), 0);
        assert_eq!(trace.capacity(), 1);
    }
}
