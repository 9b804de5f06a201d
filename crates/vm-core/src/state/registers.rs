//! Shared architectural register file.

use crate::word::{normalize, Word};

/// Number of addressable storage registers (`r1..=r31`).
pub const REGISTER_COUNT: usize = 31;

/// Highest valid register index; index `0` is the hardwired zero sink.
pub const MAX_REGISTER_INDEX: usize = REGISTER_COUNT;

/// Register file shared by every core of a machine.
///
/// Index `0` always reads as zero and discards writes. Indexes above
/// [`MAX_REGISTER_INDEX`] behave the same way, so callers may pass raw
/// instruction fields without validating them first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    words: [Word; REGISTER_COUNT],
}

impl RegisterFile {
    /// Reads a register, returning `0` for the zero sink and out-of-range indexes.
    #[must_use]
    pub const fn read(&self, index: usize) -> Word {
        if index == 0 || index > MAX_REGISTER_INDEX {
            return 0;
        }
        self.words[index - 1]
    }

    /// Writes a normalized word; the zero sink and out-of-range indexes drop the write.
    pub const fn write(&mut self, index: usize, value: Word) {
        if index == 0 || index > MAX_REGISTER_INDEX {
            return;
        }
        self.words[index - 1] = normalize(value);
    }

    /// Raw view of `r1..=r31` in index order.
    #[must_use]
    pub const fn as_slice(&self) -> &[Word; REGISTER_COUNT] {
        &self.words
    }
}
