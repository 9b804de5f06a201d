//! Address-range hooks for memory-mapped I/O collaborators.

use crate::error::{HookError, HookKind};
use crate::word::Word;

/// Maximum number of hooks per direction.
pub const HOOK_CAPACITY: usize = 32;

/// Device answering reads inside its range. Receives the absolute address.
pub trait ReadHook {
    /// Produces the word observed at `addr`.
    fn read(&mut self, addr: u16) -> Word;
}

impl<F: FnMut(u16) -> Word> ReadHook for F {
    fn read(&mut self, addr: u16) -> Word {
        self(addr)
    }
}

/// Device receiving writes inside its range. Receives the offset from the
/// hook base, not the absolute address.
pub trait WriteHook {
    /// Consumes `value` written at `base + offset`.
    fn write(&mut self, value: Word, offset: u16);
}

impl<F: FnMut(Word, u16)> WriteHook for F {
    fn write(&mut self, value: Word, offset: u16) {
        self(value, offset);
    }
}

/// Inclusive address range `[base, base + length]`, clamped to the top of
/// the address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookRange {
    /// First claimed address.
    pub base: u16,
    /// Last claimed address.
    pub end: u16,
}

impl HookRange {
    /// Builds the range covering `base..=base + length`.
    #[must_use]
    pub const fn new(base: u16, length: u16) -> Self {
        Self {
            base,
            end: base.saturating_add(length),
        }
    }

    /// Returns `true` when `addr` falls inside the range.
    #[must_use]
    pub const fn contains(self, addr: u16) -> bool {
        addr >= self.base && addr <= self.end
    }
}

/// Ordered, bounded list of hooks for one direction.
pub struct HookTable<H: ?Sized> {
    kind: HookKind,
    entries: Vec<(HookRange, Box<H>)>,
}

impl<H: ?Sized> HookTable<H> {
    pub(crate) const fn new(kind: HookKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, range: HookRange, hook: Box<H>) -> Result<(), HookError> {
        if self.entries.len() >= HOOK_CAPACITY {
            return Err(HookError::CapacityExceeded {
                kind: self.kind,
                capacity: HOOK_CAPACITY,
            });
        }
        tracing::debug!(kind = %self.kind, base = range.base, end = range.end, "hook registered");
        self.entries.push((range, hook));
        Ok(())
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no hook is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered ranges in registration order.
    pub fn ranges(&self) -> impl Iterator<Item = HookRange> + '_ {
        self.entries.iter().map(|(range, _)| *range)
    }

    fn matching(&mut self, addr: u16) -> impl Iterator<Item = (HookRange, &mut H)> + '_ {
        self.entries
            .iter_mut()
            .filter(move |(range, _)| range.contains(addr))
            .map(|(range, hook)| (*range, hook.as_mut()))
    }
}

impl HookTable<dyn ReadHook> {
    /// Dispatches to the first matching hook, or returns `None`.
    pub(crate) fn dispatch(&mut self, addr: u16) -> Option<Word> {
        self.matching(addr).next().map(|(_, hook)| hook.read(addr))
    }
}

impl HookTable<dyn WriteHook> {
    /// Dispatches to every matching hook; returns `true` if any fired.
    pub(crate) fn dispatch(&mut self, addr: u16, value: Word) -> bool {
        let mut claimed = false;
        for (range, hook) in self.matching(addr) {
            hook.write(value, addr - range.base);
            claimed = true;
        }
        claimed
    }
}

impl<H: ?Sized> std::fmt::Debug for HookTable<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookTable")
            .field("kind", &self.kind)
            .field("ranges", &self.ranges().collect::<Vec<_>>())
            .finish()
    }
}
