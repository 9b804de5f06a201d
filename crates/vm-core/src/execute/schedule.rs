//! The single deferred load/store slot shared by all cores.

use crate::memory::Memory;
use crate::state::RegisterFile;

/// Memory access armed by `ld`/`st` and applied at the next turn boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ScheduledAccess {
    /// Nothing pending.
    #[default]
    Idle,
    /// Load `addr` into register `reg`.
    Read {
        /// Source address.
        addr: u16,
        /// Target register.
        reg: u8,
    },
    /// Store register `reg` to `addr`.
    Write {
        /// Target address.
        addr: u16,
        /// Source register.
        reg: u8,
    },
}

impl ScheduledAccess {
    /// Returns `true` when nothing is pending.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Applies the pending access, if any, and resets the slot to idle.
    ///
    /// Loads go through [`Memory::read`] and stores through
    /// [`Memory::write`], so hooks observe deferred accesses too.
    pub fn flush(&mut self, memory: &mut Memory, registers: &mut RegisterFile) {
        match std::mem::take(self) {
            Self::Idle => {}
            Self::Read { addr, reg } => {
                let value = memory.read(addr);
                tracing::trace!(addr, reg, value, "scheduled load");
                registers.write(usize::from(reg), value);
            }
            Self::Write { addr, reg } => {
                let value = registers.read(usize::from(reg));
                tracing::trace!(addr, reg, value, "scheduled store");
                memory.write(addr, value);
            }
        }
    }
}
