//! Architectural state shared by all cores.

/// Shared register/flag/IP container.
pub mod arch;
/// Packed status flags.
pub mod flags;
/// Register file with hardwired zero sink.
pub mod registers;
/// Running/halted state machine.
pub mod run_state;

pub use arch::ArchitecturalState;
pub use flags::{
    Flags, FLAGS_ACTIVE_MASK, FLAG_CARRY, FLAG_OVERFLOW, FLAG_SIGN, FLAG_ZERO,
};
pub use registers::{RegisterFile, MAX_REGISTER_INDEX, REGISTER_COUNT};
pub use run_state::RunState;
