use crate::state::{Flags, RegisterFile};
use crate::word::Word;

/// The single register file, flag set and instruction pointer timeshared by
/// every core of a machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ArchitecturalState {
    /// General registers `r1..=r31` plus the zero sink.
    pub registers: RegisterFile,
    /// Status flags.
    pub flags: Flags,
    /// Shared instruction pointer.
    pub ip: Word,
}

#[cfg(test)]
mod tests {
    use super::ArchitecturalState;

    #[test]
    fn default_state_is_cleared() {
        let state = ArchitecturalState::default();
        assert_eq!(state.ip, 0);
        assert_eq!(state.flags.bits(), 0);
        assert!(state.registers.as_slice().iter().all(|word| *word == 0));
    }
}
