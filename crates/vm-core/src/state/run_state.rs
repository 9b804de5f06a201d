/// Machine-wide execution state.
///
/// `Halted` is terminal: there is no resume path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Cores are invoked every cycle.
    #[default]
    Running,
    /// A core executed `hlt`; no further core turns happen.
    Halted,
}

impl RunState {
    /// Returns `true` once the machine has halted.
    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::Halted)
    }
}
