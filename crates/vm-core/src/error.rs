use thiserror::Error;

/// Direction of a memory-mapped I/O hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HookKind {
    /// Intercepts reads; first match wins.
    Read,
    /// Intercepts writes; every match fires.
    Write,
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// Rejected machine or memory construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    /// The core roster is empty.
    #[error("at least one core is required")]
    NoCores,
    /// The core roster exceeds the supported maximum.
    #[error("{requested} cores requested, at most {max} are supported")]
    TooManyCores {
        /// Roster length asked for.
        requested: usize,
        /// Supported maximum.
        max: usize,
    },
    /// Row count or row size is zero.
    #[error("memory geometry must have at least one row of at least one word")]
    EmptyMemory,
    /// Geometry exceeds the 16-bit address space.
    #[error("memory of {words} words exceeds the {max}-word address space")]
    MemoryTooLarge {
        /// Requested capacity in words.
        words: usize,
        /// Addressable maximum.
        max: usize,
    },
    /// Tracing is enabled but the trace buffer could not hold a single entry.
    #[error("trace capacity must be non-zero when tracing is enabled")]
    ZeroTraceCapacity,
}

/// Rejected hook registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum HookError {
    /// The hook list for this direction is full.
    #[error("{kind} hook table is full ({capacity} entries)")]
    CapacityExceeded {
        /// Hook direction.
        kind: HookKind,
        /// Fixed table capacity.
        capacity: usize,
    },
}
