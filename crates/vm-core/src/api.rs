//! Host-facing configuration and stepping result types.

use crate::error::ConfigError;
use crate::memory::MAX_MEMORY_WORDS;
use crate::state::RunState;

/// Largest supported core roster.
pub const MAX_CORES: usize = 50;
/// Default number of memory rows.
pub const DEFAULT_ROWS: u16 = 64;
/// Default words per row.
pub const DEFAULT_ROW_SIZE: u16 = 128;
/// Default roster length.
pub const DEFAULT_CORE_COUNT: usize = 10;
/// Default trace buffer capacity in entries.
pub const DEFAULT_TRACE_CAPACITY: usize = 100_000;

/// Per-core capability class, controlling access to the multiply opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CoreKind {
    /// Never multiplies.
    Basic,
    /// Multiplies only when the machine-wide switch allows it.
    Standard,
    /// Always multiplies.
    #[default]
    Multiply,
}

impl CoreKind {
    /// Maps the legacy roster codes `0/1/2`.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Basic),
            1 => Some(Self::Standard),
            2 => Some(Self::Multiply),
            _ => None,
        }
    }

    /// Returns `true` when a core of this kind may execute `mul`/`mulh`.
    #[must_use]
    pub const fn can_multiply(self, allow_standard_mul: bool) -> bool {
        match self {
            Self::Basic => false,
            Self::Standard => allow_standard_mul,
            Self::Multiply => true,
        }
    }
}

/// Construction-time machine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct VmConfig {
    /// Memory rows.
    pub rows: u16,
    /// Words per memory row.
    pub row_size: u16,
    /// Core roster in turn order.
    pub cores: Vec<CoreKind>,
    /// Lets [`CoreKind::Standard`] cores multiply.
    pub allow_standard_mul: bool,
    /// Records a fetch trace entry for every executed instruction.
    pub tracing_enabled: bool,
    /// Trace buffer capacity in entries.
    pub trace_capacity: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            row_size: DEFAULT_ROW_SIZE,
            cores: vec![CoreKind::Multiply; DEFAULT_CORE_COUNT],
            allow_standard_mul: true,
            tracing_enabled: false,
            trace_capacity: DEFAULT_TRACE_CAPACITY,
        }
    }
}

impl VmConfig {
    /// Configuration with `count` cores of one kind and default feature flags.
    #[must_use]
    pub fn uniform(rows: u16, row_size: u16, count: usize, kind: CoreKind) -> Self {
        Self {
            rows,
            row_size,
            cores: vec![kind; count],
            ..Self::default()
        }
    }

    /// Memory capacity in words.
    #[must_use]
    pub fn memory_words(&self) -> usize {
        usize::from(self.rows) * usize::from(self.row_size)
    }

    /// Checks roster, geometry and trace settings.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cores.is_empty() {
            return Err(ConfigError::NoCores);
        }
        if self.cores.len() > MAX_CORES {
            return Err(ConfigError::TooManyCores {
                requested: self.cores.len(),
                max: MAX_CORES,
            });
        }

        let words = self.memory_words();
        if words == 0 {
            return Err(ConfigError::EmptyMemory);
        }
        if words > MAX_MEMORY_WORDS {
            return Err(ConfigError::MemoryTooLarge {
                words,
                max: MAX_MEMORY_WORDS,
            });
        }

        if self.tracing_enabled && self.trace_capacity == 0 {
            return Err(ConfigError::ZeroTraceCapacity);
        }
        Ok(())
    }
}

/// Result of one [`crate::Machine::run_cycle`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CycleOutcome {
    /// Cores that executed an instruction this cycle.
    pub turns: usize,
    /// Machine state after the cycle.
    pub run_state: RunState,
}

/// Aggregated result of [`crate::Machine::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Cycles in which at least one core executed.
    pub cycles: u64,
    /// Machine state when the run stopped.
    pub run_state: RunState,
}
