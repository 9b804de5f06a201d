//! Core of a word-addressed, multi-core virtual CPU.
//!
//! Several logical cores take ordered turns on one shared register file,
//! flag set and instruction pointer. Loads and stores go through a single
//! deferred slot flushed between turns, and memory supports address-range
//! hooks for memory-mapped I/O.

/// Word representation and zero-alias normalization.
pub mod word;
pub use word::{alu_limit, alu_operand, normalize, Word, ALU_MASK, ZERO_ALIASES};

/// Construction and hook registration errors.
pub mod error;
pub use error::{ConfigError, HookError, HookKind};

/// Word-addressed memory with read/write hooks.
pub mod memory;
pub use memory::{
    decode_words, encode_words, HookRange, HookTable, Memory, ReadHook, WriteHook, FILL_PATTERN,
    HOOK_CAPACITY, MAX_MEMORY_WORDS, WORD_BYTES,
};

/// Public host-facing configuration and stepping results.
pub mod api;
pub use api::{
    CoreKind, CycleOutcome, RunOutcome, VmConfig, DEFAULT_CORE_COUNT, DEFAULT_ROWS,
    DEFAULT_ROW_SIZE, DEFAULT_TRACE_CAPACITY, MAX_CORES,
};

/// Shared architectural state.
pub mod state;
pub use state::{
    ArchitecturalState, Flags, RegisterFile, RunState, FLAGS_ACTIVE_MASK, FLAG_CARRY,
    FLAG_OVERFLOW, FLAG_SIGN, FLAG_ZERO, MAX_REGISTER_INDEX, REGISTER_COUNT,
};

/// 16-bit arithmetic/logic unit and branch conditions.
pub mod alu;
pub use alu::{condition_table, AluOutput, Condition};

/// Opcode table and classification.
pub mod encoding;
pub use encoding::{Opcode, OpcodeClass, OPCODE_TABLE};

/// Instruction word field extraction.
pub mod decoder;
pub use decoder::{BranchFields, DecodedInstruction, Decoder, BRANCH_SYNC_BIT};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{
    commit_execution, effective_address, execute_instruction, CoreTurn, ExecuteOutcome,
    ExecuteState, IpUpdate, Operands, ScheduledAccess,
};

/// Bounded fetch trace.
pub mod trace;
pub use trace::{TraceBuffer, TraceEntry};

/// Machine instance and cycle scheduler.
pub mod machine;
pub use machine::Machine;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
