//! Machine instance and the cycle scheduler.
//!
//! One cycle gives every core of the roster one turn, in index order. All
//! cores share the register file, flags, instruction pointer, memory and the
//! single scheduled access slot. The slot is flushed before every turn and
//! once more after the last, so a load issued by core `K` is visible to core
//! `K + 1` but not to `K` itself.

use crate::api::{CoreKind, CycleOutcome, RunOutcome, VmConfig};
use crate::decoder::Decoder;
use crate::error::{ConfigError, HookError};
use crate::execute::{
    commit_execution, execute_instruction, CoreTurn, ExecuteOutcome, Operands, ScheduledAccess,
};
use crate::memory::{Memory, ReadHook, WriteHook};
use crate::state::{ArchitecturalState, Flags, RegisterFile, RunState};
use crate::trace::{TraceBuffer, TraceEntry};
use crate::word::Word;

/// Emulator instance.
#[derive(Debug)]
pub struct Machine {
    memory: Memory,
    arch: ArchitecturalState,
    run_state: RunState,
    scheduled: ScheduledAccess,
    cores: Vec<CoreKind>,
    allow_standard_mul: bool,
    trace: Option<TraceBuffer>,
}

impl Machine {
    /// Builds a machine with memory filled with the power-on pattern, all
    /// registers zero, `IP = 0` and the slot idle.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`VmConfig::validate`].
    pub fn new(config: VmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let memory = Memory::new(config.rows, config.row_size)?;
        tracing::debug!(
            words = memory.len(),
            cores = config.cores.len(),
            tracing = config.tracing_enabled,
            "machine created"
        );

        Ok(Self {
            memory,
            arch: ArchitecturalState::default(),
            run_state: RunState::Running,
            scheduled: ScheduledAccess::Idle,
            cores: config.cores,
            allow_standard_mul: config.allow_standard_mul,
            trace: config
                .tracing_enabled
                .then(|| TraceBuffer::new(config.trace_capacity)),
        })
    }

    /// Loads an image at address 0; see [`Memory::load_image`].
    pub fn load_image(&mut self, bytes: &[u8]) -> usize {
        self.memory.load_image(bytes)
    }

    /// Registers a read hook on `[base, base + length]`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::CapacityExceeded`] when the read table is full.
    pub fn add_read_hook(
        &mut self,
        base: u16,
        length: u16,
        hook: impl ReadHook + 'static,
    ) -> Result<(), HookError> {
        self.memory.add_read_hook(base, length, hook)
    }

    /// Registers a write hook on `[base, base + length]`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::CapacityExceeded`] when the write table is full.
    pub fn add_write_hook(
        &mut self,
        base: u16,
        length: u16,
        hook: impl WriteHook + 'static,
    ) -> Result<(), HookError> {
        self.memory.add_write_hook(base, length, hook)
    }

    /// Gives every core one turn.
    ///
    /// A halted machine does nothing. When a core halts, the remaining cores
    /// of the cycle are skipped; the final flush still runs so that an access
    /// armed by the halting core lands.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        if self.run_state.is_halted() {
            return CycleOutcome {
                turns: 0,
                run_state: self.run_state,
            };
        }

        let mut turns = 0;
        for index in 0..self.cores.len() {
            self.flush_scheduled();
            if self.run_state.is_halted() {
                break;
            }
            self.step_core(index);
            turns += 1;
        }
        self.flush_scheduled();

        CycleOutcome {
            turns,
            run_state: self.run_state,
        }
    }

    /// Runs cycles until the machine halts or `max_cycles` have executed.
    pub fn run(&mut self, max_cycles: u64) -> RunOutcome {
        let mut cycles = 0;
        while cycles < max_cycles && !self.run_state.is_halted() {
            self.run_cycle();
            cycles += 1;
        }
        RunOutcome {
            cycles,
            run_state: self.run_state,
        }
    }

    fn flush_scheduled(&mut self) {
        self.scheduled.flush(&mut self.memory, &mut self.arch.registers);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn step_core(&mut self, index: usize) {
        if self.arch.ip as usize >= self.memory.len() {
            self.arch.ip = 0;
        }

        let address = self.arch.ip;
        let raw = self.memory.read(address as u16);
        let instr = Decoder::decode(raw);
        let operands = Operands::resolve(instr, &self.arch.registers);

        if let Some(trace) = self.trace.as_mut() {
            trace.record(TraceEntry {
                instruction: raw,
                address,
                destination: instr.rd,
                primary: operands.primary,
                secondary: operands.secondary,
            });
        }
        tracing::trace!(
            core = index,
            ip = address,
            raw,
            opcode = instr.opcode.mnemonic(),
            "fetch"
        );

        let core = CoreTurn {
            index,
            kind: self.cores[index],
            is_last: index + 1 == self.cores.len(),
            allow_standard_mul: self.allow_standard_mul,
        };
        let (outcome, exec) = execute_instruction(instr, operands, &self.arch, core);
        if let Some(access) = commit_execution(&mut self.arch, &exec) {
            self.scheduled = access;
        }

        match outcome {
            ExecuteOutcome::Halted => {
                self.run_state = RunState::Halted;
                tracing::debug!(core = index, ip = address, "machine halted");
            }
            ExecuteOutcome::MultiplyDenied => {
                tracing::debug!(core = index, ip = address, kind = ?core.kind, "multiply denied");
            }
            ExecuteOutcome::Retired | ExecuteOutcome::BranchTaken => {}
        }
    }

    /// Memory contents and hooks.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable memory, for hosts that patch words or register hooks directly.
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Shared register file.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.arch.registers
    }

    /// Mutable register file.
    pub const fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.arch.registers
    }

    /// Shared flags.
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.arch.flags
    }

    /// Shared instruction pointer.
    #[must_use]
    pub const fn ip(&self) -> Word {
        self.arch.ip
    }

    /// Moves the shared instruction pointer.
    pub const fn set_ip(&mut self, ip: Word) {
        self.arch.ip = ip;
    }

    /// Full architectural state.
    #[must_use]
    pub const fn arch(&self) -> &ArchitecturalState {
        &self.arch
    }

    /// Running or halted.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Returns `true` once any core has executed `hlt`.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.run_state.is_halted()
    }

    /// Fetch trace, when enabled.
    #[must_use]
    pub const fn trace(&self) -> Option<&TraceBuffer> {
        self.trace.as_ref()
    }

    /// Core roster in turn order.
    #[must_use]
    pub fn cores(&self) -> &[CoreKind] {
        &self.cores
    }

    /// Pending scheduled access. Always idle between cycles.
    #[must_use]
    pub const fn scheduled(&self) -> ScheduledAccess {
        self.scheduled
    }
}
