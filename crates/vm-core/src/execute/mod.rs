//! Per-core instruction execution.
//!
//! A core turn runs in two phases. [`execute_instruction`] reads the shared
//! state and collects every side effect into an [`ExecuteState`] without
//! mutating anything; [`commit_execution`] then applies the effects in one
//! place. Deferred memory accesses are only armed here and applied by the
//! machine's turn-boundary flush.

#![allow(clippy::cast_possible_truncation)]

mod schedule;

pub use schedule::ScheduledAccess;

use crate::alu::{self, AluOutput};
use crate::api::CoreKind;
use crate::decoder::DecodedInstruction;
use crate::encoding::Opcode;
use crate::state::{ArchitecturalState, Flags, RegisterFile, FLAG_CARRY, FLAG_SIGN, FLAG_ZERO};
use crate::word::{alu_limit, normalize, Word};

const SHIFT_RIGHT_BIT: u16 = 1 << 15;

/// Identity and privileges of the core taking the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoreTurn {
    /// Position in the roster.
    pub index: usize,
    /// Capability class.
    pub kind: CoreKind,
    /// This is the last core of the roster.
    pub is_last: bool,
    /// Machine-wide switch for [`CoreKind::Standard`] multiplies.
    pub allow_standard_mul: bool,
}

impl CoreTurn {
    /// Returns `true` when this core may execute the multiply opcodes.
    #[must_use]
    pub const fn can_multiply(self) -> bool {
        self.kind.can_multiply(self.allow_standard_mul)
    }
}

/// Operand values resolved at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operands {
    /// Value of the primary source register.
    pub primary: Word,
    /// Literal or register-resolved secondary operand, 16 bits wide.
    pub secondary: Word,
}

impl Operands {
    /// Resolves operands against the current register file.
    ///
    /// A register-form secondary operand reads the register named by the
    /// 16-bit field; indexes past `r31` resolve to zero.
    #[must_use]
    pub fn resolve(instr: DecodedInstruction, registers: &RegisterFile) -> Self {
        let raw = if instr.immediate {
            Word::from(instr.operand)
        } else {
            alu_limit(registers.read(usize::from(instr.operand)))
        };

        Self {
            primary: registers.read(usize::from(instr.ra)),
            secondary: normalize(raw),
        }
    }
}

/// How the shared instruction pointer moves after the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IpUpdate {
    /// Advance by one word.
    #[default]
    Advance,
    /// Taken branch whose redirection was suppressed; IP stays put.
    Hold,
    /// Taken branch to an absolute target.
    Jump(Word),
}

/// Outcome of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecuteOutcome {
    /// Instruction retired normally.
    Retired,
    /// Conditional jump was taken.
    BranchTaken,
    /// Multiply on a core without a multiplier; nothing but IP changes.
    MultiplyDenied,
    /// `hlt` retired; the machine halts after this turn.
    Halted,
}

/// Side effects collected during execution, applied by [`commit_execution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecuteState {
    /// Register write `(index, value)`.
    pub register_write: Option<(u8, Word)>,
    /// Replacement flags.
    pub flags: Option<Flags>,
    /// Instruction pointer movement.
    pub ip: IpUpdate,
    /// Deferred memory access to arm.
    pub schedule: Option<ScheduledAccess>,
}

impl ExecuteState {
    const fn write_alu(&mut self, rd: u8, mode: bool, out: AluOutput) {
        self.register_write = Some((rd, out.value));
        if mode {
            self.flags = Some(out.flags);
        }
    }

    const fn write_moved(&mut self, rd: u8, mode: bool, value: Word, flags: Flags) {
        let value = normalize(value);
        self.register_write = Some((rd, value));
        if mode {
            self.flags = Some(
                flags
                    .with(FLAG_ZERO, value == 0)
                    .with(FLAG_SIGN, value >> 31 == 1)
                    .with(FLAG_CARRY, false),
            );
        }
    }
}

/// Effective address for `ld`/`st`: `(primary + secondary) mod 2^16`.
#[must_use]
pub const fn effective_address(operands: Operands) -> u16 {
    (alu_limit(operands.primary) as u16).wrapping_add(alu_limit(operands.secondary) as u16)
}

/// Executes `instr` against `arch` on behalf of `core`.
///
/// Nothing is mutated; the returned [`ExecuteState`] holds every effect.
#[must_use]
pub fn execute_instruction(
    instr: DecodedInstruction,
    operands: Operands,
    arch: &ArchitecturalState,
    core: CoreTurn,
) -> (ExecuteOutcome, ExecuteState) {
    let mut exec = ExecuteState::default();
    let flags = arch.flags;
    let Operands { primary, secondary } = operands;
    let (rd, mode) = (instr.rd, instr.mode);

    if instr.opcode.requires_multiplier() && !core.can_multiply() {
        return (ExecuteOutcome::MultiplyDenied, exec);
    }

    let outcome = match instr.opcode {
        Opcode::Move => {
            exec.write_moved(rd, mode, (primary & 0xFFFF_0000) | alu_limit(secondary), flags);
            ExecuteOutcome::Retired
        }
        Opcode::Exchange => {
            exec.write_moved(rd, mode, (primary << 16) | (secondary >> 16), flags);
            ExecuteOutcome::Retired
        }
        Opcode::Jump => execute_jump(instr, secondary, arch, core, &mut exec),
        Opcode::Load | Opcode::Store => {
            let addr = effective_address(operands);
            exec.schedule = Some(if instr.opcode == Opcode::Load {
                ScheduledAccess::Read { addr, reg: rd }
            } else {
                ScheduledAccess::Write { addr, reg: rd }
            });
            ExecuteOutcome::Retired
        }
        Opcode::Sub => {
            exec.write_alu(rd, mode, alu::sub(secondary, primary, flags));
            ExecuteOutcome::Retired
        }
        Opcode::SubBorrow => {
            exec.write_alu(rd, mode, alu::sbb(secondary, primary, flags.carry(), flags));
            ExecuteOutcome::Retired
        }
        Opcode::Add => {
            exec.write_alu(rd, mode, alu::add(primary, secondary, flags));
            ExecuteOutcome::Retired
        }
        Opcode::AddCarry => {
            exec.write_alu(rd, mode, alu::adc(primary, secondary, flags.carry(), flags));
            ExecuteOutcome::Retired
        }
        Opcode::Xor => {
            exec.write_alu(rd, mode, alu::xor(primary, secondary, flags));
            ExecuteOutcome::Retired
        }
        Opcode::Or => {
            exec.write_alu(rd, mode, alu::or(primary, secondary, flags));
            ExecuteOutcome::Retired
        }
        Opcode::And => {
            exec.write_alu(rd, mode, alu::and(primary, secondary, flags));
            ExecuteOutcome::Retired
        }
        Opcode::Shift => {
            // Direction comes from the raw field, even in register form.
            let out = if instr.operand & SHIFT_RIGHT_BIT == 0 {
                alu::shl(primary, secondary & 0xF, flags)
            } else {
                alu::shr(primary, secondary & 0xF, flags)
            };
            exec.write_alu(rd, mode, out);
            ExecuteOutcome::Retired
        }
        Opcode::Halt => ExecuteOutcome::Halted,
        Opcode::Mul | Opcode::MulHigh => {
            let value = match (instr.opcode, mode) {
                (Opcode::Mul, false) => alu::mul(primary, secondary),
                (Opcode::Mul, true) => alu::muls(primary, secondary),
                (_, false) => alu::mulh(primary, secondary),
                (_, true) => alu::mulx(primary, secondary),
            };
            exec.register_write = Some((rd, value));
            ExecuteOutcome::Retired
        }
    };

    (outcome, exec)
}

const fn execute_jump(
    instr: DecodedInstruction,
    target: Word,
    arch: &ArchitecturalState,
    core: CoreTurn,
    exec: &mut ExecuteState,
) -> ExecuteOutcome {
    let branch = instr.branch();
    if !branch.condition.holds(arch.flags) {
        return ExecuteOutcome::Retired;
    }

    // A synchronized jump only redirects on cores other than the last one.
    if branch.sync && core.is_last {
        exec.ip = IpUpdate::Hold;
    } else {
        exec.register_write = Some((instr.rd, arch.ip.wrapping_add(1)));
        exec.ip = IpUpdate::Jump(target);
    }
    ExecuteOutcome::BranchTaken
}

/// Applies collected side effects to the shared state.
///
/// Returns the access to arm in the scheduled slot, if any; the caller owns
/// the slot so that the flush ordering stays in one place.
pub fn commit_execution(
    arch: &mut ArchitecturalState,
    exec: &ExecuteState,
) -> Option<ScheduledAccess> {
    if let Some((rd, value)) = exec.register_write {
        arch.registers.write(usize::from(rd), value);
    }

    if let Some(flags) = exec.flags {
        arch.flags = flags;
    }

    arch.ip = match exec.ip {
        IpUpdate::Advance => arch.ip.wrapping_add(1),
        IpUpdate::Hold => arch.ip,
        IpUpdate::Jump(target) => target,
    };

    exec.schedule
}
