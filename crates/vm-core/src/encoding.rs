/// Operation selected by the 4-bit opcode field (bits 16..19).
///
/// Every 4-bit value is assigned, so decoding never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Opcode {
    Move = 0x0,
    Jump = 0x1,
    Load = 0x2,
    Exchange = 0x3,
    Sub = 0x4,
    SubBorrow = 0x5,
    Add = 0x6,
    AddCarry = 0x7,
    Xor = 0x8,
    Or = 0x9,
    Store = 0xA,
    Shift = 0xB,
    And = 0xC,
    Halt = 0xD,
    Mul = 0xE,
    MulHigh = 0xF,
}

/// Class used by the dispatcher and by collaborators grouping instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpcodeClass {
    /// Register-to-register data movement (`mov`, `exh`).
    Move,
    /// Conditional control transfer.
    Branch,
    /// Deferred memory access through the scheduled slot.
    Memory,
    /// Add/subtract/logic/shift.
    Alu,
    /// Capability-gated multiply.
    Multiply,
    /// Machine control.
    Control,
}

/// Single source-of-truth opcode table: `(value, opcode, mnemonic, class)`.
pub const OPCODE_TABLE: [(u8, Opcode, &str, OpcodeClass); 16] = [
    (0x0, Opcode::Move, "mov", OpcodeClass::Move),
    (0x1, Opcode::Jump, "jmp", OpcodeClass::Branch),
    (0x2, Opcode::Load, "ld", OpcodeClass::Memory),
    (0x3, Opcode::Exchange, "exh", OpcodeClass::Move),
    (0x4, Opcode::Sub, "sub", OpcodeClass::Alu),
    (0x5, Opcode::SubBorrow, "sbb", OpcodeClass::Alu),
    (0x6, Opcode::Add, "add", OpcodeClass::Alu),
    (0x7, Opcode::AddCarry, "adc", OpcodeClass::Alu),
    (0x8, Opcode::Xor, "xor", OpcodeClass::Alu),
    (0x9, Opcode::Or, "or", OpcodeClass::Alu),
    (0xA, Opcode::Store, "st", OpcodeClass::Memory),
    (0xB, Opcode::Shift, "bsh", OpcodeClass::Alu),
    (0xC, Opcode::And, "and", OpcodeClass::Alu),
    (0xD, Opcode::Halt, "hlt", OpcodeClass::Control),
    (0xE, Opcode::Mul, "mul", OpcodeClass::Multiply),
    (0xF, Opcode::MulHigh, "mulh", OpcodeClass::Multiply),
];

impl Opcode {
    /// Decodes the low four bits of `bits`.
    #[must_use]
    pub const fn from_u4(bits: u8) -> Self {
        OPCODE_TABLE[(bits & 0xF) as usize].1
    }

    /// Raw 4-bit encoding.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Base mnemonic. The mode bit selects `muls`/`mulx` for the multiply
    /// opcodes; see [`Opcode::mnemonic_with_mode`].
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        OPCODE_TABLE[self as usize].2
    }

    /// Mnemonic as selected by the instruction's mode bit.
    #[must_use]
    pub const fn mnemonic_with_mode(self, mode: bool) -> &'static str {
        match (self, mode) {
            (Self::Mul, true) => "muls",
            (Self::MulHigh, true) => "mulx",
            _ => self.mnemonic(),
        }
    }

    /// Dispatch class.
    #[must_use]
    pub const fn class(self) -> OpcodeClass {
        OPCODE_TABLE[self as usize].3
    }

    /// Returns `true` for opcodes gated by core multiply capability.
    #[must_use]
    pub const fn requires_multiplier(self) -> bool {
        matches!(self.class(), OpcodeClass::Multiply)
    }
}
