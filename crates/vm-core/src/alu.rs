//! Stateless 16-bit arithmetic/logic unit and condition-table generator.
//!
//! Every operation normalizes and masks its operands to the 16-bit datapath,
//! normalizes its result, and reports the flags it would produce given the
//! current flags. Whether those flags are committed is decided by the caller
//! (the instruction's mode bit), never here.

use crate::state::{Flags, FLAG_CARRY, FLAG_OVERFLOW, FLAG_SIGN, FLAG_ZERO};
use crate::word::{alu_limit, alu_operand, normalize, Word, ALU_MASK};

const SIGN_BIT: Word = 1 << 15;

/// Value and flags produced by one ALU operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOutput {
    /// Normalized, 16-bit limited result.
    pub value: Word,
    /// Flags after the operation.
    pub flags: Flags,
}

const fn sign_of(value: Word) -> bool {
    value & SIGN_BIT != 0
}

const fn zero_sign(flags: Flags, value: Word) -> Flags {
    flags
        .with(FLAG_ZERO, alu_limit(value) == 0)
        .with(FLAG_SIGN, sign_of(value))
}

fn add_common(a: Word, b: Word, carry_in: bool, flags: Flags) -> AluOutput {
    let a = alu_operand(a);
    let b = alu_operand(b);
    let sum = normalize(a + b + Word::from(carry_in));
    let value = alu_limit(sum);

    let overflow = sign_of(a) == sign_of(b) && sign_of(value) != sign_of(a);
    let flags = zero_sign(flags, value)
        .with(FLAG_CARRY, sum > ALU_MASK)
        .with(FLAG_OVERFLOW, overflow);

    AluOutput { value, flags }
}

/// `a + b`.
#[must_use]
pub fn add(a: Word, b: Word, flags: Flags) -> AluOutput {
    add_common(a, b, false, flags)
}

/// `a + b + carry_in`.
#[must_use]
pub fn adc(a: Word, b: Word, carry_in: bool, flags: Flags) -> AluOutput {
    add_common(a, b, carry_in, flags)
}

fn invert_carry(out: AluOutput) -> AluOutput {
    AluOutput {
        value: out.value,
        flags: out.flags.with(FLAG_CARRY, !out.flags.carry()),
    }
}

/// `a - b`, computed as `a + !b + 1`; carry reports a borrow.
#[must_use]
pub fn sub(a: Word, b: Word, flags: Flags) -> AluOutput {
    invert_carry(add_common(a, !b, true, flags))
}

/// `a - b - borrow`, where `borrow` is the current carry flag.
#[must_use]
pub fn sbb(a: Word, b: Word, borrow: bool, flags: Flags) -> AluOutput {
    invert_carry(add_common(a, !b, !borrow, flags))
}

/// Low 16 bits of the unsigned product.
#[must_use]
pub fn mul(a: Word, b: Word) -> Word {
    normalize(alu_limit(alu_operand(a) * alu_operand(b)))
}

/// Upper 16 bits of the signed 16x16 product.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
pub fn muls(a: Word, b: Word) -> Word {
    let a = i32::from(alu_operand(a) as u16 as i16);
    let b = i32::from(alu_operand(b) as u16 as i16);
    normalize(alu_limit(((a * b) >> 16) as Word))
}

/// Upper 16 bits of the unsigned 16x16 product.
#[must_use]
pub fn mulh(a: Word, b: Word) -> Word {
    normalize(alu_limit((alu_operand(a) * alu_operand(b)) >> 16))
}

/// Upper 16 bits of `a` (unsigned) times `b` (signed).
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
pub fn mulx(a: Word, b: Word) -> Word {
    let a = i64::from(alu_operand(a));
    let b = i64::from(alu_operand(b) as u16 as i16);
    normalize(alu_limit(((a * b) >> 16) as Word))
}

/// Left shift by the low four bits of `amount`; touches only `Z` and `S`.
#[must_use]
pub fn shl(value: Word, amount: Word, flags: Flags) -> AluOutput {
    let value = normalize(alu_limit(alu_operand(value) << (alu_operand(amount) & 0xF)));
    AluOutput {
        value,
        flags: zero_sign(flags, value),
    }
}

/// Logical right shift by the low four bits of `amount`; touches only `Z` and `S`.
#[must_use]
pub fn shr(value: Word, amount: Word, flags: Flags) -> AluOutput {
    let value = normalize(alu_operand(value) >> (alu_operand(amount) & 0xF));
    AluOutput {
        value,
        flags: zero_sign(flags, value),
    }
}

fn bitwise(value: Word, flags: Flags) -> AluOutput {
    let value = normalize(alu_limit(value));
    AluOutput {
        value,
        flags: zero_sign(flags, value).with(FLAG_CARRY, false),
    }
}

/// Bitwise and; clears carry.
#[must_use]
pub fn and(a: Word, b: Word, flags: Flags) -> AluOutput {
    bitwise(alu_operand(a) & alu_operand(b), flags)
}

/// Bitwise or; clears carry.
#[must_use]
pub fn or(a: Word, b: Word, flags: Flags) -> AluOutput {
    bitwise(alu_operand(a) | alu_operand(b), flags)
}

/// Bitwise exclusive or; clears carry.
#[must_use]
pub fn xor(a: Word, b: Word, flags: Flags) -> AluOutput {
    bitwise(alu_operand(a) ^ alu_operand(b), flags)
}

/// Branch condition selected by the 4-bit condition field.
///
/// Indexes `8..=15` are the negations of `0..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Condition {
    /// Always taken.
    Always = 0,
    /// Unsigned below or equal: `C | Z`.
    BelowOrEqual = 1,
    /// Signed less: `S ^ O`.
    Less = 2,
    /// Signed less or equal: `Z | (S ^ O)`.
    LessOrEqual = 3,
    /// Negative: `S`.
    Negative = 4,
    /// Zero: `Z`.
    Zero = 5,
    /// Overflow: `O`.
    Overflow = 6,
    /// Carry set: `C`.
    Carry = 7,
    /// Never taken.
    Never = 8,
    /// Unsigned above.
    Above = 9,
    /// Signed greater or equal.
    GreaterOrEqual = 10,
    /// Signed greater.
    Greater = 11,
    /// Not negative.
    NotNegative = 12,
    /// Not zero.
    NotZero = 13,
    /// No overflow.
    NoOverflow = 14,
    /// Carry clear.
    NoCarry = 15,
}

impl Condition {
    /// All conditions in table order.
    pub const ALL: [Self; 16] = [
        Self::Always,
        Self::BelowOrEqual,
        Self::Less,
        Self::LessOrEqual,
        Self::Negative,
        Self::Zero,
        Self::Overflow,
        Self::Carry,
        Self::Never,
        Self::Above,
        Self::GreaterOrEqual,
        Self::Greater,
        Self::NotNegative,
        Self::NotZero,
        Self::NoOverflow,
        Self::NoCarry,
    ];

    /// Decodes the low four bits of a condition field.
    #[must_use]
    pub const fn from_u4(bits: u8) -> Self {
        Self::ALL[(bits & 0xF) as usize]
    }

    /// Index into the condition table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short assembler suffix.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Always => "",
            Self::BelowOrEqual => "be",
            Self::Less => "l",
            Self::LessOrEqual => "le",
            Self::Negative => "n",
            Self::Zero => "z",
            Self::Overflow => "o",
            Self::Carry => "c",
            Self::Never => "never",
            Self::Above => "a",
            Self::GreaterOrEqual => "ge",
            Self::Greater => "g",
            Self::NotNegative => "nn",
            Self::NotZero => "nz",
            Self::NoOverflow => "no",
            Self::NoCarry => "nc",
        }
    }

    /// Evaluates this condition against `flags`.
    #[must_use]
    pub const fn holds(self, flags: Flags) -> bool {
        condition_table(flags)[self.index()]
    }
}

/// Builds the 16-entry condition table for `flags`.
#[must_use]
pub const fn condition_table(flags: Flags) -> [bool; 16] {
    let (z, s, c, o) = (flags.zero(), flags.sign(), flags.carry(), flags.overflow());

    let mut table = [false; 16];
    table[0] = true;
    table[1] = c | z;
    table[2] = s ^ o;
    table[3] = z | (s ^ o);
    table[4] = s;
    table[5] = z;
    table[6] = o;
    table[7] = c;

    let mut index = 8;
    while index < 16 {
        table[index] = !table[index - 8];
        index += 1;
    }
    table
}
