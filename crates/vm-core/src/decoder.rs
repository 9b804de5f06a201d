//! Bit-field decoder for 32-bit instruction words.
//!
//! Layout, MSB first:
//!
//! | bits   | field                                                    |
//! |--------|----------------------------------------------------------|
//! | 31     | mode flag (opcode dependent)                             |
//! | 30     | secondary operand is an immediate literal                |
//! | 25..29 | destination register                                     |
//! | 20..24 | primary source register (branches: sync + condition)     |
//! | 16..19 | opcode                                                   |
//! | 0..15  | secondary operand: literal, or register index to resolve |
//!
//! Every word decodes; there is no illegal encoding.

use crate::alu::Condition;
use crate::encoding::Opcode;
use crate::word::Word;

const MODE_BIT: u32 = 31;
const IMMEDIATE_BIT: u32 = 30;
const DEST_SHIFT: u32 = 25;
const PRIMARY_SHIFT: u32 = 20;
const OPCODE_SHIFT: u32 = 16;
const FIVE_BITS: Word = 0x1F;

/// Sync bit inside the primary-source field of a branch.
pub const BRANCH_SYNC_BIT: u8 = 1 << 4;

/// Branch-specific reading of the primary-source field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchFields {
    /// Synchronized jump requested (bit 24).
    pub sync: bool,
    /// Condition table index (bits 20..23).
    pub condition: Condition,
}

/// Fields extracted from one instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedInstruction {
    /// Operation.
    pub opcode: Opcode,
    /// Mode flag (bit 31): flag update, signed multiply, or mixed-sign high multiply.
    pub mode: bool,
    /// Secondary operand is a literal (bit 30).
    pub immediate: bool,
    /// Destination register index.
    pub rd: u8,
    /// Primary source register index, or sync/condition for branches.
    pub ra: u8,
    /// Raw secondary operand field.
    pub operand: u16,
}

impl DecodedInstruction {
    /// Register-operand form: the secondary operand reads register `rs`.
    #[must_use]
    pub const fn reg(opcode: Opcode, rd: u8, ra: u8, rs: u16) -> Self {
        Self {
            opcode,
            mode: false,
            immediate: false,
            rd,
            ra,
            operand: rs,
        }
    }

    /// Immediate form: the secondary operand is `value`.
    #[must_use]
    pub const fn imm(opcode: Opcode, rd: u8, ra: u8, value: u16) -> Self {
        Self {
            opcode,
            mode: false,
            immediate: true,
            rd,
            ra,
            operand: value,
        }
    }

    /// Conditional jump to an immediate target, linking `IP + 1` into `link`.
    #[must_use]
    pub const fn jump(condition: Condition, sync: bool, link: u8, target: u16) -> Self {
        let sync_bits = if sync { BRANCH_SYNC_BIT } else { 0 };
        Self::imm(Opcode::Jump, link, sync_bits | condition as u8, target)
    }

    /// Returns a copy with the mode flag set to `mode`.
    #[must_use]
    pub const fn with_mode(mut self, mode: bool) -> Self {
        self.mode = mode;
        self
    }

    /// Reads the primary-source field as branch sync flag and condition.
    #[must_use]
    pub const fn branch(self) -> BranchFields {
        BranchFields {
            sync: self.ra & BRANCH_SYNC_BIT != 0,
            condition: Condition::from_u4(self.ra),
        }
    }

    /// Reassembles the raw instruction word.
    #[must_use]
    pub const fn encode(self) -> Word {
        ((self.mode as Word) << MODE_BIT)
            | ((self.immediate as Word) << IMMEDIATE_BIT)
            | ((self.rd as Word & FIVE_BITS) << DEST_SHIFT)
            | ((self.ra as Word & FIVE_BITS) << PRIMARY_SHIFT)
            | ((self.opcode as Word) << OPCODE_SHIFT)
            | self.operand as Word
    }
}

/// Stateless instruction decoder.
pub struct Decoder;

impl Decoder {
    /// Splits a raw instruction word into its fields.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn decode(word: Word) -> DecodedInstruction {
        DecodedInstruction {
            opcode: Opcode::from_u4((word >> OPCODE_SHIFT) as u8),
            mode: (word >> MODE_BIT) & 1 == 1,
            immediate: (word >> IMMEDIATE_BIT) & 1 == 1,
            rd: ((word >> DEST_SHIFT) & FIVE_BITS) as u8,
            ra: ((word >> PRIMARY_SHIFT) & FIVE_BITS) as u8,
            operand: word as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decode_extracts_every_field() {
        let word = 0b1_1_00011_10101_0110_0000_0000_0000_0111;
        let decoded = Decoder::decode(word);
        assert!(decoded.mode);
        assert!(decoded.immediate);
        assert_eq!(decoded.rd, 3);
        assert_eq!(decoded.ra, 0b10101);
        assert_eq!(decoded.opcode, Opcode::Add);
        assert_eq!(decoded.operand, 7);
    }

    #[test]
    fn zero_word_is_register_move_of_zero() {
        let decoded = Decoder::decode(0);
        assert_eq!(decoded, DecodedInstruction::reg(Opcode::Move, 0, 0, 0));
    }

    #[test]
    fn branch_fields_split_sync_and_condition() {
        let word = DecodedInstruction::jump(Condition::Zero, true, 1, 9).encode();
        let decoded = Decoder::decode(word);
        assert_eq!(decoded.opcode, Opcode::Jump);
        assert_eq!(
            decoded.branch(),
            BranchFields {
                sync: true,
                condition: Condition::Zero
            }
        );
        assert_eq!(decoded.operand, 9);

        let plain = DecodedInstruction::jump(Condition::NoCarry, false, 0, 0).branch();
        assert!(!plain.sync);
        assert_eq!(plain.condition, Condition::NoCarry);
    }

    #[test]
    fn builders_produce_expected_words() {
        assert_eq!(
            DecodedInstruction::imm(Opcode::Halt, 0, 0, 0).encode(),
            0x400D_0000
        );
        assert_eq!(
            DecodedInstruction::reg(Opcode::Add, 1, 2, 3)
                .with_mode(true)
                .encode(),
            0x8226_0003
        );
    }

    proptest! {
        #[test]
        fn decode_then_encode_is_identity(word in any::<u32>()) {
            prop_assert_eq!(Decoder::decode(word).encode(), word);
        }
    }
}
