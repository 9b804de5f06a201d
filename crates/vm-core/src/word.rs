//! Architectural word type and the canonicalization rule applied at every
//! value boundary (register write, memory store, ALU output).

/// 32-bit architectural datum.
pub type Word = u32;

/// Mask applied to ALU operands and results (16-bit datapath).
pub const ALU_MASK: Word = 0xFFFF;

/// Bit patterns that canonicalize to zero.
pub const ZERO_ALIASES: [Word; 4] = [0x0000_0000, 0x4000_0000, 0x8000_0000, 0xC000_0000];

/// Canonicalizes a word: the four zero aliases collapse to `0`, everything
/// else passes through unchanged.
#[must_use]
pub const fn normalize(word: Word) -> Word {
    match word {
        0x4000_0000 | 0x8000_0000 | 0xC000_0000 => 0,
        other => other,
    }
}

/// Limits a word to the 16-bit ALU datapath.
#[must_use]
pub const fn alu_limit(word: Word) -> Word {
    word & ALU_MASK
}

/// Normalizes then limits a word to 16 bits, the form every ALU operand takes.
#[must_use]
pub const fn alu_operand(word: Word) -> Word {
    alu_limit(normalize(word))
}
