//! Packed `Z/S/C/O` status flags.

/// Zero flag bit.
pub const FLAG_ZERO: u8 = 1 << 0;
/// Sign flag bit.
pub const FLAG_SIGN: u8 = 1 << 1;
/// Carry (borrow after subtraction) flag bit.
pub const FLAG_CARRY: u8 = 1 << 2;
/// Signed overflow flag bit.
pub const FLAG_OVERFLOW: u8 = 1 << 3;
/// Mask of every defined flag bit.
pub const FLAGS_ACTIVE_MASK: u8 = FLAG_ZERO | FLAG_SIGN | FLAG_CARRY | FLAG_OVERFLOW;

/// Status flags shared by all cores of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Flags(u8);

impl Flags {
    /// Builds flags from packed bits; undefined bits are dropped.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & FLAGS_ACTIVE_MASK)
    }

    /// Packed representation.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` when `flag` is set.
    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Returns a copy with `flag` set or cleared.
    #[must_use]
    pub const fn with(self, flag: u8, enabled: bool) -> Self {
        if enabled {
            Self(self.0 | (flag & FLAGS_ACTIVE_MASK))
        } else {
            Self(self.0 & !flag)
        }
    }

    /// Zero flag.
    #[must_use]
    pub const fn zero(self) -> bool {
        self.is_set(FLAG_ZERO)
    }

    /// Sign flag.
    #[must_use]
    pub const fn sign(self) -> bool {
        self.is_set(FLAG_SIGN)
    }

    /// Carry flag.
    #[must_use]
    pub const fn carry(self) -> bool {
        self.is_set(FLAG_CARRY)
    }

    /// Overflow flag.
    #[must_use]
    pub const fn overflow(self) -> bool {
        self.is_set(FLAG_OVERFLOW)
    }
}
