//! Program Status Register.
//!
//! On the 26-bit architecture R15 carries the program counter, the condition
//! flags, the interrupt masks and the processor mode in one word:
//!
//! ```text
//!  31 30 29 28 27 26 25                         2 1 0
//! [ N| Z| C| V| I| F|            PC              | M ]
//! ```
//!
//! This module keeps the three parts apart in [`Psr`] and produces the packed
//! word only where the guest can observe it: R15 as an operand, exception link
//! saves, block transfers of R15 and debug dumps.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use super::mode::Mode;

/// Mask of the program counter field.
pub const PC_MASK: u32 = 0x03ff_fffc;

/// Bits user mode may never change by writing R15: I, F and the mode.
pub const PC_PROTECTED_BITS: u32 = Flags::I.0 | Flags::F.0 | 3;

/// Mode bits plus the six flags; the complement of [`PC_MASK`].
pub const MODE_PSR_MASK: u32 = !PC_MASK;

/// The six status flags held in the top bits of R15.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Flags(u32);

impl Flags {
    /// Negative.
    pub const N: Self = Self(0x8000_0000);
    /// Zero.
    pub const Z: Self = Self(0x4000_0000);
    /// Carry / not borrow.
    pub const C: Self = Self(0x2000_0000);
    /// Overflow.
    pub const V: Self = Self(0x1000_0000);
    /// IRQ disable.
    pub const I: Self = Self(0x0800_0000);
    /// FIQ disable.
    pub const F: Self = Self(0x0400_0000);
    /// The four condition flags.
    pub const NZCV: Self = Self(0xf000_0000);
    /// Both interrupt masks.
    pub const MASKS: Self = Self(0x0c00_0000);
    /// Every flag bit.
    pub const ALL: Self = Self(0xfc00_0000);

    /// Returns an empty flag set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds a flag set from a word, ignoring every non-flag bit.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Returns the flag bits in their R15 positions.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Sets the flags in `other`.
    pub const fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the flags in `other`.
    pub const fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Sets or clears the flags in `other`.
    pub const fn set(&mut self, other: Self, value: bool) {
        if value {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl BitOr for Flags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Flags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for Flags {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0 & Self::ALL.0)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, set, clear) in [
            (Self::N, 'N', 'n'),
            (Self::Z, 'Z', 'z'),
            (Self::C, 'C', 'c'),
            (Self::V, 'V', 'v'),
            (Self::I, 'I', 'i'),
            (Self::F, 'F', 'f'),
        ] {
            write!(f, "{}", if self.contains(flag) { set } else { clear })?;
        }
        Ok(())
    }
}

/// Unpacked view of R15.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Psr {
    /// Program counter; always kept within [`PC_MASK`].
    pub pc: u32,
    /// Condition flags and interrupt masks.
    pub flags: Flags,
    /// Current processor mode.
    pub mode: Mode,
}

impl Psr {
    /// Packs the register into its guest-visible R15 layout.
    pub const fn pack(self) -> u32 {
        self.flags.bits() | (self.pc & PC_MASK) | self.mode.bits()
    }

    /// Splits a guest R15 word into its parts.
    pub const fn unpack(word: u32) -> Self {
        Self {
            pc: word & PC_MASK,
            flags: Flags::from_bits(word),
            mode: Mode::from_bits(word),
        }
    }

    /// Returns the flags and mode bits with the PC field cleared.
    pub const fn mode_and_flags(self) -> u32 {
        self.flags.bits() | self.mode.bits()
    }
}

impl fmt::Display for Psr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x} [{} {}]", self.pc, self.flags, self.mode)
    }
}
