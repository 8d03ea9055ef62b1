//! Condition codes.
//!
//! Every ARMv2 instruction is predicated on one of sixteen conditions over
//! the N, Z, C and V flags. An instruction whose condition fails has no
//! effect beyond advancing the PC.

use std::fmt;

use crate::core::arch::psr::Flags;

/// Condition field, bits 28-31.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Equal: Z.
    Eq = 0x0,
    /// Not equal: !Z.
    Ne = 0x1,
    /// Carry set / unsigned higher or same: C.
    Cs = 0x2,
    /// Carry clear / unsigned lower: !C.
    Cc = 0x3,
    /// Minus: N.
    Mi = 0x4,
    /// Plus: !N.
    Pl = 0x5,
    /// Overflow: V.
    Vs = 0x6,
    /// No overflow: !V.
    Vc = 0x7,
    /// Unsigned higher: C && !Z.
    Hi = 0x8,
    /// Unsigned lower or same: !C || Z.
    Ls = 0x9,
    /// Signed greater or equal: N == V.
    Ge = 0xa,
    /// Signed less than: N != V.
    Lt = 0xb,
    /// Signed greater than: !Z && N == V.
    Gt = 0xc,
    /// Signed less or equal: Z || N != V.
    Le = 0xd,
    /// Always.
    Al = 0xe,
    /// Never.
    Nv = 0xf,
}

impl Condition {
    /// Decodes a condition from its four-bit field.
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0xf {
            0x0 => Self::Eq,
            0x1 => Self::Ne,
            0x2 => Self::Cs,
            0x3 => Self::Cc,
            0x4 => Self::Mi,
            0x5 => Self::Pl,
            0x6 => Self::Vs,
            0x7 => Self::Vc,
            0x8 => Self::Hi,
            0x9 => Self::Ls,
            0xa => Self::Ge,
            0xb => Self::Lt,
            0xc => Self::Gt,
            0xd => Self::Le,
            0xe => Self::Al,
            _ => Self::Nv,
        }
    }

    /// Evaluates the condition against a flag set.
    pub const fn passes(self, flags: Flags) -> bool {
        let n = flags.contains(Flags::N);
        let z = flags.contains(Flags::Z);
        let c = flags.contains(Flags::C);
        let v = flags.contains(Flags::V);
        match self {
            Self::Eq => z,
            Self::Ne => !z,
            Self::Cs => c,
            Self::Cc => !c,
            Self::Mi => n,
            Self::Pl => !n,
            Self::Vs => v,
            Self::Vc => !v,
            Self::Hi => c && !z,
            Self::Ls => !c || z,
            Self::Ge => n == v,
            Self::Lt => n != v,
            Self::Gt => !z && n == v,
            Self::Le => z || n != v,
            Self::Al => true,
            Self::Nv => false,
        }
    }

    /// Returns the assembler suffix; empty for [`Condition::Al`].
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Ne => "NE",
            Self::Cs => "CS",
            Self::Cc => "CC",
            Self::Mi => "MI",
            Self::Pl => "PL",
            Self::Vs => "VS",
            Self::Vc => "VC",
            Self::Hi => "HI",
            Self::Ls => "LS",
            Self::Ge => "GE",
            Self::Lt => "LT",
            Self::Gt => "GT",
            Self::Le => "LE",
            Self::Al => "",
            Self::Nv => "NV",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
