//! ARMv2 Processor Modes.
//!
//! This module defines the four processor modes of the 26-bit architecture.
//! It implements the following:
//! 1. **Mode Classification:** User, FIQ, IRQ and supervisor.
//! 2. **Serialization:** Conversion to and from the two mode bits of R15.
//! 3. **Observability:** Human-readable naming and display formatting.

use std::fmt;

/// Processor mode, stored in bits 0-1 of R15.
///
/// Every mode other than [`Mode::User`] is privileged and bypasses page
/// permission checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Unprivileged application mode.
    User = 0,

    /// Fast interrupt mode; banks R8-R14.
    Fiq = 1,

    /// Interrupt mode; banks R13-R14.
    Irq = 2,

    /// Supervisor mode; banks R13-R14. Entered on reset and most exceptions.
    #[default]
    Supervisor = 3,
}

impl Mode {
    /// Decodes the mode from the low two bits of a word.
    ///
    /// # Arguments
    ///
    /// * `bits` - Any word; only bits 0-1 are used.
    ///
    /// # Returns
    ///
    /// The corresponding `Mode`. Every bit pattern is valid.
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => Self::User,
            1 => Self::Fiq,
            2 => Self::Irq,
            _ => Self::Supervisor,
        }
    }

    /// Returns the two mode bits.
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Returns `true` for every mode other than user.
    pub const fn is_privileged(self) -> bool {
        !matches!(self, Self::User)
    }

    /// Returns the conventional short name of the mode.
    pub const fn name(self) -> &'static str {
        match self {
            Self::User => "USR",
            Self::Fiq => "FIQ",
            Self::Irq => "IRQ",
            Self::Supervisor => "SVC",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
