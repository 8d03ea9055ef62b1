//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used by the MMU. These
//! types are used for the following:
//! 1. **Permission Validation:** Checking read/write/execute bits on user-mode accesses.
//! 2. **Fault Generation:** Choosing between prefetch and data aborts.
//! 3. **Debugging:** Selecting the watchpoint bitmask consulted for an access.

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch; requires execute permission in user mode.
    Fetch,

    /// Data load; requires read permission in user mode.
    Read,

    /// Data store; requires write permission in user mode.
    Write,
}

/// Width of a data access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Width {
    /// A single byte, lane selected by the low two address bits.
    Byte,
    /// A word-aligned 32-bit word.
    Word,
}

impl Width {
    /// Selects the width from the B bit of a transfer instruction.
    pub const fn from_byte_flag(byte: bool) -> Self {
        if byte { Self::Byte } else { Self::Word }
    }
}
