//! ARMv2 architectural state.
//!
//! This module contains the programmer-visible state of the processor.
//! It includes the following modules:
//! 1. **Registers:** The banked register file and its effective table.
//! 2. **Modes:** Processor mode definitions.
//! 3. **Status:** The unpacked R15 status register and its flags.
//! 4. **Traps:** The exception vector table.

/// Banked register file.
pub mod gpr;

/// Processor mode definitions.
pub mod mode;

/// Program status register and flags.
pub mod psr;

/// Exception vector table.
pub mod trap;

pub use gpr::RegisterBank;
pub use mode::Mode;
pub use psr::{Flags, Psr};
pub use trap::{ExceptionTable, ExceptionVector};
