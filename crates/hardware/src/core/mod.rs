//! Core processor implementation.
//!
//! This module contains the ARMv2 CPU: the architectural state (banked
//! registers, packed status word, exception vectors), the data-path units
//! the instruction handlers drive, and the orchestrator that runs guest code.

/// Architecture-specific components (register bank, PSR, modes, vectors).
pub mod arch;

/// CPU core implementation and execution orchestration.
pub mod cpu;

/// Execution units (ALU and barrel shifter, MMU, breakpoint index).
pub mod units;

pub use self::cpu::Cpu;
