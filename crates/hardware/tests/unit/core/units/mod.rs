//! # Execution Units
//!
//! Tests for the data-path units the instruction handlers drive.

/// Unit tests for the Arithmetic Logic Unit (ALU).
///
/// Verifies results and the C and V flags of every arithmetic opcode and
/// that logical opcodes pass the shifter carry through.
pub mod alu;


/// Unit tests for the page table: faulting, permissions and device binding.
pub mod mmu;
