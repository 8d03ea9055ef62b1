//! Execution units and functional components.
//!
//! This module contains the data-path units the instruction handlers drive:
//! the ALU with its barrel shifter, the page-table MMU and the debugger's
//! breakpoint/watchpoint index.

/// Arithmetic Logic Unit and barrel shifter.
pub mod alu;

/// Breakpoint and watchpoint bitmaps.
pub mod debug;

/// Page-table Memory Management Unit.
pub mod mmu;
