//! Execution statistics collection and reporting.
//!
//! This module tracks what the emulated CPU has done. It provides:
//! 1. **Throughput:** Instructions executed and condition-failed skips.
//! 2. **Instruction mix:** Counts by handler family.
//! 3. **Exceptions:** Counts per vector, breakpoints and interrupts taken.
//!
//! Counters only grow; [`ExecStats::default`] starts from zero.

use std::fmt;

use crate::common::error::Exception;
use crate::isa::decode::InstructionClass;

/// Execution statistics of one CPU.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecStats {
    /// Instruction slots consumed, including skipped and faulting ones.
    pub instructions: u64,
    /// Instructions whose condition failed.
    pub condition_skips: u64,

    /// Data processing instructions executed.
    pub inst_alu: u64,
    /// Multiply instructions executed.
    pub inst_multiply: u64,
    /// Single transfer and swap loads executed.
    pub inst_load: u64,
    /// Single transfer stores executed.
    pub inst_store: u64,
    /// Block transfers executed.
    pub inst_block: u64,
    /// Branches executed.
    pub inst_branch: u64,
    /// SWI and coprocessor instructions executed.
    pub inst_system: u64,

    /// Exceptions taken, indexed by vector.
    pub exceptions: [u64; Exception::VECTORED],
    /// Breakpoint and watchpoint halts.
    pub breakpoints: u64,
    /// Interrupts accepted through [`Cpu::interrupt`](crate::Cpu::interrupt).
    pub interrupts_raised: u64,
    /// Interrupts dropped because one was pending or IRQs were masked.
    pub interrupts_dropped: u64,
}

impl ExecStats {
    /// Counts one executed instruction of the given family.
    pub const fn record_class(&mut self, class: InstructionClass, load: bool) {
        match class {
            InstructionClass::DataProcessing => self.inst_alu += 1,
            InstructionClass::Multiply => self.inst_multiply += 1,
            InstructionClass::Swap => self.inst_load += 1,
            InstructionClass::SingleTransfer => {
                if load {
                    self.inst_load += 1;
                } else {
                    self.inst_store += 1;
                }
            }
            InstructionClass::BlockTransfer => self.inst_block += 1,
            InstructionClass::Branch => self.inst_branch += 1,
            InstructionClass::Undefined
            | InstructionClass::SoftwareInterrupt
            | InstructionClass::CoprocessorTransfer
            | InstructionClass::CoprocessorRegister
            | InstructionClass::CoprocessorData => self.inst_system += 1,
        }
    }

    /// Counts one exception taken.
    pub fn record_exception(&mut self, exception: Exception) {
        match exception.index() {
            Some(index) => self.exceptions[index] += 1,
            None => self.breakpoints += 1,
        }
    }

    /// Returns how often an exception has been taken.
    pub fn exception_count(&self, exception: Exception) -> u64 {
        exception
            .index()
            .map_or(self.breakpoints, |index| self.exceptions[index])
    }

    /// Returns the total number of vectored exceptions taken.
    pub fn exceptions_taken(&self) -> u64 {
        self.exceptions.iter().sum()
    }
}

impl fmt::Display for ExecStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.instructions.max(1) as f64;
        let pct = |n: u64| (n as f64 / total) * 100.0;

        writeln!(f, "==========================================================")?;
        writeln!(f, "ARMv2 EXECUTION STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "sim_insts                {}", self.instructions)?;
        writeln!(
            f,
            "sim_skipped              {} ({:.2}%)",
            self.condition_skips,
            pct(self.condition_skips)
        )?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "INSTRUCTION MIX")?;
        for (name, count) in [
            ("op.alu", self.inst_alu),
            ("op.multiply", self.inst_multiply),
            ("op.load", self.inst_load),
            ("op.store", self.inst_store),
            ("op.block", self.inst_block),
            ("op.branch", self.inst_branch),
            ("op.system", self.inst_system),
        ] {
            writeln!(f, "  {name:<22} {count} ({:.2}%)", pct(count))?;
        }
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "EXCEPTIONS")?;
        for exception in Exception::ALL_VECTORED {
            writeln!(
                f,
                "  {:<22} {}",
                exception.to_string(),
                self.exception_count(exception)
            )?;
        }
        writeln!(f, "  {:<22} {}", "Breakpoint", self.breakpoints)?;
        writeln!(f, "  {:<22} {}", "irq.raised", self.interrupts_raised)?;
        write!(f, "  {:<22} {}", "irq.dropped", self.interrupts_dropped)
    }
}
