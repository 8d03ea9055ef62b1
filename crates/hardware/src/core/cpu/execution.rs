//! Main Execution Loop.
//!
//! This module implements the instruction-stepped execution cycle of the CPU.
//! It performs the following:
//! 1. **Interrupt Sampling:** FIQ and IRQ are checked once at the start of each slot.
//! 2. **Fetch and Dispatch:** Breakpoint check, fetch, condition test, classify, execute.
//! 3. **Exception Routing:** Guest exceptions enter their vector; breakpoints
//!    either halt a bounded run or degrade to SWI.
//! 4. **Observability:** Per-instruction `trace!` events when tracing is enabled.
//!
//! During an instruction the PC field of R15 reads 8 bytes past the
//! instruction; handlers that branch write the address to continue from into
//! `next_pc`, which the slot commits at its end.

use super::Cpu;
use crate::common::error::{Exception, Halt, Status};
use crate::core::arch::psr::PC_MASK;
use crate::isa::condition::Condition;
use crate::isa::decode::{InstructionClass, classify};
use crate::isa::instruction::{BIT_LOAD, InstructionBits};

/// How many instructions a run may execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunLimit {
    /// Stop after this many instruction slots.
    Instructions(u32),
    /// Run until the guest waits for an interrupt.
    Unbounded,
}

impl From<u32> for RunLimit {
    fn from(count: u32) -> Self {
        Self::Instructions(count)
    }
}

impl From<i32> for RunLimit {
    /// Negative counts mean "run forever".
    fn from(count: i32) -> Self {
        u32::try_from(count).map_or(Self::Unbounded, Self::Instructions)
    }
}

impl From<Option<u32>> for RunLimit {
    fn from(count: Option<u32>) -> Self {
        count.map_or(Self::Unbounded, Self::Instructions)
    }
}

/// What stopped the instruction in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BreakSource {
    /// The breakpoint bitmap matched the fetch address.
    Bitmap,
    /// The instruction was the breakpoint SWI.
    Swi,
    /// A data access tripped a watchpoint.
    Watchpoint,
}

impl Cpu {
    /// Runs the guest.
    ///
    /// # Arguments
    ///
    /// * `limit` - A [`RunLimit`], an instruction count, or an `i32` where
    ///   negative values mean unbounded.
    ///
    /// # Returns
    ///
    /// * [`Halt::Completed`] once the budget is used up.
    /// * [`Halt::Breakpoint`] when a breakpoint or watchpoint fires during a
    ///   bounded run.
    /// * [`Halt::WaitingForInterrupt`] when the guest waits and no pin is raised.
    ///
    /// # Errors
    ///
    /// Returns [`Status::InvalidCpuState`] after teardown.
    pub fn run(&mut self, limit: impl Into<RunLimit>) -> Result<Halt, Status> {
        self.ensure_initialized()?;
        let limit = limit.into();
        let bounded = limit != RunLimit::Unbounded;
        let mut budget = match limit {
            RunLimit::Instructions(count) => Some(count),
            RunLimit::Unbounded => None,
        };

        loop {
            if budget == Some(0) {
                return Ok(Halt::Completed);
            }
            if self.waiting && self.pins == 0 {
                return Ok(Halt::WaitingForInterrupt);
            }
            if let Some(count) = budget.as_mut() {
                *count -= 1;
            }
            if let Some(halt) = self.step(bounded) {
                return Ok(halt);
            }
        }
    }

    /// Executes one instruction slot.
    ///
    /// # Returns
    ///
    /// `Some(Halt::Breakpoint)` if a breakpoint halted a bounded run.
    fn step(&mut self, bounded: bool) -> Option<Halt> {
        self.stats.instructions += 1;
        let fetch = self.regs.pc();
        self.fetch_addr = fetch;
        self.regs.set_pc(fetch.wrapping_add(8));
        self.next_pc = fetch.wrapping_add(4) & PC_MASK;

        if self.take_interrupts() {
            return None;
        }

        let resume = self.resume_breakpoint.take();
        let outcome = if resume != Some(fetch) && self.debug.has_breakpoint(fetch) {
            Err(BreakSource::Bitmap)
        } else {
            self.fetch_and_execute(fetch)
        };

        let watch = std::mem::take(&mut self.watchpoint_hit);
        let halt = match outcome {
            Ok(()) if watch => self.breakpoint(BreakSource::Watchpoint, bounded),
            Ok(()) => None,
            Err(source) => self.breakpoint(source, bounded),
        };
        self.regs.set_pc(self.next_pc);
        halt
    }

    /// Fetches, tests and executes the instruction at `fetch`.
    ///
    /// Guest exceptions other than breakpoints are taken here.
    fn fetch_and_execute(&mut self, fetch: u32) -> Result<(), BreakSource> {
        let word = match self.fetch_instruction(fetch) {
            Ok(word) => word,
            Err(fault) => {
                tracing::debug!(?fault, pc = format_args!("{fetch:#010x}"), "prefetch abort");
                self.raise(Exception::PrefetchAbort);
                return Ok(());
            }
        };

        let class = classify(word);
        if self.trace {
            tracing::trace!(
                pc = format_args!("{fetch:#010x}"),
                word = format_args!("{word:08x}"),
                class = class.name(),
                psr = %self.regs.psr(),
                "exec"
            );
        }

        if !Condition::from_bits(word.cond()).passes(self.regs.flags()) {
            self.stats.condition_skips += 1;
            return Ok(());
        }

        let load = class == InstructionClass::SingleTransfer && word.bit(BIT_LOAD);
        self.stats.record_class(class, load);
        match self.execute(word, class) {
            Ok(()) => Ok(()),
            Err(Exception::Breakpoint) => Err(BreakSource::Swi),
            Err(exception) => {
                // A faulting instruction does not also report a watchpoint.
                self.watchpoint_hit = false;
                self.raise(exception);
                Ok(())
            }
        }
    }

    /// Resolves a breakpoint.
    ///
    /// Bounded runs halt. Bitmap and SWI breakpoints leave the PC on the
    /// breakpointed instruction; a bitmap breakpoint is stepped over on the
    /// next run. Watchpoints halt after the instruction completed. Unbounded
    /// runs take a software interrupt instead; after a watchpoint its link
    /// returns to wherever the completed instruction was heading.
    fn breakpoint(&mut self, source: BreakSource, bounded: bool) -> Option<Halt> {
        if !bounded {
            let link_pc = match source {
                BreakSource::Watchpoint => self.next_pc.wrapping_add(4),
                BreakSource::Bitmap | BreakSource::Swi => self.fetch_addr.wrapping_add(8),
            };
            self.raise_linked(Exception::SoftwareInterrupt, link_pc);
            return None;
        }
        match source {
            BreakSource::Bitmap => {
                self.next_pc = self.fetch_addr;
                self.resume_breakpoint = Some(self.fetch_addr);
            }
            BreakSource::Swi => self.next_pc = self.fetch_addr,
            BreakSource::Watchpoint => {}
        }
        self.stats.record_exception(Exception::Breakpoint);
        tracing::debug!(
            ?source,
            pc = format_args!("{:#010x}", self.fetch_addr),
            "breakpoint"
        );
        Some(Halt::Breakpoint)
    }
}
