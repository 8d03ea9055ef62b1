//! Single data swap.
//!
//! `SWP{B} Rd, Rm, [Rn]` loads from `[Rn]` into Rd and stores Rm there, as
//! one indivisible access.

use crate::common::constants::ADDRESS_OUT_OF_RANGE;
use crate::common::error::Exception;
use crate::common::{AccessType, Width};
use crate::core::arch::gpr::PC;
use crate::core::arch::psr::PC_MASK;
use crate::core::cpu::Cpu;
use crate::isa::instruction::{BIT_BYTE, InstructionBits};

impl Cpu {
    /// Executes SWP or SWPB.
    ///
    /// Both halves are checked before either happens, so a fault leaves
    /// memory and Rd untouched.
    ///
    /// # Errors
    ///
    /// * [`Exception::Address`] if `[Rn]` is beyond the bus.
    /// * [`Exception::DataAbort`] if the location cannot be both read and written.
    pub(crate) fn exec_swap(&mut self, word: u32) -> Result<(), Exception> {
        let width = if word.bit(BIT_BYTE) {
            Width::Byte
        } else {
            Width::Word
        };
        let addr = match word.rn() {
            PC => self.fetch_addr | self.regs.psr().mode_and_flags(),
            n => self.regs.get(n),
        };
        if addr & ADDRESS_OUT_OF_RANGE != 0 {
            return Err(Exception::Address);
        }
        self.check_data(addr, AccessType::Read, width)
            .and_then(|()| self.check_data(addr, AccessType::Write, width))
            .map_err(|_| Exception::DataAbort)?;

        let source = match word.rm() {
            PC => self.stored_pc(),
            n => self.regs.get(n),
        };
        let loaded = self.load(addr, width).map_err(|_| Exception::DataAbort)?;
        match word.rd() {
            PC => self.next_pc = loaded & PC_MASK,
            rd => self.regs.set(rd, loaded),
        }
        self.store(addr, width, source).map_err(|_| Exception::DataAbort)
    }
}
