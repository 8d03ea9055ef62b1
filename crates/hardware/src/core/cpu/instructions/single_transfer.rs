//! Single data transfer instructions.
//!
//! `LDR{B}` and `STR{B}` with a 12-bit immediate or an immediately-shifted
//! register offset, pre- or post-indexed, with optional write-back.

use crate::common::constants::ADDRESS_OUT_OF_RANGE;
use crate::common::error::Exception;
use crate::common::Width;
use crate::core::arch::gpr::PC;
use crate::core::arch::psr::{Flags, PC_MASK};
use crate::core::cpu::Cpu;
use crate::core::units::alu::shifts::{ShiftAmount, ShiftKind, barrel_shift};
use crate::isa::instruction::{
    BIT_BYTE, BIT_IMMEDIATE, BIT_LOAD, BIT_PRE_INDEX, BIT_UP, BIT_WRITE_BACK, InstructionBits,
    OFFSET12_MASK,
};

impl Cpu {
    /// Executes LDR, LDRB, STR or STRB.
    ///
    /// # Errors
    ///
    /// * [`Exception::Address`] if the effective address leaves the 26-bit bus.
    /// * [`Exception::DataAbort`] for an absent, protected or misaligned location.
    ///
    /// Neither the destination nor the base is updated when the access faults.
    pub(crate) fn exec_single_transfer(&mut self, word: u32) -> Result<(), Exception> {
        let offset = self.transfer_offset(word);
        let up = word.bit(BIT_UP);
        let pre_index = word.bit(BIT_PRE_INDEX);
        let width = if word.bit(BIT_BYTE) {
            Width::Byte
        } else {
            Width::Word
        };

        let rn = word.rn();
        let base = self.operand_register(rn);
        let indexed = if up {
            base.wrapping_add(offset)
        } else {
            base.wrapping_sub(offset)
        };
        let addr = if pre_index { indexed } else { base };
        if addr & ADDRESS_OUT_OF_RANGE != 0 {
            return Err(Exception::Address);
        }

        let rd = word.rd();
        if word.bit(BIT_LOAD) {
            let value = self.load(addr, width).map_err(|fault| {
                tracing::trace!(?fault, addr = format_args!("{addr:#010x}"), "load fault");
                Exception::DataAbort
            })?;
            if rd == PC {
                self.next_pc = value & PC_MASK;
            } else {
                self.regs.set(rd, value);
            }
        } else {
            let value = if rd == PC {
                self.stored_pc()
            } else {
                self.regs.get(rd)
            };
            self.store(addr, width, value).map_err(|fault| {
                tracing::trace!(?fault, addr = format_args!("{addr:#010x}"), "store fault");
                Exception::DataAbort
            })?;
        }

        if !pre_index || word.bit(BIT_WRITE_BACK) {
            if rn == PC {
                self.next_pc = indexed & PC_MASK;
            } else {
                self.regs.set(rn, indexed);
            }
        }
        Ok(())
    }

    /// Decodes the offset of a single transfer.
    ///
    /// With bit 25 clear the offset is an unsigned 12-bit immediate. With it
    /// set the offset is Rm shifted by an immediate amount; the shifter carry
    /// is discarded.
    fn transfer_offset(&self, word: u32) -> u32 {
        if !word.bit(BIT_IMMEDIATE) {
            return word & OFFSET12_MASK;
        }
        let carry = self.regs.flags().contains(Flags::C);
        let (value, _) = barrel_shift(
            ShiftKind::from_bits(word.shift_type()),
            self.regs.get(word.rm()),
            ShiftAmount::Immediate(word.shift_immediate()),
            carry,
        );
        value
    }

    /// The word a store of R15 writes: the address of the following
    /// instruction with the current flags and mode.
    pub(crate) fn stored_pc(&self) -> u32 {
        (self.fetch_addr.wrapping_add(4) & PC_MASK) | self.regs.psr().mode_and_flags()
    }
}
