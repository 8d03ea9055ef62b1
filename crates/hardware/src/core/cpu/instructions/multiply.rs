//! Multiply instructions.
//!
//! `MUL Rd, Rm, Rs` and `MLA Rd, Rm, Rs, Rn`. The multiply format swaps the
//! usual field roles: Rd sits in bits 16-19 and the accumulator in bits 12-15.

use crate::core::arch::gpr::PC;
use crate::core::arch::psr::{Flags, PC_MASK};
use crate::core::cpu::Cpu;
use crate::isa::instruction::{BIT_ACCUMULATE, InstructionBits};

impl Cpu {
    /// Executes MUL or MLA.
    ///
    /// A destination of R15 discards the result, which then reads as 0 for
    /// the flags. S updates N and Z; C and V are left alone.
    pub(crate) fn exec_multiply(&mut self, word: u32) {
        let rd = word.rn();
        let accumulate = if word.bit(BIT_ACCUMULATE) {
            self.regs.get(word.rd())
        } else {
            0
        };
        let rs = match word.rs() {
            PC => self.regs.pc(),
            n => self.regs.get(n),
        };
        let rm = match word.rm() {
            PC => self.regs.pc().wrapping_add(4) & PC_MASK,
            n => self.regs.get(n),
        };

        let result = if rd == PC {
            0
        } else {
            let product = rm.wrapping_mul(rs).wrapping_add(accumulate);
            self.regs.set(rd, product);
            product
        };

        if word.set_flags() {
            let flags = self.regs.flags_mut();
            flags.set(Flags::N, result & 0x8000_0000 != 0);
            flags.set(Flags::Z, result == 0);
        }
    }
}
