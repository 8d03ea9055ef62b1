//! Branch instructions.

use crate::core::arch::gpr::LR;
use crate::core::arch::psr::PC_MASK;
use crate::core::cpu::Cpu;
use crate::isa::instruction::{BIT_LINK, InstructionBits};

impl Cpu {
    /// Executes B or BL.
    ///
    /// The target is the instruction address plus 8 plus the sign-extended
    /// word offset, wrapped onto the bus. BL saves the return address in the
    /// current mode's R14 before the branch; the saved word carries no flags.
    pub(crate) fn exec_branch(&mut self, word: u32) {
        if word.bit(BIT_LINK) {
            self.regs.set(LR, self.fetch_addr.wrapping_add(4) & PC_MASK);
        }
        self.next_pc = self
            .fetch_addr
            .wrapping_add(8)
            .wrapping_add(word.branch_offset())
            & PC_MASK;
    }
}
