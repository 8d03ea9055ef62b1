//! Data processing instructions.
//!
//! `<op>{cond}{S} Rd, Rn, <op2>` where `op2` is a rotated immediate or a
//! shifted register. Writing R15 with S set is how the 26-bit architecture
//! restores flags and mode on exception return.

use crate::core::arch::gpr::PC;
use crate::core::arch::psr::{Flags, PC_PROTECTED_BITS, Psr};
use crate::core::cpu::Cpu;
use crate::core::units::alu::shifts::rotated_immediate;
use crate::core::units::alu::{Alu, AluOp};
use crate::isa::instruction::{BIT_IMMEDIATE, InstructionBits, OFFSET12_MASK};

impl Cpu {
    /// Executes a data processing instruction.
    pub(crate) fn exec_data_processing(&mut self, word: u32) {
        let op = AluOp::from_bits(word.alu_opcode());
        let carry = self.regs.flags().contains(Flags::C);
        let (op2, shifter_carry) = if word.bit(BIT_IMMEDIATE) {
            (rotated_immediate(word & OFFSET12_MASK), carry)
        } else {
            self.shifted_register(word)
        };
        let rn = self.operand_register(word.rn());
        let result = Alu::execute(op, rn, op2, shifter_carry, carry);

        let rd = word.rd();
        if rd == PC {
            if op.is_test() {
                self.write_psr_bits(result.value, word.set_flags());
            } else {
                self.write_r15(result.value, word.set_flags());
            }
            return;
        }

        if word.set_flags() {
            let flags = self.regs.flags_mut();
            flags.set(Flags::N, result.value & 0x8000_0000 != 0);
            flags.set(Flags::Z, result.value == 0);
            flags.set(Flags::C, result.carry);
            if let Some(overflow) = result.overflow {
                flags.set(Flags::V, overflow);
            }
        }
        if !op.is_test() {
            self.regs.set(rd, result.value);
        }
    }

    /// Writes the flags and mode of `value` without moving the PC (`TEQP` and friends).
    ///
    /// User mode may only change N, Z, C and V.
    fn write_psr_bits(&mut self, value: u32, set_flags: bool) {
        if !set_flags {
            return;
        }
        let current = self.regs.psr();
        let word = if self.regs.mode().is_privileged() {
            value
        } else {
            (current.pack() & PC_PROTECTED_BITS) | (value & !PC_PROTECTED_BITS)
        };
        let psr = Psr {
            pc: current.pc,
            ..Psr::unpack(word)
        };
        self.regs.set_psr(psr);
        if psr.mode != current.mode {
            tracing::debug!(from = %current.mode, to = %psr.mode, "mode change");
        }
    }

    /// Writes a computed or loaded word to R15.
    ///
    /// With S set the result is a whole status word, of which user mode may
    /// only change the PC field and N, Z, C and V. Without S only the PC
    /// field changes. Either way execution continues at the new PC.
    pub(crate) fn write_r15(&mut self, value: u32, set_flags: bool) {
        let current = self.regs.psr();
        let psr = if set_flags {
            if self.regs.mode().is_privileged() {
                Psr::unpack(value)
            } else {
                Psr::unpack((current.pack() & PC_PROTECTED_BITS) | (value & !PC_PROTECTED_BITS))
            }
        } else {
            Psr {
                pc: Psr::unpack(value).pc,
                ..current
            }
        };
        let previous = current.mode;
        self.regs.set_psr(psr);
        self.next_pc = psr.pc;
        if psr.mode != previous {
            tracing::debug!(from = %previous, to = %psr.mode, "mode change");
        }
    }
}
