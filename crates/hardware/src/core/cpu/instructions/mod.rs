//! Instruction Handlers.
//!
//! One submodule per handler family. Each handler reads its operands through
//! the effective register table, touches memory through the CPU's checked
//! load/store path, and reports guest faults as an [`Exception`].
//!
//! R15 as an operand is read two ways: as a base or first operand it yields
//! the PC field alone, through the shifter it yields the packed word.

/// Block data transfer (LDM, STM).
pub mod block_transfer;

/// Branch and branch with link.
pub mod branch;

/// Data processing (AND through MVN).
pub mod data_processing;

/// Multiply and multiply-accumulate.
pub mod multiply;

/// Single data transfer (LDR, STR).
pub mod single_transfer;

/// Single data swap (SWP).
pub mod swap;

use super::Cpu;
use crate::common::constants::SWI_BREAKPOINT;
use crate::common::error::Exception;
use crate::core::arch::Flags;
use crate::core::arch::gpr::PC;
use crate::core::units::alu::shifts::{ShiftAmount, ShiftKind, barrel_shift};
use crate::isa::decode::InstructionClass;
use crate::isa::instruction::{BIT_SHIFT_BY_REGISTER, InstructionBits, OFFSET24_MASK};

impl Cpu {
    /// Executes a classified instruction whose condition passed.
    ///
    /// # Errors
    ///
    /// The guest exception the instruction raised. [`Exception::Breakpoint`]
    /// is resolved by the run loop rather than a vector.
    pub(crate) fn execute(&mut self, word: u32, class: InstructionClass) -> Result<(), Exception> {
        match class {
            InstructionClass::DataProcessing => {
                self.exec_data_processing(word);
                Ok(())
            }
            InstructionClass::Multiply => {
                self.exec_multiply(word);
                Ok(())
            }
            InstructionClass::Swap => self.exec_swap(word),
            InstructionClass::SingleTransfer => self.exec_single_transfer(word),
            InstructionClass::Undefined => Err(Exception::UndefinedInstruction),
            InstructionClass::BlockTransfer => self.exec_block_transfer(word),
            InstructionClass::Branch => {
                self.exec_branch(word);
                Ok(())
            }
            InstructionClass::SoftwareInterrupt => {
                if word & OFFSET24_MASK == SWI_BREAKPOINT {
                    Err(Exception::Breakpoint)
                } else {
                    Err(Exception::SoftwareInterrupt)
                }
            }
            InstructionClass::CoprocessorTransfer => Ok(()),
            InstructionClass::CoprocessorRegister => {
                self.exec_coprocessor_register(word);
                Ok(())
            }
            InstructionClass::CoprocessorData => {
                self.exec_coprocessor_data(word);
                Ok(())
            }
        }
    }

    /// Reads a base or first-operand register; R15 yields the PC field only.
    pub(crate) fn operand_register(&self, n: usize) -> u32 {
        if n == PC {
            self.regs.pc()
        } else {
            self.regs.get(n)
        }
    }

    /// Evaluates a shifted register operand from the low 12 bits of `word`.
    ///
    /// # Arguments
    ///
    /// * `word` - The instruction; bit 4 selects a register-specified amount.
    ///
    /// # Returns
    ///
    /// `(value, shifter_carry)`.
    pub(crate) fn shifted_register(&self, word: u32) -> (u32, bool) {
        let carry = self.regs.flags().contains(Flags::C);
        let value = self.regs.get(word.rm());
        let amount = if word.bit(BIT_SHIFT_BY_REGISTER) {
            let rs = word.rs();
            let amount = self.regs.get(rs);
            ShiftAmount::Register(if rs == PC {
                amount.wrapping_add(8) & 0xfc
            } else {
                amount & 0xff
            })
        } else {
            ShiftAmount::Immediate(word.shift_immediate())
        };
        barrel_shift(ShiftKind::from_bits(word.shift_type()), value, amount, carry)
    }
}
