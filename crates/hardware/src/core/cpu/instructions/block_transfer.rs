//! Block data transfer instructions.
//!
//! `LDM` and `STM` over a 16-bit register list. The lowest-numbered register
//! always uses the lowest address. The P and U bits select one of four
//! addressing modes:
//!
//! | P | U | Mode | First address     | Write-back       |
//! |---|---|------|-------------------|------------------|
//! | 0 | 1 | IA   | `Rn`              | `Rn + 4n`        |
//! | 1 | 1 | IB   | `Rn + 4`          | `Rn + 4n`        |
//! | 0 | 0 | DA   | `Rn - 4n + 4`     | `Rn - 4n`        |
//! | 1 | 0 | DB   | `Rn - 4n`         | `Rn - 4n`        |
//!
//! The S bit, or user mode itself, routes the transfer through the user bank.

use crate::common::Width;
use crate::common::constants::{ADDRESS_BUS_MASK, ADDRESS_OUT_OF_RANGE};
use crate::common::error::Exception;
use crate::core::arch::Mode;
use crate::core::arch::gpr::PC;
use crate::core::cpu::Cpu;
use crate::isa::instruction::{
    BIT_BYTE, BIT_LOAD, BIT_PRE_INDEX, BIT_UP, BIT_WRITE_BACK, InstructionBits,
    REGISTER_LIST_MASK,
};

impl Cpu {
    /// Executes LDM or STM.
    ///
    /// Write-back is applied before any register moves. An out-of-range base
    /// does not stop the transfer: each address wraps onto the bus and the
    /// instruction still completes. A data abort on one register suppresses
    /// every later store but not later loads.
    ///
    /// # Errors
    ///
    /// [`Exception::DataAbort`] if any register faulted, otherwise
    /// [`Exception::Address`] if the base left the bus.
    pub(crate) fn exec_block_transfer(&mut self, word: u32) -> Result<(), Exception> {
        let list = word & REGISTER_LIST_MASK;
        let span = list.count_ones() * 4;
        let rn = word.rn();
        let up = word.bit(BIT_UP);
        let user_bank = self.regs.mode() == Mode::User || word.bit(BIT_BYTE);

        let (base, write_back) = if rn == PC {
            (self.fetch_addr | self.regs.psr().mode_and_flags(), false)
        } else {
            (self.regs.get(rn), word.bit(BIT_WRITE_BACK))
        };
        let (lowest, final_base) = if up {
            (base, base.wrapping_add(span))
        } else {
            let lowest = base.wrapping_sub(span);
            (lowest, lowest)
        };
        let mut addr = if word.bit(BIT_PRE_INDEX) == up {
            lowest.wrapping_add(4)
        } else {
            lowest
        };

        let mut outcome = if addr & ADDRESS_OUT_OF_RANGE != 0 {
            Some(Exception::Address)
        } else {
            None
        };

        let old_base = if user_bank {
            self.regs.get_user(rn)
        } else {
            self.regs.get(rn)
        };
        if write_back {
            if user_bank {
                self.regs.set_user(rn, final_base);
            } else {
                self.regs.set(rn, final_base);
            }
        }

        let load = word.bit(BIT_LOAD);
        let mut first = true;
        for reg in (0..16).filter(|reg| list & (1 << reg) != 0) {
            let target = addr & ADDRESS_BUS_MASK;
            addr = addr.wrapping_add(4);
            let stored_first = std::mem::take(&mut first);

            let faulted = if load {
                self.block_load(reg, target, user_bank).is_err()
            } else if outcome == Some(Exception::DataAbort) {
                continue;
            } else {
                let value = if reg == PC {
                    self.stored_pc()
                } else if write_back && stored_first && reg == rn {
                    old_base
                } else if user_bank {
                    self.regs.get_user(reg)
                } else {
                    self.regs.get(reg)
                };
                self.store(target, Width::Word, value).is_err()
            };
            if faulted {
                tracing::trace!(reg, addr = format_args!("{target:#010x}"), "block transfer fault");
                outcome = Some(Exception::DataAbort);
            }
        }

        outcome.map_or(Ok(()), Err)
    }

    /// Loads one register of an LDM.
    ///
    /// R15 is loaded as a whole status word; user mode keeps its mode and
    /// interrupt masks.
    fn block_load(&mut self, reg: usize, addr: u32, user_bank: bool) -> Result<(), Exception> {
        let value = self
            .load(addr, Width::Word)
            .map_err(|_| Exception::DataAbort)?;
        if reg == PC {
            self.write_r15(value, true);
        } else if user_bank {
            self.regs.set_user(reg, value);
        } else {
            self.regs.set(reg, value);
        }
        Ok(())
    }
}
