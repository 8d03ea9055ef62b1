//! Virtual Coprocessors.
//!
//! Three fixed coprocessors give the guest access to machine services. Each
//! owns eight 32-bit registers and answers two encodings:
//! 1. **Register transfer (MRC/MCR):** Moves a value between an ARM register
//!    and a coprocessor register.
//! 2. **Data operation (CDP):** Runs a service selected by the opcode field.
//!
//! | Number | Coprocessor            |
//! |--------|------------------------|
//! | 1      | hardware manager       |
//! | 2      | MMU                    |
//! | 3      | interrupt controller   |
//!
//! Any other number is a silent no-op. Service failures never fault the
//! guest; they are logged and, where the service defines one, reported
//! through a status register.

/// Hardware manager services.
pub mod hw_manager;

/// Interrupt controller services.
pub mod interrupt_controller;

/// MMU services.
pub mod mmu;

use super::Cpu;
use crate::common::constants::COPROCESSOR_NUM_REGS;
use crate::common::error::Status;
use crate::core::arch::gpr::PC;
use crate::core::arch::psr::Flags;
use crate::isa::instruction::CoprocessorFields;

/// Coprocessor number of the hardware manager.
pub const HW_MANAGER: u32 = 1;
/// Coprocessor number of the MMU.
pub const MMU: u32 = 2;
/// Coprocessor number of the interrupt controller.
pub const INTERRUPT_CONTROLLER: u32 = 3;

/// Register transfer operation: move between an ARM and a coprocessor register.
pub const MOV_REGISTER: u32 = 0;

/// Register files of the three coprocessors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Coprocessors {
    files: [[u32; COPROCESSOR_NUM_REGS]; 3],
    /// Device ID of the last accepted interrupt.
    pub last_interrupt_id: u32,
    /// Code of the last accepted interrupt.
    pub last_interrupt_code: u32,
}

const fn slot(cp_num: u32) -> Option<usize> {
    match cp_num {
        HW_MANAGER => Some(0),
        MMU => Some(1),
        INTERRUPT_CONTROLLER => Some(2),
        _ => None,
    }
}

impl Coprocessors {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn registers(&self, cp_num: u32) -> Option<&[u32]> {
        slot(cp_num).map(|index| &self.files[index][..])
    }

    /// Register file of a coprocessor known to exist.
    pub(crate) fn file_mut(&mut self, cp_num: u32) -> &mut [u32; COPROCESSOR_NUM_REGS] {
        let index = slot(cp_num).unwrap_or(0);
        &mut self.files[index]
    }
}

/// Checks that every named register exists.
pub(crate) fn check_registers(registers: &[usize]) -> Result<(), Status> {
    if registers.iter().all(|&n| n < COPROCESSOR_NUM_REGS) {
        Ok(())
    } else {
        Err(Status::InvalidArgs)
    }
}

impl Cpu {
    /// Executes MRC/MCR.
    pub(crate) fn exec_coprocessor_register(&mut self, word: u32) {
        let fields = CoprocessorFields::decode(word);
        if slot(fields.cp_num).is_none() {
            return;
        }
        if let Err(status) = self.register_transfer(fields) {
            tracing::debug!(cp = fields.cp_num, opcode = fields.opcode, %status, "register transfer failed");
        }
    }

    /// Executes CDP.
    pub(crate) fn exec_coprocessor_data(&mut self, word: u32) {
        let fields = CoprocessorFields::decode(word);
        let result = match fields.cp_num {
            HW_MANAGER => self.hw_manager_operation(fields),
            MMU => self.mmu_operation(fields),
            INTERRUPT_CONTROLLER => self.interrupt_controller_operation(fields),
            _ => return,
        };
        if let Err(status) = result {
            tracing::debug!(cp = fields.cp_num, opcode = fields.opcode, %status, "coprocessor operation failed");
        }
    }

    /// Register transfer shared by all three coprocessors.
    ///
    /// Bit 0 of the opcode selects the direction (set: coprocessor to ARM);
    /// the remaining bits select the operation.
    fn register_transfer(&mut self, fields: CoprocessorFields) -> Result<(), Status> {
        let load = fields.opcode & 1 != 0;
        let operation = fields.opcode >> 1;
        check_registers(&[fields.crn])?;
        if operation != MOV_REGISTER {
            return Err(Status::UnknownOpcode);
        }

        let rd = fields.crd;
        if load {
            let value = self.coprocessors.file_mut(fields.cp_num)[fields.crn];
            if rd == PC {
                let writable = if self.regs.mode().is_privileged() {
                    Flags::ALL
                } else {
                    Flags::NZCV
                };
                let flags = self.regs.flags_mut();
                let kept = *flags & !writable;
                *flags = kept | (Flags::from_bits(value) & writable);
            } else {
                self.regs.set(rd, value);
            }
        } else {
            let value = self.regs.get(rd);
            self.coprocessors.file_mut(fields.cp_num)[fields.crn] = value;
        }
        Ok(())
    }
}
