//! Interrupt controller (coprocessor 3).

use super::{INTERRUPT_CONTROLLER, check_registers};
use crate::common::error::Status;
use crate::core::cpu::Cpu;
use crate::isa::instruction::CoprocessorFields;

/// `cr[crd]` = raised pins.
pub const PENDING: u32 = 0;
/// Lowers the pins set in `cr[crn]`.
pub const ACKNOWLEDGE: u32 = 1;

impl Cpu {
    pub(crate) fn interrupt_controller_operation(
        &mut self,
        f: CoprocessorFields,
    ) -> Result<(), Status> {
        check_registers(&[f.crd, f.crn])?;
        match f.opcode {
            PENDING => self.coprocessors.file_mut(INTERRUPT_CONTROLLER)[f.crd] = self.pins,
            ACKNOWLEDGE => {
                let mask = self.coprocessors.file_mut(INTERRUPT_CONTROLLER)[f.crn];
                self.pins &= !mask;
            }
            _ => return Err(Status::UnknownOpcode),
        }
        Ok(())
    }
}
