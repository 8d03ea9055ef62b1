//! Hardware manager (coprocessor 1).
//!
//! Lets the guest discover, map and drive devices, collect interrupt data,
//! wait for interrupts and read the clock.

use super::{HW_MANAGER, check_registers};
use crate::common::constants::{CLOCK_WORD_HIGH, CLOCK_WORD_LOW};
use crate::common::error::Status;
use crate::core::arch::psr::Flags;
use crate::core::cpu::Cpu;
use crate::isa::instruction::CoprocessorFields;

/// `cr[crd]` = number of registered devices.
pub const NUM_DEVICES: u32 = 0;
/// Map device `cr[crd]` over `[cr[crn], cr[crm])`; status code to `cr[aux]`.
pub const MAP_MEMORY: u32 = 1;
/// `cr0` = public ID of device `cr[crd]`.
pub const GET_DEVICE_ID: u32 = 2;
/// `cr0` = device ID and `cr1` = code of the last interrupt.
pub const INTERRUPT_DATA: u32 = 3;
/// Wait for an interrupt; ignored while either interrupt is masked.
pub const WAIT_FOR_INTERRUPT: u32 = 4;
/// `cr0`, `cr1` = clock words.
pub const GET_TIME: u32 = 5;
/// `cr[crd]` = operation of device `cr[crn]` on `cr[crm]` and `cr[aux]`.
pub const DEVICE_OPERATION: u32 = 6;

impl Cpu {
    /// Runs a hardware manager data operation.
    ///
    /// # Errors
    ///
    /// * [`Status::InvalidArgs`] for a register number past the file.
    /// * [`Status::NoSuchDevice`] for an unknown device index.
    /// * [`Status::DeviceError`] when the device has no generic operation.
    /// * [`Status::UnknownOpcode`] for an opcode outside the table.
    ///
    /// A refused `MAP_MEMORY` is not an error here; its status goes to `cr[aux]`.
    pub(crate) fn hw_manager_operation(&mut self, f: CoprocessorFields) -> Result<(), Status> {
        check_registers(&[f.crd, f.crn, f.crm, f.aux])?;
        let cr = *self.coprocessors.file_mut(HW_MANAGER);

        match f.opcode {
            NUM_DEVICES => {
                self.coprocessors.file_mut(HW_MANAGER)[f.crd] = self.devices.len() as u32;
            }
            MAP_MEMORY => {
                let result = self.map_memory(cr[f.crd] as usize, cr[f.crn], cr[f.crm]);
                self.coprocessors.file_mut(HW_MANAGER)[f.aux] = Status::code_of(result);
            }
            GET_DEVICE_ID => {
                let id = self
                    .devices
                    .get(cr[f.crd] as usize)
                    .ok_or(Status::NoSuchDevice)?
                    .device_id();
                self.coprocessors.file_mut(HW_MANAGER)[0] = id;
            }
            INTERRUPT_DATA => {
                let (id, code) = (
                    self.coprocessors.last_interrupt_id,
                    self.coprocessors.last_interrupt_code,
                );
                let file = self.coprocessors.file_mut(HW_MANAGER);
                file[0] = id;
                file[1] = code;
            }
            WAIT_FOR_INTERRUPT => {
                let flags = self.regs.flags();
                if !flags.contains(Flags::I) && !flags.contains(Flags::F) {
                    self.waiting = true;
                }
            }
            GET_TIME => {
                let file = self.coprocessors.file_mut(HW_MANAGER);
                file[0] = CLOCK_WORD_LOW;
                file[1] = CLOCK_WORD_HIGH;
            }
            DEVICE_OPERATION => {
                let entry = self
                    .devices
                    .get_mut(cr[f.crn] as usize)
                    .ok_or(Status::NoSuchDevice)?;
                let result = entry
                    .device_mut()
                    .operation(cr[f.crm], cr[f.aux])
                    .ok_or(Status::DeviceError)?;
                self.coprocessors.file_mut(HW_MANAGER)[f.crd] = result;
            }
            _ => return Err(Status::UnknownOpcode),
        }
        Ok(())
    }
}
