//! MMU coprocessor (coprocessor 2).

use super::{MMU, check_registers};
use crate::common::error::Status;
use crate::core::cpu::Cpu;
use crate::core::units::mmu::page::Permissions;
use crate::isa::instruction::CoprocessorFields;

/// `cr[crd]` = permission bits of the page holding `cr[crn]`, 0 if absent.
pub const PAGE_FLAGS: u32 = 0;
/// Permissions of the page holding `cr[crn]` := `cr[crm] & 7`. Privileged only.
pub const SET_PAGE_FLAGS: u32 = 1;
/// Fault in the page holding `cr[crn]`; status code to `cr[crd]`.
pub const FAULT_PAGE: u32 = 2;
/// `cr[crd]` = unspent RAM budget in bytes.
pub const FREE_RAM: u32 = 3;

impl Cpu {
    pub(crate) fn mmu_operation(&mut self, f: CoprocessorFields) -> Result<(), Status> {
        check_registers(&[f.crd, f.crn, f.crm])?;
        let cr = *self.coprocessors.file_mut(MMU);

        match f.opcode {
            PAGE_FLAGS => {
                let bits = self.pages.page(cr[f.crn]).map_or(0, |page| page.perms.bits());
                self.coprocessors.file_mut(MMU)[f.crd] = bits;
            }
            SET_PAGE_FLAGS => {
                if !self.regs.mode().is_privileged() {
                    return Err(Status::InvalidArgs);
                }
                self.pages
                    .set_permissions(cr[f.crn], Permissions::from_bits(cr[f.crm]))?;
            }
            FAULT_PAGE => {
                let result = self.pages.fault(cr[f.crn]);
                self.coprocessors.file_mut(MMU)[f.crd] = Status::code_of(result);
            }
            FREE_RAM => {
                self.coprocessors.file_mut(MMU)[f.crd] = self.pages.free_ram();
            }
            _ => return Err(Status::UnknownOpcode),
        }
        Ok(())
    }
}
