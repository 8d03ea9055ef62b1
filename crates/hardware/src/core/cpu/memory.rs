//! Memory Access Helpers.
//!
//! This module provides the interface between the CPU and the page table.
//! It performs the following:
//! 1. **Checking:** Presence, alignment and user-mode permission through the MMU.
//! 2. **Dispatch:** RAM pages are indexed directly; device pages call the
//!    device's word or byte capability with the in-page offset.
//! 3. **Byte Fallback:** Byte accesses to a device without byte capabilities
//!    go through the containing word.
//! 4. **Watchpoints:** Guest data accesses flag a watchpoint hit for the run loop.
//!
//! Host accessors bypass permissions and watchpoints.

use super::Cpu;
use crate::common::constants::PAGE_MASK;
use crate::common::{AccessType, Status, Width};
use crate::core::units::mmu::AccessFault;
use crate::core::units::mmu::page::byte_shift;

/// Where a checked access lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Ram,
    Device(usize),
}

const fn merge_byte(word: u32, addr: u32, value: u32) -> u32 {
    let shift = byte_shift(addr);
    (word & !(0xff << shift)) | ((value & 0xff) << shift)
}

impl Cpu {
    fn resolve(
        &self,
        addr: u32,
        access: AccessType,
        width: Width,
        privileged: bool,
    ) -> Result<Target, AccessFault> {
        let page = self.pages.check(addr, access, width, privileged)?;
        Ok(page.device().map_or(Target::Ram, Target::Device))
    }

    fn read_at(&mut self, target: Target, addr: u32, width: Width) -> Result<u32, AccessFault> {
        match target {
            Target::Ram => {
                let word = self
                    .pages
                    .page(addr)
                    .and_then(|page| page.ram_word(addr))
                    .ok_or(AccessFault::InvalidPage)?;
                Ok(match width {
                    Width::Word => word,
                    Width::Byte => (word >> byte_shift(addr)) & 0xff,
                })
            }
            Target::Device(index) => {
                let device = self
                    .devices
                    .get_mut(index)
                    .ok_or(AccessFault::InvalidPage)?
                    .device_mut();
                let offset = addr & PAGE_MASK;
                match width {
                    Width::Word => device.read_word(offset),
                    Width::Byte => device.read_byte(offset).map(u32::from).or_else(|| {
                        device
                            .read_word(offset & !3)
                            .map(|word| (word >> byte_shift(addr)) & 0xff)
                    }),
                }
                .ok_or(AccessFault::Unsupported)
            }
        }
    }

    fn write_at(
        &mut self,
        target: Target,
        addr: u32,
        width: Width,
        value: u32,
    ) -> Result<(), AccessFault> {
        match target {
            Target::Ram => {
                let word = self
                    .pages
                    .page_mut(addr)
                    .and_then(|page| page.ram_word_mut(addr))
                    .ok_or(AccessFault::InvalidPage)?;
                *word = match width {
                    Width::Word => value,
                    Width::Byte => merge_byte(*word, addr, value),
                };
                Ok(())
            }
            Target::Device(index) => {
                let device = self
                    .devices
                    .get_mut(index)
                    .ok_or(AccessFault::InvalidPage)?
                    .device_mut();
                let offset = addr & PAGE_MASK;
                match width {
                    Width::Word => device.write_word(offset, value),
                    Width::Byte => device.write_byte(offset, value as u8).or_else(|| {
                        let aligned = offset & !3;
                        let word = device.read_word(aligned)?;
                        device.write_word(aligned, merge_byte(word, addr, value))
                    }),
                }
                .ok_or(AccessFault::Unsupported)
            }
        }
    }

    /// Fetches the instruction word at `addr` with the current mode's rights.
    pub(crate) fn fetch_instruction(&mut self, addr: u32) -> Result<u32, AccessFault> {
        let privileged = self.regs.mode().is_privileged();
        let target = self.resolve(addr, AccessType::Fetch, Width::Word, privileged)?;
        self.read_at(target, addr, Width::Word)
    }

    /// Checks a guest data access without performing it.
    pub(crate) fn check_data(
        &self,
        addr: u32,
        access: AccessType,
        width: Width,
    ) -> Result<(), AccessFault> {
        let privileged = self.regs.mode().is_privileged();
        self.resolve(addr, access, width, privileged).map(|_| ())
    }

    /// Performs a guest load with the current mode's rights.
    ///
    /// # Arguments
    ///
    /// * `addr` - Address on the 26-bit bus.
    /// * `width` - Byte loads return the selected lane zero-extended.
    pub(crate) fn load(&mut self, addr: u32, width: Width) -> Result<u32, AccessFault> {
        let privileged = self.regs.mode().is_privileged();
        let target = self.resolve(addr, AccessType::Read, width, privileged)?;
        let value = self.read_at(target, addr, width)?;
        if self.debug.watch_hit(addr, AccessType::Read) {
            self.watchpoint_hit = true;
        }
        Ok(value)
    }

    /// Performs a guest store with the current mode's rights.
    ///
    /// Byte stores write the low byte of `value` into the lane `addr` selects.
    pub(crate) fn store(&mut self, addr: u32, width: Width, value: u32) -> Result<(), AccessFault> {
        let privileged = self.regs.mode().is_privileged();
        let target = self.resolve(addr, AccessType::Write, width, privileged)?;
        self.write_at(target, addr, width, value)?;
        if self.debug.watch_hit(addr, AccessType::Write) {
            self.watchpoint_hit = true;
        }
        Ok(())
    }

    fn host_read(&mut self, addr: u32, width: Width) -> Result<u32, Status> {
        self.ensure_initialized()?;
        let target = self.resolve(addr, AccessType::Read, width, true)?;
        Ok(self.read_at(target, addr, width)?)
    }

    fn host_write(&mut self, addr: u32, width: Width, value: u32) -> Result<(), Status> {
        self.ensure_initialized()?;
        if self.pages.page(addr).is_none() {
            self.pages.fault(addr)?;
        }
        let target = self.resolve(addr, AccessType::Write, width, true)?;
        Ok(self.write_at(target, addr, width, value)?)
    }

    /// Reads a word as the host, ignoring permissions and watchpoints.
    ///
    /// # Errors
    ///
    /// * [`Status::InvalidCpuState`] after teardown.
    /// * [`Status::InvalidPage`] for an absent page or a misaligned address.
    /// * [`Status::DeviceError`] if the backing device cannot read words.
    pub fn read_word(&mut self, addr: u32) -> Result<u32, Status> {
        self.host_read(addr, Width::Word)
    }

    /// Reads a byte as the host, ignoring permissions and watchpoints.
    ///
    /// # Errors
    ///
    /// As [`Cpu::read_word`], without the alignment requirement.
    pub fn read_byte(&mut self, addr: u32) -> Result<u8, Status> {
        self.host_read(addr, Width::Byte).map(|value| value as u8)
    }

    /// Writes a word as the host, faulting the page in if it is absent.
    ///
    /// # Errors
    ///
    /// * [`Status::InvalidCpuState`] after teardown.
    /// * [`Status::ValueError`] for an address beyond the bus.
    /// * [`Status::MemoryError`] if a missing page cannot be faulted in.
    /// * [`Status::InvalidPage`] for a misaligned address or an unbacked page.
    /// * [`Status::DeviceError`] if the backing device cannot take the write.
    pub fn write_word(&mut self, addr: u32, value: u32) -> Result<(), Status> {
        self.host_write(addr, Width::Word, value)
    }

    /// Writes a byte as the host, faulting the page in if it is absent.
    ///
    /// # Errors
    ///
    /// As [`Cpu::write_word`], without the alignment requirement.
    pub fn write_byte(&mut self, addr: u32, value: u8) -> Result<(), Status> {
        self.host_write(addr, Width::Byte, u32::from(value))
    }

    /// Copies a byte slice into guest memory starting at `addr`.
    ///
    /// # Errors
    ///
    /// As [`Cpu::write_byte`]; bytes before the failing one stay written.
    pub fn write_bytes(&mut self, addr: u32, bytes: &[u8]) -> Result<(), Status> {
        for (offset, &byte) in bytes.iter().enumerate() {
            self.write_byte(addr.wrapping_add(offset as u32), byte)?;
        }
        Ok(())
    }
}
