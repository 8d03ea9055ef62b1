//! Device trait for memory-mapped hardware.
//!
//! This module defines the `Device` trait implemented by every component a
//! guest can reach through mapped pages or the hardware manager. It provides:
//! 1. **Identification:** The public device ID the guest uses to find the device.
//! 2. **Access:** Optional word and byte read/write at page-relative offsets.
//! 3. **Operations:** An optional generic two-argument operation.
//!
//! Every capability is optional. A method that returns `None` means the device
//! does not support it; the MMU then turns the access into a data abort or
//! falls back to another capability.
//!
//! Implementors must be `Send` so a CPU and its devices can move to a worker thread.

/// A hardware device attachable to the emulated machine.
pub trait Device: Send {
    /// Returns the public ID the guest reads through the hardware manager.
    fn device_id(&self) -> u32;

    /// Returns a short name for logs.
    fn name(&self) -> &'static str {
        "device"
    }

    /// Returns the guest address the device uses to flag interrupts, if any.
    fn interrupt_flag_addr(&self) -> u32 {
        0
    }

    /// Reads a word at an offset within the mapped page.
    fn read_word(&mut self, _offset: u32) -> Option<u32> {
        None
    }

    /// Writes a word at an offset within the mapped page.
    fn write_word(&mut self, _offset: u32, _value: u32) -> Option<()> {
        None
    }

    /// Reads a byte at an offset within the mapped page.
    fn read_byte(&mut self, _offset: u32) -> Option<u8> {
        None
    }

    /// Writes a byte at an offset within the mapped page.
    fn write_byte(&mut self, _offset: u32, _value: u8) -> Option<()> {
        None
    }

    /// Runs the device's generic operation on two guest-supplied arguments.
    fn operation(&mut self, _arg0: u32, _arg1: u32) -> Option<u32> {
        None
    }
}
