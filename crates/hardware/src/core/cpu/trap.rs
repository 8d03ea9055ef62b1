//! Exception and Interrupt Handling.
//!
//! This module implements exception entry and interrupt injection. It performs
//! the following:
//! 1. **Exception Entry:** Saves the packed R15 into the vector's link register,
//!    switches mode, sets the vector's masks and redirects the PC.
//! 2. **Interrupt Sampling:** Takes FIQ then IRQ at the start of an instruction slot.
//! 3. **Injection:** Accepts interrupts from the host and latches their data for
//!    the hardware manager.

use super::Cpu;
use crate::common::constants::{PIN_FIQ, PIN_IRQ};
use crate::common::error::{Exception, Status};
use crate::core::arch::Mode;
use crate::core::arch::psr::{Flags, PC_MASK, Psr};

impl Cpu {
    /// Enters the vector of an exception raised by the instruction in flight.
    ///
    /// The link register receives the packed R15 with the PC field pointing
    /// 8 bytes past the faulting instruction. The PC moves to the vector once
    /// the instruction slot ends.
    ///
    /// # Arguments
    ///
    /// * `exception` - The exception to take; [`Exception::Breakpoint`] has no
    ///   vector and is ignored.
    pub(crate) fn raise(&mut self, exception: Exception) {
        self.raise_linked(exception, self.fetch_addr.wrapping_add(8));
    }

    /// Takes `exception` with `link_pc` as the PC field of the saved R15.
    ///
    /// Used when the instruction in flight completed and already chose its
    /// successor, which the handler must return to.
    pub(crate) fn raise_linked(&mut self, exception: Exception, link_pc: u32) {
        let Some(vector) = self.vectors.get(exception).copied() else {
            return;
        };
        let link = Psr {
            pc: link_pc & PC_MASK,
            ..self.regs.psr()
        }
        .pack();
        self.enter(vector.mode, vector.link_register, link, vector.flags);
        self.next_pc = vector.address;
        self.stats.record_exception(exception);
        tracing::debug!(
            %exception,
            pc = format_args!("{:#010x}", self.fetch_addr),
            mode = %vector.mode,
            "exception taken"
        );
    }

    fn enter(&mut self, mode: Mode, link_register: usize, link: u32, flags: Flags) {
        let previous = self.regs.mode();
        self.regs.set_mode(mode);
        self.regs.set_physical(link_register, link);
        self.regs.flags_mut().insert(flags);
        if previous != mode {
            tracing::debug!(from = %previous, to = %mode, "mode change");
        }
    }

    /// Samples the interrupt pins at the start of an instruction slot.
    ///
    /// FIQ wins over IRQ. The link register receives the packed R15 minus 4
    /// so that `SUBS PC, LR, #4` resumes at the interrupted instruction. The
    /// IRQ pin is lowered when taken; the FIQ pin is level and stays raised.
    ///
    /// # Returns
    ///
    /// `true` if an interrupt was taken and the slot is used up.
    pub(crate) fn take_interrupts(&mut self) -> bool {
        let flags = self.regs.flags();
        let exception = if !flags.contains(Flags::F) && self.pins & PIN_FIQ != 0 {
            Exception::Fiq
        } else if !flags.contains(Flags::I) && self.pins & PIN_IRQ != 0 {
            self.pins &= !PIN_IRQ;
            Exception::Irq
        } else {
            return false;
        };

        let Some(vector) = self.vectors.get(exception).copied() else {
            return false;
        };
        let link = self.regs.psr().pack().wrapping_sub(4);
        self.enter(vector.mode, vector.link_register, link, vector.flags);
        self.regs.set_pc(vector.address);
        self.waiting = false;
        self.stats.record_exception(exception);
        tracing::debug!(%exception, "interrupt taken");
        true
    }

    /// Raises an interrupt on behalf of a device.
    ///
    /// The interrupt is dropped if one is already pending or IRQs are masked;
    /// otherwise the device ID and code are latched for the hardware
    /// manager's `INTERRUPT_DATA` and the IRQ pin is raised.
    ///
    /// # Arguments
    ///
    /// * `device_id` - Public ID of the interrupting device.
    /// * `code` - Device-defined interrupt code.
    ///
    /// # Errors
    ///
    /// Returns [`Status::InvalidCpuState`] after teardown. A dropped interrupt
    /// is not an error.
    pub fn interrupt(&mut self, device_id: u32, code: u32) -> Result<(), Status> {
        self.ensure_initialized()?;
        if self.pins & PIN_IRQ != 0 || self.regs.flags().contains(Flags::I) {
            self.stats.interrupts_dropped += 1;
            tracing::debug!(device_id, code, "interrupt dropped");
            return Ok(());
        }
        self.coprocessors.last_interrupt_id = device_id;
        self.coprocessors.last_interrupt_code = code;
        self.pins |= PIN_IRQ;
        self.stats.interrupts_raised += 1;
        Ok(())
    }

    /// Raises the level-triggered FIQ pin.
    ///
    /// # Errors
    ///
    /// Returns [`Status::InvalidCpuState`] after teardown.
    pub fn raise_fiq(&mut self) -> Result<(), Status> {
        self.ensure_initialized()?;
        self.pins |= PIN_FIQ;
        Ok(())
    }

    /// Lowers the FIQ pin.
    pub const fn lower_fiq(&mut self) {
        self.pins &= !PIN_FIQ;
    }
}
