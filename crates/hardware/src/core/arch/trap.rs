//! Exception Vector Table.
//!
//! This module holds the fixed table the exception controller consults on
//! every exception. It performs the following:
//! 1. **Routing:** Maps each vectored [`Exception`] to a mode and vector address.
//! 2. **Masking:** Records which interrupt masks the exception sets on entry.
//! 3. **Linking:** Names the physical slot that receives the saved R15.

use super::gpr::{LR_F, LR_I, LR_S};
use super::mode::Mode;
use super::psr::Flags;
use crate::common::error::Exception;

/// One entry of the exception vector table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExceptionVector {
    /// Mode entered when the exception is taken.
    pub mode: Mode,
    /// Address of the vector instruction.
    pub address: u32,
    /// Masks set on entry.
    pub flags: Flags,
    /// Physical register slot that receives the packed R15.
    pub link_register: usize,
}

/// The exception vector table, populated once per CPU.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExceptionTable {
    vectors: [ExceptionVector; Exception::VECTORED],
}

impl ExceptionTable {
    /// Builds the architectural table.
    ///
    /// Every exception enters supervisor mode with IRQs masked and links
    /// through R14_svc, except IRQ and FIQ which use their own modes and link
    /// registers. Reset and FIQ also mask FIQs.
    pub fn new() -> Self {
        let vectors = std::array::from_fn(|index| {
            let mut vector = ExceptionVector {
                mode: Mode::Supervisor,
                address: (index as u32) * 4,
                flags: Flags::I,
                link_register: LR_S,
            };
            match Exception::ALL_VECTORED[index] {
                Exception::Irq => {
                    vector.mode = Mode::Irq;
                    vector.link_register = LR_I;
                }
                Exception::Fiq => {
                    vector.mode = Mode::Fiq;
                    vector.link_register = LR_F;
                    vector.flags |= Flags::F;
                }
                Exception::Reset => vector.flags |= Flags::F,
                _ => {}
            }
            vector
        });
        Self { vectors }
    }

    /// Looks up the entry for an exception.
    ///
    /// # Returns
    ///
    /// `None` for [`Exception::Breakpoint`], which has no vector.
    pub fn get(&self, exception: Exception) -> Option<&ExceptionVector> {
        exception.index().map(|index| &self.vectors[index])
    }
}

impl Default for ExceptionTable {
    fn default() -> Self {
        Self::new()
    }
}
