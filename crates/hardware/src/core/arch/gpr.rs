//! Banked Register File.
//!
//! This module implements the ARMv2 register bank. It performs the following:
//! 1. **Storage:** 27 physical slots holding R0-R14 and the per-mode shadows.
//! 2. **Banking:** A 16-entry effective table mapping logical R0-R15 onto the
//!    slots visible in the current mode, rebuilt on every mode change.
//! 3. **Status:** R15 held unpacked as a [`Psr`], packed only when the guest reads it.
//!
//! Slot layout:
//!
//! | Slots  | Contents                         |
//! |--------|----------------------------------|
//! | 0-14   | R0-R14 (user bank)               |
//! | 15     | unused; R15 lives in the `Psr`   |
//! | 16-17  | R13_svc, R14_svc                 |
//! | 18-19  | R13_irq, R14_irq                 |
//! | 20-26  | R8_fiq-R14_fiq                   |

use std::fmt;

use super::mode::Mode;
use super::psr::{Flags, PC_MASK, Psr};
use crate::common::constants::{NUM_EFFECTIVE_REGISTERS, NUM_REGISTERS};

/// Logical index of the stack pointer.
pub const SP: usize = 13;
/// Logical index of the link register.
pub const LR: usize = 14;
/// Logical index of the program counter.
pub const PC: usize = 15;

/// Physical slot of R13_svc.
pub const SP_S: usize = 16;
/// Physical slot of R14_svc.
pub const LR_S: usize = 17;
/// Physical slot of R13_irq.
pub const SP_I: usize = 18;
/// Physical slot of R14_irq.
pub const LR_I: usize = 19;
/// Physical slot of R8_fiq; R9_fiq-R14_fiq follow consecutively.
pub const R8_F: usize = 20;
/// Physical slot of R13_fiq.
pub const SP_F: usize = 25;
/// Physical slot of R14_fiq.
pub const LR_F: usize = 26;

/// The ARMv2 register bank.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterBank {
    physical: [u32; NUM_REGISTERS],
    effective: [usize; NUM_EFFECTIVE_REGISTERS],
    psr: Psr,
}

impl RegisterBank {
    /// Creates the reset-state bank: supervisor mode, IRQs masked, PC 0.
    pub fn new() -> Self {
        let mut bank = Self {
            physical: [0; NUM_REGISTERS],
            effective: std::array::from_fn(|i| i),
            psr: Psr {
                pc: 0,
                flags: Flags::I,
                mode: Mode::Supervisor,
            },
        };
        bank.rebank();
        bank
    }

    /// Reads a logical register through the effective table.
    ///
    /// # Arguments
    ///
    /// * `n` - Logical register number (0-15).
    ///
    /// # Returns
    ///
    /// The register value; R15 reads as the packed status word.
    pub fn get(&self, n: usize) -> u32 {
        if n == PC {
            self.psr.pack()
        } else {
            self.physical[self.effective[n]]
        }
    }

    /// Writes a logical register through the effective table.
    ///
    /// Writing R15 replaces the whole status word and rebanks if the mode changes.
    ///
    /// # Arguments
    ///
    /// * `n` - Logical register number (0-15).
    /// * `value` - The value to store.
    pub fn set(&mut self, n: usize, value: u32) {
        if n == PC {
            self.set_psr(Psr::unpack(value));
        } else {
            self.physical[self.effective[n]] = value;
        }
    }

    /// Reads a user-bank register, ignoring the current mode.
    pub fn get_user(&self, n: usize) -> u32 {
        if n == PC {
            self.psr.pack()
        } else {
            self.physical[n]
        }
    }

    /// Writes a user-bank register, ignoring the current mode.
    ///
    /// Writing R15 behaves as [`RegisterBank::set`].
    pub fn set_user(&mut self, n: usize, value: u32) {
        if n == PC {
            self.set_psr(Psr::unpack(value));
        } else {
            self.physical[n] = value;
        }
    }

    /// Reads a physical slot.
    pub fn physical(&self, slot: usize) -> u32 {
        self.physical[slot]
    }

    /// Writes a physical slot.
    pub fn set_physical(&mut self, slot: usize, value: u32) {
        self.physical[slot] = value;
    }

    /// Returns the physical slot logical register `n` resolves to.
    pub fn effective_slot(&self, n: usize) -> usize {
        self.effective[n]
    }

    /// Returns the unpacked status register.
    pub const fn psr(&self) -> Psr {
        self.psr
    }

    /// Replaces the status register, rebanking on a mode change.
    pub fn set_psr(&mut self, psr: Psr) {
        let rebank = psr.mode != self.psr.mode;
        self.psr = Psr {
            pc: psr.pc & PC_MASK,
            ..psr
        };
        if rebank {
            self.rebank();
        }
    }

    /// Returns the PC field.
    pub const fn pc(&self) -> u32 {
        self.psr.pc
    }

    /// Replaces the PC field, keeping flags and mode.
    pub const fn set_pc(&mut self, addr: u32) {
        self.psr.pc = addr & PC_MASK;
    }

    /// Returns the current flags.
    pub const fn flags(&self) -> Flags {
        self.psr.flags
    }

    /// Mutable access to the flags.
    pub const fn flags_mut(&mut self) -> &mut Flags {
        &mut self.psr.flags
    }

    /// Returns the current mode.
    pub const fn mode(&self) -> Mode {
        self.psr.mode
    }

    /// Switches mode and rebuilds the effective table.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.psr.mode {
            self.psr.mode = mode;
            self.rebank();
        }
    }

    fn rebank(&mut self) {
        // R8-R12 return to the user bank whenever FIQ is not active.
        for (n, slot) in self.effective.iter_mut().enumerate() {
            *slot = n;
        }
        match self.psr.mode {
            Mode::User => {}
            Mode::Fiq => {
                for n in 8..=LR {
                    self.effective[n] = R8_F + (n - 8);
                }
            }
            Mode::Irq => {
                self.effective[SP] = SP_I;
                self.effective[LR] = LR_I;
            }
            Mode::Supervisor => {
                self.effective[SP] = SP_S;
                self.effective[LR] = LR_S;
            }
        }
    }
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegisterBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for n in 0..PC {
            write!(f, "r{n:<2}={:08x}", self.get(n))?;
            f.write_str(if n % 4 == 3 { "\n" } else { " " })?;
        }
        write!(f, "r15={:08x} {}", self.psr.pack(), self.psr)
    }
}
