//! Host Status and Guest Exception definitions.
//!
//! This module defines the two error taxonomies of the emulator. It provides:
//! 1. **Host Status:** [`Status`], returned by every host-facing operation; never panics.
//! 2. **Guest Exceptions:** [`Exception`], routed through the guest vector table and
//!    never surfaced to the host as an error.
//! 3. **Run Outcomes:** [`Halt`], the non-error reasons a run loop returns early.

use std::fmt;

use thiserror::Error;

/// Failure status of a host-facing operation.
///
/// The numeric [`code`](Status::code) of each variant is stable and is what the
/// hardware manager coprocessor writes back into guest registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum Status {
    /// An argument was out of range or malformed.
    #[error("invalid arguments")]
    InvalidArgs,

    /// The CPU has been torn down or was never initialized.
    #[error("CPU is not initialized")]
    InvalidCpuState,

    /// Page-budget exhaustion or another allocation failure.
    #[error("out of emulated memory")]
    MemoryError,

    /// A size or address value was rejected.
    #[error("value out of range")]
    ValueError,

    /// A ROM image could not be read or was malformed.
    #[error("I/O error")]
    IoError,

    /// The addressed page is absent or misaligned.
    #[error("invalid page")]
    InvalidPage,

    /// Part of the requested range is already bound to a device.
    #[error("range already mapped to a device")]
    AlreadyMapped,

    /// The device index does not name a registered device.
    #[error("no such device")]
    NoSuchDevice,

    /// The device table is full.
    #[error("maximum number of hardware devices reached")]
    MaxHardwareDevices,

    /// A device does not support the requested capability.
    #[error("device error")]
    DeviceError,

    /// A coprocessor opcode was not recognized.
    #[error("unknown opcode")]
    UnknownOpcode,

    /// Internal consistency failure.
    #[error("internal consistency failure")]
    UniverseBroken,
}

impl Status {
    /// Status code reported for success.
    pub const OK: u32 = 0;

    /// Returns the stable numeric code of the status.
    pub const fn code(self) -> u32 {
        match self {
            Self::InvalidArgs => 1,
            Self::InvalidCpuState => 2,
            Self::MemoryError => 3,
            Self::ValueError => 4,
            Self::IoError => 5,
            Self::InvalidPage => 6,
            Self::AlreadyMapped => 7,
            Self::NoSuchDevice => 8,
            Self::MaxHardwareDevices => 9,
            Self::DeviceError => 10,
            Self::UnknownOpcode => 11,
            Self::UniverseBroken => 14,
        }
    }

    /// Encodes an operation result as the code written into a guest register.
    pub const fn code_of(result: Result<(), Self>) -> u32 {
        match result {
            Ok(()) => Self::OK,
            Err(status) => status.code(),
        }
    }
}

impl From<std::io::Error> for Status {
    fn from(_: std::io::Error) -> Self {
        Self::IoError
    }
}

/// Reason a run loop returned without an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Halt {
    /// The instruction budget was used up.
    Completed,

    /// A breakpoint or watchpoint fired during a bounded run.
    Breakpoint,

    /// The guest is waiting for an interrupt and none is pending.
    WaitingForInterrupt,
}

impl Halt {
    /// Returns the status code a C-style host would observe for this outcome.
    pub const fn code(self) -> u32 {
        match self {
            Self::Completed => Status::OK,
            Self::Breakpoint => 12,
            Self::WaitingForInterrupt => 13,
        }
    }
}

/// Guest exception kinds.
///
/// The first eight variants index the exception vector table in order. The
/// breakpoint kind has no vector of its own; the run loop either halts on it
/// or degrades it to a software interrupt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Exception {
    /// Reset, vector 0x00.
    Reset,

    /// Undefined instruction, vector 0x04.
    UndefinedInstruction,

    /// Software interrupt (SWI), vector 0x08.
    SoftwareInterrupt,

    /// Instruction fetch from an absent or non-executable page, vector 0x0c.
    PrefetchAbort,

    /// Load or store to an absent, protected or misaligned location, vector 0x10.
    DataAbort,

    /// Data address outside the 26-bit bus, vector 0x14.
    Address,

    /// Interrupt request, vector 0x18.
    Irq,

    /// Fast interrupt request, vector 0x1c.
    Fiq,

    /// Debugger breakpoint or watchpoint.
    Breakpoint,
}

impl Exception {
    /// Number of exceptions with an entry in the vector table.
    pub const VECTORED: usize = 8;

    /// All vectored exceptions in table order.
    pub const ALL_VECTORED: [Self; Self::VECTORED] = [
        Self::Reset,
        Self::UndefinedInstruction,
        Self::SoftwareInterrupt,
        Self::PrefetchAbort,
        Self::DataAbort,
        Self::Address,
        Self::Irq,
        Self::Fiq,
    ];

    /// Returns the vector table index, or `None` for [`Exception::Breakpoint`].
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::Reset => Some(0),
            Self::UndefinedInstruction => Some(1),
            Self::SoftwareInterrupt => Some(2),
            Self::PrefetchAbort => Some(3),
            Self::DataAbort => Some(4),
            Self::Address => Some(5),
            Self::Irq => Some(6),
            Self::Fiq => Some(7),
            Self::Breakpoint => None,
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reset => "Reset",
            Self::UndefinedInstruction => "UndefinedInstruction",
            Self::SoftwareInterrupt => "SoftwareInterrupt",
            Self::PrefetchAbort => "PrefetchAbort",
            Self::DataAbort => "DataAbort",
            Self::Address => "AddressException",
            Self::Irq => "IRQ",
            Self::Fiq => "FIQ",
            Self::Breakpoint => "Breakpoint",
        };
        f.write_str(name)
    }
}

impl std::error::Error for Exception {}
