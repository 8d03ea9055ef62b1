//! Global Machine Constants.
//!
//! This module defines the guest-visible layout of the emulated machine. It includes:
//! 1. **Address Space:** Bus width, page geometry, and the physical memory ceiling.
//! 2. **Registry Limits:** Device table capacity and coprocessor register file size.
//! 3. **ROM Layout:** Default section bases and windows for the boot ROM and symbols.
//! 4. **Magic Values:** The breakpoint SWI immediate and the pseudo-clock words.
//!
//! Host code may retarget the ROM layout through [`crate::config::LayoutConfig`];
//! everything else is part of the architectural contract.

/// Width of the address bus in bits (64 MiB of addressable space).
pub const ADDRESS_BITS: u32 = 26;

/// Largest amount of memory the address bus can reach, in bytes.
pub const MAX_MEMORY: u32 = 1 << ADDRESS_BITS;

/// Mask applied to addresses that wrap on the 26-bit bus.
pub const ADDRESS_BUS_MASK: u32 = MAX_MEMORY - 1;

/// Bits set in an address that lies beyond the bus.
pub const ADDRESS_OUT_OF_RANGE: u32 = !ADDRESS_BUS_MASK;

/// Number of bits to shift to convert between bytes and pages.
pub const PAGE_SIZE_BITS: u32 = 12;

/// Page size in bytes (4 KiB).
pub const PAGE_SIZE: u32 = 1 << PAGE_SIZE_BITS;

/// Mask for extracting the in-page offset from an address.
pub const PAGE_MASK: u32 = PAGE_SIZE - 1;

/// Number of 32-bit words backing one RAM page.
pub const WORDS_PER_PAGE: usize = (PAGE_SIZE >> 2) as usize;

/// Number of page descriptors needed to cover the address bus.
pub const NUM_PAGE_TABLES: usize = (MAX_MEMORY >> PAGE_SIZE_BITS) as usize;

/// Maximum number of hardware devices that may be registered.
pub const HW_DEVICES_MAX: usize = 64;

/// Number of registers in each virtual coprocessor.
pub const COPROCESSOR_NUM_REGS: usize = 8;

/// Physical register slots: R0-R15 plus the SUP, IRQ and FIQ shadows.
pub const NUM_REGISTERS: usize = 27;

/// Logical registers visible to an instruction.
pub const NUM_EFFECTIVE_REGISTERS: usize = 16;

/// Smallest ROM image accepted by the loader.
///
/// The vectors occupy 0x00-0x20; one instruction and the section length word
/// bring the minimum to 0x28 bytes.
pub const MIN_ROM_SIZE: usize = 0x28;

/// Default load address of the boot ROM section.
pub const BOOT_ROM_ADDR: u32 = 0;

/// Default end of the boot ROM window; tapes are streamed in from here.
pub const TAPE_ADDR: u32 = 0x000f_0000;

/// Default load address of the symbols section.
pub const SYMBOLS_ADDR: u32 = 0x0003_0000;

/// Size of the symbols window.
pub const MAX_SYMBOLS_SIZE: u32 = 0x10000;

/// SWI immediate reserved for software breakpoints.
pub const SWI_BREAKPOINT: u32 = 0x00be_eeef;

/// Pin raised by a fast interrupt request.
pub const PIN_FIQ: u32 = 0x0000_0001;

/// Pin raised by an interrupt request.
pub const PIN_IRQ: u32 = 0x0000_0002;

/// Low word returned by the hardware manager's clock.
pub const CLOCK_WORD_LOW: u32 = 0x203b_2836 ^ 0x4141_4141;

/// High word returned by the hardware manager's clock.
pub const CLOCK_WORD_HIGH: u32 = 0xb8b0_a7b6 ^ 0xc1c2_c3c4;
