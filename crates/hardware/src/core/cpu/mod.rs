//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which owns the whole
//! emulated machine. It coordinates the following:
//! 1. **State Management:** The banked register file, R15 and the interrupt pins.
//! 2. **Memory:** The sparse page table and its RAM budget.
//! 3. **System Integration:** The device registry and the three virtual coprocessors.
//! 4. **Debugging:** Breakpoint and watchpoint bitmaps and execution statistics.
//!
//! Every host-facing operation returns `Result<_, Status>` and fails with
//! [`Status::InvalidCpuState`] once [`Cpu::cleanup`] has run.

/// Virtual coprocessors reachable from MRC, MCR and CDP.
pub mod coprocessor;

/// Step and run loop.
pub mod execution;

/// Instruction handlers.
pub mod instructions;

/// Guest and host memory access.
pub mod memory;

/// Exception entry and interrupt injection.
pub mod trap;

use std::fmt;
use std::path::Path;

use crate::common::constants::{NUM_EFFECTIVE_REGISTERS, NUM_PAGE_TABLES, PAGE_SIZE, PAGE_SIZE_BITS};
use crate::common::error::Status;
use crate::config::{Config, LayoutConfig};
use crate::core::arch::{ExceptionTable, Flags, Mode, Psr, RegisterBank};
use crate::core::units::debug::{DebugIndex, WatchKind};
use crate::core::units::mmu::PageTable;
use crate::core::units::mmu::page::Permissions;
use crate::sim::loader;
use crate::soc::registry::{DeviceTable, HardwareMapping, Region};
use crate::soc::traits::Device;
use crate::stats::ExecStats;

use self::coprocessor::Coprocessors;

pub use self::execution::RunLimit;

/// One emulated ARMv2 machine.
///
/// Owns the register bank, page table, exception table, device registry,
/// debug bitmaps and coprocessor registers. Nothing is global: two `Cpu`
/// values are two independent machines.
pub struct Cpu {
    regs: RegisterBank,
    pages: PageTable,
    vectors: ExceptionTable,
    devices: DeviceTable,
    debug: DebugIndex,
    coprocessors: Coprocessors,
    layout: LayoutConfig,
    boot_rom: Option<Region>,

    /// Raised interrupt pins, [`PIN_FIQ`](crate::common::constants::PIN_FIQ)
    /// and [`PIN_IRQ`](crate::common::constants::PIN_IRQ).
    pins: u32,
    initialized: bool,
    waiting: bool,
    watchpoint_hit: bool,

    /// Address of the instruction in flight.
    fetch_addr: u32,
    /// PC the run loop moves to once the instruction in flight retires.
    next_pc: u32,
    /// Breakpoint address to step over on the next run.
    resume_breakpoint: Option<u32>,

    trace: bool,
    stats: ExecStats,
}

impl Cpu {
    /// Creates a machine with a RAM budget and the default configuration.
    ///
    /// # Arguments
    ///
    /// * `memsize` - RAM budget in bytes; rounded up to a whole page.
    ///
    /// # Errors
    ///
    /// Returns [`Status::ValueError`] if the budget exceeds the address bus.
    pub fn new(memsize: u32) -> Result<Self, Status> {
        let mut config = Config::default();
        config.memory.size = memsize;
        Self::with_config(&config)
    }

    /// Creates a machine from a configuration.
    ///
    /// The machine starts in supervisor mode with IRQs masked and PC 0.
    ///
    /// # Errors
    ///
    /// * [`Status::ValueError`] for an oversized RAM budget or a misplaced ROM section.
    /// * [`Status::MemoryError`] if prefaulting fails.
    pub fn with_config(config: &Config) -> Result<Self, Status> {
        config.layout.validate()?;
        let mut cpu = Self {
            regs: RegisterBank::new(),
            pages: PageTable::new(config.memory.size)?,
            vectors: ExceptionTable::new(),
            devices: DeviceTable::new(),
            debug: DebugIndex::new(),
            coprocessors: Coprocessors::new(),
            layout: config.layout,
            boot_rom: None,
            pins: 0,
            initialized: true,
            waiting: false,
            watchpoint_hit: false,
            fetch_addr: 0,
            next_pc: 0,
            resume_breakpoint: None,
            trace: config.general.trace_instructions || cfg!(feature = "always-trace"),
            stats: ExecStats::default(),
        };

        if config.memory.prefault {
            let pages = (cpu.pages.memory_size() >> PAGE_SIZE_BITS) as usize;
            for page in 0..pages.min(NUM_PAGE_TABLES) {
                cpu.pages.fault((page as u32) * PAGE_SIZE)?;
            }
        }

        tracing::info!(
            memory_size = cpu.pages.memory_size(),
            prefault = config.memory.prefault,
            "cpu initialized"
        );
        Ok(cpu)
    }

    /// Tears the machine down, releasing every page and device.
    ///
    /// Every later host operation fails with [`Status::InvalidCpuState`].
    /// Calling it twice is harmless.
    pub fn cleanup(&mut self) {
        if !self.initialized {
            return;
        }
        self.pages.release();
        self.devices = DeviceTable::new();
        self.debug = DebugIndex::new();
        self.boot_rom = None;
        self.pins = 0;
        self.waiting = false;
        self.initialized = false;
        tracing::info!("cpu torn down");
    }

    /// Returns `true` until [`Cpu::cleanup`] runs.
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) const fn ensure_initialized(&self) -> Result<(), Status> {
        if self.initialized {
            Ok(())
        } else {
            Err(Status::InvalidCpuState)
        }
    }

    /// Registers a hardware device.
    ///
    /// # Returns
    ///
    /// The device index used by [`Cpu::map_memory`] and the hardware manager.
    ///
    /// # Errors
    ///
    /// * [`Status::InvalidCpuState`] after teardown.
    /// * [`Status::MaxHardwareDevices`] when the registry is full.
    pub fn add_hardware(&mut self, device: Box<dyn Device>) -> Result<usize, Status> {
        self.ensure_initialized()?;
        let name = device.name();
        let index = self.devices.add(device).inspect_err(|_| {
            tracing::warn!(device = name, "device registry full");
        })?;
        tracing::debug!(device = name, index, "device registered");
        Ok(index)
    }

    /// Binds a registered device to the page range `[start, end)`.
    ///
    /// The range is checked as a whole; a refused request changes nothing.
    ///
    /// # Errors
    ///
    /// * [`Status::InvalidCpuState`] after teardown.
    /// * [`Status::NoSuchDevice`] for an unknown device index.
    /// * [`Status::InvalidArgs`] for an empty, misaligned, out-of-range or page 0 range.
    /// * [`Status::AlreadyMapped`] if any page in the range is bound to a device.
    pub fn map_memory(&mut self, device: usize, start: u32, end: u32) -> Result<(), Status> {
        self.ensure_initialized()?;
        if self.devices.get(device).is_none() {
            return Err(Status::NoSuchDevice);
        }
        self.pages
            .bind_device(device, start, end)
            .inspect_err(|status| {
                tracing::warn!(device, start, end, %status, "mapping refused");
            })?;
        self.devices.record_mapping(device, start, end);
        tracing::debug!(device, start, end, "device mapped");
        Ok(())
    }

    /// Loads a ROM image file into the boot ROM and symbols windows.
    ///
    /// # Errors
    ///
    /// * [`Status::InvalidCpuState`] after teardown.
    /// * [`Status::IoError`] if the file is unreadable, too short or malformed.
    /// * [`Status::InvalidPage`] if a section cannot be placed.
    pub fn load_rom(&mut self, path: impl AsRef<Path>) -> Result<(), Status> {
        self.ensure_initialized()?;
        let image = loader::load_binary(path)?;
        self.load_rom_bytes(&image)
    }

    /// Loads an in-memory ROM image.
    ///
    /// # Errors
    ///
    /// As [`Cpu::load_rom`], without the file read.
    pub fn load_rom_bytes(&mut self, image: &[u8]) -> Result<(), Status> {
        self.ensure_initialized()?;
        let layout = self.layout;
        self.boot_rom = Some(loader::load_rom_image(self, &layout, image)?);
        Ok(())
    }

    /// Faults in a zero-filled RAM page at `addr`; a present page is left alone.
    ///
    /// # Errors
    ///
    /// * [`Status::InvalidCpuState`] after teardown.
    /// * [`Status::ValueError`] for an address beyond the bus.
    /// * [`Status::MemoryError`] once the RAM budget is spent.
    pub fn fault(&mut self, addr: u32) -> Result<(), Status> {
        self.ensure_initialized()?;
        self.pages.fault(addr)
    }

    /// Replaces the user-mode permissions of a present page.
    ///
    /// # Errors
    ///
    /// * [`Status::InvalidCpuState`] after teardown.
    /// * [`Status::InvalidPage`] if no page is present at `addr`.
    pub fn set_page_permissions(&mut self, addr: u32, perms: Permissions) -> Result<(), Status> {
        self.ensure_initialized()?;
        self.pages.set_permissions(addr, perms)
    }

    /// Sets a breakpoint on the word containing `addr`.
    ///
    /// # Errors
    ///
    /// * [`Status::InvalidCpuState`] after teardown.
    /// * [`Status::ValueError`] for an address beyond the bus.
    pub fn set_breakpoint(&mut self, addr: u32) -> Result<(), Status> {
        self.ensure_initialized()?;
        self.debug.set_breakpoint(addr)
    }

    /// Clears the breakpoint on the word containing `addr`.
    ///
    /// # Errors
    ///
    /// * [`Status::InvalidCpuState`] after teardown.
    /// * [`Status::ValueError`] for an address beyond the bus.
    pub fn unset_breakpoint(&mut self, addr: u32) -> Result<(), Status> {
        self.ensure_initialized()?;
        self.debug.unset_breakpoint(addr)
    }

    /// Returns `true` if a breakpoint covers `addr`.
    pub fn has_breakpoint(&self, addr: u32) -> bool {
        self.debug.has_breakpoint(addr)
    }

    /// Sets a watchpoint on the word containing `addr`.
    ///
    /// # Errors
    ///
    /// * [`Status::InvalidCpuState`] after teardown.
    /// * [`Status::ValueError`] for an address beyond the bus.
    pub fn set_watchpoint(&mut self, kind: WatchKind, addr: u32) -> Result<(), Status> {
        self.ensure_initialized()?;
        self.debug.set_watchpoint(kind, addr)
    }

    /// Clears a watchpoint on the word containing `addr`.
    ///
    /// # Errors
    ///
    /// * [`Status::InvalidCpuState`] after teardown.
    /// * [`Status::ValueError`] for an address beyond the bus.
    pub fn unset_watchpoint(&mut self, kind: WatchKind, addr: u32) -> Result<(), Status> {
        self.ensure_initialized()?;
        self.debug.unset_watchpoint(kind, addr)
    }

    /// Returns `true` if a watchpoint of the given kind covers `addr`.
    pub fn has_watchpoint(&self, kind: WatchKind, addr: u32) -> bool {
        self.debug.has_watchpoint(kind, addr)
    }

    /// Clears every breakpoint.
    pub fn reset_breakpoints(&mut self) {
        self.debug.reset_breakpoints();
        self.resume_breakpoint = None;
    }

    /// Clears every watchpoint.
    pub fn reset_watchpoints(&mut self) {
        self.debug.reset_watchpoints();
    }

    /// Reads logical register `n` (0-15) in the current mode; R15 reads packed.
    ///
    /// # Errors
    ///
    /// Returns [`Status::InvalidArgs`] if `n` is not a logical register.
    pub fn register(&self, n: usize) -> Result<u32, Status> {
        Ok(self.regs.get(logical(n)?))
    }

    /// Writes logical register `n` (0-15) in the current mode.
    ///
    /// Writing R15 replaces PC, flags and mode and rebanks.
    ///
    /// # Errors
    ///
    /// Returns [`Status::InvalidArgs`] if `n` is not a logical register.
    pub fn set_register(&mut self, n: usize, value: u32) -> Result<(), Status> {
        self.regs.set(logical(n)?, value);
        Ok(())
    }

    /// Reads user-bank register `n` (0-15), whatever the current mode.
    ///
    /// # Errors
    ///
    /// Returns [`Status::InvalidArgs`] if `n` is not a logical register.
    pub fn user_register(&self, n: usize) -> Result<u32, Status> {
        Ok(self.regs.get_user(logical(n)?))
    }

    /// Writes user-bank register `n` (0-15), whatever the current mode.
    ///
    /// # Errors
    ///
    /// Returns [`Status::InvalidArgs`] if `n` is not a logical register.
    pub fn set_user_register(&mut self, n: usize, value: u32) -> Result<(), Status> {
        self.regs.set_user(logical(n)?, value);
        Ok(())
    }

    /// Returns the register bank.
    pub const fn registers(&self) -> &RegisterBank {
        &self.regs
    }

    /// Returns the unpacked R15.
    pub const fn psr(&self) -> Psr {
        self.regs.psr()
    }

    /// Returns the packed R15 as the guest observes it.
    pub const fn packed_r15(&self) -> u32 {
        self.regs.psr().pack()
    }

    /// Returns the PC field: the next instruction to fetch between runs.
    pub const fn pc(&self) -> u32 {
        self.regs.pc()
    }

    /// Moves the PC, preserving flags and mode.
    pub const fn set_pc(&mut self, addr: u32) {
        self.regs.set_pc(addr);
    }

    /// Returns the current processor mode.
    pub const fn mode(&self) -> Mode {
        self.regs.mode()
    }

    /// Switches mode and rebanks.
    pub fn set_mode(&mut self, mode: Mode) {
        self.regs.set_mode(mode);
    }

    /// Returns the status flags.
    pub const fn flags(&self) -> Flags {
        self.regs.flags()
    }

    /// Replaces the status flags.
    pub const fn set_flags(&mut self, flags: Flags) {
        *self.regs.flags_mut() = flags;
    }

    /// Returns the raised interrupt pins.
    pub const fn pins(&self) -> u32 {
        self.pins
    }

    /// Returns `true` while the guest waits for an interrupt.
    pub const fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Returns every device mapping, newest first.
    pub fn mappings(&self) -> &[HardwareMapping] {
        self.devices.mappings()
    }

    /// Returns the number of registered devices.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Returns the device registry.
    pub const fn devices(&self) -> &DeviceTable {
        &self.devices
    }

    /// Returns the page table.
    pub const fn page_table(&self) -> &PageTable {
        &self.pages
    }

    /// Returns the unspent RAM budget in bytes.
    pub const fn free_ram(&self) -> u32 {
        self.pages.free_ram()
    }

    /// Returns the region the boot ROM section was loaded into.
    pub const fn boot_rom(&self) -> Option<Region> {
        self.boot_rom
    }

    /// Returns the ROM layout in use.
    pub const fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the register file of a virtual coprocessor.
    ///
    /// # Returns
    ///
    /// `None` for a coprocessor number other than 1, 2 or 3.
    pub fn coprocessor_registers(&self, cp_num: u32) -> Option<&[u32]> {
        self.coprocessors.registers(cp_num)
    }

    /// Returns the execution statistics.
    pub const fn stats(&self) -> &ExecStats {
        &self.stats
    }

    /// Enables or disables per-instruction `trace!` events.
    pub const fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }
}

impl fmt::Debug for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", self.regs)?;
        write!(
            f,
            "pins={:x} waiting={} devices={} free_ram={:#x}",
            self.pins,
            self.waiting,
            self.devices.len(),
            self.pages.free_ram()
        )?;
        if !self.initialized {
            f.write_str(" [torn down]")?;
        }
        Ok(())
    }
}

/// Checks a host-supplied register number against the logical register file.
const fn logical(n: usize) -> Result<usize, Status> {
    if n < NUM_EFFECTIVE_REGISTERS {
        Ok(n)
    } else {
        Err(Status::InvalidArgs)
    }
}
