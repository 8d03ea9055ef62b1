//! Configuration for the emulated machine.
//!
//! This module defines the configuration structures used to parameterize a [`Cpu`](crate::Cpu).
//! It provides:
//! 1. **Defaults:** Baseline RAM size and ROM layout.
//! 2. **Structures:** Hierarchical config for general, memory, and layout settings.
//! 3. **Validation:** Layout checks applied when a CPU is built from a config.
//!
//! Configuration is supplied as JSON by the host, or use `Config::default()`.

use serde::Deserialize;

use crate::common::constants::{
    BOOT_ROM_ADDR, MAX_MEMORY, MAX_SYMBOLS_SIZE, PAGE_MASK, SYMBOLS_ADDR, TAPE_ADDR,
};
use crate::common::error::Status;

/// Default configuration constants.
mod defaults {
    /// RAM budget for pages faulted in on demand (1 MiB).
    pub const MEMORY_SIZE: u32 = 1 << 20;
}

/// Root configuration for one emulated machine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing switches.
    #[serde(default)]
    pub general: GeneralConfig,
    /// RAM budget.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Where the ROM loader places each section.
    #[serde(default)]
    pub layout: LayoutConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Status::InvalidArgs`] if the document is not valid JSON or
    /// does not match the configuration schema.
    pub fn from_json(json: &str) -> Result<Self, Status> {
        serde_json::from_str(json).map_err(|e| {
            tracing::warn!(error = %e, "rejected configuration");
            Status::InvalidArgs
        })
    }
}

/// General settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Emit a `trace!` event for every executed instruction.
    #[serde(default)]
    pub trace_instructions: bool,
}

/// RAM settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// RAM budget in bytes, rounded up to a whole page.
    #[serde(default = "MemoryConfig::default_size")]
    pub size: u32,

    /// Fault in every RAM page at start-up instead of on first touch.
    ///
    /// Pages are placed from address 0 upwards, skipping page-table slots
    /// beyond the budget.
    #[serde(default)]
    pub prefault: bool,
}

impl MemoryConfig {
    const fn default_size() -> u32 {
        defaults::MEMORY_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: Self::default_size(),
            prefault: false,
        }
    }
}

/// ROM layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LayoutConfig {
    /// Load address of the boot ROM section.
    #[serde(default = "LayoutConfig::default_boot_rom_addr")]
    pub boot_rom_addr: u32,

    /// End of the boot ROM window.
    #[serde(default = "LayoutConfig::default_tape_addr")]
    pub tape_addr: u32,

    /// Load address of the symbols section.
    #[serde(default = "LayoutConfig::default_symbols_addr")]
    pub symbols_addr: u32,

    /// Size of the symbols window.
    #[serde(default = "LayoutConfig::default_max_symbols_size")]
    pub max_symbols_size: u32,
}

impl LayoutConfig {
    const fn default_boot_rom_addr() -> u32 {
        BOOT_ROM_ADDR
    }

    const fn default_tape_addr() -> u32 {
        TAPE_ADDR
    }

    const fn default_symbols_addr() -> u32 {
        SYMBOLS_ADDR
    }

    const fn default_max_symbols_size() -> u32 {
        MAX_SYMBOLS_SIZE
    }

    /// Checks that both section bases are page aligned and both windows fit on the bus.
    ///
    /// # Errors
    ///
    /// Returns [`Status::ValueError`] for any misplaced section.
    pub fn validate(&self) -> Result<(), Status> {
        let window_ok = |start: u32, end: Option<u32>| {
            start & PAGE_MASK == 0 && end.is_some_and(|end| end > start && end <= MAX_MEMORY)
        };
        let symbols_end = self.symbols_addr.checked_add(self.max_symbols_size);
        if window_ok(self.boot_rom_addr, Some(self.tape_addr))
            && window_ok(self.symbols_addr, symbols_end)
        {
            Ok(())
        } else {
            Err(Status::ValueError)
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            boot_rom_addr: Self::default_boot_rom_addr(),
            tape_addr: Self::default_tape_addr(),
            symbols_addr: Self::default_symbols_addr(),
            max_symbols_size: Self::default_max_symbols_size(),
        }
    }
}
