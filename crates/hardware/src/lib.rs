//! ARMv2 emulator core.
//!
//! This crate implements an instruction-stepped emulator of the 26-bit ARMv2
//! processor with the following:
//! 1. **Core:** Banked register file, packed R15 status word, exception vectors and the run loop.
//! 2. **Memory:** A sparse page table over the 26-bit bus with demand-faulted RAM pages
//!    and device-backed pages.
//! 3. **ISA:** Condition evaluation, classification and execution of every ARMv2 instruction class.
//! 4. **SoC:** The device registry, the virtual coprocessors and a keyboard device.
//! 5. **Debugging:** Breakpoint and watchpoint bitmaps, statistics and instruction tracing.
//!
//! ```no_run
//! use armv2_core::{Cpu, Halt, RunLimit};
//!
//! let mut cpu = Cpu::new(1 << 20)?;
//! cpu.load_rom("boot.rom")?;
//! match cpu.run(RunLimit::Instructions(10_000))? {
//!     Halt::Breakpoint => println!("stopped at {:#x}", cpu.pc()),
//!     halt => println!("{halt:?}"),
//! }
//! # Ok::<(), armv2_core::Status>(())
//! ```

/// Common types and constants (layout, access types, status codes, exceptions).
pub mod common;
/// Emulator configuration (memory budget, ROM layout, tracing).
pub mod config;
/// CPU core (architectural state, execution units, run loop).
pub mod core;
/// Instruction set (field extraction, conditions, classification).
pub mod isa;
/// ROM image loading.
pub mod sim;
/// Device registry, device trait and bundled devices.
pub mod soc;
/// Execution statistics collection and reporting.
pub mod stats;

/// Host status codes, run outcomes and guest exceptions.
pub use crate::common::{Exception, Halt, Status};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Processor mode and status flags.
pub use crate::core::arch::{Flags, Mode, Psr};
/// Main CPU type and its run budget.
pub use crate::core::cpu::{Cpu, RunLimit};
/// Breakpoint index watch kinds.
pub use crate::core::units::debug::WatchKind;
/// Device capability trait and the bundled keyboard.
pub use crate::soc::{Device, devices::Keyboard};
/// Execution statistics.
pub use crate::stats::ExecStats;
