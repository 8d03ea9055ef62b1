//! Hardware attached to the CPU.
//!
//! This module organizes the device side of the emulated machine: the
//! capability trait devices implement, the registry that owns them, and the
//! stock devices.

/// Stock memory-mapped devices.
pub mod devices;

/// Device registry and mapping log.
pub mod registry;

/// Device trait definitions.
pub mod traits;

pub use registry::{DeviceTable, HardwareDevice, HardwareMapping, Region};
pub use traits::Device;
