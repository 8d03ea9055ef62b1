//! Hardware device registry.
//!
//! This module owns the devices attached to a CPU. It performs:
//! 1. **Registration:** Arena storage of up to [`HW_DEVICES_MAX`] devices, addressed by index.
//! 2. **Bookkeeping:** The region each device was last mapped to.
//! 3. **Introspection:** The list of successful mappings, newest first.
//!
//! Dispatch never goes through this list: pages carry the device index directly.

use std::fmt;

use crate::common::Status;
use crate::common::constants::HW_DEVICES_MAX;
use crate::soc::traits::Device;

/// A half-open address range `[start, end)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    /// First address.
    pub start: u32,
    /// One past the last address.
    pub end: u32,
}

impl Region {
    /// Returns `true` if `addr` lies inside the region.
    pub const fn contains(&self, addr: u32) -> bool {
        addr >= self.start && addr < self.end
    }
}

/// A registered device and its bookkeeping.
pub struct HardwareDevice {
    device: Box<dyn Device>,
    device_id: u32,
    interrupt_flag_addr: u32,
    mapped: Option<Region>,
}

impl HardwareDevice {
    /// Returns the public device ID captured at registration.
    pub const fn device_id(&self) -> u32 {
        self.device_id
    }

    /// Returns the interrupt flag address captured at registration.
    pub const fn interrupt_flag_addr(&self) -> u32 {
        self.interrupt_flag_addr
    }

    /// Returns the region this device was last mapped to.
    pub const fn mapped(&self) -> Option<Region> {
        self.mapped
    }

    /// Returns the device's capabilities.
    pub fn device(&self) -> &dyn Device {
        &*self.device
    }

    /// Returns the device's capabilities mutably.
    pub fn device_mut(&mut self) -> &mut dyn Device {
        &mut *self.device
    }
}

impl fmt::Debug for HardwareDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HardwareDevice")
            .field("name", &self.device.name())
            .field("device_id", &format_args!("{:#010x}", self.device_id))
            .field("mapped", &self.mapped)
            .finish()
    }
}

/// Record of one successful mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HardwareMapping {
    /// Index of the mapped device.
    pub device: usize,
    /// First mapped address.
    pub start: u32,
    /// One past the last mapped address.
    pub end: u32,
    /// Reserved; always 0.
    pub flags: u32,
}

/// The device arena and mapping log.
#[derive(Debug, Default)]
pub struct DeviceTable {
    devices: Vec<HardwareDevice>,
    mappings: Vec<HardwareMapping>,
}

impl DeviceTable {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a device.
    ///
    /// # Returns
    ///
    /// The index the device is addressed by from now on.
    ///
    /// # Errors
    ///
    /// Returns [`Status::MaxHardwareDevices`] once [`HW_DEVICES_MAX`] devices exist.
    pub fn add(&mut self, device: Box<dyn Device>) -> Result<usize, Status> {
        if self.devices.len() >= HW_DEVICES_MAX {
            return Err(Status::MaxHardwareDevices);
        }
        let index = self.devices.len();
        self.devices.push(HardwareDevice {
            device_id: device.device_id(),
            interrupt_flag_addr: device.interrupt_flag_addr(),
            device,
            mapped: None,
        });
        Ok(index)
    }

    /// Returns the number of registered devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns `true` if no device is registered.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Returns a registered device by index.
    pub fn get(&self, index: usize) -> Option<&HardwareDevice> {
        self.devices.get(index)
    }

    /// Returns a registered device mutably by index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut HardwareDevice> {
        self.devices.get_mut(index)
    }

    /// Records a successful mapping at the head of the log.
    pub(crate) fn record_mapping(&mut self, device: usize, start: u32, end: u32) {
        if let Some(entry) = self.devices.get_mut(device) {
            entry.mapped = Some(Region { start, end });
        }
        self.mappings.insert(
            0,
            HardwareMapping {
                device,
                start,
                end,
                flags: 0,
            },
        );
    }

    /// Returns every mapping, newest first.
    pub fn mappings(&self) -> &[HardwareMapping] {
        &self.mappings
    }
}
