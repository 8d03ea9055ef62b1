//! Memory Management Unit (MMU).
//!
//! This module implements the page table of the 26-bit address space. It provides:
//! 1. **Lazy Allocation:** Page descriptors are created on first touch by the
//!    fault hook, the ROM loader or a device mapping.
//! 2. **RAM Budget:** Every RAM page consumes one page of the budget set at init.
//! 3. **Access Checks:** Presence, alignment and user-mode permission checks.
//! 4. **Device Binding:** All-or-nothing binding of page ranges to devices.
//!
//! Loads and stores themselves are carried out by the CPU, which owns the
//! device table the pages refer to.

/// Page descriptors and backing stores.
pub mod page;

use std::fmt;

use crate::common::constants::{
    MAX_MEMORY, NUM_PAGE_TABLES, PAGE_MASK, PAGE_SIZE, PAGE_SIZE_BITS,
};
use crate::common::{AccessType, Status, Width};

use self::page::{Backing, Page, Permissions};

/// Reason an access was refused by the MMU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessFault {
    /// No descriptor, or a descriptor with no backing.
    InvalidPage,
    /// User-mode access without the required permission.
    Permission,
    /// Word access to an address that is not word aligned.
    Misaligned,
    /// The backing device does not support the access.
    Unsupported,
}

impl From<AccessFault> for Status {
    fn from(fault: AccessFault) -> Self {
        match fault {
            AccessFault::Unsupported => Self::DeviceError,
            _ => Self::InvalidPage,
        }
    }
}

/// Page number of an address.
pub const fn page_of(addr: u32) -> usize {
    (addr >> PAGE_SIZE_BITS) as usize
}

/// Sparse page table covering the whole address bus.
pub struct PageTable {
    pages: Vec<Option<Box<Page>>>,
    memory_size: u32,
    free_ram: u32,
}

impl PageTable {
    /// Creates an empty page table with a RAM budget.
    ///
    /// # Arguments
    ///
    /// * `memsize` - RAM budget in bytes; rounded up to a whole page.
    ///
    /// # Errors
    ///
    /// Returns [`Status::ValueError`] if the rounded budget exceeds the address bus.
    pub fn new(memsize: u32) -> Result<Self, Status> {
        if memsize > MAX_MEMORY {
            return Err(Status::ValueError);
        }
        let memory_size = (memsize + PAGE_MASK) & !PAGE_MASK;
        let mut pages = Vec::with_capacity(NUM_PAGE_TABLES);
        pages.resize_with(NUM_PAGE_TABLES, || None);
        Ok(Self {
            pages,
            memory_size,
            free_ram: memory_size,
        })
    }

    /// Returns the RAM budget in bytes.
    pub const fn memory_size(&self) -> u32 {
        self.memory_size
    }

    /// Returns the unspent RAM budget in bytes.
    pub const fn free_ram(&self) -> u32 {
        self.free_ram
    }

    /// Returns the descriptor of the page containing `addr`.
    pub fn page(&self, addr: u32) -> Option<&Page> {
        self.pages.get(page_of(addr))?.as_deref()
    }

    /// Returns the mutable descriptor of the page containing `addr`.
    pub fn page_mut(&mut self, addr: u32) -> Option<&mut Page> {
        self.pages.get_mut(page_of(addr))?.as_deref_mut()
    }

    /// Returns the number of present descriptors.
    pub fn present_pages(&self) -> usize {
        self.pages.iter().filter(|page| page.is_some()).count()
    }

    /// Faults in a zero-filled RAM page at `addr`.
    ///
    /// A page that is already present is left untouched.
    ///
    /// # Errors
    ///
    /// * [`Status::ValueError`] if `addr` lies beyond the bus.
    /// * [`Status::MemoryError`] if the RAM budget is exhausted.
    pub fn fault(&mut self, addr: u32) -> Result<(), Status> {
        let slot = self.pages.get_mut(page_of(addr)).ok_or(Status::ValueError)?;
        if slot.is_some() {
            return Ok(());
        }
        if self.free_ram < PAGE_SIZE {
            return Err(Status::MemoryError);
        }
        self.free_ram -= PAGE_SIZE;
        *slot = Some(Box::new(Page::ram()));
        Ok(())
    }

    /// Drops every descriptor and zeroes the budget.
    pub fn release(&mut self) {
        self.pages.iter_mut().for_each(|slot| *slot = None);
        self.memory_size = 0;
        self.free_ram = 0;
    }

    /// Checks that an access may proceed.
    ///
    /// # Arguments
    ///
    /// * `addr` - Address on the 26-bit bus.
    /// * `access` - Fetch, read or write.
    /// * `width` - Byte or word.
    /// * `privileged` - `true` outside user mode; skips permission checks.
    ///
    /// # Returns
    ///
    /// The page descriptor on success, or the reason the access is refused.
    pub fn check(
        &self,
        addr: u32,
        access: AccessType,
        width: Width,
        privileged: bool,
    ) -> Result<&Page, AccessFault> {
        let page = self.page(addr).ok_or(AccessFault::InvalidPage)?;
        if matches!(page.backing, Backing::Unbacked) {
            return Err(AccessFault::InvalidPage);
        }
        if width == Width::Word && addr & 3 != 0 {
            return Err(AccessFault::Misaligned);
        }
        if !privileged && !page.perms.allows(access) {
            return Err(AccessFault::Permission);
        }
        Ok(page)
    }

    /// Replaces the permissions of a present page.
    ///
    /// # Errors
    ///
    /// Returns [`Status::InvalidPage`] if no page is present at `addr`.
    pub fn set_permissions(&mut self, addr: u32, perms: Permissions) -> Result<(), Status> {
        let page = self.page_mut(addr).ok_or(Status::InvalidPage)?;
        page.perms = perms;
        Ok(())
    }

    /// Binds the pages covering `[start, end)` to a device.
    ///
    /// The whole range is checked before any page is touched, so a refused
    /// request leaves the table unchanged. Missing descriptors are created
    /// with full permissions; RAM pages give their buffer back to the budget.
    ///
    /// # Errors
    ///
    /// * [`Status::InvalidArgs`] for an empty, misaligned or out-of-range request,
    ///   or one that touches page 0.
    /// * [`Status::AlreadyMapped`] if any page in the range is bound to a device.
    pub fn bind_device(&mut self, device: usize, start: u32, end: u32) -> Result<(), Status> {
        let first = page_of(start);
        let last = page_of(end);
        if end <= start
            || start & PAGE_MASK != 0
            || end & PAGE_MASK != 0
            || first == 0
            || first >= NUM_PAGE_TABLES
            || last >= NUM_PAGE_TABLES
        {
            return Err(Status::InvalidArgs);
        }

        let range = &mut self.pages[first..last];
        if range.iter().flatten().any(|page| page.device().is_some()) {
            return Err(Status::AlreadyMapped);
        }

        for slot in range {
            let page = slot.get_or_insert_with(|| Box::new(Page::unbacked()));
            if page.is_ram() {
                self.free_ram += PAGE_SIZE;
            }
            page.backing = Backing::Device(device);
        }
        Ok(())
    }
}

impl fmt::Debug for PageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageTable")
            .field("present_pages", &self.present_pages())
            .field("memory_size", &self.memory_size)
            .field("free_ram", &self.free_ram)
            .finish()
    }
}
