//! Breakpoint and watchpoint index.
//!
//! Three independent sparse bitmaps keyed by word-aligned address: one for
//! breakpoints and one each for read and write watchpoints. The run loop
//! consults the breakpoint map before decoding each instruction; the
//! load/store handlers consult the watchpoint maps on every data access.

/// Demand-allocated bitmap.
pub mod bitmap;

use crate::common::constants::MAX_MEMORY;
use crate::common::{AccessType, Status};

use self::bitmap::SparseBitmap;

/// Which accesses a watchpoint fires on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WatchKind {
    /// Stores only.
    Write,
    /// Loads only.
    Read,
    /// Both loads and stores.
    Access,
}

/// The debugger's view of the address space.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DebugIndex {
    breakpoints: SparseBitmap,
    read_watch: SparseBitmap,
    write_watch: SparseBitmap,
}

fn word_index(addr: u32) -> Result<u32, Status> {
    if addr >= MAX_MEMORY {
        return Err(Status::ValueError);
    }
    Ok(addr >> 2)
}

impl DebugIndex {
    /// Creates an index with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a breakpoint on the word containing `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`Status::ValueError`] for an address beyond the bus.
    pub fn set_breakpoint(&mut self, addr: u32) -> Result<(), Status> {
        self.breakpoints.set(word_index(addr)?);
        Ok(())
    }

    /// Clears the breakpoint on the word containing `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`Status::ValueError`] for an address beyond the bus.
    pub fn unset_breakpoint(&mut self, addr: u32) -> Result<(), Status> {
        self.breakpoints.clear(word_index(addr)?);
        Ok(())
    }

    /// Returns `true` if a breakpoint is set on the word containing `addr`.
    pub fn has_breakpoint(&self, addr: u32) -> bool {
        word_index(addr).is_ok_and(|index| self.breakpoints.get(index))
    }

    /// Sets a watchpoint on the word containing `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`Status::ValueError`] for an address beyond the bus.
    pub fn set_watchpoint(&mut self, kind: WatchKind, addr: u32) -> Result<(), Status> {
        let index = word_index(addr)?;
        if matches!(kind, WatchKind::Read | WatchKind::Access) {
            self.read_watch.set(index);
        }
        if matches!(kind, WatchKind::Write | WatchKind::Access) {
            self.write_watch.set(index);
        }
        Ok(())
    }

    /// Clears a watchpoint on the word containing `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`Status::ValueError`] for an address beyond the bus.
    pub fn unset_watchpoint(&mut self, kind: WatchKind, addr: u32) -> Result<(), Status> {
        let index = word_index(addr)?;
        if matches!(kind, WatchKind::Read | WatchKind::Access) {
            self.read_watch.clear(index);
        }
        if matches!(kind, WatchKind::Write | WatchKind::Access) {
            self.write_watch.clear(index);
        }
        Ok(())
    }

    /// Returns `true` if a watchpoint of the given kind covers `addr`.
    ///
    /// [`WatchKind::Access`] matches either map.
    pub fn has_watchpoint(&self, kind: WatchKind, addr: u32) -> bool {
        let Ok(index) = word_index(addr) else {
            return false;
        };
        match kind {
            WatchKind::Read => self.read_watch.get(index),
            WatchKind::Write => self.write_watch.get(index),
            WatchKind::Access => self.read_watch.get(index) || self.write_watch.get(index),
        }
    }

    /// Returns `true` if a data access of the given type trips a watchpoint.
    pub fn watch_hit(&self, addr: u32, access: AccessType) -> bool {
        match access {
            AccessType::Read => self.has_watchpoint(WatchKind::Read, addr),
            AccessType::Write => self.has_watchpoint(WatchKind::Write, addr),
            AccessType::Fetch => false,
        }
    }

    /// Clears every breakpoint.
    pub fn reset_breakpoints(&mut self) {
        self.breakpoints.reset();
    }

    /// Clears every watchpoint of both kinds.
    pub fn reset_watchpoints(&mut self) {
        self.read_watch.reset();
        self.write_watch.reset();
    }
}
