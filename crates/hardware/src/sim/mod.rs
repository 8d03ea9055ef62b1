//! Program loading.
//!
//! Provides the ROM image reader and section loader that put a boot ROM and
//! its symbol table into a freshly created machine.

/// ROM image reading and section placement.
pub mod loader;
