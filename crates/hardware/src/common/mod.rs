//! Common types and constants shared by every part of the emulator.
//!
//! This module provides the fundamental building blocks used across components. It includes:
//! 1. **Constants:** Address-bus, page and ROM layout values.
//! 2. **Memory Access:** Classification of fetches, loads and stores.
//! 3. **Error Handling:** Host status codes, run outcomes and guest exceptions.

/// Architectural and layout constants.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Host status, run outcomes and guest exceptions.
pub mod error;

pub use constants::{PAGE_SIZE, PAGE_SIZE_BITS};
pub use data::{AccessType, Width};
pub use error::{Exception, Halt, Status};
