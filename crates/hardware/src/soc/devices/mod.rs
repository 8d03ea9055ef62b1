//! Memory-Mapped Devices.
//!
//! This module contains the stock hardware devices a host can attach to the
//! emulated machine.

/// Memory-mapped keyboard.
pub mod keyboard;

pub use keyboard::{KEYBOARD_ID, KeyEvent, Keyboard, KeyboardHandle};

pub use crate::soc::traits::Device;
