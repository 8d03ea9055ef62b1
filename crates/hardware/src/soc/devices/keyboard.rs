//! Keyboard.
//!
//! A read-only memory-mapped keyboard. The host feeds key events through a
//! [`KeyboardHandle`] and raises the matching interrupt on the CPU; the guest
//! reads the device's page.
//!
//! # Registers
//!
//! * `0x00-0x1f`: Bitmask of currently pressed keys, one bit per key code.
//! * `0x20-0x9f`: 128-byte ring buffer of key-down codes.
//! * `0xa0`: Next ring buffer write position.
//!
//! Writes are accepted and ignored.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::soc::traits::Device;

/// Public device ID of the keyboard.
pub const KEYBOARD_ID: u32 = 0x4141_4141;

const BITMASK_START: u32 = 0x00;
const RING_BUFFER_START: u32 = 0x20;
const RING_BUFFER_POS: u32 = 0xa0;
const RING_BUFFER_LEN: usize = 128;

/// Interrupt codes the keyboard reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// A key was pressed.
    KeyDown = 0,
    /// A key was released.
    KeyUp = 1,
}

impl KeyEvent {
    /// Returns the interrupt code passed to [`Cpu::interrupt`](crate::Cpu::interrupt).
    pub const fn code(self) -> u32 {
        self as u32
    }
}

#[derive(Debug)]
struct KeyboardState {
    pressed: [u8; 32],
    ring_buffer: [u8; RING_BUFFER_LEN],
    pos: usize,
}

impl KeyboardState {
    fn read_byte(&self, offset: u32) -> u8 {
        match offset {
            o if o < RING_BUFFER_START => self.pressed[(o - BITMASK_START) as usize],
            o if o < RING_BUFFER_POS => self.ring_buffer[(o - RING_BUFFER_START) as usize],
            RING_BUFFER_POS => self.pos as u8,
            _ => 0,
        }
    }

    fn read_word(&self, offset: u32) -> u32 {
        if (RING_BUFFER_START..RING_BUFFER_POS).contains(&offset) {
            // Words straddling the end of the ring wrap to its start.
            let base = (offset - RING_BUFFER_START) as usize;
            (0..4).fold(0, |word, i| {
                word | u32::from(self.ring_buffer[(base + i) % RING_BUFFER_LEN]) << (8 * i)
            })
        } else if offset == RING_BUFFER_POS {
            self.pos as u32
        } else {
            u32::from_le_bytes([0, 1, 2, 3].map(|i| self.read_byte(offset + i)))
        }
    }
}

/// Host-side handle for feeding key events into a [`Keyboard`].
#[derive(Clone, Debug)]
pub struct KeyboardHandle {
    state: Arc<Mutex<KeyboardState>>,
}

impl KeyboardHandle {
    fn lock(&self) -> MutexGuard<'_, KeyboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a key press.
    ///
    /// # Returns
    ///
    /// The event to raise with [`Cpu::interrupt`](crate::Cpu::interrupt).
    pub fn key_down(&self, key: u8) -> KeyEvent {
        let mut state = self.lock();
        state.pressed[usize::from(key >> 3)] |= 1 << (key & 7);
        let pos = state.pos;
        state.ring_buffer[pos] = key;
        state.pos = (pos + 1) % RING_BUFFER_LEN;
        KeyEvent::KeyDown
    }

    /// Records a key release.
    ///
    /// # Returns
    ///
    /// The event to raise with [`Cpu::interrupt`](crate::Cpu::interrupt).
    pub fn key_up(&self, key: u8) -> KeyEvent {
        let mut state = self.lock();
        state.pressed[usize::from(key >> 3)] &= !(1 << (key & 7));
        KeyEvent::KeyUp
    }
}

/// Keyboard device.
#[derive(Debug)]
pub struct Keyboard {
    handle: KeyboardHandle,
}

impl Keyboard {
    /// Creates a keyboard with no keys pressed and an empty ring buffer.
    pub fn new() -> Self {
        Self {
            handle: KeyboardHandle {
                state: Arc::new(Mutex::new(KeyboardState {
                    pressed: [0; 32],
                    ring_buffer: [0; RING_BUFFER_LEN],
                    pos: 0,
                })),
            },
        }
    }

    /// Returns a handle the host keeps after the device is attached.
    pub fn handle(&self) -> KeyboardHandle {
        self.handle.clone()
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for Keyboard {
    fn device_id(&self) -> u32 {
        KEYBOARD_ID
    }

    fn name(&self) -> &'static str {
        "Keyboard"
    }

    fn read_word(&mut self, offset: u32) -> Option<u32> {
        Some(self.handle.lock().read_word(offset))
    }

    fn write_word(&mut self, _offset: u32, _value: u32) -> Option<()> {
        Some(())
    }

    fn read_byte(&mut self, offset: u32) -> Option<u8> {
        Some(self.handle.lock().read_byte(offset))
    }

    fn write_byte(&mut self, _offset: u32, _value: u8) -> Option<()> {
        Some(())
    }
}
