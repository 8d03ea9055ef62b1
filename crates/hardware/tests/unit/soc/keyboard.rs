//! # Keyboard Tests

use armv2_core::Device;
use armv2_core::soc::devices::{KEYBOARD_ID, KeyEvent, Keyboard};
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::{ldr, ldrb};
use crate::common::harness::TestContext;

const RING: u32 = 0x20;
const POS: u32 = 0xa0;

#[test]
fn test_key_down_sets_pressed_bit_and_appends_to_ring() {
    let mut keyboard = Keyboard::new();
    let handle = keyboard.handle();

    assert_eq!(handle.key_down(65), KeyEvent::KeyDown);

    assert_eq!(keyboard.read_byte(8), Some(0x02));
    assert_eq!(keyboard.read_byte(RING), Some(65));
    assert_eq!(keyboard.read_word(POS), Some(1));
}

#[test]
fn test_key_up_clears_pressed_bit_only() {
    let mut keyboard = Keyboard::new();
    let handle = keyboard.handle();
    handle.key_down(65);
    handle.key_down(66);

    assert_eq!(handle.key_up(65), KeyEvent::KeyUp);

    assert_eq!(keyboard.read_byte(8), Some(0x04));
    assert_eq!(keyboard.read_word(RING), Some(u32::from_le_bytes([65, 66, 0, 0])));
    assert_eq!(keyboard.read_word(POS), Some(2));
}

#[test]
fn test_ring_wraps_and_straddling_word_reads_wrap() {
    let mut keyboard = Keyboard::new();
    let handle = keyboard.handle();
    for key in 0..130_u32 {
        handle.key_down(key as u8);
    }

    assert_eq!(keyboard.read_word(POS), Some(2));
    assert_eq!(keyboard.read_byte(RING), Some(128));
    assert_eq!(
        keyboard.read_word(RING + 0x7e),
        Some(u32::from_le_bytes([126, 127, 128, 129]))
    );
}

#[test]
fn test_writes_are_ignored() {
    let mut keyboard = Keyboard::new();
    assert_eq!(keyboard.write_word(0, 0xffff_ffff), Some(()));
    assert_eq!(keyboard.write_byte(RING, 0x55), Some(()));
    assert_eq!(keyboard.read_word(0), Some(0));
    assert_eq!(keyboard.read_byte(RING), Some(0));
}

#[test]
fn test_event_codes_and_identity() {
    let keyboard = Keyboard::new();
    assert_eq!(KeyEvent::KeyDown.code(), 0);
    assert_eq!(KeyEvent::KeyUp.code(), 1);
    assert_eq!(keyboard.device_id(), KEYBOARD_ID);
    assert_eq!(keyboard.name(), "Keyboard");
}

#[test]
fn test_guest_reads_keyboard_through_mapping() {
    let keyboard = Keyboard::new();
    let handle = keyboard.handle();
    let mut ctx = TestContext::new()
        .program(&[ldrb(0, 1, 8), ldr(2, 1, POS)])
        .with_reg(1, 0x1_0000);
    let index = ctx.cpu.add_hardware(Box::new(keyboard)).unwrap();
    ctx.cpu.map_memory(index, 0x1_0000, 0x1_1000).unwrap();

    let event = handle.key_down(65);
    ctx.cpu.interrupt(KEYBOARD_ID, event.code()).unwrap();
    ctx.run(2);

    assert_eq!(ctx.get_reg(0), 0x02);
    assert_eq!(ctx.get_reg(2), 1);
    assert_eq!(ctx.cpu.stats().interrupts_dropped, 1, "IRQs are masked at reset");
}
