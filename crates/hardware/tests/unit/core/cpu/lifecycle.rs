//! # Machine Lifecycle Tests
//!
//! Construction, reset state, prefaulting, the device limit and teardown.

use armv2_core::common::Status;
use armv2_core::common::constants::{HW_DEVICES_MAX, MAX_MEMORY, PAGE_SIZE};
use armv2_core::config::{Config, MemoryConfig};
use armv2_core::core::arch::gpr::R8_F;
use armv2_core::{Cpu, Flags, Keyboard, Mode, WatchKind};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::init_tracing;

#[test]
fn test_reset_state() {
    init_tracing();
    let mut cpu = Cpu::new(1 << 20).unwrap();

    assert!(cpu.is_initialized());
    assert_eq!(cpu.mode(), Mode::Supervisor);
    assert_eq!(cpu.flags(), Flags::I);
    assert_eq!(cpu.pc(), 0);
    assert_eq!(cpu.pins(), 0);
    assert_eq!(cpu.page_table().present_pages(), 0);
    assert_eq!(cpu.free_ram(), 1 << 20);
    assert_eq!(cpu.boot_rom(), None);
    assert_eq!(cpu.read_word(0), Err(Status::InvalidPage));
}

#[rstest]
#[case::one_byte(1, PAGE_SIZE)]
#[case::exact_page(PAGE_SIZE, PAGE_SIZE)]
#[case::page_and_a_bit(PAGE_SIZE + 1, 2 * PAGE_SIZE)]
#[case::whole_bus(MAX_MEMORY, MAX_MEMORY)]
fn test_budget_rounds_up_to_pages(#[case] memsize: u32, #[case] expected: u32) {
    let cpu = Cpu::new(memsize).unwrap();
    assert_eq!(cpu.free_ram(), expected);
}

#[test]
fn test_oversized_budget_is_rejected() {
    assert_eq!(Cpu::new(MAX_MEMORY + 1).err(), Some(Status::ValueError));
}

#[test]
fn test_prefault_spends_the_whole_budget() {
    let config = Config {
        memory: MemoryConfig {
            size: 8 * PAGE_SIZE,
            prefault: true,
        },
        ..Default::default()
    };
    let mut cpu = Cpu::with_config(&config).unwrap();

    assert_eq!(cpu.page_table().present_pages(), 8);
    assert_eq!(cpu.free_ram(), 0);
    assert_eq!(cpu.read_word(7 * PAGE_SIZE), Ok(0));
    assert_eq!(cpu.write_word(8 * PAGE_SIZE, 1), Err(Status::MemoryError));
}

#[rstest]
#[case::first_past_r15(16)]
#[case::fiq_shadow_slot(R8_F)]
#[case::past_every_slot(27)]
fn test_register_numbers_past_r15_are_rejected(#[case] n: usize) {
    let mut cpu = Cpu::new(1 << 20).unwrap();

    assert_eq!(cpu.register(n), Err(Status::InvalidArgs));
    assert_eq!(cpu.set_register(n, 0xdead), Err(Status::InvalidArgs));
    assert_eq!(cpu.user_register(n), Err(Status::InvalidArgs));
    assert_eq!(cpu.set_user_register(n, 0xdead), Err(Status::InvalidArgs));
    assert_eq!(cpu.registers().physical(R8_F), 0);
}

#[test]
fn test_device_registry_is_bounded() {
    let mut cpu = Cpu::new(1 << 20).unwrap();
    for expected in 0..HW_DEVICES_MAX {
        assert_eq!(cpu.add_hardware(Box::new(Keyboard::new())), Ok(expected));
    }
    assert_eq!(
        cpu.add_hardware(Box::new(Keyboard::new())),
        Err(Status::MaxHardwareDevices)
    );
    assert_eq!(cpu.device_count(), HW_DEVICES_MAX);
}

#[test]
fn test_cleanup_invalidates_every_operation() {
    let mut cpu = Cpu::new(1 << 20).unwrap();
    cpu.write_word(0, 0).unwrap();
    cpu.cleanup();

    assert!(!cpu.is_initialized());
    assert_eq!(cpu.run(1_u32), Err(Status::InvalidCpuState));
    assert_eq!(cpu.read_word(0), Err(Status::InvalidCpuState));
    assert_eq!(cpu.write_word(0, 1), Err(Status::InvalidCpuState));
    assert_eq!(cpu.interrupt(1, 1), Err(Status::InvalidCpuState));
    assert_eq!(cpu.raise_fiq(), Err(Status::InvalidCpuState));
    assert_eq!(cpu.set_breakpoint(0), Err(Status::InvalidCpuState));
    assert_eq!(
        cpu.set_watchpoint(WatchKind::Access, 0),
        Err(Status::InvalidCpuState)
    );
    assert_eq!(cpu.load_rom_bytes(&[0; 0x40]), Err(Status::InvalidCpuState));
    assert_eq!(
        cpu.add_hardware(Box::new(Keyboard::new())),
        Err(Status::InvalidCpuState)
    );
    assert_eq!(cpu.map_memory(0, 0x1000, 0x2000), Err(Status::InvalidCpuState));
    assert_eq!(cpu.page_table().present_pages(), 0);
}

#[test]
fn test_cleanup_twice_is_harmless() {
    let mut cpu = Cpu::new(1 << 20).unwrap();
    cpu.cleanup();
    cpu.cleanup();
    assert!(!cpu.is_initialized());
}
