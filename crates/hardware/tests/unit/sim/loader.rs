//! # ROM Loader Tests
//!
//! Loading boot ROM and symbol sections from files and byte buffers, and the
//! failures a malformed image or an exhausted budget produce.

use std::io::Write;

use armv2_core::common::Status;
use armv2_core::common::constants::{MIN_ROM_SIZE, PAGE_SIZE, SYMBOLS_ADDR};
use armv2_core::config::{Config, LayoutConfig, MemoryConfig};
use armv2_core::soc::Region;
use armv2_core::{Cpu, Flags, Halt, Mode};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use crate::common::builder::instruction::{NOP, mov_imm, rom_image, words_to_bytes};
use crate::common::harness::TestContext;

fn boot_section() -> Vec<u8> {
    let mut words = vec![mov_imm(0, 0x12), mov_imm(1, 0x34)];
    words.resize(8, NOP);
    words_to_bytes(&words)
}

fn write_rom(image: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(image).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_minimal_rom_boots_from_vector_zero() {
    let image = rom_image(&[&boot_section()[..], &[]]);
    assert_eq!(image.len(), MIN_ROM_SIZE);
    let file = write_rom(&image);
    let mut ctx = TestContext::new();

    ctx.cpu.load_rom(file.path()).unwrap();

    assert_eq!(ctx.cpu.boot_rom(), Some(Region { start: 0, end: 32 }));
    assert_eq!(ctx.cpu.mode(), Mode::Supervisor);
    assert_eq!(ctx.cpu.flags(), Flags::I);
    assert_eq!(ctx.cpu.pc(), 0);

    assert_eq!(ctx.run(2), Halt::Completed);
    assert_eq!(ctx.get_reg(0), 0x12);
    assert_eq!(ctx.get_reg(1), 0x34);
}

#[test]
fn test_symbols_section_lands_in_its_window() {
    let image = rom_image(&[&boot_section()[..], b"SYMBOLS!"]);
    let mut ctx = TestContext::new();

    ctx.cpu.load_rom_bytes(&image).unwrap();

    assert_eq!(ctx.word(SYMBOLS_ADDR), u32::from_le_bytes(*b"SYMB"));
    assert_eq!(ctx.word(SYMBOLS_ADDR + 4), u32::from_le_bytes(*b"OLS!"));
}

#[test]
fn test_image_without_symbols_section() {
    let mut boot = boot_section();
    boot.extend_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee]);
    let image = rom_image(&[&boot[..]]);
    let mut ctx = TestContext::new();

    ctx.cpu.load_rom_bytes(&image).unwrap();

    assert_eq!(ctx.cpu.boot_rom(), Some(Region { start: 0, end: 37 }));
    assert_eq!(ctx.cpu.read_byte(36), Ok(0xee));
    assert!(ctx.cpu.page_table().page(SYMBOLS_ADDR).is_none());
}

#[test]
fn test_custom_layout_moves_the_boot_section() {
    let config = Config {
        layout: LayoutConfig {
            boot_rom_addr: 0x4000,
            tape_addr: 0x8000,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut cpu = Cpu::with_config(&config).unwrap();

    cpu.load_rom_bytes(&rom_image(&[&boot_section()[..], &[]])).unwrap();

    assert_eq!(cpu.boot_rom(), Some(Region { start: 0x4000, end: 0x4020 }));
    assert_eq!(cpu.read_word(0x4000), Ok(mov_imm(0, 0x12)));
    assert_eq!(cpu.read_word(0), Err(Status::InvalidPage));
}

#[test]
fn test_image_below_minimum_size_is_rejected() {
    let mut ctx = TestContext::new();
    assert_eq!(
        ctx.cpu.load_rom_bytes(&[0; MIN_ROM_SIZE - 1]),
        Err(Status::IoError)
    );
    assert_eq!(ctx.cpu.boot_rom(), None);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = TestContext::new();
    assert_eq!(
        ctx.cpu.load_rom(dir.path().join("missing.rom")),
        Err(Status::IoError)
    );
}

#[test]
fn test_boot_section_larger_than_its_window_is_rejected() {
    let config = Config {
        layout: LayoutConfig {
            tape_addr: 0x1000,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut cpu = Cpu::with_config(&config).unwrap();
    let image = rom_image(&[&vec![0; 0x1004][..]]);

    assert_eq!(cpu.load_rom_bytes(&image), Err(Status::IoError));
}

#[test]
fn test_truncated_section_is_rejected() {
    let mut image = 0x100_u32.to_be_bytes().to_vec();
    image.extend_from_slice(&[0; 0x40]);
    let mut ctx = TestContext::new();
    assert_eq!(ctx.cpu.load_rom_bytes(&image), Err(Status::IoError));
}

#[test]
fn test_exhausted_budget_is_a_placement_failure() {
    let config = Config {
        memory: MemoryConfig {
            size: PAGE_SIZE,
            prefault: false,
        },
        ..Default::default()
    };
    let mut cpu = Cpu::with_config(&config).unwrap();
    let image = rom_image(&[&vec![0; 2 * PAGE_SIZE as usize][..]]);

    assert_eq!(cpu.load_rom_bytes(&image), Err(Status::InvalidPage));
}
