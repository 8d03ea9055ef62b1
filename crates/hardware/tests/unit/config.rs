//! # Configuration Tests
//!
//! JSON parsing with defaults and layout validation.

use armv2_core::common::Status;
use armv2_core::common::constants::{MAX_MEMORY, SYMBOLS_ADDR, TAPE_ADDR};
use armv2_core::config::LayoutConfig;
use armv2_core::{Config, Cpu};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_empty_document_takes_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.memory.size, 1 << 20);
    assert!(!config.memory.prefault);
    assert!(!config.general.trace_instructions);
    assert_eq!(config.layout, LayoutConfig::default());
    assert_eq!(config.layout.tape_addr, TAPE_ADDR);
    assert_eq!(config.layout.symbols_addr, SYMBOLS_ADDR);
}

#[test]
fn test_partial_document_keeps_other_defaults() {
    let config = Config::from_json(
        r#"{
            "general": { "trace_instructions": true },
            "memory": { "prefault": true },
            "layout": { "tape_addr": 65536 }
        }"#,
    )
    .unwrap();

    assert!(config.general.trace_instructions);
    assert!(config.memory.prefault);
    assert_eq!(config.memory.size, 1 << 20);
    assert_eq!(config.layout.tape_addr, 0x1_0000);
    assert_eq!(config.layout.boot_rom_addr, 0);
}

#[rstest]
#[case::not_json("memory = 4096")]
#[case::wrong_type(r#"{ "memory": { "size": "big" } }"#)]
#[case::negative_size(r#"{ "memory": { "size": -1 } }"#)]
#[case::not_an_object("[]")]
fn test_malformed_document_is_invalid_args(#[case] json: &str) {
    assert_eq!(Config::from_json(json).err(), Some(Status::InvalidArgs));
}

#[rstest]
#[case::misaligned_boot(LayoutConfig { boot_rom_addr: 0x10, ..Default::default() })]
#[case::empty_boot_window(LayoutConfig { tape_addr: 0, ..Default::default() })]
#[case::boot_window_off_bus(LayoutConfig { tape_addr: MAX_MEMORY + 1, ..Default::default() })]
#[case::misaligned_symbols(LayoutConfig { symbols_addr: 0x3_0004, ..Default::default() })]
#[case::symbols_window_off_bus(LayoutConfig {
    symbols_addr: MAX_MEMORY - 0x1000,
    ..Default::default()
})]
#[case::symbols_window_overflows(LayoutConfig {
    symbols_addr: 0xffff_f000,
    ..Default::default()
})]
fn test_layout_validation_rejects(#[case] layout: LayoutConfig) {
    assert_eq!(layout.validate(), Err(Status::ValueError));
}

#[test]
fn test_default_layout_is_valid() {
    assert_eq!(LayoutConfig::default().validate(), Ok(()));
}

#[test]
fn test_cpu_refuses_invalid_layout() {
    let config = Config {
        layout: LayoutConfig {
            boot_rom_addr: 0x10,
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(Cpu::with_config(&config).err(), Some(Status::ValueError));
}
