//! # Page Table Tests
//!
//! Demand faulting against the RAM budget, access checks, and all-or-nothing
//! device binding, both on the bare page table and through `Cpu::map_memory`.

use armv2_core::common::constants::{MAX_MEMORY, PAGE_SIZE};
use armv2_core::common::{AccessType, Status, Width};
use armv2_core::core::units::mmu::page::Permissions;
use armv2_core::core::units::mmu::{AccessFault, PageTable};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::TestContext;
use crate::common::mocks::device::{Capabilities, RecordingDevice};

#[test]
fn test_budget_rounds_up_to_whole_pages() {
    let table = PageTable::new(1).unwrap();
    assert_eq!(table.memory_size(), PAGE_SIZE);
    assert_eq!(table.free_ram(), PAGE_SIZE);
    assert_eq!(table.present_pages(), 0);
}

#[test]
fn test_budget_beyond_bus_is_rejected() {
    assert_eq!(PageTable::new(MAX_MEMORY + 1).err(), Some(Status::ValueError));
}

#[test]
fn test_fault_spends_budget_once_per_page() {
    let mut table = PageTable::new(2 * PAGE_SIZE).unwrap();
    table.fault(0x1000).unwrap();
    table.fault(0x1ffc).unwrap();
    assert_eq!(table.free_ram(), PAGE_SIZE);
    table.fault(0x5000).unwrap();
    assert_eq!(table.free_ram(), 0);
    assert_eq!(table.fault(0x9000), Err(Status::MemoryError));
    assert_eq!(table.present_pages(), 2);
}

#[test]
fn test_fault_beyond_bus_is_rejected() {
    let mut table = PageTable::new(PAGE_SIZE).unwrap();
    assert_eq!(table.fault(MAX_MEMORY), Err(Status::ValueError));
}

#[test]
fn test_check_reports_why_an_access_is_refused() {
    let mut table = PageTable::new(PAGE_SIZE).unwrap();
    assert_eq!(
        table.check(0x1000, AccessType::Read, Width::Word, true).err(),
        Some(AccessFault::InvalidPage)
    );

    table.fault(0x1000).unwrap();
    assert_eq!(
        table.check(0x1002, AccessType::Read, Width::Word, true).err(),
        Some(AccessFault::Misaligned)
    );
    assert!(table.check(0x1002, AccessType::Read, Width::Byte, false).is_ok());

    table.set_permissions(0x1000, Permissions::READ).unwrap();
    assert!(table.check(0x1000, AccessType::Read, Width::Word, false).is_ok());
    assert_eq!(
        table.check(0x1000, AccessType::Write, Width::Word, false).err(),
        Some(AccessFault::Permission)
    );
    assert_eq!(
        table.check(0x1000, AccessType::Fetch, Width::Word, false).err(),
        Some(AccessFault::Permission)
    );
    assert!(
        table.check(0x1000, AccessType::Write, Width::Word, true).is_ok(),
        "privileged accesses skip permission checks"
    );
}

#[test]
fn test_set_permissions_needs_a_present_page() {
    let mut table = PageTable::new(PAGE_SIZE).unwrap();
    assert_eq!(
        table.set_permissions(0x3000, Permissions::NONE),
        Err(Status::InvalidPage)
    );
}

#[rstest]
#[case::empty(0x1000, 0x1000)]
#[case::reversed(0x2000, 0x1000)]
#[case::misaligned_start(0x1004, 0x2000)]
#[case::misaligned_end(0x1000, 0x2004)]
#[case::page_zero(0x0, 0x1000)]
#[case::past_the_bus(0x1000, MAX_MEMORY)]
fn test_bind_device_rejects_bad_ranges(#[case] start: u32, #[case] end: u32) {
    let mut table = PageTable::new(PAGE_SIZE).unwrap();
    assert_eq!(table.bind_device(0, start, end), Err(Status::InvalidArgs));
    assert_eq!(table.present_pages(), 0);
}

#[test]
fn test_overlapping_binding_leaves_table_unchanged() {
    let mut table = PageTable::new(PAGE_SIZE).unwrap();
    table.bind_device(0, 0x10000, 0x12000).unwrap();
    assert_eq!(
        table.bind_device(1, 0x11000, 0x13000),
        Err(Status::AlreadyMapped)
    );
    assert_eq!(table.page(0x11000).and_then(|page| page.device()), Some(0));
    assert!(table.page(0x12000).is_none());
    assert_eq!(table.present_pages(), 2);
}

#[test]
fn test_binding_refunds_ram_pages() {
    let mut table = PageTable::new(2 * PAGE_SIZE).unwrap();
    table.fault(0x20000).unwrap();
    assert_eq!(table.free_ram(), PAGE_SIZE);
    table.bind_device(3, 0x20000, 0x21000).unwrap();
    assert_eq!(table.free_ram(), 2 * PAGE_SIZE);
    let page = table.page(0x20000).unwrap();
    assert!(!page.is_ram());
    assert_eq!(page.device(), Some(3));
}

#[test]
fn test_map_memory_requires_a_registered_device() {
    let mut ctx = TestContext::new();
    assert_eq!(
        ctx.cpu.map_memory(0, 0x10000, 0x11000),
        Err(Status::NoSuchDevice)
    );
}

#[test]
fn test_map_memory_records_mappings_newest_first() {
    let mut ctx = TestContext::new();
    let (first, _) = RecordingDevice::new(1, Capabilities::ALL);
    let (second, _) = RecordingDevice::new(2, Capabilities::ALL);
    let a = ctx.cpu.add_hardware(Box::new(first)).unwrap();
    let b = ctx.cpu.add_hardware(Box::new(second)).unwrap();

    ctx.cpu.map_memory(a, 0x10000, 0x11000).unwrap();
    ctx.cpu.map_memory(b, 0x20000, 0x22000).unwrap();
    assert_eq!(
        ctx.cpu.map_memory(b, 0x10000, 0x11000),
        Err(Status::AlreadyMapped)
    );

    let mappings = ctx.cpu.mappings();
    assert_eq!(mappings.len(), 2);
    assert_eq!((mappings[0].device, mappings[0].start, mappings[0].end), (b, 0x20000, 0x22000));
    assert_eq!((mappings[1].device, mappings[1].start, mappings[1].end), (a, 0x10000, 0x11000));
    assert_eq!(
        ctx.cpu.devices().get(b).and_then(|device| device.mapped()).map(|r| (r.start, r.end)),
        Some((0x20000, 0x22000))
    );
}

#[test]
fn test_host_write_faults_pages_in() {
    let mut ctx = TestContext::new();
    let before = ctx.cpu.free_ram();
    assert_eq!(ctx.cpu.read_word(0x4000), Err(Status::InvalidPage));
    ctx.cpu.write_word(0x4000, 0x1234_5678).unwrap();
    assert_eq!(ctx.cpu.free_ram(), before - PAGE_SIZE);
    assert_eq!(ctx.cpu.read_byte(0x4001), Ok(0x56));
    ctx.cpu.write_byte(0x4003, 0xab).unwrap();
    assert_eq!(ctx.cpu.read_word(0x4000), Ok(0xab34_5678));
}

#[test]
fn test_host_accesses_to_a_word_only_device_fall_back_for_bytes() {
    let mut ctx = TestContext::new();
    let (device, log) = RecordingDevice::new(7, Capabilities::WORDS_ONLY);
    let index = ctx
        .cpu
        .add_hardware(Box::new(device.with_word(0x10, 0x4433_2211)))
        .unwrap();
    ctx.cpu.map_memory(index, 0x30000, 0x31000).unwrap();

    assert_eq!(ctx.cpu.read_byte(0x30012), Ok(0x33));
    ctx.cpu.write_byte(0x30011, 0xee).unwrap();
    assert_eq!(ctx.cpu.read_word(0x30010), Ok(0x4433_ee11));
    assert!(log.lock().unwrap().len() >= 4);
}

#[test]
fn test_device_without_capabilities_reports_device_error() {
    let mut ctx = TestContext::new();
    let (device, _) = RecordingDevice::new(9, Capabilities::NONE);
    let index = ctx.cpu.add_hardware(Box::new(device)).unwrap();
    ctx.cpu.map_memory(index, 0x30000, 0x31000).unwrap();
    assert_eq!(ctx.cpu.read_word(0x30000), Err(Status::DeviceError));
    assert_eq!(ctx.cpu.write_byte(0x30001, 1), Err(Status::DeviceError));
}
