//! # Swap Tests

use armv2_core::core::units::mmu::page::Permissions;
use armv2_core::{Exception, Mode};

use crate::common::builder::instruction::swp;
use crate::common::harness::{DATA_BASE, TestContext};

#[test]
fn test_swp_exchanges_register_and_memory() {
    let mut ctx = TestContext::new()
        .program(&[swp(false, 0, 1, 2)])
        .with_reg(1, 0x2222_2222)
        .with_reg(2, DATA_BASE)
        .with_word(DATA_BASE, 0x1111_1111);
    ctx.run(1);
    assert_eq!(ctx.get_reg(0), 0x1111_1111);
    assert_eq!(ctx.word(DATA_BASE), 0x2222_2222);
}

#[test]
fn test_swp_with_same_source_and_destination() {
    let mut ctx = TestContext::new()
        .program(&[swp(false, 1, 1, 2)])
        .with_reg(1, 0xaaaa)
        .with_reg(2, DATA_BASE)
        .with_word(DATA_BASE, 0xbbbb);
    ctx.run(1);
    assert_eq!(ctx.get_reg(1), 0xbbbb);
    assert_eq!(ctx.word(DATA_BASE), 0xaaaa);
}

#[test]
fn test_swpb_swaps_one_lane() {
    let mut ctx = TestContext::new()
        .program(&[swp(true, 0, 1, 2)])
        .with_reg(1, 0x1ff)
        .with_reg(2, DATA_BASE + 1)
        .with_word(DATA_BASE, 0x4433_2211);
    ctx.run(1);
    assert_eq!(ctx.get_reg(0), 0x22);
    assert_eq!(ctx.word(DATA_BASE), 0x4433_ff11);
}

#[test]
fn test_swp_on_absent_page_aborts_without_side_effects() {
    let mut ctx = TestContext::new()
        .program(&[swp(false, 0, 1, 2)])
        .with_reg(0, 0x99)
        .with_reg(2, 0x0007_0000);
    ctx.run(1);
    assert_eq!(ctx.cpu.pc(), 0x10);
    assert_eq!(ctx.get_reg(0), 0x99);
    assert_eq!(ctx.cpu.stats().exception_count(Exception::DataAbort), 1);
}

#[test]
fn test_user_swp_on_read_only_page_leaves_both_sides_alone() {
    let mut ctx = TestContext::new()
        .program(&[swp(false, 0, 1, 2)])
        .with_reg(1, 0x42)
        .with_reg(2, DATA_BASE)
        .with_word(DATA_BASE, 0x17);
    ctx.cpu
        .set_page_permissions(DATA_BASE, Permissions::READ)
        .unwrap();
    ctx.cpu.set_mode(Mode::User);

    ctx.run(1);

    assert_eq!(ctx.cpu.pc(), 0x10);
    assert_eq!(ctx.get_reg(0), 0);
    assert_eq!(ctx.word(DATA_BASE), 0x17);
}

#[test]
fn test_swp_beyond_bus_raises_address_exception() {
    let mut ctx = TestContext::new()
        .program(&[swp(false, 0, 1, 2)])
        .with_reg(2, 0x0800_0000);
    ctx.run(1);
    assert_eq!(ctx.cpu.pc(), 0x14);
}
