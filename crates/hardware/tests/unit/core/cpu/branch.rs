//! # Branch Tests

use armv2_core::core::arch::gpr::LR;
use armv2_core::Flags;

use crate::common::builder::instruction::{EQ, NOP, b, bl, with_cond};
use crate::common::harness::{PROGRAM_BASE, TestContext};

#[test]
fn test_branch_target_is_relative_to_pc_plus_8() {
    let mut ctx = TestContext::new().program(&[b(2)]);
    ctx.run(1);
    assert_eq!(ctx.cpu.pc(), PROGRAM_BASE + 8 + 8);
}

#[test]
fn test_branch_to_self_loops() {
    let mut ctx = TestContext::new().program(&[b(-2)]);
    ctx.run(5);
    assert_eq!(ctx.cpu.pc(), PROGRAM_BASE);
    assert_eq!(ctx.cpu.stats().inst_branch, 5);
}

#[test]
fn test_branch_with_link_saves_return_address_without_flags() {
    let mut ctx = TestContext::new().program(&[bl(0x100)]);
    ctx.cpu.set_flags(Flags::N | Flags::I);
    ctx.run(1);
    assert_eq!(ctx.get_reg(LR), PROGRAM_BASE + 4);
    assert_eq!(ctx.cpu.pc(), PROGRAM_BASE + 8 + 0x400);
}

#[test]
fn test_branch_target_wraps_onto_the_bus() {
    let mut ctx = TestContext::new().program(&[b(-0x800)]);
    ctx.run(1);
    assert_eq!(ctx.cpu.pc(), 0x03ff_f008);
}

#[test]
fn test_untaken_conditional_branch_falls_through() {
    let mut ctx = TestContext::new().program(&[with_cond(bl(0x40), EQ), NOP]);
    ctx.run(1);
    assert_eq!(ctx.cpu.pc(), PROGRAM_BASE + 4);
    assert_eq!(ctx.get_reg(LR), 0);
}
