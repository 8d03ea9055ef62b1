//! # Multiply Tests

use armv2_core::core::arch::gpr::PC;
use armv2_core::Flags;
use rstest::rstest;

use crate::common::builder::instruction::{mla, mul};
use crate::common::harness::{PROGRAM_BASE, TestContext};

#[rstest]
#[case::small(6, 7, 42)]
#[case::wraps(0x1_0001, 0x1_0001, 0x0002_0001)]
#[case::negative(0xffff_ffff, 2, 0xffff_fffe)]
fn test_mul(#[case] rm: u32, #[case] rs: u32, #[case] expected: u32) {
    let mut ctx = TestContext::new()
        .program(&[mul(false, 0, 1, 2)])
        .with_reg(1, rm)
        .with_reg(2, rs);
    ctx.run(1);
    assert_eq!(ctx.get_reg(0), expected);
}

#[test]
fn test_mla_adds_accumulator() {
    let mut ctx = TestContext::new()
        .program(&[mla(false, 0, 1, 2, 3)])
        .with_reg(1, 6)
        .with_reg(2, 7)
        .with_reg(3, 100);
    ctx.run(1);
    assert_eq!(ctx.get_reg(0), 142);
}

#[test]
fn test_muls_sets_n_and_z_but_keeps_c_and_v() {
    let mut ctx = TestContext::new()
        .program(&[mul(true, 0, 1, 2), mul(true, 3, 1, 4)])
        .with_reg(1, 0xffff_ffff)
        .with_reg(2, 2);
    ctx.cpu.set_flags(Flags::C | Flags::V | Flags::Z);

    ctx.run(1);
    assert_eq!(ctx.cpu.flags(), Flags::N | Flags::C | Flags::V);

    ctx.run(1);
    assert_eq!(ctx.get_reg(3), 0);
    assert_eq!(ctx.cpu.flags(), Flags::Z | Flags::C | Flags::V);
}

#[test]
fn test_destination_r15_discards_the_product() {
    let mut ctx = TestContext::new()
        .program(&[mul(true, PC as u32, 1, 2)])
        .with_reg(1, 3)
        .with_reg(2, 5);
    ctx.run(1);
    assert_eq!(ctx.cpu.pc(), PROGRAM_BASE + 4);
    assert!(ctx.cpu.flags().contains(Flags::Z));
    assert_eq!(ctx.get_reg(1), 3);
    assert_eq!(ctx.get_reg(2), 5);
}
