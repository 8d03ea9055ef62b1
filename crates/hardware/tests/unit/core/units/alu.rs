//! # ALU Tests
//!
//! Results and flags of the sixteen data-processing opcodes.

use armv2_core::core::units::alu::arithmetic::add_with_carry;
use armv2_core::core::units::alu::{Alu, AluOp, AluResult};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_add_wraps_to_zero_with_carry() {
    let result = Alu::execute(AluOp::Add, 0xffff_ffff, 1, false, false);
    assert_eq!(
        result,
        AluResult {
            value: 0,
            carry: true,
            overflow: Some(false),
        }
    );
}

#[test]
fn test_add_signed_overflow() {
    let result = Alu::execute(AluOp::Add, 0x7fff_ffff, 1, false, false);
    assert_eq!(result.value, 0x8000_0000);
    assert!(!result.carry);
    assert_eq!(result.overflow, Some(true));
}

#[rstest]
#[case::equal(5, 5, 0, true)]
#[case::borrow(3, 5, 0xffff_fffe, false)]
#[case::no_borrow(5, 3, 2, true)]
fn test_sub_carry_means_no_borrow(
    #[case] rn: u32,
    #[case] op2: u32,
    #[case] value: u32,
    #[case] carry: bool,
) {
    let result = Alu::execute(AluOp::Sub, rn, op2, false, false);
    assert_eq!(result.value, value);
    assert_eq!(result.carry, carry);
    assert_eq!(Alu::execute(AluOp::Cmp, rn, op2, false, false), result);
}

#[test]
fn test_sub_overflow_from_negative_minus_positive() {
    let result = Alu::execute(AluOp::Sub, 0x8000_0000, 1, false, false);
    assert_eq!(result.value, 0x7fff_ffff);
    assert_eq!(result.overflow, Some(true));
}

#[test]
fn test_reverse_subtract_swaps_operands() {
    assert_eq!(Alu::execute(AluOp::Rsb, 3, 10, false, false).value, 7);
    assert_eq!(Alu::execute(AluOp::Rsc, 3, 10, false, true).value, 7);
    assert_eq!(Alu::execute(AluOp::Rsc, 3, 10, false, false).value, 6);
}

#[rstest]
#[case::carry_set(true, 11)]
#[case::carry_clear(false, 10)]
fn test_adc_consumes_carry(#[case] carry: bool, #[case] expected: u32) {
    assert_eq!(Alu::execute(AluOp::Adc, 4, 6, false, carry).value, expected);
}

#[rstest]
#[case::carry_set(true, 2)]
#[case::carry_clear(false, 1)]
fn test_sbc_subtracts_inverted_carry(#[case] carry: bool, #[case] expected: u32) {
    assert_eq!(Alu::execute(AluOp::Sbc, 5, 3, false, carry).value, expected);
}

#[rstest]
#[case(AluOp::And, 0x0ff0)]
#[case(AluOp::Tst, 0x0ff0)]
#[case(AluOp::Eor, 0xf00f)]
#[case(AluOp::Teq, 0xf00f)]
#[case(AluOp::Orr, 0xffff)]
#[case(AluOp::Mov, 0x0ff0)]
#[case(AluOp::Bic, 0xf00f)]
#[case(AluOp::Mvn, 0xffff_f00f)]
fn test_logical_ops_keep_shifter_carry_and_leave_overflow(#[case] op: AluOp, #[case] value: u32) {
    let result = Alu::execute(op, 0xffff, 0x0ff0, true, false);
    assert_eq!(result.value, value);
    assert!(result.carry, "{} must report the shifter carry", op.mnemonic());
    assert_eq!(result.overflow, None);
}

#[test]
fn test_opcode_field_round_trip() {
    for bits in 0..16 {
        assert_eq!(AluOp::from_bits(bits) as u32, bits);
    }
    assert!(AluOp::from_bits(0xa).is_test());
    assert!(!AluOp::from_bits(0xd).is_test());
}

#[test]
fn test_adder_carry_in_propagates() {
    let sum = add_with_carry(0xffff_fffe, 1, true);
    assert_eq!(sum.value, 0);
    assert!(sum.carry);
    assert!(!sum.overflow);
}
