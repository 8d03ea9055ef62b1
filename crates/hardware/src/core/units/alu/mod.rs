//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the sixteen data-processing opcodes and the
//! flags they produce. Operations are organized into submodules:
//! - [`arithmetic`]: the 33-bit adder behind ADD, SUB, RSB, ADC, SBC, RSC, CMP and CMN
//! - [`shifts`]:     the barrel shifter and rotated immediates

/// The 33-bit adder.
pub mod arithmetic;

/// Barrel shifter and immediate expansion.
pub mod shifts;

use self::arithmetic::add_with_carry;

/// Data-processing opcode, bits 21-24.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// `rn & op2`
    And = 0x0,
    /// `rn ^ op2`
    Eor = 0x1,
    /// `rn - op2`
    Sub = 0x2,
    /// `op2 - rn`
    Rsb = 0x3,
    /// `rn + op2`
    Add = 0x4,
    /// `rn + op2 + C`
    Adc = 0x5,
    /// `rn - op2 - !C`
    Sbc = 0x6,
    /// `op2 - rn - !C`
    Rsc = 0x7,
    /// AND, flags only.
    Tst = 0x8,
    /// EOR, flags only.
    Teq = 0x9,
    /// SUB, flags only.
    Cmp = 0xa,
    /// ADD, flags only.
    Cmn = 0xb,
    /// `rn | op2`
    Orr = 0xc,
    /// `op2`
    Mov = 0xd,
    /// `rn & !op2`
    Bic = 0xe,
    /// `!op2`
    Mvn = 0xf,
}

impl AluOp {
    /// Decodes the opcode from its four-bit field.
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0xf {
            0x0 => Self::And,
            0x1 => Self::Eor,
            0x2 => Self::Sub,
            0x3 => Self::Rsb,
            0x4 => Self::Add,
            0x5 => Self::Adc,
            0x6 => Self::Sbc,
            0x7 => Self::Rsc,
            0x8 => Self::Tst,
            0x9 => Self::Teq,
            0xa => Self::Cmp,
            0xb => Self::Cmn,
            0xc => Self::Orr,
            0xd => Self::Mov,
            0xe => Self::Bic,
            _ => Self::Mvn,
        }
    }

    /// Returns `true` for TST, TEQ, CMP and CMN, which never write Rd.
    pub const fn is_test(self) -> bool {
        matches!(self, Self::Tst | Self::Teq | Self::Cmp | Self::Cmn)
    }

    /// Returns the assembler mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Eor => "EOR",
            Self::Sub => "SUB",
            Self::Rsb => "RSB",
            Self::Add => "ADD",
            Self::Adc => "ADC",
            Self::Sbc => "SBC",
            Self::Rsc => "RSC",
            Self::Tst => "TST",
            Self::Teq => "TEQ",
            Self::Cmp => "CMP",
            Self::Cmn => "CMN",
            Self::Orr => "ORR",
            Self::Mov => "MOV",
            Self::Bic => "BIC",
            Self::Mvn => "MVN",
        }
    }
}

/// Result of a data-processing operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluResult {
    /// The 32-bit result.
    pub value: u32,
    /// New C flag: the adder carry, or the shifter carry for logical ops.
    pub carry: bool,
    /// New V flag, or `None` when the opcode leaves V alone.
    pub overflow: Option<bool>,
}

/// Integer ALU for data-processing instructions.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes a data-processing opcode.
    ///
    /// # Arguments
    ///
    /// * `op` - The opcode.
    /// * `rn` - First operand.
    /// * `op2` - Shifted or immediate second operand.
    /// * `shifter_carry` - Carry-out of the barrel shifter (or the C flag for immediates).
    /// * `carry` - The current C flag, consumed by ADC, SBC and RSC.
    ///
    /// # Returns
    ///
    /// The result together with the flags it would set.
    pub fn execute(op: AluOp, rn: u32, op2: u32, shifter_carry: bool, carry: bool) -> AluResult {
        let logical = |value| AluResult {
            value,
            carry: shifter_carry,
            overflow: None,
        };
        let sum = match op {
            AluOp::And | AluOp::Tst => return logical(rn & op2),
            AluOp::Eor | AluOp::Teq => return logical(rn ^ op2),
            AluOp::Orr => return logical(rn | op2),
            AluOp::Mov => return logical(op2),
            AluOp::Bic => return logical(rn & !op2),
            AluOp::Mvn => return logical(!op2),
            AluOp::Sub | AluOp::Cmp => add_with_carry(rn, !op2, true),
            AluOp::Rsb => add_with_carry(op2, !rn, true),
            AluOp::Add | AluOp::Cmn => add_with_carry(rn, op2, false),
            AluOp::Adc => add_with_carry(rn, op2, carry),
            AluOp::Sbc => add_with_carry(rn, !op2, carry),
            AluOp::Rsc => add_with_carry(op2, !rn, carry),
        };
        AluResult {
            value: sum.value,
            carry: sum.carry,
            overflow: Some(sum.overflow),
        }
    }
}
