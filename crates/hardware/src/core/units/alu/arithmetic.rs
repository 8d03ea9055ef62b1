//! ALU adder.
//!
//! Every arithmetic opcode reduces to one 33-bit addition of two operands and
//! a carry-in. Subtractions invert one operand: `SUB` is `rn + !op2 + 1` and
//! `SBC` is `rn + !op2 + C`, so C reads as "no borrow".

const SIGN: u32 = 0x8000_0000;

/// Result of one pass through the adder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sum {
    /// Low 32 bits of the sum.
    pub value: u32,
    /// Bit 32 of the sum.
    pub carry: bool,
    /// Signed overflow of the two addends.
    pub overflow: bool,
}

/// Adds two operands and a carry through a 64-bit intermediate.
///
/// Overflow follows the two's-complement rule: both addends share a sign
/// that the result does not.
pub const fn add_with_carry(a: u32, b: u32, carry_in: bool) -> Sum {
    let wide = a as u64 + b as u64 + carry_in as u64;
    let value = wide as u32;
    Sum {
        value,
        carry: (wide >> 32) & 1 != 0,
        overflow: (a ^ b ^ SIGN) & (a ^ value) & SIGN != 0,
    }
}
