//! Barrel shifter.
//!
//! Implements the four shift types applied to the second operand of data
//! processing and register-offset transfer instructions, together with the
//! shifter carry-out.
//!
//! Immediate amounts are 0-31, where an amount of 0 selects the special forms
//! `LSR #32`, `ASR #32` and `RRX`. Register amounts are the low byte of Rs;
//! an amount of 0 passes the operand and carry through untouched.

/// Shift type, bits 5-6 of the operand field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShiftKind {
    /// Logical shift left.
    Lsl = 0,
    /// Logical shift right.
    Lsr = 1,
    /// Arithmetic shift right.
    Asr = 2,
    /// Rotate right.
    Ror = 3,
}

impl ShiftKind {
    /// Decodes the shift type from its two-bit field.
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => Self::Lsl,
            1 => Self::Lsr,
            2 => Self::Asr,
            _ => Self::Ror,
        }
    }
}

/// Source of a shift amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShiftAmount {
    /// Five-bit amount encoded in the instruction.
    Immediate(u32),
    /// Low byte of a register.
    Register(u32),
}

const SIGN: u32 = 0x8000_0000;

const fn bit(value: u32, n: u32) -> bool {
    (value >> n) & 1 != 0
}

/// Applies a shift and returns the result with the shifter carry-out.
///
/// # Arguments
///
/// * `kind` - The shift type.
/// * `value` - The operand to shift.
/// * `amount` - Where the amount came from, and its value.
/// * `carry_in` - The current C flag.
///
/// # Returns
///
/// `(result, carry_out)`.
pub const fn barrel_shift(
    kind: ShiftKind,
    value: u32,
    amount: ShiftAmount,
    carry_in: bool,
) -> (u32, bool) {
    let amount = match amount {
        ShiftAmount::Immediate(imm) => {
            let imm = imm & 0x1f;
            if imm == 0 {
                return match kind {
                    ShiftKind::Lsl => (value, carry_in),
                    ShiftKind::Lsr | ShiftKind::Asr => by_amount(kind, value, 32),
                    ShiftKind::Ror => ((value >> 1) | ((carry_in as u32) << 31), bit(value, 0)),
                };
            }
            imm
        }
        ShiftAmount::Register(reg) => {
            let reg = reg & 0xff;
            if reg == 0 {
                return (value, carry_in);
            }
            reg
        }
    };
    by_amount(kind, value, amount)
}

/// Shifts by a non-zero amount of up to 255.
const fn by_amount(kind: ShiftKind, value: u32, amount: u32) -> (u32, bool) {
    match kind {
        ShiftKind::Lsl => {
            if amount < 32 {
                (value << amount, bit(value, 32 - amount))
            } else if amount == 32 {
                (0, bit(value, 0))
            } else {
                (0, false)
            }
        }
        ShiftKind::Lsr => {
            if amount < 32 {
                (value >> amount, bit(value, amount - 1))
            } else if amount == 32 {
                (0, bit(value, 31))
            } else {
                (0, false)
            }
        }
        ShiftKind::Asr => {
            if amount < 32 {
                (((value as i32) >> amount) as u32, bit(value, amount - 1))
            } else if value & SIGN != 0 {
                (u32::MAX, true)
            } else {
                (0, false)
            }
        }
        ShiftKind::Ror => {
            let rotate = amount & 0x1f;
            if rotate == 0 {
                (value, bit(value, 31))
            } else {
                (value.rotate_right(rotate), bit(value, rotate - 1))
            }
        }
    }
}

/// Expands an 8-bit immediate rotated right by twice its 4-bit rotate field.
///
/// The shifter carry is not affected by immediate operands.
pub const fn rotated_immediate(field: u32) -> u32 {
    let rotate = (field >> 7) & 0x1e;
    (field & 0xff).rotate_right(rotate)
}
