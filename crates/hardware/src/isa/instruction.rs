//! Instruction encoding and field extraction.
//!
//! Provides bit extraction helpers for the fields shared by the ARMv2
//! instruction formats. Every format keeps the condition in bits 28-31;
//! the register fields sit at fixed positions across formats.

/// Bit mask for a four-bit register field.
pub const REG_MASK: u32 = 0xf;
/// Bit mask for the 12-bit single transfer immediate offset.
pub const OFFSET12_MASK: u32 = 0xfff;
/// Bit mask for the 24-bit branch offset and SWI comment field.
pub const OFFSET24_MASK: u32 = 0x00ff_ffff;
/// Bit mask for the block transfer register list.
pub const REGISTER_LIST_MASK: u32 = 0xffff;

/// I: second operand is an immediate (data processing) or a register (transfers).
pub const BIT_IMMEDIATE: u32 = 25;
/// P: pre-index.
pub const BIT_PRE_INDEX: u32 = 24;
/// U: add the offset.
pub const BIT_UP: u32 = 23;
/// B: byte transfer. Also the S bit of block transfers.
pub const BIT_BYTE: u32 = 22;
/// W: write the address back to the base.
pub const BIT_WRITE_BACK: u32 = 21;
/// L: load. Also the S bit of data processing and multiply.
pub const BIT_LOAD: u32 = 20;
/// Register-specified shift amount.
pub const BIT_SHIFT_BY_REGISTER: u32 = 4;
/// Branch with link.
pub const BIT_LINK: u32 = 24;
/// Multiply-accumulate.
pub const BIT_ACCUMULATE: u32 = 21;

/// Trait for extracting instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Returns bit `n`.
    fn bit(&self, n: u32) -> bool;

    /// Extracts the condition field (bits 28-31).
    fn cond(&self) -> u32;

    /// Extracts the first operand / base register field (bits 16-19).
    fn rn(&self) -> usize;

    /// Extracts the destination register field (bits 12-15).
    fn rd(&self) -> usize;

    /// Extracts the shift register field (bits 8-11).
    fn rs(&self) -> usize;

    /// Extracts the second operand register field (bits 0-3).
    fn rm(&self) -> usize;

    /// Extracts the data processing opcode (bits 21-24).
    fn alu_opcode(&self) -> u32;

    /// Returns `true` if the S bit (bit 20) asks for a flag update.
    fn set_flags(&self) -> bool;

    /// Extracts the five-bit immediate shift amount (bits 7-11).
    fn shift_immediate(&self) -> u32;

    /// Extracts the shift type (bits 5-6).
    fn shift_type(&self) -> u32;

    /// Extracts the 24-bit branch offset, sign extended and scaled to bytes.
    fn branch_offset(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn bit(&self, n: u32) -> bool {
        (self >> n) & 1 != 0
    }

    #[inline(always)]
    fn cond(&self) -> u32 {
        self >> 28
    }

    #[inline(always)]
    fn rn(&self) -> usize {
        ((self >> 16) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 12) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs(&self) -> usize {
        ((self >> 8) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rm(&self) -> usize {
        (self & REG_MASK) as usize
    }

    #[inline(always)]
    fn alu_opcode(&self) -> u32 {
        (self >> 21) & 0xf
    }

    #[inline(always)]
    fn set_flags(&self) -> bool {
        self.bit(BIT_LOAD)
    }

    #[inline(always)]
    fn shift_immediate(&self) -> u32 {
        (self >> 7) & 0x1f
    }

    #[inline(always)]
    fn shift_type(&self) -> u32 {
        (self >> 5) & 3
    }

    /// Shifts the field to the top of the word and arithmetic-shifts it back
    /// down by six, which sign extends and multiplies by four in one step.
    #[inline(always)]
    fn branch_offset(&self) -> u32 {
        (((self & OFFSET24_MASK) << 8) as i32 >> 6) as u32
    }
}

/// Fields of a coprocessor data operation or register transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoprocessorFields {
    /// Coprocessor register operand, bits 0-3.
    pub crm: usize,
    /// Auxiliary field, bits 5-7.
    pub aux: usize,
    /// Coprocessor number, bits 8-11.
    pub cp_num: u32,
    /// Destination register (CR or ARM register), bits 12-15.
    pub crd: usize,
    /// Coprocessor register operand, bits 16-19.
    pub crn: usize,
    /// Coprocessor opcode, bits 20-23.
    pub opcode: u32,
}

impl CoprocessorFields {
    /// Splits a coprocessor instruction into its fields.
    pub const fn decode(word: u32) -> Self {
        Self {
            crm: (word & REG_MASK) as usize,
            aux: ((word >> 5) & 7) as usize,
            cp_num: (word >> 8) & REG_MASK,
            crd: ((word >> 12) & REG_MASK) as usize,
            crn: ((word >> 16) & REG_MASK) as usize,
            opcode: (word >> 20) & REG_MASK,
        }
    }
}
