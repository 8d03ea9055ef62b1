//! ARMv2 Instruction Classifier.
//!
//! This module sorts a 32-bit instruction word into the handler family that
//! executes it. Classification looks at bits 25-27 and a handful of
//! discriminating bits; field extraction is left to the handlers.
//!
//! | Bits 26-27 | Class                                                    |
//! |------------|----------------------------------------------------------|
//! | 0          | data processing, or multiply / swap when bits 4-7 = 1001 |
//! |            | and bit 25 is clear                                      |
//! | 1          | single transfer; undefined when bits 25 and 4 are set    |
//! | 2          | block transfer, or branch when bit 25 is set             |
//! | 3          | SWI, coprocessor transfer, register transfer, data op    |

use std::fmt;

use crate::isa::instruction::{BIT_IMMEDIATE, BIT_PRE_INDEX};

/// Mask selecting bit 25 and bits 4-7, which read 0 and 1001 for multiply and swap.
const MUL_SWAP_MASK: u32 = 0x0200_00f0;
const MUL_SWAP_PATTERN: u32 = 0x90;

/// Bits 24-27 all set marks a software interrupt.
const SWI_MASK: u32 = 0x0f00_0000;

/// Handler family of an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstructionClass {
    /// AND through MVN.
    DataProcessing,
    /// MUL and MLA.
    Multiply,
    /// SWP and SWPB.
    Swap,
    /// LDR, STR and their byte forms.
    SingleTransfer,
    /// Register-shifted single transfer encoding.
    Undefined,
    /// LDM and STM.
    BlockTransfer,
    /// B and BL.
    Branch,
    /// SWI.
    SoftwareInterrupt,
    /// LDC and STC.
    CoprocessorTransfer,
    /// MRC and MCR.
    CoprocessorRegister,
    /// CDP.
    CoprocessorData,
}

impl InstructionClass {
    /// Returns a short name for traces.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DataProcessing => "ALU",
            Self::Multiply => "MUL",
            Self::Swap => "SWP",
            Self::SingleTransfer => "LDR/STR",
            Self::Undefined => "UND",
            Self::BlockTransfer => "LDM/STM",
            Self::Branch => "B",
            Self::SoftwareInterrupt => "SWI",
            Self::CoprocessorTransfer => "LDC/STC",
            Self::CoprocessorRegister => "MRC/MCR",
            Self::CoprocessorData => "CDP",
        }
    }
}

impl fmt::Display for InstructionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies an instruction word.
///
/// # Arguments
///
/// * `word` - The instruction as fetched; the condition field is ignored.
///
/// # Returns
///
/// The handler family that executes the instruction.
pub const fn classify(word: u32) -> InstructionClass {
    match (word >> 26) & 3 {
        0 => {
            if word & MUL_SWAP_MASK == MUL_SWAP_PATTERN {
                if (word >> BIT_PRE_INDEX) & 1 != 0 {
                    InstructionClass::Swap
                } else {
                    InstructionClass::Multiply
                }
            } else {
                InstructionClass::DataProcessing
            }
        }
        1 => {
            if (word >> BIT_IMMEDIATE) & 1 != 0 && word & 0x10 != 0 {
                InstructionClass::Undefined
            } else {
                InstructionClass::SingleTransfer
            }
        }
        2 => {
            if (word >> BIT_IMMEDIATE) & 1 != 0 {
                InstructionClass::Branch
            } else {
                InstructionClass::BlockTransfer
            }
        }
        _ => {
            if word & SWI_MASK == SWI_MASK {
                InstructionClass::SoftwareInterrupt
            } else if (word >> BIT_IMMEDIATE) & 1 == 0 {
                InstructionClass::CoprocessorTransfer
            } else if word & 0x10 != 0 {
                InstructionClass::CoprocessorRegister
            } else {
                InstructionClass::CoprocessorData
            }
        }
    }
}

