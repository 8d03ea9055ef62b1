//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the ARMv2 instruction encoding: field extraction, the condition
//! table and the classifier that routes a word to its handler family.

/// Condition codes and their evaluation.
pub mod condition;

/// Instruction classification.
pub mod decode;

/// Instruction field extraction utilities.
pub mod instruction;

pub use condition::Condition;
pub use decode::{InstructionClass, classify};
pub use instruction::{CoprocessorFields, InstructionBits};
