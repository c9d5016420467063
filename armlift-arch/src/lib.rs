//! Decoded ARM instruction model.
//!
//! This crate defines the instruction and operand value types produced by an
//! ARM decoder, together with the architecture metadata (word size, operand
//! and address widths per mode) that the IR lifter consults. The types here
//! are plain data: decoding raw bytes into them is a separate concern.

pub mod condition;
pub mod info;
pub mod instruction;
pub mod mnemonic;
pub mod operand;

pub use condition::Condition;
pub use info::{ArchInfo, ArchMode};
pub use instruction::{ArmInstruction, TransferMode};
pub use mnemonic::{ArmMnemonic, MnemonicFlags};
pub use operand::{
    ArmImmediateOperand, ArmMemoryOperand, ArmOperand, ArmRegisterListOperand,
    ArmRegisterOperand, ArmShiftedOperand, Displacement, IndexMode, RegisterRange, ShiftAmount,
    ShiftKind,
};
