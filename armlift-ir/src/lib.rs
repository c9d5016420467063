//! The intermediate representation the lifters emit.
//!
//! A reduced, architecture-neutral micro-instruction language: every
//! instruction has at most three operands, all side effects are explicit,
//! and each native instruction lowers to an independent, consecutively
//! addressed sequence.

pub mod instruction;
pub mod operand;

pub use instruction::{encode_address, IrInstruction, IrMnemonic, MAX_SEQUENCE_LEN};
pub use operand::{IrImmediate, IrOperand, IrRegister};
