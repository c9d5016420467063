use std::fmt;

use crate::operand::IrOperand;

/// The closed IR instruction set.
///
/// Arithmetic and bitwise instructions take two sources and a destination;
/// `Bsh` shifts left for positive amounts and right for negative ones.
/// `Str` copies a value into a register (truncating to the destination
/// width), `Ldm`/`Stm` move values between registers and memory, `Bisz`
/// tests for zero, and `Jcc` jumps when its first operand is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrMnemonic {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Bsh,
    And,
    Or,
    Xor,
    /// Load from memory: `ldm (addr, -, dst)`.
    Ldm,
    /// Store to memory: `stm (value, -, addr)`.
    Stm,
    /// Register-to-register copy: `str (value, -, dst)`.
    Str,
    /// Zero test: 1 if the source is zero, else 0.
    Bisz,
    /// Conditional jump: `jcc (cond, -, target)`.
    Jcc,
    Undef,
    Unkn,
    Nop,
}

impl IrMnemonic {
    pub fn name(&self) -> &'static str {
        use IrMnemonic::*;
        match self {
            Add => "add",
            Sub => "sub",
            Mul => "mul",
            Div => "div",
            Mod => "mod",
            Bsh => "bsh",
            And => "and",
            Or => "or",
            Xor => "xor",
            Ldm => "ldm",
            Stm => "stm",
            Str => "str",
            Bisz => "bisz",
            Jcc => "jcc",
            Undef => "undef",
            Unkn => "unkn",
            Nop => "nop",
        }
    }
}

/// Longest IR sequence one native instruction may lower to: the low 8
/// address bits index into the sequence.
pub const MAX_SEQUENCE_LEN: usize = 255;

/// Pack a native byte address and a sub-instruction index into an IR
/// address. High bits beyond 64 are truncated.
pub fn encode_address(native_address: u64, sub_index: u8) -> u64 {
    (native_address << 8) | u64::from(sub_index)
}

/// One IR instruction: mnemonic, up to three operands, and its address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrInstruction {
    pub mnemonic: IrMnemonic,
    pub operands: [IrOperand; 3],
    /// `(native_address << 8) | sub_index`.
    pub address: u64,
}

impl IrInstruction {
    pub fn new(mnemonic: IrMnemonic, operands: [IrOperand; 3]) -> Self {
        IrInstruction {
            mnemonic,
            operands,
            address: 0,
        }
    }

    pub fn add(a: IrOperand, b: IrOperand, dst: IrOperand) -> Self {
        IrInstruction::new(IrMnemonic::Add, [a, b, dst])
    }

    pub fn sub(a: IrOperand, b: IrOperand, dst: IrOperand) -> Self {
        IrInstruction::new(IrMnemonic::Sub, [a, b, dst])
    }

    pub fn mul(a: IrOperand, b: IrOperand, dst: IrOperand) -> Self {
        IrInstruction::new(IrMnemonic::Mul, [a, b, dst])
    }

    pub fn bsh(value: IrOperand, amount: IrOperand, dst: IrOperand) -> Self {
        IrInstruction::new(IrMnemonic::Bsh, [value, amount, dst])
    }

    pub fn and(a: IrOperand, b: IrOperand, dst: IrOperand) -> Self {
        IrInstruction::new(IrMnemonic::And, [a, b, dst])
    }

    pub fn or(a: IrOperand, b: IrOperand, dst: IrOperand) -> Self {
        IrInstruction::new(IrMnemonic::Or, [a, b, dst])
    }

    pub fn xor(a: IrOperand, b: IrOperand, dst: IrOperand) -> Self {
        IrInstruction::new(IrMnemonic::Xor, [a, b, dst])
    }

    pub fn ldm(addr: IrOperand, dst: IrOperand) -> Self {
        IrInstruction::new(IrMnemonic::Ldm, [addr, IrOperand::Empty, dst])
    }

    pub fn stm(value: IrOperand, addr: IrOperand) -> Self {
        IrInstruction::new(IrMnemonic::Stm, [value, IrOperand::Empty, addr])
    }

    pub fn str(value: IrOperand, dst: IrOperand) -> Self {
        IrInstruction::new(IrMnemonic::Str, [value, IrOperand::Empty, dst])
    }

    pub fn bisz(value: IrOperand, dst: IrOperand) -> Self {
        IrInstruction::new(IrMnemonic::Bisz, [value, IrOperand::Empty, dst])
    }

    pub fn jcc(cond: IrOperand, target: IrOperand) -> Self {
        IrInstruction::new(IrMnemonic::Jcc, [cond, IrOperand::Empty, target])
    }

    pub fn unkn() -> Self {
        IrInstruction::new(
            IrMnemonic::Unkn,
            [IrOperand::Empty, IrOperand::Empty, IrOperand::Empty],
        )
    }

    pub fn nop() -> Self {
        IrInstruction::new(
            IrMnemonic::Nop,
            [IrOperand::Empty, IrOperand::Empty, IrOperand::Empty],
        )
    }

    /// Byte address of the native instruction this was lowered from.
    pub fn native_address(&self) -> u64 {
        self.address >> 8
    }

    /// Position within the native instruction's IR sequence.
    pub fn sub_index(&self) -> u8 {
        (self.address & 0xff) as u8
    }
}

impl fmt::Display for IrInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#x}.{:02x} {:<5} ({}, {}, {})",
            self.native_address(),
            self.sub_index(),
            self.mnemonic.name(),
            self.operands[0],
            self.operands[1],
            self.operands[2],
        )
    }
}
