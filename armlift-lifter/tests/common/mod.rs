#![allow(dead_code)]

use armlift_arch::{ArchMode, ArmInstruction, ArmMnemonic, ArmOperand};
use armlift_ir::{IrInstruction, IrMnemonic, IrOperand};
use armlift_lifter::ArmTranslator;

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn translator() -> ArmTranslator {
    ArmTranslator::new(ArchMode::Arm32)
}

pub fn reg(name: &str) -> ArmOperand {
    ArmOperand::reg(name, 32)
}

pub fn imm(value: i64) -> ArmOperand {
    ArmOperand::imm(value, 32)
}

pub fn insn(mnemonic: ArmMnemonic, operands: Vec<ArmOperand>, address: u64) -> ArmInstruction {
    ArmInstruction::new(mnemonic, operands, address)
}

/// Translate with a fresh 32-bit translator.
pub fn translate_one(mut instruction: ArmInstruction) -> Vec<IrInstruction> {
    translator().translate(&mut instruction)
}

pub fn mnemonics(sequence: &[IrInstruction]) -> Vec<IrMnemonic> {
    sequence.iter().map(|instr| instr.mnemonic).collect()
}

/// Index of the first instruction whose destination slot is the named
/// register.
pub fn find_write_to(sequence: &[IrInstruction], name: &str) -> Option<usize> {
    sequence.iter().position(|instr| writes_to(instr, name))
}

pub fn writes_to(instr: &IrInstruction, name: &str) -> bool {
    matches!(&instr.operands[2], IrOperand::Reg(reg) if reg.name == name)
}

/// Addresses must be `(native << 8) | i` for consecutive `i` from zero.
pub fn assert_gapless(sequence: &[IrInstruction], native_address: u64) {
    for (i, instr) in sequence.iter().enumerate() {
        assert_eq!(
            instr.address,
            (native_address << 8) | i as u64,
            "instruction {i} has address {:#x}",
            instr.address
        );
    }
}
