mod common;

use armlift_arch::{ArmMnemonic, Condition};
use armlift_ir::{IrMnemonic, IrOperand};
use common::*;

const GUARDED: [Condition; 14] = [
    Condition::Eq,
    Condition::Ne,
    Condition::Cs,
    Condition::Cc,
    Condition::Mi,
    Condition::Pl,
    Condition::Vs,
    Condition::Vc,
    Condition::Hi,
    Condition::Ls,
    Condition::Ge,
    Condition::Lt,
    Condition::Gt,
    Condition::Le,
];

#[test]
fn always_emits_no_guard() {
    let seq = translate_one(insn(ArmMnemonic::Mov, vec![reg("r0"), reg("r1")], 0x10));
    assert!(seq.iter().all(|instr| instr.mnemonic != IrMnemonic::Jcc));
    assert_eq!(seq[0].address, 0x10 << 8);
}

#[test]
fn every_guard_jumps_past_the_body_when_the_condition_fails() {
    for condition in GUARDED {
        let mut instruction = insn(ArmMnemonic::Mov, vec![reg("r0"), reg("r1")], 0x10);
        instruction.condition = condition;
        let seq = translate_one(instruction);

        let jumps: Vec<usize> = seq
            .iter()
            .enumerate()
            .filter(|(_, instr)| instr.mnemonic == IrMnemonic::Jcc)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(jumps.len(), 1, "{condition:?}: exactly one guard jump");
        let guard = jumps[0];

        let body = seq
            .iter()
            .position(|instr| instr.mnemonic == IrMnemonic::Str)
            .expect("body store");
        assert!(guard < body, "{condition:?}: guard precedes the body");
        assert_eq!(body, seq.len() - 1, "{condition:?}: body is last");

        match &seq[guard].operands[2] {
            IrOperand::Imm(target) => {
                // The skip label sits at the very end: one past the body.
                assert_eq!(
                    target.value() as u64,
                    (0x10 << 8) | seq.len() as u64,
                    "{condition:?}: guard target"
                );
                assert_eq!(target.size(), 40);
            }
            other => panic!("{condition:?}: expected concrete target, got {other:?}"),
        }
        assert_gapless(&seq, 0x10);
    }
}

#[test]
fn eq_guard_negates_the_zero_flag() {
    let mut instruction = insn(ArmMnemonic::Mov, vec![reg("r0"), reg("r1")], 0);
    instruction.condition = Condition::Eq;
    let seq = translate_one(instruction);

    assert_eq!(
        mnemonics(&seq),
        [IrMnemonic::Xor, IrMnemonic::Jcc, IrMnemonic::Str]
    );
    // EQ holds on Z; the guard jumps on ¬Z.
    assert_eq!(seq[0].operands[0], IrOperand::reg("zf", 1));
    assert_eq!(seq[0].operands[1], IrOperand::imm(1, 1));
    assert_eq!(seq[1].operands[0], seq[0].operands[2]);
}

#[test]
fn ne_guard_negates_twice() {
    let mut instruction = insn(ArmMnemonic::Mov, vec![reg("r0"), reg("r1")], 0);
    instruction.condition = Condition::Ne;
    let seq = translate_one(instruction);
    assert_eq!(
        mnemonics(&seq),
        [
            IrMnemonic::Xor,
            IrMnemonic::Xor,
            IrMnemonic::Jcc,
            IrMnemonic::Str,
        ]
    );
}

#[test]
fn ge_guard_compares_sign_and_overflow() {
    let mut instruction = insn(ArmMnemonic::Mov, vec![reg("r0"), reg("r1")], 0);
    instruction.condition = Condition::Ge;
    let seq = translate_one(instruction);

    // N == V, then the negation, then the guard.
    assert_eq!(seq[0].mnemonic, IrMnemonic::Xor);
    assert_eq!(seq[0].operands[0], IrOperand::reg("nf", 1));
    assert_eq!(seq[0].operands[1], IrOperand::reg("vf", 1));
    assert_eq!(
        seq.iter()
            .filter(|instr| instr.mnemonic == IrMnemonic::Jcc)
            .count(),
        1
    );
}
