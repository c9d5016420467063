mod common;

use armlift_arch::{ArchMode, ArmInstruction, ArmMnemonic, ArmOperand};
use armlift_ir::{IrInstruction, IrMnemonic, IrOperand};
use armlift_lifter::ArmTranslator;
use common::*;

fn temp_names(seq: &[IrInstruction]) -> Vec<String> {
    let mut names = Vec::new();
    for instr in seq {
        for operand in &instr.operands {
            if let IrOperand::Reg(reg) = operand {
                if reg.name.starts_with('t') && !names.contains(&reg.name) {
                    names.push(reg.name.clone());
                }
            }
        }
    }
    names
}

#[test]
fn unknown_mnemonic_degrades_to_a_single_undefined() {
    init_logs();
    let mut instruction = insn(
        ArmMnemonic::Mul,
        vec![reg("r0"), reg("r1"), reg("r2")],
        0x44,
    );
    instruction.bytes = vec![0x92, 0x02, 0x00, 0xe0];
    let seq = translator().translate(&mut instruction);
    assert_eq!(mnemonics(&seq), [IrMnemonic::Unkn]);
    assert_eq!(seq[0].address, 0x44 << 8);
    assert_eq!(seq[0].sub_index(), 0);
}

#[test]
fn unsupported_shift_kind_degrades_without_partial_output() {
    use armlift_arch::{
        ArmImmediateOperand, ArmRegisterOperand, ArmShiftedOperand, ShiftAmount, ShiftKind,
    };
    let rotated = ArmOperand::Shifted(ArmShiftedOperand {
        base: ArmRegisterOperand::new("r2", 32),
        kind: ShiftKind::Ror,
        amount: Some(ShiftAmount::Imm(ArmImmediateOperand { value: 1, size: 32 })),
        size: 32,
    });
    let seq = translate_one(insn(ArmMnemonic::Mov, vec![reg("r0"), rotated], 0x48));
    assert_eq!(mnemonics(&seq), [IrMnemonic::Unkn]);
}

#[test]
fn translation_continues_after_an_unsupported_instruction() {
    let mut lifter = translator();
    let mut bad = insn(ArmMnemonic::Swi, vec![imm(0)], 0);
    assert_eq!(mnemonics(&lifter.translate(&mut bad)), [IrMnemonic::Unkn]);

    let mut good = insn(ArmMnemonic::Mov, vec![reg("r0"), reg("r1")], 4);
    assert_eq!(mnemonics(&lifter.translate(&mut good)), [IrMnemonic::Str]);
}

#[test]
fn temporaries_stay_unique_across_a_stream() {
    let mut lifter = translator();
    let mut first = insn(ArmMnemonic::Add, vec![reg("r0"), reg("r1"), reg("r2")], 0);
    let mut second = insn(ArmMnemonic::Add, vec![reg("r3"), reg("r4"), reg("r5")], 4);
    let first_temps = temp_names(&lifter.translate(&mut first));
    let second_temps = temp_names(&lifter.translate(&mut second));

    assert!(!first_temps.is_empty());
    assert!(first_temps.iter().all(|name| !second_temps.contains(name)));
}

#[test]
fn reset_restarts_temporary_names() {
    let mut lifter = translator();
    let mut instruction = insn(ArmMnemonic::Add, vec![reg("r0"), reg("r1"), reg("r2")], 0);
    let before = temp_names(&lifter.translate(&mut instruction.clone()));
    lifter.reset();
    let after = temp_names(&lifter.translate(&mut instruction));
    assert_eq!(before, after);
}

#[test]
fn sixty_four_bit_mode_widens_words_and_temporaries() {
    let mut lifter = ArmTranslator::new(ArchMode::Arm64);

    let mut add = ArmInstruction::new(
        ArmMnemonic::Add,
        vec![
            ArmOperand::reg("x0", 64),
            ArmOperand::reg("x1", 64),
            ArmOperand::reg("x2", 64),
        ],
        0,
    );
    let seq = lifter.translate(&mut add);
    assert_eq!(seq[0].mnemonic, IrMnemonic::Add);
    assert_eq!(seq[0].operands[2].size(), 128);

    let mut call = ArmInstruction::new(ArmMnemonic::Bl, vec![ArmOperand::imm(0x100, 64)], 0);
    let seq = lifter.translate(&mut call);
    assert_eq!(seq[0].operands[1], IrOperand::imm(8, 64));
    assert_eq!(seq[0].operands[2], IrOperand::reg("lr", 64));
    match &seq[1].operands[2] {
        IrOperand::Imm(target) => assert_eq!(target.size(), 72),
        other => panic!("expected immediate target, got {other:?}"),
    }
}

#[test]
fn yaml_fixture_translates_end_to_end() {
    let yaml = r#"
mnemonic: ldr
address: 8192
operands:
  - !reg
    name: r0
    size: 32
  - !mem
    base:
      name: r1
      size: 32
    displacement: !imm
      value: 4
      size: 32
    index_mode: offset
    size: 32
"#;
    let mut instruction: ArmInstruction = serde_yaml::from_str(yaml).expect("fixture parses");
    let seq = translator().translate(&mut instruction);
    assert_eq!(
        mnemonics(&seq),
        [IrMnemonic::Add, IrMnemonic::Ldm, IrMnemonic::Str]
    );
    assert_gapless(&seq, 8192);
}
