//! Per-mnemonic translators and the dispatching [`ArmTranslator`].

use armlift_arch::{
    ArchInfo, ArchMode, ArmInstruction, ArmMnemonic, ArmOperand, ArmRegisterOperand,
    MnemonicFlags, TransferMode,
};
use armlift_ir::{encode_address, IrImmediate, IrInstruction, IrMnemonic, IrOperand, IrRegister};

use crate::builder::TranslationBuilder;
use crate::error::Unsupported;
use crate::flags::{
    emit_condition_guard, update_flags_add, update_flags_logical, update_flags_sub,
};
use crate::namer::TempNamer;

type Handler = fn(&mut TranslationBuilder<'_>, &mut ArmInstruction) -> Result<(), Unsupported>;

/// Closed mnemonic → translator mapping. Anything unmapped degrades to the
/// undefined IR instruction.
fn lookup(mnemonic: ArmMnemonic) -> Option<Handler> {
    use ArmMnemonic::*;
    Some(match mnemonic {
        Mov => translate_mov,
        And => translate_and,
        Orr => translate_orr,
        Eor => translate_eor,
        Ldr => translate_ldr,
        Str => translate_str,
        Add => translate_add,
        Sub => translate_sub,
        Cmp => translate_cmp,
        Cmn => translate_cmn,
        Ldm => translate_ldm,
        Stm => translate_stm,
        Push => translate_push,
        Pop => translate_pop,
        B => translate_b,
        Bl => translate_bl,
        _ => return None,
    })
}

/// Lowers decoded ARM instructions to IR.
///
/// One instance owns the temporary-name supply, so temporaries stay unique
/// across every instruction it translates. Use one instance per worker;
/// nothing here is safe to share between concurrent callers.
pub struct ArmTranslator {
    arch: ArchInfo,
    temps: TempNamer,
}

impl ArmTranslator {
    pub fn new(mode: ArchMode) -> Self {
        ArmTranslator {
            arch: ArchInfo::new(mode),
            temps: TempNamer::new(),
        }
    }

    /// Lower one instruction into its addressed IR sequence.
    ///
    /// Never fails for unsupported input: the result degrades to a single
    /// undefined instruction and a diagnostic is logged. Translation may
    /// normalize the instruction's transfer-mode tag in place (PUSH/POP
    /// also rewrite their operands into LDM/STM shape); pass a clone to
    /// keep the original pristine. Panics only on malformed input that
    /// indicates a decoder bug.
    pub fn translate(&mut self, instruction: &mut ArmInstruction) -> Vec<IrInstruction> {
        match self.translate_checked(instruction) {
            Ok(sequence) => sequence,
            Err(reason) => {
                log::warn!(
                    "instruction not supported: {} ({} [{}]): {}",
                    instruction.mnemonic.name(),
                    instruction,
                    hex_bytes(&instruction.bytes),
                    reason
                );
                let mut undefined = IrInstruction::unkn();
                undefined.address = encode_address(instruction.address, 0);
                vec![undefined]
            }
        }
    }

    fn translate_checked(
        &mut self,
        instruction: &mut ArmInstruction,
    ) -> Result<Vec<IrInstruction>, Unsupported> {
        let handler =
            lookup(instruction.mnemonic).ok_or(Unsupported::Mnemonic(instruction.mnemonic))?;

        let mut tb = TranslationBuilder::new(&mut self.temps, self.arch);
        let skip = tb.label("condition_not_met");
        emit_condition_guard(&mut tb, instruction.condition, &skip);
        handler(&mut tb, instruction)?;
        tb.place(skip);
        Ok(tb.finish(instruction.address))
    }

    /// Restart the temporary-name supply. Call between independent
    /// translation runs if name collisions across runs matter.
    pub fn reset(&mut self) {
        self.temps.reset();
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// --- data movement ----------------------------------------------------------

fn translate_mov(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    let value = tb.read(&insn.operands[1])?;
    tb.write(&insn.operands[0], value.clone())?;
    if insn.update_flags {
        update_flags_logical(tb, &insn.operands[1], &value, &value)?;
    }
    Ok(())
}

fn translate_ldr(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    let value = tb.read(&insn.operands[1])?;
    tb.write(&insn.operands[0], value)
}

fn translate_str(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    let value = tb.read(&insn.operands[0])?;
    tb.write(&insn.operands[1], value)
}

// --- bitwise ----------------------------------------------------------------

fn bitwise(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
    mnemonic: IrMnemonic,
) -> Result<(), Unsupported> {
    let a = tb.read(&insn.operands[1])?;
    let b = tb.read(&insn.operands[2])?;
    let result = tb.temporal(a.size());
    tb.emit(IrInstruction::new(
        mnemonic,
        [a.clone(), b.clone(), result.clone()],
    ));
    tb.write(&insn.operands[0], result.clone())?;
    if insn.update_flags {
        update_flags_logical(tb, &insn.operands[2], &a, &result)?;
    }
    Ok(())
}

fn translate_and(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    bitwise(tb, insn, IrMnemonic::And)
}

fn translate_orr(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    bitwise(tb, insn, IrMnemonic::Or)
}

fn translate_eor(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    bitwise(tb, insn, IrMnemonic::Xor)
}

// --- arithmetic -------------------------------------------------------------

// Additions and subtractions go into a double-width temporary so the flag
// formulas can see the carry and overflow bits; the store to the
// destination register truncates back to operand width.

fn translate_add(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    let a = tb.read(&insn.operands[1])?;
    let b = tb.read(&insn.operands[2])?;
    let result = tb.temporal(a.size() * 2);
    tb.emit(IrInstruction::add(a.clone(), b.clone(), result.clone()));
    tb.write(&insn.operands[0], result.clone())?;
    if insn.update_flags {
        update_flags_add(tb, &a, &b, &result);
    }
    Ok(())
}

fn translate_sub(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    let a = tb.read(&insn.operands[1])?;
    let b = tb.read(&insn.operands[2])?;
    let result = tb.temporal(a.size() * 2);
    tb.emit(IrInstruction::sub(a.clone(), b.clone(), result.clone()));
    tb.write(&insn.operands[0], result.clone())?;
    if insn.update_flags {
        update_flags_sub(tb, &a, &b, &result);
    }
    Ok(())
}

fn translate_cmp(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    let a = tb.read(&insn.operands[0])?;
    let b = tb.read(&insn.operands[1])?;
    let result = tb.temporal(a.size() * 2);
    tb.emit(IrInstruction::sub(a.clone(), b.clone(), result.clone()));
    // The S bit is implied.
    update_flags_sub(tb, &a, &b, &result);
    Ok(())
}

fn translate_cmn(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    let a = tb.read(&insn.operands[0])?;
    let b = tb.read(&insn.operands[1])?;
    let result = tb.temporal(a.size() * 2);
    tb.emit(IrInstruction::add(a.clone(), b.clone(), result.clone()));
    update_flags_add(tb, &a, &b, &result);
    Ok(())
}

// --- multi-register transfers -----------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Load,
    Store,
}

fn translate_ldm(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    multi_transfer(tb, insn, Direction::Load)
}

fn translate_stm(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    multi_transfer(tb, insn, Direction::Store)
}

fn transfer_one(
    tb: &mut TranslationBuilder<'_>,
    direction: Direction,
    pointer: &IrOperand,
    reg: &IrRegister,
) {
    let reg = IrOperand::Reg(reg.clone());
    match direction {
        Direction::Load => tb.emit(IrInstruction::ldm(pointer.clone(), reg)),
        Direction::Store => tb.emit(IrInstruction::stm(reg, pointer.clone())),
    }
}

fn multi_transfer(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
    direction: Direction,
) -> Result<(), Unsupported> {
    debug_assert!(
        insn.mnemonic.flags().contains(MnemonicFlags::MULTI_TRANSFER),
        "handler wired to a non-transfer mnemonic"
    );
    let base = tb.read(&insn.operands[0])?;
    let regs = match &insn.operands[1] {
        ArmOperand::RegList(list) => tb.register_list(list),
        _ => return Err(Unsupported::Operand("register list")),
    };
    let writeback = matches!(&insn.operands[0], ArmOperand::Reg(reg) if reg.writeback);

    // Stack spellings collapse to the increment/decrement form for this
    // transfer direction; the tag is normalized in place.
    let mode = insn
        .transfer_mode
        .expect("multi-register transfer without an addressing mode");
    let mode = match direction {
        Direction::Load => mode.normalize_for_load(),
        Direction::Store => mode.normalize_for_store(),
    };
    insn.transfer_mode = Some(mode);

    let word = tb.word_size();
    let mut pointer = tb.temporal(base.size());
    tb.emit(IrInstruction::str(base.clone(), pointer.clone()));

    // Decrementing modes walk the list highest register first; the decoder
    // hands the list sorted ascending.
    match mode {
        TransferMode::Ia => {
            for reg in &regs {
                transfer_one(tb, direction, &pointer, reg);
                pointer = tb.add(&pointer, &word);
            }
        }
        TransferMode::Ib => {
            for reg in &regs {
                pointer = tb.add(&pointer, &word);
                transfer_one(tb, direction, &pointer, reg);
            }
        }
        TransferMode::Da => {
            for reg in regs.iter().rev() {
                transfer_one(tb, direction, &pointer, reg);
                pointer = tb.sub(&pointer, &word);
            }
        }
        TransferMode::Db => {
            for reg in regs.iter().rev() {
                pointer = tb.sub(&pointer, &word);
                transfer_one(tb, direction, &pointer, reg);
            }
        }
        stack => unreachable!("stack mode {stack:?} after normalization"),
    }

    if writeback {
        let total = IrOperand::imm(
            u128::from(tb.word_bytes()) * regs.len() as u128,
            base.size(),
        );
        let updated = match mode {
            TransferMode::Ia | TransferMode::Ib => tb.add(&base, &total),
            TransferMode::Da | TransferMode::Db => tb.sub(&base, &total),
            stack => unreachable!("stack mode {stack:?} after normalization"),
        };
        tb.emit(IrInstruction::str(updated, base));
    }
    Ok(())
}

/// PUSH/POP are LDM/STM bound to the stack pointer: full-descending mode,
/// write-back forced on.
fn bind_stack_pointer(insn: &mut ArmInstruction) -> Result<(), Unsupported> {
    let ArmOperand::RegList(list) = insn.operands[0].clone() else {
        return Err(Unsupported::Operand("register list"));
    };
    let size = list
        .ranges
        .first()
        .expect("empty register list in stack transfer")
        .first
        .size;
    let mut sp = ArmRegisterOperand::new("sp", size);
    sp.writeback = true;
    insn.operands = vec![ArmOperand::Reg(sp), ArmOperand::RegList(list)];
    insn.transfer_mode = Some(TransferMode::Fd);
    Ok(())
}

fn translate_push(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    bind_stack_pointer(insn)?;
    multi_transfer(tb, insn, Direction::Store)
}

fn translate_pop(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    bind_stack_pointer(insn)?;
    multi_transfer(tb, insn, Direction::Load)
}

// --- branches ---------------------------------------------------------------

fn branch(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
    link: bool,
) -> Result<(), Unsupported> {
    let target = match tb.read(&insn.operands[0])? {
        IrOperand::Imm(imm) => imm,
        _ => return Err(Unsupported::Operand("branch target")),
    };
    // Byte addresses gain the 8 sub-index bits in IR address space.
    let target = IrImmediate::new(target.value() << 8, target.size() + 8);
    if link {
        let pc = tb.program_counter();
        let word = tb.word_size();
        let lr = tb.link_register();
        tb.emit(IrInstruction::add(pc, word, lr));
    }
    tb.emit(IrInstruction::jcc(
        IrOperand::imm(1, 1),
        IrOperand::Imm(target),
    ));
    Ok(())
}

fn translate_b(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    branch(tb, insn, false)
}

fn translate_bl(
    tb: &mut TranslationBuilder<'_>,
    insn: &mut ArmInstruction,
) -> Result<(), Unsupported> {
    branch(tb, insn, true)
}
