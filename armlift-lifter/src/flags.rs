//! Condition-code predicates and flag-update formulas.
//!
//! The four ARM status flags live in dedicated 1-bit IR registers. Carry
//! and overflow are read out of double-width arithmetic results, so the
//! update routines expect `result` to be twice as wide as the operands.

use armlift_arch::{ArmOperand, ArmRegisterOperand, Condition, ShiftAmount, ShiftKind};
use armlift_ir::{IrImmediate, IrInstruction, IrOperand};

use crate::builder::TranslationBuilder;
use crate::error::Unsupported;
use crate::symbolic::Label;

pub(crate) fn nf() -> IrOperand {
    IrOperand::reg("nf", 1)
}

pub(crate) fn zf() -> IrOperand {
    IrOperand::reg("zf", 1)
}

pub(crate) fn cf() -> IrOperand {
    IrOperand::reg("cf", 1)
}

pub(crate) fn vf() -> IrOperand {
    IrOperand::reg("vf", 1)
}

/// 1-bit truth value of a condition code; `None` for `Al`.
fn condition_value(tb: &mut TranslationBuilder<'_>, condition: Condition) -> Option<IrOperand> {
    let value = match condition {
        Condition::Al => return None,
        Condition::Eq => zf(),
        Condition::Ne => tb.not(&zf()),
        Condition::Cs => cf(),
        Condition::Cc => tb.not(&cf()),
        Condition::Mi => nf(),
        Condition::Pl => tb.not(&nf()),
        Condition::Vs => vf(),
        Condition::Vc => tb.not(&vf()),
        Condition::Hi => {
            let not_zero = tb.not(&zf());
            tb.and(&cf(), &not_zero)
        }
        Condition::Ls => {
            let not_carry = tb.not(&cf());
            tb.or(&not_carry, &zf())
        }
        Condition::Ge => tb.equal(&nf(), &vf()),
        Condition::Lt => {
            let ge = tb.equal(&nf(), &vf());
            tb.not(&ge)
        }
        Condition::Gt => {
            let not_zero = tb.not(&zf());
            let ge = tb.equal(&nf(), &vf());
            tb.and(&not_zero, &ge)
        }
        Condition::Le => {
            let ge = tb.equal(&nf(), &vf());
            let lt = tb.not(&ge);
            tb.or(&zf(), &lt)
        }
    };
    Some(value)
}

/// Jump to `skip` when the condition does not hold, so the instruction body
/// only executes under a satisfied condition. `Al` emits nothing.
pub(crate) fn emit_condition_guard(
    tb: &mut TranslationBuilder<'_>,
    condition: Condition,
    skip: &Label,
) {
    let Some(value) = condition_value(tb, condition) else {
        return;
    };
    let negated = tb.not(&value);
    tb.jump_if(negated, skip);
}

/// Z: the low operand-width bits of the result are all zero.
fn update_zf(tb: &mut TranslationBuilder<'_>, oprnd0: &IrOperand, result: &IrOperand) {
    let mask = IrOperand::Imm(IrImmediate::new(
        IrImmediate::all_ones(oprnd0.size()).value(),
        result.size(),
    ));
    let low = tb.temporal(oprnd0.size());
    tb.emit(IrInstruction::and(result.clone(), mask, low.clone()));
    tb.emit(IrInstruction::bisz(low, zf()));
}

/// N: the sign bit of the low operand-width half of the result.
fn update_nf(tb: &mut TranslationBuilder<'_>, oprnd0: &IrOperand, result: &IrOperand) {
    let sign = tb.extract_bit(result, oprnd0.size() - 1);
    tb.emit(IrInstruction::str(sign, nf()));
}

/// C: the unsigned carry-out, bit `w` of the double-width result.
fn update_cf_carry(tb: &mut TranslationBuilder<'_>, oprnd0: &IrOperand, result: &IrOperand) {
    assert_eq!(
        result.size(),
        oprnd0.size() * 2,
        "carry needs a double-width result"
    );
    let carry = tb.extract_bit(result, oprnd0.size());
    tb.emit(IrInstruction::str(carry, cf()));
}

/// Borrow on subtraction has the same formula as carry.
fn update_cf_borrow(tb: &mut TranslationBuilder<'_>, oprnd0: &IrOperand, result: &IrOperand) {
    update_cf_carry(tb, oprnd0, result);
}

/// V on addition: operand signs agree and the result sign differs.
fn update_vf_add(
    tb: &mut TranslationBuilder<'_>,
    oprnd0: &IrOperand,
    oprnd1: &IrOperand,
    result: &IrOperand,
) {
    let sign_a = tb.extract_bit(oprnd0, oprnd0.size() - 1);
    let sign_b = tb.extract_bit(oprnd1, oprnd0.size() - 1);
    let sign_result = tb.extract_bit(result, oprnd0.size() - 1);
    let signs_agree = tb.equal(&sign_a, &sign_b);
    let result_differs = tb.unequal(&sign_a, &sign_result);
    let overflow = tb.and(&signs_agree, &result_differs);
    tb.emit(IrInstruction::str(overflow, vf()));
}

fn update_vf_sub(
    tb: &mut TranslationBuilder<'_>,
    oprnd0: &IrOperand,
    oprnd1: &IrOperand,
    result: &IrOperand,
) {
    let overflow = tb.overflow_from_sub(oprnd0, oprnd1, result);
    tb.emit(IrInstruction::str(overflow, vf()));
}

/// Flag updates of the addition group, in Z, N, C, V order.
pub(crate) fn update_flags_add(
    tb: &mut TranslationBuilder<'_>,
    oprnd0: &IrOperand,
    oprnd1: &IrOperand,
    result: &IrOperand,
) {
    update_zf(tb, oprnd0, result);
    update_nf(tb, oprnd0, result);
    update_cf_carry(tb, oprnd0, result);
    update_vf_add(tb, oprnd0, oprnd1, result);
}

/// Flag updates of the subtraction group, in Z, N, C, V order.
pub(crate) fn update_flags_sub(
    tb: &mut TranslationBuilder<'_>,
    oprnd0: &IrOperand,
    oprnd1: &IrOperand,
    result: &IrOperand,
) {
    update_zf(tb, oprnd0, result);
    update_nf(tb, oprnd0, result);
    update_cf_borrow(tb, oprnd0, result);
    update_vf_sub(tb, oprnd0, oprnd1, result);
}

/// Flag updates of moves, bitwise and shift instructions: Z and N from the
/// result, C from the shifter carry-out, V untouched.
pub(crate) fn update_flags_logical(
    tb: &mut TranslationBuilder<'_>,
    shifter: &ArmOperand,
    oprnd0: &IrOperand,
    result: &IrOperand,
) -> Result<(), Unsupported> {
    update_zf(tb, oprnd0, result);
    update_nf(tb, oprnd0, result);
    shifter_carry_out(tb, shifter)
}

/// C update from the shifter operand of a data-processing instruction.
///
/// Plain immediates and registers, and a zero immediate amount, leave the
/// flag unchanged. A non-zero immediate amount picks a fixed bit of the
/// shifted register; a register amount needs a run-time decision.
fn shifter_carry_out(
    tb: &mut TranslationBuilder<'_>,
    shifter: &ArmOperand,
) -> Result<(), Unsupported> {
    let sh = match shifter {
        ArmOperand::Imm(_) | ArmOperand::Reg(_) => return Ok(()),
        ArmOperand::Shifted(sh) => sh,
        other => panic!("carry-out requested for operand {other}"),
    };
    if sh.kind != ShiftKind::Lsl {
        return Err(Unsupported::ShiftKind(sh.kind));
    }
    let base = IrOperand::reg(sh.base.name.clone(), sh.size);
    let width = i128::from(sh.size);
    match &sh.amount {
        // No amount is `lsl #0`: the carry flag stays.
        None => Ok(()),
        Some(ShiftAmount::Imm(amount)) if amount.value == 0 => Ok(()),
        Some(ShiftAmount::Imm(amount)) => {
            let amount = i128::from(amount.value);
            assert!(
                amount > 0 && amount <= width,
                "shift amount {amount} out of range for carry-out"
            );
            let carry = tb.extract_bit(&base, (width - amount) as u8);
            tb.emit(IrInstruction::str(carry, cf()));
            Ok(())
        }
        Some(ShiftAmount::Reg(amount)) => {
            register_amount_carry_out(tb, &base, amount);
            Ok(())
        }
    }
}

/// Carry-out for a register-specified shift amount:
/// 0 leaves the flag, 1..=w picks bit (w - amount), above w clears it.
fn register_amount_carry_out(
    tb: &mut TranslationBuilder<'_>,
    base: &IrOperand,
    amount: &ArmRegisterOperand,
) {
    let width = u128::from(base.size());
    let carry = tb.temporal(1);
    tb.emit(IrInstruction::str(cf(), carry.clone()));

    let amount = IrOperand::reg(amount.name.clone(), amount.size);
    let amount_low = tb.and(&amount, &IrOperand::imm(0xff, amount.size()));

    let done = tb.label("carry_out_done");
    let past_width = tb.label("carry_out_past_width");

    tb.jump_if_zero(&amount_low, &done);
    let beyond = tb.greater_or_equal(&amount_low, &IrOperand::imm(width + 1, amount_low.size()));
    tb.jump_if(beyond, &past_width);

    let bit_index = tb.temporal(amount_low.size());
    tb.emit(IrInstruction::sub(
        IrOperand::imm(width, amount_low.size()),
        amount_low.clone(),
        bit_index.clone(),
    ));
    let bit = tb.extract_bit_runtime(base, &bit_index);
    tb.emit(IrInstruction::str(bit, carry.clone()));
    tb.jump(&done);

    tb.place(past_width);
    tb.emit(IrInstruction::str(IrOperand::imm(0, 1), carry.clone()));

    tb.place(done);
    tb.emit(IrInstruction::str(carry, cf()));
}
