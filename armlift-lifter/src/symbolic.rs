//! The symbolic IR sequence a translation accumulates before addresses
//! exist, and the two-pass resolution that turns it into addressed IR.
//!
//! Keeping the symbolic and resolved forms as separate types means a
//! resolved sequence can never carry an unresolved label.

use std::collections::HashMap;

use armlift_ir::{encode_address, IrInstruction, IrOperand, IrImmediate, MAX_SEQUENCE_LEN};

/// A named position marker. Never addressed itself; jumps that name it are
/// patched to the following instruction's sub-index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Label(pub(crate) String);

/// One entry of the symbolic sequence.
#[derive(Debug)]
pub(crate) enum Entry {
    /// A fully formed instruction.
    Instr(IrInstruction),
    /// A conditional jump to a label, patched during resolution.
    Jump { cond: IrOperand, target: Label },
    /// A label marking the position of the next instruction.
    Mark(Label),
}

/// Strip labels and assign addresses.
///
/// Pass 1 records each label's target as the number of real instructions
/// seen before it. Pass 2 stamps `(native_address << 8) | position` on every
/// instruction and rewrites label jumps to a concrete target sharing the
/// jump's own high address bits — intra-instruction jumps can never leave
/// the native instruction. `target_size` is the bit width of patched target
/// immediates (address width plus the 8 sub-index bits).
///
/// Panics if a label is placed twice, a jump names an unplaced label, or
/// the sequence outgrows the 8-bit sub-index space: all are lifter bugs,
/// not input errors.
pub(crate) fn resolve(
    entries: Vec<Entry>,
    native_address: u64,
    target_size: u8,
) -> Vec<IrInstruction> {
    let mut targets: HashMap<String, usize> = HashMap::new();
    let mut pending = Vec::with_capacity(entries.len());

    for entry in entries {
        match entry {
            Entry::Mark(label) => {
                let previous = targets.insert(label.0.clone(), pending.len());
                assert!(previous.is_none(), "label `{}` placed twice", label.0);
            }
            other => pending.push(other),
        }
    }

    assert!(
        pending.len() <= MAX_SEQUENCE_LEN,
        "sequence of {} instructions overflows the sub-index space",
        pending.len()
    );

    let mut resolved = Vec::with_capacity(pending.len());
    for (index, entry) in pending.into_iter().enumerate() {
        let address = encode_address(native_address, index as u8);
        match entry {
            Entry::Instr(mut instr) => {
                instr.address = address;
                resolved.push(instr);
            }
            Entry::Jump { cond, target } => {
                let sub_index = *targets
                    .get(&target.0)
                    .unwrap_or_else(|| panic!("jump to unplaced label `{}`", target.0));
                let target_address = (address & !0xff) | sub_index as u64;
                let mut jump = IrInstruction::jcc(
                    cond,
                    IrOperand::Imm(IrImmediate::new(u128::from(target_address), target_size)),
                );
                jump.address = address;
                resolved.push(jump);
            }
            Entry::Mark(_) => unreachable!("marks are stripped in pass 1"),
        }
    }

    resolved
}
