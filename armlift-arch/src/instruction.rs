use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::mnemonic::ArmMnemonic;
use crate::operand::ArmOperand;

/// Addressing mode of a multi-register transfer.
///
/// `Fd`/`Ed`/`Fa`/`Ea` are the stack-oriented spellings; the lifter rewrites
/// them to the equivalent increment/decrement mode for the transfer
/// direction before iterating the register list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Increment after.
    Ia,
    /// Increment before.
    Ib,
    /// Decrement after.
    Da,
    /// Decrement before.
    Db,
    /// Full descending stack.
    Fd,
    /// Empty descending stack.
    Ed,
    /// Full ascending stack.
    Fa,
    /// Empty ascending stack.
    Ea,
}

impl TransferMode {
    /// Equivalent non-stack mode when the transfer loads (LDM, POP).
    pub fn normalize_for_load(self) -> TransferMode {
        match self {
            TransferMode::Fd => TransferMode::Ia,
            TransferMode::Fa => TransferMode::Da,
            TransferMode::Ed => TransferMode::Ib,
            TransferMode::Ea => TransferMode::Db,
            other => other,
        }
    }

    /// Equivalent non-stack mode when the transfer stores (STM, PUSH).
    pub fn normalize_for_store(self) -> TransferMode {
        match self {
            TransferMode::Fd => TransferMode::Db,
            TransferMode::Fa => TransferMode::Ib,
            TransferMode::Ed => TransferMode::Da,
            TransferMode::Ea => TransferMode::Ia,
            other => other,
        }
    }

    pub fn is_stack_alias(self) -> bool {
        matches!(
            self,
            TransferMode::Fd | TransferMode::Ed | TransferMode::Fa | TransferMode::Ea
        )
    }

    /// Assembly suffix (`ia`, `db`, ...).
    pub fn suffix(&self) -> &'static str {
        match self {
            TransferMode::Ia => "ia",
            TransferMode::Ib => "ib",
            TransferMode::Da => "da",
            TransferMode::Db => "db",
            TransferMode::Fd => "fd",
            TransferMode::Ed => "ed",
            TransferMode::Fa => "fa",
            TransferMode::Ea => "ea",
        }
    }
}

/// A single decoded ARM instruction.
///
/// Produced by the external decoder; the lifter reads it, except that
/// multi-register-transfer translation normalizes `transfer_mode` in place
/// and PUSH/POP rewrite themselves into their LDM/STM shape. Callers reusing
/// a value across translations must tolerate that or pass a clone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmInstruction {
    pub mnemonic: ArmMnemonic,
    pub operands: Vec<ArmOperand>,
    /// Byte address of the instruction.
    pub address: u64,
    /// Raw encoding, kept for diagnostics.
    #[serde(default)]
    pub bytes: Vec<u8>,
    #[serde(default)]
    pub condition: Condition,
    /// The S bit: update the condition flags.
    #[serde(default)]
    pub update_flags: bool,
    /// Addressing-mode tag of multi-register transfers.
    #[serde(default)]
    pub transfer_mode: Option<TransferMode>,
}

impl ArmInstruction {
    pub fn new(mnemonic: ArmMnemonic, operands: Vec<ArmOperand>, address: u64) -> Self {
        ArmInstruction {
            mnemonic,
            operands,
            address,
            bytes: Vec::new(),
            condition: Condition::Al,
            update_flags: false,
            transfer_mode: None,
        }
    }
}

impl fmt::Display for ArmInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mnemonic.name(), self.condition.suffix())?;
        if self.update_flags {
            f.write_str("s")?;
        }
        if let Some(mode) = self.transfer_mode {
            f.write_str(mode.suffix())?;
        }
        for (i, operand) in self.operands.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{operand}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::{ArmRegisterListOperand, ArmRegisterOperand, RegisterRange};

    #[test]
    fn stack_mode_equivalences() {
        assert_eq!(TransferMode::Fd.normalize_for_load(), TransferMode::Ia);
        assert_eq!(TransferMode::Fa.normalize_for_load(), TransferMode::Da);
        assert_eq!(TransferMode::Ed.normalize_for_load(), TransferMode::Ib);
        assert_eq!(TransferMode::Ea.normalize_for_load(), TransferMode::Db);

        assert_eq!(TransferMode::Fd.normalize_for_store(), TransferMode::Db);
        assert_eq!(TransferMode::Fa.normalize_for_store(), TransferMode::Ib);
        assert_eq!(TransferMode::Ed.normalize_for_store(), TransferMode::Da);
        assert_eq!(TransferMode::Ea.normalize_for_store(), TransferMode::Ia);

        assert_eq!(TransferMode::Ia.normalize_for_load(), TransferMode::Ia);
        assert_eq!(TransferMode::Db.normalize_for_store(), TransferMode::Db);
        assert!(TransferMode::Fd.is_stack_alias());
        assert!(!TransferMode::Ib.is_stack_alias());
    }

    #[test]
    fn display_instruction() {
        let mut insn = ArmInstruction::new(
            ArmMnemonic::Add,
            vec![
                ArmOperand::reg("r0", 32),
                ArmOperand::reg("r1", 32),
                ArmOperand::imm(1, 32),
            ],
            0x1000,
        );
        insn.condition = Condition::Ne;
        insn.update_flags = true;
        assert_eq!(insn.to_string(), "addnes r0, r1, #1");
    }

    #[test]
    fn display_transfer() {
        let mut base = ArmRegisterOperand::new("sp", 32);
        base.writeback = true;
        let insn = ArmInstruction {
            mnemonic: ArmMnemonic::Stm,
            operands: vec![
                ArmOperand::Reg(base),
                ArmOperand::RegList(ArmRegisterListOperand {
                    ranges: vec![RegisterRange {
                        first: ArmRegisterOperand::new("r4", 32),
                        last: Some(ArmRegisterOperand::new("r7", 32)),
                    }],
                }),
            ],
            address: 0,
            bytes: Vec::new(),
            condition: Condition::Al,
            update_flags: false,
            transfer_mode: Some(TransferMode::Db),
        };
        assert_eq!(insn.to_string(), "stmdb sp!, {r4-r7}");
    }
}
