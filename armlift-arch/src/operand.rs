use std::fmt;

use serde::{Deserialize, Serialize};

/// A named core register of a given bit width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmRegisterOperand {
    pub name: String,
    /// Width in bits.
    pub size: u8,
    /// Base-register write-back request (multi-register transfers only).
    #[serde(default)]
    pub writeback: bool,
}

impl ArmRegisterOperand {
    pub fn new(name: impl Into<String>, size: u8) -> Self {
        ArmRegisterOperand {
            name: name.into(),
            size,
            writeback: false,
        }
    }
}

/// An immediate value, two's-complement within `size` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmImmediateOperand {
    pub value: i64,
    pub size: u8,
}

/// Shift operation applied to a shifter operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftKind {
    Lsl,
    Lsr,
    Asr,
    Ror,
    Rrx,
}

impl ShiftKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShiftKind::Lsl => "lsl",
            ShiftKind::Lsr => "lsr",
            ShiftKind::Asr => "asr",
            ShiftKind::Ror => "ror",
            ShiftKind::Rrx => "rrx",
        }
    }
}

/// Shift amount of a shifter operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftAmount {
    Imm(ArmImmediateOperand),
    Reg(ArmRegisterOperand),
}

/// A register combined with a shift operation (`r1, lsl #2`).
///
/// Without an amount the operand is the base register itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmShiftedOperand {
    pub base: ArmRegisterOperand,
    pub kind: ShiftKind,
    #[serde(default)]
    pub amount: Option<ShiftAmount>,
    pub size: u8,
}

/// How a memory operand combines its base register and displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    /// `[base, disp]` — base is left unmodified.
    Offset,
    /// `[base, disp]!` — base is updated with the effective address.
    Pre,
    /// `[base], disp` — base is updated after the access.
    Post,
}

/// Displacement of a memory operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Displacement {
    Reg(ArmRegisterOperand),
    Imm(ArmImmediateOperand),
    Shifted(ArmShiftedOperand),
}

/// A memory access through a base register.
///
/// Pre- and post-indexed operands always carry a displacement; offset-mode
/// write-back is requested through the base operand flag, never implied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmMemoryOperand {
    pub base: ArmRegisterOperand,
    #[serde(default)]
    pub displacement: Option<Displacement>,
    pub index_mode: IndexMode,
    /// Subtract the displacement instead of adding it.
    #[serde(default)]
    pub minus: bool,
    /// Access width in bits.
    pub size: u8,
}

/// One entry of a register list: a single register or an inclusive range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRange {
    pub first: ArmRegisterOperand,
    #[serde(default)]
    pub last: Option<ArmRegisterOperand>,
}

/// Ordered register list of a multi-register transfer (`{r0, r4-r6}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmRegisterListOperand {
    pub ranges: Vec<RegisterRange>,
}

/// A decoded instruction operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmOperand {
    Imm(ArmImmediateOperand),
    Reg(ArmRegisterOperand),
    Shifted(ArmShiftedOperand),
    Mem(ArmMemoryOperand),
    RegList(ArmRegisterListOperand),
}

impl ArmOperand {
    pub fn imm(value: i64, size: u8) -> Self {
        ArmOperand::Imm(ArmImmediateOperand { value, size })
    }

    pub fn reg(name: impl Into<String>, size: u8) -> Self {
        ArmOperand::Reg(ArmRegisterOperand::new(name, size))
    }
}

impl fmt::Display for ArmRegisterOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for ArmImmediateOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.value)
    }
}

impl fmt::Display for ArmShiftedOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.amount {
            None => write!(f, "{}", self.base),
            Some(ShiftAmount::Imm(imm)) => {
                write!(f, "{}, {} {}", self.base, self.kind.name(), imm)
            }
            Some(ShiftAmount::Reg(reg)) => {
                write!(f, "{}, {} {}", self.base, self.kind.name(), reg)
            }
        }
    }
}

impl fmt::Display for Displacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Displacement::Reg(reg) => write!(f, "{reg}"),
            Displacement::Imm(imm) => write!(f, "{imm}"),
            Displacement::Shifted(sh) => write!(f, "{sh}"),
        }
    }
}

impl fmt::Display for ArmMemoryOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minus { "-" } else { "" };
        match (&self.displacement, self.index_mode) {
            (None, _) => write!(f, "[{}]", self.base),
            (Some(disp), IndexMode::Offset) => write!(f, "[{}, {sign}{disp}]", self.base),
            (Some(disp), IndexMode::Pre) => write!(f, "[{}, {sign}{disp}]!", self.base),
            (Some(disp), IndexMode::Post) => write!(f, "[{}], {sign}{disp}", self.base),
        }
    }
}

impl fmt::Display for ArmRegisterListOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match &range.last {
                None => write!(f, "{}", range.first)?,
                Some(last) => write!(f, "{}-{}", range.first, last)?,
            }
        }
        f.write_str("}")
    }
}

impl fmt::Display for ArmOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmOperand::Imm(imm) => write!(f, "{imm}"),
            ArmOperand::Reg(reg) => {
                write!(f, "{reg}")?;
                if reg.writeback {
                    f.write_str("!")?;
                }
                Ok(())
            }
            ArmOperand::Shifted(sh) => write!(f, "{sh}"),
            ArmOperand::Mem(mem) => write!(f, "{mem}"),
            ArmOperand::RegList(list) => write!(f, "{list}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_memory_operands() {
        let mem = ArmMemoryOperand {
            base: ArmRegisterOperand::new("r1", 32),
            displacement: Some(Displacement::Imm(ArmImmediateOperand { value: 4, size: 32 })),
            index_mode: IndexMode::Pre,
            minus: false,
            size: 32,
        };
        assert_eq!(mem.to_string(), "[r1, #4]!");

        let mem = ArmMemoryOperand {
            base: ArmRegisterOperand::new("r2", 32),
            displacement: Some(Displacement::Reg(ArmRegisterOperand::new("r3", 32))),
            index_mode: IndexMode::Post,
            minus: true,
            size: 32,
        };
        assert_eq!(mem.to_string(), "[r2], -r3");
    }

    #[test]
    fn display_register_list() {
        let list = ArmRegisterListOperand {
            ranges: vec![
                RegisterRange {
                    first: ArmRegisterOperand::new("r0", 32),
                    last: None,
                },
                RegisterRange {
                    first: ArmRegisterOperand::new("r4", 32),
                    last: Some(ArmRegisterOperand::new("r6", 32)),
                },
            ],
        };
        assert_eq!(list.to_string(), "{r0, r4-r6}");
    }

    #[test]
    fn display_shifted() {
        let sh = ArmShiftedOperand {
            base: ArmRegisterOperand::new("r2", 32),
            kind: ShiftKind::Lsl,
            amount: Some(ShiftAmount::Imm(ArmImmediateOperand { value: 2, size: 32 })),
            size: 32,
        };
        assert_eq!(sh.to_string(), "r2, lsl #2");
    }
}
