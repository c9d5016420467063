use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Coarse instruction classification.
    ///
    /// Control-flow recovery uses `BRANCH` to find block terminators; the
    /// lifter uses `MULTI_TRANSFER` to sanity-check its transfer handlers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MnemonicFlags: u8 {
        const DATA_PROCESSING = 1 << 0;
        /// Compares flags implicitly (no destination operand).
        const COMPARE = 1 << 1;
        const LOAD_STORE = 1 << 2;
        const MULTI_TRANSFER = 1 << 3;
        /// PUSH/POP: a multi-register transfer bound to the stack pointer.
        const STACK_ALIAS = 1 << 4;
        const BRANCH = 1 << 5;
        /// Branch that writes the return address to the link register.
        const LINK = 1 << 6;
    }
}

/// ARM instruction mnemonics the decoder can produce.
///
/// The lifter implements translators for a subset; the rest degrade to the
/// undefined IR instruction when translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmMnemonic {
    Adc,
    Add,
    And,
    B,
    Bic,
    Bl,
    Blx,
    Bx,
    Cmn,
    Cmp,
    Eor,
    Ldm,
    Ldr,
    Ldrb,
    Ldrh,
    Lsl,
    Lsr,
    Mla,
    Mov,
    Mul,
    Mvn,
    Orr,
    Pop,
    Push,
    Rsb,
    Rsc,
    Sbc,
    Stm,
    Str,
    Strb,
    Strh,
    Sub,
    Swi,
    Teq,
    Tst,
    Umull,
}

impl ArmMnemonic {
    /// Assembly spelling.
    pub fn name(&self) -> &'static str {
        use ArmMnemonic::*;
        match self {
            Adc => "adc",
            Add => "add",
            And => "and",
            B => "b",
            Bic => "bic",
            Bl => "bl",
            Blx => "blx",
            Bx => "bx",
            Cmn => "cmn",
            Cmp => "cmp",
            Eor => "eor",
            Ldm => "ldm",
            Ldr => "ldr",
            Ldrb => "ldrb",
            Ldrh => "ldrh",
            Lsl => "lsl",
            Lsr => "lsr",
            Mla => "mla",
            Mov => "mov",
            Mul => "mul",
            Mvn => "mvn",
            Orr => "orr",
            Pop => "pop",
            Push => "push",
            Rsb => "rsb",
            Rsc => "rsc",
            Sbc => "sbc",
            Stm => "stm",
            Str => "str",
            Strb => "strb",
            Strh => "strh",
            Sub => "sub",
            Swi => "swi",
            Teq => "teq",
            Tst => "tst",
            Umull => "umull",
        }
    }

    pub fn flags(&self) -> MnemonicFlags {
        use ArmMnemonic::*;
        match self {
            Adc | Add | And | Bic | Eor | Lsl | Lsr | Mla | Mov | Mul | Mvn | Orr | Rsb | Rsc
            | Sbc | Sub | Umull => MnemonicFlags::DATA_PROCESSING,
            Cmn | Cmp | Teq | Tst => MnemonicFlags::DATA_PROCESSING | MnemonicFlags::COMPARE,
            Ldr | Ldrb | Ldrh | Str | Strb | Strh => MnemonicFlags::LOAD_STORE,
            Ldm | Stm => MnemonicFlags::MULTI_TRANSFER,
            Pop | Push => MnemonicFlags::MULTI_TRANSFER | MnemonicFlags::STACK_ALIAS,
            B | Bx => MnemonicFlags::BRANCH,
            Bl | Blx => MnemonicFlags::BRANCH | MnemonicFlags::LINK,
            Swi => MnemonicFlags::empty(),
        }
    }
}

impl std::fmt::Display for ArmMnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ArmMnemonic::Push.flags().contains(MnemonicFlags::MULTI_TRANSFER));
        assert!(ArmMnemonic::Push.flags().contains(MnemonicFlags::STACK_ALIAS));
        assert!(!ArmMnemonic::Ldm.flags().contains(MnemonicFlags::STACK_ALIAS));
        assert!(ArmMnemonic::Bl.flags().contains(MnemonicFlags::BRANCH | MnemonicFlags::LINK));
        assert!(ArmMnemonic::Cmp.flags().contains(MnemonicFlags::COMPARE));
        assert!(!ArmMnemonic::Add.flags().contains(MnemonicFlags::COMPARE));
    }

    #[test]
    fn spelling() {
        assert_eq!(ArmMnemonic::Ldm.name(), "ldm");
        assert_eq!(ArmMnemonic::Umull.to_string(), "umull");
    }
}
