use serde::{Deserialize, Serialize};

/// Addressing mode of the translated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchMode {
    /// 32-bit ARM: 32-bit registers, 4-byte words.
    Arm32,
    /// 64-bit ARM: 64-bit registers, 8-byte words.
    Arm64,
}

/// Architecture metadata consulted once at lifter construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchInfo {
    mode: ArchMode,
}

impl ArchInfo {
    pub fn new(mode: ArchMode) -> Self {
        ArchInfo { mode }
    }

    pub fn mode(&self) -> ArchMode {
        self.mode
    }

    /// Width of a general-purpose register, in bits.
    pub fn operand_size(&self) -> u8 {
        match self.mode {
            ArchMode::Arm32 => 32,
            ArchMode::Arm64 => 64,
        }
    }

    /// Width of a memory address, in bits.
    pub fn address_size(&self) -> u8 {
        self.operand_size()
    }

    /// Natural word size, in bytes.
    pub fn word_size(&self) -> u64 {
        match self.mode {
            ArchMode::Arm32 => 4,
            ArchMode::Arm64 => 8,
        }
    }
}
