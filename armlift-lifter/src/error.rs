use armlift_arch::{ArmMnemonic, ShiftKind};

/// A valid instruction the lifter cannot express yet.
///
/// This is the recoverable failure tier: the dispatcher turns it into a
/// single undefined IR instruction and moves on. Malformed input (inverted
/// register ranges, a transfer without an addressing mode, unresolved
/// labels) is a bug in the producer and panics instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Unsupported {
    #[error("no translator for mnemonic `{}`", .0.name())]
    Mnemonic(ArmMnemonic),
    #[error("shift kind `{}` is not implemented", .0.name())]
    ShiftKind(ShiftKind),
    #[error("{0} operand is not usable here")]
    Operand(&'static str),
}
