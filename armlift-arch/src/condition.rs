use serde::{Deserialize, Serialize};

/// ARM condition codes.
///
/// Every instruction carries one; `Al` (always) is the default and the only
/// code that executes unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Equal: Z set.
    Eq,
    /// Not equal: Z clear.
    Ne,
    /// Carry set / unsigned higher or same.
    Cs,
    /// Carry clear / unsigned lower.
    Cc,
    /// Minus / negative: N set.
    Mi,
    /// Plus / positive or zero: N clear.
    Pl,
    /// Overflow: V set.
    Vs,
    /// No overflow: V clear.
    Vc,
    /// Unsigned higher: C set and Z clear.
    Hi,
    /// Unsigned lower or same: C clear or Z set.
    Ls,
    /// Signed greater than or equal: N == V.
    Ge,
    /// Signed less than: N != V.
    Lt,
    /// Signed greater than: Z clear and N == V.
    Gt,
    /// Signed less than or equal: Z set or N != V.
    Le,
    /// Always.
    #[default]
    Al,
}

impl Condition {
    /// Assembly suffix; empty for `Al`.
    pub fn suffix(&self) -> &'static str {
        use Condition::*;
        match self {
            Eq => "eq",
            Ne => "ne",
            Cs => "cs",
            Cc => "cc",
            Mi => "mi",
            Pl => "pl",
            Vs => "vs",
            Vc => "vc",
            Hi => "hi",
            Ls => "ls",
            Ge => "ge",
            Lt => "lt",
            Gt => "gt",
            Le => "le",
            Al => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_always() {
        assert_eq!(Condition::default(), Condition::Al);
        assert_eq!(Condition::Al.suffix(), "");
        assert_eq!(Condition::Hi.suffix(), "hi");
    }
}
