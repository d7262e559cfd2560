use std::fmt;

/// Bitwise operators accepted in a value (`&~`, `&`, `|`, `^`, `<<`, `>>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    AndNot,
    And,
    Or,
    Xor,
    Shl,
    Shr,
}

impl BitOp {
    /// Longest tokens first so `&~` wins over `&`.
    pub(crate) const TOKENS: [(&'static str, BitOp); 6] = [
        ("&~", BitOp::AndNot),
        ("<<", BitOp::Shl),
        (">>", BitOp::Shr),
        ("&", BitOp::And),
        ("|", BitOp::Or),
        ("^", BitOp::Xor),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BitOp::AndNot => "&~",
            BitOp::And => "&",
            BitOp::Or => "|",
            BitOp::Xor => "^",
            BitOp::Shl => "<<",
            BitOp::Shr => ">>",
        }
    }
}

impl fmt::Display for BitOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operators accepted in a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lte,
    Gte,
    Ne,
    Lt,
    Gt,
}

impl CmpOp {
    pub(crate) const TOKENS: [(&'static str, CmpOp); 5] = [
        ("<=", CmpOp::Lte),
        (">=", CmpOp::Gte),
        ("!=", CmpOp::Ne),
        ("<", CmpOp::Lt),
        (">", CmpOp::Gt),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CmpOp::Lte => "<=",
            CmpOp::Gte => ">=",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed form of one `(column, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// `><1 & 5`, `!><1 & 5`
    Between {
        negated: bool,
        low: String,
        high: String,
    },
    /// `&4`, `<< 2`, ...
    Bitwise { op: BitOp, operand: String },
    /// `>5`, `!= foo`, ...
    Compare { op: CmpOp, operand: String },
    /// `% foo`, `!%foo`, `foo%`
    Like { negated: bool, pattern: String },
    /// NULL, `is null`, `is not null`
    NullLiteral { negated: bool },
    /// Anything else.
    Equals(String),
}
