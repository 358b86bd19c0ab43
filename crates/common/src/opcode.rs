//! Binary operation opcodes shared by the AM0 and AM1 instruction sets.
//!
//! Arithmetic and relational instructions take no operand: they consume the
//! two topmost data-stack values and leave one result behind.

/// A nullary arithmetic or relational operation.
///
/// Operand order follows the machine convention: `first` is the top of the
/// data stack, `second` is the value directly below it. The result replaces
/// `second`, so `[.., a, b] SUB` leaves `[.., a - b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    /// `second + first`.
    Add,
    /// `second - first`.
    Sub,
    /// `second * first`.
    Mul,
    /// `second / first`, truncating. Fails on a zero divisor.
    Div,
    /// `second % first`, sign follows the dividend. Fails on a zero divisor.
    Mod,

    // Comparison, result is 1 or 0
    /// `second < first`.
    Lt,
    /// `second == first`.
    Eq,
    /// `second != first`.
    Ne,
    /// `second > first`.
    Gt,
    /// `second <= first`.
    Le,
    /// `second >= first`.
    Ge,
}

/// All binary operations, in mnemonic table order. Useful for exhaustive testing.
pub const ALL_BINARY_OPS: [BinaryOp; 11] = [
    BinaryOp::Add,
    BinaryOp::Sub,
    BinaryOp::Mul,
    BinaryOp::Div,
    BinaryOp::Mod,
    BinaryOp::Lt,
    BinaryOp::Eq,
    BinaryOp::Ne,
    BinaryOp::Gt,
    BinaryOp::Le,
    BinaryOp::Ge,
];

impl BinaryOp {
    /// Returns the assembly mnemonic for this operation (without the `;`).
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BinaryOp::Add => "ADD",
            BinaryOp::Sub => "SUB",
            BinaryOp::Mul => "MUL",
            BinaryOp::Div => "DIV",
            BinaryOp::Mod => "MOD",
            BinaryOp::Lt => "LT",
            BinaryOp::Eq => "EQ",
            BinaryOp::Ne => "NE",
            BinaryOp::Gt => "GT",
            BinaryOp::Le => "LE",
            BinaryOp::Ge => "GE",
        }
    }

    /// Look up an operation by its mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        ALL_BINARY_OPS
            .iter()
            .find(|op| op.mnemonic() == mnemonic)
            .copied()
    }

    /// Apply the operation to `first` (top of stack) and `second` (below it).
    ///
    /// Arithmetic wraps on overflow. Returns `None` only for DIV/MOD with
    /// `first == 0`.
    pub fn apply(&self, first: i32, second: i32) -> Option<i32> {
        let result = match self {
            BinaryOp::Add => second.wrapping_add(first),
            BinaryOp::Sub => second.wrapping_sub(first),
            BinaryOp::Mul => second.wrapping_mul(first),
            BinaryOp::Div => {
                if first == 0 {
                    return None;
                }
                second.wrapping_div(first)
            }
            BinaryOp::Mod => {
                if first == 0 {
                    return None;
                }
                second.wrapping_rem(first)
            }
            BinaryOp::Lt => (second < first) as i32,
            BinaryOp::Eq => (second == first) as i32,
            BinaryOp::Ne => (second != first) as i32,
            BinaryOp::Gt => (second > first) as i32,
            BinaryOp::Le => (second <= first) as i32,
            BinaryOp::Ge => (second >= first) as i32,
        };
        Some(result)
    }
}
