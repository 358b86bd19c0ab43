//! Program store: an immutable, 1-indexed instruction sequence.

/// A loaded program.
///
/// Instructions are addressed 1-based, matching the program counter:
/// `get(1)` is the first instruction and `pc == 0` is the halt sentinel,
/// never a valid index. The length bounds every jump and call target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program<I> {
    instructions: Vec<I>,
}

impl<I> Program<I> {
    /// Create a program from a vector of instructions.
    pub fn new(instructions: Vec<I>) -> Self {
        Self { instructions }
    }

    /// Fetch the instruction at 1-based position `pc`.
    ///
    /// Returns `None` for `pc == 0` and for `pc > len()`.
    pub fn get(&self, pc: usize) -> Option<&I> {
        pc.checked_sub(1).and_then(|i| self.instructions.get(i))
    }

    /// The instruction stream in program order.
    pub fn instructions(&self) -> &[I] {
        &self.instructions
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl<I> FromIterator<I> for Program<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
