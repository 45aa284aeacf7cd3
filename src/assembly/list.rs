//! Owned instruction sequences.

use std::{fmt, slice, vec};

use crate::assembly::Instruction;

/// An owned sequence of instructions, ready to be spliced into a rewritten method body.
///
/// Sequences produced by [`crate::analysis::CodeValue::clone_instructions`] share nothing
/// with the arena they were cloned from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsnList {
    insns: Vec<Instruction>,
}

impl InsnList {
    /// Creates an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sequence holding exactly `insn`.
    #[must_use]
    pub fn singleton(insn: Instruction) -> Self {
        Self { insns: vec![insn] }
    }

    /// Appends an instruction.
    pub fn push(&mut self, insn: Instruction) {
        self.insns.push(insn);
    }

    /// Moves all instructions of `other` to the end of this sequence.
    pub fn append(&mut self, other: &mut InsnList) {
        self.insns.append(&mut other.insns);
    }

    /// Returns the number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.insns.len()
    }

    /// Returns `true` if the sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insns.is_empty()
    }

    /// Returns the first instruction.
    #[must_use]
    pub fn first(&self) -> Option<&Instruction> {
        self.insns.first()
    }

    /// Returns the instructions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Instruction] {
        &self.insns
    }

    /// Iterates over the instructions.
    pub fn iter(&self) -> slice::Iter<'_, Instruction> {
        self.insns.iter()
    }
}

impl From<Vec<Instruction>> for InsnList {
    fn from(insns: Vec<Instruction>) -> Self {
        Self { insns }
    }
}

impl FromIterator<Instruction> for InsnList {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        Self {
            insns: iter.into_iter().collect(),
        }
    }
}

impl Extend<Instruction> for InsnList {
    fn extend<T: IntoIterator<Item = Instruction>>(&mut self, iter: T) {
        self.insns.extend(iter);
    }
}

impl IntoIterator for InsnList {
    type Item = Instruction;
    type IntoIter = vec::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.insns.into_iter()
    }
}

impl<'a> IntoIterator for &'a InsnList {
    type Item = &'a Instruction;
    type IntoIter = slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.insns.iter()
    }
}

impl fmt::Display for InsnList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, insn) in self.insns.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{insn}")?;
        }
        Ok(())
    }
}
