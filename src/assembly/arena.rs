//! Per-method instruction storage addressed by handles.
//!
//! The [`InsnArena`] is owned by the driver's method body representation. Everything else
//! (code values, dependency bookkeeping) refers to instructions by [`InsnId`], so the
//! lifetime of a value is independent of the lifetime of the instruction collection.

use std::fmt;

use crate::{
    assembly::{Instruction, LabelId},
    Error, Result,
};

/// Handle to an instruction in an [`InsnArena`].
///
/// The handle is unique within a single arena but not across arenas. Two code values
/// produced by the same instruction share the same handle, which is the identity used by
/// unknown-value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InsnId(u32);

impl InsnId {
    /// Creates a handle from a raw arena index.
    ///
    /// Method bodies are bounded to 65535 bytes of code, far below the 32-bit range of the
    /// handle.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InsnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Append-only instruction storage of a single method body.
///
/// Instructions are never removed or mutated in place; a rewrite builds a new body from
/// [`crate::assembly::InsnList`]s.
///
/// # Examples
///
/// ```rust
/// use bytefold::assembly::{InsnArena, Instruction, Opcode};
///
/// let mut arena = InsnArena::new();
/// let start = arena.new_label();
/// arena.push(Instruction::Label(start));
/// let add = arena.push(Instruction::Insn(Opcode::Iadd));
///
/// assert_eq!(arena.len(), 2);
/// assert_eq!(arena.get(add)?, &Instruction::Insn(Opcode::Iadd));
/// # Ok::<(), bytefold::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct InsnArena {
    insns: Vec<Instruction>,
    labels: u32,
}

impl InsnArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an instruction and returns its handle.
    pub fn push(&mut self, insn: Instruction) -> InsnId {
        let id = InsnId::new(self.insns.len());
        self.insns.push(insn);
        id
    }

    /// Allocates a fresh label, unique within this arena.
    pub fn new_label(&mut self) -> LabelId {
        let label = LabelId::new(self.labels);
        self.labels += 1;
        label
    }

    /// Returns the instruction behind `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InstructionNotFound`] if `id` does not belong to this arena.
    pub fn get(&self, id: InsnId) -> Result<&Instruction> {
        self.insns
            .get(id.index())
            .ok_or(Error::InstructionNotFound(id))
    }

    /// Returns `true` if `id` refers to an instruction of this arena.
    #[must_use]
    pub fn contains(&self, id: InsnId) -> bool {
        id.index() < self.insns.len()
    }

    /// Returns the number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.insns.len()
    }

    /// Returns `true` if the arena holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insns.is_empty()
    }

    /// Iterates over all instructions with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (InsnId, &Instruction)> {
        self.insns
            .iter()
            .enumerate()
            .map(|(index, insn)| (InsnId::new(index), insn))
    }
}

impl FromIterator<Instruction> for InsnArena {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        let mut arena = Self::new();
        for insn in iter {
            if let Instruction::Label(label) = insn {
                arena.labels = arena.labels.max(label.index() + 1);
            }
            arena.push(insn);
        }
        arena
    }
}
