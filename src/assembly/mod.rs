//! JVM instruction model consumed by the value layer.
//!
//! This module provides the minimal in-memory representation of a method body that
//! code values need: they reference producing instructions by handle, inspect their
//! shape, and clone them (or synthesize constant loads) when the rewrite phase
//! materializes a value. Decoding from and encoding to the class-file format is the job
//! of the surrounding pipeline.
//!
//! # Key Types
//! - [`Instruction`] - One node of the instruction tree
//! - [`Opcode`] - JVM opcodes with their mnemonics
//! - [`Constant`] - `ldc` payloads and the number sugar kinds
//! - [`InsnArena`] / [`InsnId`] - Handle-addressed storage owned by the method body
//! - [`InsnList`] - Owned instruction sequences produced during rewriting
//! - [`LabelId`] / [`LabelMap`] - Jump targets and their remapping
//!
//! # Example
//! ```rust
//! use bytefold::assembly::{InsnArena, InsnList, Instruction, LabelMap, Opcode};
//!
//! let mut arena = InsnArena::new();
//! let id = arena.push(Instruction::Insn(Opcode::Iadd));
//!
//! // Clone the instruction out of the arena into an owned sequence
//! let list = InsnList::singleton(arena.get(id)?.clone_with(&LabelMap::new()));
//! assert_eq!(list.len(), 1);
//! # Ok::<(), bytefold::Error>(())
//! ```

mod arena;
mod constant;
mod instruction;
mod list;
mod opcode;

pub use arena::{InsnArena, InsnId};
pub use constant::{Constant, ConstantKind};
pub use instruction::{InsnKind, Instruction, LabelId, LabelMap, MemberRef};
pub use list::InsnList;
pub use opcode::Opcode;
