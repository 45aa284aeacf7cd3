//! Values and resolution for constant-propagating abstract interpretation.
//!
//! This module provides the pieces a fixpoint driver needs to simulate a method body
//! over abstract values instead of concrete ones, and to rewrite the body afterwards.
//!
//! # Architecture
//!
//! - [`ValueType`] - verifier-level static type of a slot
//! - [`CodeValue`] - abstract value in a slot: known number, known string or unknown
//! - [`ReferenceHandler`] - oracle for field contents and method return values, with the
//!   stock [`NoopHandler`], [`ConstantTable`], [`IntrinsicHandler`], [`CachingHandler`]
//!   and [`HandlerChain`]
//! - [`AnalysisConfig`] - how far external knowledge is trusted
//! - [`Interpreter`] - creates the value for each value-producing instruction
//!
//! # Usage
//!
//! ```rust
//! use bytefold::prelude::*;
//!
//! let mut arena = InsnArena::new();
//! let a = arena.push(Instruction::Insn(Opcode::Iconst2));
//! let b = arena.push(Instruction::Ldc(Constant::Int(2)));
//! let call = arena.push(Instruction::Method {
//!     opcode: Opcode::Invokestatic,
//!     method: MemberRef::new("a/Rng", "next", "()I"),
//!     interface: false,
//! });
//! let label = arena.new_label();
//! let join = arena.push(Instruction::Label(label));
//! let site = MergeSite::new(join, 0);
//!
//! let interp = Interpreter::new(&arena, &NoopHandler);
//! let left = interp.constant(ValueType::Int, a)?;
//! let right = interp.constant(ValueType::Int, b)?;
//! let opaque = interp.call(ValueType::Int, call, &[])?;
//!
//! // Both branches agree: the merged slot is still the constant 2
//! assert!(left.join(&right, site).is_known_value());
//! // A branch with an opaque result makes the slot unknown
//! assert!(!left.join(&opaque, site).is_known_value());
//! # Ok::<(), bytefold::Error>(())
//! ```

mod config;
mod handler;
mod interp;
mod types;
mod value;

pub use config::AnalysisConfig;
pub use handler::{
    CachingHandler, ConstantTable, FieldAccess, HandlerChain, IntrinsicHandler, NoopHandler,
    ReferenceHandler, Resolution,
};
pub use interp::Interpreter;
pub use types::ValueType;
pub use value::{CodeValue, MergeSite, ValueKind};
