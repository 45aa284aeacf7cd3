// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # bytefold
//!
//! Symbolic code values for constant folding and dead-code removal of JVM bytecode
//! during deobfuscation.
//!
//! While a dataflow driver abstractly interprets a method body, every value that can
//! occupy an operand-stack slot or a local-variable slot is represented by a
//! [`analysis::CodeValue`]: a statically known number, a statically known string, or an
//! opaque value produced by an instruction whose effect cannot be determined. Values keep
//! a handle to the instruction that produced them, so the rewrite phase can either
//! synthesize a replacement constant load or keep the original instruction.
//!
//! Knowledge that a single method body cannot reveal (the initializer of a `static final`
//! field, the result of a pure JDK call) is supplied through the
//! [`analysis::ReferenceHandler`] oracle.
//!
//! ## Architecture
//!
//! - [`assembly`] - The in-memory instruction model: opcodes, instruction nodes, labels,
//!   the per-method [`assembly::InsnArena`] and owned [`assembly::InsnList`] sequences
//! - [`analysis`] - The value lattice, reference handlers, the interpreter glue used by
//!   the driver, and [`analysis::AnalysisConfig`]
//! - [`prelude`] - Re-exports of the commonly used types
//! - [`Error`] and [`Result`] - Error handling
//!
//! The crate does not build control flow graphs, decode class files or drive the fixpoint
//! iteration. It is the value layer those components talk to.
//!
//! ## Quick Start
//!
//! ```rust
//! use bytefold::prelude::*;
//!
//! let mut arena = InsnArena::new();
//! let ldc = arena.push(Instruction::Ldc(Constant::Char(u16::from(b'A'))));
//!
//! let value = CodeValue::number(ValueType::Int, ldc, Constant::Char(u16::from(b'A')))?;
//! assert!(value.is_known_value());
//! assert_eq!(value.stack_value(), Some(Constant::Int(65)));
//!
//! // Rewriting replaces the producer with a single normalized constant load
//! let replacement = value.clone_instructions(&arena)?;
//! assert_eq!(replacement.len(), 1);
//! # Ok::<(), bytefold::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). Construction of a value
//! from an invalid payload, or of an unknown value over a label or jump, fails
//! immediately:
//!
//! ```rust
//! use bytefold::{prelude::*, Error};
//!
//! let mut arena = InsnArena::new();
//! let label = arena.new_label();
//! let id = arena.push(Instruction::Label(label));
//!
//! match CodeValue::unknown(ValueType::Int, id, &arena) {
//!     Err(Error::NotAStackValue(kind)) => println!("{kind} carries no stack value"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
//!
//! A reference handler that cannot answer a query is not an error; it returns
//! [`analysis::Resolution::Unresolved`] and the caller falls back to an unknown value.

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use bytefold::prelude::*;
///
/// let config = AnalysisConfig::conservative();
/// assert!(!config.assume_pure_calls);
/// ```
pub mod prelude;

/// The in-memory JVM instruction model.
///
/// Instructions live in an [`assembly::InsnArena`] owned by the method body and are
/// referenced everywhere else through [`assembly::InsnId`] handles. Owned sequences
/// produced during rewriting are [`assembly::InsnList`]s.
pub mod assembly;

/// Abstract values, reference handlers and the interpreter glue.
pub mod analysis;

pub use error::Error;

/// The generic Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
