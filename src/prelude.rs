//! # bytefold Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the bytefold library. Import this module to get quick access to everything a
//! fixpoint driver needs to create, compare, join and rewrite code values.
//!
//! ```rust
//! use bytefold::prelude::*;
//!
//! let config = AnalysisConfig::conservative();
//! assert!(!config.assume_pure_calls);
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all bytefold operations
pub use crate::Error;

/// The result type used throughout bytefold
pub use crate::Result;

// ================================================================================================
// Instructions
// ================================================================================================

/// Constant payloads and their kinds
pub use crate::assembly::{Constant, ConstantKind};

/// Method body storage and instruction handles
pub use crate::assembly::{InsnArena, InsnId, InsnList};

/// Instruction nodes and their operands
pub use crate::assembly::{InsnKind, Instruction, LabelId, LabelMap, MemberRef, Opcode};

// ================================================================================================
// Code Values
// ================================================================================================

/// Abstract values and slot types
pub use crate::analysis::{CodeValue, MergeSite, ValueKind, ValueType};

// ================================================================================================
// Resolution
// ================================================================================================

/// The handler seam and its answer
pub use crate::analysis::{ReferenceHandler, Resolution};

/// Stock handlers
pub use crate::analysis::{
    CachingHandler, ConstantTable, FieldAccess, HandlerChain, IntrinsicHandler, NoopHandler,
};

/// Interpreter glue and its configuration
pub use crate::analysis::{AnalysisConfig, Interpreter};
