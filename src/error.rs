use thiserror::Error;

use crate::{
    analysis::MergeSite,
    assembly::{ConstantKind, InsnId, InsnKind},
};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors fall into two groups. Construction errors ([`Error::NotANumber`],
/// [`Error::NotAStackValue`], [`Error::NotMaterializable`]) signal a bug in the calling
/// driver: a value was requested for a payload or an instruction that can never back one, or
/// a merged value was asked to rewrite itself. Lookup errors
/// ([`Error::InstructionNotFound`], [`Error::UnexpectedInstruction`]) signal a handle or an
/// instruction shape that does not match the method body it was used with.
///
/// A reference handler that cannot answer a query does *not* produce an error; see
/// [`crate::analysis::Resolution`].
///
/// # Examples
///
/// ```rust
/// use bytefold::{prelude::*, Error};
///
/// let mut arena = InsnArena::new();
/// let id = arena.push(Instruction::Ldc(Constant::String("x".into())));
///
/// match CodeValue::number(ValueType::Int, id, Constant::String("x".into())) {
///     Err(Error::NotANumber(kind)) => assert_eq!(kind, ConstantKind::String),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input data for an operation.
    ///
    /// The error includes the source location where the problem was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A numeric value was constructed from a payload that is not a number.
    ///
    /// Only integral, floating, character and boolean payloads back a numeric value.
    #[error("Not a number - {0}")]
    NotANumber(ConstantKind),

    /// An unknown value was constructed over an instruction that never leaves a value on
    /// the operand stack (labels and jumps).
    #[error("A {0} instruction does not produce a stack value")]
    NotAStackValue(InsnKind),

    /// An instruction handle does not refer to an instruction in the arena it was used with.
    #[error("Instruction {0} not found")]
    InstructionNotFound(InsnId),

    /// A value merged from disagreeing predecessors was asked for the instructions that
    /// reproduce it. No single instruction does; the incoming paths must be kept.
    #[error("Value merged at {0} has no producing instruction to clone")]
    NotMaterializable(MergeSite),

    /// The instruction behind a handle has a different shape than the operation requires.
    #[error("Unexpected instruction - expected {expected}, found {found}")]
    UnexpectedInstruction {
        /// Description of the instruction shape the operation works on
        expected: &'static str,
        /// The kind of the instruction that was found
        found: InsnKind,
    },
}
