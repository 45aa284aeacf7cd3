//! Creation of code values for the instructions an abstract interpreter visits.
//!
//! The fixpoint driver owns the frames and the control flow; for every value-producing
//! instruction it asks the [`Interpreter`] for the value to push. The interpreter decides
//! between a known and an unknown value by inspecting the instruction and, for field
//! reads and calls, by consulting the intrinsic folder and the reference handler.
//!
//! # Example
//!
//! ```rust
//! use bytefold::prelude::*;
//!
//! let mut arena = InsnArena::new();
//! let push = arena.push(Instruction::Int { opcode: Opcode::Bipush, operand: 42 });
//! let read = arena.push(Instruction::Field {
//!     opcode: Opcode::Getstatic,
//!     field: MemberRef::new("a/Config", "DEBUG", "Z"),
//! });
//!
//! let interp = Interpreter::new(&arena, &NoopHandler);
//! let answer = interp.constant(ValueType::Int, push)?;
//! assert_eq!(answer.stack_value(), Some(Constant::Int(42)));
//!
//! // Nobody knows the field, so its read stays in the code
//! let debug = interp.field_read(ValueType::Int, read)?;
//! assert!(!debug.is_known_value());
//! # Ok::<(), bytefold::Error>(())
//! ```

use log::{debug, trace};

use crate::{
    analysis::{
        AnalysisConfig, CodeValue, IntrinsicHandler, ReferenceHandler, Resolution, ValueType,
    },
    assembly::{Constant, InsnArena, InsnId, Instruction, MemberRef, Opcode},
    Error, Result,
};

/// Value factory bound to one method body.
///
/// The interpreter borrows the method's arena and a reference handler. It is cheap to
/// create and holds no state of its own, so a driver may create one per method.
pub struct Interpreter<'a, H: ReferenceHandler + ?Sized> {
    arena: &'a InsnArena,
    handler: &'a H,
    intrinsics: IntrinsicHandler,
    config: AnalysisConfig,
}

impl<'a, H: ReferenceHandler + ?Sized> Interpreter<'a, H> {
    /// Creates an interpreter with the default configuration.
    pub fn new(arena: &'a InsnArena, handler: &'a H) -> Self {
        Self::with_config(arena, handler, AnalysisConfig::default())
    }

    /// Creates an interpreter with an explicit configuration.
    pub fn with_config(arena: &'a InsnArena, handler: &'a H, config: AnalysisConfig) -> Self {
        Self {
            arena,
            handler,
            intrinsics: IntrinsicHandler::new(),
            config,
        }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Returns the method body this interpreter works on.
    #[must_use]
    pub const fn arena(&self) -> &'a InsnArena {
        self.arena
    }

    /// Creates the value pushed by a constant load.
    ///
    /// `ldc`, the `*const_*` family, `bipush` and `sipush` produce a known value.
    /// `aconst_null` and class literals push a reference without a representable payload
    /// and produce an unknown value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedInstruction`] if `insn` is not a constant load, and
    /// [`Error::InstructionNotFound`] if it is not part of the arena.
    pub fn constant(&self, ty: ValueType, insn: InsnId) -> Result<CodeValue> {
        let instruction = self.arena.get(insn)?;
        match instruction.pushed_constant() {
            Some(Constant::Type(_)) => self.unknown(ty, insn),
            Some(value) => CodeValue::known(ty, insn, value),
            None if instruction.opcode() == Some(Opcode::AconstNull) => self.unknown(ty, insn),
            None => Err(Error::UnexpectedInstruction {
                expected: "constant load",
                found: instruction.kind(),
            }),
        }
    }

    /// Creates the value pushed by a `getstatic` or `getfield`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedInstruction`] if `insn` is not a field read, and
    /// [`Error::InstructionNotFound`] if it is not part of the arena.
    pub fn field_read(&self, ty: ValueType, insn: InsnId) -> Result<CodeValue> {
        let field = match self.arena.get(insn)? {
            Instruction::Field {
                opcode: Opcode::Getstatic | Opcode::Getfield,
                field,
            } => field,
            other => {
                return Err(Error::UnexpectedInstruction {
                    expected: "field read",
                    found: other.kind(),
                })
            }
        };

        if !self.config.consult_handler {
            return self.unknown(ty, insn);
        }

        let resolution = self
            .handler
            .resolve_field(&ty, &field.owner, &field.name, &field.desc);
        match self.resolved(&ty, insn, field, resolution) {
            Some(value) => CodeValue::known(ty, insn, value),
            None => self.unknown(ty, insn),
        }
    }

    /// Creates the value returned by a method invocation.
    ///
    /// `args` are the popped operands in stack order, the receiver first for instance
    /// methods. Folded intrinsics produce a removable value. A return value resolved by
    /// the reference handler is pinned unless [`AnalysisConfig::assume_pure_calls`] is
    /// set, since the call may have effects beyond its result. `invokedynamic` call sites
    /// are never resolved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedInstruction`] if `insn` is not an invocation, and
    /// [`Error::InstructionNotFound`] if it is not part of the arena.
    pub fn call(&self, ty: ValueType, insn: InsnId, args: &[CodeValue]) -> Result<CodeValue> {
        let method = match self.arena.get(insn)? {
            Instruction::Method { method, .. } => method,
            Instruction::InvokeDynamic { .. } => return self.unknown(ty, insn),
            other => {
                return Err(Error::UnexpectedInstruction {
                    expected: "method invocation",
                    found: other.kind(),
                })
            }
        };

        if self.config.fold_intrinsics {
            let folded = self.intrinsics.resolve_method_return(
                &ty,
                &method.owner,
                &method.name,
                &method.desc,
                args,
            );
            if let Some(value) = self.resolved(&ty, insn, method, folded) {
                return CodeValue::known(ty, insn, value);
            }
        }

        if !self.config.consult_handler {
            return self.unknown(ty, insn);
        }

        let resolution = self.handler.resolve_method_return(
            &ty,
            &method.owner,
            &method.name,
            &method.desc,
            args,
        );
        let Some(value) = self.resolved(&ty, insn, method, resolution) else {
            return self.unknown(ty, insn);
        };

        let known = CodeValue::known(ty, insn, value)?;
        if self.config.assume_pure_calls {
            Ok(known)
        } else {
            debug!("call {method} at {insn} keeps its instruction, result {known}");
            Ok(known.pinned())
        }
    }

    /// Creates an unknown value produced by `insn`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAStackValue`] for labels and jumps, and
    /// [`Error::InstructionNotFound`] if `insn` is not part of the arena.
    pub fn unknown(&self, ty: ValueType, insn: InsnId) -> Result<CodeValue> {
        CodeValue::unknown(ty, insn, self.arena)
    }

    /// Filters a handler answer down to constants a code value can carry in a slot of
    /// type `ty`.
    fn resolved(
        &self,
        ty: &ValueType,
        insn: InsnId,
        member: &MemberRef,
        resolution: Resolution,
    ) -> Option<Constant> {
        let value = resolution.into_option()?;
        if matches!(value, Constant::Type(_)) {
            trace!("{member} at {insn} resolved to class literal {value}, kept unknown");
            return None;
        }
        if !ty.is_uninitialized() && !ty.accepts(&value) {
            debug!("{member} at {insn} resolved to {value}, which does not fit {ty}");
            return None;
        }

        trace!("{member} at {insn} resolved to {value}");
        Some(value)
    }
}
