//! Code values tracked for operand-stack and local-variable slots.
//!
//! A [`CodeValue`] is what the abstract interpreter stores in a slot while it walks a
//! method body. It remembers the static type of the slot and the instruction that
//! produced it, and is one of exactly three variants:
//!
//! ```text
//!   Number(c)    statically known number; c is integral, floating, char or boolean
//!   String(s)    statically known string
//!   Unknown      produced by an instruction whose effect cannot be determined
//! ```
//!
//! The rewrite phase uses the values in two ways. Known values can replace their
//! producing computation with a single constant load ([`CodeValue::clone_instructions`]);
//! values that are [required in code](CodeValue::is_required_in_code) keep their producing
//! instruction alive.
//!
//! # Equality
//!
//! [`CodeValue::equals_with`] compares variant first and payload second. Numbers compare
//! by their value in the computational type (`byte`, `short`, `char` and `boolean` as
//! `int`; bitwise for floating kinds), strings by content and unknown values by the
//! identity of their producing instruction or merge site. The slot type and the pin state
//! do not take part. The fixpoint driver stops iterating once no slot changed
//! under this relation.
//!
//! # Joins
//!
//! [`CodeValue::combine`] is the identity join used when a definition meets itself (a loop
//! back edge revisiting the same value). [`CodeValue::join`] merges values arriving from
//! distinct predecessors at a [`MergeSite`]: equal values stay, disagreements become a
//! merged [`ValueKind::Unknown`] anchored at the site. A merged value has no single
//! producing instruction, so it cannot be materialized by
//! [`CodeValue::clone_instructions`]; the rewrite keeps the incoming paths instead.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use log::debug;

use crate::{
    analysis::ValueType,
    assembly::{Constant, InsnArena, InsnId, InsnList, Instruction, LabelMap},
    Error, Result,
};

/// A control-flow join point for one frame slot.
///
/// `insn` is the first instruction of the join block (typically its label) and `slot`
/// the index into the frame, locals first and stack entries after them. Each pair names
/// one merged value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeSite {
    insn: InsnId,
    slot: u32,
}

impl MergeSite {
    /// Creates a merge site for frame slot `slot` at `insn`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(insn: InsnId, slot: usize) -> Self {
        Self {
            insn,
            slot: slot as u32,
        }
    }

    /// Returns the instruction the join block starts with.
    #[must_use]
    pub const fn insn(self) -> InsnId {
        self.insn
    }

    /// Returns the frame slot index.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.slot as usize
    }
}

impl fmt::Display for MergeSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.insn, self.slot)
    }
}

/// Where a value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Origin {
    /// Pushed by its instruction
    Produced,
    /// Joined from several predecessors at the instruction, for this frame slot
    Merged { slot: u32 },
}

/// The payload of a [`CodeValue`].
#[derive(Debug, Clone)]
pub enum ValueKind {
    /// Statically known number: integral, floating, `char` or `boolean`
    Number(Constant),
    /// Statically known string
    String(String),
    /// Produced by an instruction whose effect cannot be determined
    Unknown,
}

/// An abstract value occupying one slot during abstract interpretation.
///
/// Values are immutable; operations that change an aspect of a value return a new one.
///
/// # Examples
///
/// ```rust
/// use bytefold::prelude::*;
///
/// let mut arena = InsnArena::new();
/// let ldc = arena.push(Instruction::Ldc(Constant::Boolean(true)));
/// let call = arena.push(Instruction::Method {
///     opcode: Opcode::Invokestatic,
///     method: MemberRef::new("a/B", "c", "()I"),
///     interface: false,
/// });
///
/// let join = arena.new_label();
/// let merge = arena.push(Instruction::Label(join));
///
/// let flag = CodeValue::number(ValueType::Int, ldc, Constant::Boolean(true))?;
/// let opaque = CodeValue::unknown(ValueType::Int, call, &arena)?;
///
/// assert_eq!(flag.stack_value(), Some(Constant::Int(1)));
/// assert!(!flag.is_required_in_code());
/// assert!(opaque.is_required_in_code());
/// assert!(!flag.equals_with(&opaque));
///
/// // A disagreement at a merge point is no longer a constant
/// let merged = flag.join(&opaque, MergeSite::new(merge, 0));
/// assert!(!merged.is_known_value());
/// assert!(merged.clone_instructions(&arena).is_err());
/// # Ok::<(), bytefold::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CodeValue {
    ty: ValueType,
    insn: InsnId,
    kind: ValueKind,
    pinned: bool,
    origin: Origin,
}

impl CodeValue {
    /// Creates a known numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotANumber`] if `value` is not integral, floating, `char` or
    /// `boolean`.
    pub fn number(ty: ValueType, insn: InsnId, value: Constant) -> Result<Self> {
        if !value.is_numeric() {
            return Err(Error::NotANumber(value.kind()));
        }

        Ok(Self {
            ty,
            insn,
            kind: ValueKind::Number(value),
            pinned: false,
            origin: Origin::Produced,
        })
    }

    /// Creates a known string value.
    pub fn string(ty: ValueType, insn: InsnId, value: impl Into<String>) -> Self {
        Self {
            ty,
            insn,
            kind: ValueKind::String(value.into()),
            pinned: false,
            origin: Origin::Produced,
        }
    }

    /// Creates a known value from any constant, picking the string or number variant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotANumber`] for constants that neither variant can carry (class
    /// literals and method types).
    pub fn known(ty: ValueType, insn: InsnId, value: Constant) -> Result<Self> {
        match value {
            Constant::String(s) => Ok(Self::string(ty, insn, s)),
            other => Self::number(ty, insn, other),
        }
    }

    /// Creates an unknown value produced by the instruction `insn` of `arena`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAStackValue`] if the instruction is a label or a jump, and
    /// [`Error::InstructionNotFound`] if `insn` does not belong to `arena`.
    pub fn unknown(ty: ValueType, insn: InsnId, arena: &InsnArena) -> Result<Self> {
        let instruction = arena.get(insn)?;
        if !instruction.may_produce_value() {
            return Err(Error::NotAStackValue(instruction.kind()));
        }

        Ok(Self {
            ty,
            insn,
            kind: ValueKind::Unknown,
            pinned: false,
            origin: Origin::Produced,
        })
    }

    /// Returns this value marked as required in code.
    ///
    /// Used for values whose producing instruction has effects beyond the value itself,
    /// such as a call whose return value is known.
    #[must_use]
    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    /// Returns this value with its static type replaced.
    #[must_use]
    pub fn with_type(mut self, ty: ValueType) -> Self {
        self.ty = ty;
        self
    }

    /// Returns the payload.
    #[must_use]
    pub const fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Returns the static type of the slot.
    #[must_use]
    pub const fn value_type(&self) -> &ValueType {
        &self.ty
    }

    /// Returns the number of slots this value occupies.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.ty.size()
    }

    /// Returns the handle of the producing instruction, or of the first instruction of
    /// the join block for a merged value.
    #[must_use]
    pub const fn producer(&self) -> InsnId {
        self.insn
    }

    /// Returns the merge site of a value created by a disagreeing [`CodeValue::join`].
    #[must_use]
    pub const fn merge_site(&self) -> Option<MergeSite> {
        match self.origin {
            Origin::Produced => None,
            Origin::Merged { slot } => Some(MergeSite {
                insn: self.insn,
                slot,
            }),
        }
    }

    /// Returns `true` for statically known values.
    #[must_use]
    pub const fn is_known_value(&self) -> bool {
        !matches!(self.kind, ValueKind::Unknown)
    }

    /// Returns `true` if the producing instruction must survive the rewrite regardless of
    /// whether the value is known.
    ///
    /// Unknown values are always required. Known values are required only when pinned.
    #[must_use]
    pub const fn is_required_in_code(&self) -> bool {
        self.pinned || matches!(self.kind, ValueKind::Unknown)
    }

    /// Joins this value with an occurrence of itself.
    ///
    /// The result is equal to `self`.
    #[must_use]
    pub fn combine(&self) -> Self {
        self.clone()
    }

    /// Joins values arriving at the control-flow merge point `site` from distinct
    /// predecessors.
    ///
    /// Equal values join to `self` (pinned if either side is). Disagreeing values join to
    /// an unknown value anchored at `site` with `self`'s type. It is required in code and
    /// cannot be materialized, so a rewrite never substitutes either predecessor's
    /// constant for it. Joining into a value already merged at `site` yields an equal
    /// value, which lets the fixpoint iteration settle.
    #[must_use]
    pub fn join(&self, other: &Self, site: MergeSite) -> Self {
        if self.equals_with(other) {
            let mut joined = self.combine();
            joined.pinned |= other.pinned;
            return joined;
        }

        if self.is_known_value() || other.is_known_value() {
            debug!("merge of {self} and {other} at {site} is not constant");
        }

        Self {
            ty: self.ty.clone(),
            insn: site.insn,
            kind: ValueKind::Unknown,
            pinned: false,
            origin: Origin::Merged { slot: site.slot },
        }
    }

    /// Structural equality: variant first, then payload.
    #[must_use]
    pub fn equals_with(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => a.computational() == b.computational(),
            (ValueKind::String(a), ValueKind::String(b)) => a == b,
            (ValueKind::Unknown, ValueKind::Unknown) => {
                self.insn == other.insn && self.origin == other.origin
            }
            _ => false,
        }
    }

    /// Produces an owned instruction sequence that reproduces this value on the stack.
    ///
    /// Known values synthesize a single `ldc` of the normalized payload. Unknown values
    /// deep-clone their producing instruction out of `arena`, keeping its labels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InstructionNotFound`] if an unknown value's producer is not in
    /// `arena`, and [`Error::NotMaterializable`] for a merged value.
    pub fn clone_instructions(&self, arena: &InsnArena) -> Result<InsnList> {
        self.clone_instructions_with(arena, &LabelMap::new())
    }

    /// Like [`CodeValue::clone_instructions`], remapping the labels referenced by a cloned
    /// producer through `labels`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InstructionNotFound`] if an unknown value's producer is not in
    /// `arena`, and [`Error::NotMaterializable`] for a merged value.
    pub fn clone_instructions_with(
        &self,
        arena: &InsnArena,
        labels: &LabelMap,
    ) -> Result<InsnList> {
        let insn = match (&self.kind, self.origin) {
            (ValueKind::Number(c), _) => Instruction::Ldc(c.normalized()),
            (ValueKind::String(s), _) => Instruction::Ldc(Constant::String(s.clone())),
            (ValueKind::Unknown, Origin::Merged { slot }) => {
                return Err(Error::NotMaterializable(MergeSite {
                    insn: self.insn,
                    slot,
                }))
            }
            (ValueKind::Unknown, Origin::Produced) => arena.get(self.insn)?.clone_with(labels),
        };
        Ok(InsnList::singleton(insn))
    }

    /// Returns the instructions this value originates from, for liveness bookkeeping.
    ///
    /// For a merged value this is the first instruction of the join block.
    #[must_use]
    pub fn instructions(&self) -> &[InsnId] {
        std::slice::from_ref(&self.insn)
    }

    /// Returns the concrete stack value of a known value, `None` for unknown values.
    ///
    /// `char` payloads are returned as their code unit and `boolean` payloads as `0`/`1`,
    /// both as [`Constant::Int`].
    #[must_use]
    pub fn stack_value(&self) -> Option<Constant> {
        match &self.kind {
            ValueKind::Number(c) => Some(c.normalized()),
            ValueKind::String(s) => Some(Constant::String(s.clone())),
            ValueKind::Unknown => None,
        }
    }
}

impl PartialEq for CodeValue {
    fn eq(&self, other: &Self) -> bool {
        self.equals_with(other)
    }
}

impl Eq for CodeValue {}

impl Hash for CodeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.kind {
            ValueKind::Number(c) => {
                0u8.hash(state);
                c.computational().hash(state);
            }
            ValueKind::String(s) => {
                1u8.hash(state);
                s.hash(state);
            }
            ValueKind::Unknown => {
                2u8.hash(state);
                self.insn.hash(state);
                self.origin.hash(state);
            }
        }
    }
}

impl fmt::Display for CodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ty.is_uninitialized() {
            return write!(f, "uninitialized");
        }

        match &self.kind {
            ValueKind::Number(c) => write!(f, "number {c} ({})", self.ty),
            ValueKind::String(s) => write!(f, "string \"{}\" ({})", s.escape_default(), self.ty),
            ValueKind::Unknown => match self.merge_site() {
                Some(site) => write!(f, "unknown merge {site} ({})", self.ty),
                None => write!(f, "unknown {} ({})", self.insn, self.ty),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::assembly::{LabelId, MemberRef, Opcode};

    struct Body {
        arena: InsnArena,
        ldc: InsnId,
        call: InsnId,
        add: InsnId,
        label: InsnId,
        jump: InsnId,
    }

    fn body() -> Body {
        let mut arena = InsnArena::new();
        let target = arena.new_label();
        let ldc = arena.push(Instruction::Ldc(Constant::Int(3)));
        let call = arena.push(Instruction::Method {
            opcode: Opcode::Invokestatic,
            method: MemberRef::new("a/B", "next", "()I"),
            interface: false,
        });
        let add = arena.push(Instruction::Insn(Opcode::Iadd));
        let label = arena.push(Instruction::Label(target));
        let jump = arena.push(Instruction::Jump {
            opcode: Opcode::Goto,
            label: target,
        });
        Body {
            arena,
            ldc,
            call,
            add,
            label,
            jump,
        }
    }

    #[test]
    fn test_number_rejects_non_numeric() {
        let b = body();
        assert!(matches!(
            CodeValue::number(ValueType::string(), b.ldc, Constant::String("x".into())),
            Err(Error::NotANumber(crate::assembly::ConstantKind::String))
        ));
        assert!(matches!(
            CodeValue::number(ValueType::Reference(None), b.ldc, Constant::Type("a/B".into())),
            Err(Error::NotANumber(_))
        ));
        assert!(matches!(
            CodeValue::known(ValueType::Reference(None), b.ldc, Constant::Type("a/B".into())),
            Err(Error::NotANumber(_))
        ));
    }

    #[test]
    fn test_known_dispatches() {
        let b = body();
        let s = CodeValue::known(ValueType::string(), b.ldc, Constant::String("x".into())).unwrap();
        assert!(matches!(s.kind(), ValueKind::String(v) if v == "x"));
        let n = CodeValue::known(ValueType::Int, b.ldc, Constant::Short(4)).unwrap();
        assert!(matches!(n.kind(), ValueKind::Number(Constant::Short(4))));
    }

    #[test]
    fn test_unknown_rejects_label_and_jump() {
        let b = body();
        assert!(matches!(
            CodeValue::unknown(ValueType::Int, b.label, &b.arena),
            Err(Error::NotAStackValue(crate::assembly::InsnKind::Label))
        ));
        assert!(matches!(
            CodeValue::unknown(ValueType::Int, b.jump, &b.arena),
            Err(Error::NotAStackValue(crate::assembly::InsnKind::Jump))
        ));
        assert!(matches!(
            CodeValue::unknown(ValueType::Int, InsnId::new(99), &b.arena),
            Err(Error::InstructionNotFound(_))
        ));
    }

    #[test]
    fn test_stack_value_normalization() {
        let b = body();
        let cases = [
            (Constant::Char(u16::from(b'A')), Constant::Int(65)),
            (Constant::Boolean(true), Constant::Int(1)),
            (Constant::Boolean(false), Constant::Int(0)),
            (Constant::Byte(-2), Constant::Byte(-2)),
            (Constant::Long(1 << 40), Constant::Long(1 << 40)),
            (Constant::Double(2.5), Constant::Double(2.5)),
        ];
        for (payload, expected) in cases {
            let v = CodeValue::number(ValueType::Int, b.ldc, payload).unwrap();
            assert_eq!(v.stack_value(), Some(expected));
        }

        let unknown = CodeValue::unknown(ValueType::Int, b.call, &b.arena).unwrap();
        assert_eq!(unknown.stack_value(), None);
    }

    #[test]
    fn test_known_and_required() {
        let b = body();
        let n = CodeValue::number(ValueType::Int, b.ldc, Constant::Int(3)).unwrap();
        let s = CodeValue::string(ValueType::string(), b.ldc, "hi");
        let u = CodeValue::unknown(ValueType::Int, b.add, &b.arena).unwrap();

        assert!(n.is_known_value() && !n.is_required_in_code());
        assert!(s.is_known_value() && !s.is_required_in_code());
        assert!(!u.is_known_value() && u.is_required_in_code());

        let pinned = n.clone().pinned();
        assert!(pinned.is_required_in_code());
        assert!(pinned.equals_with(&n));
    }

    #[test]
    fn test_equality() {
        let b = body();
        let char_a = CodeValue::number(ValueType::Int, b.ldc, Constant::Char(65)).unwrap();
        let int_65 = CodeValue::number(ValueType::Int, b.call, Constant::Int(65)).unwrap();
        let str_65 = CodeValue::string(ValueType::string(), b.ldc, "65");
        let str_a = CodeValue::string(ValueType::string(), b.ldc, "A");
        let u_call = CodeValue::unknown(ValueType::Int, b.call, &b.arena).unwrap();
        let u_call2 = CodeValue::unknown(ValueType::Long, b.call, &b.arena).unwrap();
        let u_add = CodeValue::unknown(ValueType::Int, b.add, &b.arena).unwrap();

        // Normalized payloads compare equal across producers
        assert!(char_a.equals_with(&int_65));
        assert!(int_65.equals_with(&char_a));

        // Variants never cross
        assert!(!int_65.equals_with(&str_65));
        assert!(!char_a.equals_with(&str_a));
        assert!(!str_65.equals_with(&int_65));
        assert!(!u_call.equals_with(&int_65));

        // Unknown compares producer identity only
        assert!(u_call.equals_with(&u_call2));
        assert!(!u_call.equals_with(&u_add));

        for v in [&char_a, &int_65, &str_65, &u_call, &u_add] {
            assert!(v.equals_with(v));
            assert_eq!(v, v);
        }
    }

    #[test]
    fn test_nan_reflexive() {
        let b = body();
        let nan = CodeValue::number(ValueType::Double, b.ldc, Constant::Double(f64::NAN)).unwrap();
        assert!(nan.equals_with(&nan.combine()));
    }

    #[test]
    fn test_hash_matches_equality() {
        let b = body();
        let mut set = HashSet::new();
        set.insert(CodeValue::number(ValueType::Int, b.ldc, Constant::Char(65)).unwrap());
        set.insert(CodeValue::number(ValueType::Int, b.call, Constant::Int(65)).unwrap());
        set.insert(CodeValue::string(ValueType::string(), b.ldc, "A"));
        set.insert(CodeValue::unknown(ValueType::Int, b.call, &b.arena).unwrap());
        set.insert(CodeValue::unknown(ValueType::Int, b.call, &b.arena).unwrap());
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_combine_idempotent() {
        let b = body();
        let values = [
            CodeValue::number(ValueType::Long, b.ldc, Constant::Long(9)).unwrap(),
            CodeValue::string(ValueType::string(), b.ldc, "s"),
            CodeValue::unknown(ValueType::Int, b.add, &b.arena).unwrap(),
        ];
        for v in values {
            let once = v.combine();
            assert!(once.equals_with(&v));
            assert!(once.combine().equals_with(&v));
        }
    }

    #[test]
    fn test_join() {
        let b = body();
        let three = CodeValue::number(ValueType::Int, b.ldc, Constant::Int(3)).unwrap();
        let four = CodeValue::number(ValueType::Int, b.call, Constant::Int(4)).unwrap();
        let pinned_three =
            CodeValue::number(ValueType::Int, b.call, Constant::Int(3)).unwrap().pinned();

        let site = MergeSite::new(b.label, 0);

        let same = three.join(&pinned_three, site);
        assert!(same.equals_with(&three));
        assert!(same.is_required_in_code());
        assert_eq!(same.merge_site(), None);

        let merged = three.join(&four, site);
        assert!(!merged.is_known_value());
        assert!(merged.is_required_in_code());
        assert_eq!(merged.producer(), b.label);
        assert_eq!(merged.merge_site(), Some(site));
        assert_eq!(merged.value_type(), &ValueType::Int);
        assert_eq!(merged.instructions(), &[b.label]);

        // Anchored at the site, so the order of the operands does not matter
        assert!(four.join(&three, site).equals_with(&merged));
        // A later iteration joining into the merged slot settles
        assert!(merged.join(&three, site).equals_with(&merged));
        assert!(merged.join(&merged, site).equals_with(&merged));
    }

    #[test]
    fn test_merged_value_not_materializable() {
        let b = body();
        let three = CodeValue::number(ValueType::Int, b.ldc, Constant::Int(3)).unwrap();
        let four = CodeValue::number(ValueType::Int, b.call, Constant::Int(4)).unwrap();
        let five = CodeValue::number(ValueType::Int, b.add, Constant::Int(5)).unwrap();
        let site = MergeSite::new(b.label, 2);

        let merged = three.join(&four, site);
        match merged.clone_instructions(&b.arena) {
            Err(Error::NotMaterializable(at)) => assert_eq!(at, site),
            other => panic!("merged value rebuilt as {other:?}"),
        }
        assert_eq!(merged.stack_value(), None);

        // Different sites or slots are different values
        let elsewhere = three.join(&five, MergeSite::new(b.jump, 2));
        let other_slot = three.join(&five, MergeSite::new(b.label, 3));
        assert!(!merged.equals_with(&elsewhere));
        assert!(!merged.equals_with(&other_slot));

        // A merge is never equal to the plain unknown value of its anchor instruction
        let plain = CodeValue::unknown(ValueType::Int, b.call, &b.arena).unwrap();
        let at_call = three.join(&five, MergeSite::new(b.call, 2));
        assert!(!at_call.equals_with(&plain));

        let mut set = HashSet::new();
        set.insert(merged.clone());
        set.insert(four.join(&three, site));
        set.insert(elsewhere);
        set.insert(other_slot);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_int_sized_kinds_equal() {
        let b = body();
        let int_65 = CodeValue::number(ValueType::Int, b.ldc, Constant::Int(65)).unwrap();
        let byte_65 = CodeValue::number(ValueType::Int, b.call, Constant::Byte(65)).unwrap();
        let short_65 = CodeValue::number(ValueType::Int, b.add, Constant::Short(65)).unwrap();
        let long_65 = CodeValue::number(ValueType::Long, b.ldc, Constant::Long(65)).unwrap();

        assert_eq!(byte_65, int_65);
        assert_eq!(short_65, int_65);
        assert_ne!(long_65, int_65);

        let mut set = HashSet::new();
        set.insert(int_65);
        set.insert(byte_65.clone());
        set.insert(short_65);
        assert_eq!(set.len(), 1);

        // Equal values join without losing the constant
        let site = MergeSite::new(b.label, 0);
        assert!(byte_65.join(&set.into_iter().next().unwrap(), site).is_known_value());
    }

    #[test]
    fn test_clone_instructions_known() {
        let b = body();
        let c = CodeValue::number(ValueType::Int, b.ldc, Constant::Char(65)).unwrap();
        let list = c.clone_instructions(&b.arena).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.first(), Some(&Instruction::Ldc(Constant::Int(65))));
        assert_eq!(
            list.first(),
            Some(&Instruction::Ldc(c.stack_value().unwrap()))
        );

        let s = CodeValue::string(ValueType::string(), b.ldc, "hello");
        let list = s.clone_instructions(&InsnArena::new()).unwrap();
        assert_eq!(list.as_slice(), &[Instruction::Ldc(Constant::String("hello".into()))]);
    }

    #[test]
    fn test_clone_instructions_unknown() {
        let b = body();
        let u = CodeValue::unknown(ValueType::Int, b.call, &b.arena).unwrap();
        let list = u.clone_instructions(&b.arena).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.first(), Some(b.arena.get(b.call).unwrap()));

        let stale = CodeValue::unknown(ValueType::Int, b.call, &b.arena).unwrap();
        assert!(matches!(
            stale.clone_instructions(&InsnArena::new()),
            Err(Error::InstructionNotFound(_))
        ));
    }

    #[test]
    fn test_clone_instructions_remaps_labels() {
        let mut arena = InsnArena::new();
        let default = arena.new_label();
        let case = arena.new_label();
        let switch = arena.push(Instruction::LookupSwitch {
            default,
            keys: vec![1],
            labels: vec![case],
        });
        let u = CodeValue::unknown(ValueType::Int, switch, &arena).unwrap();

        let labels: LabelMap = [(case, LabelId::new(40))].into_iter().collect();
        let list = u.clone_instructions_with(&arena, &labels).unwrap();
        assert_eq!(
            list.first(),
            Some(&Instruction::LookupSwitch {
                default,
                keys: vec![1],
                labels: vec![LabelId::new(40)],
            })
        );
    }

    #[test]
    fn test_instructions_and_size() {
        let b = body();
        let v = CodeValue::number(ValueType::Double, b.ldc, Constant::Double(1.0)).unwrap();
        assert_eq!(v.instructions(), &[b.ldc]);
        assert_eq!(v.size(), 2);
        assert_eq!(v.clone().with_type(ValueType::Int).size(), 1);
    }

    #[test]
    fn test_display() {
        let b = body();
        let n = CodeValue::number(ValueType::Int, b.ldc, Constant::Char(65)).unwrap();
        assert_eq!(n.to_string(), "number 'A' (I)");
        let u = CodeValue::unknown(ValueType::Long, b.call, &b.arena).unwrap();
        assert_eq!(u.to_string(), "unknown #1 (J)");
        let uninit = CodeValue::unknown(ValueType::Uninitialized, b.call, &b.arena).unwrap();
        assert_eq!(uninit.to_string(), "uninitialized");

        let three = CodeValue::number(ValueType::Int, b.ldc, Constant::Int(3)).unwrap();
        let four = CodeValue::number(ValueType::Int, b.call, Constant::Int(4)).unwrap();
        let merged = three.join(&four, MergeSite::new(b.label, 0));
        assert_eq!(merged.to_string(), "unknown merge #3[0] (I)");
    }
}
