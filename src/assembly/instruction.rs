//! Instruction nodes of a method body.
//!
//! An [`Instruction`] is one node of the instruction tree: a real opcode with its
//! operands, or one of the pseudo nodes (labels, stack map frames, line numbers) that only
//! exist to anchor positions. Jumps and switches refer to positions through [`LabelId`]s,
//! never through instruction handles, so instructions can be cloned into another method
//! body by remapping labels with a [`LabelMap`].

use std::{collections::HashMap, fmt};

use crate::assembly::{Constant, Opcode};

/// Opaque label handle.
///
/// Labels are allocated by the [`crate::assembly::InsnArena`] of a method body and are
/// unique within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(u32);

impl LabelId {
    /// Creates a label handle from its raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this label.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// A label-to-label mapping used when cloning instructions into another context.
///
/// Labels without an entry map to themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    map: HashMap<LabelId, LabelId>,
}

impl LabelMap {
    /// Creates an empty (identity) mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `from` to `to`, returning the previous target of `from` if any.
    pub fn insert(&mut self, from: LabelId, to: LabelId) -> Option<LabelId> {
        self.map.insert(from, to)
    }

    /// Returns the target of `label`.
    #[must_use]
    pub fn get(&self, label: LabelId) -> LabelId {
        self.map.get(&label).copied().unwrap_or(label)
    }

    /// Returns `true` if no label is remapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(LabelId, LabelId)> for LabelMap {
    fn from_iter<T: IntoIterator<Item = (LabelId, LabelId)>>(iter: T) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

/// A symbolic reference to a field or method: owner internal name, member name and
/// descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberRef {
    /// Internal name of the owning class, e.g. `java/lang/String`
    pub owner: String,
    /// Member name
    pub name: String,
    /// Field or method descriptor, e.g. `I` or `(Ljava/lang/String;)I`
    pub desc: String,
}

impl MemberRef {
    /// Creates a member reference.
    pub fn new(owner: impl Into<String>, name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            desc: desc.into(),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.owner, self.name, self.desc)
    }
}

/// The node shape of an [`Instruction`].
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum InsnKind {
    Insn,
    Int,
    Var,
    Type,
    Field,
    Method,
    InvokeDynamic,
    Jump,
    Label,
    Ldc,
    Iinc,
    TableSwitch,
    LookupSwitch,
    MultiNewArray,
    Frame,
    Line,
}

/// One node of a method body's instruction tree.
///
/// # Examples
///
/// ```rust
/// use bytefold::assembly::{Instruction, InsnKind, LabelId, LabelMap, Opcode};
///
/// let jump = Instruction::Jump { opcode: Opcode::Goto, label: LabelId::new(0) };
/// assert_eq!(jump.kind(), InsnKind::Jump);
/// assert_eq!(jump.opcode(), Some(Opcode::Goto));
///
/// let labels: LabelMap = [(LabelId::new(0), LabelId::new(7))].into_iter().collect();
/// let moved = jump.clone_with(&labels);
/// assert_eq!(moved, Instruction::Jump { opcode: Opcode::Goto, label: LabelId::new(7) });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Zero-operand instruction (`iadd`, `iconst_1`, `dup`, `areturn`, ...)
    Insn(Opcode),
    /// `bipush`, `sipush`, `newarray`
    Int {
        /// The opcode
        opcode: Opcode,
        /// Immediate operand (value, or array type code for `newarray`)
        operand: i32,
    },
    /// Local variable load/store and `ret`
    Var {
        /// The opcode
        opcode: Opcode,
        /// Local variable index
        var: u16,
    },
    /// `new`, `anewarray`, `checkcast`, `instanceof`
    Type {
        /// The opcode
        opcode: Opcode,
        /// Internal name or array descriptor
        desc: String,
    },
    /// Field access
    Field {
        /// The opcode
        opcode: Opcode,
        /// The accessed field
        field: MemberRef,
    },
    /// Method invocation other than `invokedynamic`
    Method {
        /// The opcode
        opcode: Opcode,
        /// The invoked method
        method: MemberRef,
        /// Whether the owner is an interface
        interface: bool,
    },
    /// `invokedynamic`
    InvokeDynamic {
        /// Call site name
        name: String,
        /// Call site descriptor
        desc: String,
        /// Bootstrap method
        bootstrap: MemberRef,
        /// Static bootstrap arguments
        bootstrap_args: Vec<Constant>,
    },
    /// Conditional or unconditional jump
    Jump {
        /// The opcode
        opcode: Opcode,
        /// Jump target
        label: LabelId,
    },
    /// Position marker
    Label(LabelId),
    /// Constant load
    Ldc(Constant),
    /// `iinc`
    Iinc {
        /// Local variable index
        var: u16,
        /// Increment
        incr: i32,
    },
    /// `tableswitch`
    TableSwitch {
        /// Lowest key
        min: i32,
        /// Highest key
        max: i32,
        /// Default target
        default: LabelId,
        /// Targets for `min..=max`
        labels: Vec<LabelId>,
    },
    /// `lookupswitch`
    LookupSwitch {
        /// Default target
        default: LabelId,
        /// Sorted keys
        keys: Vec<i32>,
        /// Targets, parallel to `keys`
        labels: Vec<LabelId>,
    },
    /// `multianewarray`
    MultiNewArray {
        /// Array descriptor
        desc: String,
        /// Number of dimensions to allocate
        dims: u8,
    },
    /// Stack map frame marker; frames are recomputed when the method is written back
    Frame,
    /// Line number entry
    Line {
        /// Source line
        line: u32,
        /// First instruction of the line
        start: LabelId,
    },
}

impl Instruction {
    /// Returns the node shape of this instruction.
    #[must_use]
    pub const fn kind(&self) -> InsnKind {
        match self {
            Self::Insn(_) => InsnKind::Insn,
            Self::Int { .. } => InsnKind::Int,
            Self::Var { .. } => InsnKind::Var,
            Self::Type { .. } => InsnKind::Type,
            Self::Field { .. } => InsnKind::Field,
            Self::Method { .. } => InsnKind::Method,
            Self::InvokeDynamic { .. } => InsnKind::InvokeDynamic,
            Self::Jump { .. } => InsnKind::Jump,
            Self::Label(_) => InsnKind::Label,
            Self::Ldc(_) => InsnKind::Ldc,
            Self::Iinc { .. } => InsnKind::Iinc,
            Self::TableSwitch { .. } => InsnKind::TableSwitch,
            Self::LookupSwitch { .. } => InsnKind::LookupSwitch,
            Self::MultiNewArray { .. } => InsnKind::MultiNewArray,
            Self::Frame => InsnKind::Frame,
            Self::Line { .. } => InsnKind::Line,
        }
    }

    /// Returns the opcode, or `None` for pseudo nodes (labels, frames, line numbers).
    #[must_use]
    pub const fn opcode(&self) -> Option<Opcode> {
        match self {
            Self::Insn(opcode)
            | Self::Int { opcode, .. }
            | Self::Var { opcode, .. }
            | Self::Type { opcode, .. }
            | Self::Field { opcode, .. }
            | Self::Method { opcode, .. }
            | Self::Jump { opcode, .. } => Some(*opcode),
            Self::InvokeDynamic { .. } => Some(Opcode::Invokedynamic),
            Self::Ldc(_) => Some(Opcode::Ldc),
            Self::Iinc { .. } => Some(Opcode::Iinc),
            Self::TableSwitch { .. } => Some(Opcode::Tableswitch),
            Self::LookupSwitch { .. } => Some(Opcode::Lookupswitch),
            Self::MultiNewArray { .. } => Some(Opcode::Multianewarray),
            Self::Label(_) | Self::Frame | Self::Line { .. } => None,
        }
    }

    /// Returns `false` for labels and jumps, which never leave a value on the operand
    /// stack and therefore cannot produce a code value.
    #[must_use]
    pub const fn may_produce_value(&self) -> bool {
        !matches!(self, Self::Label(_) | Self::Jump { .. })
    }

    /// Returns the referenced field or method of a field access or invocation.
    #[must_use]
    pub const fn member(&self) -> Option<&MemberRef> {
        match self {
            Self::Field { field, .. } => Some(field),
            Self::Method { method, .. } => Some(method),
            _ => None,
        }
    }

    /// Deep-clones this instruction, replacing every referenced label through `labels`.
    ///
    /// The receiver is left untouched.
    #[must_use]
    pub fn clone_with(&self, labels: &LabelMap) -> Self {
        match self {
            Self::Jump { opcode, label } => Self::Jump {
                opcode: *opcode,
                label: labels.get(*label),
            },
            Self::Label(label) => Self::Label(labels.get(*label)),
            Self::TableSwitch {
                min,
                max,
                default,
                labels: targets,
            } => Self::TableSwitch {
                min: *min,
                max: *max,
                default: labels.get(*default),
                labels: targets.iter().map(|l| labels.get(*l)).collect(),
            },
            Self::LookupSwitch {
                default,
                keys,
                labels: targets,
            } => Self::LookupSwitch {
                default: labels.get(*default),
                keys: keys.clone(),
                labels: targets.iter().map(|l| labels.get(*l)).collect(),
            },
            Self::Line { line, start } => Self::Line {
                line: *line,
                start: labels.get(*start),
            },
            other => other.clone(),
        }
    }

    /// Returns the constant pushed by a constant-producing instruction: `ldc`, the
    /// `*const_*` family, `bipush` and `sipush`.
    ///
    /// `aconst_null` pushes no constant payload and yields `None`.
    #[must_use]
    pub fn pushed_constant(&self) -> Option<Constant> {
        match self {
            Self::Ldc(c) => Some(c.clone()),
            Self::Int {
                opcode: Opcode::Bipush | Opcode::Sipush,
                operand,
            } => Some(Constant::Int(*operand)),
            Self::Insn(opcode) => match opcode {
                Opcode::IconstM1 => Some(Constant::Int(-1)),
                Opcode::Iconst0 => Some(Constant::Int(0)),
                Opcode::Iconst1 => Some(Constant::Int(1)),
                Opcode::Iconst2 => Some(Constant::Int(2)),
                Opcode::Iconst3 => Some(Constant::Int(3)),
                Opcode::Iconst4 => Some(Constant::Int(4)),
                Opcode::Iconst5 => Some(Constant::Int(5)),
                Opcode::Lconst0 => Some(Constant::Long(0)),
                Opcode::Lconst1 => Some(Constant::Long(1)),
                Opcode::Fconst0 => Some(Constant::Float(0.0)),
                Opcode::Fconst1 => Some(Constant::Float(1.0)),
                Opcode::Fconst2 => Some(Constant::Float(2.0)),
                Opcode::Dconst0 => Some(Constant::Double(0.0)),
                Opcode::Dconst1 => Some(Constant::Double(1.0)),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insn(opcode) => write!(f, "{opcode}"),
            Self::Int { opcode, operand } => write!(f, "{opcode} {operand}"),
            Self::Var { opcode, var } => write!(f, "{opcode} {var}"),
            Self::Type { opcode, desc } => write!(f, "{opcode} {desc}"),
            Self::Field { opcode, field } => write!(f, "{opcode} {field}"),
            Self::Method { opcode, method, .. } => write!(f, "{opcode} {method}"),
            Self::InvokeDynamic { name, desc, .. } => write!(f, "invokedynamic {name}{desc}"),
            Self::Jump { opcode, label } => write!(f, "{opcode} {label}"),
            Self::Label(label) => write!(f, "{label}:"),
            Self::Ldc(c) => write!(f, "ldc {c}"),
            Self::Iinc { var, incr } => write!(f, "iinc {var} {incr}"),
            Self::TableSwitch { min, max, .. } => write!(f, "tableswitch [{min}..{max}]"),
            Self::LookupSwitch { keys, .. } => write!(f, "lookupswitch ({})", keys.len()),
            Self::MultiNewArray { desc, dims } => write!(f, "multianewarray {desc} {dims}"),
            Self::Frame => write!(f, "frame"),
            Self::Line { line, start } => write!(f, "line {line} {start}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_length() -> MemberRef {
        MemberRef::new("java/lang/String", "length", "()I")
    }

    #[test]
    fn test_kind_and_opcode() {
        let call = Instruction::Method {
            opcode: Opcode::Invokevirtual,
            method: string_length(),
            interface: false,
        };
        assert_eq!(call.kind(), InsnKind::Method);
        assert_eq!(call.opcode(), Some(Opcode::Invokevirtual));
        assert_eq!(call.member(), Some(&string_length()));

        assert_eq!(Instruction::Frame.opcode(), None);
        assert_eq!(Instruction::Label(LabelId::new(1)).opcode(), None);
        assert_eq!(
            Instruction::Ldc(Constant::Int(1)).opcode(),
            Some(Opcode::Ldc)
        );
    }

    #[test]
    fn test_may_produce_value() {
        assert!(!Instruction::Label(LabelId::new(0)).may_produce_value());
        assert!(!Instruction::Jump {
            opcode: Opcode::Ifeq,
            label: LabelId::new(0)
        }
        .may_produce_value());
        assert!(Instruction::Insn(Opcode::Iadd).may_produce_value());
        assert!(Instruction::Line {
            line: 1,
            start: LabelId::new(0)
        }
        .may_produce_value());
    }

    #[test]
    fn test_clone_with_remaps_switch() {
        let switch = Instruction::TableSwitch {
            min: 0,
            max: 1,
            default: LabelId::new(0),
            labels: vec![LabelId::new(1), LabelId::new(2)],
        };
        let labels: LabelMap = [(LabelId::new(0), LabelId::new(10)), (LabelId::new(2), LabelId::new(12))]
            .into_iter()
            .collect();

        let cloned = switch.clone_with(&labels);
        assert_eq!(
            cloned,
            Instruction::TableSwitch {
                min: 0,
                max: 1,
                default: LabelId::new(10),
                labels: vec![LabelId::new(1), LabelId::new(12)],
            }
        );
        // Source untouched
        assert_eq!(switch.clone_with(&LabelMap::new()), switch);
    }

    #[test]
    fn test_clone_with_identity() {
        let field = Instruction::Field {
            opcode: Opcode::Getstatic,
            field: MemberRef::new("a/B", "c", "I"),
        };
        assert_eq!(field.clone_with(&LabelMap::new()), field);
    }

    #[test]
    fn test_pushed_constant() {
        assert_eq!(
            Instruction::Insn(Opcode::IconstM1).pushed_constant(),
            Some(Constant::Int(-1))
        );
        assert_eq!(
            Instruction::Insn(Opcode::Dconst1).pushed_constant(),
            Some(Constant::Double(1.0))
        );
        assert_eq!(
            Instruction::Int {
                opcode: Opcode::Sipush,
                operand: 1000
            }
            .pushed_constant(),
            Some(Constant::Int(1000))
        );
        assert_eq!(
            Instruction::Int {
                opcode: Opcode::Newarray,
                operand: 10
            }
            .pushed_constant(),
            None
        );
        assert_eq!(Instruction::Insn(Opcode::AconstNull).pushed_constant(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Instruction::Ldc(Constant::String("hi".into())).to_string(),
            "ldc \"hi\""
        );
        assert_eq!(
            Instruction::Jump {
                opcode: Opcode::IfIcmpne,
                label: LabelId::new(3)
            }
            .to_string(),
            "if_icmpne L3"
        );
        assert_eq!(InsnKind::InvokeDynamic.to_string(), "invoke_dynamic");
        assert_eq!(
            string_length().to_string(),
            "java/lang/String.length()I"
        );
    }
}
