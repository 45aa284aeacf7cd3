//! Constant payloads carried by `ldc` instructions and by known code values.
//!
//! The JVM operand stack only knows four numeric kinds (`int`, `long`, `float`,
//! `double`). Bytecode rewriting tools additionally track `byte`, `short`, `char` and
//! `boolean` constants so that display and equality keep the source-level kind; on the
//! stack `char` and `boolean` are plain `int`s. [`Constant::normalized`] performs that
//! mapping.
//!
//! Floating constants compare and hash by bit pattern, matching the boxed-value semantics
//! of the JVM (`NaN` equals itself, `0.0` differs from `-0.0`). This keeps equality
//! reflexive, which fixpoint termination depends on.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use strum::EnumIter;

/// The kind of a [`Constant`].
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConstantKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    Boolean,
    String,
    /// A class literal or method type
    Type,
}

impl ConstantKind {
    /// Returns `true` for the kinds that back a numeric value: integral, floating, `char`
    /// and `boolean`.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::String | Self::Type)
    }

    /// Returns `true` for the kinds that occupy two stack slots.
    #[must_use]
    pub const fn is_wide(self) -> bool {
        matches!(self, Self::Long | Self::Double)
    }
}

/// A constant payload.
///
/// # Examples
///
/// ```rust
/// use bytefold::assembly::{Constant, ConstantKind};
///
/// let c = Constant::Char(u16::from(b'A'));
/// assert_eq!(c.kind(), ConstantKind::Char);
/// assert_eq!(c.normalized(), Constant::Int(65));
/// assert_eq!(c.to_string(), "'A'");
///
/// assert_eq!(Constant::Boolean(true).normalized(), Constant::Int(1));
/// assert_eq!(Constant::Long(7).normalized(), Constant::Long(7));
/// ```
#[derive(Debug, Clone)]
pub enum Constant {
    /// 8-bit signed integer
    Byte(i8),
    /// 16-bit signed integer
    Short(i16),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 32-bit IEEE 754 float
    Float(f32),
    /// 64-bit IEEE 754 float
    Double(f64),
    /// UTF-16 code unit
    Char(u16),
    /// Boolean
    Boolean(bool),
    /// String constant
    String(String),
    /// Class literal (internal name or array descriptor) or method type descriptor
    Type(String),
}

impl Constant {
    /// Returns the kind of this constant.
    #[must_use]
    pub const fn kind(&self) -> ConstantKind {
        match self {
            Self::Byte(_) => ConstantKind::Byte,
            Self::Short(_) => ConstantKind::Short,
            Self::Int(_) => ConstantKind::Int,
            Self::Long(_) => ConstantKind::Long,
            Self::Float(_) => ConstantKind::Float,
            Self::Double(_) => ConstantKind::Double,
            Self::Char(_) => ConstantKind::Char,
            Self::Boolean(_) => ConstantKind::Boolean,
            Self::String(_) => ConstantKind::String,
            Self::Type(_) => ConstantKind::Type,
        }
    }

    /// Returns `true` if this constant can back a numeric value.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.kind().is_numeric()
    }

    /// Returns the stack representation of this constant.
    ///
    /// `char` becomes its code unit and `boolean` becomes `0`/`1`, both as `int`. Every
    /// other kind is returned unchanged.
    #[must_use]
    pub fn normalized(&self) -> Constant {
        match self {
            Self::Char(c) => Self::Int(i32::from(*c)),
            Self::Boolean(b) => Self::Int(i32::from(*b)),
            other => other.clone(),
        }
    }

    /// Returns the value in its computational type: `byte`, `short`, `char` and
    /// `boolean` all become `int`. Two constants holding the same value on the operand
    /// stack have equal computational forms.
    #[must_use]
    pub fn computational(&self) -> Constant {
        self.as_i32().map_or_else(|| self.clone(), Self::Int)
    }

    /// Returns the value as an `i32` if it is an `int`-sized integral constant after
    /// normalization.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Byte(v) => Some(i32::from(*v)),
            Self::Short(v) => Some(i32::from(*v)),
            Self::Int(v) => Some(*v),
            Self::Char(v) => Some(i32::from(*v)),
            Self::Boolean(v) => Some(i32::from(*v)),
            _ => None,
        }
    }

    /// Returns the value as an `i64` for any integral constant.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            other => other.as_i32().map(i64::from),
        }
    }

    /// Returns the string payload of a string constant.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::String(a), Self::String(b)) | (Self::Type(a), Self::Type(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Constant {}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Self::Byte(v) => v.hash(state),
            Self::Short(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::Long(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Double(v) => v.to_bits().hash(state),
            Self::Char(v) => v.hash(state),
            Self::Boolean(v) => v.hash(state),
            Self::String(v) | Self::Type(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte(v) => write!(f, "{v}B"),
            Self::Short(v) => write!(f, "{v}S"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}L"),
            Self::Float(v) => write!(f, "{v}F"),
            Self::Double(v) => write!(f, "{v}D"),
            Self::Char(v) => match char::from_u32(u32::from(*v)) {
                Some(c) => write!(f, "'{}'", c.escape_default()),
                None => write!(f, "'\\u{v:04x}'"),
            },
            Self::Boolean(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "\"{}\"", v.escape_default()),
            Self::Type(v) => write!(f, "{v}.class"),
        }
    }
}

impl From<i32> for Constant {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Constant {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f32> for Constant {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for Constant {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for Constant {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Constant {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Constant {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
