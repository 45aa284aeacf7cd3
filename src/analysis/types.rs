//! Static type descriptors of operand-stack and local-variable slots.
//!
//! A [`ValueType`] is the verifier-level view of a slot: which of the JVM computational
//! kinds it holds and how many slots it occupies. Sub-`int` kinds (`boolean`, `byte`,
//! `char`, `short`) are all `int` at this level.

use std::fmt;

use crate::assembly::Constant;

/// The static type of a value slot.
///
/// # Examples
///
/// ```rust
/// use bytefold::analysis::ValueType;
///
/// assert_eq!(ValueType::from_descriptor("Z"), Some(ValueType::Int));
/// assert_eq!(ValueType::from_descriptor("J").map(|t| t.size()), Some(2));
/// assert_eq!(ValueType::return_type("(II)Ljava/lang/String;"), Some(ValueType::string()));
/// assert_eq!(ValueType::return_type("()V"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ValueType {
    /// Slot that holds no value yet (second half of a wide local, unassigned local)
    #[default]
    Uninitialized,
    /// `int` and the sub-`int` kinds
    Int,
    /// `float`
    Float,
    /// `long`
    Long,
    /// `double`
    Double,
    /// Object or array reference, with its descriptor when known
    Reference(Option<String>),
    /// Return address pushed by `jsr`
    ReturnAddress,
}

impl ValueType {
    /// The reference type of `java.lang.String`.
    #[must_use]
    pub fn string() -> Self {
        Self::Reference(Some("Ljava/lang/String;".to_string()))
    }

    /// Returns the number of slots a value of this type occupies.
    #[must_use]
    pub const fn size(&self) -> usize {
        match self {
            Self::Long | Self::Double => 2,
            _ => 1,
        }
    }

    /// Returns `true` for [`ValueType::Uninitialized`].
    #[must_use]
    pub const fn is_uninitialized(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }

    /// Returns `true` for reference types.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    /// Returns the slot type for a field descriptor, or `None` for `V` and malformed input.
    #[must_use]
    pub fn from_descriptor(desc: &str) -> Option<Self> {
        match desc.as_bytes().first().copied()? {
            b'Z' | b'B' | b'C' | b'S' | b'I' if desc.len() == 1 => Some(Self::Int),
            b'F' if desc.len() == 1 => Some(Self::Float),
            b'J' if desc.len() == 1 => Some(Self::Long),
            b'D' if desc.len() == 1 => Some(Self::Double),
            b'L' if desc.ends_with(';') && desc.len() > 2 => {
                Some(Self::Reference(Some(desc.to_string())))
            }
            b'[' if desc.len() > 1 => Some(Self::Reference(Some(desc.to_string()))),
            _ => None,
        }
    }

    /// Returns the slot type of a method descriptor's return value, or `None` for `void`
    /// and malformed input.
    #[must_use]
    pub fn return_type(method_desc: &str) -> Option<Self> {
        let (_, ret) = method_desc.rsplit_once(')')?;
        Self::from_descriptor(ret)
    }

    /// Returns the slot type a constant occupies once pushed.
    #[must_use]
    pub fn of_constant(constant: &Constant) -> Self {
        match constant {
            Constant::Byte(_)
            | Constant::Short(_)
            | Constant::Int(_)
            | Constant::Char(_)
            | Constant::Boolean(_) => Self::Int,
            Constant::Long(_) => Self::Long,
            Constant::Float(_) => Self::Float,
            Constant::Double(_) => Self::Double,
            Constant::String(_) => Self::string(),
            Constant::Type(_) => Self::Reference(Some("Ljava/lang/Class;".to_string())),
        }
    }

    /// Returns `true` if a constant of this kind can be stored in a slot of this type.
    ///
    /// Reference slots without a descriptor accept any reference constant.
    #[must_use]
    pub fn accepts(&self, constant: &Constant) -> bool {
        match (self, Self::of_constant(constant)) {
            (Self::Reference(None), Self::Reference(_)) => true,
            (Self::Reference(Some(desc)), Self::Reference(_))
                if desc == "Ljava/lang/Object;" =>
            {
                true
            }
            (expected, actual) => *expected == actual,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "."),
            Self::Int => write!(f, "I"),
            Self::Float => write!(f, "F"),
            Self::Long => write!(f, "J"),
            Self::Double => write!(f, "D"),
            Self::Reference(Some(desc)) => write!(f, "{desc}"),
            Self::Reference(None) => write!(f, "R"),
            Self::ReturnAddress => write!(f, "A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(ValueType::Int.size(), 1);
        assert_eq!(ValueType::Long.size(), 2);
        assert_eq!(ValueType::Double.size(), 2);
        assert_eq!(ValueType::string().size(), 1);
        assert_eq!(ValueType::Uninitialized.size(), 1);
    }

    #[test]
    fn test_from_descriptor() {
        for desc in ["Z", "B", "C", "S", "I"] {
            assert_eq!(ValueType::from_descriptor(desc), Some(ValueType::Int));
        }
        assert_eq!(ValueType::from_descriptor("F"), Some(ValueType::Float));
        assert_eq!(
            ValueType::from_descriptor("[I"),
            Some(ValueType::Reference(Some("[I".to_string())))
        );
        assert_eq!(ValueType::from_descriptor("V"), None);
        assert_eq!(ValueType::from_descriptor("II"), None);
        assert_eq!(ValueType::from_descriptor("Ljava/lang/String"), None);
        assert_eq!(ValueType::from_descriptor(""), None);
    }

    #[test]
    fn test_return_type() {
        assert_eq!(ValueType::return_type("(Ljava/lang/String;)I"), Some(ValueType::Int));
        assert_eq!(ValueType::return_type("(I)J"), Some(ValueType::Long));
        assert_eq!(ValueType::return_type("(I)V"), None);
        assert_eq!(ValueType::return_type("I"), None);
    }

    #[test]
    fn test_accepts() {
        assert!(ValueType::Int.accepts(&Constant::Char(65)));
        assert!(ValueType::Int.accepts(&Constant::Boolean(true)));
        assert!(!ValueType::Int.accepts(&Constant::Long(1)));
        assert!(ValueType::string().accepts(&Constant::String("s".into())));
        assert!(!ValueType::string().accepts(&Constant::Int(1)));
        assert!(ValueType::Reference(None).accepts(&Constant::Type("a/B".into())));
        assert!(ValueType::Reference(Some("Ljava/lang/Object;".into()))
            .accepts(&Constant::String("s".into())));
        assert!(!ValueType::Reference(Some("Ljava/util/List;".into()))
            .accepts(&Constant::String("s".into())));
    }

    #[test]
    fn test_display() {
        assert_eq!(ValueType::Uninitialized.to_string(), ".");
        assert_eq!(ValueType::Long.to_string(), "J");
        assert_eq!(ValueType::Reference(None).to_string(), "R");
        assert_eq!(ValueType::string().to_string(), "Ljava/lang/String;");
    }
}
