//! Folding of pure JDK methods over constant arguments.
//!
//! The folded methods are deterministic, free of side effects, and cannot throw for the
//! argument values they accept here. Any call outside that whitelist, or with an argument
//! that is not statically known, stays unresolved.
//!
//! | Owner                 | Methods                                                      |
//! |-----------------------|--------------------------------------------------------------|
//! | `java/lang/String`    | `length`, `hashCode`, `equals`, `valueOf(I/J/C/Z)`           |
//! | `java/lang/Integer`   | `parseInt(String)`, `toString(I)`                            |
//! | `java/lang/Long`      | `toString(J)`                                                |
//! | `java/lang/Math`      | `abs`, `min`, `max` over `int` and `long`                    |
//! | `java/lang/Character` | `toUpperCase(C)`, `toLowerCase(C)`                           |

use log::trace;

use crate::{
    analysis::{CodeValue, ReferenceHandler, Resolution, ValueType},
    assembly::Constant,
};

/// Handler folding a whitelist of pure JDK methods.
///
/// # Examples
///
/// ```rust
/// use bytefold::prelude::*;
///
/// let mut arena = InsnArena::new();
/// let ldc = arena.push(Instruction::Ldc(Constant::from("hello")));
/// let receiver = CodeValue::string(ValueType::string(), ldc, "hello");
///
/// let handler = IntrinsicHandler::new();
/// assert_eq!(
///     handler.resolve_method_return(&ValueType::Int, "java/lang/String", "length", "()I", &[receiver]),
///     Resolution::Known(Constant::Int(5))
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IntrinsicHandler;

impl IntrinsicHandler {
    /// Creates the handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluates `owner.name desc` over constant `args`, `None` if not foldable.
    fn fold(owner: &str, name: &str, desc: &str, args: &[Constant]) -> Option<Constant> {
        match (owner, name, desc, args) {
            ("java/lang/String", "length", "()I", [Constant::String(s)]) => {
                i32::try_from(s.encode_utf16().count()).ok().map(Constant::Int)
            }
            ("java/lang/String", "hashCode", "()I", [Constant::String(s)]) => {
                Some(Constant::Int(string_hash(s)))
            }
            (
                "java/lang/String",
                "equals",
                "(Ljava/lang/Object;)Z",
                [Constant::String(a), Constant::String(b)],
            ) => Some(Constant::Boolean(a == b)),
            ("java/lang/String", "valueOf", "(I)Ljava/lang/String;", [Constant::Int(v)]) => {
                Some(Constant::String(v.to_string()))
            }
            ("java/lang/String", "valueOf", "(J)Ljava/lang/String;", [Constant::Long(v)]) => {
                Some(Constant::String(v.to_string()))
            }
            ("java/lang/String", "valueOf", "(C)Ljava/lang/String;", [Constant::Int(v)]) => {
                // Lone surrogates have no representation as a Rust string
                let c = char::from_u32(u32::try_from(*v).ok()?)?;
                Some(Constant::String(c.to_string()))
            }
            ("java/lang/String", "valueOf", "(Z)Ljava/lang/String;", [Constant::Int(v)]) => {
                Some(Constant::String((*v != 0).to_string()))
            }
            ("java/lang/Integer", "parseInt", "(Ljava/lang/String;)I", [Constant::String(s)]) => {
                s.parse::<i32>().ok().map(Constant::Int)
            }
            ("java/lang/Integer", "toString", "(I)Ljava/lang/String;", [Constant::Int(v)]) => {
                Some(Constant::String(v.to_string()))
            }
            ("java/lang/Long", "toString", "(J)Ljava/lang/String;", [Constant::Long(v)]) => {
                Some(Constant::String(v.to_string()))
            }
            ("java/lang/Math", "abs", "(I)I", [Constant::Int(v)]) => {
                Some(Constant::Int(v.wrapping_abs()))
            }
            ("java/lang/Math", "abs", "(J)J", [Constant::Long(v)]) => {
                Some(Constant::Long(v.wrapping_abs()))
            }
            ("java/lang/Math", "min", "(II)I", [Constant::Int(a), Constant::Int(b)]) => {
                Some(Constant::Int(*a.min(b)))
            }
            ("java/lang/Math", "max", "(II)I", [Constant::Int(a), Constant::Int(b)]) => {
                Some(Constant::Int(*a.max(b)))
            }
            ("java/lang/Math", "min", "(JJ)J", [Constant::Long(a), Constant::Long(b)]) => {
                Some(Constant::Long(*a.min(b)))
            }
            ("java/lang/Math", "max", "(JJ)J", [Constant::Long(a), Constant::Long(b)]) => {
                Some(Constant::Long(*a.max(b)))
            }
            ("java/lang/Character", "toUpperCase", "(C)C", [Constant::Int(v)]) => {
                map_char(*v, char::to_uppercase)
            }
            ("java/lang/Character", "toLowerCase", "(C)C", [Constant::Int(v)]) => {
                map_char(*v, char::to_lowercase)
            }
            _ => None,
        }
    }
}

/// `String.hashCode`: `s[0]*31^(n-1) + ... + s[n-1]` over UTF-16 code units, wrapping.
fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Applies a case mapping to a `char` code unit. Mappings that expand to several
/// characters or leave the basic multilingual plane are not folded.
fn map_char<I>(unit: i32, mapping: impl FnOnce(char) -> I) -> Option<Constant>
where
    I: Iterator<Item = char>,
{
    let c = char::from_u32(u32::try_from(unit).ok()?)?;
    let mut mapped = mapping(c);
    let single = mapped.next()?;
    if mapped.next().is_some() {
        return None;
    }
    u16::try_from(u32::from(single)).ok().map(Constant::Char)
}

impl ReferenceHandler for IntrinsicHandler {
    fn resolve_field(&self, _: &ValueType, _: &str, _: &str, _: &str) -> Resolution {
        Resolution::Unresolved
    }

    fn resolve_method_return(
        &self,
        _: &ValueType,
        owner: &str,
        name: &str,
        desc: &str,
        args: &[CodeValue],
    ) -> Resolution {
        let Some(args) = args
            .iter()
            .map(|arg| arg.stack_value().map(|c| c.computational()))
            .collect::<Option<Vec<_>>>()
        else {
            return Resolution::Unresolved;
        };

        match Self::fold(owner, name, desc, &args) {
            Some(result) => {
                trace!("folded {owner}.{name}{desc} to {result}");
                Resolution::Known(result)
            }
            None => Resolution::Unresolved,
        }
    }
}
