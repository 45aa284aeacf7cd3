//! A registry of statically known field values and constant accessors.

use std::collections::HashMap;

use bitflags::bitflags;
use log::trace;

use crate::{
    analysis::{CodeValue, ReferenceHandler, Resolution, ValueType},
    assembly::{Constant, MemberRef},
    Result,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Access flags of a field, as found in the `access_flags` item of a `field_info`
    pub struct FieldAccess: u16 {
        /// Declared `public`
        const PUBLIC = 0x0001;
        /// Declared `private`
        const PRIVATE = 0x0002;
        /// Declared `protected`
        const PROTECTED = 0x0004;
        /// Declared `static`
        const STATIC = 0x0008;
        /// Declared `final`; never assigned after object construction
        const FINAL = 0x0010;
        /// Declared `volatile`
        const VOLATILE = 0x0040;
        /// Declared `transient`
        const TRANSIENT = 0x0080;
        /// Not present in the source code
        const SYNTHETIC = 0x1000;
        /// Element of an enum class
        const ENUM = 0x4000;
    }
}

impl FieldAccess {
    /// Returns `true` if a field with these flags holds the same value for the whole run
    /// of the program once its class is initialized.
    #[must_use]
    pub fn is_constant(self) -> bool {
        self.contains(Self::STATIC | Self::FINAL) && !self.contains(Self::VOLATILE)
    }
}

#[derive(Debug, Clone)]
struct FieldEntry {
    access: FieldAccess,
    value: Constant,
}

/// Handler answering from values registered up front.
///
/// Fields are resolved only when they are `static final`; the value of any other field
/// may change between the registration and the read. Method returns are registered for
/// argument-less methods only, typically accessors that an earlier pass proved to return
/// a constant.
#[derive(Debug, Clone, Default)]
pub struct ConstantTable {
    fields: HashMap<MemberRef, FieldEntry>,
    returns: HashMap<MemberRef, Constant>,
}

impl ConstantTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the value of a field, replacing an earlier registration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the descriptor of `field` is not a field
    /// descriptor, or if `value` cannot be stored in a field of that descriptor.
    pub fn insert_field(
        &mut self,
        field: MemberRef,
        access: FieldAccess,
        value: Constant,
    ) -> Result<()> {
        let Some(ty) = ValueType::from_descriptor(&field.desc) else {
            return Err(malformed_error!(
                "Invalid field descriptor '{}' for {}",
                field.desc,
                field
            ));
        };
        if !ty.accepts(&value) {
            return Err(malformed_error!(
                "Field {} of type {} cannot hold {} constant {}",
                field,
                ty,
                value.kind(),
                value
            ));
        }

        self.fields.insert(field, FieldEntry { access, value });
        Ok(())
    }

    /// Registers the return value of an argument-less method.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if `method` takes arguments, returns `void`, or
    /// returns a type that cannot hold `value`.
    pub fn insert_method_return(&mut self, method: MemberRef, value: Constant) -> Result<()> {
        if !method.desc.starts_with("()") {
            return Err(malformed_error!(
                "Only argument-less methods can be registered, got {}",
                method
            ));
        }
        let Some(ty) = ValueType::return_type(&method.desc) else {
            return Err(malformed_error!("Method {} does not return a value", method));
        };
        if !ty.accepts(&value) {
            return Err(malformed_error!(
                "Method {} returning {} cannot return {} constant {}",
                method,
                ty,
                value.kind(),
                value
            ));
        }

        self.returns.insert(method, value);
        Ok(())
    }

    /// Returns the number of registered fields and methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len() + self.returns.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.returns.is_empty()
    }

    fn key(owner: &str, name: &str, desc: &str) -> MemberRef {
        MemberRef::new(owner, name, desc)
    }
}

impl ReferenceHandler for ConstantTable {
    fn resolve_field(&self, _: &ValueType, owner: &str, name: &str, desc: &str) -> Resolution {
        let Some(entry) = self.fields.get(&Self::key(owner, name, desc)) else {
            return Resolution::Unresolved;
        };

        if !entry.access.is_constant() {
            trace!("field {owner}.{name}:{desc} is registered but not static final");
            return Resolution::Unresolved;
        }

        trace!("field {owner}.{name}:{desc} resolved to {}", entry.value);
        Resolution::Known(entry.value.clone())
    }

    fn resolve_method_return(
        &self,
        _: &ValueType,
        owner: &str,
        name: &str,
        desc: &str,
        args: &[CodeValue],
    ) -> Resolution {
        // Instance accessors arrive with their receiver
        if args.len() > 1 {
            return Resolution::Unresolved;
        }

        match self.returns.get(&Self::key(owner, name, desc)) {
            Some(value) => {
                trace!("call {owner}.{name}{desc} resolved to {value}");
                Resolution::Known(value.clone())
            }
            None => Resolution::Unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assembly::InsnArena, Error};

    fn constant_field(table: &mut ConstantTable, name: &str, desc: &str, value: Constant) {
        table
            .insert_field(
                MemberRef::new("a/Config", name, desc),
                FieldAccess::PUBLIC | FieldAccess::STATIC | FieldAccess::FINAL,
                value,
            )
            .unwrap();
    }

    #[test]
    fn test_static_final_resolves() {
        let mut table = ConstantTable::new();
        constant_field(&mut table, "SIZE", "I", Constant::Int(16));
        constant_field(&mut table, "NAME", "Ljava/lang/String;", Constant::from("cfg"));

        assert_eq!(
            table.resolve_field(&ValueType::Int, "a/Config", "SIZE", "I"),
            Resolution::Known(Constant::Int(16))
        );
        assert_eq!(
            table.resolve_field(&ValueType::string(), "a/Config", "NAME", "Ljava/lang/String;"),
            Resolution::Known(Constant::from("cfg"))
        );
        // Descriptor is part of the key
        assert!(!table
            .resolve_field(&ValueType::Long, "a/Config", "SIZE", "J")
            .is_known());
    }

    #[test]
    fn test_mutable_field_unresolved() {
        let mut table = ConstantTable::new();
        table
            .insert_field(
                MemberRef::new("a/Config", "counter", "I"),
                FieldAccess::STATIC,
                Constant::Int(0),
            )
            .unwrap();
        table
            .insert_field(
                MemberRef::new("a/Config", "flag", "Z"),
                FieldAccess::STATIC | FieldAccess::FINAL | FieldAccess::VOLATILE,
                Constant::Boolean(true),
            )
            .unwrap();

        assert_eq!(table.len(), 2);
        assert!(!table
            .resolve_field(&ValueType::Int, "a/Config", "counter", "I")
            .is_known());
        assert!(!table
            .resolve_field(&ValueType::Int, "a/Config", "flag", "Z")
            .is_known());
    }

    #[test]
    fn test_insert_rejects_mismatch() {
        let mut table = ConstantTable::new();
        let access = FieldAccess::STATIC | FieldAccess::FINAL;
        assert!(matches!(
            table.insert_field(MemberRef::new("a/B", "x", "J"), access, Constant::Int(1)),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            table.insert_field(MemberRef::new("a/B", "x", "V"), access, Constant::Int(1)),
            Err(Error::Malformed { .. })
        ));
        assert!(table
            .insert_field(MemberRef::new("a/B", "c", "C"), access, Constant::Char(65))
            .is_ok());
    }

    #[test]
    fn test_method_returns() {
        let mut table = ConstantTable::new();
        table
            .insert_method_return(MemberRef::new("a/B", "key", "()Ljava/lang/String;"), "k".into())
            .unwrap();
        assert!(table
            .insert_method_return(MemberRef::new("a/B", "f", "(I)I"), Constant::Int(1))
            .is_err());
        assert!(table
            .insert_method_return(MemberRef::new("a/B", "g", "()V"), Constant::Int(1))
            .is_err());
        assert!(table
            .insert_method_return(MemberRef::new("a/B", "h", "()J"), Constant::Int(1))
            .is_err());

        assert_eq!(
            table.resolve_method_return(
                &ValueType::string(),
                "a/B",
                "key",
                "()Ljava/lang/String;",
                &[]
            ),
            Resolution::Known(Constant::from("k"))
        );

        let mut arena = InsnArena::new();
        let this = arena.push(crate::assembly::Instruction::Var {
            opcode: crate::assembly::Opcode::Aload,
            var: 0,
        });
        let receiver = CodeValue::unknown(ValueType::Reference(None), this, &arena).unwrap();
        assert!(table
            .resolve_method_return(
                &ValueType::string(),
                "a/B",
                "key",
                "()Ljava/lang/String;",
                &[receiver]
            )
            .is_known());
        assert!(!table
            .resolve_field(&ValueType::string(), "a/B", "key", "Ljava/lang/String;")
            .is_known());
    }

    #[test]
    fn test_access_flags() {
        assert!((FieldAccess::STATIC | FieldAccess::FINAL).is_constant());
        assert!(!FieldAccess::FINAL.is_constant());
        assert!(!FieldAccess::STATIC.is_constant());
        assert_eq!(
            FieldAccess::from_bits_truncate(0x0019),
            FieldAccess::PUBLIC | FieldAccess::STATIC | FieldAccess::FINAL
        );
    }
}
