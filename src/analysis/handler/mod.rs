//! Reference handlers: external knowledge about fields and method returns.
//!
//! While interpreting a field read or a call, the driver asks a [`ReferenceHandler`]
//! whether the result is itself a known constant. This is what lets constant propagation
//! look past a single method body: the initializer of a `static final` field, a pure JDK
//! call on constant arguments, or an accessor that an earlier pass proved constant.
//!
//! Handlers are pure queries. They have no observable side effects, answer identical
//! queries identically, and may be called concurrently from analyses of independent
//! methods. Failing to answer is the common case and is reported as
//! [`Resolution::Unresolved`], never as an error.
//!
//! # Stock handlers
//!
//! - [`NoopHandler`] - never resolves anything
//! - [`ConstantTable`] - registered `static final` field values and constant accessors
//! - [`IntrinsicHandler`] - folds a whitelist of pure JDK methods
//! - [`CachingHandler`] - memoizes another handler in a concurrent map
//! - [`HandlerChain`] - asks several handlers in order
//!
//! # Example
//!
//! ```rust
//! use bytefold::analysis::{
//!     ConstantTable, FieldAccess, HandlerChain, IntrinsicHandler, ReferenceHandler, Resolution,
//!     ValueType,
//! };
//! use bytefold::assembly::{Constant, MemberRef};
//!
//! let mut table = ConstantTable::new();
//! table.insert_field(
//!     MemberRef::new("a/Config", "KEY", "I"),
//!     FieldAccess::STATIC | FieldAccess::FINAL,
//!     Constant::Int(0x5f3759df),
//! )?;
//!
//! let handler = HandlerChain::new().with(table).with(IntrinsicHandler::new());
//! assert_eq!(
//!     handler.resolve_field(&ValueType::Int, "a/Config", "KEY", "I"),
//!     Resolution::Known(Constant::Int(0x5f3759df))
//! );
//! assert!(!handler.resolve_field(&ValueType::Int, "a/Config", "OTHER", "I").is_known());
//! # Ok::<(), bytefold::Error>(())
//! ```

mod cache;
mod intrinsics;
mod table;

use std::sync::Arc;

pub use cache::CachingHandler;
pub use intrinsics::IntrinsicHandler;
pub use table::{ConstantTable, FieldAccess};

use crate::{
    analysis::{CodeValue, ValueType},
    assembly::Constant,
};

/// The answer of a [`ReferenceHandler`] query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    /// The field or return value is statically known
    Known(Constant),
    /// The handler cannot determine the value; the caller treats it as unknown
    #[default]
    Unresolved,
}

impl Resolution {
    /// Returns `true` for [`Resolution::Known`].
    #[must_use]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Converts into an [`Option`], `None` for [`Resolution::Unresolved`].
    #[must_use]
    pub fn into_option(self) -> Option<Constant> {
        match self {
            Self::Known(c) => Some(c),
            Self::Unresolved => None,
        }
    }

    /// Returns `self` if known, otherwise evaluates `f`.
    #[must_use]
    pub fn or_else(self, f: impl FnOnce() -> Resolution) -> Resolution {
        match self {
            Self::Known(_) => self,
            Self::Unresolved => f(),
        }
    }
}

impl From<Option<Constant>> for Resolution {
    fn from(value: Option<Constant>) -> Self {
        value.map_or(Self::Unresolved, Self::Known)
    }
}

/// Oracle consulted while interpreting field reads and calls.
///
/// `ty` is the static type the driver expects for the result slot. For calls, `args`
/// holds the already-resolved values of the popped operands in stack order, the
/// receiver first for instance methods.
pub trait ReferenceHandler: Send + Sync {
    /// Resolves the content of the field `owner.name:desc`.
    fn resolve_field(&self, ty: &ValueType, owner: &str, name: &str, desc: &str) -> Resolution;

    /// Resolves the return value of calling `owner.name desc` with `args`.
    fn resolve_method_return(
        &self,
        ty: &ValueType,
        owner: &str,
        name: &str,
        desc: &str,
        args: &[CodeValue],
    ) -> Resolution;
}

impl<H: ReferenceHandler + ?Sized> ReferenceHandler for &H {
    fn resolve_field(&self, ty: &ValueType, owner: &str, name: &str, desc: &str) -> Resolution {
        (**self).resolve_field(ty, owner, name, desc)
    }

    fn resolve_method_return(
        &self,
        ty: &ValueType,
        owner: &str,
        name: &str,
        desc: &str,
        args: &[CodeValue],
    ) -> Resolution {
        (**self).resolve_method_return(ty, owner, name, desc, args)
    }
}

impl<H: ReferenceHandler + ?Sized> ReferenceHandler for Box<H> {
    fn resolve_field(&self, ty: &ValueType, owner: &str, name: &str, desc: &str) -> Resolution {
        (**self).resolve_field(ty, owner, name, desc)
    }

    fn resolve_method_return(
        &self,
        ty: &ValueType,
        owner: &str,
        name: &str,
        desc: &str,
        args: &[CodeValue],
    ) -> Resolution {
        (**self).resolve_method_return(ty, owner, name, desc, args)
    }
}

impl<H: ReferenceHandler + ?Sized> ReferenceHandler for Arc<H> {
    fn resolve_field(&self, ty: &ValueType, owner: &str, name: &str, desc: &str) -> Resolution {
        (**self).resolve_field(ty, owner, name, desc)
    }

    fn resolve_method_return(
        &self,
        ty: &ValueType,
        owner: &str,
        name: &str,
        desc: &str,
        args: &[CodeValue],
    ) -> Resolution {
        (**self).resolve_method_return(ty, owner, name, desc, args)
    }
}

/// A handler that never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl ReferenceHandler for NoopHandler {
    fn resolve_field(&self, _: &ValueType, _: &str, _: &str, _: &str) -> Resolution {
        Resolution::Unresolved
    }

    fn resolve_method_return(
        &self,
        _: &ValueType,
        _: &str,
        _: &str,
        _: &str,
        _: &[CodeValue],
    ) -> Resolution {
        Resolution::Unresolved
    }
}

/// Asks a sequence of handlers in order; the first known answer wins.
#[derive(Default)]
pub struct HandlerChain {
    handlers: Vec<Box<dyn ReferenceHandler>>,
}

impl HandlerChain {
    /// Creates an empty chain, which resolves nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler to the chain.
    #[must_use]
    pub fn with(mut self, handler: impl ReferenceHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Returns the number of handlers in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if the chain holds no handler.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerChain")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl ReferenceHandler for HandlerChain {
    fn resolve_field(&self, ty: &ValueType, owner: &str, name: &str, desc: &str) -> Resolution {
        self.handlers
            .iter()
            .map(|h| h.resolve_field(ty, owner, name, desc))
            .find(Resolution::is_known)
            .unwrap_or_default()
    }

    fn resolve_method_return(
        &self,
        ty: &ValueType,
        owner: &str,
        name: &str,
        desc: &str,
        args: &[CodeValue],
    ) -> Resolution {
        self.handlers
            .iter()
            .map(|h| h.resolve_method_return(ty, owner, name, desc, args))
            .find(Resolution::is_known)
            .unwrap_or_default()
    }
}
