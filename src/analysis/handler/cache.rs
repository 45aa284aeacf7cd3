//! Memoization of handler answers across concurrent analyses.

use dashmap::DashMap;
use log::trace;

use crate::{
    analysis::{CodeValue, ReferenceHandler, Resolution, ValueType},
    assembly::{Constant, MemberRef},
};

/// Cache key of a query. Call arguments are keyed by their stack value, so all unknown
/// arguments in the same position share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Query {
    ty: ValueType,
    member: MemberRef,
    args: Vec<Option<Constant>>,
}

impl Query {
    fn new(ty: &ValueType, owner: &str, name: &str, desc: &str, args: &[CodeValue]) -> Self {
        Self {
            ty: ty.clone(),
            member: MemberRef::new(owner, name, desc),
            args: args
                .iter()
                .map(|arg| arg.stack_value().map(|c| c.computational()))
                .collect(),
        }
    }
}

/// Wraps a handler and remembers its answers, resolved or not.
///
/// Handlers answer identical queries identically, so every distinct query reaches the
/// wrapped handler at most once, apart from races where two threads miss the same key
/// at the same time. The cache is shared through `&self` and can be handed to analyses
/// running in parallel.
///
/// The wrapped handler must not distinguish unknown arguments by their producing
/// instruction, since those are folded into one key.
///
/// A cache built with [`CachingHandler::new`] grows with every distinct query and is
/// never evicted. A long-running pipeline should call [`CachingHandler::clear`] between
/// classes, or build the cache with [`CachingHandler::bounded`]. Once a bounded cache is
/// full, further queries go straight to the wrapped handler.
///
/// # Examples
///
/// ```rust
/// use bytefold::prelude::*;
///
/// let handler = CachingHandler::new(IntrinsicHandler::new());
/// let mut arena = InsnArena::new();
/// let ldc = arena.push(Instruction::Ldc(Constant::Int(-3)));
/// let arg = CodeValue::number(ValueType::Int, ldc, Constant::Int(-3))?;
///
/// for _ in 0..2 {
///     let r = handler.resolve_method_return(&ValueType::Int, "java/lang/Math", "abs", "(I)I", &[arg.clone()]);
///     assert_eq!(r, Resolution::Known(Constant::Int(3)));
/// }
/// assert_eq!(handler.len(), 1);
/// # Ok::<(), bytefold::Error>(())
/// ```
#[derive(Debug)]
pub struct CachingHandler<H> {
    inner: H,
    fields: DashMap<Query, Resolution>,
    returns: DashMap<Query, Resolution>,
    limit: Option<usize>,
}

impl<H: ReferenceHandler> CachingHandler<H> {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            fields: DashMap::new(),
            returns: DashMap::new(),
            limit: None,
        }
    }

    /// Wraps `inner` with an empty cache that stops storing answers once it holds
    /// `max_entries` of them. Concurrent misses may overshoot the limit by the number of
    /// racing threads.
    pub fn bounded(inner: H, max_entries: usize) -> Self {
        Self {
            limit: Some(max_entries),
            ..Self::new(inner)
        }
    }

    /// Returns the wrapped handler.
    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Returns the number of cached answers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len() + self.returns.len()
    }

    /// Returns `true` if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.returns.is_empty()
    }

    /// Drops all cached answers.
    pub fn clear(&self) {
        self.fields.clear();
        self.returns.clear();
    }

    fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.len() >= limit)
    }
}

impl<H: ReferenceHandler> ReferenceHandler for CachingHandler<H> {
    fn resolve_field(&self, ty: &ValueType, owner: &str, name: &str, desc: &str) -> Resolution {
        let query = Query::new(ty, owner, name, desc, &[]);
        if let Some(hit) = self.fields.get(&query) {
            trace!("cache hit for field {}", query.member);
            return hit.clone();
        }

        // No shard lock is held while the wrapped handler runs
        let answer = self.inner.resolve_field(ty, owner, name, desc);
        if self.is_full() {
            return answer;
        }
        self.fields.entry(query).or_insert(answer).clone()
    }

    fn resolve_method_return(
        &self,
        ty: &ValueType,
        owner: &str,
        name: &str,
        desc: &str,
        args: &[CodeValue],
    ) -> Resolution {
        let query = Query::new(ty, owner, name, desc, args);
        if let Some(hit) = self.returns.get(&query) {
            trace!("cache hit for call {}", query.member);
            return hit.clone();
        }

        let answer = self.inner.resolve_method_return(ty, owner, name, desc, args);
        if self.is_full() {
            return answer;
        }
        self.returns.entry(query).or_insert(answer).clone()
    }
}
