//! Analysis configuration
//!
//! This module controls how far the [`crate::analysis::Interpreter`] trusts external
//! knowledge when it turns field reads and calls into code values.

use crate::analysis::{CachingHandler, ReferenceHandler};

/// Configuration for resolving field reads and calls during abstract interpretation
///
/// The default is [`AnalysisConfig::conservative`]: handlers are consulted, but a call
/// whose result is known stays in the rewritten code because it may have side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalysisConfig {
    /// Ask the reference handler about field reads and calls at all
    /// When false, every field read and call produces an unknown value
    pub consult_handler: bool,

    /// Fold whitelisted pure JDK methods before asking the reference handler
    pub fold_intrinsics: bool,

    /// Treat calls as free of side effects, so a call with a known result may be removed
    /// Folded intrinsics are always treated as pure
    pub assume_pure_calls: bool,

    /// Wrap the reference handler in a [`CachingHandler`] in [`AnalysisConfig::handler`]
    pub cache_resolutions: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::conservative()
    }
}

impl AnalysisConfig {
    /// Creates a configuration that resolves what it can but never drops a call
    #[must_use]
    pub const fn conservative() -> Self {
        Self {
            consult_handler: true,
            fold_intrinsics: true,
            assume_pure_calls: false,
            cache_resolutions: true,
        }
    }

    /// Creates a configuration that also removes calls whose result is known
    ///
    /// **Warning**: Only sound when the reference handler never resolves a method with
    /// observable side effects.
    #[must_use]
    pub const fn aggressive() -> Self {
        Self {
            consult_handler: true,
            fold_intrinsics: true,
            assume_pure_calls: true,
            cache_resolutions: true,
        }
    }

    /// Creates a configuration that never resolves field reads or calls
    ///
    /// Only constant loads produce known values.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            consult_handler: false,
            fold_intrinsics: false,
            assume_pure_calls: false,
            cache_resolutions: false,
        }
    }

    /// Prepares a reference handler for use with this configuration, memoizing it when
    /// [`AnalysisConfig::cache_resolutions`] is set.
    #[must_use]
    pub fn handler<H: ReferenceHandler + 'static>(&self, handler: H) -> Box<dyn ReferenceHandler> {
        if self.cache_resolutions {
            Box::new(CachingHandler::new(handler))
        } else {
            Box::new(handler)
        }
    }
}
