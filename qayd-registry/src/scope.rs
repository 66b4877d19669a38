//! Registration scopes.
//!
//! Exactly two scopes exist:
//! - [`Scope::Global`] — the process-wide registry shared by all containers
//! - [`Scope::Local`] — one container's private registry
//!
//! A container resolves against its Local scope first and falls back to
//! Global, so a Local registration shadows the Global one for the same key.

use std::fmt;

/// The scope a mapping lives in, or was resolved from.
///
/// Carried in trace output so fallback decisions are visible in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One container's private stores.
    ///
    /// Created empty with the container, dropped with it. Independent of
    /// every other container.
    Local,

    /// The process-wide stores shared by all containers.
    ///
    /// Created on first touch, lives for the process.
    Global,
}

impl Scope {
    /// Returns `true` for the process-wide scope.
    #[inline]
    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Local => write!(f, "Local"),
            Scope::Global => write!(f, "Global"),
        }
    }
}
