//! Error types for registry operations.
//!
//! Every failure is a distinguishable value surfaced at the failing call;
//! nothing is retried or recovered internally. Validation fully precedes
//! store mutation, so a failed registration leaves every store unchanged.

use std::fmt;

use qayd_support::rendering::{render_suggestions, short_type_name};

use crate::key::CapabilityKey;

/// Main error type for all registry and container operations.
#[derive(Debug, thiserror::Error)]
pub enum QaydError {
    /// Resolution or invocation found no entry in either scope.
    #[error("{}", .0)]
    NoMapping(NoMappingError),

    /// A registration already exists for the exact key in the target store.
    #[error("{}", .0)]
    MappingTaken(MappingTakenError),

    /// A type-erasure seam produced a value of the wrong type.
    #[error("{}", .0)]
    InvalidTypeMapping(InvalidTypeMappingError),

    /// Structurally malformed registration request.
    #[error("Invalid registration: {reason}")]
    InvalidArgument {
        reason: String,
    },

    /// The registered callable failed to execute.
    #[error("{}", .0)]
    MethodInvocation(MethodInvocationError),
}

/// Identifies which store a failing key belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingSlot {
    /// An already-constructed shared object.
    Instance(CapabilityKey),
    /// A deferred-construction recipe.
    Recipe(CapabilityKey),
    /// A registered callable.
    Method(String),
}

impl fmt::Display for MappingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingSlot::Instance(key) => write!(f, "instance mapping for {key}"),
            MappingSlot::Recipe(key) => write!(f, "type mapping for {key}"),
            MappingSlot::Method(key) => write!(f, "method mapping for {key:?}"),
        }
    }
}

/// Error when a lookup finds no registration in any consulted scope.
///
/// Includes "did you mean?" suggestions drawn from registered keys.
#[derive(Debug)]
pub struct NoMappingError {
    /// The slot that was requested.
    pub requested: MappingSlot,
    /// Similar keys that ARE registered.
    pub suggestions: Vec<String>,
}

impl fmt::Display for NoMappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No {} is registered", self.requested)?;
        if !self.suggestions.is_empty() {
            write!(f, "{}", render_suggestions(&self.suggestions))?;
        }
        write!(f, "\n  Hint: register the mapping before resolving it")
    }
}

/// Error when a registration targets a slot that is already taken.
#[derive(Debug)]
pub struct MappingTakenError {
    pub taken: MappingSlot,
}

impl fmt::Display for MappingTakenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A {} has already been registered", self.taken)?;
        write!(
            f,
            "\n  Hint: remove the existing mapping first, or register under a different name"
        )
    }
}

/// Error when a stored value, recipe output, or method return value does
/// not have the type the caller asked for.
#[derive(Debug)]
pub struct InvalidTypeMappingError {
    /// The slot whose value failed the downcast.
    pub slot: MappingSlot,
    /// The type the caller requested.
    pub expected: &'static str,
    /// The type the mapping actually produced.
    pub produced: &'static str,
}

impl fmt::Display for InvalidTypeMappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The {} produced {}, but {} was requested",
            self.slot,
            short_type_name(self.produced),
            short_type_name(self.expected),
        )
    }
}

/// Error when a registered callable fails to execute.
///
/// Wrong argument count, wrong argument type, and a panic inside the
/// callable are all reported through this one signal; the underlying
/// cause is carried only as a human-readable detail.
#[derive(Debug)]
pub struct MethodInvocationError {
    /// The method key that was invoked.
    pub method_key: String,
    /// What went wrong, for humans.
    pub detail: String,
}

impl fmt::Display for MethodInvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The method mapped to {:?} failed to execute: {}",
            self.method_key, self.detail,
        )
    }
}

/// Convenient Result type for registry operations.
pub type Result<T> = std::result::Result<T, QaydError>;
