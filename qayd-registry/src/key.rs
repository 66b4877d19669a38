//! Capability identification keys.
//!
//! [`CapabilityKey`] identifies a registration slot within a registry.
//! It combines a [`TypeId`] with an optional mapping name so several
//! implementations of the same capability can coexist.

use std::any::{TypeId, type_name};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use qayd_support::rendering::short_type_name;

/// Identifies a registration slot in a registry.
///
/// Each slot is identified by the registered capability type ([`TypeId`])
/// and an optional mapping name. The absent name is the default mapping:
/// unnamed and named registrations of the same capability never collide.
///
/// # Examples
/// ```
/// use qayd_registry::key::CapabilityKey;
///
/// // Default mapping — just a capability type
/// let key = CapabilityKey::of::<String>();
/// assert_eq!(key.name(), None);
///
/// // Named mapping — capability type + name
/// let key = CapabilityKey::named::<String>("primary");
/// assert_eq!(key.name(), Some("primary"));
/// ```
#[derive(Clone)]
pub struct CapabilityKey {
    type_id: TypeId,
    type_name: &'static str,
    name: Option<Cow<'static, str>>,
}

impl CapabilityKey {
    /// Creates the default (unnamed) key for capability `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            name: None,
        }
    }

    /// Creates a named key for capability `T`.
    ///
    /// Named keys let the same capability carry several simultaneous
    /// registrations.
    ///
    /// # Examples
    /// ```
    /// use qayd_registry::key::CapabilityKey;
    ///
    /// let primary = CapabilityKey::named::<String>("primary");
    /// let replica = CapabilityKey::named::<String>("replica");
    /// assert_ne!(primary, replica);
    /// ```
    #[inline]
    pub fn named<T: ?Sized + 'static>(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            name: Some(name.into()),
        }
    }

    /// Returns the [`TypeId`] of the capability.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the full capability type name.
    ///
    /// Used in error messages and logs.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the mapping name, or `None` for the default mapping.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl PartialEq for CapabilityKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.name == other.name
    }
}

impl Eq for CapabilityKey {}

impl Hash for CapabilityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Debug for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name.as_deref() {
            Some(name) => write!(f, "CapabilityKey({}, name={:?})", self.type_name, name),
            None => write!(f, "CapabilityKey({})", self.type_name),
        }
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = short_type_name(self.type_name);
        match self.name.as_deref() {
            Some(name) => write!(f, "{short} (name={name:?})"),
            None => write!(f, "{short}"),
        }
    }
}
