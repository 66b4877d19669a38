//! # The Container — scoped facade over the registry engine
//!
//! A [`Container`] owns a private Local [`Registry`] and a handle to a
//! shared Global one. Registrations made through the container land in
//! its Local scope; resolutions check the Local store for the exact key
//! first and fall back to the Global store, so a Local mapping
//! transparently shadows the Global mapping for the same key.
//!
//! # Architecture
//! ```text
//!  global()  ──────────────►  Registry (Global, process-wide)
//!                                  ▲ fallback
//!                                  │
//!  Container ──► Registry (Local, per container)
//! ```
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use qayd_registry::prelude::*;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct Plain;
//! impl Greeter for Plain {
//!     fn greet(&self) -> String { "hello".into() }
//! }
//!
//! let container = Container::with_global(Arc::new(Registry::new()));
//! container
//!     .register_instance(Arc::new(Plain) as Arc<dyn Greeter>)
//!     .unwrap();
//!
//! let greeter = container.resolve_instance::<Arc<dyn Greeter>>().unwrap();
//! assert_eq!(greeter.greet(), "hello");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::Result;
use crate::global::global;
use crate::key::CapabilityKey;
use crate::method::{Method, MethodArgs};
use crate::registry::Registry;
use crate::scope::Scope;

/// A Local scope with fallback to a shared Global scope.
///
/// Containers are cheap to create and independent of one another; only
/// the Global registry is shared. `Container` is `Send + Sync`, so one
/// value may serve several threads — its stores carry their own locks.
pub struct Container {
    local: Registry,
    global: Arc<Registry>,
}

impl Container {
    /// Creates a container backed by the process-wide Global registry.
    pub fn new() -> Self {
        Self::with_global(global())
    }

    /// Creates a container backed by an explicit global registry.
    ///
    /// This is the injection seam: tests hand in a private registry and
    /// get full isolation from the process-wide one, with no cleanup
    /// calls between cases.
    pub fn with_global(global: Arc<Registry>) -> Self {
        Self {
            local: Registry::new(),
            global,
        }
    }

    /// The container's Local registry.
    pub fn local(&self) -> &Registry {
        &self.local
    }

    /// The Global registry this container falls back to.
    pub fn global(&self) -> &Arc<Registry> {
        &self.global
    }

    // ── Instance mappings ──

    /// Registers a shared object in the Local scope, shadowing any Global
    /// registration under the same key.
    pub fn register_instance<T: Send + Sync + 'static>(&self, value: T) -> Result<()> {
        self.local.register_instance(value)
    }

    /// Registers a named shared object in the Local scope.
    pub fn register_instance_named<T: Send + Sync + 'static>(
        &self,
        name: impl Into<Cow<'static, str>>,
        value: T,
    ) -> Result<()> {
        self.local.register_instance_named(name, value)
    }

    /// Resolves the default instance mapping for `T`, Local first.
    pub fn resolve_instance<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        let key = CapabilityKey::of::<T>();
        let scope = self.instance_scope(&key);
        trace!(key = %key, scope = %scope, "Resolving instance mapping");
        self.registry_for(scope).resolve_instance_keyed(&key)
    }

    /// Resolves a named instance mapping for `T`, Local first.
    pub fn resolve_instance_named<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        let key = CapabilityKey::named::<T>(name.to_owned());
        let scope = self.instance_scope(&key);
        trace!(key = %key, scope = %scope, "Resolving instance mapping");
        self.registry_for(scope).resolve_instance_keyed(&key)
    }

    /// Removes the default instance mapping from the Local scope.
    ///
    /// No-op if absent. A Global mapping under the same key is left
    /// untouched and becomes visible again.
    pub fn remove_instance_mapping<T: Send + Sync + 'static>(&self) {
        self.local.remove_instance_mapping::<T>();
    }

    /// Removes a named instance mapping from the Local scope. No-op if absent.
    pub fn remove_instance_mapping_named<T: Send + Sync + 'static>(&self, name: &str) {
        self.local.remove_instance_mapping_named::<T>(name);
    }

    // ── Type (recipe) mappings ──

    /// Registers a construction recipe in the Local scope.
    pub fn register_type<T, F>(&self, factory: F) -> Result<()>
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.local.register_type(factory)
    }

    /// Registers a named construction recipe in the Local scope.
    pub fn register_type_named<T, F>(
        &self,
        name: impl Into<Cow<'static, str>>,
        factory: F,
    ) -> Result<()>
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.local.register_type_named(name, factory)
    }

    /// Resolves the default type mapping for `T`, Local first, yielding a
    /// freshly constructed object.
    pub fn resolve_type<T: Send + Sync + 'static>(&self) -> Result<T> {
        let key = CapabilityKey::of::<T>();
        let scope = self.type_scope(&key);
        trace!(key = %key, scope = %scope, "Resolving type mapping");
        self.registry_for(scope).resolve_type_keyed(&key)
    }

    /// Resolves a named type mapping for `T`, Local first.
    pub fn resolve_type_named<T: Send + Sync + 'static>(&self, name: &str) -> Result<T> {
        let key = CapabilityKey::named::<T>(name.to_owned());
        let scope = self.type_scope(&key);
        trace!(key = %key, scope = %scope, "Resolving type mapping");
        self.registry_for(scope).resolve_type_keyed(&key)
    }

    /// Removes the default type mapping from the Local scope. No-op if absent.
    pub fn remove_type_mapping<T: Send + Sync + 'static>(&self) {
        self.local.remove_type_mapping::<T>();
    }

    /// Removes a named type mapping from the Local scope. No-op if absent.
    pub fn remove_type_mapping_named<T: Send + Sync + 'static>(&self, name: &str) {
        self.local.remove_type_mapping_named::<T>(name);
    }

    // ── Method mappings ──

    /// Registers a callable in the Local scope.
    pub fn register_method(&self, method_key: &str, method: Method) -> Result<()> {
        self.local.register_method(method_key, method)
    }

    /// Invokes a registered callable, Local first.
    ///
    /// Method mappings are keyed by name alone in both scopes, so the
    /// fallback lookup uses the same string key.
    pub fn invoke_method<R: 'static>(&self, method_key: &str, args: &MethodArgs) -> Result<R> {
        let scope = if self.local.contains_method(method_key) {
            Scope::Local
        } else {
            Scope::Global
        };
        trace!(method_key, scope = %scope, "Invoking method mapping");
        self.registry_for(scope).invoke_method(method_key, args)
    }

    /// Removes a callable from the Local scope. No-op if absent.
    pub fn remove_method_mapping(&self, method_key: &str) {
        self.local.remove_method_mapping(method_key);
    }

    // ── Scope selection ──

    fn instance_scope(&self, key: &CapabilityKey) -> Scope {
        if self.local.contains_instance(key) {
            Scope::Local
        } else {
            Scope::Global
        }
    }

    fn type_scope(&self, key: &CapabilityKey) -> Scope {
        if self.local.contains_type(key) {
            Scope::Local
        } else {
            Scope::Global
        }
    }

    fn registry_for(&self, scope: Scope) -> &Registry {
        match scope {
            Scope::Local => &self.local,
            Scope::Global => &*self.global,
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("local", &self.local)
            .field("global", &self.global)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::Container;
    pub use crate::args;
    pub use crate::error::{QaydError, Result};
    pub use crate::global::global;
    pub use crate::key::CapabilityKey;
    pub use crate::method::Method;
    pub use crate::registry::Registry;
    pub use crate::scope::Scope;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
