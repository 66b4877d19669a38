//! # Qayd — Capability Registry for Rust
//!
//! A two-scope service locator: register an implementation — a live
//! shared instance, a deferred-construction recipe, or a callable —
//! under a capability key, and resolve it later without knowing which
//! concrete implementation was chosen. A process-wide Global scope
//! coexists with any number of per-[`Container`] Local scopes; a Local
//! registration transparently shadows the Global one for the same key.
//!
//! # Quick start
//! ```rust
//! use std::sync::Arc;
//! use qayd::prelude::*;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FixedClock(u64);
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 { self.0 }
//! }
//!
//! // An isolated global keeps this example independent of the process
//! // registry; Container::new() binds to the process-wide one.
//! let container = Container::with_global(Arc::new(Registry::new()));
//!
//! container
//!     .register_instance(Arc::new(FixedClock(7)) as Arc<dyn Clock>)
//!     .unwrap();
//!
//! let clock = container.resolve_instance::<Arc<dyn Clock>>().unwrap();
//! assert_eq!(clock.now(), 7);
//! ```

pub use qayd_registry::*;
pub use qayd_support as support;
