//! The process-wide Global registry and its access function.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::registry::Registry;

// The one and only Global scope. Created on first access, in a
// thread-safe manner, and never torn down.
static GLOBAL_REGISTRY: Lazy<Arc<Registry>> = Lazy::new(|| Arc::new(Registry::new()));

/// Returns a handle to the process-wide Global registry.
///
/// Registrations made here are visible to every
/// [`Container`](crate::container::Container) that was built with
/// [`Container::new`](crate::container::Container::new), as the fallback
/// scope behind each container's local stores.
///
/// Tests that need isolation should prefer
/// [`Container::with_global`](crate::container::Container::with_global)
/// over registering into this shared registry.
///
/// # Examples
/// ```
/// use qayd_registry::global;
///
/// struct Motd(&'static str);
///
/// global().register_instance(Motd("salaam")).unwrap();
/// let motd = global().resolve_instance::<Motd>().unwrap();
/// assert_eq!(motd.0, "salaam");
/// ```
pub fn global() -> Arc<Registry> {
    GLOBAL_REGISTRY.clone()
}
