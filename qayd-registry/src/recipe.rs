//! Deferred-construction recipes.
//!
//! A [`Recipe`] is the stored half of a type registration: a factory
//! closure capturing the constructor arguments at registration time.
//! Every resolution re-runs the closure, so each resolve manufactures an
//! independent new object — the key semantic difference from an instance
//! mapping, which shares one object across all resolutions.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// Type alias for the erased factory behind a recipe.
///
/// `Arc` rather than `Box`: recipes are cloned out of the store before
/// they run, so a slow factory never holds the store lock.
pub(crate) type RecipeFn = Arc<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// A stored construction recipe for a capability.
///
/// Built from a typed factory via [`Recipe::new`]; the output type is
/// fixed at registration time and recorded for error messages.
#[derive(Clone)]
pub struct Recipe {
    build: RecipeFn,
    produces: &'static str,
}

impl Recipe {
    /// Wraps a typed factory closure into an erased recipe.
    ///
    /// The `Fn() -> T` bound is what replaces the original design's
    /// registration-time constructor-shape check: a closure that does not
    /// build a `T` from its captured arguments does not type-check.
    pub fn new<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(move || Box::new(factory()) as Box<dyn Any + Send + Sync>),
            produces: type_name::<T>(),
        }
    }

    /// Runs the factory and returns a freshly constructed, type-erased
    /// object. No caching: every call produces an independent value.
    pub(crate) fn construct(&self) -> Box<dyn Any + Send + Sync> {
        (self.build)()
    }

    /// Full name of the type this recipe manufactures.
    pub fn produces(&self) -> &'static str {
        self.produces
    }
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipe")
            .field("produces", &self.produces)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_runs_factory() {
        let recipe = Recipe::new(|| 41i32 + 1);
        let built = recipe.construct();
        assert_eq!(*built.downcast::<i32>().unwrap(), 42);
    }

    #[test]
    fn construct_is_fresh_every_time() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let runs = Arc::new(AtomicU32::new(0));
        let recipe = Recipe::new({
            let runs = runs.clone();
            move || runs.fetch_add(1, Ordering::SeqCst)
        });

        let a = *recipe.construct().downcast::<u32>().unwrap();
        let b = *recipe.construct().downcast::<u32>().unwrap();
        assert_eq!((a, b), (0, 1));
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn captured_arguments_are_reused() {
        let name = String::from("counter");
        let recipe = Recipe::new(move || format!("{name}: 0"));

        let first = *recipe.construct().downcast::<String>().unwrap();
        let second = *recipe.construct().downcast::<String>().unwrap();
        assert_eq!(first, "counter: 0");
        assert_eq!(first, second);
    }

    #[test]
    fn records_produced_type() {
        let recipe = Recipe::new(String::new);
        assert!(recipe.produces().contains("String"));
        assert!(format!("{recipe:?}").contains("String"));
    }
}
