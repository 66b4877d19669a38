//! One scope's registration stores.
//!
//! A [`Registry`] holds the three independent mappings of a single scope:
//! shared instances, construction recipes, and callables. Each store sits
//! behind its own reader/writer lock, so concurrent resolutions share read
//! access while registrations and removals serialize against them.
//!
//! The process-wide Global scope is a `Registry` (see [`crate::global`]);
//! every [`Container`](crate::container::Container) owns another as its
//! Local scope.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use qayd_support::rendering::short_type_name;

use crate::error::{
    InvalidTypeMappingError, MappingSlot, MappingTakenError, MethodInvocationError,
    NoMappingError, QaydError, Result,
};
use crate::key::CapabilityKey;
use crate::method::{Method, MethodArgs};
use crate::recipe::Recipe;

/// A type-erased shared instance, handed out by `Arc` clone on resolve.
pub(crate) type SharedInstance = Arc<dyn Any + Send + Sync>;

/// The store triple of one scope.
///
/// Operations on a `Registry` never consult any other scope; the
/// local-first fallback lives in the container facade.
#[derive(Default)]
pub struct Registry {
    instances: RwLock<HashMap<CapabilityKey, SharedInstance>>,
    recipes: RwLock<HashMap<CapabilityKey, Recipe>>,
    methods: RwLock<HashMap<String, Method>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Instance mappings ──

    /// Registers an already-constructed object under the default mapping.
    ///
    /// The object is shared, never copied: every successful
    /// [`resolve_instance`](Registry::resolve_instance) hands back another
    /// handle to the same value.
    ///
    /// # Errors
    /// [`QaydError::MappingTaken`] if the slot is already occupied.
    pub fn register_instance<T: Send + Sync + 'static>(&self, value: T) -> Result<()> {
        self.insert_instance(CapabilityKey::of::<T>(), Arc::new(value))
    }

    /// Registers an already-constructed object under a named mapping.
    pub fn register_instance_named<T: Send + Sync + 'static>(
        &self,
        name: impl Into<std::borrow::Cow<'static, str>>,
        value: T,
    ) -> Result<()> {
        self.insert_instance(CapabilityKey::named::<T>(name), Arc::new(value))
    }

    /// Resolves the default instance mapping for `T`.
    pub fn resolve_instance<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.resolve_instance_keyed(&CapabilityKey::of::<T>())
    }

    /// Resolves a named instance mapping for `T`.
    pub fn resolve_instance_named<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        self.resolve_instance_keyed(&CapabilityKey::named::<T>(name.to_owned()))
    }

    /// Removes the default instance mapping for `T`.
    ///
    /// Removing a key that is not present is a no-op, not an error.
    pub fn remove_instance_mapping<T: Send + Sync + 'static>(&self) {
        self.remove_instance(&CapabilityKey::of::<T>());
    }

    /// Removes a named instance mapping for `T`. No-op if absent.
    pub fn remove_instance_mapping_named<T: Send + Sync + 'static>(&self, name: &str) {
        self.remove_instance(&CapabilityKey::named::<T>(name.to_owned()));
    }

    // ── Type (recipe) mappings ──

    /// Registers a construction recipe under the default mapping.
    ///
    /// The factory captures its constructor arguments; every successful
    /// [`resolve_type`](Registry::resolve_type) re-runs it and yields a
    /// **new** object.
    ///
    /// # Errors
    /// [`QaydError::MappingTaken`] if the slot is already occupied.
    pub fn register_type<T, F>(&self, factory: F) -> Result<()>
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.insert_recipe(CapabilityKey::of::<T>(), Recipe::new(factory))
    }

    /// Registers a construction recipe under a named mapping.
    pub fn register_type_named<T, F>(
        &self,
        name: impl Into<std::borrow::Cow<'static, str>>,
        factory: F,
    ) -> Result<()>
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.insert_recipe(CapabilityKey::named::<T>(name), Recipe::new(factory))
    }

    /// Resolves the default type mapping for `T`, constructing a fresh object.
    pub fn resolve_type<T: Send + Sync + 'static>(&self) -> Result<T> {
        self.resolve_type_keyed(&CapabilityKey::of::<T>())
    }

    /// Resolves a named type mapping for `T`, constructing a fresh object.
    pub fn resolve_type_named<T: Send + Sync + 'static>(&self, name: &str) -> Result<T> {
        self.resolve_type_keyed(&CapabilityKey::named::<T>(name.to_owned()))
    }

    /// Removes the default type mapping for `T`. No-op if absent.
    pub fn remove_type_mapping<T: Send + Sync + 'static>(&self) {
        self.remove_recipe(&CapabilityKey::of::<T>());
    }

    /// Removes a named type mapping for `T`. No-op if absent.
    pub fn remove_type_mapping_named<T: Send + Sync + 'static>(&self, name: &str) {
        self.remove_recipe(&CapabilityKey::named::<T>(name.to_owned()));
    }

    // ── Method mappings ──

    /// Registers a callable under `method_key`.
    ///
    /// # Errors
    /// - [`QaydError::InvalidArgument`] for an empty or whitespace-only key.
    /// - [`QaydError::MappingTaken`] if the key is already registered.
    pub fn register_method(&self, method_key: &str, method: Method) -> Result<()> {
        if method_key.trim().is_empty() {
            return Err(QaydError::InvalidArgument {
                reason: "method key must not be empty".into(),
            });
        }

        let mut methods = self.methods.write();
        if methods.contains_key(method_key) {
            return Err(QaydError::MappingTaken(MappingTakenError {
                taken: MappingSlot::Method(method_key.to_owned()),
            }));
        }

        debug!(method_key, arity = method.arity(), "Registered method mapping");
        methods.insert(method_key.to_owned(), method);
        Ok(())
    }

    /// Invokes the callable registered under `method_key` and downcasts
    /// its return value to `R`.
    ///
    /// # Errors
    /// - [`QaydError::NoMapping`] if no callable is registered.
    /// - [`QaydError::MethodInvocation`] if the callable fails for any
    ///   reason: wrong argument count, wrong argument type, or a panic
    ///   from inside the callable. The underlying cause is not
    ///   distinguished beyond a detail message.
    /// - [`QaydError::InvalidTypeMapping`] if the return value is not `R`.
    pub fn invoke_method<R: 'static>(&self, method_key: &str, args: &MethodArgs) -> Result<R> {
        let method = {
            let methods = self.methods.read();
            methods.get(method_key).cloned()
        };
        // Lock released: the callable runs unguarded and may take
        // arbitrarily long or re-enter the registry.
        let method = method.ok_or_else(|| {
            QaydError::NoMapping(NoMappingError {
                requested: MappingSlot::Method(method_key.to_owned()),
                suggestions: self.method_suggestions(method_key),
            })
        })?;

        trace!(method_key, "Invoking method mapping");
        let outcome = catch_unwind(AssertUnwindSafe(|| method.call(args)))
            .unwrap_or_else(|payload| Err(panic_detail(payload)));

        let value = outcome.map_err(|detail| {
            QaydError::MethodInvocation(MethodInvocationError {
                method_key: method_key.to_owned(),
                detail,
            })
        })?;

        value.downcast::<R>().map(|boxed| *boxed).map_err(|value| {
            QaydError::InvalidTypeMapping(InvalidTypeMappingError {
                slot: MappingSlot::Method(method_key.to_owned()),
                expected: std::any::type_name::<R>(),
                produced: erased_type_name(&*value),
            })
        })
    }

    /// Removes the callable registered under `method_key`. No-op if absent.
    pub fn remove_method_mapping(&self, method_key: &str) {
        if self.methods.write().remove(method_key).is_some() {
            debug!(method_key, "Removed method mapping");
        }
    }

    /// Returns `true` if a callable is registered under `method_key`.
    pub fn contains_method(&self, method_key: &str) -> bool {
        self.methods.read().contains_key(method_key)
    }

    // ── Keyed primitives (used by the container facade for fallback) ──

    /// Returns `true` if an instance mapping exists for the exact key.
    pub fn contains_instance(&self, key: &CapabilityKey) -> bool {
        self.instances.read().contains_key(key)
    }

    /// Returns `true` if a type mapping exists for the exact key.
    pub fn contains_type(&self, key: &CapabilityKey) -> bool {
        self.recipes.read().contains_key(key)
    }

    pub(crate) fn insert_instance(&self, key: CapabilityKey, value: SharedInstance) -> Result<()> {
        let mut instances = self.instances.write();
        if instances.contains_key(&key) {
            return Err(QaydError::MappingTaken(MappingTakenError {
                taken: MappingSlot::Instance(key),
            }));
        }
        debug!(key = %key, "Registered instance mapping");
        instances.insert(key, value);
        Ok(())
    }

    pub(crate) fn resolve_instance_keyed<T: Send + Sync + 'static>(
        &self,
        key: &CapabilityKey,
    ) -> Result<Arc<T>> {
        let shared = {
            let instances = self.instances.read();
            instances.get(key).cloned()
        };
        let shared = shared.ok_or_else(|| {
            QaydError::NoMapping(NoMappingError {
                requested: MappingSlot::Instance(key.clone()),
                suggestions: self.key_suggestions(key),
            })
        })?;

        // The slot was stored under T's TypeId, so the downcast can only
        // fail through a mismatched key built by hand.
        shared.downcast::<T>().map_err(|shared| {
            QaydError::InvalidTypeMapping(InvalidTypeMappingError {
                slot: MappingSlot::Instance(key.clone()),
                expected: std::any::type_name::<T>(),
                produced: erased_type_name(&*shared),
            })
        })
    }

    pub(crate) fn remove_instance(&self, key: &CapabilityKey) {
        if self.instances.write().remove(key).is_some() {
            debug!(key = %key, "Removed instance mapping");
        }
    }

    pub(crate) fn insert_recipe(&self, key: CapabilityKey, recipe: Recipe) -> Result<()> {
        let mut recipes = self.recipes.write();
        if recipes.contains_key(&key) {
            return Err(QaydError::MappingTaken(MappingTakenError {
                taken: MappingSlot::Recipe(key),
            }));
        }
        debug!(key = %key, produces = recipe.produces(), "Registered type mapping");
        recipes.insert(key, recipe);
        Ok(())
    }

    pub(crate) fn resolve_type_keyed<T: Send + Sync + 'static>(
        &self,
        key: &CapabilityKey,
    ) -> Result<T> {
        let recipe = {
            let recipes = self.recipes.read();
            recipes.get(key).cloned()
        };
        let recipe = recipe.ok_or_else(|| {
            QaydError::NoMapping(NoMappingError {
                requested: MappingSlot::Recipe(key.clone()),
                suggestions: self.key_suggestions(key),
            })
        })?;

        // Lock released: the factory runs unguarded.
        trace!(key = %key, "Constructing from recipe");
        let built = recipe.construct();
        built.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
            QaydError::InvalidTypeMapping(InvalidTypeMappingError {
                slot: MappingSlot::Recipe(key.clone()),
                expected: std::any::type_name::<T>(),
                produced: recipe.produces(),
            })
        })
    }

    pub(crate) fn remove_recipe(&self, key: &CapabilityKey) {
        if self.recipes.write().remove(key).is_some() {
            debug!(key = %key, "Removed type mapping");
        }
    }

    // ── Introspection ──

    /// Number of registered instance mappings.
    pub fn instance_count(&self) -> usize {
        self.instances.read().len()
    }

    /// Number of registered type mappings.
    pub fn type_count(&self) -> usize {
        self.recipes.read().len()
    }

    /// Number of registered method mappings.
    pub fn method_count(&self) -> usize {
        self.methods.read().len()
    }

    /// Capability keys similar to `key` across the instance and recipe
    /// stores, rendered for "did you mean?" output.
    fn key_suggestions(&self, key: &CapabilityKey) -> Vec<String> {
        let target = short_type_name(key.type_name()).to_lowercase();
        let mut found: Vec<String> = Vec::new();

        let collect = |candidate: &CapabilityKey, found: &mut Vec<String>| {
            if candidate == key {
                return;
            }
            let name = short_type_name(candidate.type_name()).to_lowercase();
            if name.contains(&target) || target.contains(&name) {
                found.push(candidate.to_string());
            }
        };

        for candidate in self.instances.read().keys() {
            collect(candidate, &mut found);
        }
        for candidate in self.recipes.read().keys() {
            collect(candidate, &mut found);
        }
        found.sort();
        found.dedup();
        found
    }

    /// Method keys similar to `method_key`, for "did you mean?" output.
    fn method_suggestions(&self, method_key: &str) -> Vec<String> {
        let target = method_key.to_lowercase();
        let mut found: Vec<String> = self
            .methods
            .read()
            .keys()
            .filter(|candidate| {
                let name = candidate.to_lowercase();
                name.contains(&target) || target.contains(&name)
            })
            .cloned()
            .collect();
        found.sort();
        found
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("instances", &self.instance_count())
            .field("types", &self.type_count())
            .field("methods", &self.method_count())
            .finish()
    }
}

fn erased_type_name(_value: &(dyn Any + Send + Sync)) -> &'static str {
    // TypeId cannot be rendered as a name; the slot display already
    // carries the registered capability.
    "a value of another type"
}

fn panic_detail(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("callable panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("callable panicked: {msg}")
    } else {
        "callable panicked".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    #[test]
    fn register_and_resolve_instance() {
        struct Greeting(String);

        let registry = Registry::new();
        registry.register_instance(Greeting("salaam".into())).unwrap();

        let shared: Arc<Greeting> = registry.resolve_instance().unwrap();
        assert_eq!(shared.0, "salaam");
    }

    #[test]
    fn instance_is_shared_not_copied() {
        let registry = Registry::new();
        registry.register_instance(String::from("shared")).unwrap();

        let a: Arc<String> = registry.resolve_instance().unwrap();
        let b: Arc<String> = registry.resolve_instance().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn duplicate_instance_fails_and_keeps_first() {
        let registry = Registry::new();
        registry.register_instance(1i32).unwrap();

        let err = registry.register_instance(2i32).unwrap_err();
        assert!(matches!(err, QaydError::MappingTaken(_)));

        let kept: Arc<i32> = registry.resolve_instance().unwrap();
        assert_eq!(*kept, 1);
    }

    #[test]
    fn named_instances_coexist() {
        let registry = Registry::new();
        registry.register_instance_named("primary", String::from("a")).unwrap();
        registry.register_instance_named("replica", String::from("b")).unwrap();
        registry.register_instance(String::from("default")).unwrap();

        let primary: Arc<String> = registry.resolve_instance_named("primary").unwrap();
        let fallback: Arc<String> = registry.resolve_instance().unwrap();
        assert_eq!(*primary, "a");
        assert_eq!(*fallback, "default");
    }

    #[test]
    fn resolve_missing_instance_is_no_mapping() {
        #[derive(Debug)]
        struct Absent;

        let registry = Registry::new();
        let err = registry.resolve_instance::<Absent>().unwrap_err();
        assert!(matches!(err, QaydError::NoMapping(_)));
    }

    #[test]
    fn no_mapping_carries_suggestions() {
        let registry = Registry::new();
        registry
            .register_instance_named("primary", String::from("a"))
            .unwrap();

        let err = registry.resolve_instance::<String>().unwrap_err();
        match err {
            QaydError::NoMapping(e) => {
                assert_eq!(e.suggestions.len(), 1);
                assert!(e.suggestions[0].contains("primary"));
            }
            other => panic!("expected NoMapping, got: {other:?}"),
        }
    }

    #[test]
    fn recipe_resolution_is_fresh_each_time() {
        #[derive(PartialEq, Debug)]
        struct Token(u32);

        let registry = Registry::new();
        registry.register_type(|| Arc::new(Token(5))).unwrap();

        let a: Arc<Token> = registry.resolve_type().unwrap();
        let b: Arc<Token> = registry.resolve_type().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(*a, *b);
    }

    #[test]
    fn duplicate_recipe_fails() {
        let registry = Registry::new();
        registry.register_type(|| 1u64).unwrap();
        let err = registry.register_type(|| 2u64).unwrap_err();
        assert!(matches!(err, QaydError::MappingTaken(_)));
    }

    #[test]
    fn instance_and_recipe_stores_are_independent() {
        // The same key may exist in both stores at once.
        let registry = Registry::new();
        registry.register_instance(7i64).unwrap();
        registry.register_type(|| 8i64).unwrap();

        assert_eq!(*registry.resolve_instance::<i64>().unwrap(), 7);
        assert_eq!(registry.resolve_type::<i64>().unwrap(), 8);
    }

    #[test]
    fn removal_is_a_no_op_when_absent() {
        let registry = Registry::new();
        registry.remove_instance_mapping::<String>();
        registry.remove_type_mapping::<String>();
        registry.remove_method_mapping("nothing");
        assert_eq!(registry.instance_count(), 0);
        assert_eq!(registry.type_count(), 0);
        assert_eq!(registry.method_count(), 0);
    }

    #[test]
    fn removal_frees_the_slot() {
        let registry = Registry::new();
        registry.register_instance(1u8).unwrap();
        registry.remove_instance_mapping::<u8>();
        assert!(registry.register_instance(2u8).is_ok());
        assert_eq!(*registry.resolve_instance::<u8>().unwrap(), 2);
    }

    #[test]
    fn invoke_registered_method() {
        let registry = Registry::new();
        registry
            .register_method(
                "PrintAge",
                Method::of2(|name: String, age: i32| format!("{name} is {age} years old!")),
            )
            .unwrap();

        let out: String = registry
            .invoke_method("PrintAge", &args!["Alex".to_string(), 27i32])
            .unwrap();
        assert_eq!(out, "Alex is 27 years old!");
    }

    #[test]
    fn invoke_with_mismatched_argument_is_method_invocation() {
        let registry = Registry::new();
        registry
            .register_method(
                "PrintAge",
                Method::of2(|name: String, age: i32| format!("{name} is {age} years old!")),
            )
            .unwrap();

        let err = registry
            .invoke_method::<String>("PrintAge", &args!["Alex".to_string(), "27".to_string()])
            .unwrap_err();
        assert!(matches!(err, QaydError::MethodInvocation(_)));
    }

    #[test]
    fn invoke_with_wrong_arity_is_method_invocation() {
        let registry = Registry::new();
        registry
            .register_method("Inc", Method::of1(|n: i32| n + 1))
            .unwrap();

        let err = registry
            .invoke_method::<i32>("Inc", &args![1i32, 2i32])
            .unwrap_err();
        assert!(matches!(err, QaydError::MethodInvocation(_)));
    }

    #[test]
    fn panicking_callable_is_method_invocation() {
        let registry = Registry::new();
        registry
            .register_method(
                "Explode",
                Method::of0(|| -> i32 { panic!("boom") }),
            )
            .unwrap();

        let err = registry.invoke_method::<i32>("Explode", &args![]).unwrap_err();
        match err {
            QaydError::MethodInvocation(e) => assert!(e.detail.contains("boom")),
            other => panic!("expected MethodInvocation, got: {other:?}"),
        }
    }

    #[test]
    fn invoke_missing_method_is_no_mapping() {
        let registry = Registry::new();
        let err = registry.invoke_method::<i32>("Nothing", &args![]).unwrap_err();
        assert!(matches!(err, QaydError::NoMapping(_)));
    }

    #[test]
    fn wrong_return_type_is_invalid_type_mapping() {
        let registry = Registry::new();
        registry
            .register_method("Seven", Method::of0(|| 7i32))
            .unwrap();

        let err = registry.invoke_method::<String>("Seven", &args![]).unwrap_err();
        assert!(matches!(err, QaydError::InvalidTypeMapping(_)));
    }

    #[test]
    fn empty_method_key_is_invalid_argument() {
        let registry = Registry::new();
        let err = registry
            .register_method("   ", Method::of0(|| 0i32))
            .unwrap_err();
        assert!(matches!(err, QaydError::InvalidArgument { .. }));
        assert_eq!(registry.method_count(), 0);
    }

    #[test]
    fn duplicate_method_key_is_mapping_taken() {
        let registry = Registry::new();
        registry.register_method("M", Method::of0(|| 1i32)).unwrap();
        let err = registry.register_method("M", Method::of0(|| 2i32)).unwrap_err();
        assert!(matches!(err, QaydError::MappingTaken(_)));

        // First registration still wins.
        let kept: i32 = registry.invoke_method("M", &args![]).unwrap();
        assert_eq!(kept, 1);
    }

    #[test]
    fn bound_method_invokes_against_receiver() {
        struct Ledger {
            owner: String,
        }

        let registry = Registry::new();
        let receiver = Arc::new(Ledger { owner: "Alex".into() });
        registry
            .register_method(
                "Owner",
                Method::bound0(receiver, |l: &Ledger| l.owner.clone()),
            )
            .unwrap();

        let out: String = registry.invoke_method("Owner", &args![]).unwrap();
        assert_eq!(out, "Alex");
    }

    #[test]
    fn debug_shows_store_sizes() {
        let registry = Registry::new();
        registry.register_instance(1i32).unwrap();
        registry.register_type(|| 2i8).unwrap();

        let debug = format!("{registry:?}");
        assert!(debug.contains("Registry"));
        assert!(debug.contains("instances: 1"));
        assert!(debug.contains("types: 1"));
    }

    #[test]
    fn registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
