//! Basic example of the Qayd capability registry.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use qayd::prelude::*;

// === Define your capability and implementations ===

trait Counter: Send + Sync {
    fn status(&self) -> String;
    fn increment(&self);
}

struct TallyCounter {
    name: String,
    count: AtomicI32,
}

impl TallyCounter {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            count: AtomicI32::new(0),
        }
    }
}

impl Counter for TallyCounter {
    fn status(&self) -> String {
        format!("{}: {}", self.name, self.count.load(Ordering::SeqCst))
    }

    fn increment(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

struct StrideCounter {
    name: String,
    count: AtomicI32,
    stride: i32,
}

impl StrideCounter {
    fn new(name: &str, stride: i32) -> Self {
        Self {
            name: name.to_owned(),
            count: AtomicI32::new(0),
            stride,
        }
    }
}

impl Counter for StrideCounter {
    fn status(&self) -> String {
        format!("{}: {}", self.name, self.count.load(Ordering::SeqCst))
    }

    fn increment(&self) {
        self.count.fetch_add(self.stride, Ordering::SeqCst);
    }
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("qayd=debug")
        .init();

    // === Global scope: shared by every container in the process ===
    global().register_instance(Arc::new(TallyCounter::new("global-counter")) as Arc<dyn Counter>)?;

    // A recipe manufactures a fresh counter on every resolve.
    global().register_type_named("counter", || {
        Arc::new(TallyCounter::new("counter")) as Arc<dyn Counter>
    })?;

    // A callable, keyed by name.
    global().register_method(
        "PrintAge",
        Method::of2(|name: String, age: i32| format!("{name} is {age} years old!")),
    )?;

    // === Container scope: falls back to Global until it overrides ===
    let container = Container::new();

    let counter = container.resolve_instance::<Arc<dyn Counter>>()?;
    println!("🌍 via fallback: {}", counter.status());

    // A local registration shadows the global one.
    container.register_instance(Arc::new(StrideCounter::new("local-counter", 5)) as Arc<dyn Counter>)?;
    let counter = container.resolve_instance::<Arc<dyn Counter>>()?;
    counter.increment();
    println!("📦 via override: {}", counter.status());

    // Fresh construction: two resolves, two independent counters.
    let first: Arc<dyn Counter> = container.resolve_type_named("counter")?;
    let second: Arc<dyn Counter> = container.resolve_type_named("counter")?;
    first.increment();
    println!("🆕 first:  {}", first.status());
    println!("🆕 second: {}", second.status());

    // Method invocation with type-erased arguments.
    let sentence: String = container.invoke_method("PrintAge", &args!["Alex".to_string(), 27i32])?;
    println!("🗣️  {sentence}");

    println!("\n🎉 Everything works!");
    Ok(())
}
