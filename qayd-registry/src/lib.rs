//! Core registry and resolution engine for Qayd.

pub mod container;
pub mod error;
pub mod global;
pub mod key;
pub mod method;
pub mod recipe;
pub mod registry;
pub mod scope;

pub use container::{Container, prelude};
pub use error::{QaydError, Result};
pub use global::global;
pub use key::CapabilityKey;
pub use method::{Method, MethodArgs};
pub use recipe::Recipe;
pub use registry::Registry;
pub use scope::Scope;
