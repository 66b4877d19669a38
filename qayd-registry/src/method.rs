//! Callable descriptors for method mappings.
//!
//! A [`Method`] erases a callable behind a uniform signature over
//! type-erased arguments. The adapters ([`Method::of1`] and friends)
//! downcast and clone each argument; an arity or argument-type mismatch
//! is reported as an invocation failure, never a panic. Bound variants
//! ([`Method::bound1`] and friends) capture a receiver the callable runs
//! against.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// Type-erased argument slice passed to a registered callable.
pub type MethodArgs = [Box<dyn Any + Send + Sync>];

/// Erased callable signature. Failures are human-readable details; the
/// invocation engine folds them into the uniform MethodInvocation error.
type CallFn =
    Arc<dyn Fn(&MethodArgs) -> std::result::Result<Box<dyn Any + Send + Sync>, String> + Send + Sync>;

/// Builds the type-erased argument vector for an invocation.
///
/// # Examples
/// ```
/// use qayd_registry::args;
///
/// let args = args!["Alex".to_string(), 27i32];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<::std::boxed::Box<dyn ::std::any::Any + Send + Sync>>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        <[_]>::into_vec(::std::boxed::Box::new([
            $(::std::boxed::Box::new($arg) as ::std::boxed::Box<dyn ::std::any::Any + Send + Sync>),+
        ]))
    };
}

/// A registered callable plus its (optional) bound receiver.
///
/// The receiver is captured inside the erased closure, so free functions
/// and bound instance methods share one storage shape.
#[derive(Clone)]
pub struct Method {
    call: CallFn,
    arity: usize,
}

impl Method {
    /// Wraps an already-erased callable.
    ///
    /// Prefer the typed adapters below — this is for callables that want
    /// to inspect the raw argument slice themselves.
    pub fn from_raw<F>(arity: usize, f: F) -> Self
    where
        F: Fn(&MethodArgs) -> std::result::Result<Box<dyn Any + Send + Sync>, String>
            + Send
            + Sync
            + 'static,
    {
        Self { call: Arc::new(f), arity }
    }

    /// Adapts a nullary callable.
    pub fn of0<R, F>(f: F) -> Self
    where
        R: Send + Sync + 'static,
        F: Fn() -> R + Send + Sync + 'static,
    {
        Self::from_raw(0, move |args| {
            expect_arity(args, 0)?;
            Ok(Box::new(f()))
        })
    }

    /// Adapts a one-argument callable.
    pub fn of1<A, R, F>(f: F) -> Self
    where
        A: Clone + 'static,
        R: Send + Sync + 'static,
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::from_raw(1, move |args| {
            expect_arity(args, 1)?;
            Ok(Box::new(f(arg::<A>(args, 0)?)))
        })
    }

    /// Adapts a two-argument callable.
    pub fn of2<A, B, R, F>(f: F) -> Self
    where
        A: Clone + 'static,
        B: Clone + 'static,
        R: Send + Sync + 'static,
        F: Fn(A, B) -> R + Send + Sync + 'static,
    {
        Self::from_raw(2, move |args| {
            expect_arity(args, 2)?;
            Ok(Box::new(f(arg::<A>(args, 0)?, arg::<B>(args, 1)?)))
        })
    }

    /// Adapts a three-argument callable.
    pub fn of3<A, B, C, R, F>(f: F) -> Self
    where
        A: Clone + 'static,
        B: Clone + 'static,
        C: Clone + 'static,
        R: Send + Sync + 'static,
        F: Fn(A, B, C) -> R + Send + Sync + 'static,
    {
        Self::from_raw(3, move |args| {
            expect_arity(args, 3)?;
            Ok(Box::new(f(
                arg::<A>(args, 0)?,
                arg::<B>(args, 1)?,
                arg::<C>(args, 2)?,
            )))
        })
    }

    /// Adapts a nullary instance method bound to `receiver`.
    pub fn bound0<O, R, F>(receiver: Arc<O>, f: F) -> Self
    where
        O: Send + Sync + 'static,
        R: Send + Sync + 'static,
        F: Fn(&O) -> R + Send + Sync + 'static,
    {
        Self::from_raw(0, move |args| {
            expect_arity(args, 0)?;
            Ok(Box::new(f(&receiver)))
        })
    }

    /// Adapts a one-argument instance method bound to `receiver`.
    pub fn bound1<O, A, R, F>(receiver: Arc<O>, f: F) -> Self
    where
        O: Send + Sync + 'static,
        A: Clone + 'static,
        R: Send + Sync + 'static,
        F: Fn(&O, A) -> R + Send + Sync + 'static,
    {
        Self::from_raw(1, move |args| {
            expect_arity(args, 1)?;
            Ok(Box::new(f(&receiver, arg::<A>(args, 0)?)))
        })
    }

    /// Adapts a two-argument instance method bound to `receiver`.
    pub fn bound2<O, A, B, R, F>(receiver: Arc<O>, f: F) -> Self
    where
        O: Send + Sync + 'static,
        A: Clone + 'static,
        B: Clone + 'static,
        R: Send + Sync + 'static,
        F: Fn(&O, A, B) -> R + Send + Sync + 'static,
    {
        Self::from_raw(2, move |args| {
            expect_arity(args, 2)?;
            Ok(Box::new(f(&receiver, arg::<A>(args, 0)?, arg::<B>(args, 1)?)))
        })
    }

    /// Declared argument count of the callable.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Runs the callable against an erased argument slice.
    pub(crate) fn call(
        &self,
        args: &MethodArgs,
    ) -> std::result::Result<Box<dyn Any + Send + Sync>, String> {
        (self.call)(args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method").field("arity", &self.arity).finish()
    }
}

fn expect_arity(args: &MethodArgs, expected: usize) -> std::result::Result<(), String> {
    if args.len() != expected {
        return Err(format!(
            "expected {expected} argument(s), got {}",
            args.len()
        ));
    }
    Ok(())
}

fn arg<A: Clone + 'static>(args: &MethodArgs, index: usize) -> std::result::Result<A, String> {
    args[index]
        .downcast_ref::<A>()
        .cloned()
        .ok_or_else(|| format!("argument {index} is not a {}", type_name::<A>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of2_invokes_with_downcast_arguments() {
        let method = Method::of2(|name: String, age: i32| format!("{name} is {age} years old!"));

        let out = method.call(&args!["Alex".to_string(), 27i32]).unwrap();
        assert_eq!(*out.downcast::<String>().unwrap(), "Alex is 27 years old!");
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let method = Method::of1(|n: i32| n + 1);
        let err = method.call(&args![1i32, 2i32]).unwrap_err();
        assert!(err.contains("expected 1 argument(s), got 2"));
    }

    #[test]
    fn argument_type_mismatch_is_reported() {
        let method = Method::of2(|name: String, age: i32| format!("{name}/{age}"));
        let err = method
            .call(&args!["Alex".to_string(), "27".to_string()])
            .unwrap_err();
        assert!(err.contains("argument 1"));
        assert!(err.contains("i32"));
    }

    #[test]
    fn bound_method_sees_its_receiver() {
        struct Greeter {
            prefix: String,
        }

        let receiver = Arc::new(Greeter { prefix: "Hello".into() });
        let method = Method::bound1(receiver, |g: &Greeter, who: String| {
            format!("{}, {who}!", g.prefix)
        });

        let out = method.call(&args!["world".to_string()]).unwrap();
        assert_eq!(*out.downcast::<String>().unwrap(), "Hello, world!");
    }

    #[test]
    fn nullary_method() {
        let method = Method::of0(|| 7u8);
        assert_eq!(method.arity(), 0);
        let out = method.call(&args![]).unwrap();
        assert_eq!(*out.downcast::<u8>().unwrap(), 7);
    }

    #[test]
    fn unit_return_values_work() {
        let method = Method::of1(|_: i32| ());
        let out = method.call(&args![1i32]).unwrap();
        assert!(out.downcast::<()>().is_ok());
    }
}
