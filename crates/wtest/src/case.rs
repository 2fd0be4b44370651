//! Test-case types and method discovery
//!
//! Test methods are registered explicitly, in order, through
//! [`TestCase::methods`]; discovery keeps the registered methods whose name
//! starts with [`TEST_PREFIX`].

use crate::assert::Assert;
use crate::runner::{run_case, Session};

/// Methods whose name starts with this prefix are run
pub const TEST_PREFIX: &str = "test";

/// Signature of a registered method
pub type MethodBody<T> = fn(&mut T, &mut Assert) -> anyhow::Result<()>;

/// A named method of a test-case type
pub struct TestMethod<T> {
    pub name: &'static str,
    body: MethodBody<T>,
}

impl<T> Clone for TestMethod<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TestMethod<T> {}

impl<T> std::fmt::Debug for TestMethod<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestMethod").field("name", &self.name).finish()
    }
}

impl<T> TestMethod<T> {
    pub fn new(name: &'static str, body: MethodBody<T>) -> Self {
        Self { name, body }
    }

    /// Whether discovery selects this method
    pub fn is_test(&self) -> bool {
        self.name.starts_with(TEST_PREFIX)
    }

    pub(crate) fn invoke(&self, instance: &mut T, assert: &mut Assert) -> anyhow::Result<()> {
        (self.body)(instance, assert)
    }
}

/// A group of related test methods, instantiated once per run with `Default`.
///
/// ```
/// use wtest::{methods, Assert, TestCase, TestMethod};
///
/// #[derive(Default)]
/// struct MathTests;
///
/// impl MathTests {
///     fn test_addition(&mut self, t: &mut Assert) -> anyhow::Result<()> {
///         t.equal(|| Ok(2 + 2), || Ok(4), "");
///         Ok(())
///     }
/// }
///
/// impl TestCase for MathTests {
///     fn methods() -> Vec<TestMethod<Self>> {
///         methods![test_addition]
///     }
/// }
/// ```
pub trait TestCase: Default + 'static {
    /// Name used in logs and run records; the unqualified type name by default
    fn name() -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Every method of the type, in the order it should run
    fn methods() -> Vec<TestMethod<Self>>;
}

/// Build a `Vec<TestMethod<Self>>` from method names of the enclosing impl.
#[macro_export]
macro_rules! methods {
    ($($method:ident),* $(,)?) => {
        vec![$($crate::TestMethod::new(stringify!($method), Self::$method)),*]
    };
}

/// Registered methods of `T` that discovery selects, in registration order
pub fn discover<T: TestCase>() -> Vec<TestMethod<T>> {
    T::methods().into_iter().filter(TestMethod::is_test).collect()
}

/// Type-erased handle to a [`TestCase`] implementation, as accepted by the
/// runner.
#[derive(Clone, Copy)]
pub struct TestCaseType {
    name: &'static str,
    registered: fn() -> Vec<&'static str>,
    discovered: fn() -> Vec<&'static str>,
    execute: fn(&mut Session<'_>),
}

impl TestCaseType {
    pub fn of<T: TestCase>() -> Self {
        Self {
            name: T::name(),
            registered: || T::methods().iter().map(|m| m.name).collect(),
            discovered: || discover::<T>().iter().map(|m| m.name).collect(),
            execute: run_case::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Names of every registered method, including non-test helpers
    pub fn method_names(&self) -> Vec<&'static str> {
        (self.registered)()
    }

    /// Names of the methods the runner will invoke
    pub fn test_names(&self) -> Vec<&'static str> {
        (self.discovered)()
    }

    pub(crate) fn execute(&self, session: &mut Session<'_>) {
        (self.execute)(session)
    }
}

impl std::fmt::Debug for TestCaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCaseType")
            .field("name", &self.name)
            .finish()
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    // Generic parameters may themselves contain paths.
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}
