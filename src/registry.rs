use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{InjectError, StdError};
use crate::key::{DependencyKey, short_type_name};

/// Reserved scope used whenever no scope is supplied.
pub const GLOBAL_SCOPE: &str = "#global#";

/// Type-erased, shared handle to a constructed instance.
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

type ConstructorFn = Arc<dyn Fn(&Resolved) -> Result<Instance, StdError> + Send + Sync>;
type FactoryFn = Arc<dyn Fn() -> Result<Instance, StdError> + Send + Sync>;

/// A function that builds an instance for a dependency slot.
///
/// A producer has one of two declared kinds, selected at registration and
/// never probed at runtime:
///
/// - a **constructor**, invoked with the dependencies resolved from the
///   slot's declaration, in declaration order;
/// - a **factory**, invoked with no arguments.
///
/// [`Producer::instance`] wraps a ready-made value as a clone-returning
/// factory, which is how [`Container::replace_with_instance`] substitutes
/// pre-built mocks.
///
/// [`Container::replace_with_instance`]: crate::Container::replace_with_instance
///
/// # Examples
///
/// ```rust
/// use injex::{Producer, Resolved};
/// use std::sync::Arc;
///
/// struct Config {
///     url: String,
/// }
///
/// struct Database {
///     config: Arc<Config>,
/// }
///
/// let config = Producer::factory(|| {
///     Ok(Arc::new(Config {
///         url: "sqlite::memory:".to_string(),
///     }))
/// });
///
/// let database = Producer::constructor(|deps: &Resolved| {
///     let config: Arc<Config> = deps.get(0)?;
///     Ok(Arc::new(Database { config }))
/// });
/// ```
#[derive(Clone)]
pub struct Producer {
    kind: ProducerKind,
}

#[derive(Clone)]
enum ProducerKind {
    Constructor(ConstructorFn),
    Factory(FactoryFn),
}

impl Producer {
    /// Wraps a constructor: a closure receiving the resolved dependencies
    /// declared for the slot, in declaration order.
    pub fn constructor<T, F>(build: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Resolved) -> Result<T, StdError> + Send + Sync + 'static,
    {
        Self {
            kind: ProducerKind::Constructor(Arc::new(move |deps| {
                Ok(Arc::new(build(deps)?) as Instance)
            })),
        }
    }

    /// Wraps a zero-argument factory.
    pub fn factory<T, F>(build: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, StdError> + Send + Sync + 'static,
    {
        Self {
            kind: ProducerKind::Factory(Arc::new(move || Ok(Arc::new(build()?) as Instance))),
        }
    }

    /// Wraps a ready-made value as a zero-argument factory returning clones
    /// of it.
    pub fn instance<T>(value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self::factory(move || Ok(value.clone()))
    }

    /// Invokes the producer according to its declared kind.
    pub(crate) fn produce(&self, deps: &Resolved) -> Result<Instance, StdError> {
        match &self.kind {
            ProducerKind::Constructor(build) => build(deps),
            ProducerKind::Factory(build) => build(),
        }
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            ProducerKind::Constructor(_) => "Constructor",
            ProducerKind::Factory(_) => "Factory",
        };
        f.debug_struct("Producer").field("kind", &kind).finish()
    }
}

/// One entry of a dependency declaration: the key to resolve and an optional
/// per-parameter scope override.
///
/// Without an override the dependency resolves in the ambient scope of the
/// resolution that needs it; with one, it always resolves in the named scope.
///
/// # Examples
///
/// ```rust
/// use injex::Dependency;
/// use std::sync::Arc;
///
/// struct Config;
///
/// let ambient = Dependency::on::<Arc<Config>>();
/// let pinned = Dependency::on_in::<Arc<Config>>("jobs");
/// ```
#[derive(Clone, Debug)]
pub struct Dependency {
    pub(crate) key: DependencyKey,
    pub(crate) scope: Option<String>,
}

impl Dependency {
    /// Declares a dependency on `T`, resolved in the ambient scope.
    pub fn on<T: ?Sized + 'static>() -> Self {
        Self {
            key: DependencyKey::of::<T>(),
            scope: None,
        }
    }

    /// Declares a dependency on `T`, always resolved in `scope` regardless of
    /// the ambient scope.
    pub fn on_in<T: ?Sized + 'static>(scope: impl Into<String>) -> Self {
        Self {
            key: DependencyKey::of::<T>(),
            scope: Some(scope.into()),
        }
    }
}

/// The ordered argument pack handed to a constructor, holding one resolved
/// instance per declared dependency.
pub struct Resolved {
    args: Vec<(DependencyKey, Instance)>,
}

impl Resolved {
    pub(crate) fn new(args: Vec<(DependencyKey, Instance)>) -> Self {
        Self { args }
    }

    /// Returns the resolved dependency at `index` as a clone of its handle.
    ///
    /// Positions follow the declaration order supplied at registration.
    pub fn get<T: Clone + 'static>(&self, index: usize) -> Result<T, InjectError> {
        let (key, instance) = self
            .args
            .get(index)
            .ok_or(InjectError::NoSuchArgument { index })?;
        instance
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| InjectError::TypeMismatch {
                key: key.display_name(),
                expected: short_type_name(std::any::type_name::<T>()),
            })
    }

    /// Returns the number of resolved dependencies.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns true if the declaration was empty.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// Stored association between a (key, scope) slot and its producer.
#[derive(Clone)]
pub(crate) struct Registration {
    pub producer: Producer,
    pub dependencies: Vec<Dependency>,
    /// True when the registration was made under the reserved global scope
    /// (and always for replacements). Recorded and logged, never used for
    /// gating.
    pub singleton: bool,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("producer", &self.producer)
            .field("dependencies", &self.dependencies)
            .field("singleton", &self.singleton)
            .finish()
    }
}

/// Scoped mapping from dependency key to registration record.
///
/// Registering the same (key, scope) twice silently replaces the prior
/// record; the overwrite is only debug-logged. Registrations are never
/// deleted individually.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    scopes: HashMap<String, HashMap<DependencyKey, Registration>>,
}

impl Registry {
    pub fn register(&mut self, key: DependencyKey, scope: &str, registration: Registration) {
        let slot = self.scopes.entry(scope.to_owned()).or_default();
        if slot.insert(key, registration).is_some() {
            debug!(key = %key, scope, "overwrote existing registration");
        }
    }

    pub fn lookup(&self, key: &DependencyKey, scope: &str) -> Option<&Registration> {
        self.scopes.get(scope)?.get(key)
    }
}
