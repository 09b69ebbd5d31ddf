use std::cell::RefCell;

use tracing::{debug, trace};

use crate::cache::SingletonCache;
use crate::error::InjectError;
use crate::key::DependencyKey;
use crate::registry::{
    Dependency, GLOBAL_SCOPE, Instance, Producer, Registration, Registry, Resolved,
};

/// Scoped dependency injection container.
///
/// A container owns a registry of producers and a cache of constructed
/// singleton instances, both partitioned by string scopes. Registration
/// populates the registry only; [`inject`](Container::inject) resolves a slot
/// on demand, recursively constructing the declared dependencies first, and
/// memoizes the result per (key, scope).
///
/// Every operation runs to completion on the calling thread. The container
/// uses [`RefCell`] internally and is not `Sync`; an application that needs
/// cross-thread resolution must serialize access itself. Construct one
/// container per application (or per test) and pass it by reference — there
/// are no process-wide globals.
///
/// There is no cycle detection: a dependency declaration that reaches back to
/// its own slot recurses until the stack is exhausted.
///
/// # Examples
///
/// ```rust
/// use injex::{Container, Dependency, Producer, Resolved};
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
/// # fn main() -> Result<(), injex::InjectError> {
/// let container = Container::new();
/// container.register_self::<Arc<Config>>(
///     Producer::factory(|| {
///         Ok(Arc::new(Config {
///             url: "sqlite::memory:".to_string(),
///         }))
///     }),
///     vec![],
/// );
/// container.register_self::<Arc<Database>>(
///     Producer::constructor(|deps: &Resolved| {
///         let config: Arc<Config> = deps.get(0)?;
///         Ok(Arc::new(Database { config }))
///     }),
///     vec![Dependency::on::<Arc<Config>>()],
/// );
///
/// let database: Arc<Database> = container.inject()?;
/// assert_eq!(database.config.url, "sqlite::memory:");
///
/// // Repeated injection returns the memoized instance.
/// let again: Arc<Database> = container.inject()?;
/// assert!(Arc::ptr_eq(&database, &again));
/// # Ok(())
/// # }
/// ```
pub struct Container {
    registry: RefCell<Registry>,
    cache: RefCell<SingletonCache>,
}

impl Container {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self {
            registry: RefCell::new(Registry::default()),
            cache: RefCell::new(SingletonCache::default()),
        }
    }

    /// Registers a producer for the handle type `T` under its own identity,
    /// in the reserved global scope.
    ///
    /// `dependencies` is the ordered declaration of what the producer needs;
    /// it replaces constructor introspection and must match the positions the
    /// constructor reads via [`Resolved::get`]. No producer-shape validation
    /// happens here; a mismatch surfaces at injection time.
    pub fn register_self<T: ?Sized + 'static>(
        &self,
        producer: Producer,
        dependencies: Vec<Dependency>,
    ) {
        self.register_self_in::<T>(GLOBAL_SCOPE, producer, dependencies);
    }

    /// Registers a producer for `T` under its own identity in `scope`.
    pub fn register_self_in<T: ?Sized + 'static>(
        &self,
        scope: &str,
        producer: Producer,
        dependencies: Vec<Dependency>,
    ) {
        self.register_key(
            DependencyKey::of::<T>(),
            scope,
            producer,
            dependencies,
            scope == GLOBAL_SCOPE,
        );
    }

    /// Registers a concrete producer against the abstract key `K` (typically
    /// a trait-object handle such as `Arc<dyn Contract>`), in the reserved
    /// global scope.
    pub fn register_for<K: ?Sized + 'static>(
        &self,
        producer: Producer,
        dependencies: Vec<Dependency>,
    ) {
        self.register_for_in::<K>(GLOBAL_SCOPE, producer, dependencies);
    }

    /// Registers a concrete producer against the abstract key `K` in `scope`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use injex::{Container, Producer};
    /// use std::sync::Arc;
    ///
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct English;
    ///
    /// impl Greeter for English {
    ///     fn greet(&self) -> String {
    ///         "hello".to_string()
    ///     }
    /// }
    ///
    /// # fn main() -> Result<(), injex::InjectError> {
    /// let container = Container::new();
    /// container.register_for_in::<Arc<dyn Greeter>>(
    ///     "en",
    ///     Producer::factory(|| Ok(Arc::new(English) as Arc<dyn Greeter>)),
    ///     vec![],
    /// );
    ///
    /// let greeter: Arc<dyn Greeter> = container.inject_in("en")?;
    /// assert_eq!(greeter.greet(), "hello");
    /// # Ok(())
    /// # }
    /// ```
    pub fn register_for_in<K: ?Sized + 'static>(
        &self,
        scope: &str,
        producer: Producer,
        dependencies: Vec<Dependency>,
    ) {
        self.register_key(
            DependencyKey::of::<K>(),
            scope,
            producer,
            dependencies,
            scope == GLOBAL_SCOPE,
        );
    }

    /// Resolves the handle for `T` from the reserved global scope,
    /// constructing and caching it on first use.
    ///
    /// Returns [`InjectError::NotFound`] if no producer is registered for the
    /// slot. The handle type must be `Clone`; use `Arc<..>` handles to share
    /// one instance and observe reference identity across calls.
    pub fn inject<T: Clone + 'static>(&self) -> Result<T, InjectError> {
        self.inject_in(GLOBAL_SCOPE)
    }

    /// Resolves the handle for `T` from `scope`.
    ///
    /// Dependencies without a per-parameter override resolve in this same
    /// scope; overridden ones resolve in their pinned scope.
    pub fn inject_in<T: Clone + 'static>(&self, scope: &str) -> Result<T, InjectError> {
        let key = DependencyKey::of::<T>();
        let instance = self.resolve(key, scope)?;
        instance
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| InjectError::TypeMismatch {
                key: key.display_name(),
                expected: key.display_name(),
            })
    }

    /// Substitutes the registration for `K` in the reserved global scope.
    ///
    /// Evicts any cached instance, re-registers `producer` for the slot
    /// (always as a singleton-style registration), then eagerly injects once
    /// so the substitution is immediately visible to anyone who looks the
    /// slot up again. The eager injection's error is propagated.
    pub fn replace_with<K: ?Sized + 'static>(
        &self,
        producer: Producer,
        dependencies: Vec<Dependency>,
    ) -> Result<(), InjectError> {
        self.replace_with_in::<K>(GLOBAL_SCOPE, producer, dependencies)
    }

    /// Substitutes the registration for `K` in `scope`.
    pub fn replace_with_in<K: ?Sized + 'static>(
        &self,
        scope: &str,
        producer: Producer,
        dependencies: Vec<Dependency>,
    ) -> Result<(), InjectError> {
        let key = DependencyKey::of::<K>();
        debug!(key = %key, scope, "replacing registration");
        self.destroy_in::<K>(scope);
        self.register_key(key, scope, producer, dependencies, true);
        self.resolve(key, scope)?;
        Ok(())
    }

    /// Substitutes a ready-made value for `K` in the reserved global scope.
    ///
    /// The value is wrapped as a zero-argument factory, so the construction
    /// step stays uniform with producer registrations.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use injex::{Container, Producer};
    /// use std::sync::Arc;
    ///
    /// trait Clock: Send + Sync {
    ///     fn now(&self) -> u64;
    /// }
    ///
    /// struct SystemClock;
    ///
    /// impl Clock for SystemClock {
    ///     fn now(&self) -> u64 {
    ///         0
    ///     }
    /// }
    ///
    /// struct FrozenClock(u64);
    ///
    /// impl Clock for FrozenClock {
    ///     fn now(&self) -> u64 {
    ///         self.0
    ///     }
    /// }
    ///
    /// # fn main() -> Result<(), injex::InjectError> {
    /// let container = Container::new();
    /// container.register_for::<Arc<dyn Clock>>(
    ///     Producer::factory(|| Ok(Arc::new(SystemClock) as Arc<dyn Clock>)),
    ///     vec![],
    /// );
    ///
    /// container.replace_with_instance::<Arc<dyn Clock>>(Arc::new(FrozenClock(42)))?;
    /// let clock: Arc<dyn Clock> = container.inject()?;
    /// assert_eq!(clock.now(), 42);
    /// # Ok(())
    /// # }
    /// ```
    pub fn replace_with_instance<K>(&self, value: K) -> Result<(), InjectError>
    where
        K: Clone + Send + Sync + 'static,
    {
        self.replace_with_instance_in(GLOBAL_SCOPE, value)
    }

    /// Substitutes a ready-made value for `K` in `scope`.
    pub fn replace_with_instance_in<K>(&self, scope: &str, value: K) -> Result<(), InjectError>
    where
        K: Clone + Send + Sync + 'static,
    {
        self.replace_with_in::<K>(scope, Producer::instance(value), Vec::new())
    }

    /// Evicts the cached instance for `K` in the reserved global scope.
    ///
    /// The registry is untouched, so the next [`inject`](Container::inject)
    /// re-runs the producer and yields a fresh instance.
    pub fn destroy<K: ?Sized + 'static>(&self) {
        self.destroy_in::<K>(GLOBAL_SCOPE);
    }

    /// Evicts the cached instance for `K` in `scope`.
    pub fn destroy_in<K: ?Sized + 'static>(&self, scope: &str) {
        let key = DependencyKey::of::<K>();
        if self.cache.borrow_mut().evict(&key, scope) {
            debug!(key = %key, scope, "evicted cached instance");
        }
    }

    fn register_key(
        &self,
        key: DependencyKey,
        scope: &str,
        producer: Producer,
        dependencies: Vec<Dependency>,
        singleton: bool,
    ) {
        debug!(key = %key, scope, singleton, "registering producer");
        self.registry.borrow_mut().register(
            key,
            scope,
            Registration {
                producer,
                dependencies,
                singleton,
            },
        );
    }

    /// The core resolution algorithm: cache hit, registry lookup, depth-first
    /// left-to-right dependency resolution, construction, then caching.
    ///
    /// Registry and cache borrows are never held across the recursion or the
    /// producer invocation.
    fn resolve(&self, key: DependencyKey, scope: &str) -> Result<Instance, InjectError> {
        let cached = self.cache.borrow().lookup(&key, scope);
        if let Some(instance) = cached {
            trace!(key = %key, scope, "cache hit");
            return Ok(instance);
        }
        let registration = self
            .registry
            .borrow()
            .lookup(&key, scope)
            .cloned()
            .ok_or_else(|| InjectError::NotFound {
                key: key.display_name(),
                scope: scope.to_owned(),
            })?;
        trace!(
            key = %key,
            scope,
            singleton = registration.singleton,
            dependencies = registration.dependencies.len(),
            "resolving",
        );
        let mut args = Vec::with_capacity(registration.dependencies.len());
        for dependency in &registration.dependencies {
            // Scope propagates down the graph unless pinned by an override.
            let effective = dependency.scope.as_deref().unwrap_or(scope);
            args.push((dependency.key, self.resolve(dependency.key, effective)?));
        }
        let resolved = Resolved::new(args);
        let instance =
            registration
                .producer
                .produce(&resolved)
                .map_err(|source| InjectError::Construction {
                    key: key.display_name(),
                    scope: scope.to_owned(),
                    source,
                })?;
        // Stored strictly after successful construction; a failed producer
        // leaves no entry for this slot.
        self.cache.borrow_mut().store(key, scope, instance.clone());
        debug!(key = %key, scope, "constructed and cached instance");
        Ok(instance)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}
