//! # injex
//!
//! A scoped dependency injection container: a declarative mapping from
//! abstract identities to concrete producers that builds object graphs on
//! demand, memoizes singleton instances per scope, and supports runtime
//! substitution and teardown for testing.
//!
//! ## Core Concepts
//!
//! - **Container**: owns the registry of producers and the cache of
//!   constructed instances; one per application (or per test)
//! - **DependencyKey**: identity token for a slot, derived from the injected
//!   handle type (`Arc<Svc>` or `Arc<dyn Contract>`)
//! - **Scope**: string namespace partitioning registry and cache; the
//!   reserved default is [`GLOBAL_SCOPE`]
//! - **Producer**: constructor-style or factory-style build function,
//!   selected by declared kind
//! - **Dependency**: one entry of the explicit, ordered dependency
//!   declaration, with an optional per-parameter scope override
//!
//! ## Basic Usage
//!
//! Register producers during bootstrap, inject thereafter:
//!
//! ```rust
//! use injex::{Container, Dependency, Producer, Resolved};
//! use std::sync::Arc;
//!
//! struct Config {
//!     greeting: &'static str,
//! }
//!
//! struct Greeter {
//!     config: Arc<Config>,
//! }
//!
//! impl Greeter {
//!     fn greet(&self, name: &str) -> String {
//!         format!("{}, {name}!", self.config.greeting)
//!     }
//! }
//!
//! fn main() -> Result<(), injex::InjectError> {
//!     let container = Container::new();
//!     container.register_self::<Arc<Config>>(
//!         Producer::factory(|| Ok(Arc::new(Config { greeting: "Hello" }))),
//!         vec![],
//!     );
//!     container.register_self::<Arc<Greeter>>(
//!         Producer::constructor(|deps: &Resolved| {
//!             let config: Arc<Config> = deps.get(0)?;
//!             Ok(Arc::new(Greeter { config }))
//!         }),
//!         vec![Dependency::on::<Arc<Config>>()],
//!     );
//!
//!     let greeter: Arc<Greeter> = container.inject()?;
//!     assert_eq!(greeter.greet("world"), "Hello, world!");
//!     Ok(())
//! }
//! ```
//!
//! ## Scopes
//!
//! The same key can carry different registrations in different scopes, and a
//! constructor parameter can pin a dependency to a specific scope regardless
//! of the ambient one:
//!
//! ```rust
//! use injex::{Container, Dependency, Producer, Resolved};
//! use std::sync::Arc;
//!
//! trait Engine: Send + Sync {
//!     fn kind(&self) -> &'static str;
//! }
//!
//! struct Petrol;
//! impl Engine for Petrol {
//!     fn kind(&self) -> &'static str {
//!         "petrol"
//!     }
//! }
//!
//! struct Electro;
//! impl Engine for Electro {
//!     fn kind(&self) -> &'static str {
//!         "electro"
//!     }
//! }
//!
//! struct Hybrid {
//!     primary: Arc<dyn Engine>,
//!     secondary: Arc<dyn Engine>,
//! }
//!
//! fn main() -> Result<(), injex::InjectError> {
//!     let container = Container::new();
//!     container.register_for_in::<Arc<dyn Engine>>(
//!         "petrol",
//!         Producer::factory(|| Ok(Arc::new(Petrol) as Arc<dyn Engine>)),
//!         vec![],
//!     );
//!     container.register_for_in::<Arc<dyn Engine>>(
//!         "electro",
//!         Producer::factory(|| Ok(Arc::new(Electro) as Arc<dyn Engine>)),
//!         vec![],
//!     );
//!     container.register_self::<Arc<Hybrid>>(
//!         Producer::constructor(|deps: &Resolved| {
//!             Ok(Arc::new(Hybrid {
//!                 primary: deps.get(0)?,
//!                 secondary: deps.get(1)?,
//!             }))
//!         }),
//!         vec![
//!             Dependency::on_in::<Arc<dyn Engine>>("petrol"),
//!             Dependency::on_in::<Arc<dyn Engine>>("electro"),
//!         ],
//!     );
//!
//!     let hybrid: Arc<Hybrid> = container.inject()?;
//!     assert_eq!(hybrid.primary.kind(), "petrol");
//!     assert_eq!(hybrid.secondary.kind(), "electro");
//!     Ok(())
//! }
//! ```
//!
//! ## Substitution and Teardown
//!
//! [`Container::replace_with_instance`] swaps a slot for a ready-made value
//! and repopulates the cache eagerly; [`Container::destroy`] evicts the
//! cached instance so the next injection reconstructs it fresh.
//!
//! ## Limitations
//!
//! The container is synchronous and not `Sync`; cross-thread use must be
//! serialized by the embedding application. There is no cycle detection —
//! a circular dependency declaration recurses until stack exhaustion.

mod cache;
mod container;
mod error;
mod key;
mod registry;

pub use container::*;
pub use error::*;
pub use key::*;
pub use registry::*;
