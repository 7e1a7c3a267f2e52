//! Keyed construction of trait objects through process-wide registries.
//!
//! The crate maps string keys to constructors for an abstract type and
//! builds fresh instances on demand. Each combination of abstract type,
//! argument bundle and ownership policy gets its own process-wide
//! [`Registry`], created lazily on first use. [`Registrar`] binds a key to a
//! constructor during startup, [`Factory`] constructs by key afterwards, and
//! the [`ownership`] policies decide whether callers receive `Arc`, `Box` or
//! a raw pointer. Registration is first-wins: once a key has a constructor,
//! later registrations for the same key are ignored.
//!
//! ```
//! use factory_registry::{Factory, Registrar};
//! use std::sync::Arc;
//!
//! trait Loader: Send + Sync {
//!     fn describe(&self) -> String;
//! }
//!
//! struct CsvLoader {
//!     path: String,
//! }
//!
//! impl Loader for CsvLoader {
//!     fn describe(&self) -> String {
//!         format!("csv loader for {}", self.path)
//!     }
//! }
//!
//! // Startup: bind the key to a constructor once.
//! Registrar::<dyn Loader, String>::new("csv_loader", |path| {
//!     Arc::new(CsvLoader { path }) as Arc<dyn Loader>
//! });
//!
//! // Later: construct by key. Unknown keys yield `None`.
//! let loader = Factory::<dyn Loader, String>::construct("csv_loader", "in.csv".into());
//! assert_eq!(loader.unwrap().describe(), "csv loader for in.csv");
//! assert!(Factory::<dyn Loader, String>::construct("xml_loader", "in.xml".into()).is_none());
//! ```

/// Process-wide registries and the keyed construction entry point.
pub mod factory;
/// Ownership policies deciding what pointer construction hands back.
pub mod ownership;
/// Registration handles binding keys to constructors at startup.
pub mod registrar;
/// The key-to-constructor table and its errors.
pub mod registry;

pub use factory::Factory;
pub use ownership::{Ownership, Pointer, Raw, Shared, Unique};
pub use registrar::{Implementation, Registrar};
pub use registry::{Constructor, Registry, RegistryError};
