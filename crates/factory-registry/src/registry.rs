//! Keyed constructor table for one abstract type.
//!
//! A [`Registry`] maps string keys to constructors producing owned instances
//! of a single abstract type `A`, with a fixed constructor-argument bundle
//! `Args` and an ownership policy `P`. It is an ordinary value: applications
//! that prefer deterministic wiring, and tests, can build and consult one
//! directly. The process-wide instances behind [`Registrar`] and [`Factory`]
//! wrap this same type; see the [`factory`](crate::factory) module.
//!
//! [`Registrar`]: crate::Registrar
//! [`Factory`]: crate::Factory

use crate::ownership::{Ownership, Pointer, Shared};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the strict registration and construction variants.
///
/// The canonical operations communicate absence through their return values
/// ([`Registry::register`] returns `bool`, [`Registry::construct`] returns
/// `Option`); these variants exist for callers that treat the same outcomes
/// as wiring errors.
#[derive(Debug, Error)]
pub enum RegistryError {
	/// Error that occurs when no constructor is registered under a key.
	#[error("Unknown implementation '{key}'. Available: [{}]", .available.join(", "))]
	UnknownKey {
		/// The key that failed to resolve.
		key: String,
		/// Registered keys at the time of the lookup, in lexicographic order.
		available: Vec<String>,
	},
	/// Error that occurs when a key is registered a second time.
	#[error("Implementation '{key}' is already registered")]
	DuplicateKey {
		/// The contested key. The first registration remains in effect.
		key: String,
	},
}

/// Constructor stored in a registry.
///
/// A clonable callable producing an owned instance of the abstract type `A`
/// from the argument bundle `Args`, under ownership policy `P`. `Args` stands
/// for the whole constructor-argument list: `()` for none, a plain type for
/// one argument, a tuple for several.
pub type Constructor<A, Args, P = Shared> =
	Arc<dyn Fn(Args) -> <P as Ownership>::Ptr<A> + Send + Sync>;

/// Ordered table mapping string keys to constructors for one
/// `(abstract type, argument bundle, ownership policy)` combination.
///
/// Lookup is O(log n) in the number of registered implementations. The first
/// registration for a key wins; later registrations under the same key are
/// discarded. Every successful lookup invokes the stored constructor anew,
/// so constructed instances are never cached or shared between calls.
pub struct Registry<A: ?Sized, Args = (), P: Ownership = Shared> {
	entries: BTreeMap<String, Constructor<A, Args, P>>,
}

impl<A: ?Sized, Args, P: Ownership> Registry<A, Args, P> {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self {
			entries: BTreeMap::new(),
		}
	}

	/// Registers `constructor` under `key` unless the key is already taken.
	///
	/// Returns `true` if the entry was inserted, `false` if a constructor is
	/// already registered under `key`, in which case the existing entry is
	/// kept and the new one is discarded.
	pub fn register<F>(&mut self, key: impl Into<String>, constructor: F) -> bool
	where
		F: Fn(Args) -> Pointer<P, A> + Send + Sync + 'static,
	{
		self.register_constructor(key, Arc::new(constructor))
	}

	/// Registers a pre-built [`Constructor`] under `key`.
	///
	/// Same first-wins policy as [`register`](Self::register). This is the
	/// entry point used for callables that already live behind an `Arc`,
	/// such as [`Implementation::constructor`](crate::Implementation::constructor).
	pub fn register_constructor(
		&mut self,
		key: impl Into<String>,
		constructor: Constructor<A, Args, P>,
	) -> bool {
		match self.entries.entry(key.into()) {
			Entry::Vacant(slot) => {
				slot.insert(constructor);
				true
			}
			Entry::Occupied(_) => false,
		}
	}

	/// Registers like [`register`](Self::register), reporting a duplicate key
	/// as [`RegistryError::DuplicateKey`] instead of discarding it silently.
	///
	/// The state outcome is identical to `register`: the first entry is kept.
	pub fn try_register<F>(
		&mut self,
		key: impl Into<String>,
		constructor: F,
	) -> Result<(), RegistryError>
	where
		F: Fn(Args) -> Pointer<P, A> + Send + Sync + 'static,
	{
		let key = key.into();
		if self.register(key.clone(), constructor) {
			Ok(())
		} else {
			Err(RegistryError::DuplicateKey { key })
		}
	}

	/// Constructs a new instance for `key`, or `None` if the key is unknown.
	///
	/// On a hit the stored constructor is invoked with `args`, yielding a
	/// fresh instance on every call. An unknown key is an expected outcome,
	/// not an error, and never panics.
	pub fn construct(&self, key: &str, args: Args) -> Option<Pointer<P, A>> {
		self.entries.get(key).map(|constructor| constructor(args))
	}

	/// Constructs like [`construct`](Self::construct), reporting an unknown
	/// key as [`RegistryError::UnknownKey`] carrying the registered keys.
	pub fn try_construct(&self, key: &str, args: Args) -> Result<Pointer<P, A>, RegistryError> {
		match self.entries.get(key) {
			Some(constructor) => Ok(constructor(args)),
			None => Err(RegistryError::UnknownKey {
				key: key.to_string(),
				available: self.entries.keys().cloned().collect(),
			}),
		}
	}

	/// Returns a clone of the constructor registered under `key`.
	///
	/// Constructors are `Arc`-clonable, so the returned callable stays usable
	/// independently of the registry it came from.
	pub fn constructor(&self, key: &str) -> Option<Constructor<A, Args, P>> {
		self.entries.get(key).cloned()
	}

	/// Returns `true` if a constructor is registered under `key`.
	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Iterates over the registered keys in lexicographic order.
	pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
		self.entries.keys().map(String::as_str)
	}

	/// Number of registered implementations.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<A: ?Sized, Args, P: Ownership> Default for Registry<A, Args, P> {
	fn default() -> Self {
		Self::new()
	}
}

impl<A: ?Sized, Args, P: Ownership> fmt::Debug for Registry<A, Args, P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		// Constructors are opaque; the key set is the useful part.
		f.debug_struct("Registry")
			.field("keys", &self.entries.keys().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ownership::{Raw, Unique};
	use std::sync::atomic::{AtomicUsize, Ordering};

	trait Named: Send + Sync + fmt::Debug {
		fn name(&self) -> &'static str;
	}

	#[derive(Debug)]
	struct Alpha;

	impl Named for Alpha {
		fn name(&self) -> &'static str {
			"alpha"
		}
	}

	#[derive(Debug)]
	struct Beta;

	impl Named for Beta {
		fn name(&self) -> &'static str {
			"beta"
		}
	}

	#[test]
	fn test_register_and_construct() {
		let mut registry: Registry<dyn Named> = Registry::new();
		assert!(registry.register("alpha", |()| Arc::new(Alpha) as Arc<dyn Named>));
		let instance = registry.construct("alpha", ()).unwrap();
		assert_eq!(instance.name(), "alpha");
	}

	#[test]
	fn test_unknown_key_returns_none() {
		let registry: Registry<dyn Named> = Registry::new();
		assert!(registry.construct("missing", ()).is_none());
	}

	#[test]
	fn test_first_registration_wins() {
		let mut registry: Registry<dyn Named> = Registry::new();
		assert!(registry.register("named", |()| Arc::new(Alpha) as Arc<dyn Named>));
		assert!(!registry.register("named", |()| Arc::new(Beta) as Arc<dyn Named>));
		assert_eq!(registry.len(), 1);
		assert_eq!(registry.construct("named", ()).unwrap().name(), "alpha");
	}

	#[test]
	fn test_try_register_reports_duplicates() {
		let mut registry: Registry<dyn Named> = Registry::new();
		registry
			.try_register("named", |()| Arc::new(Alpha) as Arc<dyn Named>)
			.unwrap();
		let err = registry
			.try_register("named", |()| Arc::new(Beta) as Arc<dyn Named>)
			.unwrap_err();
		assert!(matches!(err, RegistryError::DuplicateKey { .. }));
		// The first registration is still the effective one.
		assert_eq!(registry.construct("named", ()).unwrap().name(), "alpha");
	}

	#[test]
	fn test_try_construct_lists_available_keys() {
		let mut registry: Registry<dyn Named> = Registry::new();
		registry.register("beta", |()| Arc::new(Beta) as Arc<dyn Named>);
		registry.register("alpha", |()| Arc::new(Alpha) as Arc<dyn Named>);
		let err = registry.try_construct("gamma", ()).unwrap_err();
		match &err {
			RegistryError::UnknownKey { key, available } => {
				assert_eq!(key, "gamma");
				assert_eq!(available.join(","), "alpha,beta");
			}
			other => panic!("unexpected error: {other:?}"),
		}
		assert_eq!(
			err.to_string(),
			"Unknown implementation 'gamma'. Available: [alpha, beta]"
		);
	}

	#[test]
	fn test_construct_yields_fresh_instances() {
		static BUILT: AtomicUsize = AtomicUsize::new(0);
		let mut registry: Registry<dyn Named> = Registry::new();
		registry.register("alpha", |()| {
			BUILT.fetch_add(1, Ordering::SeqCst);
			Arc::new(Alpha) as Arc<dyn Named>
		});
		let first = registry.construct("alpha", ()).unwrap();
		let second = registry.construct("alpha", ()).unwrap();
		assert_eq!(BUILT.load(Ordering::SeqCst), 2);
		assert!(!Arc::ptr_eq(&first, &second));
	}

	#[test]
	fn test_argument_bundles_are_a_single_type() {
		struct Connection {
			target: String,
			port: u16,
		}

		let mut registry: Registry<Connection, (String, u16), Unique> = Registry::new();
		registry.register("tcp", |(target, port)| Box::new(Connection { target, port }));
		let conn = registry
			.construct("tcp", ("localhost".to_string(), 8080))
			.unwrap();
		assert_eq!(conn.target, "localhost");
		assert_eq!(conn.port, 8080);
	}

	#[test]
	fn test_raw_policy_hands_release_to_the_caller() {
		let mut registry: Registry<dyn Named, (), Raw> = Registry::new();
		registry.register("alpha", |()| Box::into_raw(Box::new(Alpha)) as *mut dyn Named);
		let raw = registry.construct("alpha", ()).unwrap();
		let reclaimed = unsafe { Box::from_raw(raw) };
		assert_eq!(reclaimed.name(), "alpha");
	}

	#[test]
	fn test_keys_iterate_in_lexicographic_order() {
		let mut registry: Registry<dyn Named> = Registry::new();
		for key in ["zeta", "alpha", "mike"] {
			registry.register(key, |()| Arc::new(Alpha) as Arc<dyn Named>);
		}
		let keys: Vec<&str> = registry.keys().collect();
		assert_eq!(keys, ["alpha", "mike", "zeta"]);
		assert!(registry.contains_key("mike"));
		assert!(!registry.is_empty());
		assert_eq!(registry.len(), 3);
	}

	#[test]
	fn test_constructor_clones_out_of_the_table() {
		let mut registry: Registry<dyn Named> = Registry::new();
		registry.register("alpha", |()| Arc::new(Alpha) as Arc<dyn Named>);
		let constructor = registry.constructor("alpha").unwrap();
		drop(registry);
		assert_eq!(constructor(()).name(), "alpha");
	}

	#[test]
	fn test_debug_lists_keys_only() {
		let mut registry: Registry<dyn Named> = Registry::new();
		registry.register("alpha", |()| Arc::new(Alpha) as Arc<dyn Named>);
		let rendered = format!("{registry:?}");
		assert!(rendered.contains("alpha"));
	}
}
