//! Process-wide registries and the keyed construction entry point.
//!
//! One [`Registry`] exists per distinct `(abstract type, argument bundle,
//! ownership policy)` instantiation, created lazily on first access and kept
//! for the remainder of the process. [`Factory`] exposes the construction
//! side of that instance; [`Registrar`](crate::Registrar) the registration
//! side. Registration takes a write lock and construction a read lock, so
//! reads run concurrently once registration has settled; the expected
//! discipline is still to register during startup, before handing keys to
//! concurrent consumers.

use crate::ownership::{Ownership, Pointer, Shared};
use crate::registry::{Registry, RegistryError};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::OnceLock;

/// Table of process-wide registries, keyed by their instantiation.
///
/// Entries are leaked on creation: a process-wide registry lives from first
/// access to process exit and is never torn down.
static INSTANCES: OnceLock<RwLock<HashMap<TypeId, &'static (dyn Any + Send + Sync)>>> =
	OnceLock::new();

fn instances() -> &'static RwLock<HashMap<TypeId, &'static (dyn Any + Send + Sync)>> {
	INSTANCES.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Returns the process-wide registry for the instantiation, creating it on
/// first access.
pub(crate) fn instance<A, Args, P>() -> &'static RwLock<Registry<A, Args, P>>
where
	A: ?Sized + 'static,
	Args: 'static,
	P: Ownership + 'static,
{
	let id = TypeId::of::<Registry<A, Args, P>>();
	let existing = instances().read().get(&id).copied();
	let entry = match existing {
		Some(entry) => entry,
		None => {
			let mut table = instances().write();
			*table.entry(id).or_insert_with(|| {
				tracing::debug!(
					registry = std::any::type_name::<Registry<A, Args, P>>(),
					"Initializing process-wide registry"
				);
				let leaked: &'static (dyn Any + Send + Sync) =
					Box::leak(Box::new(RwLock::new(Registry::<A, Args, P>::new())));
				leaked
			})
		}
	};
	entry
		.downcast_ref::<RwLock<Registry<A, Args, P>>>()
		.expect("process-wide registry stored under a foreign TypeId")
}

/// Process-wide construction entry point for one instantiation.
///
/// `Factory` is never instantiated; it is a namespace for associated
/// functions consulting the process-wide [`Registry`] it shares with
/// [`Registrar`](crate::Registrar). Constructors are invoked after the
/// registry lock has been released, so a constructor may itself construct
/// through the same factory.
pub struct Factory<A: ?Sized, Args = (), P: Ownership = Shared> {
	_instantiation: PhantomData<fn(Args) -> Pointer<P, A>>,
}

impl<A, Args, P> Factory<A, Args, P>
where
	A: ?Sized + 'static,
	Args: 'static,
	P: Ownership + 'static,
{
	/// Constructs a new instance for `key`, or `None` if the key is unknown.
	///
	/// A hit invokes the registered constructor with `args` and yields a
	/// fresh instance on every call. An unknown key is an expected outcome,
	/// not an error, and never panics.
	pub fn construct(key: &str, args: Args) -> Option<Pointer<P, A>> {
		let constructor = instance::<A, Args, P>().read().constructor(key)?;
		Some(constructor(args))
	}

	/// Constructs like [`construct`](Self::construct), reporting an unknown
	/// key as [`RegistryError::UnknownKey`] carrying the registered keys.
	pub fn try_construct(key: &str, args: Args) -> Result<Pointer<P, A>, RegistryError> {
		let registry = instance::<A, Args, P>().read();
		let constructor = match registry.constructor(key) {
			Some(constructor) => constructor,
			None => {
				return Err(RegistryError::UnknownKey {
					key: key.to_string(),
					available: registry.keys().map(str::to_owned).collect(),
				})
			}
		};
		drop(registry);
		Ok(constructor(args))
	}

	/// Returns `true` if `key` is registered for this instantiation.
	pub fn is_registered(key: &str) -> bool {
		instance::<A, Args, P>().read().contains_key(key)
	}

	/// Registered keys for this instantiation, in lexicographic order.
	pub fn registered_keys() -> Vec<String> {
		instance::<A, Args, P>()
			.read()
			.keys()
			.map(str::to_owned)
			.collect()
	}
}
