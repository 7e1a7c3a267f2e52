//! Registration handles binding keys to constructors at startup.
//!
//! A [`Registrar`] registers a constructor with the process-wide registry of
//! its instantiation the moment it is created; the handle itself only
//! reports what happened and may be dropped immediately. Registration is an
//! explicit startup step: create the registrars for everything the process
//! offers before construction begins, either ad hoc through
//! [`Registrar::new`] or from an [`Implementation`] describing a type's
//! canonical key and constructor.

use crate::factory::instance;
use crate::ownership::{Ownership, Pointer, Shared};
use crate::registry::Constructor;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A concrete type's canonical registration for one instantiation.
///
/// Implemented by concrete types that want a single well-known key instead
/// of ad hoc [`Registrar::new`] calls at every site.
pub trait Implementation<A, Args = (), P = Shared>
where
	A: ?Sized + 'static,
	Args: 'static,
	P: Ownership + 'static,
{
	/// Key this implementation registers under.
	const KEY: &'static str;

	/// Constructor producing instances of this implementation.
	fn constructor() -> Constructor<A, Args, P>;
}

/// Handle recording one registration with a process-wide registry.
///
/// Creating the registrar performs the registration; first-wins applies, so
/// a key already present keeps its original constructor and the handle
/// reports [`registered`](Self::registered) as `false`.
pub struct Registrar<A: ?Sized, Args = (), P: Ownership = Shared> {
	key: String,
	registered: bool,
	_instantiation: PhantomData<fn(Args) -> Pointer<P, A>>,
}

impl<A, Args, P> Registrar<A, Args, P>
where
	A: ?Sized + 'static,
	Args: 'static,
	P: Ownership + 'static,
{
	/// Registers `constructor` under `key` with the process-wide registry.
	pub fn new<F>(key: impl Into<String>, constructor: F) -> Self
	where
		F: Fn(Args) -> Pointer<P, A> + Send + Sync + 'static,
	{
		Self::with_constructor(key, Arc::new(constructor))
	}

	/// Registers an already-shared constructor under `key`.
	pub fn with_constructor(key: impl Into<String>, constructor: Constructor<A, Args, P>) -> Self {
		let key = key.into();
		let registered = instance::<A, Args, P>()
			.write()
			.register_constructor(key.clone(), constructor);
		if registered {
			tracing::debug!(key = %key, "Registered implementation");
		} else {
			tracing::debug!(key = %key, "Implementation already registered, keeping the first");
		}
		Self {
			key,
			registered,
			_instantiation: PhantomData,
		}
	}

	/// Registers `I` under its canonical key.
	pub fn of<I: Implementation<A, Args, P>>() -> Self {
		Self::with_constructor(I::KEY, I::constructor())
	}

	/// Key this registrar offered.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// `true` if this registrar's constructor was accepted, `false` if the
	/// key already had one.
	pub fn registered(&self) -> bool {
		self.registered
	}
}

impl<A: ?Sized, Args, P: Ownership> fmt::Debug for Registrar<A, Args, P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registrar")
			.field("key", &self.key)
			.field("registered", &self.registered)
			.finish()
	}
}
