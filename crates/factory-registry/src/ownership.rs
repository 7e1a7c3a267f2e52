//! Ownership policies for constructed instances.
//!
//! A policy decides how the lifetime of an object produced by a constructor
//! is managed: shared reference counting, exclusive ownership, or a raw
//! pointer the caller releases. The policy is an explicit type parameter of
//! [`Registry`](crate::Registry), [`Factory`](crate::Factory) and
//! [`Registrar`](crate::Registrar), resolved at compile time per
//! instantiation; [`Shared`] is the default wherever the parameter is
//! omitted.

use std::sync::Arc;

/// Maps an abstract type to the pointer type handed out for it.
///
/// Implemented by the marker types in this module. The trait is open:
/// downstream code can supply additional policies (for example an
/// `Rc`-based one for strictly single-threaded use) by implementing it on
/// its own marker type.
pub trait Ownership {
	/// Pointer type carrying a constructed instance of `T`.
	type Ptr<T: ?Sized>;
}

/// Shared ownership: constructed instances are returned as `Arc<T>`.
///
/// This is the default policy.
pub struct Shared;

impl Ownership for Shared {
	type Ptr<T: ?Sized> = Arc<T>;
}

/// Exclusive ownership: constructed instances are returned as `Box<T>`.
pub struct Unique;

impl Ownership for Unique {
	type Ptr<T: ?Sized> = Box<T>;
}

/// No ownership management: constructed instances are returned as `*mut T`.
///
/// Constructors conventionally produce these with [`Box::into_raw`]. The
/// registry never dereferences or releases the pointer; the caller assumes
/// responsibility for both.
pub struct Raw;

impl Ownership for Raw {
	type Ptr<T: ?Sized> = *mut T;
}

/// Pointer produced for abstract type `A` under ownership policy `P`.
pub type Pointer<P, A> = <P as Ownership>::Ptr<A>;
