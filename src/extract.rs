//! Key derivation for [`KeyedArray`](`crate::KeyedArray`).
//!
//! A [`KeyedArray`](`crate::KeyedArray`) never stores keys that were handed to it separately.
//! Each key is computed from its value by a [`KeyExtractor`] fixed at construction.
//!
//! # Determinism
//!
//! Extractors must be pure: Equal values must always produce equal keys for the lifetime of the container.
//! This isn't checked, but breaking it can leave the container unable to find or remove some of its values.

use core::hash::Hash;

/// Derives a key from a value of type `V`.
///
/// This is implemented for all `Fn(&V) -> K` closures and functions where `K: Hash + Eq`,
/// as well as for [`ById`] over [`Identified`] values.
pub trait KeyExtractor<V: ?Sized> {
	/// The type of derived keys.
	type Key: Hash + Eq;

	/// Computes the key of `value`.
	fn extract(&self, value: &V) -> Self::Key;
}

impl<V: ?Sized, K, F> KeyExtractor<V> for F
where
	F: Fn(&V) -> K,
	K: Hash + Eq,
{
	type Key = K;

	fn extract(&self, value: &V) -> K {
		self(value)
	}
}

/// A value with an intrinsic identity that can serve as its key.
///
/// ```
/// use keyed_array::{Identified, KeyedArray};
///
/// #[derive(Debug, PartialEq)]
/// struct User {
/// 	id: u32,
/// 	name: &'static str,
/// }
///
/// impl Identified for User {
/// 	type Id = u32;
///
/// 	fn id(&self) -> u32 {
/// 		self.id
/// 	}
/// }
///
/// let users: KeyedArray<User> = [User { id: 1, name: "Ada" }, User { id: 2, name: "Grace" }].into();
/// assert_eq!(users.get_by_key(&2).map(|user| user.name), Some("Grace"));
/// ```
pub trait Identified {
	/// The identity type.
	type Id: Hash + Eq;

	/// Returns this value's identity.
	fn id(&self) -> Self::Id;
}

/// The default [`KeyExtractor`], which reads [`Identified::id`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ById;

impl<V: ?Sized + Identified> KeyExtractor<V> for ById {
	type Key = V::Id;

	fn extract(&self, value: &V) -> V::Id {
		value.id()
	}
}
