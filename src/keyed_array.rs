use alloc::vec::Vec;
use core::{
	borrow::Borrow,
	fmt::{self, Debug, Formatter},
	hash::Hash,
	mem,
	ops::Index,
};
use hashbrown::HashMap;
use scopeguard::ScopeGuard;
use tap::{Pipe, Tap, TapOptional};

use crate::{
	extract::{ById, Identified, KeyExtractor},
	iter::{IntoIter, Iter},
	validation::ValidationError,
};

/// An ordered sequence of values that is also indexed by a key derived from each value.
///
/// No two values in a [`KeyedArray`] ever share a key.
/// Adding a value whose key is already present replaces the earlier value (see [`.push(…)`](`KeyedArray::push`)).
///
/// Keys are never supplied separately: They're computed by the [`KeyExtractor`] `X`, which is fixed at construction.
/// The default, [`ById`], reads [`Identified::id`].
///
/// # Concurrency
///
/// [`KeyedArray`] is a plain owned value without interior mutability.
/// Share it across threads the way you would share a [`Vec`], i.e. behind your own lock if it's mutated.
///
/// Callbacks passed to the `mutate…` and `replace_with…` methods can't reach the instance they are called on,
/// since it's exclusively borrowed for the duration of the call.
pub struct KeyedArray<V, X: KeyExtractor<V> = ById> {
	values: Vec<V>,
	/// Each value's key, mapped to that value's index in `values`.
	positions: HashMap<X::Key, usize>,
	extractor: X,
}

impl<V: Identified> KeyedArray<V> {
	/// Creates a new empty [`KeyedArray`] that keys its values by [`Identified::id`].
	#[must_use]
	pub fn new() -> Self {
		Self::with_extractor(ById)
	}
}

/// # Generics Glossary
///
/// - `V`: (Stored) **V**alue.
/// - `X`: E**x**tractor, projects `(&V) -> X::Key`.
/// - `Q: ?Sized`: **Q**uery, borrowed from `X::Key` to look values up.
///
/// # Panics
///
/// Methods that take a position panic if it's out of bounds, much like [`Vec`]'s do.
///
/// Methods that mutate a value in place panic if that would change the value's key.
/// This is considered a bug in the calling code and isn't meant to be recovered from.
impl<V, X: KeyExtractor<V>> KeyedArray<V, X> {
	/// Creates a new empty [`KeyedArray`] that keys its values with `extractor`.
	#[must_use]
	pub fn with_extractor(extractor: X) -> Self {
		Self {
			values: Vec::new(),
			positions: HashMap::new(),
			extractor,
		}
	}

	/// Creates a new [`KeyedArray`] that keys its values with `extractor`,
	/// then [pushes](`KeyedArray::push`) each value from `values` in turn.
	///
	/// Later duplicates win and end up in their own position.
	#[must_use]
	pub fn from_iter_with_extractor(values: impl IntoIterator<Item = V>, extractor: X) -> Self {
		Self::with_extractor(extractor).tap_mut(|this| this.extend(values))
	}

	/// The number of stored values.
	#[must_use]
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Whether no values are stored.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Retrieves the value at `index`.
	///
	/// # Panics
	///
	/// Iff `index` is out of bounds.
	#[must_use]
	#[track_caller]
	pub fn at(&self, index: usize) -> &V {
		let len = self.len();
		assert!(index < len, "index (is {index}) should be < len (is {len})");
		&self.values[index]
	}

	/// Retrieves the value at `index`, iff available.
	#[must_use]
	pub fn get(&self, index: usize) -> Option<&V> {
		self.values.get(index)
	}

	/// Retrieves the value associated with `key`, iff available.
	#[must_use]
	pub fn get_by_key<Q>(&self, key: &Q) -> Option<&V>
	where
		X::Key: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		self.positions
			.get(key)
			.map(|&position| &self.values[position])
	}

	/// Retrieves the current position of the value associated with `key`, iff available.
	#[must_use]
	pub fn position_of<Q>(&self, key: &Q) -> Option<usize>
	where
		X::Key: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		self.positions.get(key).copied()
	}

	/// Checks whether a value is associated with `key`.
	#[must_use]
	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		X::Key: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		self.positions.contains_key(key)
	}

	/// Views the values in sequence order.
	#[must_use]
	pub fn as_slice(&self) -> &[V] {
		&self.values
	}

	/// Iterates over the values in sequence order.
	pub fn iter(&self) -> Iter<'_, V> {
		Iter::new(&self.values)
	}

	/// Iterates over the values in sequence order, each paired with its key.
	pub fn iter_keyed(&self) -> impl '_ + Iterator<Item = (&X::Key, &V)> {
		self.values.iter().filter_map(|value| {
			self.positions
				.get_key_value(&self.extractor.extract(value))
				.map(|(key, _)| (key, value))
		})
	}

	/// Appends `value` to the end of the sequence.
	///
	/// If another value with the same key is present, it's removed first and returned.
	/// This means the key moves to the end, rather than keeping its old position.
	pub fn push(&mut self, value: V) -> Option<V> {
		let key = self.extractor.extract(&value);
		let displaced = self
			.remove_by_key(&key)
			.tap_some(|_| log::trace!("push displaced a value with the same key"));

		self.positions.insert(key, self.values.len());
		self.values.push(value);
		displaced
	}

	/// Inserts `value` at `index`, shifting all values after it towards the end.
	///
	/// If another value with the same key is present, it's removed first and returned.
	/// `index` applies to the sequence **after** that removal.
	///
	/// # Panics
	///
	/// Iff `index` is greater than the length after removing a duplicate.
	/// Nothing is removed in that case.
	#[track_caller]
	pub fn insert(&mut self, index: usize, value: V) -> Option<V> {
		let key = self.extractor.extract(&value);
		let len = self.values.len() - usize::from(self.positions.contains_key(&key));
		assert!(
			index <= len,
			"insertion index (is {index}) should be <= len (is {len})"
		);

		let displaced = self
			.remove_by_key(&key)
			.tap_some(|_| log::trace!("insert displaced a value with the same key"));

		self.open_gap(index);
		self.values.insert(index, value);
		self.positions.insert(key, index);
		displaced
	}

	/// Removes and returns the value at `index`, shifting all values after it towards the front.
	///
	/// # Panics
	///
	/// Iff `index` is out of bounds.
	#[track_caller]
	pub fn remove(&mut self, index: usize) -> V {
		let len = self.len();
		assert!(index < len, "removal index (is {index}) should be < len (is {len})");

		let key = self.extractor.extract(&self.values[index]);
		self.positions.remove(&key);
		self.detach(index)
	}

	/// Removes and returns the value associated with `key`, iff available.
	pub fn remove_by_key<Q>(&mut self, key: &Q) -> Option<V>
	where
		X::Key: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		let position = self.positions.remove(key)?;
		self.detach(position).pipe(Some)
	}

	/// Removes all values.
	pub fn clear(&mut self) {
		self.values.clear();
		self.positions.clear();
	}

	/// Mutates the value associated with `key` in place, iff available.
	///
	/// Returns whether a value was found.
	///
	/// # Panics
	///
	/// Iff `mutate` changes the value's key.
	///
	/// The value is removed from the [`KeyedArray`] before the panic starts,
	/// so that its remaining values stay consistently indexed.
	/// The same happens if `mutate` panics after changing the key.
	///
	/// Use [`.replace_with_by_key(…)`](`KeyedArray::replace_with_by_key`) to leave the instance untouched on failure instead.
	#[track_caller]
	pub fn mutate_by_key<Q>(&mut self, key: &Q, mutate: impl FnOnce(&mut V)) -> bool
	where
		X::Key: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		let Some(&position) = self.positions.get(key) else {
			return false;
		};
		self.mutate_keyed(position, key, mutate);
		true
	}

	/// Mutates the value at `index` in place.
	///
	/// # Panics
	///
	/// Iff `index` is out of bounds or `mutate` changes the value's key.
	///
	/// In the latter case, the value is removed from the [`KeyedArray`] before the panic starts,
	/// so that its remaining values stay consistently indexed.
	/// The same happens if `mutate` panics after changing the key.
	#[track_caller]
	pub fn mutate_at(&mut self, index: usize, mutate: impl FnOnce(&mut V)) {
		let len = self.len();
		assert!(index < len, "mutation index (is {index}) should be < len (is {len})");

		let key = self.extractor.extract(&self.values[index]);
		self.mutate_keyed(index, &key, mutate);
	}

	/// Replaces the value associated with `key` with one derived from it, iff available.
	///
	/// Returns the previous value.
	///
	/// # Panics
	///
	/// Iff the replacement has a different key.
	/// The [`KeyedArray`] is left unchanged in that case.
	#[track_caller]
	pub fn replace_with_by_key<Q>(&mut self, key: &Q, replace: impl FnOnce(&V) -> V) -> Option<V>
	where
		X::Key: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		let &position = self.positions.get(key)?;
		self.replace_keyed(position, key, replace).pipe(Some)
	}

	/// Replaces the value at `index` with one derived from it.
	///
	/// Returns the previous value.
	///
	/// # Panics
	///
	/// Iff `index` is out of bounds or the replacement has a different key.
	/// The [`KeyedArray`] is left unchanged in either case.
	#[track_caller]
	pub fn replace_with_at(&mut self, index: usize, replace: impl FnOnce(&V) -> V) -> V {
		let len = self.len();
		assert!(index < len, "replacement index (is {index}) should be < len (is {len})");

		let key = self.extractor.extract(&self.values[index]);
		self.replace_keyed(index, &key, replace)
	}

	/// Checks that the sequence and the key index agree.
	///
	/// This always succeeds unless the extractor is nondeterministic (or there's a bug in this crate).
	///
	/// # Errors
	///
	/// Iff a value isn't indexed at its current position or the index holds stale keys.
	#[doc(hidden)]
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.positions.len() != self.values.len() {
			return Err(ValidationError::LengthMismatch {
				keys: self.positions.len(),
				values: self.values.len(),
			});
		}

		for (position, value) in self.values.iter().enumerate() {
			let indexed = *self
				.positions
				.get(&self.extractor.extract(value))
				.ok_or(ValidationError::MissingKey { position })?;
			if indexed != position {
				return Err(ValidationError::Misplaced { position, indexed });
			}
		}
		Ok(())
	}

	#[track_caller]
	fn mutate_keyed<Q>(&mut self, position: usize, key: &Q, mutate: impl FnOnce(&mut V))
	where
		X::Key: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		// Only reached on unwind.
		let mut guard = scopeguard::guard(&mut *self, move |this| {
			this.settle(position, key);
		});
		mutate(&mut guard.values[position]);
		let this = ScopeGuard::into_inner(guard);

		if !this.settle(position, key) {
			panic!("in-place mutation changed the key of the value at position {position}");
		}
	}

	#[track_caller]
	fn replace_keyed<Q>(&mut self, position: usize, key: &Q, replace: impl FnOnce(&V) -> V) -> V
	where
		X::Key: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		let replacement = replace(&self.values[position]);
		assert!(
			Borrow::<Q>::borrow(&self.extractor.extract(&replacement)) == key,
			"replacement changed the key of the value at position {position}"
		);
		mem::replace(&mut self.values[position], replacement)
	}

	/// Returns whether the value at `position` still has `key`.
	///
	/// If it doesn't, it's removed along with `key`.
	fn settle<Q>(&mut self, position: usize, key: &Q) -> bool
	where
		X::Key: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		if Borrow::<Q>::borrow(&self.extractor.extract(&self.values[position])) == key {
			return true;
		}

		log::error!("evicting the value at position {position}, since its key changed in place");
		self.positions.remove(key);
		drop(self.detach(position));
		false
	}

	/// Removes the value at `position` from the sequence and re-points the keys after it.
	///
	/// Its key must already be gone from `positions`.
	fn detach(&mut self, position: usize) -> V {
		let value = self.values.remove(position);
		if position < self.values.len() {
			self.positions
				.values_mut()
				.filter(|p| **p > position)
				.for_each(|p| *p -= 1);
		}
		value
	}

	/// Re-points the keys at or after `position` one further, ahead of an insertion there.
	fn open_gap(&mut self, position: usize) {
		if position < self.values.len() {
			self.positions
				.values_mut()
				.filter(|p| **p >= position)
				.for_each(|p| *p += 1);
		}
	}
}

impl<V, X: KeyExtractor<V> + Default> Default for KeyedArray<V, X> {
	fn default() -> Self {
		Self::with_extractor(X::default())
	}
}

impl<V: Clone, X: KeyExtractor<V> + Clone> Clone for KeyedArray<V, X>
where
	X::Key: Clone,
{
	fn clone(&self) -> Self {
		Self {
			values: self.values.clone(),
			positions: self.positions.clone(),
			extractor: self.extractor.clone(),
		}
	}
}

impl<V: Debug, X: KeyExtractor<V>> Debug for KeyedArray<V, X> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(&self.values).finish()
	}
}

/// Only the sequences are compared, so instances with different extractors can be equal.
impl<V: PartialEq, X: KeyExtractor<V>, Y: KeyExtractor<V>> PartialEq<KeyedArray<V, Y>>
	for KeyedArray<V, X>
{
	fn eq(&self, other: &KeyedArray<V, Y>) -> bool {
		self.values == other.values
	}
}

impl<V: Eq, X: KeyExtractor<V>> Eq for KeyedArray<V, X> {}

impl<V, X: KeyExtractor<V>> Index<usize> for KeyedArray<V, X> {
	type Output = V;

	#[track_caller]
	fn index(&self, index: usize) -> &V {
		self.at(index)
	}
}

impl<V, X: KeyExtractor<V>> AsRef<[V]> for KeyedArray<V, X> {
	fn as_ref(&self) -> &[V] {
		self.as_slice()
	}
}

impl<'a, V, X: KeyExtractor<V>> IntoIterator for &'a KeyedArray<V, X> {
	type Item = &'a V;
	type IntoIter = Iter<'a, V>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<V, X: KeyExtractor<V>> IntoIterator for KeyedArray<V, X> {
	type Item = V;
	type IntoIter = IntoIter<V>;

	fn into_iter(self) -> Self::IntoIter {
		IntoIter::new(self.values)
	}
}

/// [Pushes](`KeyedArray::push`) each value in turn.
impl<V, X: KeyExtractor<V>> Extend<V> for KeyedArray<V, X> {
	fn extend<I: IntoIterator<Item = V>>(&mut self, values: I) {
		for value in values {
			self.push(value);
		}
	}
}

impl<V, X: KeyExtractor<V> + Default> FromIterator<V> for KeyedArray<V, X> {
	fn from_iter<I: IntoIterator<Item = V>>(values: I) -> Self {
		Self::from_iter_with_extractor(values, X::default())
	}
}

impl<V, X: KeyExtractor<V> + Default, const N: usize> From<[V; N]> for KeyedArray<V, X> {
	fn from(values: [V; N]) -> Self {
		values.into_iter().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloc::vec;

	fn by_tens(value: &u32) -> u32 {
		value / 10
	}

	#[test]
	fn positions_follow_insertion() {
		let mut array = KeyedArray::from_iter_with_extractor([10_u32, 20, 30], by_tens);
		assert_eq!(array.insert(1, 40), None);

		assert_eq!(array.as_slice(), [10, 40, 20, 30]);
		assert_eq!(array.position_of(&1), Some(0));
		assert_eq!(array.position_of(&4), Some(1));
		assert_eq!(array.position_of(&2), Some(2));
		assert_eq!(array.position_of(&3), Some(3));
		assert_eq!(array.validate(), Ok(()));
	}

	#[test]
	fn positions_follow_removal() {
		let mut array = KeyedArray::from_iter_with_extractor([10_u32, 20, 30, 40], by_tens);
		assert_eq!(array.remove(1), 20);

		assert_eq!(array.as_slice(), [10, 30, 40]);
		assert_eq!(array.position_of(&3), Some(1));
		assert_eq!(array.position_of(&4), Some(2));
		assert_eq!(array.validate(), Ok(()));
	}

	#[test]
	fn settle_evicts_changed_values() {
		let mut array = KeyedArray::from_iter_with_extractor([10_u32, 20, 30], by_tens);
		array.values[1] = 55;

		assert!(!array.settle(1, &2));
		assert_eq!(array.values, vec![10, 30]);
		assert_eq!(array.validate(), Ok(()));
		assert!(array.settle(1, &3));
	}
}
