//! Consistency checks between the ordered and keyed views.

/// A broken link between the sequence and the key index of a [`KeyedArray`](`crate::KeyedArray`).
///
/// Returned by [`KeyedArray::validate`](`crate::KeyedArray::validate`).
/// Seeing this means either a bug in this crate or a [`KeyExtractor`](`crate::KeyExtractor`) that isn't deterministic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	/// The index and the sequence differ in size.
	#[error("the index holds {keys} keys for {values} values")]
	LengthMismatch {
		/// The number of keys in the index.
		keys: usize,
		/// The number of values in the sequence.
		values: usize,
	},
	/// A value's key isn't in the index at all.
	#[error("the value at position {position} has no entry in the index")]
	MissingKey {
		/// The value's position in the sequence.
		position: usize,
	},
	/// A value's key points somewhere else.
	///
	/// This is also how two values sharing a key show up.
	#[error("the value at position {position} is indexed at position {indexed}")]
	Misplaced {
		/// The value's position in the sequence.
		position: usize,
		/// The position the index has on record for the value's key.
		indexed: usize,
	},
}
