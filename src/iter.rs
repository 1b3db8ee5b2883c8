//! Iterators over the values of a [`KeyedArray`](`crate::KeyedArray`), in sequence order.
//!
//! Both borrow or own the sequence outright, so a [`KeyedArray`](`crate::KeyedArray`)
//! can't be mutated while one of its borrowing iterators is alive.

use alloc::vec;
use core::{iter::FusedIterator, slice};

/// A borrowing iterator over the values of a [`KeyedArray`](`crate::KeyedArray`).
///
/// Created by [`KeyedArray::iter`](`crate::KeyedArray::iter`).
/// Calling [`.iter()`](`crate::KeyedArray::iter`) again restarts from the front.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
	iter: slice::Iter<'a, V>,
}

impl<'a, V> Iter<'a, V> {
	pub(crate) fn new(values: &'a [V]) -> Self {
		Self {
			iter: values.iter(),
		}
	}

	/// Views the values not yet yielded.
	#[must_use]
	pub fn as_slice(&self) -> &'a [V] {
		self.iter.as_slice()
	}
}

impl<'a, V> Iterator for Iter<'a, V> {
	type Item = &'a V;

	fn next(&mut self) -> Option<Self::Item> {
		self.iter.next()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.iter.size_hint()
	}

	fn nth(&mut self, n: usize) -> Option<Self::Item> {
		self.iter.nth(n)
	}
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
	fn next_back(&mut self) -> Option<Self::Item> {
		self.iter.next_back()
	}
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// An owning iterator over the values of a [`KeyedArray`](`crate::KeyedArray`).
///
/// Created by [`KeyedArray`](`crate::KeyedArray`)'s [`IntoIterator`] implementation.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Debug, Clone)]
pub struct IntoIter<V> {
	iter: vec::IntoIter<V>,
}

impl<V> IntoIter<V> {
	pub(crate) fn new(values: vec::Vec<V>) -> Self {
		Self {
			iter: values.into_iter(),
		}
	}
}

impl<V> Iterator for IntoIter<V> {
	type Item = V;

	fn next(&mut self) -> Option<Self::Item> {
		self.iter.next()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.iter.size_hint()
	}
}

impl<V> DoubleEndedIterator for IntoIter<V> {
	fn next_back(&mut self) -> Option<Self::Item> {
		self.iter.next_back()
	}
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}
