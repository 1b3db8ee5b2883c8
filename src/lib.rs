//! An ordered sequence that also indexes its values by a key derived from each value.
//!
//! A [`KeyedArray`] iterates and indexes like a [`Vec`](`alloc::vec::Vec`),
//! but also looks values up by key like a hash map, and never holds two values with the same key.
//! Keys aren't stored separately from values: They are always derived from them by a [`KeyExtractor`].
//!
//! ```
//! use keyed_array::KeyedArray;
//!
//! let mut array: KeyedArray<&str, _> = KeyedArray::with_extractor(|word: &&str| word.chars().next());
//! array.extend(["alpha", "beta"]);
//!
//! // Same key: replaces "alpha" and moves to the end.
//! assert_eq!(array.push("apple"), Some("alpha"));
//! assert_eq!(array.as_slice(), ["beta", "apple"]);
//! assert_eq!(array.get_by_key(&Some('a')), Some(&"apple"));
//! ```
//!
//! # Performance Focus
//!
//! Lookups by key or position are constant-time (amortised for keys).
//! Removals and insertions anywhere but the end take linear time, since positions after them shift.
#![no_std]
#![doc(html_root_url = "https://docs.rs/keyed_array/0.0.1")]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::semicolon_if_nothing_returned)]

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
mod readme {}

extern crate alloc;

mod extract;
mod iter;
mod keyed_array;
mod validation;

pub use crate::{
	extract::{ById, Identified, KeyExtractor},
	iter::{IntoIter, Iter},
	keyed_array::KeyedArray,
	validation::ValidationError,
};
