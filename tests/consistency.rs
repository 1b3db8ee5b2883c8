//! Drives random operation sequences against a plain [`Vec`] model.

use keyed_array::KeyedArray;
use proptest::prelude::*;

type Entry = (u8, u8);

fn key(entry: &Entry) -> u8 {
	entry.0
}

#[derive(Debug, Clone)]
enum Op {
	Push(Entry),
	Insert(usize, Entry),
	Remove(usize),
	RemoveByKey(u8),
	MutateByKey(u8, u8),
	MutateAt(usize, u8),
	ReplaceWithByKey(u8, u8),
}

fn entry() -> impl Strategy<Value = Entry> {
	(0..8_u8, any::<u8>())
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![
		entry().prop_map(Op::Push),
		(any::<usize>(), entry()).prop_map(|(index, entry)| Op::Insert(index, entry)),
		any::<usize>().prop_map(Op::Remove),
		(0..8_u8).prop_map(Op::RemoveByKey),
		(0..8_u8, any::<u8>()).prop_map(|(key, payload)| Op::MutateByKey(key, payload)),
		(any::<usize>(), any::<u8>()).prop_map(|(index, payload)| Op::MutateAt(index, payload)),
		(0..8_u8, any::<u8>()).prop_map(|(key, payload)| Op::ReplaceWithByKey(key, payload)),
	]
}

fn take_by_key(model: &mut Vec<Entry>, k: u8) -> Option<Entry> {
	let position = model.iter().position(|entry| entry.0 == k)?;
	Some(model.remove(position))
}

fn apply(array: &mut KeyedArray<Entry, fn(&Entry) -> u8>, model: &mut Vec<Entry>, op: Op) {
	match op {
		Op::Push(entry) => {
			let displaced = take_by_key(model, entry.0);
			model.push(entry);
			assert_eq!(array.push(entry), displaced);
		}
		Op::Insert(index, entry) => {
			let displaced = take_by_key(model, entry.0);
			let index = index % (model.len() + 1);
			model.insert(index, entry);
			assert_eq!(array.insert(index, entry), displaced);
		}
		Op::Remove(index) => {
			if !model.is_empty() {
				let index = index % model.len();
				assert_eq!(array.remove(index), model.remove(index));
			}
		}
		Op::RemoveByKey(k) => assert_eq!(array.remove_by_key(&k), take_by_key(model, k)),
		Op::MutateByKey(k, payload) => {
			let found = model.iter_mut().find(|entry| entry.0 == k).map(|entry| entry.1 = payload);
			assert_eq!(array.mutate_by_key(&k, |entry| entry.1 = payload), found.is_some());
		}
		Op::MutateAt(index, payload) => {
			if !model.is_empty() {
				let index = index % model.len();
				model[index].1 = payload;
				array.mutate_at(index, |entry| entry.1 = payload);
			}
		}
		Op::ReplaceWithByKey(k, payload) => {
			let previous = model.iter_mut().find(|entry| entry.0 == k).map(|entry| {
				let previous = *entry;
				entry.1 = payload;
				previous
			});
			assert_eq!(array.replace_with_by_key(&k, |&(k, _)| (k, payload)), previous);
		}
	}
}

proptest! {
	#[test]
	fn views_stay_consistent(ops in prop::collection::vec(op(), 0..64)) {
		let mut array = KeyedArray::with_extractor(key as fn(&Entry) -> u8);
		let mut model = Vec::new();

		for op in ops {
			apply(&mut array, &mut model, op);

			prop_assert_eq!(array.validate(), Ok(()));
			prop_assert_eq!(array.as_slice(), model.as_slice());
			prop_assert_eq!(array.len(), model.len());
			for k in 0..8 {
				prop_assert_eq!(array.get_by_key(&k), model.iter().find(|entry| entry.0 == k));
				prop_assert_eq!(array.position_of(&k), model.iter().position(|entry| entry.0 == k));
			}
		}
	}

	#[test]
	fn equality_only_sees_the_sequence(entries in prop::collection::vec(entry(), 0..32)) {
		let narrow = KeyedArray::from_iter_with_extractor(entries.iter().copied(), key);
		let wide = KeyedArray::from_iter_with_extractor(narrow.iter().copied(), |entry: &Entry| u16::from(entry.0) * 1000);

		prop_assert!(narrow == wide);
		prop_assert!(narrow.len() <= 8);
	}
}
