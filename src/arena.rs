//! Generational slot arena backing the tree's node storage.
//!
//! Nodes are kept in a growable vector of slots and addressed by [`NodeId`]
//! handles instead of pointers. A handle carries the slot index together
//! with the slot's generation at allocation time; freeing a slot bumps the
//! generation, so a handle that outlives its node is detectably stale.
//! Accessing a stale or vacant handle is a contract violation and panics
//! immediately rather than reading whatever now occupies the slot.
//!
//! Freed slots are recycled through a free list, so long-running
//! insert/remove churn does not grow the backing vector. A recycled slot
//! always holds a freshly constructed node under a new generation; the old
//! node is never resurrected.
//!
//! Growth goes through [`Vec::try_reserve`] so that allocation failure is
//! reported to the caller instead of aborting the process.

use crate::error::Result;

/// Handle to a node stored in an [`Arena`].
///
/// Handles are small `Copy` values and are only meaningful for the arena
/// that issued them. Equality is slot identity: two handles compare equal
/// iff they name the same slot at the same generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
	index: u32,
	generation: u32,
}

impl NodeId {
	/// Slot index within the arena, for diagnostics.
	pub fn index(self) -> usize {
		self.index as usize
	}
}

struct Slot<T> {
	generation: u32,
	entry: Option<T>,
}

pub(crate) struct Arena<T> {
	slots: Vec<Slot<T>>,
	free: Vec<u32>,
	live: usize,
}

impl<T> Arena<T> {
	pub(crate) fn new() -> Self {
		Arena { slots: Vec::new(), free: Vec::new(), live: 0 }
	}

	/// Number of live entries.
	pub(crate) fn live(&self) -> usize {
		self.live
	}

	/// Total number of slots, live or vacant.
	pub(crate) fn capacity(&self) -> usize {
		self.slots.len()
	}

	/// Stores `value` in a recycled or freshly reserved slot.
	///
	/// Fails only if the slot vector cannot grow; in that case the arena is
	/// unchanged.
	pub(crate) fn try_alloc(&mut self, value: T) -> Result<NodeId> {
		let id = match self.free.pop() {
			Some(index) => {
				let slot = &mut self.slots[index as usize];
				debug_assert!(slot.entry.is_none(), "free list pointed at an occupied slot");
				slot.entry = Some(value);
				NodeId { index, generation: slot.generation }
			}
			None => {
				self.slots.try_reserve(1)?;
				let index = self.slots.len() as u32;
				self.slots.push(Slot { generation: 0, entry: Some(value) });
				NodeId { index, generation: 0 }
			}
		};
		self.live += 1;
		Ok(id)
	}

	/// Removes and returns the entry behind `id`, retiring the handle.
	///
	/// The slot's generation is bumped so that any surviving copy of `id`
	/// is stale from this point on.
	///
	/// # Panics
	///
	/// Panics if `id` is stale or vacant.
	pub(crate) fn free(&mut self, id: NodeId) -> T {
		let slot = &mut self.slots[id.index()];
		if slot.generation != id.generation {
			panic!(
				"freed a stale node handle (slot {}, generation {} vs {})",
				id.index, id.generation, slot.generation
			);
		}
		let entry = match slot.entry.take() {
			Some(entry) => entry,
			None => panic!("freed a vacant node slot {}", id.index),
		};
		slot.generation = slot.generation.wrapping_add(1);
		self.free.push(id.index);
		self.live -= 1;
		entry
	}

	/// # Panics
	///
	/// Panics if `id` is stale or vacant.
	pub(crate) fn get(&self, id: NodeId) -> &T {
		let slot = &self.slots[id.index()];
		if slot.generation != id.generation {
			panic!(
				"dereferenced a stale node handle (slot {}, generation {} vs {})",
				id.index, id.generation, slot.generation
			);
		}
		match slot.entry.as_ref() {
			Some(entry) => entry,
			None => panic!("dereferenced a vacant node slot {}", id.index),
		}
	}

	/// # Panics
	///
	/// Panics if `id` is stale or vacant.
	pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
		let slot = &mut self.slots[id.index()];
		if slot.generation != id.generation {
			panic!(
				"dereferenced a stale node handle (slot {}, generation {} vs {})",
				id.index, id.generation, slot.generation
			);
		}
		match slot.entry.as_mut() {
			Some(entry) => entry,
			None => panic!("dereferenced a vacant node slot {}", id.index),
		}
	}

	/// Drops every entry while keeping the slots, so handles issued before
	/// the clear stay detectably stale instead of aliasing new nodes.
	pub(crate) fn clear(&mut self) {
		self.free.clear();
		for (index, slot) in self.slots.iter_mut().enumerate() {
			if slot.entry.take().is_some() {
				slot.generation = slot.generation.wrapping_add(1);
			}
			self.free.push(index as u32);
		}
		self.live = 0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn alloc_free_cycle_reuses_slots() {
		let mut arena: Arena<i32> = Arena::new();

		let a = arena.try_alloc(1).unwrap();
		let b = arena.try_alloc(2).unwrap();
		assert_eq!(arena.live(), 2);
		assert_eq!(*arena.get(a), 1);
		assert_eq!(*arena.get(b), 2);

		assert_eq!(arena.free(a), 1);
		assert_eq!(arena.live(), 1);

		// The freed slot comes back under a new generation
		let c = arena.try_alloc(3).unwrap();
		assert_eq!(c.index(), a.index());
		assert_ne!(c, a);
		assert_eq!(arena.capacity(), 2);
	}

	#[test]
	#[should_panic(expected = "stale node handle")]
	fn stale_handle_get_panics() {
		let mut arena: Arena<i32> = Arena::new();
		let a = arena.try_alloc(1).unwrap();
		arena.free(a);
		let _b = arena.try_alloc(2).unwrap();
		arena.get(a);
	}

	#[test]
	#[should_panic(expected = "vacant node slot")]
	fn vacant_slot_get_panics() {
		let mut arena: Arena<i32> = Arena::new();
		let a = arena.try_alloc(1).unwrap();
		let b = NodeId { index: a.index, generation: a.generation.wrapping_add(1) };
		arena.free(a);
		arena.get(b);
	}

	#[test]
	fn clear_retires_all_handles() {
		let mut arena: Arena<i32> = Arena::new();
		let a = arena.try_alloc(1).unwrap();
		let _b = arena.try_alloc(2).unwrap();

		arena.clear();
		assert_eq!(arena.live(), 0);
		assert_eq!(arena.capacity(), 2);

		// Slots are recycled, but the pre-clear handle stays stale
		let c = arena.try_alloc(3).unwrap();
		assert_ne!(c, a);
		assert_eq!(*arena.get(c), 3);
	}

	#[test]
	fn mutation_through_handle() {
		let mut arena: Arena<String> = Arena::new();
		let a = arena.try_alloc("one".to_string()).unwrap();
		arena.get_mut(a).push_str(" two");
		assert_eq!(arena.get(a), "one two");
	}
}
