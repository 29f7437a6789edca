//! Bidirectional cursors over the entries of the tree.
//!
//! Traversal works purely from node links: stepping forward either drops
//! into the leftmost node of the right subtree or climbs parent links until
//! an ancestor's key orders above the starting key. No stack is kept, so a
//! cursor is just a position plus a tree reference.

use crate::arena::NodeId;
use crate::{Comparator, GenericTree};

/// Cursor position: at a live node, or past the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pos {
	At(NodeId),
	End,
}

/// In-order successor of `id`, or `Pos::End` past the maximum.
fn successor_of<K, V, C: Comparator<K>>(tree: &GenericTree<K, V, C>, id: NodeId) -> Pos {
	if let Some(right) = tree.node(id).right {
		return Pos::At(tree.leftmost(right));
	}

	// No right subtree: climb while the ancestor's key orders below ours,
	// meaning we are ascending out of somebody's right subtree. The first
	// ancestor with a larger key is the successor.
	let key = &tree.node(id).key;
	let mut cursor = tree.node(id).parent;
	while let Some(up) = cursor {
		if tree.comparator.cmp(&tree.node(up).key, key) == std::cmp::Ordering::Less {
			cursor = tree.node(up).parent;
		} else {
			return Pos::At(up);
		}
	}
	Pos::End
}

/// In-order predecessor of `pos`; stepping back from the end lands on the
/// cached maximum.
fn predecessor_of<K, V, C: Comparator<K>>(tree: &GenericTree<K, V, C>, pos: Pos) -> Pos {
	let id = match pos {
		Pos::End => {
			return match tree.sentinel.max {
				Some(max) => Pos::At(max),
				None => Pos::End,
			};
		}
		Pos::At(id) => id,
	};

	if let Some(left) = tree.node(id).left {
		return Pos::At(tree.rightmost(left));
	}

	let key = &tree.node(id).key;
	let mut cursor = tree.node(id).parent;
	while let Some(up) = cursor {
		if tree.comparator.cmp(&tree.node(up).key, key) == std::cmp::Ordering::Greater {
			cursor = tree.node(up).parent;
		} else {
			return Pos::At(up);
		}
	}
	Pos::End
}

/// Position for the first entry at or above `key` (lower bound).
fn lower_bound_of<K, V, C: Comparator<K>>(tree: &GenericTree<K, V, C>, key: &K) -> Pos {
	let mut candidate = Pos::End;
	let mut cursor = tree.sentinel.root.get();
	while let Some(id) = cursor {
		match tree.comparator.cmp(key, &tree.node(id).key) {
			std::cmp::Ordering::Equal => return Pos::At(id),
			std::cmp::Ordering::Less => {
				candidate = Pos::At(id);
				cursor = tree.node(id).left;
			}
			std::cmp::Ordering::Greater => cursor = tree.node(id).right,
		}
	}
	candidate
}

// ---------------------------------------------------------------------------
// Read-Only Cursor
// ---------------------------------------------------------------------------

/// Read-only bidirectional cursor over the entries of the tree.
///
/// A cursor sits either at a live node or at the end position past the
/// maximum. [`next`](RawIter::next) yields the entry at the cursor and
/// advances; [`prev`](RawIter::prev) steps back first and yields, so
/// calling it on an end cursor yields the maximum entry.
///
/// Two cursors compare equal iff they reference the same node (or are both
/// at the end) of the same tree.
pub struct RawIter<'t, K, V, C> {
	tree: &'t GenericTree<K, V, C>,
	pub(crate) pos: Pos,
}

impl<'t, K, V, C> std::fmt::Debug for RawIter<'t, K, V, C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RawIter").field("pos", &self.pos).finish()
	}
}

impl<'t, K, V, C> Clone for RawIter<'t, K, V, C> {
	fn clone(&self) -> Self {
		RawIter { tree: self.tree, pos: self.pos }
	}
}

impl<'t, K, V, C> PartialEq for RawIter<'t, K, V, C> {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::eq(self.tree, other.tree) && self.pos == other.pos
	}
}

impl<'t, K, V, C: Comparator<K>> RawIter<'t, K, V, C> {
	pub(crate) fn new(tree: &'t GenericTree<K, V, C>) -> Self {
		RawIter { tree, pos: Pos::End }
	}

	pub(crate) fn at(tree: &'t GenericTree<K, V, C>, id: NodeId) -> Self {
		RawIter { tree, pos: Pos::At(id) }
	}

	/// Returns `true` if the cursor sits past the maximum entry.
	pub fn is_end(&self) -> bool {
		self.pos == Pos::End
	}

	/// Positions the cursor at the minimum entry (end position if empty).
	pub fn seek_to_first(&mut self) {
		self.pos = match self.tree.sentinel.min {
			Some(min) => Pos::At(min),
			None => Pos::End,
		};
	}

	/// Positions the cursor past the maximum entry, so that `prev` yields
	/// the maximum.
	pub fn seek_to_last(&mut self) {
		self.pos = Pos::End;
	}

	/// Positions the cursor at `key`, or at the smallest key above it if
	/// `key` is absent (end position if no such key exists).
	pub fn seek(&mut self, key: &K) {
		self.pos = lower_bound_of(self.tree, key);
	}

	/// Returns the entry at the cursor without moving it.
	pub fn peek(&self) -> Option<(&'t K, &'t V)> {
		match self.pos {
			Pos::At(id) => {
				let node = self.tree.node(id);
				Some((&node.key, &node.value))
			}
			Pos::End => None,
		}
	}

	/// Yields the entry at the cursor and advances to its successor.
	pub fn next(&mut self) -> Option<(&'t K, &'t V)> {
		match self.pos {
			Pos::At(id) => {
				self.pos = successor_of(self.tree, id);
				let node = self.tree.node(id);
				Some((&node.key, &node.value))
			}
			Pos::End => None,
		}
	}

	/// Steps back to the predecessor and yields it. On an end cursor this
	/// yields the maximum entry; at the minimum it yields `None` without
	/// moving.
	pub fn prev(&mut self) -> Option<(&'t K, &'t V)> {
		match predecessor_of(self.tree, self.pos) {
			Pos::At(id) => {
				self.pos = Pos::At(id);
				let node = self.tree.node(id);
				Some((&node.key, &node.value))
			}
			Pos::End => None,
		}
	}
}

// ---------------------------------------------------------------------------
// Value-Mutating Cursor
// ---------------------------------------------------------------------------

/// Bidirectional cursor that can mutate values during traversal.
///
/// Keys are never handed out mutably: rewriting a key in place could
/// reorder it relative to its neighbors and corrupt the search structure.
pub struct RawIterMut<'t, K, V, C> {
	tree: &'t mut GenericTree<K, V, C>,
	pub(crate) pos: Pos,
}

impl<'t, K, V, C: Comparator<K>> RawIterMut<'t, K, V, C> {
	pub(crate) fn new(tree: &'t mut GenericTree<K, V, C>) -> Self {
		RawIterMut { tree, pos: Pos::End }
	}

	/// Returns `true` if the cursor sits past the maximum entry.
	pub fn is_end(&self) -> bool {
		self.pos == Pos::End
	}

	/// Positions the cursor at the minimum entry (end position if empty).
	pub fn seek_to_first(&mut self) {
		self.pos = match self.tree.sentinel.min {
			Some(min) => Pos::At(min),
			None => Pos::End,
		};
	}

	/// Positions the cursor past the maximum entry, so that `prev` yields
	/// the maximum.
	pub fn seek_to_last(&mut self) {
		self.pos = Pos::End;
	}

	/// Positions the cursor at `key`, or at the smallest key above it if
	/// `key` is absent (end position if no such key exists).
	pub fn seek(&mut self, key: &K) {
		self.pos = lower_bound_of(&*self.tree, key);
	}

	/// Yields the entry at the cursor and advances to its successor.
	pub fn next(&mut self) -> Option<(&K, &mut V)> {
		match self.pos {
			Pos::At(id) => {
				self.pos = successor_of(&*self.tree, id);
				let node = self.tree.arena.get_mut(id);
				Some((&node.key, &mut node.value))
			}
			Pos::End => None,
		}
	}

	/// Steps back to the predecessor and yields it. On an end cursor this
	/// yields the maximum entry; at the minimum it yields `None` without
	/// moving.
	pub fn prev(&mut self) -> Option<(&K, &mut V)> {
		match predecessor_of(&*self.tree, self.pos) {
			Pos::At(id) => {
				self.pos = Pos::At(id);
				let node = self.tree.arena.get_mut(id);
				Some((&node.key, &mut node.value))
			}
			Pos::End => None,
		}
	}
}
