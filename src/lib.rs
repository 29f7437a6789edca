//! # Larch: A Sentinel-Anchored In-Memory Binary Search Tree
//!
//! This crate provides an ordered key-value store implemented as an
//! unbalanced binary search tree, the structure that classically underlies
//! an associative map container. It supports insertion, point lookup,
//! deletion, O(1) whole-tree swap, and bidirectional in-order traversal via
//! cursors that walk only parent/child links: no auxiliary stack, no
//! balance metadata.
//!
//! ## Design Overview
//!
//! ### Sentinel
//!
//! The tree is anchored by a **sentinel**: a permanent header that owns the
//! root link and caches the aggregate metadata every operation needs.
//! Traditional pointer implementations fold all of this into one
//! self-referential dummy node whose links double as "null" markers and as
//! the min/max cache. Here the roles are split into explicit fields:
//!
//! ```text
//!            ┌───────────────────────────────┐
//!            │            Sentinel           │
//!            │  root: Link ──────────┐       │
//!            │  min:  Option<NodeId> │       │  <- cached extremes
//!            │  max:  Option<NodeId> │       │
//!            │  len:  usize          │       │  <- live entry count
//!            └───────────────────────│───────┘
//!                                    ▼
//!                              ┌──────────┐
//!                              │   Node   │  <- key, value
//!                              │ parent ─ │     plus three navigation links
//!                              │ left  ┌──┤
//!                              │ right │  │
//!                              └───┬───┴──┘
//!                                  ▼      ...
//! ```
//!
//! ### Arena Storage
//!
//! Nodes live in a generational slot arena ([`arena::Arena`]) and refer to
//! each other by [`arena::NodeId`] handles instead of pointers. Absent
//! children and the absent root are plain `None` / `Link::Empty`, so there
//! is no dangling-pointer state to defend against. A removed node's slot is
//! recycled under a fresh generation, which makes any surviving handle to
//! it detectably stale: using one panics instead of silently reading a
//! different entry.
//!
//! ### Ordering
//!
//! Key order is defined by a [`Comparator`] supplied as a type parameter.
//! The default, [`NaturalOrder`], uses the key's `Ord` impl; the [`Tree`]
//! alias picks it for you. Cursor traversal uses the same comparator to
//! decide when an upward climb has passed its starting key.
//!
//! ## Basic Usage
//!
//! ```
//! use larch::Tree;
//!
//! let mut tree: Tree<i32, &str> = Tree::new();
//!
//! tree.insert(2, "two").unwrap();
//! tree.insert(1, "one").unwrap();
//! tree.insert(3, "three").unwrap();
//!
//! assert_eq!(tree.get(&2), Some(&"two"));
//! assert_eq!(tree.len(), 3);
//!
//! // In-order traversal yields sorted keys
//! let mut iter = tree.iter();
//! assert_eq!(iter.next(), Some((&1, &"one")));
//! assert_eq!(iter.next(), Some((&2, &"two")));
//! assert_eq!(iter.next(), Some((&3, &"three")));
//! assert_eq!(iter.next(), None);
//!
//! tree.remove(&2);
//! assert_eq!(tree.get(&2), None);
//! ```
//!
//! ## Limits
//!
//! The tree does not rebalance: lookup, insert, and remove are O(depth),
//! which degenerates to O(n) for sorted insertion orders. Everything is
//! single-threaded and synchronous; callers needing shared access must
//! serialize externally.

use std::cmp::Ordering;
use std::fmt;
use std::mem;

pub mod arena;
pub mod error;
pub mod iter;

use arena::{Arena, NodeId};
use error::Result;
use iter::{RawIter, RawIterMut};

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Defines the total order the tree maintains over its keys.
///
/// Implementations must be consistent: for any `a`, `b`, `c`,
/// `cmp(a, b)` must be the inverse of `cmp(b, a)`, and the order must be
/// transitive. Violating this corrupts the search structure the same way a
/// broken `Ord` impl corrupts `BTreeMap`.
pub trait Comparator<K> {
	fn cmp(&self, lhs: &K, rhs: &K) -> Ordering;
}

/// The default comparator: keys order by their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaturalOrder;

impl<K: Ord> Comparator<K> for NaturalOrder {
	fn cmp(&self, lhs: &K, rhs: &K) -> Ordering {
		lhs.cmp(rhs)
	}
}

// ---------------------------------------------------------------------------
// Public Type Aliases
// ---------------------------------------------------------------------------

/// A binary search tree ordered by the key's [`Ord`] implementation.
///
/// This is the recommended type for most use cases. To order keys by
/// something other than their natural order, use [`GenericTree`] with a
/// custom [`Comparator`].
pub type Tree<K, V> = GenericTree<K, V, NaturalOrder>;

// ---------------------------------------------------------------------------
// Core Structures
// ---------------------------------------------------------------------------

/// A key-value entry plus its three navigation links.
///
/// The links are handles into the tree's arena; ownership of the node
/// itself lives in the arena slot, never in another node.
pub(crate) struct Node<K, V> {
	pub(crate) key: K,
	pub(crate) value: V,
	pub(crate) parent: Option<NodeId>,
	pub(crate) left: Option<NodeId>,
	pub(crate) right: Option<NodeId>,
}

/// The sentinel's root link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
	Root(NodeId),
	Empty,
}

impl Link {
	pub(crate) fn get(self) -> Option<NodeId> {
		match self {
			Link::Root(id) => Some(id),
			Link::Empty => None,
		}
	}
}

/// The permanent tree header: root link, cached extremes, live count.
///
/// `min` and `max` are `Some` exactly when `root` is `Link::Root`, and then
/// name the leftmost and rightmost nodes reachable from the root.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sentinel {
	pub(crate) root: Link,
	pub(crate) min: Option<NodeId>,
	pub(crate) max: Option<NodeId>,
	pub(crate) len: usize,
}

impl Sentinel {
	fn empty() -> Self {
		Sentinel { root: Link::Empty, min: None, max: None, len: 0 }
	}
}

/// Which child slot of a parent a descent fell out of.
#[derive(Debug, Clone, Copy)]
enum Side {
	Left,
	Right,
}

// ---------------------------------------------------------------------------
// Tree Engine
// ---------------------------------------------------------------------------

/// A binary search tree with a caller-supplied comparator.
///
/// # Type Parameters
///
/// - `K`: The key type.
/// - `V`: The value type.
/// - `C`: The [`Comparator`] defining key order. Defaults to
///   [`NaturalOrder`]; see the [`Tree`] alias.
///
/// Each key appears at most once. Inserting an existing key is a no-op
/// that reports `inserted = false`; removing an absent key is a no-op that
/// returns `None`.
pub struct GenericTree<K, V, C = NaturalOrder> {
	pub(crate) arena: Arena<Node<K, V>>,
	pub(crate) sentinel: Sentinel,
	pub(crate) comparator: C,
}

impl<K, V, C: Comparator<K> + Default> Default for GenericTree<K, V, C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V, C: Comparator<K> + Default> GenericTree<K, V, C> {
	/// Creates an empty tree with the comparator's default value.
	pub fn new() -> Self {
		Self::with_comparator(C::default())
	}
}

impl<K, V, C: Comparator<K>> GenericTree<K, V, C> {
	/// Creates an empty tree ordered by `comparator`.
	///
	/// # Example
	///
	/// ```
	/// use larch::{Comparator, GenericTree};
	/// use std::cmp::Ordering;
	///
	/// #[derive(Default)]
	/// struct Descending;
	///
	/// impl Comparator<i32> for Descending {
	///     fn cmp(&self, lhs: &i32, rhs: &i32) -> Ordering {
	///         rhs.cmp(lhs)
	///     }
	/// }
	///
	/// let mut tree = GenericTree::with_comparator(Descending);
	/// tree.insert(1, "one").unwrap();
	/// tree.insert(3, "three").unwrap();
	/// tree.insert(2, "two").unwrap();
	///
	/// // Traversal follows the comparator, largest key first
	/// assert_eq!(tree.first_key_value(), Some((&3, &"three")));
	/// ```
	pub fn with_comparator(comparator: C) -> Self {
		GenericTree { arena: Arena::new(), sentinel: Sentinel::empty(), comparator }
	}

	// -----------------------------------------------------------------------
	// Public API: Inspection
	// -----------------------------------------------------------------------

	/// Returns the number of live entries.
	pub fn len(&self) -> usize {
		self.sentinel.len
	}

	/// Returns `true` if the tree holds no entries.
	pub fn is_empty(&self) -> bool {
		self.sentinel.len == 0
	}

	/// Returns the number of node slots the tree has ever allocated.
	///
	/// Slots freed by removal are recycled, so capacity tracks the high
	/// water mark of the live count rather than churn.
	pub fn capacity(&self) -> usize {
		self.arena.capacity()
	}

	/// Returns a reference to the value for `key`, if present.
	///
	/// # Example
	///
	/// ```
	/// use larch::Tree;
	///
	/// let mut tree: Tree<i32, &str> = Tree::new();
	/// tree.insert(1, "one").unwrap();
	///
	/// assert_eq!(tree.get(&1), Some(&"one"));
	/// assert_eq!(tree.get(&2), None);
	/// ```
	pub fn get(&self, key: &K) -> Option<&V> {
		let id = self.locate(key)?;
		Some(&self.arena.get(id).value)
	}

	/// Returns a mutable reference to the value for `key`, if present.
	pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
		let id = self.locate(key)?;
		Some(&mut self.arena.get_mut(id).value)
	}

	/// Returns `true` if the tree contains `key`.
	pub fn contains_key(&self, key: &K) -> bool {
		self.locate(key).is_some()
	}

	/// Returns a cursor positioned at `key`, or at the end position if the
	/// key is absent.
	///
	/// # Example
	///
	/// ```
	/// use larch::Tree;
	///
	/// let mut tree: Tree<i32, &str> = Tree::new();
	/// tree.insert(1, "one").unwrap();
	///
	/// let mut found = tree.find(&1);
	/// assert_eq!(found.next(), Some((&1, &"one")));
	///
	/// assert!(tree.find(&2).is_end());
	/// ```
	pub fn find(&self, key: &K) -> RawIter<'_, K, V, C> {
		match self.locate(key) {
			Some(id) => RawIter::at(self, id),
			None => RawIter::new(self),
		}
	}

	/// Returns the minimum entry, served from the sentinel's cache.
	pub fn first_key_value(&self) -> Option<(&K, &V)> {
		let id = self.sentinel.min?;
		let node = self.arena.get(id);
		Some((&node.key, &node.value))
	}

	/// Returns the maximum entry, served from the sentinel's cache.
	pub fn last_key_value(&self) -> Option<(&K, &V)> {
		let id = self.sentinel.max?;
		let node = self.arena.get(id);
		Some((&node.key, &node.value))
	}

	// -----------------------------------------------------------------------
	// Public API: Cursors
	// -----------------------------------------------------------------------

	/// Returns a cursor positioned at the minimum entry (the traversal
	/// start). On an empty tree the cursor starts at the end position.
	pub fn iter(&self) -> RawIter<'_, K, V, C> {
		let mut iter = RawIter::new(self);
		iter.seek_to_first();
		iter
	}

	/// Returns an unpositioned read-only cursor, parked at the end
	/// position. Use the `seek_*` methods to place it.
	pub fn raw_iter(&self) -> RawIter<'_, K, V, C> {
		RawIter::new(self)
	}

	/// Returns an unpositioned value-mutating cursor, parked at the end
	/// position.
	///
	/// The cursor can change values during traversal but never keys, so
	/// the search order cannot be invalidated through it.
	///
	/// # Example
	///
	/// ```
	/// use larch::Tree;
	///
	/// let mut tree: Tree<i32, i32> = Tree::new();
	/// for i in 0..5 {
	///     tree.insert(i, i).unwrap();
	/// }
	///
	/// let mut iter = tree.raw_iter_mut();
	/// iter.seek_to_first();
	/// while let Some((_, v)) = iter.next() {
	///     *v *= 10;
	/// }
	///
	/// assert_eq!(tree.get(&3), Some(&30));
	/// ```
	pub fn raw_iter_mut(&mut self) -> RawIterMut<'_, K, V, C> {
		RawIterMut::new(self)
	}

	// -----------------------------------------------------------------------
	// Public API: Write Operations
	// -----------------------------------------------------------------------

	/// Inserts a key-value pair, unless the key is already present.
	///
	/// Returns a cursor positioned at the entry for `key` plus a flag that
	/// is `true` if this call created the entry. When the key already
	/// exists nothing is mutated: the existing value is kept and the flag
	/// is `false`.
	///
	/// # Algorithm
	///
	/// Descends from the root comparing keys until it either hits an equal
	/// key (duplicate, return early) or falls out of a missing child slot.
	/// A new node is then allocated, linked under the parent recorded
	/// during the descent (or installed as the root of an empty tree), the
	/// sentinel's min/max cache is refreshed, and the count is bumped.
	/// O(depth).
	///
	/// # Errors
	///
	/// Fails with [`error::Error::Allocation`] if the node arena cannot
	/// grow. The tree is left untouched in that case.
	///
	/// # Example
	///
	/// ```
	/// use larch::Tree;
	///
	/// let mut tree: Tree<i32, &str> = Tree::new();
	///
	/// let (_, inserted) = tree.insert(1, "one").unwrap();
	/// assert!(inserted);
	///
	/// // Duplicate insert keeps the existing value
	/// let (_, inserted) = tree.insert(1, "uno").unwrap();
	/// assert!(!inserted);
	/// assert_eq!(tree.get(&1), Some(&"one"));
	/// ```
	pub fn insert(&mut self, key: K, value: V) -> Result<(RawIter<'_, K, V, C>, bool)> {
		let mut parent: Option<(NodeId, Side)> = None;
		let mut cursor = self.sentinel.root.get();

		while let Some(id) = cursor {
			match self.comparator.cmp(&key, &self.arena.get(id).key) {
				Ordering::Equal => return Ok((RawIter::at(self, id), false)),
				Ordering::Less => {
					parent = Some((id, Side::Left));
					cursor = self.arena.get(id).left;
				}
				Ordering::Greater => {
					parent = Some((id, Side::Right));
					cursor = self.arena.get(id).right;
				}
			}
		}

		// Allocate before touching any link, so a failure leaves the tree
		// in its pre-insert state.
		let id = self.arena.try_alloc(Node {
			key,
			value,
			parent: parent.map(|(p, _)| p),
			left: None,
			right: None,
		})?;

		match parent {
			None => self.sentinel.root = Link::Root(id),
			Some((p, Side::Left)) => self.arena.get_mut(p).left = Some(id),
			Some((p, Side::Right)) => self.arena.get_mut(p).right = Some(id),
		}

		self.sentinel.len += 1;
		self.refresh_extrema();

		Ok((RawIter::at(self, id), true))
	}

	/// Removes `key` from the tree, returning its value if it was present.
	/// Removing an absent key is a no-op.
	///
	/// # Algorithm
	///
	/// An iterative descent locates the node; absent keys simply terminate
	/// the descent. The unlink then has three cases:
	///
	/// - **No children**: detach from the parent, or clear the root.
	/// - **One child**: splice the child into the removed node's slot.
	/// - **Two children**: the in-order successor (leftmost node of the
	///   right subtree) is detached from its own parent, leaving its right
	///   child in its place, and then spliced into the removed node's
	///   position, inheriting its parent, left, and right links.
	///   The successor holds the smallest key of the right subtree, so the
	///   search order is preserved.
	///
	/// Afterwards the min/max cache is refreshed, the count is
	/// decremented, and the node's slot is retired. O(depth).
	///
	/// # Example
	///
	/// ```
	/// use larch::Tree;
	///
	/// let mut tree: Tree<i32, &str> = Tree::new();
	/// tree.insert(1, "one").unwrap();
	///
	/// assert_eq!(tree.remove(&1), Some("one"));
	/// assert_eq!(tree.remove(&1), None); // Already removed
	/// ```
	pub fn remove(&mut self, key: &K) -> Option<V> {
		let id = self.locate(key)?;
		self.unlink(id);
		let node = self.arena.free(id);
		self.sentinel.len -= 1;
		self.refresh_extrema();
		Some(node.value)
	}

	/// Exchanges the entire contents of two trees in O(1).
	///
	/// Both trees keep their own entries' ordering because each tree's
	/// comparator travels with its nodes.
	///
	/// # Example
	///
	/// ```
	/// use larch::Tree;
	///
	/// let mut a: Tree<i32, &str> = Tree::new();
	/// let mut b: Tree<i32, &str> = Tree::new();
	/// a.insert(1, "one").unwrap();
	/// b.insert(2, "two").unwrap();
	/// b.insert(3, "three").unwrap();
	///
	/// a.swap(&mut b);
	/// assert_eq!(a.len(), 2);
	/// assert_eq!(b.get(&1), Some(&"one"));
	/// ```
	pub fn swap(&mut self, other: &mut Self) {
		mem::swap(self, other);
	}

	/// Removes all entries.
	///
	/// Node slots are retained for reuse; handles issued before the clear
	/// are retired, not recycled into new nodes.
	pub fn clear(&mut self) {
		self.arena.clear();
		self.sentinel = Sentinel::empty();
	}

	// -----------------------------------------------------------------------
	// Descent and Re-linking Primitives
	// -----------------------------------------------------------------------

	pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
		self.arena.get(id)
	}

	/// Standard comparator descent; `None` if the key is absent.
	fn locate(&self, key: &K) -> Option<NodeId> {
		let mut cursor = self.sentinel.root.get();
		while let Some(id) = cursor {
			let node = self.arena.get(id);
			match self.comparator.cmp(key, &node.key) {
				Ordering::Less => cursor = node.left,
				Ordering::Greater => cursor = node.right,
				Ordering::Equal => return Some(id),
			}
		}
		None
	}

	/// Leftmost node of the subtree rooted at `id`.
	pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
		while let Some(left) = self.arena.get(id).left {
			id = left;
		}
		id
	}

	/// Rightmost node of the subtree rooted at `id`.
	pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
		while let Some(right) = self.arena.get(id).right {
			id = right;
		}
		id
	}

	/// Unhooks `id` from the tree structure, leaving its slot to the
	/// caller to retire. Handles all three deletion cases.
	fn unlink(&mut self, id: NodeId) {
		let (parent, left, right) = {
			let node = self.arena.get(id);
			(node.parent, node.left, node.right)
		};

		match (left, right) {
			(Some(left), Some(right)) => {
				let succ = self.leftmost(right);

				if succ != right {
					// Detach the successor from its own parent, promoting
					// its right child into its place.
					let succ_parent = self
						.arena
						.get(succ)
						.parent
						.expect("successor below the right child must have a parent");
					let succ_right = self.arena.get(succ).right;
					self.arena.get_mut(succ_parent).left = succ_right;
					if let Some(sr) = succ_right {
						self.arena.get_mut(sr).parent = Some(succ_parent);
					}

					// The successor inherits the removed node's right subtree
					self.arena.get_mut(succ).right = Some(right);
					self.arena.get_mut(right).parent = Some(succ);
				}

				// The successor inherits the left subtree and the parent slot
				self.arena.get_mut(succ).left = Some(left);
				self.arena.get_mut(left).parent = Some(succ);
				self.arena.get_mut(succ).parent = parent;
				self.replace_child(parent, id, Some(succ));
			}
			(Some(child), None) | (None, Some(child)) => {
				self.arena.get_mut(child).parent = parent;
				self.replace_child(parent, id, Some(child));
			}
			(None, None) => {
				self.replace_child(parent, id, None);
			}
		}
	}

	/// Redirects the link that pointed at `old` (either a parent's child
	/// slot or the sentinel's root) to `new`.
	fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
		match parent {
			None => {
				self.sentinel.root = match new {
					Some(id) => Link::Root(id),
					None => Link::Empty,
				};
			}
			Some(p) => {
				let node = self.arena.get_mut(p);
				if node.left == Some(old) {
					node.left = new;
				} else {
					debug_assert_eq!(node.right, Some(old), "parent does not link to old child");
					node.right = new;
				}
			}
		}
	}

	/// Re-derives the sentinel's min/max cache by walking the all-left and
	/// all-right chains from the current root. O(depth).
	fn refresh_extrema(&mut self) {
		match self.sentinel.root {
			Link::Empty => {
				self.sentinel.min = None;
				self.sentinel.max = None;
			}
			Link::Root(root) => {
				self.sentinel.min = Some(self.leftmost(root));
				self.sentinel.max = Some(self.rightmost(root));
			}
		}
	}

	// -----------------------------------------------------------------------
	// Invariant Validation
	// -----------------------------------------------------------------------

	/// Validates the full set of structural invariants. Panics with a
	/// description of the first violation found. Intended for tests.
	///
	/// Checked invariants:
	///
	/// 1. Search order: every key sits strictly between the bounds its
	///    ancestors impose.
	/// 2. Link closure: every child's parent link points back at the node
	///    that claims it; the root has no parent.
	/// 3. Cache correctness: the sentinel's min/max name exactly the
	///    leftmost/rightmost nodes, or nothing when the tree is empty.
	/// 4. Count correctness: the sentinel's len matches both the traversal
	///    count and the arena's live-slot count.
	/// 5. Uniqueness: implied by the strict bounds of (1).
	pub fn assert_invariants(&self)
	where
		K: fmt::Debug,
	{
		match self.sentinel.root {
			Link::Empty => {
				assert_eq!(self.sentinel.len, 0, "empty tree with nonzero len");
				assert_eq!(self.sentinel.min, None, "empty tree with cached min");
				assert_eq!(self.sentinel.max, None, "empty tree with cached max");
				assert_eq!(self.arena.live(), 0, "empty tree with live arena slots");
			}
			Link::Root(root) => {
				assert_eq!(self.arena.get(root).parent, None, "root has a parent link");

				let mut count = 0;
				self.validate_subtree(root, None, None, &mut count);

				assert_eq!(count, self.sentinel.len, "len does not match traversal count");
				assert_eq!(
					self.arena.live(),
					self.sentinel.len,
					"arena live count does not match len"
				);
				assert_eq!(
					self.sentinel.min,
					Some(self.leftmost(root)),
					"cached min is not the leftmost node"
				);
				assert_eq!(
					self.sentinel.max,
					Some(self.rightmost(root)),
					"cached max is not the rightmost node"
				);
			}
		}
	}

	/// Recursively validates one subtree against exclusive `(lower, upper)`
	/// key bounds inherited from the ancestors.
	fn validate_subtree(
		&self,
		id: NodeId,
		lower: Option<&K>,
		upper: Option<&K>,
		count: &mut usize,
	) where
		K: fmt::Debug,
	{
		let node = self.arena.get(id);

		if let Some(lo) = lower {
			assert_eq!(
				self.comparator.cmp(lo, &node.key),
				Ordering::Less,
				"key {:?} is not above its lower bound {:?}",
				node.key,
				lo
			);
		}
		if let Some(hi) = upper {
			assert_eq!(
				self.comparator.cmp(&node.key, hi),
				Ordering::Less,
				"key {:?} is not below its upper bound {:?}",
				node.key,
				hi
			);
		}

		*count += 1;

		if let Some(left) = node.left {
			assert_eq!(
				self.arena.get(left).parent,
				Some(id),
				"left child of {:?} has a broken parent link",
				node.key
			);
			self.validate_subtree(left, lower, Some(&node.key), count);
		}
		if let Some(right) = node.right {
			assert_eq!(
				self.arena.get(right).parent,
				Some(id),
				"right child of {:?} has a broken parent link",
				node.key
			);
			self.validate_subtree(right, Some(&node.key), upper, count);
		}
	}
}

impl<K: fmt::Debug, V: fmt::Debug, C: Comparator<K>> fmt::Debug for GenericTree<K, V, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut map = f.debug_map();
		let mut iter = self.iter();
		while let Some((k, v)) = iter.next() {
			map.entry(k, v);
		}
		map.finish()
	}
}

// ---------------------------------------------------------------------------
// Unit Tests
// ---------------------------------------------------------------------------
