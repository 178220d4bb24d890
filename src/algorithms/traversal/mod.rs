//! # Traversal Iterators
//!
//! Lazy, single-pass walks from a root vertex:
//!
//! - [`BreadthFirstIterator`] and [`BreadthFirstIteratorSorted`] use a FIFO
//!   frontier and produce vertices in order of distance from the root.
//! - [`DepthFirstIterator`] and [`DepthFirstIteratorSorted`] use an explicit
//!   LIFO stack, so arbitrarily deep graphs are safe to walk.
//!
//! The sorted variants order the newly reached neighbors of every vertex with
//! a caller supplied comparator (or the natural order of the handles, with
//! `natural`). Every iterator follows outgoing edges unless constructed with
//! another [`Direction`](crate::graph::Direction).
//!
//! Each iterator holds one scratch cursor, which is released as soon as the
//! walk is exhausted or the iterator is dropped. The graph must not change
//! while an iterator is alive; the borrow on it enforces that for the
//! provided graphs.

mod breadth_first;
mod depth_first;

pub use breadth_first::{BreadthFirstIterator, BreadthFirstIteratorSorted};
pub use depth_first::{DepthFirstIterator, DepthFirstIteratorSorted};
