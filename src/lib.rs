//! # Trackgraph
//!
//! Trackgraph is a Rust library of traversal, ordering and connectivity
//! algorithms for large, mutable, directed graphs such as cell lineages.
//!
//! The algorithms never own graph elements. They reach vertices and edges
//! through pooled cursors borrowed from the graph (see [`graph`]), which lets
//! a graph keep millions of elements in flat storage and hand out cheap,
//! reusable handles instead of objects.
//!
//! The crate provides:
//! - breadth-first and depth-first iterators, plain and sorted,
//! - listener-driven searches with edge classification,
//! - root finding, unweighted shortest paths and topological sorting,
//! - connected components, both recomputed and maintained incrementally from
//!   the change notifications of a [`graph::listenable::ListenableGraph`].

pub mod algorithms;
pub mod error;
pub mod graph;

pub use error::Error;

#[cfg(test)]
mod test_graphs;
