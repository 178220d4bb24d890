//! # Graph Contract
//!
//! The algorithms of this crate never own vertices or edges. They work through
//! *cursors*: small handles that denote "the vertex (edge) currently at some
//! position of the backing store". Cursors are borrowed from the graph with
//! [`Graph::vertex_ref`] / [`Graph::edge_ref`], retargeted with
//! [`Assign::assign`] or by resolving an edge endpoint into them, and returned
//! with [`Graph::release_vertex_ref`] / [`Graph::release_edge_ref`].
//!
//! Cloning a cursor gives a *detached handle* with the same identity; it is a
//! plain value and never counts as a pool borrow. Containers and results hold
//! detached handles.
//!
//! Scratch cursors should be taken through [`Graph::borrow_vertex`] and
//! [`Graph::borrow_edge`], which return guards that give the cursor back to the
//! pool when dropped, on every exit path.
//!
//! Two implementations of the contract ship with the crate:
//! - [`pool::PoolGraph`]: slot storage with index cursors and accounted pools,
//! - [`object::ObjectGraph`]: reference counted vertex and edge objects.

use std::{
    fmt::Debug,
    hash::Hash,
    ops::{Deref, DerefMut},
};

pub mod collection;
pub mod listenable;
pub mod object;
pub mod pool;

pub use collection::ContainerFactory;

/// Copies the identity of one handle into another.
///
/// Index cursors retarget their slot, pointer handles replace their pointer.
/// Either way the receiver afterwards compares equal to `other`.
pub trait Assign {
    fn assign(&mut self, other: &Self);
}

/// Which edges of a vertex a walk follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Edges leaving the vertex, towards their targets.
    #[default]
    Outgoing,
    /// Edges entering the vertex, back towards their sources.
    Incoming,
    /// All incident edges regardless of their orientation.
    Undirected,
}

impl Direction {
    pub fn edges<'g, G: Graph>(self, graph: &'g G, vertex: &G::Vertex) -> G::Edges<'g> {
        match self {
            Direction::Outgoing => graph.outgoing_edges(vertex),
            Direction::Incoming => graph.incoming_edges(vertex),
            Direction::Undirected => graph.edges(vertex),
        }
    }

    /// Resolves the far end of `edge`, seen from `from`, into `into`.
    pub fn neighbor<'r, G: Graph>(
        self,
        graph: &G,
        edge: &G::Edge,
        from: &G::Vertex,
        into: &'r mut G::Vertex,
    ) -> &'r mut G::Vertex {
        match self {
            Direction::Outgoing => graph.target(edge, into),
            Direction::Incoming => graph.source(edge, into),
            Direction::Undirected => {
                graph.target(edge, &mut *into);
                if *into == *from {
                    graph.source(edge, into)
                } else {
                    into
                }
            }
        }
    }
}

/// Read access to a directed multigraph through pooled cursors.
pub trait Graph {
    type Vertex: Clone + Eq + Hash + Debug + Assign;
    type Edge: Clone + Eq + Hash + Debug + Assign;

    type Vertices<'a>: Iterator<Item = Self::Vertex>
    where
        Self: 'a;
    type Edges<'a>: Iterator<Item = Self::Edge>
    where
        Self: 'a;

    /// Borrows a vertex cursor from the pool. Its position is unspecified
    /// until it is assigned or resolved into.
    fn vertex_ref(&self) -> Self::Vertex;
    fn release_vertex_ref(&self, vertex: Self::Vertex);
    fn edge_ref(&self) -> Self::Edge;
    fn release_edge_ref(&self, edge: Self::Edge);

    fn vertex_count(&self) -> usize;
    fn vertices(&self) -> Self::Vertices<'_>;

    fn outgoing_edges(&self, vertex: &Self::Vertex) -> Self::Edges<'_>;
    fn incoming_edges(&self, vertex: &Self::Vertex) -> Self::Edges<'_>;
    /// Outgoing edges followed by incoming edges. A self-loop appears twice.
    fn edges(&self, vertex: &Self::Vertex) -> Self::Edges<'_>;

    fn source<'r>(&self, edge: &Self::Edge, into: &'r mut Self::Vertex) -> &'r mut Self::Vertex;
    fn target<'r>(&self, edge: &Self::Edge, into: &'r mut Self::Vertex) -> &'r mut Self::Vertex;

    fn has_incoming_edges(&self, vertex: &Self::Vertex) -> bool {
        self.incoming_edges(vertex).next().is_some()
    }

    fn borrow_vertex(&self) -> PooledVertex<'_, Self>
    where
        Self: Sized,
    {
        PooledVertex {
            cursor: Some(self.vertex_ref()),
            graph: self,
        }
    }

    fn borrow_edge(&self) -> PooledEdge<'_, Self>
    where
        Self: Sized,
    {
        PooledEdge {
            cursor: Some(self.edge_ref()),
            graph: self,
        }
    }
}

/// Structural mutation, used by [`listenable::ListenableGraph`] and tests.
pub trait MutableGraph: Graph {
    type VertexData;

    fn add_vertex(&mut self, data: Self::VertexData) -> Self::Vertex;
    fn add_edge(&mut self, source: &Self::Vertex, target: &Self::Vertex) -> Self::Edge;
    fn remove_edge(&mut self, edge: &Self::Edge);
    /// Removes `vertex` together with all of its incident edges.
    fn remove_vertex(&mut self, vertex: &Self::Vertex);
}

/// A vertex cursor that is given back to its graph's pool on drop.
pub struct PooledVertex<'g, G: Graph> {
    graph: &'g G,
    cursor: Option<G::Vertex>,
}

/// An edge cursor that is given back to its graph's pool on drop.
pub struct PooledEdge<'g, G: Graph> {
    graph: &'g G,
    cursor: Option<G::Edge>,
}

macro_rules! pooled_guard {
    ($guard:ident, $item:ident, $release:ident) => {
        impl<G: Graph> Deref for $guard<'_, G> {
            type Target = G::$item;

            fn deref(&self) -> &Self::Target {
                match &self.cursor {
                    Some(cursor) => cursor,
                    None => unreachable!("cursor is only taken on drop"),
                }
            }
        }

        impl<G: Graph> DerefMut for $guard<'_, G> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                match &mut self.cursor {
                    Some(cursor) => cursor,
                    None => unreachable!("cursor is only taken on drop"),
                }
            }
        }

        impl<G: Graph> Drop for $guard<'_, G> {
            fn drop(&mut self) {
                if let Some(cursor) = self.cursor.take() {
                    self.graph.$release(cursor);
                }
            }
        }

        impl<G: Graph> Debug for $guard<'_, G> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_tuple(stringify!($guard)).field(&self.cursor).finish()
            }
        }
    };
}

pooled_guard!(PooledVertex, Vertex, release_vertex_ref);
pooled_guard!(PooledEdge, Edge, release_edge_ref);
