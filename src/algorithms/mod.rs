//! # Algorithms
//!
//! Everything here is written against the [`Graph`] and [`ContainerFactory`]
//! traits only:
//!
//! - [`traversal`]: breadth-first and depth-first iterators,
//! - [`search`]: listener-driven searches with edge classification,
//! - [`find_roots`], [`ShortestPath`], [`TopologicalSort`],
//! - [`ConnectedComponents`] and its incremental counterpart
//!   [`ConnectedComponentsDynamic`].
//!
//! [`GraphAlgorithms`] offers the same as methods on any graph:
//!
//! ```
//! use trackgraph::{algorithms::GraphAlgorithms, graph::{pool::PoolGraph, MutableGraph}};
//!
//! let mut graph = PoolGraph::new();
//! let a = graph.add_vertex("a");
//! let b = graph.add_vertex("b");
//! graph.add_edge(&a, &b);
//!
//! assert_eq!(graph.breadth_first(&a).count(), 2);
//! assert_eq!(graph.shortest_path(&a, &b, true), Some(vec![b, a]));
//! ```

use std::cmp::Ordering;

use crate::graph::{collection::RefSet, ContainerFactory, Graph};

pub mod connected_components;
pub mod connected_components_dynamic;
pub mod root_finder;
pub mod search;
pub mod shortest_path;
pub mod topological_sort;
pub mod traversal;

pub use connected_components::ConnectedComponents;
pub use connected_components_dynamic::{ComponentId, ConnectedComponentsDynamic};
pub use root_finder::find_roots;
pub use search::{
    BreadthFirstSearch, DepthFirstSearch, EdgeClass, SearchListener, SearchOutcome,
};
pub use shortest_path::ShortestPath;
pub use topological_sort::{TopoError, TopologicalOrder, TopologicalSort};
pub use traversal::{
    BreadthFirstIterator, BreadthFirstIteratorSorted, DepthFirstIterator, DepthFirstIteratorSorted,
};

pub trait GraphAlgorithms: ContainerFactory + Sized {
    fn breadth_first(&self, root: &Self::Vertex) -> BreadthFirstIterator<'_, Self> {
        BreadthFirstIterator::new(root, self)
    }

    fn breadth_first_sorted<C>(
        &self,
        root: &Self::Vertex,
        comparator: C,
    ) -> BreadthFirstIteratorSorted<'_, Self, C>
    where
        C: FnMut(&Self::Vertex, &Self::Vertex) -> Ordering,
    {
        BreadthFirstIteratorSorted::new(root, self, comparator)
    }

    fn depth_first(&self, root: &Self::Vertex) -> DepthFirstIterator<'_, Self> {
        DepthFirstIterator::new(root, self)
    }

    fn depth_first_sorted<C>(
        &self,
        root: &Self::Vertex,
        comparator: C,
    ) -> DepthFirstIteratorSorted<'_, Self, C>
    where
        C: FnMut(&Self::Vertex, &Self::Vertex) -> Ordering,
    {
        DepthFirstIteratorSorted::new(root, self, comparator)
    }

    fn find_roots(&self) -> RefSet<Self::Vertex> {
        find_roots(self)
    }

    fn shortest_path(
        &self,
        from: &Self::Vertex,
        to: &Self::Vertex,
        directed: bool,
    ) -> Option<Vec<Self::Vertex>> {
        ShortestPath::new(self).find(from, to, directed)
    }

    fn topological_sort(&self) -> TopologicalOrder<Self::Vertex> {
        TopologicalSort::new(self).sort_all()
    }

    fn connected_components(&self) -> Vec<RefSet<Self::Vertex>> {
        ConnectedComponents::new(self).get()
    }
}

impl<G: ContainerFactory> GraphAlgorithms for G {}
