use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};

use super::Graph;

/// Hash set of detached handles. Iterates in insertion order.
pub type RefSet<T> = IndexSet<T, ahash::RandomState>;
/// Hash map keyed by detached handles. Iterates in insertion order.
pub type RefMap<K, V> = IndexMap<K, V, ahash::RandomState>;
pub type RefList<T> = Vec<T>;
pub type RefDeque<T> = VecDeque<T>;
pub type RefStack<T> = Vec<T>;

/// Builds the containers algorithms keep their state in.
///
/// All methods have defaults; a graph may override them to size containers
/// from what it knows about itself.
pub trait ContainerFactory: Graph {
    fn create_vertex_set(&self) -> RefSet<Self::Vertex> {
        RefSet::default()
    }

    fn create_vertex_set_with_capacity(&self, capacity: usize) -> RefSet<Self::Vertex> {
        RefSet::with_capacity_and_hasher(capacity, Default::default())
    }

    fn create_vertex_map<T>(&self) -> RefMap<Self::Vertex, T> {
        RefMap::default()
    }

    fn create_vertex_map_with_capacity<T>(&self, capacity: usize) -> RefMap<Self::Vertex, T> {
        RefMap::with_capacity_and_hasher(capacity, Default::default())
    }

    fn create_vertex_list(&self) -> RefList<Self::Vertex> {
        RefList::new()
    }

    fn create_vertex_list_with_capacity(&self, capacity: usize) -> RefList<Self::Vertex> {
        RefList::with_capacity(capacity)
    }

    fn create_vertex_deque(&self) -> RefDeque<Self::Vertex> {
        RefDeque::new()
    }

    fn create_vertex_deque_with_capacity(&self, capacity: usize) -> RefDeque<Self::Vertex> {
        RefDeque::with_capacity(capacity)
    }

    fn create_vertex_stack(&self) -> RefStack<Self::Vertex> {
        RefStack::new()
    }

    fn create_vertex_stack_with_capacity(&self, capacity: usize) -> RefStack<Self::Vertex> {
        RefStack::with_capacity(capacity)
    }

    fn create_edge_set(&self) -> RefSet<Self::Edge> {
        RefSet::default()
    }

    fn create_edge_list(&self) -> RefList<Self::Edge> {
        RefList::new()
    }
}
