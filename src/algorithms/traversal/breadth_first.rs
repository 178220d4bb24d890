use std::{cmp::Ordering, iter::FusedIterator};

use crate::graph::{
    collection::{RefDeque, RefList, RefSet},
    ContainerFactory, Direction, PooledVertex,
};

/// Breadth-first iteration from a root vertex.
///
/// Vertices are marked visited when they are enqueued, so each reachable
/// vertex is produced once, in non-decreasing distance from the root.
pub struct BreadthFirstIterator<'g, G: ContainerFactory> {
    graph: &'g G,
    direction: Direction,
    visited: RefSet<G::Vertex>,
    queue: RefDeque<G::Vertex>,
    neighbor: Option<PooledVertex<'g, G>>,
}

impl<'g, G: ContainerFactory> BreadthFirstIterator<'g, G> {
    pub fn new(root: &G::Vertex, graph: &'g G) -> Self {
        Self::with_direction(root, graph, Direction::Outgoing)
    }

    pub fn with_direction(root: &G::Vertex, graph: &'g G, direction: Direction) -> Self {
        let mut visited = graph.create_vertex_set();
        let mut queue = graph.create_vertex_deque();
        visited.insert(root.clone());
        queue.push_back(root.clone());
        BreadthFirstIterator {
            graph,
            direction,
            visited,
            queue,
            neighbor: Some(graph.borrow_vertex()),
        }
    }

    pub fn has_next(&self) -> bool {
        !self.queue.is_empty()
    }
}

impl<G: ContainerFactory> Iterator for BreadthFirstIterator<'_, G> {
    type Item = G::Vertex;

    fn next(&mut self) -> Option<G::Vertex> {
        let vertex = self.queue.pop_front()?;
        if let Some(neighbor) = self.neighbor.as_deref_mut() {
            for edge in self.direction.edges(self.graph, &vertex) {
                self.direction
                    .neighbor(self.graph, &edge, &vertex, neighbor);
                if !self.visited.contains(&*neighbor) {
                    self.visited.insert(neighbor.clone());
                    self.queue.push_back(neighbor.clone());
                }
            }
        }
        if self.queue.is_empty() {
            self.neighbor = None;
        }
        Some(vertex)
    }
}

impl<G: ContainerFactory> FusedIterator for BreadthFirstIterator<'_, G> {}

/// Breadth-first iteration that enqueues the unvisited neighbors of each
/// vertex in comparator order.
///
/// The sort is stable: neighbors that compare equal keep their edge order.
pub struct BreadthFirstIteratorSorted<'g, G: ContainerFactory, C> {
    graph: &'g G,
    direction: Direction,
    comparator: C,
    visited: RefSet<G::Vertex>,
    queue: RefDeque<G::Vertex>,
    children: RefList<G::Vertex>,
    neighbor: Option<PooledVertex<'g, G>>,
}

impl<'g, G, C> BreadthFirstIteratorSorted<'g, G, C>
where
    G: ContainerFactory,
    C: FnMut(&G::Vertex, &G::Vertex) -> Ordering,
{
    pub fn new(root: &G::Vertex, graph: &'g G, comparator: C) -> Self {
        Self::with_direction(root, graph, comparator, Direction::Outgoing)
    }

    pub fn with_direction(
        root: &G::Vertex,
        graph: &'g G,
        comparator: C,
        direction: Direction,
    ) -> Self {
        let mut visited = graph.create_vertex_set();
        let mut queue = graph.create_vertex_deque();
        visited.insert(root.clone());
        queue.push_back(root.clone());
        BreadthFirstIteratorSorted {
            graph,
            direction,
            comparator,
            visited,
            queue,
            children: graph.create_vertex_list(),
            neighbor: Some(graph.borrow_vertex()),
        }
    }

    pub fn has_next(&self) -> bool {
        !self.queue.is_empty()
    }
}

impl<'g, G> BreadthFirstIteratorSorted<'g, G, fn(&G::Vertex, &G::Vertex) -> Ordering>
where
    G: ContainerFactory,
    G::Vertex: Ord,
{
    /// Sorted iteration in the natural order of the vertex handles.
    pub fn natural(root: &G::Vertex, graph: &'g G) -> Self {
        Self::new(root, graph, Ord::cmp)
    }
}

impl<G, C> Iterator for BreadthFirstIteratorSorted<'_, G, C>
where
    G: ContainerFactory,
    C: FnMut(&G::Vertex, &G::Vertex) -> Ordering,
{
    type Item = G::Vertex;

    fn next(&mut self) -> Option<G::Vertex> {
        let vertex = self.queue.pop_front()?;
        if let Some(neighbor) = self.neighbor.as_deref_mut() {
            for edge in self.direction.edges(self.graph, &vertex) {
                self.direction
                    .neighbor(self.graph, &edge, &vertex, neighbor);
                if self.visited.insert(neighbor.clone()) {
                    self.children.push(neighbor.clone());
                }
            }
            self.children.sort_by(&mut self.comparator);
            self.queue.extend(self.children.drain(..));
        }
        if self.queue.is_empty() {
            self.neighbor = None;
        }
        Some(vertex)
    }
}

impl<G, C> FusedIterator for BreadthFirstIteratorSorted<'_, G, C>
where
    G: ContainerFactory,
    C: FnMut(&G::Vertex, &G::Vertex) -> Ordering,
{
}
