use std::{cmp::Ordering, iter::FusedIterator};

use crate::graph::{
    collection::{RefList, RefSet, RefStack},
    ContainerFactory, Direction, PooledVertex,
};

/// Depth-first iteration from a root vertex.
///
/// Neighbors are pushed in edge order, so the neighbor of the last edge is
/// explored first. A vertex is marked visited when it is popped; stale stack
/// entries are skipped. The next vertex is always fetched ahead, which is
/// what [`has_next`](Self::has_next) reports on.
pub struct DepthFirstIterator<'g, G: ContainerFactory> {
    graph: &'g G,
    direction: Direction,
    visited: RefSet<G::Vertex>,
    stack: RefStack<G::Vertex>,
    next: Option<G::Vertex>,
    neighbor: Option<PooledVertex<'g, G>>,
}

impl<'g, G: ContainerFactory> DepthFirstIterator<'g, G> {
    pub fn new(root: &G::Vertex, graph: &'g G) -> Self {
        Self::with_direction(root, graph, Direction::Outgoing)
    }

    pub fn with_direction(root: &G::Vertex, graph: &'g G, direction: Direction) -> Self {
        let mut stack = graph.create_vertex_stack();
        stack.push(root.clone());
        let mut iter = DepthFirstIterator {
            graph,
            direction,
            visited: graph.create_vertex_set(),
            stack,
            next: None,
            neighbor: Some(graph.borrow_vertex()),
        };
        iter.fetch();
        iter
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    fn fetch(&mut self) {
        while let Some(candidate) = self.stack.pop() {
            if !self.visited.insert(candidate.clone()) {
                continue;
            }
            if let Some(neighbor) = self.neighbor.as_deref_mut() {
                for edge in self.direction.edges(self.graph, &candidate) {
                    self.direction
                        .neighbor(self.graph, &edge, &candidate, neighbor);
                    if !self.visited.contains(&*neighbor) {
                        self.stack.push(neighbor.clone());
                    }
                }
            }
            self.next = Some(candidate);
            return;
        }
        self.next = None;
        self.neighbor = None;
    }
}

impl<G: ContainerFactory> Iterator for DepthFirstIterator<'_, G> {
    type Item = G::Vertex;

    fn next(&mut self) -> Option<G::Vertex> {
        let vertex = self.next.take()?;
        self.fetch();
        Some(vertex)
    }
}

impl<G: ContainerFactory> FusedIterator for DepthFirstIterator<'_, G> {}

/// Depth-first iteration that visits the unvisited neighbors of each vertex
/// in comparator order.
pub struct DepthFirstIteratorSorted<'g, G: ContainerFactory, C> {
    graph: &'g G,
    direction: Direction,
    comparator: C,
    visited: RefSet<G::Vertex>,
    stack: RefStack<G::Vertex>,
    children: RefList<G::Vertex>,
    next: Option<G::Vertex>,
    neighbor: Option<PooledVertex<'g, G>>,
}

impl<'g, G, C> DepthFirstIteratorSorted<'g, G, C>
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
        let mut stack = graph.create_vertex_stack();
        stack.push(root.clone());
        let mut iter = DepthFirstIteratorSorted {
            graph,
            direction,
            comparator,
            visited: graph.create_vertex_set(),
            stack,
            children: graph.create_vertex_list(),
            next: None,
            neighbor: Some(graph.borrow_vertex()),
        };
        iter.fetch();
        iter
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    fn fetch(&mut self) {
        while let Some(candidate) = self.stack.pop() {
            if !self.visited.insert(candidate.clone()) {
                continue;
            }
            if let Some(neighbor) = self.neighbor.as_deref_mut() {
                for edge in self.direction.edges(self.graph, &candidate) {
                    self.direction
                        .neighbor(self.graph, &edge, &candidate, neighbor);
                    if !self.visited.contains(&*neighbor) {
                        self.children.push(neighbor.clone());
                    }
                }
                self.children.sort_by(&mut self.comparator);
                // smallest on top
                self.stack.extend(self.children.drain(..).rev());
            }
            self.next = Some(candidate);
            return;
        }
        self.next = None;
        self.neighbor = None;
    }
}

impl<'g, G> DepthFirstIteratorSorted<'g, G, fn(&G::Vertex, &G::Vertex) -> Ordering>
where
    G: ContainerFactory,
    G::Vertex: Ord,
{
    /// Sorted iteration in the natural order of the vertex handles.
    pub fn natural(root: &G::Vertex, graph: &'g G) -> Self {
        Self::new(root, graph, Ord::cmp)
    }
}

impl<G, C> Iterator for DepthFirstIteratorSorted<'_, G, C>
where
    G: ContainerFactory,
    C: FnMut(&G::Vertex, &G::Vertex) -> Ordering,
{
    type Item = G::Vertex;

    fn next(&mut self) -> Option<G::Vertex> {
        let vertex = self.next.take()?;
        self.fetch();
        Some(vertex)
    }
}

impl<G, C> FusedIterator for DepthFirstIteratorSorted<'_, G, C>
where
    G: ContainerFactory,
    C: FnMut(&G::Vertex, &G::Vertex) -> Ordering,
{
}
