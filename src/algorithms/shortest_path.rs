use std::ops::ControlFlow;

use super::search::{BreadthFirstSearch, SearchListener};
use crate::graph::{Assign, ContainerFactory, Direction, Graph};

/// Unweighted shortest paths, found by breadth-first search.
pub struct ShortestPath<'g, G: ContainerFactory> {
    graph: &'g G,
}

struct StopAt<'a, V> {
    target: &'a V,
}

impl<G: Graph> SearchListener<G> for StopAt<'_, G::Vertex> {
    fn process_vertex_early(&mut self, vertex: &G::Vertex, _depth: usize) -> ControlFlow<()> {
        if vertex == self.target {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

impl<'g, G: ContainerFactory> ShortestPath<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        ShortestPath { graph }
    }

    /// A shortest path from `from` to `to`, listed from `to` back to `from`.
    ///
    /// With `directed` set only outgoing edges are followed, otherwise edges
    /// are followed in both directions. `None` if `to` is unreachable.
    pub fn find(&self, from: &G::Vertex, to: &G::Vertex, directed: bool) -> Option<Vec<G::Vertex>> {
        let direction = if directed {
            Direction::Outgoing
        } else {
            Direction::Undirected
        };
        let mut search = BreadthFirstSearch::new(self.graph, direction);
        if !search.start(from, &mut StopAt { target: to }).is_aborted() {
            return None;
        }

        let mut path = Vec::with_capacity(search.depth(to)? + 1);
        let mut cursor = self.graph.borrow_vertex();
        cursor.assign(to);
        loop {
            path.push(cursor.clone());
            match search.parent(&*cursor) {
                Some(parent) => cursor.assign(parent),
                None => break,
            }
        }
        Some(path)
    }
}
