use tracing::debug;

use super::search::DepthFirstSearch;
use crate::graph::{collection::RefSet, ContainerFactory, Direction, Graph};

/// Weakly connected components, recomputed from scratch on every
/// [`get`](Self::get).
pub struct ConnectedComponents<'g, G: ContainerFactory> {
    graph: &'g G,
    minimal_size: usize,
}

impl<'g, G: ContainerFactory> ConnectedComponents<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        ConnectedComponents {
            graph,
            minimal_size: 1,
        }
    }

    /// Components with fewer vertices are left out of the result.
    pub fn minimal_size(mut self, minimal_size: usize) -> Self {
        self.minimal_size = minimal_size;
        self
    }

    pub fn get(&self) -> Vec<RefSet<G::Vertex>> {
        let graph = self.graph;
        let mut components = Vec::new();
        let mut seen = graph.create_vertex_set_with_capacity(graph.vertex_count());
        let mut search = DepthFirstSearch::new(graph, Direction::Undirected);

        for vertex in graph.vertices() {
            if seen.contains(&vertex) {
                continue;
            }
            search.start(&vertex, &mut ());
            let mut members = graph.create_vertex_set();
            members.extend(search.discovered().cloned());
            seen.extend(members.iter().cloned());
            if members.len() >= self.minimal_size {
                components.push(members);
            }
        }
        debug!(
            components = components.len(),
            vertices = seen.len(),
            minimal_size = self.minimal_size,
            "connected components computed"
        );
        components
    }
}
