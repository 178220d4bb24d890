use crate::graph::{collection::RefSet, ContainerFactory, Graph};

/// Vertices without incoming edges, in vertex iteration order.
pub fn find_roots<G: ContainerFactory>(graph: &G) -> RefSet<G::Vertex> {
    let mut roots = graph.create_vertex_set();
    roots.extend(graph.vertices().filter(|v| !graph.has_incoming_edges(v)));
    roots
}
