use crate::graph::{
    object::ObjectGraph,
    pool::{PoolGraph, PoolVertex},
    ContainerFactory, Graph, MutableGraph,
};

/// A graph together with its vertices and edges in creation order.
pub struct Bundle<G: Graph> {
    pub graph: G,
    pub vertices: Vec<G::Vertex>,
    pub edges: Vec<G::Edge>,
}

/// Graphs whose vertices carry a `u32` label.
pub trait Labelled: MutableGraph<VertexData = u32> + ContainerFactory + Default {
    fn label(&self, vertex: &Self::Vertex) -> u32;

    fn labels<'a>(&self, vertices: impl IntoIterator<Item = &'a Self::Vertex>) -> Vec<u32>
    where
        Self::Vertex: 'a,
    {
        vertices.into_iter().map(|v| self.label(v)).collect()
    }
}

impl Labelled for PoolGraph<u32> {
    fn label(&self, vertex: &PoolVertex) -> u32 {
        *self.data(vertex)
    }
}

impl Labelled for ObjectGraph<u32> {
    fn label(&self, vertex: &Self::Vertex) -> u32 {
        *vertex.data()
    }
}

pub fn build<G: Labelled>(labels: &[u32], edges: &[(usize, usize)]) -> Bundle<G> {
    let mut graph = G::default();
    let vertices: Vec<_> = labels.iter().map(|&l| graph.add_vertex(l)).collect();
    let edges = edges
        .iter()
        .map(|&(s, t)| graph.add_edge(&vertices[s], &vertices[t]))
        .collect();
    Bundle {
        graph,
        vertices,
        edges,
    }
}

/// 1 → 2 → 3 → 4 → 5 → 6 → 7
pub fn straight_line<G: Labelled>() -> Bundle<G> {
    build(
        &[1, 2, 3, 4, 5, 6, 7],
        &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6)],
    )
}

/// The straight line closed by 7 → 1.
pub fn looped<G: Labelled>() -> Bundle<G> {
    build(
        &[1, 2, 3, 4, 5, 6, 7],
        &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 0)],
    )
}

/// A → B, A → C, A → E, B → D, B → F, F → E and an isolated G.
pub fn wikipedia<G: Labelled>() -> Bundle<G> {
    build(
        &[1, 2, 3, 4, 5, 6, 7],
        &[(0, 1), (0, 2), (0, 4), (1, 3), (1, 5), (5, 4)],
    )
}

/// Two generations of divisions, the second child of each cell linked first.
pub fn lineage<G: Labelled>() -> Bundle<G> {
    build(
        &[1, 11, 12, 111, 112, 121, 122],
        &[(0, 2), (0, 1), (1, 4), (1, 3), (2, 6), (2, 5)],
    )
}

pub fn single_vertex<G: Labelled>() -> Bundle<G> {
    build(&[1], &[])
}

pub fn fork<G: Labelled>() -> Bundle<G> {
    build(&[1, 2, 3], &[(0, 1), (0, 2)])
}

/// Vertices 0..=28 as a star (0-6), a line (7-11), a single vertex (12), a
/// single edge (13-14), a cycle (15-19) and a butterfly centred on 20.
pub fn assorted_components<G: Labelled>() -> Bundle<G> {
    let labels: Vec<u32> = (0..29).collect();
    build(
        &labels,
        &[
            // star
            (0, 1),
            (1, 2),
            (2, 3),
            (2, 5),
            (3, 4),
            (5, 6),
            // line
            (7, 8),
            (8, 9),
            (9, 10),
            (10, 11),
            // single edge
            (13, 14),
            // cycle
            (15, 16),
            (16, 17),
            (17, 18),
            (18, 19),
            (19, 15),
            // butterfly
            (20, 21),
            (21, 22),
            (20, 23),
            (23, 24),
            (22, 24),
            (20, 25),
            (25, 26),
            (26, 27),
            (20, 28),
            (27, 28),
        ],
    )
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
