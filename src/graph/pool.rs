//! Slot storage with index cursors.
//!
//! Vertex and edge records live in slot vectors. Removing an element frees its
//! slot, and the most recently freed slot is handed out first on the next
//! insertion, so handles to removed elements may come to denote new ones.
//! Cursor borrows are counted per pool; [`PoolGraph::outstanding_vertex_refs`]
//! and [`PoolGraph::outstanding_edge_refs`] expose the counts so callers can
//! check that every borrowed cursor came back.

use std::{
    cell::{Cell, RefCell},
    iter::Enumerate,
    slice,
};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::{collection::RefSet, Assign, ContainerFactory, Graph, MutableGraph};

const UNBOUND: usize = usize::MAX;
const NO_EDGES: &[usize] = &[];

/// Index cursor into the vertex slots of a [`PoolGraph`].
///
/// Ordered by slot index, which is the natural order sorted traversals use.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolVertex {
    index: usize,
}

/// Index cursor into the edge slots of a [`PoolGraph`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolEdge {
    index: usize,
}

impl PoolVertex {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl PoolEdge {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Assign for PoolVertex {
    fn assign(&mut self, other: &Self) {
        self.index = other.index;
    }
}

impl Assign for PoolEdge {
    fn assign(&mut self, other: &Self) {
        self.index = other.index;
    }
}

#[derive(Clone, Debug)]
struct VertexRecord<T> {
    data: T,
    outgoing: Vec<usize>,
    incoming: Vec<usize>,
}

#[derive(Clone, Copy, Debug)]
struct EdgeRecord {
    source: usize,
    target: usize,
}

#[derive(Debug)]
struct CursorPool<C> {
    free: RefCell<Vec<C>>,
    borrowed: Cell<usize>,
}

impl<C> Default for CursorPool<C> {
    fn default() -> Self {
        CursorPool {
            free: RefCell::new(Vec::new()),
            borrowed: Cell::new(0),
        }
    }
}

impl<C> CursorPool<C> {
    fn take(&self, fresh: impl FnOnce() -> C) -> C {
        self.borrowed.set(self.borrowed.get() + 1);
        self.free.borrow_mut().pop().unwrap_or_else(fresh)
    }

    fn give_back(&self, cursor: C) {
        let borrowed = self.borrowed.get();
        assert!(
            borrowed > 0,
            "released more cursors than were borrowed from the pool"
        );
        self.borrowed.set(borrowed - 1);
        self.free.borrow_mut().push(cursor);
    }
}

/// A directed multigraph with slot storage and pooled index cursors.
///
/// Every vertex carries one value of type `T`.
#[derive(Debug)]
pub struct PoolGraph<T = ()> {
    vertices: Vec<Option<VertexRecord<T>>>,
    edges: Vec<Option<EdgeRecord>>,
    free_vertex_slots: Vec<usize>,
    free_edge_slots: Vec<usize>,
    vertex_count: usize,
    edge_count: usize,
    vertex_refs: CursorPool<PoolVertex>,
    edge_refs: CursorPool<PoolEdge>,
}

impl<T> Default for PoolGraph<T> {
    fn default() -> Self {
        PoolGraph::with_capacity(0, 0)
    }
}

impl<T> PoolGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        PoolGraph {
            vertices: Vec::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
            free_vertex_slots: Vec::new(),
            free_edge_slots: Vec::new(),
            vertex_count: 0,
            edge_count: 0,
            vertex_refs: CursorPool::default(),
            edge_refs: CursorPool::default(),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn data(&self, vertex: &PoolVertex) -> &T {
        &self.record(vertex.index).data
    }

    pub fn data_mut(&mut self, vertex: &PoolVertex) -> &mut T {
        match self.vertices.get_mut(vertex.index) {
            Some(Some(record)) => &mut record.data,
            _ => panic!("vertex {} is not in the graph", vertex.index),
        }
    }

    pub fn contains_vertex(&self, vertex: &PoolVertex) -> bool {
        matches!(self.vertices.get(vertex.index), Some(Some(_)))
    }

    pub fn contains_edge(&self, edge: &PoolEdge) -> bool {
        matches!(self.edges.get(edge.index), Some(Some(_)))
    }

    /// Number of vertex cursors borrowed and not yet released.
    pub fn outstanding_vertex_refs(&self) -> usize {
        self.vertex_refs.borrowed.get()
    }

    /// Number of edge cursors borrowed and not yet released.
    pub fn outstanding_edge_refs(&self) -> usize {
        self.edge_refs.borrowed.get()
    }

    fn record(&self, index: usize) -> &VertexRecord<T> {
        match self.vertices.get(index) {
            Some(Some(record)) => record,
            _ => panic!("vertex {index} is not in the graph"),
        }
    }

    fn record_mut(&mut self, index: usize) -> &mut VertexRecord<T> {
        match self.vertices.get_mut(index) {
            Some(Some(record)) => record,
            _ => panic!("vertex {index} is not in the graph"),
        }
    }

    fn edge_record(&self, index: usize) -> EdgeRecord {
        match self.edges.get(index) {
            Some(Some(record)) => *record,
            _ => panic!("edge {index} is not in the graph"),
        }
    }
}

impl PoolGraph<()> {
    /// Creates a random graph with the given number of vertices and edges.
    ///
    /// Endpoints are drawn uniformly, so the result may contain cycles,
    /// self-loops and parallel edges.
    pub fn random(vertices: usize, edges: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut graph = PoolGraph::with_capacity(vertices, edges);
        let handles: Vec<_> = (0..vertices).map(|_| graph.add_vertex(())).collect();
        if handles.is_empty() {
            return graph;
        }
        for _ in 0..edges {
            let source = &handles[rng.gen_range(0..handles.len())];
            let target = &handles[rng.gen_range(0..handles.len())];
            graph.add_edge(source, target);
        }
        graph
    }

    /// Creates a random forest of lineage trees: every vertex but the first
    /// `roots` gets one parent among the vertices created before it, and
    /// with probability `divide` a second child is attached to the same parent.
    pub fn random_lineage(vertices: usize, roots: usize, divide: f64, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut graph = PoolGraph::with_capacity(vertices, vertices);
        if vertices == 0 {
            return graph;
        }
        let mut leaves: Vec<PoolVertex> = (0..roots.clamp(1, vertices))
            .map(|_| graph.add_vertex(()))
            .collect();
        while graph.vertex_count() < vertices {
            let at = rng.gen_range(0..leaves.len());
            let parent = leaves.swap_remove(at);
            let child = graph.add_vertex(());
            graph.add_edge(&parent, &child);
            leaves.push(child);
            if graph.vertex_count() < vertices && rng.gen_bool(divide) {
                let sibling = graph.add_vertex(());
                graph.add_edge(&parent, &sibling);
                leaves.push(sibling);
            }
        }
        graph
    }
}

pub struct PoolVertices<'a, T> {
    slots: Enumerate<slice::Iter<'a, Option<VertexRecord<T>>>>,
}

impl<T> Iterator for PoolVertices<'_, T> {
    type Item = PoolVertex;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .find(|(_, slot)| slot.is_some())
            .map(|(index, _)| PoolVertex { index })
    }
}

/// Edge indices of one vertex: the outgoing list, then the incoming list.
#[derive(Clone)]
pub struct PoolEdges<'a> {
    first: slice::Iter<'a, usize>,
    second: slice::Iter<'a, usize>,
}

impl Iterator for PoolEdges<'_> {
    type Item = PoolEdge;

    fn next(&mut self) -> Option<Self::Item> {
        self.first
            .next()
            .or_else(|| self.second.next())
            .map(|&index| PoolEdge { index })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.first.len() + self.second.len();
        (len, Some(len))
    }
}

impl<T> Graph for PoolGraph<T> {
    type Vertex = PoolVertex;
    type Edge = PoolEdge;
    type Vertices<'a>
        = PoolVertices<'a, T>
    where
        Self: 'a;
    type Edges<'a>
        = PoolEdges<'a>
    where
        Self: 'a;

    fn vertex_ref(&self) -> PoolVertex {
        self.vertex_refs.take(|| PoolVertex { index: UNBOUND })
    }

    fn release_vertex_ref(&self, vertex: PoolVertex) {
        self.vertex_refs.give_back(vertex);
    }

    fn edge_ref(&self) -> PoolEdge {
        self.edge_refs.take(|| PoolEdge { index: UNBOUND })
    }

    fn release_edge_ref(&self, edge: PoolEdge) {
        self.edge_refs.give_back(edge);
    }

    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn vertices(&self) -> PoolVertices<'_, T> {
        PoolVertices {
            slots: self.vertices.iter().enumerate(),
        }
    }

    fn outgoing_edges(&self, vertex: &PoolVertex) -> PoolEdges<'_> {
        PoolEdges {
            first: self.record(vertex.index).outgoing.iter(),
            second: NO_EDGES.iter(),
        }
    }

    fn incoming_edges(&self, vertex: &PoolVertex) -> PoolEdges<'_> {
        PoolEdges {
            first: self.record(vertex.index).incoming.iter(),
            second: NO_EDGES.iter(),
        }
    }

    fn edges(&self, vertex: &PoolVertex) -> PoolEdges<'_> {
        let record = self.record(vertex.index);
        PoolEdges {
            first: record.outgoing.iter(),
            second: record.incoming.iter(),
        }
    }

    fn source<'r>(&self, edge: &PoolEdge, into: &'r mut PoolVertex) -> &'r mut PoolVertex {
        into.index = self.edge_record(edge.index).source;
        into
    }

    fn target<'r>(&self, edge: &PoolEdge, into: &'r mut PoolVertex) -> &'r mut PoolVertex {
        into.index = self.edge_record(edge.index).target;
        into
    }

    fn has_incoming_edges(&self, vertex: &PoolVertex) -> bool {
        !self.record(vertex.index).incoming.is_empty()
    }
}

impl<T> ContainerFactory for PoolGraph<T> {
    fn create_vertex_set(&self) -> RefSet<PoolVertex> {
        self.create_vertex_set_with_capacity(self.vertex_count.min(64))
    }
}

fn remove_first(list: &mut Vec<usize>, value: usize) {
    if let Some(at) = list.iter().position(|&i| i == value) {
        list.remove(at);
    }
}

impl<T> MutableGraph for PoolGraph<T> {
    type VertexData = T;

    fn add_vertex(&mut self, data: T) -> PoolVertex {
        let record = VertexRecord {
            data,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        };
        let index = match self.free_vertex_slots.pop() {
            Some(index) => {
                self.vertices[index] = Some(record);
                index
            }
            None => {
                self.vertices.push(Some(record));
                self.vertices.len() - 1
            }
        };
        self.vertex_count += 1;
        PoolVertex { index }
    }

    fn add_edge(&mut self, source: &PoolVertex, target: &PoolVertex) -> PoolEdge {
        let record = EdgeRecord {
            source: source.index,
            target: target.index,
        };
        // both endpoints must exist before the slot is taken
        self.record(record.source);
        self.record(record.target);
        let index = match self.free_edge_slots.pop() {
            Some(index) => {
                self.edges[index] = Some(record);
                index
            }
            None => {
                self.edges.push(Some(record));
                self.edges.len() - 1
            }
        };
        self.record_mut(record.source).outgoing.push(index);
        self.record_mut(record.target).incoming.push(index);
        self.edge_count += 1;
        PoolEdge { index }
    }

    fn remove_edge(&mut self, edge: &PoolEdge) {
        let record = self.edge_record(edge.index);
        remove_first(&mut self.record_mut(record.source).outgoing, edge.index);
        remove_first(&mut self.record_mut(record.target).incoming, edge.index);
        self.edges[edge.index] = None;
        self.free_edge_slots.push(edge.index);
        self.edge_count -= 1;
    }

    fn remove_vertex(&mut self, vertex: &PoolVertex) {
        let record = self.record(vertex.index);
        let mut incident: Vec<usize> = record
            .outgoing
            .iter()
            .chain(record.incoming.iter())
            .copied()
            .collect();
        incident.sort_unstable();
        incident.dedup();
        for index in incident {
            self.remove_edge(&PoolEdge { index });
        }
        self.vertices[vertex.index] = None;
        self.free_vertex_slots.push(vertex.index);
        self.vertex_count -= 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cursor_accounting() {
        let mut graph = PoolGraph::new();
        let a = graph.add_vertex('a');
        let b = graph.add_vertex('b');
        let e = graph.add_edge(&a, &b);

        let mut v = graph.vertex_ref();
        let w = graph.vertex_ref();
        assert_eq!(graph.outstanding_vertex_refs(), 2);
        assert_eq!(*graph.data(graph.target(&e, &mut v)), 'b');
        graph.release_vertex_ref(v);
        graph.release_vertex_ref(w);
        assert_eq!(graph.outstanding_vertex_refs(), 0);

        {
            let mut guard = graph.borrow_vertex();
            guard.assign(&a);
            assert_eq!(*guard, a);
            assert_eq!(graph.outstanding_vertex_refs(), 1);
        }
        assert_eq!(graph.outstanding_vertex_refs(), 0);
    }

    #[test]
    #[should_panic(expected = "released more cursors than were borrowed")]
    fn over_release_panics() {
        let graph = PoolGraph::<()>::new();
        let v = graph.vertex_ref();
        graph.release_vertex_ref(v.clone());
        graph.release_vertex_ref(v);
    }

    #[test]
    fn edge_order_and_removal() {
        let mut graph = PoolGraph::new();
        let a = graph.add_vertex(0);
        let b = graph.add_vertex(1);
        let c = graph.add_vertex(2);
        let ab = graph.add_edge(&a, &b);
        let ac = graph.add_edge(&a, &c);
        let ca = graph.add_edge(&c, &a);

        assert_eq!(graph.outgoing_edges(&a).collect::<Vec<_>>(), [ab.clone(), ac.clone()]);
        assert_eq!(graph.edges(&a).collect::<Vec<_>>(), [ab.clone(), ac.clone(), ca.clone()]);
        assert!(graph.has_incoming_edges(&a));

        graph.remove_vertex(&c);
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(!graph.contains_edge(&ac));
        assert!(!graph.contains_edge(&ca));
        assert!(!graph.has_incoming_edges(&a));
        assert_eq!(graph.vertices().collect::<Vec<_>>(), [a.clone(), b]);

        // the freed slot is reused first
        let d = graph.add_vertex(3);
        assert_eq!(d, c);
        assert_eq!(*graph.data(&d), 3);
    }

    #[test]
    fn self_loop_is_listed_twice() {
        let mut graph = PoolGraph::new();
        let a = graph.add_vertex(());
        let aa = graph.add_edge(&a, &a);
        assert_eq!(graph.edges(&a).collect::<Vec<_>>(), [aa.clone(), aa]);
        graph.remove_vertex(&a);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn random_lineage_is_a_forest() {
        let graph = PoolGraph::random_lineage(500, 3, 0.3, 7);
        assert_eq!(graph.vertex_count(), 500);
        assert_eq!(graph.edge_count(), 497);
        let roots = graph.vertices().filter(|v| !graph.has_incoming_edges(v)).count();
        assert_eq!(roots, 3);
        assert!(graph
            .vertices()
            .all(|v| graph.incoming_edges(&v).count() <= 1));
    }
}
