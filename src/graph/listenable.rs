//! Change notification for mutable graphs.
//!
//! [`ListenableGraph`] wraps a [`MutableGraph`] and records every structural
//! mutation into a [`GraphChange`]. Mutations made between
//! [`ListenableGraph::begin_update`] and [`ListenableGraph::end_update`] are
//! delivered to the registered [`GraphListener`]s as one batch; mutations made
//! outside an update are delivered immediately, one per batch.
//!
//! Every listener sees every batch. If some of them fail, the mutation
//! reports the first error once all of them have been called.

use std::{
    cell::RefCell,
    ops::Deref,
    rc::{Rc, Weak},
};

use itertools::Itertools;
use tracing::{debug, warn};

use super::{Graph, MutableGraph};
use crate::error::Error;

/// An edge that is no longer in the graph, with the endpoints it had.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemovedEdge<V, E> {
    pub edge: E,
    pub source: V,
    pub target: V,
}

/// One batch of structural mutations.
///
/// An element added and removed again within the same batch appears in
/// neither list, so every element of [`GraphChange::edges_added`] is still in
/// the graph when the batch is delivered.
pub struct GraphChange<G: Graph> {
    vertices_added: Vec<G::Vertex>,
    vertices_removed: Vec<G::Vertex>,
    edges_added: Vec<G::Edge>,
    edges_removed: Vec<RemovedEdge<G::Vertex, G::Edge>>,
}

impl<G: Graph> Default for GraphChange<G> {
    fn default() -> Self {
        GraphChange {
            vertices_added: Vec::new(),
            vertices_removed: Vec::new(),
            edges_added: Vec::new(),
            edges_removed: Vec::new(),
        }
    }
}

impl<G: Graph> std::fmt::Debug for GraphChange<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphChange")
            .field("vertices_added", &self.vertices_added)
            .field("vertices_removed", &self.vertices_removed)
            .field("edges_added", &self.edges_added)
            .field("edges_removed", &self.edges_removed)
            .finish()
    }
}

impl<G: Graph> GraphChange<G> {
    pub fn vertices_added(&self) -> &[G::Vertex] {
        &self.vertices_added
    }

    pub fn vertices_removed(&self) -> &[G::Vertex] {
        &self.vertices_removed
    }

    pub fn edges_added(&self) -> &[G::Edge] {
        &self.edges_added
    }

    pub fn edges_removed(&self) -> &[RemovedEdge<G::Vertex, G::Edge>] {
        &self.edges_removed
    }

    pub fn is_empty(&self) -> bool {
        self.vertices_added.is_empty()
            && self.vertices_removed.is_empty()
            && self.edges_added.is_empty()
            && self.edges_removed.is_empty()
    }

    pub fn add_vertex(&mut self, vertex: G::Vertex) {
        self.vertices_added.push(vertex);
    }

    pub fn remove_vertex(&mut self, vertex: G::Vertex) {
        match self.vertices_added.iter().position(|v| *v == vertex) {
            Some(at) => {
                self.vertices_added.remove(at);
            }
            None => self.vertices_removed.push(vertex),
        }
    }

    pub fn add_edge(&mut self, edge: G::Edge) {
        self.edges_added.push(edge);
    }

    pub fn remove_edge(&mut self, edge: G::Edge, source: G::Vertex, target: G::Vertex) {
        match self.edges_added.iter().position(|e| *e == edge) {
            Some(at) => {
                self.edges_added.remove(at);
            }
            None => self.edges_removed.push(RemovedEdge {
                edge,
                source,
                target,
            }),
        }
    }
}

/// Observer of structural graph changes.
pub trait GraphListener<G: Graph> {
    /// Called once per batch, after the batch has been applied to `graph`.
    fn graph_changed(&mut self, graph: &G, change: &GraphChange<G>) -> Result<(), Error>;
}

/// A [`MutableGraph`] that notifies listeners about its mutations.
///
/// Read access goes through [`Deref`] to the wrapped graph.
pub struct ListenableGraph<G: MutableGraph> {
    graph: G,
    listeners: Vec<Weak<RefCell<dyn GraphListener<G>>>>,
    pending: GraphChange<G>,
    depth: usize,
}

impl<G: MutableGraph> Deref for ListenableGraph<G> {
    type Target = G;

    fn deref(&self) -> &G {
        &self.graph
    }
}

impl<G: MutableGraph> ListenableGraph<G> {
    pub fn new(graph: G) -> Self {
        ListenableGraph {
            graph,
            listeners: Vec::new(),
            pending: GraphChange::default(),
            depth: 0,
        }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn into_inner(self) -> G {
        self.graph
    }

    /// Registers `listener` without taking ownership of it. Listeners that
    /// have been dropped are forgotten at the next delivery.
    pub fn add_graph_listener<L>(&mut self, listener: &Rc<RefCell<L>>)
    where
        L: GraphListener<G> + 'static,
        G: 'static,
    {
        let listener: Rc<RefCell<dyn GraphListener<G>>> = listener.clone();
        self.listeners.push(Rc::downgrade(&listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.strong_count() > 0)
            .count()
    }

    /// Starts recording a batch. Updates nest; only the outermost
    /// [`end_update`](Self::end_update) delivers.
    pub fn begin_update(&mut self) {
        self.depth += 1;
    }

    pub fn end_update(&mut self) -> Result<(), Error> {
        assert!(self.depth > 0, "end_update without matching begin_update");
        self.depth -= 1;
        self.flush()
    }

    pub fn add_vertex(&mut self, data: G::VertexData) -> Result<G::Vertex, Error> {
        let vertex = self.graph.add_vertex(data);
        self.pending.add_vertex(vertex.clone());
        self.flush()?;
        Ok(vertex)
    }

    pub fn add_edge(&mut self, source: &G::Vertex, target: &G::Vertex) -> Result<G::Edge, Error> {
        let edge = self.graph.add_edge(source, target);
        self.pending.add_edge(edge.clone());
        self.flush()?;
        Ok(edge)
    }

    pub fn remove_edge(&mut self, edge: &G::Edge) -> Result<(), Error> {
        self.record_edge_removal(edge);
        self.graph.remove_edge(edge);
        self.flush()
    }

    /// Removes `vertex` and its incident edges; the edge removals are part
    /// of the same batch as the vertex removal.
    pub fn remove_vertex(&mut self, vertex: &G::Vertex) -> Result<(), Error> {
        let incident = self.graph.edges(vertex).unique().collect_vec();
        for edge in &incident {
            self.record_edge_removal(edge);
        }
        self.graph.remove_vertex(vertex);
        self.pending.remove_vertex(vertex.clone());
        self.flush()
    }

    fn record_edge_removal(&mut self, edge: &G::Edge) {
        let mut endpoint = self.graph.borrow_vertex();
        let source = self.graph.source(edge, &mut *endpoint).clone();
        let target = self.graph.target(edge, &mut *endpoint).clone();
        drop(endpoint);
        self.pending.remove_edge(edge.clone(), source, target);
    }

    fn flush(&mut self) -> Result<(), Error> {
        if self.depth > 0 || self.pending.is_empty() {
            return Ok(());
        }
        let change = std::mem::take(&mut self.pending);
        self.listeners.retain(|l| l.strong_count() > 0);
        debug!(
            vertices_added = change.vertices_added.len(),
            vertices_removed = change.vertices_removed.len(),
            edges_added = change.edges_added.len(),
            edges_removed = change.edges_removed.len(),
            listeners = self.listeners.len(),
            "delivering graph change"
        );
        let mut outcome = Ok(());
        for listener in self.listeners.iter().filter_map(Weak::upgrade) {
            let delivered = listener.borrow_mut().graph_changed(&self.graph, &change);
            if let Err(err) = delivered {
                warn!(%err, "graph listener failed");
                if outcome.is_ok() {
                    outcome = Err(err);
                }
            }
        }
        outcome
    }
}
