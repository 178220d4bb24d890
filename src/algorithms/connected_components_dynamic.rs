//! # Incremental Connected Components
//!
//! [`ConnectedComponentsDynamic`] computes the connected components of a graph
//! once and then keeps them up to date from the [`GraphChange`] batches of a
//! [`ListenableGraph`]:
//!
//! - an added edge creates, grows or merges components,
//! - a removed edge triggers a breadth-first probe from one endpoint that
//!   stops as soon as the other endpoint is met; only if it is not met is the
//!   component split,
//! - a removed vertex leaves its component, and the removals of its incident
//!   edges (always in the same batch) repair connectivity.
//!
//! Components with fewer than [`MINIMAL_SIZE`] vertices are not tracked.
//! Ids are recycled, most recently freed first.

use std::{cell::RefCell, fmt, ops::ControlFlow, rc::Rc};

use tracing::{debug, trace, warn};

use super::{
    connected_components::ConnectedComponents,
    search::{BreadthFirstSearch, EdgeClass, SearchListener},
};
use crate::{
    error::Error,
    graph::{
        collection::{RefMap, RefSet},
        listenable::{GraphChange, GraphListener, ListenableGraph},
        ContainerFactory, Direction, Graph, MutableGraph,
    },
};

/// Smallest component that is tracked.
pub const MINIMAL_SIZE: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u32);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct IdPool {
    available: Vec<ComponentId>,
    next: u32,
    limit: u32,
}

impl IdPool {
    fn new(limit: u32) -> Self {
        IdPool {
            available: Vec::new(),
            next: 0,
            limit,
        }
    }

    fn acquire(&mut self) -> Result<ComponentId, Error> {
        if let Some(id) = self.available.pop() {
            return Ok(id);
        }
        if self.next >= self.limit {
            warn!(limit = self.limit, "component id space exhausted");
            return Err(Error::ComponentIdsExhausted { limit: self.limit });
        }
        let id = ComponentId(self.next);
        self.next += 1;
        Ok(id)
    }

    /// Takes `count` ids at once, or none if not all of them are available.
    fn acquire_many(&mut self, count: usize) -> Result<Vec<ComponentId>, Error> {
        let spare = self.available.len() + (self.limit - self.next) as usize;
        if count > spare {
            warn!(limit = self.limit, count, "component id space exhausted");
            return Err(Error::ComponentIdsExhausted { limit: self.limit });
        }
        (0..count).map(|_| self.acquire()).collect()
    }

    fn release(&mut self, id: ComponentId) {
        self.available.push(id);
    }
}

struct Until<'a, V> {
    target: Option<&'a V>,
}

impl<G: Graph> SearchListener<G> for Until<'_, G::Vertex> {
    fn process_vertex_early(&mut self, vertex: &G::Vertex, _depth: usize) -> ControlFlow<()> {
        if self.target == Some(vertex) {
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    fn process_edge(
        &mut self,
        _edge: &G::Edge,
        _from: &G::Vertex,
        to: &G::Vertex,
        _class: EdgeClass,
    ) -> ControlFlow<()> {
        if self.target == Some(to) {
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}

/// Vertices reachable from `from` along edges of either direction. With a
/// `target` the probe stops as soon as it is reached.
fn reach<G: ContainerFactory>(
    graph: &G,
    from: &G::Vertex,
    target: Option<&G::Vertex>,
) -> RefSet<G::Vertex> {
    let mut search = BreadthFirstSearch::new(graph, Direction::Undirected);
    search.start(from, &mut Until { target });
    let mut reached = graph.create_vertex_set();
    reached.extend(search.discovered().cloned());
    reached
}

/// Connected components kept in sync with a changing graph.
pub struct ConnectedComponentsDynamic<G: ContainerFactory> {
    components: RefMap<ComponentId, RefSet<G::Vertex>>,
    membership: RefMap<G::Vertex, ComponentId>,
    ids: IdPool,
}

impl<G: ContainerFactory> fmt::Debug for ConnectedComponentsDynamic<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.components.iter()).finish()
    }
}

impl<G: ContainerFactory> ConnectedComponentsDynamic<G> {
    pub fn new(graph: &G) -> Result<Self, Error> {
        Self::with_id_limit(graph, u32::MAX)
    }

    /// Like [`new`](Self::new), but at most `limit` ids can be live at once.
    pub fn with_id_limit(graph: &G, limit: u32) -> Result<Self, Error> {
        let mut this = ConnectedComponentsDynamic {
            components: RefMap::default(),
            membership: graph.create_vertex_map_with_capacity(graph.vertex_count()),
            ids: IdPool::new(limit),
        };
        for members in ConnectedComponents::new(graph)
            .minimal_size(MINIMAL_SIZE)
            .get()
        {
            this.settle(members, None)?;
        }
        debug!(
            components = this.components.len(),
            "tracking connected components"
        );
        Ok(this)
    }

    /// Builds the components of `graph` and registers them as its listener.
    pub fn attach(graph: &mut ListenableGraph<G>) -> Result<Rc<RefCell<Self>>, Error>
    where
        G: MutableGraph + 'static,
    {
        let this = Rc::new(RefCell::new(Self::new(graph.graph())?));
        graph.add_graph_listener(&this);
        Ok(this)
    }

    /// Ids of the live components.
    pub fn ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn size(&self, id: ComponentId) -> Option<usize> {
        self.components.get(&id).map(|c| c.len())
    }

    pub fn get(&self, id: ComponentId) -> Option<&RefSet<G::Vertex>> {
        self.components.get(&id)
    }

    pub fn component_of(&self, vertex: &G::Vertex) -> Option<ComponentId> {
        self.membership.get(vertex).copied()
    }

    /// Stores `members` under `id`, or under a fresh id if none is given.
    /// Too small a set is not stored and `id` is freed.
    fn settle(
        &mut self,
        members: RefSet<G::Vertex>,
        id: Option<ComponentId>,
    ) -> Result<(), Error> {
        if members.len() < MINIMAL_SIZE {
            self.dissolve(&members, id);
            return Ok(());
        }
        let id = match id {
            Some(id) => id,
            None => self.ids.acquire()?,
        };
        self.place(members, Some(id));
        Ok(())
    }

    /// Stores `members` under `id`. Without an id the members are only
    /// unassigned.
    fn place(&mut self, members: RefSet<G::Vertex>, id: Option<ComponentId>) {
        let Some(id) = id else {
            self.dissolve(&members, None);
            return;
        };
        for vertex in &members {
            self.membership.insert(vertex.clone(), id);
        }
        self.components.insert(id, members);
    }

    fn unassign(&mut self, vertex: &G::Vertex) {
        let Some(id) = self.membership.swap_remove(vertex) else {
            return;
        };
        let Some(members) = self.components.get_mut(&id) else {
            return;
        };
        members.swap_remove(vertex);
        if members.len() < MINIMAL_SIZE {
            if let Some(members) = self.components.swap_remove(&id) {
                self.dissolve(&members, Some(id));
            }
        }
    }

    fn dissolve(&mut self, members: &RefSet<G::Vertex>, id: Option<ComponentId>) {
        for vertex in members {
            self.membership.swap_remove(vertex);
        }
        if let Some(id) = id {
            debug!(%id, "component dropped");
            self.ids.release(id);
        }
    }

    fn edge_added(&mut self, source: &G::Vertex, target: &G::Vertex) -> Result<(), Error> {
        if source == target {
            return Ok(());
        }
        match (self.component_of(source), self.component_of(target)) {
            (None, None) => {
                let mut members = RefSet::default();
                members.insert(source.clone());
                members.insert(target.clone());
                self.settle(members, None)?;
                trace!(?source, ?target, "new component");
            }
            (Some(id), None) => self.absorb(id, target),
            (None, Some(id)) => self.absorb(id, source),
            (Some(a), Some(b)) if a == b => {}
            (Some(a), Some(b)) => self.merge(a, b),
        }
        Ok(())
    }

    fn absorb(&mut self, id: ComponentId, vertex: &G::Vertex) {
        trace!(%id, ?vertex, "vertex joins component");
        if let Some(members) = self.components.get_mut(&id) {
            members.insert(vertex.clone());
            self.membership.insert(vertex.clone(), id);
        }
    }

    /// The larger component absorbs the smaller; on a tie the lower id
    /// survives.
    fn merge(&mut self, a: ComponentId, b: ComponentId) {
        let (size_a, size_b) = (self.size(a).unwrap_or(0), self.size(b).unwrap_or(0));
        let (keep, lose) = if size_a > size_b || (size_a == size_b && a < b) {
            (a, b)
        } else {
            (b, a)
        };
        let Some(moved) = self.components.swap_remove(&lose) else {
            return;
        };
        debug!(%keep, %lose, moved = moved.len(), "components merged");
        for vertex in &moved {
            self.membership.insert(vertex.clone(), keep);
        }
        if let Some(members) = self.components.get_mut(&keep) {
            members.extend(moved);
        }
        self.ids.release(lose);
    }

    fn edge_removed(
        &mut self,
        graph: &G,
        source: &G::Vertex,
        target: &G::Vertex,
    ) -> Result<(), Error> {
        match (self.component_of(source), self.component_of(target)) {
            (Some(a), Some(b)) if a == b => {
                let reached = reach(graph, source, Some(target));
                if reached.contains(target) {
                    trace!(?source, ?target, "still connected");
                    return Ok(());
                }
                self.split(graph, a, reached, Some(target))
            }
            _ => {
                for endpoint in [source, target] {
                    if let Some(id) = self.component_of(endpoint) {
                        trace!(%id, vertex = ?endpoint, "probing component");
                        let reached = reach(graph, endpoint, None);
                        self.split(graph, id, reached, None)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Splits `detached` off component `id` and partitions what is left
    /// into its connected pieces. The first piece large enough to be kept,
    /// grown from `seed` if it is still a member, keeps `id`.
    ///
    /// Every fresh id is taken before the component is touched, so running
    /// out of ids leaves it as it was.
    fn split(
        &mut self,
        graph: &G,
        id: ComponentId,
        detached: RefSet<G::Vertex>,
        seed: Option<&G::Vertex>,
    ) -> Result<(), Error> {
        let Some(members) = self.components.get(&id) else {
            return Ok(());
        };
        let (detached, mut rest): (RefSet<G::Vertex>, RefSet<G::Vertex>) =
            members.iter().cloned().partition(|v| detached.contains(v));
        if rest.is_empty() {
            return Ok(());
        }

        let mut pieces = Vec::new();
        let mut seed = seed.filter(|s| rest.contains(*s)).cloned();
        while let Some(from) = seed.take().or_else(|| rest.first().cloned()) {
            let piece: RefSet<G::Vertex> = reach(graph, &from, None)
                .into_iter()
                .filter(|v| rest.contains(v))
                .collect();
            rest.retain(|v| !piece.contains(v));
            pieces.push(piece);
        }

        let kept = |members: &RefSet<G::Vertex>| members.len() >= MINIMAL_SIZE;
        let needed = usize::from(kept(&detached))
            + pieces.iter().filter(|p| kept(*p)).count().saturating_sub(1);
        let mut fresh = self.ids.acquire_many(needed)?.into_iter();

        debug!(%id, detached = detached.len(), pieces = pieces.len(), "component split");
        self.components.swap_remove(&id);
        let detached_id = if kept(&detached) { fresh.next() } else { None };
        self.place(detached, detached_id);
        let mut keep = Some(id);
        for piece in pieces {
            let piece_id = if kept(&piece) {
                keep.take().or_else(|| fresh.next())
            } else {
                None
            };
            self.place(piece, piece_id);
        }
        if let Some(id) = keep {
            debug!(%id, "component dropped");
            self.ids.release(id);
        }
        Ok(())
    }
}

impl<G: ContainerFactory> GraphListener<G> for ConnectedComponentsDynamic<G> {
    fn graph_changed(&mut self, graph: &G, change: &GraphChange<G>) -> Result<(), Error> {
        for vertex in change.vertices_removed() {
            self.unassign(vertex);
        }
        let mut endpoint = graph.borrow_vertex();
        for edge in change.edges_added() {
            let source = graph.source(edge, &mut *endpoint).clone();
            let target = graph.target(edge, &mut *endpoint).clone();
            self.edge_added(&source, &target)?;
        }
        drop(endpoint);
        for removed in change.edges_removed() {
            self.edge_removed(graph, &removed.source, &removed.target)?;
        }
        trace!(components = self.components.len(), "graph change applied");
        Ok(())
    }
}

#[cfg(test)]
mod test;
