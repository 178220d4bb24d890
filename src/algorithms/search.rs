//! Breadth-first and depth-first searches that report to a [`SearchListener`].
//!
//! Unlike the iterators, a search classifies every edge it traverses and can
//! be stopped by the listener. A search object keeps its containers between
//! runs; [`BreadthFirstSearch::start`] and [`DepthFirstSearch::start`] clear
//! them, so one object can serve many searches on the same graph.

use std::ops::ControlFlow;

use crate::graph::{
    collection::{RefDeque, RefMap},
    ContainerFactory, Direction, Graph, PooledVertex,
};

/// Role of a traversed edge in the search tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeClass {
    /// The edge discovered its far end.
    Tree,
    /// The far end is an ancestor of the near end.
    Back,
    /// The far end is a finished descendant of the near end.
    Forward,
    /// Any other edge.
    Cross,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Completed,
    Aborted,
}

impl SearchOutcome {
    pub fn is_aborted(self) -> bool {
        self == SearchOutcome::Aborted
    }
}

/// Hooks called by a search. Returning [`ControlFlow::Break`] from any of
/// them ends the search.
pub trait SearchListener<G: Graph> {
    /// A vertex is about to be expanded. `depth` is its depth in the search tree.
    fn process_vertex_early(&mut self, _vertex: &G::Vertex, _depth: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn process_edge(
        &mut self,
        _edge: &G::Edge,
        _from: &G::Vertex,
        _to: &G::Vertex,
        _class: EdgeClass,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// All edges of the vertex have been processed.
    fn process_vertex_late(&mut self, _vertex: &G::Vertex, _depth: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl<G: Graph> SearchListener<G> for () {}

struct Visit<V> {
    depth: usize,
    parent: Option<V>,
    processed: bool,
}

fn is_ancestor<V: Eq + std::hash::Hash>(
    visits: &RefMap<V, Visit<V>>,
    ancestor: &V,
    of: &V,
) -> bool {
    let mut current = Some(of);
    while let Some(vertex) = current {
        if vertex == ancestor {
            return true;
        }
        current = visits.get(vertex).and_then(|v| v.parent.as_ref());
    }
    false
}

/// Breadth-first search. Directed runs classify non-tree edges as
/// [`EdgeClass::Back`] or [`EdgeClass::Cross`]; undirected runs report each
/// non-tree edge once, as [`EdgeClass::Cross`].
pub struct BreadthFirstSearch<'g, G: ContainerFactory> {
    graph: &'g G,
    direction: Direction,
    visits: RefMap<G::Vertex, Visit<G::Vertex>>,
    queue: RefDeque<G::Vertex>,
    neighbor: PooledVertex<'g, G>,
}

impl<'g, G: ContainerFactory> BreadthFirstSearch<'g, G> {
    pub fn new(graph: &'g G, direction: Direction) -> Self {
        BreadthFirstSearch {
            graph,
            direction,
            visits: graph.create_vertex_map(),
            queue: graph.create_vertex_deque(),
            neighbor: graph.borrow_vertex(),
        }
    }

    pub fn start<L>(&mut self, root: &G::Vertex, listener: &mut L) -> SearchOutcome
    where
        L: SearchListener<G> + ?Sized,
    {
        let graph = self.graph;
        let direction = self.direction;
        self.visits.clear();
        self.queue.clear();
        self.visits.insert(
            root.clone(),
            Visit {
                depth: 0,
                parent: None,
                processed: false,
            },
        );
        self.queue.push_back(root.clone());

        while let Some(vertex) = self.queue.pop_front() {
            let depth = self.visits.get(&vertex).map_or(0, |v| v.depth);
            if listener.process_vertex_early(&vertex, depth).is_break() {
                return SearchOutcome::Aborted;
            }
            for edge in direction.edges(graph, &vertex) {
                let to = direction.neighbor(graph, &edge, &vertex, &mut *self.neighbor);
                let class = match self.visits.get(&*to) {
                    None => {
                        self.visits.insert(
                            to.clone(),
                            Visit {
                                depth: depth + 1,
                                parent: Some(vertex.clone()),
                                processed: false,
                            },
                        );
                        self.queue.push_back(to.clone());
                        EdgeClass::Tree
                    }
                    Some(visit) if direction == Direction::Undirected => {
                        if visit.processed {
                            continue;
                        }
                        EdgeClass::Cross
                    }
                    Some(_) if is_ancestor(&self.visits, to, &vertex) => EdgeClass::Back,
                    Some(_) => EdgeClass::Cross,
                };
                if listener.process_edge(&edge, &vertex, to, class).is_break() {
                    return SearchOutcome::Aborted;
                }
            }
            if let Some(visit) = self.visits.get_mut(&vertex) {
                visit.processed = true;
            }
            if listener.process_vertex_late(&vertex, depth).is_break() {
                return SearchOutcome::Aborted;
            }
        }
        SearchOutcome::Completed
    }

    pub fn is_discovered(&self, vertex: &G::Vertex) -> bool {
        self.visits.contains_key(vertex)
    }

    /// Vertices discovered by the last run, in discovery order.
    pub fn discovered(&self) -> impl Iterator<Item = &G::Vertex> + '_ {
        self.visits.keys()
    }

    pub fn depth(&self, vertex: &G::Vertex) -> Option<usize> {
        self.visits.get(vertex).map(|v| v.depth)
    }

    /// The vertex `vertex` was discovered from in the last run.
    pub fn parent(&self, vertex: &G::Vertex) -> Option<&G::Vertex> {
        self.visits.get(vertex).and_then(|v| v.parent.as_ref())
    }
}

struct DfsVisit {
    entry: usize,
    processed: bool,
}

struct Frame<'g, G: Graph + 'g> {
    vertex: G::Vertex,
    edges: G::Edges<'g>,
    via: Option<G::Edge>,
}

/// Depth-first search on an explicit stack.
///
/// Directed runs report [`EdgeClass::Tree`], [`EdgeClass::Back`],
/// [`EdgeClass::Forward`] and [`EdgeClass::Cross`] edges. Undirected runs only
/// report tree and back edges; the tree edge is not reported a second time
/// from the child.
pub struct DepthFirstSearch<'g, G: ContainerFactory> {
    graph: &'g G,
    direction: Direction,
    visits: RefMap<G::Vertex, DfsVisit>,
    stack: Vec<Frame<'g, G>>,
    neighbor: PooledVertex<'g, G>,
    time: usize,
}

impl<'g, G: ContainerFactory> DepthFirstSearch<'g, G> {
    pub fn new(graph: &'g G, direction: Direction) -> Self {
        DepthFirstSearch {
            graph,
            direction,
            visits: graph.create_vertex_map(),
            stack: Vec::new(),
            neighbor: graph.borrow_vertex(),
            time: 0,
        }
    }

    pub fn start<L>(&mut self, root: &G::Vertex, listener: &mut L) -> SearchOutcome
    where
        L: SearchListener<G> + ?Sized,
    {
        let graph = self.graph;
        let direction = self.direction;
        self.visits.clear();
        self.stack.clear();
        self.time = 0;

        self.visits.insert(
            root.clone(),
            DfsVisit {
                entry: 0,
                processed: false,
            },
        );
        if listener.process_vertex_early(root, 0).is_break() {
            return SearchOutcome::Aborted;
        }
        self.stack.push(Frame {
            vertex: root.clone(),
            edges: direction.edges(graph, root),
            via: None,
        });

        while let Some(frame) = self.stack.last_mut() {
            let Some(edge) = frame.edges.next() else {
                if let Some(done) = self.stack.pop() {
                    if let Some(visit) = self.visits.get_mut(&done.vertex) {
                        visit.processed = true;
                    }
                    if listener
                        .process_vertex_late(&done.vertex, self.stack.len())
                        .is_break()
                    {
                        return SearchOutcome::Aborted;
                    }
                }
                continue;
            };
            let from = frame.vertex.clone();
            let parent_edge = frame.via.as_ref() == Some(&edge);

            let to = direction.neighbor(graph, &edge, &from, &mut *self.neighbor);
            let class = match self.visits.get(&*to) {
                None => EdgeClass::Tree,
                Some(visit) if !visit.processed => {
                    if direction == Direction::Undirected && parent_edge {
                        continue;
                    }
                    EdgeClass::Back
                }
                Some(visit) => {
                    if direction == Direction::Undirected {
                        continue;
                    }
                    let from_entry = self.visits.get(&from).map_or(0, |v| v.entry);
                    if from_entry < visit.entry {
                        EdgeClass::Forward
                    } else {
                        EdgeClass::Cross
                    }
                }
            };
            if listener.process_edge(&edge, &from, to, class).is_break() {
                return SearchOutcome::Aborted;
            }
            if class == EdgeClass::Tree {
                self.time += 1;
                self.visits.insert(
                    to.clone(),
                    DfsVisit {
                        entry: self.time,
                        processed: false,
                    },
                );
                if listener
                    .process_vertex_early(to, self.stack.len())
                    .is_break()
                {
                    return SearchOutcome::Aborted;
                }
                let next = to.clone();
                let edges = direction.edges(graph, &next);
                self.stack.push(Frame {
                    vertex: next,
                    edges,
                    via: Some(edge),
                });
            }
        }
        SearchOutcome::Completed
    }

    pub fn is_discovered(&self, vertex: &G::Vertex) -> bool {
        self.visits.contains_key(vertex)
    }

    /// Vertices discovered by the last run, in discovery order.
    pub fn discovered(&self) -> impl Iterator<Item = &G::Vertex> + '_ {
        self.visits.keys()
    }
}
