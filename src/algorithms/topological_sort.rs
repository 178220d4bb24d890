use std::borrow::Borrow;

use thiserror::Error;
use tracing::debug;

use crate::graph::{collection::RefMap, ContainerFactory, Graph};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopoError {
    #[error("Not a DAG: a cycle was reached after {ordered} vertices were ordered")]
    NotDag { ordered: usize },
}

/// Result of a topological sort.
///
/// When [`has_cycle`](Self::has_cycle) is set the sort was abandoned at the
/// first cycle and [`order`](Self::order) is incomplete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopologicalOrder<V> {
    order: Vec<V>,
    has_cycle: bool,
}

impl<V> TopologicalOrder<V> {
    pub fn order(&self) -> &[V] {
        &self.order
    }

    pub fn has_cycle(&self) -> bool {
        self.has_cycle
    }

    pub fn into_result(self) -> Result<Vec<V>, TopoError> {
        if self.has_cycle {
            Err(TopoError::NotDag {
                ordered: self.order.len(),
            })
        } else {
            Ok(self.order)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Temporary,
    Permanent,
}

/// Depth-first topological sort along outgoing edges.
pub struct TopologicalSort<'g, G: ContainerFactory> {
    graph: &'g G,
}

impl<'g, G: ContainerFactory> TopologicalSort<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        TopologicalSort { graph }
    }

    /// Orders `vertices` and every vertex reachable from them so that each
    /// edge points from an earlier to a later vertex.
    pub fn sort<I>(&self, vertices: I) -> TopologicalOrder<G::Vertex>
    where
        I: IntoIterator,
        I::Item: Borrow<G::Vertex>,
    {
        let graph = self.graph;
        let mut marks: RefMap<G::Vertex, Mark> = graph.create_vertex_map();
        let mut order = graph.create_vertex_deque();
        let mut stack: Vec<(G::Vertex, G::Edges<'g>)> = Vec::new();
        let mut target = graph.borrow_vertex();

        for start in vertices {
            let start = start.borrow();
            if marks.contains_key(start) {
                continue;
            }
            marks.insert(start.clone(), Mark::Temporary);
            stack.push((start.clone(), graph.outgoing_edges(start)));

            while let Some((vertex, edges)) = stack.last_mut() {
                let Some(edge) = edges.next() else {
                    marks.insert(vertex.clone(), Mark::Permanent);
                    order.push_front(vertex.clone());
                    stack.pop();
                    continue;
                };
                let next = graph.target(&edge, &mut *target);
                match marks.get(&*next) {
                    None => {
                        let next = next.clone();
                        marks.insert(next.clone(), Mark::Temporary);
                        let edges = graph.outgoing_edges(&next);
                        stack.push((next, edges));
                    }
                    Some(Mark::Temporary) => {
                        debug!(vertex = ?next, ordered = order.len(), "cycle found, topological sort abandoned");
                        return TopologicalOrder {
                            order: order.into(),
                            has_cycle: true,
                        };
                    }
                    Some(Mark::Permanent) => {}
                }
            }
        }

        TopologicalOrder {
            order: order.into(),
            has_cycle: false,
        }
    }

    /// Topological order of the whole graph.
    pub fn sort_all(&self) -> TopologicalOrder<G::Vertex> {
        self.sort(self.graph.vertices())
    }
}
