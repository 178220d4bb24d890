//! Plain-object storage: vertices and edges are reference counted heap
//! objects and handles are pointers to them.
//!
//! There is no cursor pool. Borrowing a cursor yields an unbound handle,
//! releasing one drops it, and [`Assign`] replaces the pointer.

use std::{
    cell::RefCell,
    fmt,
    hash::{Hash, Hasher},
    iter::Cloned,
    rc::{Rc, Weak},
    vec,
};

use super::{collection::RefSet, Assign, ContainerFactory, Graph, MutableGraph};

struct VertexNode<T> {
    data: T,
    outgoing: RefCell<Vec<ObjectEdge<T>>>,
    incoming: RefCell<Vec<ObjectEdge<T>>>,
}

struct EdgeNode<T> {
    source: Weak<VertexNode<T>>,
    target: Weak<VertexNode<T>>,
}

/// Pointer handle to a vertex of an [`ObjectGraph`], compared by identity.
pub struct ObjectVertex<T> {
    node: Option<Rc<VertexNode<T>>>,
}

/// Pointer handle to an edge of an [`ObjectGraph`], compared by identity.
pub struct ObjectEdge<T> {
    node: Option<Rc<EdgeNode<T>>>,
}

macro_rules! pointer_handle {
    ($handle:ident, $node:ident, $what:literal) => {
        impl<T> $handle<T> {
            fn node(&self) -> &Rc<$node<T>> {
                match &self.node {
                    Some(node) => node,
                    None => panic!(concat!("unbound ", $what, " handle")),
                }
            }

            fn address(&self) -> Option<*const $node<T>> {
                self.node.as_ref().map(Rc::as_ptr)
            }

            pub fn is_bound(&self) -> bool {
                self.node.is_some()
            }
        }

        impl<T> Clone for $handle<T> {
            fn clone(&self) -> Self {
                $handle {
                    node: self.node.clone(),
                }
            }
        }

        impl<T> PartialEq for $handle<T> {
            fn eq(&self, other: &Self) -> bool {
                self.address() == other.address()
            }
        }

        impl<T> Eq for $handle<T> {}

        impl<T> Hash for $handle<T> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.address().hash(state);
            }
        }

        impl<T> fmt::Debug for $handle<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.address() {
                    Some(address) => write!(f, "{}({:p})", stringify!($handle), address),
                    None => write!(f, "{}(unbound)", stringify!($handle)),
                }
            }
        }

        impl<T> Assign for $handle<T> {
            fn assign(&mut self, other: &Self) {
                self.node.clone_from(&other.node);
            }
        }
    };
}

pointer_handle!(ObjectVertex, VertexNode, "vertex");
pointer_handle!(ObjectEdge, EdgeNode, "edge");

impl<T> ObjectVertex<T> {
    pub fn data(&self) -> &T {
        &self.node().data
    }
}

/// A directed multigraph of reference counted vertex and edge objects.
pub struct ObjectGraph<T> {
    vertices: RefSet<ObjectVertex<T>>,
}

impl<T> Default for ObjectGraph<T> {
    fn default() -> Self {
        ObjectGraph {
            vertices: RefSet::default(),
        }
    }
}

impl<T> ObjectGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> Graph for ObjectGraph<T> {
    type Vertex = ObjectVertex<T>;
    type Edge = ObjectEdge<T>;
    type Vertices<'a>
        = Cloned<indexmap::set::Iter<'a, ObjectVertex<T>>>
    where
        Self: 'a;
    /// Edge lists are snapshots, taken when the iteration starts.
    type Edges<'a>
        = vec::IntoIter<ObjectEdge<T>>
    where
        Self: 'a;

    fn vertex_ref(&self) -> ObjectVertex<T> {
        ObjectVertex { node: None }
    }

    fn release_vertex_ref(&self, _vertex: ObjectVertex<T>) {}

    fn edge_ref(&self) -> ObjectEdge<T> {
        ObjectEdge { node: None }
    }

    fn release_edge_ref(&self, _edge: ObjectEdge<T>) {}

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertices(&self) -> Self::Vertices<'_> {
        self.vertices.iter().cloned()
    }

    fn outgoing_edges(&self, vertex: &ObjectVertex<T>) -> Self::Edges<'_> {
        vertex.node().outgoing.borrow().clone().into_iter()
    }

    fn incoming_edges(&self, vertex: &ObjectVertex<T>) -> Self::Edges<'_> {
        vertex.node().incoming.borrow().clone().into_iter()
    }

    fn edges(&self, vertex: &ObjectVertex<T>) -> Self::Edges<'_> {
        let node = vertex.node();
        let mut edges = node.outgoing.borrow().clone();
        edges.extend(node.incoming.borrow().iter().cloned());
        edges.into_iter()
    }

    fn source<'r>(
        &self,
        edge: &ObjectEdge<T>,
        into: &'r mut ObjectVertex<T>,
    ) -> &'r mut ObjectVertex<T> {
        into.node = edge.node().source.upgrade();
        into
    }

    fn target<'r>(
        &self,
        edge: &ObjectEdge<T>,
        into: &'r mut ObjectVertex<T>,
    ) -> &'r mut ObjectVertex<T> {
        into.node = edge.node().target.upgrade();
        into
    }

    fn has_incoming_edges(&self, vertex: &ObjectVertex<T>) -> bool {
        !vertex.node().incoming.borrow().is_empty()
    }
}

impl<T> ContainerFactory for ObjectGraph<T> {}

impl<T> MutableGraph for ObjectGraph<T> {
    type VertexData = T;

    fn add_vertex(&mut self, data: T) -> ObjectVertex<T> {
        let vertex = ObjectVertex {
            node: Some(Rc::new(VertexNode {
                data,
                outgoing: RefCell::new(Vec::new()),
                incoming: RefCell::new(Vec::new()),
            })),
        };
        self.vertices.insert(vertex.clone());
        vertex
    }

    fn add_edge(&mut self, source: &ObjectVertex<T>, target: &ObjectVertex<T>) -> ObjectEdge<T> {
        let edge = ObjectEdge {
            node: Some(Rc::new(EdgeNode {
                source: Rc::downgrade(source.node()),
                target: Rc::downgrade(target.node()),
            })),
        };
        source.node().outgoing.borrow_mut().push(edge.clone());
        target.node().incoming.borrow_mut().push(edge.clone());
        edge
    }

    fn remove_edge(&mut self, edge: &ObjectEdge<T>) {
        let node = edge.node();
        if let Some(source) = node.source.upgrade() {
            source.outgoing.borrow_mut().retain(|e| e != edge);
        }
        if let Some(target) = node.target.upgrade() {
            target.incoming.borrow_mut().retain(|e| e != edge);
        }
    }

    fn remove_vertex(&mut self, vertex: &ObjectVertex<T>) {
        let incident: Vec<_> = self.edges(vertex).collect();
        for edge in &incident {
            self.remove_edge(edge);
        }
        self.vertices.shift_remove(vertex);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn handles_compare_by_identity() {
        let mut graph = ObjectGraph::new();
        let a = graph.add_vertex("twin");
        let b = graph.add_vertex("twin");
        assert_ne!(a, b);

        let mut cursor = graph.vertex_ref();
        assert!(!cursor.is_bound());
        cursor.assign(&b);
        assert_eq!(cursor, b);
        assert_eq!(*cursor.data(), "twin");
        graph.release_vertex_ref(cursor);
    }

    #[test]
    fn endpoints_and_removal() {
        let mut graph = ObjectGraph::new();
        let a = graph.add_vertex(1);
        let b = graph.add_vertex(2);
        let c = graph.add_vertex(3);
        let ab = graph.add_edge(&a, &b);
        let bc = graph.add_edge(&b, &c);

        let mut end = graph.vertex_ref();
        assert_eq!(*graph.target(&ab, &mut end).data(), 2);
        assert_eq!(*graph.source(&bc, &mut end).data(), 2);
        assert_eq!(graph.edges(&b).collect::<Vec<_>>(), [bc.clone(), ab.clone()]);

        graph.remove_vertex(&b);
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.outgoing_edges(&a).count(), 0);
        assert!(!graph.has_incoming_edges(&c));
    }
}
