use std::{cell::RefCell, rc::Rc};

use insta::assert_snapshot;
use proptest::{prelude::*, sample::Index};
use similar_asserts::assert_eq;

use super::*;
use crate::{
    algorithms::{
        shortest_path::ShortestPath,
        traversal::{BreadthFirstIterator, DepthFirstIterator},
    },
    graph::pool::{PoolEdge, PoolGraph, PoolVertex},
    test_graphs::{assorted_components, init_tracing},
};

type Dynamic = ConnectedComponentsDynamic<PoolGraph<u32>>;

fn size_of(ccd: &RefCell<Dynamic>, vertex: &PoolVertex) -> Option<usize> {
    let ccd = ccd.borrow();
    ccd.component_of(vertex).and_then(|id| ccd.size(id))
}

fn labels_of(
    ccd: &RefCell<Dynamic>,
    graph: &PoolGraph<u32>,
    vertex: &PoolVertex,
) -> Option<Vec<u32>> {
    let ccd = ccd.borrow();
    let members = ccd.get(ccd.component_of(vertex)?)?;
    let mut labels: Vec<u32> = members.iter().map(|v| *graph.data(v)).collect();
    labels.sort_unstable();
    Some(labels)
}

#[test]
fn removals_split_and_drop_components() {
    init_tracing();
    let bundle = assorted_components::<PoolGraph<u32>>();
    let (v, e) = (bundle.vertices, bundle.edges);
    let mut graph = ListenableGraph::new(bundle.graph);
    let ccd = ConnectedComponentsDynamic::attach(&mut graph).unwrap();

    assert_eq!(ccd.borrow().len(), 5);
    assert_eq!(ccd.borrow().component_of(&v[12]), None);
    for (at, size) in [(0, 7), (7, 5), (13, 2), (15, 5), (20, 9)] {
        assert_eq!(size_of(&ccd, &v[at]), Some(size), "component of {at}");
    }

    // the middle of the line
    graph.begin_update();
    graph.remove_edge(&e[7]).unwrap();
    assert_eq!(ccd.borrow().len(), 5);
    graph.end_update().unwrap();
    assert_eq!(ccd.borrow().len(), 6);
    assert_eq!(size_of(&ccd, &v[7]), Some(2));
    assert_eq!(size_of(&ccd, &v[11]), Some(3));

    // the last edge of a three vertex component
    graph.begin_update();
    graph.remove_edge(&e[9]).unwrap();
    graph.end_update().unwrap();
    assert_eq!(ccd.borrow().len(), 6);
    assert_eq!(labels_of(&ccd, &graph, &v[10]), Some(vec![9, 10]));
    assert_eq!(ccd.borrow().component_of(&v[11]), None);

    // the centre of the star
    graph.begin_update();
    graph.remove_vertex(&v[2]).unwrap();
    assert_eq!(ccd.borrow().len(), 6);
    graph.end_update().unwrap();
    assert_eq!(ccd.borrow().component_of(&v[2]), None);
    assert_eq!(ccd.borrow().len(), 8);
    assert_eq!(labels_of(&ccd, &graph, &v[0]), Some(vec![0, 1]));
    assert_eq!(labels_of(&ccd, &graph, &v[4]), Some(vec![3, 4]));
    assert_eq!(labels_of(&ccd, &graph, &v[6]), Some(vec![5, 6]));

    // the only edge of a pair
    graph.remove_edge(&e[10]).unwrap();
    assert_eq!(ccd.borrow().len(), 7);
    assert_eq!(ccd.borrow().component_of(&v[13]), None);
    assert_eq!(ccd.borrow().component_of(&v[14]), None);

    // an edge of the cycle
    graph.remove_edge(&e[11]).unwrap();
    assert_eq!(ccd.borrow().len(), 7);
    assert_eq!(size_of(&ccd, &v[15]), Some(5));

    // the body of the butterfly
    graph.remove_vertex(&v[20]).unwrap();
    assert_eq!(ccd.borrow().component_of(&v[20]), None);
    assert_eq!(ccd.borrow().len(), 8);
    assert_eq!(labels_of(&ccd, &graph, &v[21]), Some(vec![21, 22, 23, 24]));
    assert_eq!(labels_of(&ccd, &graph, &v[28]), Some(vec![25, 26, 27, 28]));

    assert_eq!(graph.outstanding_vertex_refs(), 0);
}

#[test]
fn path_split_in_two() {
    let mut graph = ListenableGraph::new(PoolGraph::new());
    let ccd = ConnectedComponentsDynamic::attach(&mut graph).unwrap();
    let v: Vec<_> = (1..=4).map(|l| graph.add_vertex(l).unwrap()).collect();
    graph.add_edge(&v[0], &v[1]).unwrap();
    let bc = graph.add_edge(&v[1], &v[2]).unwrap();
    graph.add_edge(&v[2], &v[3]).unwrap();
    assert_eq!(ccd.borrow().len(), 1);

    let g = graph.graph();
    assert_eq!(BreadthFirstIterator::new(&v[0], g).collect::<Vec<_>>(), v);
    assert_eq!(DepthFirstIterator::new(&v[0], g).collect::<Vec<_>>(), v);
    let backwards: Vec<_> = v.iter().rev().cloned().collect();
    assert_eq!(ShortestPath::new(g).find(&v[0], &v[3], true), Some(backwards));

    graph.remove_edge(&bc).unwrap();
    assert_eq!(ShortestPath::new(graph.graph()).find(&v[0], &v[3], true), None);
    let ccd = ccd.borrow();
    assert_eq!(ccd.len(), 2);
    assert!(ccd.ids().all(|id| ccd.size(id) == Some(2)));
    assert_ne!(ccd.component_of(&v[0]), ccd.component_of(&v[3]));
}

#[test]
fn merge_tie_keeps_the_lower_id_and_ids_are_recycled() {
    let mut graph = ListenableGraph::new(PoolGraph::new());
    let ccd = ConnectedComponentsDynamic::attach(&mut graph).unwrap();
    let v: Vec<_> = (0..8).map(|l| graph.add_vertex(l).unwrap()).collect();
    let ab = graph.add_edge(&v[0], &v[1]).unwrap();
    graph.add_edge(&v[2], &v[3]).unwrap();
    assert_eq!(ccd.borrow().component_of(&v[0]), Some(ComponentId(0)));
    assert_eq!(ccd.borrow().component_of(&v[3]), Some(ComponentId(1)));

    graph.add_edge(&v[3], &v[0]).unwrap();
    assert_eq!(ccd.borrow().ids().collect::<Vec<_>>(), [ComponentId(0)]);
    assert_eq!(size_of(&ccd, &v[2]), Some(4));

    // the freed id comes back first
    graph.add_edge(&v[4], &v[5]).unwrap();
    assert_eq!(ccd.borrow().component_of(&v[4]), Some(ComponentId(1)));

    // the far side of the cut gets a new id, the lone vertex frees the old one
    graph.remove_edge(&ab).unwrap();
    assert_eq!(ccd.borrow().component_of(&v[0]), Some(ComponentId(2)));
    assert_eq!(ccd.borrow().component_of(&v[1]), None);
    let mut ids: Vec<_> = ccd.borrow().ids().collect();
    ids.sort();
    assert_eq!(ids, [ComponentId(1), ComponentId(2)]);

    graph.add_edge(&v[6], &v[7]).unwrap();
    assert_eq!(ccd.borrow().component_of(&v[7]), Some(ComponentId(0)));

    // the larger side absorbs the smaller
    graph.add_edge(&v[7], &v[2]).unwrap();
    assert_eq!(ccd.borrow().component_of(&v[6]), Some(ComponentId(2)));
    assert_eq!(ccd.borrow().size(ComponentId(2)), Some(5));
    assert_eq!(ccd.borrow().size(ComponentId(0)), None);
}

#[test]
fn growing_and_self_loops() {
    let mut graph = ListenableGraph::new(PoolGraph::new());
    let ccd = ConnectedComponentsDynamic::attach(&mut graph).unwrap();
    let a = graph.add_vertex(0).unwrap();
    let b = graph.add_vertex(1).unwrap();
    let c = graph.add_vertex(2).unwrap();
    let aa = graph.add_edge(&a, &a).unwrap();
    assert!(ccd.borrow().is_empty());

    graph.add_edge(&a, &b).unwrap();
    graph.add_edge(&c, &b).unwrap();
    assert_eq!(size_of(&ccd, &c), Some(3));
    graph.remove_edge(&aa).unwrap();
    assert_eq!(size_of(&ccd, &a), Some(3));
}

#[test]
fn removing_a_whole_component_in_one_batch() {
    let mut graph = ListenableGraph::new(PoolGraph::new());
    let a = graph.add_vertex(0).unwrap();
    let b = graph.add_vertex(1).unwrap();
    let c = graph.add_vertex(2).unwrap();
    graph.add_edge(&a, &b).unwrap();
    graph.add_edge(&b, &c).unwrap();
    let ccd = ConnectedComponentsDynamic::attach(&mut graph).unwrap();
    assert_eq!(ccd.borrow().len(), 1);

    graph.begin_update();
    graph.remove_vertex(&a).unwrap();
    graph.remove_vertex(&b).unwrap();
    graph.end_update().unwrap();
    assert!(ccd.borrow().is_empty());
    assert_eq!(ccd.borrow().component_of(&c), None);

    // the released id is handed out again
    let d = graph.add_vertex(3).unwrap();
    graph.add_edge(&c, &d).unwrap();
    assert_eq!(ccd.borrow().component_of(&d), Some(ComponentId(0)));
}

#[test]
fn id_space_exhaustion_is_reported() {
    let mut graph = ListenableGraph::new(PoolGraph::new());
    let a = graph.add_vertex(0).unwrap();
    let b = graph.add_vertex(1).unwrap();
    graph.add_edge(&a, &b).unwrap();

    assert_eq!(
        Dynamic::with_id_limit(graph.graph(), 0).unwrap_err(),
        Error::ComponentIdsExhausted { limit: 0 }
    );

    let ccd = Rc::new(RefCell::new(
        Dynamic::with_id_limit(graph.graph(), 1).unwrap(),
    ));
    graph.add_graph_listener(&ccd);
    let c = graph.add_vertex(2).unwrap();
    let d = graph.add_vertex(3).unwrap();
    let err = graph.add_edge(&c, &d).unwrap_err();
    assert_snapshot!(err.to_string(), @"Cannot create more than 1 connected components: the id space is exhausted");
}

#[test]
fn exhaustion_during_a_split_keeps_the_component_whole() {
    let mut graph = ListenableGraph::new(PoolGraph::new());
    let v: Vec<_> = (0..4).map(|l| graph.add_vertex(l).unwrap()).collect();
    graph.add_edge(&v[0], &v[1]).unwrap();
    let middle = graph.add_edge(&v[1], &v[2]).unwrap();
    let last = graph.add_edge(&v[2], &v[3]).unwrap();
    let ccd = Rc::new(RefCell::new(
        Dynamic::with_id_limit(graph.graph(), 1).unwrap(),
    ));
    graph.add_graph_listener(&ccd);

    assert_eq!(
        graph.remove_edge(&middle).unwrap_err(),
        Error::ComponentIdsExhausted { limit: 1 }
    );
    {
        let ccd = ccd.borrow();
        assert_eq!(ccd.len(), 1);
        for vertex in &v {
            let id = ccd.component_of(vertex).unwrap();
            assert_eq!(ccd.size(id), Some(4));
        }
    }

    // the halves left behind are too small to need a second id
    graph.remove_edge(&last).unwrap();
    assert_eq!(labels_of(&ccd, graph.graph(), &v[0]), Some(vec![0, 1]));
    assert_eq!(ccd.borrow().component_of(&v[2]), None);
    assert_eq!(ccd.borrow().component_of(&v[3]), None);
    assert_eq!(ccd.borrow().len(), 1);
}

#[derive(Clone, Debug)]
enum Edit {
    AddVertex,
    AddEdge(Index, Index),
    RemoveEdge(Index),
    RemoveVertex(Index),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        1 => Just(Edit::AddVertex),
        4 => (any::<Index>(), any::<Index>()).prop_map(|(s, t)| Edit::AddEdge(s, t)),
        3 => any::<Index>().prop_map(Edit::RemoveEdge),
        1 => any::<Index>().prop_map(Edit::RemoveVertex),
    ]
}

fn all_edges(graph: &PoolGraph<u32>) -> Vec<PoolEdge> {
    graph
        .vertices()
        .flat_map(|v| graph.outgoing_edges(&v).collect::<Vec<_>>())
        .collect()
}

fn normalized<'a>(components: impl Iterator<Item = &'a RefSet<PoolVertex>>) -> Vec<Vec<usize>> {
    let mut all: Vec<Vec<usize>> = components
        .map(|c| {
            let mut indices: Vec<usize> = c.iter().map(|v| v.index()).collect();
            indices.sort_unstable();
            indices
        })
        .collect();
    all.sort();
    all
}

fn apply(graph: &mut ListenableGraph<PoolGraph<u32>>, edit: &Edit) {
    let vertices: Vec<_> = graph.vertices().collect();
    match edit {
        Edit::AddVertex => {
            graph.add_vertex(0).unwrap();
        }
        Edit::AddEdge(s, t) if !vertices.is_empty() => {
            let (s, t) = (s.get(&vertices), t.get(&vertices));
            graph.add_edge(s, t).unwrap();
        }
        Edit::RemoveEdge(at) => {
            let edges = all_edges(graph);
            if !edges.is_empty() {
                graph.remove_edge(at.get(&edges)).unwrap();
            }
        }
        Edit::RemoveVertex(at) if !vertices.is_empty() => {
            graph.remove_vertex(at.get(&vertices)).unwrap();
        }
        _ => {}
    }
}

proptest! {
    #[test]
    fn dynamic_components_match_a_full_recount(
        vertices in 1usize..15,
        edges in 0usize..15,
        seed in any::<u64>(),
        batches in prop::collection::vec(prop::collection::vec(edit(), 1..6), 1..8),
    ) {
        let mut initial = PoolGraph::new();
        let handles: Vec<_> = (0..vertices).map(|_| initial.add_vertex(0)).collect();
        let shape = PoolGraph::random(vertices, edges, seed);
        for edge in all_edges_unit(&shape) {
            initial.add_edge(&handles[edge.0], &handles[edge.1]);
        }
        let mut graph = ListenableGraph::new(initial);
        let ccd = ConnectedComponentsDynamic::attach(&mut graph).unwrap();

        for batch in &batches {
            graph.begin_update();
            for edit in batch {
                apply(&mut graph, edit);
            }
            graph.end_update().unwrap();

            let expected = ConnectedComponents::new(graph.graph())
                .minimal_size(MINIMAL_SIZE)
                .get();
            let ccd = ccd.borrow();
            prop_assert_eq!(
                normalized(ccd.ids().filter_map(|id| ccd.get(id))),
                normalized(expected.iter())
            );
            for component in &expected {
                let id = ccd.component_of(&component[0]);
                prop_assert!(id.is_some());
                prop_assert!(component.iter().all(|v| ccd.component_of(v) == id));
            }
            let tracked: usize = expected.iter().map(|c| c.len()).sum();
            prop_assert_eq!(ccd.membership.len(), tracked);
        }
        prop_assert_eq!(graph.outstanding_vertex_refs(), 0);
    }
}

/// Edges of a random shape as pairs of vertex indices.
fn all_edges_unit(graph: &PoolGraph<()>) -> Vec<(usize, usize)> {
    let mut target = graph.borrow_vertex();
    graph
        .vertices()
        .flat_map(|v| {
            graph
                .outgoing_edges(&v)
                .map(|e| (v.index(), graph.target(&e, &mut *target).index()))
                .collect::<Vec<_>>()
        })
        .collect()
}
