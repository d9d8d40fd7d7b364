use std::cmp::Ordering;
use std::collections::BinaryHeap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, NodeIndexable};
use tracing::debug;

use crate::domain::{Result, TransitError};

pub type TransitDigraph = StableGraph<(), f64>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RouteId {
    from: usize,
    to: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteInfo {
    pub weight: f64,
    pub edge_count: usize,
    pub id: RouteId,
}

#[derive(Clone, Copy, Debug)]
struct Reach {
    weight: f64,
    edge_count: usize,
    prev_edge: Option<EdgeIndex>,
}

#[derive(PartialEq)]
struct Candidate {
    weight: f64,
    node: NodeIndex,
}

impl Eq for Candidate {}

impl Ord for Candidate {
    // Reversed so the heap pops the lightest candidate first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One Dijkstra tree per source vertex, grown at construction. Trees store
/// the edge used to reach each vertex so parallel edges stay distinct.
#[derive(Debug)]
pub struct Router {
    graph: TransitDigraph,
    trees: Vec<Vec<Option<Reach>>>,
}

impl Router {
    pub fn new(graph: TransitDigraph) -> Result<Self> {
        if let Some(edge) = graph
            .edge_indices()
            .find(|&e| !graph[e].is_finite() || graph[e] < 0.0)
        {
            return Err(TransitError::InvalidWeight {
                edge: edge.index(),
                weight: graph[edge],
            });
        }
        let trees = graph
            .node_indices()
            .map(|source| shortest_path_tree(&graph, source))
            .collect();
        debug!(
            vertices = graph.node_count(),
            edges = graph.edge_count(),
            "built shortest path trees"
        );
        Ok(Self { graph, trees })
    }

    pub fn graph(&self) -> &TransitDigraph {
        &self.graph
    }

    pub fn build_route(&self, from: NodeIndex, to: NodeIndex) -> Option<RouteInfo> {
        let reach = (*self.trees.get(from.index())?.get(to.index())?)?;
        Some(RouteInfo {
            weight: reach.weight,
            edge_count: reach.edge_count,
            id: RouteId {
                from: from.index(),
                to: to.index(),
            },
        })
    }

    pub fn route_edge(&self, id: RouteId, position: usize) -> Option<EdgeIndex> {
        let tree = self.trees.get(id.from)?;
        let end = (*tree.get(id.to)?)?;
        // steps back from the end of the route
        let mut remaining = end.edge_count.checked_sub(position)?.checked_sub(1)?;
        let mut node = id.to;
        loop {
            let edge = (*tree.get(node)?)?.prev_edge?;
            if remaining == 0 {
                return Some(edge);
            }
            node = self.graph.edge_endpoints(edge)?.0.index();
            remaining -= 1;
        }
    }

    pub fn route_edges(&self, id: RouteId) -> Vec<EdgeIndex> {
        let Some(tree) = self.trees.get(id.from) else {
            return Vec::new();
        };
        let mut edges = Vec::new();
        let mut node = id.to;
        while let Some(Some(Reach {
            prev_edge: Some(edge),
            ..
        })) = tree.get(node)
        {
            edges.push(*edge);
            match self.graph.edge_endpoints(*edge) {
                Some((source, _)) => node = source.index(),
                None => break,
            }
        }
        edges.reverse();
        edges
    }
}

fn shortest_path_tree(graph: &TransitDigraph, source: NodeIndex) -> Vec<Option<Reach>> {
    let mut best: Vec<Option<Reach>> = vec![None; graph.node_bound()];
    let mut heap = BinaryHeap::new();
    best[source.index()] = Some(Reach {
        weight: 0.0,
        edge_count: 0,
        prev_edge: None,
    });
    heap.push(Candidate {
        weight: 0.0,
        node: source,
    });

    while let Some(Candidate { weight, node }) = heap.pop() {
        let Some(current) = best[node.index()] else {
            continue;
        };
        if weight > current.weight {
            continue;
        }
        for edge in graph.edges(node) {
            let next_weight = weight + *edge.weight();
            let target = edge.target();
            let improves = match best[target.index()] {
                Some(known) => next_weight < known.weight,
                None => true,
            };
            if improves {
                best[target.index()] = Some(Reach {
                    weight: next_weight,
                    edge_count: current.edge_count + 1,
                    prev_edge: Some(edge.id()),
                });
                heap.push(Candidate {
                    weight: next_weight,
                    node: target,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(vertices: usize, edges: &[(usize, usize, f64)]) -> TransitDigraph {
        let mut g = TransitDigraph::default();
        let nodes: Vec<_> = (0..vertices).map(|_| g.add_node(())).collect();
        for &(from, to, weight) in edges {
            g.add_edge(nodes[from], nodes[to], weight);
        }
        g
    }

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn same_vertex_is_free() {
        let router = Router::new(graph(2, &[(0, 1, 3.0)])).unwrap();
        let route = router.build_route(n(0), n(0)).unwrap();
        assert_eq!(route.weight, 0.0);
        assert_eq!(route.edge_count, 0);
        assert!(router.route_edges(route.id).is_empty());
    }

    #[test]
    fn unreachable_vertex_has_no_route() {
        let router = Router::new(graph(3, &[(0, 1, 3.0)])).unwrap();
        assert!(router.build_route(n(0), n(2)).is_none());
        assert!(router.build_route(n(1), n(0)).is_none());
        assert!(router.build_route(n(0), n(7)).is_none());
    }

    #[test]
    fn picks_cheaper_parallel_edge() {
        let router = Router::new(graph(2, &[(0, 1, 5.0), (0, 1, 2.0), (0, 1, 4.0)])).unwrap();
        let route = router.build_route(n(0), n(1)).unwrap();
        assert_eq!(route.weight, 2.0);
        assert_eq!(route.edge_count, 1);
        assert_eq!(router.route_edge(route.id, 0), Some(EdgeIndex::new(1)));
        assert_eq!(router.route_edge(route.id, 1), None);
    }

    #[test]
    fn reconstructs_multi_edge_path() {
        let router = Router::new(graph(
            4,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (0, 3, 10.0)],
        ))
        .unwrap();
        let route = router.build_route(n(0), n(3)).unwrap();
        assert_eq!(route.weight, 3.0);
        assert_eq!(route.edge_count, 3);
        let edges: Vec<_> = router.route_edges(route.id).iter().map(|e| e.index()).collect();
        assert_eq!(edges, [0, 1, 2]);
    }

    #[test]
    fn single_edge_lookup_agrees_with_full_path() {
        let router = Router::new(graph(
            5,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0), (0, 4, 9.0)],
        ))
        .unwrap();
        let route = router.build_route(n(0), n(4)).unwrap();
        let path = router.route_edges(route.id);
        assert_eq!(path.len(), route.edge_count);
        for (position, edge) in path.iter().enumerate() {
            assert_eq!(router.route_edge(route.id, position), Some(*edge));
        }
        assert_eq!(router.route_edge(route.id, route.edge_count), None);
        assert_eq!(router.route_edge(route.id, usize::MAX), None);

        let empty = router.build_route(n(2), n(2)).unwrap();
        assert_eq!(router.route_edge(empty.id, 0), None);
    }

    #[test]
    fn indices_survive_removed_vertices() {
        let mut g = graph(3, &[(0, 2, 4.0)]);
        g.remove_node(n(1));
        assert!(g.node_count() < g.node_bound());
        let router = Router::new(g).unwrap();
        let route = router.build_route(n(0), n(2)).unwrap();
        assert_eq!(route.weight, 4.0);
        assert_eq!(router.route_edges(route.id), [EdgeIndex::new(0)]);
    }

    #[test]
    fn rejects_negative_weights() {
        let err = Router::new(graph(2, &[(0, 1, -1.0)])).unwrap_err();
        assert!(matches!(err, TransitError::InvalidWeight { edge: 0, .. }));
    }

    #[test]
    fn router_is_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Router>();
    }
}
