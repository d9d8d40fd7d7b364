use hashbrown::HashMap;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use tracing::{debug, info, trace};

use crate::domain::{
    BusIndex, BusRoute, EdgeInfo, Result, RouteSettings, StopIndex, TransitError,
};
use crate::infrastructure::TransitDigraph;

#[derive(Clone, Debug, Default)]
pub struct VertexNaming {
    by_name: HashMap<String, NodeIndex>,
    names: Vec<String>,
}

impl VertexNaming {
    fn push(&mut self, name: &str, vertex: NodeIndex) {
        debug_assert_eq!(vertex.index(), self.names.len());
        self.by_name.insert(name.to_owned(), vertex);
        self.names.push(name.to_owned());
    }

    pub fn vertex(&self, name: &str) -> Option<NodeIndex> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, vertex: NodeIndex) -> Option<&str> {
        self.names.get(vertex.index()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct EdgeMetadata {
    edges: Vec<EdgeInfo>,
}

impl EdgeMetadata {
    fn push(&mut self, edge: EdgeIndex, info: EdgeInfo) {
        debug_assert_eq!(edge.index(), self.edges.len());
        self.edges.push(info);
    }

    pub fn get(&self, edge: EdgeIndex) -> Option<&EdgeInfo> {
        self.edges.get(edge.index())
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[derive(Debug)]
pub struct TransitGraph {
    pub graph: TransitDigraph,
    pub vertices: VertexNaming,
    pub edges: EdgeMetadata,
}

impl TransitGraph {
    /// One edge per ordered pair of stops on a line, so a ride pays the
    /// boarding wait once however many stops it spans.
    pub fn build(stops: &StopIndex, buses: &BusIndex, settings: &RouteSettings) -> Result<Self> {
        settings.validate()?;
        buses.validate(stops)?;

        let mut graph = TransitDigraph::with_capacity(stops.len(), 0);
        let mut vertices = VertexNaming::default();
        for stop in stops.iter() {
            let vertex = graph.add_node(());
            vertices.push(&stop.name, vertex);
        }

        let mut built = Self {
            graph,
            vertices,
            edges: EdgeMetadata::default(),
        };
        for route in buses.iter() {
            built.add_bus(route, stops, settings)?;
        }

        info!(
            vertices = built.vertices.len(),
            edges = built.edges.len(),
            buses = buses.len(),
            "built transit graph"
        );
        Ok(built)
    }

    fn add_bus(
        &mut self,
        route: &BusRoute,
        stops: &StopIndex,
        settings: &RouteSettings,
    ) -> Result<()> {
        let hop_minutes = route
            .hops()
            .map(|(from, to)| Ok(stops.distance(from, to)? / settings.bus_velocity))
            .collect::<Result<Vec<f64>>>()?;
        let vertices = route
            .stops
            .iter()
            .map(|stop| {
                self.vertices
                    .vertex(stop)
                    .ok_or_else(|| TransitError::MissingStop {
                        bus: route.name.clone(),
                        stop: stop.clone(),
                    })
            })
            .collect::<Result<Vec<NodeIndex>>>()?;

        let before = self.edges.len();
        for start in 0..vertices.len() {
            let mut ride_time = 0.0;
            for end in start + 1..vertices.len() {
                ride_time += hop_minutes[end - 1];
                let span_count = end - start;
                let edge = self.graph.add_edge(
                    vertices[start],
                    vertices[end],
                    settings.bus_wait_time + ride_time,
                );
                trace!(bus = %route.name, from = start, to = end, ride_time, "edge");
                self.edges.push(
                    edge,
                    EdgeInfo {
                        bus: route.name.clone(),
                        span_count,
                        ride_time,
                    },
                );
            }
        }
        debug!(bus = %route.name, edges = self.edges.len() - before, "added bus to graph");
        Ok(())
    }
}
