use petgraph::stable_graph::NodeIndex;

use crate::domain::{Itinerary, RouteItem, RouteSettings};
use crate::infrastructure::{RouteInfo, Router};

use super::graph_builder::{EdgeMetadata, VertexNaming};

pub struct RouteResponseAssembler<'a> {
    pub router: &'a Router,
    pub vertices: &'a VertexNaming,
    pub edges: &'a EdgeMetadata,
    pub settings: &'a RouteSettings,
}

impl RouteResponseAssembler<'_> {
    /// Every ride is preceded by a wait at its boarding stop; there is no
    /// wait after the last ride. `None` means there is no route.
    pub fn assemble(&self, route: Option<RouteInfo>) -> Option<Itinerary> {
        let route = route?;
        if route.edge_count == 0 {
            return Some(Itinerary::empty());
        }

        let path = self.router.route_edges(route.id);
        let mut items = Vec::with_capacity(2 * path.len());
        for (position, &edge) in path.iter().enumerate() {
            let (from, to) = self.router.graph().edge_endpoints(edge)?;
            let info = self.edges.get(edge)?;
            if position == 0 {
                items.push(self.wait_at(from)?);
            }
            items.push(RouteItem::Bus {
                bus: info.bus.clone(),
                span_count: info.span_count,
                time: info.ride_time,
            });
            if position + 1 < path.len() {
                items.push(self.wait_at(to)?);
            }
        }

        Some(Itinerary {
            total_time: route.weight,
            items,
        })
    }

    fn wait_at(&self, vertex: NodeIndex) -> Option<RouteItem> {
        Some(RouteItem::Wait {
            stop_name: self.vertices.name(vertex)?.to_owned(),
            time: self.settings.bus_wait_time,
        })
    }
}
