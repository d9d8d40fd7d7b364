use tracing::{debug, info};

use crate::domain::{
    BusIndex, BusRoute, Coordinates, Itinerary, Result, RouteMetrics, RouteSettings, StopIndex,
};
use crate::infrastructure::{
    BaseRequest, InputDocument, ResponseBody, Router, StatRequest, StatResponse,
};

use super::assembler::RouteResponseAssembler;
use super::graph_builder::{EdgeMetadata, TransitGraph, VertexNaming};

#[derive(Debug)]
pub struct TransportCatalogue {
    stops: StopIndex,
    buses: BusIndex,
    settings: RouteSettings,
    vertices: VertexNaming,
    edges: EdgeMetadata,
    router: Router,
}

impl TransportCatalogue {
    pub fn new<I>(base_requests: I, settings: RouteSettings) -> Result<Self>
    where
        I: IntoIterator<Item = BaseRequest>,
    {
        let mut stops = StopIndex::new();
        let mut buses = BusIndex::new();
        for request in base_requests {
            ingest(request, &mut stops, &mut buses);
        }
        info!(stops = stops.len(), buses = buses.len(), "ingested base requests");

        let TransitGraph {
            graph,
            vertices,
            edges,
        } = TransitGraph::build(&stops, &buses, &settings)?;
        let router = Router::new(graph)?;

        Ok(Self {
            stops,
            buses,
            settings,
            vertices,
            edges,
            router,
        })
    }

    pub fn stops(&self) -> &StopIndex {
        &self.stops
    }

    pub fn buses(&self) -> &BusIndex {
        &self.buses
    }

    pub fn stop_buses(&self, stop: &str) -> Option<Vec<String>> {
        let stop = self.stops.get(stop).filter(|s| s.is_defined())?;
        Some(stop.buses.iter().cloned().collect())
    }

    pub fn bus_stats(&self, bus: &str) -> Result<Option<RouteMetrics>> {
        self.buses.metrics(bus, &self.stops)
    }

    pub fn route(&self, from: &str, to: &str) -> Option<Itinerary> {
        let from = self.vertices.vertex(from)?;
        let to = self.vertices.vertex(to)?;
        let assembler = RouteResponseAssembler {
            router: &self.router,
            vertices: &self.vertices,
            edges: &self.edges,
            settings: &self.settings,
        };
        assembler.assemble(self.router.build_route(from, to))
    }

    pub fn answer(&self, request: &StatRequest) -> Result<StatResponse> {
        let body = match request {
            StatRequest::Stop { name, .. } => self
                .stop_buses(name)
                .map(|buses| ResponseBody::Stop { buses }),
            StatRequest::Bus { name, .. } => {
                self.bus_stats(name)?.map(|metrics| ResponseBody::Bus {
                    route_length: metrics.road_length,
                    curvature: metrics.curvature,
                    stop_count: metrics.stop_count,
                    unique_stop_count: metrics.unique_stop_count,
                })
            }
            StatRequest::Route { from, to, .. } => self.route(from, to).map(ResponseBody::from),
        };
        debug!(request_id = request.id(), found = body.is_some(), "answered request");
        Ok(StatResponse {
            request_id: request.id(),
            body: body.unwrap_or_else(ResponseBody::not_found),
        })
    }

    pub fn answer_all(&self, requests: &[StatRequest]) -> Result<Vec<StatResponse>> {
        requests.iter().map(|request| self.answer(request)).collect()
    }
}

fn ingest(request: BaseRequest, stops: &mut StopIndex, buses: &mut BusIndex) {
    match request {
        BaseRequest::Stop(stop) => {
            let coordinates = Coordinates::from_degrees(stop.latitude, stop.longitude);
            stops.upsert(&stop.name, coordinates, stop.road_distances);
        }
        BaseRequest::Bus(bus) => {
            let route = BusRoute::new(bus.name, bus.stops, bus.is_roundtrip);
            buses.insert(route, stops);
        }
    }
}

/// Answers are in the order of `stat_requests`.
pub fn process_document(document: InputDocument) -> Result<Vec<StatResponse>> {
    let InputDocument {
        base_requests,
        routing_settings,
        stat_requests,
    } = document;
    let catalogue = TransportCatalogue::new(base_requests, routing_settings.into())?;
    catalogue.answer_all(&stat_requests)
}
