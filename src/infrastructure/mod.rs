pub mod logging;
pub mod requests;
pub mod router;

pub use logging::init_tracing;
pub use requests::{
    read_document, write_responses, BaseRequest, BusRequest, InputDocument, ResponseBody,
    RoutingSettingsDto, StatRequest, StatResponse, StopRequest,
};
pub use router::{RouteId, RouteInfo, Router, TransitDigraph};
