use std::io::{Read, Write};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::domain::{Itinerary, Result, RouteItem, RouteSettings};

#[derive(Deserialize, Clone, Debug)]
pub struct InputDocument {
    pub base_requests: Vec<BaseRequest>,
    pub routing_settings: RoutingSettingsDto,
    pub stat_requests: Vec<StatRequest>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop(StopRequest),
    Bus(BusRequest),
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct StopRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub road_distances: HashMap<String, f64>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct BusRequest {
    pub name: String,
    pub stops: Vec<String>,
    pub is_roundtrip: bool,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RoutingSettingsDto {
    pub bus_wait_time: f64,
    // km/h
    pub bus_velocity: f64,
}

impl From<RoutingSettingsDto> for RouteSettings {
    fn from(dto: RoutingSettingsDto) -> Self {
        RouteSettings::from_kmh(dto.bus_wait_time, dto.bus_velocity)
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum StatRequest {
    Stop { id: i64, name: String },
    Bus { id: i64, name: String },
    Route { id: i64, from: String, to: String },
}

impl StatRequest {
    pub fn id(&self) -> i64 {
        match self {
            StatRequest::Stop { id, .. }
            | StatRequest::Bus { id, .. }
            | StatRequest::Route { id, .. } => *id,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct StatResponse {
    pub request_id: i64,
    #[serde(flatten)]
    pub body: ResponseBody,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ResponseBody {
    NotFound {
        error_message: &'static str,
    },
    Stop {
        buses: Vec<String>,
    },
    Bus {
        route_length: f64,
        curvature: f64,
        stop_count: usize,
        unique_stop_count: usize,
    },
    Route {
        total_time: f64,
        items: Vec<RouteItem>,
    },
}

impl ResponseBody {
    pub fn not_found() -> Self {
        ResponseBody::NotFound {
            error_message: "not found",
        }
    }
}

impl From<Itinerary> for ResponseBody {
    fn from(itinerary: Itinerary) -> Self {
        ResponseBody::Route {
            total_time: itinerary.total_time,
            items: itinerary.items,
        }
    }
}

pub fn read_document<R: Read>(reader: R) -> Result<InputDocument> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_responses<W: Write>(
    mut writer: W,
    responses: &[StatResponse],
    pretty: bool,
) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, responses)?;
    } else {
        serde_json::to_writer(&mut writer, responses)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
