pub mod assembler;
pub mod graph_builder;
pub mod services;

pub use assembler::RouteResponseAssembler;
pub use graph_builder::{EdgeMetadata, TransitGraph, VertexNaming};
pub use services::{process_document, TransportCatalogue};
