//! Domain layer: document decoding, template building, the catalog store and
//! the service that drives them.

pub mod builder;
pub mod error;
pub mod events;
pub mod ids;
pub mod local_client;
pub mod ports;
pub mod service;
pub mod spec;
pub mod store;
