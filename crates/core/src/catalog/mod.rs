//! Catalog: masters, clients, services and loyalty

pub mod ports;
pub mod service;

pub use service::CatalogService;
