//! Services - catalog resolution and the HTTP router

pub mod catalog_service;
pub mod https;

pub use catalog_service::CatalogService;
pub use https::HttpsService;
