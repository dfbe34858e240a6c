//! Service aggregate store.

pub mod domain;
pub mod repository;
mod service;

pub use domain::{NewService, ServiceSettingsPatch, ServiceView};
pub use service::CatalogService;
