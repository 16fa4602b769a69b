//! Local Library catalog server
//!
//! Form-driven management of a small library catalog: books, their authors
//! and genres, and the physical copies on the shelves.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub repository: Arc<dyn repository::CatalogStore>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: Arc<dyn repository::CatalogStore>) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository.clone())),
            repository,
        }
    }
}
