//! Business logic services

pub mod books;
pub mod catalog;
pub mod stats;

use std::sync::Arc;

use crate::repository::CatalogStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BookService,
    pub catalog: catalog::CatalogService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services over the given store
    pub fn new(repository: Arc<dyn CatalogStore>) -> Self {
        Self {
            books: books::BookService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}
