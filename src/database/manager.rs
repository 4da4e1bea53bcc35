use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::database::memory::MemoryRepository;
use crate::database::models::{ControlledVocabulary, Property};
use crate::database::postgres::PgRepository;
use crate::database::repository::Repository;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// The repositories backing both resource families
#[derive(Clone)]
pub struct Stores {
    pub properties: Arc<dyn Repository<Property>>,
    pub vocabularies: Arc<dyn Repository<ControlledVocabulary>>,
}

pub struct DatabaseManager;

impl DatabaseManager {
    /// Builds the repositories described by the config. Without a URL the
    /// catalog lives in process memory and is lost on shutdown.
    pub async fn open(config: &DatabaseConfig) -> Result<Stores, DatabaseError> {
        match config.url.as_deref() {
            Some(url) => {
                let pool = Self::connect(url, config).await?;
                let properties = PgRepository::<Property>::new(pool.clone());
                let vocabularies = PgRepository::<ControlledVocabulary>::new(pool);

                properties.migrate().await?;
                vocabularies.migrate().await?;

                Ok(Stores {
                    properties: Arc::new(properties),
                    vocabularies: Arc::new(vocabularies),
                })
            }
            None => {
                warn!("DATABASE_URL not set, using the in-memory store");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn in_memory() -> Stores {
        Stores {
            properties: Arc::new(MemoryRepository::<Property>::new()),
            vocabularies: Arc::new(MemoryRepository::<ControlledVocabulary>::new()),
        }
    }

    async fn connect(url: &str, config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await
            .map_err(|e| DatabaseError::Unavailable(e.to_string()))?;

        info!(
            "Connected to Postgres (max_connections={})",
            config.max_connections
        );
        Ok(pool)
    }
}
