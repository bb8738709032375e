pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::{attempt_repository::PgAttemptStore, pool};
use crate::error::{Error, Result};
use crate::services::{
    attempt_store::{AttemptStore, InMemoryAttemptStore},
    generator_service::GeneratorService,
    history_service::HistoryService,
    submission_service::SubmissionService,
    template_catalog::builtin_templates,
    template_store::{InMemoryTemplateStore, TemplateStore},
};

#[derive(Clone)]
pub struct AppState {
    pub generator: GeneratorService,
    pub submissions: SubmissionService,
    pub history: HistoryService,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(
        templates: Arc<dyn TemplateStore>,
        attempts: Arc<dyn AttemptStore>,
        jwt_secret: &str,
        persist_generated_attempts: bool,
    ) -> Self {
        let generator = GeneratorService::new(templates, attempts.clone())
            .with_persistence(persist_generated_attempts);
        let submissions = SubmissionService::new(attempts.clone());
        let history = HistoryService::new(attempts);

        Self {
            generator,
            submissions,
            history,
            jwt_secret: Arc::from(jwt_secret),
        }
    }

    /// Wires the built-in template catalog with a Postgres attempt store when
    /// `DATABASE_URL` is configured, or an in-memory one otherwise.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let catalog = InMemoryTemplateStore::new(builtin_templates());
        if catalog.is_empty() {
            return Err(Error::Config("no question templates are registered".to_string()));
        }
        tracing::info!(templates = catalog.len(), "Loaded question template catalog");
        let templates: Arc<dyn TemplateStore> = Arc::new(catalog);

        let attempts: Arc<dyn AttemptStore> = match &config.database_url {
            Some(url) => {
                let pool = pool::create_pool(url).await?;
                pool::run_migrations(&pool).await?;
                tracing::info!("Using Postgres attempt store");
                Arc::new(PgAttemptStore::new(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, attempt history is kept in memory");
                Arc::new(InMemoryAttemptStore::new())
            }
        };

        Ok(Self::new(
            templates,
            attempts,
            &config.jwt_secret,
            config.persist_generated_attempts,
        ))
    }
}
