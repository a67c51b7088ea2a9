//! Shared application state

use std::sync::Arc;

use crate::config::AppConfig;
use crate::generation::DocumentGenerator;

/// Handed to every request; read-only after startup
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<DocumentGenerator>,
}

impl AppState {
    pub fn new(generator: DocumentGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self::new(DocumentGenerator::from_config(config)?))
    }
}
