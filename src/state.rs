use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{FolderService, NoteService, TagService, UserService};
use crate::store::{MemoryStore, Store};

/// Shared by every request: immutable configuration and the store handle
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Fresh in-memory store, used by `serve --memory` and the test suite
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.store.clone(), self.config.security.clone())
    }

    pub fn folders(&self) -> FolderService {
        FolderService::new(self.store.clone())
    }

    pub fn tags(&self) -> TagService {
        TagService::new(self.store.clone())
    }

    pub fn notes(&self) -> NoteService {
        NoteService::new(self.store.clone())
    }
}
