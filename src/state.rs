use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::LoginRateLimiter;
use crate::config::Config;
use crate::notify::{LogNotifier, Notifier};
use crate::storage::{LocalDiskStore, ObjectStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Application configuration
    pub config: Arc<Config>,
    /// Fixed-window login throttle, keyed by client address
    pub login_limiter: Arc<LoginRateLimiter>,
    /// Profile image store
    pub object_store: Arc<dyn ObjectStore>,
    /// Welcome notification collaborator
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Create new application state with the default collaborators
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let login_limiter = Arc::new(LoginRateLimiter::new(
            config.auth.login_max_attempts,
            Duration::from_secs(config.auth.login_window_secs),
        ));
        let object_store = Arc::new(LocalDiskStore::new(config.upload_dir.clone()));

        Self {
            db,
            config: Arc::new(config),
            login_limiter,
            object_store,
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Swap collaborators, mainly for tests
    pub fn with_collaborators(
        mut self,
        object_store: Arc<dyn ObjectStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        self.object_store = object_store;
        self.notifier = notifier;
        self
    }
}
