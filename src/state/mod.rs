pub mod poll;
pub mod schedule;

use std::sync::Arc;

use axum::extract::ws::Message;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use crate::config::AppConfig;

use self::poll::PollStore;

pub type SharedState = Arc<AppState>;

#[derive(Clone)]
/// Handle used to push messages to a connected poll client.
pub struct ClientConnection {
    pub id: Uuid,
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Central application state: the poll store and the live connection registry.
///
/// Every mutation of the poll goes through the [`AppState::poll`] mutex, which
/// is also held while the resulting broadcast is queued so all clients observe
/// mutations in the same order.
pub struct AppState {
    config: Arc<AppConfig>,
    poll: Mutex<PollStore>,
    connections: DashMap<Uuid, ClientConnection>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The poll starts seeded, with the next reset computed from the current time.
    pub fn new(config: AppConfig) -> SharedState {
        Self::with_store(config, PollStore::new(Utc::now()))
    }

    /// Construct the state around an existing store.
    pub fn with_store(config: AppConfig, store: PollStore) -> SharedState {
        Arc::new(Self {
            config: Arc::new(config),
            poll: Mutex::new(store),
            connections: DashMap::new(),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }

    /// Single serialization point for every poll read-modify-write.
    pub fn poll(&self) -> &Mutex<PollStore> {
        &self.poll
    }

    /// Registry of live client sockets keyed by their connection identifier.
    pub fn connections(&self) -> &DashMap<Uuid, ClientConnection> {
        &self.connections
    }

    /// Run `f` against the poll store while holding the lock.
    pub async fn read_poll<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&PollStore) -> R,
    {
        let guard = self.poll.lock().await;
        f(&guard)
    }
}
