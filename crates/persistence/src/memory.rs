//! In-memory store.
//!
//! Backs all three store traits with `RwLock`-guarded maps. Used when no
//! database URL is configured and by the integration tests. Contents are
//! lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use domain::models::{CarpoolMessage, CarpoolThread, User};
use domain::store::{CarpoolStore, MessageStore, StoreResult, UserStore};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryStore {
    carpools: RwLock<HashMap<Uuid, CarpoolThread>>,
    messages: RwLock<Vec<CarpoolMessage>>,
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CarpoolStore for InMemoryStore {
    async fn get(&self, id: Uuid) -> StoreResult<Option<CarpoolThread>> {
        Ok(self.carpools.read().await.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<CarpoolThread>> {
        let mut threads: Vec<_> = self.carpools.read().await.values().cloned().collect();
        threads.sort_by_key(|t| (t.created_at, t.id));
        Ok(threads)
    }

    async fn put(&self, thread: CarpoolThread) -> StoreResult<CarpoolThread> {
        self.carpools
            .write()
            .await
            .insert(thread.id, thread.clone());
        Ok(thread)
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn list_for_carpool(&self, carpool_id: Uuid) -> StoreResult<Vec<CarpoolMessage>> {
        let mut messages: Vec<_> = self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| m.carpool_id == carpool_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    async fn put(&self, message: CarpoolMessage) -> StoreResult<CarpoolMessage> {
        let mut messages = self.messages.write().await;
        if !messages.iter().any(|m| m.id == message.id) {
            messages.push(message.clone());
        }
        Ok(message)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn get(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let mut users: Vec<_> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        Ok(users)
    }

    async fn put(&self, user: User) -> StoreResult<User> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }
}
