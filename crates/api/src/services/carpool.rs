//! Carpool thread and chat operations.

use std::sync::Arc;

use domain::models::carpool::ListCarpoolsQuery;
use domain::models::{CarpoolMessage, CarpoolThread, NewCarpool};
use domain::services::carpool_lifecycle::{self, CarpoolLimits, Transition};
use domain::services::{chat, feed};
use domain::store::{CarpoolStore, MessageStore};
use domain::DomainError;
use shared::clock::Clock;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::app::AppState;
use crate::middleware::metrics::{record_carpool_created, record_carpool_transition};

/// Membership and lifecycle actions on an existing thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarpoolAction {
    Join,
    Confirm,
    Unconfirm,
    Lock,
    Cancel,
}

impl CarpoolAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarpoolAction::Join => "join",
            CarpoolAction::Confirm => "confirm",
            CarpoolAction::Unconfirm => "unconfirm",
            CarpoolAction::Lock => "lock",
            CarpoolAction::Cancel => "cancel",
        }
    }

    fn apply(
        self,
        thread: CarpoolThread,
        actor_id: Uuid,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Transition, DomainError> {
        match self {
            CarpoolAction::Join => carpool_lifecycle::join(thread, actor_id, now),
            CarpoolAction::Confirm => carpool_lifecycle::confirm(thread, actor_id, now),
            CarpoolAction::Unconfirm => carpool_lifecycle::unconfirm(thread, actor_id, now),
            CarpoolAction::Lock => carpool_lifecycle::lock(thread, actor_id, now),
            CarpoolAction::Cancel => carpool_lifecycle::cancel(thread, actor_id, now),
        }
    }
}

pub struct CarpoolService {
    carpools: Arc<dyn CarpoolStore>,
    messages: Arc<dyn MessageStore>,
    clock: Arc<dyn Clock>,
    write_gate: Arc<Mutex<()>>,
    limits: CarpoolLimits,
    max_message_length: usize,
}

impl CarpoolService {
    pub fn new(
        carpools: Arc<dyn CarpoolStore>,
        messages: Arc<dyn MessageStore>,
        clock: Arc<dyn Clock>,
        write_gate: Arc<Mutex<()>>,
        limits: CarpoolLimits,
        max_message_length: usize,
    ) -> Self {
        Self {
            carpools,
            messages,
            clock,
            write_gate,
            limits,
            max_message_length,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.stores.carpools.clone(),
            state.stores.messages.clone(),
            state.clock.clone(),
            state.write_gate.clone(),
            state.carpool_limits(),
            state.config.limits.max_message_length,
        )
    }

    pub async fn create(
        &self,
        creator_id: Uuid,
        input: NewCarpool,
    ) -> Result<CarpoolThread, DomainError> {
        let thread = carpool_lifecycle::create(creator_id, input, &self.limits, self.clock.now())?;
        let thread = self.carpools.put(thread).await?;

        record_carpool_created();
        tracing::info!(
            carpool_id = %thread.id,
            creator_id = %creator_id,
            date = %thread.date,
            status = %thread.status,
            "Carpool created"
        );
        Ok(thread)
    }

    /// The feed: expiry projection, filters, soonest first.
    pub async fn list(&self, query: &ListCarpoolsQuery) -> Result<Vec<CarpoolThread>, DomainError> {
        let criteria = feed::parse_query(query)?;
        let threads = self.carpools.list().await?;
        Ok(feed::assemble(threads, &criteria, self.clock.today()))
    }

    pub async fn get(&self, id: Uuid) -> Result<CarpoolThread, DomainError> {
        let thread = self.load(id).await?;
        Ok(feed::project_expiry(thread, self.clock.today()))
    }

    /// Runs one lifecycle action under the write gate. No-ops are not stored.
    ///
    /// The action sees the same status a read would, so a thread past its
    /// date rejects membership changes and locking as `EXPIRED`.
    pub async fn apply(
        &self,
        id: Uuid,
        actor_id: Uuid,
        action: CarpoolAction,
    ) -> Result<CarpoolThread, DomainError> {
        let _guard = self.write_gate.lock().await;

        let thread = feed::project_expiry(self.load(id).await?, self.clock.today());
        let transition = action.apply(thread, actor_id, self.clock.now())?;

        if !transition.changed {
            tracing::debug!(carpool_id = %id, action = action.as_str(), "No-op carpool action");
            return Ok(transition.thread);
        }

        let thread = self.carpools.put(transition.thread).await?;
        record_carpool_transition(action.as_str());
        tracing::info!(
            carpool_id = %id,
            actor_id = %actor_id,
            action = action.as_str(),
            status = %thread.status,
            confirmed = thread.confirmed_count,
            interested = thread.interested_count,
            "Carpool updated"
        );
        Ok(thread)
    }

    pub async fn list_messages(&self, carpool_id: Uuid) -> Result<Vec<CarpoolMessage>, DomainError> {
        self.load(carpool_id).await?;
        let messages = self.messages.list_for_carpool(carpool_id).await?;
        Ok(chat::sort_chronologically(messages))
    }

    pub async fn post_message(
        &self,
        carpool_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<CarpoolMessage, DomainError> {
        let thread = self.load(carpool_id).await?;
        let message = chat::compose(
            &thread,
            user_id,
            content,
            self.max_message_length,
            self.clock.now(),
        )?;
        let message = self.messages.put(message).await?;

        tracing::debug!(carpool_id = %carpool_id, message_id = %message.id, "Message posted");
        Ok(message)
    }

    async fn load(&self, id: Uuid) -> Result<CarpoolThread, DomainError> {
        self.carpools
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Carpool".to_string()))
    }
}
