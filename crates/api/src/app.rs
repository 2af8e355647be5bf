use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use domain::services::{CarpoolLimits, MockNotificationService, NotificationService};
use domain::store::{CarpoolStore, MessageStore, UserStore};
use persistence::repositories::{CarpoolRepository, MessageRepository, UserRepository};
use persistence::InMemoryStore;
use shared::clock::{Clock, SystemClock};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_user_auth, security_headers_middleware,
    trace_id,
};
use crate::routes::{auth, carpools, drivers, health, messages, users};

/// Store handles shared by handlers and jobs.
#[derive(Clone)]
pub struct Stores {
    pub carpools: Arc<dyn CarpoolStore>,
    pub messages: Arc<dyn MessageStore>,
    pub users: Arc<dyn UserStore>,
    /// Present when backed by PostgreSQL; used by readiness checks.
    pub pool: Option<PgPool>,
}

impl Stores {
    /// Process-local store; contents are lost on restart.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            carpools: store.clone(),
            messages: store.clone(),
            users: store,
            pool: None,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            carpools: Arc::new(CarpoolRepository::new(pool.clone())),
            messages: Arc::new(MessageRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub stores: Stores,
    pub clock: Arc<dyn Clock>,
    pub jwt: Arc<JwtConfig>,
    pub notifications: Arc<dyn NotificationService>,
    /// Serializes load → rule → put sequences on carpools and users.
    pub write_gate: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: Config, stores: Stores) -> Result<Self, JwtError> {
        Self::with_clock(config, stores, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: Config,
        stores: Stores,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, JwtError> {
        let jwt = JwtConfig::from_secret(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.leeway_secs,
        )?;

        Ok(Self {
            config: Arc::new(config),
            stores,
            clock,
            jwt: Arc::new(jwt),
            notifications: Arc::new(MockNotificationService::new()),
            write_gate: Arc::new(Mutex::new(())),
        })
    }

    pub fn with_notifications(mut self, notifications: Arc<dyn NotificationService>) -> Self {
        self.notifications = notifications;
        self
    }

    pub fn carpool_limits(&self) -> CarpoolLimits {
        CarpoolLimits {
            max_seats_needed: self.config.limits.max_seats_needed,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Routes that require a valid access token
    let protected_routes = Router::new()
        .route("/api/v1/users/me", get(users::get_me))
        .route(
            "/api/v1/users/me/driver",
            get(drivers::get_driver)
                .post(drivers::enable_driver)
                .put(drivers::update_driver),
        )
        .route("/api/v1/users/me/driver/verify", post(drivers::verify_driver))
        .route("/api/v1/users/me/availability", put(drivers::set_availability))
        .route(
            "/api/v1/carpools",
            get(carpools::list_carpools).post(carpools::create_carpool),
        )
        .route("/api/v1/carpools/:carpool_id", get(carpools::get_carpool))
        .route("/api/v1/carpools/:carpool_id/join", post(carpools::join_carpool))
        .route(
            "/api/v1/carpools/:carpool_id/confirm",
            post(carpools::confirm_carpool),
        )
        .route(
            "/api/v1/carpools/:carpool_id/unconfirm",
            post(carpools::unconfirm_carpool),
        )
        .route("/api/v1/carpools/:carpool_id/lock", post(carpools::lock_carpool))
        .route(
            "/api/v1/carpools/:carpool_id/cancel",
            post(carpools::cancel_carpool),
        )
        .route(
            "/api/v1/carpools/:carpool_id/messages",
            get(messages::list_messages).post(messages::post_message),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
