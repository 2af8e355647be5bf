//! Shared fixtures for the integration tests.
//!
//! Every test builds its own router over a fresh in-memory store and a
//! fixed clock, so tests are independent and need no database.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use carpool_api::app::{create_app, AppState, Stores};
use carpool_api::config::{
    Config, DatabaseConfig, JobsConfig, JwtAuthConfig, LimitsConfig, LoggingConfig,
    SecurityConfig, ServerConfig,
};
use chrono::{Duration, NaiveDate};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use shared::clock::FixedClock;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

/// Calendar date the test clock starts on.
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 5,
            idle_timeout_secs: 60,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig::default(),
        jwt: JwtAuthConfig {
            secret: "integration-test-secret-at-least-32-bytes".to_string(),
            access_token_expiry_secs: 3600,
            leeway_secs: 30,
        },
        limits: LimitsConfig {
            max_seats_needed: 7,
            max_message_length: 280,
        },
        jobs: JobsConfig::default(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub clock: FixedClock,
}

/// A registered account and its bearer token.
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let clock = FixedClock::at_date(start_date());
        let state = AppState::with_clock(test_config(), Stores::in_memory(), Arc::new(clock.clone()))
            .expect("test config has a valid JWT secret");
        Self {
            router: create_app(state),
            clock,
        }
    }

    /// Sends one request and returns the status with the JSON body
    /// (`Value::Null` when the body is empty or not JSON).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    /// Registers a fresh account with a fake email and name.
    pub async fn register(&self) -> TestUser {
        let email: String = SafeEmail().fake();
        let email = format!("{}.{}", Uuid::new_v4().simple(), email.to_lowercase());
        let name: String = Name().fake();

        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "campus-password",
                    "displayName": name,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        TestUser {
            id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
            email,
            token: body["tokens"]["accessToken"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a carpool `days_ahead` days after the current test date.
    pub async fn create_carpool(&self, creator: &TestUser, days_ahead: i64, start: &str) -> Value {
        let date = self.today() + Duration::days(days_ahead);
        let (status, body) = self
            .post(
                "/api/v1/carpools",
                &creator.token,
                json!({
                    "destination": "Airport",
                    "date": date.to_string(),
                    "timeWindow": { "start": start, "end": "23:30" },
                    "pickupArea": "North Campus",
                    "seatsNeeded": 2,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body
    }

    pub fn today(&self) -> NaiveDate {
        use shared::clock::Clock;
        self.clock.today()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
