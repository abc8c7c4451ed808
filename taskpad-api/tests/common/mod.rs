/// Common test utilities for integration tests
///
/// Provides shared infrastructure for driving the full router end-to-end:
/// - Test database setup (migrations) and cleanup
/// - Test user creation with a real password hash
/// - JWT token generation
/// - A request helper that speaks JSON to the router
///
/// Integration tests need a PostgreSQL database; when `DATABASE_URL` is not
/// configured (or unreachable) each test skips itself instead of failing.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use taskpad_api::app::{build_router, AppState};
use taskpad_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use taskpad_shared::auth::jwt::{create_token, Claims, TokenType};
use taskpad_shared::auth::password::hash_password;
use taskpad_shared::db::migrations::run_migrations;
use taskpad_shared::models::user::{CreateUser, User};
use tower::Service as _;
use uuid::Uuid;

/// Password used for every test user
pub const TEST_PASSWORD: &str = "testpass123";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a test context against the configured database
    ///
    /// Returns `None` (after logging) when no database is available so the
    /// calling test can skip.
    pub async fn maybe_new() -> Option<Self> {
        dotenvy::dotenv().ok();

        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("skipping: DATABASE_URL not set");
            return None;
        };

        let db = match PgPool::connect(&url).await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skipping: cannot connect to database: {}", e);
                return None;
            }
        };

        run_migrations(&db).await.expect("migrations should apply");

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "integration-test-secret-0123456789abcdef".to_string(),
            },
        };

        let user = create_test_user(&db).await;

        let claims = Claims::new(user.id, TokenType::Access);
        let jwt_token =
            create_token(&claims, &config.jwt.secret).expect("token creation should succeed");

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Some(Self {
            db,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Authorization header value for the context user
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Sends a JSON request through the router
    ///
    /// Returns the status code and the parsed body (Null when empty).
    pub async fn request(
        &mut self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Creates a task for the context user via the API, returns its ID
    pub async fn create_task(&mut self, title: &str, description: &str) -> Uuid {
        let token = self.jwt_token.clone();
        let (status, body) = self
            .request(
                "POST",
                "/api/tasks/",
                Some(&token),
                Some(serde_json::json!({
                    "title": title,
                    "description": description,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "task creation failed: {}", body);

        body["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("created task should have a UUID id")
    }

    /// Removes the context user and (by cascade) their tasks
    pub async fn cleanup(&self) {
        User::delete(&self.db, self.user.id)
            .await
            .expect("cleanup should succeed");
    }
}

/// Creates a user directly in the database with a unique username
pub async fn create_test_user(db: &PgPool) -> User {
    let suffix = Uuid::new_v4().simple().to_string();
    let password_hash = hash_password(TEST_PASSWORD).expect("hash should succeed");

    User::create(
        db,
        CreateUser {
            username: format!("testuser-{}", &suffix[..12]),
            email: format!("test-{}@example.com", &suffix[..12]),
            password_hash,
        },
    )
    .await
    .expect("user creation should succeed")
}
