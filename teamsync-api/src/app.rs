/// Application state and router builder
///
/// This module defines the shared application state and provides a
/// function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use teamsync_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = teamsync_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use teamsync_shared::auth::middleware::create_auth_middleware;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Gets the public base URL for links sent to users
    pub fn public_url(&self) -> &str {
        &self.config.api.public_url
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                              # public
/// ├── /auth/
/// │   ├── POST /signup                          # public
/// │   ├── POST /login                           # public
/// │   ├── POST /request-password-reset          # public
/// │   ├── POST /reset-password                  # public
/// │   └── GET  /me                              # authenticated
/// ├── /projects/                                # authenticated
/// │   ├── POST   /                              # create project
/// │   ├── GET    /                              # list own projects
/// │   ├── POST   /join?token=                   # redeem invite
/// │   ├── DELETE /:id                           # owner only
/// │   ├── POST   /:id/members                   # owner only
/// │   ├── GET    /:id/members
/// │   ├── PUT    /:id/members/:user_id          # owner only
/// │   ├── DELETE /:id/members/:user_id          # owner only
/// │   ├── GET    /:id/invite-link               # owner only
/// │   └── POST/GET /:id/tasks                   # owner only
/// └── /tasks/:id (PATCH, DELETE)                # owner only, via project
/// ```
///
/// Authenticated routes share one middleware layer that resolves the
/// bearer token to a user record; ownership checks happen per-handler
/// against the store.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes, no auth
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/signup", post(routes::auth::signup))
        .route("/auth/login", post(routes::auth::login))
        .route(
            "/auth/request-password-reset",
            post(routes::auth::request_password_reset),
        )
        .route("/auth/reset-password", post(routes::auth::reset_password));

    // Everything else requires a resolvable bearer token
    let protected_routes = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route(
            "/projects",
            post(routes::projects::create_project).get(routes::projects::list_projects),
        )
        .route("/projects/join", post(routes::members::join_project))
        .route("/projects/:id", delete(routes::projects::delete_project))
        .route(
            "/projects/:id/members",
            post(routes::members::add_member).get(routes::members::list_members),
        )
        .route(
            "/projects/:id/members/:user_id",
            put(routes::members::update_member_role).delete(routes::members::remove_member),
        )
        .route(
            "/projects/:id/invite-link",
            get(routes::members::generate_invite_link),
        )
        .route(
            "/projects/:id/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/tasks/:id",
            patch(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn(create_auth_middleware(
            state.db.clone(),
            state.jwt_secret().to_string(),
        )));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
