/// Common test utilities for integration tests
///
/// These tests run against a real Postgres instance and the real router;
/// they are marked `#[ignore]` and only run where `DATABASE_URL` and
/// `JWT_SECRET` are provisioned:
///
/// ```bash
/// cargo test -p teamsync-api -- --ignored
/// ```

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::PgPool;
use teamsync_api::app::{build_router, AppState};
use teamsync_api::config::Config;
use teamsync_shared::auth::jwt::{create_token, Claims};
use teamsync_shared::auth::password::hash_password;
use teamsync_shared::models::project::{CreateProject, Project};
use teamsync_shared::models::user::{CreateUser, User};
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub config: Config,
    pub owner: User,
    pub owner_token: String,
    /// Users created through the context, removed on cleanup
    created_users: Vec<Uuid>,
}

impl TestContext {
    /// Creates a new test context against the configured database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to the crate's Cargo.toml)
        sqlx::migrate!("../migrations").run(&db).await?;

        let owner = User::create(
            &db,
            CreateUser {
                email: format!("owner-{}@example.com", Uuid::new_v4()),
                name: "Test Owner".to_string(),
                password_hash: hash_password("Test#Passw0rd")?,
            },
        )
        .await?;

        let owner_token = create_token(&Claims::access(owner.id), &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        let created_users = vec![owner.id];

        Ok(TestContext {
            db,
            app,
            config,
            owner,
            owner_token,
            created_users,
        })
    }

    /// Creates an extra user and tracks it for cleanup
    pub async fn create_user(&mut self, name: &str) -> anyhow::Result<User> {
        let user = User::create(
            &self.db,
            CreateUser {
                email: format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4()),
                name: name.to_string(),
                password_hash: hash_password("Test#Passw0rd")?,
            },
        )
        .await?;

        self.created_users.push(user.id);
        Ok(user)
    }

    /// Creates a project owned by the given user, bypassing the API
    pub async fn create_project(&self, owner_id: Uuid, title: &str) -> anyhow::Result<Project> {
        let project = Project::create(
            &self.db,
            owner_id,
            CreateProject {
                title: title.to_string(),
                description: None,
            },
        )
        .await?;

        Ok(project)
    }

    /// Mints an access token for any user
    pub fn token_for(&self, user_id: Uuid) -> String {
        create_token(&Claims::access(user_id), &self.config.jwt.secret)
            .expect("token creation should succeed")
    }

    /// Sends a request through the router and returns status + JSON body
    pub async fn request(
        &self,
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
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
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

    /// Removes every user created through the context
    ///
    /// Projects, tasks, and memberships follow via cascade.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        for user_id in &self.created_users {
            User::delete(&self.db, *user_id).await?;
        }
        Ok(())
    }
}
