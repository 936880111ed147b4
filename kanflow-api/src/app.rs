/// Application state and router builder
///
/// Defines the shared application state (pool, config, and the three domain
/// services wired over the Postgres repositories) and builds the Axum router
/// with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use kanflow_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use kanflow_shared::auth::{jwt, middleware::AuthContext};
use kanflow_shared::repo::postgres::{PgBoardRepository, PgTaskRepository, PgUserRepository};
use kanflow_shared::services::{BoardService, TaskService, UserService};

use crate::{config::Config, middleware::security::SecurityHeadersLayer};

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; the services hold `Arc`s
/// over the repositories, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// User operations
    pub users: UserService,

    /// Board operations
    pub boards: BoardService,

    /// Task operations
    pub tasks: TaskService,
}

impl AppState {
    /// Creates application state, wiring services over Postgres repositories
    pub fn new(db: PgPool, config: Config) -> Self {
        let user_repo = Arc::new(PgUserRepository::new(db.clone()));
        let board_repo = Arc::new(PgBoardRepository::new(db.clone()));
        let task_repo = Arc::new(PgTaskRepository::new(db.clone()));

        Self {
            users: UserService::new(user_repo.clone()),
            boards: BoardService::new(board_repo.clone(), user_repo, task_repo.clone()),
            tasks: TaskService::new(task_repo, board_repo),
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /v1/                             # API v1
///     ├── /auth/                       # Public
///     │   ├── POST /register
///     │   ├── POST /login
///     │   └── POST /refresh
///     ├── /users/                      # JWT required
///     │   ├── GET    /                 # Search users
///     │   ├── GET    /me
///     │   ├── PUT    /me
///     │   └── DELETE /me               # Deactivate account
///     ├── /boards/                     # JWT required
///     │   ├── POST   /
///     │   ├── GET    /                 # Accessible boards, ?q= search
///     │   ├── GET    /:id
///     │   ├── PUT    /:id
///     │   ├── DELETE /:id              # Deactivate (cascades tasks)
///     │   ├── POST   /:id/members
///     │   ├── DELETE /:id/members/:user_id
///     │   ├── POST   /:id/transfer
///     │   └── GET    /:id/tasks        # Filterable listing
///     └── /tasks/                      # JWT required
///         ├── POST   /
///         ├── GET    /mine             # Assigned/created listing
///         ├── GET    /:id
///         ├── PUT    /:id
///         ├── DELETE /:id
///         ├── POST   /:id/status
///         └── POST   /:id/move
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // User routes (require JWT authentication)
    let user_routes = Router::new()
        .route("/", get(routes::users::search_users))
        .route(
            "/me",
            get(routes::users::get_me)
                .put(routes::users::update_me)
                .delete(routes::users::deactivate_me),
        );

    // Board routes (require JWT authentication)
    let board_routes = Router::new()
        .route(
            "/",
            post(routes::boards::create_board).get(routes::boards::list_boards),
        )
        .route(
            "/:id",
            get(routes::boards::get_board)
                .put(routes::boards::update_board)
                .delete(routes::boards::deactivate_board),
        )
        .route("/:id/members", post(routes::boards::add_member))
        .route(
            "/:id/members/:user_id",
            axum::routing::delete(routes::boards::remove_member),
        )
        .route("/:id/transfer", post(routes::boards::transfer_ownership))
        .route("/:id/tasks", get(routes::boards::list_board_tasks));

    // Task routes (require JWT authentication)
    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route("/mine", get(routes::tasks::list_my_tasks))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/:id/status", post(routes::tasks::change_status))
        .route("/:id/move", post(routes::tasks::move_task));

    // Everything except /auth sits behind the JWT layer
    let protected = Router::new()
        .nest("/users", user_routes)
        .nest("/boards", board_routes)
        .nest("/tasks", task_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new().nest("/auth", auth_routes).merge(protected);

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
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Validates the Bearer token from the Authorization header and injects an
/// [`AuthContext`] into the request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let token = kanflow_shared::auth::middleware::extract_bearer_token(req.headers())?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthContext::from_jwt(claims.sub));

    Ok(next.run(req).await)
}
