/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use scoutstribe_api::{app::AppState, config::Config};
/// use scoutstribe_shared::store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::seeded()?), config);
/// let app = scoutstribe_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use scoutstribe_shared::{auth::middleware::authenticate, store::Repository};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Resource store
    pub store: Arc<dyn Repository>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Repository>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                                  # Banner (public)
/// ├── GET  /health                            # Health check (public)
/// └── /api/
///     ├── /auth/
///     │   ├── POST /signup                    # public
///     │   ├── POST /login                     # public
///     │   ├── POST /logout                    # public
///     │   └── GET  /me
///     ├── /channels/
///     │   ├── GET|POST /
///     │   ├── GET|POST /:channel_id/messages
///     │   └── PUT|DELETE /:channel_id/messages/:message_id
///     ├── /admin/
///     │   ├── GET|POST /users
///     │   ├── GET  /users/by-grade
///     │   ├── DELETE /users/:id
///     │   ├── PUT  /users/:id/roles
///     │   ├── PUT|DELETE /users/:id/grade
///     │   └── GET  /grades/leadership
///     ├── /grade/members/
///     │   ├── GET|POST /
///     │   └── PUT|DELETE /:id
///     ├── /members/
///     │   ├── GET  /search
///     │   ├── POST /transfer
///     │   └── POST /advance-grades
///     └── /events/
///         ├── GET|POST /
///         ├── GET  /stats
///         └── POST /:id/attendance
/// ```
///
/// Everything except the public routes goes through [`auth_layer`].
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/", get(routes::health::banner))
        .route("/health", get(routes::health::health_check))
        .route("/api/auth/signup", post(routes::auth::signup))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout));

    let channel_routes = Router::new()
        .route(
            "/",
            get(routes::channels::list_channels).post(routes::channels::create_channel),
        )
        .route(
            "/:channel_id/messages",
            get(routes::messages::list_messages).post(routes::messages::send_message),
        )
        .route(
            "/:channel_id/messages/:message_id",
            put(routes::messages::edit_message).delete(routes::messages::delete_message),
        );

    let admin_routes = Router::new()
        .route(
            "/users",
            get(routes::admin::list_users).post(routes::admin::create_user),
        )
        .route("/users/by-grade", get(routes::admin::users_by_grade))
        .route("/users/:id", axum::routing::delete(routes::admin::delete_user))
        .route("/users/:id/roles", put(routes::admin::update_roles))
        .route(
            "/users/:id/grade",
            put(routes::admin::update_grade).delete(routes::admin::remove_grade),
        )
        .route("/grades/leadership", get(routes::admin::leadership_by_grade));

    let grade_member_routes = Router::new()
        .route(
            "/",
            get(routes::members::list_members).post(routes::members::create_member),
        )
        .route(
            "/:id",
            put(routes::members::update_member).delete(routes::members::delete_member),
        );

    let member_routes = Router::new()
        .route("/search", get(routes::members::search_members))
        .route("/transfer", post(routes::members::transfer_members))
        .route("/advance-grades", post(routes::members::advance_grades));

    let event_routes = Router::new()
        .route(
            "/",
            get(routes::events::list_events).post(routes::events::create_event),
        )
        .route("/stats", get(routes::events::event_stats))
        .route("/:id/attendance", post(routes::events::record_attendance));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .nest("/api/channels", channel_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/grade/members", grade_member_routes)
        .nest("/api/members", member_routes)
        .nest("/api/events", event_routes)
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    let cors = if state.config.cors_permissive() {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
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

/// Bearer token authentication layer
///
/// Resolves the `Authorization: Bearer <token>` header to a user and
/// injects an `AuthContext` into request extensions.
async fn auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_context = authenticate(state.store.as_ref(), req.headers()).await?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
