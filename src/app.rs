use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full router: public routes, token-protected `/api` routes, and the JSON 404 fallback
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth_routes())
        .merge(folder_routes())
        .merge(tag_routes())
        .merge(note_routes())
        // route_layer: unknown paths fall through to the 404 fallback, not 401
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected API
        .merge(protected)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config.security));
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(public::register_post))
        .route("/api/login", post(public::login_post))
}

fn auth_routes() -> Router<AppState> {
    Router::new().route("/api/refresh", post(protected::refresh_post))
}

fn folder_routes() -> Router<AppState> {
    use protected::folders;

    Router::new()
        .route(
            "/api/folders",
            get(folders::folder_list).post(folders::folder_create),
        )
        .route(
            "/api/folders/:id",
            get(folders::folder_show)
                .put(folders::folder_update)
                .delete(folders::folder_delete),
        )
}

fn tag_routes() -> Router<AppState> {
    use protected::tags;

    Router::new()
        .route("/api/tags", get(tags::tag_list).post(tags::tag_create))
        .route(
            "/api/tags/:id",
            get(tags::tag_show)
                .put(tags::tag_update)
                .delete(tags::tag_delete),
        )
}

fn note_routes() -> Router<AppState> {
    use protected::notes;

    Router::new()
        .route("/api/notes", get(notes::note_list).post(notes::note_create))
        .route(
            "/api/notes/:id",
            get(notes::note_show)
                .put(notes::note_update)
                .delete(notes::note_delete),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let wildcard = security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*");
    if wildcard {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Noteful API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "public": ["POST /api/users", "POST /api/login"],
            "protected": [
                "POST /api/refresh",
                "/api/folders[/:id]",
                "/api/tags[/:id]",
                "/api/notes[/:id]"
            ]
        }
    }))
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, label) = match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(json!({
            "status": label,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "store": state.store.backend()
        })),
    )
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

/// Serve on an already-bound listener until Ctrl-C
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Noteful API listening on http://{}", addr);
    }
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
