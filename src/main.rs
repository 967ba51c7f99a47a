use axum::{
    middleware::from_fn,
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use jobboard_api::database::manager::DatabaseManager;
use jobboard_api::handlers::{auth, companies, jobs, users};
use jobboard_api::middleware::{load_identity, require_admin, require_auth};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = jobboard_api::config::config();
    tracing::info!("Starting job board API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("JOBBOARD_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Job board API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(company_routes())
        .merge(job_routes())
        .merge(user_routes())
        // Global middleware; identity extraction runs before any route gate
        .layer(from_fn(load_identity))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    Router::new()
        .route("/auth/token", post(auth::token))
        .route("/auth/register", post(auth::register))
}

fn company_routes() -> Router {
    Router::new()
        // Public reads
        .route("/companies", get(companies::list))
        .route("/companies/:handle", get(companies::get))
        // Admin-only writes
        .merge(
            Router::new()
                .route("/companies", post(companies::create))
                .route(
                    "/companies/:handle",
                    patch(companies::update).delete(companies::delete),
                )
                .route_layer(from_fn(require_admin)),
        )
}

fn job_routes() -> Router {
    Router::new()
        .route("/jobs", get(jobs::list))
        .route("/jobs/:id", get(jobs::get))
        .merge(
            Router::new()
                .route("/jobs", post(jobs::create))
                .route("/jobs/:id", patch(jobs::update).delete(jobs::delete))
                .route_layer(from_fn(require_admin)),
        )
}

fn user_routes() -> Router {
    Router::new()
        // Self-or-admin checks need the addressed username, so ownership is
        // verified inside the handler; the route layer only demands a login
        .merge(
            Router::new()
                .route(
                    "/users/:username",
                    get(users::get).patch(users::update).delete(users::delete),
                )
                .route("/users/:username/jobs/:id", post(users::apply))
                .route_layer(from_fn(require_auth)),
        )
        .merge(
            Router::new()
                .route("/users", get(users::list).post(users::create))
                .route_layer(from_fn(require_admin)),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Job Board API",
            "version": version,
            "description": "Job board backend: companies, jobs, users and applications",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/token, /auth/register (public - token acquisition)",
                "companies": "/companies[/:handle] (reads public, writes admin)",
                "jobs": "/jobs[/:id] (reads public, writes admin)",
                "users": "/users[/:username] (admin or self)",
                "applications": "/users/:username/jobs/:id (admin or self)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
