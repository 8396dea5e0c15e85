use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::{net::SocketAddr, sync::Arc};

use crate::{budget, categories, reports, settings, system, users};
use engine::Engine;

/// Options of the HTTP server.
#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Bearer token guarding `/api/reset`. Without it the route is not mounted.
    pub reset_secret: Option<String>,
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub reset_secret: Option<Arc<str>>,
}

async fn reset_auth(
    State(state): State<ServerState>,
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let (Some(secret), Some(TypedHeader(auth))) = (state.reset_secret.as_deref(), auth_header)
    else {
        tracing::warn!("reset request without credentials");
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth.token() != secret {
        tracing::warn!("reset request with wrong token");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

fn build_router(state: ServerState) -> Router {
    let mut router = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", get(users::get).delete(users::remove))
        .route("/users/{id}/switch", post(users::switch))
        .route("/users/{id}/budget", get(budget::get_budget))
        .route("/users/{id}/income", put(budget::update_income))
        .route(
            "/users/{id}/expenses",
            get(budget::list_expenses).post(budget::expense_new),
        )
        .route("/expenses/{id}", delete(budget::remove_expense))
        .route(
            "/users/{id}/categories",
            get(categories::list).post(categories::create),
        )
        .route("/users/{id}/categories/options", get(categories::options))
        .route("/categories/{id}", delete(categories::remove))
        .route("/users/{id}/currency", put(settings::update_currency))
        .route("/users/{id}/export", get(settings::export))
        .route("/users/{id}/import", post(settings::import))
        .route("/users/{id}/clear", post(settings::clear))
        .route("/users/{id}/breakdown", get(reports::breakdown))
        .route("/users/{id}/summary", get(reports::summary))
        .route("/users/{id}/report", get(reports::report))
        .route("/api/system/status", get(system::status));

    if state.reset_secret.is_some() {
        router = router.route(
            "/api/reset",
            get(system::reset).route_layer(middleware::from_fn_with_state(
                state.clone(),
                reset_auth,
            )),
        );
    }

    router.with_state(state)
}

/// The API router over `engine`.
pub fn router(engine: Engine, config: ServerConfig) -> Router {
    build_router(ServerState {
        engine: Arc::new(engine),
        reset_secret: config.reset_secret.map(Arc::from),
    })
}

pub async fn run(engine: Engine, config: ServerConfig, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, config, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);
    if config.reset_secret.is_none() {
        tracing::info!("no reset secret configured, /api/reset disabled");
    }

    axum::serve(listener, router(engine, config)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, config, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
