use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http::{self, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use platform_authn::{AuthError, Authenticator, InboundRequest};
use platform_authz::{ActionContext, ActionKey, ActionPayload, OwnerFilter, authorize};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<Authenticator>,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "gateway server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_methods([Method::POST, Method::GET])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/authorize", post(authorize_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

/// The authenticator's view of an axum request.
struct RequestDescriptor<'a> {
    headers: &'a HeaderMap,
    uri: &'a Uri,
}

impl InboundRequest for RequestDescriptor<'_> {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    fn target(&self) -> &str {
        self.uri.path()
    }
}

#[derive(Debug, Deserialize)]
struct AuthorizeRequest {
    /// `resource:action` key, e.g. `threads:create`.
    action: String,
    #[serde(default)]
    payload: ActionPayload,
}

#[derive(Debug, Serialize)]
struct AuthorizeResponse {
    /// Scoping filter for the storage layer; `null` for the studio bypass.
    filter: Option<OwnerFilter>,
    /// The payload as the policy layer left it (owner-tagged on creates).
    payload: ActionPayload,
}

async fn authorize_handler(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    Json(request): Json<AuthorizeRequest>,
) -> HttpResult<Json<AuthorizeResponse>> {
    let descriptor = RequestDescriptor {
        headers: &headers,
        uri: &uri,
    };
    let session = state.authenticator.authenticate(&descriptor).await?;
    let key = ActionKey::from_str(&request.action).ok_or_else(|| {
        HttpError::new(
            StatusCode::BAD_REQUEST,
            format!("unknown action: {}", request.action),
        )
    })?;
    let mut payload = request.payload;
    let filter = authorize(
        key,
        ActionContext {
            value: &mut payload,
            user: &session.identity,
            permissions: &session.permissions,
        },
    )?;
    Ok(Json(AuthorizeResponse { filter, payload }))
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    version: &'static str,
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<AuthError> for HttpError {
    fn from(err: AuthError) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message,
            "code": self.status.as_u16(),
        });
        (self.status, Json(body)).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
