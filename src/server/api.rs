//! HTTP server implementation

use axum::{
    extract::{Form, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::core::client::AsyncTranslator;
use crate::core::config::TranslatorConfig;
use crate::core::errors::TranslationError;
use crate::core::session::{SessionHandle, SessionStore};
use crate::server::page::{self, PageView};

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "translator_session";

/// Application state
#[derive(Clone)]
pub struct AppState {
    translator: AsyncTranslator,
    sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(translator: AsyncTranslator) -> Self {
        Self {
            translator,
            sessions: Arc::new(SessionStore::new()),
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    fn session(&self, jar: CookieJar) -> (CookieJar, SessionHandle) {
        let known = jar
            .get(SESSION_COOKIE)
            .and_then(|c| Uuid::parse_str(c.value()).ok());
        let (id, handle) = self.sessions.get_or_create(known);

        let jar = if known == Some(id) {
            jar
        } else {
            jar.add(
                Cookie::build((SESSION_COOKIE, id.to_string()))
                    .path("/")
                    .http_only(true),
            )
        };

        (jar, handle)
    }
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// Form post from the page
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub text: String,
    /// `translate` when the button was pressed, absent when the field changed
    pub action: Option<String>,
}

/// JSON translation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApiTranslateRequest {
    pub text: String,
}

/// JSON translation response
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiTranslateResponse {
    pub translation: String,
    /// True when served from the session cache without a provider call
    pub cached: bool,
    pub model: String,
}

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorDetail {
    pub message: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Translation error as an HTTP response
struct ApiError(TranslationError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, kind) = match &self.0 {
            TranslationError::EmptyInput => {
                (StatusCode::BAD_REQUEST, "invalid_request", "invalid_request_error")
            }
            TranslationError::Provider(_) => {
                (StatusCode::BAD_GATEWAY, "translation_error", "api_error")
            }
            TranslationError::Config { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error", "server_error")
            }
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                message: self.0.to_string(),
                code: code.to_string(),
                kind: kind.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health_check, api_translate),
    components(schemas(
        HealthResponse,
        ApiTranslateRequest,
        ApiTranslateResponse,
        ErrorResponse,
        ErrorDetail
    ))
)]
struct ApiDoc;

/// Health check handler
#[utoipa::path(get, path = "/healthz", responses((status = 200, body = HealthResponse)))]
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Render the form with the session's current state
async fn show_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let (jar, session) = state.session(jar);
    let session = session.lock().await;

    let html = page::render(&PageView {
        input: session.last_input(),
        result: session.translate_result(),
        error: None,
    });

    (jar, Html(html))
}

/// Form submit: translate on click or on changed input
async fn submit_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SubmitForm>,
) -> impl IntoResponse {
    let (jar, session) = state.session(jar);
    let mut session = session.lock().await;

    let clicked = form.action.as_deref() == Some("translate");
    let mut error = None;

    if session.should_translate(&form.text, clicked) {
        if let Err(e) = state.translator.translate(&mut session, &form.text).await {
            error = Some(e.to_string());
        }
    } else {
        debug!("Nothing to translate (clicked: {})", clicked);
    }

    let html = page::render(&PageView {
        input: &form.text,
        result: session.translate_result(),
        error: error.as_deref(),
    });

    (jar, Html(html))
}

/// JSON translation handler
#[utoipa::path(
    post,
    path = "/api/translate",
    request_body = ApiTranslateRequest,
    responses(
        (status = 200, description = "Translated text", body = ApiTranslateResponse),
        (status = 400, description = "Blank input", body = ErrorResponse),
        (status = 502, description = "Provider call failed", body = ErrorResponse)
    )
)]
async fn api_translate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<ApiTranslateRequest>,
) -> Result<(CookieJar, Json<ApiTranslateResponse>), (CookieJar, ApiError)> {
    let (jar, session) = state.session(jar);
    let mut session = session.lock().await;

    // the session exists now, so failures carry the cookie too
    let translation = match state.translator.translate(&mut session, &payload.text).await {
        Ok(translation) => translation,
        Err(e) => return Err((jar, ApiError(e))),
    };

    Ok((
        jar,
        Json(ApiTranslateResponse {
            translation: translation.text,
            cached: translation.from_cache,
            model: state.translator.model().to_string(),
        }),
    ))
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(show_page).post(submit_page))
        .route("/healthz", get(health_check))
        .route("/api/translate", post(api_translate))
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Periodically drop sessions that have been idle for `max_idle`
fn spawn_session_pruner(sessions: Arc<SessionStore>, max_idle: Duration) {
    let period = max_idle.clamp(Duration::from_secs(1), Duration::from_secs(60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            sessions.prune_idle(max_idle);
        }
    });
}

/// Run the HTTP server
pub async fn run_server(config: TranslatorConfig, host: String, port: u16) -> anyhow::Result<()> {
    let translator = AsyncTranslator::from_config(&config)?;
    let state = Arc::new(AppState::new(translator));

    spawn_session_pruner(state.sessions().clone(), config.session_idle());

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        warn!("Failed to bind {}: {}", addr, e);
        e
    })?;
    axum::serve(listener, app).await?;

    Ok(())
}
