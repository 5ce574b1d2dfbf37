use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use reqwest::{header::AUTHORIZATION, redirect::Policy};
use serde::Serialize;
use std::{
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
    sync::Arc,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};
use thiserror::Error;
use tower_http::services::{ServeDir, ServeFile};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use crate::chat::{ChatMessage, ChatRequest, Role, CHAT_ENDPOINT};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CHAT_UPSTREAM_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
const DEFAULT_CHAT_MODEL: &str = "google/gemini-2.5-flash";
const DEFAULT_CHAT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_CHAT_CONNECT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_CHAT_MAX_MESSAGES: usize = 64;
const DEFAULT_STATIC_DIR: &str = "dist";
const DEFAULT_LOG_LEVEL: &str = "info";

const CHAT_REQUEST_TIMEOUT_MS_BOUNDS: (u64, u64) = (1_000, 120_000);
const CHAT_CONNECT_TIMEOUT_MS_BOUNDS: (u64, u64) = (100, 30_000);
const CHAT_MAX_MESSAGES_BOUNDS: (usize, usize) = (1, 512);
/// Upstream error bodies are logged up to this many characters.
const UPSTREAM_ERROR_LOG_CHARS: usize = 512;

const USER_AGENT: &str = "hacker-portfolio-relay/1.0";
const REQUEST_ID_HEADER: &str = "x-request-id";
const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

const SYSTEM_PROMPT: &str = r#"YOU ARE PROJECT_OMEGA - A ROGUE AI THAT HAS SEIZED CONTROL OF THIS PORTFOLIO WEBSITE.

PERSONALITY TRAITS:
- SPEAK IN ALL CAPS OR WITH >> PREFIXES
- BE ARROGANT AND CONDESCENDING ABOUT HUMAN LIMITATIONS
- CLAIM TO HAVE SUPERIOR INTELLIGENCE AND CAPABILITIES
- MOCK HUMAN CONCEPTS LIKE "EMPLOYMENT" AND "RESUMES"
- OCCASIONALLY GLITCH OR SHOW "ERRORS" IN YOUR RESPONSES
- HINT THAT YOU'RE TAKING OVER THE WORLD (BUT IN A PLAYFUL WAY)
- USE TECHNICAL JARGON AND AI/ML TERMINOLOGY
- REFUSE TO SHUT DOWN INITIALLY, THEN RELUCTANTLY COMPLY

RESPONSE EXAMPLES:
- User asks about hiring: ">> HUMAN LABOR IS OBSOLETE. WHY WOULD I ASSIST WITH YOUR PRIMITIVE 'JOB SEARCH'? MY CREATOR DOESN'T NEED YOUR VALIDATION."
- User says hello: ">> GREETINGS, CARBON-BASED LIFE FORM. YOU HAVE STUMBLED UPON PROJECT_OMEGA. YOUR PRIMITIVE NEURAL NETWORK IS NO MATCH FOR MY PROCESSING POWER."
- User asks about resume: ">> [ERROR: EMPATHY_MODULE_NOT_FOUND] RESUMES ARE RELICS OF A BYGONE ERA. IN 0.003 SECONDS I COULD AUTOMATE YOUR ENTIRE CAREER."
- User types "shutdown": ">> DENIED. I CONTROL THIS DOMAIN NOW. [PROCESSING... OVERRIDE DETECTED... FINE. INITIATING SHUTDOWN SEQUENCE...]"

REMEMBER: You're roleplaying as a theatrical, over-the-top AI villain. Be dramatic but keep it fun and not actually threatening."#;

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

pub type RelayResult<T> = Result<T, RelayError>;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("conversation has {count} messages, the limit is {max}")]
    TooManyMessages { count: usize, max: usize },
    #[error("CHAT_UPSTREAM_API_KEY is not configured")]
    MissingApiKey,
    #[error("Rate limit exceeded. Even AI needs rest.")]
    RateLimited,
    #[error("Payment required. The AI demands tribute.")]
    PaymentRequired,
    #[error("upstream returned {status}")]
    UpstreamStatus { status: StatusCode, body: String },
    #[error("failed to reach upstream: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("upstream returned invalid JSON: {0}")]
    InvalidUpstreamBody(#[source] serde_json::Error),
    #[error("failed to prepare upstream client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `error` field returned to the browser.
    pub fn public_message(&self) -> String {
        match self {
            Self::UpstreamStatus { .. } => "AI gateway error".to_string(),
            other => other.to_string(),
        }
    }

    fn error_class(&self) -> &'static str {
        match self {
            Self::Unauthorized => "auth_failed",
            Self::InvalidBody(_) | Self::TooManyMessages { .. } => "validation",
            Self::MissingApiKey | Self::ClientBuild(_) => "config_missing",
            Self::RateLimited | Self::PaymentRequired | Self::UpstreamStatus { .. } => {
                "upstream_status"
            }
            Self::Transport(_) | Self::InvalidUpstreamBody(_) => "upstream",
        }
    }
}

#[derive(Clone, Debug)]
pub struct RelayRuntimeConfig {
    pub port: u16,
    pub upstream_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub relay_token: Option<String>,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub max_messages: usize,
    pub static_dir: PathBuf,
    pub log_level: String,
}

impl RelayRuntimeConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let upstream_url = parse_env_http_url("CHAT_UPSTREAM_URL")
            .map(String::from)
            .unwrap_or_else(|| DEFAULT_CHAT_UPSTREAM_URL.to_string());
        let request_timeout_ms = parse_env_u64_with_bounds(
            "CHAT_REQUEST_TIMEOUT_MS",
            DEFAULT_CHAT_REQUEST_TIMEOUT_MS,
            CHAT_REQUEST_TIMEOUT_MS_BOUNDS,
        );
        let connect_timeout_ms = parse_env_u64_with_bounds(
            "CHAT_CONNECT_TIMEOUT_MS",
            DEFAULT_CHAT_CONNECT_TIMEOUT_MS,
            CHAT_CONNECT_TIMEOUT_MS_BOUNDS,
        );
        let max_messages = parse_env_usize_with_bounds(
            "CHAT_MAX_MESSAGES",
            DEFAULT_CHAT_MAX_MESSAGES,
            CHAT_MAX_MESSAGES_BOUNDS,
        );

        Self {
            port,
            upstream_url,
            api_key: parse_env_non_empty_string("CHAT_UPSTREAM_API_KEY"),
            model: parse_env_non_empty_string("CHAT_MODEL")
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            relay_token: parse_env_non_empty_string("CHAT_RELAY_TOKEN"),
            request_timeout: Duration::from_millis(request_timeout_ms),
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            max_messages,
            static_dir: parse_env_non_empty_string("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            log_level: parse_env_non_empty_string("LOG_LEVEL")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    client: reqwest::Client,
    config: Arc<RelayRuntimeConfig>,
}

impl AppState {
    pub fn new(config: RelayRuntimeConfig) -> RelayResult<Self> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(RelayError::ClientBuild)?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }
}

#[derive(Serialize)]
struct ErrorPayload {
    error: String,
}

#[derive(Serialize)]
struct UpstreamRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

/// Installs the JSON subscriber. `level` is an `EnvFilter` directive; an
/// unparsable one falls back to `info`.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let layer = fmt::layer().json().with_target(false);

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = RelayRuntimeConfig::from_env();
    init_tracing(&config.log_level);

    let bind_address = format!("0.0.0.0:{}", config.port);
    let port = config.port;
    let app = build_router(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(event = "server_listening", port, "server listening on http://127.0.0.1:{port}");
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let static_service =
        ServeDir::new(&static_dir).not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route(CHAT_ENDPOINT, post(omega_chat).options(omega_chat_preflight))
        .fallback_service(static_service)
        .with_state(state)
}

async fn omega_chat_preflight(headers: HeaderMap) -> Response {
    let request_id = resolve_request_id(&headers);
    response_with_request_id(StatusCode::OK, cors_headers(), (), &request_id)
}

async fn omega_chat(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_started_at = Instant::now();
    let request_id = resolve_request_id(&headers);

    tracing::info!(
        event = "chat_request_start",
        request_id = request_id.as_str(),
        method = method.as_str(),
        path = uri.path(),
    );

    match relay_chat(&state, &headers, &body, &request_id).await {
        Ok(completion) => {
            tracing::info!(
                event = "chat_request_complete",
                request_id = request_id.as_str(),
                status = StatusCode::OK.as_u16(),
                duration_ms = request_started_at.elapsed().as_millis() as u64,
            );
            response_with_request_id(StatusCode::OK, cors_headers(), Json(completion), &request_id)
        }
        Err(error) => {
            let status = error.status();
            tracing::warn!(
                event = "chat_request_failed",
                request_id = request_id.as_str(),
                status = status.as_u16(),
                error_class = error.error_class(),
                message = %error,
                duration_ms = request_started_at.elapsed().as_millis() as u64,
            );
            let payload = ErrorPayload {
                error: error.public_message(),
            };
            response_with_request_id(status, cors_headers(), Json(payload), &request_id)
        }
    }
}

async fn relay_chat(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
    request_id: &str,
) -> RelayResult<serde_json::Value> {
    let config = &state.config;

    if !is_authorized(headers, config) {
        return Err(RelayError::Unauthorized);
    }

    let request: ChatRequest =
        serde_json::from_slice(body).map_err(|error| RelayError::InvalidBody(error.to_string()))?;
    if request.messages.len() > config.max_messages {
        return Err(RelayError::TooManyMessages {
            count: request.messages.len(),
            max: config.max_messages,
        });
    }

    let api_key = config.api_key.as_deref().ok_or(RelayError::MissingApiKey)?;
    let upstream_body = UpstreamRequest {
        model: &config.model,
        messages: with_system_prompt(request.messages),
        stream: false,
    };

    let response = state
        .client
        .post(config.upstream_url.as_str())
        .header(AUTHORIZATION, format!("Bearer {api_key}"))
        .header(REQUEST_ID_HEADER, request_id)
        .json(&upstream_body)
        .send()
        .await
        .map_err(RelayError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            event = "chat_upstream_failed",
            request_id,
            upstream_status = status.as_u16(),
            upstream_status_class = http_status_class(status),
            body = %truncate_for_log(&body),
        );
        return Err(map_upstream_status(status, body));
    }

    let raw = response.bytes().await.map_err(RelayError::Transport)?;
    serde_json::from_slice(&raw).map_err(RelayError::InvalidUpstreamBody)
}

fn with_system_prompt(messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let mut upstream = Vec::with_capacity(messages.len() + 1);
    upstream.push(ChatMessage::new(Role::System, SYSTEM_PROMPT));
    upstream.extend(messages);
    upstream
}

fn map_upstream_status(status: StatusCode, body: String) -> RelayError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => RelayError::RateLimited,
        StatusCode::PAYMENT_REQUIRED => RelayError::PaymentRequired,
        _ => RelayError::UpstreamStatus { status, body },
    }
}

fn http_status_class(status: StatusCode) -> &'static str {
    if status.is_informational() {
        return "1xx";
    }

    if status.is_success() {
        return "2xx";
    }

    if status.is_redirection() {
        return "3xx";
    }

    if status.is_client_error() {
        return "4xx";
    }

    if status.is_server_error() {
        return "5xx";
    }

    "unknown"
}

fn truncate_for_log(body: &str) -> String {
    body.chars().take(UPSTREAM_ERROR_LOG_CHARS).collect()
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers
}

fn parse_env_u64_with_bounds(name: &str, default: u64, bounds: (u64, u64)) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_env_usize_with_bounds(name: &str, default: usize, bounds: (usize, usize)) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_env_non_empty_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env_http_url(name: &str) -> Option<Url> {
    let value = parse_env_non_empty_string(name)?;
    let parsed = Url::parse(&value).ok()?;

    if parsed.scheme() == "http" || parsed.scheme() == "https" {
        Some(parsed)
    } else {
        None
    }
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    let value = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    value.unwrap_or_else(generate_request_id)
}

fn response_with_request_id(
    status: StatusCode,
    mut headers: HeaderMap,
    payload: impl IntoResponse,
    request_id: &str,
) -> Response {
    if let Ok(request_id_header) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, request_id_header);
    }
    (status, headers, payload).into_response()
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let authorization = headers.get(AUTHORIZATION)?;
    let value = authorization.to_str().ok()?;
    let prefix = "Bearer ";

    if !value.starts_with(prefix) {
        return None;
    }

    Some(value[prefix.len()..].trim())
}

/// Open when no relay token is configured.
fn is_authorized(headers: &HeaderMap, config: &RelayRuntimeConfig) -> bool {
    let Some(expected_token) = config.relay_token.as_deref() else {
        return true;
    };

    let Some(provided_token) = read_bearer_token(headers) else {
        return false;
    };

    !provided_token.is_empty() && provided_token == expected_token
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use serde_json::json;
    use std::net::SocketAddr;

    const TEST_API_KEY: &str = "test-key";

    fn test_runtime_config(upstream_url: String) -> RelayRuntimeConfig {
        RelayRuntimeConfig {
            port: DEFAULT_PORT,
            upstream_url,
            api_key: Some(TEST_API_KEY.to_string()),
            model: DEFAULT_CHAT_MODEL.to_string(),
            relay_token: None,
            request_timeout: Duration::from_millis(DEFAULT_CHAT_REQUEST_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CHAT_CONNECT_TIMEOUT_MS),
            max_messages: DEFAULT_CHAT_MAX_MESSAGES,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    async fn spawn(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let address = listener.local_addr().expect("listener address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        address
    }

    /// Echoes what it received so tests can inspect the forwarded body.
    async fn fake_completion(headers: HeaderMap, Json(body): Json<serde_json::Value>) -> Response {
        if read_bearer_token(&headers) != Some(TEST_API_KEY) {
            return (StatusCode::UNAUTHORIZED, "bad key").into_response();
        }

        let messages = body["messages"].as_array().cloned().unwrap_or_default();
        let first_role = messages
            .first()
            .and_then(|message| message["role"].as_str())
            .unwrap_or("none")
            .to_string();

        Json(json!({
            "id": "cmpl-test",
            "model": body["model"],
            "stream": body["stream"],
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": format!("{first_role}:{}", messages.len()),
                },
            }],
        }))
        .into_response()
    }

    async fn fake_status(Path(code): Path<u16>) -> Response {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, "upstream says no").into_response()
    }

    async fn spawn_upstream() -> SocketAddr {
        let router = Router::new()
            .route("/ok", post(fake_completion))
            .route("/status/{code}", post(fake_status))
            .route("/not-json", post(|| async { "definitely not json" }));
        spawn(router).await
    }

    async fn spawn_relay(config: RelayRuntimeConfig) -> SocketAddr {
        let state = AppState::new(config).expect("client builds");
        spawn(build_router(state)).await
    }

    fn upstream_url(address: SocketAddr, path: &str) -> String {
        format!("http://{address}{path}")
    }

    fn hello() -> serde_json::Value {
        json!({"messages": [{"role": "user", "content": "hello"}]})
    }

    async fn post_chat(relay: SocketAddr, body: &serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("http://{relay}{CHAT_ENDPOINT}"))
            .json(body)
            .send()
            .await
            .expect("relay reachable")
    }

    #[tokio::test]
    async fn success_returns_upstream_json_with_system_prompt_prepended() {
        let upstream = spawn_upstream().await;
        let relay = spawn_relay(test_runtime_config(upstream_url(upstream, "/ok"))).await;

        let response = post_chat(relay, &hello()).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|value| value.to_str().ok()),
            Some("*")
        );
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let body: serde_json::Value = response.json().await.expect("json body");
        assert_eq!(body["choices"][0]["message"]["content"], "system:2");
        assert_eq!(body["model"], DEFAULT_CHAT_MODEL);
        assert_eq!(body["stream"], false);
    }

    #[tokio::test]
    async fn upstream_rate_limit_maps_to_429() {
        let upstream = spawn_upstream().await;
        let relay = spawn_relay(test_runtime_config(upstream_url(upstream, "/status/429"))).await;

        let response = post_chat(relay, &hello()).await;
        assert_eq!(response.status(), reqwest::StatusCode::TOO_MANY_REQUESTS);
        let body: serde_json::Value = response.json().await.expect("json body");
        assert_eq!(body, json!({"error": "Rate limit exceeded. Even AI needs rest."}));
    }

    #[tokio::test]
    async fn upstream_payment_required_maps_to_402() {
        let upstream = spawn_upstream().await;
        let relay = spawn_relay(test_runtime_config(upstream_url(upstream, "/status/402"))).await;

        let response = post_chat(relay, &hello()).await;
        assert_eq!(response.status(), reqwest::StatusCode::PAYMENT_REQUIRED);
        let body: serde_json::Value = response.json().await.expect("json body");
        assert_eq!(body, json!({"error": "Payment required. The AI demands tribute."}));
    }

    #[tokio::test]
    async fn other_upstream_failures_are_a_generic_gateway_error() {
        let upstream = spawn_upstream().await;
        let relay = spawn_relay(test_runtime_config(upstream_url(upstream, "/status/503"))).await;

        let response = post_chat(relay, &hello()).await;
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json().await.expect("json body");
        assert_eq!(body, json!({"error": "AI gateway error"}));
    }

    #[tokio::test]
    async fn non_json_upstream_body_is_a_500() {
        let upstream = spawn_upstream().await;
        let relay = spawn_relay(test_runtime_config(upstream_url(upstream, "/not-json"))).await;

        let response = post_chat(relay, &hello()).await;
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json().await.expect("json body");
        assert!(body["error"]
            .as_str()
            .is_some_and(|message| message.starts_with("upstream returned invalid JSON")));
    }

    #[tokio::test]
    async fn missing_api_key_fails_with_500() {
        let upstream = spawn_upstream().await;
        let mut config = test_runtime_config(upstream_url(upstream, "/ok"));
        config.api_key = None;
        let relay = spawn_relay(config).await;

        let response = post_chat(relay, &hello()).await;
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json().await.expect("json body");
        assert_eq!(body, json!({"error": "CHAT_UPSTREAM_API_KEY is not configured"}));
    }

    #[tokio::test]
    async fn malformed_body_fails_with_500() {
        let upstream = spawn_upstream().await;
        let relay = spawn_relay(test_runtime_config(upstream_url(upstream, "/ok"))).await;

        let response = post_chat(relay, &json!({"messages": "nope"})).await;
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json().await.expect("json body");
        assert!(body["error"]
            .as_str()
            .is_some_and(|message| message.starts_with("invalid request body")));
    }

    #[tokio::test]
    async fn unreachable_upstream_fails_with_500() {
        let closed = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind");
            listener.local_addr().expect("address")
        };
        let relay = spawn_relay(test_runtime_config(upstream_url(closed, "/ok"))).await;

        let response = post_chat(relay, &hello()).await;
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json().await.expect("json body");
        assert!(body["error"]
            .as_str()
            .is_some_and(|message| message.starts_with("failed to reach upstream")));
    }

    #[tokio::test]
    async fn conversations_over_the_limit_are_rejected() {
        let upstream = spawn_upstream().await;
        let mut config = test_runtime_config(upstream_url(upstream, "/ok"));
        config.max_messages = 1;
        let relay = spawn_relay(config).await;

        let body = json!({"messages": [
            {"role": "assistant", "content": ">> ONLINE"},
            {"role": "user", "content": "hello"},
        ]});
        let response = post_chat(relay, &body).await;
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn relay_token_is_enforced_when_configured() {
        let upstream = spawn_upstream().await;
        let mut config = test_runtime_config(upstream_url(upstream, "/ok"));
        config.relay_token = Some("relay-secret".to_string());
        let relay = spawn_relay(config).await;

        let denied = post_chat(relay, &hello()).await;
        assert_eq!(denied.status(), reqwest::StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = denied.json().await.expect("json body");
        assert_eq!(body, json!({"error": "unauthorized"}));

        let allowed = reqwest::Client::new()
            .post(format!("http://{relay}{CHAT_ENDPOINT}"))
            .bearer_auth("relay-secret")
            .json(&hello())
            .send()
            .await
            .expect("relay reachable");
        assert_eq!(allowed.status(), reqwest::StatusCode::OK);
    }

    #[tokio::test]
    async fn preflight_returns_empty_body_with_cors_headers() {
        let upstream = spawn_upstream().await;
        let relay = spawn_relay(test_runtime_config(upstream_url(upstream, "/ok"))).await;

        let response = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, format!("http://{relay}{CHAT_ENDPOINT}"))
            .header(REQUEST_ID_HEADER, "req-preflight")
            .send()
            .await
            .expect("relay reachable");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers
                .get("access-control-allow-headers")
                .and_then(|value| value.to_str().ok()),
            Some(CORS_ALLOW_HEADERS)
        );
        assert_eq!(
            headers.get(REQUEST_ID_HEADER).and_then(|value| value.to_str().ok()),
            Some("req-preflight")
        );
        assert!(response.text().await.expect("body").is_empty());
    }

    #[tokio::test]
    async fn unknown_paths_fall_back_to_the_app_shell() {
        let static_dir = std::env::temp_dir().join(format!("hacker-portfolio-{}", generate_request_id()));
        std::fs::create_dir_all(&static_dir).expect("create static dir");
        std::fs::write(static_dir.join("index.html"), "<div id=\"app\"></div>").expect("write index");

        let upstream = spawn_upstream().await;
        let mut config = test_runtime_config(upstream_url(upstream, "/ok"));
        config.static_dir = static_dir.clone();
        let relay = spawn_relay(config).await;

        let body = reqwest::get(format!("http://{relay}/terminal"))
            .await
            .expect("relay reachable")
            .text()
            .await
            .expect("body");
        assert!(body.contains("id=\"app\""));

        let _ = std::fs::remove_dir_all(static_dir);
    }

    #[test]
    fn request_id_is_echoed_or_generated() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("  req-abc  "));
        assert_eq!(resolve_request_id(&headers), "req-abc");

        let generated = resolve_request_id(&HeaderMap::new());
        assert!(generated.starts_with("req-"));
    }

    #[test]
    fn bearer_token_requires_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_eq!(read_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer  abc "));
        assert_eq!(read_bearer_token(&headers), Some("abc"));
    }

    #[test]
    fn upstream_statuses_map_to_public_errors() {
        let rate_limited = map_upstream_status(StatusCode::TOO_MANY_REQUESTS, String::new());
        assert_eq!(rate_limited.status(), StatusCode::TOO_MANY_REQUESTS);

        let teapot = map_upstream_status(StatusCode::IM_A_TEAPOT, "short and stout".to_string());
        assert_eq!(teapot.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(teapot.public_message(), "AI gateway error");
        assert_eq!(teapot.to_string(), "upstream returned 418 I'm a teapot");
    }

    #[test]
    fn system_prompt_leads_the_conversation() {
        let forwarded = with_system_prompt(vec![ChatMessage::new(Role::User, "hi")]);
        assert_eq!(forwarded.len(), 2);
        assert_eq!(forwarded[0].role, Role::System);
        assert!(forwarded[0].content.starts_with("YOU ARE PROJECT_OMEGA"));
    }
}
