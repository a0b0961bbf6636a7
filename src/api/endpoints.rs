//! API endpoint handlers
//!
//! Status and health checks plus the four generation workflows. Workflow
//! handlers always answer 200 with a result record; provider failures are
//! reported inside the body.

use crate::core::config::Config;
use crate::core::generator::{self, Generation, Workflow};
use crate::core::provider::CompletionProvider;
use crate::models::OperationResult;
use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: Arc<dyn CompletionProvider>,
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route(Workflow::Branding.path(), post(branding))
        .route(Workflow::Website.path(), post(website))
        .route(Workflow::Social.path(), post(social))
        .route(Workflow::Copywriting.path(), post(copywriting))
        .with_state(state)
}

async fn run_workflow(
    state: &AppState,
    workflow: Workflow,
    client_data: Value,
) -> Json<OperationResult<Generation>> {
    info!("📥 Incoming {} request", workflow);

    let result = generator::generate(state.provider.as_ref(), workflow, &client_data).await;

    match &result.data {
        Some(generation) => info!(
            "✅ {} completed: input_tokens={}, output_tokens={}",
            workflow, generation.usage.input_tokens, generation.usage.output_tokens
        ),
        None => error!(
            "❌ {} failed: {}",
            workflow,
            result.error_message().unwrap_or("unknown error")
        ),
    }

    Json(result)
}

/// POST /branding - Generate branding strategy
async fn branding(State(state): State<AppState>, Json(body): Json<Value>) -> impl IntoResponse {
    run_workflow(&state, Workflow::Branding, body).await
}

/// POST /website - Generate website design plan
async fn website(State(state): State<AppState>, Json(body): Json<Value>) -> impl IntoResponse {
    run_workflow(&state, Workflow::Website, body).await
}

/// POST /social - Generate social media strategy
async fn social(State(state): State<AppState>, Json(body): Json<Value>) -> impl IntoResponse {
    run_workflow(&state, Workflow::Social, body).await
}

/// POST /copywriting - Generate marketing copy
async fn copywriting(State(state): State<AppState>, Json(body): Json<Value>) -> impl IntoResponse {
    run_workflow(&state, Workflow::Copywriting, body).await
}

/// GET / - Service status
async fn root(State(state): State<AppState>) -> impl IntoResponse {
    let endpoints: Vec<&str> = Workflow::ALL.iter().map(|w| w.path()).collect();

    Json(json!({
        "status": "running",
        "service": "MWD Agent",
        "config": state.config.integration_status(),
        "endpoints": endpoints,
    }))
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "provider": state.provider.provider_name(),
        "llm_configured": state.provider.is_configured(),
        "google_workspace_configured": state.config.google_configured(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AnthropicConfig;
    use crate::core::provider::{Completion, ProviderError, TokenUsage};
    use crate::core::providers::AnthropicProvider;
    use async_trait::async_trait;
    use std::net::SocketAddr;

    struct EchoProvider;

    #[async_trait]
    impl CompletionProvider for EchoProvider {
        async fn complete(&self, prompt: &str) -> Result<Completion, ProviderError> {
            Ok(Completion {
                text: prompt.lines().next().unwrap_or_default().to_string(),
                usage: TokenUsage {
                    input_tokens: 100,
                    output_tokens: 50,
                    cache_creation_tokens: 0,
                    cache_read_tokens: 0,
                },
            })
        }

        fn is_configured(&self) -> bool {
            true
        }

        fn provider_name(&self) -> &str {
            "echo"
        }
    }

    async fn spawn_app(provider: Arc<dyn CompletionProvider>) -> SocketAddr {
        let state = AppState {
            config: Arc::new(Config::default()),
            provider,
        };
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router(state)).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_workflow_endpoints_return_success_record() {
        let addr = spawn_app(Arc::new(EchoProvider)).await;
        let client = reqwest::Client::new();

        for workflow in Workflow::ALL {
            let response = client
                .post(format!("http://{}{}", addr, workflow.path()))
                .json(&json!({"company_name": "TechFlow Solutions"}))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), 200);

            let body: Value = response.json().await.unwrap();
            assert_eq!(body["success"], json!(true));
            assert_eq!(
                body["response"],
                json!(workflow.template().lines().next().unwrap())
            );
            assert_eq!(body["usage"]["input_tokens"], json!(100));
        }
    }

    #[tokio::test]
    async fn test_provider_failure_is_reported_in_body() {
        let provider = AnthropicProvider::new(&AnthropicConfig::default());
        let addr = spawn_app(Arc::new(provider)).await;

        let response = reqwest::Client::new()
            .post(format!("http://{}/copywriting", addr))
            .json(&json!(["any", "json", 1]))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({"success": false, "error": "ANTHROPIC_API_KEY is not configured"})
        );
    }

    #[tokio::test]
    async fn test_root_lists_endpoints_and_config() {
        let addr = spawn_app(Arc::new(EchoProvider)).await;

        let body: Value = reqwest::get(format!("http://{}/", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], json!("running"));
        assert_eq!(body["service"], json!("MWD Agent"));
        assert_eq!(
            body["endpoints"],
            json!(["/branding", "/website", "/social", "/copywriting"])
        );
        assert_eq!(body["config"]["anthropic"], json!("❌ Missing"));
    }

    #[tokio::test]
    async fn test_health_reports_provider() {
        let addr = spawn_app(Arc::new(EchoProvider)).await;

        let body: Value = reqwest::get(format!("http://{}/health", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], json!("healthy"));
        assert_eq!(body["provider"], json!("echo"));
        assert_eq!(body["llm_configured"], json!(true));
        assert_eq!(body["google_workspace_configured"], json!(false));
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let addr = spawn_app(Arc::new(EchoProvider)).await;

        let response = reqwest::Client::new()
            .post(format!("http://{}/branding", addr))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
