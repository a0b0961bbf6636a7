//! MWD Agent server
//!
//! Serves the branding, website, social and copywriting generation endpoints.

use mwd_agent::api::endpoints::{AppState, create_router};
use mwd_agent::core::config::Config;
use mwd_agent::core::generator::Workflow;
use mwd_agent::core::logging::init_logging;
use mwd_agent::core::provider::CompletionProvider;
use mwd_agent::core::providers::AnthropicProvider;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.server.log_level);

    print_startup_banner(&config);

    if !config.llm_configured() {
        warn!("ANTHROPIC_API_KEY is not set; generation endpoints will report failures");
    }

    let provider: Arc<dyn CompletionProvider> = Arc::new(AnthropicProvider::new(&config.anthropic));

    info!(
        "Using provider: {} (model {})",
        provider.provider_name(),
        config.anthropic.model
    );

    let app_state = AppState {
        config: config.clone(),
        provider,
    };

    let app = create_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Print startup banner with configuration status
fn print_startup_banner(config: &Config) {
    let status = config.integration_status();
    let rule = "=".repeat(50);

    println!("\n{}", rule);
    println!("🚀 MWD Agent starting on port {}", config.server.port);
    println!("{}", rule);
    println!("\n📋 Configuration Status:");
    println!("  Anthropic API: {}", status.anthropic);
    println!("  Supabase: {}", status.supabase);
    println!("  Slack: {}", status.slack);
    println!("  Google Workspace: {}", status.google_workspace);
    println!("\n🔗 Endpoints available:");
    for workflow in Workflow::ALL {
        println!("  POST {}", workflow.path());
    }
    println!("\n{}\n", rule);
}

/// Print help message
fn print_help() {
    println!("MWD Agent - Marketing Website Design Agent");
    println!();
    println!("Usage: mwd-agent [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Configuration is read from the TOML file named by CONFIG_PATH, or");
    println!("from environment variables (a .env file is loaded first if present):");
    println!();
    println!("LLM:");
    println!("  ANTHROPIC_API_KEY - Anthropic API key (required for generation)");
    println!("  ANTHROPIC_BASE_URL - API base URL (default: https://api.anthropic.com)");
    println!("  ANTHROPIC_MODEL - Model name (default: claude-sonnet-4-5-20250929)");
    println!("  MAX_TOKENS - Completion token limit (default: 4096)");
    println!("  REQUEST_TIMEOUT - Request timeout in seconds (default: 90)");
    println!();
    println!("Server:");
    println!("  HOST - Server host (default: 0.0.0.0)");
    println!("  PORT - Server port (default: 8080)");
    println!("  LOG_LEVEL - Logging level (default: info)");
    println!();
    println!("Integrations (optional):");
    println!("  SUPABASE_URL - Supabase project URL");
    println!("  SLACK_TOKEN - Slack bot token");
    println!("  GOOGLE_ACCESS_TOKEN - OAuth2 access token for Drive, Docs and Gmail");
    println!("  GOOGLE_CLOUD_PROJECT - Google Cloud project ID");
}
