//! vesta serve command - the HTTP command API

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Args;
use gateway::ControllerClient;
use pipeline::CommandPipeline;
use serde::Deserialize;
use serde_json::json;
use shared::{Command, ConsoleLogger, VestaConfig};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to bind
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    pub bind: String,
}

#[derive(Clone)]
struct AppState {
    pipeline: Arc<CommandPipeline>,
}

#[derive(Debug, Deserialize)]
struct CommandRequest {
    command: String,
    #[serde(default)]
    session_id: Option<String>,
}

impl ServeCommand {
    pub async fn run(&self, config: VestaConfig) -> anyhow::Result<()> {
        let token = config.controller.token()?;
        let dispatcher = Arc::new(ControllerClient::new(&config.controller, token)?);
        let pipeline = Arc::new(CommandPipeline::new(
            &config,
            dispatcher,
            Arc::new(ConsoleLogger),
        )?);

        let app = router(AppState { pipeline });

        info!("vesta listening on {}", self.bind);
        let listener = tokio::net::TcpListener::bind(&self.bind).await?;
        axum::serve(listener, app).await?;
        Ok(())
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/command", post(handle_command))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /command: run one command through the pipeline.
///
/// A caller without a session id gets a fresh one assigned before the
/// pipeline runs; it is echoed back so the caller can continue the session.
async fn handle_command(
    State(state): State<AppState>,
    Json(request): Json<CommandRequest>,
) -> Response {
    let session_id = request
        .session_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    match state
        .pipeline
        .handle(Command::new(request.command, session_id))
        .await
    {
        Ok(outcome) => {
            let status = StatusCode::from_u16(outcome.http_status()).unwrap_or(StatusCode::OK);
            (status, Json(outcome)).into_response()
        }
        Err(e) => {
            let status =
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::BAD_REQUEST);
            let body = json!({ "error": format!("{}: {}", e.category(), e) });
            (status, Json(body)).into_response()
        }
    }
}
