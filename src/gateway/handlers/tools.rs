use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::api::ApiError;
use crate::gateway::AppState;
use crate::tools::ToolContext;

/// `GET /api/tools` — list the tool catalogue.
pub(crate) async fn api_tools_list(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "tools": state.registry.list() }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CallRequest {
    tool: String,
    #[serde(default)]
    args: Value,
    /// Conversation id; a fresh one is minted when omitted.
    #[serde(default)]
    session: Option<String>,
}

/// `POST /api/tools/call` — invoke a tool by name.
///
/// The response echoes the session id so the caller can thread it
/// through subsequent calls and keep its user identity.
pub(crate) async fn api_tools_call(
    State(state): State<AppState>,
    Json(req): Json<CallRequest>,
) -> impl IntoResponse {
    let session_id = req
        .session
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let ctx = ToolContext {
        api: state.api.clone(),
        session: state.sessions.handle(&session_id),
    };

    debug!(tool = %req.tool, session = %session_id, "tool invocation");

    match state.registry.call(&req.tool, ctx, req.args).await {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({
                "session": session_id,
                "tool": req.tool,
                "result": result,
            })),
        ),
        Err(e) => (error_status(&e), Json(error_body(&e))),
    }
}

fn error_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        ApiError::Transport(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        ApiError::Transport(_) | ApiError::Serialization(_) | ApiError::Upstream { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}

fn error_body(err: &ApiError) -> Value {
    let mut body = json!({
        "error": err.to_string(),
        "kind": err.kind(),
    });
    if let ApiError::Upstream { status, .. } = err {
        body["status"] = json!(status);
    }
    body
}
