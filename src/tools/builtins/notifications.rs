//! Notification and pipeline summary tools.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiError, ApiRequest};
use crate::tools::{parse_args, render, require_non_empty, ToolContext, ToolMeta, ToolRegistry};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HotLeadNotificationsArgs {
    user_id: String,
}

/// Get pending hot-lead notifications for a user.
pub async fn get_hot_lead_notifications(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: HotLeadNotificationsArgs = parse_args("get_hot_lead_notifications", args)?;
    require_non_empty("get_hot_lead_notifications", "user_id", &args.user_id)?;

    let req = ApiRequest::get("/notifications/hot-leads").user(args.user_id);
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SummarizePipelineArgs {
    user_id: String,
}

/// Summarize a user's pipeline: totals, temperature breakdown, outreach
/// stats.
pub async fn summarize_pipeline(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: SummarizePipelineArgs = parse_args("summarize_pipeline", args)?;
    require_non_empty("summarize_pipeline", "user_id", &args.user_id)?;

    let req = ApiRequest::get("/notifications/pipeline-summary").user(args.user_id);
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

/// Register the notification tools.
pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolMeta {
            name: "get_hot_lead_notifications".into(),
            description: "Get pending hot lead notifications: leads that recently became hot.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "The user's UUID."
                    }
                },
                "required": ["user_id"],
                "additionalProperties": false
            }),
        },
        Arc::new(|ctx, args| Box::pin(async move { get_hot_lead_notifications(&ctx, args).await })),
    );
    reg.register(
        ToolMeta {
            name: "summarize_pipeline".into(),
            description: "Get a summary of the user's pipeline: total leads, temperature breakdown, outreach stats.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "The user's UUID."
                    }
                },
                "required": ["user_id"],
                "additionalProperties": false
            }),
        },
        Arc::new(|ctx, args| Box::pin(async move { summarize_pipeline(&ctx, args).await })),
    );
}
