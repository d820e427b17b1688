//! Reply classification and lead scoring tools.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiError, ApiRequest};
use crate::tools::{
    parse_args, render, require_non_empty, require_path_id, Channel, ToolContext, ToolMeta,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassifyReplyArgs {
    reply_text: String,
}

/// Classify a reply: sentiment, intent signals, hot/warm/cold status.
pub async fn classify_reply(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: ClassifyReplyArgs = parse_args("classify_reply", args)?;
    require_non_empty("classify_reply", "reply_text", &args.reply_text)?;

    let req = ApiRequest::post("/scoring/classify").body(json!({
        "reply_text": args.reply_text,
    }));
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProcessReplyArgs {
    lead_id: String,
    reply_text: String,
    #[serde(default)]
    channel: Channel,
}

/// Process and store an incoming reply: classifies it, updates the
/// lead's score, and triggers hot-lead notifications.
pub async fn process_reply(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: ProcessReplyArgs = parse_args("process_reply", args)?;
    require_non_empty("process_reply", "lead_id", &args.lead_id)?;
    require_non_empty("process_reply", "reply_text", &args.reply_text)?;

    let req = ApiRequest::post("/scoring/process-reply").body(json!({
        "lead_id": args.lead_id,
        "reply_text": args.reply_text,
        "channel": args.channel,
    }));
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScoreLeadArgs {
    lead_id: String,
}

/// Re-score a lead from all interactions and engagement signals.
pub async fn score_lead(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: ScoreLeadArgs = parse_args("score_lead", args)?;
    require_path_id("score_lead", "lead_id", &args.lead_id)?;

    let req = ApiRequest::post(format!("/scoring/score/{}", args.lead_id));
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

/// Register the scoring tools.
pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolMeta {
            name: "classify_reply".into(),
            description: "Classify a reply to determine sentiment, intent signals, and hot/warm/cold status.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "reply_text": {
                        "type": "string",
                        "description": "The reply text to analyze."
                    }
                },
                "required": ["reply_text"],
                "additionalProperties": false
            }),
        },
        Arc::new(|ctx, args| Box::pin(async move { classify_reply(&ctx, args).await })),
    );
    reg.register(
        ToolMeta {
            name: "process_reply".into(),
            description: "Process and store an incoming reply: classifies it, updates the lead score, and triggers hot-lead notifications.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "lead_id": {
                        "type": "string",
                        "description": "The lead's UUID."
                    },
                    "reply_text": {
                        "type": "string",
                        "description": "The reply content."
                    },
                    "channel": {
                        "type": "string",
                        "enum": ["email", "sms", "call"],
                        "description": "Channel the reply arrived on. Defaults to \"email\"."
                    }
                },
                "required": ["lead_id", "reply_text"],
                "additionalProperties": false
            }),
        },
        Arc::new(|ctx, args| Box::pin(async move { process_reply(&ctx, args).await })),
    );
    reg.register(
        ToolMeta {
            name: "score_lead".into(),
            description: "Re-score a lead based on all interactions and engagement signals.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "lead_id": {
                        "type": "string",
                        "description": "The lead's UUID."
                    }
                },
                "required": ["lead_id"],
                "additionalProperties": false
            }),
        },
        Arc::new(|ctx, args| Box::pin(async move { score_lead(&ctx, args).await })),
    );
}
