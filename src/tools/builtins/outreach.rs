//! Outreach dispatch and sequencing tools.
//!
//! Drafting, single-shot sends (email/SMS/call), multi-step sequence
//! scheduling, and history.  The backend owns provider integrations
//! and all multi-step orchestration; each tool here is one request.

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
struct DraftMessageArgs {
    lead_id: String,
    channel: Channel,
    #[serde(default)]
    context: String,
}

/// Generate a personalized outreach message for a lead.
pub async fn draft_message(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: DraftMessageArgs = parse_args("draft_message", args)?;
    require_non_empty("draft_message", "lead_id", &args.lead_id)?;

    let req = ApiRequest::post("/outreach/draft").body(json!({
        "lead_id": args.lead_id,
        "channel": args.channel,
        "context": args.context,
    }));
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SendEmailArgs {
    lead_id: String,
    subject: String,
    content: String,
}

/// Send an email to a lead.
pub async fn send_email(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: SendEmailArgs = parse_args("send_email", args)?;
    require_non_empty("send_email", "lead_id", &args.lead_id)?;

    let req = ApiRequest::post("/outreach/send/email").body(json!({
        "lead_id": args.lead_id,
        "subject": args.subject,
        "content": args.content,
    }));
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SendSmsArgs {
    lead_id: String,
    content: String,
}

/// Send an SMS to a lead.
pub async fn send_sms(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: SendSmsArgs = parse_args("send_sms", args)?;
    require_non_empty("send_sms", "lead_id", &args.lead_id)?;

    let req = ApiRequest::post("/outreach/send/sms").body(json!({
        "lead_id": args.lead_id,
        "content": args.content,
    }));
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlaceCallArgs {
    lead_id: String,
    script: String,
    callback_url: String,
}

/// Place a scripted phone call to a lead.
pub async fn place_call(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: PlaceCallArgs = parse_args("place_call", args)?;
    require_non_empty("place_call", "lead_id", &args.lead_id)?;
    require_non_empty("place_call", "callback_url", &args.callback_url)?;

    let req = ApiRequest::post("/outreach/send/call").body(json!({
        "lead_id": args.lead_id,
        "script": args.script,
        "callback_url": args.callback_url,
    }));
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

fn default_num_steps() -> u32 {
    3
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateSequenceArgs {
    lead_id: String,
    user_id: String,
    #[serde(default)]
    channel: Channel,
    #[serde(default = "default_num_steps")]
    num_steps: u32,
    #[serde(default)]
    context: String,
    #[serde(default)]
    auto_send: bool,
}

/// Generate and schedule a multi-step follow-up sequence for a lead.
pub async fn create_sequence(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: CreateSequenceArgs = parse_args("create_sequence", args)?;
    require_non_empty("create_sequence", "lead_id", &args.lead_id)?;
    require_non_empty("create_sequence", "user_id", &args.user_id)?;
    // Sequences only run over messaging channels.
    if args.channel == Channel::Call {
        return Err(ApiError::Validation(
            "create_sequence: channel must be \"email\" or \"sms\"".into(),
        ));
    }

    let req = ApiRequest::post("/outreach/sequence")
        .user(args.user_id)
        .body(json!({
            "lead_id": args.lead_id,
            "channel": args.channel,
            "num_steps": args.num_steps,
            "context": args.context,
            "auto_send": args.auto_send,
        }));
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutreachHistoryArgs {
    lead_id: String,
}

/// Get all outreach messages sent to a lead.
pub async fn outreach_history(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: OutreachHistoryArgs = parse_args("outreach_history", args)?;
    require_path_id("outreach_history", "lead_id", &args.lead_id)?;

    let req = ApiRequest::get(format!("/outreach/history/{}", args.lead_id));
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

/// Register the outreach tools.
pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolMeta {
            name: "draft_message".into(),
            description: "Generate a personalized outreach message for a lead.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "lead_id": {
                        "type": "string",
                        "description": "The lead's UUID."
                    },
                    "channel": {
                        "type": "string",
                        "enum": ["email", "sms", "call"],
                        "description": "Delivery channel for the drafted message."
                    },
                    "context": {
                        "type": "string",
                        "description": "Context about your product/offering for personalization."
                    }
                },
                "required": ["lead_id", "channel"],
                "additionalProperties": false
            }),
        },
        Arc::new(|ctx, args| Box::pin(async move { draft_message(&ctx, args).await })),
    );
    reg.register(
        ToolMeta {
            name: "send_email".into(),
            description: "Send an email to a lead.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "lead_id": {
                        "type": "string",
                        "description": "The lead's UUID."
                    },
                    "subject": {
                        "type": "string",
                        "description": "Email subject line."
                    },
                    "content": {
                        "type": "string",
                        "description": "Email body (HTML supported)."
                    }
                },
                "required": ["lead_id", "subject", "content"],
                "additionalProperties": false
            }),
        },
        Arc::new(|ctx, args| Box::pin(async move { send_email(&ctx, args).await })),
    );
    reg.register(
        ToolMeta {
            name: "send_sms".into(),
            description: "Send an SMS to a lead. Keep messages under 160 characters where possible.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "lead_id": {
                        "type": "string",
                        "description": "The lead's UUID."
                    },
                    "content": {
                        "type": "string",
                        "description": "SMS message text."
                    }
                },
                "required": ["lead_id", "content"],
                "additionalProperties": false
            }),
        },
        Arc::new(|ctx, args| Box::pin(async move { send_sms(&ctx, args).await })),
    );
    reg.register(
        ToolMeta {
            name: "place_call".into(),
            description: "Place a scripted phone call to a lead.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "lead_id": {
                        "type": "string",
                        "description": "The lead's UUID."
                    },
                    "script": {
                        "type": "string",
                        "description": "The call script to deliver."
                    },
                    "callback_url": {
                        "type": "string",
                        "description": "URL to receive call results."
                    }
                },
                "required": ["lead_id", "script", "callback_url"],
                "additionalProperties": false
            }),
        },
        Arc::new(|ctx, args| Box::pin(async move { place_call(&ctx, args).await })),
    );
    reg.register(
        ToolMeta {
            name: "create_sequence".into(),
            description: "Generate and schedule a multi-step follow-up sequence for a lead.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "lead_id": {
                        "type": "string",
                        "description": "The lead's UUID."
                    },
                    "user_id": {
                        "type": "string",
                        "description": "The user's UUID."
                    },
                    "channel": {
                        "type": "string",
                        "enum": ["email", "sms"],
                        "description": "Sequence channel. Defaults to \"email\"."
                    },
                    "num_steps": {
                        "type": "integer",
                        "description": "Number of follow-up steps. Defaults to 3."
                    },
                    "context": {
                        "type": "string",
                        "description": "Context about your offering."
                    },
                    "auto_send": {
                        "type": "boolean",
                        "description": "True to auto-send, false for approval mode. Defaults to false."
                    }
                },
                "required": ["lead_id", "user_id"],
                "additionalProperties": false
            }),
        },
        Arc::new(|ctx, args| Box::pin(async move { create_sequence(&ctx, args).await })),
    );
    reg.register(
        ToolMeta {
            name: "outreach_history".into(),
            description: "Get all outreach messages sent to a lead.".into(),
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
        Arc::new(|ctx, args| Box::pin(async move { outreach_history(&ctx, args).await })),
    );
}
