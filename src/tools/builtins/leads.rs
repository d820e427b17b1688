//! Lead discovery and lifecycle tools.
//!
//! `search_leads` queries the prospecting provider through the backend
//! and stores results in the pipeline; the remaining tools read or
//! mutate individual leads.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::api::{ApiError, ApiRequest};
use crate::tools::{
    parse_args, render, require_non_empty, require_path_id, Temperature, ToolContext, ToolMeta,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchLeadsArgs {
    user_id: String,
    #[serde(default)]
    person_titles: Option<Vec<String>>,
    #[serde(default)]
    person_locations: Option<Vec<String>>,
    #[serde(default)]
    q_keywords: Option<String>,
    #[serde(default)]
    organization_num_employees_ranges: Option<Vec<String>>,
}

/// Search for leads matching the given criteria.
///
/// The backend interprets a missing filter as "no filter" — unset and
/// empty values are left out of the request entirely, never sent as
/// null.
pub async fn search_leads(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: SearchLeadsArgs = parse_args("search_leads", args)?;
    require_non_empty("search_leads", "user_id", &args.user_id)?;

    let mut filters = Map::new();
    if let Some(titles) = args.person_titles.filter(|v| !v.is_empty()) {
        filters.insert("person_titles".into(), json!(titles));
    }
    if let Some(locations) = args.person_locations.filter(|v| !v.is_empty()) {
        filters.insert("person_locations".into(), json!(locations));
    }
    if let Some(keywords) = args.q_keywords.filter(|s| !s.is_empty()) {
        filters.insert("q_keywords".into(), json!(keywords));
    }
    if let Some(ranges) = args.organization_num_employees_ranges.filter(|v| !v.is_empty()) {
        filters.insert("organization_num_employees_ranges".into(), json!(ranges));
    }

    let req = ApiRequest::post("/leads/search")
        .user(args.user_id)
        .body(json!({ "filters": filters }));
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnrichLeadArgs {
    lead_id: String,
}

/// Enrich a lead with scoring data (lead_score and temperature).
pub async fn enrich_lead(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: EnrichLeadArgs = parse_args("enrich_lead", args)?;
    require_path_id("enrich_lead", "lead_id", &args.lead_id)?;

    let req = ApiRequest::post(format!("/leads/enrich/{}", args.lead_id));
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListLeadsArgs {
    user_id: String,
    #[serde(default)]
    temperature: Option<Temperature>,
}

/// List a user's leads, sorted by score, optionally filtered by
/// temperature.
pub async fn list_leads(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: ListLeadsArgs = parse_args("list_leads", args)?;
    require_non_empty("list_leads", "user_id", &args.user_id)?;

    let mut req = ApiRequest::get("/leads/list").user(args.user_id);
    if let Some(temperature) = args.temperature {
        req = req.query("temperature", temperature.as_str());
    }
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetLeadArgs {
    lead_id: String,
}

/// Get full details for a single lead.
pub async fn get_lead(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: GetLeadArgs = parse_args("get_lead", args)?;
    require_path_id("get_lead", "lead_id", &args.lead_id)?;

    let req = ApiRequest::get(format!("/leads/{}", args.lead_id));
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

fn default_reason() -> String {
    "manual".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MarkDoNotContactArgs {
    lead_id: String,
    #[serde(default = "default_reason")]
    reason: String,
}

/// Mark a lead as do-not-contact and cancel its pending sequences.
pub async fn mark_do_not_contact(ctx: &ToolContext, args: Value) -> Result<String, ApiError> {
    let args: MarkDoNotContactArgs = parse_args("mark_do_not_contact", args)?;
    require_path_id("mark_do_not_contact", "lead_id", &args.lead_id)?;

    let req = ApiRequest::post(format!("/leads/{}/dnc", args.lead_id))
        .body(json!({ "reason": args.reason }));
    let result = ctx.api.call(&ctx.session, req).await?;
    render(&result)
}

/// Register the lead tools.
pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolMeta {
            name: "search_leads".into(),
            description: "Search for leads matching criteria (job title, location, keywords, company size) and store the results in the pipeline.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "The user's UUID."
                    },
                    "person_titles": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Job titles to search (e.g. [\"CEO\", \"CTO\", \"Founder\"])."
                    },
                    "person_locations": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Locations (e.g. [\"San Francisco\", \"New York\"])."
                    },
                    "q_keywords": {
                        "type": "string",
                        "description": "Keyword search (e.g. \"SaaS hiring SDR\")."
                    },
                    "organization_num_employees_ranges": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Company size ranges (e.g. [\"1,10\", \"11,50\"])."
                    }
                },
                "required": ["user_id"],
                "additionalProperties": false
            }),
        },
        Arc::new(|ctx, args| Box::pin(async move { search_leads(&ctx, args).await })),
    );
    reg.register(
        ToolMeta {
            name: "enrich_lead".into(),
            description: "Enrich a lead with scoring data: computes lead_score (0-100) and temperature (cold/warm/hot).".into(),
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
        Arc::new(|ctx, args| Box::pin(async move { enrich_lead(&ctx, args).await })),
    );
    reg.register(
        ToolMeta {
            name: "list_leads".into(),
            description: "List all leads for a user, sorted by score. Optionally filter by temperature.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "The user's UUID."
                    },
                    "temperature": {
                        "type": "string",
                        "enum": ["cold", "warm", "hot"],
                        "description": "Only return leads in this bucket."
                    }
                },
                "required": ["user_id"],
                "additionalProperties": false
            }),
        },
        Arc::new(|ctx, args| Box::pin(async move { list_leads(&ctx, args).await })),
    );
    reg.register(
        ToolMeta {
            name: "get_lead".into(),
            description: "Get full details for a single lead.".into(),
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
        Arc::new(|ctx, args| Box::pin(async move { get_lead(&ctx, args).await })),
    );
    reg.register(
        ToolMeta {
            name: "mark_do_not_contact".into(),
            description: "Mark a lead as do-not-contact and cancel all of its pending sequences.".into(),
            args_schema: json!({
                "type": "object",
                "properties": {
                    "lead_id": {
                        "type": "string",
                        "description": "The lead's UUID."
                    },
                    "reason": {
                        "type": "string",
                        "description": "Reason for the do-not-contact flag. Defaults to \"manual\"."
                    }
                },
                "required": ["lead_id"],
                "additionalProperties": false
            }),
        },
        Arc::new(|ctx, args| Box::pin(async move { mark_do_not_contact(&ctx, args).await })),
    );
}
