//! Tool catalogue and dispatch.
//!
//! Every operation the calling agent can invoke is declared here as a
//! [`ToolMeta`] (name, description, JSON-Schema for its arguments)
//! paired with an async handler.  The registry is pure metadata plus
//! dispatch — all state lives in the session store and the backend.
//!
//! Build one with [`ToolRegistry::with_builtins`] at startup; use
//! [`ToolRegistry::list`] for the catalogue (e.g. to advertise tools
//! to the caller) and [`ToolRegistry::call`] to invoke by name.

pub mod builtins;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::session::SessionHandle;

/// Metadata describing a tool available to the calling agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMeta {
    /// Short machine-friendly name (e.g. `"search_leads"`).
    pub name: String,
    /// Human-readable one-liner the caller uses to pick a tool.
    pub description: String,
    /// JSON Schema object describing the expected arguments.
    pub args_schema: Value,
}

/// Everything a tool needs to perform its one backend call.
#[derive(Clone)]
pub struct ToolContext {
    pub api: Arc<ApiClient>,
    pub session: SessionHandle,
}

/// Async handler function that tools register for dispatch.
pub type ToolHandler = Arc<
    dyn Fn(ToolContext, Value) -> Pin<Box<dyn Future<Output = Result<String, ApiError>> + Send>>
        + Send
        + Sync,
>;

struct ToolEntry {
    meta: ToolMeta,
    handler: ToolHandler,
}

/// Catalogue of registered tools.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with every built-in tool.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        builtins::register_all(&mut reg);
        debug!(tools = reg.len(), "tool registry loaded");
        reg
    }

    /// Register a tool.
    ///
    /// Duplicate names are silently ignored (first registration wins).
    pub fn register(&mut self, meta: ToolMeta, handler: ToolHandler) {
        if self.entries.iter().any(|e| e.meta.name == meta.name) {
            return;
        }
        self.entries.push(ToolEntry { meta, handler });
    }

    /// Metadata for every registered tool, in registration order.
    pub fn list(&self) -> Vec<ToolMeta> {
        self.entries.iter().map(|e| e.meta.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.meta.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke a tool by name.
    ///
    /// The result is the backend's JSON response rendered as
    /// pretty-printed text; errors propagate unchanged from the tool.
    pub async fn call(
        &self,
        name: &str,
        ctx: ToolContext,
        args: Value,
    ) -> Result<String, ApiError> {
        let handler = self
            .entries
            .iter()
            .find(|e| e.meta.name == name)
            .map(|e| e.handler.clone())
            .ok_or_else(|| ApiError::Validation(format!("unknown tool: {name}")))?;
        handler(ctx, args).await
    }
}

/// Deserialize tool arguments into their typed form.
///
/// A missing or malformed argument fails here, before any backend
/// request is constructed.
pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ApiError> {
    // Callers that omit the args object entirely send null.
    let args = if args.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|e| ApiError::Validation(format!("{tool}: invalid arguments: {e}")))
}

/// Validate an identifier that is interpolated into a URL path.
pub(crate) fn require_path_id(tool: &str, field: &str, value: &str) -> Result<(), ApiError> {
    let bad = value.is_empty()
        || value.contains('/')
        || value.contains('\\')
        || value.contains('\0')
        || value.contains("..");
    if bad {
        return Err(ApiError::Validation(format!(
            "{tool}: invalid {field}: {value:?}"
        )));
    }
    Ok(())
}

/// Validate an identifier that is sent as a header or body value.
pub(crate) fn require_non_empty(tool: &str, field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!(
            "{tool}: `{field}` must not be empty"
        )));
    }
    Ok(())
}

/// Render a backend response for the caller.
pub(crate) fn render(value: &Value) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Outreach channel accepted by the messaging tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Email,
    Sms,
    Call,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Call => "call",
        }
    }
}

/// Lead temperature bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Cold,
    Warm,
    Hot,
}

impl Temperature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Temperature::Cold => "cold",
            Temperature::Warm => "warm",
            Temperature::Hot => "hot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_id_rejects_traversal() {
        assert!(require_path_id("get_lead", "lead_id", "l1").is_ok());
        assert!(require_path_id("get_lead", "lead_id", "").is_err());
        assert!(require_path_id("get_lead", "lead_id", "a/b").is_err());
        assert!(require_path_id("get_lead", "lead_id", "..").is_err());
    }

    #[test]
    fn parse_args_treats_null_as_empty() {
        #[derive(Deserialize, Debug)]
        struct Args {
            #[allow(dead_code)]
            lead_id: String,
        }
        let err = parse_args::<Args>("get_lead", Value::Null).unwrap_err();
        assert!(err.to_string().contains("lead_id"), "got: {err}");
    }

    #[test]
    fn channel_round_trips_lowercase() {
        let c: Channel = serde_json::from_str("\"sms\"").unwrap();
        assert_eq!(c, Channel::Sms);
        assert_eq!(serde_json::to_value(Channel::Email).unwrap(), "email");
        assert_eq!(Channel::default(), Channel::Email);
        assert_eq!(Temperature::Hot.as_str(), "hot");
    }
}
