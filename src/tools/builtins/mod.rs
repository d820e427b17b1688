//! Built-in tool implementations, grouped by pipeline domain.
//!
//! Each sub-module implements one family of tools and exposes a
//! `register()` that adds its metadata + handlers to a registry.
//! The grouping is documentation only — tools are independent of one
//! another at runtime.

pub mod leads;
pub mod notifications;
pub mod outreach;
pub mod scoring;

use super::ToolRegistry;

/// Register every built-in tool.
pub fn register_all(reg: &mut ToolRegistry) {
    leads::register(reg);
    outreach::register(reg);
    scoring::register(reg);
    notifications::register(reg);
}
