//! MCP `search_nodes` tool parameter definition.
//!
//! Callers paginate by `page`/`limit`; the handler translates page numbers
//! to the repository's `skip`/`limit` model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchNodesParams {
    #[schemars(description = "The project identifier")]
    pub project_id: String,

    #[schemars(
        description = "Pattern matched against entity names and types (regular expression)"
    )]
    pub query: String,

    #[schemars(description = "Page number, 1-based (default: 1)")]
    pub page: Option<usize>,

    #[schemars(description = "Results per page (default: 50, max: 100)")]
    pub limit: Option<usize>,
}
