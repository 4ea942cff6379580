use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `list_projects` MCP tool. Takes nothing; returns the
/// first page of projects with pagination metadata.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListProjectsParams {}
