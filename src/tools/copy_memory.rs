use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CopyMemoryParams {
    #[schemars(description = "The source project identifier")]
    pub source_project_id: String,

    #[schemars(description = "The target project identifier")]
    pub target_project_id: String,

    #[schemars(description = "An array of entity names to copy")]
    pub entity_names: Vec<String>,
}
