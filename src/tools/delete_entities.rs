use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntitiesParams {
    #[schemars(description = "The project identifier")]
    pub project_id: String,

    #[schemars(description = "An array of entity names to delete")]
    pub entity_names: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntitiesResult {
    pub deleted_count: usize,
}
