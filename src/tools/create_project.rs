use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::create_entities::EntitySpec;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectParams {
    #[schemars(description = "The name of the project")]
    pub name: String,

    #[schemars(description = "Optional human-readable description")]
    pub description: Option<String>,

    #[schemars(description = "Entities to seed the new project with")]
    pub entities: Option<Vec<EntitySpec>>,
}
