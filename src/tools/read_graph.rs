use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadGraphParams {
    #[schemars(description = "The project identifier")]
    pub project_id: String,
}
