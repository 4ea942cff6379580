use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Observation contents targeted at one entity.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObservationSpec {
    #[schemars(description = "The entity ID to add observations to")]
    pub entity_id: String,

    #[schemars(description = "The array of observation strings")]
    pub contents: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddObservationsParams {
    #[schemars(description = "An array of observation objects to add to entities")]
    pub observations: Vec<ObservationSpec>,
}

/// Per-entity slice of the tool result: which contents were actually new.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedObservations {
    pub entity_id: String,
    pub added_observations: Vec<String>,
}
