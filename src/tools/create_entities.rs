use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::graph::types::NewEntity;

/// One entity to create, as supplied over the wire.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntitySpec {
    #[schemars(description = "The name of the entity, unique within the project")]
    pub name: String,

    #[schemars(description = "Free-form type tag for the entity (e.g. 'person', 'service')")]
    pub entity_type: String,

    #[schemars(description = "Initial observation contents to attach to the entity")]
    pub observations: Option<Vec<String>>,
}

impl From<EntitySpec> for NewEntity {
    fn from(spec: EntitySpec) -> Self {
        NewEntity {
            name: spec.name,
            entity_type: spec.entity_type,
            observations: spec.observations.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntitiesParams {
    #[schemars(description = "The project identifier")]
    pub project_id: String,

    #[schemars(description = "An array of entities to create")]
    pub entities: Vec<EntitySpec>,
}
