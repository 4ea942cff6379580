use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::graph::types::NewRelation;

/// One relation to create, endpoints addressed by entity name.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationSpec {
    #[schemars(description = "The name of the entity where the relation starts")]
    pub from_entity_name: String,

    #[schemars(description = "The name of the entity where the relation ends")]
    pub to_entity_name: String,

    #[schemars(description = "The type of the relation (e.g. 'uses', 'depends_on')")]
    pub relation_type: String,
}

impl From<RelationSpec> for NewRelation {
    fn from(spec: RelationSpec) -> Self {
        NewRelation {
            from_entity_name: spec.from_entity_name,
            to_entity_name: spec.to_entity_name,
            relation_type: spec.relation_type,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRelationsParams {
    #[schemars(description = "The project identifier")]
    pub project_id: String,

    #[schemars(description = "An array of relations to create")]
    pub relations: Vec<RelationSpec>,
}
